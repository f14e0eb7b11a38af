use axum::Json;
use axum::extract::State;
use serde::{Deserialize, Serialize};

use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct AssistantRequest {
    #[serde(default)]
    pub question: String,
}

#[derive(Debug, Serialize)]
pub struct AssistantReply {
    pub topic: &'static str,
    pub answer: &'static str,
}

/// Canned environmental Q&A: the first keyword group that matches the
/// question picks the reply.
pub async fn ask(
    State(state): State<AppState>,
    Json(request): Json<AssistantRequest>,
) -> Json<AssistantReply> {
    state.observability.record_assistant_request();
    Json(reply_for(&request.question))
}

struct TopicReply {
    topic: &'static str,
    keywords: &'static [&'static str],
    answer: &'static str,
}

const TOPIC_REPLIES: &[TopicReply] = &[
    TopicReply {
        topic: "seismic",
        keywords: &["earthquake", "seismic"],
        answer: "Earthquakes are monitored worldwide by the USGS. Most are harmless, but \
                 magnitude 6+ events near populated areas can be destructive. The map's seismic \
                 layer shows the past 24 hours of activity, sized and colored by magnitude.",
    },
    TopicReply {
        topic: "air-quality",
        keywords: &["pollution", "air quality", "pm2.5", "pm25"],
        answer: "Air pollution, especially fine particulate matter (PM2.5), is linked to \
                 respiratory and cardiovascular disease. Readings above 100 µg/m³ are unhealthy \
                 for everyone. The air quality layer shows the latest station measurements.",
    },
    TopicReply {
        topic: "forest-cover",
        keywords: &["deforestation", "forest"],
        answer: "Roughly 10 million hectares of forest are lost each year, driven largely by \
                 agriculture. The forest cover layer highlights current deforestation hotspots \
                 such as the Amazon and Congo basins.",
    },
    TopicReply {
        topic: "water-level",
        keywords: &["sea level", "ocean", "water"],
        answer: "Global sea levels are rising about 3.7 mm per year, while many inland lakes \
                 are shrinking due to warming and water diversion. The water level layer tracks \
                 changes at monitored sites against a 2020 baseline.",
    },
    TopicReply {
        topic: "climate",
        keywords: &["climate change", "global warming"],
        answer: "Earth has warmed about 1.2°C since pre-industrial times, intensifying \
                 wildfires, storms and droughts. Cutting fossil fuel use is the single most \
                 effective mitigation; the carbon calculator estimates your personal share.",
    },
];

const DEFAULT_REPLY: AssistantReply = AssistantReply {
    topic: "general",
    answer: "I can answer questions about earthquakes, air quality, deforestation, water \
             levels and climate change. Try asking about one of the map layers, or use the \
             carbon calculator to estimate your footprint.",
};

fn reply_for(question: &str) -> AssistantReply {
    let normalized = question.to_lowercase();
    TOPIC_REPLIES
        .iter()
        .find(|reply| {
            reply
                .keywords
                .iter()
                .any(|keyword| normalized.contains(keyword))
        })
        .map(|reply| AssistantReply {
            topic: reply.topic,
            answer: reply.answer,
        })
        .unwrap_or(DEFAULT_REPLY)
}

#[cfg(test)]
mod tests {
    use super::reply_for;

    #[test]
    fn keywords_are_matched_case_insensitively() {
        assert_eq!(reply_for("Was there an EARTHQUAKE today?").topic, "seismic");
        assert_eq!(reply_for("how bad is pm2.5 in delhi").topic, "air-quality");
        assert_eq!(reply_for("tell me about deforestation").topic, "forest-cover");
        assert_eq!(reply_for("is the sea level rising?").topic, "water-level");
        assert_eq!(reply_for("explain global warming").topic, "climate");
    }

    #[test]
    fn first_matching_topic_wins() {
        // Mentions both seismic and climate terms; topic order decides.
        assert_eq!(
            reply_for("do earthquakes get worse with climate change?").topic,
            "seismic"
        );
    }

    #[test]
    fn unknown_questions_get_the_general_reply() {
        assert_eq!(reply_for("what's for lunch?").topic, "general");
        assert_eq!(reply_for("").topic, "general");
    }
}
