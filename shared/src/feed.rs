use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// The three upstream feeds the server polls. SSE event names and route
/// segments are derived from [`FeedKind::as_str`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FeedKind {
    Quakes,
    Air,
    NaturalEvents,
}

impl FeedKind {
    pub const ALL: [FeedKind; 3] = [FeedKind::Quakes, FeedKind::Air, FeedKind::NaturalEvents];

    pub const fn as_str(&self) -> &'static str {
        match self {
            FeedKind::Quakes => "quakes",
            FeedKind::Air => "air",
            FeedKind::NaturalEvents => "natural-events",
        }
    }
}

/// Where a feed snapshot's records came from. Providers never dress up seed
/// or stale data as live; consumers decide whether to render it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FeedSource {
    /// Built-in sample records; nothing has been fetched yet.
    Seed,
    /// The most recent poll succeeded.
    Live,
    /// A poll has failed since the records were last refreshed.
    Stale,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeedStatus {
    pub source: FeedSource,
    pub last_updated: Option<DateTime<Utc>>,
    pub last_error: Option<String>,
}

impl FeedStatus {
    pub fn seed() -> Self {
        Self {
            source: FeedSource::Seed,
            last_updated: None,
            last_error: None,
        }
    }

    pub fn live(now: DateTime<Utc>) -> Self {
        Self {
            source: FeedSource::Live,
            last_updated: Some(now),
            last_error: None,
        }
    }

    /// Record a failed poll without touching `last_updated`: the records kept
    /// alongside are still whatever was last fetched (or seeded).
    pub fn degrade(&mut self, error: String) {
        if self.source == FeedSource::Live {
            self.source = FeedSource::Stale;
        }
        self.last_error = Some(error);
    }
}

/// Wire shape of one feed snapshot as served by the REST routes and SSE
/// stream: `{seq, status, records}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeedDocument<T> {
    pub seq: u64,
    pub status: FeedStatus,
    pub records: Vec<T>,
}
