use std::fmt::Write as _;
use std::sync::Arc;

use axum::Json;
use axum::body::Body;
use axum::extract::{Path, State};
use axum::http::{HeaderMap, HeaderValue, StatusCode, header};
use axum::response::{IntoResponse, Response};
use bytes::Bytes;
use chrono::Utc;
use terrawatch_shared::carbon::{CarbonEstimate, CarbonInputs, estimate};
use terrawatch_shared::site::{deforestation_hotspots, water_level_sites};
use terrawatch_shared::{FeedKind, FeedStatus};

use crate::config::{
    MAX_QUAKE_DETAIL_CACHE_ENTRIES, QUAKE_DETAIL_CACHE_TTL_SECS, USGS_DETAIL_URL,
};
use crate::state::{AppState, CachedDetail, Feed, ObservabilitySnapshot};

const PROMETHEUS_CONTENT_TYPE: &str = "text/plain; version=0.0.4; charset=utf-8";
const MAX_EVENT_ID_LEN: usize = 64;

pub async fn health(State(state): State<AppState>) -> Json<serde_json::Value> {
    let observability = state.observability.snapshot();
    Json(serde_json::json!({
        "status": "ok",
        "feeds": {
            "quakes": state.quakes.record_count().await,
            "air": state.air.record_count().await,
            "natural_events": state.natural_events.record_count().await,
        },
        "quake_detail_cache_size": state.quake_detail_cache.len(),
        "seed_feeds": state.seed_feeds,
        "observability": {
            "feed_requests_total": observability.feed_requests_total,
            "quake_poll_failures_total": observability.quake_poll_failures_total,
            "air_poll_failures_total": observability.air_poll_failures_total,
            "eonet_poll_failures_total": observability.eonet_poll_failures_total,
            "detail_requests_total": observability.detail_requests_total,
            "detail_cache_hits_total": observability.detail_cache_hits_total,
            "detail_cache_misses_total": observability.detail_cache_misses_total,
            "detail_upstream_errors_total": observability.detail_upstream_errors_total,
            "carbon_estimates_total": observability.carbon_estimates_total,
            "assistant_requests_total": observability.assistant_requests_total,
        }
    }))
}

/// Serve a feed's pre-serialized document — no record clone, no
/// re-serialization on the request path.
async fn get_feed_document<T: serde::Serialize + PartialEq>(
    state: &AppState,
    feed: &Feed<T>,
    headers: &HeaderMap,
) -> Response {
    state.observability.record_feed_request();
    let (seq, json): (u64, Arc<Bytes>) = feed.document().await;
    let etag = feed_etag(feed.kind, seq);

    if if_none_match_matches(headers, &etag) {
        return not_modified_response("public, max-age=5", Some(etag.as_str()));
    }

    json_bytes_response((*json).clone(), "public, max-age=5", Some(etag.as_str()))
}

pub async fn get_quakes(State(state): State<AppState>, headers: HeaderMap) -> Response {
    get_feed_document(&state, &state.quakes, &headers).await
}

pub async fn get_air(State(state): State<AppState>, headers: HeaderMap) -> Response {
    get_feed_document(&state, &state.air, &headers).await
}

pub async fn get_natural_events(State(state): State<AppState>, headers: HeaderMap) -> Response {
    get_feed_document(&state, &state.natural_events, &headers).await
}

#[derive(serde::Serialize)]
struct FeedStatusEntry {
    #[serde(flatten)]
    status: FeedStatus,
    records: usize,
    seq: u64,
}

pub async fn get_feed_status(State(state): State<AppState>) -> Json<serde_json::Value> {
    async fn entry<T: serde::Serialize + PartialEq>(feed: &Feed<T>) -> FeedStatusEntry {
        let (seq, _) = feed.document().await;
        FeedStatusEntry {
            status: feed.status().await,
            records: feed.record_count().await,
            seq,
        }
    }

    Json(serde_json::json!({
        "quakes": entry(&state.quakes).await,
        "air": entry(&state.air).await,
        "natural-events": entry(&state.natural_events).await,
    }))
}

/// Static monitoring sites for the two layers without a live feed.
pub async fn get_sites() -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "forest-cover": deforestation_hotspots(),
        "water-level": water_level_sites(),
    }))
}

pub async fn metrics(State(state): State<AppState>) -> impl IntoResponse {
    let quake_records = state.quakes.record_count().await;
    let air_records = state.air.record_count().await;
    let event_records = state.natural_events.record_count().await;
    let cache_size = state.quake_detail_cache.len();
    let observability = state.observability.snapshot();

    let body = render_prometheus_metrics(
        quake_records,
        air_records,
        event_records,
        cache_size,
        observability,
    );

    (
        [
            (header::CONTENT_TYPE, PROMETHEUS_CONTENT_TYPE),
            (header::CACHE_CONTROL, "no-store"),
        ],
        body,
    )
}

fn render_prometheus_metrics(
    quake_records: usize,
    air_records: usize,
    event_records: usize,
    cache_size: usize,
    observability: ObservabilitySnapshot,
) -> String {
    let mut body = String::new();

    let mut gauge = |name: &str, help: &str, value: usize| {
        let _ = writeln!(body, "# HELP {name} {help}");
        let _ = writeln!(body, "# TYPE {name} gauge");
        let _ = writeln!(body, "{name} {value}");
    };
    gauge(
        "terrawatch_quake_records",
        "Seismic events in the current feed snapshot.",
        quake_records,
    );
    gauge(
        "terrawatch_air_records",
        "Air quality readings in the current feed snapshot.",
        air_records,
    );
    gauge(
        "terrawatch_natural_event_records",
        "Natural events in the current feed snapshot.",
        event_records,
    );
    gauge(
        "terrawatch_quake_detail_cache_size",
        "Entries in the earthquake detail cache.",
        cache_size,
    );

    let counters: [(&str, &str, u64); 10] = [
        (
            "terrawatch_feed_requests_total",
            "Total feed snapshot API requests.",
            observability.feed_requests_total,
        ),
        (
            "terrawatch_quake_poll_failures_total",
            "Total failed USGS polls.",
            observability.quake_poll_failures_total,
        ),
        (
            "terrawatch_air_poll_failures_total",
            "Total failed OpenAQ polls.",
            observability.air_poll_failures_total,
        ),
        (
            "terrawatch_eonet_poll_failures_total",
            "Total failed EONET polls.",
            observability.eonet_poll_failures_total,
        ),
        (
            "terrawatch_detail_requests_total",
            "Total earthquake detail requests.",
            observability.detail_requests_total,
        ),
        (
            "terrawatch_detail_cache_hits_total",
            "Earthquake detail requests served from cache.",
            observability.detail_cache_hits_total,
        ),
        (
            "terrawatch_detail_cache_misses_total",
            "Earthquake detail requests fetched upstream.",
            observability.detail_cache_misses_total,
        ),
        (
            "terrawatch_detail_upstream_errors_total",
            "Upstream failures while serving earthquake details.",
            observability.detail_upstream_errors_total,
        ),
        (
            "terrawatch_carbon_estimates_total",
            "Total carbon footprint estimates computed.",
            observability.carbon_estimates_total,
        ),
        (
            "terrawatch_assistant_requests_total",
            "Total assistant questions answered.",
            observability.assistant_requests_total,
        ),
    ];
    for (name, help, value) in counters {
        let _ = writeln!(body, "# HELP {name} {help}");
        let _ = writeln!(body, "# TYPE {name} counter");
        let _ = writeln!(body, "{name} {value}");
    }

    body
}

/// Proxy the USGS per-event detail document, cached with a TTL so repeated
/// marker clicks do not hammer the upstream.
pub async fn get_quake_detail(
    State(state): State<AppState>,
    Path(raw_id): Path<String>,
) -> Result<Response, StatusCode> {
    state.observability.record_detail_request();
    let id = normalize_event_id(&raw_id)?.to_owned();

    if let Some(cached) = state.quake_detail_cache.get(&id) {
        let age = Utc::now()
            .signed_duration_since(cached.fetched_at)
            .num_seconds();
        if age < QUAKE_DETAIL_CACHE_TTL_SECS {
            state.observability.record_detail_cache_hit();
            return Ok(json_bytes_response(
                Bytes::from(cached.data.clone()),
                "public, max-age=300",
                None,
            ));
        }
    }

    state.observability.record_detail_cache_miss();
    let url = quake_detail_url(&id)?;
    let resp = state.http_client.get(url).send().await.map_err(|_| {
        state.observability.record_detail_upstream_error();
        StatusCode::BAD_GATEWAY
    })?;

    if !resp.status().is_success() {
        state.observability.record_detail_upstream_error();
        return Err(StatusCode::from_u16(resp.status().as_u16()).unwrap_or(StatusCode::BAD_GATEWAY));
    }

    let data = resp.text().await.map_err(|_| {
        state.observability.record_detail_upstream_error();
        StatusCode::BAD_GATEWAY
    })?;

    cache_detail_payload(&state, id, data.clone());

    Ok(json_bytes_response(
        Bytes::from(data),
        "public, max-age=300",
        None,
    ))
}

pub async fn carbon_estimate(
    State(state): State<AppState>,
    Json(inputs): Json<CarbonInputs>,
) -> Result<Json<CarbonEstimate>, StatusCode> {
    if !inputs.is_valid() {
        return Err(StatusCode::UNPROCESSABLE_ENTITY);
    }
    state.observability.record_carbon_estimate();
    Ok(Json(estimate(&inputs)))
}

fn normalize_event_id(id: &str) -> Result<&str, StatusCode> {
    let trimmed = id.trim();
    if trimmed.is_empty() || trimmed.len() > MAX_EVENT_ID_LEN {
        return Err(StatusCode::BAD_REQUEST);
    }

    if trimmed
        .chars()
        .any(|ch| ch.is_control() || matches!(ch, '/' | '\\' | '?' | '#'))
    {
        return Err(StatusCode::BAD_REQUEST);
    }

    Ok(trimmed)
}

fn quake_detail_url(event_id: &str) -> Result<reqwest::Url, StatusCode> {
    let mut url =
        reqwest::Url::parse(USGS_DETAIL_URL).map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)?;
    url.query_pairs_mut()
        .append_pair("format", "geojson")
        .append_pair("eventid", event_id);
    Ok(url)
}

fn cache_detail_payload(state: &AppState, id: String, data: String) {
    if !state.quake_detail_cache.contains_key(&id) {
        while state.quake_detail_cache.len() >= MAX_QUAKE_DETAIL_CACHE_ENTRIES {
            if !evict_oldest_detail_entry(state) {
                break;
            }
        }
    }

    state.quake_detail_cache.insert(
        id,
        CachedDetail {
            data,
            fetched_at: Utc::now(),
        },
    );
}

fn evict_oldest_detail_entry(state: &AppState) -> bool {
    let Some(oldest_id) = state
        .quake_detail_cache
        .iter()
        .min_by_key(|entry| entry.value().fetched_at)
        .map(|entry| entry.key().clone())
    else {
        return false;
    };
    state.quake_detail_cache.remove(&oldest_id).is_some()
}

fn feed_etag(kind: FeedKind, seq: u64) -> String {
    format!("\"{}-{seq}\"", kind.as_str())
}

fn json_bytes_response(body: Bytes, cache_control: &'static str, etag: Option<&str>) -> Response {
    let mut response = Response::new(Body::from(body));
    let headers = response.headers_mut();
    headers.insert(
        header::CONTENT_TYPE,
        HeaderValue::from_static("application/json"),
    );
    headers.insert(
        header::CACHE_CONTROL,
        HeaderValue::from_static(cache_control),
    );
    if let Some(etag) = etag
        && let Ok(etag_header) = HeaderValue::from_str(etag)
    {
        headers.insert(header::ETAG, etag_header);
    }
    response
}

fn not_modified_response(cache_control: &'static str, etag: Option<&str>) -> Response {
    let mut response = StatusCode::NOT_MODIFIED.into_response();
    let headers = response.headers_mut();
    headers.insert(
        header::CACHE_CONTROL,
        HeaderValue::from_static(cache_control),
    );
    if let Some(etag) = etag
        && let Ok(etag_header) = HeaderValue::from_str(etag)
    {
        headers.insert(header::ETAG, etag_header);
    }
    response
}

fn normalize_etag(candidate: &str) -> &str {
    candidate.strip_prefix("W/").unwrap_or(candidate).trim()
}

fn if_none_match_matches(headers: &HeaderMap, etag: &str) -> bool {
    let Some(value) = headers.get(header::IF_NONE_MATCH) else {
        return false;
    };
    let Ok(raw) = value.to_str() else {
        return false;
    };

    raw.split(',').any(|candidate| {
        let candidate = candidate.trim();
        candidate == "*" || normalize_etag(candidate) == normalize_etag(etag)
    })
}
