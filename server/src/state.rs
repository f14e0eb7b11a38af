use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use bytes::Bytes;
use chrono::{DateTime, Utc};
use dashmap::DashMap;
use serde::Serialize;
use terrawatch_shared::air::seed_air_quality;
use terrawatch_shared::natural_event::seed_natural_events;
use terrawatch_shared::{
    AirQualityReading, FeedKind, FeedSource, FeedStatus, NaturalEvent, SeismicEvent,
};
use tokio::sync::{RwLock, broadcast};
use tracing::warn;

use crate::config::{
    seed_feeds_enabled, sse_broadcast_buffer, upstream_connect_timeout, upstream_http_timeout,
};

/// Pre-serialized SSE event — serialized once by the poller, shared by all
/// clients via Arc.
#[derive(Debug, Clone)]
pub struct FeedBroadcast {
    pub kind: FeedKind,
    pub seq: u64,
    pub json: Arc<Bytes>,
}

#[derive(Debug, Clone)]
struct FeedCell<T> {
    seq: u64,
    status: FeedStatus,
    records: Vec<T>,
    document_json: Arc<Bytes>,
}

/// One upstream feed's live snapshot plus its pre-serialized wire document.
#[derive(Debug, Clone)]
pub struct Feed<T> {
    pub kind: FeedKind,
    cell: Arc<RwLock<FeedCell<T>>>,
}

#[derive(Serialize)]
struct FeedDocumentRef<'a, T> {
    seq: u64,
    status: &'a FeedStatus,
    records: &'a [T],
}

fn serialize_document<T: Serialize>(seq: u64, status: &FeedStatus, records: &[T]) -> Option<Bytes> {
    match serde_json::to_vec(&FeedDocumentRef { seq, status, records }) {
        Ok(json) => Some(Bytes::from(json)),
        Err(e) => {
            warn!("failed to serialize feed document: {e}");
            None
        }
    }
}

impl<T: Serialize + PartialEq> Feed<T> {
    pub fn new(kind: FeedKind, records: Vec<T>) -> Self {
        let status = FeedStatus::seed();
        let document_json = serialize_document(0, &status, &records)
            .unwrap_or_else(|| Bytes::from_static(br#"{"seq":0,"status":null,"records":[]}"#));
        Self {
            kind,
            cell: Arc::new(RwLock::new(FeedCell {
                seq: 0,
                status,
                records,
                document_json: Arc::new(document_json),
            })),
        }
    }

    pub async fn status(&self) -> FeedStatus {
        self.cell.read().await.status.clone()
    }

    pub async fn record_count(&self) -> usize {
        self.cell.read().await.records.len()
    }

    /// `(seq, pre-serialized document)` for the REST and SSE paths. The Arc
    /// clone is an O(1) refcount bump, not a payload copy.
    pub async fn document(&self) -> (u64, Arc<Bytes>) {
        let cell = self.cell.read().await;
        (cell.seq, Arc::clone(&cell.document_json))
    }

    /// Store a successful poll. An unchanged record set is a no-op tick, so
    /// the stored document (and its ETag) keeps identifying the same bytes;
    /// changed sets take the next global sequence and fan the new document
    /// out to SSE subscribers.
    pub async fn publish(
        &self,
        next_seq: &AtomicU64,
        event_tx: &broadcast::Sender<FeedBroadcast>,
        records: Vec<T>,
    ) {
        let mut cell = self.cell.write().await;

        if cell.records == records && cell.status.source == FeedSource::Live {
            return;
        }

        let status = FeedStatus::live(Utc::now());

        // All three pollers advance the same counter; fetch_add keeps seqs
        // unique under concurrent publishes. A serialization failure below
        // leaves a gap in the sequence, which consumers tolerate.
        let seq = next_seq.fetch_add(1, Ordering::Relaxed) + 1;

        let Some(json) = serialize_document(seq, &status, &records) else {
            return;
        };
        let json = Arc::new(json);

        cell.seq = seq;
        cell.status = status;
        cell.records = records;
        cell.document_json = Arc::clone(&json);
        drop(cell);

        let _ = event_tx.send(FeedBroadcast {
            kind: self.kind,
            seq,
            json,
        });
    }

    /// Record a failed poll: keep the current records, surface the error in
    /// the status, downgrade `Live` to `Stale`. Never fabricates data.
    pub async fn degrade(&self, error: String) {
        let mut cell = self.cell.write().await;
        cell.status.degrade(error);
        if let Some(json) = serialize_document(cell.seq, &cell.status, &cell.records) {
            cell.document_json = Arc::new(json);
        }
    }
}

/// On-demand USGS detail document, cached verbatim.
#[derive(Debug, Clone)]
pub struct CachedDetail {
    pub data: String,
    pub fetched_at: DateTime<Utc>,
}

#[derive(Clone)]
pub struct AppState {
    pub quakes: Feed<SeismicEvent>,
    pub air: Feed<AirQualityReading>,
    pub natural_events: Feed<NaturalEvent>,
    pub next_seq: Arc<AtomicU64>,
    pub event_tx: broadcast::Sender<FeedBroadcast>,
    pub quake_detail_cache: Arc<DashMap<String, CachedDetail>>,
    pub http_client: reqwest::Client,
    pub seed_feeds: bool,
    pub observability: Arc<ObservabilityCounters>,
}

impl AppState {
    pub fn new() -> Self {
        let (event_tx, _) = broadcast::channel(sse_broadcast_buffer());
        let request_timeout = upstream_http_timeout();
        let connect_timeout = upstream_connect_timeout();
        let http_client = reqwest::Client::builder()
            .user_agent("terrawatch/0.1")
            .timeout(request_timeout)
            .connect_timeout(connect_timeout)
            .build()
            .or_else(|e| {
                warn!(
                    error = %e,
                    "failed to build configured HTTP client, retrying without custom user-agent"
                );
                reqwest::Client::builder()
                    .timeout(request_timeout)
                    .connect_timeout(connect_timeout)
                    .build()
            })
            .unwrap_or_else(|e| {
                panic!("failed to build timeout-configured HTTP client: {e}");
            });

        let seed_feeds = seed_feeds_enabled();
        let now = Utc::now().to_rfc3339();
        let (air_records, event_records) = if seed_feeds {
            (seed_air_quality(&now), seed_natural_events(&now))
        } else {
            (Vec::new(), Vec::new())
        };

        Self {
            // The seismic feed has no seed dataset; it starts empty either way.
            quakes: Feed::new(FeedKind::Quakes, Vec::new()),
            air: Feed::new(FeedKind::Air, air_records),
            natural_events: Feed::new(FeedKind::NaturalEvents, event_records),
            next_seq: Arc::new(AtomicU64::new(0)),
            event_tx,
            quake_detail_cache: Arc::new(DashMap::new()),
            http_client,
            seed_feeds,
            observability: Arc::new(ObservabilityCounters::default()),
        }
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, Default)]
pub struct ObservabilityCounters {
    feed_requests_total: AtomicU64,
    quake_poll_failures_total: AtomicU64,
    air_poll_failures_total: AtomicU64,
    eonet_poll_failures_total: AtomicU64,
    detail_requests_total: AtomicU64,
    detail_cache_hits_total: AtomicU64,
    detail_cache_misses_total: AtomicU64,
    detail_upstream_errors_total: AtomicU64,
    carbon_estimates_total: AtomicU64,
    assistant_requests_total: AtomicU64,
}

#[derive(Debug, Clone, Copy)]
pub struct ObservabilitySnapshot {
    pub feed_requests_total: u64,
    pub quake_poll_failures_total: u64,
    pub air_poll_failures_total: u64,
    pub eonet_poll_failures_total: u64,
    pub detail_requests_total: u64,
    pub detail_cache_hits_total: u64,
    pub detail_cache_misses_total: u64,
    pub detail_upstream_errors_total: u64,
    pub carbon_estimates_total: u64,
    pub assistant_requests_total: u64,
}

impl ObservabilityCounters {
    pub fn snapshot(&self) -> ObservabilitySnapshot {
        ObservabilitySnapshot {
            feed_requests_total: self.feed_requests_total.load(Ordering::Relaxed),
            quake_poll_failures_total: self.quake_poll_failures_total.load(Ordering::Relaxed),
            air_poll_failures_total: self.air_poll_failures_total.load(Ordering::Relaxed),
            eonet_poll_failures_total: self.eonet_poll_failures_total.load(Ordering::Relaxed),
            detail_requests_total: self.detail_requests_total.load(Ordering::Relaxed),
            detail_cache_hits_total: self.detail_cache_hits_total.load(Ordering::Relaxed),
            detail_cache_misses_total: self.detail_cache_misses_total.load(Ordering::Relaxed),
            detail_upstream_errors_total: self.detail_upstream_errors_total.load(Ordering::Relaxed),
            carbon_estimates_total: self.carbon_estimates_total.load(Ordering::Relaxed),
            assistant_requests_total: self.assistant_requests_total.load(Ordering::Relaxed),
        }
    }

    pub fn record_feed_request(&self) {
        self.feed_requests_total.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_poll_failure(&self, kind: FeedKind) {
        let counter = match kind {
            FeedKind::Quakes => &self.quake_poll_failures_total,
            FeedKind::Air => &self.air_poll_failures_total,
            FeedKind::NaturalEvents => &self.eonet_poll_failures_total,
        };
        counter.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_detail_request(&self) {
        self.detail_requests_total.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_detail_cache_hit(&self) {
        self.detail_cache_hits_total.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_detail_cache_miss(&self) {
        self.detail_cache_misses_total.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_detail_upstream_error(&self) {
        self.detail_upstream_errors_total.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_carbon_estimate(&self) {
        self.carbon_estimates_total.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_assistant_request(&self) {
        self.assistant_requests_total.fetch_add(1, Ordering::Relaxed);
    }
}
