use std::time::Duration;

pub const USGS_ALL_DAY_URL: &str =
    "https://earthquake.usgs.gov/earthquakes/feed/v1.0/summary/all_day.geojson";
pub const USGS_DETAIL_URL: &str = "https://earthquake.usgs.gov/earthquakes/feed/v1.0/detail";
pub const OPENAQ_LATEST_URL: &str =
    "https://api.openaq.org/v2/latest?limit=100&order_by=lastUpdated&sort=desc";
pub const EONET_EVENTS_URL: &str = "https://eonet.gsfc.nasa.gov/api/v3/events?status=open&limit=50";

pub const QUAKE_POLL_INTERVAL_SECS: u64 = 60;
pub const AIR_POLL_INTERVAL_SECS: u64 = 60;
pub const EONET_POLL_INTERVAL_SECS: u64 = 300; // 5 minutes

pub const QUAKE_DETAIL_CACHE_TTL_SECS: i64 = 600; // 10 minutes
pub const MAX_QUAKE_DETAIL_CACHE_ENTRIES: usize = 64;

pub const SSE_KEEPALIVE_SECS: u64 = 15;
pub const DEFAULT_BROADCAST_BUFFER: usize = 64;
pub const DEFAULT_UPSTREAM_HTTP_TIMEOUT_SECS: u64 = 10;
pub const DEFAULT_UPSTREAM_CONNECT_TIMEOUT_SECS: u64 = 3;
pub const SERVER_PORT: u16 = 3000;

/// Whether the feeds start out populated with the built-in sample records
/// (marked `Seed`) before the first successful poll. On by default.
pub fn seed_feeds_enabled() -> bool {
    std::env::var("SEED_FEEDS")
        .or_else(|_| std::env::var("seed_feeds"))
        .map(|value| {
            let normalized = value.trim().to_ascii_lowercase();
            matches!(normalized.as_str(), "1" | "true" | "yes" | "on")
        })
        .unwrap_or(true)
}

pub fn sse_broadcast_buffer() -> usize {
    std::env::var("SSE_BROADCAST_BUFFER")
        .ok()
        .and_then(|value| value.parse::<usize>().ok())
        .filter(|value| *value > 0)
        .unwrap_or(DEFAULT_BROADCAST_BUFFER)
}

pub fn upstream_http_timeout() -> Duration {
    std::env::var("UPSTREAM_HTTP_TIMEOUT_SECS")
        .ok()
        .and_then(|value| value.parse::<u64>().ok())
        .filter(|value| *value > 0)
        .map(Duration::from_secs)
        .unwrap_or_else(|| Duration::from_secs(DEFAULT_UPSTREAM_HTTP_TIMEOUT_SECS))
}

pub fn upstream_connect_timeout() -> Duration {
    std::env::var("UPSTREAM_CONNECT_TIMEOUT_SECS")
        .ok()
        .and_then(|value| value.parse::<u64>().ok())
        .filter(|value| *value > 0)
        .map(Duration::from_secs)
        .unwrap_or_else(|| Duration::from_secs(DEFAULT_UPSTREAM_CONNECT_TIMEOUT_SECS))
}

pub fn quake_poll_interval() -> Duration {
    poll_interval("QUAKE_POLL_INTERVAL_SECS", QUAKE_POLL_INTERVAL_SECS)
}

pub fn air_poll_interval() -> Duration {
    poll_interval("AIR_POLL_INTERVAL_SECS", AIR_POLL_INTERVAL_SECS)
}

pub fn eonet_poll_interval() -> Duration {
    poll_interval("EONET_POLL_INTERVAL_SECS", EONET_POLL_INTERVAL_SECS)
}

fn poll_interval(var: &str, default_secs: u64) -> Duration {
    std::env::var(var)
        .ok()
        .and_then(|value| value.parse::<u64>().ok())
        .filter(|value| *value > 0)
        .map(Duration::from_secs)
        .unwrap_or_else(|| Duration::from_secs(default_secs))
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::{
        DEFAULT_BROADCAST_BUFFER, QUAKE_POLL_INTERVAL_SECS, quake_poll_interval,
        seed_feeds_enabled, sse_broadcast_buffer, upstream_http_timeout,
    };

    #[test]
    fn seed_feeds_defaults_on_and_parses_falsy_values() {
        temp_env::with_var_unset("SEED_FEEDS", || {
            assert!(seed_feeds_enabled());
        });
        temp_env::with_var("SEED_FEEDS", Some("off"), || {
            assert!(!seed_feeds_enabled());
        });
        temp_env::with_var("SEED_FEEDS", Some("TRUE"), || {
            assert!(seed_feeds_enabled());
        });
    }

    #[test]
    fn broadcast_buffer_rejects_invalid_overrides() {
        temp_env::with_var("SSE_BROADCAST_BUFFER", Some("0"), || {
            assert_eq!(sse_broadcast_buffer(), DEFAULT_BROADCAST_BUFFER);
        });
        temp_env::with_var("SSE_BROADCAST_BUFFER", Some("not-a-number"), || {
            assert_eq!(sse_broadcast_buffer(), DEFAULT_BROADCAST_BUFFER);
        });
        temp_env::with_var("SSE_BROADCAST_BUFFER", Some("128"), || {
            assert_eq!(sse_broadcast_buffer(), 128);
        });
    }

    #[test]
    fn poll_interval_and_timeout_overrides_parse() {
        temp_env::with_var("QUAKE_POLL_INTERVAL_SECS", Some("15"), || {
            assert_eq!(quake_poll_interval(), Duration::from_secs(15));
        });
        temp_env::with_var_unset("QUAKE_POLL_INTERVAL_SECS", || {
            assert_eq!(
                quake_poll_interval(),
                Duration::from_secs(QUAKE_POLL_INTERVAL_SECS)
            );
        });
        temp_env::with_var("UPSTREAM_HTTP_TIMEOUT_SECS", Some("2"), || {
            assert_eq!(upstream_http_timeout(), Duration::from_secs(2));
        });
    }
}
