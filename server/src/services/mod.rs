use bytes::Bytes;

pub mod air_poller;
pub mod eonet_poller;
pub mod quake_poller;

/// GET a feed URL and return the raw body, folding transport and HTTP-status
/// failures into one error string with a short body preview for the log.
pub(crate) async fn fetch_feed_bytes(
    client: &reqwest::Client,
    url: &str,
) -> Result<Bytes, String> {
    let resp = client
        .get(url)
        .send()
        .await
        .map_err(|e| format!("request failed: {e}"))?;
    let status = resp.status();
    let bytes = resp
        .bytes()
        .await
        .map_err(|e| format!("failed to read response body: {e}"))?;

    if !status.is_success() {
        return Err(format!(
            "upstream status {status}; body preview: {}",
            body_preview(&bytes)
        ));
    }

    Ok(bytes)
}

pub(crate) fn body_preview(bytes: &[u8]) -> String {
    String::from_utf8_lossy(bytes).chars().take(200).collect()
}
