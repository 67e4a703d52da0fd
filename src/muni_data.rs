use crate::muni_siriformat::StopMonitoringResponse;
use anyhow::bail;
use futures::future::join_all;
use fxhash::FxHashMap;
use reqwest::{Client, StatusCode};
use tracing::{instrument, warn};

pub const API_URL_511: &str = "https://api.511.org/transit/StopMonitoring";

// 511 is known to prepend this to json bodies, but not consistently
const UTF8_BOM: &[u8] = b"\xef\xbb\xbf";

/// One entry per unique requested stop id; `None` marks a stop the upstream
/// could not answer for this round.
pub type RawPayloads = FxHashMap<String, Option<StopMonitoringResponse>>;

pub struct Config {
    api_key: String,
    agency: String,
    api_url: String,
    client: Client,
}

impl Config {
    pub fn new(api_key: String, agency: String, api_url: String, client: Client) -> Self {
        Self {
            api_key,
            agency,
            api_url,
            client,
        }
    }
}

#[instrument(name = "fetch_stop", skip(config))]
async fn fetch_stop(config: &Config, stop_id: &str) -> anyhow::Result<StopMonitoringResponse> {
    let response = config
        .client
        .get(config.api_url.as_str())
        .query(&[
            ("api_key", config.api_key.as_str()),
            ("agency", config.agency.as_str()),
            ("stopCode", stop_id),
            ("format", "json"),
        ])
        .header("Accept", "application/json")
        .send()
        .await?;

    match response.status() {
        StatusCode::OK => {
            let bytes = response.bytes().await?;
            let body: &[u8] = bytes.as_ref();
            let body = body.strip_prefix(UTF8_BOM).unwrap_or(body);
            Ok(serde_json::from_slice(body)?)
        }
        StatusCode::TOO_MANY_REQUESTS => bail!("rate limited (429)"),
        status => bail!("unexpected status {status}"),
    }
}

/// Fetches monitoring data for every unique stop id in `stop_ids`, one GET
/// per id, all in flight at once. A stop that times out, errors, or answers
/// with something unparseable ends up as `None` and never disturbs the rest.
pub async fn fetch_all(config: &Config, stop_ids: &[&str]) -> RawPayloads {
    let mut unique: Vec<&str> = Vec::new();
    for stop_id in stop_ids.iter().copied() {
        if !unique.contains(&stop_id) {
            unique.push(stop_id);
        }
    }

    let fetches = unique.into_iter().map(|stop_id| async move {
        match fetch_stop(config, stop_id).await {
            Ok(payload) => (stop_id.to_string(), Some(payload)),
            Err(reason) => {
                warn!("No data for stop {stop_id}: {reason:#}");
                (stop_id.to_string(), None)
            }
        }
    });

    join_all(fetches).await.into_iter().collect()
}
