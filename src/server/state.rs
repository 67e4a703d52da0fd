// Application state: immutable configuration shared by all requests
use crate::cli::SharedOptions;
use muniboard::muni_data;
use muniboard::stop_config::StopConfig;
use reqwest::ClientBuilder;
use std::sync::Arc;
use std::time;

// Connect and read deadline for each upstream call
const UPSTREAM_TIMEOUT: time::Duration = time::Duration::from_secs(10);

#[derive(Clone)]
pub struct AppState {
    pub stops: Arc<StopConfig>,
    pub muni: Arc<muni_data::Config>,
    pub max_departures: usize,
}

/// Parses the stops configuration and builds the upstream client, once, at
/// startup. A broken stops string has no safe fallback, so the error aborts
/// the process before the server binds.
pub fn init(options: SharedOptions) -> anyhow::Result<AppState> {
    let stops = StopConfig::parse(options.stops.as_str())?;

    let client = ClientBuilder::default()
        .connect_timeout(UPSTREAM_TIMEOUT)
        .timeout(UPSTREAM_TIMEOUT)
        .build()?;
    let muni = muni_data::Config::new(options.api_key, options.agency, options.api_url, client);

    Ok(AppState {
        stops: Arc::new(stops),
        muni: Arc::new(muni),
        max_departures: options.max_departures,
    })
}
