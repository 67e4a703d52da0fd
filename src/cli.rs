// CLI argument definitions
use clap::{Parser, Subcommand};

#[derive(Parser)]
pub struct SharedOptions {
    /// 511.org API key, sent as the api_key query parameter on every upstream call
    #[arg(short = 'k', long = "api-key")]
    pub api_key: String,
    /// Stops to monitor, either bare stop ids "15726;15727" or route rows
    /// "6:15726:Downtown;43:15726:The Presidio"
    #[arg(short = 's', long = "stops")]
    pub stops: String,
    /// Retrieve the data from an alternate source. The source must deliver
    /// json-data that matches the 511 StopMonitoring API.
    #[arg(short = 'u', long = "api-url", default_value = muniboard::muni_data::API_URL_511)]
    pub api_url: String,
    /// Agency to request monitoring data for
    #[arg(long = "agency", default_value = "SF")]
    pub agency: String,
    /// Show at most this many upcoming departures per line or route row
    #[arg(short = 'n', long = "max-departures", default_value = "3")]
    pub max_departures: usize,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start a long-lived http server that fetches fresh departures per request
    Serve {
        #[command(flatten)]
        shared_options: SharedOptions,
        /// Host the webapp on this particular port
        #[arg(short = 'p', long = "port", default_value = "4500")]
        port: u16,
    },
}

#[derive(Parser)]
#[command(name = "muniboard")]
#[command(about = "Serve display-ready real-time departures for SF Muni stops")]
#[command(version = env!("CARGO_PKG_VERSION"))]
pub struct Muniboard {
    #[command(subcommand)]
    pub command: Commands,
}
