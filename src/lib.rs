pub mod departures;
pub mod muni_data;
pub mod muni_siriformat;
pub mod stop_config;
