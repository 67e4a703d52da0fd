// Parsing of the `;`-separated stops configuration string
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("stop configuration is empty or not set")]
    Empty,
    #[error("invalid stop entry '{0}': expected format route:stop_id:direction_label")]
    WrongShape(String),
    #[error("{field} cannot be blank in '{entry}'")]
    BlankField { field: &'static str, entry: String },
    #[error("stop id '{0}' must be numeric")]
    NotNumeric(String),
}

/// One configured route row: filter departures at `stop_id` down to `route`,
/// displayed under the free-text `direction_label`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StopRoute {
    pub route: String,
    pub stop_id: String,
    pub direction_label: String,
}

/// The two configuration shapes the board understands. Bare numeric entries
/// ("15726;15727") monitor whole stops, colon-separated triples
/// ("6:15726:Downtown") monitor a single route at a stop.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StopConfig {
    Stops(Vec<String>),
    Routes(Vec<StopRoute>),
}

impl StopConfig {
    /// Parses the stops string once at startup. The presence of a `:` in any
    /// entry selects the route-row format for the whole string.
    pub fn parse(raw: &str) -> Result<StopConfig, ConfigError> {
        if raw.trim().is_empty() {
            return Err(ConfigError::Empty);
        }
        let entries: Vec<&str> = raw.trim().split(';').map(str::trim).collect();
        if entries.iter().any(|entry| entry.contains(':')) {
            parse_routes(entries)
        } else {
            parse_stops(entries)
        }
    }

    /// Stop ids in configured order. Route rows may repeat an id; the fetch
    /// layer dedups before talking to the upstream API.
    pub fn stop_ids(&self) -> Vec<&str> {
        match self {
            StopConfig::Stops(ids) => ids.iter().map(String::as_str).collect(),
            StopConfig::Routes(rows) => rows.iter().map(|row| row.stop_id.as_str()).collect(),
        }
    }
}

fn numeric(entry: &str) -> bool {
    !entry.is_empty() && entry.bytes().all(|b| b.is_ascii_digit())
}

fn parse_stops(entries: Vec<&str>) -> Result<StopConfig, ConfigError> {
    let mut stop_ids: Vec<String> = Vec::new();
    // Stray semicolons produce blank entries, those are fine to skip
    for entry in entries.into_iter().filter(|entry| !entry.is_empty()) {
        if !numeric(entry) {
            return Err(ConfigError::NotNumeric(entry.to_string()));
        }
        if !stop_ids.iter().any(|seen| seen == entry) {
            stop_ids.push(entry.to_string());
        }
    }
    if stop_ids.is_empty() {
        Err(ConfigError::Empty)
    } else {
        Ok(StopConfig::Stops(stop_ids))
    }
}

fn parse_routes(mut entries: Vec<&str>) -> Result<StopConfig, ConfigError> {
    // A trailing semicolon is tolerated, anything blank in the middle is not
    while entries.last().is_some_and(|entry| entry.is_empty()) {
        entries.pop();
    }

    let mut routes = Vec::with_capacity(entries.len());
    for entry in entries {
        let fields: Vec<&str> = entry.split(':').map(str::trim).collect();
        let [route, stop_id, direction_label] = fields.as_slice() else {
            return Err(ConfigError::WrongShape(entry.to_string()));
        };
        for (field, value) in [
            ("Route", route),
            ("Stop ID", stop_id),
            ("Direction label", direction_label),
        ] {
            if value.is_empty() {
                return Err(ConfigError::BlankField {
                    field,
                    entry: entry.to_string(),
                });
            }
        }
        if !numeric(stop_id) {
            return Err(ConfigError::NotNumeric(stop_id.to_string()));
        }
        // Duplicate triples are kept, each one is its own display row
        routes.push(StopRoute {
            route: route.to_string(),
            stop_id: stop_id.to_string(),
            direction_label: direction_label.to_string(),
        });
    }
    Ok(StopConfig::Routes(routes))
}
