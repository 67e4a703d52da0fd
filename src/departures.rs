use crate::muni_data::RawPayloads;
use crate::muni_siriformat::MonitoredStopVisit;
use crate::stop_config::{StopConfig, StopRoute};
use chrono::{DateTime, FixedOffset, Utc};
use chrono_tz::America::Los_Angeles;
use serde::Serialize;

const CLOCK_FORMAT: &str = "%-I:%M %p";

#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
pub struct Departure {
    pub minutes: i64,
    pub time: String,
}

#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
pub struct Line {
    pub line: String,
    pub name: String,
    pub destination: String,
    pub departures: Vec<Departure>,
}

#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
pub struct StopDepartures {
    pub stop_name: String,
    pub lines: Vec<Line>,
}

#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
pub struct RouteRow {
    pub route: String,
    pub direction_label: String,
    pub departures: Vec<Departure>,
}

/// The display-ready board, shaped by whichever configuration format is
/// active. Serializes externally tagged, so the json body carries either a
/// `stops` or a `routes` key.
#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Board {
    Stops(Vec<StopDepartures>),
    Routes(Vec<RouteRow>),
}

#[derive(Serialize, Debug)]
pub struct DeparturesResponse {
    #[serde(flatten)]
    pub board: Board,
    pub updated_at: String,
}

impl DeparturesResponse {
    pub fn new(board: Board, now: DateTime<Utc>) -> Self {
        let updated_at = now.with_timezone(&Los_Angeles).format(CLOCK_FORMAT).to_string();
        Self { board, updated_at }
    }
}

/// Turns the raw per-stop payloads into the board. Pure function of its
/// inputs and `now`: no I/O, and every configured stop or route row appears
/// in the output even when its payload is absent.
pub fn format(
    raw: &RawPayloads,
    config: &StopConfig,
    now: DateTime<Utc>,
    max_per_group: usize,
) -> Board {
    match config {
        StopConfig::Stops(ids) => Board::Stops(
            ids.iter()
                .map(|stop_id| stop_departures(raw, stop_id, now, max_per_group))
                .collect(),
        ),
        StopConfig::Routes(rows) => Board::Routes(
            rows.iter()
                .map(|row| route_row(raw, row, now, max_per_group))
                .collect(),
        ),
    }
}

fn visits<'a>(raw: &'a RawPayloads, stop_id: &str) -> &'a [MonitoredStopVisit] {
    raw.get(stop_id)
        .and_then(|payload| payload.as_ref())
        .and_then(|payload| payload.service_delivery.as_ref())
        .and_then(|delivery| delivery.stop_monitoring_delivery.as_ref())
        .map(|monitoring| monitoring.monitored_stop_visit.as_slice())
        .unwrap_or_default()
}

fn departure_instant(visit: &MonitoredStopVisit) -> Option<DateTime<FixedOffset>> {
    let call = visit.monitored_vehicle_journey.as_ref()?.monitored_call.as_ref()?;
    let raw = call
        .expected_departure_time
        .as_deref()
        .or(call.expected_arrival_time.as_deref())?;
    DateTime::parse_from_rfc3339(raw).ok()
}

/// Countdown for a single visit, or None when the visit has no usable
/// timestamp or already departed. Rounds half away from zero, like the
/// display the upstream agency runs itself.
fn departure(visit: &MonitoredStopVisit, now: DateTime<Utc>) -> Option<Departure> {
    let instant = departure_instant(visit)?;
    let seconds = instant.signed_duration_since(now).num_seconds() as f64;
    let minutes = (seconds / 60.0).round() as i64;
    if minutes < 0 {
        return None;
    }
    Some(Departure {
        minutes,
        time: instant.with_timezone(&Los_Angeles).format(CLOCK_FORMAT).to_string(),
    })
}

fn stop_departures(
    raw: &RawPayloads,
    stop_id: &str,
    now: DateTime<Utc>,
    max_per_group: usize,
) -> StopDepartures {
    let visits = visits(raw, stop_id);
    let stop_name = visits
        .first()
        .and_then(|visit| visit.monitored_vehicle_journey.as_ref())
        .and_then(|journey| journey.monitored_call.as_ref())
        .and_then(|call| call.stop_point_name.clone())
        .unwrap_or_else(|| format!("Stop {stop_id}"));

    let mut lines: Vec<Line> = Vec::new();
    for visit in visits {
        let Some(journey) = visit.monitored_vehicle_journey.as_ref() else {
            continue;
        };
        let Some(line_ref) = journey.line_ref.as_deref() else {
            continue;
        };
        let Some(departure) = departure(visit, now) else {
            continue;
        };
        // The first surviving visit for a line fixes its display fields
        let index = match lines.iter().position(|line| line.line == line_ref) {
            Some(index) => index,
            None => {
                lines.push(Line {
                    line: line_ref.to_string(),
                    name: journey
                        .published_line_name
                        .clone()
                        .unwrap_or_else(|| line_ref.to_string()),
                    destination: journey
                        .destination_name
                        .clone()
                        .or_else(|| journey.destination_display.clone())
                        .unwrap_or_default(),
                    departures: Vec::new(),
                });
                lines.len() - 1
            }
        };
        lines[index].departures.push(departure);
    }

    for line in &mut lines {
        line.departures.sort_by_key(|departure| departure.minutes);
        line.departures.truncate(max_per_group);
    }
    lines.sort_by_key(|line| {
        line.departures
            .first()
            .map(|departure| departure.minutes)
            .unwrap_or(i64::MAX)
    });

    StopDepartures { stop_name, lines }
}

fn route_row(
    raw: &RawPayloads,
    row: &StopRoute,
    now: DateTime<Utc>,
    max_per_group: usize,
) -> RouteRow {
    let mut departures: Vec<Departure> = visits(raw, &row.stop_id)
        .iter()
        .filter(|visit| {
            visit
                .monitored_vehicle_journey
                .as_ref()
                .and_then(|journey| journey.line_ref.as_deref())
                == Some(row.route.as_str())
        })
        .filter_map(|visit| departure(visit, now))
        .collect();
    departures.sort_by_key(|departure| departure.minutes);
    departures.truncate(max_per_group);

    RouteRow {
        route: row.route.clone(),
        direction_label: row.direction_label.clone(),
        departures,
    }
}
