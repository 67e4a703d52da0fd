// The subset of the 511.org SIRI StopMonitoring json response that we know
// about. The upstream marks almost everything optional and omits fields
// freely, so every leaf is an Option and the visit list defaults to empty.
// Timestamps stay as raw strings here: 511 occasionally ships garbage in a
// single visit, and parsing per visit in the formatter lets us drop that one
// visit instead of the whole stop.

use serde::Deserialize;

#[derive(Deserialize, Debug)]
#[serde(rename_all = "PascalCase")]
pub struct StopMonitoringResponse {
    pub service_delivery: Option<ServiceDelivery>,
}

#[derive(Deserialize, Debug)]
#[serde(rename_all = "PascalCase")]
pub struct ServiceDelivery {
    pub response_timestamp: Option<String>,
    /// "SF" for the Muni feed
    pub producer_ref: Option<String>,
    pub status: Option<bool>,
    pub stop_monitoring_delivery: Option<StopMonitoringDelivery>,
}

#[derive(Deserialize, Debug)]
#[serde(rename_all = "PascalCase")]
pub struct StopMonitoringDelivery {
    #[serde(rename = "version")]
    pub version: Option<String>,
    pub response_timestamp: Option<String>,
    pub status: Option<bool>,
    #[serde(default)]
    pub monitored_stop_visit: Vec<MonitoredStopVisit>,
}

#[derive(Deserialize, Debug)]
#[serde(rename_all = "PascalCase")]
pub struct MonitoredStopVisit {
    pub recorded_at_time: Option<String>,
    /// Echoes the stopCode the visit was requested for
    pub monitoring_ref: Option<String>,
    pub monitored_vehicle_journey: Option<MonitoredVehicleJourney>,
}

#[derive(Deserialize, Debug)]
#[serde(rename_all = "PascalCase")]
pub struct MonitoredVehicleJourney {
    pub line_ref: Option<String>,
    pub operator_ref: Option<String>,
    pub framed_vehicle_journey_ref: Option<FramedVehicleJourneyRef>,
    /// Display name for the line, eg. "6-Haight/Parnassus". Falls back to
    /// line_ref when missing.
    pub published_line_name: Option<String>,
    pub origin_ref: Option<String>,
    pub origin_name: Option<String>,
    pub destination_ref: Option<String>,
    pub destination_name: Option<String>,
    pub destination_display: Option<String>,
    pub direction_ref: Option<String>,
    pub monitored: Option<bool>,
    /// Lat/long arrive as strings in this feed
    pub vehicle_location: Option<VehicleLocation>,
    pub occupancy: Option<String>,
    pub vehicle_ref: Option<String>,
    pub monitored_call: Option<MonitoredCall>,
}

#[derive(Deserialize, Debug)]
#[serde(rename_all = "PascalCase")]
pub struct FramedVehicleJourneyRef {
    pub data_frame_ref: Option<String>,
    pub dated_vehicle_journey_ref: Option<String>,
}

#[derive(Deserialize, Debug)]
#[serde(rename_all = "PascalCase")]
pub struct VehicleLocation {
    pub longitude: Option<String>,
    pub latitude: Option<String>,
}

#[derive(Deserialize, Debug)]
#[serde(rename_all = "PascalCase")]
pub struct MonitoredCall {
    pub stop_point_ref: Option<String>,
    pub stop_point_name: Option<String>,
    pub vehicle_at_stop: Option<bool>,
    /// Headsign text; 511 puts this on the call, the journey, or both
    pub destination_display: Option<String>,
    pub aimed_arrival_time: Option<String>,
    pub expected_arrival_time: Option<String>,
    pub aimed_departure_time: Option<String>,
    pub expected_departure_time: Option<String>,
}
