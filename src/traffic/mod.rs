use crate::granularity::QueryProfile;
use crate::model::traffic::TrafficReport;
use crate::model::vnstat::{CollectorUnit, VnstatData};
use crate::validation::Payload;
use aggregate::{AggregationWindow, aggregate};
use normalize::normalize_interface;
use thiserror::Error;

pub mod aggregate;
pub mod normalize;

#[derive(Debug, Error)]
pub enum TrafficError {
    #[error(
        "interface `{interface}` has an invalid {unit} record (id {id}, {year}-{month:?}-{day:?}): {source}"
    )]
    InvalidRecordDate {
        interface: String,
        unit: CollectorUnit,
        id: u32,
        year: i32,
        month: Option<u8>,
        day: Option<u8>,
        #[source]
        source: time::error::ComponentRange,
    },

    #[error("`{field}` is not a valid date")]
    InvalidBoundary { field: &'static str },
}

/// Turn a validated payload and a vnstat document into the bucketed report.
pub fn build_report(
    profile: &QueryProfile,
    payload: &Payload,
    data: &VnstatData,
) -> Result<TrafficReport, TrafficError> {
    let granularity = profile.granularity;
    let window = AggregationWindow::from_payload(payload, granularity)?;
    let unit = granularity.collector_unit();

    let series = data
        .interfaces
        .iter()
        .map(|interface| normalize_interface(interface, unit))
        .collect::<Result<Vec<_>, _>>()?;

    Ok(TrafficReport {
        traffic: aggregate(&series, granularity, &window),
        precision: granularity.precision().to_string(),
        start_date: granularity.label(window.start),
        stop_date: window.stop.map(|stop| granularity.label(stop)),
    })
}
