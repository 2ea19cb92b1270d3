use crate::granularity::Granularity;
use crate::model::traffic::{BucketedTraffic, TrafficTotals};
use crate::traffic::TrafficError;
use crate::traffic::normalize::{InterfaceSeries, TimePoint};
use crate::validation::{Payload, parse_timestamp};
use log::trace;
use serde_json::Value;
use time::OffsetDateTime;

/// Requested boundaries, both truncated to the granularity.
///
/// Without `stop` a single bucket starting at `start` is reported.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AggregationWindow {
    pub start: OffsetDateTime,
    pub stop: Option<OffsetDateTime>,
}

impl AggregationWindow {
    pub fn new(granularity: Granularity, start: OffsetDateTime, stop: Option<OffsetDateTime>) -> Self {
        Self {
            start: granularity.truncate(start),
            stop: stop.map(|stop| granularity.truncate(stop)),
        }
    }

    /// Read the window from an already validated payload.
    pub fn from_payload(payload: &Payload, granularity: Granularity) -> Result<Self, TrafficError> {
        let start = payload
            .get("startDate")
            .and_then(parse_timestamp)
            .ok_or(TrafficError::InvalidBoundary { field: "startDate" })?;

        let stop = match payload.get("stopDate") {
            None | Some(Value::Null) => None,
            Some(value) => Some(
                parse_timestamp(value).ok_or(TrafficError::InvalidBoundary { field: "stopDate" })?,
            ),
        };

        Ok(Self::new(granularity, start, stop))
    }
}

/// Sum the traffic of every interface into buckets labelled for `granularity`.
pub fn aggregate(
    interfaces: &[InterfaceSeries],
    granularity: Granularity,
    window: &AggregationWindow,
) -> BucketedTraffic {
    match window.stop {
        Some(stop) => aggregate_range(interfaces, granularity, window.start, stop),
        None => aggregate_single(interfaces, granularity, window.start),
    }
}

// [start, stop)
fn aggregate_range(
    interfaces: &[InterfaceSeries],
    granularity: Granularity,
    start: OffsetDateTime,
    stop: OffsetDateTime,
) -> BucketedTraffic {
    let mut buckets = BucketedTraffic::new();

    for interface in interfaces {
        let mut points: Vec<&TimePoint> = interface
            .points
            .iter()
            .filter(|point| {
                let bucket = granularity.truncate(point.at);
                bucket >= start && bucket < stop
            })
            .collect();

        points.sort_by_key(|point| point.at);
        trace!("{}: {} points in window", interface.name, points.len());

        for point in points {
            *buckets.entry(granularity.label(point.at)).or_default() += point.totals;
        }
    }

    buckets
}

fn aggregate_single(
    interfaces: &[InterfaceSeries],
    granularity: Granularity,
    start: OffsetDateTime,
) -> BucketedTraffic {
    let mut buckets = BucketedTraffic::new();
    let label = granularity.label(start);

    for interface in interfaces {
        let mut totals = TrafficTotals::default();
        for point in &interface.points {
            if granularity.truncate(point.at) == start {
                totals += point.totals;
            }
        }

        *buckets.entry(label.clone()).or_default() += totals;
    }

    buckets
}
