use serde::Serialize;
use std::collections::BTreeMap;
use std::ops::AddAssign;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct TrafficTotals {
    pub rx: u64,
    pub tx: u64,
}

impl TrafficTotals {
    pub fn new(rx: u64, tx: u64) -> Self {
        Self { rx, tx }
    }
}

impl AddAssign for TrafficTotals {
    fn add_assign(&mut self, other: Self) {
        self.rx = self.rx.saturating_add(other.rx);
        self.tx = self.tx.saturating_add(other.tx);
    }
}

/// Bucket label to the traffic summed across interfaces.
pub type BucketedTraffic = BTreeMap<String, TrafficTotals>;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TrafficReport {
    pub traffic: BucketedTraffic,
    pub precision: String,
    pub start_date: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stop_date: Option<String>,
}
