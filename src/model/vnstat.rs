use serde::{Deserialize, Serialize};
use std::fmt;

/// The series vnstat is asked for, and the key it is stored under.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CollectorUnit {
    Months,
    Days,
    Hours,
}

impl CollectorUnit {
    /// Query mode passed to `vnstat --json`.
    pub fn mode(&self) -> &'static str {
        match self {
            CollectorUnit::Months => "m",
            CollectorUnit::Days => "d",
            CollectorUnit::Hours => "h",
        }
    }
}

impl fmt::Display for CollectorUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            CollectorUnit::Months => "months",
            CollectorUnit::Days => "days",
            CollectorUnit::Hours => "hours",
        })
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VnstatData {
    pub interfaces: Vec<Interface>,
    #[serde(default)]
    pub jsonversion: String,
    #[serde(default)]
    pub vnstatversion: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Interface {
    #[serde(alias = "id")]
    pub name: String,
    pub traffic: Traffic,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Traffic {
    #[serde(default, alias = "month")]
    pub months: Vec<RawTrafficRecord>,
    #[serde(default, alias = "day")]
    pub days: Vec<RawTrafficRecord>,
    #[serde(default, alias = "hour")]
    pub hours: Vec<RawTrafficRecord>,
}

impl Traffic {
    pub fn records(&self, unit: CollectorUnit) -> &[RawTrafficRecord] {
        match unit {
            CollectorUnit::Months => &self.months,
            CollectorUnit::Days => &self.days,
            CollectorUnit::Hours => &self.hours,
        }
    }
}

/// One bucket of one interface as reported by vnstat.
///
/// Legacy documents (jsonversion 1) put the hour of day in `id`. Current ones
/// use `id` as a row id and carry the hour in `time`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawTrafficRecord {
    #[serde(default)]
    pub id: u32,
    pub date: RecordDate,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time: Option<RecordTime>,
    pub rx: u64,
    pub tx: u64,
}

impl RawTrafficRecord {
    /// Hour of day of an hourly record.
    pub fn hour(&self) -> u32 {
        match &self.time {
            Some(time) => u32::from(time.hour),
            None => self.id,
        }
    }
}

/// Calendar date with a 1-based month, as vnstat writes it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecordDate {
    pub year: i32,
    pub month: Option<u8>,
    pub day: Option<u8>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecordTime {
    pub hour: u8,
    #[serde(default)]
    pub minute: u8,
}

#[cfg(test)]
mod tests {
    use super::*;

    const VNSTAT_V1: &str = r#"{
        "vnstatversion": "1.18",
        "jsonversion": "1",
        "interfaces": [{
            "id": "eth0",
            "nick": "eth0",
            "created": { "date": { "year": 2018, "month": 2, "day": 1 } },
            "traffic": {
                "total": { "rx": 10, "tx": 20 },
                "hours": [
                    { "id": 0, "date": { "year": 2024, "month": 3, "day": 1 }, "rx": 1, "tx": 2 },
                    { "id": 23, "date": { "year": 2024, "month": 2, "day": 29 }, "rx": 3, "tx": 4 }
                ]
            }
        }]
    }"#;

    const VNSTAT_V2: &str = r#"{
        "vnstatversion": "2.9",
        "jsonversion": "2",
        "interfaces": [{
            "name": "enp3s0",
            "alias": "",
            "traffic": {
                "total": { "rx": 10, "tx": 20 },
                "month": [
                    { "id": 7, "date": { "year": 2024, "month": 1 }, "timestamp": 1704067200, "rx": 5, "tx": 6 }
                ],
                "hour": [
                    { "id": 4711, "date": { "year": 2024, "month": 3, "day": 1 }, "time": { "hour": 5, "minute": 0 }, "timestamp": 1709269200, "rx": 7, "tx": 8 }
                ]
            }
        }]
    }"#;

    #[test]
    fn reads_legacy_documents() {
        let data: VnstatData = serde_json::from_str(VNSTAT_V1).unwrap();
        let interface = &data.interfaces[0];

        assert_eq!(interface.name, "eth0");
        assert!(interface.traffic.records(CollectorUnit::Months).is_empty());

        let hours = interface.traffic.records(CollectorUnit::Hours);
        assert_eq!(hours.len(), 2);
        assert_eq!(hours[1].id, 23);
        assert_eq!(hours[1].date.day, Some(29));
    }

    #[test]
    fn reads_current_documents() {
        let data: VnstatData = serde_json::from_str(VNSTAT_V2).unwrap();
        let interface = &data.interfaces[0];

        assert_eq!(interface.name, "enp3s0");
        let months = interface.traffic.records(CollectorUnit::Months);
        assert_eq!(months.len(), 1);
        assert_eq!(months[0].date.month, Some(1));
        assert_eq!(months[0].date.day, None);

        let hours = interface.traffic.records(CollectorUnit::Hours);
        assert_eq!(hours[0].id, 4711);
        assert_eq!(hours[0].hour(), 5);
    }

    #[test]
    fn legacy_hours_come_from_the_id() {
        let data: VnstatData = serde_json::from_str(VNSTAT_V1).unwrap();
        let hours = data.interfaces[0].traffic.records(CollectorUnit::Hours);

        assert!(hours[1].time.is_none());
        assert_eq!(hours[1].hour(), 23);
    }

    #[test]
    fn modes_match_vnstat_flags() {
        assert_eq!(CollectorUnit::Months.mode(), "m");
        assert_eq!(CollectorUnit::Days.mode(), "d");
        assert_eq!(CollectorUnit::Hours.mode(), "h");
        assert_eq!(CollectorUnit::Hours.to_string(), "hours");
    }
}
