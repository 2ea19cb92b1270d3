use crate::model::traffic::TrafficTotals;
use crate::model::vnstat::{CollectorUnit, Interface, RawTrafficRecord};
use crate::traffic::TrafficError;
use time::error::ComponentRange;
use time::{Date, Month, OffsetDateTime, Time};

/// A record placed at a single UTC instant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimePoint {
    pub at: OffsetDateTime,
    pub totals: TrafficTotals,
}

/// The normalized series of one interface.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InterfaceSeries {
    pub name: String,
    pub points: Vec<TimePoint>,
}

/// Place a raw vnstat record in time.
///
/// vnstat months are 1-based, which is what [`Month`] expects. Missing month
/// and day default to the first. Hourly records take their hour from
/// [`RawTrafficRecord::hour`], never from the date.
pub fn normalize(record: &RawTrafficRecord, unit: CollectorUnit) -> Result<TimePoint, ComponentRange> {
    let month = Month::try_from(record.date.month.unwrap_or(1))?;
    let date = Date::from_calendar_date(record.date.year, month, record.date.day.unwrap_or(1))?;

    let time = match unit {
        CollectorUnit::Hours => Time::from_hms(u8::try_from(record.hour()).unwrap_or(u8::MAX), 0, 0)?,
        CollectorUnit::Months | CollectorUnit::Days => Time::MIDNIGHT,
    };

    Ok(TimePoint {
        at: date.with_time(time).assume_utc(),
        totals: TrafficTotals::new(record.rx, record.tx),
    })
}

pub fn normalize_interface(
    interface: &Interface,
    unit: CollectorUnit,
) -> Result<InterfaceSeries, TrafficError> {
    let points = interface
        .traffic
        .records(unit)
        .iter()
        .map(|record| {
            normalize(record, unit).map_err(|source| TrafficError::InvalidRecordDate {
                interface: interface.name.clone(),
                unit,
                id: record.id,
                year: record.date.year,
                month: record.date.month,
                day: record.date.day,
                source,
            })
        })
        .collect::<Result<Vec<_>, _>>()?;

    Ok(InterfaceSeries {
        name: interface.name.clone(),
        points,
    })
}
