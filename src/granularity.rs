use crate::model::vnstat::CollectorUnit;
use crate::validation::constraints;
use crate::validation::{ConstraintError, RuleSet};
use std::fmt;
use time::{Date, Duration, OffsetDateTime, UtcOffset};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Granularity {
    Year,
    Month,
    Day,
    Hour,
}

impl Granularity {
    pub const ALL: [Granularity; 4] = [
        Granularity::Year,
        Granularity::Month,
        Granularity::Day,
        Granularity::Hour,
    ];

    /// Truncate `at` to the start of its bucket, in UTC.
    pub fn truncate(&self, at: OffsetDateTime) -> OffsetDateTime {
        let at = at.to_offset(UtcOffset::UTC);
        let date = at.date();

        match self {
            Granularity::Year => start_of_day(date - Duration::days(i64::from(date.ordinal()) - 1)),
            Granularity::Month => start_of_day(date - Duration::days(i64::from(date.day()) - 1)),
            Granularity::Day => start_of_day(date),
            Granularity::Hour => start_of_day(date) + Duration::hours(i64::from(at.hour())),
        }
    }

    /// Bucket label for `at`: `YYYY-MM-DD`, or `YYYY-MM-DDTHH:00:00Z` for hours.
    pub fn label(&self, at: OffsetDateTime) -> String {
        let at = self.truncate(at);
        let date = format!(
            "{:04}-{:02}-{:02}",
            at.year(),
            u8::from(at.month()),
            at.day()
        );

        match self {
            Granularity::Hour => format!("{}T{:02}:00:00Z", date, at.hour()),
            _ => date,
        }
    }

    /// Name echoed back to clients as the result precision.
    pub fn precision(&self) -> &'static str {
        match self {
            Granularity::Year => "Year",
            Granularity::Month => "Month",
            Granularity::Day => "Day",
            Granularity::Hour => "Hour",
        }
    }

    /// vnstat keeps no yearly series; years are reduced from months.
    pub fn collector_unit(&self) -> CollectorUnit {
        match self {
            Granularity::Year | Granularity::Month => CollectorUnit::Months,
            Granularity::Day => CollectorUnit::Days,
            Granularity::Hour => CollectorUnit::Hours,
        }
    }

    pub fn path(&self) -> &'static str {
        match self {
            Granularity::Year => "/years",
            Granularity::Month => "/months",
            Granularity::Day => "/days",
            Granularity::Hour => "/hours",
        }
    }
}

impl fmt::Display for Granularity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.precision())
    }
}

fn start_of_day(date: Date) -> OffsetDateTime {
    date.midnight().assume_utc()
}

/// A granularity together with the rule set its requests are validated against.
#[derive(Debug, Clone)]
pub struct QueryProfile {
    pub granularity: Granularity,
    pub constraints: RuleSet,
}

#[derive(Debug, Clone)]
pub struct QueryProfiles {
    year: QueryProfile,
    month: QueryProfile,
    day: QueryProfile,
    hour: QueryProfile,
}

impl QueryProfiles {
    pub fn build() -> Result<Self, ConstraintError> {
        Ok(Self {
            year: QueryProfile {
                granularity: Granularity::Year,
                constraints: constraints::year_constraints()?,
            },
            month: QueryProfile {
                granularity: Granularity::Month,
                constraints: constraints::month_constraints()?,
            },
            day: QueryProfile {
                granularity: Granularity::Day,
                constraints: constraints::day_constraints()?,
            },
            hour: QueryProfile {
                granularity: Granularity::Hour,
                constraints: constraints::hour_constraints()?,
            },
        })
    }

    pub fn get(&self, granularity: Granularity) -> &QueryProfile {
        match granularity {
            Granularity::Year => &self.year,
            Granularity::Month => &self.month,
            Granularity::Day => &self.day,
            Granularity::Hour => &self.hour,
        }
    }
}
