use crate::validation::datetime::{format_timestamp, parse_timestamp};
use crate::validation::{ConstraintError, Payload, prettify};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::cmp::Ordering;
use time::{OffsetDateTime, Time};

/// A registered check, resolved from its declared name once when the rule set is built.
#[derive(Debug, Clone)]
pub enum Check {
    Presence(PresenceCheck),
    Datetime(DatetimeCheck),
    RequirePresence(RequirePresenceCheck),
    RelationalOperator(RelationalCheck),
}

impl Check {
    pub fn resolve(field: &str, name: &str, options: &Value) -> Result<Self, ConstraintError> {
        let check = match name {
            "presence" => {
                let options: PresenceOptions = decode_options(field, name, options)?;
                Check::Presence(options.into())
            }
            "datetime" => {
                let options: DatetimeOptions = decode_options(field, name, options)?;
                Check::Datetime(options.try_into()?)
            }
            "requirePresence" => {
                let options: RequirePresenceOptions = decode_options(field, name, options)?;
                Check::RequirePresence(options.into())
            }
            "relationalOperator" => {
                Check::RelationalOperator(RelationalCheck::try_from_options(field, name, options)?)
            }
            _ => {
                return Err(ConstraintError::UnknownCheck {
                    field: field.to_string(),
                    check: name.to_string(),
                });
            }
        };

        Ok(check)
    }

    /// Run the check against `value`, the payload entry for the field it guards.
    pub fn run(&self, value: Option<&Value>, payload: &Payload) -> Option<String> {
        match self {
            Check::Presence(check) => check.run(value),
            Check::Datetime(check) => check.run(value),
            Check::RequirePresence(check) => check.run(value, payload),
            Check::RelationalOperator(check) => check.run(value, payload),
        }
    }
}

fn decode_options<T: DeserializeOwned>(
    field: &str,
    check: &str,
    options: &Value,
) -> Result<T, ConstraintError> {
    // `true` enables a check with its default options
    let options = match options {
        Value::Bool(true) => Value::Object(Default::default()),
        other => other.clone(),
    };

    serde_json::from_value(options).map_err(|source| ConstraintError::InvalidOptions {
        field: field.to_string(),
        check: check.to_string(),
        source,
    })
}

pub(crate) fn is_defined(value: Option<&Value>) -> bool {
    value.is_some_and(|value| !value.is_null())
}

fn is_empty(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::String(text) => text.trim().is_empty(),
        Value::Array(items) => items.is_empty(),
        Value::Object(entries) => entries.is_empty(),
        Value::Bool(_) | Value::Number(_) => false,
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PresenceOptions {
    #[serde(default)]
    allow_empty: bool,
}

#[derive(Debug, Clone)]
pub struct PresenceCheck {
    allow_empty: bool,
}

impl From<PresenceOptions> for PresenceCheck {
    fn from(options: PresenceOptions) -> Self {
        Self {
            allow_empty: options.allow_empty,
        }
    }
}

impl PresenceCheck {
    fn passes(value: Option<&Value>, allow_empty: bool) -> bool {
        match value {
            None | Some(Value::Null) => false,
            Some(value) => allow_empty || !is_empty(value),
        }
    }

    fn run(&self, value: Option<&Value>) -> Option<String> {
        if Self::passes(value, self.allow_empty) {
            None
        } else {
            Some("can't be blank".to_string())
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct DatetimeOptions {
    earliest: Option<String>,
    latest: Option<String>,
    #[serde(default)]
    date_only: bool,
}

#[derive(Debug, Clone)]
struct Bound {
    at: OffsetDateTime,
    display: String,
}

#[derive(Debug, Clone)]
pub struct DatetimeCheck {
    earliest: Option<Bound>,
    latest: Option<Bound>,
    date_only: bool,
}

impl TryFrom<DatetimeOptions> for DatetimeCheck {
    type Error = ConstraintError;

    fn try_from(options: DatetimeOptions) -> Result<Self, Self::Error> {
        let DatetimeOptions {
            earliest,
            latest,
            date_only,
        } = options;

        let resolve = |bound: Option<String>| -> Result<Option<Bound>, ConstraintError> {
            let Some(bound) = bound else {
                return Ok(None);
            };

            let at = parse_timestamp(&Value::String(bound.clone()))
                .ok_or(ConstraintError::InvalidBound { bound })?;
            let display = format_timestamp(at, date_only)?;

            Ok(Some(Bound { at, display }))
        };

        Ok(Self {
            earliest: resolve(earliest)?,
            latest: resolve(latest)?,
            date_only,
        })
    }
}

impl DatetimeCheck {
    fn run(&self, value: Option<&Value>) -> Option<String> {
        let value = value.filter(|value| !value.is_null())?;

        let Some(at) = parse_timestamp(value) else {
            return Some("must be a valid date".to_string());
        };

        if self.date_only && at.time() != Time::MIDNIGHT {
            return Some("must be a valid date".to_string());
        }

        if let Some(earliest) = &self.earliest
            && at < earliest.at
        {
            return Some(format!("must be no earlier than {}", earliest.display));
        }

        if let Some(latest) = &self.latest
            && at > latest.at
        {
            return Some(format!("must be no later than {}", latest.display));
        }

        None
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RequirePresenceOptions {
    #[serde(default)]
    attributes: Vec<String>,
    #[serde(default)]
    allow_empty: bool,
}

/// If the guarded field has a value, every named attribute must be present too.
#[derive(Debug, Clone)]
pub struct RequirePresenceCheck {
    attributes: Vec<String>,
    allow_empty: bool,
}

impl From<RequirePresenceOptions> for RequirePresenceCheck {
    fn from(options: RequirePresenceOptions) -> Self {
        Self {
            attributes: options.attributes,
            allow_empty: options.allow_empty,
        }
    }
}

impl RequirePresenceCheck {
    fn run(&self, value: Option<&Value>, payload: &Payload) -> Option<String> {
        if !is_defined(value) {
            return None;
        }

        let missing: Vec<&str> = self
            .attributes
            .iter()
            .filter(|attribute| !PresenceCheck::passes(payload.get(*attribute), self.allow_empty))
            .map(String::as_str)
            .collect();

        if missing.is_empty() {
            None
        } else {
            Some(format!("requires the presence of {}", missing.join(",")))
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub enum Operator {
    #[serde(rename = "lessThan", alias = "<")]
    LessThan,
    #[serde(rename = "lessThanOrEqual", alias = "<=")]
    LessThanOrEqual,
    #[serde(rename = "greaterThan", alias = ">")]
    GreaterThan,
    #[serde(rename = "greaterThanOrEqual", alias = ">=")]
    GreaterThanOrEqual,
}

impl Operator {
    pub fn holds(&self, ordering: Ordering) -> bool {
        match self {
            Operator::LessThan => ordering.is_lt(),
            Operator::LessThanOrEqual => ordering.is_le(),
            Operator::GreaterThan => ordering.is_gt(),
            Operator::GreaterThanOrEqual => ordering.is_ge(),
        }
    }

    fn describe(&self) -> &'static str {
        match self {
            Operator::LessThan => "less than",
            Operator::LessThanOrEqual => "less than or equal to",
            Operator::GreaterThan => "greater than",
            Operator::GreaterThanOrEqual => "greater than or equal to",
        }
    }
}

#[derive(Debug, Deserialize)]
struct OperatorOptions {
    operator: Operator,
}

#[derive(Debug, Clone)]
pub struct RelationalCheck {
    comparisons: Vec<(String, Operator)>,
}

impl RelationalCheck {
    fn try_from_options(field: &str, check: &str, options: &Value) -> Result<Self, ConstraintError> {
        let attributes = options
            .get("attributes")
            .and_then(Value::as_object)
            .ok_or_else(|| ConstraintError::NotAnObject {
                context: format!("{field}.{check}.attributes"),
            })?;

        let comparisons = attributes
            .iter()
            .map(|(attribute, options)| {
                decode_options::<OperatorOptions>(field, check, options)
                    .map(|options| (attribute.clone(), options.operator))
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self { comparisons })
    }

    fn run(&self, value: Option<&Value>, payload: &Payload) -> Option<String> {
        let value = value.filter(|value| !value.is_null())?;

        let failures: Vec<String> = self
            .comparisons
            .iter()
            .filter(|(attribute, operator)| {
                !compare(value, payload.get(attribute)).is_some_and(|o| operator.holds(o))
            })
            .map(|(attribute, operator)| {
                format!("must be {} {}", operator.describe(), prettify(attribute))
            })
            .collect();

        if failures.is_empty() {
            None
        } else {
            Some(failures.join(", "))
        }
    }
}

/// Order two payload values: as timestamps when both parse, otherwise by their raw form.
pub(crate) fn compare(value: &Value, other: Option<&Value>) -> Option<Ordering> {
    let other = other?;

    if let (Some(left), Some(right)) = (parse_timestamp(value), parse_timestamp(other)) {
        return Some(left.cmp(&right));
    }

    match (value, other) {
        (Value::Number(left), Value::Number(right)) => left.as_f64()?.partial_cmp(&right.as_f64()?),
        (Value::String(left), Value::String(right)) => Some(left.cmp(right)),
        _ => None,
    }
}
