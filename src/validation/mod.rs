//! Declarative payload validation.
//!
//! A [`RuleSet`] is declared as JSON, `{ field: { checkName: options } }`, and
//! resolved once into concrete [`Check`]s. Validating a payload never fails on
//! configuration; it either passes or yields per-field failure messages.

use serde::Serialize;
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::fmt;
use thiserror::Error;

mod checks;
pub mod constraints;
mod datetime;

pub use checks::Check;
pub use datetime::parse_timestamp;

/// A request payload: field name to value, in the order the client sent them.
pub type Payload = Map<String, Value>;

#[derive(Debug, Error)]
pub enum ConstraintError {
    #[error("`{context}` must be a JSON object")]
    NotAnObject { context: String },

    #[error("unknown check `{check}` declared on field `{field}`")]
    UnknownCheck { field: String, check: String },

    #[error("invalid options for check `{check}` on field `{field}`: {source}")]
    InvalidOptions {
        field: String,
        check: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("datetime bound `{bound}` is not a valid date")]
    InvalidBound { bound: String },

    #[error("failed to format datetime bound: {0}")]
    Format(#[from] time::error::Format),
}

/// Field name to the ordered failure messages raised against it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ValidationErrors(BTreeMap<String, Vec<String>>);

impl ValidationErrors {
    fn push(&mut self, field: &str, message: String) {
        self.0.entry(field.to_string()).or_default().push(message);
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    #[cfg(test)]
    pub fn get(&self, field: &str) -> Option<&[String]> {
        self.0.get(field).map(Vec::as_slice)
    }

    pub fn fields(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let messages: Vec<&str> = self.0.values().flatten().map(String::as_str).collect();
        write!(f, "{}", messages.join("; "))
    }
}

#[derive(Debug, Clone)]
struct FieldRules {
    field: String,
    label: String,
    checks: Vec<Check>,
}

#[derive(Debug, Clone)]
pub struct RuleSet {
    fields: Vec<FieldRules>,
}

impl RuleSet {
    /// Resolve a declarative rule set. Unknown check names and malformed
    /// options are rejected here rather than at validation time.
    pub fn from_declaration(declaration: &Value) -> Result<Self, ConstraintError> {
        let declared_fields = declaration
            .as_object()
            .ok_or_else(|| ConstraintError::NotAnObject {
                context: "rule set".to_string(),
            })?;

        let mut fields = Vec::with_capacity(declared_fields.len());

        for (field, declared_checks) in declared_fields {
            let declared_checks =
                declared_checks
                    .as_object()
                    .ok_or_else(|| ConstraintError::NotAnObject {
                        context: field.clone(),
                    })?;

            let checks = declared_checks
                .iter()
                .map(|(name, options)| Check::resolve(field, name, options))
                .collect::<Result<Vec<_>, _>>()?;

            fields.push(FieldRules {
                field: field.clone(),
                label: capitalize(&prettify(field)),
                checks,
            });
        }

        Ok(Self { fields })
    }

    pub fn validate(&self, payload: &Payload) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::default();

        for rules in &self.fields {
            let value = payload.get(&rules.field);

            for check in &rules.checks {
                if let Some(message) = check.run(value, payload) {
                    errors.push(&rules.field, format!("{} {}", rules.label, message));
                }
            }
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }

    pub fn fields(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|rules| rules.field.as_str())
    }
}

/// `stopDate` -> `stop date`
pub(crate) fn prettify(name: &str) -> String {
    let mut words = String::with_capacity(name.len() + 4);

    for (index, c) in name.chars().enumerate() {
        if matches!(c, '_' | '-' | '.') {
            words.push(' ');
        } else if c.is_uppercase() {
            if index > 0 {
                words.push(' ');
            }
            words.extend(c.to_lowercase());
        } else {
            words.push(c);
        }
    }

    words
}

fn capitalize(text: &str) -> String {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn payload(value: Value) -> Payload {
        value.as_object().cloned().unwrap()
    }

    #[test]
    fn prettifies_field_names() {
        assert_eq!(prettify("startDate"), "start date");
        assert_eq!(prettify("stop_date"), "stop date");
        assert_eq!(capitalize(&prettify("stopDate")), "Stop date");
    }

    #[test]
    fn failures_accumulate_in_declaration_order() {
        let rules = RuleSet::from_declaration(&json!({
            "when": {
                "datetime": { "earliest": "2018-01-01" },
                "relationalOperator": {
                    "attributes": { "then": { "operator": "lessThan" } }
                }
            }
        }))
        .unwrap();

        let errors = rules
            .validate(&payload(json!({ "when": "2017-01-01", "then": "2016-01-01" })))
            .unwrap_err();

        assert_eq!(
            errors.get("when").unwrap(),
            [
                "When must be no earlier than 2018-01-01T00:00:00Z",
                "When must be less than then",
            ]
        );
    }

    #[test]
    fn passes_when_every_check_passes() {
        let rules = RuleSet::from_declaration(&json!({
            "name": { "presence": true }
        }))
        .unwrap();

        assert_eq!(rules.validate(&payload(json!({ "name": "eth0" }))), Ok(()));
    }

    #[test]
    fn undeclared_fields_are_ignored() {
        let rules = RuleSet::from_declaration(&json!({ "name": { "presence": true } })).unwrap();

        let errors = rules
            .validate(&payload(json!({ "other": "" })))
            .unwrap_err();

        assert_eq!(errors.fields().collect::<Vec<_>>(), ["name"]);
    }

    #[test]
    fn rejects_unknown_check_names_up_front() {
        let err = RuleSet::from_declaration(&json!({
            "name": { "presense": true }
        }))
        .unwrap_err();

        assert!(err.to_string().contains("presense"));
    }

    #[test]
    fn rejects_malformed_declarations() {
        assert!(RuleSet::from_declaration(&json!(["startDate"])).is_err());
        assert!(RuleSet::from_declaration(&json!({ "startDate": true })).is_err());
    }

    #[test]
    fn errors_serialize_as_a_plain_map() {
        let rules = RuleSet::from_declaration(&json!({ "name": { "presence": true } })).unwrap();
        let errors = rules.validate(&Payload::new()).unwrap_err();

        assert_eq!(
            serde_json::to_value(&errors).unwrap(),
            json!({ "name": ["Name can't be blank"] })
        );
    }
}
