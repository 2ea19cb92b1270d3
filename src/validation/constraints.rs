use crate::validation::{ConstraintError, RuleSet};
use serde_json::{Value, json};

/// Earliest date any traffic query may ask for.
pub const EARLIEST_DATE: &str = "2018-01-01";

fn base_constraints() -> Value {
    json!({
        "startDate": {
            "presence": {
                "allowEmpty": false
            },
            "datetime": {
                "earliest": EARLIEST_DATE
            }
        },
        "stopDate": {
            "datetime": {
                "earliest": EARLIEST_DATE
            },
            "requirePresence": {
                "attributes": ["startDate"],
                "allowEmpty": false
            },
            "relationalOperator": {
                "attributes": {
                    "startDate": { "operator": "greaterThan" }
                }
            }
        }
    })
}

// Each granularity owns its rule set so they can diverge independently.

pub fn year_constraints() -> Result<RuleSet, ConstraintError> {
    RuleSet::from_declaration(&base_constraints())
}

pub fn month_constraints() -> Result<RuleSet, ConstraintError> {
    RuleSet::from_declaration(&base_constraints())
}

pub fn day_constraints() -> Result<RuleSet, ConstraintError> {
    RuleSet::from_declaration(&base_constraints())
}

pub fn hour_constraints() -> Result<RuleSet, ConstraintError> {
    RuleSet::from_declaration(&base_constraints())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validation::{Payload, ValidationErrors};

    fn all_rule_sets() -> Vec<RuleSet> {
        vec![
            year_constraints().unwrap(),
            month_constraints().unwrap(),
            day_constraints().unwrap(),
            hour_constraints().unwrap(),
        ]
    }

    fn check(body: Value) -> Vec<Result<(), ValidationErrors>> {
        let payload: Payload = body.as_object().cloned().unwrap();
        all_rule_sets()
            .iter()
            .map(|rules| rules.validate(&payload))
            .collect()
    }

    fn assert_all_pass(body: Value) {
        for result in check(body) {
            assert_eq!(result, Ok(()));
        }
    }

    fn assert_all_fail_on(body: Value, field: &str, message: &str) {
        for result in check(body) {
            let errors = result.unwrap_err();
            let messages = errors.get(field).unwrap_or_default();
            assert!(
                messages.iter().any(|m| m == message),
                "expected `{message}` under `{field}`, got {errors:?}"
            );
        }
    }

    #[test]
    fn missing_start_date_fails_presence() {
        assert_all_fail_on(json!({}), "startDate", "Start date can't be blank");
        assert_all_fail_on(
            json!({ "startDate": "" }),
            "startDate",
            "Start date can't be blank",
        );
    }

    #[test]
    fn start_date_alone_passes() {
        assert_all_pass(json!({ "startDate": "2024-03-01" }));
    }

    #[test]
    fn start_date_before_floor_fails() {
        assert_all_fail_on(
            json!({ "startDate": "2017-12-31" }),
            "startDate",
            "Start date must be no earlier than 2018-01-01T00:00:00Z",
        );
    }

    #[test]
    fn start_date_must_parse() {
        assert_all_fail_on(
            json!({ "startDate": "first of march" }),
            "startDate",
            "Start date must be a valid date",
        );
    }

    #[test]
    fn stop_date_requires_start_date() {
        assert_all_fail_on(
            json!({ "stopDate": "2024-03-02" }),
            "stopDate",
            "Stop date requires the presence of startDate",
        );
    }

    #[test]
    fn stop_date_must_follow_start_date() {
        assert_all_fail_on(
            json!({ "startDate": "2024-03-01", "stopDate": "2024-03-01" }),
            "stopDate",
            "Stop date must be greater than start date",
        );
        assert_all_fail_on(
            json!({ "startDate": "2024-03-02", "stopDate": "2024-03-01" }),
            "stopDate",
            "Stop date must be greater than start date",
        );
        assert_all_pass(json!({ "startDate": "2024-03-01", "stopDate": "2024-03-02" }));
        assert_all_pass(json!({
            "startDate": "2024-03-01T10:00:00Z",
            "stopDate": "2024-03-01T11:00:00Z"
        }));
    }

    #[test]
    fn explicit_null_stop_date_is_absent() {
        assert_all_pass(json!({ "startDate": "2024-03-01", "stopDate": null }));
    }

    #[test]
    fn rule_sets_agree() {
        let bodies = [
            json!({}),
            json!({ "startDate": "2024-01-15" }),
            json!({ "stopDate": "2024-01-15" }),
            json!({ "startDate": "2024-01-15", "stopDate": "2024-01-14" }),
            json!({ "startDate": "2016-01-15", "stopDate": "2015-01-14" }),
        ];

        for body in bodies {
            let results = check(body);
            assert!(results.windows(2).all(|pair| pair[0] == pair[1]));
        }
    }
}
