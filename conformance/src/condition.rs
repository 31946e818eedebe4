//! Preconditions applied to a payload before the field under test changes.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

use crate::error::HarnessError;
use crate::processor::Processor;
use crate::tree::{Mutation, mutate};

/// Requirements a payload must meet before a field is tested.
///
/// Some fields are only required when a sibling is absent (an error needs an
/// exception when it carries no log) or holds a specific value. The default
/// condition changes nothing.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Condition {
    /// Paths removed from the payload.
    pub absence: Vec<String>,
    /// Paths forced to the given values.
    pub existence: BTreeMap<String, Value>,
}

impl Condition {
    /// A condition removing every given path.
    #[must_use]
    pub fn absent<I, S>(keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            absence: keys.into_iter().map(Into::into).collect(),
            existence: BTreeMap::new(),
        }
    }

    /// A condition forcing one path to a value.
    #[must_use]
    pub fn existing(key: impl Into<String>, value: Value) -> Self {
        Self::default().with_existence(key, value)
    }

    #[must_use]
    pub fn with_absence(mut self, key: impl Into<String>) -> Self {
        self.absence.push(key.into());
        self
    }

    #[must_use]
    pub fn with_existence(mut self, key: impl Into<String>, value: Value) -> Self {
        self.existence.insert(key.into(), value);
        self
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.absence.is_empty() && self.existence.is_empty()
    }
}

/// Prepare `payload` so that `condition` holds.
///
/// All existence upserts run first; the intermediate payload must still be
/// accepted by the processor. Absence deletions follow.
///
/// # Errors
///
/// Returns [`HarnessError::ConditionRejected`] when the processor rejects the
/// payload after the existence step. That points at a mistake in the
/// condition or the fixture, not at the processor.
pub fn apply_condition<P>(
    payload: Value,
    condition: &Condition,
    processor: &P,
) -> Result<Value, HarnessError>
where
    P: Processor + ?Sized,
{
    let mut payload = payload;
    for (key, value) in &condition.existence {
        debug!(key = %key, value = %value, "condition: ensure present");
        payload = mutate(payload, key, &Mutation::Upsert(value.clone()));
    }

    processor
        .validate(&payload)
        .map_err(|rejection| HarnessError::ConditionRejected {
            keys: condition
                .existence
                .keys()
                .map(String::as_str)
                .collect::<Vec<_>>()
                .join(", "),
            message: rejection.to_string(),
        })?;

    for key in &condition.absence {
        debug!(key = %key, "condition: ensure absent");
        payload = mutate(payload, key, &Mutation::Delete);
    }
    Ok(payload)
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use crate::processor::Rejection;
    use crate::tree::{flatten, values_at};
    use serde_json::json;

    /// Rejects payloads whose `error.log.level` is not a string.
    struct LevelMustBeString;

    impl Processor for LevelMustBeString {
        type Decoded = ();

        fn validate(&self, payload: &Value) -> Result<(), Rejection> {
            if values_at(payload, "error.log.level")
                .iter()
                .all(|v| v.is_string())
            {
                Ok(())
            } else {
                Err(Rejection::new("level is not of type \"string\""))
            }
        }

        fn decode(&self, _payload: &Value) -> Result<(), Rejection> {
            Ok(())
        }
    }

    fn payload() -> Value {
        json!({
            "error": {
                "culprit": "handler",
                "log": {"message": "boom", "level": "error"},
                "exception": {"message": "oops"}
            }
        })
    }

    #[test]
    fn test_empty_condition_is_noop() {
        let condition = Condition::default();
        assert!(condition.is_empty());
        let out = apply_condition(payload(), &condition, &LevelMustBeString).unwrap();
        assert_eq!(out, payload());
    }

    #[test]
    fn test_existence_then_absence() {
        let condition = Condition::existing("error.log.level", json!("fatal"))
            .with_absence("error.exception");
        let out = apply_condition(payload(), &condition, &LevelMustBeString).unwrap();
        assert_eq!(values_at(&out, "error.log.level"), vec![&json!("fatal")]);
        assert!(!flatten(&out).contains("error.exception"));
    }

    #[test]
    fn test_sibling_value_survives_target_delete() {
        let condition = Condition::existing("error.log.level", json!("fatal"));
        let out = apply_condition(payload(), &condition, &LevelMustBeString).unwrap();
        let out = mutate(out, "error.culprit", &Mutation::Delete);
        assert_eq!(values_at(&out, "error.log.level"), vec![&json!("fatal")]);
        assert!(!flatten(&out).contains("error.culprit"));
    }

    #[test]
    fn test_rejected_existence_is_harness_error() {
        let condition = Condition::existing("error.log.level", json!(42));
        let err = apply_condition(payload(), &condition, &LevelMustBeString).unwrap_err();
        assert_eq!(
            err,
            HarnessError::ConditionRejected {
                keys: "error.log.level".to_owned(),
                message: "level is not of type \"string\"".to_owned(),
            }
        );
    }

    #[test]
    fn test_absence_removes_every_path() {
        let condition = Condition::absent(["error.log", "error.exception"]);
        let out = apply_condition(payload(), &condition, &LevelMustBeString).unwrap();
        assert_eq!(out, json!({"error": {"culprit": "handler"}}));
    }

    #[test]
    fn test_deserialize_condition() {
        let condition: Condition = serde_json::from_value(json!({
            "absence": ["error.log"],
            "existence": {"error.log.level": "fatal"}
        }))
        .unwrap();
        assert_eq!(condition.absence, vec!["error.log".to_owned()]);
        assert_eq!(condition.existence["error.log.level"], json!("fatal"));

        let empty: Condition = serde_json::from_value(json!({})).unwrap();
        assert!(empty.is_empty());
    }
}
