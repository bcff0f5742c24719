//! Override coercion and bounds clamping.

use crate::bounds::bound_for;
use crate::error::{ValidationError, ValidationResult};
use bs_registry::{ParameterCategory, merge_categories};
use serde::Deserialize;
use serde_json::Value;
use std::collections::BTreeMap;

/// Override input as sent by clients: either one flat mapping or a mapping
/// grouped by parameter category.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum ParameterOverrides {
    Categorized(BTreeMap<ParameterCategory, BTreeMap<String, Value>>),
    Flat(BTreeMap<String, Value>),
}

impl Default for ParameterOverrides {
    fn default() -> Self {
        ParameterOverrides::Flat(BTreeMap::new())
    }
}

impl ParameterOverrides {
    /// Merge into one flat mapping. Categories merge in declaration order.
    pub fn flatten(self) -> BTreeMap<String, Value> {
        match self {
            ParameterOverrides::Flat(flat) => flat,
            ParameterOverrides::Categorized(groups) => merge_categories(groups.values()),
        }
    }
}

/// Coerce a JSON value to a finite float. Numeric strings are accepted.
pub fn coerce_value(name: &str, value: &Value) -> ValidationResult<f64> {
    let number = match value {
        Value::Number(n) => n
            .as_f64()
            .ok_or_else(|| ValidationError::invalid(name, "number is not representable as f64"))?,
        Value::String(s) => s
            .trim()
            .parse::<f64>()
            .map_err(|_| ValidationError::invalid(name, format!("'{s}' is not numeric")))?,
        Value::Null => return Err(ValidationError::invalid(name, "value is null")),
        Value::Bool(_) => return Err(ValidationError::invalid(name, "boolean is not numeric")),
        Value::Array(_) | Value::Object(_) => {
            return Err(ValidationError::invalid(name, "expected a scalar number"));
        }
    };
    if !number.is_finite() {
        return Err(ValidationError::invalid(
            name,
            format!("value {number} is not finite"),
        ));
    }
    Ok(number)
}

/// Validate a flat override mapping.
///
/// Bounded names are clamped into range; other names pass through after
/// coercion. The output has exactly the input's keys.
pub fn validate(overrides: &BTreeMap<String, Value>) -> ValidationResult<BTreeMap<String, f64>> {
    let mut validated = BTreeMap::new();
    for (name, raw) in overrides {
        let value = coerce_value(name, raw)?;
        let value = match bound_for(name) {
            Some(bound) => {
                let clamped = bound.clamp(value);
                if clamped != value {
                    tracing::debug!(
                        parameter = %name,
                        requested = value,
                        applied = clamped,
                        min = bound.min,
                        max = bound.max,
                        "clamped parameter into range"
                    );
                }
                clamped
            }
            None => value,
        };
        validated.insert(name.clone(), value);
    }
    Ok(validated)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use serde_json::json;

    fn overrides(value: Value) -> BTreeMap<String, Value> {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn c_rate_is_clamped_both_ways() {
        let high = validate(&overrides(json!({"C-rate": 50}))).unwrap();
        assert_eq!(high["C-rate"], 20.0);
        let low = validate(&overrides(json!({"C-rate": -5}))).unwrap();
        assert_eq!(low["C-rate"], 0.01);
    }

    #[test]
    fn unbounded_names_pass_through() {
        let out = validate(&overrides(json!({"Separator porosity": 0.5, "Anything": "3.25"}))).unwrap();
        assert_eq!(out["Separator porosity"], 0.5);
        assert_eq!(out["Anything"], 3.25);
        assert_eq!(out.len(), 2);
    }

    #[test]
    fn non_numeric_values_name_the_key() {
        let err = validate(&overrides(json!({"C-rate": "fast"}))).unwrap_err();
        assert_eq!(err.parameter(), "C-rate");

        let err = validate(&overrides(json!({"Ambient temperature [K]": null}))).unwrap_err();
        assert_eq!(err.parameter(), "Ambient temperature [K]");

        let err = validate(&overrides(json!({"X": [1, 2]}))).unwrap_err();
        assert_eq!(err.parameter(), "X");
    }

    #[test]
    fn non_finite_strings_are_rejected() {
        for text in ["NaN", "inf", "-infinity"] {
            let err = validate(&overrides(json!({"C-rate": text}))).unwrap_err();
            assert!(matches!(err, ValidationError::InvalidParameterValue { .. }), "{text}");
        }
    }

    #[test]
    fn categorized_overrides_flatten() {
        let parsed: ParameterOverrides = serde_json::from_value(json!({
            "thermal": {"Ambient temperature [K]": 310},
            "operating": {"C-rate": 2}
        }))
        .unwrap();
        assert!(matches!(parsed, ParameterOverrides::Categorized(_)));
        let flat = parsed.flatten();
        assert_eq!(flat["C-rate"], json!(2));
        assert_eq!(flat["Ambient temperature [K]"], json!(310));
    }

    #[test]
    fn flat_overrides_are_not_mistaken_for_categories() {
        let parsed: ParameterOverrides =
            serde_json::from_value(json!({"C-rate": 2, "thermal": 5})).unwrap();
        assert!(matches!(parsed, ParameterOverrides::Flat(_)));
        assert_eq!(parsed.flatten().len(), 2);
    }

    proptest! {
        #[test]
        fn bounded_values_stay_in_range(value in -1.0e6f64..1.0e6) {
            for bound in crate::bounds::bounds() {
                let input = overrides(json!({ bound.name: value }));
                let out = validate(&input).unwrap();
                let applied = out[bound.name];
                prop_assert!(bound.contains(applied));
                if bound.contains(value) {
                    prop_assert_eq!(applied, value);
                }
            }
        }
    }
}
