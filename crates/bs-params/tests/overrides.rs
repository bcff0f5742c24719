use bs_params::{ParameterOverrides, ValidationError, validate};
use serde_json::json;

#[test]
fn request_body_overrides_validate_end_to_end() {
    let body = json!({
        "electrochemical": {"Negative electrode porosity": 1.5},
        "operating": {"C-rate": "2", "Simulation duration [s]": 1800}
    });
    let overrides: ParameterOverrides = serde_json::from_value(body).unwrap();
    let validated = validate(&overrides.flatten()).unwrap();

    assert_eq!(validated["Negative electrode porosity"], 0.99);
    assert_eq!(validated["C-rate"], 2.0);
    assert_eq!(validated["Simulation duration [s]"], 1800.0);
    assert_eq!(validated.len(), 3);
}

#[test]
fn first_invalid_key_is_reported() {
    let overrides: ParameterOverrides =
        serde_json::from_value(json!({"Ambient temperature [K]": {"value": 300}})).unwrap();
    let err = validate(&overrides.flatten()).unwrap_err();
    assert_eq!(
        err,
        ValidationError::InvalidParameterValue {
            name: "Ambient temperature [K]".into(),
            reason: "expected a scalar number".into(),
        }
    );
}

#[test]
fn empty_overrides_validate_to_empty() {
    let overrides = ParameterOverrides::default();
    assert!(validate(&overrides.flatten()).unwrap().is_empty());
}
