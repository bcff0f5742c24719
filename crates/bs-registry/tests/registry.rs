use bs_registry::names::{AMBIENT_TEMPERATURE_K, NOMINAL_CAPACITY_AH};
use bs_registry::{Chemistry, PlatingMode, Registry, RegistryError, WorkingIon};

#[test]
fn every_registered_pair_resolves_to_its_key() {
    let registry = Registry::builtin();
    for profile in registry.chemistries() {
        for key in profile.model_keys() {
            let factory = registry
                .resolve_model(profile.chemistry.id(), key)
                .expect("registered pair must resolve");
            assert_eq!(factory.key(), key);
            let model = factory.build();
            assert_eq!(model.key(), key);
            assert_eq!(model.chemistry(), profile.chemistry);
        }
    }
}

#[test]
fn lead_acid_does_not_offer_spm() {
    let err = Registry::builtin()
        .resolve_model("lead-acid", "SPM")
        .unwrap_err();
    assert_eq!(
        err,
        RegistryError::UnsupportedModel {
            chemistry: "lead-acid".into(),
            model: "SPM".into(),
        }
    );
}

#[test]
fn unknown_chemistry_is_rejected_before_model_lookup() {
    let err = Registry::builtin()
        .resolve_model("nickel-cadmium", "SPM")
        .unwrap_err();
    assert!(matches!(err, RegistryError::UnsupportedChemistry { chemistry } if chemistry == "nickel-cadmium"));
}

#[test]
fn preset_must_belong_to_chemistry() {
    let err = Registry::builtin()
        .resolve_parameter_set("lead-acid", "Chen2020")
        .unwrap_err();
    assert!(matches!(err, RegistryError::UnsupportedParameterSet { .. }));
}

#[test]
fn sodium_and_lithium_metal_models_carry_options() {
    let registry = Registry::builtin();
    let na = registry.resolve_model("sodium-ion", "DFN").unwrap().build();
    assert_eq!(na.options().working_ion, WorkingIon::Sodium);
    let li_metal = registry.resolve_model("lithium-metal", "SPM").unwrap().build();
    assert_eq!(li_metal.options().lithium_plating, PlatingMode::Reversible);
}

#[test]
fn resolved_values_are_independent_clones() {
    let registry = Registry::builtin();
    let mut first = registry.clone_parameter_set("lithium-ion", "Chen2020").unwrap();
    assert!(first.update_existing(AMBIENT_TEMPERATURE_K, 330.0));

    let second = registry.clone_parameter_set("lithium-ion", "Chen2020").unwrap();
    assert_eq!(second.get(AMBIENT_TEMPERATURE_K), Some(298.15));

    let preset = registry.resolve_parameter_set("lithium-ion", "Chen2020").unwrap();
    assert_eq!(preset.chemistry, Chemistry::LithiumIon);
    assert_eq!(preset.get(AMBIENT_TEMPERATURE_K), Some(298.15));
    assert_eq!(preset.get(NOMINAL_CAPACITY_AH), Some(5.0));
}

#[test]
fn okane2022_is_registered_for_two_chemistries() {
    let registry = Registry::builtin();
    assert!(registry.resolve_parameter_set("lithium-ion", "OKane2022").is_ok());
    assert!(registry.resolve_parameter_set("lithium-metal", "OKane2022").is_ok());
}
