use bs_protocol::{ExperimentKnobs, ExperimentType, build};
use bs_registry::Registry;
use bs_sim::ReferenceEngine;
use bs_solver::variables::{DISCHARGE_CAPACITY, TERMINAL_VOLTAGE, TIME};
use bs_solver::{CancelToken, SolverEngine};
use proptest::prelude::*;

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    #[test]
    fn constant_current_time_axis_is_bounded_and_increasing(
        c_rate in 0.05f64..5.0,
        duration_s in 1.0f64..7200.0,
        model in prop::sample::select(vec!["SPM", "SPMe", "DFN"]),
    ) {
        let registry = Registry::builtin();
        let model = registry.resolve_model("lithium-ion", model).unwrap().build();
        let values = registry.clone_parameter_set("lithium-ion", "Chen2020").unwrap();
        let knobs = ExperimentKnobs {
            c_rate,
            duration_s,
            ..ExperimentKnobs::default()
        };
        let protocol = build(ExperimentType::ConstantCurrent, &knobs).unwrap();
        let solution = ReferenceEngine::default()
            .solve(model.as_ref(), &values, &protocol, &CancelToken::new())
            .unwrap();

        let time = solution.get(TIME).unwrap();
        prop_assert_eq!(time[0], 0.0);
        prop_assert!(time.windows(2).all(|w| w[1] > w[0]));
        prop_assert!(*time.last().unwrap() <= duration_s + 1e-6);

        let charge = solution.get(DISCHARGE_CAPACITY).unwrap();
        prop_assert!(charge.windows(2).all(|w| w[1] >= w[0]));

        let voltage = solution.get(TERMINAL_VOLTAGE).unwrap();
        prop_assert!(voltage.iter().all(|v| *v >= 2.5 - 1e-6));
    }
}
