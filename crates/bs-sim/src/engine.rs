//! Reference Solver Engine: a lumped equivalent-circuit cell integrated
//! step by step through the experiment protocol.

use crate::cell::{CellParameters, CellState};
use crate::error::{SimError, SimResult};
use crate::integrator::IntegratorType;
use crate::model::TransientModel;
use bs_core::value::{in_amps, in_ohms, in_seconds, in_volts, in_watts};
use bs_protocol::{ExperimentProtocol, ExperimentStep, Setpoint, StepAction};
use bs_registry::{BatteryModel, ModelFeatures, ParameterValues};
use bs_solver::variables::*;
use bs_solver::{CancelToken, EngineResult, Solution, SolverEngine, TabularSolution};
use serde::{Deserialize, Serialize};

/// Time below which a remaining step interval is treated as finished.
const TIME_EPS_S: f64 = 1e-9;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Fixed integration step [s]; the last step of each instruction is shortened.
    pub dt_s: f64,
    /// Upper bound on any single instruction, and the duration of
    /// instructions that only have a voltage termination.
    pub max_step_duration_s: f64,
    pub integrator: IntegratorType,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            dt_s: 10.0,
            max_step_duration_s: 86400.0,
            integrator: IntegratorType::Rk4,
        }
    }
}

/// How the current is determined during one instruction.
#[derive(Debug, Clone, Copy, PartialEq)]
enum CurrentLaw {
    Fixed(f64),
    VoltageHold(f64),
    Power { watts: f64, discharge: bool },
    Load(f64),
}

impl CurrentLaw {
    fn for_step(step: &ExperimentStep, cell: &CellParameters, index: usize) -> SimResult<Self> {
        let sign = match step.action {
            StepAction::Discharge => 1.0,
            StepAction::Charge => -1.0,
            StepAction::Hold => 0.0,
        };
        let law = match (step.action, step.setpoint) {
            (_, Setpoint::Voltage(v)) => CurrentLaw::VoltageHold(in_volts(v)),
            (StepAction::Hold, _) => {
                return Err(SimError::Infeasible {
                    step: index,
                    reason: "hold requires a voltage setpoint".to_string(),
                });
            }
            (_, Setpoint::CRate(c)) => CurrentLaw::Fixed(sign * c * cell.capacity_ah),
            (_, Setpoint::Current(i)) => CurrentLaw::Fixed(sign * in_amps(i)),
            (action, Setpoint::Power(p)) => CurrentLaw::Power {
                watts: in_watts(p),
                discharge: action == StepAction::Discharge,
            },
            (StepAction::Discharge, Setpoint::Resistance(r)) => CurrentLaw::Load(in_ohms(r)),
            (_, Setpoint::Resistance(_)) => {
                return Err(SimError::Infeasible {
                    step: index,
                    reason: "a resistive load can only discharge".to_string(),
                });
            }
        };
        Ok(law)
    }

    fn current(&self, cell: &CellParameters, state: &CellState, index: usize) -> SimResult<f64> {
        let ocv = cell.ocv(cell.soc(state));
        let r = cell.resistance_ohm;
        match *self {
            CurrentLaw::Fixed(i) => Ok(i),
            CurrentLaw::VoltageHold(v) => Ok((ocv - v) / r),
            CurrentLaw::Power { watts, discharge: true } => {
                // P = (OCV - I R) I
                let disc = ocv * ocv - 4.0 * r * watts;
                if disc < 0.0 {
                    return Err(SimError::Infeasible {
                        step: index,
                        reason: format!("power {watts} W exceeds the deliverable maximum at OCV {ocv} V"),
                    });
                }
                Ok((ocv - disc.sqrt()) / (2.0 * r))
            }
            CurrentLaw::Power { watts, discharge: false } => {
                // P = (OCV + |I| R) |I|
                let disc = ocv * ocv + 4.0 * r * watts;
                if disc < 0.0 {
                    return Err(SimError::Infeasible {
                        step: index,
                        reason: format!("charge power {watts} W is not reachable"),
                    });
                }
                Ok(-(disc.sqrt() - ocv) / (2.0 * r))
            }
            CurrentLaw::Load(load) => {
                let total = r + load;
                if total <= 0.0 {
                    return Err(SimError::Infeasible {
                        step: index,
                        reason: format!("load {load} Ohm short-circuits the cell"),
                    });
                }
                Ok(ocv / total)
            }
        }
    }
}

/// One instruction as a transient model.
struct StepModel<'a> {
    cell: &'a CellParameters,
    law: CurrentLaw,
    index: usize,
    start: CellState,
}

impl TransientModel for StepModel<'_> {
    type State = CellState;

    fn initial_state(&self) -> CellState {
        self.start
    }

    fn rhs(&mut self, _t: f64, x: &CellState) -> SimResult<CellState> {
        let current = self.law.current(self.cell, x, self.index)?;
        Ok(self.cell.derivative(x, current))
    }

    fn add(&self, a: &CellState, b: &CellState) -> CellState {
        CellState {
            discharged_ah: a.discharged_ah + b.discharged_ah,
            temperature_k: a.temperature_k + b.temperature_k,
        }
    }

    fn scale(&self, a: &CellState, scale: f64) -> CellState {
        CellState {
            discharged_ah: a.discharged_ah * scale,
            temperature_k: a.temperature_k * scale,
        }
    }
}

/// Distances to the instruction's end conditions. Positive means running.
#[derive(Debug, Clone, Copy)]
struct Margins {
    voltage: f64,
    soc: f64,
}

impl Margins {
    fn terminated(&self) -> bool {
        self.voltage <= 0.0 || self.soc < 0.0
    }

    /// Fraction of the last interval at which the first end condition was met,
    /// by linear interpolation between `self` (start) and `end`.
    fn crossing_fraction(&self, end: &Margins) -> f64 {
        let (m0, m1) = if end.voltage <= 0.0 {
            (self.voltage, end.voltage)
        } else {
            (self.soc, end.soc)
        };
        let frac = m0 / (m0 - m1);
        if frac.is_finite() { frac.clamp(0.0, 1.0) } else { 1.0 }
    }
}

fn margins(
    cell: &CellParameters,
    step: &ExperimentStep,
    state: &CellState,
    current: f64,
) -> Margins {
    let soc = cell.soc(state);
    let voltage = match step.until_voltage {
        Some(limit) => {
            let v = cell.terminal_voltage(state, current);
            let limit = in_volts(limit);
            match step.action {
                StepAction::Charge => limit - v,
                StepAction::Discharge | StepAction::Hold => v - limit,
            }
        }
        None => f64::INFINITY,
    };
    Margins {
        voltage,
        soc: soc.min(1.0 - soc),
    }
}

/// Column buffers for the solution.
struct Recorder {
    features: ModelFeatures,
    time: Vec<f64>,
    voltage: Vec<f64>,
    current: Vec<f64>,
    discharged: Vec<f64>,
    temperature: Vec<f64>,
    power: Vec<f64>,
    resistance: Vec<f64>,
    electrolyte_potential: Vec<f64>,
    negative_potential: Vec<f64>,
    positive_potential: Vec<f64>,
    negative_concentration: Vec<f64>,
    positive_concentration: Vec<f64>,
}

impl Recorder {
    fn new(features: ModelFeatures) -> Self {
        Self {
            features,
            time: Vec::new(),
            voltage: Vec::new(),
            current: Vec::new(),
            discharged: Vec::new(),
            temperature: Vec::new(),
            power: Vec::new(),
            resistance: Vec::new(),
            electrolyte_potential: Vec::new(),
            negative_potential: Vec::new(),
            positive_potential: Vec::new(),
            negative_concentration: Vec::new(),
            positive_concentration: Vec::new(),
        }
    }

    fn is_empty(&self) -> bool {
        self.time.is_empty()
    }

    fn push(&mut self, cell: &CellParameters, t: f64, state: &CellState, current: f64) {
        let soc = cell.soc(state);
        let v = cell.terminal_voltage(state, current);
        let overpotential = current * cell.resistance_ohm;

        self.time.push(t);
        self.voltage.push(v);
        self.current.push(current);
        self.discharged.push(state.discharged_ah);
        self.temperature.push(state.temperature_k);
        self.power.push(v * current);
        self.resistance.push(cell.resistance_ohm);
        self.electrolyte_potential
            .push(-cell.negative_ocp_v - 0.5 * overpotential);
        self.negative_potential.push(-0.25 * overpotential);
        self.positive_potential.push(v);
        self.negative_concentration
            .push(cell.negative_surface_concentration(soc));
        self.positive_concentration
            .push(cell.positive_surface_concentration(soc));
    }

    fn finish(self) -> TabularSolution {
        let mut solution = TabularSolution::new()
            .with(TIME, self.time)
            .with(TERMINAL_VOLTAGE, self.voltage)
            .with(CURRENT, self.current)
            .with(DISCHARGE_CAPACITY, self.discharged)
            .with(CELL_TEMPERATURE, self.temperature)
            .with(TERMINAL_POWER, self.power)
            .with(TERMINAL_RESISTANCE, self.resistance)
            .with(NEGATIVE_POTENTIAL, self.negative_potential)
            .with(POSITIVE_POTENTIAL, self.positive_potential);
        if self.features.electrolyte {
            solution.insert(ELECTROLYTE_POTENTIAL, self.electrolyte_potential);
        }
        if self.features.particles {
            solution.insert(NEGATIVE_SURFACE_CONCENTRATION, self.negative_concentration);
            solution.insert(POSITIVE_SURFACE_CONCENTRATION, self.positive_concentration);
        }
        solution
    }
}

#[derive(Debug, Clone)]
pub struct ReferenceEngine {
    config: EngineConfig,
    id: String,
}

impl Default for ReferenceEngine {
    fn default() -> Self {
        let config = EngineConfig::default();
        let id = engine_id(&config);
        Self { config, id }
    }
}

fn engine_id(config: &EngineConfig) -> String {
    format!(
        "bs-sim/{} ({}, dt={}s)",
        env!("CARGO_PKG_VERSION"),
        config.integrator.id(),
        config.dt_s
    )
}

impl ReferenceEngine {
    pub fn new(config: EngineConfig) -> SimResult<Self> {
        if !(config.dt_s.is_finite() && config.dt_s > 0.0) {
            return Err(SimError::InvalidArg {
                what: "dt_s must be positive",
            });
        }
        if !(config.max_step_duration_s.is_finite() && config.max_step_duration_s > 0.0) {
            return Err(SimError::InvalidArg {
                what: "max_step_duration_s must be positive",
            });
        }
        let id = engine_id(&config);
        Ok(Self { config, id })
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Run the whole protocol and return the recorded columns.
    pub fn simulate(
        &self,
        model: &dyn BatteryModel,
        values: &ParameterValues,
        protocol: &ExperimentProtocol,
        cancel: &CancelToken,
    ) -> SimResult<TabularSolution> {
        cancel.check()?;
        let features = model.features();
        let cell = CellParameters::from_values(values, features)?;
        let mut recorder = Recorder::new(features);
        let mut state = cell.initial_state();
        let mut t_offset = 0.0;

        for (index, step) in protocol.steps().iter().enumerate() {
            let law = CurrentLaw::for_step(step, &cell, index)?;
            let duration_s = step
                .duration
                .map(in_seconds)
                .unwrap_or(self.config.max_step_duration_s)
                .min(self.config.max_step_duration_s);

            let start_current = law.current(&cell, &state, index)?;
            let mut current_margins = margins(&cell, step, &state, start_current);
            if current_margins.terminated() {
                tracing::debug!(step = index, instruction = %step, "end condition holds at start; skipping");
                continue;
            }
            if recorder.is_empty() {
                recorder.push(&cell, 0.0, &state, start_current);
            }

            let mut step_model = StepModel {
                cell: &cell,
                law,
                index,
                start: state,
            };
            let mut x = step_model.initial_state();
            let mut elapsed = 0.0;

            while duration_s - elapsed > TIME_EPS_S {
                cancel.check()?;
                let dt = self.config.dt_s.min(duration_s - elapsed);
                let mut next = self.config.integrator.step(&mut step_model, elapsed, &x, dt)?;
                let mut taken = dt;
                let mut current = law.current(&cell, &next, index)?;
                let next_margins = margins(&cell, step, &next, current);

                let finished = next_margins.terminated();
                if finished {
                    let frac = current_margins.crossing_fraction(&next_margins);
                    taken = dt * frac;
                    next = self.config.integrator.step(&mut step_model, elapsed, &x, taken)?;
                    current = law.current(&cell, &next, index)?;
                }
                if !next.is_finite() || !current.is_finite() {
                    return Err(SimError::NonPhysical {
                        what: format!("non-finite state in step {index} at t={}", t_offset + elapsed),
                    });
                }

                elapsed += taken;
                x = next;
                if taken > TIME_EPS_S {
                    recorder.push(&cell, t_offset + elapsed, &x, current);
                }
                if finished {
                    tracing::debug!(step = index, elapsed_s = elapsed, "end condition reached");
                    break;
                }
                current_margins = next_margins;
            }

            state = x;
            t_offset += elapsed;
        }

        if recorder.is_empty() {
            recorder.push(&cell, 0.0, &state, 0.0);
        }
        Ok(recorder.finish())
    }
}

impl SolverEngine for ReferenceEngine {
    fn id(&self) -> &str {
        &self.id
    }

    fn solve(
        &self,
        model: &dyn BatteryModel,
        values: &ParameterValues,
        protocol: &ExperimentProtocol,
        cancel: &CancelToken,
    ) -> EngineResult<Box<dyn Solution>> {
        let solution = self.simulate(model, values, protocol, cancel)?;
        Ok(Box::new(solution))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bs_protocol::{ExperimentKnobs, ExperimentType, build};
    use bs_registry::Registry;

    fn run(chemistry: &str, model: &str, preset: &str, protocol: &ExperimentProtocol) -> TabularSolution {
        let registry = Registry::builtin();
        let model = registry.resolve_model(chemistry, model).unwrap().build();
        let values = registry.clone_parameter_set(chemistry, preset).unwrap();
        ReferenceEngine::default()
            .simulate(model.as_ref(), &values, protocol, &CancelToken::new())
            .unwrap()
    }

    #[test]
    fn invalid_config_is_rejected() {
        let config = EngineConfig {
            dt_s: 0.0,
            ..EngineConfig::default()
        };
        assert!(ReferenceEngine::new(config).is_err());
    }

    #[test]
    fn spm_omits_electrolyte_potential() {
        let protocol = build(ExperimentType::ConstantCurrent, &ExperimentKnobs::default()).unwrap();
        let solution = run("lithium-ion", "SPM", "Chen2020", &protocol);
        assert!(!solution.contains(ELECTROLYTE_POTENTIAL));
        assert!(solution.contains(NEGATIVE_SURFACE_CONCENTRATION));
    }

    #[test]
    fn lead_acid_omits_particle_concentrations() {
        let protocol = build(ExperimentType::ConstantCurrent, &ExperimentKnobs::default()).unwrap();
        let solution = run("lead-acid", "LOQS", "Sulzer2019", &protocol);
        assert!(solution.contains(ELECTROLYTE_POTENTIAL));
        assert!(!solution.contains(NEGATIVE_SURFACE_CONCENTRATION));
        assert!(!solution.contains(POSITIVE_SURFACE_CONCENTRATION));
    }

    #[test]
    fn discharge_stops_at_cutoff() {
        let knobs = ExperimentKnobs {
            c_rate: 2.0,
            duration_s: 1800.0,
            ..ExperimentKnobs::default()
        };
        let protocol = build(ExperimentType::ConstantCurrent, &knobs).unwrap();
        let solution = run("lithium-ion", "SPM", "Chen2020", &protocol);
        let time = solution.get(TIME).unwrap();
        let voltage = solution.get(TERMINAL_VOLTAGE).unwrap();
        let last_t = *time.last().unwrap();
        let last_v = *voltage.last().unwrap();
        assert!(last_t < 1800.0, "cut-off should end the step early, got {last_t}");
        assert!((last_v - 2.5).abs() < 0.01, "final voltage {last_v}");
        assert!(time.windows(2).all(|w| w[1] > w[0]));
    }

    #[test]
    fn full_cell_skips_charge_until_upper_cutoff() {
        let protocol = build(ExperimentType::Cccv, &ExperimentKnobs::default()).unwrap();
        let solution = run("lithium-ion", "SPMe", "Chen2020", &protocol);
        let time = solution.get(TIME).unwrap();
        // CC step skipped, CV hold runs the full hour.
        assert!((time.last().unwrap() - 3600.0).abs() < 1e-6);
        let current = solution.get(CURRENT).unwrap();
        assert!(current.iter().all(|i| i.abs() < 1e-9));
    }

    #[test]
    fn cancelled_token_stops_the_solve() {
        let registry = Registry::builtin();
        let model = registry.resolve_model("lithium-ion", "DFN").unwrap().build();
        let values = registry.clone_parameter_set("lithium-ion", "Chen2020").unwrap();
        let protocol = build(ExperimentType::ConstantCurrent, &ExperimentKnobs::default()).unwrap();
        let cancel = CancelToken::new();
        cancel.cancel();
        let err = ReferenceEngine::default()
            .simulate(model.as_ref(), &values, &protocol, &cancel)
            .unwrap_err();
        assert_eq!(err, SimError::Stopped(bs_solver::EngineError::Cancelled));
    }

    #[test]
    fn excessive_power_is_infeasible() {
        let registry = Registry::builtin();
        let model = registry.resolve_model("lithium-ion", "SPM").unwrap().build();
        let values = registry.clone_parameter_set("lithium-ion", "Chen2020").unwrap();
        let knobs = ExperimentKnobs {
            current_a: 1000.0,
            ..ExperimentKnobs::default()
        };
        let protocol = build(ExperimentType::PowerFunction, &knobs).unwrap();
        let err = ReferenceEngine::default()
            .simulate(model.as_ref(), &values, &protocol, &CancelToken::new())
            .unwrap_err();
        assert!(matches!(err, SimError::Infeasible { step: 0, .. }));
    }
}
