//! Solver variable names shared by engines and the result normalizer.

pub const TIME: &str = "Time [s]";
pub const TERMINAL_VOLTAGE: &str = "Terminal voltage [V]";
pub const CURRENT: &str = "Current [A]";
pub const DISCHARGE_CAPACITY: &str = "Discharge capacity [A.h]";

pub const CELL_TEMPERATURE: &str = "X-averaged cell temperature [K]";
pub const TERMINAL_POWER: &str = "Terminal power [W]";
pub const TERMINAL_RESISTANCE: &str = "Terminal resistance [Ohm]";
pub const ELECTROLYTE_POTENTIAL: &str = "X-averaged electrolyte potential [V]";
pub const NEGATIVE_POTENTIAL: &str = "X-averaged negative electrode potential [V]";
pub const POSITIVE_POTENTIAL: &str = "X-averaged positive electrode potential [V]";
pub const NEGATIVE_SURFACE_CONCENTRATION: &str =
    "X-averaged negative particle surface concentration [mol.m-3]";
pub const POSITIVE_SURFACE_CONCENTRATION: &str =
    "X-averaged positive particle surface concentration [mol.m-3]";
