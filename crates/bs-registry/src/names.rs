//! Canonical parameter names. Units are part of the name.

pub const NOMINAL_CAPACITY_AH: &str = "Nominal cell capacity [A.h]";
pub const INITIAL_SOC: &str = "Initial SOC";
pub const OCV_EMPTY_V: &str = "Open-circuit voltage at 0% SOC [V]";
pub const OCV_FULL_V: &str = "Open-circuit voltage at 100% SOC [V]";
pub const LOWER_CUTOFF_V: &str = "Lower voltage cut-off [V]";
pub const UPPER_CUTOFF_V: &str = "Upper voltage cut-off [V]";
pub const CONTACT_RESISTANCE_OHM: &str = "Contact resistance [Ohm]";

pub const NEG_THICKNESS_M: &str = "Negative electrode thickness [m]";
pub const POS_THICKNESS_M: &str = "Positive electrode thickness [m]";
pub const SEP_THICKNESS_M: &str = "Separator thickness [m]";
pub const NEG_POROSITY: &str = "Negative electrode porosity";
pub const POS_POROSITY: &str = "Positive electrode porosity";
pub const NEG_OCP_V: &str = "Negative electrode OCP [V]";
pub const NEG_MAX_CONCENTRATION: &str = "Maximum concentration in negative electrode [mol.m-3]";
pub const POS_MAX_CONCENTRATION: &str = "Maximum concentration in positive electrode [mol.m-3]";
pub const SEI_RESISTIVITY: &str = "SEI resistivity [Ohm.m]";
pub const SEI_THICKNESS_M: &str = "SEI thickness [m]";

pub const ELECTROLYTE_CONDUCTIVITY: &str = "Electrolyte conductivity [S.m-1]";

pub const AMBIENT_TEMPERATURE_K: &str = "Ambient temperature [K]";
pub const HEAT_TRANSFER_COEFFICIENT: &str = "Total heat transfer coefficient [W.m-2.K-1]";
pub const POS_DENSITY: &str = "Positive electrode density [kg.m-3]";
pub const POS_HEAT_CAPACITY: &str = "Positive electrode heat capacity [J.kg-1.K-1]";

pub const ELECTRODE_WIDTH_M: &str = "Electrode width [m]";
pub const ELECTRODE_HEIGHT_M: &str = "Electrode height [m]";
pub const COOLING_AREA_M2: &str = "Cell cooling surface area [m2]";
pub const CELL_VOLUME_M3: &str = "Cell volume [m3]";
pub const ELECTRODE_PAIRS: &str = "Number of electrode pairs connected in parallel";
