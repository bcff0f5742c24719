use crate::chemistry::Chemistry;
use crate::model::{ModelKind, ModelOptions};
use crate::names::*;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ModelCatalogEntry {
    pub chemistry: Chemistry,
    pub kind: ModelKind,
    pub options: ModelOptions,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PresetCatalogEntry {
    pub chemistry: Chemistry,
    pub key: &'static str,
    pub description: &'static str,
    pub values: &'static [(&'static str, f64)],
}

const fn standard(chemistry: Chemistry, kind: ModelKind) -> ModelCatalogEntry {
    ModelCatalogEntry {
        chemistry,
        kind,
        options: ModelOptions::STANDARD,
    }
}

const MODEL_CATALOG: [ModelCatalogEntry; 12] = [
    standard(Chemistry::LithiumIon, ModelKind::Spm),
    standard(Chemistry::LithiumIon, ModelKind::Spme),
    standard(Chemistry::LithiumIon, ModelKind::Dfn),
    standard(Chemistry::LithiumIon, ModelKind::Mpm),
    standard(Chemistry::LithiumIon, ModelKind::Msmr),
    standard(Chemistry::LeadAcid, ModelKind::Loqs),
    standard(Chemistry::LeadAcid, ModelKind::Composite),
    standard(Chemistry::LeadAcid, ModelKind::Full),
    ModelCatalogEntry {
        chemistry: Chemistry::SodiumIon,
        kind: ModelKind::Spm,
        options: ModelOptions::SODIUM,
    },
    ModelCatalogEntry {
        chemistry: Chemistry::SodiumIon,
        kind: ModelKind::Dfn,
        options: ModelOptions::SODIUM,
    },
    ModelCatalogEntry {
        chemistry: Chemistry::LithiumMetal,
        kind: ModelKind::Spm,
        options: ModelOptions::REVERSIBLE_PLATING,
    },
    ModelCatalogEntry {
        chemistry: Chemistry::LithiumMetal,
        kind: ModelKind::Dfn,
        options: ModelOptions::REVERSIBLE_PLATING,
    },
];

// LG M50 21700 (NMC811 / graphite-SiOx).
const CHEN_2020: [(&str, f64); 17] = [
    (NOMINAL_CAPACITY_AH, 5.0),
    (LOWER_CUTOFF_V, 2.5),
    (UPPER_CUTOFF_V, 4.2),
    (OCV_EMPTY_V, 2.4),
    (OCV_FULL_V, 4.2),
    (CONTACT_RESISTANCE_OHM, 0.015),
    (NEG_THICKNESS_M, 8.52e-5),
    (POS_THICKNESS_M, 7.56e-5),
    (SEP_THICKNESS_M, 1.2e-5),
    (NEG_POROSITY, 0.25),
    (POS_POROSITY, 0.335),
    (ELECTROLYTE_CONDUCTIVITY, 0.95),
    (ELECTRODE_WIDTH_M, 1.58),
    (ELECTRODE_HEIGHT_M, 0.065),
    (NEG_MAX_CONCENTRATION, 33133.0),
    (POS_MAX_CONCENTRATION, 63104.0),
    (CELL_VOLUME_M3, 2.42e-5),
];

// Kokam SLPB 75106100 (LCO / graphite).
const MARQUIS_2019: [(&str, f64); 12] = [
    (NOMINAL_CAPACITY_AH, 0.68),
    (LOWER_CUTOFF_V, 3.105),
    (UPPER_CUTOFF_V, 4.1),
    (OCV_EMPTY_V, 3.0),
    (OCV_FULL_V, 4.1),
    (CONTACT_RESISTANCE_OHM, 0.03),
    (NEG_THICKNESS_M, 1e-4),
    (POS_THICKNESS_M, 1e-4),
    (ELECTRODE_WIDTH_M, 0.207),
    (ELECTRODE_HEIGHT_M, 0.137),
    (NEG_MAX_CONCENTRATION, 24983.2619938437),
    (POS_MAX_CONCENTRATION, 51217.9257309275),
];

// NMC532 / graphite pouch cell.
const MOHTAT_2020: [(&str, f64); 9] = [
    (NOMINAL_CAPACITY_AH, 5.0),
    (LOWER_CUTOFF_V, 2.8),
    (UPPER_CUTOFF_V, 4.2),
    (OCV_EMPTY_V, 2.7),
    (OCV_FULL_V, 4.2),
    (CONTACT_RESISTANCE_OHM, 0.012),
    (NEG_MAX_CONCENTRATION, 28746.0),
    (POS_MAX_CONCENTRATION, 35380.0),
    (ELECTRODE_WIDTH_M, 1.0),
];

// Enertech LCO / graphite pouch cell.
const AI_2020: [(&str, f64); 8] = [
    (NOMINAL_CAPACITY_AH, 2.28),
    (LOWER_CUTOFF_V, 3.0),
    (UPPER_CUTOFF_V, 4.2),
    (OCV_EMPTY_V, 2.9),
    (OCV_FULL_V, 4.2),
    (CONTACT_RESISTANCE_OHM, 0.02),
    (NEG_MAX_CONCENTRATION, 28700.0),
    (POS_MAX_CONCENTRATION, 49943.0),
];

// Kokam SLPB 75106100 (NMC / graphite), high-power cell.
const ECKER_2015: [(&str, f64); 8] = [
    (NOMINAL_CAPACITY_AH, 0.15625),
    (LOWER_CUTOFF_V, 2.5),
    (UPPER_CUTOFF_V, 4.2),
    (OCV_EMPTY_V, 2.4),
    (OCV_FULL_V, 4.2),
    (CONTACT_RESISTANCE_OHM, 0.05),
    (NEG_MAX_CONCENTRATION, 31920.0),
    (POS_MAX_CONCENTRATION, 48580.0),
];

// LG M50 with SEI growth and plating degradation parameters.
const OKANE_2022: [(&str, f64); 12] = [
    (NOMINAL_CAPACITY_AH, 5.0),
    (LOWER_CUTOFF_V, 2.5),
    (UPPER_CUTOFF_V, 4.2),
    (OCV_EMPTY_V, 2.4),
    (OCV_FULL_V, 4.2),
    (CONTACT_RESISTANCE_OHM, 0.018),
    (NEG_THICKNESS_M, 8.52e-5),
    (POS_THICKNESS_M, 7.56e-5),
    (SEI_THICKNESS_M, 5e-9),
    (NEG_MAX_CONCENTRATION, 32544.0),
    (POS_MAX_CONCENTRATION, 63104.0),
    (ELECTRODE_WIDTH_M, 1.58),
];

// A123 LFP / graphite cylindrical cell.
const PRADA_2013: [(&str, f64); 8] = [
    (NOMINAL_CAPACITY_AH, 2.3),
    (LOWER_CUTOFF_V, 2.0),
    (UPPER_CUTOFF_V, 3.6),
    (OCV_EMPTY_V, 2.0),
    (OCV_FULL_V, 3.5),
    (CONTACT_RESISTANCE_OHM, 0.01),
    (NEG_MAX_CONCENTRATION, 30555.0),
    (POS_MAX_CONCENTRATION, 22806.0),
];

// Single lead-acid cell (BBOXX).
const SULZER_2019: [(&str, f64); 7] = [
    (NOMINAL_CAPACITY_AH, 17.0),
    (LOWER_CUTOFF_V, 1.73),
    (UPPER_CUTOFF_V, 2.42),
    (OCV_EMPTY_V, 1.7),
    (OCV_FULL_V, 2.15),
    (CONTACT_RESISTANCE_OHM, 0.005),
    (ELECTROLYTE_CONDUCTIVITY, 80.0),
];

const QUARTI_2020: [(&str, f64); 7] = [
    (NOMINAL_CAPACITY_AH, 20.0),
    (LOWER_CUTOFF_V, 1.75),
    (UPPER_CUTOFF_V, 2.45),
    (OCV_EMPTY_V, 1.72),
    (OCV_FULL_V, 2.14),
    (CONTACT_RESISTANCE_OHM, 0.004),
    (ELECTROLYTE_CONDUCTIVITY, 75.0),
];

// Hard carbon / layered oxide sodium-ion cell.
const PALMER_2015: [(&str, f64); 8] = [
    (NOMINAL_CAPACITY_AH, 3.0),
    (LOWER_CUTOFF_V, 2.0),
    (UPPER_CUTOFF_V, 4.0),
    (OCV_EMPTY_V, 1.9),
    (OCV_FULL_V, 4.0),
    (CONTACT_RESISTANCE_OHM, 0.02),
    (NEG_MAX_CONCENTRATION, 14540.0),
    (POS_MAX_CONCENTRATION, 15320.0),
];

const PRESET_CATALOG: [PresetCatalogEntry; 11] = [
    PresetCatalogEntry {
        chemistry: Chemistry::LithiumIon,
        key: "Chen2020",
        description: "LG M50 NMC811/graphite-SiOx cylindrical cell",
        values: &CHEN_2020,
    },
    PresetCatalogEntry {
        chemistry: Chemistry::LithiumIon,
        key: "Marquis2019",
        description: "Kokam LCO/graphite pouch cell",
        values: &MARQUIS_2019,
    },
    PresetCatalogEntry {
        chemistry: Chemistry::LithiumIon,
        key: "Mohtat2020",
        description: "NMC532/graphite pouch cell",
        values: &MOHTAT_2020,
    },
    PresetCatalogEntry {
        chemistry: Chemistry::LithiumIon,
        key: "Ai2020",
        description: "Enertech LCO/graphite pouch cell",
        values: &AI_2020,
    },
    PresetCatalogEntry {
        chemistry: Chemistry::LithiumIon,
        key: "Ecker2015",
        description: "Kokam NMC/graphite high-power pouch cell",
        values: &ECKER_2015,
    },
    PresetCatalogEntry {
        chemistry: Chemistry::LithiumIon,
        key: "OKane2022",
        description: "LG M50 with SEI growth and plating parameters",
        values: &OKANE_2022,
    },
    PresetCatalogEntry {
        chemistry: Chemistry::LithiumIon,
        key: "Prada2013",
        description: "A123 LFP/graphite cylindrical cell",
        values: &PRADA_2013,
    },
    PresetCatalogEntry {
        chemistry: Chemistry::LeadAcid,
        key: "Sulzer2019",
        description: "Single lead-acid cell",
        values: &SULZER_2019,
    },
    PresetCatalogEntry {
        chemistry: Chemistry::LeadAcid,
        key: "Quarti2020",
        description: "Flooded lead-acid cell",
        values: &QUARTI_2020,
    },
    PresetCatalogEntry {
        chemistry: Chemistry::SodiumIon,
        key: "Palmer2015",
        description: "Hard carbon/layered oxide sodium-ion cell",
        values: &PALMER_2015,
    },
    PresetCatalogEntry {
        chemistry: Chemistry::LithiumMetal,
        key: "OKane2022",
        description: "Lithium-metal anode with reversible plating",
        values: &OKANE_2022,
    },
];

pub fn model_catalog() -> &'static [ModelCatalogEntry] {
    &MODEL_CATALOG
}

pub fn preset_catalog() -> &'static [PresetCatalogEntry] {
    &PRESET_CATALOG
}

pub fn models_for(chemistry: Chemistry) -> impl Iterator<Item = &'static ModelCatalogEntry> {
    MODEL_CATALOG
        .iter()
        .filter(move |entry| entry.chemistry == chemistry)
}

pub fn presets_for(chemistry: Chemistry) -> impl Iterator<Item = &'static PresetCatalogEntry> {
    PRESET_CATALOG
        .iter()
        .filter(move |entry| entry.chemistry == chemistry)
}
