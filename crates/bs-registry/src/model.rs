//! Electrochemical model variants and their factories.

use crate::chemistry::Chemistry;
use serde::Serialize;
use std::fmt;

/// Electrochemical model variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ModelKind {
    Spm,
    Spme,
    Dfn,
    Mpm,
    Msmr,
    Loqs,
    Composite,
    Full,
}

impl ModelKind {
    /// Registry key, e.g. `"SPMe"`.
    pub fn key(self) -> &'static str {
        match self {
            ModelKind::Spm => "SPM",
            ModelKind::Spme => "SPMe",
            ModelKind::Dfn => "DFN",
            ModelKind::Mpm => "MPM",
            ModelKind::Msmr => "MSMR",
            ModelKind::Loqs => "LOQS",
            ModelKind::Composite => "Composite",
            ModelKind::Full => "Full",
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            ModelKind::Spm => "Single Particle Model",
            ModelKind::Spme => "Single Particle Model with Electrolyte",
            ModelKind::Dfn => "Doyle-Fuller-Newman Model",
            ModelKind::Mpm => "Many Particle Model",
            ModelKind::Msmr => "Multi-Species Multi-Reaction Model",
            ModelKind::Loqs => "Leading-Order Quasi-Static Model",
            ModelKind::Composite => "Composite Model",
            ModelKind::Full => "Full Porous Electrode Model",
        }
    }

    /// Which internal states this model variant resolves.
    pub fn features(self) -> ModelFeatures {
        match self {
            ModelKind::Spm => ModelFeatures {
                electrolyte: false,
                particles: true,
            },
            ModelKind::Spme | ModelKind::Dfn | ModelKind::Mpm | ModelKind::Msmr => ModelFeatures {
                electrolyte: true,
                particles: true,
            },
            ModelKind::Loqs | ModelKind::Composite | ModelKind::Full => ModelFeatures {
                electrolyte: true,
                particles: false,
            },
        }
    }
}

impl fmt::Display for ModelKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// Ion shuttled between the electrodes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum WorkingIon {
    #[default]
    Lithium,
    Sodium,
}

/// Lithium plating side reaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PlatingMode {
    #[default]
    None,
    Reversible,
}

/// Chemistry-specific construction options, fixed at registration time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
pub struct ModelOptions {
    pub working_ion: WorkingIon,
    pub lithium_plating: PlatingMode,
}

impl ModelOptions {
    pub const STANDARD: ModelOptions = ModelOptions {
        working_ion: WorkingIon::Lithium,
        lithium_plating: PlatingMode::None,
    };

    pub const SODIUM: ModelOptions = ModelOptions {
        working_ion: WorkingIon::Sodium,
        lithium_plating: PlatingMode::None,
    };

    pub const REVERSIBLE_PLATING: ModelOptions = ModelOptions {
        working_ion: WorkingIon::Lithium,
        lithium_plating: PlatingMode::Reversible,
    };

    pub fn is_standard(&self) -> bool {
        *self == Self::STANDARD
    }
}

/// Internal states a model resolves, and therefore which outputs it can offer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ModelFeatures {
    /// Electrolyte concentration/potential is part of the model.
    pub electrolyte: bool,
    /// Electrode particles (and their surface concentration) are resolved.
    pub particles: bool,
}

/// A solver-ready model instance.
///
/// Engines receive this capability instead of a concrete type so that
/// alternative model catalogs can be plugged in.
pub trait BatteryModel: Send + Sync + fmt::Debug {
    /// Registry key of the model variant.
    fn key(&self) -> &'static str;

    fn chemistry(&self) -> Chemistry;

    fn options(&self) -> ModelOptions;

    fn features(&self) -> ModelFeatures;

    /// Human-readable name (for logs and diagnostics).
    fn name(&self) -> String {
        let options = self.options();
        if options.is_standard() {
            format!("{} ({})", self.key(), self.chemistry())
        } else {
            format!(
                "{} ({}, working ion {:?}, plating {:?})",
                self.key(),
                self.chemistry(),
                options.working_ion,
                options.lithium_plating
            )
        }
    }
}

/// Model built from a registry entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ElectrochemicalModel {
    pub chemistry: Chemistry,
    pub kind: ModelKind,
    pub options: ModelOptions,
}

impl BatteryModel for ElectrochemicalModel {
    fn key(&self) -> &'static str {
        self.kind.key()
    }

    fn chemistry(&self) -> Chemistry {
        self.chemistry
    }

    fn options(&self) -> ModelOptions {
        self.options
    }

    fn features(&self) -> ModelFeatures {
        self.kind.features()
    }
}

/// Factory for one (chemistry, model) registry entry.
///
/// Construction is total: every option is already decided here.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ModelFactory {
    pub chemistry: Chemistry,
    pub kind: ModelKind,
    pub options: ModelOptions,
}

impl ModelFactory {
    pub const fn new(chemistry: Chemistry, kind: ModelKind, options: ModelOptions) -> Self {
        Self {
            chemistry,
            kind,
            options,
        }
    }

    pub fn key(&self) -> &'static str {
        self.kind.key()
    }

    pub fn build(&self) -> Box<dyn BatteryModel> {
        Box::new(ElectrochemicalModel {
            chemistry: self.chemistry,
            kind: self.kind,
            options: self.options,
        })
    }
}
