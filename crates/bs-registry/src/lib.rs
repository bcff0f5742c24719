//! bs-registry: battery chemistries, electrochemical models, and parameter presets.
//!
//! Provides:
//! - The static catalog of supported (chemistry, model) pairs and presets
//! - Parameter categories and canonical parameter names
//! - A read-only [`Registry`] that resolves request identifiers into fresh
//!   model instances and request-local parameter values

pub mod catalog;
pub mod category;
pub mod chemistry;
pub mod error;
pub mod model;
pub mod names;
pub mod preset;
pub mod registry;

pub use catalog::{ModelCatalogEntry, PresetCatalogEntry, model_catalog, preset_catalog};
pub use category::{ParameterCategory, default_template, merge_categories};
pub use chemistry::Chemistry;
pub use error::{RegistryError, RegistryResult};
pub use model::{
    BatteryModel, ElectrochemicalModel, ModelFactory, ModelFeatures, ModelKind, ModelOptions,
    PlatingMode, WorkingIon,
};
pub use preset::{ParameterSet, ParameterValues};
pub use registry::{ChemistryProfile, Registry};
