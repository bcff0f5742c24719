//! bs-params: override coercion and bounds clamping.

pub mod bounds;
pub mod error;
pub mod validate;

pub use bounds::{Bound, bound_for, bounds};
pub use error::{ValidationError, ValidationResult};
pub use validate::{ParameterOverrides, coerce_value, validate};
