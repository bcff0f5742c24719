//! TransientModel trait for fixed-step integration.

use crate::error::SimResult;

/// A dynamic system `dx/dt = f(t, x)` with vector-space state arithmetic.
pub trait TransientModel {
    type State: Clone;

    fn initial_state(&self) -> Self::State;

    /// State derivative at `(t, x)`.
    fn rhs(&mut self, t: f64, x: &Self::State) -> SimResult<Self::State>;

    fn add(&self, a: &Self::State, b: &Self::State) -> Self::State;

    fn scale(&self, a: &Self::State, scale: f64) -> Self::State;
}
