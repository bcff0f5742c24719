//! Known numeric bounds for user-facing parameters.

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bound {
    pub name: &'static str,
    pub min: f64,
    pub max: f64,
}

impl Bound {
    pub fn contains(&self, value: f64) -> bool {
        value >= self.min && value <= self.max
    }

    pub fn clamp(&self, value: f64) -> f64 {
        value.clamp(self.min, self.max)
    }
}

const BOUNDS: [Bound; 9] = [
    Bound {
        name: "C-rate",
        min: 0.01,
        max: 20.0,
    },
    Bound {
        name: "Ambient temperature [K]",
        min: 250.0,
        max: 400.0,
    },
    Bound {
        name: "Simulation duration [s]",
        min: 1.0,
        max: 86400.0,
    },
    Bound {
        name: "Negative electrode thickness [m]",
        min: 1e-6,
        max: 1e-2,
    },
    Bound {
        name: "Positive electrode thickness [m]",
        min: 1e-6,
        max: 1e-2,
    },
    Bound {
        name: "Negative electrode porosity",
        min: 0.01,
        max: 0.99,
    },
    Bound {
        name: "Positive electrode porosity",
        min: 0.01,
        max: 0.99,
    },
    Bound {
        name: "Electrolyte conductivity [S.m-1]",
        min: 0.001,
        max: 100.0,
    },
    Bound {
        name: "Total heat transfer coefficient [W.m-2.K-1]",
        min: 0.1,
        max: 1000.0,
    },
];

pub fn bounds() -> &'static [Bound] {
    &BOUNDS
}

pub fn bound_for(name: &str) -> Option<&'static Bound> {
    BOUNDS.iter().find(|bound| bound.name == name)
}
