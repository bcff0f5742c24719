//! Parameter categories: presentation groups that merge into one flat map.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// A named grouping of parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ParameterCategory {
    Electrochemical,
    Electrolyte,
    Thermal,
    Physical,
    Operating,
}

impl ParameterCategory {
    pub const ALL: [ParameterCategory; 5] = [
        ParameterCategory::Electrochemical,
        ParameterCategory::Electrolyte,
        ParameterCategory::Thermal,
        ParameterCategory::Physical,
        ParameterCategory::Operating,
    ];

    pub fn id(self) -> &'static str {
        match self {
            ParameterCategory::Electrochemical => "electrochemical",
            ParameterCategory::Electrolyte => "electrolyte",
            ParameterCategory::Thermal => "thermal",
            ParameterCategory::Physical => "physical",
            ParameterCategory::Operating => "operating",
        }
    }

    /// Default parameter values of this category.
    pub fn defaults(self) -> &'static [(&'static str, f64)] {
        match self {
            ParameterCategory::Electrochemical => &ELECTROCHEMICAL,
            ParameterCategory::Electrolyte => &ELECTROLYTE,
            ParameterCategory::Thermal => &THERMAL,
            ParameterCategory::Physical => &PHYSICAL,
            ParameterCategory::Operating => &OPERATING,
        }
    }

    /// Category a parameter name belongs to, if it is one of the defaults.
    pub fn of(name: &str) -> Option<ParameterCategory> {
        Self::ALL
            .into_iter()
            .find(|category| category.defaults().iter().any(|(n, _)| *n == name))
    }
}

impl fmt::Display for ParameterCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

/// Merge grouped values into one flat map. Later groups win on name clashes.
pub fn merge_categories<'a, I, V>(groups: I) -> BTreeMap<String, V>
where
    I: IntoIterator<Item = &'a BTreeMap<String, V>>,
    V: Clone + 'a,
{
    let mut flat = BTreeMap::new();
    for group in groups {
        for (name, value) in group {
            flat.insert(name.clone(), value.clone());
        }
    }
    flat
}

/// All category defaults merged into the base template presets start from.
pub fn default_template() -> BTreeMap<String, f64> {
    let groups: Vec<BTreeMap<String, f64>> = ParameterCategory::ALL
        .into_iter()
        .map(|category| {
            category
                .defaults()
                .iter()
                .map(|(name, value)| ((*name).to_string(), *value))
                .collect()
        })
        .collect();
    merge_categories(&groups)
}

const ELECTROCHEMICAL: [(&str, f64); 21] = [
    ("Negative electrode thickness [m]", 1e-4),
    ("Positive electrode thickness [m]", 1e-4),
    ("Negative electrode porosity", 0.3),
    ("Positive electrode porosity", 0.3),
    ("Negative particle radius [m]", 1e-6),
    ("Positive particle radius [m]", 1e-6),
    ("Negative electrode conductivity [S.m-1]", 100.0),
    ("Positive electrode conductivity [S.m-1]", 10.0),
    ("Negative electrode diffusivity [m2.s-1]", 1e-14),
    ("Positive electrode diffusivity [m2.s-1]", 1e-15),
    ("Negative electrode OCP [V]", 0.1),
    ("Positive electrode OCP [V]", 4.2),
    ("Negative electrode exchange current density [A.m-2]", 5.0),
    ("Positive electrode exchange current density [A.m-2]", 1.0),
    ("SEI resistivity [Ohm.m]", 0.0001),
    ("SEI thickness [m]", 2.5e-9),
    ("Open-circuit voltage at 0% SOC [V]", 2.4),
    ("Open-circuit voltage at 100% SOC [V]", 4.2),
    ("Maximum concentration in negative electrode [mol.m-3]", 33133.0),
    ("Maximum concentration in positive electrode [mol.m-3]", 63104.0),
    ("Contact resistance [Ohm]", 0.01),
];

const ELECTROLYTE: [(&str, f64); 7] = [
    ("Electrolyte conductivity [S.m-1]", 1.2),
    ("Electrolyte diffusivity [m2.s-1]", 2e-10),
    ("Electrolyte transference number", 0.2594),
    ("Initial electrolyte concentration [mol.m-3]", 1000.0),
    ("Separator thickness [m]", 2.5e-5),
    ("Separator porosity", 0.47),
    ("Separator tortuosity", 1.5),
];

const THERMAL: [(&str, f64); 11] = [
    ("Total heat transfer coefficient [W.m-2.K-1]", 10.0),
    ("Ambient temperature [K]", 298.15),
    ("Negative electrode thermal conductivity [W.m-1.K-1]", 1.7),
    ("Positive electrode thermal conductivity [W.m-1.K-1]", 2.1),
    ("Electrolyte thermal conductivity [W.m-1.K-1]", 0.6),
    ("Negative electrode heat capacity [J.kg-1.K-1]", 700.0),
    ("Positive electrode heat capacity [J.kg-1.K-1]", 700.0),
    ("Electrolyte heat capacity [J.kg-1.K-1]", 2055.0),
    ("Negative electrode density [kg.m-3]", 1800.0),
    ("Positive electrode density [kg.m-3]", 5010.0),
    ("Electrolyte density [kg.m-3]", 1200.0),
];

const PHYSICAL: [(&str, f64); 10] = [
    ("Electrode width [m]", 0.065),
    ("Electrode height [m]", 0.1016),
    ("Cell cooling surface area [m2]", 0.00531),
    ("Cell volume [m3]", 2.42e-6),
    ("Number of electrode pairs connected in parallel", 1.0),
    ("Negative current collector thickness [m]", 1.2e-5),
    ("Positive current collector thickness [m]", 1.6e-5),
    ("Negative current collector conductivity [S.m-1]", 5.96e7),
    ("Positive current collector conductivity [S.m-1]", 3.55e7),
    ("Nominal cell capacity [A.h]", 0.68),
];

const OPERATING: [(&str, f64); 9] = [
    ("C-rate", 1.0),
    ("Simulation duration [s]", 3600.0),
    ("Maximum voltage [V]", 4.2),
    ("Minimum voltage [V]", 2.5),
    ("Initial SOC", 1.0),
    ("Operating current [A]", 1.0),
    ("Rest time [s]", 300.0),
    ("Lower voltage cut-off [V]", 2.5),
    ("Upper voltage cut-off [V]", 4.2),
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn template_contains_every_category_default() {
        let template = default_template();
        let total: usize = ParameterCategory::ALL
            .iter()
            .map(|c| c.defaults().len())
            .sum();
        assert_eq!(template.len(), total, "category names must not collide");
        assert_eq!(template["Ambient temperature [K]"], 298.15);
        assert_eq!(template["C-rate"], 1.0);
    }

    #[test]
    fn category_lookup() {
        assert_eq!(
            ParameterCategory::of("Separator porosity"),
            Some(ParameterCategory::Electrolyte)
        );
        assert_eq!(
            ParameterCategory::of("Initial SOC"),
            Some(ParameterCategory::Operating)
        );
        assert_eq!(ParameterCategory::of("Not a parameter"), None);
    }

    #[test]
    fn merge_later_groups_win() {
        let a: BTreeMap<String, f64> = [("x".to_string(), 1.0)].into_iter().collect();
        let b: BTreeMap<String, f64> = [("x".to_string(), 2.0), ("y".to_string(), 3.0)]
            .into_iter()
            .collect();
        let merged = merge_categories([&a, &b]);
        assert_eq!(merged["x"], 2.0);
        assert_eq!(merged["y"], 3.0);
    }
}
