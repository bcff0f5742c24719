//! Saved request templates and named custom parameter sets.
//!
//! Entries live in `<root>/templates/<name>.json` and
//! `<root>/parameter_sets/<name>.json`.

use crate::{ResultsError, ResultsResult};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

const TEMPLATES_DIR: &str = "templates";
const PARAMETER_SETS_DIR: &str = "parameter_sets";
const MAX_NAME_LEN: usize = 64;

/// A reusable simulation request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationTemplate {
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub battery_type: String,
    pub model: String,
    pub parameter_set: String,
    pub experiment_type: String,
    /// Raw overrides, validated again whenever the template runs.
    #[serde(default)]
    pub parameters: BTreeMap<String, Value>,
    #[serde(default)]
    pub created_at: String,
}

/// A named preset: a built-in parameter set plus custom values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CustomParameterSet {
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub battery_type: String,
    pub base_parameter_set: String,
    #[serde(default)]
    pub custom_parameters: BTreeMap<String, f64>,
    #[serde(default)]
    pub created_at: String,
}

/// True for names usable as file stems: 1 to 64 ASCII letters, digits,
/// `-` or `_`, starting with a letter or digit.
pub fn is_entry_name(name: &str) -> bool {
    let mut chars = name.chars();
    let Some(first) = chars.next() else {
        return false;
    };
    name.len() <= MAX_NAME_LEN
        && first.is_ascii_alphanumeric()
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
}

#[derive(Debug, Clone)]
pub struct LibraryStore {
    root_dir: PathBuf,
}

impl LibraryStore {
    pub fn new(root_dir: PathBuf) -> ResultsResult<Self> {
        for dir in [TEMPLATES_DIR, PARAMETER_SETS_DIR] {
            fs::create_dir_all(root_dir.join(dir))?;
        }
        Ok(Self { root_dir })
    }

    pub fn root_dir(&self) -> &Path {
        &self.root_dir
    }

    fn entry_path(&self, dir: &str, name: &str) -> ResultsResult<PathBuf> {
        if !is_entry_name(name) {
            return Err(ResultsError::InvalidName {
                name: name.to_string(),
            });
        }
        Ok(self.root_dir.join(dir).join(format!("{name}.json")))
    }

    fn save<T: Serialize>(&self, dir: &str, name: &str, entry: &T) -> ResultsResult<()> {
        let path = self.entry_path(dir, name)?;
        fs::write(path, serde_json::to_string_pretty(entry)?)?;
        tracing::debug!(kind = dir, name, "library entry saved");
        Ok(())
    }

    fn load<T: DeserializeOwned>(&self, dir: &'static str, name: &str) -> ResultsResult<T> {
        let path = self.entry_path(dir, name)?;
        if !path.exists() {
            return Err(ResultsError::EntryNotFound {
                kind: dir,
                name: name.to_string(),
            });
        }
        let content = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&content)?)
    }

    /// Entries sorted by name. Unreadable files are skipped.
    fn list<T: DeserializeOwned>(&self, dir: &'static str) -> ResultsResult<Vec<T>> {
        let root = self.root_dir.join(dir);
        if !root.exists() {
            return Ok(Vec::new());
        }

        let mut names = Vec::new();
        for entry in fs::read_dir(&root)? {
            let path = entry?.path();
            if path.extension().and_then(|e| e.to_str()) != Some("json") {
                continue;
            }
            if let Some(stem) = path.file_stem().and_then(|s| s.to_str())
                && is_entry_name(stem)
            {
                names.push(stem.to_string());
            }
        }
        names.sort();

        let mut entries = Vec::with_capacity(names.len());
        for name in names {
            match self.load(dir, &name) {
                Ok(entry) => entries.push(entry),
                Err(e) => tracing::warn!(kind = dir, %name, error = %e, "skipping unreadable entry"),
            }
        }
        Ok(entries)
    }

    fn delete(&self, dir: &'static str, name: &str) -> ResultsResult<()> {
        let path = self.entry_path(dir, name)?;
        if !path.exists() {
            return Err(ResultsError::EntryNotFound {
                kind: dir,
                name: name.to_string(),
            });
        }
        fs::remove_file(path)?;
        Ok(())
    }

    pub fn save_template(&self, template: &SimulationTemplate) -> ResultsResult<()> {
        self.save(TEMPLATES_DIR, &template.name, template)
    }

    pub fn load_template(&self, name: &str) -> ResultsResult<SimulationTemplate> {
        self.load(TEMPLATES_DIR, name)
    }

    pub fn list_templates(&self) -> ResultsResult<Vec<SimulationTemplate>> {
        self.list(TEMPLATES_DIR)
    }

    pub fn delete_template(&self, name: &str) -> ResultsResult<()> {
        self.delete(TEMPLATES_DIR, name)
    }

    pub fn save_parameter_set(&self, set: &CustomParameterSet) -> ResultsResult<()> {
        self.save(PARAMETER_SETS_DIR, &set.name, set)
    }

    pub fn load_parameter_set(&self, name: &str) -> ResultsResult<CustomParameterSet> {
        self.load(PARAMETER_SETS_DIR, name)
    }

    pub fn has_parameter_set(&self, name: &str) -> bool {
        self.entry_path(PARAMETER_SETS_DIR, name)
            .is_ok_and(|path| path.exists())
    }

    pub fn list_parameter_sets(&self) -> ResultsResult<Vec<CustomParameterSet>> {
        self.list(PARAMETER_SETS_DIR)
    }

    pub fn delete_parameter_set(&self, name: &str) -> ResultsResult<()> {
        self.delete(PARAMETER_SETS_DIR, name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn library(name: &str) -> LibraryStore {
        let dir = std::env::temp_dir().join(name);
        let _ = fs::remove_dir_all(&dir);
        LibraryStore::new(dir).unwrap()
    }

    fn template(name: &str) -> SimulationTemplate {
        SimulationTemplate {
            name: name.to_string(),
            description: "fast discharge".to_string(),
            battery_type: "lithium-ion".to_string(),
            model: "DFN".to_string(),
            parameter_set: "Chen2020".to_string(),
            experiment_type: "constant_current".to_string(),
            parameters: BTreeMap::from([("C-rate".to_string(), json!(2))]),
            created_at: String::new(),
        }
    }

    #[test]
    fn entry_names() {
        assert!(is_entry_name("fast-2C_v1"));
        assert!(!is_entry_name(""));
        assert!(!is_entry_name("-leading"));
        assert!(!is_entry_name("../escape"));
        assert!(!is_entry_name("with space"));
        assert!(!is_entry_name(&"a".repeat(65)));
    }

    #[test]
    fn templates_save_list_and_delete() {
        let library = library("bs_results_library_templates");
        library.save_template(&template("zeta")).unwrap();
        library.save_template(&template("alpha")).unwrap();
        fs::write(library.root_dir().join(TEMPLATES_DIR).join("broken.json"), "{").unwrap();

        assert_eq!(library.load_template("alpha").unwrap(), template("alpha"));
        let names: Vec<_> = library
            .list_templates()
            .unwrap()
            .into_iter()
            .map(|t| t.name)
            .collect();
        assert_eq!(names, vec!["alpha", "zeta"]);

        library.delete_template("zeta").unwrap();
        assert!(matches!(
            library.load_template("zeta"),
            Err(ResultsError::EntryNotFound { .. })
        ));
        assert!(library.delete_template("zeta").is_err());
    }

    #[test]
    fn parameter_sets_round_trip() {
        let library = library("bs_results_library_sets");
        let set = CustomParameterSet {
            name: "hot-chen".to_string(),
            description: String::new(),
            battery_type: "lithium-ion".to_string(),
            base_parameter_set: "Chen2020".to_string(),
            custom_parameters: BTreeMap::from([("Ambient temperature [K]".to_string(), 318.15)]),
            created_at: String::new(),
        };
        assert!(!library.has_parameter_set("hot-chen"));
        library.save_parameter_set(&set).unwrap();
        assert!(library.has_parameter_set("hot-chen"));
        assert_eq!(library.load_parameter_set("hot-chen").unwrap(), set);
        assert_eq!(library.list_parameter_sets().unwrap(), vec![set]);
    }

    #[test]
    fn invalid_names_are_rejected_before_io() {
        let library = library("bs_results_library_names");
        assert!(matches!(
            library.save_template(&template("../../outside")),
            Err(ResultsError::InvalidName { .. })
        ));
        assert!(matches!(
            library.load_parameter_set("/etc/passwd"),
            Err(ResultsError::InvalidName { .. })
        ));
        assert!(!library.has_parameter_set(".."));
    }
}
