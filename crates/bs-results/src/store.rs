//! Run storage API.
//!
//! Each run lives in `<root>/<run_id>/` with a `manifest.json` and, when the
//! solve produced one, a `result.json`.

use crate::hash::is_run_id;
use crate::types::{RunManifest, SimulationResult};
use crate::{ResultsError, ResultsResult};
use chrono::{DateTime, Utc};
use std::fs;
use std::path::{Path, PathBuf};

const MANIFEST_FILE: &str = "manifest.json";
const RESULT_FILE: &str = "result.json";

/// RFC 3339 timestamp for a manifest written now.
pub fn timestamp_now() -> String {
    Utc::now().to_rfc3339()
}

fn parsed(timestamp: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(timestamp)
        .ok()
        .map(|t| t.with_timezone(&Utc))
}

#[derive(Debug, Clone)]
pub struct RunStore {
    root_dir: PathBuf,
}

impl RunStore {
    pub fn new(root_dir: PathBuf) -> ResultsResult<Self> {
        if !root_dir.exists() {
            fs::create_dir_all(&root_dir)?;
        }
        Ok(Self { root_dir })
    }

    pub fn root_dir(&self) -> &Path {
        &self.root_dir
    }

    /// Directory of a run. Ids that are not run hashes never reach the
    /// filesystem.
    fn run_dir(&self, run_id: &str) -> ResultsResult<PathBuf> {
        if !is_run_id(run_id) {
            return Err(Self::not_found(run_id));
        }
        Ok(self.root_dir.join(run_id))
    }

    fn not_found(run_id: &str) -> ResultsError {
        ResultsError::RunNotFound {
            run_id: run_id.to_string(),
        }
    }

    pub fn has_run(&self, run_id: &str) -> bool {
        self.run_dir(run_id)
            .is_ok_and(|dir| dir.join(MANIFEST_FILE).exists())
    }

    /// True when the run exists and carries a stored result.
    pub fn has_result(&self, run_id: &str) -> bool {
        self.run_dir(run_id)
            .is_ok_and(|dir| dir.join(MANIFEST_FILE).exists() && dir.join(RESULT_FILE).exists())
    }

    pub fn save_run(
        &self,
        manifest: &RunManifest,
        result: Option<&SimulationResult>,
    ) -> ResultsResult<()> {
        let run_dir = self.run_dir(&manifest.run_id)?;
        fs::create_dir_all(&run_dir)?;

        if let Some(result) = result {
            let result_json = serde_json::to_string(result)?;
            fs::write(run_dir.join(RESULT_FILE), result_json)?;
        }

        // Manifest last: its presence marks the run complete.
        let manifest_json = serde_json::to_string_pretty(manifest)?;
        fs::write(run_dir.join(MANIFEST_FILE), manifest_json)?;

        tracing::debug!(run_id = %manifest.run_id, status = ?manifest.status, "run saved");
        Ok(())
    }

    pub fn load_manifest(&self, run_id: &str) -> ResultsResult<RunManifest> {
        let manifest_path = self.run_dir(run_id)?.join(MANIFEST_FILE);
        if !manifest_path.exists() {
            return Err(Self::not_found(run_id));
        }

        let content = fs::read_to_string(manifest_path)?;
        let manifest = serde_json::from_str(&content)?;
        Ok(manifest)
    }

    pub fn load_result(&self, run_id: &str) -> ResultsResult<SimulationResult> {
        let result_path = self.run_dir(run_id)?.join(RESULT_FILE);
        if !result_path.exists() {
            return Err(Self::not_found(run_id));
        }

        let content = fs::read_to_string(result_path)?;
        let result = serde_json::from_str(&content)?;
        Ok(result)
    }

    /// All stored manifests, most recent first. Unreadable entries are skipped.
    pub fn list_runs(&self) -> ResultsResult<Vec<RunManifest>> {
        let mut runs = Vec::new();

        if !self.root_dir.exists() {
            return Ok(runs);
        }

        for entry in fs::read_dir(&self.root_dir)? {
            let entry = entry?;
            if !entry.path().is_dir() {
                continue;
            }
            let run_id = entry.file_name().to_string_lossy().to_string();
            if !is_run_id(&run_id) {
                tracing::debug!(entry = %run_id, "ignoring non-run directory");
                continue;
            }
            match self.load_manifest(&run_id) {
                Ok(manifest) => runs.push(manifest),
                Err(e) => tracing::warn!(run_id = %run_id, error = %e, "skipping unreadable run"),
            }
        }

        runs.sort_by(|a, b| {
            parsed(&b.timestamp)
                .cmp(&parsed(&a.timestamp))
                .then_with(|| a.run_id.cmp(&b.run_id))
        });
        Ok(runs)
    }

    pub fn delete_run(&self, run_id: &str) -> ResultsResult<()> {
        let run_dir = self.run_dir(run_id)?;
        if run_dir.exists() {
            fs::remove_dir_all(run_dir)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::normalize::fallback;
    use crate::types::{CanonicalRequest, RunStatus};
    use std::collections::BTreeMap;

    fn store(name: &str) -> RunStore {
        let dir = std::env::temp_dir().join(name);
        let _ = fs::remove_dir_all(&dir);
        RunStore::new(dir).unwrap()
    }

    fn id(n: u8) -> String {
        format!("{:064x}", n)
    }

    fn manifest(run_id: &str, timestamp: &str, status: RunStatus) -> RunManifest {
        RunManifest {
            run_id: run_id.to_string(),
            timestamp: timestamp.to_string(),
            request: CanonicalRequest {
                battery_type: "lithium-ion".to_string(),
                model: "SPM".to_string(),
                parameter_set: "Chen2020".to_string(),
                experiment_type: "constant_current".to_string(),
                parameters: BTreeMap::new(),
            },
            protocol: vec!["Discharge at 1C for 1.0 hours or until 2.5V".to_string()],
            status,
            execution_time_s: 0.25,
            engine: "test".to_string(),
            error_message: None,
        }
    }

    #[test]
    fn save_and_load_round_trip() {
        let store = store("bs_results_round_trip");
        let run_id = id(1);
        let manifest = manifest(&run_id, &timestamp_now(), RunStatus::Degraded);
        let result = fallback(60.0, "missing");

        assert!(!store.has_run(&run_id));
        store.save_run(&manifest, Some(&result)).unwrap();
        assert!(store.has_run(&run_id));
        assert!(store.has_result(&run_id));
        assert_eq!(store.load_manifest(&run_id).unwrap(), manifest);
        assert_eq!(store.load_result(&run_id).unwrap(), result);
    }

    #[test]
    fn failed_runs_have_no_result() {
        let store = store("bs_results_failed_run");
        let run_id = id(2);
        let mut manifest = manifest(&run_id, &timestamp_now(), RunStatus::Failed);
        manifest.error_message = Some("solver diverged".to_string());
        store.save_run(&manifest, None).unwrap();

        assert!(store.has_run(&run_id));
        assert!(!store.has_result(&run_id));
        assert!(matches!(
            store.load_result(&run_id),
            Err(ResultsError::RunNotFound { .. })
        ));
    }

    #[test]
    fn list_is_newest_first() {
        let store = store("bs_results_list_order");
        store
            .save_run(&manifest(&id(3), "2024-01-01T00:00:00+00:00", RunStatus::Completed), None)
            .unwrap();
        store
            .save_run(&manifest(&id(4), "2024-06-01T00:00:00+02:00", RunStatus::Completed), None)
            .unwrap();
        fs::create_dir_all(store.root_dir().join("stray")).unwrap();
        fs::create_dir_all(store.root_dir().join(id(5))).unwrap();

        let ids: Vec<_> = store.list_runs().unwrap().into_iter().map(|m| m.run_id).collect();
        assert_eq!(ids, vec![id(4), id(3)]);
    }

    #[test]
    fn delete_removes_run() {
        let store = store("bs_results_delete");
        let run_id = id(6);
        store
            .save_run(&manifest(&run_id, &timestamp_now(), RunStatus::Completed), None)
            .unwrap();
        store.delete_run(&run_id).unwrap();
        assert!(!store.has_run(&run_id));
        store.delete_run(&run_id).unwrap();
        assert!(matches!(
            store.load_manifest(&run_id),
            Err(ResultsError::RunNotFound { .. })
        ));
    }

    #[test]
    fn ids_outside_the_hash_format_never_touch_the_filesystem() {
        let root = std::env::temp_dir().join("bs_results_escape");
        let _ = fs::remove_dir_all(&root);
        let outside = std::env::temp_dir().join("bs_results_escape_outside");
        let _ = fs::remove_dir_all(&outside);
        let victim = outside.join("victim");
        fs::create_dir_all(&victim).unwrap();
        let mut planted = manifest(&id(7), &timestamp_now(), RunStatus::Completed);
        planted.request.battery_type = "secret".to_string();
        fs::write(victim.join(MANIFEST_FILE), serde_json::to_string(&planted).unwrap()).unwrap();

        let store = RunStore::new(root.join("runs")).unwrap();
        let absolute = victim.to_string_lossy().to_string();
        for bad in ["../../bs_results_escape_outside/victim", absolute.as_str(), "", "ABC"] {
            assert!(!store.has_run(bad), "{bad}");
            assert!(matches!(
                store.load_manifest(bad),
                Err(ResultsError::RunNotFound { .. })
            ));
            assert!(store.delete_run(bad).is_err());
        }
        assert!(victim.join(MANIFEST_FILE).exists());

        let mut stray = planted.clone();
        stray.run_id = "../escape".to_string();
        assert!(store.save_run(&stray, None).is_err());
    }
}
