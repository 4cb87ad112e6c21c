use std::collections::HashSet;
use std::path::{Path, PathBuf};

use rekey_types::PrefixSpec;
use serde::{Deserialize, Serialize};

use crate::error::{BatchError, BatchResult};

/// What to do when a file cannot be parsed or serialized.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ErrorPolicy {
    /// Stop the run at the first failing file.
    Strict,
    /// Report the failure and continue with the next file.
    #[default]
    Resilient,
}

/// One kind of document: a file name and the keys whose values get prefixed.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentClass {
    pub file: String,
    pub keys: Vec<String>,
}

impl DocumentClass {
    pub fn new<I, K>(file: impl Into<String>, keys: I) -> Self
    where
        I: IntoIterator<Item = K>,
        K: Into<String>,
    {
        Self {
            file: file.into(),
            keys: keys.into_iter().map(Into::into).collect(),
        }
    }

    /// The prefix specification for this class under `prefix`.
    pub fn spec(&self, prefix: &str) -> PrefixSpec {
        PrefixSpec::new(prefix, self.keys.iter().cloned())
    }
}

/// Configuration for a batch run.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BatchConfig {
    /// Directory the document files are resolved against.
    pub directory: PathBuf,
    /// Strict or resilient handling of per-file failures.
    pub policy: ErrorPolicy,
    /// When `false`, files are processed and reported but never overwritten.
    pub write: bool,
    /// Retry unparseable documents after repairing inline block scalars.
    pub repair_block_scalars: bool,
    /// Re-parse emitted text and refuse to write it if it differs.
    pub verify_round_trip: bool,
    /// Document classes, processed in this order.
    pub documents: Vec<DocumentClass>,
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            directory: PathBuf::from("."),
            policy: ErrorPolicy::default(),
            write: true,
            repair_block_scalars: true,
            verify_round_trip: true,
            documents: default_documents(),
        }
    }
}

/// The AWX/Tower export layout.
fn default_documents() -> Vec<DocumentClass> {
    vec![
        DocumentClass::new("orgs.yaml", ["name"]),
        DocumentClass::new("projects.yaml", ["name", "organization"]),
        DocumentClass::new("teams.yaml", ["name", "organization"]),
        DocumentClass::new("schedules.yaml", ["name", "unified_job_template"]),
        DocumentClass::new("inventories.yaml", ["name", "organization"]),
        DocumentClass::new(
            "job_templates.yaml",
            ["name", "organization", "project", "inventory", "credentials"],
        ),
        DocumentClass::new("notification_templates.yaml", ["name", "organization"]),
        DocumentClass::new(
            "workflow_job_templates.yaml",
            ["name", "organization", "workflow_job_template", "unified_job_template"],
        ),
    ]
}

impl BatchConfig {
    /// Load a TOML configuration file. Missing fields take their defaults.
    pub fn load(path: &Path) -> BatchResult<Self> {
        let raw = std::fs::read_to_string(path).map_err(|e| BatchError::io(path, e))?;
        Self::from_toml_str(&raw)
    }

    pub fn from_toml_str(raw: &str) -> BatchResult<Self> {
        let config: Self = toml::from_str(raw).map_err(|e| BatchError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_toml_string(&self) -> BatchResult<String> {
        toml::to_string_pretty(self).map_err(|e| BatchError::Config(e.to_string()))
    }

    /// Reject tables a run could not process meaningfully.
    pub fn validate(&self) -> BatchResult<()> {
        let mut seen = HashSet::new();
        for class in &self.documents {
            if class.file.trim().is_empty() {
                return Err(BatchError::Config("document with empty file name".into()));
            }
            if !seen.insert(class.file.as_str()) {
                return Err(BatchError::Config(format!("document listed twice: {}", class.file)));
            }
            if class.keys.is_empty() {
                return Err(BatchError::Config(format!("no keys for {}", class.file)));
            }
        }
        Ok(())
    }

    /// Path of a configured file.
    pub fn path_of(&self, class: &DocumentClass) -> PathBuf {
        self.directory.join(&class.file)
    }
}
