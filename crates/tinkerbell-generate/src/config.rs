//! Generation settings.

use std::path::PathBuf;

/// Default inventory path.
pub const DEFAULT_CSV_PATH: &str = "hardware.csv";

/// Default output root directory.
pub const DEFAULT_OUTPUT_LOCATION: &str = "output";

/// Namespace used for records that do not set one.
pub const DEFAULT_NAMESPACE: &str = "tink-system";

/// Template referenced by every generated workflow.
pub const DEFAULT_TEMPLATE: &str = "cleanup-flow";

/// Which document kinds to emit for each record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[allow(clippy::struct_excessive_bools)]
pub struct DocumentSelection {
    /// Emit `hardware.yaml`.
    pub hardware: bool,
    /// Emit `bmc-machine.yaml` and `bmc-secret.yaml`.
    pub bmc: bool,
    /// Emit `workflow.yaml`.
    pub workflow: bool,
}

impl Default for DocumentSelection {
    fn default() -> Self {
        Self {
            hardware: true,
            bmc: true,
            workflow: true,
        }
    }
}

/// Settings for one generation run.
#[derive(Debug, Clone)]
pub struct GenerateConfig {
    /// Path to the CSV inventory.
    pub csv_path: PathBuf,
    /// Root directory that receives one subdirectory per hostname.
    pub output_location: PathBuf,
    /// Namespace applied to records with an empty `namespace` column.
    pub namespace: String,
    /// Fallback SSH public key path for records without `ssh_pub_key`.
    /// Empty means no fallback.
    pub ssh_public_key: String,
    /// Workflow template name stamped into every record.
    pub template: String,
    /// Enabled document kinds.
    pub documents: DocumentSelection,
}

impl Default for GenerateConfig {
    fn default() -> Self {
        Self {
            csv_path: PathBuf::from(DEFAULT_CSV_PATH),
            output_location: PathBuf::from(DEFAULT_OUTPUT_LOCATION),
            namespace: DEFAULT_NAMESPACE.to_string(),
            ssh_public_key: String::new(),
            template: DEFAULT_TEMPLATE.to_string(),
            documents: DocumentSelection::default(),
        }
    }
}

impl GenerateConfig {
    /// Create a configuration reading `csv_path` and writing under `output_location`.
    #[must_use]
    pub fn new(csv_path: impl Into<PathBuf>, output_location: impl Into<PathBuf>) -> Self {
        Self {
            csv_path: csv_path.into(),
            output_location: output_location.into(),
            ..Self::default()
        }
    }

    /// Set the default namespace.
    #[must_use]
    pub fn with_namespace(mut self, namespace: impl Into<String>) -> Self {
        self.namespace = namespace.into();
        self
    }

    /// Set the fallback SSH public key path.
    #[must_use]
    pub fn with_ssh_public_key(mut self, path: impl Into<String>) -> Self {
        self.ssh_public_key = path.into();
        self
    }

    /// Set the workflow template name.
    #[must_use]
    pub fn with_template(mut self, template: impl Into<String>) -> Self {
        self.template = template.into();
        self
    }

    /// Set which documents are emitted.
    #[must_use]
    pub fn with_documents(mut self, documents: DocumentSelection) -> Self {
        self.documents = documents;
        self
    }
}
