//! Per-record generation: defaulting, rendering and writing to disk.

use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::config::GenerateConfig;
use crate::documents::render;
use crate::error::{Error, Result};
use crate::record::{read_records, validate_hostname, Record};

/// Outcome of a successful run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GenerateSummary {
    /// Number of records processed.
    pub records: usize,
    /// Every file written, in write order.
    pub files: Vec<PathBuf>,
}

/// Generate manifests for every record in the configured inventory.
///
/// Records are processed one at a time and the run stops at the first
/// error. Files written for earlier records are kept.
///
/// # Errors
///
/// Returns the first error encountered while reading the inventory or
/// processing a record.
pub fn run(config: &GenerateConfig) -> Result<GenerateSummary> {
    let records = read_records(&config.csv_path)?;

    let mut summary = GenerateSummary::default();
    for record in records {
        let written = generate_record(record, config)?;
        summary.records += 1;
        summary.files.extend(written);
    }

    info!(
        records = summary.records,
        files = summary.files.len(),
        output = %config.output_location.display(),
        "Generation complete"
    );
    Ok(summary)
}

/// Generate and write the documents for a single record.
///
/// Defaulting, rendering and serialization all happen before the record
/// directory is created, so a record that fails at those steps leaves
/// nothing on disk.
///
/// # Errors
///
/// Returns an error if the hostname is unusable, the SSH key cannot be
/// read, a document cannot be serialized, or the filesystem rejects a write.
pub fn generate_record(mut record: Record, config: &GenerateConfig) -> Result<Vec<PathBuf>> {
    validate_hostname(&record.hostname)?;
    record.apply_defaults(config)?;

    let documents = render(&record, config.documents)?;

    let dir = config.output_location.join(&record.hostname);
    create_dir(&dir)?;

    let mut written = Vec::with_capacity(documents.len());
    for document in documents {
        let path = dir.join(document.kind.file_name());
        std::fs::write(&path, &document.data).map_err(|source| Error::FileWrite {
            path: path.clone(),
            source,
        })?;
        debug!(path = %path.display(), bytes = document.data.len(), "Wrote manifest");
        written.push(path);
    }

    info!(
        hostname = %record.hostname,
        namespace = %record.namespace,
        documents = written.len(),
        "Generated manifests"
    );
    Ok(written)
}

fn create_dir(dir: &Path) -> Result<()> {
    std::fs::create_dir_all(dir).map_err(|source| Error::DirectoryCreate {
        path: dir.to_path_buf(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DocumentSelection;

    fn record(hostname: &str) -> Record {
        Record {
            hostname: hostname.to_string(),
            mac: "aa:bb:cc:dd:ee:ff".to_string(),
            ..Record::default()
        }
    }

    #[test]
    fn test_generate_record_writes_all_files() {
        let out = tempfile::tempdir().unwrap();
        let config = GenerateConfig::new("unused.csv", out.path());

        let written = generate_record(record("node1"), &config).unwrap();

        let names: Vec<_> = written
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
            .collect();
        assert_eq!(
            names,
            vec!["hardware.yaml", "bmc-machine.yaml", "bmc-secret.yaml", "workflow.yaml"]
        );
        assert!(written.iter().all(|p| p.starts_with(out.path().join("node1"))));
    }

    #[test]
    fn test_generate_record_respects_selection() {
        let out = tempfile::tempdir().unwrap();
        let config = GenerateConfig::new("unused.csv", out.path()).with_documents(
            DocumentSelection {
                hardware: false,
                workflow: false,
                ..DocumentSelection::default()
            },
        );

        generate_record(record("node2"), &config).unwrap();

        let dir = out.path().join("node2");
        assert!(!dir.join("hardware.yaml").exists());
        assert!(dir.join("bmc-machine.yaml").exists());
        assert!(dir.join("bmc-secret.yaml").exists());
        assert!(!dir.join("workflow.yaml").exists());
    }

    #[test]
    fn test_invalid_hostname_creates_nothing() {
        let out = tempfile::tempdir().unwrap();
        let config = GenerateConfig::new("unused.csv", out.path());

        let err = generate_record(record("../escape"), &config).unwrap_err();
        assert!(matches!(err, Error::InvalidHostname { .. }));
        assert_eq!(std::fs::read_dir(out.path()).unwrap().count(), 0);
    }

    #[test]
    fn test_missing_key_creates_nothing() {
        let out = tempfile::tempdir().unwrap();
        let config = GenerateConfig::new("unused.csv", out.path())
            .with_ssh_public_key(out.path().join("missing.pub").to_str().unwrap());

        let err = generate_record(record("node3"), &config).unwrap_err();
        assert!(matches!(err, Error::SshKeyRead { .. }));
        assert!(!out.path().join("node3").exists());
    }

    #[test]
    fn test_existing_directory_is_reused() {
        let out = tempfile::tempdir().unwrap();
        std::fs::create_dir_all(out.path().join("node4")).unwrap();
        let config = GenerateConfig::new("unused.csv", out.path());

        let written = generate_record(record("node4"), &config).unwrap();
        assert_eq!(written.len(), 4);
    }

    #[test]
    fn test_directory_create_error() {
        let out = tempfile::tempdir().unwrap();
        let blocker = out.path().join("blocker");
        std::fs::write(&blocker, b"not a directory").unwrap();
        let config = GenerateConfig::new("unused.csv", &blocker);

        let err = generate_record(record("node5"), &config).unwrap_err();
        assert!(matches!(err, Error::DirectoryCreate { .. }));
    }
}
