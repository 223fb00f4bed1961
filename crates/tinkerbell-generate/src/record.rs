//! Inventory records and CSV ingestion.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use serde::Deserialize;
use tracing::{debug, info};

use crate::config::GenerateConfig;
use crate::error::{Error, Result};
use crate::fields::{decode_list, decode_ssh_key};

/// One CSV row exactly as it appears in the file.
///
/// Columns missing from the header fall back to empty strings. There is
/// intentionally no `template` column: the template always comes from
/// configuration.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RawRecord {
    pub bmc_ip: String,
    pub bmc_password: String,
    pub bmc_username: String,
    pub disk: String,
    pub gateway: String,
    pub hostname: String,
    pub ip_address: String,
    pub labels: String,
    pub mac: String,
    pub nameservers: String,
    pub namespace: String,
    pub netmask: String,
    pub ssh_pub_key: String,
    pub vendor: String,
}

/// A decoded inventory record.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Record {
    /// Machine hostname; names the output directory and every document.
    pub hostname: String,
    /// MAC address of the provisioning interface.
    pub mac: String,
    /// IPv4 address handed out over DHCP.
    pub ip_address: String,
    pub netmask: String,
    pub gateway: String,
    pub nameservers: Vec<String>,
    /// BMC address.
    pub bmc_ip: String,
    pub bmc_username: String,
    pub bmc_password: String,
    /// Install disk device path (e.g. `/dev/sda`).
    pub disk: String,
    /// Target namespace; empty until defaulted.
    pub namespace: String,
    pub labels: Vec<String>,
    pub vendor: String,
    /// Workflow template; always set from configuration.
    pub template: String,
    /// SSH public key contents, if any.
    pub ssh_public_key: Option<String>,
}

impl Record {
    /// Decode a raw CSV row.
    ///
    /// # Errors
    ///
    /// Returns an error if the `ssh_pub_key` cell names a key file that
    /// cannot be read.
    pub fn from_raw(raw: RawRecord) -> Result<Self> {
        Ok(Self {
            ssh_public_key: decode_ssh_key(&raw.ssh_pub_key)?,
            nameservers: decode_list(&raw.nameservers),
            labels: decode_list(&raw.labels),
            hostname: raw.hostname,
            mac: raw.mac,
            ip_address: raw.ip_address,
            netmask: raw.netmask,
            gateway: raw.gateway,
            bmc_ip: raw.bmc_ip,
            bmc_username: raw.bmc_username,
            bmc_password: raw.bmc_password,
            disk: raw.disk,
            namespace: raw.namespace,
            vendor: raw.vendor,
            template: String::new(),
        })
    }

    /// Fill in configuration-derived fields.
    ///
    /// The namespace is defaulted when empty, the SSH key is loaded from the
    /// fallback path when the row's key is unset or empty, and the template
    /// is always overwritten.
    ///
    /// # Errors
    ///
    /// Returns an error if the fallback SSH key cannot be read.
    pub fn apply_defaults(&mut self, config: &GenerateConfig) -> Result<()> {
        if self.namespace.is_empty() {
            self.namespace.clone_from(&config.namespace);
        }
        if self.ssh_public_key().is_empty() {
            self.ssh_public_key = decode_ssh_key(&config.ssh_public_key)?;
        }
        self.template.clone_from(&config.template);
        Ok(())
    }

    /// SSH key contents, or an empty string when unset.
    #[must_use]
    pub fn ssh_public_key(&self) -> &str {
        self.ssh_public_key.as_deref().unwrap_or_default()
    }
}

/// Check that a hostname can safely be used as a single directory name.
///
/// # Errors
///
/// Returns [`Error::InvalidHostname`] for empty names, `.` and `..`, and
/// names containing path separators or NUL.
pub fn validate_hostname(hostname: &str) -> Result<()> {
    let reason = if hostname.is_empty() {
        "hostname is empty"
    } else if hostname == "." || hostname == ".." {
        "hostname is a relative directory reference"
    } else if hostname.contains(['/', '\\']) {
        "hostname contains a path separator"
    } else if hostname.contains('\0') {
        "hostname contains a NUL byte"
    } else {
        return Ok(());
    };

    Err(Error::InvalidHostname {
        hostname: hostname.to_string(),
        reason,
    })
}

/// Parse records from any CSV source with a header row.
///
/// # Errors
///
/// Returns [`Error::InputParse`] for malformed rows and propagates SSH key
/// decoding failures.
pub fn parse_records<R: Read>(reader: R) -> Result<Vec<Record>> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::Headers)
        .from_reader(reader);

    let mut records = Vec::new();
    for row in csv_reader.deserialize::<RawRecord>() {
        let raw = row?;
        debug!(hostname = %raw.hostname, "Parsed inventory row");
        records.push(Record::from_raw(raw)?);
    }

    Ok(records)
}

/// Read every record from the CSV file at `path`.
///
/// # Errors
///
/// Returns [`Error::InputNotFound`] if the file cannot be opened, otherwise
/// see [`parse_records`].
pub fn read_records(path: &Path) -> Result<Vec<Record>> {
    let file = File::open(path).map_err(|source| Error::InputNotFound {
        path: path.to_path_buf(),
        source,
    })?;

    let records = parse_records(file)?;
    info!(path = %path.display(), count = records.len(), "Loaded inventory");
    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const HEADER: &str = "hostname,mac,ip_address,netmask,gateway,nameservers,bmc_ip,bmc_username,bmc_password,disk,namespace,labels,vendor";

    #[test]
    fn test_parse_full_row() {
        let csv = format!(
            "{HEADER}\nnode1,aa:bb:cc:dd:ee:ff,10.0.0.5,255.255.255.0,10.0.0.1,1.1.1.1|8.8.8.8,10.0.1.5,admin,secret,/dev/sda,metal,rack=a|role=worker,supermicro\n"
        );
        let records = parse_records(csv.as_bytes()).unwrap();

        assert_eq!(records.len(), 1);
        let record = &records[0];
        assert_eq!(record.hostname, "node1");
        assert_eq!(record.mac, "aa:bb:cc:dd:ee:ff");
        assert_eq!(record.nameservers, vec!["1.1.1.1", "8.8.8.8"]);
        assert_eq!(record.labels, vec!["rack=a", "role=worker"]);
        assert_eq!(record.bmc_username, "admin");
        assert_eq!(record.disk, "/dev/sda");
        assert_eq!(record.namespace, "metal");
        assert_eq!(record.vendor, "supermicro");
        assert!(record.template.is_empty());
        assert!(record.ssh_public_key.is_none());
    }

    #[test]
    fn test_missing_columns_are_empty() {
        let records = parse_records("hostname,mac\nnode2,11:22:33:44:55:66\n".as_bytes()).unwrap();

        let record = &records[0];
        assert_eq!(record.hostname, "node2");
        assert!(record.ip_address.is_empty());
        assert!(record.nameservers.is_empty());
        assert!(record.labels.is_empty());
        assert!(record.namespace.is_empty());
    }

    #[test]
    fn test_template_column_ignored() {
        let records = parse_records("hostname,template\nnode3,evil-flow\n".as_bytes()).unwrap();
        assert!(records[0].template.is_empty());
    }

    #[test]
    fn test_cells_are_kept_verbatim() {
        let csv = "hostname, bmc_username ,bmc_password\nnode4,\" admin\",\" pass word \"\n";
        let records = parse_records(csv.as_bytes()).unwrap();

        assert_eq!(records[0].hostname, "node4");
        assert_eq!(records[0].bmc_username, " admin");
        assert_eq!(records[0].bmc_password, " pass word ");
    }

    #[test]
    fn test_ragged_row_is_parse_error() {
        let err = parse_records("hostname,mac\nnode5,aa,extra\n".as_bytes()).unwrap_err();
        assert!(matches!(err, Error::InputParse(_)));
    }

    #[test]
    fn test_ssh_key_cell_is_read() {
        let mut key = tempfile::NamedTempFile::new().unwrap();
        write!(key, "ssh-ed25519 AAAA row-key").unwrap();

        let csv = format!("hostname,ssh_pub_key\nnode6,{}\n", key.path().display());
        let records = parse_records(csv.as_bytes()).unwrap();
        assert_eq!(records[0].ssh_public_key(), "ssh-ed25519 AAAA row-key");
    }

    #[test]
    fn test_apply_defaults() {
        let mut key = tempfile::NamedTempFile::new().unwrap();
        write!(key, "ssh-rsa AAAA fallback").unwrap();
        let config = GenerateConfig::default()
            .with_ssh_public_key(key.path().to_str().unwrap())
            .with_template("install-flow");

        let mut record = Record {
            hostname: "node7".to_string(),
            ..Record::default()
        };
        record.apply_defaults(&config).unwrap();

        assert_eq!(record.namespace, "tink-system");
        assert_eq!(record.template, "install-flow");
        assert_eq!(record.ssh_public_key(), "ssh-rsa AAAA fallback");
    }

    #[test]
    fn test_apply_defaults_keeps_row_values() {
        let config = GenerateConfig::default().with_ssh_public_key("/nonexistent/key.pub");
        let mut record = Record {
            hostname: "node8".to_string(),
            namespace: "custom".to_string(),
            ssh_public_key: Some("ssh-ed25519 AAAA row".to_string()),
            ..Record::default()
        };
        record.apply_defaults(&config).unwrap();

        assert_eq!(record.namespace, "custom");
        assert_eq!(record.ssh_public_key(), "ssh-ed25519 AAAA row");
    }

    #[test]
    fn test_apply_defaults_empty_row_key_uses_fallback() {
        let empty = tempfile::NamedTempFile::new().unwrap();
        let mut fallback = tempfile::NamedTempFile::new().unwrap();
        write!(fallback, "ssh-rsa FALLBACK").unwrap();

        let csv = format!("hostname,ssh_pub_key\nnode9,{}\n", empty.path().display());
        let mut record = parse_records(csv.as_bytes()).unwrap().remove(0);
        assert_eq!(record.ssh_public_key.as_deref(), Some(""));

        let config = GenerateConfig::default().with_ssh_public_key(fallback.path().to_str().unwrap());
        record.apply_defaults(&config).unwrap();
        assert_eq!(record.ssh_public_key(), "ssh-rsa FALLBACK");
    }

    #[test]
    fn test_apply_defaults_missing_fallback_key() {
        let config = GenerateConfig::default().with_ssh_public_key("/nonexistent/key.pub");
        let mut record = Record::default();

        let err = record.apply_defaults(&config).unwrap_err();
        assert!(matches!(err, Error::SshKeyRead { .. }));
    }

    #[test]
    fn test_validate_hostname() {
        assert!(validate_hostname("node1").is_ok());
        assert!(validate_hostname("node-1.example.com").is_ok());

        for bad in ["", ".", "..", "a/b", "..\\x", "nul\0byte"] {
            assert!(
                matches!(validate_hostname(bad), Err(Error::InvalidHostname { .. })),
                "expected {bad:?} to be rejected"
            );
        }
    }

    #[test]
    fn test_read_records_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = read_records(&dir.path().join("nope.csv")).unwrap_err();
        assert!(matches!(err, Error::InputNotFound { .. }));
    }
}
