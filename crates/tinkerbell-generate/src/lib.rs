//! Tinkerbell manifest generation from a CSV hardware inventory.
//!
//! Each inventory row describes one bare metal machine. For every row this
//! crate writes a directory named after the hostname containing:
//!
//! - `hardware.yaml`: the Tinkerbell `Hardware` (DHCP, netboot, metadata,
//!   cloud-init user-data)
//! - `bmc-machine.yaml`: the Rufio `Machine` for the BMC
//! - `bmc-secret.yaml`: the basic-auth `Secret` with BMC credentials
//! - `workflow.yaml`: the Tinkerbell `Workflow` running the chosen template
//!
//! # Example
//!
//! ```rust,no_run
//! use tinkerbell_generate::{run, GenerateConfig};
//!
//! fn main() -> anyhow::Result<()> {
//!     let config = GenerateConfig::new("hardware.csv", "output")
//!         .with_namespace("tink-system")
//!         .with_ssh_public_key("~/.ssh/id_ed25519.pub");
//!
//!     let summary = run(&config)?;
//!     println!("wrote {} files", summary.files.len());
//!     Ok(())
//! }
//! ```

#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod config;
pub mod crds;
pub mod documents;
pub mod error;
pub mod fields;
pub mod generate;
pub mod record;
pub mod serialize;

pub use config::{DocumentSelection, GenerateConfig};
pub use documents::{Document, DocumentKind};
pub use error::{Error, Result};
pub use generate::{generate_record, run, GenerateSummary};
pub use record::Record;
