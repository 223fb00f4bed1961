//! tinkerbell-generate CLI - turn a hardware CSV into Tinkerbell manifests.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use tinkerbell_generate::config::{
    DEFAULT_CSV_PATH, DEFAULT_NAMESPACE, DEFAULT_OUTPUT_LOCATION, DEFAULT_TEMPLATE,
};
use tinkerbell_generate::{run, DocumentSelection, GenerateConfig};

/// Generate Tinkerbell hardware, BMC and workflow manifests from a CSV inventory.
#[derive(Parser, Debug)]
#[command(name = "tinkerbell-generate")]
#[command(about = "Generate Tinkerbell manifests from a hardware CSV")]
#[allow(clippy::struct_excessive_bools)]
struct Cli {
    /// Path to the CSV inventory.
    #[arg(long, env = "TINK_GENERATE_CSV", default_value = DEFAULT_CSV_PATH)]
    csv: PathBuf,

    /// Directory to write the generated YAML files to.
    #[arg(long, env = "TINK_GENERATE_LOCATION", default_value = DEFAULT_OUTPUT_LOCATION)]
    location: PathBuf,

    /// Do not generate hardware.yaml.
    #[arg(long)]
    disable_hardware: bool,

    /// Do not generate bmc-machine.yaml and bmc-secret.yaml.
    #[arg(long)]
    disable_bmc: bool,

    /// Do not generate workflow.yaml.
    #[arg(long)]
    disable_workflow: bool,

    /// Namespace for records that do not set one.
    #[arg(long, env = "TINK_GENERATE_NAMESPACE", default_value = DEFAULT_NAMESPACE)]
    namespace: String,

    /// Path to an SSH public key used for records without `ssh_pub_key`.
    #[arg(long, env = "TINK_GENERATE_SSH_PUBLIC_KEY", default_value = "")]
    ssh_public_key: String,

    /// Workflow template referenced by every generated workflow.
    #[arg(long, env = "TINK_GENERATE_TEMPLATE", default_value = DEFAULT_TEMPLATE)]
    template: String,

    /// Enable verbose logging.
    #[arg(short, long)]
    verbose: bool,
}

impl Cli {
    fn into_config(self) -> GenerateConfig {
        GenerateConfig::new(self.csv, self.location)
            .with_namespace(self.namespace)
            .with_ssh_public_key(self.ssh_public_key)
            .with_template(self.template)
            .with_documents(DocumentSelection {
                hardware: !self.disable_hardware,
                bmc: !self.disable_bmc,
                workflow: !self.disable_workflow,
            })
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let config = cli.into_config();
    info!(
        csv = %config.csv_path.display(),
        location = %config.output_location.display(),
        "Generating manifests"
    );

    let summary = run(&config).with_context(|| {
        format!(
            "Failed to generate manifests from {}",
            config.csv_path.display()
        )
    })?;

    info!(
        "Wrote {} files for {} records",
        summary.files.len(),
        summary.records
    );
    Ok(())
}
