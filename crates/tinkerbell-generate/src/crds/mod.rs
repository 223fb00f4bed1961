//! Custom resource types emitted by the generator.

pub mod rufio;
pub mod tinkerbell;

pub use rufio::{Job, JobSpec, Machine, MachineSpec};
pub use tinkerbell::{Hardware, HardwareSpec, Workflow, WorkflowSpec};
