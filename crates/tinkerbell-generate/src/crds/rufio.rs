//! Rufio BMC resources (`bmc.tinkerbell.org/v1alpha1`).

use k8s_openapi::api::core::v1::SecretReference;
use kube::CustomResource;
use serde::{Deserialize, Serialize};

/// A baseboard management controller and how to reach it.
#[derive(CustomResource, Deserialize, Serialize, Clone, Debug, Default, PartialEq)]
#[kube(
    group = "bmc.tinkerbell.org",
    version = "v1alpha1",
    kind = "Machine",
    namespaced,
    schema = "disabled"
)]
pub struct MachineSpec {
    pub connection: Connection,
}

/// BMC connection details.
#[derive(Deserialize, Serialize, Clone, Debug, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Connection {
    /// BMC hostname or IP address.
    pub host: String,
    /// BMC port; 0 lets the controller pick the protocol default.
    #[serde(default)]
    pub port: u16,
    /// Secret holding `username` and `password`.
    pub auth_secret_ref: SecretReference,
    /// Skip TLS certificate verification.
    #[serde(rename = "insecureTLS", default)]
    pub insecure_tls: bool,
}

/// A sequence of BMC actions run against a `Machine`.
#[derive(CustomResource, Deserialize, Serialize, Clone, Debug, Default, PartialEq)]
#[kube(
    group = "bmc.tinkerbell.org",
    version = "v1alpha1",
    kind = "Job",
    namespaced,
    schema = "disabled"
)]
#[serde(rename_all = "camelCase")]
pub struct JobSpec {
    pub machine_ref: MachineRef,
    pub tasks: Vec<Action>,
}

/// Namespaced reference to a `Machine`.
#[derive(Deserialize, Serialize, Clone, Debug, Default, PartialEq, Eq)]
pub struct MachineRef {
    pub name: String,
    pub namespace: String,
}

/// A single job task. Exactly one field is expected to be set.
#[derive(Deserialize, Serialize, Clone, Debug, Default, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Action {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub power_action: Option<PowerAction>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub one_time_boot_device_action: Option<OneTimeBootDeviceAction>,
}

impl Action {
    /// A task that changes the machine's power state.
    #[must_use]
    pub fn power(action: PowerAction) -> Self {
        Self {
            power_action: Some(action),
            ..Self::default()
        }
    }

    /// A task that sets the next boot device.
    #[must_use]
    pub fn one_time_boot(action: OneTimeBootDeviceAction) -> Self {
        Self {
            one_time_boot_device_action: Some(action),
            ..Self::default()
        }
    }
}

/// Power state transitions.
#[derive(Deserialize, Serialize, Clone, Copy, Debug, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum PowerAction {
    On,
    #[serde(rename = "off")]
    HardOff,
    Soft,
    Status,
    Cycle,
    Reset,
}

/// Boot from the given devices on the next boot only.
#[derive(Deserialize, Serialize, Clone, Debug, Default, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct OneTimeBootDeviceAction {
    #[serde(rename = "device")]
    pub devices: Vec<BootDevice>,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub efi_boot: bool,
}

/// Boot device identifiers understood by Rufio.
#[derive(Deserialize, Serialize, Clone, Copy, Debug, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum BootDevice {
    Pxe,
    Disk,
    Bios,
    Cdrom,
    Safe,
}
