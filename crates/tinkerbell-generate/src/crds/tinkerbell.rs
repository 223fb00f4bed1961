//! Tinkerbell `Hardware` and `Workflow` resources (`tinkerbell.org/v1alpha1`).
//!
//! Field names match the upstream JSON schema. Empty optional fields are
//! omitted when serialized.

use std::collections::BTreeMap;

use k8s_openapi::api::core::v1::TypedLocalObjectReference;
use kube::CustomResource;
use serde::{Deserialize, Serialize};

/// Desired state of a physical machine known to Tinkerbell.
#[derive(CustomResource, Deserialize, Serialize, Clone, Debug, Default, PartialEq)]
#[kube(
    group = "tinkerbell.org",
    version = "v1alpha1",
    kind = "Hardware",
    namespaced,
    schema = "disabled"
)]
#[serde(rename_all = "camelCase")]
pub struct HardwareSpec {
    /// Reference to the BMC `Machine` that controls this hardware.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bmc_ref: Option<TypedLocalObjectReference>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub interfaces: Vec<Interface>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub metadata: Option<HardwareMetadata>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub disks: Vec<Disk>,

    /// Cloud-init user-data served to the provisioned OS.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_data: Option<String>,
}

/// A network interface and how it may boot.
#[derive(Deserialize, Serialize, Clone, Debug, Default, PartialEq)]
pub struct Interface {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub netboot: Option<Netboot>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dhcp: Option<Dhcp>,
}

/// Netboot permissions for an interface.
#[derive(Deserialize, Serialize, Clone, Debug, Default, PartialEq, Eq)]
pub struct Netboot {
    #[serde(rename = "allowPXE", skip_serializing_if = "Option::is_none")]
    pub allow_pxe: Option<bool>,
    #[serde(rename = "allowWorkflow", skip_serializing_if = "Option::is_none")]
    pub allow_workflow: Option<bool>,
}

/// DHCP lease served to an interface.
#[derive(Deserialize, Serialize, Clone, Debug, Default, PartialEq, Eq)]
pub struct Dhcp {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub mac: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub hostname: String,
    /// Lease duration in seconds.
    #[serde(default, skip_serializing_if = "is_zero")]
    pub lease_time: i64,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub name_servers: Vec<String>,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub arch: String,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub uefi: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ip: Option<Ip>,
}

/// Interface address assignment.
#[derive(Deserialize, Serialize, Clone, Debug, Default, PartialEq, Eq)]
pub struct Ip {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub address: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub netmask: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub gateway: String,
    /// Address family (4 or 6).
    #[serde(default, skip_serializing_if = "is_zero")]
    pub family: i64,
}

/// Metadata served by the Tinkerbell metadata service.
#[derive(Deserialize, Serialize, Clone, Debug, Default, PartialEq, Eq)]
pub struct HardwareMetadata {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub instance: Option<MetadataInstance>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub facility: Option<MetadataFacility>,
}

#[derive(Deserialize, Serialize, Clone, Debug, Default, PartialEq, Eq)]
pub struct MetadataInstance {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub id: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub hostname: String,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub allow_pxe: bool,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub always_pxe: bool,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub ips: Vec<MetadataInstanceIp>,
}

#[derive(Deserialize, Serialize, Clone, Debug, Default, PartialEq, Eq)]
pub struct MetadataInstanceIp {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub address: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub netmask: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub gateway: String,
    #[serde(default, skip_serializing_if = "is_zero")]
    pub family: i64,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub public: bool,
}

#[derive(Deserialize, Serialize, Clone, Debug, Default, PartialEq, Eq)]
pub struct MetadataFacility {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub plan_slug: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub facility_code: String,
}

/// A block device on the machine.
#[derive(Deserialize, Serialize, Clone, Debug, Default, PartialEq, Eq)]
pub struct Disk {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub device: String,
}

/// A run of a template against a piece of hardware.
#[derive(CustomResource, Deserialize, Serialize, Clone, Debug, Default, PartialEq, Eq)]
#[kube(
    group = "tinkerbell.org",
    version = "v1alpha1",
    kind = "Workflow",
    namespaced,
    schema = "disabled"
)]
#[serde(rename_all = "camelCase")]
pub struct WorkflowSpec {
    /// Name of the `Template` to run.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub template_ref: String,
    /// Name of the `Hardware` the workflow targets.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub hardware_ref: String,
    /// Values substituted into the template.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub hardware_map: BTreeMap<String, String>,
}

#[allow(clippy::trivially_copy_pass_by_ref)]
fn is_zero(value: &i64) -> bool {
    *value == 0
}
