//! Builders that map an inventory record onto Kubernetes manifests.
//!
//! Every builder is a pure function of the [`Record`]. Namespace and
//! template defaulting must already have been applied.

use std::collections::BTreeMap;

use k8s_openapi::api::core::v1::{Secret, SecretReference, TypedLocalObjectReference};
use k8s_openapi::apimachinery::pkg::apis::meta::v1::ObjectMeta;
use k8s_openapi::ByteString;

use crate::config::DocumentSelection;
use crate::crds::rufio::{
    Action, BootDevice, Connection, Job, JobSpec, Machine, MachineRef, MachineSpec,
    OneTimeBootDeviceAction, PowerAction,
};
use crate::crds::tinkerbell::{
    Dhcp, Disk, Hardware, HardwareMetadata, HardwareSpec, Interface, Ip, MetadataFacility,
    MetadataInstance, MetadataInstanceIp, Netboot, Workflow, WorkflowSpec,
};
use crate::error::Result;
use crate::record::Record;
use crate::serialize::to_yaml;

/// API group of the Rufio BMC resources.
pub const BMC_API_GROUP: &str = "bmc.tinkerbell.org";

/// DHCP lease time handed to every interface, in seconds.
pub const LEASE_TIME: i64 = 4_294_967_294;

/// Boot architecture advertised over DHCP.
pub const DHCP_ARCH: &str = "x86_64";

/// Address family of every generated IP (IPv4 only).
pub const IPV4_FAMILY: i64 = 4;

/// Metadata facility code.
pub const FACILITY_CODE: &str = "onprem";

/// Metadata plan slug.
pub const PLAN_SLUG: &str = "c2.medium.x86";

/// Value of the `admin_agent` workflow hardware-map entry.
///
/// This is a fixed placeholder; no inventory column or flag overrides it.
pub const ADMIN_AGENT: &str = "admin-node1";

/// BMC connections skip TLS certificate verification.
///
/// Security caveat: the generated `Machine` trusts any certificate the BMC
/// presents.
pub const BMC_INSECURE_TLS: bool = true;

/// Secret type for BMC credentials.
pub const BASIC_AUTH_SECRET_TYPE: &str = "kubernetes.io/basic-auth";

/// The kinds of document written for each record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DocumentKind {
    Hardware,
    BmcMachine,
    BmcSecret,
    Workflow,
}

impl DocumentKind {
    /// File name the document is written to inside the record directory.
    #[must_use]
    pub fn file_name(self) -> &'static str {
        match self {
            Self::Hardware => "hardware.yaml",
            Self::BmcMachine => "bmc-machine.yaml",
            Self::BmcSecret => "bmc-secret.yaml",
            Self::Workflow => "workflow.yaml",
        }
    }
}

/// A serialized manifest ready to be written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    pub kind: DocumentKind,
    pub data: Vec<u8>,
}

/// Name of the BMC `Machine` for a host.
#[must_use]
pub fn bmc_machine_name(hostname: &str) -> String {
    format!("bmc-{hostname}")
}

/// Name of the BMC credentials `Secret` for a host.
#[must_use]
pub fn bmc_secret_name(hostname: &str) -> String {
    format!("bmc-{hostname}-creds")
}

/// Name of the `Workflow` for a host.
#[must_use]
pub fn workflow_name(hostname: &str) -> String {
    format!("{hostname}-cleanup")
}

/// Name of the netboot `Job` for a host.
#[must_use]
pub fn bmc_job_name(hostname: &str) -> String {
    format!("netboot-{hostname}")
}

/// Render the cloud-init user-data with `ssh_key` as the authorized key.
///
/// An empty key leaves the authorized-keys entry blank.
#[must_use]
pub fn user_data(ssh_key: &str) -> String {
    let ssh_key = ssh_key.trim_end();
    format!(
        r"#cloud-config

package_update: true

users:
  - name: tink
    sudo: ['ALL=(ALL) NOPASSWD:ALL']
    shell: /bin/bash
    plain_text_passwd: 'tink'
    lock_passwd: false
    ssh_authorized_keys:
      - {ssh_key}
packages:
  - openssl
runcmd:
  - sed -i 's/^PasswordAuthentication no/PasswordAuthentication yes/g' /etc/ssh/sshd_config
  - systemctl enable ssh.service
  - systemctl start ssh.service
  - systemctl disable apparmor
  - systemctl disable snapd
  - rm -f /etc/hostname
"
    )
}

fn namespace(record: &Record) -> Option<String> {
    (!record.namespace.is_empty()).then(|| record.namespace.clone())
}

fn object_meta(name: String, record: &Record) -> ObjectMeta {
    ObjectMeta {
        name: Some(name),
        namespace: namespace(record),
        ..ObjectMeta::default()
    }
}

/// Build the Tinkerbell `Hardware` for a record.
#[must_use]
pub fn hardware(record: &Record) -> Hardware {
    let spec = HardwareSpec {
        bmc_ref: Some(TypedLocalObjectReference {
            api_group: Some(BMC_API_GROUP.to_string()),
            kind: "Machine".to_string(),
            name: bmc_machine_name(&record.hostname),
        }),
        interfaces: vec![Interface {
            netboot: Some(Netboot {
                allow_pxe: Some(true),
                allow_workflow: Some(true),
            }),
            dhcp: Some(Dhcp {
                mac: record.mac.clone(),
                hostname: record.hostname.clone(),
                lease_time: LEASE_TIME,
                name_servers: record.nameservers.clone(),
                arch: DHCP_ARCH.to_string(),
                uefi: true,
                ip: Some(Ip {
                    address: record.ip_address.clone(),
                    netmask: record.netmask.clone(),
                    gateway: record.gateway.clone(),
                    family: IPV4_FAMILY,
                }),
            }),
        }],
        metadata: Some(HardwareMetadata {
            instance: Some(MetadataInstance {
                id: record.mac.clone(),
                hostname: record.hostname.clone(),
                allow_pxe: true,
                always_pxe: true,
                ips: vec![MetadataInstanceIp {
                    address: record.ip_address.clone(),
                    netmask: record.netmask.clone(),
                    gateway: record.gateway.clone(),
                    family: IPV4_FAMILY,
                    public: true,
                }],
            }),
            facility: Some(MetadataFacility {
                plan_slug: PLAN_SLUG.to_string(),
                facility_code: FACILITY_CODE.to_string(),
            }),
        }),
        disks: vec![Disk {
            device: record.disk.clone(),
        }],
        user_data: Some(user_data(record.ssh_public_key())),
    };

    let mut hardware = Hardware::new(&record.hostname, spec);
    hardware.metadata = object_meta(record.hostname.clone(), record);
    hardware
}

/// Build the Rufio `Machine` describing how to reach the record's BMC.
#[must_use]
pub fn bmc_machine(record: &Record) -> Machine {
    let name = bmc_machine_name(&record.hostname);
    let spec = MachineSpec {
        connection: Connection {
            host: record.bmc_ip.clone(),
            port: 0,
            auth_secret_ref: SecretReference {
                name: Some(bmc_secret_name(&record.hostname)),
                namespace: namespace(record),
            },
            insecure_tls: BMC_INSECURE_TLS,
        },
    };

    let mut machine = Machine::new(&name, spec);
    machine.metadata = object_meta(name, record);
    machine
}

/// Build the basic-auth `Secret` holding the BMC credentials.
#[must_use]
pub fn bmc_secret(record: &Record) -> Secret {
    let data = BTreeMap::from([
        (
            "username".to_string(),
            ByteString(record.bmc_username.as_bytes().to_vec()),
        ),
        (
            "password".to_string(),
            ByteString(record.bmc_password.as_bytes().to_vec()),
        ),
    ]);

    Secret {
        metadata: object_meta(bmc_secret_name(&record.hostname), record),
        type_: Some(BASIC_AUTH_SECRET_TYPE.to_string()),
        data: Some(data),
        ..Secret::default()
    }
}

/// Build the Rufio `Job` that power-cycles the machine into a PXE boot.
///
/// Tasks: hard power off, one-time EFI PXE boot, power on. Not part of the
/// default document set.
#[must_use]
pub fn bmc_job(record: &Record) -> Job {
    let name = bmc_job_name(&record.hostname);
    let spec = JobSpec {
        machine_ref: MachineRef {
            name: bmc_machine_name(&record.hostname),
            namespace: record.namespace.clone(),
        },
        tasks: vec![
            Action::power(PowerAction::HardOff),
            Action::one_time_boot(OneTimeBootDeviceAction {
                devices: vec![BootDevice::Pxe],
                efi_boot: true,
            }),
            Action::power(PowerAction::On),
        ],
    };

    let mut job = Job::new(&name, spec);
    job.metadata = object_meta(name, record);
    job
}

/// Build the Tinkerbell `Workflow` that runs the configured template.
#[must_use]
pub fn workflow(record: &Record) -> Workflow {
    let name = workflow_name(&record.hostname);
    let hardware_map = BTreeMap::from([
        ("machine".to_string(), record.mac.clone()),
        ("admin_agent".to_string(), ADMIN_AGENT.to_string()),
        ("hardware_name".to_string(), record.hostname.clone()),
    ]);
    let spec = WorkflowSpec {
        template_ref: record.template.clone(),
        hardware_ref: record.hostname.clone(),
        hardware_map,
    };

    let mut workflow = Workflow::new(&name, spec);
    workflow.metadata = object_meta(name, record);
    workflow
}

/// Build and serialize the selected documents for one record.
///
/// Documents come back in a fixed order: hardware, BMC machine, BMC secret,
/// workflow.
///
/// # Errors
///
/// Returns an error if any document fails to serialize.
pub fn render(record: &Record, selection: DocumentSelection) -> Result<Vec<Document>> {
    let mut documents = Vec::new();

    if selection.hardware {
        documents.push(Document {
            kind: DocumentKind::Hardware,
            data: to_yaml(&hardware(record))?,
        });
    }
    if selection.bmc {
        documents.push(Document {
            kind: DocumentKind::BmcMachine,
            data: to_yaml(&bmc_machine(record))?,
        });
        documents.push(Document {
            kind: DocumentKind::BmcSecret,
            data: to_yaml(&bmc_secret(record))?,
        });
    }
    if selection.workflow {
        documents.push(Document {
            kind: DocumentKind::Workflow,
            data: to_yaml(&workflow(record))?,
        });
    }

    Ok(documents)
}
