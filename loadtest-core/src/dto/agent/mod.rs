//! Agent DTOs

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Request to create an agent backed by a new compute instance
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateAgentRequest {
    pub folder_id: String,
    pub name: String,

    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub description: String,

    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub labels: HashMap<String, String>,

    pub compute_instance_params: CreateComputeInstance,
}

/// Compute instance parameters of a new agent
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateComputeInstance {
    pub zone_id: String,
    pub service_account_id: String,
    pub resources_spec: ResourcesSpec,
    pub boot_disk_spec: AttachedDiskSpec,
    pub network_interface_specs: Vec<NetworkInterfaceSpec>,

    /// Instance metadata, e.g. `ssh-keys`
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub metadata: HashMap<String, String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResourcesSpec {
    /// Memory in bytes
    #[serde(with = "crate::int64")]
    pub memory: i64,

    #[serde(with = "crate::int64")]
    pub cores: i64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttachedDiskSpec {
    pub disk_spec: DiskSpec,

    /// Delete the disk together with the instance
    pub auto_delete: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DiskSpec {
    /// Size in bytes
    #[serde(with = "crate::int64")]
    pub size: i64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NetworkInterfaceSpec {
    pub subnet_id: String,

    /// An empty spec asks for an automatically assigned internal address
    pub primary_v4_address_spec: PrimaryAddressSpec,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub security_group_ids: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PrimaryAddressSpec {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub address: String,
}
