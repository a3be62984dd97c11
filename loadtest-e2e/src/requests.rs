//! Request builders
//!
//! Turns the suite configuration into API request bodies.

use loadtest_core::dto::agent::{
    AttachedDiskSpec, CreateAgentRequest, CreateComputeInstance, DiskSpec, NetworkInterfaceSpec,
    PrimaryAddressSpec, ResourcesSpec,
};
use loadtest_core::dto::config::CreateConfigRequest;
use loadtest_core::dto::test::{AgentSelector, CreateTestRequest, Details, SingleAgentConfiguration};
use uuid::Uuid;

use crate::config::SuiteConfig;

/// Name given to tests created by the suite
pub const TEST_NAME: &str = "ete_created";

/// Load generator configuration: a linear RPS ramp against two URIs of the target
const TEST_CONFIG_TEMPLATE: &str = r#"uploader:
  enabled: true
  package: yandextank.plugins.DataUploader
  job_name: e2e-example
  job_dsc: ''
  ver: ''
  api_address: loadtesting.api.cloud.yandex.net:443
phantom:
  enabled: true
  package: yandextank.plugins.Phantom
  address: {target_ip}:80
  ammo_type: uri
  load_profile:
    load_type: rps
    schedule: line(1,100,20s)
  ssl: false
  instances: 1000
  uris:
    - /index
    - /static
"#;

/// Generates a fresh agent name: the prefix followed by 5 random hex digits
pub fn agent_name(prefix: &str) -> String {
    let suffix = Uuid::new_v4().simple().to_string();
    format!("{}{}", prefix, &suffix[..5])
}

pub fn create_agent_request(config: &SuiteConfig, name: &str) -> CreateAgentRequest {
    CreateAgentRequest {
        folder_id: config.folder_id.clone(),
        name: name.to_string(),
        compute_instance_params: CreateComputeInstance {
            zone_id: config.zone.clone(),
            service_account_id: config.service_account_id.clone(),
            resources_spec: ResourcesSpec {
                memory: config.agent.memory,
                cores: config.agent.cores,
            },
            boot_disk_spec: AttachedDiskSpec {
                disk_spec: DiskSpec {
                    size: config.agent.disk_size,
                },
                auto_delete: true,
            },
            network_interface_specs: vec![NetworkInterfaceSpec {
                subnet_id: config.subnet_id.clone(),
                primary_v4_address_spec: PrimaryAddressSpec::default(),
                security_group_ids: vec![config.security_group_id.clone()],
            }],
            metadata: config.agent_metadata(),
        },
        ..Default::default()
    }
}

/// Renders the load generator YAML aimed at `target_ip`
pub fn render_test_config(target_ip: &str) -> String {
    TEST_CONFIG_TEMPLATE.replace("{target_ip}", target_ip)
}

pub fn create_config_request(config: &SuiteConfig) -> CreateConfigRequest {
    CreateConfigRequest {
        folder_id: config.folder_id.clone(),
        yaml_string: render_test_config(&config.target_ip),
    }
}

/// Runs config `config_id` on the single agent `agent_id`
pub fn create_test_request(config: &SuiteConfig, config_id: &str, agent_id: &str) -> CreateTestRequest {
    CreateTestRequest {
        folder_id: config.folder_id.clone(),
        configurations: vec![SingleAgentConfiguration {
            config_id: config_id.to_string(),
            agent_selector: AgentSelector {
                agent_id: agent_id.to_string(),
            },
        }],
        test_details: Details {
            name: TEST_NAME.to_string(),
            ..Default::default()
        },
    }
}
