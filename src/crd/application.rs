//! SparkApplication Custom Resource Definition
//!
//! Only the parts of the SparkApplication spec that the pod webhook consumes are
//! modeled here. The reconciling controller owns the rest of the schema.

use k8s_openapi::api::core::v1::Volume;
use k8s_openapi::apimachinery::pkg::apis::meta::v1::OwnerReference;
use kube::{CustomResource, Resource};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use super::types::{Role, SparkPodSpec};

/// Specification for a SparkApplication
#[derive(CustomResource, Clone, Debug, Default, Deserialize, Serialize, JsonSchema, PartialEq)]
#[kube(
    group = "sparkoperator.k8s.io",
    version = "v1beta1",
    kind = "SparkApplication",
    plural = "sparkapplications",
    shortname = "sparkapp",
    namespaced,
    printcolumn = r#"{"name":"Age","type":"date","jsonPath":".metadata.creationTimestamp"}"#
)]
#[serde(rename_all = "camelCase")]
pub struct SparkApplicationSpec {
    /// Volumes that driver and executor mounts may reference by name
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub volumes: Vec<Volume>,

    /// Driver pod customizations
    #[serde(default)]
    pub driver: SparkPodSpec,

    /// Executor pod customizations
    #[serde(default)]
    pub executor: SparkPodSpec,

    /// Config map holding Spark configuration files (spark-defaults.conf etc.)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub spark_config_map: Option<String>,

    /// Config map holding Hadoop configuration files (core-site.xml etc.)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hadoop_config_map: Option<String>,
}

impl SparkApplicationSpec {
    /// Pod customizations for the given role
    pub fn pod_spec(&self, role: Role) -> &SparkPodSpec {
        match role {
            Role::Driver => &self.driver,
            Role::Executor => &self.executor,
        }
    }

    /// Spark config map name, if set and non-empty
    pub fn spark_config_map(&self) -> Option<&str> {
        self.spark_config_map.as_deref().filter(|n| !n.is_empty())
    }

    /// Hadoop config map name, if set and non-empty
    pub fn hadoop_config_map(&self) -> Option<&str> {
        self.hadoop_config_map.as_deref().filter(|n| !n.is_empty())
    }
}

impl SparkApplication {
    /// Owner reference marking this application as the controller of a pod
    pub fn owner_reference(&self) -> OwnerReference {
        OwnerReference {
            api_version: Self::api_version(&()).to_string(),
            kind: Self::kind(&()).to_string(),
            name: self.metadata.name.clone().unwrap_or_default(),
            uid: self.metadata.uid.clone().unwrap_or_default(),
            controller: Some(true),
            block_owner_deletion: None,
        }
    }
}
