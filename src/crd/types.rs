//! Supporting types for the SparkApplication CRD

use k8s_openapi::api::core::v1::{Affinity, Pod, PodSecurityContext, Toleration, VolumeMount};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Label set by spark-submit on every pod it creates
pub const SPARK_ROLE_LABEL: &str = "spark-role";

/// Label carrying the name of the owning SparkApplication
pub const SPARK_APP_NAME_LABEL: &str = "sparkoperator.k8s.io/app-name";

/// Role a pod plays within a Spark application
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Role {
    /// The coordinating driver pod
    Driver,
    /// A worker executor pod
    Executor,
}

impl Role {
    /// Classify a pod by its `spark-role` label
    ///
    /// Returns `None` for pods that are neither drivers nor executors.
    pub fn of(pod: &Pod) -> Option<Self> {
        pod.metadata
            .labels
            .as_ref()
            .and_then(|labels| labels.get(SPARK_ROLE_LABEL))
            .and_then(|value| value.parse().ok())
    }

    /// Returns true for the driver role
    pub fn is_driver(self) -> bool {
        matches!(self, Self::Driver)
    }
}

impl std::str::FromStr for Role {
    type Err = crate::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "driver" => Ok(Self::Driver),
            "executor" => Ok(Self::Executor),
            _ => Err(crate::Error::validation(format!(
                "invalid spark role: {s}, expected one of: driver, executor"
            ))),
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Driver => write!(f, "driver"),
            Self::Executor => write!(f, "executor"),
        }
    }
}

/// A config map to mount into the pod at the given path
#[derive(Clone, Debug, Default, Deserialize, Serialize, JsonSchema, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct NamePath {
    /// Name of the config map
    pub name: String,
    /// Directory the config map is mounted at
    pub path: String,
}

impl NamePath {
    /// Create a new name/path pair
    pub fn new(name: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            path: path.into(),
        }
    }
}

/// Pod customizations shared by the driver and executor specs
#[derive(Clone, Debug, Default, Deserialize, Serialize, JsonSchema, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SparkPodSpec {
    /// Volume mounts for the Spark container; each must name a volume in `spec.volumes`
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub volume_mounts: Vec<VolumeMount>,

    /// Config maps mounted into the Spark container
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub config_maps: Vec<NamePath>,

    /// Tolerations appended to the pod
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tolerations: Vec<Toleration>,

    /// Affinity applied when the pod has none
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub affinity: Option<Affinity>,

    /// Pod security context applied when the pod has none
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub security_context: Option<PodSecurityContext>,
}
