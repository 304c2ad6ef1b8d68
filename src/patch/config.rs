//! Well-known names the patchers depend on

/// Name spark-submit gives the driver container
pub const DEFAULT_DRIVER_CONTAINER_NAME: &str = "spark-kubernetes-driver";

/// Name spark-submit gives the executor container
pub const DEFAULT_EXECUTOR_CONTAINER_NAME: &str = "executor";

/// Kubernetes object name length limit (DNS-1123 label)
pub const MAX_NAME_LENGTH: usize = 63;

/// Where a built-in config map is mounted and how the container finds it
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ConfigMountDefaults {
    /// Name of the synthesized volume
    pub volume_name: String,
    /// Directory the config map is mounted at
    pub mount_dir: String,
    /// Environment variable pointing at `mount_dir`
    pub env_var: String,
}

impl ConfigMountDefaults {
    /// Defaults for the Spark configuration config map
    pub fn spark() -> Self {
        Self {
            volume_name: "spark-configmap-volume".to_string(),
            mount_dir: "/etc/spark/conf".to_string(),
            env_var: "SPARK_CONF_DIR".to_string(),
        }
    }

    /// Defaults for the Hadoop configuration config map
    pub fn hadoop() -> Self {
        Self {
            volume_name: "hadoop-configmap-volume".to_string(),
            mount_dir: "/etc/hadoop/conf".to_string(),
            env_var: "HADOOP_CONF_DIR".to_string(),
        }
    }
}

/// Names and limits injected into pod patch derivation
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PatchConfig {
    /// Container that receives mounts and env vars in driver pods
    pub driver_container_name: String,
    /// Container that receives mounts and env vars in executor pods
    pub executor_container_name: String,
    /// Longest volume name generated for a general config map
    pub max_name_length: usize,
    /// Spark config map mount
    pub spark_conf: ConfigMountDefaults,
    /// Hadoop config map mount
    pub hadoop_conf: ConfigMountDefaults,
}

impl PatchConfig {
    /// Container names the resolver accepts, driver first
    pub fn container_names(&self) -> [&str; 2] {
        [
            self.driver_container_name.as_str(),
            self.executor_container_name.as_str(),
        ]
    }
}

impl Default for PatchConfig {
    fn default() -> Self {
        Self {
            driver_container_name: DEFAULT_DRIVER_CONTAINER_NAME.to_string(),
            executor_container_name: DEFAULT_EXECUTOR_CONTAINER_NAME.to_string(),
            max_name_length: MAX_NAME_LENGTH,
            spark_conf: ConfigMountDefaults::spark(),
            hadoop_conf: ConfigMountDefaults::hadoop(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_spark_submit() {
        let config = PatchConfig::default();

        assert_eq!(
            config.container_names(),
            ["spark-kubernetes-driver", "executor"]
        );
        assert_eq!(config.max_name_length, 63);
        assert_eq!(config.spark_conf.mount_dir, "/etc/spark/conf");
        assert_eq!(config.spark_conf.env_var, "SPARK_CONF_DIR");
        assert_eq!(config.hadoop_conf.mount_dir, "/etc/hadoop/conf");
        assert_eq!(config.hadoop_conf.env_var, "HADOOP_CONF_DIR");
        assert_ne!(config.spark_conf.volume_name, config.hadoop_conf.volume_name);
    }
}
