//! Config maps mounted into the Spark container
//!
//! Three sources feed this patcher: the role's general `configMaps` list, the
//! application's `sparkConfigMap`, and its `hadoopConfigMap`. The latter two also
//! export an environment variable pointing Spark at the mounted directory.

use json_patch::PatchOperation;
use k8s_openapi::api::core::v1::{ConfigMapVolumeSource, EnvVar, Volume, VolumeMount};
use tracing::debug;

use super::{ConfigMountDefaults, PatchConfig, PodArrays};
use crate::crd::{Role, SparkApplication};
use crate::Result;

/// Mount each of the role's general config maps at its declared path
pub fn patch_general_config_maps(
    app: &SparkApplication,
    role: Role,
    config: &PatchConfig,
    arrays: &mut PodArrays,
) -> Result<Vec<PatchOperation>> {
    let mut ops = Vec::new();
    for name_path in &app.spec.pod_spec(role).config_maps {
        let volume_name = config_map_volume_name(&name_path.name, config.max_name_length);
        ops.push(arrays.volumes.add(&config_map_volume(&name_path.name, &volume_name))?);
        ops.push(
            arrays
                .volume_mounts
                .add(&config_map_mount(&volume_name, &name_path.path))?,
        );
    }
    Ok(ops)
}

/// Mount the application's Spark config map and point `SPARK_CONF_DIR` at it
pub fn patch_spark_config_map(
    app: &SparkApplication,
    config: &PatchConfig,
    arrays: &mut PodArrays,
) -> Result<Vec<PatchOperation>> {
    match app.spec.spark_config_map() {
        Some(name) => patch_conf_dir(name, &config.spark_conf, arrays),
        None => Ok(Vec::new()),
    }
}

/// Mount the application's Hadoop config map and point `HADOOP_CONF_DIR` at it
pub fn patch_hadoop_config_map(
    app: &SparkApplication,
    config: &PatchConfig,
    arrays: &mut PodArrays,
) -> Result<Vec<PatchOperation>> {
    match app.spec.hadoop_config_map() {
        Some(name) => patch_conf_dir(name, &config.hadoop_conf, arrays),
        None => Ok(Vec::new()),
    }
}

fn patch_conf_dir(
    config_map: &str,
    defaults: &ConfigMountDefaults,
    arrays: &mut PodArrays,
) -> Result<Vec<PatchOperation>> {
    let env = EnvVar {
        name: defaults.env_var.clone(),
        value: Some(defaults.mount_dir.clone()),
        ..Default::default()
    };

    Ok(vec![
        arrays
            .volumes
            .add(&config_map_volume(config_map, &defaults.volume_name))?,
        arrays
            .volume_mounts
            .add(&config_map_mount(&defaults.volume_name, &defaults.mount_dir))?,
        arrays.env.add(&env)?,
    ])
}

/// Volume name for a general config map: `<name>-vol`, cut to `max_len` characters
///
/// Distinct names sharing a long prefix can truncate to the same volume name.
pub fn config_map_volume_name(name: &str, max_len: usize) -> String {
    let volume_name = format!("{name}-vol");
    if volume_name.chars().count() <= max_len {
        return volume_name;
    }

    let truncated: String = volume_name.chars().take(max_len).collect();
    debug!(
        config_map = %name,
        max_len,
        volume = %truncated,
        "Config map volume name too long, truncating"
    );
    truncated
}

fn config_map_volume(config_map: &str, volume_name: &str) -> Volume {
    Volume {
        name: volume_name.to_string(),
        config_map: Some(ConfigMapVolumeSource {
            name: config_map.to_string(),
            ..Default::default()
        }),
        ..Default::default()
    }
}

fn config_map_mount(volume_name: &str, mount_path: &str) -> VolumeMount {
    VolumeMount {
        name: volume_name.to_string(),
        mount_path: mount_path.to_string(),
        read_only: Some(true),
        ..Default::default()
    }
}
