//! JSON patch derivation for Spark driver and executor pods
//!
//! Given a pod as admitted and the SparkApplication it belongs to, produce the
//! RFC 6902 `add` operations that give the pod the application's volumes,
//! config maps, scheduling constraints, security context and (for drivers)
//! owner reference.
//!
//! Derivation is pure: nothing here performs I/O or mutates the pod. Every
//! operation is valid against the document left by the operations before it,
//! so the sequence can be applied as-is.

mod array;
mod config;
mod config_map;
mod container;
mod owner;
mod scheduling;
mod volumes;

use json_patch::PatchOperation;
use k8s_openapi::api::core::v1::Pod;

use crate::crd::{Role, SparkApplication};
use crate::Result;

pub use array::{ArrayAppend, ArrayField, PodArrays};
pub use config::{
    ConfigMountDefaults, PatchConfig, DEFAULT_DRIVER_CONTAINER_NAME,
    DEFAULT_EXECUTOR_CONTAINER_NAME, MAX_NAME_LENGTH,
};
pub use config_map::{
    config_map_volume_name, patch_general_config_maps, patch_hadoop_config_map,
    patch_spark_config_map,
};
pub use container::resolve_container;
pub use owner::patch_owner_reference;
pub use scheduling::{patch_affinity, patch_security_context, patch_tolerations};
pub use volumes::patch_volumes;

/// Derive every patch operation for a Spark pod
///
/// Fails without emitting anything when the pod has no Spark container.
///
/// The container must be resolved before any patcher runs. Patchers that never
/// touch the container (owner reference, tolerations) would otherwise produce
/// output ahead of the failure.
pub fn patch_spark_pod(
    pod: &Pod,
    app: &SparkApplication,
    role: Role,
    config: &PatchConfig,
) -> Result<Vec<PatchOperation>> {
    let container = resolve_container(pod, config)?;
    let mut arrays = PodArrays::new(pod, container);
    let mut ops = Vec::new();

    ops.extend(patch_owner_reference(app, role, &mut arrays)?);
    ops.extend(patch_volumes(app, role, &mut arrays)?);
    ops.extend(patch_general_config_maps(app, role, config, &mut arrays)?);
    ops.extend(patch_spark_config_map(app, config, &mut arrays)?);
    ops.extend(patch_hadoop_config_map(app, config, &mut arrays)?);
    ops.extend(patch_tolerations(app, role, &mut arrays)?);
    ops.extend(patch_affinity(pod, app, role)?);
    ops.extend(patch_security_context(pod, app, role)?);

    Ok(ops)
}
