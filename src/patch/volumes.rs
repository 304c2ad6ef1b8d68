//! Volumes and mounts declared on the SparkApplication

use std::collections::HashMap;

use json_patch::PatchOperation;
use k8s_openapi::api::core::v1::Volume;
use tracing::debug;

use super::PodArrays;
use crate::crd::{Role, SparkApplication};
use crate::Result;

/// Add each role mount whose volume is declared, paired with that volume
///
/// Mounts that name no declared volume are skipped. Pairs follow the order of
/// the role's mount list.
pub fn patch_volumes(
    app: &SparkApplication,
    role: Role,
    arrays: &mut PodArrays,
) -> Result<Vec<PatchOperation>> {
    let volumes: HashMap<&str, &Volume> = app
        .spec
        .volumes
        .iter()
        .map(|v| (v.name.as_str(), v))
        .collect();

    let mut ops = Vec::new();
    for mount in &app.spec.pod_spec(role).volume_mounts {
        let Some(volume) = volumes.get(mount.name.as_str()) else {
            debug!(mount = %mount.name, %role, "No volume declared for mount, skipping");
            continue;
        };
        ops.push(arrays.volumes.add(volume)?);
        ops.push(arrays.volume_mounts.add(mount)?);
    }

    Ok(ops)
}
