//! Tolerations, affinity and pod security context
//!
//! Tolerations are always appended. Affinity and security context are only set
//! when the pod has none; an existing value is never merged or replaced.

use json_patch::PatchOperation;
use jsonptr::PointerBuf;
use k8s_openapi::api::core::v1::Pod;
use tracing::debug;

use super::array::add;
use super::PodArrays;
use crate::crd::{Role, SparkApplication};
use crate::Result;

/// Add every toleration the role declares
pub fn patch_tolerations(
    app: &SparkApplication,
    role: Role,
    arrays: &mut PodArrays,
) -> Result<Vec<PatchOperation>> {
    app.spec
        .pod_spec(role)
        .tolerations
        .iter()
        .map(|toleration| arrays.tolerations.add(toleration))
        .collect()
}

/// Set the role's affinity if the pod has none
pub fn patch_affinity(
    pod: &Pod,
    app: &SparkApplication,
    role: Role,
) -> Result<Option<PatchOperation>> {
    if pod.spec.as_ref().is_some_and(|s| s.affinity.is_some()) {
        debug!(%role, "Pod already has affinity, leaving it unchanged");
        return Ok(None);
    }

    let Some(affinity) = app.spec.pod_spec(role).affinity.as_ref() else {
        return Ok(None);
    };
    Ok(Some(add(
        PointerBuf::from_tokens(["spec", "affinity"]),
        serde_json::to_value(affinity)?,
    )))
}

/// Set the role's pod security context if the pod has none
pub fn patch_security_context(
    pod: &Pod,
    app: &SparkApplication,
    role: Role,
) -> Result<Option<PatchOperation>> {
    if pod.spec.as_ref().is_some_and(|s| s.security_context.is_some()) {
        debug!(%role, "Pod already has a security context, leaving it unchanged");
        return Ok(None);
    }

    let Some(security_context) = app.spec.pod_spec(role).security_context.as_ref() else {
        return Ok(None);
    };
    Ok(Some(add(
        PointerBuf::from_tokens(["spec", "securityContext"]),
        serde_json::to_value(security_context)?,
    )))
}
