//! Locating the Spark container inside a pod

use k8s_openapi::api::core::v1::{Container, Pod};

use super::PatchConfig;
use crate::{Error, Result};

/// Index of the first container named like the Spark driver or executor
///
/// Fails with [`Error::ContainerNotFound`] when no container matches.
pub fn resolve_container(pod: &Pod, config: &PatchConfig) -> Result<usize> {
    let names = config.container_names();
    let containers: &[Container] = pod
        .spec
        .as_ref()
        .map(|spec| spec.containers.as_slice())
        .unwrap_or_default();

    containers
        .iter()
        .position(|c| names.contains(&c.name.as_str()))
        .ok_or_else(|| {
            Error::container_not_found(pod.metadata.name.as_deref().unwrap_or_default(), &names)
        })
}
