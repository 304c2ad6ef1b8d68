//! Create-or-append decisions for array fields
//!
//! An RFC 6902 `add` to `/spec/volumes` replaces the whole array, while an `add`
//! to `/spec/volumes/-` fails if the array does not exist yet. Every array write
//! therefore depends on whether the target currently has elements.

use json_patch::{AddOperation, PatchOperation};
use jsonptr::{Pointer, PointerBuf};
use k8s_openapi::api::core::v1::Pod;
use serde::Serialize;
use serde_json::Value;

use crate::Result;

/// How an add operation addresses an array field
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ArrayAppend {
    /// Array is empty or absent: write a one-element array at the field itself
    Create,
    /// Array has elements: write the bare element at `<field>/-`
    Append,
}

impl ArrayAppend {
    /// Decide based on the array's current length
    pub fn for_len(len: usize) -> Self {
        if len == 0 {
            Self::Create
        } else {
            Self::Append
        }
    }

    /// Path to target for the given array field
    pub fn path(self, field: &Pointer) -> PointerBuf {
        let mut path = field.to_buf();
        if self == Self::Append {
            path.push_back("-");
        }
        path
    }

    /// Shape the element the way this decision requires
    pub fn value(self, element: Value) -> Value {
        match self {
            Self::Create => Value::Array(vec![element]),
            Self::Append => element,
        }
    }
}

/// Build an RFC 6902 `add` operation
pub(crate) fn add(path: PointerBuf, value: Value) -> PatchOperation {
    PatchOperation::Add(AddOperation { path, value })
}

/// A pod array field together with its length as seen by the patch so far
#[derive(Clone, Debug)]
pub struct ArrayField {
    path: PointerBuf,
    len: usize,
}

impl ArrayField {
    /// Track an array at `path` that currently holds `len` elements
    pub fn new(path: PointerBuf, len: usize) -> Self {
        Self { path, len }
    }

    /// Number of elements the array will hold once prior operations apply
    pub fn len(&self) -> usize {
        self.len
    }

    /// Returns true if no element exists or has been added yet
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Emit an add operation for one element
    ///
    /// The first add to an empty array creates it; every later add appends.
    pub fn add<T: Serialize>(&mut self, element: &T) -> Result<PatchOperation> {
        let decision = ArrayAppend::for_len(self.len);
        let value = decision.value(serde_json::to_value(element)?);
        self.len += 1;
        Ok(add(decision.path(&self.path), value))
    }
}

/// The array fields of one pod that patchers add to
///
/// Seeded from the pod as admitted and shared by every patcher during a single
/// derivation, so operations from different patchers on the same field stay
/// valid when applied in order.
#[derive(Clone, Debug)]
pub struct PodArrays {
    /// `/metadata/ownerReferences`
    pub owner_references: ArrayField,
    /// `/spec/volumes`
    pub volumes: ArrayField,
    /// `/spec/containers/<i>/volumeMounts` of the Spark container
    pub volume_mounts: ArrayField,
    /// `/spec/containers/<i>/env` of the Spark container
    pub env: ArrayField,
    /// `/spec/tolerations`
    pub tolerations: ArrayField,
}

impl PodArrays {
    /// Snapshot array lengths from `pod`, using the container at `container`
    pub fn new(pod: &Pod, container: usize) -> Self {
        let spec = pod.spec.as_ref();
        let target = spec.and_then(|s| s.containers.get(container));
        let index = container.to_string();

        Self {
            owner_references: ArrayField::new(
                PointerBuf::from_tokens(["metadata", "ownerReferences"]),
                pod.metadata.owner_references.as_ref().map_or(0, Vec::len),
            ),
            volumes: ArrayField::new(
                PointerBuf::from_tokens(["spec", "volumes"]),
                spec.and_then(|s| s.volumes.as_ref()).map_or(0, Vec::len),
            ),
            volume_mounts: ArrayField::new(
                PointerBuf::from_tokens(["spec", "containers", index.as_str(), "volumeMounts"]),
                target.and_then(|c| c.volume_mounts.as_ref()).map_or(0, Vec::len),
            ),
            env: ArrayField::new(
                PointerBuf::from_tokens(["spec", "containers", index.as_str(), "env"]),
                target.and_then(|c| c.env.as_ref()).map_or(0, Vec::len),
            ),
            tolerations: ArrayField::new(
                PointerBuf::from_tokens(["spec", "tolerations"]),
                spec.and_then(|s| s.tolerations.as_ref()).map_or(0, Vec::len),
            ),
        }
    }
}
