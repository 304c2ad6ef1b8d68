//! Owner reference from the driver pod to its SparkApplication

use json_patch::PatchOperation;

use super::PodArrays;
use crate::crd::{Role, SparkApplication};
use crate::Result;

/// Make the application the controller of a driver pod
///
/// Executor pods are owned by their driver, so they get nothing here.
pub fn patch_owner_reference(
    app: &SparkApplication,
    role: Role,
    arrays: &mut PodArrays,
) -> Result<Option<PatchOperation>> {
    if !role.is_driver() {
        return Ok(None);
    }
    arrays
        .owner_references
        .add(&app.owner_reference())
        .map(Some)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::patch::test_support::{op_path, op_value, pod};
    use serde_json::json;

    fn app() -> SparkApplication {
        let mut app = SparkApplication::new("spark-pi", Default::default());
        app.metadata.uid = Some("uid-1".to_string());
        app
    }

    #[test]
    fn driver_gets_owner_reference_array() {
        let pod = pod(json!({"containers": [{"name": "spark-kubernetes-driver"}]}));
        let mut arrays = PodArrays::new(&pod, 0);

        let op = patch_owner_reference(&app(), Role::Driver, &mut arrays)
            .unwrap()
            .unwrap();

        assert_eq!(op_path(&op), "/metadata/ownerReferences");
        assert_eq!(
            op_value(&op),
            &json!([{
                "apiVersion": "sparkoperator.k8s.io/v1beta1",
                "kind": "SparkApplication",
                "name": "spark-pi",
                "uid": "uid-1",
                "controller": true
            }])
        );
    }

    #[test]
    fn driver_with_owner_appends() {
        let mut pod = pod(json!({"containers": [{"name": "spark-kubernetes-driver"}]}));
        pod.metadata.owner_references = Some(vec![Default::default()]);
        let mut arrays = PodArrays::new(&pod, 0);

        let op = patch_owner_reference(&app(), Role::Driver, &mut arrays)
            .unwrap()
            .unwrap();

        assert_eq!(op_path(&op), "/metadata/ownerReferences/-");
        assert_eq!(op_value(&op)["kind"], "SparkApplication");
    }

    #[test]
    fn executor_gets_no_owner_reference() {
        let pod = pod(json!({"containers": [{"name": "executor"}]}));
        let mut arrays = PodArrays::new(&pod, 0);

        let op = patch_owner_reference(&app(), Role::Executor, &mut arrays).unwrap();

        assert!(op.is_none());
        assert!(arrays.owner_references.is_empty());
    }
}
