//! Pod Mutation Webhook
//!
//! Handles AdmissionReview requests for Pod resources created by spark-submit,
//! patching driver and executor pods from their SparkApplication.

use std::sync::Arc;

use axum::{extract::State, Json};
use k8s_openapi::api::core::v1::Pod;
use kube::{
    api::{Api, DynamicObject},
    core::admission::{AdmissionRequest, AdmissionResponse, AdmissionReview},
};
use tracing::{debug, error, info, warn};

use crate::crd::{Role, SparkApplication, SPARK_APP_NAME_LABEL};
use crate::patch::{patch_spark_pod, PatchConfig};
use crate::Result;

use super::WebhookState;

/// Handle mutating admission review for Pods
pub async fn mutate_handler(
    State(state): State<Arc<WebhookState>>,
    Json(body): Json<AdmissionReview<Pod>>,
) -> Json<AdmissionReview<DynamicObject>> {
    let req: AdmissionRequest<Pod> = match body.try_into() {
        Ok(req) => req,
        Err(e) => {
            error!(error = %e, "Failed to parse admission request");
            return Json(AdmissionResponse::invalid(e.to_string()).into_review());
        }
    };

    let response = mutate_pod(&state, &req).await;
    Json(response.into_review())
}

/// Look up the pod's SparkApplication and decide on the admission
async fn mutate_pod(state: &WebhookState, request: &AdmissionRequest<Pod>) -> AdmissionResponse {
    let uid = &request.uid;

    let Some(target) = app_ref(request) else {
        debug!(uid = %uid, "Not a labeled Spark pod, allowing unchanged");
        return AdmissionResponse::from(request);
    };

    let app = match fetch_application(state, &target).await {
        Ok(app) => app,
        Err(e) => {
            error!(
                uid = %uid,
                app = %target.name,
                namespace = %target.namespace,
                error = %e,
                "Failed to lookup SparkApplication"
            );
            return AdmissionResponse::from(request).deny(e.to_string());
        }
    };

    admit_pod(request, app.as_ref(), &state.config)
}

/// The SparkApplication a pod belongs to
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AppRef<'a> {
    /// Application name, from the app-name label
    pub name: &'a str,
    /// Namespace of the admission request, or of the pod when the request has none
    pub namespace: &'a str,
}

/// Decide which SparkApplication, if any, must be read to admit this pod
///
/// Returns `None` for requests without a pod, pods without a valid `spark-role`
/// label or app-name label, and pods with no namespace. Such pods are admitted
/// unchanged without an API call.
pub fn app_ref(request: &AdmissionRequest<Pod>) -> Option<AppRef<'_>> {
    let pod = request.object.as_ref()?;
    Role::of(pod)?;

    let name = pod
        .metadata
        .labels
        .as_ref()?
        .get(SPARK_APP_NAME_LABEL)
        .map(String::as_str)?;
    let namespace = request
        .namespace
        .as_deref()
        .or(pod.metadata.namespace.as_deref())?;

    Some(AppRef { name, namespace })
}

async fn fetch_application(
    state: &WebhookState,
    target: &AppRef<'_>,
) -> Result<Option<SparkApplication>> {
    let apps: Api<SparkApplication> = Api::namespaced(state.kube.clone(), target.namespace);
    Ok(apps.get_opt(target.name).await?)
}

/// Build the admission response for a pod given its SparkApplication, if any
///
/// Pods that are not Spark drivers or executors, or whose application no longer
/// exists, are allowed unchanged. Pods without a Spark container are denied, as
/// are pods whose patch could not be derived.
pub fn admit_pod(
    request: &AdmissionRequest<Pod>,
    app: Option<&SparkApplication>,
    config: &PatchConfig,
) -> AdmissionResponse {
    let uid = &request.uid;
    let response = AdmissionResponse::from(request);

    let Some(pod) = &request.object else {
        return response;
    };
    let Some(role) = Role::of(pod) else {
        debug!(uid = %uid, pod = ?pod.metadata.name, "Not a Spark pod, allowing unchanged");
        return response;
    };
    let Some(app) = app else {
        warn!(uid = %uid, pod = ?pod.metadata.name, %role, "SparkApplication not found, allowing unchanged");
        return response;
    };

    let patch_ops = match patch_spark_pod(pod, app, role, config) {
        Ok(ops) => ops,
        Err(e) if e.is_pod_rejection() => {
            warn!(uid = %uid, pod = ?pod.metadata.name, %role, error = %e, "Denying Spark pod");
            return response.deny(e.to_string());
        }
        Err(e) => {
            error!(uid = %uid, pod = ?pod.metadata.name, %role, error = %e, "Failed to derive patch");
            return response.deny(format!("internal error: {e}"));
        }
    };

    if patch_ops.is_empty() {
        return response;
    }

    info!(
        uid = %uid,
        app = ?app.metadata.name,
        pod = ?pod.metadata.name,
        %role,
        patch_ops = patch_ops.len(),
        "Patching Spark pod"
    );

    match response.with_patch(json_patch::Patch(patch_ops)) {
        Ok(patched) => patched,
        Err(e) => {
            error!(uid = %uid, error = %e, "Failed to serialize patch");
            AdmissionResponse::from(request).deny(format!("patch serialization error: {e}"))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crd::SparkApplicationSpec;
    use serde_json::{json, Value};

    fn request_for(pod: Value) -> AdmissionRequest<Pod> {
        request_in(Some("default"), pod)
    }

    fn request_in(namespace: Option<&str>, pod: Value) -> AdmissionRequest<Pod> {
        let mut request = json!({
            "uid": "req-1",
            "kind": {"group": "", "version": "v1", "kind": "Pod"},
            "resource": {"group": "", "version": "v1", "resource": "pods"},
            "operation": "CREATE",
            "userInfo": {},
            "object": pod,
            "dryRun": false
        });
        if let Some(ns) = namespace {
            request["namespace"] = json!(ns);
        }
        let review: AdmissionReview<Pod> = serde_json::from_value(json!({
            "apiVersion": "admission.k8s.io/v1",
            "kind": "AdmissionReview",
            "request": request
        }))
        .unwrap();
        review.try_into().unwrap()
    }

    fn labeled_pod(labels: Value, namespace: Option<&str>) -> Value {
        let mut metadata = json!({"name": "spark-pi-driver", "labels": labels});
        if let Some(ns) = namespace {
            metadata["namespace"] = json!(ns);
        }
        json!({
            "metadata": metadata,
            "spec": {"containers": [{"name": "spark-kubernetes-driver"}]}
        })
    }

    fn spark_pod(role: &str, container: &str) -> Value {
        json!({
            "apiVersion": "v1",
            "kind": "Pod",
            "metadata": {
                "name": format!("spark-pi-{role}"),
                "namespace": "default",
                "labels": {
                    "spark-role": role,
                    "sparkoperator.k8s.io/app-name": "spark-pi"
                }
            },
            "spec": {"containers": [{"name": container, "image": "spark:3.5"}]}
        })
    }

    fn app() -> SparkApplication {
        let mut app = SparkApplication::new(
            "spark-pi",
            SparkApplicationSpec {
                spark_config_map: Some("spark-conf".to_string()),
                ..Default::default()
            },
        );
        app.metadata.uid = Some("uid-1".to_string());
        app
    }

    fn patch_of(response: &AdmissionResponse) -> Vec<Value> {
        let bytes = response.patch.as_ref().expect("response should carry a patch");
        serde_json::from_slice(bytes).unwrap()
    }

    #[test]
    fn driver_pod_is_patched() {
        let request = request_for(spark_pod("driver", "spark-kubernetes-driver"));

        let response = admit_pod(&request, Some(&app()), &PatchConfig::default());

        assert!(response.allowed);
        let patch = patch_of(&response);
        assert_eq!(patch.len(), 4);
        assert_eq!(patch[0]["op"], "add");
        assert_eq!(patch[0]["path"], "/metadata/ownerReferences");
        assert_eq!(patch[3]["path"], "/spec/containers/0/env");
    }

    #[test]
    fn executor_pod_has_no_owner_patch() {
        let request = request_for(spark_pod("executor", "executor"));

        let response = admit_pod(&request, Some(&app()), &PatchConfig::default());

        assert!(response.allowed);
        let patch = patch_of(&response);
        assert_eq!(patch.len(), 3);
        assert!(patch.iter().all(|op| op["path"] != "/metadata/ownerReferences"));
    }

    #[test]
    fn non_spark_pod_passes_through() {
        let request = request_for(json!({
            "metadata": {"name": "nginx", "namespace": "default"},
            "spec": {"containers": [{"name": "nginx"}]}
        }));

        let response = admit_pod(&request, Some(&app()), &PatchConfig::default());

        assert!(response.allowed);
        assert!(response.patch.is_none());
    }

    #[test]
    fn missing_application_passes_through() {
        let request = request_for(spark_pod("driver", "spark-kubernetes-driver"));

        let response = admit_pod(&request, None, &PatchConfig::default());

        assert!(response.allowed);
        assert!(response.patch.is_none());
    }

    #[test]
    fn pod_without_spark_container_is_denied() {
        let request = request_for(spark_pod("driver", "main"));

        let response = admit_pod(&request, Some(&app()), &PatchConfig::default());

        assert!(!response.allowed);
        assert!(response.patch.is_none());
        assert!(response.result.message.contains("no container named"));
    }

    #[test]
    fn nothing_to_patch_returns_plain_allow() {
        let request = request_for(spark_pod("executor", "executor"));
        let empty = SparkApplication::new("spark-pi", SparkApplicationSpec::default());

        let response = admit_pod(&request, Some(&empty), &PatchConfig::default());

        assert!(response.allowed);
        assert!(response.patch.is_none());
    }

    #[test]
    fn app_ref_reads_label_and_request_namespace() {
        let request = request_for(spark_pod("executor", "executor"));

        assert_eq!(
            app_ref(&request),
            Some(AppRef {
                name: "spark-pi",
                namespace: "default"
            })
        );
    }

    #[test]
    fn app_ref_falls_back_to_pod_namespace() {
        let pod = labeled_pod(
            json!({"spark-role": "driver", "sparkoperator.k8s.io/app-name": "etl"}),
            Some("jobs"),
        );
        let request = request_in(None, pod);

        assert_eq!(
            app_ref(&request),
            Some(AppRef {
                name: "etl",
                namespace: "jobs"
            })
        );
    }

    #[test]
    fn app_ref_prefers_request_namespace() {
        let pod = labeled_pod(
            json!({"spark-role": "driver", "sparkoperator.k8s.io/app-name": "etl"}),
            Some("jobs"),
        );
        let request = request_in(Some("analytics"), pod);

        assert_eq!(app_ref(&request).map(|r| r.namespace), Some("analytics"));
    }

    #[test]
    fn app_ref_skips_pod_without_valid_role() {
        let missing = labeled_pod(json!({"sparkoperator.k8s.io/app-name": "etl"}), None);
        let invalid = labeled_pod(
            json!({"spark-role": "shuffle", "sparkoperator.k8s.io/app-name": "etl"}),
            None,
        );

        assert_eq!(app_ref(&request_for(missing)), None);
        assert_eq!(app_ref(&request_for(invalid)), None);
    }

    #[test]
    fn app_ref_skips_pod_without_app_name() {
        let pod = labeled_pod(json!({"spark-role": "driver"}), None);
        assert_eq!(app_ref(&request_for(pod)), None);
    }

    #[test]
    fn app_ref_skips_pod_without_namespace() {
        let pod = labeled_pod(
            json!({"spark-role": "driver", "sparkoperator.k8s.io/app-name": "etl"}),
            None,
        );
        assert_eq!(app_ref(&request_in(None, pod)), None);
    }
}
