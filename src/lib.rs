//! Spark Pod Webhook - admission-time patching of Spark driver and executor pods
//!
//! spark-submit creates the driver pod, and the driver creates executors, with
//! no knowledge of the pod customizations declared on the owning
//! SparkApplication. This crate derives the JSON patch that applies them and
//! serves it from a mutating admission webhook.
//!
//! # Modules
//!
//! - [`crd`] - SparkApplication Custom Resource Definition and pod roles
//! - [`patch`] - Pure JSON patch derivation for a pod and its application
//! - [`webhook`] - Admission webhook router, handler and TLS server
//! - [`error`] - Error types

#![deny(missing_docs)]

pub mod crd;
pub mod error;
pub mod patch;
pub mod webhook;

pub use error::Error;

/// Result type alias using our custom Error type
pub type Result<T> = std::result::Result<T, Error>;
