//! Custom Resource Definitions consumed by the webhook
//!
//! The webhook reads SparkApplication resources; it never writes them.

mod application;
mod types;

pub use application::{SparkApplication, SparkApplicationSpec};
pub use types::{NamePath, Role, SparkPodSpec, SPARK_APP_NAME_LABEL, SPARK_ROLE_LABEL};
