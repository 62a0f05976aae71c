//! API endpoint modules.

mod cluster;
mod global_config;
mod node;
mod trust;

pub use cluster::ClusterApi;
pub use global_config::GlobalConfigApi;
pub use node::NodeServiceApi;
pub use trust::TrustManagementApi;
