mod assignment;
mod certificate;
mod cluster;
mod common;
mod node;
mod security;

pub use assignment::*;
pub use certificate::*;
pub use cluster::*;
pub use common::*;
pub use node::*;
pub use security::*;
