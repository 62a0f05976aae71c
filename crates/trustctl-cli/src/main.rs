//! trustctl - certificate inventory and rollout for a clustered manager.

use anyhow::Result;

#[tokio::main]
async fn main() -> Result<()> {
    trustctl_cli::run().await
}
