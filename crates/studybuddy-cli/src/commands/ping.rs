//! Ping command - check that the backend is reachable

use anyhow::{Context, Result};
use studybuddy_client::StudyBuddyClient;

use crate::output::OutputContext;

/// Probe the backend root page
pub async fn ping(client: &StudyBuddyClient, ctx: &OutputContext) -> Result<bool> {
    let up = client
        .health()
        .await
        .with_context(|| format!("Failed to reach {}", client.base_url()))?;

    if up {
        ctx.success(&format!("Backend at {} is up", client.base_url()));
    } else {
        ctx.error(&format!(
            "Backend at {} answered with an error status",
            client.base_url()
        ));
    }
    Ok(up)
}
