use crate::github::{client::GitHubClient, models::UserSummary};
use futures::stream::{self, StreamExt};
use tracing::{debug, warn};

/// Maximum concurrent profile detail fetches
pub const DETAIL_CONCURRENCY: usize = 5;

/// Upgrade a list of user search hits to fully detailed profiles.
///
/// Detail fetches run with bounded concurrency; the output has the same
/// length and order as the input. A failed lookup keeps that hit's
/// partial record instead of failing the batch.
pub async fn enrich_users(client: &GitHubClient, hits: Vec<UserSummary>) -> Vec<UserSummary> {
    if hits.is_empty() {
        return hits;
    }

    debug!("Enriching {} user profiles", hits.len());

    stream::iter(hits)
        .map(|hit| async move {
            match client.get_user(&hit.login).await {
                Ok(full) => full,
                Err(e) => {
                    warn!("Failed to fetch profile for {}: {}", hit.login, e);
                    hit
                }
            }
        })
        .buffered(DETAIL_CONCURRENCY)
        .collect()
        .await
}
