//! Hub API client for fetching nut-reaction stats
//!
//! One snapshot takes two dependent calls: reaction counts first, then the
//! profile for the same fid. Both carry the api_key / client_id headers from
//! settings. If either call fails in any way the whole attempt fails, so a
//! snapshot never mixes counts and profile from different points in time.

use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use serde::de::DeserializeOwned;
use serde::Deserialize;

use crate::core::{FetchError, Fid, Profile, StatsFetcher, StatsSnapshot};
use crate::settings::Settings;

/// Reaction type the widget tracks
const NUT_REACTION: &str = "\u{1F95C}";

/// Per-request timeout; a hung call resolves here instead of pinning the
/// poller in its fetching state
const REQUEST_TIMEOUT: Duration = Duration::from_secs(15);

/// Hub API client
pub struct HubClient {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
    client_id: String,
}

impl HubClient {
    pub fn new(settings: &Settings) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: settings.base_url.trim_end_matches('/').to_string(),
            api_key: settings.api_key.clone(),
            client_id: settings.client_id.clone(),
        }
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        url: &str,
        query: &[(&str, String)],
    ) -> Result<T, FetchError> {
        let response = self
            .client
            .get(url)
            .query(query)
            .header("api_key", &self.api_key)
            .header("client_id", &self.client_id)
            .header("Accept", "application/json")
            .timeout(REQUEST_TIMEOUT)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(FetchError::Status(response.status().as_u16()));
        }

        response
            .json()
            .await
            .map_err(|e| FetchError::Malformed(e.to_string()))
    }

    async fn fetch_reaction_counts(&self, fid: Fid) -> Result<ReactionCounts, FetchError> {
        let url = format!("{}/v1/reactions", self.base_url);
        self.get_json(
            &url,
            &[
                ("type", NUT_REACTION.to_string()),
                ("fid", fid.to_string()),
            ],
        )
        .await
    }

    async fn fetch_profile(&self, fid: Fid) -> Result<UserResponse, FetchError> {
        let url = format!("{}/v1/user", self.base_url);
        self.get_json(&url, &[("fid", fid.to_string())]).await
    }
}

#[async_trait]
impl StatsFetcher for HubClient {
    async fn fetch_stats(&self, fid: Fid) -> Result<StatsSnapshot, FetchError> {
        tracing::debug!(%fid, "fetching nut stats");

        let counts = self.fetch_reaction_counts(fid).await?;
        let profile = self.fetch_profile(fid).await?;

        Ok(StatsSnapshot {
            fid,
            sent_count: counts.sent_count,
            received_count: counts.received_count,
            failed_attempt_count: counts.failed_attempts,
            // Completion time, not request start
            captured_at: Utc::now(),
            profile: Profile {
                username: profile.user.username,
                display_name: profile.user.display_name,
                pfp_url: profile.user.pfp_url,
            },
        })
    }
}

// --- API Response Types ---

#[derive(Debug, Deserialize)]
struct ReactionCounts {
    sent_count: u64,
    received_count: u64,
    failed_attempts: u64,
}

#[derive(Debug, Deserialize)]
struct UserResponse {
    user: UserProfile,
}

#[derive(Debug, Deserialize)]
struct UserProfile {
    username: String,
    pfp_url: String,
    display_name: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_reaction_counts_decode() {
        let value = json!({
            "sent_count": 120,
            "received_count": 3400,
            "failed_attempts": 2,
            "extra": "ignored"
        });
        let counts: ReactionCounts = serde_json::from_value(value).unwrap();
        assert_eq!(counts.sent_count, 120);
        assert_eq!(counts.received_count, 3400);
        assert_eq!(counts.failed_attempts, 2);
    }

    #[test]
    fn test_reaction_counts_missing_field_is_rejected() {
        let value = json!({ "sent_count": 120, "received_count": 3400 });
        assert!(serde_json::from_value::<ReactionCounts>(value).is_err());
    }

    #[test]
    fn test_reaction_counts_wrong_type_is_rejected() {
        let value = json!({
            "sent_count": "120",
            "received_count": 3400,
            "failed_attempts": 2
        });
        assert!(serde_json::from_value::<ReactionCounts>(value).is_err());

        let negative = json!({
            "sent_count": -1,
            "received_count": 3400,
            "failed_attempts": 2
        });
        assert!(serde_json::from_value::<ReactionCounts>(negative).is_err());
    }

    #[test]
    fn test_user_response_decode() {
        let value = json!({
            "user": {
                "username": "squirrel",
                "pfp_url": "https://img.example/pfp.png",
                "display_name": "Squirrel"
            }
        });
        let decoded: UserResponse = serde_json::from_value(value).unwrap();
        assert_eq!(decoded.user.username, "squirrel");
        assert_eq!(decoded.user.display_name, "Squirrel");
    }

    #[test]
    fn test_user_response_missing_profile_is_rejected() {
        let value = json!({ "user": { "username": "squirrel" } });
        assert!(serde_json::from_value::<UserResponse>(value).is_err());
    }
}
