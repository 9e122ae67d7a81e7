use crate::analysis::{MatchId, ProfileId};
use crate::cache::Cache;
use crate::config::settings::ScraperSettings;
use crate::domain::models::{MatchResponse, PlayerResponse, StandingResponse};
use crate::errors::with_parse_context;
use crate::http::RateLimitedClient;
use anyhow::{bail, Result};
use log::{debug, info, warn};
use serde_json::Value;

/// Where a match payload came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PayloadSource {
    Fetched,
    Cached,
}

/// axescores.com JSON API client
pub struct AxeScoresClient {
    client: RateLimitedClient,
    api_base_url: String,
    image_base_url: String,
    ruleset: String,
}

impl AxeScoresClient {
    pub fn new(settings: &ScraperSettings) -> Result<Self> {
        let client = RateLimitedClient::new(
            settings.user_agent,
            settings.timeout_secs,
            settings.rate_limit_ms,
        )?;
        Ok(Self {
            client,
            api_base_url: settings.api_base_url.trim_end_matches('/').to_string(),
            image_base_url: settings.image_base_url.trim_end_matches('/').to_string(),
            ruleset: settings.ruleset.to_string(),
        })
    }

    /// Career standings for the configured ruleset
    pub async fn fetch_standings(&mut self) -> Result<Vec<StandingResponse>> {
        let url = self.build_standings_url();
        info!("Fetching {} career standings", self.ruleset);

        let data = self.client.get_json(&url).await?;
        let standings = parse_standings(data)?;

        info!("  → {} standings entries", standings.len());
        Ok(standings)
    }

    pub async fn fetch_player(&mut self, profile_id: ProfileId) -> Result<PlayerResponse> {
        let url = self.build_player_url(profile_id);
        debug!("Fetching player {} from {}", profile_id, url);

        let data = self.client.get_json(&url).await?;
        with_parse_context(serde_json::from_value(data), "player payload")
    }

    /// Raw match payload, served from the raw cache when possible.
    /// Saves the FULL raw JSON to cache; parsing is left to [`parse_match_payload`].
    pub async fn fetch_and_cache_match(
        &mut self,
        match_id: MatchId,
        cache: &Cache,
        refresh: bool,
    ) -> Result<(Value, PayloadSource)> {
        let key = match_cache_key(match_id);
        if !refresh {
            if let Some(value) = cache.load_raw(&key)? {
                return Ok((value, PayloadSource::Cached));
            }
        }

        let url = self.build_match_url(match_id);
        debug!("Fetching match {} from {}", match_id, url);
        let value = self.client.get_json(&url).await?;

        if let Err(e) = cache.save_raw(&key, &value) {
            warn!("Failed to save match {} to cache: {:?}", match_id, e);
        }
        Ok((value, PayloadSource::Fetched))
    }

    pub fn image_url(&self, profile_id: ProfileId) -> String {
        format!("{}/{}", self.image_base_url, profile_id)
    }

    // --- Helper Methods ---

    fn build_standings_url(&self) -> String {
        format!(
            "{}/standings/career?ruleset={}",
            self.api_base_url,
            urlencoding::encode(&self.ruleset)
        )
    }

    fn build_player_url(&self, profile_id: ProfileId) -> String {
        format!("{}/player/{}", self.api_base_url, profile_id)
    }

    fn build_match_url(&self, match_id: MatchId) -> String {
        format!("{}/match/{}", self.api_base_url, match_id)
    }
}

pub fn match_cache_key(match_id: MatchId) -> String {
    format!("match-{}", match_id)
}

/// Standings come either as a bare array or wrapped in `{ "career": [...] }`
pub fn parse_standings(data: Value) -> Result<Vec<StandingResponse>> {
    let entries = match data {
        list @ Value::Array(_) => list,
        Value::Object(mut map) => match map.remove("career") {
            Some(career) => career,
            None => bail!("Standings payload has no career list"),
        },
        _ => bail!("Unexpected standings payload"),
    };
    with_parse_context(serde_json::from_value(entries), "standings payload")
}

/// Scores must be numeric; a payload that does not deserialize fails as a whole
pub fn parse_match(data: Value) -> Result<MatchResponse> {
    with_parse_context(serde_json::from_value(data), "match payload")
}

/// Parses the payload stored for `match_id`, rejecting one that carries another id
pub fn parse_match_payload(match_id: MatchId, data: Value) -> Result<MatchResponse> {
    let raw = parse_match(data)?;
    if raw.id != match_id {
        bail!("Payload for match {} carries id {}", match_id, raw.id);
    }
    Ok(raw)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn settings() -> ScraperSettings {
        ScraperSettings {
            rate_limit_ms: 0,
            ..ScraperSettings::default()
        }
    }

    #[test]
    fn test_urls() {
        let client = AxeScoresClient::new(&settings()).unwrap();

        assert_eq!(
            client.build_standings_url(),
            "https://api.axescores.com/standings/career?ruleset=IATF%20Premier"
        );
        assert_eq!(client.build_match_url(42), "https://api.axescores.com/match/42");
        assert_eq!(client.image_url(7), "https://admin.axescores.com/pic/7");
    }

    #[test]
    fn test_parse_standings_accepts_both_shapes() {
        let bare = json!([{ "id": 1, "rank": 1, "rating": 1500, "active": true }]);
        let wrapped = json!({
            "career": [{ "id": 2, "rank": 3, "rating": 1200, "active": false }]
        });

        let bare = parse_standings(bare).unwrap();
        let wrapped = parse_standings(wrapped).unwrap();

        assert_eq!(bare[0].id, 1);
        assert!(bare[0].active);
        assert_eq!(wrapped[0].rank, 3);
        assert!(parse_standings(json!({ "other": [] })).is_err());
    }

    #[test]
    fn test_parse_match_payload() {
        let payload = json!({
            "id": 9,
            "players": [{ "id": 1 }, { "id": 2, "forfeit": false }],
            "rounds": [{
                "order": 1,
                "name": "Round 1",
                "games": [
                    { "player": 1, "score": 13, "Axes": [
                        { "order": 1, "score": 5 },
                        { "order": 2, "score": 1, "clutchCalled": false },
                        { "order": 3, "score": 7, "clutchCalled": true }
                    ] },
                    { "player": 2, "score": 0, "Axes": [] }
                ]
            }]
        });

        let raw = parse_match(payload).unwrap();

        assert_eq!(raw.id, 9);
        assert!(!raw.players[1].has_forfeited());
        assert_eq!(raw.rounds[0].games[0].axes.len(), 3);
        assert!(raw.rounds[0].games[0].axes[2].clutch_called);
    }

    #[test]
    fn test_non_numeric_score_fails_whole_payload() {
        let payload = json!({
            "id": 9,
            "players": [{ "id": 1 }, { "id": 2 }],
            "rounds": [{ "games": [{ "player": 1, "score": "five" }] }]
        });

        let err = parse_match(payload).unwrap_err();

        assert_eq!(err.to_string(), "Failed to parse match payload");
    }

    #[tokio::test]
    async fn test_cached_match_is_not_refetched() {
        let dir = tempfile::tempdir().unwrap();
        let cache = Cache::new(dir.path()).unwrap();
        cache
            .save_raw(
                &match_cache_key(5),
                &json!({ "id": 5, "players": [{ "id": 1 }, { "id": 2 }], "rounds": [] }),
            )
            .unwrap();
        let mut client = AxeScoresClient::new(&settings()).unwrap();

        let (value, source) = client.fetch_and_cache_match(5, &cache, false).await.unwrap();

        assert_eq!(source, PayloadSource::Cached);
        assert_eq!(parse_match_payload(5, value).unwrap().id, 5);
    }

    #[test]
    fn test_payload_with_other_id_is_rejected() {
        let payload = json!({ "id": 6, "players": [], "rounds": [] });

        let err = parse_match_payload(5, payload).unwrap_err();

        assert!(err.to_string().contains("carries id 6"));
    }
}
