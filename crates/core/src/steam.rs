//! Steam Web API lookups for author pages.
//!
//! The statistics site keys authors by SteamID64 but does not know their
//! display names, so the author operation asks Steam for the persona name. The
//! API key is handed to [`SteamClient::new`] once and never read from the
//! environment here.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::fetch::Upstream;
use crate::{ModStatsError, Result};

/// Smallest SteamID64 of an individual account.
pub const STEAMID64_MIN: u64 = 0x0110_0001_0000_0001;
/// Largest SteamID64 of an individual account.
pub const STEAMID64_MAX: u64 = 0x0110_0001_FFFF_FFFF;

const PLAYER_SUMMARIES: &str = "ISteamUser/GetPlayerSummaries/v2/";
const RESOLVE_VANITY: &str = "ISteamUser/ResolveVanityURL/v1/";

/// A validated 64-bit Steam identifier of an individual account.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct SteamId64(u64);

impl SteamId64 {
    /// Validates a raw id against the individual-account range.
    pub fn new(id: u64) -> Result<Self> {
        if (STEAMID64_MIN..=STEAMID64_MAX).contains(&id) {
            Ok(Self(id))
        } else {
            Err(ModStatsError::InvalidSteamId(id.to_string()))
        }
    }
}

impl FromStr for SteamId64 {
    type Err = ModStatsError;

    fn from_str(s: &str) -> Result<Self> {
        if s.is_empty() || !s.bytes().all(|b| b.is_ascii_digit()) {
            return Err(ModStatsError::InvalidSteamId(s.to_string()));
        }
        let id = s.parse().map_err(|_| ModStatsError::InvalidSteamId(s.to_string()))?;
        Self::new(id)
    }
}

impl fmt::Display for SteamId64 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Public part of a Steam profile.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SteamProfile {
    pub steamid: String,
    pub personaname: String,
    #[serde(default)]
    pub profileurl: String,
    #[serde(default)]
    pub avatar: String,
    #[serde(default)]
    pub avatarmedium: String,
    #[serde(default)]
    pub avatarfull: String,
}

#[derive(Deserialize)]
struct Envelope<T> {
    response: T,
}

#[derive(Deserialize)]
struct Players {
    players: Vec<SteamProfile>,
}

#[derive(Deserialize)]
struct Vanity {
    success: u8,
    steamid: Option<String>,
    message: Option<String>,
}

/// Client for the two Steam Web API calls the author lookup needs.
#[derive(Clone)]
pub struct SteamClient {
    upstream: Upstream,
    api_key: String,
}

impl fmt::Debug for SteamClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SteamClient")
            .field("upstream", &self.upstream)
            .field("api_key", &"<redacted>")
            .finish()
    }
}

impl SteamClient {
    /// Creates a client authenticating with `api_key`.
    ///
    /// # Errors
    ///
    /// Returns [`ModStatsError::Config`] for an empty key.
    pub fn new(upstream: Upstream, api_key: impl Into<String>) -> Result<Self> {
        let api_key = api_key.into();
        if api_key.trim().is_empty() {
            return Err(ModStatsError::Config("a Steam Web API key is required".to_string()));
        }
        Ok(Self { upstream, api_key })
    }

    /// Fetches the profile of `id`.
    ///
    /// # Errors
    ///
    /// Returns [`ModStatsError::SteamIdNotFound`] when Steam answers with no
    /// player for the id.
    pub async fn profile(&self, id: SteamId64) -> Result<SteamProfile> {
        let steamid = id.to_string();
        let url = self
            .upstream
            .steam_url(PLAYER_SUMMARIES, &[("key", self.api_key.as_str()), ("steamids", steamid.as_str())])?;
        let envelope: Envelope<Players> = self.upstream.get_json(url).await?;

        envelope
            .response
            .players
            .into_iter()
            .next()
            .ok_or(ModStatsError::SteamIdNotFound(steamid))
    }

    /// Resolves a custom profile name (the `steamcommunity.com/id/<name>`
    /// part) to its SteamID64.
    pub async fn resolve_vanity(&self, name: &str) -> Result<SteamId64> {
        let url = self
            .upstream
            .steam_url(RESOLVE_VANITY, &[("key", self.api_key.as_str()), ("vanityurl", name)])?;
        let envelope: Envelope<Vanity> = self.upstream.get_json(url).await?;
        let vanity = envelope.response;

        match (vanity.success, vanity.steamid) {
            (1, Some(id)) => id.parse(),
            _ => {
                debug!(name, message = ?vanity.message, "vanity name did not resolve");
                Err(ModStatsError::SteamIdNotFound(name.to_string()))
            }
        }
    }

    /// Turns user input into a SteamID64.
    ///
    /// Input made only of digits must be a valid SteamID64; anything else is
    /// looked up as a custom profile name.
    pub async fn resolve(&self, input: &str) -> Result<SteamId64> {
        let input = input.trim();
        if input.is_empty() {
            return Err(ModStatsError::InvalidSteamId(String::new()));
        }
        if input.bytes().all(|b| b.is_ascii_digit()) {
            return input.parse();
        }
        self.resolve_vanity(input).await
    }
}
