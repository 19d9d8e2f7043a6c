//! Leaderboard client boundary.
//!
//! The transport is the host's business (a `fetch` wrapper in the browser, an HTTP
//! client natively); it implements [`ScoreClient`]. [`Scoreboard`] wraps a client so
//! that nothing the network does can fail the end-of-game flow: errors are logged and
//! turned into [`SubmitOutcome::Failed`] or an empty list.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::ScoreError;
use crate::hud::format_score;

pub const SUBMIT_PATH: &str = "/scores";
pub const GLOBAL_PATH: &str = "/scores/global";

const MAX_NAME_LENGTH: usize = 20;

/// Path of a player's score history, `/scores/player/:name`.
pub fn player_path(name: &PlayerName) -> String {
    format!("/scores/player/{}", name.as_str().replace(' ', "%20"))
}

/// A validated name from the name-entry prompt.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct PlayerName(String);

impl PlayerName {
    /// Trims and validates a name: 1 to 20 ASCII letters, digits, spaces, `_` or `-`.
    pub fn parse(raw: &str) -> Result<Self, ScoreError> {
        let name = raw.trim();
        if name.is_empty() {
            return Err(ScoreError::InvalidName("name is empty".to_string()));
        }
        let length = name.chars().count();
        if length > MAX_NAME_LENGTH {
            return Err(ScoreError::InvalidName(format!(
                "name is {length} characters, the limit is {MAX_NAME_LENGTH}"
            )));
        }
        if let Some(invalid) = name
            .chars()
            .find(|c| !(c.is_ascii_alphanumeric() || matches!(c, ' ' | '_' | '-')))
        {
            return Err(ScoreError::InvalidName(format!("'{invalid}' is not allowed")));
        }
        Ok(Self(name.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for PlayerName {
    type Error = ScoreError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<PlayerName> for String {
    fn from(name: PlayerName) -> Self {
        name.0
    }
}

impl std::fmt::Display for PlayerName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Body of `POST /scores`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreSubmission {
    pub player_name: PlayerName,
    pub score: u32,
    pub is_win: bool,
}

/// A stored leaderboard row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreEntry {
    pub player_name: String,
    pub score: u32,
    pub is_win: bool,
    #[serde(default)]
    pub rank: Option<u32>,
    #[serde(default)]
    pub created_at: Option<String>,
}

/// Response of `POST /scores`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubmitResponse {
    pub success: bool,
    #[serde(default)]
    pub score: Option<ScoreEntry>,
}

#[async_trait]
pub trait ScoreClient: Send + Sync {
    /// `POST /scores`.
    async fn submit(&self, submission: &ScoreSubmission) -> Result<SubmitResponse, ScoreError>;

    /// `GET /scores/global`, best first.
    async fn global(&self) -> Result<Vec<ScoreEntry>, ScoreError>;

    /// `GET /scores/player/:name`.
    async fn player(&self, name: &PlayerName) -> Result<Vec<ScoreEntry>, ScoreError>;
}

#[derive(Debug, Clone, PartialEq)]
pub enum SubmitOutcome {
    Saved(Option<ScoreEntry>),
    /// The server answered but refused the score.
    Rejected,
    /// The request never completed.
    Failed(String),
}

impl SubmitOutcome {
    pub fn is_saved(&self) -> bool {
        matches!(self, SubmitOutcome::Saved(_))
    }
}

/// A [`ScoreClient`] whose failures never escape.
#[derive(Debug, Clone)]
pub struct Scoreboard<C> {
    client: C,
}

impl<C: ScoreClient> Scoreboard<C> {
    pub fn new(client: C) -> Self {
        Self { client }
    }

    pub async fn submit(&self, submission: &ScoreSubmission) -> SubmitOutcome {
        match self.client.submit(submission).await {
            Ok(SubmitResponse { success: true, score }) => {
                debug!(player = %submission.player_name, score = submission.score, "Score submitted");
                SubmitOutcome::Saved(score)
            }
            Ok(_) => {
                warn!(player = %submission.player_name, "Score submission rejected");
                SubmitOutcome::Rejected
            }
            Err(error) => {
                warn!(%error, "Score submission failed");
                SubmitOutcome::Failed(error.to_string())
            }
        }
    }

    pub async fn global(&self) -> Vec<ScoreEntry> {
        self.client.global().await.unwrap_or_else(|error| {
            warn!(%error, "Failed to fetch global leaderboard");
            Vec::new()
        })
    }

    pub async fn player(&self, name: &PlayerName) -> Vec<ScoreEntry> {
        self.client.player(name).await.unwrap_or_else(|error| {
            warn!(%error, player = %name, "Failed to fetch player scores");
            Vec::new()
        })
    }
}

/// What the win/loss modal shows.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EndGameReport {
    pub score: u32,
    pub score_text: String,
    pub is_win: bool,
    pub sections_unlocked: usize,
    pub lives_left: u8,
}

impl EndGameReport {
    pub fn new(score: u32, is_win: bool, sections_unlocked: usize, lives_left: u8) -> Self {
        Self {
            score,
            score_text: format_score(score),
            is_win,
            sections_unlocked,
            lives_left,
        }
    }

    /// The submission for this result under `player_name`.
    pub fn submission(&self, player_name: PlayerName) -> ScoreSubmission {
        ScoreSubmission {
            player_name,
            score: self.score,
            is_win: self.is_win,
        }
    }
}
