pub mod chess_com;
pub mod fide;
pub mod lichess;

use std::sync::Arc;
use std::time::Duration;

use account_finder::sources::{AccountSource, FetchError};
use account_finder::Platform;
use async_trait::async_trait;
use chess_core::GameRecord;
use reqwest::{Client, Response, StatusCode};

use crate::config::Config;
use crate::error::AppError;

pub use chess_com::ChessComClient;
pub use fide::FideClient;
pub use lichess::LichessClient;

/// Recent games for the opening tree.
#[async_trait]
pub trait GameSource: Send + Sync {
    /// Up to `limit` games, newest first.
    async fn fetch_games(&self, handle: &str, limit: usize) -> Result<Vec<GameRecord>, AppError>;

    async fn count_games(&self, handle: &str) -> Result<u64, AppError>;
}

/// Every outbound client, shared across handlers.
#[derive(Clone)]
pub struct Clients {
    pub chess_com: Arc<ChessComClient>,
    pub lichess: Arc<LichessClient>,
    pub fide: Arc<FideClient>,
}

impl Clients {
    pub fn new(config: &Config) -> Result<Self, AppError> {
        let http = build_http(config)?;
        Ok(Self {
            chess_com: Arc::new(ChessComClient::new(http.clone(), &config.chess_com_api_url)),
            lichess: Arc::new(LichessClient::new(http.clone(), &config.lichess_api_url)),
            fide: Arc::new(FideClient::new(http, &config.fide_ratings_url)),
        })
    }

    pub fn account_source(&self, platform: Platform) -> &dyn AccountSource {
        match platform {
            Platform::ChessCom => self.chess_com.as_ref(),
            Platform::Lichess => self.lichess.as_ref(),
        }
    }

    pub fn game_source(&self, platform: Platform) -> &dyn GameSource {
        match platform {
            Platform::ChessCom => self.chess_com.as_ref(),
            Platform::Lichess => self.lichess.as_ref(),
        }
    }
}

pub fn build_http(config: &Config) -> Result<Client, AppError> {
    Client::builder()
        .user_agent(config.user_agent.as_str())
        .timeout(Duration::from_secs(config.request_timeout_secs))
        .build()
        .map_err(|e| AppError::Internal(format!("HTTP client build error: {e}")))
}

/// Parse a platform string from a request, or fail with 400.
pub fn parse_platform(s: &str) -> Result<Platform, AppError> {
    Platform::parse(s).ok_or_else(|| AppError::BadRequest(format!("Unknown platform: {s}")))
}

/// GET `url`; 404 comes back as `Ok(None)`, other failures as errors.
pub(crate) async fn get_optional(client: &Client, url: &str) -> Result<Option<Response>, FetchError> {
    let resp = client
        .get(url)
        .send()
        .await
        .map_err(|e| FetchError::Network(e.to_string()))?;

    if resp.status() == StatusCode::NOT_FOUND {
        return Ok(None);
    }
    if !resp.status().is_success() {
        return Err(FetchError::Status(resp.status().as_u16()));
    }
    Ok(Some(resp))
}

pub(crate) async fn get_json(client: &Client, url: &str) -> Result<Option<serde_json::Value>, FetchError> {
    match get_optional(client, url).await? {
        Some(resp) => resp
            .json()
            .await
            .map(Some)
            .map_err(|e| FetchError::Parse(e.to_string())),
        None => Ok(None),
    }
}

pub(crate) async fn get_text(client: &Client, url: &str) -> Result<Option<String>, FetchError> {
    match get_optional(client, url).await? {
        Some(resp) => resp
            .text()
            .await
            .map(Some)
            .map_err(|e| FetchError::Network(e.to_string())),
        None => Ok(None),
    }
}
