use account_finder::discovery::{discover_matches, SeenHandles};
use account_finder::scorers::scorer_for;
use account_finder::sources::ReferenceSource;
use account_finder::{CandidateSet, MatchResult, NameInput, PatternGenerator, Platform};
use axum::{Extension, Json};
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

use crate::clients::Clients;
use crate::config::Config;
use crate::error::AppError;

/// Form fields arrive as strings or numbers depending on the client.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchRequest {
    pub name: Option<String>,
    pub fide: Option<JsonValue>,
    pub federation: Option<String>,
    pub ratings: Option<JsonValue>,
    pub birth_year: Option<JsonValue>,
}

#[derive(Debug, Serialize)]
pub struct SearchResponse {
    pub chesscom: Vec<MatchResult>,
    pub lichess: Vec<MatchResult>,
}

/// POST /api/search
pub async fn search_accounts(
    Extension(config): Extension<Config>,
    Extension(clients): Extension<Clients>,
    Json(req): Json<SearchRequest>,
) -> Result<Json<SearchResponse>, AppError> {
    let mut hints = build_hints(&req)?;

    if let Some(fide_id) = hints.fide_id().map(str::to_string) {
        match clients.fide.fetch_reference_info(&fide_id).await {
            Ok(Some(info)) => {
                tracing::info!(fide_id = %fide_id, name = %info.name, "Using FIDE profile");
                hints = hints.merge_reference(&info);
            }
            Ok(None) => tracing::info!(fide_id = %fide_id, "FIDE profile not found"),
            Err(e) => tracing::warn!(fide_id = %fide_id, error = %e, "FIDE lookup failed"),
        }
    }

    let candidates = PatternGenerator::new().generate(&hints)?;
    tracing::info!(name = hints.full_name(), patterns = candidates.len(), "Searching accounts");

    let (chesscom, lichess) = tokio::join!(
        search_platform(&clients, Platform::ChessCom, &candidates, &hints, config.lookup_concurrency),
        search_platform(&clients, Platform::Lichess, &candidates, &hints, config.lookup_concurrency),
    );

    tracing::info!(chesscom = chesscom.len(), lichess = lichess.len(), "Search finished");
    Ok(Json(SearchResponse { chesscom, lichess }))
}

/// One platform pipeline with its own de-duplication set.
async fn search_platform(
    clients: &Clients,
    platform: Platform,
    candidates: &CandidateSet,
    hints: &NameInput,
    concurrency: usize,
) -> Vec<MatchResult> {
    let scorer = scorer_for(platform);
    let mut seen = SeenHandles::new();
    discover_matches(
        clients.account_source(platform),
        scorer.as_ref(),
        candidates,
        hints,
        &mut seen,
        concurrency,
    )
    .await
}

pub fn build_hints(req: &SearchRequest) -> Result<NameInput, AppError> {
    let fide_id = req.fide.as_ref().and_then(lenient_text);
    Ok(NameInput::new(req.name.as_deref().unwrap_or(""))?
        .with_fide_id(fide_id.as_deref())
        .with_federation(req.federation.as_deref())
        .with_fide_rating(req.ratings.as_ref().and_then(lenient_int))
        .with_birth_year(req.birth_year.as_ref().and_then(lenient_int)))
}

fn lenient_text(value: &JsonValue) -> Option<String> {
    match value {
        JsonValue::String(s) => Some(s.clone()),
        JsonValue::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// Accepts 2100, "2100" or "2100 (std)".
fn lenient_int(value: &JsonValue) -> Option<i32> {
    match value {
        JsonValue::Number(n) => n.as_i64().and_then(|n| i32::try_from(n).ok()),
        JsonValue::String(s) => {
            let digits: String = s.chars().filter(|c| c.is_ascii_digit()).collect();
            digits.parse().ok()
        }
        _ => None,
    }
}
