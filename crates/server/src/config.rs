use std::env;

#[derive(Clone, Debug)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub user_agent: String,
    pub request_timeout_secs: u64,
    /// Platform requests in flight per search pipeline.
    pub lookup_concurrency: usize,
    pub chess_com_api_url: String,
    pub lichess_api_url: String,
    pub fide_ratings_url: String,
}

impl Config {
    pub fn from_env() -> Self {
        Self {
            host: env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            port: parse_var("PORT").unwrap_or(3000),
            user_agent: env::var("USER_AGENT").unwrap_or_else(|_| "ChessScout/1.0".to_string()),
            request_timeout_secs: parse_var("REQUEST_TIMEOUT_SECS").unwrap_or(30),
            lookup_concurrency: parse_var("LOOKUP_CONCURRENCY").unwrap_or(8),
            chess_com_api_url: base_url("CHESS_COM_API_URL", "https://api.chess.com"),
            lichess_api_url: base_url("LICHESS_API_URL", "https://lichess.org"),
            fide_ratings_url: base_url("FIDE_RATINGS_URL", "https://ratings.fide.com"),
        }
    }
}

fn parse_var<T: std::str::FromStr>(key: &str) -> Option<T> {
    env::var(key).ok().and_then(|v| v.parse().ok())
}

fn base_url(key: &str, default: &str) -> String {
    env::var(key)
        .unwrap_or_else(|_| default.to_string())
        .trim_end_matches('/')
        .to_string()
}
