pub mod clients;
pub mod config;
pub mod error;
pub mod routes;

use axum::{
    routing::{get, post},
    Extension, Router,
};
use tower_http::compression::CompressionLayer;
use tower_http::cors::{Any, CorsLayer};

use clients::Clients;
use config::Config;

/// Router with every endpoint and the shared state layers.
pub fn app(config: Config, clients: Clients) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        // Health
        .route("/health", get(routes::health::health_check))
        // Account search
        .route("/api/search", post(routes::search::search_accounts))
        // Games
        .route("/api/player-games", get(routes::player_games::get_game_count))
        .route("/api/openingtree/playerGames", get(routes::player_games::get_player_games))
        // Opening tree
        .route("/api/opening-tree", post(routes::opening_tree::build_opening_tree))
        // Shared state
        .layer(Extension(config))
        .layer(Extension(clients))
        .layer(CompressionLayer::new())
        .layer(cors)
}
