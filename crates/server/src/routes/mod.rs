pub mod health;
pub mod opening_tree;
pub mod player_games;
pub mod search;
