// Service layer module for the game engines
pub mod deck_game_service;
pub mod streak_game_service;

#[cfg(test)]
mod deck_game_service_test;

pub use deck_game_service::DeckGameService;
pub use streak_game_service::StreakGameService;
