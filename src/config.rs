use serde::Deserialize;
use std::env;

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub game: GameConfig,
    pub log: LogConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct GameConfig {
    /// Cumulative wall-clock budget for a whole streak attempt, in seconds.
    pub streak_time_budget_secs: u64,
    /// Default page size for history queries.
    pub history_page_size: usize,
}

#[derive(Debug, Deserialize, Clone)]
pub struct LogConfig {
    pub rust_log: String,
}

impl Default for GameConfig {
    fn default() -> Self {
        GameConfig {
            streak_time_budget_secs: 20,
            history_page_size: 10,
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self, anyhow::Error> {
        dotenvy::dotenv().ok();

        let streak_time_budget_secs: u64 = env::var("STREAK_TIME_BUDGET_SECS")
            .unwrap_or_else(|_| "20".to_string())
            .parse()?;
        let history_page_size: usize = env::var("HISTORY_PAGE_SIZE")
            .unwrap_or_else(|_| "10".to_string())
            .parse()?;
        let rust_log = env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string());

        Ok(Config {
            game: GameConfig {
                streak_time_budget_secs,
                history_page_size,
            },
            log: LogConfig { rust_log },
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_game_config_defaults() {
        let config = GameConfig::default();
        assert_eq!(config.streak_time_budget_secs, 20);
        assert_eq!(config.history_page_size, 10);
    }
}
