//! Client configuration structures and loaders.
use std::env;
use std::path::PathBuf;
use std::time::Duration;

use battle_runtime::SessionConfig;

/// Everything the `skirmish` binary reads from the environment.
#[derive(Clone, Debug)]
pub struct ClientConfig {
    pub content_dir: PathBuf,
    pub encounter: String,
    /// How long the terminal "plays" each animation before reporting completion.
    pub animation: Duration,
    pub session: SessionConfig,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            content_dir: PathBuf::from("data"),
            encounter: "warband".to_string(),
            animation: Duration::from_millis(120),
            session: SessionConfig::default(),
        }
    }
}

impl ClientConfig {
    /// Construct configuration from process environment variables.
    ///
    /// - `SKIRMISH_CONTENT_DIR`
    /// - `SKIRMISH_ENCOUNTER`
    /// - `SKIRMISH_ANIMATION_MS`
    /// - plus everything [`SessionConfig::from_env`] reads
    pub fn from_env() -> Self {
        let mut config = Self {
            session: SessionConfig::from_env(),
            ..Self::default()
        };

        if let Some(dir) = read_env::<PathBuf>("SKIRMISH_CONTENT_DIR") {
            config.content_dir = dir;
        }
        if let Some(encounter) = read_env::<String>("SKIRMISH_ENCOUNTER") {
            config.encounter = encounter;
        }
        if let Some(ms) = read_env::<u64>("SKIRMISH_ANIMATION_MS") {
            config.animation = Duration::from_millis(ms);
        }

        config
    }
}

fn read_env<T>(key: &str) -> Option<T>
where
    T: std::str::FromStr,
{
    env::var(key).ok()?.parse().ok()
}
