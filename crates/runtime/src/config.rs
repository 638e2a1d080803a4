//! Session configuration structures and loaders.
use std::env;

/// Host-level knobs for a battle session. Balance lives in
/// [`battle_core::BattleConfig`]; this only covers seeding and plumbing.
#[derive(Clone, Debug)]
pub struct SessionConfig {
    /// Battle seed; drawn from the OS RNG when unset.
    pub seed: Option<u64>,
    /// Overrides the content's watchdog duration.
    pub watchdog_ms: Option<u64>,
    pub event_buffer_size: usize,
    pub command_buffer_size: usize,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            seed: None,
            watchdog_ms: None,
            event_buffer_size: 256,
            command_buffer_size: 32,
        }
    }
}

impl SessionConfig {
    /// Construct configuration from process environment variables.
    ///
    /// Loads `.env` first when present.
    ///
    /// - `SKIRMISH_SEED`
    /// - `SKIRMISH_WATCHDOG_MS`
    /// - `SKIRMISH_EVENT_BUFFER`
    pub fn from_env() -> Self {
        if let Err(err) = dotenvy::dotenv()
            && !err.not_found()
        {
            tracing::warn!(%err, "ignoring unreadable .env file");
        }

        let defaults = Self::default();
        Self {
            seed: read_env::<u64>("SKIRMISH_SEED"),
            watchdog_ms: read_env::<u64>("SKIRMISH_WATCHDOG_MS").filter(|ms| *ms > 0),
            event_buffer_size: read_env::<usize>("SKIRMISH_EVENT_BUFFER")
                .map_or(defaults.event_buffer_size, |capacity| capacity.max(1)),
            ..defaults
        }
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn with_watchdog_ms(mut self, watchdog_ms: u64) -> Self {
        self.watchdog_ms = Some(watchdog_ms);
        self
    }

    /// The configured seed, or a fresh random one.
    pub fn resolve_seed(&self) -> u64 {
        self.seed.unwrap_or_else(rand::random)
    }
}

fn read_env<T>(key: &str) -> Option<T>
where
    T: std::str::FromStr,
{
    env::var(key).ok()?.parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn explicit_seed_is_kept() {
        let config = SessionConfig::default().with_seed(42);
        assert_eq!(config.resolve_seed(), 42);
        assert_eq!(config.resolve_seed(), 42);
    }

    #[test]
    fn defaults_leave_content_in_charge() {
        let config = SessionConfig::default();
        assert!(config.seed.is_none());
        assert!(config.watchdog_ms.is_none());
    }
}
