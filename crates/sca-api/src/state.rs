//! Application state management

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Instant;

use sca_core::{AppConfig, Result};
use sca_extractor::{create_tagger, AttributeExtractor};

/// Application state shared across handlers.
///
/// The tagger and extractor are built once at server start and held
/// for the process lifetime.
pub struct AppState {
    /// Application configuration
    pub config: AppConfig,
    /// Server start time
    pub start_time: Instant,
    /// Request counter
    pub request_count: AtomicU64,
    /// The extraction pipeline
    pub extractor: AttributeExtractor,
}

impl AppState {
    /// Create new application state, constructing the configured tagger
    pub fn new(config: AppConfig) -> Result<Self> {
        let tagger = create_tagger(&config.tagger)?;
        let extractor = AttributeExtractor::new(tagger)?;

        Ok(Self {
            config,
            start_time: Instant::now(),
            request_count: AtomicU64::new(0),
            extractor,
        })
    }

    /// Increment request counter
    pub fn increment_requests(&self) -> u64 {
        self.request_count.fetch_add(1, Ordering::SeqCst)
    }

    /// Get total request count
    pub fn get_request_count(&self) -> u64 {
        self.request_count.load(Ordering::SeqCst)
    }

    /// Get uptime in seconds
    pub fn uptime_secs(&self) -> u64 {
        self.start_time.elapsed().as_secs()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_state_counts_requests() {
        let state = AppState::new(AppConfig::default()).unwrap();

        assert_eq!(state.get_request_count(), 0);
        state.increment_requests();
        state.increment_requests();
        assert_eq!(state.get_request_count(), 2);
    }

    #[test]
    fn test_default_state_uses_rule_tagger() {
        let state = AppState::new(AppConfig::default()).unwrap();
        assert_eq!(state.extractor.tagger_name(), "rule");
    }
}
