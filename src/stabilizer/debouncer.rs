//! Hysteresis-plus-timeout debouncer deciding when a category is published.

use std::time::Duration;

use crate::stabilizer::category::Category;

/// Configuration for the [`Stabilizer`].
#[derive(Debug, Clone)]
pub struct StabilizerConfig {
    /// Minimum time between two publishes of an unchanged category
    pub debounce_window: Duration,
}

impl Default for StabilizerConfig {
    fn default() -> Self {
        Self {
            debounce_window: Duration::from_secs(1),
        }
    }
}

/// Why a publish was requested.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PublishReason {
    /// Nothing has been published since startup
    Startup,
    /// Category differs from the last published one
    Changed,
    /// Category unchanged, but the debounce window has elapsed
    Refresh,
}

/// Outcome of feeding one tick's category to the stabilizer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    /// No confident detection this tick
    Idle,
    /// Same category, still inside the debounce window
    Suppress,
    /// The category should be published
    Publish(PublishReason),
}

impl Decision {
    /// Whether this decision asks for a publish.
    pub fn should_publish(&self) -> bool {
        matches!(self, Decision::Publish(_))
    }
}

/// State owned by the stabilizer for the lifetime of the process.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StabilizerState {
    /// Category of the latest non-empty tick
    pub current: Category,
    /// Last category handed to the publisher; `None` until the first publish
    pub last_published: Option<Category>,
    /// Clock time of the last publish attempt
    pub last_publish_at: Option<Duration>,
}

impl StabilizerState {
    fn decide(&self, category: Category, now: Duration, window: Duration) -> Decision {
        if category.is_none() {
            return Decision::Idle;
        }

        let (last, at) = match (self.last_published, self.last_publish_at) {
            (Some(last), Some(at)) => (last, at),
            _ => return Decision::Publish(PublishReason::Startup),
        };

        if category != last {
            Decision::Publish(PublishReason::Changed)
        } else if now.saturating_sub(at) > window {
            Decision::Publish(PublishReason::Refresh)
        } else {
            Decision::Suppress
        }
    }
}

/// Per-tick state machine over mapped categories.
///
/// Deciding and committing are separate steps: [`Stabilizer::observe`] only
/// reports whether a publish is due, and [`Stabilizer::commit`] records that a
/// publish attempt was made. A publish that is abandoned before the attempt
/// therefore leaves the publish bookkeeping untouched.
#[derive(Debug, Clone)]
pub struct Stabilizer {
    state: StabilizerState,
    config: StabilizerConfig,
}

impl Stabilizer {
    /// Create a stabilizer with nothing published yet.
    pub fn new(config: StabilizerConfig) -> Self {
        Self {
            state: StabilizerState::default(),
            config,
        }
    }

    /// Shorthand for [`Stabilizer::new`] with only the window set.
    pub fn with_window(debounce_window: Duration) -> Self {
        Self::new(StabilizerConfig { debounce_window })
    }

    /// Decide for `category` at `now` without touching any state.
    pub fn decide(&self, category: Category, now: Duration) -> Decision {
        self.state.decide(category, now, self.config.debounce_window)
    }

    /// Record the tick's category and decide whether it must be published.
    ///
    /// `Category::None` never overwrites the current category.
    pub fn observe(&mut self, category: Category, now: Duration) -> Decision {
        if !category.is_none() {
            self.state.current = category;
        }
        self.decide(category, now)
    }

    /// Mark `category` as published at `now`.
    pub fn commit(&mut self, category: Category, now: Duration) {
        if category.is_none() {
            return;
        }
        self.state.last_published = Some(category);
        self.state.last_publish_at = Some(now);
    }

    /// Get the current state.
    pub fn state(&self) -> &StabilizerState {
        &self.state
    }

    /// Get the configuration.
    pub fn config(&self) -> &StabilizerConfig {
        &self.config
    }

    /// Forget everything published so far, as after a restart.
    pub fn reset(&mut self) {
        self.state = StabilizerState::default();
    }
}

impl Default for Stabilizer {
    fn default() -> Self {
        Self::new(StabilizerConfig::default())
    }
}
