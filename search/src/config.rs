//! Search configuration: key=value properties and their typed form.
//!
//! Keys follow the `search.*` naming of the original property surface.
//! Unknown keys are ignored — the properties map is shared with collaborators
//! that recognize their own key families — but a recognized key with a
//! malformed value is a construction-time [`ConfigError`].

use std::collections::{BTreeMap, BTreeSet};

use crate::error::ConfigError;

/// Enable the A* adaptation: add the path length to the strategy rank.
pub const KEY_ASTAR: &str = "search.heuristic.astar";
/// Enable beam mode: selection clears the queue instead of popping.
pub const KEY_BEAM_SEARCH: &str = "search.heuristic.beam_search";
/// Queue capacity. Negative means unbounded; zero is rejected.
pub const KEY_QUEUE_LIMIT: &str = "search.heuristic.queue_limit";
/// Ranking strategy name.
pub const KEY_STRATEGY: &str = "search.heuristic.strategy";
/// Ring buffer size for the global-switch-thread strategy.
pub const KEY_THREAD_HISTORY_SIZE: &str = "search.heuristic.thread_history_size";
/// Trailing window length for the interleaving strategy.
pub const KEY_THREAD_HISTORY_LIMIT: &str = "search.heuristic.thread_history_limit";
/// Preemption count at which minimize-preemption gives up on a branch.
pub const KEY_MP_THRESHOLD: &str = "search.mp.threshold";
/// Comma-separated thread names favored by the prefer-threads strategy.
pub const KEY_PREFERRED_THREADS: &str = "search.heuristic.preferredThreads";
/// Re-queue already visited states (different paths to a state matter).
pub const KEY_PATH_SENSITIVE: &str = "search.heuristic.path_sensitive";
/// Depth beyond which new states are not queued.
pub const KEY_DEPTH_LIMIT: &str = "search.depth_limit";
/// Keep searching after a property violation instead of halting.
pub const KEY_MULTIPLE_ERRORS: &str = "search.multiple_errors";

/// Default queue capacity when `search.heuristic.queue_limit` is absent.
pub const DEFAULT_QUEUE_LIMIT: usize = 1024;
/// Default window size for both history-based strategies.
pub const DEFAULT_HISTORY_WINDOW: usize = 10;

/// An ordered key=value properties map.
///
/// Parsed from plain text: one `key=value` pair per line, `#` starts a
/// comment, blank lines and lines without `=` are skipped.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Properties {
    entries: BTreeMap<String, String>,
}

impl Properties {
    /// Create an empty map.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse properties text.
    #[must_use]
    pub fn parse(text: &str) -> Self {
        let mut entries = BTreeMap::new();
        for line in text.lines() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            if let Some((key, value)) = line.split_once('=') {
                entries.insert(key.trim().to_string(), value.trim().to_string());
            }
        }
        Self { entries }
    }

    /// Set a key, replacing any previous value.
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.entries.insert(key.into(), value.into());
    }

    /// Look up a key.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }

    /// Number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the map is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// The closed set of ranking strategies.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StrategyKind {
    /// Penalize scheduling a thread that ran recently.
    Interleaving,
    /// Prefer branches with the fewest preemptions so far.
    MinimizePreemption,
    /// Prefer states with the most blocked threads.
    MostBlocked,
    /// Prefer transitions produced by named threads.
    PreferThreads,
    /// Penalize repeats in a global window of scheduled threads.
    GlobalSwitchThread,
    /// Rank is published by the target program itself.
    UserDirected,
}

impl StrategyKind {
    /// The configuration name of this strategy.
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::Interleaving => "interleaving",
            Self::MinimizePreemption => "minimize_preemption",
            Self::MostBlocked => "most_blocked",
            Self::PreferThreads => "prefer_threads",
            Self::GlobalSwitchThread => "global_switch_thread",
            Self::UserDirected => "user",
        }
    }

    /// Parse a strategy name from its configuration value.
    fn parse(value: &str) -> Result<Self, ConfigError> {
        match value {
            "interleaving" => Ok(Self::Interleaving),
            "minimize_preemption" => Ok(Self::MinimizePreemption),
            "most_blocked" => Ok(Self::MostBlocked),
            "prefer_threads" => Ok(Self::PreferThreads),
            "global_switch_thread" => Ok(Self::GlobalSwitchThread),
            "user" => Ok(Self::UserDirected),
            other => Err(ConfigError::UnknownStrategy {
                value: other.to_string(),
            }),
        }
    }
}

/// Validated, typed search configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchConfig {
    /// Selected ranking strategy.
    pub strategy: StrategyKind,
    /// Add the path length to strategy ranks (A* adaptation).
    pub use_astar: bool,
    /// Beam mode: selection discards all unselected pending states.
    pub beam_search: bool,
    /// Queue capacity, already resolved (`usize::MAX` when unbounded).
    pub queue_limit: usize,
    /// Ring buffer size for [`StrategyKind::GlobalSwitchThread`].
    pub thread_history_size: usize,
    /// Trailing window for [`StrategyKind::Interleaving`].
    pub thread_history_limit: usize,
    /// Preemption cutoff for [`StrategyKind::MinimizePreemption`].
    pub preemption_threshold: i64,
    /// Thread names favored by [`StrategyKind::PreferThreads`].
    pub preferred_threads: BTreeSet<String>,
    /// Treat every child as eligible for queueing, visited or not.
    pub path_sensitive: bool,
    /// New states deeper than this are not queued.
    pub depth_limit: u32,
    /// Record every violation and keep searching.
    pub multiple_errors: bool,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            strategy: StrategyKind::MostBlocked,
            use_astar: false,
            beam_search: false,
            queue_limit: DEFAULT_QUEUE_LIMIT,
            thread_history_size: DEFAULT_HISTORY_WINDOW,
            thread_history_limit: DEFAULT_HISTORY_WINDOW,
            preemption_threshold: i64::MAX,
            preferred_threads: BTreeSet::new(),
            path_sensitive: false,
            depth_limit: u32::MAX,
            multiple_errors: false,
        }
    }
}

impl SearchConfig {
    /// Build a configuration from a properties map.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] for an unknown strategy name, a zero queue
    /// limit, or any recognized key whose value does not parse.
    pub fn from_properties(props: &Properties) -> Result<Self, ConfigError> {
        let mut config = Self::default();

        if let Some(value) = props.get(KEY_STRATEGY) {
            config.strategy = StrategyKind::parse(value)?;
        }
        config.use_astar = get_bool(props, KEY_ASTAR, config.use_astar)?;
        config.beam_search = get_bool(props, KEY_BEAM_SEARCH, config.beam_search)?;
        config.path_sensitive = get_bool(props, KEY_PATH_SENSITIVE, config.path_sensitive)?;
        config.multiple_errors = get_bool(props, KEY_MULTIPLE_ERRORS, config.multiple_errors)?;

        if let Some(value) = props.get(KEY_QUEUE_LIMIT) {
            let limit: i64 = parse_int(KEY_QUEUE_LIMIT, value)?;
            config.queue_limit = resolve_queue_limit(limit)?;
        }
        if let Some(value) = props.get(KEY_THREAD_HISTORY_SIZE) {
            config.thread_history_size = parse_window(KEY_THREAD_HISTORY_SIZE, value)?;
        }
        if let Some(value) = props.get(KEY_THREAD_HISTORY_LIMIT) {
            config.thread_history_limit = parse_window(KEY_THREAD_HISTORY_LIMIT, value)?;
        }
        if let Some(value) = props.get(KEY_MP_THRESHOLD) {
            config.preemption_threshold = parse_int(KEY_MP_THRESHOLD, value)?;
        }
        if let Some(value) = props.get(KEY_DEPTH_LIMIT) {
            config.depth_limit =
                value
                    .parse()
                    .map_err(|e| ConfigError::InvalidValue {
                        key: KEY_DEPTH_LIMIT.to_string(),
                        detail: format!("{e}"),
                    })?;
        }
        if let Some(value) = props.get(KEY_PREFERRED_THREADS) {
            config.preferred_threads = value
                .split(',')
                .map(str::trim)
                .filter(|name| !name.is_empty())
                .map(String::from)
                .collect();
        }

        Ok(config)
    }
}

/// Map a raw queue limit to a capacity: negative means unbounded, zero is a
/// configuration error, positive is taken literally.
fn resolve_queue_limit(limit: i64) -> Result<usize, ConfigError> {
    if limit < 0 {
        return Ok(usize::MAX);
    }
    if limit == 0 {
        return Err(ConfigError::InvalidValue {
            key: KEY_QUEUE_LIMIT.to_string(),
            detail: "queue must hold at least one state".to_string(),
        });
    }
    Ok(usize::try_from(limit).unwrap_or(usize::MAX))
}

fn parse_window(key: &str, value: &str) -> Result<usize, ConfigError> {
    let window: usize = value.parse().map_err(|e| ConfigError::InvalidValue {
        key: key.to_string(),
        detail: format!("{e}"),
    })?;
    if window == 0 {
        return Err(ConfigError::InvalidValue {
            key: key.to_string(),
            detail: "window must be at least 1".to_string(),
        });
    }
    Ok(window)
}

fn parse_int(key: &str, value: &str) -> Result<i64, ConfigError> {
    value.parse().map_err(|e| ConfigError::InvalidValue {
        key: key.to_string(),
        detail: format!("{e}"),
    })
}

fn get_bool(props: &Properties, key: &str, default: bool) -> Result<bool, ConfigError> {
    match props.get(key) {
        None => Ok(default),
        Some("true") => Ok(true),
        Some("false") => Ok(false),
        Some(other) => Err(ConfigError::InvalidValue {
            key: key.to_string(),
            detail: format!("expected true or false, got {other}"),
        }),
    }
}
