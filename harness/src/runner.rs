//! Run orchestration: configuration in, report out.

use tracing::info;

use statewalk_search::{
    ConfigError, HeuristicSearch, Properties, SearchConfig, SearchListener, StateSpace,
};

use crate::report::RunReport;
use crate::stats::SearchStats;

/// Run one heuristic exploration of `vm` under the given properties.
///
/// Caller listeners are notified in the order given; the statistics listener
/// is always registered last so it observes a fully notified run.
///
/// # Errors
///
/// Returns [`ConfigError`] when the properties fail validation. Nothing has
/// been explored in that case.
pub fn run_search(
    props: &Properties,
    vm: &mut dyn StateSpace,
    listeners: Vec<Box<dyn SearchListener>>,
) -> Result<RunReport, ConfigError> {
    let config = SearchConfig::from_properties(props)?;
    Ok(run_search_configured(&config, vm, listeners))
}

/// Like [`run_search`], for callers that already hold a validated config.
pub fn run_search_configured(
    config: &SearchConfig,
    vm: &mut dyn StateSpace,
    listeners: Vec<Box<dyn SearchListener>>,
) -> RunReport {
    let strategy = config.strategy.name();
    info!(strategy, "running heuristic search");

    let stats = SearchStats::new();
    let handle = stats.handle();

    let mut search = HeuristicSearch::new(config, vm);
    for listener in listeners {
        search.add_listener(listener);
    }
    search.add_listener(Box::new(stats));
    search.run();

    let report = RunReport {
        strategy: strategy.to_string(),
        stats: handle.snapshot(),
        errors: search.errors().to_vec(),
        last_constraint: search.last_search_constraint().map(ToString::to_string),
    };
    info!(
        new_states = report.stats.new_states,
        errors = report.errors.len(),
        "heuristic search run complete"
    );
    report
}
