//! Metric names recorded by the Store.
//!
//! The Store records through the `metrics` facade only. Nothing is exported
//! unless the host application installs a recorder; [`describe_metrics`]
//! registers units and help text for whichever recorder that is.

use metrics::{Unit, describe_counter, describe_histogram};

/// Actions accepted by `Store::send`
pub const COMMANDS_TOTAL: &str = "store.commands.total";

/// Actions rejected because the store is shutting down
pub const REJECTED_ACTIONS: &str = "store.shutdown.rejected_actions";

/// Wall time spent inside the reducer per action
pub const REDUCER_DURATION: &str = "store.reducer.duration_seconds";

/// Number of effects returned by the reducer per action
pub const EFFECTS_COUNT: &str = "store.effects.count";

/// Effects executed, labelled by `type`
pub const EFFECTS_EXECUTED: &str = "store.effects.executed";

/// Listener invocations after dispatch
pub const SUBSCRIBERS_NOTIFIED: &str = "store.subscribers.notified";

/// Shutdown outcomes, labelled by `outcome`
pub const SHUTDOWN: &str = "store.shutdown";

/// Register descriptions for every Store metric with the installed recorder.
///
/// Safe to call more than once; without a recorder it does nothing.
pub fn describe_metrics() {
    describe_counter!(COMMANDS_TOTAL, Unit::Count, "Actions accepted by the store");
    describe_counter!(
        REJECTED_ACTIONS,
        Unit::Count,
        "Actions rejected because the store was shutting down"
    );
    describe_histogram!(
        REDUCER_DURATION,
        Unit::Seconds,
        "Time spent in the reducer for one action"
    );
    describe_histogram!(EFFECTS_COUNT, Unit::Count, "Effects returned per action");
    describe_counter!(EFFECTS_EXECUTED, Unit::Count, "Effects executed by type");
    describe_counter!(
        SUBSCRIBERS_NOTIFIED,
        Unit::Count,
        "Listener invocations after dispatch"
    );
    describe_counter!(SHUTDOWN, Unit::Count, "Store shutdown outcomes");
}
