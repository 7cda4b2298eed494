//! Metric descriptions for the Store runtime.
//!
//! The runtime records through the `metrics` facade; whichever recorder the
//! host application installs receives the values. Call [`describe_metrics`]
//! once after installing a recorder so exporters carry help text.

use metrics::{describe_counter, describe_histogram};

/// Total number of actions dispatched through any store.
pub const STORE_ACTIONS_TOTAL: &str = "store_actions_total";

/// Time spent inside the reducer for a single action.
pub const STORE_REDUCER_DURATION_SECONDS: &str = "store_reducer_duration_seconds";

/// Number of listener invocations caused by selected slices changing.
pub const STORE_LISTENERS_NOTIFIED_TOTAL: &str = "store_listeners_notified_total";

/// Register all runtime metric descriptions.
pub fn describe_metrics() {
    describe_counter!(
        STORE_ACTIONS_TOTAL,
        "Total number of actions dispatched to stores"
    );
    describe_histogram!(
        STORE_REDUCER_DURATION_SECONDS,
        "Time taken to run the reducer for one action"
    );
    describe_counter!(
        STORE_LISTENERS_NOTIFIED_TOTAL,
        "Total number of selector listeners invoked after a slice changed"
    );
}
