use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumString};

// It is used by strum to convert the enum to a string
// but the compiler complains that it is unused
#[allow(unused_imports)]
use std::str::FromStr;

/// Lifecycle events emitted by the launcher.
/// Rendered in `SCREAMING_SNAKE_CASE` as the `event` field of log records.
#[derive(Clone, Debug, Copy, PartialEq, Eq, Serialize, Deserialize, EnumString, Display)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
#[non_exhaustive]
pub enum EventType {
    // Run lifecycle
    RunTriggered,
    RunStart,
    RunSuccess,
    RunFailure,

    // Task lifecycle
    TaskStart,
    TaskSuccess,
    TaskFailure,
    TaskReadyToRetry,
    TaskUpstreamFailed,
    TaskOutput,

    // Engine/system events
    EngineEvent,
    EngineInitFailure,
}
