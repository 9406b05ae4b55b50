//! Global constants used throughout the hfsel codebase.
//!
//! Timeout durations live here rather than inline at call sites so that
//! operational tuning is discoverable in one place.

use std::time::Duration;

/// Timeout for a single `helmfile build` invocation (5 minutes).
///
/// A build renders every release under one environment and may pull chart
/// repositories, so it is given generous headroom. A build that exceeds this
/// is treated exactly like a non-zero exit: fatal for the whole run.
pub const HELMFILE_BUILD_TIMEOUT: Duration = Duration::from_secs(300);
