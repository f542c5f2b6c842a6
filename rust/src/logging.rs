//! Leveled stderr logging for scheduling runs.
//!
//! Disabled runs (verbosity=0) pay only an integer comparison per call site.
//! Levels:
//! - 0: SILENT
//! - 1: SUMMARY (run size, project duration, critical path)
//! - 2: PHASES (graph construction, sort, forward/backward passes)
//! - 3: DEBUG (per-task timings)

pub const VERBOSITY_SILENT: u8 = 0;
pub const VERBOSITY_SUMMARY: u8 = 1;
pub const VERBOSITY_PHASES: u8 = 2;
pub const VERBOSITY_DEBUG: u8 = 3;

/// Log at SUMMARY level (verbosity >= 1).
#[macro_export]
macro_rules! log_summary {
    ($verbosity:expr, $($arg:tt)*) => {
        if $verbosity >= $crate::logging::VERBOSITY_SUMMARY {
            eprintln!($($arg)*);
        }
    };
}

/// Log at PHASES level (verbosity >= 2).
///
/// Used once per pipeline phase, never per task.
#[macro_export]
macro_rules! log_phases {
    ($verbosity:expr, $($arg:tt)*) => {
        if $verbosity >= $crate::logging::VERBOSITY_PHASES {
            eprintln!($($arg)*);
        }
    };
}

/// Log at DEBUG level (verbosity >= 3).
#[macro_export]
macro_rules! log_debug {
    ($verbosity:expr, $($arg:tt)*) => {
        if $verbosity >= $crate::logging::VERBOSITY_DEBUG {
            eprintln!($($arg)*);
        }
    };
}
