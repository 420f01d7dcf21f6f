//! Startup configuration.
//!
//! [`Config`] carries the three required file paths plus the tunables for the
//! shared queue and the event bus. It is resolved once at startup from the
//! process environment (the binary pre-loads `cfg.env` via dotenvy first).
//!
//! ## Sentinel values
//! - `queue_capacity = 0` → treated as 1 (the channel needs at least one slot)
//! - `bus_capacity = 0` → treated as 1 (clamped by the bus as well)

use std::env;
use std::path::PathBuf;

use crate::error::ConfigError;

/// Environment variable naming the input records file.
const INPUT_FILE: &str = "INPUT_FILE";
/// Environment variable naming the output sink file.
const OUTPUT_FILE: &str = "OUTPUT_FILE";
/// Environment variable naming the log file.
const LOG_FILE: &str = "LOG_FILE";
/// Optional override for the shared queue capacity.
const QUEUE_CAPACITY: &str = "QUEUE_CAPACITY";
/// Optional override for the event bus capacity.
const BUS_CAPACITY: &str = "BUS_CAPACITY";

/// Global configuration for one pipeline run.
///
/// ## Field semantics
/// - `input_file`: source of newline-separated records
/// - `output_file`: sink receiving one transformed line per record
/// - `log_file`: destination for the event side-channel
/// - `queue_capacity`: bound of the shared record queue; a full queue blocks
///   the producer, which is the system's only back-pressure mechanism
/// - `bus_capacity`: ring-buffer size of the event broadcast channel
#[derive(Clone, Debug)]
pub struct Config {
    /// Path the producer reads records from.
    pub input_file: PathBuf,
    /// Path the workers append transformed records to.
    pub output_file: PathBuf,
    /// Path the log subscriber writes event lines to.
    pub log_file: PathBuf,
    /// Capacity of the shared record queue (min 1; clamped).
    pub queue_capacity: usize,
    /// Capacity of the event bus ring buffer (min 1; clamped).
    pub bus_capacity: usize,
}

impl Config {
    /// Resolves the configuration from the process environment.
    ///
    /// The three path variables are required; their absence is a fatal
    /// startup error. The capacity variables are optional and fall back to
    /// defaults, but a set-and-unparsable value is rejected rather than
    /// silently defaulted.
    pub fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            input_file: required_path(INPUT_FILE)?,
            output_file: required_path(OUTPUT_FILE)?,
            log_file: required_path(LOG_FILE)?,
            queue_capacity: optional_usize(QUEUE_CAPACITY, 1)?,
            bus_capacity: optional_usize(BUS_CAPACITY, 1024)?,
        })
    }

    /// Returns the queue capacity clamped to a minimum of 1.
    #[inline]
    pub fn queue_capacity_clamped(&self) -> usize {
        self.queue_capacity.max(1)
    }

    /// Returns the bus capacity clamped to a minimum of 1.
    #[inline]
    pub fn bus_capacity_clamped(&self) -> usize {
        self.bus_capacity.max(1)
    }
}

fn required_path(name: &'static str) -> Result<PathBuf, ConfigError> {
    match env::var_os(name) {
        Some(value) if !value.is_empty() => Ok(PathBuf::from(value)),
        _ => Err(ConfigError::MissingVar { name }),
    }
}

fn optional_usize(name: &'static str, default: usize) -> Result<usize, ConfigError> {
    match env::var(name) {
        Ok(value) => value
            .trim()
            .parse::<usize>()
            .map_err(|_| ConfigError::InvalidNumber { name, value }),
        Err(_) => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn capacities_are_clamped() {
        let cfg = Config {
            input_file: PathBuf::from("in.txt"),
            output_file: PathBuf::from("out.txt"),
            log_file: PathBuf::from("log.txt"),
            queue_capacity: 0,
            bus_capacity: 0,
        };
        assert_eq!(cfg.queue_capacity_clamped(), 1);
        assert_eq!(cfg.bus_capacity_clamped(), 1);
    }

    #[test]
    fn optional_usize_rejects_garbage() {
        // Process-global env mutation; use a variable no other test touches.
        std::env::set_var("LINEPOOL_TEST_CAPACITY", "not-a-number");
        let err = optional_usize("LINEPOOL_TEST_CAPACITY", 1).unwrap_err();
        assert_eq!(err.as_label(), "config_invalid_number");
        std::env::remove_var("LINEPOOL_TEST_CAPACITY");
    }

    #[test]
    fn optional_usize_defaults_when_absent() {
        assert_eq!(optional_usize("LINEPOOL_TEST_ABSENT", 64).unwrap(), 64);
    }
}
