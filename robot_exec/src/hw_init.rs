//! Hardware initialisation helpers
//!
//! Configuration sequences call many driver functions, each of which can fail
//! independently. Each call is passed through [`check`] and the failures are
//! summed, a sequence succeeds only if the sum is zero. Failed sequences are
//! retried from the start by [`init_with_retry`].

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use log::{error, info, warn};

use eqpt_if::DriverError;

// ---------------------------------------------------------------------------
// ENUMERATIONS
// ---------------------------------------------------------------------------

#[derive(Debug, thiserror::Error)]
pub enum HwInitError {
    #[error("Failed to initialise {0} after {1} attempts")]
    RetriesExhausted(String, u32),
}

// ---------------------------------------------------------------------------
// FUNCTIONS
// ---------------------------------------------------------------------------

/// Number of errors in a driver call result, 0 or 1.
pub fn check(result: Result<(), DriverError>) -> u32 {
    match result {
        Ok(()) => 0,
        Err(e) => {
            warn!("Driver call failed: {}", e);
            1
        }
    }
}

/// Call `init` until it returns true, at most `attempts` times.
pub fn init_with_retry<F>(name: &str, mut init: F, attempts: u32) -> Result<(), HwInitError>
where
    F: FnMut() -> bool,
{
    for attempt in 1..=attempts {
        if init() {
            if attempt > 1 {
                info!("{} initialised on attempt {}", name, attempt);
            }
            return Ok(());
        }

        warn!("{} initialisation attempt {}/{} failed", name, attempt, attempts);
    }

    error!("{} could not be initialised", name);

    Err(HwInitError::RetriesExhausted(name.to_string(), attempts))
}

// ---------------------------------------------------------------------------
// TESTS
// ---------------------------------------------------------------------------
