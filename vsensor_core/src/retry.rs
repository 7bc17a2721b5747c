//! Bounded retry for sink writes.

use crate::error::PersistenceError;
use tracing::debug;
use vsensor_env::EnvError;

/// Runs `write` up to `attempts` times (at least once), returning the last error.
///
/// No sleeping between attempts: callers sit on the synchronous tick path.
pub(crate) fn write_with_retries<F>(attempts: u32, mut write: F) -> Result<(), PersistenceError>
where
    F: FnMut() -> Result<(), EnvError>,
{
    let attempts = attempts.max(1);
    let mut attempt = 1;
    loop {
        match write() {
            Ok(()) => return Ok(()),
            Err(source) if attempt >= attempts => {
                return Err(PersistenceError::Write { attempts, source });
            }
            Err(e) => {
                debug!("write attempt {}/{} failed: {}", attempt, attempts, e);
                attempt += 1;
            }
        }
    }
}
