/*!
 * Wait Errors
 *
 * Untimed monitor waits cannot fail; only the timed variant reports an error.
 */

use thiserror::Error;

/// Result type for timed wait operations
pub type WaitResult<T> = Result<T, WaitError>;

/// Wait operation errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum WaitError {
    #[error("Wait operation timed out")]
    Timeout,
}
