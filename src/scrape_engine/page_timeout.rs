//! Timeout utilities for session operations
//!
//! Bounds browser operations that have no timeout of their own (navigation in
//! particular) so a hung page can never stall the run.

use std::future::Future;
use std::time::Duration;

use crate::session::SessionError;

/// Run a session operation under an explicit deadline.
///
/// An elapsed deadline becomes [`SessionError::Timeout`] naming
/// `operation_name`, which callers treat like any other page-load timeout.
pub async fn with_page_timeout<F, T>(
    operation: F,
    timeout: Duration,
    operation_name: &str,
) -> Result<T, SessionError>
where
    F: Future<Output = Result<T, SessionError>>,
{
    match tokio::time::timeout(timeout, operation).await {
        Ok(result) => result,
        Err(_) => Err(SessionError::timeout(&[operation_name], timeout)),
    }
}
