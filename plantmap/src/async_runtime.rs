use std::future::Future;

use tokio::task::JoinHandle;

/// Runs the future on the current tokio runtime.
///
/// # Panics
///
/// Panics if called outside of a tokio runtime.
pub fn spawn<T>(future: T) -> JoinHandle<T::Output>
where
    T: Future + Send + 'static,
    T::Output: Send + 'static,
{
    tokio::spawn(future)
}
