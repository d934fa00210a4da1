//! Tri-state protocol describing the lifecycle of one asynchronous fetch.

use core::fmt::Display;
use core::future::Future;

use futures::stream::{self, BoxStream};
use futures::{FutureExt, Stream, StreamExt};

/// Lifecycle of one asynchronous fetch.
///
/// Fetch-producing operations return a [`ResourceStream`] rather than a
/// single value so that consumers can observe "loading", "succeeded" and
/// "failed" as distinct moments. A well-formed sequence is [`Resource::Loading`]
/// followed by exactly one terminal value.
///
/// # Example
///
/// ```rust
/// use oxide_udf::Resource;
///
/// let loaded: Resource<Vec<u32>> = Resource::Success(vec![1, 2]);
/// assert!(loaded.is_terminal());
///
/// let failed: Resource<Vec<u32>> = Resource::from_result(Err::<Vec<u32>, _>("timed out"));
/// assert_eq!(failed, Resource::Error(Some("timed out".to_string())));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resource<T> {
    /// The fetch has started and has not produced a value yet.
    Loading,
    /// The fetch completed. The value itself may be empty.
    Success(T),
    /// The fetch failed. The message is absent when no diagnostic text exists.
    Error(Option<String>),
}

/// A boxed, sendable sequence of [`Resource`] values for one invocation.
pub type ResourceStream<T> = BoxStream<'static, Resource<T>>;

impl<T> Resource<T> {
    /// Create an error with a diagnostic message.
    pub fn error(message: impl Into<String>) -> Self {
        Resource::Error(Some(message.into()))
    }

    /// Fold a `Result` into a terminal value.
    ///
    /// The error's `Display` text becomes the message; empty text is
    /// treated as an absent message.
    pub fn from_result<E: Display>(result: Result<T, E>) -> Self {
        match result {
            Ok(value) => Resource::Success(value),
            Err(error) => {
                let message = error.to_string();
                Resource::Error((!message.is_empty()).then_some(message))
            }
        }
    }

    pub fn is_loading(&self) -> bool {
        matches!(self, Resource::Loading)
    }

    /// `true` for `Success` and `Error`.
    pub fn is_terminal(&self) -> bool {
        !self.is_loading()
    }

    pub fn map<U, F>(self, f: F) -> Resource<U>
    where
        F: FnOnce(T) -> U,
    {
        match self {
            Resource::Loading => Resource::Loading,
            Resource::Success(value) => Resource::Success(f(value)),
            Resource::Error(message) => Resource::Error(message),
        }
    }
}

/// Build a well-formed sequence from a single fallible future.
///
/// The sequence yields `Loading` immediately, then the folded outcome of
/// `future` once it resolves. The future is not polled until the second
/// value is requested.
pub fn fetch<T, E, F>(future: F) -> ResourceStream<T>
where
    T: Send + 'static,
    E: Display + 'static,
    F: Future<Output = Result<T, E>> + Send + 'static,
{
    stream::once(async { Resource::Loading })
        .chain(stream::once(future.map(Resource::from_result)))
        .boxed()
}

/// Consume a sequence until its first terminal value.
///
/// Returns `Some(Ok(value))` for `Success`, `Some(Err(message))` for
/// `Error`, and `None` when the sequence ends without a terminal value.
/// Nothing after the terminal value is read.
pub async fn settle<T, S>(mut sequence: S) -> Option<Result<T, Option<String>>>
where
    S: Stream<Item = Resource<T>> + Unpin,
{
    let mut position = 0usize;
    while let Some(resource) = sequence.next().await {
        match resource {
            Resource::Loading => {
                if position > 0 {
                    tracing::trace!(position, "repeated loading value in resource sequence");
                }
            }
            Resource::Success(value) => return Some(Ok(value)),
            Resource::Error(message) => return Some(Err(message)),
        }
        position += 1;
    }

    tracing::warn!(values = position, "resource sequence ended without a terminal value");
    None
}
