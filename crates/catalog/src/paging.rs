//! Next-token pagination.

use std::future::Future;

use cleanup_core::{Error, Result};
use futures::stream::{self, BoxStream, StreamExt, TryStreamExt};

/// One page of a listing call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page<T> {
    pub items: Vec<T>,
    /// Token for the next page; `None` (or empty) on the last page.
    pub next_token: Option<String>,
}

impl<T> Page<T> {
    pub fn new(items: Vec<T>, next_token: Option<String>) -> Self {
        Self { items, next_token }
    }

    pub fn last(items: Vec<T>) -> Self {
        Self::new(items, None)
    }
}

enum Cursor {
    Start,
    Next(String),
    Done,
}

/// Turns a page call into a lazy stream of items.
///
/// Pages are fetched only as the stream is polled, strictly one after
/// another. The stream ends after the page without a next token, or at the
/// first error.
pub fn paginate<'a, T, F, Fut>(fetch: F) -> BoxStream<'a, Result<T>>
where
    T: Send + 'a,
    F: FnMut(Option<String>) -> Fut + Send + 'a,
    Fut: Future<Output = Result<Page<T>>> + Send + 'a,
{
    stream::try_unfold((fetch, Cursor::Start), |(mut fetch, cursor)| async move {
        let token = match cursor {
            Cursor::Start => None,
            Cursor::Next(token) => Some(token),
            Cursor::Done => return Ok::<_, Error>(None),
        };

        let page = fetch(token).await?;
        let next = match page.next_token {
            Some(token) if !token.is_empty() => Cursor::Next(token),
            _ => Cursor::Done,
        };

        let items = stream::iter(page.items.into_iter().map(Ok::<T, Error>));
        Ok::<_, Error>(Some((items, (fetch, next))))
    })
    .try_flatten()
    .boxed()
}
