//! Background traversal of cursor-paginated listings.
//!
//! [`paginate`] walks a listing page by page on a spawned task and delivers
//! each page's items on a result channel. A failure is delivered once on a
//! separate error channel and ends the traversal. Both channels close when
//! the task finishes, so consumers watch both: [`PageStream`] does this.

use std::pin::Pin;
use std::task::{Context, Poll};

use futures_core::Stream;
use reqwest::Method;
use serde::de::DeserializeOwned;
use tokio::sync::mpsc::{self, Receiver, Sender};
use tokio_util::sync::CancellationToken;
use tracing::{debug, trace, warn};

use crate::error::{ReplicateError, Result};
use crate::pagination::Page;
use crate::traits::Fetch;

/// Walk every page reachable from `initial`, starting a background task.
///
/// The items of `initial` are queued on the result channel before this
/// function returns, without fetching anything. The task then follows
/// `next` cursors one page at a time; the following page is only requested
/// once the consumer has taken the previous batch. The first failure is sent
/// on the error channel and stops the traversal.
///
/// Cancelling `cancel` stops the traversal before the next fetch, or
/// abandons one in flight, and reports [`ReplicateError::Cancelled`].
///
/// Must be called from within a tokio runtime.
pub fn paginate<T, F>(
    fetcher: F,
    initial: Page<T>,
    cancel: CancellationToken,
) -> (Receiver<Vec<T>>, Receiver<ReplicateError>)
where
    T: DeserializeOwned + Send + 'static,
    F: Fetch + 'static,
{
    let (results_tx, results_rx) = mpsc::channel(1);
    let (errors_tx, errors_rx) = mpsc::channel(1);

    let next = initial.next;
    // Fresh channel with a live receiver: the slot is free.
    if results_tx.try_send(initial.results).is_err() {
        warn!("could not queue the first page");
    }

    tokio::spawn(traverse(fetcher, next, results_tx, errors_tx, cancel));

    (results_rx, errors_rx)
}

/// Like [`paginate`], but returns the channels wrapped in a [`PageStream`].
pub fn paginate_stream<T, F>(fetcher: F, initial: Page<T>, cancel: CancellationToken) -> PageStream<T>
where
    T: DeserializeOwned + Send + 'static,
    F: Fetch + 'static,
{
    let (results, errors) = paginate(fetcher, initial, cancel);
    PageStream::new(results, errors)
}

async fn traverse<T, F>(
    fetcher: F,
    mut next: Option<String>,
    results: Sender<Vec<T>>,
    errors: Sender<ReplicateError>,
    cancel: CancellationToken,
) where
    T: DeserializeOwned + Send + 'static,
    F: Fetch,
{
    let mut pages = 1usize;

    while let Some(url) = next.take() {
        // Wait for the consumer to take the previous batch before fetching.
        let permit = tokio::select! {
            biased;
            _ = cancel.cancelled() => {
                report(&errors, ReplicateError::Cancelled);
                return;
            }
            permit = results.reserve() => match permit {
                Ok(permit) => permit,
                Err(_) => {
                    debug!(pages, "result receiver dropped, stopping pagination");
                    return;
                }
            },
        };

        debug!(url = %url, page = pages + 1, "fetching page");
        let fetched = tokio::select! {
            biased;
            _ = cancel.cancelled() => {
                report(&errors, ReplicateError::Cancelled);
                return;
            }
            fetched = fetch_page::<T, F>(&fetcher, &url) => fetched,
        };

        match fetched {
            Ok(page) => {
                trace!(items = page.results.len(), "page received");
                next = page.next;
                permit.send(page.results);
                pages += 1;
            }
            Err(e) => {
                debug!(url = %url, error = %e, "page fetch failed");
                report(&errors, e);
                return;
            }
        }
    }

    debug!(pages, "pagination complete");
}

async fn fetch_page<T, F>(fetcher: &F, url: &str) -> Result<Page<T>>
where
    T: DeserializeOwned,
    F: Fetch,
{
    let body = fetcher.fetch(Method::GET, url, None).await?;
    Ok(serde_json::from_slice(&body)?)
}

/// Only one error is ever sent, so the single slot is always free.
fn report(errors: &Sender<ReplicateError>, error: ReplicateError) {
    if let Err(e) = errors.try_send(error) {
        debug!(error = %e, "error receiver gone, dropping pagination error");
    }
}

/// Consumer side of a [`paginate`] traversal.
///
/// Yields each batch in page order, then at most one error, then ends.
/// Implements [`Stream`] and offers [`next_batch`](Self::next_batch) for
/// callers that don't use stream combinators.
#[derive(Debug)]
pub struct PageStream<T> {
    results: Receiver<Vec<T>>,
    errors: Receiver<ReplicateError>,
    done: bool,
}

impl<T> PageStream<T> {
    /// Wrap the channel pair returned by [`paginate`].
    pub fn new(results: Receiver<Vec<T>>, errors: Receiver<ReplicateError>) -> Self {
        Self {
            results,
            errors,
            done: false,
        }
    }

    /// Wait for the next batch.
    ///
    /// Returns `None` once the traversal has finished or after an error has
    /// been returned.
    pub async fn next_batch(&mut self) -> Option<Result<Vec<T>>> {
        std::future::poll_fn(|cx| self.poll_batch(cx)).await
    }

    /// Drain the traversal into one vector, in server order.
    ///
    /// # Errors
    ///
    /// Returns the traversal's error, if one was reported.
    pub async fn collect_all(mut self) -> Result<Vec<T>> {
        let mut all = Vec::new();
        while let Some(batch) = self.next_batch().await {
            all.extend(batch?);
        }
        Ok(all)
    }

    fn poll_batch(&mut self, cx: &mut Context<'_>) -> Poll<Option<Result<Vec<T>>>> {
        if self.done {
            return Poll::Ready(None);
        }

        // Batches first: one sent before the error must not be skipped.
        match self.results.poll_recv(cx) {
            Poll::Ready(Some(batch)) => return Poll::Ready(Some(Ok(batch))),
            Poll::Ready(None) => {
                self.done = true;
                return match self.errors.poll_recv(cx) {
                    Poll::Ready(Some(e)) => Poll::Ready(Some(Err(e))),
                    _ => Poll::Ready(None),
                };
            }
            Poll::Pending => {}
        }

        match self.errors.poll_recv(cx) {
            Poll::Ready(Some(e)) => {
                self.done = true;
                Poll::Ready(Some(Err(e)))
            }
            // Error side closed first; the result side closes next and wakes us.
            Poll::Ready(None) | Poll::Pending => Poll::Pending,
        }
    }
}

impl<T> Stream for PageStream<T> {
    type Item = Result<Vec<T>>;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        self.get_mut().poll_batch(cx)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_stream_yields_buffered_batch_before_error() {
        let (results_tx, results_rx) = mpsc::channel(1);
        let (errors_tx, errors_rx) = mpsc::channel(1);

        results_tx.send(vec![1, 2]).await.unwrap();
        errors_tx.send(ReplicateError::Cancelled).await.unwrap();
        drop(results_tx);
        drop(errors_tx);

        let mut stream = PageStream::new(results_rx, errors_rx);
        assert_eq!(stream.next_batch().await.unwrap().unwrap(), vec![1, 2]);
        assert!(matches!(
            stream.next_batch().await,
            Some(Err(ReplicateError::Cancelled))
        ));
        assert!(stream.next_batch().await.is_none());
    }

    #[test]
    fn test_stream_waits_for_results_after_error_side_closes() {
        let (results_tx, results_rx) = mpsc::channel::<Vec<u8>>(1);
        let (errors_tx, errors_rx) = mpsc::channel(1);
        let mut stream = PageStream::new(results_rx, errors_rx);

        let mut next = tokio_test::task::spawn(stream.next_batch());
        tokio_test::assert_pending!(next.poll());

        drop(errors_tx);
        tokio_test::assert_pending!(next.poll());

        results_tx.try_send(vec![7]).unwrap();
        assert!(next.is_woken());
        match next.poll() {
            Poll::Ready(Some(Ok(batch))) => assert_eq!(batch, vec![7]),
            other => panic!("expected a batch, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_stream_ends_cleanly_without_error() {
        let (results_tx, results_rx) = mpsc::channel(1);
        let (errors_tx, errors_rx) = mpsc::channel::<ReplicateError>(1);

        tokio::spawn(async move {
            results_tx.send(vec!["a"]).await.unwrap();
            results_tx.send(vec!["b", "c"]).await.unwrap();
            drop(errors_tx);
        });

        let all = PageStream::new(results_rx, errors_rx).collect_all().await.unwrap();
        assert_eq!(all, vec!["a", "b", "c"]);
    }

    #[tokio::test]
    async fn test_collect_all_returns_error() {
        let (results_tx, results_rx) = mpsc::channel(1);
        let (errors_tx, errors_rx) = mpsc::channel(1);

        tokio::spawn(async move {
            results_tx.send(vec![1]).await.unwrap();
            errors_tx
                .send(ReplicateError::ApiError {
                    message: "boom".to_string(),
                    status_code: Some(500),
                })
                .await
                .unwrap();
        });

        let err = PageStream::<i32>::new(results_rx, errors_rx)
            .collect_all()
            .await
            .unwrap_err();
        assert_eq!(err.status_code(), Some(500));
    }
}
