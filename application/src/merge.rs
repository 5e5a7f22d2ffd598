//! Concurrent merge of async producers.
//!
//! [`MergedStream`] runs several producers at once and yields whatever they
//! emit in arrival order through one bounded channel. Each producer also
//! returns a terminal value; [`MergedStream::results`] collects those in
//! submission order once everything has finished.
//!
//! ```text
//! source 0 ──emit──┐
//! source 1 ──emit──┼──▶ mpsc (bounded) ──▶ Stream<Item = Y>
//! source 2 ──emit──┘
//!     │ return Option<R>
//!     └──────────────▶ JoinSet ──▶ results() in submission order
//! ```

use futures::Stream;
use std::future::Future;
use std::pin::Pin;
use std::task::{Context, Poll};
use tokio::sync::mpsc;
use tokio::task::JoinSet;
use tracing::warn;

/// Handle a producer uses to push items into the merged stream.
pub struct Emitter<Y> {
    tx: mpsc::Sender<Y>,
}

impl<Y> Clone for Emitter<Y> {
    fn clone(&self) -> Self {
        Self {
            tx: self.tx.clone(),
        }
    }
}

impl<Y: Send> Emitter<Y> {
    /// Push an item, waiting while the buffer is full.
    ///
    /// Returns `false` once nobody reads the merged stream anymore; the
    /// producer may keep running and simply stop emitting.
    pub async fn emit(&self, item: Y) -> bool {
        self.tx.send(item).await.is_ok()
    }

    /// Whether the merged stream has been closed by its reader.
    pub fn is_closed(&self) -> bool {
        self.tx.is_closed()
    }
}

/// Items from several concurrently running producers, in arrival order.
///
/// Every producer is spawned immediately on the current tokio runtime.
/// Order is preserved per producer; across producers the first item
/// available is yielded first. The stream ends when every producer has
/// finished. Dropping it aborts producers that are still running.
pub struct MergedStream<Y, R> {
    rx: Option<mpsc::Receiver<Y>>,
    tasks: JoinSet<(usize, Option<R>)>,
    sources: usize,
}

impl<Y, R> MergedStream<Y, R>
where
    Y: Send + 'static,
    R: Send + 'static,
{
    /// Spawn all `sources`, buffering at most `buffer` undelivered items.
    ///
    /// Must be called from within a tokio runtime.
    pub fn merge<F, Fut>(sources: impl IntoIterator<Item = F>, buffer: usize) -> Self
    where
        F: FnOnce(Emitter<Y>) -> Fut,
        Fut: Future<Output = Option<R>> + Send + 'static,
    {
        let (tx, rx) = mpsc::channel(buffer.max(1));
        let mut tasks = JoinSet::new();
        let mut count = 0;

        for (index, source) in sources.into_iter().enumerate() {
            let producer = source(Emitter { tx: tx.clone() });
            tasks.spawn(async move { (index, producer.await) });
            count += 1;
        }

        Self {
            rx: Some(rx),
            tasks,
            sources: count,
        }
    }

    /// Number of producers that were merged.
    pub fn len(&self) -> usize {
        self.sources
    }

    pub fn is_empty(&self) -> bool {
        self.sources == 0
    }

    /// Wait for every producer and return their terminal values.
    ///
    /// The stream is closed first, so producers blocked on a full buffer
    /// are released and their remaining items discarded. Values come back
    /// in submission order; `None` values and producers that panicked are
    /// left out.
    pub async fn results(mut self) -> Vec<R> {
        drop(self.rx.take());

        let mut slots: Vec<Option<R>> = (0..self.sources).map(|_| None).collect();
        while let Some(joined) = self.tasks.join_next().await {
            match joined {
                Ok((index, value)) => slots[index] = value,
                Err(e) => warn!("Merged producer did not complete: {}", e),
            }
        }

        slots.into_iter().flatten().collect()
    }
}

impl<Y, R> Stream for MergedStream<Y, R> {
    type Item = Y;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Y>> {
        match self.get_mut().rx.as_mut() {
            Some(rx) => rx.poll_recv(cx),
            None => Poll::Ready(None),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::StreamExt;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::time::Duration;

    #[tokio::test]
    async fn test_faster_source_yields_first() {
        let sources = [50u64, 10].map(|delay| {
            move |emitter: Emitter<String>| async move {
                tokio::time::sleep(Duration::from_millis(delay)).await;
                emitter.emit(format!("after {}ms", delay)).await;
                Some(delay)
            }
        });

        let mut merged = MergedStream::merge(sources, 8);
        let mut items = Vec::new();
        while let Some(item) = merged.next().await {
            items.push(item);
        }

        assert_eq!(items, vec!["after 10ms", "after 50ms"]);
        // Terminal values keep submission order regardless of timing
        assert_eq!(merged.results().await, vec![50, 10]);
    }

    #[tokio::test]
    async fn test_per_source_order_preserved() {
        let sources = ["a", "b"].map(|name| {
            move |emitter: Emitter<String>| async move {
                for i in 0..5 {
                    emitter.emit(format!("{}{}", name, i)).await;
                    tokio::task::yield_now().await;
                }
                None::<()>
            }
        });

        let merged = MergedStream::merge(sources, 2);
        let items: Vec<String> = merged.collect().await;

        for name in ["a", "b"] {
            let own: Vec<_> = items.iter().filter(|s| s.starts_with(name)).cloned().collect();
            let expected: Vec<_> = (0..5).map(|i| format!("{}{}", name, i)).collect();
            assert_eq!(own, expected);
        }
    }

    #[tokio::test]
    async fn test_results_filters_none() {
        let sources = [Some(1), None, Some(3)].map(|value| {
            move |_emitter: Emitter<()>| async move { value }
        });

        let merged = MergedStream::merge(sources, 4);
        assert_eq!(merged.len(), 3);
        assert_eq!(merged.results().await, vec![1, 3]);
    }

    #[tokio::test]
    async fn test_panicking_source_is_isolated() {
        let sources = [false, true, false].map(|explode| {
            move |emitter: Emitter<u8>| async move {
                emitter.emit(1).await;
                if explode {
                    panic!("source exploded");
                }
                Some("done")
            }
        });

        let mut merged = MergedStream::merge(sources, 4);
        let mut count = 0;
        while merged.next().await.is_some() {
            count += 1;
        }

        assert_eq!(count, 3);
        assert_eq!(merged.results().await, vec!["done", "done"]);
    }

    #[tokio::test]
    async fn test_unread_stream_does_not_block_results() {
        let sources = [0u8].map(|_| {
            move |emitter: Emitter<u32>| async move {
                let mut delivered = 0;
                for i in 0..100 {
                    if emitter.emit(i).await {
                        delivered += 1;
                    }
                }
                Some(delivered)
            }
        });

        let merged = MergedStream::merge(sources, 1);
        let results = tokio::time::timeout(Duration::from_secs(5), merged.results())
            .await
            .expect("results should not block on an unread stream");
        assert_eq!(results.len(), 1);
        assert!(results[0] < 100);
    }

    #[tokio::test]
    async fn test_drop_aborts_running_sources() {
        let finished = Arc::new(AtomicBool::new(false));
        let flag = Arc::clone(&finished);
        let sources = [move |_emitter: Emitter<()>| async move {
            tokio::time::sleep(Duration::from_millis(100)).await;
            flag.store(true, Ordering::SeqCst);
            Some(())
        }];

        let merged = MergedStream::merge(sources, 1);
        drop(merged);
        tokio::time::sleep(Duration::from_millis(200)).await;

        assert!(!finished.load(Ordering::SeqCst));
    }

    #[tokio::test]
    async fn test_empty_merge() {
        let sources: Vec<fn(Emitter<()>) -> std::future::Ready<Option<()>>> = Vec::new();
        let merged = MergedStream::merge(sources, 1);
        assert!(merged.is_empty());
        let items: Vec<()> = merged.collect().await;
        assert!(items.is_empty());
    }
}
