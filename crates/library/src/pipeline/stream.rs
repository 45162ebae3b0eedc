use crate::error::{ErrorKind, Result};
use crate::pipeline::{Operations, Outcome, Pipeline};
use async_stream::stream;
use exn::ResultExt;
use futures::stream::FuturesUnordered;
use futures::{Stream, StreamExt};
use std::collections::VecDeque;
use std::path::PathBuf;

/// Progress events emitted by [`normalize`].
///
/// Events follow a strict ordering:
/// 1. [`Started`](Self::Started): exactly once.
/// 2. [`Processed`](Self::Processed): zero or more times, one per archive
///    that was processed successfully, in completion order.
/// 3. [`Complete`](Self::Complete): exactly once, after every archive has
///    either been processed or failed.
///
/// A failing archive is yielded as an `Err` item in place of its
/// [`Processed`](Self::Processed) event and does not end the stream.
#[derive(Debug)]
pub enum NormalizeEvent {
    Started,
    Processed { archive: PathBuf, outcome: Outcome },
    Complete,
}

/// Streams [`NormalizeEvent`]s while running `pipeline` over every archive.
///
/// Each archive is processed on tokio's blocking thread pool, with at most
/// `concurrency` (at least one) archives in flight. Further archives are
/// started, in the order given, as in-flight ones complete.
pub fn normalize(
    pipeline: Pipeline,
    archives: impl IntoIterator<Item = PathBuf>,
    ops: Operations,
    concurrency: usize,
) -> impl Stream<Item = Result<NormalizeEvent>> {
    let mut pending: VecDeque<PathBuf> = archives.into_iter().collect();
    let spawn = move |archive: PathBuf| {
        let pipeline = pipeline.clone();
        let ops = ops.clone();
        async move {
            let path = archive.clone();
            let joined = tokio::task::spawn_blocking(move || pipeline.process(&path, &ops)).await;
            let result = joined.or_raise(|| ErrorKind::Task).and_then(|result| result);
            result.map(|outcome| NormalizeEvent::Processed { archive, outcome })
        }
    };
    // `rustfmt` does not format macros that use braces. Wrap in parentheses!
    stream!({
        yield Ok(NormalizeEvent::Started);
        tracing::info!(archives = pending.len(), concurrency, "Normalizing archives");

        let mut processing = FuturesUnordered::new();
        processing.extend(pending.drain(..concurrency.max(1).min(pending.len())).map(&spawn));
        while let Some(result) = processing.next().await {
            yield result;
            if let Some(archive) = pending.pop_front() {
                processing.push(spawn(archive));
            }
        }

        yield Ok(NormalizeEvent::Complete);
    })
}
