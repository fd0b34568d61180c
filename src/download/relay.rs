//! Chunk relay loop: body stream in, file writer out.
//!
//! The loop is generic over the chunk stream and the writer so the stop-check,
//! progress and write sequence can be driven without a network.

use futures_util::{Stream, StreamExt};
use thiserror::Error;
use tokio::io::{AsyncWrite, AsyncWriteExt};
use tracing::{debug, trace};

use super::progress::DownloadProgress;

/// How a relay ended when no error occurred.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RelayOutcome {
    /// The stream ended and the writer was flushed.
    Completed {
        /// Total bytes written.
        bytes_written: u64,
    },
    /// A stop was observed before a chunk was relayed.
    Stopped {
        /// Bytes written before the stop.
        bytes_written: u64,
    },
}

impl RelayOutcome {
    /// Bytes written to the sink either way.
    #[must_use]
    pub fn bytes_written(self) -> u64 {
        match self {
            Self::Completed { bytes_written } | Self::Stopped { bytes_written } => bytes_written,
        }
    }
}

/// Failure on either side of the relay.
#[derive(Debug, Error)]
pub enum RelayError<E> {
    /// The chunk stream yielded an error.
    #[error("source stream failed: {0}")]
    Source(#[source] E),
    /// Writing or flushing the sink failed.
    #[error("sink write failed: {0}")]
    Sink(#[source] std::io::Error),
}

/// Relays `stream` into `writer`, updating `progress` after every chunk.
///
/// Before each chunk is relayed the stop flag is checked; once it is set no
/// further chunk is written and [`RelayOutcome::Stopped`] is returned. The
/// writer is flushed only on completion. `observer` sees the progress after
/// each update. A body that ends without yielding any chunk still records
/// one update when `total` is known, so a declared empty body reports 100%.
///
/// # Errors
///
/// Returns [`RelayError::Source`] for a stream error and [`RelayError::Sink`]
/// when writing or flushing fails.
pub async fn relay_chunks<S, B, E, W, F>(
    stream: S,
    writer: &mut W,
    total: Option<u64>,
    progress: &mut DownloadProgress,
    mut observer: F,
) -> Result<RelayOutcome, RelayError<E>>
where
    S: Stream<Item = Result<B, E>>,
    B: AsRef<[u8]>,
    W: AsyncWrite + Unpin + ?Sized,
    F: FnMut(&DownloadProgress),
{
    let mut stream = std::pin::pin!(stream);
    let mut bytes_written: u64 = 0;
    let mut chunks_relayed: u64 = 0;

    while let Some(chunk) = stream.next().await {
        if progress.should_stop() {
            debug!(bytes_written, "stop requested, abandoning transfer");
            return Ok(RelayOutcome::Stopped { bytes_written });
        }

        let chunk = chunk.map_err(RelayError::Source)?;
        let chunk = chunk.as_ref();
        writer.write_all(chunk).await.map_err(RelayError::Sink)?;
        bytes_written += chunk.len() as u64;
        chunks_relayed += 1;

        progress.record(bytes_written, total);
        trace!(bytes_written, percent = progress.percent, "chunk relayed");
        observer(progress);
    }

    if chunks_relayed == 0 && total.is_some() {
        progress.record(bytes_written, total);
        observer(progress);
    }

    writer.flush().await.map_err(RelayError::Sink)?;
    Ok(RelayOutcome::Completed { bytes_written })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use bytes::Bytes;
    use futures_util::stream;

    fn chunks(parts: &[&'static [u8]]) -> Vec<Result<Bytes, std::io::Error>> {
        parts.iter().map(|p| Ok(Bytes::from_static(p))).collect()
    }

    #[tokio::test]
    async fn test_relay_writes_all_chunks_in_order() {
        let mut sink: Vec<u8> = Vec::new();
        let mut progress = DownloadProgress::new();

        let outcome = relay_chunks(
            stream::iter(chunks(&[b"abc", b"def", b"gh"])),
            &mut sink,
            Some(8),
            &mut progress,
            |_| {},
        )
        .await
        .unwrap();

        assert_eq!(outcome, RelayOutcome::Completed { bytes_written: 8 });
        assert_eq!(sink, b"abcdefgh");
        assert_eq!(progress.bytes_written, 8);
    }

    #[tokio::test]
    async fn test_relay_percent_is_monotonic_and_ends_at_one() {
        let mut sink: Vec<u8> = Vec::new();
        let mut progress = DownloadProgress::new();
        let mut seen = Vec::new();

        relay_chunks(
            stream::iter(chunks(&[b"aaa", b"bbb", b"ccc", b"d"])),
            &mut sink,
            Some(10),
            &mut progress,
            |p| seen.push((p.knows_percent, p.percent)),
        )
        .await
        .unwrap();

        assert_eq!(seen.len(), 4);
        assert!(seen.iter().all(|(knows, _)| *knows));
        let percents: Vec<f64> = seen.iter().map(|(_, p)| *p).collect();
        assert!(percents.windows(2).all(|w| w[0] <= w[1]), "{percents:?}");
        assert!((percents[0] - 0.3).abs() < 1e-9);
        assert!((percents[3] - 1.0).abs() < 1e-9);
    }

    #[tokio::test]
    async fn test_relay_without_total_never_knows_percent() {
        let mut sink: Vec<u8> = Vec::new();
        let mut progress = DownloadProgress::new();
        let mut knows = Vec::new();

        relay_chunks(
            stream::iter(chunks(&[b"one", b"two"])),
            &mut sink,
            None,
            &mut progress,
            |p| knows.push(p.knows_percent),
        )
        .await
        .unwrap();

        assert_eq!(knows, vec![false, false]);
        assert!(!progress.knows_percent);
        assert_eq!(progress.bytes_written, 6);
    }

    #[tokio::test]
    async fn test_relay_stop_before_first_chunk_writes_nothing() {
        let mut sink: Vec<u8> = Vec::new();
        let mut progress = DownloadProgress::new();
        progress.request_stop();

        let outcome = relay_chunks(
            stream::iter(chunks(&[b"abc"])),
            &mut sink,
            Some(3),
            &mut progress,
            |_| {},
        )
        .await
        .unwrap();

        assert_eq!(outcome, RelayOutcome::Stopped { bytes_written: 0 });
        assert!(sink.is_empty());
        assert!(!progress.knows_percent);
    }

    #[tokio::test]
    async fn test_relay_stop_during_delivery_skips_remaining_chunks() {
        let mut sink: Vec<u8> = Vec::new();
        let mut progress = DownloadProgress::new();
        let stop = progress.stop_handle();
        let mut calls = 0;

        let outcome = relay_chunks(
            stream::iter(chunks(&[b"first", b"second", b"third"])),
            &mut sink,
            Some(16),
            &mut progress,
            |_| {
                calls += 1;
                stop.request_stop();
            },
        )
        .await
        .unwrap();

        assert_eq!(outcome, RelayOutcome::Stopped { bytes_written: 5 });
        assert_eq!(sink, b"first");
        assert_eq!(calls, 1);
        assert!(progress.should_stop(), "stop flag is never cleared");
    }

    #[tokio::test]
    async fn test_relay_stop_set_by_stream_side_is_observed() {
        let mut sink: Vec<u8> = Vec::new();
        let mut progress = DownloadProgress::new();
        let stop = progress.stop_handle();

        // The flag flips as the second chunk arrives, before it is relayed.
        let body = stream::iter(chunks(&[b"a", b"b", b"c"]))
            .enumerate()
            .map(move |(index, chunk)| {
                if index == 1 {
                    stop.request_stop();
                }
                chunk
            });

        let outcome = relay_chunks(body, &mut sink, None, &mut progress, |_| {})
            .await
            .unwrap();

        assert_eq!(outcome, RelayOutcome::Stopped { bytes_written: 1 });
        assert_eq!(sink, b"a");
    }

    #[tokio::test]
    async fn test_relay_source_error_is_propagated() {
        let mut sink: Vec<u8> = Vec::new();
        let mut progress = DownloadProgress::new();
        let body = stream::iter(vec![
            Ok(Bytes::from_static(b"ok")),
            Err(std::io::Error::new(
                std::io::ErrorKind::ConnectionReset,
                "reset",
            )),
        ]);

        let result = relay_chunks(body, &mut sink, Some(10), &mut progress, |_| {}).await;

        match result {
            Err(RelayError::Source(e)) => {
                assert_eq!(e.kind(), std::io::ErrorKind::ConnectionReset);
            }
            other => panic!("expected source error, got {other:?}"),
        }
        assert_eq!(sink, b"ok");
    }

    #[tokio::test]
    async fn test_relay_sink_error_is_propagated() {
        let mut sink = tokio_test::io::Builder::new()
            .write_error(std::io::Error::other("disk full"))
            .build();
        let mut progress = DownloadProgress::new();

        let result = relay_chunks(
            stream::iter(chunks(&[b"data"])),
            &mut sink,
            Some(4),
            &mut progress,
            |_| {},
        )
        .await;

        assert!(matches!(result, Err(RelayError::Sink(_))));
        assert_eq!(progress.bytes_written, 0);
    }

    #[tokio::test]
    async fn test_relay_empty_stream_with_zero_total_reports_complete() {
        let mut sink: Vec<u8> = Vec::new();
        let mut progress = DownloadProgress::new();
        let mut seen = Vec::new();

        let outcome = relay_chunks(
            stream::iter(chunks(&[])),
            &mut sink,
            Some(0),
            &mut progress,
            |p| seen.push((p.knows_percent, p.percent)),
        )
        .await
        .unwrap();

        assert_eq!(outcome.bytes_written(), 0);
        assert!(matches!(outcome, RelayOutcome::Completed { .. }));
        assert!(progress.knows_percent);
        assert!((progress.percent - 1.0).abs() < 1e-9);
        assert_eq!(progress.total_bytes, Some(0));
        assert_eq!(seen.len(), 1, "observer sees the final update once");
    }

    #[tokio::test]
    async fn test_relay_empty_stream_without_total_leaves_progress_unknown() {
        let mut sink: Vec<u8> = Vec::new();
        let mut progress = DownloadProgress::new();
        let mut calls = 0;

        let outcome = relay_chunks(
            stream::iter(chunks(&[])),
            &mut sink,
            None,
            &mut progress,
            |_| calls += 1,
        )
        .await
        .unwrap();

        assert_eq!(outcome, RelayOutcome::Completed { bytes_written: 0 });
        assert!(!progress.knows_percent);
        assert_eq!(calls, 0);
    }
}
