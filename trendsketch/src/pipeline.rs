// Licensed to the Apache Software Foundation (ASF) under one
// or more contributor license agreements.  See the NOTICE file
// distributed with this work for additional information
// regarding copyright ownership.  The ASF licenses this file
// to you under the Apache License, Version 2.0 (the
// "License"); you may not use this file except in compliance
// with the License.  You may obtain a copy of the License at
//
//   http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing,
// software distributed under the License is distributed on an
// "AS IS" BASIS, WITHOUT WARRANTIES OR CONDITIONS OF ANY
// KIND, either express or implied.  See the License for the
// specific language governing permissions and limitations
// under the License.

//! The document processing pipeline.
//!
//! Processing is a single-writer sequential loop: each document is normalized,
//! sketched, pushed into the window, ranked, and published before the next one is
//! looked at. Only the ingestion side may block. It runs on its own thread, polls
//! the [`DocumentSource`] once per `poll_interval`, and hands documents over
//! through a queue of depth one. A document arriving while the queue is full is
//! dropped: trending data is recency-biased, so a fresh document matters more than
//! a complete backlog.
//!
//! A stop request is honored within one `poll_interval` even when the source is
//! blocked in a pull. The ingest thread is then detached and exits once the pull
//! returns.
//!
//! # Examples
//!
//! ```
//! # use std::time::Duration;
//! # use trendsketch::config::TrendConfig;
//! # use trendsketch::pipeline::Pipeline;
//! # use trendsketch::pipeline::stop_channel;
//! # use trendsketch::sink::MemorySink;
//! # use trendsketch::source::Document;
//! # use trendsketch::source::MemorySource;
//! let config = TrendConfig::builder()
//!     .poll_interval(Duration::from_millis(10))
//!     .build()
//!     .unwrap();
//! let source = MemorySource::new([Document::new("Fed raises rates", "")]);
//! let mut sink = MemorySink::default();
//! let (_handle, signal) = stop_channel();
//!
//! let mut pipeline = Pipeline::new(config);
//! let report = pipeline.run(source, &mut sink, signal);
//! assert_eq!(report.documents_processed, 1);
//! assert_eq!(sink.latest().unwrap().words().next(), Some("fed"));
//! ```

use std::sync::Arc;
use std::sync::atomic::AtomicU64;
use std::sync::atomic::Ordering;
use std::thread;
use std::thread::JoinHandle;
use std::time::Duration;

use crossbeam_channel::Receiver;
use crossbeam_channel::RecvTimeoutError;
use crossbeam_channel::Sender;
use crossbeam_channel::TryRecvError;
use crossbeam_channel::TrySendError;
use crossbeam_channel::select;

use crate::config::TrendConfig;
use crate::source::Document;
use crate::source::DocumentSource;
use crate::sink::TrendSink;
use crate::trending::ProcessOutcome;
use crate::trending::TrendingAggregator;

/// Counters describing a pipeline's work so far.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PipelineReport {
    /// Documents fully processed, including empty ones.
    pub documents_processed: u64,
    /// Processed documents that had no tokens after normalization.
    pub empty_documents: u64,
    /// Documents dropped because the ingest queue was full.
    pub documents_dropped: u64,
    /// Polls that failed with a source error.
    pub source_failures: u64,
    /// Results the sink failed to publish.
    pub publish_failures: u64,
}

impl PipelineReport {
    fn absorb(&mut self, ingest: &IngestCounters) {
        self.documents_dropped += ingest.documents_dropped.load(Ordering::Relaxed);
        self.source_failures += ingest.source_failures.load(Ordering::Relaxed);
    }
}

// Shared with the ingest thread, which may outlive the run it belongs to.
#[derive(Debug, Default)]
struct IngestCounters {
    documents_dropped: AtomicU64,
    source_failures: AtomicU64,
}

/// Creates a connected stop handle and signal.
///
/// Stopping is cooperative: the signal is checked between documents, and a
/// document whose processing has started always completes.
pub fn stop_channel() -> (StopHandle, StopSignal) {
    let (tx, rx) = crossbeam_channel::bounded(0);
    (StopHandle { _tx: tx }, StopSignal { rx })
}

/// Requests a pipeline stop. Dropping the handle has the same effect as
/// calling [`StopHandle::stop`].
#[derive(Debug)]
pub struct StopHandle {
    // Never sent on; closing the channel is the signal.
    _tx: Sender<()>,
}

impl StopHandle {
    /// Signals every [`StopSignal`] connected to this handle.
    pub fn stop(self) {
        drop(self);
    }
}

/// Observes a [`StopHandle`]. Cheap to clone.
#[derive(Debug, Clone)]
pub struct StopSignal {
    rx: Receiver<()>,
}

impl StopSignal {
    /// Returns true once the handle has been stopped or dropped.
    pub fn is_stopped(&self) -> bool {
        matches!(self.rx.try_recv(), Err(TryRecvError::Disconnected))
    }

    // Waits up to `timeout`; returns true if the stop was signalled meanwhile.
    fn wait(&self, timeout: Duration) -> bool {
        !matches!(self.rx.recv_timeout(timeout), Err(RecvTimeoutError::Timeout))
    }
}

/// Single-slot hand-over between the ingest thread and the processing loop.
#[derive(Debug)]
struct DocumentQueue {
    tx: Sender<Document>,
}

enum Offer {
    Queued,
    Dropped,
    Closed,
}

impl DocumentQueue {
    fn new() -> (Self, Receiver<Document>) {
        let (tx, rx) = crossbeam_channel::bounded(1);
        (Self { tx }, rx)
    }

    fn offer(&self, document: Document) -> Offer {
        match self.tx.try_send(document) {
            Ok(()) => Offer::Queued,
            Err(TrySendError::Full(_)) => Offer::Dropped,
            Err(TrySendError::Disconnected(_)) => Offer::Closed,
        }
    }
}

/// Owns the [`TrendingAggregator`] and drives documents from a source to a sink.
#[derive(Debug)]
pub struct Pipeline {
    aggregator: TrendingAggregator,
    poll_interval: Duration,
    report: PipelineReport,
}

impl Pipeline {
    /// Creates a pipeline with an empty window.
    pub fn new(config: TrendConfig) -> Self {
        let poll_interval = config.poll_interval();
        Self {
            aggregator: TrendingAggregator::new(config),
            poll_interval,
            report: PipelineReport::default(),
        }
    }

    /// Returns the aggregator.
    pub fn aggregator(&self) -> &TrendingAggregator {
        &self.aggregator
    }

    /// Returns the counters accumulated over every run and processed document.
    pub fn report(&self) -> PipelineReport {
        self.report
    }

    /// Processes one document and publishes the refreshed ranking to `sink`.
    ///
    /// A sink failure is logged and counted; it never aborts processing.
    pub fn process<K: TrendSink + ?Sized>(
        &mut self,
        document: &Document,
        sink: &mut K,
    ) -> ProcessOutcome {
        let outcome = self.aggregator.ingest(&document.content());
        self.report.documents_processed += 1;
        if let ProcessOutcome::Empty { .. } = outcome {
            self.report.empty_documents += 1;
        }

        let trending = self.aggregator.current();
        if let Err(err) = sink.publish(&trending) {
            self.report.publish_failures += 1;
            tracing::warn!(%err, "failed to publish trending words, retrying on next document");
        }
        outcome
    }

    /// Runs until `stop` is signalled or `source` is exhausted and drained.
    ///
    /// The source is polled on a dedicated thread; processing and publishing happen
    /// on the calling thread. After a stop, `run` waits at most one poll interval for
    /// a pending pull to return before detaching the ingest thread. Returns the
    /// counters of this run only.
    pub fn run<S, K>(&mut self, source: S, sink: &mut K, stop: StopSignal) -> PipelineReport
    where
        S: DocumentSource + Send + 'static,
        K: TrendSink + ?Sized,
    {
        let before = self.report;
        let poll_interval = self.poll_interval;
        let (queue, documents) = DocumentQueue::new();
        let counters = Arc::new(IngestCounters::default());
        let (done_tx, done_rx) = crossbeam_channel::bounded(1);
        tracing::info!(?poll_interval, "trending pipeline started");

        let ingest_stop = stop.clone();
        let ingest_counters = counters.clone();
        let ingest = thread::Builder::new()
            .name("trend-ingest".to_owned())
            .spawn(move || {
                ingest_loop(source, queue, ingest_stop, poll_interval, &ingest_counters);
                // Nobody listens once the run has detached this thread.
                let _ = done_tx.send(());
            });
        match ingest {
            Ok(ingest) => {
                self.process_loop(&documents, sink, &stop, poll_interval);
                drop(documents);
                join_ingest(ingest, &done_rx, poll_interval);
            }
            Err(err) => tracing::warn!(%err, "failed to spawn ingest thread"),
        }
        self.report.absorb(&counters);

        let report = PipelineReport {
            documents_processed: self.report.documents_processed - before.documents_processed,
            empty_documents: self.report.empty_documents - before.empty_documents,
            documents_dropped: self.report.documents_dropped - before.documents_dropped,
            source_failures: self.report.source_failures - before.source_failures,
            publish_failures: self.report.publish_failures - before.publish_failures,
        };
        tracing::info!(?report, "trending pipeline stopped");
        report
    }

    fn process_loop<K: TrendSink + ?Sized>(
        &mut self,
        documents: &Receiver<Document>,
        sink: &mut K,
        stop: &StopSignal,
        wait: Duration,
    ) {
        loop {
            select! {
                recv(documents) -> document => match document {
                    Ok(document) => {
                        self.process(&document, sink);
                    }
                    // Source exhausted and queue drained.
                    Err(_) => return,
                },
                recv(stop.rx) -> _ => return,
                default(wait) => {}
            }
        }
    }
}

fn join_ingest(ingest: JoinHandle<()>, done: &Receiver<()>, wait: Duration) {
    match done.recv_timeout(wait) {
        Ok(()) | Err(RecvTimeoutError::Disconnected) => {
            if let Err(panic) = ingest.join() {
                std::panic::resume_unwind(panic);
            }
        }
        Err(RecvTimeoutError::Timeout) => {
            tracing::warn!(?wait, "document source still blocked, detaching ingest thread");
        }
    }
}

fn ingest_loop<S: DocumentSource>(
    mut source: S,
    queue: DocumentQueue,
    stop: StopSignal,
    poll_interval: Duration,
    counters: &IngestCounters,
) {
    loop {
        if stop.is_stopped() || source.is_exhausted() {
            break;
        }
        match source.next_document() {
            Ok(Some(document)) => match queue.offer(document) {
                Offer::Queued => {}
                Offer::Dropped => {
                    counters.documents_dropped.fetch_add(1, Ordering::Relaxed);
                    tracing::warn!("processing is behind, dropped incoming document");
                }
                Offer::Closed => break,
            },
            Ok(None) => tracing::trace!("no document this tick"),
            Err(err) => {
                counters.source_failures.fetch_add(1, Ordering::Relaxed);
                tracing::warn!(%err, "document source unavailable, skipping tick");
            }
        }
        if source.is_exhausted() || stop.wait(poll_interval) {
            break;
        }
    }
    tracing::debug!(?counters, "ingest loop finished");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_queue_drops_when_full() {
        let (queue, rx) = DocumentQueue::new();
        assert!(matches!(queue.offer(Document::new("first", "")), Offer::Queued));
        assert!(matches!(queue.offer(Document::new("second", "")), Offer::Dropped));
        assert_eq!(rx.recv().unwrap().title(), "first");
        assert!(matches!(queue.offer(Document::new("third", "")), Offer::Queued));
        drop(rx);
        assert!(matches!(queue.offer(Document::new("fourth", "")), Offer::Closed));
    }

    #[test]
    fn test_stop_signal() {
        let (handle, signal) = stop_channel();
        let other = signal.clone();
        assert!(!signal.is_stopped());
        assert!(!signal.wait(Duration::from_millis(1)));
        handle.stop();
        assert!(signal.is_stopped());
        assert!(other.wait(Duration::from_secs(10)));
    }
}
