/// Background paint worker
///
/// Runs painters off the caller's async threads so a render loop never blocks on a pixel
/// pass. Labels are moved into the worker with each request and handed back once painted.
use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use log::{debug, error};
use tokio::runtime::Handle;
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;

use crate::coloring::Coloring;
use crate::config::CONFIG;
use crate::error::PaintError;
use crate::label::{Label, LabelKind};
use crate::painter::Painter;

pub struct PaintRequest {
    pub field: String,
    pub label: Label,
    pub coloring: Arc<Coloring>,
}

impl PaintRequest {
    pub fn new(field: &str, label: Label, coloring: Arc<Coloring>) -> Self {
        Self {
            field: field.to_string(),
            label,
            coloring,
        }
    }
}

struct PaintJob {
    request: PaintRequest,
    reply: oneshot::Sender<Result<Label, PaintError>>,
}

/// Running paint-time statistics for one label kind
struct PaintTimings {
    kind: LabelKind,
    total_time: Duration,
    count: u32,
}

impl PaintTimings {
    fn new(kind: LabelKind) -> Self {
        Self {
            kind,
            total_time: Duration::ZERO,
            count: 0,
        }
    }

    fn add_measurement(&mut self, field: &str, duration: Duration, log_each: bool) {
        self.total_time += duration;
        self.count += 1;

        if log_each {
            debug!("{} '{}' - Current: {:.2}ms, Avg: {:.2}ms, Count: {}",
                self.kind.as_str(),
                field,
                duration.as_secs_f64() * 1000.0,
                self.average_ms(),
                self.count
            );
        }
    }

    fn average_ms(&self) -> f64 {
        if self.count == 0 {
            0.0
        } else {
            (self.total_time.as_secs_f64() * 1000.0) / self.count as f64
        }
    }
}

pub struct PaintWorker {
    sender: mpsc::Sender<PaintJob>,
    handle: JoinHandle<usize>,
}

impl PaintWorker {
    /// Start the worker on the current tokio runtime
    ///
    /// At most `queue_size` requests wait in the queue; further `paint` calls wait for room.
    /// Each pixel pass runs on the blocking pool, so the runtime's async threads stay free.
    pub fn spawn(painter: Painter, queue_size: usize, log_timings: bool) -> Self {
        let (sender, receiver) = mpsc::channel(queue_size.max(1));
        let handle = tokio::spawn(run(painter, receiver, log_timings));
        Self { sender, handle }
    }

    /// Start the worker with the process-wide settings
    pub fn spawn_default(painter: Painter) -> Self {
        Self::spawn(painter, CONFIG.worker_queue_size, CONFIG.log_paint_timings)
    }

    /// Queue a label for painting and wait for it to come back painted
    pub async fn paint(&self, request: PaintRequest) -> Result<Label, PaintError> {
        let (reply, response) = oneshot::channel();
        self.sender
            .send(PaintJob { request, reply })
            .await
            .map_err(|_| PaintError::WorkerClosed)?;
        response.await.map_err(|_| PaintError::WorkerClosed)?
    }

    /// Stop accepting requests, finish the queued ones and return how many jobs ran
    pub async fn shutdown(self) -> usize {
        drop(self.sender);
        match self.handle.await {
            Ok(processed) => processed,
            Err(e) => {
                error!("Paint worker terminated abnormally: {}", e);
                0
            }
        }
    }
}

async fn run(painter: Painter, mut receiver: mpsc::Receiver<PaintJob>, log_timings: bool) -> usize {
    let runtime = Handle::current();
    let mut timings: HashMap<LabelKind, PaintTimings> = HashMap::new();
    let mut processed = 0;

    while let Some(PaintJob { request, reply }) = receiver.recv().await {
        let PaintRequest { field, mut label, coloring } = request;
        let kind = label.kind();

        let painter = painter.clone();
        let runtime = runtime.clone();
        let job = tokio::task::spawn_blocking(move || {
            let start = Instant::now();
            let result = runtime.block_on(painter.paint(&field, &mut label, &coloring));
            (result.map(|_| label), field, start.elapsed())
        });

        let result = match job.await {
            Ok((result, field, elapsed)) => {
                timings
                    .entry(kind)
                    .or_insert_with(|| PaintTimings::new(kind))
                    .add_measurement(&field, elapsed, log_timings);
                result
            }
            Err(e) => {
                error!("Paint of {} panicked or was cancelled: {}", kind.as_str(), e);
                Err(PaintError::WorkerClosed)
            }
        };
        processed += 1;

        // the requester may have given up waiting
        let _ = reply.send(result);
    }

    debug!("Paint worker stopped after {} jobs", processed);
    processed
}
