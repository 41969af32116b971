//! Single-slot decode job queue
//!
//! A [`DecodeQueue`] owns one worker thread that decodes submitted images
//! strictly one at a time in submission order. The channel between the
//! submitter and the worker holds a single job, so a submit blocks while
//! a job is already waiting. Each job's status moves through
//! `Queued -> Processing -> Completed | Failed` in a mutex-guarded map,
//! and a [`JobEvent`] carrying the decoded image is sent when it finishes.
//!
//! All state belongs to the queue instance; two queues never share ids
//! or status maps.

use crate::format::ImageFormat;
use crate::pnm::{CommentList, decode_pnm};
use crate::{IoError, IoResult, read_image_format};
use crossbeam_channel::{Receiver, RecvTimeoutError, Sender, TrySendError};
use netpix_core::Raster;
use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};
use std::thread::JoinHandle;
use std::time::Duration;
use tracing::{debug, info, warn};

/// Identifier of a submitted job, unique within one queue.
pub type JobId = u64;

/// Lifecycle of a job
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum JobStatus {
    /// Accepted, waiting for the worker
    Queued,
    /// Being decoded
    Processing,
    /// Decoded successfully
    Completed,
    /// Decoding failed with the given message
    Failed(String),
}

impl JobStatus {
    /// Whether the job has finished.
    pub fn is_terminal(&self) -> bool {
        matches!(self, JobStatus::Completed | JobStatus::Failed(_))
    }
}

impl std::fmt::Display for JobStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            JobStatus::Queued => f.write_str("queued"),
            JobStatus::Processing => f.write_str("processing"),
            JobStatus::Completed => f.write_str("completed"),
            JobStatus::Failed(_) => f.write_str("failed"),
        }
    }
}

/// The output of a successful decode
#[derive(Debug, Clone)]
pub struct DecodedImage {
    /// Detected or declared format
    pub format: ImageFormat,
    /// Decoded pixels
    pub raster: Raster,
    /// NetPBM comments; empty for other formats
    pub comments: CommentList,
}

/// Notification sent when a job finishes
#[derive(Debug)]
pub struct JobEvent {
    /// The finished job
    pub id: JobId,
    /// File path or caller-supplied name
    pub source: String,
    /// Decoded image or the failure
    pub result: IoResult<DecodedImage>,
}

enum JobInput {
    File(PathBuf),
    Bytes(Vec<u8>),
}

struct Job {
    id: JobId,
    source: String,
    input: JobInput,
}

type StatusMap = Arc<Mutex<HashMap<JobId, JobStatus>>>;

/// Sequential decode queue backed by one worker thread
pub struct DecodeQueue {
    sender: Option<Sender<Job>>,
    events: Receiver<JobEvent>,
    statuses: StatusMap,
    next_id: AtomicU64,
    worker: Option<JoinHandle<()>>,
}

impl DecodeQueue {
    /// Start a queue and its worker thread.
    pub fn new() -> IoResult<Self> {
        let (sender, jobs) = crossbeam_channel::bounded::<Job>(1);
        let (event_tx, events) = crossbeam_channel::unbounded();
        let statuses: StatusMap = Arc::new(Mutex::new(HashMap::new()));

        let worker_statuses = Arc::clone(&statuses);
        let worker = std::thread::Builder::new()
            .name("netpix-decode".to_string())
            .spawn(move || {
                for job in jobs {
                    set_status(&worker_statuses, job.id, JobStatus::Processing);
                    debug!(id = job.id, source = %job.source, "processing job");

                    let result = run_job(&job.input);
                    let status = match &result {
                        Ok(_) => JobStatus::Completed,
                        Err(e) => {
                            warn!(id = job.id, source = %job.source, error = %e, "job failed");
                            JobStatus::Failed(e.to_string())
                        }
                    };
                    set_status(&worker_statuses, job.id, status);
                    info!(id = job.id, source = %job.source, "job finished");

                    let event = JobEvent {
                        id: job.id,
                        source: job.source,
                        result,
                    };
                    // Nobody listening is fine; statuses stay queryable.
                    let _ = event_tx.send(event);
                }
            })?;

        Ok(DecodeQueue {
            sender: Some(sender),
            events,
            statuses,
            next_id: AtomicU64::new(1),
            worker: Some(worker),
        })
    }

    /// Queue a file for decoding, blocking while the slot is occupied.
    ///
    /// The format is chosen from the file extension
    /// (`.jpg/.jpeg/.png/.webp/.pbm/.pgm/.ppm/.pnm`).
    pub fn submit_file(&self, path: impl Into<PathBuf>) -> IoResult<JobId> {
        let path = path.into();
        let source = path.display().to_string();
        self.submit(source, JobInput::File(path))
    }

    /// Queue in-memory bytes for decoding, blocking while the slot is
    /// occupied. The format is detected from the content.
    pub fn submit_bytes(&self, name: impl Into<String>, data: Vec<u8>) -> IoResult<JobId> {
        self.submit(name.into(), JobInput::Bytes(data))
    }

    /// Queue in-memory bytes without blocking.
    ///
    /// # Errors
    ///
    /// Returns [`IoError::QueueFull`] if a job is already waiting.
    pub fn try_submit_bytes(&self, name: impl Into<String>, data: Vec<u8>) -> IoResult<JobId> {
        let sender = self.sender.as_ref().ok_or(IoError::QueueClosed)?;
        let job = self.new_job(name.into(), JobInput::Bytes(data));
        let id = job.id;
        match sender.try_send(job) {
            Ok(()) => Ok(id),
            Err(TrySendError::Full(_)) => {
                self.lock_statuses().remove(&id);
                Err(IoError::QueueFull)
            }
            Err(TrySendError::Disconnected(_)) => {
                self.lock_statuses().remove(&id);
                Err(IoError::QueueClosed)
            }
        }
    }

    fn submit(&self, source: String, input: JobInput) -> IoResult<JobId> {
        let sender = self.sender.as_ref().ok_or(IoError::QueueClosed)?;
        let job = self.new_job(source, input);
        let id = job.id;
        if sender.send(job).is_err() {
            self.lock_statuses().remove(&id);
            return Err(IoError::QueueClosed);
        }
        Ok(id)
    }

    fn new_job(&self, source: String, input: JobInput) -> Job {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        self.lock_statuses().insert(id, JobStatus::Queued);
        debug!(id, source = %source, "job queued");
        Job { id, source, input }
    }

    /// Current status of a job, or `None` for an unknown id.
    pub fn status(&self, id: JobId) -> Option<JobStatus> {
        self.lock_statuses().get(&id).cloned()
    }

    /// Drop a finished job's status entry and return it.
    ///
    /// Jobs that are still queued or processing are kept and `None` is
    /// returned.
    pub fn forget(&self, id: JobId) -> Option<JobStatus> {
        let mut statuses = self.lock_statuses();
        if statuses.get(&id).is_some_and(JobStatus::is_terminal) {
            statuses.remove(&id)
        } else {
            None
        }
    }

    /// Number of jobs whose status is still tracked.
    pub fn tracked_jobs(&self) -> usize {
        self.lock_statuses().len()
    }

    /// Wait for the next finished job.
    ///
    /// Returns `None` once the worker has stopped and all events were read.
    pub fn recv_event(&self) -> Option<JobEvent> {
        self.events.recv().ok()
    }

    /// Wait up to `timeout` for the next finished job.
    pub fn recv_event_timeout(&self, timeout: Duration) -> Option<JobEvent> {
        match self.events.recv_timeout(timeout) {
            Ok(event) => Some(event),
            Err(RecvTimeoutError::Timeout | RecvTimeoutError::Disconnected) => None,
        }
    }

    /// Return a finished job's event if one is ready.
    pub fn try_recv_event(&self) -> Option<JobEvent> {
        self.events.try_recv().ok()
    }

    /// Stop accepting jobs, finish the queued ones and join the worker.
    pub fn shutdown(mut self) {
        self.stop();
    }

    fn stop(&mut self) {
        self.sender.take();
        if let Some(worker) = self.worker.take()
            && worker.join().is_err()
        {
            warn!("decode worker panicked");
        }
    }

    fn lock_statuses(&self) -> MutexGuard<'_, HashMap<JobId, JobStatus>> {
        self.statuses.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl Drop for DecodeQueue {
    fn drop(&mut self) {
        self.stop();
    }
}

fn set_status(statuses: &StatusMap, id: JobId, status: JobStatus) {
    statuses
        .lock()
        .unwrap_or_else(|e| e.into_inner())
        .insert(id, status);
}

fn run_job(input: &JobInput) -> IoResult<DecodedImage> {
    match input {
        JobInput::File(path) => {
            let format = ImageFormat::from_path(path).ok_or_else(|| {
                IoError::UnsupportedFormat(format!("unrecognized extension: {}", path.display()))
            })?;
            let data = fs::read(path)?;
            decode_as(&data, format)
        }
        JobInput::Bytes(data) => {
            let format = crate::detect_format_from_bytes(data)?;
            decode_as(data, format)
        }
    }
}

fn decode_as(data: &[u8], format: ImageFormat) -> IoResult<DecodedImage> {
    if let ImageFormat::Pnm(_) = format {
        // Extensions only say "NetPBM"; the magic number picks the variant.
        let image = decode_pnm(data)?;
        return Ok(DecodedImage {
            format: ImageFormat::Pnm(image.format),
            raster: image.raster,
            comments: image.comments,
        });
    }
    Ok(DecodedImage {
        format,
        raster: read_image_format(data, format)?,
        comments: CommentList::new(),
    })
}
