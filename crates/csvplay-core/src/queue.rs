//! Background downloads.
//!
//! Each submitted job runs on its own thread and reports through one channel:
//! throttled `Progress` events and exactly one `Finished`. Workers never touch
//! the cache table or the records; the owner drains the channel and hands
//! `Finished` events to `MediaResolver::complete_in`.

use crate::error::FetchError;
use crate::fetch::{FetchProgress, FetchSettings, Fetched};
use crate::resolver::FetchJob;
use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender, TryRecvError};
use std::thread;
use std::time::Duration;

/// Minimum bytes between two progress events for the same job.
const PROGRESS_STEP: u64 = 256 * 1024;

#[derive(Debug)]
pub enum FetchEvent {
    Progress {
        record_id: usize,
        progress: FetchProgress,
    },
    Finished {
        job: FetchJob,
        result: Result<Fetched, FetchError>,
    },
}

pub struct FetchQueue {
    tx: Sender<FetchEvent>,
    rx: Receiver<FetchEvent>,
    in_flight: usize,
}

impl Default for FetchQueue {
    fn default() -> Self {
        Self::new()
    }
}

impl FetchQueue {
    pub fn new() -> Self {
        let (tx, rx) = mpsc::channel();
        Self {
            tx,
            rx,
            in_flight: 0,
        }
    }

    /// Jobs submitted whose `Finished` event has not been received yet.
    pub fn in_flight(&self) -> usize {
        self.in_flight
    }

    pub fn is_idle(&self) -> bool {
        self.in_flight == 0
    }

    /// Starts `job` on a worker thread.
    pub fn submit(&mut self, job: FetchJob, settings: FetchSettings) {
        let tx = self.tx.clone();
        tracing::debug!(record_id = job.record_id, url = %job.url, "queueing download");
        self.in_flight += 1;
        thread::spawn(move || {
            let record_id = job.record_id;
            let mut last_sent = 0u64;
            let result = job.run(&settings, &mut |progress| {
                let done = progress.total.is_some_and(|t| progress.received >= t);
                if progress.received - last_sent >= PROGRESS_STEP || done {
                    last_sent = progress.received;
                    let _ = tx.send(FetchEvent::Progress {
                        record_id,
                        progress,
                    });
                }
            });
            // Receiver gone means the owner shut down; nothing left to report to.
            let _ = tx.send(FetchEvent::Finished { job, result });
        });
    }

    /// Everything received so far, without blocking.
    pub fn drain(&mut self) -> Vec<FetchEvent> {
        let mut events = Vec::new();
        loop {
            match self.rx.try_recv() {
                Ok(ev) => {
                    self.track(&ev);
                    events.push(ev);
                }
                Err(TryRecvError::Empty) | Err(TryRecvError::Disconnected) => break,
            }
        }
        events
    }

    /// Waits up to `timeout` for the next event. `None` on timeout or when idle.
    pub fn wait_next(&mut self, timeout: Duration) -> Option<FetchEvent> {
        if self.is_idle() {
            return None;
        }
        match self.rx.recv_timeout(timeout) {
            Ok(ev) => {
                self.track(&ev);
                Some(ev)
            }
            Err(RecvTimeoutError::Timeout) | Err(RecvTimeoutError::Disconnected) => None,
        }
    }

    fn track(&mut self, ev: &FetchEvent) {
        if let FetchEvent::Finished { .. } = ev {
            self.in_flight = self.in_flight.saturating_sub(1);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resolver::Intent;

    #[test]
    fn idle_queue_has_nothing() {
        let mut q = FetchQueue::new();
        assert!(q.is_idle());
        assert!(q.drain().is_empty());
        assert!(q.wait_next(Duration::from_millis(10)).is_none());
    }

    #[test]
    fn failed_job_reports_finished_once() {
        let dir = tempfile::tempdir().unwrap();
        let settings = FetchSettings {
            cache_dir: dir.path().to_path_buf(),
            ..FetchSettings::default()
        };
        let mut q = FetchQueue::new();
        q.submit(
            FetchJob {
                record_id: 3,
                url: "not a url".into(),
                title: "x".into(),
                file_name: "x.mp4".into(),
                intent: Intent::DownloadOnly,
            },
            settings,
        );
        assert_eq!(q.in_flight(), 1);

        let ev = q.wait_next(Duration::from_secs(10)).expect("event");
        match ev {
            FetchEvent::Finished { job, result } => {
                assert_eq!(job.record_id, 3);
                assert!(matches!(result, Err(FetchError::InvalidUrl(_))));
            }
            other => panic!("unexpected {other:?}"),
        }
        assert!(q.is_idle());
        assert!(q.wait_next(Duration::from_millis(10)).is_none());
    }

    #[test]
    fn drain_collects_finished_jobs() {
        let dir = tempfile::tempdir().unwrap();
        let settings = FetchSettings {
            cache_dir: dir.path().to_path_buf(),
            ..FetchSettings::default()
        };
        let mut q = FetchQueue::new();
        for id in 0..2 {
            q.submit(
                FetchJob {
                    record_id: id,
                    url: "not a url".into(),
                    title: format!("t{id}"),
                    file_name: format!("t{id}.mp4"),
                    intent: Intent::DownloadOnly,
                },
                settings.clone(),
            );
        }

        let mut finished = Vec::new();
        let deadline = std::time::Instant::now() + Duration::from_secs(10);
        while !q.is_idle() && std::time::Instant::now() < deadline {
            for ev in q.drain() {
                if let FetchEvent::Finished { job, .. } = ev {
                    finished.push(job.record_id);
                }
            }
            thread::sleep(Duration::from_millis(10));
        }
        finished.sort_unstable();
        assert_eq!(finished, [0, 1]);
        assert!(q.is_idle());
        assert!(q.drain().is_empty());
    }
}
