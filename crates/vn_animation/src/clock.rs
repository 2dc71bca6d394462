// SPDX-License-Identifier: MIT OR Apache-2.0
//! Frame sources that drive animation engines.
//!
//! A [`FrameClock`] is the host's "call me before the next frame" primitive.
//! Callbacks receive a monotonically increasing timestamp in milliseconds.

use indexmap::IndexMap;
use parking_lot::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::JoinHandle;
use std::time::{Duration, Instant};

/// Callback run once on the next frame
pub type FrameCallback = Box<dyn FnOnce(f64) + Send>;

/// Handle to a requested frame, used to cancel it
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FrameHandle(pub u64);

/// A source of frames
pub trait FrameClock: Send + Sync {
    /// Run `callback` once on the next frame
    fn request_frame(&self, callback: FrameCallback) -> FrameHandle;

    /// Cancel a requested frame. Unknown or already fired handles are ignored.
    fn cancel_frame(&self, handle: FrameHandle);
}

#[derive(Default)]
struct PendingFrames {
    next_handle: u64,
    callbacks: IndexMap<FrameHandle, FrameCallback>,
}

impl PendingFrames {
    fn insert(&mut self, callback: FrameCallback) -> FrameHandle {
        let handle = FrameHandle(self.next_handle);
        self.next_handle += 1;
        self.callbacks.insert(handle, callback);
        handle
    }

    fn cancel(&mut self, handle: FrameHandle) {
        self.callbacks.shift_remove(&handle);
    }

    fn take(&mut self) -> Vec<FrameCallback> {
        std::mem::take(&mut self.callbacks).into_values().collect()
    }
}

/// A clock that only advances when told to.
///
/// Useful for tests and for hosts that own their own render loop.
#[derive(Default)]
pub struct ManualClock {
    pending: Mutex<PendingFrames>,
    now: Mutex<f64>,
}

impl ManualClock {
    /// Create a new clock at time zero
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Current timestamp
    pub fn now(&self) -> f64 {
        *self.now.lock()
    }

    /// Number of callbacks waiting for the next frame
    pub fn pending_count(&self) -> usize {
        self.pending.lock().callbacks.len()
    }

    /// Fire one frame at `timestamp`.
    ///
    /// Callbacks requested while this frame runs wait for the next one.
    pub fn advance(&self, timestamp: f64) {
        *self.now.lock() = timestamp;
        let callbacks = self.pending.lock().take();
        for callback in callbacks {
            callback(timestamp);
        }
    }

    /// Fire one frame `delta` milliseconds after the current time
    pub fn step(&self, delta: f64) {
        let next = self.now() + delta;
        self.advance(next);
    }
}

impl FrameClock for ManualClock {
    fn request_frame(&self, callback: FrameCallback) -> FrameHandle {
        self.pending.lock().insert(callback)
    }

    fn cancel_frame(&self, handle: FrameHandle) {
        self.pending.lock().cancel(handle);
    }
}

struct ThreadClockShared {
    pending: Mutex<PendingFrames>,
    running: AtomicBool,
}

/// A clock backed by a thread that fires frames at a fixed interval
pub struct ThreadClock {
    shared: Arc<ThreadClockShared>,
    thread: Option<JoinHandle<()>>,
}

impl ThreadClock {
    /// Default frame interval, roughly 60 frames per second
    pub const DEFAULT_INTERVAL: Duration = Duration::from_millis(16);

    /// Start a clock thread firing every `interval`
    pub fn new(interval: Duration) -> std::io::Result<Arc<Self>> {
        let shared = Arc::new(ThreadClockShared {
            pending: Mutex::new(PendingFrames::default()),
            running: AtomicBool::new(true),
        });
        let worker = Arc::clone(&shared);
        let origin = Instant::now();
        let thread = std::thread::Builder::new()
            .name("vn-frame-clock".to_string())
            .spawn(move || {
                while worker.running.load(Ordering::Acquire) {
                    std::thread::sleep(interval);
                    let timestamp = origin.elapsed().as_secs_f64() * 1000.0;
                    let callbacks = worker.pending.lock().take();
                    for callback in callbacks {
                        callback(timestamp);
                    }
                }
            })?;
        tracing::debug!(interval_ms = interval.as_millis() as u64, "Started frame clock thread");

        Ok(Arc::new(Self {
            shared,
            thread: Some(thread),
        }))
    }
}

impl FrameClock for ThreadClock {
    fn request_frame(&self, callback: FrameCallback) -> FrameHandle {
        self.shared.pending.lock().insert(callback)
    }

    fn cancel_frame(&self, handle: FrameHandle) {
        self.shared.pending.lock().cancel(handle);
    }
}

impl Drop for ThreadClock {
    fn drop(&mut self) {
        self.shared.running.store(false, Ordering::Release);
        self.shared.pending.lock().take();
        if let Some(thread) = self.thread.take() {
            // The last reference can be released from inside a frame callback
            if thread.thread().id() != std::thread::current().id() {
                let _ = thread.join();
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::mpsc;

    #[test]
    fn test_manual_clock_fires_once() {
        let clock = ManualClock::new();
        let fired = Arc::new(Mutex::new(Vec::new()));

        let sink = Arc::clone(&fired);
        clock.request_frame(Box::new(move |t| sink.lock().push(t)));
        assert_eq!(clock.pending_count(), 1);

        clock.advance(10.0);
        clock.advance(20.0);
        assert_eq!(*fired.lock(), vec![10.0]);
        assert_eq!(clock.pending_count(), 0);
    }

    #[test]
    fn test_manual_clock_cancel() {
        let clock = ManualClock::new();
        let fired = Arc::new(AtomicBool::new(false));

        let flag = Arc::clone(&fired);
        let handle = clock.request_frame(Box::new(move |_| flag.store(true, Ordering::SeqCst)));
        clock.cancel_frame(handle);
        clock.step(16.0);

        assert!(!fired.load(Ordering::SeqCst));
        assert_eq!(clock.now(), 16.0);
    }

    #[test]
    fn test_thread_clock_delivers_frames() {
        let clock = ThreadClock::new(Duration::from_millis(1)).unwrap();
        let (tx, rx) = mpsc::channel();
        clock.request_frame(Box::new(move |t| {
            let _ = tx.send(t);
        }));

        let timestamp = rx.recv_timeout(Duration::from_secs(5)).unwrap();
        assert!(timestamp > 0.0);
    }
}
