// SPDX-License-Identifier: MIT OR Apache-2.0
//! Per-frame scheduler for independent animations.

use crate::animation::{Advance, Animation, AnimationId, Slot};
use crate::clock::{FrameClock, FrameHandle};
use indexmap::IndexMap;
use parking_lot::Mutex;
use std::sync::{Arc, Weak};

type LiveSet = IndexMap<AnimationId, Arc<dyn Advance>>;

struct EngineState {
    /// Next animation id to hand out
    next_id: u64,
    /// Running animations, in the order they were started
    live: LiveSet,
    /// Timestamp of the previous frame
    before: Option<f64>,
    /// Frame requested from the clock
    frame: Option<FrameHandle>,
    /// Number of frames that advanced animations
    ticks: u64,
    destroyed: bool,
}

/// Engine internals shared between the engine and its animation handles
pub(crate) struct EngineInner {
    clock: Arc<dyn FrameClock>,
    state: Mutex<EngineState>,
}

impl EngineInner {
    pub(crate) fn with_live<R>(&self, f: impl FnOnce(&mut LiveSet) -> R) -> R {
        f(&mut self.state.lock().live)
    }

    fn schedule(self: &Arc<Self>) {
        let engine = Arc::downgrade(self);
        let handle = self.clock.request_frame(Box::new(move |now| Self::on_frame(&engine, now)));

        let mut state = self.state.lock();
        if state.destroyed {
            drop(state);
            self.clock.cancel_frame(handle);
        } else {
            state.frame = Some(handle);
        }
    }

    fn on_frame(engine: &Weak<Self>, now: f64) {
        let Some(engine) = engine.upgrade() else {
            return;
        };
        engine.state.lock().frame = None;
        engine.tick(now);
        if !engine.state.lock().destroyed {
            engine.schedule();
        }
    }

    /// Advance every live animation by the time since the previous frame.
    ///
    /// Transitions run without the engine lock. Their results are then
    /// published in one step under the lock, so a finished animation leaves
    /// the live set at the same moment it becomes stopped. Listeners hear
    /// about the frame only after every result is published, and events of a
    /// run that was restarted or stopped in the meantime are dropped.
    fn tick(&self, now: f64) {
        let (delta, live) = {
            let mut state = self.state.lock();
            if state.destroyed {
                return;
            }
            let Some(before) = state.before.replace(now) else {
                // First frame only establishes the baseline
                return;
            };
            state.ticks += 1;
            let live: Vec<_> = state.live.iter()
                .map(|(id, anim)| (*id, Arc::clone(anim)))
                .collect();
            (now - before, live)
        };
        tracing::trace!(delta, live = live.len(), "Animation tick");

        let pending: Vec<_> = live.into_iter()
            .filter_map(|(id, anim)| anim.advance(delta).map(|step| (id, step)))
            .collect();

        let notifications: Vec<_> = {
            let mut state = self.state.lock();
            pending.into_iter()
                .filter_map(|(id, step)| {
                    let commit = step.commit()?;
                    if commit.finished {
                        state.live.shift_remove(&id);
                    }
                    Some(commit.notify)
                })
                .collect()
        };

        for notify in notifications {
            notify();
        }
    }
}

/// Drives a set of animations from a [`FrameClock`].
///
/// Animations are created stopped. Once started, each one is advanced on
/// every frame with the milliseconds elapsed since the previous frame; every
/// animation in a frame sees the same delta.
///
/// Dropping the engine destroys it.
pub struct AnimationEngine {
    inner: Arc<EngineInner>,
}

impl AnimationEngine {
    /// Create an engine and request its first frame
    pub fn new(clock: Arc<dyn FrameClock>) -> Self {
        let inner = Arc::new(EngineInner {
            clock,
            state: Mutex::new(EngineState {
                next_id: 0,
                live: IndexMap::new(),
                before: None,
                frame: None,
                ticks: 0,
                destroyed: false,
            }),
        });
        inner.schedule();
        tracing::debug!("Created animation engine");
        Self { inner }
    }

    /// Register a new, stopped animation
    pub fn create<T, F>(&self, initial: T, transition: F) -> Animation<T>
    where
        T: Clone + Send + Sync + 'static,
        F: Fn(&T, f64) -> Option<T> + Send + Sync + 'static,
    {
        let id = {
            let mut state = self.inner.state.lock();
            let id = AnimationId(state.next_id);
            state.next_id += 1;
            id
        };
        let slot = Arc::new(Slot::new(id, initial, Box::new(transition)));
        Animation::new(Arc::clone(&self.inner), slot)
    }

    /// Stop requesting frames. Existing handles stay usable but never tick
    /// again.
    pub fn destroy(&self) {
        let frame = {
            let mut state = self.inner.state.lock();
            if state.destroyed {
                return;
            }
            state.destroyed = true;
            state.frame.take()
        };
        if let Some(frame) = frame {
            self.inner.clock.cancel_frame(frame);
        }
        tracing::debug!("Destroyed animation engine");
    }

    /// Check if the engine has been destroyed
    pub fn is_destroyed(&self) -> bool {
        self.inner.state.lock().destroyed
    }

    /// Number of animations currently in the live set
    pub fn live_count(&self) -> usize {
        self.inner.state.lock().live.len()
    }

    /// Number of frames that advanced animations so far
    pub fn tick_count(&self) -> u64 {
        self.inner.state.lock().ticks
    }
}

impl Drop for AnimationEngine {
    fn drop(&mut self) {
        self.destroy();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::animation::AnimationEvent;
    use crate::clock::{ManualClock, ThreadClock};
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::mpsc;
    use std::time::{Duration, Instant};

    fn recorder<T: Clone + Send + Sync + 'static>() -> (
        Arc<Mutex<Vec<AnimationEvent<T>>>>,
        impl Fn(&AnimationEvent<T>) + Send + Sync + 'static,
    ) {
        let events = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&events);
        (events, move |e: &AnimationEvent<T>| sink.lock().push(e.clone()))
    }

    #[test]
    fn test_created_stopped() {
        let clock = ManualClock::new();
        let engine = AnimationEngine::new(clock.clone());
        let anim = engine.create(0.0, |s: &f64, d| Some(s + d));

        assert!(!anim.is_active());
        assert_eq!(anim.state(), None);
        assert_eq!(engine.live_count(), 0);
    }

    #[test]
    fn test_first_frame_sets_baseline() {
        let clock = ManualClock::new();
        let engine = AnimationEngine::new(clock.clone());
        let anim = engine.create(0.0, |s: &f64, d| Some(s + d));
        anim.start();

        clock.advance(100.0);
        assert_eq!(anim.state(), Some(0.0));
        clock.advance(116.0);
        assert_eq!(anim.state(), Some(16.0));
        assert_eq!(engine.tick_count(), 1);
    }

    #[test]
    fn test_start_stop_idempotent() {
        let clock = ManualClock::new();
        let engine = AnimationEngine::new(clock.clone());
        let anim = engine.create(1, |s: &i32, _| Some(s + 1));
        let (events, listener) = recorder();
        let _sub = anim.listen(listener);

        anim.start();
        anim.start();
        anim.stop();
        anim.stop();

        assert_eq!(*events.lock(), vec![AnimationEvent::Start, AnimationEvent::Stop]);
    }

    #[test]
    fn test_ticks_fold_transition() {
        let clock = ManualClock::new();
        let engine = AnimationEngine::new(clock.clone());
        let transition = |s: &f64, d: f64| Some(s * 0.5 + d);
        let anim = engine.create(3.0, transition);
        let (events, listener) = recorder();
        let _sub = anim.listen(listener);
        anim.start();

        clock.advance(0.0);
        let deltas = [16.0, 17.5, 3.25, 40.0];
        let mut now = 0.0;
        for delta in deltas {
            now += delta;
            clock.advance(now);
        }

        let expected = deltas.iter().fold(3.0, |s, d| transition(&s, *d).unwrap());
        assert_eq!(anim.state(), Some(expected));

        let updates: Vec<f64> = events.lock().iter()
            .filter_map(|e| match e {
                AnimationEvent::Update(s) => Some(*s),
                _ => None,
            })
            .collect();
        assert_eq!(updates.len(), deltas.len());
        assert_eq!(updates.last().copied(), Some(expected));
    }

    #[test]
    fn test_transition_none_stops() {
        let clock = ManualClock::new();
        let engine = AnimationEngine::new(clock.clone());
        let anim = engine.create(0, |s: &u32, _| (*s < 2).then_some(s + 1));
        let (events, listener) = recorder();
        let _sub = anim.listen(listener);
        anim.start();

        for t in 0..6 {
            clock.advance(f64::from(t) * 10.0);
        }

        assert!(!anim.is_active());
        assert_eq!(anim.state(), None);
        assert_eq!(engine.live_count(), 0);
        assert_eq!(
            *events.lock(),
            vec![
                AnimationEvent::Start,
                AnimationEvent::Update(1),
                AnimationEvent::Update(2),
                AnimationEvent::Stop,
            ]
        );
    }

    #[test]
    fn test_restart_resets_to_initial() {
        let clock = ManualClock::new();
        let engine = AnimationEngine::new(clock.clone());
        let anim = engine.create(10.0, |s: &f64, d| Some(s + d));
        anim.start();
        clock.advance(0.0);
        clock.advance(5.0);
        assert_eq!(anim.state(), Some(15.0));

        anim.stop();
        clock.advance(10.0);
        anim.start();
        assert_eq!(anim.state(), Some(10.0));
    }

    #[test]
    fn test_same_delta_for_all_animations() {
        let clock = ManualClock::new();
        let engine = AnimationEngine::new(clock.clone());
        let seen = Arc::new(Mutex::new(Vec::new()));

        let handles: Vec<_> = (0..3)
            .map(|_| {
                let seen = Arc::clone(&seen);
                engine.create(0.0, move |s: &f64, d| {
                    seen.lock().push(d);
                    Some(s + d)
                })
            })
            .collect();
        for handle in &handles {
            handle.start();
        }

        clock.advance(1.0);
        clock.advance(9.0);
        assert_eq!(*seen.lock(), vec![8.0, 8.0, 8.0]);
    }

    #[test]
    fn test_unsubscribe_is_idempotent() {
        let clock = ManualClock::new();
        let engine = AnimationEngine::new(clock.clone());
        let anim = engine.create(0, |s: &i32, _| Some(*s));
        let (first_events, first) = recorder();
        let (second_events, second) = recorder();

        let mut first_sub = anim.listen(first);
        let _second_sub = anim.listen(second);

        first_sub.unsubscribe();
        first_sub.unsubscribe();
        assert!(!first_sub.is_active());

        anim.start();
        assert!(first_events.lock().is_empty());
        assert_eq!(*second_events.lock(), vec![AnimationEvent::Start]);
    }

    #[test]
    fn test_listener_can_stop_animation() {
        let clock = ManualClock::new();
        let engine = AnimationEngine::new(clock.clone());
        let anim = engine.create(0, |s: &i32, _| Some(s + 1));

        let handle = anim.clone();
        let _sub = anim.listen(move |e| {
            if *e == AnimationEvent::Update(3) {
                handle.stop();
            }
        });
        anim.start();

        for t in 0..10 {
            clock.advance(f64::from(t));
        }
        assert!(!anim.is_active());
        assert_eq!(engine.live_count(), 0);
    }

    #[test]
    fn test_restart_in_listener_drops_stale_update() {
        let clock = ManualClock::new();
        let engine = AnimationEngine::new(clock.clone());
        let a = engine.create(0, |s: &i32, _| Some(s + 1));
        let b = engine.create(100, |s: &i32, _| Some(s + 1));

        let restarted = b.clone();
        let _a_sub = a.listen(move |e| {
            if *e == AnimationEvent::Update(1) {
                restarted.stop();
                restarted.start();
            }
        });
        let (b_events, sink) = recorder();
        let _b_sub = b.listen(sink);

        a.start();
        b.start();
        clock.advance(0.0);
        clock.advance(10.0);

        assert_eq!(
            *b_events.lock(),
            vec![AnimationEvent::Start, AnimationEvent::Stop, AnimationEvent::Start]
        );
        assert_eq!(b.state(), Some(100));
        assert_eq!(engine.live_count(), 2);
    }

    #[test]
    fn test_finish_and_live_set_agree_on_thread_clock() {
        let clock = ThreadClock::new(Duration::from_millis(1)).unwrap();
        let engine = AnimationEngine::new(clock.clone());

        let armed = Arc::new(AtomicBool::new(false));
        let finish_when_armed = Arc::clone(&armed);
        let finishing = engine.create(0, move |s: &i32, _| {
            if finish_when_armed.load(Ordering::SeqCst) {
                None
            } else {
                Some(s + 1)
            }
        });

        // Holds one frame open after the finishing animation has computed
        let (entered_tx, entered_rx) = mpsc::channel::<()>();
        let (release_tx, release_rx) = mpsc::channel::<()>();
        let entered_tx = Mutex::new(entered_tx);
        let release_rx = Mutex::new(release_rx);
        let blocked = AtomicBool::new(false);
        let gate_armed = Arc::clone(&armed);
        let gate = engine.create(0, move |s: &i32, _| {
            if gate_armed.load(Ordering::SeqCst) && !blocked.swap(true, Ordering::SeqCst) {
                let _ = entered_tx.lock().send(());
                let _ = release_rx.lock().recv_timeout(Duration::from_secs(2));
            }
            Some(s + 1)
        });

        let (events, sink) = recorder();
        let _sub = finishing.listen(sink);
        finishing.start();
        gate.start();

        armed.store(true, Ordering::SeqCst);
        entered_rx.recv_timeout(Duration::from_secs(2)).unwrap();

        // Mid-frame, a start is a no-op and both views still agree
        finishing.start();
        assert!(finishing.is_active());
        assert_eq!(engine.live_count(), 2);

        release_tx.send(()).unwrap();
        let deadline = Instant::now() + Duration::from_secs(2);
        while finishing.is_active() && Instant::now() < deadline {
            std::thread::sleep(Duration::from_millis(1));
        }
        assert!(!finishing.is_active());
        assert_eq!(engine.live_count(), 1);

        armed.store(false, Ordering::SeqCst);
        finishing.start();
        assert!(finishing.is_active());
        assert_eq!(engine.live_count(), 2);

        engine.destroy();
        drop(release_tx);
        let lifecycle: Vec<_> = events.lock()
            .iter()
            .filter(|e| !matches!(e, AnimationEvent::Update(_)))
            .cloned()
            .collect();
        assert_eq!(
            lifecycle,
            vec![AnimationEvent::Start, AnimationEvent::Stop, AnimationEvent::Start]
        );
    }

    #[test]
    fn test_destroy_freezes_animations() {
        let clock = ManualClock::new();
        let engine = AnimationEngine::new(clock.clone());
        let anim = engine.create(0.0, |s: &f64, d| Some(s + d));
        anim.start();
        clock.advance(0.0);
        clock.advance(10.0);

        engine.destroy();
        assert!(engine.is_destroyed());
        assert_eq!(clock.pending_count(), 0);

        clock.advance(50.0);
        assert_eq!(anim.state(), Some(10.0));
        assert!(anim.is_active());
    }

    #[test]
    fn test_drop_releases_clock() {
        let clock = ManualClock::new();
        {
            let _engine = AnimationEngine::new(clock.clone());
            assert_eq!(clock.pending_count(), 1);
        }
        assert_eq!(clock.pending_count(), 0);
    }
}
