// SPDX-License-Identifier: MIT OR Apache-2.0
//! Animation handles, states and events.

use crate::engine::EngineInner;
use parking_lot::Mutex;
use std::fmt;
use std::sync::Arc;

/// Internal sequence id of an animation.
///
/// Assigned by the engine and used to find an animation in the live set
/// instead of relying on pointer identity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct AnimationId(pub(crate) u64);

/// Whether an animation is running, and its state if so
#[derive(Debug, Clone, PartialEq)]
pub enum AnimationState<T> {
    /// In the live set, holding its current state
    Active(T),
    /// Not started yet, stopped, or finished
    Stopped,
}

impl<T> AnimationState<T> {
    /// Check if active
    pub fn is_active(&self) -> bool {
        matches!(self, Self::Active(_))
    }

    /// Borrow the state, if active
    pub fn as_active(&self) -> Option<&T> {
        match self {
            Self::Active(state) => Some(state),
            Self::Stopped => None,
        }
    }
}

/// Something that happened to an animation
#[derive(Debug, Clone, PartialEq)]
pub enum AnimationEvent<T> {
    /// The animation entered the live set
    Start,
    /// The animation left the live set, explicitly or because its transition
    /// returned `None`
    Stop,
    /// A tick produced a new state
    Update(T),
}

/// Transition function: next state after `delta` milliseconds, or `None` to
/// finish. Must be pure.
pub type Transition<T> = Box<dyn Fn(&T, f64) -> Option<T> + Send + Sync>;

type Listener<T> = Arc<dyn Fn(&AnimationEvent<T>) + Send + Sync>;

/// Result of publishing a computed step
pub(crate) struct Commit {
    /// Whether the animation left the live set
    pub finished: bool,
    /// Delivers the resulting event to listeners
    pub notify: Box<dyn FnOnce() + Send>,
}

/// Next state computed by a tick but not yet visible to handles
pub(crate) trait PendingStep: Send {
    /// Publish the step. Must be called with the engine lock held so the
    /// slot state and the live set change together. Returns `None` if the
    /// animation was started or stopped since the step was computed.
    fn commit(self: Box<Self>) -> Option<Commit>;
}

/// Type-erased view the engine keeps of each live animation
pub(crate) trait Advance: Send + Sync {
    /// Run the transition for `delta` milliseconds without publishing it
    fn advance(self: Arc<Self>, delta: f64) -> Option<Box<dyn PendingStep>>;
}

struct Listeners<T> {
    next_key: u64,
    entries: Vec<(u64, Listener<T>)>,
}

/// Animation state tagged with the run it belongs to.
///
/// `run` increases on every start and stop, so work computed for an earlier
/// run can be recognized and dropped.
struct RunState<T> {
    state: AnimationState<T>,
    run: u64,
}

/// Shared record behind every clone of an [`Animation`] handle
pub(crate) struct Slot<T> {
    pub(crate) id: AnimationId,
    initial: T,
    transition: Transition<T>,
    current: Mutex<RunState<T>>,
    listeners: Mutex<Listeners<T>>,
}

impl<T: Clone + Send + Sync + 'static> Slot<T> {
    pub(crate) fn new(id: AnimationId, initial: T, transition: Transition<T>) -> Self {
        Self {
            id,
            initial,
            transition,
            current: Mutex::new(RunState {
                state: AnimationState::Stopped,
                run: 0,
            }),
            listeners: Mutex::new(Listeners {
                next_key: 0,
                entries: Vec::new(),
            }),
        }
    }

    /// Enter a new run with `state`, returning the run number
    fn begin_run(&self, state: AnimationState<T>) -> u64 {
        let mut current = self.current.lock();
        current.state = state;
        current.run += 1;
        current.run
    }

    fn emit(&self, event: &AnimationEvent<T>) {
        // Listeners may subscribe or unsubscribe while being notified
        let listeners: Vec<Listener<T>> = self.listeners.lock()
            .entries
            .iter()
            .map(|(_, l)| Arc::clone(l))
            .collect();
        for listener in listeners {
            listener(event);
        }
    }

    /// Emit only if no start or stop happened after `run` began
    fn emit_in_run(&self, run: u64, event: &AnimationEvent<T>) {
        if self.current.lock().run != run {
            return;
        }
        self.emit(event);
    }
}

struct SlotStep<T> {
    slot: Arc<Slot<T>>,
    run: u64,
    next: Option<T>,
}

impl<T: Clone + Send + Sync + 'static> PendingStep for SlotStep<T> {
    fn commit(self: Box<Self>) -> Option<Commit> {
        let SlotStep { slot, run, next } = *self;
        let mut current = slot.current.lock();
        if current.run != run {
            return None;
        }

        match next {
            Some(next) => {
                current.state = AnimationState::Active(next.clone());
                drop(current);
                Some(Commit {
                    finished: false,
                    notify: Box::new(move || slot.emit_in_run(run, &AnimationEvent::Update(next))),
                })
            }
            None => {
                current.state = AnimationState::Stopped;
                current.run += 1;
                let run = current.run;
                drop(current);
                tracing::debug!(id = slot.id.0, "Animation finished");
                Some(Commit {
                    finished: true,
                    notify: Box::new(move || slot.emit_in_run(run, &AnimationEvent::Stop)),
                })
            }
        }
    }
}

impl<T: Clone + Send + Sync + 'static> Advance for Slot<T> {
    fn advance(self: Arc<Self>, delta: f64) -> Option<Box<dyn PendingStep>> {
        let (run, next) = {
            let current = self.current.lock();
            let AnimationState::Active(state) = &current.state else {
                return None;
            };
            (current.run, (self.transition)(state, delta))
        };
        Some(Box::new(SlotStep {
            slot: self,
            run,
            next,
        }))
    }
}

/// Handle to an animation created by an [`AnimationEngine`](crate::AnimationEngine).
///
/// Clones share the same animation.
pub struct Animation<T> {
    engine: Arc<EngineInner>,
    slot: Arc<Slot<T>>,
}

impl<T> Clone for Animation<T> {
    fn clone(&self) -> Self {
        Self {
            engine: Arc::clone(&self.engine),
            slot: Arc::clone(&self.slot),
        }
    }
}

impl<T> fmt::Debug for Animation<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Animation").field("id", &self.slot.id).finish_non_exhaustive()
    }
}

impl<T: Clone + Send + Sync + 'static> Animation<T> {
    pub(crate) fn new(engine: Arc<EngineInner>, slot: Arc<Slot<T>>) -> Self {
        Self { engine, slot }
    }

    /// Add to the live set, restarting from the initial state.
    ///
    /// Does nothing if already active.
    pub fn start(&self) {
        let started = self.engine.with_live(|live| {
            if live.contains_key(&self.slot.id) {
                return None;
            }
            live.insert(self.slot.id, Arc::clone(&self.slot) as Arc<dyn Advance>);
            Some(self.slot.begin_run(AnimationState::Active(self.slot.initial.clone())))
        });
        let Some(run) = started else {
            return;
        };
        tracing::debug!(id = self.slot.id.0, "Animation started");
        self.slot.emit_in_run(run, &AnimationEvent::Start);
    }

    /// Remove from the live set. Does nothing if not active.
    pub fn stop(&self) {
        let stopped = self.engine.with_live(|live| {
            live.shift_remove(&self.slot.id)?;
            Some(self.slot.begin_run(AnimationState::Stopped))
        });
        let Some(run) = stopped else {
            return;
        };
        tracing::debug!(id = self.slot.id.0, "Animation stopped");
        self.slot.emit_in_run(run, &AnimationEvent::Stop);
    }

    /// Check if the animation is in the live set
    pub fn is_active(&self) -> bool {
        self.slot.current.lock().state.is_active()
    }

    /// Current state, present only while active
    pub fn state(&self) -> Option<T> {
        self.slot.current.lock().state.as_active().cloned()
    }

    /// Snapshot of the full animation state
    pub fn snapshot(&self) -> AnimationState<T> {
        self.slot.current.lock().state.clone()
    }

    /// Register a listener for start, stop and update events
    pub fn listen(&self, listener: impl Fn(&AnimationEvent<T>) + Send + Sync + 'static) -> Subscription {
        let key = {
            let mut listeners = self.slot.listeners.lock();
            let key = listeners.next_key;
            listeners.next_key += 1;
            listeners.entries.push((key, Arc::new(listener)));
            key
        };

        let slot = Arc::downgrade(&self.slot);
        Subscription::new(move || {
            if let Some(slot) = slot.upgrade() {
                slot.listeners.lock().entries.retain(|(k, _)| *k != key);
            }
        })
    }
}

/// Registration of a listener.
///
/// Dropping a subscription keeps the listener registered; call
/// [`unsubscribe`](Self::unsubscribe) to remove it.
#[must_use = "keep the subscription to be able to remove the listener"]
pub struct Subscription {
    remove: Option<Box<dyn FnOnce() + Send>>,
}

impl Subscription {
    pub(crate) fn new(remove: impl FnOnce() + Send + 'static) -> Self {
        Self {
            remove: Some(Box::new(remove)),
        }
    }

    /// Combine several subscriptions into one
    pub fn all(subscriptions: Vec<Subscription>) -> Self {
        Self::new(move || {
            for mut subscription in subscriptions {
                subscription.unsubscribe();
            }
        })
    }

    /// Remove the listener. Calling this again does nothing.
    pub fn unsubscribe(&mut self) {
        if let Some(remove) = self.remove.take() {
            remove();
        }
    }

    /// Check if still subscribed
    pub fn is_active(&self) -> bool {
        self.remove.is_some()
    }
}

impl fmt::Debug for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription").field("active", &self.is_active()).finish()
    }
}
