// SPDX-License-Identifier: MIT OR Apache-2.0
//! Frame-driven animation for the vn playground.
//!
//! This crate provides:
//! - A frame clock abstraction with manual and thread-backed clocks
//! - An engine that advances independent animations once per frame
//! - Handles with start/stop/listen semantics
//! - Update rules and a combinator that animates a component's props
//!
//! ## Architecture
//!
//! An animation is a state plus a pure transition `(state, delta) -> next`.
//! A transition returning `None` finishes the animation. The engine keeps the
//! running animations in a live set keyed by a sequence id and advances all
//! of them with the same delta on every frame.

pub mod clock;
pub mod animation;
pub mod engine;
pub mod update_rules;
pub mod animated_props;
pub mod vector;

pub use clock::{FrameCallback, FrameClock, FrameHandle, ManualClock, ThreadClock};
pub use animation::{Animation, AnimationEvent, AnimationId, AnimationState, Subscription, Transition};
pub use engine::AnimationEngine;
pub use update_rules::{rotation, rule, update_with_state, UpdateRule};
pub use animated_props::{with_animated_props, AnimatedProp, AnimationKind, Component, Props, WithAnimatedProps};
pub use vector::Vector2;

/// Error raised while setting up animations
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AnimationError {
    /// Animated prop names a kind that does not exist
    #[error("'{0}' is not a recognized animation type!")]
    UnknownKind(String),
}
