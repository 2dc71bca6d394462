// SPDX-License-Identifier: MIT OR Apache-2.0
//! Update rules for continuously animated values.
//!
//! An update rule maps a value and the elapsed milliseconds to the next
//! value. Unlike a transition it never finishes.

use parking_lot::Mutex;
use std::f64::consts::TAU;
use std::sync::Arc;

/// Next value after `delta` milliseconds
pub type UpdateRule<T> = Arc<dyn Fn(&T, f64) -> T + Send + Sync>;

/// Wrap a closure as an update rule
pub fn rule<T>(f: impl Fn(&T, f64) -> T + Send + Sync + 'static) -> UpdateRule<T> {
    Arc::new(f)
}

/// Derive a rule from a hidden animated state.
///
/// `update` advances the hidden state and `project` turns it into the
/// produced value. The incoming value is ignored.
///
/// The hidden state belongs to the returned rule, not to any animation
/// driving it. Each call to this function starts fresh, but stopping and
/// restarting an animation does not: the first frame after a restart
/// continues from wherever the hidden state was left.
pub fn update_with_state<T, S>(
    initial: S,
    update: impl Fn(&S, f64) -> S + Send + Sync + 'static,
    project: impl Fn(&S) -> T + Send + Sync + 'static,
) -> UpdateRule<T>
where
    S: Send + 'static,
{
    let state = Mutex::new(initial);
    Arc::new(move |_, delta| {
        let mut current = state.lock();
        *current = update(&current, delta);
        project(&current)
    })
}

/// Angle rule turning at `rpm` revolutions per minute, wrapped to one turn.
///
/// Negative speeds turn the other way and produce negative angles.
pub fn rotation(rpm: f64) -> UpdateRule<f64> {
    let radians_per_ms = rpm / 60_000.0 * TAU;
    Arc::new(move |angle, delta| (angle + delta * radians_per_ms) % TAU)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;
    use crate::engine::AnimationEngine;

    #[test]
    fn test_rotation_wraps() {
        let spin = rotation(6.0);
        // 6 rpm is a full turn every 10 seconds
        let quarter = spin(&0.0, 2_500.0);
        assert!((quarter - TAU / 4.0).abs() < 1e-9);
        let wrapped = spin(&quarter, 10_000.0);
        assert!((wrapped - quarter).abs() < 1e-9);

        let back = rotation(-6.0)(&0.0, 2_500.0);
        assert!((back + TAU / 4.0).abs() < 1e-9);
    }

    #[test]
    fn test_update_with_state_keeps_hidden_state() {
        let doubled = update_with_state(1.0_f64, |s, d| s + d, |s| s * 2.0);
        assert_eq!(doubled(&0.0, 1.0), 4.0);
        assert_eq!(doubled(&123.0, 2.0), 8.0);
    }

    #[test]
    fn test_hidden_state_survives_restart() {
        let clock = ManualClock::new();
        let engine = AnimationEngine::new(clock.clone());
        let elapsed = update_with_state(0.0_f64, |s, d| s + d, |s| *s);
        let anim = engine.create(-1.0, move |v: &f64, d| Some(elapsed(v, d)));

        anim.start();
        clock.advance(0.0);
        clock.advance(10.0);
        assert_eq!(anim.state(), Some(10.0));

        anim.stop();
        anim.start();
        assert_eq!(anim.state(), Some(-1.0));
        clock.advance(20.0);
        assert_eq!(anim.state(), Some(20.0));
    }
}
