// SPDX-License-Identifier: MIT OR Apache-2.0
//! A box that spins while circling the origin.

use super::{FrameDriver, Result};
use crate::config::OrbitSettings;
use parking_lot::Mutex;
use std::sync::Arc;
use vn_animation::{rotation, update_with_state, with_animated_props, AnimatedProp, Component, Props, WithAnimatedProps};

/// Placement of the box
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct BoxTransform {
    /// Rotation in radians
    pub angle: f64,
    /// Horizontal offset in pixels
    pub x: f64,
    /// Vertical offset in pixels
    pub y: f64,
}

impl BoxTransform {
    /// CSS-style transform string
    pub fn css(&self) -> String {
        format!("translate({:.2}px, {:.2}px) rotate({:.4}rad)", self.x, self.y, self.angle)
    }
}

/// Renders the box from its `angle`, `x` and `y` props
#[derive(Debug, Clone, Copy, Default)]
pub struct OrbitBox;

impl Component<f64> for OrbitBox {
    type Output = BoxTransform;

    fn name(&self) -> &str {
        "OrbitBox"
    }

    fn render(&self, props: &Props<f64>) -> BoxTransform {
        let prop = |name: &str| props.get(name).copied().unwrap_or_default();
        BoxTransform {
            angle: prop("angle"),
            x: prop("x"),
            y: prop("y"),
        }
    }
}

/// Wrap [`OrbitBox`] with its spin and orbit animations
pub fn animated_box(settings: &OrbitSettings, driver: &FrameDriver) -> Result<WithAnimatedProps<OrbitBox, f64>> {
    let radius = settings.radius;
    let orbit = rotation(settings.rpm);
    let orbit_x = Arc::clone(&orbit);
    let orbit_y = orbit;

    let props = [
        ("angle".to_string(), AnimatedProp::linear(0.0, rotation(-settings.rpm))),
        (
            "x".to_string(),
            AnimatedProp::linear(radius, update_with_state(0.0_f64, move |a, d| orbit_x(a, d), move |a| a.cos() * radius)),
        ),
        (
            "y".to_string(),
            AnimatedProp::linear(0.0, update_with_state(0.0_f64, move |a, d| orbit_y(a, d), move |a| a.sin() * radius)),
        ),
    ];
    Ok(with_animated_props(props, OrbitBox, driver.clock())?)
}

/// Run the orbit for the configured number of frames
pub fn run(settings: &OrbitSettings, driver: &FrameDriver) -> Result<BoxTransform> {
    let wrapped = animated_box(settings, driver)?;

    let renders = Arc::new(Mutex::new(0_u32));
    let counter = Arc::clone(&renders);
    let mut subscription = wrapped.on_update(move || *counter.lock() += 1);

    driver.run_frames(settings.frames);
    subscription.unsubscribe();

    let transform = wrapped.render(&Props::new());
    tracing::info!(updates = *renders.lock(), "Orbit at {}", transform.css());
    wrapped.destroy();
    Ok(transform)
}
