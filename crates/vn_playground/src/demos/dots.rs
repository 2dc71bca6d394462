// SPDX-License-Identifier: MIT OR Apache-2.0
//! Dots drifting in a box, joined by lines that fade with distance.

use super::FrameDriver;
use crate::config::DotsSettings;
use parking_lot::Mutex;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::sync::Arc;
use vn_animation::{AnimationEngine, AnimationEvent, Vector2};

/// Radius of a drawn dot
pub const DOT_RADIUS: f64 = 2.5;
/// Distance at which a line fades out completely
pub const MAX_DISTANCE: f64 = 75.0;
/// Scale from velocity units to pixels per millisecond
pub const SPEED: f64 = 0.5 / 1000.0;
/// Largest velocity component of a fresh dot
pub const MAX_SPEED: f64 = 25.0;

/// A moving dot
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Dot {
    /// Center
    pub position: Vector2,
    /// Direction and speed
    pub velocity: Vector2,
}

impl Dot {
    /// Move for `delta` milliseconds, turning back at the box edges
    pub fn step(&self, width: f64, height: f64, delta: f64) -> Dot {
        let position = self.position + self.velocity * (delta * SPEED);
        let mut velocity = self.velocity;
        if position.x < DOT_RADIUS {
            velocity.x = velocity.x.abs();
        }
        if position.y < DOT_RADIUS {
            velocity.y = velocity.y.abs();
        }
        if position.x >= width - DOT_RADIUS {
            velocity.x = -velocity.x.abs();
        }
        if position.y >= height - DOT_RADIUS {
            velocity.y = -velocity.y.abs();
        }
        Dot { position, velocity }
    }
}

/// Line between two dots
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Line {
    /// One end
    pub from: Vector2,
    /// Other end
    pub to: Vector2,
    /// Opacity in `0.0..=1.0`
    pub alpha: f64,
}

/// Opacity of a line of length `distance`
pub fn line_alpha(distance: f64) -> f64 {
    (1.0 - distance / MAX_DISTANCE).max(0.0)
}

/// All dots and the box they live in
#[derive(Debug, Clone, PartialEq)]
pub struct DotField {
    /// Box width
    pub width: f64,
    /// Box height
    pub height: f64,
    /// The dots
    pub dots: Vec<Dot>,
}

impl DotField {
    /// Scatter `settings.count` dots with random velocities
    pub fn random<R: Rng + ?Sized>(settings: &DotsSettings, rng: &mut R) -> Self {
        let dots = (0..settings.count)
            .map(|_| Dot {
                position: Vector2::new(rng.gen::<f64>() * settings.width, rng.gen::<f64>() * settings.height),
                velocity: Vector2::new(
                    (rng.gen::<f64>() - 0.5) * 2.0 * MAX_SPEED,
                    (rng.gen::<f64>() - 0.5) * 2.0 * MAX_SPEED,
                ),
            })
            .collect();
        Self {
            width: settings.width,
            height: settings.height,
            dots,
        }
    }

    /// Move every dot
    pub fn step(&self, delta: f64) -> Self {
        Self {
            width: self.width,
            height: self.height,
            dots: self.dots.iter().map(|dot| dot.step(self.width, self.height, delta)).collect(),
        }
    }

    /// One line per unordered pair of dots
    pub fn lines(&self) -> Vec<Line> {
        let mut lines = Vec::with_capacity(self.dots.len() * self.dots.len().saturating_sub(1) / 2);
        for (i, first) in self.dots.iter().enumerate() {
            for second in &self.dots[i + 1..] {
                lines.push(Line {
                    from: first.position,
                    to: second.position,
                    alpha: line_alpha(first.position.distance(second.position)),
                });
            }
        }
        lines
    }
}

/// Summary of the dots demo
#[derive(Debug, Clone, PartialEq)]
pub struct DotsReport {
    /// Frames that moved the dots
    pub updates: usize,
    /// Lines with non-zero opacity in the last frame
    pub visible_lines: usize,
    /// Field after the last frame
    pub field: DotField,
}

/// Animate a random field for the configured number of frames
pub fn run(settings: &DotsSettings, driver: &FrameDriver) -> DotsReport {
    let mut rng = StdRng::seed_from_u64(settings.seed);
    let field = DotField::random(settings, &mut rng);

    let engine = AnimationEngine::new(driver.clock());
    let animation = engine.create(field.clone(), |field: &DotField, delta| Some(field.step(delta)));

    let updates = Arc::new(Mutex::new(0_usize));
    let counter = Arc::clone(&updates);
    let _subscription = animation.listen(move |event| {
        if let AnimationEvent::Update(field) = event {
            let visible = field.lines().iter().filter(|line| line.alpha > 0.0).count();
            tracing::trace!(visible, "Dots moved");
            *counter.lock() += 1;
        }
    });

    animation.start();
    driver.run_frames(settings.frames);
    let field = animation.state().unwrap_or(field);
    animation.stop();

    let visible_lines = field.lines().iter().filter(|line| line.alpha > 0.0).count();
    let updates = *updates.lock();
    tracing::info!(dots = field.dots.len(), updates, visible_lines, "Dots finished");

    DotsReport {
        updates,
        visible_lines,
        field,
    }
}
