// SPDX-License-Identifier: MIT OR Apache-2.0
//! Headless demos.
//!
//! Each demo builds its model, drives it for a number of frames and logs what
//! happened. Frames come from a [`FrameDriver`], which either steps a manual
//! clock (deterministic, used by default and in tests) or waits on a
//! real-time clock thread.

pub mod bfs;
pub mod dots;
pub mod mandelbrot;
pub mod maze;
pub mod orbit;

use crate::config::{ClockSettings, DemoKind, PlaygroundConfig};
use crate::select::{MonospaceMeasure, Select, SelectError, TextWidthCache};
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use vn_animation::{AnimationError, FrameClock, ManualClock, ThreadClock};
use vn_graph::{GraphError, MazeError};

/// Result type for demos
pub type Result<T> = std::result::Result<T, DemoError>;

/// Error while running a demo
#[derive(Debug, Error)]
pub enum DemoError {
    /// Graph could not be built
    #[error("Graph error: {0}")]
    Graph(#[from] GraphError),

    /// Maze could not be built
    #[error("Maze error: {0}")]
    Maze(#[from] MazeError),

    /// Animation setup failed
    #[error("Animation error: {0}")]
    Animation(#[from] AnimationError),

    /// Select model rejected an index
    #[error("Select error: {0}")]
    Select(#[from] SelectError),

    /// Start or goal label names no node
    #[error("No node labelled '{0}'")]
    UnknownLabel(String),

    /// File or thread I/O failed
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// History export failed
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Source of frames for a demo
pub enum FrameDriver {
    /// Manually stepped clock with a fixed frame interval
    Manual {
        /// The clock
        clock: Arc<ManualClock>,
        /// Milliseconds per frame
        interval: f64,
    },
    /// Real-time clock thread
    Realtime {
        /// The clock
        clock: Arc<ThreadClock>,
        /// Time per frame
        interval: Duration,
    },
}

impl FrameDriver {
    /// Create a manual driver. The first frame lands at timestamp zero.
    pub fn manual(interval_ms: f64) -> Self {
        Self::Manual {
            clock: ManualClock::new(),
            interval: interval_ms,
        }
    }

    /// Create a driver from settings
    pub fn from_settings(settings: &ClockSettings) -> Result<Self> {
        if settings.realtime {
            let interval = Duration::from_millis(settings.frame_interval_ms.max(1));
            Ok(Self::Realtime {
                clock: ThreadClock::new(interval)?,
                interval,
            })
        } else {
            Ok(Self::manual(settings.frame_interval_ms as f64))
        }
    }

    /// The clock to schedule on
    pub fn clock(&self) -> Arc<dyn FrameClock> {
        match self {
            Self::Manual { clock, .. } => clock.clone(),
            Self::Realtime { clock, .. } => clock.clone(),
        }
    }

    /// Let `frames` frames pass
    pub fn run_frames(&self, frames: u32) {
        match self {
            Self::Manual { clock, interval } => {
                for _ in 0..frames {
                    if clock.pending_count() == 0 {
                        break;
                    }
                    clock.step(*interval);
                }
            }
            Self::Realtime { interval, .. } => {
                // One sleep per frame; the product can overflow a Duration
                for _ in 0..frames {
                    std::thread::sleep(*interval);
                }
            }
        }
    }
}

/// Run one demo with its configured settings
pub fn run(kind: DemoKind, config: &PlaygroundConfig) -> Result<()> {
    tracing::info!("Running demo: {}", kind.name());
    match kind {
        DemoKind::Bfs => {
            bfs::run(&config.bfs)?;
        }
        DemoKind::Maze => {
            maze::run(&config.maze)?;
        }
        DemoKind::Orbit => {
            let driver = FrameDriver::from_settings(&config.clock)?;
            orbit::run(&config.orbit, &driver)?;
        }
        DemoKind::Dots => {
            let driver = FrameDriver::from_settings(&config.clock)?;
            dots::run(&config.dots, &driver);
        }
        DemoKind::Mandelbrot => {
            let driver = FrameDriver::from_settings(&config.clock)?;
            mandelbrot::run(&config.mandelbrot, &driver);
        }
        DemoKind::Select => {
            run_select(config)?;
        }
    }
    Ok(())
}

fn run_select(config: &PlaygroundConfig) -> Result<()> {
    let settings = &config.select;
    let mut select = Select::new(settings.options.clone(), settings.selected)?;
    let mut cache = TextWidthCache::new(MonospaceMeasure::default());
    let width = select.min_width(&mut cache, &settings.font);
    tracing::info!(selected = select.selected(), min_width = width, "Select ready");

    let last = select.options().len() - 1;
    let chosen = select.choose(last)?.to_string();
    tracing::info!(selected = %chosen, open = select.is_open(), "Select changed");
    Ok(())
}
