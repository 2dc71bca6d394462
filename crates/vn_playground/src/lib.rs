// SPDX-License-Identifier: MIT OR Apache-2.0
//! vn playground - headless runner for graph and animation experiments
//!
//! Runs a configurable list of demos:
//! - Step-by-step BFS over a sample graph, with optional JSON history export
//! - Binary-tree maze generation solved by BFS
//! - Frame-driven animations (orbiting box, dots and lines, Mandelbrot)
//! - Dropdown select model

pub mod config;
pub mod demos;
pub mod select;

pub use config::{ConfigError, DemoKind, PlaygroundConfig};
pub use demos::{DemoError, FrameDriver};
pub use select::{MonospaceMeasure, Select, SelectError, TextMeasure, TextWidthCache};
