// SPDX-License-Identifier: MIT OR Apache-2.0
//! Playground configuration.
//!
//! Settings are read from a RON file. Every field has a default, so an empty
//! file (or no file at all) runs every demo with stock parameters.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Demo that can be run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DemoKind {
    /// BFS over the sample graph
    Bfs,
    /// Generate and solve a maze
    Maze,
    /// Orbiting, rotating box
    Orbit,
    /// Drifting dots joined by fading lines
    Dots,
    /// Progressively refined Mandelbrot set
    Mandelbrot,
    /// Dropdown select model
    Select,
}

impl DemoKind {
    /// Get the display name
    pub fn name(&self) -> &'static str {
        match self {
            Self::Bfs => "BFS",
            Self::Maze => "Maze",
            Self::Orbit => "Orbit",
            Self::Dots => "Dots and lines",
            Self::Mandelbrot => "Mandelbrot",
            Self::Select => "Select",
        }
    }

    /// Get all demos
    pub fn all() -> &'static [DemoKind] {
        &[
            DemoKind::Bfs,
            DemoKind::Maze,
            DemoKind::Orbit,
            DemoKind::Dots,
            DemoKind::Mandelbrot,
            DemoKind::Select,
        ]
    }
}

/// Frame source settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ClockSettings {
    /// Milliseconds between frames
    pub frame_interval_ms: u64,
    /// Use a real-time clock thread instead of stepping frames manually
    pub realtime: bool,
}

impl Default for ClockSettings {
    fn default() -> Self {
        Self {
            frame_interval_ms: 16,
            realtime: false,
        }
    }
}

/// BFS demo settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BfsSettings {
    /// Label of the start node
    pub start_label: String,
    /// Label of the goal node
    pub goal_label: String,
    /// Write the recorded history as JSON to this file
    pub export_history: Option<PathBuf>,
}

impl Default for BfsSettings {
    fn default() -> Self {
        Self {
            start_label: vn_graph::example::START_LABEL.to_string(),
            goal_label: vn_graph::example::GOAL_LABEL.to_string(),
            export_history: None,
        }
    }
}

/// Maze demo settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MazeSettings {
    /// Width in cells
    pub width: usize,
    /// Height in cells
    pub height: usize,
    /// Random seed
    pub seed: u64,
}

impl Default for MazeSettings {
    fn default() -> Self {
        Self {
            width: 8,
            height: 8,
            seed: 1,
        }
    }
}

/// Orbit demo settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OrbitSettings {
    /// Frames to run
    pub frames: u32,
    /// Revolutions per minute
    pub rpm: f64,
    /// Orbit radius in pixels
    pub radius: f64,
}

impl Default for OrbitSettings {
    fn default() -> Self {
        Self {
            frames: 120,
            rpm: 6.0,
            radius: 100.0,
        }
    }
}

/// Dots demo settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DotsSettings {
    /// Number of dots
    pub count: usize,
    /// Field width
    pub width: f64,
    /// Field height
    pub height: f64,
    /// Frames to run
    pub frames: u32,
    /// Random seed
    pub seed: u64,
}

impl Default for DotsSettings {
    fn default() -> Self {
        Self {
            count: 25,
            width: 256.0,
            height: 256.0,
            frames: 120,
            seed: 7,
        }
    }
}

/// Mandelbrot demo settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MandelbrotSettings {
    /// Image width in pixels; height follows the view's aspect ratio
    pub width: usize,
    /// Frames to run
    pub frames: u32,
    /// Real axis range
    pub x_range: (f64, f64),
    /// Imaginary axis range
    pub y_range: (f64, f64),
}

impl Default for MandelbrotSettings {
    fn default() -> Self {
        Self {
            width: 256,
            frames: 60,
            x_range: (-0.750222, -0.749191),
            y_range: (0.031161, 0.031752),
        }
    }
}

/// Select demo settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SelectSettings {
    /// Options to choose from
    pub options: Vec<String>,
    /// Initially selected option
    pub selected: usize,
    /// Font used to size the control
    pub font: String,
}

impl Default for SelectSettings {
    fn default() -> Self {
        Self {
            options: ["opt", "Option1", "Option 2", "Option3"]
                .into_iter()
                .map(String::from)
                .collect(),
            selected: 0,
            font: "400 16px Segoe UI, serif".to_string(),
        }
    }
}

/// Top-level playground configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PlaygroundConfig {
    /// Demos to run, in order
    pub demos: Vec<DemoKind>,
    /// Frame source
    pub clock: ClockSettings,
    /// BFS demo
    pub bfs: BfsSettings,
    /// Maze demo
    pub maze: MazeSettings,
    /// Orbit demo
    pub orbit: OrbitSettings,
    /// Dots demo
    pub dots: DotsSettings,
    /// Mandelbrot demo
    pub mandelbrot: MandelbrotSettings,
    /// Select demo
    pub select: SelectSettings,
}

impl Default for PlaygroundConfig {
    fn default() -> Self {
        Self {
            demos: DemoKind::all().to_vec(),
            clock: ClockSettings::default(),
            bfs: BfsSettings::default(),
            maze: MazeSettings::default(),
            orbit: OrbitSettings::default(),
            dots: DotsSettings::default(),
            mandelbrot: MandelbrotSettings::default(),
            select: SelectSettings::default(),
        }
    }
}

impl PlaygroundConfig {
    /// Load from a RON file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_ron(&content)?;
        tracing::info!("Loaded config from {:?}", path);
        Ok(config)
    }

    /// Parse from a RON string
    pub fn from_ron(content: &str) -> Result<Self, ConfigError> {
        Ok(ron::from_str(content)?)
    }

    /// Load from `path` if given, otherwise use defaults
    pub fn load_or_default(path: Option<&Path>) -> Result<Self, ConfigError> {
        match path {
            Some(path) => Self::load(path),
            None => {
                tracing::info!("No config given, using defaults");
                Ok(Self::default())
            }
        }
    }

    /// Serialize to a pretty RON string
    pub fn to_ron(&self) -> Result<String, ConfigError> {
        let pretty = ron::ser::PrettyConfig::default()
            .depth_limit(3)
            .separate_tuple_members(true);
        Ok(ron::ser::to_string_pretty(self, pretty)?)
    }
}

/// Error when loading configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    /// File could not be read
    #[error("Failed to read config {path:?}: {source}")]
    Io {
        /// Config path
        path: PathBuf,
        /// Underlying error
        #[source]
        source: std::io::Error,
    },

    /// File is not valid RON
    #[error("Invalid config: {0}")]
    Parse(#[from] ron::error::SpannedError),

    /// Config could not be written
    #[error("Failed to serialize config: {0}")]
    Serialize(#[from] ron::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = PlaygroundConfig::default();
        assert_eq!(config.demos.len(), DemoKind::all().len());
        assert_eq!(config.bfs.start_label, "S");
        assert_eq!(config.clock.frame_interval_ms, 16);
        assert!(!config.clock.realtime);
    }

    #[test]
    fn test_partial_config_uses_defaults() {
        let config = PlaygroundConfig::from_ron("(demos: [Maze], maze: (width: 3))").unwrap();
        assert_eq!(config.demos, vec![DemoKind::Maze]);
        assert_eq!(config.maze.width, 3);
        assert_eq!(config.maze.height, 8);
        assert_eq!(config.orbit.rpm, 6.0);
    }

    #[test]
    fn test_sample_config_parses() {
        let config = PlaygroundConfig::from_ron(include_str!("../playground.ron")).unwrap();
        assert_eq!(config.maze.seed, 2024);
        assert_eq!(config.bfs.export_history, Some(PathBuf::from("bfs_history.json")));
        assert_eq!(config.dots.count, 25);
    }

    #[test]
    fn test_serialization() {
        let mut config = PlaygroundConfig::default();
        config.select.selected = 2;
        let ron_str = config.to_ron().unwrap();
        let loaded = PlaygroundConfig::from_ron(&ron_str).unwrap();
        assert_eq!(loaded.select.selected, 2);
        assert_eq!(loaded.mandelbrot.x_range, config.mandelbrot.x_range);
    }

    #[test]
    fn test_invalid_config() {
        assert!(matches!(
            PlaygroundConfig::from_ron("(demos: [Teleport])"),
            Err(ConfigError::Parse(_))
        ));
        assert!(matches!(
            PlaygroundConfig::load(Path::new("/definitely/not/here.ron")),
            Err(ConfigError::Io { .. })
        ));
    }
}
