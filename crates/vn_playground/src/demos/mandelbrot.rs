// SPDX-License-Identifier: MIT OR Apache-2.0
//! Progressive Mandelbrot rendering.
//!
//! An animated counter runs alongside the field. Whenever its integer part
//! passes the number of iterations done so far, every point that has not
//! escaped yet advances by one iteration and the image is repainted.

use super::FrameDriver;
use crate::config::MandelbrotSettings;
use parking_lot::Mutex;
use std::sync::Arc;
use vn_animation::{AnimationEngine, AnimationEvent, Vector2};

/// Number of palette entries
pub const PALETTE_SIZE: usize = 255 * 4;
/// Starting value of the iteration counter
pub const COUNTER_START: f64 = 25.0;
/// Milliseconds per counter unit
pub const COUNTER_RATE: f64 = 16.7;

/// Convert HSL (all in `0.0..=1.0`, hue wraps) to RGB bytes
pub fn hsl_to_rgb(h: f64, s: f64, l: f64) -> [u8; 3] {
    let h = h % 1.0;
    let channel = |v: f64| (v * 255.0).round() as u8;
    if s == 0.0 {
        let v = channel(l);
        return [v, v, v];
    }

    let hue_to_rgb = |p: f64, q: f64, mut t: f64| {
        if t < 0.0 {
            t += 1.0;
        }
        if t > 1.0 {
            t -= 1.0;
        }
        if t < 1.0 / 6.0 {
            p + (q - p) * 6.0 * t
        } else if t < 0.5 {
            q
        } else if t < 2.0 / 3.0 {
            p + (q - p) * (2.0 / 3.0 - t) * 6.0
        } else {
            p
        }
    };
    let q = if l < 0.5 { l * (1.0 + s) } else { l + s - l * s };
    let p = 2.0 * l - q;
    [
        channel(hue_to_rgb(p, q, h + 1.0 / 3.0)),
        channel(hue_to_rgb(p, q, h)),
        channel(hue_to_rgb(p, q, h - 1.0 / 3.0)),
    ]
}

/// Colors for escaped points, indexed by iteration count
pub fn palette() -> Vec<[u8; 3]> {
    (0..PALETTE_SIZE)
        .map(|idx| hsl_to_rgb(idx as f64 / PALETTE_SIZE as f64 + 0.5, 1.0, 0.5))
        .collect()
}

/// One pixel's orbit
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MandelPoint {
    /// Point in the complex plane
    pub center: Vector2,
    /// Current orbit value
    pub z: Vector2,
    /// Iterations survived
    pub iterations: u32,
    /// Still bounded
    pub inside: bool,
}

impl MandelPoint {
    /// Start an orbit at zero
    pub fn new(center: Vector2) -> Self {
        Self {
            center,
            z: Vector2::ZERO,
            iterations: 0,
            inside: true,
        }
    }

    /// Advance one iteration. The escape test uses the value before the step.
    pub fn step(&mut self) {
        if !self.inside {
            return;
        }
        let Vector2 { x, y } = self.z;
        let (x2, y2) = (x * x, y * y);
        let inside = x2 + y2 <= 4.0;
        self.z = Vector2::new(x2 - y2 + self.center.x, 2.0 * x * y + self.center.y);
        if inside {
            self.iterations += 1;
        }
        self.inside = inside;
    }
}

/// Grid of points over a view of the complex plane
#[derive(Debug, Clone)]
pub struct MandelbrotField {
    width: usize,
    height: usize,
    points: Vec<MandelPoint>,
    iterations: u32,
    palette: Vec<[u8; 3]>,
}

impl MandelbrotField {
    /// Create a field `width` pixels wide; the height keeps the view's aspect
    /// ratio
    pub fn new(width: usize, x_range: (f64, f64), y_range: (f64, f64)) -> Self {
        let (x_min, x_max) = x_range;
        let (y_min, y_max) = y_range;
        let (x_span, y_span) = (x_max - x_min, y_max - y_min);
        let height = (width as f64 * (y_span / x_span)).floor().max(1.0) as usize;

        let points = (0..height)
            .flat_map(|py| (0..width).map(move |px| (px, py)))
            .map(|(px, py)| {
                MandelPoint::new(Vector2::new(
                    px as f64 / width as f64 * x_span + x_min,
                    py as f64 / height as f64 * y_span + y_min,
                ))
            })
            .collect();
        Self {
            width,
            height,
            points,
            iterations: 0,
            palette: palette(),
        }
    }

    /// Width in pixels
    pub fn width(&self) -> usize {
        self.width
    }

    /// Height in pixels
    pub fn height(&self) -> usize {
        self.height
    }

    /// Iterations run so far
    pub fn iterations(&self) -> u32 {
        self.iterations
    }

    /// Point at a pixel
    pub fn point(&self, x: usize, y: usize) -> Option<&MandelPoint> {
        if x >= self.width {
            return None;
        }
        self.points.get(y * self.width + x)
    }

    /// Number of points that escaped
    pub fn escaped(&self) -> usize {
        self.points.iter().filter(|p| !p.inside).count()
    }

    /// Advance every bounded point by one iteration
    pub fn step(&mut self) {
        for point in &mut self.points {
            point.step();
        }
        self.iterations += 1;
    }

    /// Paint escaped points into an RGBA buffer of `width * height * 4`
    /// bytes. Bounded points are left untouched.
    pub fn paint(&self, rgba: &mut [u8]) {
        for (pixel, point) in rgba.chunks_exact_mut(4).zip(&self.points) {
            if !point.inside {
                let color = self.palette[point.iterations as usize % self.palette.len()];
                pixel[..3].copy_from_slice(&color);
            }
        }
    }

    /// Render onto a fresh white RGBA buffer
    pub fn to_rgba(&self) -> Vec<u8> {
        let mut rgba = vec![255; self.width * self.height * 4];
        self.paint(&mut rgba);
        rgba
    }
}

/// Summary of the Mandelbrot demo
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MandelbrotReport {
    /// Iterations run
    pub iterations: u32,
    /// Points that escaped
    pub escaped: usize,
    /// Final image
    pub rgba: Vec<u8>,
}

/// Refine the configured view for the configured number of frames
pub fn run(settings: &MandelbrotSettings, driver: &FrameDriver) -> MandelbrotReport {
    let field = Arc::new(Mutex::new(MandelbrotField::new(
        settings.width,
        settings.x_range,
        settings.y_range,
    )));
    {
        let field = field.lock();
        tracing::debug!(width = field.width(), height = field.height(), "Mandelbrot field ready");
    }

    let engine = AnimationEngine::new(driver.clock());
    let counter = engine.create(COUNTER_START, |count: &f64, delta| Some(count + delta / COUNTER_RATE));

    let refining = Arc::clone(&field);
    let _subscription = counter.listen(move |event| {
        if let AnimationEvent::Update(count) = event {
            let mut field = refining.lock();
            if count.floor() > f64::from(field.iterations()) {
                field.step();
                tracing::trace!(iterations = field.iterations(), escaped = field.escaped(), "Mandelbrot step");
            }
        }
    });

    counter.start();
    driver.run_frames(settings.frames);
    counter.stop();
    engine.destroy();

    let field = field.lock();
    let report = MandelbrotReport {
        iterations: field.iterations(),
        escaped: field.escaped(),
        rgba: field.to_rgba(),
    };
    tracing::info!(iterations = report.iterations, escaped = report.escaped, "Mandelbrot finished");
    report
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hsl_to_rgb() {
        assert_eq!(hsl_to_rgb(0.0, 1.0, 0.5), [255, 0, 0]);
        assert_eq!(hsl_to_rgb(0.5, 1.0, 0.5), [0, 255, 255]);
        assert_eq!(hsl_to_rgb(0.3, 0.0, 0.5), [128, 128, 128]);
        // Hue wraps
        assert_eq!(hsl_to_rgb(1.0, 1.0, 0.5), hsl_to_rgb(0.0, 1.0, 0.5));
    }

    #[test]
    fn test_palette() {
        let colors = palette();
        assert_eq!(colors.len(), PALETTE_SIZE);
        assert_eq!(colors[0], [0, 255, 255]);
    }

    #[test]
    fn test_point_escape() {
        let mut point = MandelPoint::new(Vector2::new(1.0, 1.0));
        point.step();
        assert_eq!(point.z, Vector2::new(1.0, 1.0));
        point.step();
        assert_eq!(point.z, Vector2::new(1.0, 3.0));
        assert!(point.inside);
        assert_eq!(point.iterations, 2);

        point.step();
        assert!(!point.inside);
        assert_eq!(point.iterations, 2);
        let escaped = point;
        point.step();
        assert_eq!(point, escaped);

        let mut origin = MandelPoint::new(Vector2::ZERO);
        for _ in 0..50 {
            origin.step();
        }
        assert!(origin.inside);
        assert_eq!(origin.iterations, 50);
    }

    #[test]
    fn test_field_shape_and_paint() {
        let mut field = MandelbrotField::new(4, (-2.0, 2.0), (-1.0, 1.0));
        assert_eq!(field.height(), 2);
        assert_eq!(field.point(0, 0).map(|p| p.center), Some(Vector2::new(-2.0, -1.0)));
        assert_eq!(field.point(4, 0), None);

        let blank = field.to_rgba();
        assert_eq!(blank.len(), 4 * 2 * 4);
        assert!(blank.iter().all(|&b| b == 255));

        for _ in 0..5 {
            field.step();
        }
        assert_eq!(field.iterations(), 5);
        assert!(field.escaped() > 0);
        // (-2, -1) escapes after surviving one iteration
        let corner = field.point(0, 0).unwrap();
        assert!(!corner.inside);
        assert_eq!(corner.iterations, 1);
        let colors = palette();
        assert_eq!(&field.to_rgba()[..4], &[colors[1][0], colors[1][1], colors[1][2], 255]);
    }

    #[test]
    fn test_run_steps_once_per_frame() {
        let settings = MandelbrotSettings {
            width: 16,
            frames: 11,
            ..MandelbrotSettings::default()
        };
        let report = run(&settings, &FrameDriver::manual(16.0));
        assert_eq!(report.iterations, 10);
        assert_eq!(report.rgba.len(), 16 * 9 * 4);
    }
}
