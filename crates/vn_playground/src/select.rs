// SPDX-License-Identifier: MIT OR Apache-2.0
//! Dropdown select model.
//!
//! The control shows one of several options and opens a menu to pick
//! another. Its minimum width fits the widest option, measured through a
//! caller-owned [`TextWidthCache`].

use std::collections::HashMap;
use thiserror::Error;

/// Horizontal padding plus border around the widest option, in pixels
pub const CHROME_WIDTH: f64 = 8.0 + 2.0;

/// Measures rendered text
pub trait TextMeasure {
    /// Width of `text` in pixels when drawn with `font`
    fn text_width(&self, text: &str, font: &str) -> f64;
}

/// Fixed advance per character, derived from the pixel size in the font
/// string (for example `"400 16px Segoe UI"`).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MonospaceMeasure {
    /// Advance as a fraction of the font size
    pub advance: f64,
    /// Font size used when the font string has none
    pub fallback_size: f64,
}

impl Default for MonospaceMeasure {
    fn default() -> Self {
        Self {
            advance: 0.6,
            fallback_size: 16.0,
        }
    }
}

impl MonospaceMeasure {
    fn font_size(&self, font: &str) -> f64 {
        font.split_whitespace()
            .find_map(|part| part.strip_suffix("px")?.parse::<f64>().ok())
            .unwrap_or(self.fallback_size)
    }
}

impl TextMeasure for MonospaceMeasure {
    fn text_width(&self, text: &str, font: &str) -> f64 {
        text.chars().count() as f64 * self.font_size(font) * self.advance
    }
}

/// Memoizes text widths per font and text
#[derive(Debug)]
pub struct TextWidthCache<M> {
    measure: M,
    widths: HashMap<(String, String), f64>,
}

impl<M: TextMeasure> TextWidthCache<M> {
    /// Create an empty cache over `measure`
    pub fn new(measure: M) -> Self {
        Self {
            measure,
            widths: HashMap::new(),
        }
    }

    /// Width of `text` in `font`, measuring on first use
    pub fn width(&mut self, text: &str, font: &str) -> f64 {
        let measure = &self.measure;
        *self.widths
            .entry((font.to_string(), text.to_string()))
            .or_insert_with(|| measure.text_width(text, font))
    }

    /// Number of cached measurements
    pub fn len(&self) -> usize {
        self.widths.len()
    }

    /// Check if nothing was measured yet
    pub fn is_empty(&self) -> bool {
        self.widths.is_empty()
    }
}

/// Error for select operations
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SelectError {
    /// Index does not name an option
    #[error("Option {index} out of range (have {len})")]
    OutOfRange {
        /// Requested index
        index: usize,
        /// Number of options
        len: usize,
    },
}

/// One-of-many choice with an open/closed menu
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Select {
    options: Vec<String>,
    selected: usize,
    open: bool,
}

impl Select {
    /// Create a select with its menu open. Fails if `selected` is not an
    /// option.
    pub fn new(options: Vec<String>, selected: usize) -> Result<Self, SelectError> {
        if selected >= options.len() {
            return Err(SelectError::OutOfRange {
                index: selected,
                len: options.len(),
            });
        }
        Ok(Self {
            options,
            selected,
            open: true,
        })
    }

    /// All options
    pub fn options(&self) -> &[String] {
        &self.options
    }

    /// Index of the selected option
    pub fn selected_index(&self) -> usize {
        self.selected
    }

    /// The selected option
    pub fn selected(&self) -> &str {
        &self.options[self.selected]
    }

    /// Check if the menu is showing
    pub fn is_open(&self) -> bool {
        self.open
    }

    /// Open or close the menu without changing the selection
    pub fn toggle(&mut self) {
        self.open = !self.open;
        tracing::debug!(open = self.open, "Select toggled");
    }

    /// Select an option and close the menu. On error nothing changes.
    pub fn choose(&mut self, index: usize) -> Result<&str, SelectError> {
        if index >= self.options.len() {
            return Err(SelectError::OutOfRange {
                index,
                len: self.options.len(),
            });
        }
        self.selected = index;
        self.open = false;
        tracing::debug!(option = %self.options[index], "Select chose");
        Ok(&self.options[index])
    }

    /// Smallest width that fits every option in `font`
    pub fn min_width<M: TextMeasure>(&self, cache: &mut TextWidthCache<M>, font: &str) -> f64 {
        let widest = self.options.iter()
            .map(|opt| cache.width(opt, font))
            .fold(0.0, f64::max);
        widest.ceil() + CHROME_WIDTH
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    struct CountingMeasure<'a> {
        calls: &'a Cell<usize>,
    }

    impl TextMeasure for CountingMeasure<'_> {
        fn text_width(&self, text: &str, _font: &str) -> f64 {
            self.calls.set(self.calls.get() + 1);
            text.len() as f64 * 7.3
        }
    }

    fn options() -> Vec<String> {
        ["opt", "Option1", "Option 2", "Option3"].into_iter().map(String::from).collect()
    }

    #[test]
    fn test_new_rejects_out_of_range() {
        assert_eq!(
            Select::new(options(), 4),
            Err(SelectError::OutOfRange { index: 4, len: 4 })
        );
        assert!(Select::new(Vec::new(), 0).is_err());
        assert_eq!(Select::new(options(), 3).unwrap().selected(), "Option3");
    }

    #[test]
    fn test_toggle_and_choose() {
        let mut select = Select::new(options(), 0).unwrap();
        assert!(select.is_open());

        select.toggle();
        assert!(!select.is_open());
        select.toggle();
        assert!(select.is_open());
        assert_eq!(select.selected(), "opt");

        assert_eq!(select.choose(2), Ok("Option 2"));
        assert!(!select.is_open());
        assert_eq!(select.selected_index(), 2);
    }

    #[test]
    fn test_choose_out_of_range_keeps_state() {
        let mut select = Select::new(options(), 1).unwrap();
        assert!(select.choose(9).is_err());
        assert!(select.is_open());
        assert_eq!(select.selected_index(), 1);
    }

    #[test]
    fn test_min_width_uses_cache() {
        let calls = Cell::new(0);
        let mut cache = TextWidthCache::new(CountingMeasure { calls: &calls });
        let select = Select::new(options(), 0).unwrap();

        // "Option 2" is 8 bytes: 58.4 rounds up to 59
        assert_eq!(select.min_width(&mut cache, "400 16px serif"), 59.0 + CHROME_WIDTH);
        assert_eq!(calls.get(), 4);

        select.min_width(&mut cache, "400 16px serif");
        assert_eq!(calls.get(), 4);

        select.min_width(&mut cache, "700 20px serif");
        assert_eq!(calls.get(), 8);
        assert_eq!(cache.len(), 8);
    }

    #[test]
    fn test_monospace_measure() {
        let measure = MonospaceMeasure::default();
        assert_eq!(measure.text_width("abcd", "400 10px Segoe UI, serif"), 24.0);
        assert_eq!(measure.text_width("ab", "bold serif"), 2.0 * 16.0 * 0.6);
    }
}
