//! Style configuration shared by every plot of a render pass.
//!
//! [`StyleConfig`] is the mutable session state edited from the UI.
//! [`StyleSnapshot`] is the frozen copy a render call works from, so a style
//! change only affects renders started after it.

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::ops::RangeInclusive;

use super::colors::Color;
use crate::error::{PlotError, Result};

pub const AXIS_FONT_RANGE: RangeInclusive<u32> = 8..=24;
pub const TITLE_FONT_RANGE: RangeInclusive<u32> = 10..=32;
pub const LEGEND_FONT_RANGE: RangeInclusive<u32> = 6..=20;
pub const LINE_WIDTH_RANGE: RangeInclusive<f64> = 0.5..=6.0;
pub const MARKER_SIZE_RANGE: RangeInclusive<u32> = 2..=20;

/// Palette used until the user picks one.
pub static DEFAULT_COLOR_SCHEME: Lazy<Vec<Color>> = Lazy::new(|| {
    vec![
        Color::rgba(93, 164, 214, 0.7),
        Color::rgba(255, 144, 14, 0.7),
        Color::rgba(44, 160, 101, 0.7),
        Color::rgba(255, 65, 54, 0.7),
        Color::rgba(207, 114, 255, 0.7),
        Color::rgba(127, 96, 0, 0.7),
        Color::rgba(255, 140, 184, 0.7),
        Color::rgba(79, 90, 117, 0.7),
    ]
});

/// Font sizes in points.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FontSizes {
    pub axis: u32,
    pub title: u32,
    pub legend: u32,
}

impl Default for FontSizes {
    fn default() -> Self {
        Self {
            axis: 12,
            title: 16,
            legend: 10,
        }
    }
}

/// Stroke settings for curve plots.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LineStyle {
    pub width: f64,
    pub marker_size: u32,
}

impl Default for LineStyle {
    fn default() -> Self {
        Self {
            width: 2.0,
            marker_size: 6,
        }
    }
}

/// A style change coming from the UI.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum StyleEvent {
    Update {
        #[serde(default)]
        axis_size: Option<u32>,
        #[serde(default)]
        title_size: Option<u32>,
        #[serde(default)]
        legend_size: Option<u32>,
    },
    Reset,
}

/// Mutable style state of one session.
#[derive(Debug, Clone, PartialEq)]
pub struct StyleConfig {
    fonts: FontSizes,
    line: LineStyle,
    colors: Vec<Color>,
}

impl Default for StyleConfig {
    fn default() -> Self {
        Self {
            fonts: FontSizes::default(),
            line: LineStyle::default(),
            colors: DEFAULT_COLOR_SCHEME.clone(),
        }
    }
}

/// On-disk form of a style configuration; every field is optional.
#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct StyleSettings {
    axis_font_size: Option<u32>,
    title_font_size: Option<u32>,
    legend_font_size: Option<u32>,
    line_width: Option<f64>,
    marker_size: Option<u32>,
    color_scheme: Option<Vec<Color>>,
}

impl StyleConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load a configuration from JSON, starting from the defaults and
    /// validating every provided value.
    pub fn from_json(json: &str) -> Result<Self> {
        let settings: StyleSettings = serde_json::from_str(json)?;
        let mut config = Self::default();
        config.set(
            settings.axis_font_size,
            settings.title_font_size,
            settings.legend_font_size,
        )?;
        config.set_line_style(settings.line_width, settings.marker_size)?;
        if let Some(colors) = settings.color_scheme {
            config.set_color_scheme(colors)?;
        }
        Ok(config)
    }

    /// Update the provided font sizes. Every value is checked before any is
    /// assigned, so a rejected call leaves the config unchanged.
    pub fn set(
        &mut self,
        axis_size: Option<u32>,
        title_size: Option<u32>,
        legend_size: Option<u32>,
    ) -> Result<()> {
        check_u32("axis_font_size", axis_size, &AXIS_FONT_RANGE)?;
        check_u32("title_font_size", title_size, &TITLE_FONT_RANGE)?;
        check_u32("legend_font_size", legend_size, &LEGEND_FONT_RANGE)?;

        if let Some(size) = axis_size {
            self.fonts.axis = size;
        }
        if let Some(size) = title_size {
            self.fonts.title = size;
        }
        if let Some(size) = legend_size {
            self.fonts.legend = size;
        }
        Ok(())
    }

    /// Update line width and marker size with the same all-or-nothing contract
    /// as [`StyleConfig::set`].
    pub fn set_line_style(&mut self, width: Option<f64>, marker_size: Option<u32>) -> Result<()> {
        if let Some(w) = width {
            if !LINE_WIDTH_RANGE.contains(&w) {
                return Err(PlotError::Validation {
                    field: "line_width",
                    value: w,
                    min: *LINE_WIDTH_RANGE.start(),
                    max: *LINE_WIDTH_RANGE.end(),
                });
            }
        }
        check_u32("marker_size", marker_size, &MARKER_SIZE_RANGE)?;

        if let Some(w) = width {
            self.line.width = w;
        }
        if let Some(size) = marker_size {
            self.line.marker_size = size;
        }
        Ok(())
    }

    /// Replace the color sequence used to tell series apart.
    pub fn set_color_scheme(&mut self, colors: Vec<Color>) -> Result<()> {
        if colors.is_empty() {
            return Err(PlotError::EmptyColorScheme);
        }
        self.colors = colors;
        Ok(())
    }

    /// Restore every setting to its default.
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    pub fn apply_event(&mut self, event: StyleEvent) -> Result<()> {
        match event {
            StyleEvent::Update {
                axis_size,
                title_size,
                legend_size,
            } => self.set(axis_size, title_size, legend_size),
            StyleEvent::Reset => {
                self.reset();
                Ok(())
            }
        }
    }

    pub fn font_sizes(&self) -> FontSizes {
        self.fonts
    }

    pub fn line_style(&self) -> LineStyle {
        self.line
    }

    pub fn color_scheme(&self) -> &[Color] {
        &self.colors
    }

    /// Freeze the current settings for one render call.
    pub fn snapshot(&self) -> StyleSnapshot {
        StyleSnapshot {
            fonts: self.fonts,
            line: self.line,
            colors: self.colors.clone(),
        }
    }
}

fn check_u32(field: &'static str, value: Option<u32>, range: &RangeInclusive<u32>) -> Result<()> {
    match value {
        Some(v) if !range.contains(&v) => Err(PlotError::Validation {
            field,
            value: f64::from(v),
            min: f64::from(*range.start()),
            max: f64::from(*range.end()),
        }),
        _ => Ok(()),
    }
}

/// Immutable copy of a [`StyleConfig`].
#[derive(Debug, Clone, PartialEq)]
pub struct StyleSnapshot {
    fonts: FontSizes,
    line: LineStyle,
    colors: Vec<Color>,
}

impl StyleSnapshot {
    pub fn fonts(&self) -> FontSizes {
        self.fonts
    }

    pub fn line(&self) -> LineStyle {
        self.line
    }

    pub fn colors(&self) -> &[Color] {
        &self.colors
    }
}

impl Default for StyleSnapshot {
    fn default() -> Self {
        StyleConfig::default().snapshot()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use proptest::prelude::*;

    #[test]
    fn test_defaults() {
        let config = StyleConfig::new();
        assert_eq!(
            config.font_sizes(),
            FontSizes {
                axis: 12,
                title: 16,
                legend: 10
            }
        );
        assert_eq!(config.line_style(), LineStyle::default());
        assert_eq!(config.color_scheme().len(), 8);
    }

    #[test]
    fn test_partial_update_leaves_other_fields() {
        let mut config = StyleConfig::new();
        config.set(None, Some(20), None).unwrap();
        assert_eq!(config.font_sizes().axis, 12);
        assert_eq!(config.font_sizes().title, 20);
        assert_eq!(config.font_sizes().legend, 10);
    }

    #[test]
    fn test_rejected_update_is_atomic() {
        let mut config = StyleConfig::new();
        let err = config.set(Some(14), Some(40), None).unwrap_err();
        match err {
            PlotError::Validation { field, min, max, .. } => {
                assert_eq!(field, "title_font_size");
                assert_eq!((min, max), (10.0, 32.0));
            }
            other => panic!("unexpected error: {other}"),
        }
        assert_eq!(config.font_sizes(), FontSizes::default());
    }

    #[test]
    fn test_reset_restores_defaults() {
        let mut config = StyleConfig::new();
        config.set(Some(20), Some(30), Some(18)).unwrap();
        config.set_line_style(Some(4.0), Some(12)).unwrap();
        config.set_color_scheme(vec![Color::BLACK]).unwrap();
        config.reset();
        assert_eq!(config, StyleConfig::default());
    }

    #[test]
    fn test_empty_color_scheme_rejected() {
        let mut config = StyleConfig::new();
        assert!(matches!(
            config.set_color_scheme(Vec::new()),
            Err(PlotError::EmptyColorScheme)
        ));
        assert_eq!(config.color_scheme().len(), 8);
    }

    #[test]
    fn test_line_style_bounds() {
        let mut config = StyleConfig::new();
        assert!(config.set_line_style(Some(0.1), None).is_err());
        assert!(config.set_line_style(Some(3.0), Some(1)).is_err());
        assert_eq!(config.line_style(), LineStyle::default());
        config.set_line_style(Some(3.0), Some(8)).unwrap();
        assert_eq!(config.line_style().width, 3.0);
        assert_eq!(config.line_style().marker_size, 8);
    }

    #[test]
    fn test_snapshot_is_detached() {
        let mut config = StyleConfig::new();
        let snapshot = config.snapshot();
        config.set(Some(22), None, None).unwrap();
        assert_eq!(snapshot.fonts().axis, 12);
        assert_eq!(config.snapshot().fonts().axis, 22);
    }

    #[test]
    fn test_events() {
        let mut config = StyleConfig::new();
        let event: StyleEvent =
            serde_json::from_str(r#"{"event": "update", "axis_size": 18}"#).unwrap();
        config.apply_event(event).unwrap();
        assert_eq!(config.font_sizes().axis, 18);
        config.apply_event(StyleEvent::Reset).unwrap();
        assert_eq!(config.font_sizes().axis, 12);
    }

    #[test]
    fn test_from_json() {
        let config = StyleConfig::from_json(
            r##"{"axis_font_size": 14, "color_scheme": ["#1f77b4", "rgba(255, 0, 0, 0.5)"]}"##,
        )
        .unwrap();
        assert_eq!(config.font_sizes().axis, 14);
        assert_eq!(config.font_sizes().title, 16);
        assert_eq!(config.color_scheme().len(), 2);

        assert!(StyleConfig::from_json(r#"{"legend_font_size": 2}"#).is_err());
        assert!(StyleConfig::from_json(r#"{"colour": 2}"#).is_err());
    }

    proptest! {
        #[test]
        fn prop_in_range_axis_sizes_accepted(size in 8u32..=24) {
            let mut config = StyleConfig::new();
            prop_assert!(config.set(Some(size), None, None).is_ok());
            prop_assert_eq!(config.font_sizes().axis, size);
        }

        #[test]
        fn prop_out_of_range_axis_sizes_rejected(size in prop_oneof![0u32..8, 25u32..200]) {
            let mut config = StyleConfig::new();
            config.set(Some(20), Some(20), Some(12)).unwrap();
            let before = config.clone();
            prop_assert!(config.set(Some(size), Some(11), Some(7)).is_err());
            prop_assert_eq!(config, before);
        }
    }
}
