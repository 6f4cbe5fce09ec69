//! Configuration for coordinate resolution
//!
//! Page configuration (scale factors, margins, grid) arrives as `page`
//! documents that are merged leaf by leaf in declaration order, then validated
//! into a [`PageConfig`].

use serde::Deserialize;
use thiserror::Error;

use super::types::Axis;

/// Errors raised while validating page configuration
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("scale factor `{field}` must be nonzero")]
    ZeroScale { field: &'static str },

    #[error("`{field}` must be a finite number, got {value}")]
    NonFinite { field: &'static str, value: f64 },
}

/// Factors converting unscaled positions to rendering units
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PositionScale {
    pub x: f64,
    pub y: f64,
}

impl PositionScale {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn factor(&self, axis: Axis) -> f64 {
        match axis {
            Axis::X => self.x,
            Axis::Y => self.y,
        }
    }
}

impl Default for PositionScale {
    fn default() -> Self {
        Self::new(1.0, 1.0)
    }
}

/// Factors converting unscaled sizes to rendering units
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SizeScale {
    pub w: f64,
    pub h: f64,
}

impl SizeScale {
    pub fn new(w: f64, h: f64) -> Self {
        Self { w, h }
    }

    pub fn factor(&self, axis: Axis) -> f64 {
        match axis {
            Axis::X => self.w,
            Axis::Y => self.h,
        }
    }
}

impl Default for SizeScale {
    fn default() -> Self {
        Self::new(1.0, 1.0)
    }
}

/// Scale factors for one render pass
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ScaleConfig {
    pub position: PositionScale,
    pub size: SizeScale,
}

impl ScaleConfig {
    pub fn new(position: PositionScale, size: SizeScale) -> Self {
        Self { position, size }
    }

    /// Set the position factors
    pub fn with_position(mut self, x: f64, y: f64) -> Self {
        self.position = PositionScale::new(x, y);
        self
    }

    pub fn with_size(mut self, w: f64, h: f64) -> Self {
        self.size = SizeScale::new(w, h);
        self
    }
}

/// Page margins in unscaled units
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Margin {
    pub w: f64,
    pub h: f64,
}

/// Validated page configuration
#[derive(Debug, Clone, PartialEq, Default)]
pub struct PageConfig {
    pub scale: ScaleConfig,
    pub margin: Margin,
    pub grid: Option<f64>,
}

/// A `page` document as written. Every leaf is optional so documents can be
/// layered.
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PageDocument {
    #[serde(default)]
    pub scale: ScaleDocument,
    #[serde(default)]
    pub margin: MarginDocument,
    pub grid: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ScaleDocument {
    #[serde(default)]
    pub position: AxisPair,
    #[serde(default)]
    pub size: ExtentPair,
}

#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AxisPair {
    pub x: Option<f64>,
    pub y: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ExtentPair {
    pub w: Option<f64>,
    pub h: Option<f64>,
}

pub type MarginDocument = ExtentPair;

fn overlay(slot: &mut Option<f64>, later: Option<f64>) {
    if later.is_some() {
        *slot = later;
    }
}

impl PageDocument {
    /// Merge a later document into this one; defined leaves win
    pub fn merge(&mut self, later: &PageDocument) {
        overlay(&mut self.scale.position.x, later.scale.position.x);
        overlay(&mut self.scale.position.y, later.scale.position.y);
        overlay(&mut self.scale.size.w, later.scale.size.w);
        overlay(&mut self.scale.size.h, later.scale.size.h);
        overlay(&mut self.margin.w, later.margin.w);
        overlay(&mut self.margin.h, later.margin.h);
        overlay(&mut self.grid, later.grid);
    }

    /// Validate and fill defaults
    pub fn build(&self) -> Result<PageConfig, ConfigError> {
        let factor = |field: &'static str, value: Option<f64>| -> Result<f64, ConfigError> {
            let value = finite(field, value.unwrap_or(1.0))?;
            if value == 0.0 {
                return Err(ConfigError::ZeroScale { field });
            }
            Ok(value)
        };

        let scale = ScaleConfig {
            position: PositionScale::new(
                factor("scale.position.x", self.scale.position.x)?,
                factor("scale.position.y", self.scale.position.y)?,
            ),
            size: SizeScale::new(
                factor("scale.size.w", self.scale.size.w)?,
                factor("scale.size.h", self.scale.size.h)?,
            ),
        };
        let margin = Margin {
            w: finite("margin.w", self.margin.w.unwrap_or(0.0))?,
            h: finite("margin.h", self.margin.h.unwrap_or(0.0))?,
        };
        let grid = self.grid.map(|g| finite("grid", g)).transpose()?;

        Ok(PageConfig {
            scale,
            margin,
            grid,
        })
    }
}

fn finite(field: &'static str, value: f64) -> Result<f64, ConfigError> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(ConfigError::NonFinite { field, value })
    }
}

/// Options for the resolution driver
#[derive(Debug, Clone, Default)]
pub struct ResolveConfig {
    /// Upper bound on resolution passes; defaults to twice the element
    /// count plus one
    pub max_passes: Option<usize>,
}

impl ResolveConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the pass bound
    pub fn with_max_passes(mut self, passes: usize) -> Self {
        self.max_passes = Some(passes);
        self
    }

    /// Effective pass bound for `element_count` elements
    ///
    /// Every pass that does not stall settles at least one position or
    /// dimension, and each element has one of each.
    pub fn pass_limit(&self, element_count: usize) -> usize {
        self.max_passes.unwrap_or(2 * element_count + 1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_page_config() {
        let config = PageDocument::default().build().unwrap();
        assert_eq!(config.scale, ScaleConfig::default());
        assert_eq!(config.scale.position.x, 1.0);
        assert_eq!(config.scale.size.h, 1.0);
        assert_eq!(config.margin, Margin::default());
        assert_eq!(config.grid, None);
    }

    #[test]
    fn test_merge_overrides_defined_leaves_only() {
        let mut first: PageDocument = toml::from_str(
            r#"
            grid = 10
            [scale.position]
            x = 2
            y = 3
            [margin]
            w = 5
            "#,
        )
        .unwrap();
        let second: PageDocument = toml::from_str(
            r#"
            [scale.position]
            y = 4
            [margin]
            h = 6
            "#,
        )
        .unwrap();

        first.merge(&second);
        let config = first.build().unwrap();
        assert_eq!(config.scale.position, PositionScale::new(2.0, 4.0));
        assert_eq!(config.margin, Margin { w: 5.0, h: 6.0 });
        assert_eq!(config.grid, Some(10.0));
    }

    #[test]
    fn test_zero_scale_rejected() {
        let doc: PageDocument = toml::from_str("[scale.size]\nw = 0").unwrap();
        assert_eq!(
            doc.build(),
            Err(ConfigError::ZeroScale {
                field: "scale.size.w"
            })
        );
    }

    #[test]
    fn test_unknown_page_key_rejected() {
        let result: Result<PageDocument, _> = toml::from_str("zoom = 3");
        assert!(result.is_err());
    }

    #[test]
    fn test_pass_limit() {
        assert_eq!(ResolveConfig::new().pass_limit(4), 9);
        assert_eq!(ResolveConfig::new().pass_limit(0), 1);
        assert_eq!(ResolveConfig::new().with_max_passes(2).pass_limit(4), 2);
    }
}
