use std::path::Path;

use log::info;
use serde::{Deserialize, Serialize};

use crate::element::ElementType;
use crate::error::ConfigError;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ZoomConfig {
    pub min: f64,
    /// Matches the range addressable by the timeline scrollbar.
    pub max: f64,
    pub default_level: f64,
    pub step: f64,
}

impl Default for ZoomConfig {
    fn default() -> Self {
        Self {
            min: 1.0,
            max: 29.5,
            default_level: 1.0,
            step: 1.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DragConfig {
    pub default_image_duration_ms: f64,
    pub default_text_duration_ms: f64,
    /// Used for video/audio drops whose duration was not probed.
    pub default_media_duration_ms: f64,
    pub snap_threshold_px: f64,
}

impl Default for DragConfig {
    fn default() -> Self {
        Self {
            default_image_duration_ms: 5000.0,
            default_text_duration_ms: 3000.0,
            default_media_duration_ms: 3000.0,
            snap_threshold_px: 10.0,
        }
    }
}

impl ZoomConfig {
    /// Bounds must be finite with `0 < min < max`, the default level inside
    /// them and the step positive.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let ZoomConfig {
            min,
            max,
            default_level,
            step,
        } = *self;
        if !(min > 0.0 && min < max && max.is_finite()) {
            return Err(ConfigError::InvalidZoomBounds { min, max });
        }
        if !(min..=max).contains(&default_level) {
            return Err(ConfigError::InvalidValue {
                name: "zoom.default_level",
                value: default_level,
            });
        }
        if !(step > 0.0 && step.is_finite()) {
            return Err(ConfigError::InvalidValue {
                name: "zoom.step",
                value: step,
            });
        }
        Ok(())
    }
}

impl DragConfig {
    /// Every element type needs a positive default duration so a ghost
    /// without a probed duration still covers a non-empty frame.
    pub fn validate(&self) -> Result<(), ConfigError> {
        for element_type in ElementType::ALL {
            let value = self.default_duration(element_type);
            if !(value > 0.0 && value.is_finite()) {
                return Err(ConfigError::InvalidValue {
                    name: duration_key(element_type),
                    value,
                });
            }
        }
        if !(self.snap_threshold_px >= 0.0 && self.snap_threshold_px.is_finite()) {
            return Err(ConfigError::InvalidValue {
                name: "drag.snap_threshold_px",
                value: self.snap_threshold_px,
            });
        }
        Ok(())
    }

    pub fn default_duration(&self, element_type: ElementType) -> f64 {
        match element_type {
            ElementType::Video | ElementType::Audio => self.default_media_duration_ms,
            ElementType::Image => self.default_image_duration_ms,
            ElementType::Text => self.default_text_duration_ms,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct EditorConfig {
    pub zoom: ZoomConfig,
    pub drag: DragConfig,
}

impl EditorConfig {
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: EditorConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let raw = std::fs::read_to_string(path)?;
        let config = Self::from_json(&raw)?;
        info!("Loaded editor config from {}", path.display());
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.zoom.validate()?;
        self.drag.validate()
    }
}

fn duration_key(element_type: ElementType) -> &'static str {
    match element_type {
        ElementType::Video | ElementType::Audio => "drag.default_media_duration_ms",
        ElementType::Image => "drag.default_image_duration_ms",
        ElementType::Text => "drag.default_text_duration_ms",
    }
}
