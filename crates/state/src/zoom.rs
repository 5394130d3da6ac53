//! Timeline zoom: a bounded zoom level mapped to a pixels-per-millisecond
//! scale, with synchronous change notification.
//!
//! Subscribers are called in subscription order from inside the mutating
//! call, so `zoom_value()` is already updated when they run and when the
//! call returns. An anchor set with [`ZoomManager::set_anchor`] rides on the
//! next emitted update only.

use log::debug;
use serde::{Deserialize, Serialize};

use crate::config::ZoomConfig;
use crate::error::ConfigError;

/// Scale at zoom level 1: 100 px per second.
pub const BASE_PIXELS_PER_MS: f64 = 0.1;

/// A timeline time that should stay under the same screen x across a zoom.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ZoomAnchor {
    pub time_ms: f64,
    /// Screen x of `time_ms`, relative to the left edge of the track content.
    pub screen_x: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ZoomChangeUpdate {
    pub old_value: f64,
    pub new_value: f64,
    /// Pixels per millisecond at `new_value`.
    pub derived_scale: f64,
    pub anchor: Option<ZoomAnchor>,
}

impl ZoomChangeUpdate {
    /// Horizontal scroll offset that keeps the anchor stationary, or `None`
    /// when the update carries no anchor.
    pub fn anchored_scroll_offset(&self) -> Option<f64> {
        let anchor = self.anchor?;
        Some((anchor.time_ms * self.derived_scale - anchor.screen_x).max(0.0))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

type Listener = Box<dyn FnMut(&ZoomChangeUpdate)>;

pub struct ZoomManager {
    config: ZoomConfig,
    zoom_value: f64,
    pending_anchor: Option<ZoomAnchor>,
    listeners: Vec<(SubscriptionId, Listener)>,
    next_subscription: u64,
}

impl ZoomManager {
    /// Starts at the configured default level. The config is validated here,
    /// so the bounds used for clamping are always ordered.
    pub fn new(config: ZoomConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self::with_valid_config(config))
    }

    fn with_valid_config(config: ZoomConfig) -> Self {
        Self {
            zoom_value: config.default_level,
            config,
            pending_anchor: None,
            listeners: Vec::new(),
            next_subscription: 0,
        }
    }

    pub fn config(&self) -> &ZoomConfig {
        &self.config
    }

    pub fn zoom_value(&self) -> f64 {
        self.zoom_value
    }

    pub fn pixels_per_ms(&self) -> f64 {
        scale_for(self.zoom_value)
    }

    /// Position of `zoom_value` within the allowed range, 0 to 100.
    pub fn zoom_percentage(&self) -> f64 {
        (self.zoom_value - self.config.min) / (self.config.max - self.config.min) * 100.0
    }

    pub fn time_to_px(&self, time_ms: f64) -> f64 {
        time_ms * self.pixels_per_ms()
    }

    pub fn px_to_time(&self, px: f64) -> f64 {
        px / self.pixels_per_ms()
    }

    pub fn zoom_in(&mut self, step: f64) -> bool {
        self.set_zoom_value(self.zoom_value + step, true)
    }

    pub fn zoom_out(&mut self, step: f64) -> bool {
        self.set_zoom_value(self.zoom_value - step, true)
    }

    /// Zooms by the configured default step.
    pub fn step_in(&mut self) -> bool {
        self.zoom_in(self.config.step)
    }

    pub fn step_out(&mut self) -> bool {
        self.zoom_out(self.config.step)
    }

    pub fn reset_zoom(&mut self) -> bool {
        self.set_zoom_value(self.config.default_level, true)
    }

    /// Clamps and assigns. Returns whether the value changed.
    ///
    /// With `notify` false nothing is emitted and a pending anchor stays
    /// pending; used while wiring up before listeners are attached.
    pub fn set_zoom_value(&mut self, value: f64, notify: bool) -> bool {
        if value.is_nan() {
            return false;
        }
        let old_value = self.zoom_value;
        let new_value = value.clamp(self.config.min, self.config.max);
        if new_value == old_value {
            return false;
        }
        self.zoom_value = new_value;
        debug!("zoom {old_value} -> {new_value}");

        if notify {
            let update = ZoomChangeUpdate {
                old_value,
                new_value,
                derived_scale: scale_for(new_value),
                anchor: self.pending_anchor.take(),
            };
            for (_, listener) in &mut self.listeners {
                listener(&update);
            }
        }
        true
    }

    /// Zooms to `value` keeping `anchor` stationary for this change only.
    pub fn zoom_at(&mut self, value: f64, anchor: ZoomAnchor) -> bool {
        let previous = self.pending_anchor.replace(anchor);
        let changed = self.set_zoom_value(value, true);
        if !changed {
            self.pending_anchor = previous;
        }
        changed
    }

    /// Attaches an anchor to the next emitted update, replacing any pending one.
    pub fn set_anchor(&mut self, anchor: ZoomAnchor) {
        self.pending_anchor = Some(anchor);
    }

    pub fn pending_anchor(&self) -> Option<ZoomAnchor> {
        self.pending_anchor
    }

    pub fn subscribe(
        &mut self,
        listener: impl FnMut(&ZoomChangeUpdate) + 'static,
    ) -> SubscriptionId {
        let id = SubscriptionId(self.next_subscription);
        self.next_subscription += 1;
        self.listeners.push((id, Box::new(listener)));
        id
    }

    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(sid, _)| *sid != id);
        self.listeners.len() != before
    }
}

impl Default for ZoomManager {
    fn default() -> Self {
        Self::with_valid_config(ZoomConfig::default())
    }
}

impl std::fmt::Debug for ZoomManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ZoomManager")
            .field("zoom_value", &self.zoom_value)
            .field("pending_anchor", &self.pending_anchor)
            .field("listeners", &self.listeners.len())
            .finish()
    }
}

fn scale_for(zoom_value: f64) -> f64 {
    BASE_PIXELS_PER_MS * zoom_value
}
