//! Error types for timeline editing and configuration loading.

use thiserror::Error;

use crate::element::ElementId;

/// Errors reported by the element store, the cut engine and the ghost drag.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum TimelineError {
    #[error("Element not found: {id}")]
    ElementNotFound { id: ElementId },

    #[error("Cut time {cut_time}ms is outside ({start}ms, {end}ms) of element {id}")]
    CutTimeOutOfRange {
        id: ElementId,
        cut_time: f64,
        start: f64,
        end: f64,
    },

    #[error("Cannot {operation} while {state}")]
    InvalidStateTransition {
        operation: &'static str,
        state: &'static str,
    },

    #[error("Duplicate element id: {id}")]
    DuplicateElementId { id: ElementId },

    #[error("Invalid time frame: start {start}ms must be before end {end}ms")]
    InvalidTimeFrame { start: f64, end: f64 },

    #[error(
        "Element {id} has an invalid source span: start {source_start_time}ms, \
         duration {source_duration}ms"
    )]
    InvalidSourceSpan {
        id: ElementId,
        source_start_time: f64,
        source_duration: f64,
    },

    #[error("Row {row} already has an element overlapping {start}ms..{end}ms")]
    RowOverlap { row: usize, start: f64, end: f64 },

    #[error("Failed to parse element list: {0}")]
    Parse(String),
}

/// Errors from loading an [`EditorConfig`](crate::config::EditorConfig).
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse config: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Invalid zoom bounds: min {min} must be positive and below max {max}")]
    InvalidZoomBounds { min: f64, max: f64 },

    #[error("Invalid config value {name} = {value}")]
    InvalidValue { name: &'static str, value: f64 },
}
