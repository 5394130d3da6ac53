//! Ghost element tracking for a file being dragged over the timeline.
//!
//! `Idle -> Dragging -> (commit | cancel) -> Idle`. The ghost is purely
//! presentational: it never touches the element store. A drop hands the
//! final placement to a caller-supplied commit closure, and the machine is
//! back in `Idle` before that closure runs.

use log::{debug, warn};
use serde::Serialize;

use crate::element::{
    ElementKind, ElementType, MediaProperties, TextProperties, TimeFrame, TimelineElement,
};
use crate::error::TimelineError;

/// Provisional placement shown while dragging.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct GhostCandidate {
    pub element_type: ElementType,
    pub duration: f64,
    pub time_frame: TimeFrame,
    pub row: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ActiveDrag<F> {
    pub file: F,
    pub candidate: GhostCandidate,
    pub pointer_position: f64,
    pub is_incompatible: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub enum GhostState<F> {
    Idle,
    Dragging(ActiveDrag<F>),
}

impl<F> GhostState<F> {
    fn label(&self) -> &'static str {
        match self {
            GhostState::Idle => "idle",
            GhostState::Dragging(_) => "dragging",
        }
    }
}

/// What the commit closure receives on drop.
#[derive(Debug, Clone, PartialEq)]
pub struct GhostDrop<F> {
    pub file: F,
    pub element_type: ElementType,
    pub duration: f64,
    pub position: f64,
    pub row: usize,
}

impl<F> GhostDrop<F> {
    pub fn time_frame(&self) -> TimeFrame {
        TimeFrame::new(self.position, self.position + self.duration)
    }

    /// A fresh element for this drop playing `src` from its beginning.
    /// Text drops start with no words.
    pub fn to_element(&self, src: impl Into<String>) -> TimelineElement {
        let src = src.into();
        let media = || MediaProperties::new(src.clone(), 0.0, self.duration);
        let kind = match self.element_type {
            ElementType::Video => ElementKind::Video(media()),
            ElementType::Audio => ElementKind::Audio(media()),
            ElementType::Image => ElementKind::Image(media()),
            ElementType::Text => ElementKind::Text(TextProperties::default()),
        };
        TimelineElement::new(src, kind, self.time_frame(), self.row)
    }
}

/// Overlay state handed to rendering.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct GhostSnapshot {
    pub is_dragging: bool,
    pub candidate: Option<GhostCandidate>,
    pub target_row: Option<usize>,
    pub is_incompatible: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct GhostDrag<F> {
    state: GhostState<F>,
}

impl<F> Default for GhostDrag<F> {
    fn default() -> Self {
        Self {
            state: GhostState::Idle,
        }
    }
}

impl<F> GhostDrag<F> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &GhostState<F> {
        &self.state
    }

    pub fn is_dragging(&self) -> bool {
        matches!(self.state, GhostState::Dragging(_))
    }

    pub fn active(&self) -> Option<&ActiveDrag<F>> {
        match &self.state {
            GhostState::Dragging(drag) => Some(drag),
            GhostState::Idle => None,
        }
    }

    /// Begins a drag. Only one ghost may be active; a second start is refused
    /// and leaves the current drag as it is.
    pub fn start_drag(
        &mut self,
        file: F,
        element_type: ElementType,
        default_duration: f64,
    ) -> Result<(), TimelineError> {
        if self.is_dragging() {
            return Err(self.invalid("start a drag"));
        }
        let duration = default_duration.max(0.0);
        self.state = GhostState::Dragging(ActiveDrag {
            file,
            candidate: GhostCandidate {
                element_type,
                duration,
                time_frame: TimeFrame::new(0.0, duration),
                row: 0,
            },
            pointer_position: 0.0,
            is_incompatible: false,
        });
        debug!("ghost drag started: {} ({duration}ms)", element_type.label());
        Ok(())
    }

    pub fn update_position(
        &mut self,
        position: f64,
        row: usize,
        is_incompatible: bool,
    ) -> Result<(), TimelineError> {
        if !self.is_dragging() {
            return Err(self.invalid("update a drag"));
        }
        if let GhostState::Dragging(drag) = &mut self.state {
            let position = position.max(0.0);
            drag.pointer_position = position;
            drag.candidate.time_frame =
                TimeFrame::new(position, position + drag.candidate.duration);
            drag.candidate.row = row;
            drag.is_incompatible = is_incompatible;
        }
        Ok(())
    }

    /// Ends the drag at `final_position`/`row` and hands the placement to
    /// `on_commit`, whose result is passed through.
    ///
    /// The state is reset before `on_commit` runs, so it is `Idle` afterwards
    /// whatever the closure returns and even if it panics.
    pub fn finish_drag<R>(
        &mut self,
        final_position: f64,
        row: usize,
        on_commit: impl FnOnce(GhostDrop<F>) -> R,
    ) -> Result<R, TimelineError> {
        let drag = match std::mem::replace(&mut self.state, GhostState::Idle) {
            GhostState::Dragging(drag) => drag,
            GhostState::Idle => return Err(self.invalid("finish a drag")),
        };
        let drop = GhostDrop {
            file: drag.file,
            element_type: drag.candidate.element_type,
            duration: drag.candidate.duration,
            position: final_position.max(0.0),
            row,
        };
        debug!("ghost drag committed at {}ms row {row}", drop.position);
        Ok(on_commit(drop))
    }

    /// Aborts without committing. Returns whether a drag was active.
    pub fn cancel_drag(&mut self) -> bool {
        let was_dragging = self.is_dragging();
        self.state = GhostState::Idle;
        if was_dragging {
            debug!("ghost drag cancelled");
        }
        was_dragging
    }

    pub fn snapshot(&self) -> GhostSnapshot {
        match &self.state {
            GhostState::Idle => GhostSnapshot {
                is_dragging: false,
                candidate: None,
                target_row: None,
                is_incompatible: false,
            },
            GhostState::Dragging(drag) => GhostSnapshot {
                is_dragging: true,
                candidate: Some(drag.candidate),
                target_row: Some(drag.candidate.row),
                is_incompatible: drag.is_incompatible,
            },
        }
    }

    fn invalid(&self, operation: &'static str) -> TimelineError {
        let err = TimelineError::InvalidStateTransition {
            operation,
            state: self.state.label(),
        };
        warn!("ghost drag: {err}");
        err
    }
}
