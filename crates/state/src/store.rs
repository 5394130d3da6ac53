use log::{info, warn};

use crate::element::{ElementId, ElementKind, TimeFrame, TimelineElement};
use crate::error::TimelineError;

/// Ordered collection of timeline elements, keyed by id.
///
/// Order is insertion order with cut clips spliced in at the position of the
/// element they replaced. `max_end` and `row_count` are derived and kept up
/// to date by every structural mutation.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ElementStore {
    elements: Vec<TimelineElement>,
    max_end: f64,
    row_count: usize,
}

impl ElementStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Initial load. Rejects what [`ElementStore::insert`] would reject:
    /// duplicate ids, bad time frames or source spans and overlaps on a row.
    pub fn from_elements(elements: Vec<TimelineElement>) -> Result<Self, TimelineError> {
        for (i, el) in elements.iter().enumerate() {
            validate_element(el)?;
            let earlier = &elements[..i];
            if earlier.iter().any(|other| other.id == el.id) {
                return Err(TimelineError::DuplicateElementId { id: el.id });
            }
            if earlier
                .iter()
                .any(|other| other.row == el.row && other.time_frame.overlaps(&el.time_frame))
            {
                let err = row_overlap(el);
                warn!("load rejected: {err}");
                return Err(err);
            }
        }
        let mut store = Self {
            elements,
            max_end: 0.0,
            row_count: 0,
        };
        store.recompute_derived_bounds();
        info!(
            "Loaded {} timeline elements ({} rows, {:.0}ms)",
            store.elements.len(),
            store.row_count,
            store.max_end
        );
        Ok(store)
    }

    pub fn from_json(json: &str) -> Result<Self, TimelineError> {
        let elements: Vec<TimelineElement> =
            serde_json::from_str(json).map_err(|e| TimelineError::Parse(e.to_string()))?;
        Self::from_elements(elements)
    }

    pub fn to_json(&self) -> Result<String, TimelineError> {
        serde_json::to_string_pretty(&self.elements)
            .map_err(|e| TimelineError::Parse(e.to_string()))
    }

    pub fn elements(&self) -> &[TimelineElement] {
        &self.elements
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    /// Latest end time across all elements, 0 when empty.
    pub fn max_end(&self) -> f64 {
        self.max_end
    }

    /// Highest occupied row plus one.
    pub fn row_count(&self) -> usize {
        self.row_count
    }

    pub fn find(&self, id: ElementId) -> Option<&TimelineElement> {
        self.elements.iter().find(|el| el.id == id)
    }

    pub fn position(&self, id: ElementId) -> Option<usize> {
        self.elements.iter().position(|el| el.id == id)
    }

    pub fn contains(&self, id: ElementId) -> bool {
        self.position(id).is_some()
    }

    pub fn elements_on_row(&self, row: usize) -> impl Iterator<Item = &TimelineElement> {
        self.elements.iter().filter(move |el| el.row == row)
    }

    /// Swaps the element `id` for `replacements` at the same index.
    ///
    /// Returns `false` and leaves the store untouched when `id` is unknown.
    pub fn replace(&mut self, id: ElementId, replacements: Vec<TimelineElement>) -> bool {
        let Some(idx) = self.position(id) else {
            warn!("replace: element {id} not found, store unchanged");
            return false;
        };
        self.elements.splice(idx..=idx, replacements);
        self.recompute_derived_bounds();
        true
    }

    /// Appends a new element after checking id uniqueness and its row.
    pub fn insert(&mut self, element: TimelineElement) -> Result<(), TimelineError> {
        validate_element(&element)?;
        if self.contains(element.id) {
            return Err(TimelineError::DuplicateElementId { id: element.id });
        }
        if !self.is_range_free(element.row, &element.time_frame, None) {
            return Err(row_overlap(&element));
        }
        self.elements.push(element);
        self.recompute_derived_bounds();
        Ok(())
    }

    pub fn remove(&mut self, id: ElementId) -> Option<TimelineElement> {
        let idx = self.position(id)?;
        let removed = self.elements.remove(idx);
        self.recompute_derived_bounds();
        Some(removed)
    }

    /// Replaces the whole sequence, as undo/redo does. Derived values follow.
    pub fn restore(&mut self, elements: Vec<TimelineElement>) {
        self.elements = elements;
        self.recompute_derived_bounds();
    }

    pub fn recompute_derived_bounds(&mut self) {
        self.max_end = self
            .elements
            .iter()
            .map(|el| el.time_frame.end)
            .fold(0.0, f64::max);
        self.row_count = self
            .elements
            .iter()
            .map(|el| el.row + 1)
            .max()
            .unwrap_or(0);
    }

    /// True when nothing on `row` other than `exclude` overlaps `frame`.
    pub fn is_range_free(&self, row: usize, frame: &TimeFrame, exclude: Option<ElementId>) -> bool {
        !self
            .elements_on_row(row)
            .filter(|el| exclude != Some(el.id))
            .any(|el| el.time_frame.overlaps(frame))
    }

    /// Snaps `candidate_time` to the closest element start or end within
    /// `threshold_ms`. The flag reports whether a snap happened.
    pub fn snap_time(
        &self,
        candidate_time: f64,
        threshold_ms: f64,
        exclude: Option<ElementId>,
    ) -> (f64, bool) {
        if threshold_ms <= 0.0 {
            return (candidate_time.max(0.0), false);
        }

        let mut best_time = candidate_time.max(0.0);
        let mut best_dist = f64::INFINITY;

        for el in &self.elements {
            if exclude.is_some_and(|id| id == el.id) {
                continue;
            }
            for edge in [el.time_frame.start, el.time_frame.end] {
                let dist = (candidate_time - edge).abs();
                if dist <= threshold_ms && dist < best_dist {
                    best_dist = dist;
                    best_time = edge;
                }
            }
        }

        if best_dist.is_finite() {
            (best_time.max(0.0), true)
        } else {
            (candidate_time.max(0.0), false)
        }
    }
}

fn validate_element(el: &TimelineElement) -> Result<(), TimelineError> {
    let frame = el.time_frame;
    if !frame.is_valid() {
        return Err(TimelineError::InvalidTimeFrame {
            start: frame.start,
            end: frame.end,
        });
    }
    // Video and audio map timeline time onto a real stretch of the source.
    if let ElementKind::Video(media) | ElementKind::Audio(media) = &el.kind {
        let start_ok = media.source_start_time.is_finite() && media.source_start_time >= 0.0;
        let duration_ok = media.source_duration.is_finite() && media.source_duration > 0.0;
        if !(start_ok && duration_ok) {
            return Err(TimelineError::InvalidSourceSpan {
                id: el.id,
                source_start_time: media.source_start_time,
                source_duration: media.source_duration,
            });
        }
    }
    Ok(())
}

fn row_overlap(el: &TimelineElement) -> TimelineError {
    TimelineError::RowOverlap {
        row: el.row,
        start: el.time_frame.start,
        end: el.time_frame.end,
    }
}
