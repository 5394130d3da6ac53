use std::path::PathBuf;

use log::{debug, info};

use crate::config::EditorConfig;
use crate::cut::{self, CutOutcome};
use crate::element::{ElementId, ElementType, TimeFrame, TimelineElement};
use crate::error::{ConfigError, TimelineError};
use crate::ghost::{GhostDrag, GhostDrop, GhostSnapshot};
use crate::selection::Selection;
use crate::store::ElementStore;
use crate::undo::{Snapshot, UndoManager};
use crate::zoom::ZoomManager;

/// One editing session: the element store plus everything that reads or
/// writes it. `F` is the handle type of files dragged onto the timeline.
///
/// Each editor is independent; nothing here is process-global.
#[derive(Debug)]
pub struct Editor<F = PathBuf> {
    store: ElementStore,
    undo: UndoManager,
    ghost: GhostDrag<F>,
    pub selection: Selection,
    pub zoom: ZoomManager,
    config: EditorConfig,
}

impl<F> Default for Editor<F> {
    fn default() -> Self {
        Self {
            store: ElementStore::new(),
            undo: UndoManager::new(),
            ghost: GhostDrag::new(),
            selection: Selection::new(),
            zoom: ZoomManager::default(),
            config: EditorConfig::default(),
        }
    }
}

impl<F> Editor<F> {
    /// Fails on a config that [`EditorConfig::validate`] rejects.
    pub fn new(config: EditorConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            zoom: ZoomManager::new(config.zoom.clone())?,
            config,
            ..Self::default()
        })
    }

    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    pub fn store(&self) -> &ElementStore {
        &self.store
    }

    pub fn elements(&self) -> &[TimelineElement] {
        self.store.elements()
    }

    /// Replaces the timeline with `elements`. History and selection restart.
    pub fn load(&mut self, elements: Vec<TimelineElement>) -> Result<(), TimelineError> {
        self.store = ElementStore::from_elements(elements)?;
        self.undo.clear();
        self.selection.clear();
        Ok(())
    }

    pub fn cut(&mut self, id: ElementId, cut_time: f64) -> Result<CutOutcome, TimelineError> {
        let before = self.snapshot();
        let outcome = cut::cut(&mut self.store, &mut self.selection, id, cut_time)?;
        self.undo.save("cut", before);
        Ok(outcome)
    }

    /// Cuts every selected element the playhead passes through.
    pub fn cut_selected_at(&mut self, cut_time: f64) -> Vec<CutOutcome> {
        let targets: Vec<ElementId> = self
            .selection
            .selected()
            .iter()
            .copied()
            .filter(|id| {
                self.store
                    .find(*id)
                    .is_some_and(|el| el.time_frame.contains_strictly(cut_time))
            })
            .collect();
        if targets.is_empty() {
            return Vec::new();
        }

        let before = self.snapshot();
        let outcomes: Vec<CutOutcome> = targets
            .into_iter()
            .filter_map(|id| cut::cut(&mut self.store, &mut self.selection, id, cut_time).ok())
            .collect();
        self.undo.save("cut", before);
        outcomes
    }

    pub fn can_undo(&self) -> bool {
        self.undo.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.undo.can_redo()
    }

    pub fn undo_label(&self) -> Option<&'static str> {
        self.undo.undo_label()
    }

    pub fn redo_label(&self) -> Option<&'static str> {
        self.undo.redo_label()
    }

    /// Steps back one edit, restoring elements and selection together.
    pub fn undo(&mut self) -> bool {
        let label = self.undo.undo_label();
        let current = self.snapshot();
        let Some(previous) = self.undo.undo(current) else {
            return false;
        };
        self.apply(previous);
        debug!("undo {}", label.unwrap_or("edit"));
        true
    }

    pub fn redo(&mut self) -> bool {
        let label = self.undo.redo_label();
        let current = self.snapshot();
        let Some(next) = self.undo.redo(current) else {
            return false;
        };
        self.apply(next);
        debug!("redo {}", label.unwrap_or("edit"));
        true
    }

    fn snapshot(&self) -> Snapshot {
        Snapshot {
            elements: self.store.elements().to_vec(),
            selection: self.selection.clone(),
        }
    }

    fn apply(&mut self, snapshot: Snapshot) {
        self.store.restore(snapshot.elements);
        self.selection = snapshot.selection;
    }

    pub fn ghost(&self) -> &GhostDrag<F> {
        &self.ghost
    }

    pub fn ghost_snapshot(&self) -> GhostSnapshot {
        self.ghost.snapshot()
    }

    /// Starts a ghost for `file`. `probed_duration` comes from media probing
    /// and falls back to the configured default for the type.
    pub fn begin_file_drag(
        &mut self,
        file: F,
        element_type: ElementType,
        probed_duration: Option<f64>,
    ) -> Result<(), TimelineError> {
        let duration = probed_duration
            .filter(|d| d.is_finite() && *d > 0.0)
            .unwrap_or_else(|| self.config.drag.default_duration(element_type));
        self.ghost.start_drag(file, element_type, duration)
    }

    /// Moves the ghost to the pointer, snapping to nearby element edges and
    /// flagging rows where it would overlap an existing element.
    pub fn drag_over(
        &mut self,
        pointer_ms: f64,
        row: usize,
    ) -> Result<GhostSnapshot, TimelineError> {
        let Some(duration) = self.ghost.active().map(|drag| drag.candidate.duration) else {
            self.ghost.update_position(pointer_ms, row, false)?;
            return Ok(self.ghost.snapshot());
        };
        let position = self.snap_position(pointer_ms);
        let frame = TimeFrame::new(position, position + duration);
        let incompatible = !self.store.is_range_free(row, &frame, None);
        self.ghost.update_position(position, row, incompatible)?;
        Ok(self.ghost.snapshot())
    }

    /// Drops the ghost and inserts the element built by `build`, which
    /// receives the final placement. The ghost is idle afterwards even when
    /// the insert is rejected.
    pub fn drop_file(
        &mut self,
        pointer_ms: f64,
        row: usize,
        build: impl FnOnce(&GhostDrop<F>) -> TimelineElement,
    ) -> Result<ElementId, TimelineError> {
        let position = self.snap_position(pointer_ms);
        let store = &mut self.store;
        let undo = &mut self.undo;
        let selection = &self.selection;
        self.ghost
            .finish_drag(position, row, |placement| -> Result<ElementId, TimelineError> {
                let mut element = build(&placement);
                element.time_frame = placement.time_frame();
                element.row = placement.row;
                let id = element.id;
                let before = Snapshot {
                    elements: store.elements().to_vec(),
                    selection: selection.clone(),
                };
                store.insert(element)?;
                undo.save("drop", before);
                info!(
                    "Dropped {} element {id} on row {}",
                    placement.element_type.label(),
                    placement.row
                );
                Ok(id)
            })?
    }

    pub fn cancel_file_drag(&mut self) -> bool {
        self.ghost.cancel_drag()
    }

    fn snap_position(&self, pointer_ms: f64) -> f64 {
        let threshold_ms = self.zoom.px_to_time(self.config.drag.snap_threshold_px);
        let (time, snapped) = self.store.snap_time(pointer_ms, threshold_ms, None);
        if snapped {
            debug!("snapped {pointer_ms}ms -> {time}ms");
        }
        time
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::element::Word;

    fn editor_with(elements: Vec<TimelineElement>) -> Editor<&'static str> {
        let mut editor = Editor::default();
        editor.load(elements).unwrap();
        editor
    }

    #[test]
    fn cut_then_undo_restores_sequence() {
        let el = TimelineElement::video("v.mp4", TimeFrame::new(0.0, 10_000.0), 0);
        let mut editor = editor_with(vec![el.clone()]);
        let original = editor.elements().to_vec();

        editor.cut(el.id, 4000.0).unwrap();
        assert_eq!(editor.elements().len(), 2);
        assert!(editor.undo());
        assert_eq!(editor.elements(), original.as_slice());
        assert!(editor.redo());
        assert_eq!(editor.elements().len(), 2);
    }

    #[test]
    fn undo_restores_selection_of_cut_element() {
        let el = TimelineElement::video("v.mp4", TimeFrame::new(0.0, 10_000.0), 0);
        let mut editor = editor_with(vec![el.clone()]);
        editor.selection.select(el.id, false);

        let out = editor.cut(el.id, 4000.0).unwrap();
        assert!(editor.selection.is_empty());
        assert_eq!(editor.undo_label(), Some("cut"));

        assert!(editor.undo());
        assert!(editor.selection.is_selected(el.id));
        assert_eq!(editor.redo_label(), Some("cut"));
        assert!(editor.redo());
        assert!(!editor.selection.is_selected(el.id));
        assert!(editor.store().contains(out.second));
    }

    #[test]
    fn new_rejects_invalid_config() {
        let mut config = EditorConfig::default();
        config.zoom.min = 5.0;
        config.zoom.max = 2.0;
        assert!(matches!(
            Editor::<&str>::new(config),
            Err(ConfigError::InvalidZoomBounds { .. })
        ));

        let mut config = EditorConfig::default();
        config.drag.default_image_duration_ms = 0.0;
        assert!(matches!(
            Editor::<&str>::new(config),
            Err(ConfigError::InvalidValue { .. })
        ));
        assert!(Editor::<&str>::new(EditorConfig::default()).is_ok());
    }

    #[test]
    fn rejected_cut_records_no_history() {
        let el = TimelineElement::image("p.png", TimeFrame::new(0.0, 1000.0), 0);
        let mut editor = editor_with(vec![el.clone()]);
        assert!(editor.cut(el.id, 1000.0).is_err());
        assert!(!editor.can_undo());
    }

    #[test]
    fn cut_selected_only_touches_spanning_elements() {
        let a = TimelineElement::video("a.mp4", TimeFrame::new(0.0, 2000.0), 0);
        let b = TimelineElement::text(
            vec![Word::new("hi", 0.0, 500.0)],
            TimeFrame::new(0.0, 900.0),
            1,
        );
        let mut editor = editor_with(vec![a.clone(), b.clone()]);
        editor.selection.select(a.id, false);
        editor.selection.select(b.id, true);

        let outcomes = editor.cut_selected_at(1500.0);
        assert_eq!(outcomes.len(), 1);
        assert_eq!(outcomes[0].first, a.id);
        assert_eq!(editor.elements().len(), 3);
        assert!(editor.selection.is_selected(b.id));
        assert!(editor.undo());
        assert_eq!(editor.elements().len(), 2);
    }

    #[test]
    fn drag_over_snaps_and_flags_overlap() {
        let el = TimelineElement::video("v.mp4", TimeFrame::new(0.0, 2000.0), 0);
        let mut editor = editor_with(vec![el]);
        editor
            .begin_file_drag("b.png", ElementType::Image, None)
            .unwrap();

        // 10px at zoom 1 is 100ms.
        let snap = editor.drag_over(2060.0, 0).unwrap();
        let candidate = snap.candidate.unwrap();
        assert_eq!(candidate.time_frame, TimeFrame::new(2000.0, 7000.0));
        assert!(!snap.is_incompatible);

        let snap = editor.drag_over(1500.0, 0).unwrap();
        assert!(snap.is_incompatible);
        let snap = editor.drag_over(1500.0, 1).unwrap();
        assert!(!snap.is_incompatible);
    }

    #[test]
    fn drop_inserts_element_and_resets_ghost() {
        let mut editor: Editor<&str> = Editor::default();
        editor
            .begin_file_drag("clip.mp4", ElementType::Video, Some(8000.0))
            .unwrap();
        editor.drag_over(1000.0, 2).unwrap();
        let id = editor.drop_file(1000.0, 2, |d| d.to_element(d.file)).unwrap();

        let el = editor.store().find(id).unwrap();
        assert_eq!(el.time_frame, TimeFrame::new(1000.0, 9000.0));
        assert_eq!(el.row, 2);
        assert!(!editor.ghost().is_dragging());
        assert!(editor.can_undo());
    }

    #[test]
    fn overlapping_drop_is_rejected_but_ghost_resets() {
        let el = TimelineElement::audio("a.wav", TimeFrame::new(0.0, 5000.0), 0);
        let mut editor = editor_with(vec![el]);
        editor
            .begin_file_drag("b.wav", ElementType::Audio, Some(1000.0))
            .unwrap();
        let err = editor.drop_file(2500.0, 0, |d| d.to_element(d.file)).unwrap_err();
        assert!(matches!(err, TimelineError::RowOverlap { row: 0, .. }));
        assert_eq!(editor.elements().len(), 1);
        assert!(!editor.ghost().is_dragging());
        assert!(!editor.can_undo());
    }

    #[test]
    fn drag_over_while_idle_is_rejected() {
        let mut editor: Editor<&str> = Editor::default();
        assert!(matches!(
            editor.drag_over(0.0, 0),
            Err(TimelineError::InvalidStateTransition { .. })
        ));
        assert!(!editor.cancel_file_drag());
    }
}
