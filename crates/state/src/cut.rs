//! Splitting one timeline element into two adjacent clips.
//!
//! The first clip keeps the original id and covers `[start, cut_time)`, the
//! second gets a fresh id and covers `[cut_time, end)`. Per-kind properties
//! are rebuilt for each clip so the two never share nested data:
//!
//! - **Video**: the source span is divided in proportion to the cut position.
//! - **Audio**: the source offset advances by the cut position one-to-one.
//! - **Image**: both clips show the same still, properties are duplicated.
//! - **Text**: words go to the side they fall on; a word spanning the cut is
//!   dropped from both clips. Text without word timings is kept on both.

use log::{debug, warn};

use crate::element::{
    ElementId, ElementKind, MediaProperties, TextProperties, TimeFrame, TimelineElement, Word,
};
use crate::error::TimelineError;
use crate::selection::Selection;
use crate::store::ElementStore;

/// Ids of the two clips produced by a successful cut.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CutOutcome {
    pub first: ElementId,
    pub second: ElementId,
}

/// Cuts `element_id` at `cut_time` (timeline ms).
///
/// On error nothing is modified. On success the original element is replaced
/// by both clips in a single splice, selection entries for the old id are
/// dropped and the store's derived bounds are recomputed.
pub fn cut(
    store: &mut ElementStore,
    selection: &mut Selection,
    element_id: ElementId,
    cut_time: f64,
) -> Result<CutOutcome, TimelineError> {
    let original = store
        .find(element_id)
        .ok_or(TimelineError::ElementNotFound { id: element_id })
        .inspect_err(|e| warn!("cut rejected: {e}"))?;

    let (first, second) = split_element(original, cut_time, ElementId::new())
        .inspect_err(|e| warn!("cut rejected: {e}"))?;
    let outcome = CutOutcome {
        first: first.id,
        second: second.id,
    };

    let replaced = store.replace(element_id, vec![first, second]);
    debug_assert!(replaced, "element {element_id} vanished between find and replace");
    selection.forget(element_id);

    debug!(
        "cut {element_id} at {cut_time}ms -> {} + {}",
        outcome.first, outcome.second
    );
    Ok(outcome)
}

/// Builds the two clips for a cut without touching any store.
pub fn split_element(
    original: &TimelineElement,
    cut_time: f64,
    second_id: ElementId,
) -> Result<(TimelineElement, TimelineElement), TimelineError> {
    let frame = original.time_frame;
    if !cut_time.is_finite() || !frame.contains_strictly(cut_time) {
        return Err(TimelineError::CutTimeOutOfRange {
            id: original.id,
            cut_time,
            start: frame.start,
            end: frame.end,
        });
    }

    let cut_position = cut_time - frame.start;
    let (first_kind, second_kind) =
        split_kind(&original.kind, cut_time, cut_position, frame.duration());

    let first = TimelineElement {
        id: original.id,
        name: original.name.clone(),
        kind: first_kind,
        time_frame: TimeFrame::new(frame.start, cut_time),
        row: original.row,
    };
    let second = TimelineElement {
        id: second_id,
        name: original.name.clone(),
        kind: second_kind,
        time_frame: TimeFrame::new(cut_time, frame.end),
        row: original.row,
    };
    Ok((first, second))
}

fn split_kind(
    kind: &ElementKind,
    cut_time: f64,
    cut_position: f64,
    element_duration: f64,
) -> (ElementKind, ElementKind) {
    match kind {
        ElementKind::Video(media) => {
            let consumed = cut_position / element_duration * media.source_duration;
            let (a, b) = split_media(media, media.source_start_time + consumed);
            (ElementKind::Video(a), ElementKind::Video(b))
        }
        // Audio plays back at 1:1, so source time advances with timeline time.
        ElementKind::Audio(media) => {
            let (a, b) = split_media(media, media.source_start_time + cut_position);
            (ElementKind::Audio(a), ElementKind::Audio(b))
        }
        ElementKind::Image(media) => (
            ElementKind::Image(media.clone()),
            ElementKind::Image(media.clone()),
        ),
        ElementKind::Text(text) if text.words.is_empty() => {
            (ElementKind::Text(text.clone()), ElementKind::Text(text.clone()))
        }
        ElementKind::Text(text) => {
            let (a, b) = split_words(&text.words, cut_time, cut_position);
            (
                ElementKind::Text(TextProperties::from_words(a)),
                ElementKind::Text(TextProperties::from_words(b)),
            )
        }
    }
}

fn split_media(
    media: &MediaProperties,
    source_time_at_cut: f64,
) -> (MediaProperties, MediaProperties) {
    let first = MediaProperties::new(
        media.src.clone(),
        media.source_start_time,
        source_time_at_cut - media.source_start_time,
    );
    let second = MediaProperties::new(
        media.src.clone(),
        source_time_at_cut,
        media.source_end_time() - source_time_at_cut,
    );
    (first, second)
}

fn split_words(words: &[Word], cut_time: f64, cut_position: f64) -> (Vec<Word>, Vec<Word>) {
    let mut before = Vec::new();
    let mut after = Vec::new();
    for word in words {
        if word.end <= cut_time {
            before.push(word.clone());
        } else if word.start >= cut_time {
            after.push(Word::new(
                word.text.clone(),
                word.start - cut_position,
                word.end - cut_position,
            ));
        }
    }
    (before, after)
}
