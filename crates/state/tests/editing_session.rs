use std::cell::RefCell;
use std::rc::Rc;

use reelcut_state::{
    Editor, EditorConfig, ElementId, ElementStore, ElementType, GhostSnapshot, Selection,
    TimeFrame, TimelineElement, TimelineError, Word, ZoomAnchor,
};

const EPS: f64 = 1e-6;

fn sample_timeline() -> Vec<TimelineElement> {
    vec![
        TimelineElement::video("intro.mp4", TimeFrame::new(0.0, 10_000.0), 0),
        TimelineElement::audio("music.mp3", TimeFrame::new(0.0, 12_000.0), 1)
            .with_source(3000.0, 12_000.0),
        TimelineElement::text(
            vec![
                Word::new("welcome", 0.0, 1000.0),
                Word::new("to", 1000.0, 2000.0),
                Word::new("reelcut", 2500.0, 3500.0),
            ],
            TimeFrame::new(0.0, 4000.0),
            2,
        ),
        TimelineElement::image("logo.png", TimeFrame::new(10_000.0, 13_000.0), 0),
    ]
}

#[test]
fn cuts_keep_rows_contiguous() {
    let mut editor: Editor = Editor::default();
    editor.load(sample_timeline()).unwrap();
    let ids: Vec<ElementId> = editor.elements().iter().map(|e| e.id).collect();

    for (id, at) in ids.iter().zip([4000.0, 7000.0, 2200.0, 11_500.0]) {
        let original = editor.store().find(*id).unwrap().clone();
        let out = editor.cut(*id, at).unwrap();
        let first = editor.store().find(out.first).unwrap();
        let second = editor.store().find(out.second).unwrap();

        assert_eq!(first.time_frame.start, original.time_frame.start);
        assert_eq!(first.time_frame.end, at);
        assert_eq!(second.time_frame.start, at);
        assert_eq!(second.time_frame.end, original.time_frame.end);
        assert_eq!((first.row, second.row), (original.row, original.row));

        if original.element_type().is_trimmable() {
            let (a, b, o) = (
                first.kind.media().unwrap(),
                second.kind.media().unwrap(),
                original.kind.media().unwrap(),
            );
            assert!((a.source_duration + b.source_duration - o.source_duration).abs() < EPS);
            assert!((b.source_start_time - a.source_end_time()).abs() < EPS);
        }
    }

    assert_eq!(editor.elements().len(), 8);
    for row in 0..editor.store().row_count() {
        let mut frames: Vec<TimeFrame> = editor
            .store()
            .elements_on_row(row)
            .map(|e| e.time_frame)
            .collect();
        frames.sort_by(|a, b| a.start.total_cmp(&b.start));
        for pair in frames.windows(2) {
            assert!(pair[0].end <= pair[1].start);
        }
    }
    assert_eq!(editor.store().max_end(), 13_000.0);
}

#[test]
fn text_cut_matches_documented_example() {
    let mut editor: Editor = Editor::default();
    editor.load(sample_timeline()).unwrap();
    let text_id = editor.elements()[2].id;

    let out = editor.cut(text_id, 2200.0).unwrap();
    let first = editor.store().find(out.first).unwrap().kind.text().unwrap();
    let second = editor.store().find(out.second).unwrap().kind.text().unwrap();
    let spans = |words: &[Word]| words.iter().map(|w| (w.start, w.end)).collect::<Vec<_>>();
    assert_eq!(spans(&first.words), vec![(0.0, 1000.0), (1000.0, 2000.0)]);
    assert_eq!(spans(&second.words), vec![(300.0, 1300.0)]);
}

#[test]
fn rejected_cut_leaves_json_identical() {
    let mut store = ElementStore::from_elements(sample_timeline()).unwrap();
    let mut selection = Selection::new();
    let before = store.to_json().unwrap();
    let target = store.elements()[0].id;

    assert!(matches!(
        reelcut_state::cut(&mut store, &mut selection, ElementId::new(), 500.0),
        Err(TimelineError::ElementNotFound { .. })
    ));
    assert!(matches!(
        reelcut_state::cut(&mut store, &mut selection, target, 10_000.0),
        Err(TimelineError::CutTimeOutOfRange { .. })
    ));
    assert_eq!(store.to_json().unwrap(), before);
}

#[test]
fn zoom_listeners_see_committed_value_and_anchor_once() {
    let mut editor: Editor = Editor::default();
    let seen = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&seen);
    editor.zoom.subscribe(move |u| sink.borrow_mut().push(*u));

    editor.zoom.set_anchor(ZoomAnchor {
        time_ms: 2000.0,
        screen_x: 80.0,
    });
    editor.zoom.step_in();
    editor.zoom.step_in();
    editor.zoom.reset_zoom();
    editor.zoom.reset_zoom();

    let seen = seen.borrow();
    assert_eq!(seen.len(), 3);
    assert!(seen[0].anchor.is_some());
    assert!(seen[1].anchor.is_none());
    assert_eq!(seen[2].new_value, 1.0);
    assert_eq!(editor.zoom.zoom_value(), 1.0);
}

#[test]
fn file_drop_round_trip() {
    let config =
        EditorConfig::from_json(r#"{ "drag": { "default_image_duration_ms": 2000.0 } }"#).unwrap();
    let mut editor: Editor<String> = Editor::new(config).unwrap();
    editor.load(sample_timeline()).unwrap();

    editor
        .begin_file_drag("badge.png".to_string(), ElementType::Image, None)
        .unwrap();
    assert!(editor
        .begin_file_drag("other.png".to_string(), ElementType::Image, None)
        .is_err());

    let snap: GhostSnapshot = editor.drag_over(5000.0, 0).unwrap();
    assert!(snap.is_incompatible);
    let snap = editor.drag_over(13_050.0, 0).unwrap();
    assert!(!snap.is_incompatible);
    assert_eq!(snap.candidate.unwrap().time_frame, TimeFrame::new(13_000.0, 15_000.0));

    let id = editor
        .drop_file(13_050.0, 0, |d| d.to_element(d.file.clone()))
        .unwrap();
    assert_eq!(editor.store().find(id).unwrap().time_frame.end, 15_000.0);
    assert_eq!(editor.store().max_end(), 15_000.0);
    assert_eq!(
        editor.ghost_snapshot(),
        GhostSnapshot {
            is_dragging: false,
            candidate: None,
            target_row: None,
            is_incompatible: false,
        }
    );

    assert!(editor.undo());
    assert!(editor.store().find(id).is_none());
}
