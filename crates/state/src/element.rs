use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ElementId(Uuid);

impl ElementId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for ElementId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ElementId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Half-open `[start, end)` interval on the global timeline, in milliseconds.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TimeFrame {
    pub start: f64,
    pub end: f64,
}

impl TimeFrame {
    pub fn new(start: f64, end: f64) -> Self {
        Self { start, end }
    }

    pub fn duration(&self) -> f64 {
        self.end - self.start
    }

    pub fn is_valid(&self) -> bool {
        self.start.is_finite() && self.end.is_finite() && self.start < self.end
    }

    /// Strictly inside, so a cut never produces an empty clip.
    pub fn contains_strictly(&self, t: f64) -> bool {
        self.start < t && t < self.end
    }

    pub fn overlaps(&self, other: &TimeFrame) -> bool {
        self.start < other.end && other.start < self.end
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ElementType {
    Video,
    Audio,
    Image,
    Text,
}

impl ElementType {
    pub const ALL: [ElementType; 4] = [
        ElementType::Video,
        ElementType::Audio,
        ElementType::Image,
        ElementType::Text,
    ];

    pub fn label(self) -> &'static str {
        match self {
            ElementType::Video => "Video",
            ElementType::Audio => "Audio",
            ElementType::Image => "Image",
            ElementType::Text => "Text",
        }
    }

    /// Video and audio carry a time axis in their source and can be trimmed.
    pub fn is_trimmable(self) -> bool {
        matches!(self, ElementType::Video | ElementType::Audio)
    }
}

/// Offsets into the original media asset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MediaProperties {
    pub src: String,
    pub source_start_time: f64,
    pub source_duration: f64,
}

impl MediaProperties {
    pub fn new(src: impl Into<String>, source_start_time: f64, source_duration: f64) -> Self {
        Self {
            src: src.into(),
            source_start_time,
            source_duration,
        }
    }

    pub fn source_end_time(&self) -> f64 {
        self.source_start_time + self.source_duration
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Word {
    pub text: String,
    pub start: f64,
    pub end: f64,
}

impl Word {
    pub fn new(text: impl Into<String>, start: f64, end: f64) -> Self {
        Self {
            text: text.into(),
            start,
            end,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct TextProperties {
    pub text: String,
    pub words: Vec<Word>,
}

impl TextProperties {
    pub fn from_words(words: Vec<Word>) -> Self {
        let text = words
            .iter()
            .map(|w| w.text.as_str())
            .collect::<Vec<_>>()
            .join(" ");
        Self { text, words }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "properties", rename_all = "lowercase")]
pub enum ElementKind {
    Video(MediaProperties),
    Audio(MediaProperties),
    Image(MediaProperties),
    Text(TextProperties),
}

impl ElementKind {
    pub fn element_type(&self) -> ElementType {
        match self {
            ElementKind::Video(_) => ElementType::Video,
            ElementKind::Audio(_) => ElementType::Audio,
            ElementKind::Image(_) => ElementType::Image,
            ElementKind::Text(_) => ElementType::Text,
        }
    }

    pub fn media(&self) -> Option<&MediaProperties> {
        match self {
            ElementKind::Video(m) | ElementKind::Audio(m) | ElementKind::Image(m) => Some(m),
            ElementKind::Text(_) => None,
        }
    }

    pub fn text(&self) -> Option<&TextProperties> {
        match self {
            ElementKind::Text(t) => Some(t),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimelineElement {
    pub id: ElementId,
    pub name: String,
    pub kind: ElementKind,
    pub time_frame: TimeFrame,
    pub row: usize,
}

impl TimelineElement {
    pub fn new(
        name: impl Into<String>,
        kind: ElementKind,
        time_frame: TimeFrame,
        row: usize,
    ) -> Self {
        Self {
            id: ElementId::new(),
            name: name.into(),
            kind,
            time_frame,
            row,
        }
    }

    pub fn video(src: impl Into<String>, time_frame: TimeFrame, row: usize) -> Self {
        let src = src.into();
        let props = MediaProperties::new(src.clone(), 0.0, time_frame.duration());
        Self::new(src, ElementKind::Video(props), time_frame, row)
    }

    pub fn audio(src: impl Into<String>, time_frame: TimeFrame, row: usize) -> Self {
        let src = src.into();
        let props = MediaProperties::new(src.clone(), 0.0, time_frame.duration());
        Self::new(src, ElementKind::Audio(props), time_frame, row)
    }

    pub fn image(src: impl Into<String>, time_frame: TimeFrame, row: usize) -> Self {
        let src = src.into();
        let props = MediaProperties::new(src.clone(), 0.0, time_frame.duration());
        Self::new(src, ElementKind::Image(props), time_frame, row)
    }

    pub fn text(words: Vec<Word>, time_frame: TimeFrame, row: usize) -> Self {
        let props = TextProperties::from_words(words);
        let name = props.text.clone();
        Self::new(name, ElementKind::Text(props), time_frame, row)
    }

    pub fn element_type(&self) -> ElementType {
        self.kind.element_type()
    }

    pub fn duration(&self) -> f64 {
        self.time_frame.duration()
    }

    pub fn with_id(mut self, id: ElementId) -> Self {
        self.id = id;
        self
    }

    pub fn with_source(mut self, source_start_time: f64, source_duration: f64) -> Self {
        match &mut self.kind {
            ElementKind::Video(m) | ElementKind::Audio(m) | ElementKind::Image(m) => {
                m.source_start_time = source_start_time;
                m.source_duration = source_duration;
            }
            ElementKind::Text(_) => {}
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn time_frame_overlap_is_half_open() {
        let a = TimeFrame::new(0.0, 1000.0);
        let b = TimeFrame::new(1000.0, 2000.0);
        assert!(!a.overlaps(&b));
        assert!(a.overlaps(&TimeFrame::new(999.0, 1500.0)));
        assert!(!TimeFrame::new(500.0, 500.0).is_valid());
    }

    #[test]
    fn contains_strictly_excludes_bounds() {
        let frame = TimeFrame::new(100.0, 200.0);
        assert!(!frame.contains_strictly(100.0));
        assert!(!frame.contains_strictly(200.0));
        assert!(frame.contains_strictly(150.0));
    }

    #[test]
    fn element_json_uses_type_tag() {
        let el = TimelineElement::video("clip.mp4", TimeFrame::new(0.0, 4000.0), 1);
        let json = serde_json::to_value(&el).unwrap();
        assert_eq!(json["kind"]["type"], "video");
        assert_eq!(json["kind"]["properties"]["sourceDuration"], 4000.0);
        assert_eq!(json["timeFrame"]["end"], 4000.0);

        let back: TimelineElement = serde_json::from_value(json).unwrap();
        assert_eq!(back, el);
    }

    #[test]
    fn text_from_words_joins_text() {
        let props = TextProperties::from_words(vec![
            Word::new("hello", 0.0, 500.0),
            Word::new("world", 500.0, 900.0),
        ]);
        assert_eq!(props.text, "hello world");
    }
}
