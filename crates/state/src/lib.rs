//! `reelcut-state` -- the timeline model of the reelcut editor.
//!
//! - **`ElementStore`**: ordered timeline elements with derived bounds.
//! - **`cut`**: splits an element in two with per-kind property adjustment.
//! - **`ZoomManager`**: bounded zoom level, time/pixel mapping, change updates.
//! - **`GhostDrag`**: the pending placement of a file dragged onto the timeline.
//! - **`Editor`**: owns all of the above plus selection and undo history.
//!
//! Nothing here renders or decodes media; callers feed in element records and
//! read back the updated list, zoom updates and ghost snapshots.

pub mod config;
pub mod cut;
pub mod editor;
pub mod element;
pub mod error;
pub mod ghost;
pub mod selection;
pub mod store;
pub mod undo;
pub mod zoom;

pub use config::{DragConfig, EditorConfig, ZoomConfig};
pub use cut::{cut, split_element, CutOutcome};
pub use editor::Editor;
pub use element::{
    ElementId, ElementKind, ElementType, MediaProperties, TextProperties, TimeFrame,
    TimelineElement, Word,
};
pub use error::{ConfigError, TimelineError};
pub use ghost::{GhostCandidate, GhostDrag, GhostDrop, GhostSnapshot, GhostState};
pub use selection::Selection;
pub use store::ElementStore;
pub use undo::{Snapshot, UndoManager};
pub use zoom::{SubscriptionId, ZoomAnchor, ZoomChangeUpdate, ZoomManager};
