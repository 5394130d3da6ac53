use crate::element::ElementId;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Selection {
    selected: Vec<ElementId>,
    pub hovered: Option<ElementId>,
}

impl Selection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Without `multi` the previous selection is replaced.
    pub fn select(&mut self, id: ElementId, multi: bool) {
        if !multi {
            self.selected.clear();
        }
        if !self.selected.contains(&id) {
            self.selected.push(id);
        }
    }

    pub fn deselect(&mut self, id: ElementId) {
        self.selected.retain(|s| *s != id);
    }

    /// Drops every reference to `id`, selected or hovered.
    pub fn forget(&mut self, id: ElementId) {
        self.deselect(id);
        if self.hovered == Some(id) {
            self.hovered = None;
        }
    }

    pub fn clear(&mut self) {
        self.selected.clear();
        self.hovered = None;
    }

    pub fn is_selected(&self, id: ElementId) -> bool {
        self.selected.contains(&id)
    }

    pub fn selected(&self) -> &[ElementId] {
        &self.selected
    }

    /// The most recently selected element.
    pub fn primary(&self) -> Option<ElementId> {
        self.selected.last().copied()
    }

    pub fn is_empty(&self) -> bool {
        self.selected.is_empty()
    }
}
