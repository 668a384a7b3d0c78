// THEORY:
// Labels are just integers handed out in class-folder discovery order. The
// `ClassIndex` writes that numbering down so nothing downstream has to re-derive
// it from a directory listing (which may enumerate differently next time).
// Label `i` is the `i`-th registered class name.

use crate::core_modules::pixel_buffer::pixel_buffer::Label;

/// Ordered mapping from class folder name to label.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClassIndex {
    names: Vec<String>,
}

impl ClassIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a class and returns its label. Re-registering a name returns
    /// the label it already has.
    pub fn register(&mut self, name: impl Into<String>) -> Label {
        let name = name.into();
        if let Some(label) = self.label_of(&name) {
            return label;
        }
        self.names.push(name);
        (self.names.len() - 1) as Label
    }

    pub fn label_of(&self, name: &str) -> Option<Label> {
        self.names.iter().position(|n| n == name).map(|i| i as Label)
    }

    pub fn name_of(&self, label: Label) -> Option<&str> {
        self.names.get(label as usize).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// `(label, name)` pairs in label order.
    pub fn iter(&self) -> impl Iterator<Item = (Label, &str)> {
        self.names
            .iter()
            .enumerate()
            .map(|(i, n)| (i as Label, n.as_str()))
    }
}
