use std::path::PathBuf;

/// The four cursors of the editor. Images are tracked by path (stable
/// across re-sorts of the view), tags and suggestions by position, global
/// tags by normalized identity.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selection {
    pub image: Option<PathBuf>,
    pub tag: Option<usize>,
    pub global_tag: Option<String>,
    pub suggestion: Option<usize>,
}

impl Selection {
    pub fn clear(&mut self) {
        *self = Self::default();
    }

    pub fn clear_tag_cursors(&mut self) {
        self.tag = None;
        self.suggestion = None;
    }
}
