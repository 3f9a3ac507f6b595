//! The editing surface a presentation layer drives: the dataset index,
//! the three live views over it, and the cursor state machine.
//!
//! Navigation only ever walks view contents, never the raw index, so an
//! item hidden by a search term is also unreachable by cursor. Every
//! mutation re-validates the cursors before returning; a cursor whose
//! referent left its view is reassigned to a neighbor or cleared.

use std::path::{Path, PathBuf};

use crate::dataset::{
    normalize, DatasetIndex, GlobalTag, ImageRecord, LoadSummary, MoveDirection, SaveReport,
};
use crate::error::DatasetError;
use crate::live_view::LiveView;
use crate::selection::Selection;

/// What the image view knows about an image: enough to key, display and
/// search it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageEntry {
    pub path: PathBuf,
    pub name: String,
}

fn image_view() -> LiveView<ImageEntry, PathBuf> {
    LiveView::new(
        |entry: &ImageEntry| entry.path.clone(),
        |entry: &ImageEntry| entry.name.clone(),
        |a: &ImageEntry, b: &ImageEntry| a.name.cmp(&b.name).then_with(|| a.path.cmp(&b.path)),
    )
}

// Count-heavy tags first, ties alphabetical, key as the final breaker.
fn global_tag_view() -> LiveView<GlobalTag, String> {
    LiveView::new(
        |tag: &GlobalTag| tag.key.clone(),
        |tag: &GlobalTag| tag.text.clone(),
        |a: &GlobalTag, b: &GlobalTag| {
            b.count
                .cmp(&a.count)
                .then_with(|| a.text.cmp(&b.text))
                .then_with(|| a.key.cmp(&b.key))
        },
    )
}

pub struct TagEditor {
    index: DatasetIndex,
    image_view: LiveView<ImageEntry, PathBuf>,
    global_view: LiveView<GlobalTag, String>,
    suggestion_view: LiveView<GlobalTag, String>,
    selection: Selection,
}

impl Default for TagEditor {
    fn default() -> Self {
        Self::new()
    }
}

impl TagEditor {
    pub fn new() -> Self {
        Self {
            index: DatasetIndex::new(),
            image_view: image_view(),
            global_view: global_tag_view(),
            suggestion_view: global_tag_view(),
            selection: Selection::default(),
        }
    }

    pub fn index(&self) -> &DatasetIndex {
        &self.index
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    pub fn visible_images(&self) -> &[ImageEntry] {
        self.image_view.items()
    }

    pub fn visible_global_tags(&self) -> &[GlobalTag] {
        self.global_view.items()
    }

    pub fn suggestions(&self) -> &[GlobalTag] {
        self.suggestion_view.items()
    }

    pub fn current_image(&self) -> Option<&ImageRecord> {
        let path = self.selection.image.as_ref()?;
        self.index
            .images()
            .iter()
            .find(|image| image.path() == path.as_path())
    }

    pub fn current_tag_text(&self) -> Option<String> {
        let image = self.current_image()?;
        image.tags().get(self.selection.tag?).cloned()
    }

    pub fn current_global_tag(&self) -> Option<&GlobalTag> {
        let key = self.selection.global_tag.as_ref()?;
        self.index.global_tag(key)
    }

    pub fn current_suggestion(&self) -> Option<&GlobalTag> {
        self.suggestion_view.get(self.selection.suggestion?)
    }

    // ---- dataset lifecycle ------------------------------------------------

    pub fn load_dataset(&mut self, root: &Path) -> Result<LoadSummary, DatasetError> {
        let summary = self.index.load(root)?;
        let images: Vec<ImageEntry> = self
            .index
            .images()
            .iter()
            .map(|image| ImageEntry {
                path: image.path().to_path_buf(),
                name: image.name().to_string(),
            })
            .collect();
        self.image_view.rebuild(images);
        self.sync_views_from_aggregate();
        self.selection.clear();
        self.selection.image = self.image_view.get(0).map(|entry| entry.path.clone());
        self.enter_tag_edit();
        Ok(summary)
    }

    pub fn close(&mut self) -> Result<(), DatasetError> {
        self.index.close()?;
        self.image_view.rebuild(Vec::new());
        self.sync_views_from_aggregate();
        self.selection.clear();
        Ok(())
    }

    pub fn save_all(&mut self) -> Result<SaveReport, DatasetError> {
        self.index.save_all()
    }

    // ---- search -----------------------------------------------------------

    pub fn set_image_search(&mut self, term: &str) {
        self.image_view.set_search_term(term);
        self.revalidate();
    }

    pub fn set_global_tag_search(&mut self, term: &str) {
        self.global_view.set_search_term(term);
        self.revalidate();
    }

    // ---- image navigation -------------------------------------------------

    /// Wraps at both ends; with nothing selected yet, picks the first
    /// visible image.
    pub fn select_next_image(&mut self) {
        self.step_image(1);
    }

    pub fn select_previous_image(&mut self) {
        self.step_image(-1);
    }

    pub fn select_image(&mut self, path: &Path) -> bool {
        let key = path.to_path_buf();
        if !self.image_view.contains(&key) {
            return false;
        }
        self.selection.image = Some(key);
        self.selection.clear_tag_cursors();
        self.suggestion_view.set_search_term("");
        true
    }

    fn step_image(&mut self, step: isize) {
        let len = self.image_view.len();
        if len == 0 {
            self.selection.image = None;
            self.selection.clear_tag_cursors();
            return;
        }
        let next = match self.current_image_pos() {
            Some(pos) => (pos as isize + step).rem_euclid(len as isize) as usize,
            None => 0,
        };
        self.set_current_image_by_pos(next);
    }

    fn current_image_pos(&self) -> Option<usize> {
        self.image_view.position_of(self.selection.image.as_ref()?)
    }

    fn current_image_idx(&self) -> Option<usize> {
        let path = self.selection.image.as_ref()?;
        self.index
            .images()
            .iter()
            .position(|image| image.path() == path.as_path())
    }

    fn set_current_image_by_pos(&mut self, pos: usize) {
        self.selection.image = self.image_view.get(pos).map(|entry| entry.path.clone());
        self.selection.clear_tag_cursors();
        self.suggestion_view.set_search_term("");
    }

    // ---- tag editing ------------------------------------------------------

    /// Jump the tag cursor to the current image's first tag and re-term
    /// the suggestion view from it.
    pub fn enter_tag_edit(&mut self) {
        let has_tags = self
            .current_image()
            .map(|image| !image.tags().is_empty())
            .unwrap_or(false);
        self.selection.tag = if has_tags { Some(0) } else { None };
        self.selection.suggestion = None;
        self.refresh_suggestions();
    }

    pub fn select_tag(&mut self, tag_idx: usize) -> bool {
        if tag_idx >= self.current_tag_count() {
            return false;
        }
        self.selection.tag = Some(tag_idx);
        self.refresh_suggestions();
        true
    }

    /// While suggestions are open the cursor browses them first (without
    /// touching the tag); only past their end does it move to the next
    /// sibling tag, wrapping at the list ends.
    pub fn select_next_tag(&mut self) {
        if self.selection.tag.is_none() {
            self.enter_tag_edit();
            return;
        }
        if !self.suggestion_view.is_empty() {
            match self.selection.suggestion {
                None => {
                    self.selection.suggestion = Some(0);
                    return;
                }
                Some(pos) if pos + 1 < self.suggestion_view.len() => {
                    self.selection.suggestion = Some(pos + 1);
                    return;
                }
                Some(_) => {} // exhausted, fall through to the tag list
            }
        }
        self.step_tag(1);
    }

    pub fn select_previous_tag(&mut self) {
        if self.selection.tag.is_none() {
            self.enter_tag_edit();
            return;
        }
        if !self.suggestion_view.is_empty() {
            match self.selection.suggestion {
                None => {
                    self.selection.suggestion = Some(self.suggestion_view.len() - 1);
                    return;
                }
                Some(pos) if pos > 0 => {
                    self.selection.suggestion = Some(pos - 1);
                    return;
                }
                Some(_) => {}
            }
        }
        self.step_tag(-1);
    }

    fn step_tag(&mut self, step: isize) {
        let len = self.current_tag_count();
        if len == 0 {
            self.selection.clear_tag_cursors();
            return;
        }
        let next = match self.selection.tag {
            Some(pos) => (pos as isize + step).rem_euclid(len as isize) as usize,
            None => 0,
        };
        self.selection.tag = Some(next);
        self.refresh_suggestions();
    }

    /// Append a blank tag for the user to type into and select it. At
    /// most one blank row may be in flight per image.
    pub fn add_tag(&mut self) -> bool {
        let Some(image_idx) = self.current_image_idx() else {
            return false;
        };
        if !self.index.add_tag(image_idx, "") {
            return false;
        }
        let count = self.index.image(image_idx).map(|image| image.tags().len());
        self.selection.tag = count.and_then(|count| count.checked_sub(1));
        self.refresh_suggestions();
        true
    }

    /// Remove the selected tag; the cursor lands on the tag now holding
    /// the same position, else the new last tag, else nothing.
    pub fn remove_tag(&mut self) -> Option<String> {
        let image_idx = self.current_image_idx()?;
        let tag_idx = self.selection.tag?;
        let removed = self.index.remove_tag(image_idx, tag_idx)?;
        self.sync_tag_key(&normalize(&removed));
        let remaining = self.current_tag_count();
        self.selection.tag = if remaining == 0 {
            None
        } else {
            Some(tag_idx.min(remaining - 1))
        };
        self.refresh_suggestions();
        self.revalidate();
        Some(removed)
    }

    /// Overwrite the selected tag's text in place (the typing path).
    pub fn rename_current_tag(&mut self, text: &str) -> bool {
        let Some(image_idx) = self.current_image_idx() else {
            return false;
        };
        let Some(tag_idx) = self.selection.tag else {
            return false;
        };
        let Some(old) = self
            .index
            .image(image_idx)
            .and_then(|image| image.tags().get(tag_idx).cloned())
        else {
            return false;
        };
        if !self.index.rename_tag(image_idx, tag_idx, text) {
            return false;
        }
        self.sync_tag_key(&normalize(&old));
        self.sync_tag_key(&normalize(text));
        self.refresh_suggestions();
        self.revalidate();
        true
    }

    pub fn move_tag_up(&mut self) -> bool {
        self.shift_tag(MoveDirection::Up)
    }

    pub fn move_tag_down(&mut self) -> bool {
        self.shift_tag(MoveDirection::Down)
    }

    fn shift_tag(&mut self, direction: MoveDirection) -> bool {
        let Some(image_idx) = self.current_image_idx() else {
            return false;
        };
        let Some(tag_idx) = self.selection.tag else {
            return false;
        };
        if !self.index.move_tag(image_idx, tag_idx, direction) {
            return false;
        }
        self.selection.tag = Some(match direction {
            MoveDirection::Up => tag_idx - 1,
            MoveDirection::Down => tag_idx + 1,
        });
        true
    }

    // ---- global tags ------------------------------------------------------

    pub fn select_global_tag(&mut self, text: &str) -> bool {
        let key = normalize(text);
        if !self.global_view.contains(&key) {
            return false;
        }
        self.selection.global_tag = Some(key);
        true
    }

    pub fn select_next_global_tag(&mut self) {
        self.step_global_tag(1);
    }

    pub fn select_previous_global_tag(&mut self) {
        self.step_global_tag(-1);
    }

    fn step_global_tag(&mut self, step: isize) {
        let len = self.global_view.len();
        if len == 0 {
            self.selection.global_tag = None;
            return;
        }
        let current = self
            .selection
            .global_tag
            .as_ref()
            .and_then(|key| self.global_view.position_of(key));
        let next = match current {
            Some(pos) => (pos as isize + step).rem_euclid(len as isize) as usize,
            None => 0,
        };
        self.selection.global_tag = self.global_view.get(next).map(|tag| tag.key.clone());
    }

    /// Walk the visible images carrying the current global tag, wrapping
    /// within that subset. No-op while the subset is empty.
    pub fn select_next_image_with_global_tag(&mut self) {
        self.step_image_with_global_tag(1);
    }

    pub fn select_previous_image_with_global_tag(&mut self) {
        self.step_image_with_global_tag(-1);
    }

    fn step_image_with_global_tag(&mut self, step: isize) {
        let Some(key) = self.selection.global_tag.clone() else {
            return;
        };
        let positions: Vec<usize> = self
            .image_view
            .items()
            .iter()
            .enumerate()
            .filter(|(_, entry)| {
                self.record_for_path(&entry.path)
                    .map(|record| record.has_tag_key(&key))
                    .unwrap_or(false)
            })
            .map(|(pos, _)| pos)
            .collect();
        if positions.is_empty() {
            return;
        }
        let next = match self.current_image_pos() {
            Some(current) if step > 0 => positions
                .iter()
                .copied()
                .find(|&pos| pos > current)
                .unwrap_or(positions[0]),
            Some(current) => positions
                .iter()
                .rev()
                .copied()
                .find(|&pos| pos < current)
                .unwrap_or(*positions.last().unwrap()),
            None => positions[0],
        };
        self.set_current_image_by_pos(next);
    }

    pub fn apply_current_global_tag_to_all(&mut self) -> usize {
        let Some(text) = self.current_global_tag().map(|tag| tag.text.clone()) else {
            return 0;
        };
        let changed = self.index.apply_tag_to_all(&text);
        self.sync_views_from_aggregate();
        self.revalidate();
        changed
    }

    /// Remove the current global tag from every image. The cursor passes
    /// to the entry now occupying the deleted entry's position.
    pub fn delete_current_global_tag_from_all(&mut self) -> usize {
        let Some(key) = self.selection.global_tag.clone() else {
            return 0;
        };
        let Some(text) = self.index.global_tag(&key).map(|tag| tag.text.clone()) else {
            return 0;
        };
        let old_pos = self.global_view.position_of(&key);
        let changed = self.index.remove_tag_from_all(&text);
        self.sync_views_from_aggregate();
        if !self.global_view.contains(&key) {
            self.selection.global_tag = old_pos
                .filter(|_| !self.global_view.is_empty())
                .map(|pos| pos.min(self.global_view.len() - 1))
                .and_then(|pos| self.global_view.get(pos))
                .map(|tag| tag.key.clone());
        }
        self.revalidate();
        changed
    }

    // ---- suggestions ------------------------------------------------------

    /// Commit the browsed suggestion into the selected tag. Identical
    /// text (case-insensitively) is a no-op.
    pub fn commit_suggestion(&mut self) -> bool {
        let Some(pos) = self.selection.suggestion else {
            return false;
        };
        let Some(text) = self.suggestion_view.get(pos).map(|tag| tag.text.clone()) else {
            return false;
        };
        let Some(current) = self.current_tag_text() else {
            return false;
        };
        if normalize(&current) == normalize(&text) {
            return false;
        }
        let Some(image_idx) = self.current_image_idx() else {
            return false;
        };
        let Some(tag_idx) = self.selection.tag else {
            return false;
        };
        if !self.index.rename_tag(image_idx, tag_idx, &text) {
            return false;
        }
        // recount rather than trusting the incremental path across a commit
        self.index.rebuild_aggregate();
        self.sync_views_from_aggregate();
        self.refresh_suggestions();
        self.revalidate();
        true
    }

    // ---- internals --------------------------------------------------------

    fn current_tag_count(&self) -> usize {
        self.current_image()
            .map(|image| image.tags().len())
            .unwrap_or(0)
    }

    fn record_for_path(&self, path: &Path) -> Option<&ImageRecord> {
        self.index
            .images()
            .iter()
            .find(|image| image.path() == path)
    }

    fn refresh_suggestions(&mut self) {
        let term = self.current_tag_text().unwrap_or_default();
        self.suggestion_view.set_search_term(&term);
        self.selection.suggestion = None;
    }

    fn sync_tag_key(&mut self, key: &str) {
        match self.index.global_tag(key).cloned() {
            Some(tag) => {
                self.global_view.insert_or_update(tag.clone());
                self.suggestion_view.insert_or_update(tag);
            }
            None => {
                let key = key.to_string();
                self.global_view.remove(&key);
                self.suggestion_view.remove(&key);
            }
        }
    }

    fn sync_views_from_aggregate(&mut self) {
        let tags: Vec<GlobalTag> = self.index.global_tags().cloned().collect();
        self.global_view.rebuild(tags.clone());
        self.suggestion_view.rebuild(tags);
    }

    /// Bring every cursor back onto something its view still shows.
    fn revalidate(&mut self) {
        if let Some(path) = self.selection.image.clone() {
            if !self.image_view.contains(&path) {
                self.selection.image = self.image_view.get(0).map(|entry| entry.path.clone());
                self.selection.clear_tag_cursors();
                self.refresh_suggestions();
            }
        }
        if let Some(pos) = self.selection.tag {
            let count = self.current_tag_count();
            if pos >= count {
                self.selection.tag = count.checked_sub(1);
            }
        }
        if let Some(key) = self.selection.global_tag.clone() {
            if !self.global_view.contains(&key) {
                self.selection.global_tag = None;
            }
        }
        if let Some(pos) = self.selection.suggestion {
            if pos >= self.suggestion_view.len() {
                self.selection.suggestion = self.suggestion_view.len().checked_sub(1);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn fixture() -> (TempDir, TagEditor) {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("img1.png"), b"").unwrap();
        fs::write(dir.path().join("img1.txt"), "cat, outdoor").unwrap();
        fs::write(dir.path().join("img2.png"), b"").unwrap();
        fs::write(dir.path().join("img2.txt"), "cat").unwrap();
        fs::write(dir.path().join("img3.png"), b"").unwrap();

        let mut editor = TagEditor::new();
        editor.load_dataset(dir.path()).unwrap();
        (dir, editor)
    }

    fn current_name(editor: &TagEditor) -> String {
        editor.current_image().unwrap().name().to_string()
    }

    #[test]
    fn load_selects_first_image_and_its_first_tag() {
        let (_dir, editor) = fixture();
        assert_eq!(current_name(&editor), "img1.png");
        assert_eq!(editor.selection().tag, Some(0));
        assert_eq!(editor.current_tag_text().as_deref(), Some("cat"));
        // suggestions already termed by the selected tag
        assert_eq!(editor.suggestions().len(), 1);
        assert_eq!(editor.suggestions()[0].key, "cat");
    }

    #[test]
    fn next_and_previous_image_wrap() {
        let (_dir, mut editor) = fixture();
        editor.select_next_image();
        assert_eq!(current_name(&editor), "img2.png");
        editor.select_next_image();
        editor.select_next_image();
        assert_eq!(current_name(&editor), "img1.png"); // wrapped forward
        editor.select_previous_image();
        assert_eq!(current_name(&editor), "img3.png"); // wrapped backward
    }

    #[test]
    fn image_search_filters_navigation_and_revalidates_cursor() {
        let (_dir, mut editor) = fixture();
        editor.set_image_search("img2");
        assert_eq!(editor.visible_images().len(), 1);
        assert_eq!(current_name(&editor), "img2.png");
        // the only visible image wraps onto itself
        editor.select_next_image();
        assert_eq!(current_name(&editor), "img2.png");

        editor.set_image_search("nothing matches this");
        assert!(editor.current_image().is_none());
        assert!(editor.selection().tag.is_none());

        editor.set_image_search("");
        editor.select_next_image();
        assert_eq!(current_name(&editor), "img1.png");
    }

    #[test]
    fn global_tag_view_orders_count_desc_then_text() {
        let (_dir, editor) = fixture();
        let texts: Vec<_> = editor
            .visible_global_tags()
            .iter()
            .map(|tag| (tag.text.as_str(), tag.count))
            .collect();
        assert_eq!(texts, vec![("cat", 2), ("outdoor", 1)]);
    }

    #[test]
    fn remove_selected_tag_reselects_same_slot_then_last_then_none() {
        let (_dir, mut editor) = fixture();
        assert_eq!(editor.remove_tag().as_deref(), Some("cat"));
        assert_eq!(editor.selection().tag, Some(0));
        assert_eq!(editor.current_tag_text().as_deref(), Some("outdoor"));
        assert_eq!(editor.remove_tag().as_deref(), Some("outdoor"));
        assert!(editor.selection().tag.is_none());
        assert!(editor.remove_tag().is_none());
    }

    #[test]
    fn removing_last_tag_reselects_new_last() {
        let (_dir, mut editor) = fixture();
        editor.select_tag(1); // "outdoor"
        assert_eq!(editor.remove_tag().as_deref(), Some("outdoor"));
        assert_eq!(editor.selection().tag, Some(0));
        assert_eq!(editor.current_tag_text().as_deref(), Some("cat"));
    }

    #[test]
    fn add_tag_appends_single_blank_and_selects_it() {
        let (_dir, mut editor) = fixture();
        assert!(editor.add_tag());
        assert_eq!(editor.selection().tag, Some(2));
        assert_eq!(editor.current_tag_text().as_deref(), Some(""));
        // a blank termed suggestion view shows the whole tag set
        assert_eq!(editor.suggestions().len(), 2);
        assert!(!editor.add_tag());

        assert!(editor.rename_current_tag("beach"));
        assert_eq!(editor.index().global_tag("beach").map(|tag| tag.count), Some(1));
    }

    #[test]
    fn move_tag_keeps_the_moved_tag_selected() {
        let (_dir, mut editor) = fixture();
        assert!(editor.move_tag_down());
        assert_eq!(editor.selection().tag, Some(1));
        assert_eq!(editor.current_tag_text().as_deref(), Some("cat"));
        assert!(!editor.move_tag_down()); // boundary
        assert_eq!(editor.selection().tag, Some(1));
        assert!(editor.move_tag_up());
        assert_eq!(editor.selection().tag, Some(0));
    }

    #[test]
    fn tag_navigation_browses_suggestions_before_siblings() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("a.png"), b"").unwrap();
        fs::write(dir.path().join("a.txt"), "cat, outdoor").unwrap();
        fs::write(dir.path().join("b.png"), b"").unwrap();
        fs::write(dir.path().join("b.txt"), "cat, catfish").unwrap();

        let mut editor = TagEditor::new();
        editor.load_dataset(dir.path()).unwrap();
        // current: a.png, tag "cat" -> suggestions [cat(2), catfish(1)]
        assert_eq!(editor.suggestions().len(), 2);

        editor.select_next_tag();
        assert_eq!(editor.selection().suggestion, Some(0));
        assert_eq!(editor.selection().tag, Some(0)); // browsing does not move the tag
        editor.select_next_tag();
        assert_eq!(editor.selection().suggestion, Some(1));
        // suggestions exhausted: fall through to the sibling tag
        editor.select_next_tag();
        assert_eq!(editor.selection().tag, Some(1));
        assert!(editor.selection().suggestion.is_none());
        assert_eq!(editor.current_tag_text().as_deref(), Some("outdoor"));
    }

    #[test]
    fn commit_suggestion_rewrites_tag_and_recounts() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("a.png"), b"").unwrap();
        fs::write(dir.path().join("a.txt"), "cat").unwrap();
        fs::write(dir.path().join("b.png"), b"").unwrap();
        fs::write(dir.path().join("b.txt"), "catfish").unwrap();

        let mut editor = TagEditor::new();
        editor.load_dataset(dir.path()).unwrap();
        // tag "cat" suggests [cat(1), catfish(1)] (alphabetical tie-break)
        editor.select_next_tag();
        assert_eq!(editor.current_suggestion().unwrap().text, "cat");
        // committing the identical text is a no-op
        assert!(!editor.commit_suggestion());

        editor.select_next_tag();
        assert_eq!(editor.current_suggestion().unwrap().text, "catfish");
        assert!(editor.commit_suggestion());
        assert_eq!(editor.current_tag_text().as_deref(), Some("catfish"));
        assert!(editor.index().global_tag("cat").is_none());
        assert_eq!(editor.index().global_tag("catfish").map(|tag| tag.count), Some(2));
    }

    #[test]
    fn image_cycle_restricted_to_global_tag_subset() {
        let (_dir, mut editor) = fixture();
        assert!(editor.select_global_tag("cat"));
        editor.select_next_image_with_global_tag();
        assert_eq!(current_name(&editor), "img2.png");
        editor.select_next_image_with_global_tag();
        assert_eq!(current_name(&editor), "img1.png"); // wrapped inside the subset
        editor.select_previous_image_with_global_tag();
        assert_eq!(current_name(&editor), "img2.png");
    }

    #[test]
    fn subset_cycle_without_selection_is_a_noop() {
        let (_dir, mut editor) = fixture();
        editor.select_next_image_with_global_tag();
        assert_eq!(current_name(&editor), "img1.png");
    }

    #[test]
    fn apply_and_delete_current_global_tag() {
        let (_dir, mut editor) = fixture();
        assert!(editor.select_global_tag("cat"));
        assert_eq!(editor.apply_current_global_tag_to_all(), 1);
        assert_eq!(editor.index().global_tag("cat").map(|tag| tag.count), Some(3));

        assert_eq!(editor.delete_current_global_tag_from_all(), 3);
        assert!(editor.index().global_tag("cat").is_none());
        // cursor passed to the neighbor now in the deleted entry's place
        assert_eq!(editor.selection().global_tag.as_deref(), Some("outdoor"));
    }

    #[test]
    fn global_tag_search_clears_hidden_selection() {
        let (_dir, mut editor) = fixture();
        assert!(editor.select_global_tag("cat"));
        editor.set_global_tag_search("out");
        assert_eq!(editor.visible_global_tags().len(), 1);
        assert!(editor.selection().global_tag.is_none());
        // a hidden tag is also not selectable
        assert!(!editor.select_global_tag("cat"));
    }

    #[test]
    fn global_tag_cursor_wraps() {
        let (_dir, mut editor) = fixture();
        editor.select_next_global_tag();
        assert_eq!(editor.current_global_tag().unwrap().text, "cat");
        editor.select_next_global_tag();
        assert_eq!(editor.current_global_tag().unwrap().text, "outdoor");
        editor.select_next_global_tag();
        assert_eq!(editor.current_global_tag().unwrap().text, "cat");
        editor.select_previous_global_tag();
        assert_eq!(editor.current_global_tag().unwrap().text, "outdoor");
    }

    #[test]
    fn close_clears_views_and_selection() {
        let (_dir, mut editor) = fixture();
        editor.close().unwrap();
        assert!(editor.visible_images().is_empty());
        assert!(editor.visible_global_tags().is_empty());
        assert_eq!(*editor.selection(), Selection::default());
    }
}
