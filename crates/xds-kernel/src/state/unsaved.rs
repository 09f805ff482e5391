use std::{
	collections::HashMap,
	path::{Path, PathBuf},
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BufferedEdit {
	pub content:  String,
	pub revision: u64,
}

/// Paths with edits that are not persisted yet, together with the edited text.
///
/// Revisions increase on every edit so a save completion can tell whether it still covers the
/// newest text.
#[derive(Debug, Default)]
pub struct UnsavedSet {
	edits:         HashMap<PathBuf, BufferedEdit>,
	next_revision: u64,
}

impl UnsavedSet {
	pub fn mark(&mut self, path: &Path, content: String) -> u64 {
		self.next_revision = self.next_revision.wrapping_add(1);
		let revision = self.next_revision;
		self.edits.insert(path.to_path_buf(), BufferedEdit { content, revision });
		revision
	}

	pub fn contains(&self, path: &Path) -> bool {
		self.edits.contains_key(path)
	}

	pub fn get(&self, path: &Path) -> Option<&BufferedEdit> {
		self.edits.get(path)
	}

	pub fn revision(&self, path: &Path) -> Option<u64> {
		self.edits.get(path).map(|edit| edit.revision)
	}

	pub fn discard(&mut self, path: &Path) -> Option<BufferedEdit> {
		self.edits.remove(path)
	}

	/// Removes `path` only if no edit newer than `revision` arrived.
	pub fn clear_if_revision(&mut self, path: &Path, revision: u64) -> bool {
		if self.revision(path) != Some(revision) {
			return false;
		}
		self.edits.remove(path);
		true
	}

	pub fn paths(&self) -> impl Iterator<Item = &Path> {
		self.edits.keys().map(PathBuf::as_path)
	}

	pub fn len(&self) -> usize {
		self.edits.len()
	}

	pub fn is_empty(&self) -> bool {
		self.edits.is_empty()
	}
}
