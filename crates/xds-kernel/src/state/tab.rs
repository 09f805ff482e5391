use std::path::Path;

use super::OpenFile;

/// Open files in first-open order, keyed by path.
#[derive(Debug, Default)]
pub struct TabRegistry {
	tabs: Vec<OpenFile>,
}

impl TabRegistry {
	/// Inserts `file` unless its path is already open. An existing tab keeps its cached content.
	pub fn open(&mut self, file: OpenFile) -> bool {
		if self.contains(&file.path) {
			return false;
		}
		self.tabs.push(file);
		true
	}

	pub fn close(&mut self, path: &Path) -> Option<OpenFile> {
		let index = self.position(path)?;
		Some(self.tabs.remove(index))
	}

	/// The only way cached content changes.
	pub fn update_content_on_save(&mut self, path: &Path, content: String) -> bool {
		let Some(tab) = self.tabs.iter_mut().find(|tab| tab.path == path) else {
			return false;
		};
		tab.content = content;
		true
	}

	pub fn get(&self, path: &Path) -> Option<&OpenFile> {
		self.tabs.iter().find(|tab| tab.path == path)
	}

	pub fn contains(&self, path: &Path) -> bool {
		self.position(path).is_some()
	}

	pub fn position(&self, path: &Path) -> Option<usize> {
		self.tabs.iter().position(|tab| tab.path == path)
	}

	pub fn first(&self) -> Option<&OpenFile> {
		self.tabs.first()
	}

	pub fn get_index(&self, index: usize) -> Option<&OpenFile> {
		self.tabs.get(index)
	}

	pub fn iter(&self) -> impl Iterator<Item = &OpenFile> {
		self.tabs.iter()
	}

	pub fn len(&self) -> usize {
		self.tabs.len()
	}

	pub fn is_empty(&self) -> bool {
		self.tabs.is_empty()
	}
}
