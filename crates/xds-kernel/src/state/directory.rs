use std::path::{Path, PathBuf};

use super::{DirectoryEntry, DirectoryListing};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Navigation {
	/// Open a folder as the new workspace root; forgets the stack.
	Root,
	Descend,
	Ascend,
	Refresh,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListingRequest {
	pub path:       PathBuf,
	pub navigation: Navigation,
}

/// Currently browsed directory, its listing, and the trail used by "go up".
///
/// Requests only record intent; the cursor moves when the matching listing arrives, so a failed
/// listing leaves the previous directory and entries in place.
#[derive(Debug, Default)]
pub struct DirectoryCursor {
	current: Option<PathBuf>,
	root:    Option<PathBuf>,
	stack:   Vec<PathBuf>,
	entries: Vec<DirectoryEntry>,
	pending: Option<ListingRequest>,
}

impl DirectoryCursor {
	pub fn current(&self) -> Option<&Path> {
		self.current.as_deref()
	}

	pub fn root(&self) -> Option<&Path> {
		self.root.as_deref()
	}

	pub fn entries(&self) -> &[DirectoryEntry] {
		&self.entries
	}

	pub fn stack(&self) -> &[PathBuf] {
		&self.stack
	}

	pub fn can_go_up(&self) -> bool {
		!self.stack.is_empty()
	}

	pub fn pending(&self) -> Option<&ListingRequest> {
		self.pending.as_ref()
	}

	pub fn entry_named(&self, name: &str) -> Option<&DirectoryEntry> {
		self.entries.iter().find(|entry| entry.name == name)
	}

	pub fn request_root(&mut self, path: PathBuf) -> ListingRequest {
		self.request(path, Navigation::Root)
	}

	pub fn request_enter(&mut self, path: PathBuf) -> ListingRequest {
		self.request(path, Navigation::Descend)
	}

	/// `None` when the stack is empty.
	pub fn request_up(&mut self) -> Option<ListingRequest> {
		let parent = self.stack.last()?.clone();
		Some(self.request(parent, Navigation::Ascend))
	}

	/// Re-lists the current directory unless a navigation is already in flight.
	pub fn request_refresh(&mut self) -> Option<ListingRequest> {
		if self.pending.as_ref().is_some_and(|pending| pending.navigation != Navigation::Refresh) {
			return None;
		}
		let current = self.current.clone()?;
		Some(self.request(current, Navigation::Refresh))
	}

	/// Applies a listing if it answers the outstanding request. Returns the navigation applied.
	pub fn apply_listing(&mut self, requested: &Path, listing: DirectoryListing) -> Option<Navigation> {
		let pending = self.pending.take_if(|pending| pending.path == requested)?;
		match pending.navigation {
			Navigation::Root => {
				self.stack.clear();
				self.root = Some(listing.resolved_path.clone());
			}
			Navigation::Descend => {
				if let Some(current) = self.current.take() {
					self.stack.push(current);
				}
			}
			Navigation::Ascend => {
				self.stack.pop();
			}
			Navigation::Refresh => {}
		}
		self.current = Some(listing.resolved_path);
		self.entries = listing.entries;
		Some(pending.navigation)
	}

	/// Drops the outstanding request if it targets `requested`. Returns whether it did.
	pub fn fail_listing(&mut self, requested: &Path) -> bool {
		self.pending.take_if(|pending| pending.path == requested).is_some()
	}

	fn request(&mut self, path: PathBuf, navigation: Navigation) -> ListingRequest {
		let request = ListingRequest { path, navigation };
		self.pending = Some(request.clone());
		request
	}
}
