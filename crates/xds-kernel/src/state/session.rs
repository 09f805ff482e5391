use std::{
	collections::HashMap,
	path::{Path, PathBuf},
};

use tracing::{debug, warn};

use super::{
	DeferredIntent, DirectoryCursor, FileState, InFlightSave, Intent, OpenFile, SaveOrigin, SessionState,
	StatusBarState, TabRegistry, UnsavedSet, display_name,
};
use crate::{
	error::SessionError, git::GitStatusMap, settings::AppSettings, state::AutosaveScheduler,
	terminal::TerminalState,
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SaveStart {
	/// Write `content` for `revision`; the in-flight record is already registered.
	Enqueue { content: String, revision: u64 },
	/// A save covering the newest edit is already running.
	AlreadyInFlight { revision: u64 },
	/// An older revision is still being written; `revision` is written right after it completes.
	Queued { revision: u64 },
	NothingToSave,
}

impl SessionState {
	pub fn new(settings: AppSettings) -> Self {
		Self {
			directory: DirectoryCursor::default(),
			tabs: TabRegistry::default(),
			unsaved: UnsavedSet::default(),
			active: None,
			pending_open: None,
			in_flight_saves: HashMap::new(),
			deferred_intent: None,
			prompt: None,
			alerts: Vec::new(),
			autosave: AutosaveScheduler::default(),
			git: GitStatusMap::default(),
			terminal: TerminalState::default(),
			settings,
			status_bar: StatusBarState::default(),
		}
	}

	pub fn active_file(&self) -> Option<&OpenFile> {
		self.active.as_deref().and_then(|path| self.tabs.get(path))
	}

	/// Text handed to the editor widget: the buffered edit if any, else the cached tab content.
	pub fn file_content(&self) -> &str {
		let Some(path) = self.active.as_deref() else {
			return "";
		};
		if let Some(edit) = self.unsaved.get(path) {
			return &edit.content;
		}
		self.tabs.get(path).map(|tab| tab.content.as_str()).unwrap_or_default()
	}

	pub fn file_state(&self, path: &Path) -> Option<FileState> {
		let tab = self.tabs.get(path)?;
		if tab.kind.is_media() {
			return Some(FileState::Media);
		}
		if self.is_dirty(path) {
			return Some(FileState::Dirty);
		}
		if self.in_flight_saves.contains_key(path) {
			return Some(FileState::Saving);
		}
		Some(FileState::Clean)
	}

	/// Unsaved edits exist that no running save covers.
	pub fn is_dirty(&self, path: &Path) -> bool {
		let Some(revision) = self.unsaved.revision(path) else {
			return false;
		};
		self.in_flight_saves.get(path).map(|save| save.revision) != Some(revision)
	}

	pub fn active_is_dirty(&self) -> bool {
		self.active.as_deref().is_some_and(|path| self.is_dirty(path))
	}

	/// Path the user has to be asked about before `intent` may run.
	pub fn confirmation_target(&self, intent: &Intent) -> Option<PathBuf> {
		match intent {
			Intent::CloseTab(path) => self.unsaved.contains(path).then(|| path.clone()),
			Intent::ActivateTab(path) if self.active.as_deref() == Some(path.as_path()) => None,
			Intent::ActivateTab(_) | Intent::OpenEntry(_) | Intent::GoUp | Intent::OpenFolder(_) => {
				self.active.clone().filter(|active| self.is_dirty(active))
			}
		}
	}

	pub fn activate(&mut self, path: &Path) -> bool {
		if !self.tabs.contains(path) {
			warn!("activate failed: no tab for {}", path.display());
			return false;
		}
		self.active = Some(path.to_path_buf());
		self.status_bar.message = display_name(path);
		true
	}

	pub fn open_tab(&mut self, file: OpenFile) {
		let path = file.path.clone();
		if !self.tabs.open(file) {
			debug!("tab already open, switching: {}", path.display());
		}
		self.activate(&path);
	}

	/// Closes the tab and drops its buffered edit. A closed active tab hands focus to the first
	/// remaining tab, or clears the active slot.
	pub fn close_tab(&mut self, path: &Path) -> Option<OpenFile> {
		let closed = self.tabs.close(path)?;
		self.unsaved.discard(path);
		if self.active.as_deref() == Some(path) {
			self.active = None;
			if let Some(next) = self.tabs.first().map(|tab| tab.path.clone()) {
				self.activate(&next);
			}
		}
		self.status_bar.message = format!("closed {}", closed.name);
		Some(closed)
	}

	/// Records an edit reported by the editor widget. Ignored unless it targets the active text tab.
	pub fn record_edit(&mut self, path: &Path, content: String) -> bool {
		if self.active.as_deref() != Some(path) {
			debug!("edit for inactive file ignored: {}", path.display());
			return false;
		}
		let Some(tab) = self.tabs.get(path) else {
			return false;
		};
		if tab.kind.is_media() {
			warn!("edit for media file ignored: {}", path.display());
			return false;
		}
		if tab.content == content && !self.unsaved.contains(path) {
			return false;
		}
		self.unsaved.mark(path, content);
		true
	}

	pub fn discard_edit(&mut self, path: &Path) -> bool {
		self.unsaved.discard(path).is_some()
	}

	/// Registers a save of the newest buffered edit of `path`. At most one write per path runs at a
	/// time; a save requested while an older revision is being written becomes its follow-up.
	pub fn begin_save(&mut self, path: &Path, origin: SaveOrigin) -> SaveStart {
		let Some(edit) = self.unsaved.get(path) else {
			return SaveStart::NothingToSave;
		};
		let revision = edit.revision;
		if let Some(in_flight) = self.in_flight_saves.get_mut(path) {
			if in_flight.revision == revision {
				return SaveStart::AlreadyInFlight { revision };
			}
			in_flight.follow_up = match (in_flight.follow_up, origin) {
				(Some(queued), SaveOrigin::Autosave) => Some(queued),
				_ => Some(origin),
			};
			return SaveStart::Queued { revision };
		}
		let content = edit.content.clone();
		self.in_flight_saves.insert(
			path.to_path_buf(),
			InFlightSave { revision, content: content.clone(), origin, follow_up: None },
		);
		SaveStart::Enqueue { content, revision }
	}

	/// Removes the in-flight record a completion answers. `None` for stale completions.
	pub fn take_in_flight_save(&mut self, path: &Path, revision: u64) -> Option<InFlightSave> {
		if self.in_flight_saves.get(path).map(|save| save.revision) != Some(revision) {
			return None;
		}
		self.in_flight_saves.remove(path)
	}

	/// Success continuation of a save: the written snapshot becomes the cached content.
	pub fn apply_saved(&mut self, path: &Path, revision: u64, content: String) {
		if !self.tabs.update_content_on_save(path, content) {
			debug!("save completed for closed tab: {}", path.display());
		}
		self.unsaved.clear_if_revision(path, revision);
	}

	pub fn take_deferred_intent(&mut self, path: &Path, revision: u64) -> Option<Intent> {
		self
			.deferred_intent
			.take_if(|deferred| deferred.path == path && deferred.revision == revision)
			.map(|deferred| deferred.intent)
	}

	pub fn defer_intent(&mut self, path: PathBuf, revision: u64, intent: Intent) {
		if let Some(previous) = self.deferred_intent.replace(DeferredIntent { path, revision, intent }) {
			debug!("deferred intent replaced: {:?}", previous.intent);
		}
	}

	pub fn push_alert(&mut self, alert: SessionError) {
		self.status_bar.message = alert.to_string();
		self.alerts.push(alert);
	}

	pub fn drain_alerts(&mut self) -> Vec<SessionError> {
		std::mem::take(&mut self.alerts)
	}
}
