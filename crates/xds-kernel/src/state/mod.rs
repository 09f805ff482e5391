use std::{
	collections::HashMap,
	path::{Path, PathBuf},
};

use serde::{Deserialize, Serialize};

use crate::{error::SessionError, git::GitStatusMap, media::FileKind, settings::AppSettings, terminal::TerminalState};

mod autosave;
mod directory;
mod session;
mod tab;
mod unsaved;

pub use autosave::AutosaveScheduler;
pub use directory::{DirectoryCursor, ListingRequest, Navigation};
pub use session::SaveStart;
pub use tab::TabRegistry;
pub use unsaved::{BufferedEdit, UnsavedSet};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DirectoryEntry {
	pub name:         String,
	pub path:         PathBuf,
	pub is_directory: bool,
	pub size:         u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DirectoryListing {
	pub entries:       Vec<DirectoryEntry>,
	pub resolved_path: PathBuf,
}

/// A tab. `content` is the last loaded or successfully saved text, never a live edit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OpenFile {
	pub name:    String,
	pub path:    PathBuf,
	pub content: String,
	pub kind:    FileKind,
}

impl OpenFile {
	pub fn text(name: impl Into<String>, path: impl Into<PathBuf>, content: impl Into<String>) -> Self {
		Self { name: name.into(), path: path.into(), content: content.into(), kind: FileKind::Text }
	}

	pub fn media(name: impl Into<String>, path: impl Into<PathBuf>, kind: FileKind) -> Self {
		Self { name: name.into(), path: path.into(), content: String::new(), kind }
	}
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileState {
	Clean,
	Dirty,
	Saving,
	Media,
}

/// A user operation that may have to wait behind the unsaved-changes prompt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Intent {
	OpenFolder(PathBuf),
	OpenEntry(DirectoryEntry),
	GoUp,
	ActivateTab(PathBuf),
	CloseTab(PathBuf),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Prompt {
	/// "Save before proceeding?" for `path`, guarding `intent`.
	UnsavedChanges { path: PathBuf, intent: Intent },
	ConfirmDelete { path: PathBuf },
}

impl Prompt {
	pub fn message(&self) -> String {
		match self {
			Self::UnsavedChanges { path, .. } => {
				format!("You have unsaved changes in {}. Do you want to save them?", display_name(path))
			}
			Self::ConfirmDelete { path } => format!("Delete {}?", display_name(path)),
		}
	}
}

/// Confirm saves (or deletes), Decline discards and proceeds, Cancel aborts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PromptAnswer {
	Confirm,
	Decline,
	Cancel,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OpenStage {
	BinaryCheck,
	Read,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingOpen {
	pub name:  String,
	pub path:  PathBuf,
	pub stage: OpenStage,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaveOrigin {
	Explicit,
	Autosave,
	BeforeIntent,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InFlightSave {
	pub revision:  u64,
	pub content:   String,
	pub origin:    SaveOrigin,
	/// Newer edits asked to be saved while this write was running.
	pub follow_up: Option<SaveOrigin>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeferredIntent {
	pub path:     PathBuf,
	pub revision: u64,
	pub intent:   Intent,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct StatusBarState {
	pub message: String,
}

#[derive(Debug)]
pub struct SessionState {
	pub directory:       DirectoryCursor,
	pub tabs:            TabRegistry,
	pub unsaved:         UnsavedSet,
	pub active:          Option<PathBuf>,
	pub pending_open:    Option<PendingOpen>,
	pub in_flight_saves: HashMap<PathBuf, InFlightSave>,
	pub deferred_intent: Option<DeferredIntent>,
	pub prompt:          Option<Prompt>,
	pub alerts:          Vec<SessionError>,
	pub autosave:        AutosaveScheduler,
	pub git:             GitStatusMap,
	pub terminal:        TerminalState,
	pub settings:        AppSettings,
	pub status_bar:      StatusBarState,
}

impl Default for SessionState {
	fn default() -> Self {
		Self::new(AppSettings::default())
	}
}

pub(crate) fn display_name(path: &Path) -> String {
	path
		.file_name()
		.map(|name| name.to_string_lossy().into_owned())
		.unwrap_or_else(|| path.display().to_string())
}

#[cfg(test)]
mod tests;
