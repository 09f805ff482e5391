use std::path::PathBuf;

use crate::{
	git::GitFileInfo,
	settings::AppSettings,
	state::{DirectoryEntry, DirectoryListing, PromptAnswer},
	terminal::OutputStream,
};

#[derive(Debug)]
pub enum AppAction {
	Workspace(WorkspaceAction),
	Tab(TabAction),
	Editor(EditorAction),
	Prompt(PromptAnswer),
	File(FileAction),
	Autosave(AutosaveAction),
	Terminal(TerminalAction),
	Git(GitAction),
	Settings(SettingsAction),
	System(SystemAction),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WorkspaceAction {
	OpenFolder { path: PathBuf },
	/// Click on a listing entry: descends into directories, opens files.
	OpenEntry { entry: DirectoryEntry },
	GoUp,
	Refresh,
	CreateFile { path: PathBuf },
	CreateDirectory { path: PathBuf },
	/// Asks for confirmation before anything is removed.
	DeleteEntry { path: PathBuf },
	RenameEntry { from: PathBuf, to: PathBuf },
	RevealInFileManager { path: PathBuf },
	RunExecutable { path: PathBuf },
	DirectoryChanged { path: PathBuf },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TabAction {
	Activate { path: PathBuf },
	Close { path: PathBuf },
	CloseActive,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditorAction {
	/// Change callback of the editor widget, carrying the full buffer text.
	ContentChanged { path: PathBuf, content: String },
	SaveActive,
}

#[derive(Debug)]
pub enum FileAction {
	ListCompleted { path: PathBuf, result: anyhow::Result<DirectoryListing> },
	BinaryCheckCompleted { path: PathBuf, result: anyhow::Result<bool> },
	ReadCompleted { path: PathBuf, result: anyhow::Result<String> },
	SaveCompleted { path: PathBuf, revision: u64, result: anyhow::Result<()> },
	MutationCompleted { mutation: FileMutation, result: anyhow::Result<()> },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileMutation {
	CreateFile { path: PathBuf },
	CreateDirectory { path: PathBuf },
	Delete { path: PathBuf },
	Rename { from: PathBuf, to: PathBuf },
}

impl FileMutation {
	pub fn operation(&self) -> &'static str {
		match self {
			Self::CreateFile { .. } => "create file",
			Self::CreateDirectory { .. } => "create directory",
			Self::Delete { .. } => "delete",
			Self::Rename { .. } => "rename",
		}
	}

	pub fn target(&self) -> &PathBuf {
		match self {
			Self::CreateFile { path } | Self::CreateDirectory { path } | Self::Delete { path } => path,
			Self::Rename { from, .. } => from,
		}
	}
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AutosaveAction {
	Tick { generation: u64 },
}

#[derive(Debug)]
pub enum TerminalAction {
	Insert(char),
	Backspace,
	HistoryPrev,
	HistoryNext,
	/// Drops whatever is typed on the input line.
	ClearInput,
	ClearOutput,
	Submit,
	Stop,
	Output { stream: OutputStream, line: String },
	/// `Ok(None)` means the process ended without an exit code (killed by a signal).
	Finished { result: anyhow::Result<Option<i32>> },
}

#[derive(Debug)]
pub enum GitAction {
	/// `Ok(None)` means the root is not a git repository.
	StatusCompleted { root: PathBuf, result: anyhow::Result<Option<Vec<GitFileInfo>>> },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SettingsAction {
	Update(AppSettings),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SystemAction {
	Quit,
}
