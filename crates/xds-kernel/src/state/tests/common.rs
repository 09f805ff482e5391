use std::{
	cell::{Cell, RefCell},
	path::{Path, PathBuf},
};

use crate::{
	action::{AppAction, EditorAction, FileAction, FileMutation, WorkspaceAction},
	controller::SessionController,
	ports::{
		AutosaveTimer, DirectoryWatch, DirectoryWatchServiceError, FileIo, FileIoServiceError, ProcessHost,
		ProcessServiceError, SettingsStore, SettingsStoreError, TimerCommand,
	},
	settings::AppSettings,
	state::{DirectoryEntry, DirectoryListing, SessionState},
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub(super) enum Request {
	List(PathBuf),
	BinaryCheck(PathBuf),
	Read(PathBuf),
	Save { path: PathBuf, text: String, revision: u64 },
	Mutation(FileMutation),
	Watch(PathBuf),
	Unwatch,
	Spawn { command: String, cwd: Option<PathBuf> },
	Stop,
	GitStatus(PathBuf),
	Reveal(PathBuf),
	Run(PathBuf),
	Timer(TimerCommand),
	SaveSettings(AppSettings),
}

#[derive(Debug, Default)]
pub(super) struct RecordingPorts {
	requests:          RefCell<Vec<Request>>,
	pub disconnected:  Cell<bool>,
	pub spawn_failure: Cell<bool>,
}

impl RecordingPorts {
	pub fn take(&self) -> Vec<Request> {
		std::mem::take(&mut self.requests.borrow_mut())
	}

	pub fn saves(&self) -> Vec<(PathBuf, String, u64)> {
		self
			.requests
			.borrow()
			.iter()
			.filter_map(|request| match request {
				Request::Save { path, text, revision } => Some((path.clone(), text.clone(), *revision)),
				_ => None,
			})
			.collect()
	}

	pub fn last_timer(&self) -> Option<TimerCommand> {
		self.requests.borrow().iter().rev().find_map(|request| match request {
			Request::Timer(command) => Some(*command),
			_ => None,
		})
	}

	fn record(&self, request: Request) {
		self.requests.borrow_mut().push(request);
	}

	fn file_io_result(&self, operation: &'static str) -> Result<(), FileIoServiceError> {
		if self.disconnected.get() {
			return Err(FileIoServiceError::RequestChannelDisconnected { operation });
		}
		Ok(())
	}
}

impl FileIo for RecordingPorts {
	fn enqueue_list(&self, path: PathBuf) -> Result<(), FileIoServiceError> {
		self.record(Request::List(path));
		self.file_io_result("list")
	}

	fn enqueue_binary_check(&self, path: PathBuf) -> Result<(), FileIoServiceError> {
		self.record(Request::BinaryCheck(path));
		self.file_io_result("binary check")
	}

	fn enqueue_read(&self, path: PathBuf) -> Result<(), FileIoServiceError> {
		self.record(Request::Read(path));
		self.file_io_result("read")
	}

	fn enqueue_save(&self, path: PathBuf, text: String, revision: u64) -> Result<(), FileIoServiceError> {
		self.record(Request::Save { path, text, revision });
		self.file_io_result("save")
	}

	fn enqueue_mutation(&self, mutation: FileMutation) -> Result<(), FileIoServiceError> {
		self.record(Request::Mutation(mutation));
		self.file_io_result("mutation")
	}
}

impl DirectoryWatch for RecordingPorts {
	fn enqueue_watch(&self, path: PathBuf) -> Result<(), DirectoryWatchServiceError> {
		self.record(Request::Watch(path));
		Ok(())
	}

	fn enqueue_unwatch(&self) -> Result<(), DirectoryWatchServiceError> {
		self.record(Request::Unwatch);
		Ok(())
	}
}

impl ProcessHost for RecordingPorts {
	fn spawn_command(&self, command: String, cwd: Option<PathBuf>) -> Result<(), ProcessServiceError> {
		if self.spawn_failure.get() {
			return Err(ProcessServiceError::Spawn {
				program: "bash".to_string(),
				source:  std::io::Error::from(std::io::ErrorKind::NotFound),
			});
		}
		self.record(Request::Spawn { command, cwd });
		Ok(())
	}

	fn stop_command(&self) -> Result<(), ProcessServiceError> {
		self.record(Request::Stop);
		Ok(())
	}

	fn enqueue_git_status(&self, root: PathBuf) -> Result<(), ProcessServiceError> {
		self.record(Request::GitStatus(root));
		Ok(())
	}

	fn open_in_file_manager(&self, path: &Path) -> Result<(), ProcessServiceError> {
		self.record(Request::Reveal(path.to_path_buf()));
		Ok(())
	}

	fn run_executable(&self, path: &Path) -> Result<(), ProcessServiceError> {
		if !path.is_absolute() {
			return Err(ProcessServiceError::MissingPath { path: path.to_path_buf() });
		}
		self.record(Request::Run(path.to_path_buf()));
		Ok(())
	}
}

impl AutosaveTimer for RecordingPorts {
	fn rearm(&self, command: TimerCommand) {
		self.record(Request::Timer(command));
	}
}

impl SettingsStore for RecordingPorts {
	fn load_settings(&self) -> Result<AppSettings, SettingsStoreError> {
		Ok(AppSettings::default())
	}

	fn save_settings(&self, settings: &AppSettings) -> Result<(), SettingsStoreError> {
		self.record(Request::SaveSettings(settings.clone()));
		Ok(())
	}
}

pub(super) struct Harness {
	pub controller: SessionController,
	pub state:      SessionState,
	pub ports:      RecordingPorts,
}

impl Harness {
	pub fn new() -> Self {
		Self::with_settings(AppSettings::default())
	}

	pub fn with_settings(settings: AppSettings) -> Self {
		Self {
			controller: SessionController::new(),
			state:      SessionState::new(settings),
			ports:      RecordingPorts::default(),
		}
	}

	/// Harness with `/proj` opened and listed.
	pub fn opened() -> Self {
		let mut harness = Self::new();
		harness.open_folder("/proj", proj_entries());
		harness
	}

	pub fn apply(&mut self, action: AppAction) {
		let _ = self.controller.apply(&mut self.state, &self.ports, action);
	}

	pub fn open_folder(&mut self, path: &str, entries: Vec<DirectoryEntry>) {
		self.apply(AppAction::Workspace(WorkspaceAction::OpenFolder { path: PathBuf::from(path) }));
		self.complete_listing(path, entries);
	}

	pub fn complete_listing(&mut self, path: &str, entries: Vec<DirectoryEntry>) {
		self.apply(AppAction::File(FileAction::ListCompleted {
			path:   PathBuf::from(path),
			result: Ok(DirectoryListing { entries, resolved_path: PathBuf::from(path) }),
		}));
	}

	pub fn fail_listing(&mut self, path: &str) {
		self.apply(AppAction::File(FileAction::ListCompleted {
			path:   PathBuf::from(path),
			result: Err(anyhow::anyhow!("permission denied")),
		}));
	}

	pub fn click(&mut self, path: &str) {
		let entry = entry_for(path);
		self.apply(AppAction::Workspace(WorkspaceAction::OpenEntry { entry }));
	}

	/// Clicks a text file and answers the binary check and read with `content`.
	pub fn open_text(&mut self, path: &str, content: &str) {
		self.click(path);
		self.apply(AppAction::File(FileAction::BinaryCheckCompleted {
			path:   PathBuf::from(path),
			result: Ok(false),
		}));
		self.apply(AppAction::File(FileAction::ReadCompleted {
			path:   PathBuf::from(path),
			result: Ok(content.to_string()),
		}));
	}

	pub fn edit(&mut self, path: &str, content: &str) {
		self.apply(AppAction::Editor(EditorAction::ContentChanged {
			path:    PathBuf::from(path),
			content: content.to_string(),
		}));
	}

	pub fn save_active(&mut self) {
		self.apply(AppAction::Editor(EditorAction::SaveActive));
	}

	pub fn complete_save(&mut self, path: &str, revision: u64, result: anyhow::Result<()>) {
		self.apply(AppAction::File(FileAction::SaveCompleted { path: PathBuf::from(path), revision, result }));
	}

	/// Revision of the newest save request written for `path`.
	pub fn last_save_revision(&self, path: &str) -> u64 {
		self
			.ports
			.saves()
			.into_iter()
			.rev()
			.find(|(save_path, ..)| save_path == Path::new(path))
			.map(|(.., revision)| revision)
			.expect("a save should have been requested")
	}

	pub fn active(&self) -> Option<&Path> {
		self.state.active.as_deref()
	}
}

pub(super) fn entry_for(path: &str) -> DirectoryEntry {
	let path = PathBuf::from(path);
	let name = path.file_name().map(|name| name.to_string_lossy().into_owned()).unwrap_or_default();
	let is_directory = !name.contains('.');
	DirectoryEntry { name, path, is_directory, size: 0 }
}

pub(super) fn proj_entries() -> Vec<DirectoryEntry> {
	["/proj/src", "/proj/main.ts", "/proj/util.ts", "/proj/logo.png", "/proj/a.out.bin"]
		.into_iter()
		.map(entry_for)
		.collect()
}
