use std::{
	ops::ControlFlow,
	path::{Path, PathBuf},
};

use tracing::{debug, error, info, warn};

use crate::{
	action::{
		AppAction, AutosaveAction, EditorAction, FileAction, FileMutation, GitAction, SettingsAction,
		SystemAction, TabAction, TerminalAction, WorkspaceAction,
	},
	error::SessionError,
	media::FileKind,
	ports::{Ports, TimerCommand},
	state::{
		Intent, Navigation, OpenFile, OpenStage, PendingOpen, Prompt, PromptAnswer, SaveOrigin, SaveStart,
		SessionState,
	},
	terminal::OutputStream,
};

/// Applies actions to the session. The only writer of [`SessionState`].
#[derive(Debug, Default)]
pub struct SessionController;

impl SessionController {
	pub fn new() -> Self {
		Self
	}

	pub fn apply<P: Ports>(&mut self, state: &mut SessionState, ports: &P, action: AppAction) -> ControlFlow<()> {
		match action {
			AppAction::Workspace(action) => self.apply_workspace_action(state, ports, action),
			AppAction::Tab(TabAction::Activate { path }) => {
				self.dispatch_intent(state, ports, Intent::ActivateTab(path))
			}
			AppAction::Tab(TabAction::Close { path }) => {
				self.dispatch_intent(state, ports, Intent::CloseTab(path))
			}
			AppAction::Tab(TabAction::CloseActive) => {
				if let Some(path) = state.active.clone() {
					self.dispatch_intent(state, ports, Intent::CloseTab(path));
				}
			}
			AppAction::Editor(EditorAction::ContentChanged { path, content }) => {
				if state.record_edit(&path, content) {
					debug!("buffered edit: {}", path.display());
				}
			}
			AppAction::Editor(EditorAction::SaveActive) => self.save_active(state, ports),
			AppAction::Prompt(answer) => self.answer_prompt(state, ports, answer),
			AppAction::File(action) => self.apply_file_action(state, ports, action),
			AppAction::Autosave(AutosaveAction::Tick { generation }) => {
				self.autosave_tick(state, ports, generation)
			}
			AppAction::Terminal(action) => self.apply_terminal_action(state, ports, action),
			AppAction::Git(GitAction::StatusCompleted { root, result }) => match result {
				Ok(report) => {
					if !state.git.apply(&root, report) {
						debug!("stale git status ignored: {}", root.display());
					}
				}
				Err(err) => error!("git status failed: root={} error={:#}", root.display(), err),
			},
			AppAction::Settings(SettingsAction::Update(settings)) => {
				let settings = settings.clamped();
				if let Err(err) = ports.save_settings(&settings) {
					let err = anyhow::Error::new(err);
					error!("save settings failed: {:#}", err);
					state.push_alert(SessionError::Settings { message: format!("{:#}", err) });
				} else {
					state.status_bar.message = "settings saved".to_string();
				}
				state.settings = settings;
			}
			AppAction::System(SystemAction::Quit) => {
				if !state.unsaved.is_empty() {
					warn!("quitting with {} unsaved file(s)", state.unsaved.len());
				}
				if let Err(err) = ports.enqueue_unwatch() {
					debug!("unwatch on quit: {}", err);
				}
				ports.rearm(TimerCommand::Disarm);
				return ControlFlow::Break(());
			}
		}
		self.sync_autosave(state, ports);
		ControlFlow::Continue(())
	}

	fn apply_workspace_action<P: Ports>(&mut self, state: &mut SessionState, ports: &P, action: WorkspaceAction) {
		match action {
			WorkspaceAction::OpenFolder { path } => self.dispatch_intent(state, ports, Intent::OpenFolder(path)),
			WorkspaceAction::OpenEntry { entry } => self.dispatch_intent(state, ports, Intent::OpenEntry(entry)),
			WorkspaceAction::GoUp => {
				if state.directory.can_go_up() {
					self.dispatch_intent(state, ports, Intent::GoUp);
				}
			}
			WorkspaceAction::Refresh => self.refresh_listing(state, ports),
			WorkspaceAction::DirectoryChanged { path } => {
				if state.directory.current() == Some(path.as_path()) {
					self.refresh_listing(state, ports);
					self.request_git_status(state, ports);
				}
			}
			WorkspaceAction::CreateFile { path } => self.mutate(state, ports, FileMutation::CreateFile { path }),
			WorkspaceAction::CreateDirectory { path } => {
				self.mutate(state, ports, FileMutation::CreateDirectory { path })
			}
			WorkspaceAction::RenameEntry { from, to } => self.mutate(state, ports, FileMutation::Rename { from, to }),
			WorkspaceAction::DeleteEntry { path } => {
				if state.prompt.is_some() {
					warn!("delete ignored while a prompt is open: {}", path.display());
					return;
				}
				state.prompt = Some(Prompt::ConfirmDelete { path });
			}
			WorkspaceAction::RevealInFileManager { path } => {
				if let Err(err) = ports.open_in_file_manager(&path) {
					error!("open in file manager failed: path={} error={}", path.display(), err);
					state.push_alert(SessionError::Process {
						command: "open in file manager".to_string(),
						message: err.to_string(),
					});
				}
			}
			WorkspaceAction::RunExecutable { path } => {
				if let Err(err) = ports.run_executable(&path) {
					error!("run executable failed: path={} error={}", path.display(), err);
					state.push_alert(SessionError::Process {
						command: path.display().to_string(),
						message: err.to_string(),
					});
				}
			}
		}
	}

	/// Runs `intent`, or parks it behind the unsaved-changes prompt.
	fn dispatch_intent<P: Ports>(&mut self, state: &mut SessionState, ports: &P, intent: Intent) {
		if state.prompt.is_some() {
			warn!("intent ignored while a prompt is open: {:?}", intent);
			return;
		}
		if let Some(path) = state.confirmation_target(&intent) {
			info!("unsaved changes guard: path={} intent={:?}", path.display(), intent);
			state.prompt = Some(Prompt::UnsavedChanges { path, intent });
			return;
		}
		self.execute_intent(state, ports, intent);
	}

	fn execute_intent<P: Ports>(&mut self, state: &mut SessionState, ports: &P, intent: Intent) {
		match intent {
			Intent::OpenFolder(path) => {
				let request = state.directory.request_root(path);
				self.enqueue_list(state, ports, request.path);
			}
			Intent::OpenEntry(entry) if entry.is_directory => {
				let request = state.directory.request_enter(entry.path);
				self.enqueue_list(state, ports, request.path);
			}
			Intent::OpenEntry(entry) => {
				if state.tabs.contains(&entry.path) {
					state.activate(&entry.path);
					return;
				}
				state.status_bar.message = format!("opening {}", entry.name);
				state.pending_open =
					Some(PendingOpen { name: entry.name, path: entry.path.clone(), stage: OpenStage::BinaryCheck });
				if let Err(err) = ports.enqueue_binary_check(entry.path.clone()) {
					error!("io worker unavailable while enqueueing binary check: {}", err);
					state.pending_open = None;
					state.push_alert(SessionError::Io {
						operation: "open",
						path:      entry.path,
						message:   err.to_string(),
					});
				}
			}
			Intent::GoUp => {
				if let Some(request) = state.directory.request_up() {
					self.enqueue_list(state, ports, request.path);
				}
			}
			Intent::ActivateTab(path) => {
				state.activate(&path);
			}
			Intent::CloseTab(path) => {
				if let Some(closed) = state.close_tab(&path) {
					info!("tab closed: {}", closed.path.display());
				}
			}
		}
	}

	fn answer_prompt<P: Ports>(&mut self, state: &mut SessionState, ports: &P, answer: PromptAnswer) {
		let Some(prompt) = state.prompt.take() else {
			debug!("prompt answer without open prompt: {:?}", answer);
			return;
		};
		if let Err(err) = self.resolve_prompt(state, ports, prompt, answer) {
			info!("prompt resolved without action: {}", err);
			state.status_bar.message = "cancelled".to_string();
		}
	}

	fn resolve_prompt<P: Ports>(
		&mut self,
		state: &mut SessionState,
		ports: &P,
		prompt: Prompt,
		answer: PromptAnswer,
	) -> Result<(), SessionError> {
		match (prompt, answer) {
			(Prompt::UnsavedChanges { path, intent }, PromptAnswer::Confirm) => {
				self.save_then(state, ports, path, intent);
				Ok(())
			}
			(Prompt::UnsavedChanges { path, intent }, PromptAnswer::Decline) => {
				if state.discard_edit(&path) {
					info!("buffered edit discarded: {}", path.display());
				}
				self.execute_intent(state, ports, intent);
				Ok(())
			}
			(Prompt::ConfirmDelete { path }, PromptAnswer::Confirm) => {
				self.mutate(state, ports, FileMutation::Delete { path });
				Ok(())
			}
			(Prompt::UnsavedChanges { .. }, PromptAnswer::Cancel)
			| (Prompt::ConfirmDelete { .. }, PromptAnswer::Decline | PromptAnswer::Cancel) => {
				Err(SessionError::ConfirmationAborted)
			}
		}
	}

	/// Saves `path` and runs `intent` once that save succeeds.
	fn save_then<P: Ports>(&mut self, state: &mut SessionState, ports: &P, path: PathBuf, intent: Intent) {
		match state.begin_save(&path, SaveOrigin::BeforeIntent) {
			SaveStart::Enqueue { content, revision } => {
				if self.enqueue_save(state, ports, &path, content, revision) {
					state.defer_intent(path, revision, intent);
				}
			}
			SaveStart::AlreadyInFlight { revision } | SaveStart::Queued { revision } => {
				state.defer_intent(path, revision, intent)
			}
			SaveStart::NothingToSave => self.execute_intent(state, ports, intent),
		}
	}

	fn save_active<P: Ports>(&mut self, state: &mut SessionState, ports: &P) {
		let Some(path) = state.active.clone() else {
			debug!("save requested without active file");
			return;
		};
		match state.begin_save(&path, SaveOrigin::Explicit) {
			SaveStart::Enqueue { content, revision } => {
				self.enqueue_save(state, ports, &path, content, revision);
			}
			SaveStart::AlreadyInFlight { .. } | SaveStart::Queued { .. } => {
				state.status_bar.message = "saving...".to_string()
			}
			SaveStart::NothingToSave => state.status_bar.message = "no changes to save".to_string(),
		}
	}

	fn autosave_tick<P: Ports>(&mut self, state: &mut SessionState, ports: &P, generation: u64) {
		let Some(path) = state.autosave.accept_tick(generation).map(Path::to_path_buf) else {
			debug!("stale autosave tick ignored: generation={}", generation);
			return;
		};
		if !state.is_dirty(&path) {
			return;
		}
		if let SaveStart::Enqueue { content, revision } = state.begin_save(&path, SaveOrigin::Autosave) {
			debug!("autosave: {}", path.display());
			self.enqueue_save(state, ports, &path, content, revision);
		}
	}

	fn enqueue_save<P: Ports>(
		&mut self,
		state: &mut SessionState,
		ports: &P,
		path: &Path,
		content: String,
		revision: u64,
	) -> bool {
		state.status_bar.message = "saving...".to_string();
		if let Err(err) = ports.enqueue_save(path.to_path_buf(), content, revision) {
			error!("io worker unavailable while enqueueing save: {}", err);
			state.take_in_flight_save(path, revision);
			state.push_alert(SessionError::Io { operation: "save", path: path.to_path_buf(), message: err.to_string() });
			return false;
		}
		true
	}

	/// Starts the save that was queued behind a finished write of `path`.
	fn resume_follow_up<P: Ports>(
		&mut self,
		state: &mut SessionState,
		ports: &P,
		path: &Path,
		origin: SaveOrigin,
	) {
		match state.begin_save(path, origin) {
			SaveStart::Enqueue { content, revision } => {
				debug!("follow-up save: path={} revision={}", path.display(), revision);
				if !self.enqueue_save(state, ports, path, content, revision)
					&& let Some(intent) = state.take_deferred_intent(path, revision)
				{
					info!("intent dropped after failed save: {:?}", intent);
				}
			}
			SaveStart::AlreadyInFlight { .. } | SaveStart::Queued { .. } => {}
			SaveStart::NothingToSave => debug!("follow-up save skipped, edit gone: {}", path.display()),
		}
	}

	fn apply_file_action<P: Ports>(&mut self, state: &mut SessionState, ports: &P, action: FileAction) {
		match action {
			FileAction::ListCompleted { path, result } => match result {
				Ok(listing) => {
					let Some(navigation) = state.directory.apply_listing(&path, listing) else {
						debug!("stale listing ignored: {}", path.display());
						return;
					};
					let Some(current) = state.directory.current().map(Path::to_path_buf) else {
						return;
					};
					if navigation != Navigation::Refresh {
						state.status_bar.message = current.display().to_string();
						if let Err(err) = ports.enqueue_watch(current.clone()) {
							error!("directory watcher unavailable: {}", err);
						}
					}
					if navigation == Navigation::Root {
						state.git.reset(current);
						self.request_git_status(state, ports);
					}
				}
				Err(err) => {
					if !state.directory.fail_listing(&path) {
						debug!("stale listing failure ignored: {}", path.display());
						return;
					}
					error!("list directory failed: path={} error={:#}", path.display(), err);
					state.push_alert(SessionError::io("read directory", path, &err));
				}
			},
			FileAction::BinaryCheckCompleted { path, result } => {
				let Some(pending) = state
					.pending_open
					.take_if(|pending| pending.path == path && pending.stage == OpenStage::BinaryCheck)
				else {
					debug!("stale binary check ignored: {}", path.display());
					return;
				};
				let kind = FileKind::classify(&pending.name);
				match result {
					Ok(_) if kind.is_media() => {
						info!("open media preview: {}", path.display());
						state.open_tab(OpenFile::media(pending.name, path, kind));
					}
					Ok(true) => {
						warn!("binary file rejected: {}", path.display());
						state.push_alert(SessionError::BinaryRejected { path });
					}
					Ok(false) => {
						state.pending_open = Some(PendingOpen { stage: OpenStage::Read, ..pending });
						if let Err(err) = ports.enqueue_read(path.clone()) {
							error!("io worker unavailable while enqueueing read: {}", err);
							state.pending_open = None;
							state.push_alert(SessionError::Io { operation: "open", path, message: err.to_string() });
						}
					}
					Err(err) => {
						error!("binary check failed: path={} error={:#}", path.display(), err);
						state.push_alert(SessionError::io("open", path, &err));
					}
				}
			}
			FileAction::ReadCompleted { path, result } => {
				let Some(pending) =
					state.pending_open.take_if(|pending| pending.path == path && pending.stage == OpenStage::Read)
				else {
					debug!("stale read ignored: {}", path.display());
					return;
				};
				match result {
					Ok(content) => {
						info!("open file: {}", path.display());
						state.open_tab(OpenFile::text(pending.name, path, content));
					}
					Err(err) => {
						error!("read file failed: path={} error={:#}", path.display(), err);
						state.push_alert(SessionError::io("open", path, &err));
					}
				}
			}
			FileAction::SaveCompleted { path, revision, result } => {
				let Some(in_flight) = state.take_in_flight_save(&path, revision) else {
					debug!("stale save completion ignored: path={} revision={}", path.display(), revision);
					return;
				};
				let follow_up = in_flight.follow_up;
				match result {
					Ok(()) => {
						info!("file saved: {}", path.display());
						state.apply_saved(&path, revision, in_flight.content);
						state.status_bar.message = "file saved".to_string();
						self.request_git_status(state, ports);
						if let Some(intent) = state.take_deferred_intent(&path, revision) {
							self.execute_intent(state, ports, intent);
						}
					}
					Err(err) => {
						let deferred = state.take_deferred_intent(&path, revision);
						if in_flight.origin == SaveOrigin::Autosave && deferred.is_none() {
							error!("autosave failed: path={} error={:#}", path.display(), err);
						} else {
							error!("file save failed: path={} error={:#}", path.display(), err);
							if let Some(intent) = deferred {
								info!("intent dropped after failed save: {:?}", intent);
							}
							state.push_alert(SessionError::io("save", path.clone(), &err));
						}
					}
				}
				if let Some(origin) = follow_up {
					self.resume_follow_up(state, ports, &path, origin);
				}
			}
			FileAction::MutationCompleted { mutation, result } => match result {
				Ok(()) => {
					info!("{} done: {}", mutation.operation(), mutation.target().display());
					state.status_bar.message = format!("{} done", mutation.operation());
					self.refresh_listing(state, ports);
					self.request_git_status(state, ports);
				}
				Err(err) => {
					error!(
						"{} failed: path={} error={:#}",
						mutation.operation(),
						mutation.target().display(),
						err
					);
					state.push_alert(SessionError::io(mutation.operation(), mutation.target().clone(), &err));
				}
			},
		}
	}

	fn apply_terminal_action<P: Ports>(&mut self, state: &mut SessionState, ports: &P, action: TerminalAction) {
		match action {
			TerminalAction::Insert(ch) => state.terminal.insert_char(ch),
			TerminalAction::Backspace => state.terminal.backspace(),
			TerminalAction::HistoryPrev => state.terminal.history_prev(),
			TerminalAction::HistoryNext => state.terminal.history_next(),
			TerminalAction::ClearInput => state.terminal.clear_input(),
			TerminalAction::ClearOutput => state.terminal.clear_output(),
			TerminalAction::Submit => {
				if state.terminal.is_running() {
					state.status_bar.message = "a command is already running".to_string();
					return;
				}
				let Some(command) = state.terminal.take_submission() else {
					return;
				};
				let cwd = state.directory.current().map(Path::to_path_buf);
				match ports.spawn_command(command.clone(), cwd) {
					Ok(()) => state.terminal.mark_started(command),
					Err(err) => {
						error!("spawn command failed: command={} error={}", command, err);
						state.terminal.push_output(OutputStream::Status, format!("Error: {}", err));
						state.push_alert(SessionError::Process { command, message: err.to_string() });
					}
				}
			}
			TerminalAction::Stop => {
				if let Err(err) = ports.stop_command() {
					debug!("stop command: {}", err);
					state.status_bar.message = err.to_string();
				}
			}
			TerminalAction::Output { stream, line } => state.terminal.push_output(stream, line),
			TerminalAction::Finished { result } => {
				let command = state.terminal.mark_finished().unwrap_or_default();
				match result {
					Ok(Some(0)) => state.terminal.push_output(OutputStream::Status, "[done]".to_string()),
					Ok(Some(code)) => {
						state.terminal.push_output(OutputStream::Status, format!("[exit code {}]", code));
						state.push_alert(SessionError::Process { command, message: format!("exit code {}", code) });
					}
					Ok(None) => state.terminal.push_output(OutputStream::Status, "[terminated]".to_string()),
					Err(err) => {
						error!("command failed: command={} error={:#}", command, err);
						state.terminal.push_output(OutputStream::Status, format!("Error: {:#}", err));
						state.push_alert(SessionError::Process { command, message: format!("{:#}", err) });
					}
				}
			}
		}
	}

	fn mutate<P: Ports>(&mut self, state: &mut SessionState, ports: &P, mutation: FileMutation) {
		let operation = mutation.operation();
		let path = mutation.target().clone();
		if let Err(err) = ports.enqueue_mutation(mutation) {
			error!("io worker unavailable while enqueueing {}: {}", operation, err);
			state.push_alert(SessionError::Io { operation, path, message: err.to_string() });
		}
	}

	fn refresh_listing<P: Ports>(&mut self, state: &mut SessionState, ports: &P) {
		if let Some(request) = state.directory.request_refresh() {
			self.enqueue_list(state, ports, request.path);
		}
	}

	fn enqueue_list<P: Ports>(&mut self, state: &mut SessionState, ports: &P, path: PathBuf) {
		if let Err(err) = ports.enqueue_list(path.clone()) {
			error!("io worker unavailable while enqueueing listing: {}", err);
			state.directory.fail_listing(&path);
			state.push_alert(SessionError::Io { operation: "read directory", path, message: err.to_string() });
		}
	}

	fn request_git_status<P: Ports>(&mut self, state: &mut SessionState, ports: &P) {
		let Some(root) = state.git.root().map(Path::to_path_buf) else {
			return;
		};
		if let Err(err) = ports.enqueue_git_status(root) {
			error!("git status unavailable: {}", err);
		}
	}

	/// Keeps exactly one autosave timer matching the settings and the active file.
	fn sync_autosave<P: Ports>(&mut self, state: &mut SessionState, ports: &P) {
		let target = state.active_file().filter(|tab| !tab.kind.is_media()).map(|tab| tab.path.clone());
		let enabled = state.settings.auto_save_enabled;
		let interval = state.settings.auto_save_interval();
		if let Some(command) = state.autosave.reconcile(enabled, interval, target.as_deref()) {
			debug!("autosave timer: {:?}", command);
			ports.rearm(command);
		}
	}
}
