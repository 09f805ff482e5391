use std::path::PathBuf;

use thiserror::Error;
use xds_kernel::{
	action::{AppAction, EditorAction, SettingsAction, SystemAction, TabAction, TerminalAction, WorkspaceAction},
	state::{PromptAnswer, SessionState},
};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConsoleError {
	#[error("unknown command `{name}`, try `help`")]
	UnknownCommand { name: String },
	#[error("`{command}` needs {argument}")]
	MissingArgument { command: &'static str, argument: &'static str },
	#[error("`{value}` is not a number")]
	InvalidNumber { value: String },
	#[error("no entry named `{name}` in the current directory")]
	NoSuchEntry { name: String },
	#[error("no tab matches `{name}`")]
	NoSuchTab { name: String },
	#[error("no folder is open")]
	NoFolderOpen,
	#[error("no file is active")]
	NoActiveFile,
	#[error("`{command}` is still running, `stop` it first")]
	CommandRunning { command: String },
}

/// Read-only views printed on request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum View {
	Listing,
	Tabs,
	File,
	Terminal,
	Settings,
	Help,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AutosaveSetting {
	On,
	Off,
	Interval(i32),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConsoleCommand {
	View(View),
	OpenFolder(PathBuf),
	Enter(String),
	Up,
	Refresh,
	Tab(String),
	Close(Option<String>),
	Set(String),
	Append(String),
	Save,
	Answer(PromptAnswer),
	CreateFile(String),
	CreateDirectory(String),
	Delete(String),
	Rename(String, String),
	Reveal(Option<String>),
	Run(String),
	Shell(String),
	Stop,
	ClearTerminal,
	Autosave(AutosaveSetting),
	Quit,
}

pub const HELP: &str = "\
open <dir>        open a folder           ls                list the current directory
cd <name>         enter a directory or open a file
up                go to the parent        refresh           re-read the directory
tabs              list tabs               tab <n|name>      switch tab
close [name]      close a tab             cat               print the active file
set <text>        replace the active text (\\n for newlines)
append <text>     append a line           save              save the active file
y / n / c         answer a prompt (save / discard / cancel)
mkfile <name>     create a file           mkdir <name>      create a directory
rm <name>         delete an entry         mv <from> <to>    rename an entry
reveal [name]     show in file manager    run <name>        launch with the system handler
!<command>        run in the terminal     stop              kill the running command
term              show terminal output    clear             clear terminal output
settings          show settings
autosave on|off|<ms>                      quit              leave";

impl ConsoleCommand {
	/// `Ok(None)` for blank lines.
	pub fn parse(line: &str) -> Result<Option<Self>, ConsoleError> {
		let line = line.trim();
		if line.is_empty() {
			return Ok(None);
		}
		if let Some(command) = line.strip_prefix('!') {
			let command = command.trim();
			if command.is_empty() {
				return Err(ConsoleError::MissingArgument { command: "!", argument: "a command line" });
			}
			return Ok(Some(Self::Shell(command.to_string())));
		}

		let (name, rest) = line.split_once(char::is_whitespace).unwrap_or((line, ""));
		let rest = rest.trim();
		let required = |command: &'static str, argument: &'static str| {
			if rest.is_empty() {
				Err(ConsoleError::MissingArgument { command, argument })
			} else {
				Ok(rest.to_string())
			}
		};
		let optional = (!rest.is_empty()).then(|| rest.to_string());

		let command = match name {
			"ls" => Self::View(View::Listing),
			"tabs" => Self::View(View::Tabs),
			"cat" => Self::View(View::File),
			"term" => Self::View(View::Terminal),
			"settings" => Self::View(View::Settings),
			"help" | "?" => Self::View(View::Help),
			"open" => Self::OpenFolder(PathBuf::from(required("open", "a folder path")?)),
			"cd" => Self::Enter(required("cd", "an entry name")?),
			"up" | ".." => Self::Up,
			"refresh" => Self::Refresh,
			"tab" => Self::Tab(required("tab", "a tab number or name")?),
			"close" => Self::Close(optional),
			"set" => Self::Set(rest.replace("\\n", "\n")),
			"append" => Self::Append(rest.to_string()),
			"save" => Self::Save,
			"y" | "yes" => Self::Answer(PromptAnswer::Confirm),
			"n" | "no" => Self::Answer(PromptAnswer::Decline),
			"c" | "cancel" => Self::Answer(PromptAnswer::Cancel),
			"mkfile" => Self::CreateFile(required("mkfile", "a file name")?),
			"mkdir" => Self::CreateDirectory(required("mkdir", "a directory name")?),
			"rm" => Self::Delete(required("rm", "an entry name")?),
			"mv" => {
				let (from, to) = rest
					.split_once(char::is_whitespace)
					.map(|(from, to)| (from.trim(), to.trim()))
					.filter(|(from, to)| !from.is_empty() && !to.is_empty())
					.ok_or(ConsoleError::MissingArgument { command: "mv", argument: "a source and a target" })?;
				Self::Rename(from.to_string(), to.to_string())
			}
			"reveal" => Self::Reveal(optional),
			"run" => Self::Run(required("run", "an entry name")?),
			"stop" => Self::Stop,
			"clear" => Self::ClearTerminal,
			"autosave" => match rest {
				"on" => Self::Autosave(AutosaveSetting::On),
				"off" => Self::Autosave(AutosaveSetting::Off),
				"" => return Err(ConsoleError::MissingArgument { command: "autosave", argument: "on, off or ms" }),
				value => Self::Autosave(AutosaveSetting::Interval(
					value.parse().map_err(|_| ConsoleError::InvalidNumber { value: value.to_string() })?,
				)),
			},
			"quit" | "exit" | "q" => Self::Quit,
			other => return Err(ConsoleError::UnknownCommand { name: other.to_string() }),
		};
		Ok(Some(command))
	}

	/// Resolves names against the session and produces the actions to dispatch.
	pub fn into_actions(self, state: &SessionState) -> Result<Vec<AppAction>, ConsoleError> {
		let action = match self {
			Self::View(_) => return Ok(Vec::new()),
			Self::OpenFolder(path) => AppAction::Workspace(WorkspaceAction::OpenFolder { path }),
			Self::Enter(name) => {
				let entry = state.directory.entry_named(&name).cloned().ok_or(ConsoleError::NoSuchEntry { name })?;
				AppAction::Workspace(WorkspaceAction::OpenEntry { entry })
			}
			Self::Up => AppAction::Workspace(WorkspaceAction::GoUp),
			Self::Refresh => AppAction::Workspace(WorkspaceAction::Refresh),
			Self::Tab(name) => AppAction::Tab(TabAction::Activate { path: resolve_tab(state, &name)? }),
			Self::Close(None) => AppAction::Tab(TabAction::CloseActive),
			Self::Close(Some(name)) => AppAction::Tab(TabAction::Close { path: resolve_tab(state, &name)? }),
			Self::Set(content) => edit(state, content)?,
			Self::Append(line) => {
				let mut content = state.file_content().to_string();
				if !content.is_empty() && !content.ends_with('\n') {
					content.push('\n');
				}
				content.push_str(&line);
				edit(state, content)?
			}
			Self::Save => AppAction::Editor(EditorAction::SaveActive),
			Self::Answer(answer) => AppAction::Prompt(answer),
			Self::CreateFile(name) => {
				AppAction::Workspace(WorkspaceAction::CreateFile { path: in_current_dir(state, &name)? })
			}
			Self::CreateDirectory(name) => {
				AppAction::Workspace(WorkspaceAction::CreateDirectory { path: in_current_dir(state, &name)? })
			}
			Self::Delete(name) => AppAction::Workspace(WorkspaceAction::DeleteEntry { path: entry_path(state, name)? }),
			Self::Rename(from, to) => AppAction::Workspace(WorkspaceAction::RenameEntry {
				from: entry_path(state, from)?,
				to:   in_current_dir(state, &to)?,
			}),
			Self::Reveal(name) => {
				let path = match name {
					Some(name) => entry_path(state, name)?,
					None => state.directory.current().map(PathBuf::from).ok_or(ConsoleError::NoFolderOpen)?,
				};
				AppAction::Workspace(WorkspaceAction::RevealInFileManager { path })
			}
			Self::Run(name) => AppAction::Workspace(WorkspaceAction::RunExecutable { path: entry_path(state, name)? }),
			Self::Shell(command) => {
				if let Some(running) = state.terminal.running_command() {
					return Err(ConsoleError::CommandRunning { command: running.to_string() });
				}
				let mut actions = vec![AppAction::Terminal(TerminalAction::ClearInput)];
				actions.extend(command.chars().map(|ch| AppAction::Terminal(TerminalAction::Insert(ch))));
				actions.push(AppAction::Terminal(TerminalAction::Submit));
				return Ok(actions);
			}
			Self::Stop => AppAction::Terminal(TerminalAction::Stop),
			Self::ClearTerminal => AppAction::Terminal(TerminalAction::ClearOutput),
			Self::Autosave(setting) => {
				let mut settings = state.settings.clone();
				match setting {
					AutosaveSetting::On => settings.auto_save_enabled = true,
					AutosaveSetting::Off => settings.auto_save_enabled = false,
					AutosaveSetting::Interval(interval) => {
						settings.auto_save_enabled = true;
						settings.auto_save_interval = interval;
					}
				}
				AppAction::Settings(SettingsAction::Update(settings))
			}
			Self::Quit => AppAction::System(SystemAction::Quit),
		};
		Ok(vec![action])
	}
}

fn edit(state: &SessionState, content: String) -> Result<AppAction, ConsoleError> {
	let path = state.active.clone().ok_or(ConsoleError::NoActiveFile)?;
	Ok(AppAction::Editor(EditorAction::ContentChanged { path, content }))
}

fn entry_path(state: &SessionState, name: String) -> Result<PathBuf, ConsoleError> {
	state.directory.entry_named(&name).map(|entry| entry.path.clone()).ok_or(ConsoleError::NoSuchEntry { name })
}

fn in_current_dir(state: &SessionState, name: &str) -> Result<PathBuf, ConsoleError> {
	state.directory.current().map(|dir| dir.join(name)).ok_or(ConsoleError::NoFolderOpen)
}

/// 1-based tab number, or a tab name.
fn resolve_tab(state: &SessionState, name: &str) -> Result<PathBuf, ConsoleError> {
	let by_index = name
		.parse::<usize>()
		.ok()
		.and_then(|index| index.checked_sub(1))
		.and_then(|index| state.tabs.get_index(index));
	by_index
		.or_else(|| state.tabs.iter().find(|tab| tab.name == name))
		.map(|tab| tab.path.clone())
		.ok_or_else(|| ConsoleError::NoSuchTab { name: name.to_string() })
}
