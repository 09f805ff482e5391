//! Collaborator seams. Request methods only enqueue work; results arrive later as actions.

use std::{
	path::{Path, PathBuf},
	time::Duration,
};

use thiserror::Error;

use crate::{action::FileMutation, settings::AppSettings};

#[derive(Debug, Error)]
pub enum FileIoServiceError {
	#[error("io request channel disconnected while enqueueing {operation}")]
	RequestChannelDisconnected { operation: &'static str },
}

#[derive(Debug, Error)]
pub enum DirectoryWatchServiceError {
	#[error("watch request channel disconnected while enqueueing {operation}")]
	RequestChannelDisconnected { operation: &'static str },
}

#[derive(Debug, Error)]
pub enum ProcessServiceError {
	#[error("process request channel disconnected while enqueueing {operation}")]
	RequestChannelDisconnected { operation: &'static str },
	#[error("spawn {program} failed")]
	Spawn {
		program: String,
		#[source]
		source:  std::io::Error,
	},
	#[error("{} does not exist", .path.display())]
	MissingPath { path: PathBuf },
	#[error("a command is already running")]
	CommandAlreadyRunning,
	#[error("no command is running")]
	NoRunningCommand,
}

#[derive(Debug, Error)]
pub enum SettingsStoreError {
	#[error("create settings directory {} failed", .path.display())]
	CreateDir {
		path:   PathBuf,
		#[source]
		source: std::io::Error,
	},
	#[error("read settings {} failed", .path.display())]
	Read {
		path:   PathBuf,
		#[source]
		source: std::io::Error,
	},
	#[error("parse settings {} failed", .path.display())]
	Parse {
		path:   PathBuf,
		#[source]
		source: Box<dyn std::error::Error + Send + Sync>,
	},
	#[error("encode settings failed")]
	Encode {
		#[source]
		source: Box<dyn std::error::Error + Send + Sync>,
	},
	#[error("write settings {} failed", .path.display())]
	Write {
		path:   PathBuf,
		#[source]
		source: std::io::Error,
	},
}

pub trait FileIo {
	fn enqueue_list(&self, path: PathBuf) -> Result<(), FileIoServiceError>;
	fn enqueue_binary_check(&self, path: PathBuf) -> Result<(), FileIoServiceError>;
	fn enqueue_read(&self, path: PathBuf) -> Result<(), FileIoServiceError>;
	fn enqueue_save(&self, path: PathBuf, text: String, revision: u64) -> Result<(), FileIoServiceError>;
	fn enqueue_mutation(&self, mutation: FileMutation) -> Result<(), FileIoServiceError>;
}

/// Push notifications for the browsed directory. At most one directory is watched at a time.
pub trait DirectoryWatch {
	fn enqueue_watch(&self, path: PathBuf) -> Result<(), DirectoryWatchServiceError>;
	fn enqueue_unwatch(&self) -> Result<(), DirectoryWatchServiceError>;
}

pub trait ProcessHost {
	fn spawn_command(&self, command: String, cwd: Option<PathBuf>) -> Result<(), ProcessServiceError>;
	fn stop_command(&self) -> Result<(), ProcessServiceError>;
	fn enqueue_git_status(&self, root: PathBuf) -> Result<(), ProcessServiceError>;
	fn open_in_file_manager(&self, path: &Path) -> Result<(), ProcessServiceError>;
	fn run_executable(&self, path: &Path) -> Result<(), ProcessServiceError>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerCommand {
	Arm { generation: u64, interval: Duration },
	Disarm,
}

/// Owner of the single live autosave timer. Every `Arm` replaces the previous timer.
pub trait AutosaveTimer {
	fn rearm(&self, command: TimerCommand);
}

pub trait SettingsStore {
	fn load_settings(&self) -> Result<AppSettings, SettingsStoreError>;
	fn save_settings(&self, settings: &AppSettings) -> Result<(), SettingsStoreError>;
}

pub trait Ports: FileIo + DirectoryWatch + ProcessHost + AutosaveTimer + SettingsStore {}

impl<T> Ports for T where T: FileIo + DirectoryWatch + ProcessHost + AutosaveTimer + SettingsStore {}
