use std::{
	path::{Path, PathBuf},
	process::Command,
	thread,
};

use tracing::{debug, error, info, warn};
use xds_kernel::{
	action::AppAction,
	ports::{ProcessHost, ProcessServiceError},
};

mod git;
mod shell;
mod terminal;

use terminal::RunningSlot;

#[derive(dep_inj::DepInj)]
#[target(ProcessHostImpl)]
pub struct ProcessHostState {
	git_tx:   flume::Sender<PathBuf>,
	git_rx:   flume::Receiver<PathBuf>,
	running:  RunningSlot,
	event_tx: flume::Sender<AppAction>,
}

impl<Deps> ProcessHost for ProcessHostImpl<Deps>
where Deps: AsRef<ProcessHostState>
{
	fn spawn_command(&self, command: String, cwd: Option<PathBuf>) -> Result<(), ProcessServiceError> {
		if self.running.lock().is_some() {
			return Err(ProcessServiceError::CommandAlreadyRunning);
		}
		let mut process = shell::shell_command(&command);
		if let Some(cwd) = cwd {
			process.current_dir(cwd);
		}
		let program = shell::program_name(&process);
		let child = process.spawn().map_err(|source| {
			error!("spawn terminal command failed: program={} error={}", program, source);
			ProcessServiceError::Spawn { program, source }
		})?;
		info!("terminal command started: pid={} command={}", child.id(), command);
		terminal::supervise(child, self.running.clone(), self.event_tx.clone());
		Ok(())
	}

	fn stop_command(&self) -> Result<(), ProcessServiceError> {
		let mut running = self.running.lock();
		let Some(child) = running.as_mut() else {
			return Err(ProcessServiceError::NoRunningCommand);
		};
		let pid = child.id();
		match shell::kill_tree_command(pid).status() {
			Ok(status) if status.success() => info!("terminal command stopped: pid={}", pid),
			Ok(status) => warn!("kill process tree failed: pid={} status={}", pid, status),
			Err(err) => warn!("kill process tree failed: pid={} error={}", pid, err),
		}
		if let Err(err) = child.kill() {
			debug!("kill terminal command: pid={} error={}", pid, err);
		}
		Ok(())
	}

	fn enqueue_git_status(&self, root: PathBuf) -> Result<(), ProcessServiceError> {
		self.git_tx.send(root).map_err(|err| {
			error!("enqueue_git_status failed: git request channel is disconnected: {}", err);
			ProcessServiceError::RequestChannelDisconnected { operation: "git status" }
		})
	}

	fn open_in_file_manager(&self, path: &Path) -> Result<(), ProcessServiceError> {
		if !path.exists() {
			return Err(ProcessServiceError::MissingPath { path: path.to_path_buf() });
		}
		let dir = if path.is_file() { path.parent().unwrap_or(path) } else { path };
		spawn_detached(shell::file_manager_command(dir))
	}

	fn run_executable(&self, path: &Path) -> Result<(), ProcessServiceError> {
		if !path.is_file() {
			return Err(ProcessServiceError::MissingPath { path: path.to_path_buf() });
		}
		spawn_detached(shell::launch_command(path))
	}
}

impl ProcessHostState {
	pub fn new(event_tx: flume::Sender<AppAction>) -> Self {
		let (git_tx, git_rx) = flume::unbounded();
		Self { git_tx, git_rx, running: RunningSlot::default(), event_tx }
	}

	pub fn start(&self) {
		let git_rx = self.git_rx.clone();
		let event_tx = self.event_tx.clone();
		thread::spawn(move || git::run_status_worker(git_rx, event_tx));
	}
}

/// Fire-and-forget launch; the child is reaped on a background thread.
fn spawn_detached(mut command: Command) -> Result<(), ProcessServiceError> {
	let program = shell::program_name(&command);
	let mut child = command.spawn().map_err(|source| {
		error!("spawn {} failed: {}", program, source);
		ProcessServiceError::Spawn { program: program.clone(), source }
	})?;
	thread::spawn(move || {
		if let Err(err) = child.wait() {
			error!("wait for {} failed: {}", program, err);
		}
	});
	Ok(())
}
