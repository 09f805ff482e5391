use std::{
	path::Path,
	process::{Command, Stdio},
};

#[cfg(unix)]
use std::os::unix::process::CommandExt;

/// Command running `line` through the platform shell. On unix the shell leads its own process
/// group so [`kill_tree_command`] reaches everything it started.
pub(crate) fn shell_command(line: &str) -> Command {
	#[cfg(target_os = "windows")]
	let mut command = {
		let mut command = Command::new("powershell");
		command.arg("-Command").arg(line);
		command
	};
	#[cfg(target_os = "macos")]
	let mut command = {
		let mut command = Command::new("zsh");
		command.arg("-c").arg(line);
		command
	};
	#[cfg(not(any(target_os = "windows", target_os = "macos")))]
	let mut command = {
		let mut command = Command::new("bash");
		command.arg("-c").arg(line);
		command
	};
	#[cfg(unix)]
	command.process_group(0);
	command.stdin(Stdio::null()).stdout(Stdio::piped()).stderr(Stdio::piped());
	command
}

/// Kills the process tree rooted at `pid`, which must lead its own process group on unix.
pub(crate) fn kill_tree_command(pid: u32) -> Command {
	#[cfg(target_os = "windows")]
	let mut command = {
		let mut command = Command::new("taskkill");
		command.args(["/T", "/F", "/PID"]).arg(pid.to_string());
		command
	};
	#[cfg(not(target_os = "windows"))]
	let mut command = {
		let mut command = Command::new("kill");
		command.args(["-KILL", "--"]).arg(format!("-{}", pid));
		command
	};
	command.stdin(Stdio::null()).stdout(Stdio::null()).stderr(Stdio::null());
	command
}

pub(crate) fn file_manager_command(dir: &Path) -> Command {
	#[cfg(target_os = "windows")]
	let program = "explorer";
	#[cfg(target_os = "macos")]
	let program = "open";
	#[cfg(not(any(target_os = "windows", target_os = "macos")))]
	let program = "xdg-open";

	let mut command = Command::new(program);
	command.arg(dir);
	command
}

pub(crate) fn launch_command(file: &Path) -> Command {
	#[cfg(target_os = "windows")]
	let command = {
		let mut command = Command::new("cmd");
		command.args(["/C", "start", ""]).arg(file);
		command
	};
	#[cfg(target_os = "macos")]
	let command = {
		let mut command = Command::new("open");
		command.arg(file);
		command
	};
	#[cfg(not(any(target_os = "windows", target_os = "macos")))]
	let command = {
		let mut command = Command::new("xdg-open");
		command.arg(file);
		command
	};
	command
}

pub(crate) fn program_name(command: &Command) -> String {
	command.get_program().to_string_lossy().into_owned()
}
