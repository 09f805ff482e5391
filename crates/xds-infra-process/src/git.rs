use std::{
	path::{Path, PathBuf},
	process::Command,
};

use anyhow::{Context, ensure};
use tracing::{debug, error};
use xds_kernel::{
	action::{AppAction, GitAction},
	git::{GitFileInfo, parse_porcelain},
};

pub(crate) fn is_repository(root: &Path) -> bool {
	root.join(".git").exists()
}

/// `Ok(None)` when `root` is not a git repository.
pub(crate) fn read_status(root: &Path) -> anyhow::Result<Option<Vec<GitFileInfo>>> {
	if !is_repository(root) {
		return Ok(None);
	}
	let output = Command::new("git")
		.args(["status", "--porcelain"])
		.current_dir(root)
		.output()
		.with_context(|| format!("run git status failed: {}", root.display()))?;
	ensure!(
		output.status.success(),
		"git status failed: {}",
		String::from_utf8_lossy(&output.stderr).trim()
	);
	let text = String::from_utf8_lossy(&output.stdout);
	Ok(Some(parse_porcelain(&text, root)))
}

/// Serves status requests one at a time, collapsing a backlog for the same root.
pub(crate) fn run_status_worker(request_rx: flume::Receiver<PathBuf>, event_tx: flume::Sender<AppAction>) {
	while let Ok(mut root) = request_rx.recv() {
		for newer in request_rx.try_iter() {
			root = newer;
		}
		let result = read_status(&root);
		if let Ok(Some(files)) = &result {
			debug!("git status: root={} changed={}", root.display(), files.len());
		}
		if let Err(err) = event_tx.send(AppAction::Git(GitAction::StatusCompleted { root, result })) {
			error!("failed to send git status from process worker: {}", err);
			return;
		}
	}
}

#[cfg(test)]
mod tests {
	use std::fs;

	use super::{is_repository, read_status};

	#[test]
	fn plain_directory_should_not_be_a_repository() {
		let dir = tempfile::tempdir().expect("tempdir");

		assert!(!is_repository(dir.path()));
		assert!(read_status(dir.path()).expect("status").is_none());
	}

	#[test]
	fn dot_git_directory_should_mark_repository() {
		let dir = tempfile::tempdir().expect("tempdir");
		fs::create_dir(dir.path().join(".git")).expect("mkdir .git");

		assert!(is_repository(dir.path()));
	}
}
