use std::{
	collections::HashMap,
	path::{Path, PathBuf},
};

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GitFileStatus {
	Untracked,
	Modified,
	Staged,
	Unmodified,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GitFileInfo {
	pub path:   PathBuf,
	pub status: GitFileStatus,
}

/// Parses `git status --porcelain` (v1) output. Paths are resolved against `repo_root`.
pub fn parse_porcelain(text: &str, repo_root: &Path) -> Vec<GitFileInfo> {
	text
		.lines()
		.filter(|line| line.len() >= 3)
		.filter_map(|line| {
			let code = line.get(0..2)?;
			let raw_path = line.get(3..)?.trim();
			let path = match raw_path.split_once(" -> ") {
				Some((_, renamed_to)) => renamed_to,
				None => raw_path,
			};
			let path = path.trim_matches('"');
			if path.is_empty() {
				return None;
			}
			Some(GitFileInfo { path: repo_root.join(path), status: status_from_code(code) })
		})
		.collect()
}

pub fn status_from_code(code: &str) -> GitFileStatus {
	match code {
		"??" => GitFileStatus::Untracked,
		" M" | "M " | "MM" => GitFileStatus::Modified,
		"A " | "AM" => GitFileStatus::Staged,
		_ => GitFileStatus::Modified,
	}
}

/// Last known git status for the workspace root.
#[derive(Debug, Default)]
pub struct GitStatusMap {
	root:       Option<PathBuf>,
	repository: bool,
	statuses:   HashMap<PathBuf, GitFileStatus>,
}

impl GitStatusMap {
	pub fn reset(&mut self, root: PathBuf) {
		self.root = Some(root);
		self.repository = false;
		self.statuses.clear();
	}

	pub fn root(&self) -> Option<&Path> {
		self.root.as_deref()
	}

	pub fn is_repository(&self) -> bool {
		self.repository
	}

	/// Applies a status report. `None` means `root` is not a repository. Reports for a root other
	/// than the current one are ignored.
	pub fn apply(&mut self, root: &Path, report: Option<Vec<GitFileInfo>>) -> bool {
		if self.root.as_deref() != Some(root) {
			return false;
		}
		self.statuses.clear();
		match report {
			Some(files) => {
				self.repository = true;
				self.statuses.extend(files.into_iter().map(|info| (info.path, info.status)));
			}
			None => self.repository = false,
		}
		true
	}

	pub fn status_for(&self, path: &Path) -> Option<GitFileStatus> {
		self.statuses.get(path).copied()
	}

	pub fn len(&self) -> usize {
		self.statuses.len()
	}

	pub fn is_empty(&self) -> bool {
		self.statuses.is_empty()
	}
}
