use std::{cmp::Ordering, fs, path::Path};

use anyhow::{Context, bail, ensure};
use xds_kernel::{
	action::FileMutation,
	state::{DirectoryEntry, DirectoryListing},
};

/// Files above this size are refused by the read path.
pub(crate) const MAX_READ_SIZE: u64 = 10 * 1024 * 1024;

pub(crate) const BINARY_SAMPLE_LEN: usize = 512;

/// Binary heuristic over the leading sample of a file: any NUL byte, or more than 30% control
/// bytes outside the usual whitespace range.
pub(crate) fn looks_binary(sample: &[u8]) -> bool {
	if sample.is_empty() {
		return false;
	}
	if sample.contains(&0) {
		return true;
	}
	let control = sample.iter().filter(|&&byte| byte < 7 || (byte > 13 && byte < 32)).count();
	control * 10 > sample.len() * 3
}

pub(crate) fn list_directory(path: &Path) -> anyhow::Result<DirectoryListing> {
	ensure!(path.exists(), "directory does not exist: {}", path.display());
	ensure!(path.is_dir(), "path is not a directory: {}", path.display());

	let mut entries: Vec<DirectoryEntry> = fs::read_dir(path)
		.with_context(|| format!("read directory failed: {}", path.display()))?
		.filter_map(Result::ok)
		.map(|entry| {
			let entry_path = entry.path();
			DirectoryEntry {
				name:         entry.file_name().to_string_lossy().into_owned(),
				is_directory: entry_path.is_dir(),
				size:         entry.metadata().map(|metadata| metadata.len()).unwrap_or(0),
				path:         entry_path,
			}
		})
		.collect();
	sort_entries(&mut entries);

	Ok(DirectoryListing { entries, resolved_path: path.to_path_buf() })
}

/// Directories first, then case-insensitive by name.
pub(crate) fn sort_entries(entries: &mut [DirectoryEntry]) {
	entries.sort_unstable_by(|a, b| match (a.is_directory, b.is_directory) {
		(true, false) => Ordering::Less,
		(false, true) => Ordering::Greater,
		_ => a.name.to_lowercase().cmp(&b.name.to_lowercase()),
	});
}

pub(crate) fn check_readable(path: &Path, metadata: &fs::Metadata) -> anyhow::Result<()> {
	ensure!(metadata.is_file(), "path is not a file: {}", path.display());
	ensure!(metadata.len() <= MAX_READ_SIZE, "file too large (>10MB): {}", path.display());
	Ok(())
}

pub(crate) fn check_writable(path: &Path) -> anyhow::Result<()> {
	if let Some(parent) = path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
		ensure!(parent.exists(), "parent directory does not exist: {}", parent.display());
	}
	Ok(())
}

pub(crate) fn apply_mutation(mutation: &FileMutation) -> anyhow::Result<()> {
	match mutation {
		FileMutation::CreateFile { path } => {
			ensure!(!path.exists(), "file already exists: {}", path.display());
			fs::write(path, "").with_context(|| format!("create file failed: {}", path.display()))
		}
		FileMutation::CreateDirectory { path } => {
			ensure!(!path.exists(), "directory already exists: {}", path.display());
			fs::create_dir_all(path).with_context(|| format!("create directory failed: {}", path.display()))
		}
		FileMutation::Delete { path } => {
			if !path.exists() {
				bail!("file does not exist: {}", path.display());
			}
			let result = if path.is_dir() { fs::remove_dir_all(path) } else { fs::remove_file(path) };
			result.with_context(|| format!("delete failed: {}", path.display()))
		}
		FileMutation::Rename { from, to } => {
			ensure!(from.exists(), "source file does not exist: {}", from.display());
			ensure!(!to.exists(), "destination file already exists: {}", to.display());
			fs::rename(from, to)
				.with_context(|| format!("rename failed: {} -> {}", from.display(), to.display()))
		}
	}
}

#[cfg(test)]
mod tests {
	use std::fs;

	use xds_kernel::action::FileMutation;

	use super::{apply_mutation, check_readable, check_writable, list_directory, looks_binary};

	#[test]
	fn listing_should_put_directories_first_then_sort_case_insensitively() {
		let dir = tempfile::tempdir().expect("tempdir");
		fs::write(dir.path().join("b.txt"), "b").expect("write b");
		fs::write(dir.path().join("A.txt"), "a").expect("write a");
		fs::create_dir(dir.path().join("zeta")).expect("mkdir zeta");
		fs::create_dir(dir.path().join("Alpha")).expect("mkdir alpha");

		let listing = list_directory(dir.path()).expect("list");

		let names: Vec<_> = listing.entries.iter().map(|entry| entry.name.as_str()).collect();
		assert_eq!(names, vec!["Alpha", "zeta", "A.txt", "b.txt"]);
		assert_eq!(listing.resolved_path, dir.path());
		assert_eq!(listing.entries[3].size, 1);
	}

	#[test]
	fn listing_a_file_should_fail() {
		let dir = tempfile::tempdir().expect("tempdir");
		let file = dir.path().join("plain.txt");
		fs::write(&file, "x").expect("write");

		assert!(list_directory(&file).is_err());
		assert!(list_directory(&dir.path().join("missing")).is_err());
	}

	#[test]
	fn binary_heuristic_should_flag_nul_and_control_heavy_samples() {
		assert!(!looks_binary(b""));
		assert!(!looks_binary(b"fn main() {}\n\tprintln!();\r\n"));
		assert!(looks_binary(b"text\0more"));
		assert!(looks_binary(&[1, 2, 3, 4, b'a', b'b']));
		assert!(!looks_binary(&[1, b'a', b'b', b'c', b'd', b'e', b'f', b'g', b'h', b'i']));
	}

	#[test]
	fn read_check_should_refuse_directories() {
		let dir = tempfile::tempdir().expect("tempdir");
		let metadata = fs::metadata(dir.path()).expect("metadata");

		assert!(check_readable(dir.path(), &metadata).is_err());
	}

	#[test]
	fn write_check_should_require_existing_parent() {
		let dir = tempfile::tempdir().expect("tempdir");

		assert!(check_writable(&dir.path().join("ok.txt")).is_ok());
		assert!(check_writable(&dir.path().join("missing/no.txt")).is_err());
	}

	#[test]
	fn create_should_refuse_existing_entries() {
		let dir = tempfile::tempdir().expect("tempdir");
		let file = dir.path().join("new.txt");

		apply_mutation(&FileMutation::CreateFile { path: file.clone() }).expect("first create");

		assert!(file.is_file());
		assert!(apply_mutation(&FileMutation::CreateFile { path: file }).is_err());
	}

	#[test]
	fn create_directory_should_create_parents() {
		let dir = tempfile::tempdir().expect("tempdir");
		let nested = dir.path().join("a/b/c");

		apply_mutation(&FileMutation::CreateDirectory { path: nested.clone() }).expect("create");

		assert!(nested.is_dir());
	}

	#[test]
	fn delete_should_remove_directories_recursively() {
		let dir = tempfile::tempdir().expect("tempdir");
		let nested = dir.path().join("tree");
		fs::create_dir_all(nested.join("leaf")).expect("mkdir");
		fs::write(nested.join("leaf/file.txt"), "x").expect("write");

		apply_mutation(&FileMutation::Delete { path: nested.clone() }).expect("delete");

		assert!(!nested.exists());
		assert!(apply_mutation(&FileMutation::Delete { path: nested }).is_err());
	}

	#[test]
	fn rename_should_refuse_existing_destination() {
		let dir = tempfile::tempdir().expect("tempdir");
		let from = dir.path().join("from.txt");
		let to = dir.path().join("to.txt");
		fs::write(&from, "from").expect("write from");
		fs::write(&to, "to").expect("write to");

		assert!(apply_mutation(&FileMutation::Rename { from: from.clone(), to: to.clone() }).is_err());

		fs::remove_file(&to).expect("remove to");
		apply_mutation(&FileMutation::Rename { from: from.clone(), to: to.clone() }).expect("rename");
		assert!(!from.exists());
		assert_eq!(fs::read_to_string(&to).expect("read"), "from");
	}
}
