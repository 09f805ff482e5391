use std::path::PathBuf;

use thiserror::Error;

/// User-visible failures raised at the controller boundary.
#[derive(Debug, Error)]
pub enum SessionError {
	#[error("{operation} failed for {}: {message}", .path.display())]
	Io { operation: &'static str, path: PathBuf, message: String },
	#[error("{} appears to be binary and cannot be opened", .path.display())]
	BinaryRejected { path: PathBuf },
	#[error("confirmation aborted")]
	ConfirmationAborted,
	#[error("command `{command}` failed: {message}")]
	Process { command: String, message: String },
	#[error("settings could not be persisted: {message}")]
	Settings { message: String },
}

impl SessionError {
	pub fn io(operation: &'static str, path: impl Into<PathBuf>, err: &anyhow::Error) -> Self {
		Self::Io { operation, path: path.into(), message: format!("{:#}", err) }
	}
}

#[cfg(test)]
mod tests {
	use std::path::PathBuf;

	use super::SessionError;

	#[test]
	fn io_error_should_render_operation_path_and_chained_causes() {
		let err = anyhow::anyhow!("permission denied").context("write file failed");
		let session_err = SessionError::io("save", PathBuf::from("/proj/main.ts"), &err);
		assert_eq!(
			session_err.to_string(),
			"save failed for /proj/main.ts: write file failed: permission denied"
		);
	}

	#[test]
	fn binary_rejection_should_name_the_file() {
		let err = SessionError::BinaryRejected { path: PathBuf::from("/proj/a.out") };
		assert_eq!(err.to_string(), "/proj/a.out appears to be binary and cannot be opened");
	}
}
