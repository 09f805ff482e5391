use std::{
	collections::HashMap,
	fs,
	io::Read,
	path::{Path, PathBuf},
	thread,
};

use anyhow::Context;
use tracing::{debug, error};
use xds_kernel::{
	action::{AppAction, FileAction, FileMutation},
	ports::{FileIo, FileIoServiceError},
};

use crate::fs_ops::{self, BINARY_SAMPLE_LEN};

#[derive(dep_inj::DepInj)]
#[target(FileIoImpl)]
pub struct FileIoState {
	request_tx: flume::Sender<FileIoRequest>,
	request_rx: flume::Receiver<FileIoRequest>,
	event_tx:   flume::Sender<AppAction>,
}

impl<Deps> FileIo for FileIoImpl<Deps>
where Deps: AsRef<FileIoState>
{
	fn enqueue_list(&self, path: PathBuf) -> Result<(), FileIoServiceError> {
		self.enqueue(FileIoRequest::List { path }, "list")
	}

	fn enqueue_binary_check(&self, path: PathBuf) -> Result<(), FileIoServiceError> {
		self.enqueue(FileIoRequest::BinaryCheck { path }, "binary check")
	}

	fn enqueue_read(&self, path: PathBuf) -> Result<(), FileIoServiceError> {
		self.enqueue(FileIoRequest::Read { path }, "read")
	}

	fn enqueue_save(&self, path: PathBuf, text: String, revision: u64) -> Result<(), FileIoServiceError> {
		self.enqueue(FileIoRequest::Save { path, text, revision }, "save")
	}

	fn enqueue_mutation(&self, mutation: FileMutation) -> Result<(), FileIoServiceError> {
		let operation = mutation.operation();
		self.enqueue(FileIoRequest::Mutate { mutation }, operation)
	}
}

impl<Deps> FileIoImpl<Deps>
where Deps: AsRef<FileIoState>
{
	fn enqueue(&self, request: FileIoRequest, operation: &'static str) -> Result<(), FileIoServiceError> {
		self.request_tx.send(request).map_err(|err| {
			error!("enqueue {} failed: io request channel is disconnected: {}", operation, err);
			FileIoServiceError::RequestChannelDisconnected { operation }
		})
	}
}

impl FileIoState {
	pub fn new(event_tx: flume::Sender<AppAction>) -> Self {
		let (request_tx, request_rx) = flume::unbounded();
		Self { request_tx, request_rx, event_tx }
	}

	pub fn start(&self) {
		let request_rx = self.request_rx.clone();
		let event_tx = self.event_tx.clone();
		thread::spawn(move || {
			if let Err(err) = Self::run(request_rx, event_tx) {
				error!("io worker exited with error: {:#}", err);
			}
		});
	}

	fn run(request_rx: flume::Receiver<FileIoRequest>, event_tx: flume::Sender<AppAction>) -> anyhow::Result<()> {
		let runtime = compio::runtime::Runtime::new().context("io worker runtime init failed")?;
		const MAX_IN_FLIGHT: usize = 64;

		runtime.block_on(async move {
			let mut in_flight = Vec::new();
			let mut save_gates = SaveGates::default();
			while let Ok(request) = request_rx.recv_async().await {
				let gate = match &request {
					FileIoRequest::Save { path, .. } => Some(save_gates.enter(path)),
					_ => None,
				};
				let event_tx = event_tx.clone();
				let task = compio::runtime::spawn(async move {
					let _done = match gate {
						Some((previous, done)) => {
							if let Some(previous) = previous {
								let _ = previous.recv_async().await;
							}
							Some(done)
						}
						None => None,
					};
					let action = Self::handle(request).await;
					if let Err(err) = event_tx.send(AppAction::File(action)) {
						error!("failed to send completion from io worker: {}", err);
					}
				});
				in_flight.push(task);

				if in_flight.len() >= MAX_IN_FLIGHT {
					let oldest = in_flight.remove(0);
					let _ = oldest.await;
				}
			}

			for task in in_flight {
				let _ = task.await;
			}
			debug!("io worker drained");
		});

		Ok(())
	}

	async fn handle(request: FileIoRequest) -> FileAction {
		match request {
			FileIoRequest::List { path } => {
				let result = fs_ops::list_directory(&path);
				FileAction::ListCompleted { path, result }
			}
			FileIoRequest::BinaryCheck { path } => {
				let result = Self::read_sample(&path).map(|sample| fs_ops::looks_binary(&sample));
				FileAction::BinaryCheckCompleted { path, result }
			}
			FileIoRequest::Read { path } => {
				let result = Self::read_text(&path).await;
				FileAction::ReadCompleted { path, result }
			}
			FileIoRequest::Save { path, text, revision } => {
				let result = Self::write_text(&path, text).await;
				FileAction::SaveCompleted { path, revision, result }
			}
			FileIoRequest::Mutate { mutation } => {
				let result = fs_ops::apply_mutation(&mutation);
				FileAction::MutationCompleted { mutation, result }
			}
		}
	}

	fn read_sample(path: &Path) -> anyhow::Result<Vec<u8>> {
		let display_path = path.display();
		let file = fs::File::open(path).with_context(|| format!("open file failed: {}", display_path))?;
		let metadata = file.metadata().with_context(|| format!("stat file failed: {}", display_path))?;
		anyhow::ensure!(metadata.is_file(), "path is not a file: {}", display_path);

		let mut sample = Vec::with_capacity(BINARY_SAMPLE_LEN);
		file
			.take(BINARY_SAMPLE_LEN as u64)
			.read_to_end(&mut sample)
			.with_context(|| format!("read file failed: {}", display_path))?;
		Ok(sample)
	}

	async fn read_text(path: &Path) -> anyhow::Result<String> {
		let display_path = path.display().to_string();
		let metadata = fs::metadata(path).with_context(|| format!("file does not exist: {}", display_path))?;
		fs_ops::check_readable(path, &metadata)?;
		let file_bytes =
			compio::fs::read(path).await.with_context(|| format!("read file failed: {}", display_path))?;
		String::from_utf8(file_bytes).with_context(|| format!("decode utf-8 failed: {}", display_path))
	}

	async fn write_text(path: &Path, text: String) -> anyhow::Result<()> {
		fs_ops::check_writable(path)?;
		let write_result = compio::fs::write(path, text.into_bytes()).await.0;
		write_result.with_context(|| format!("write file failed: {}", path.display())).map(|_| ())
	}
}

/// Orders writes of one path: a save starts only after the previous save of its path finished.
#[derive(Default)]
struct SaveGates(HashMap<PathBuf, flume::Receiver<()>>);

impl SaveGates {
	/// Returns the previous save's gate to wait on, and a guard to hold until this save is done.
	fn enter(&mut self, path: &Path) -> (Option<flume::Receiver<()>>, flume::Sender<()>) {
		self.0.retain(|_, done| !done.is_disconnected());
		let (done_tx, done_rx) = flume::bounded(1);
		(self.0.insert(path.to_path_buf(), done_rx), done_tx)
	}
}

enum FileIoRequest {
	List { path: PathBuf },
	BinaryCheck { path: PathBuf },
	Read { path: PathBuf },
	Save { path: PathBuf, text: String, revision: u64 },
	Mutate { mutation: FileMutation },
}
