use std::{
	io::{BufRead, BufReader, Read},
	process::Child,
	sync::{Arc, Mutex, MutexGuard, PoisonError},
	thread::{self, JoinHandle},
	time::{Duration, Instant},
};

use anyhow::Context;
use tracing::{debug, error};
use xds_kernel::{
	action::{AppAction, TerminalAction},
	terminal::OutputStream,
};

const READER_GRACE: Duration = Duration::from_millis(200);

/// Slot holding the single running terminal command.
#[derive(Debug, Clone, Default)]
pub(crate) struct RunningSlot(Arc<Mutex<Option<Child>>>);

impl RunningSlot {
	pub fn lock(&self) -> MutexGuard<'_, Option<Child>> {
		self.0.lock().unwrap_or_else(PoisonError::into_inner)
	}
}

/// Streams the child's output line by line and reports its exit as soon as the child is gone.
pub(crate) fn supervise(mut child: Child, slot: RunningSlot, event_tx: flume::Sender<AppAction>) {
	let readers: Vec<JoinHandle<()>> = [
		child.stdout.take().map(|stdout| spawn_reader(stdout, OutputStream::Stdout, event_tx.clone())),
		child.stderr.take().map(|stderr| spawn_reader(stderr, OutputStream::Stderr, event_tx.clone())),
	]
	.into_iter()
	.flatten()
	.collect();
	*slot.lock() = Some(child);

	thread::spawn(move || {
		let result = wait(&slot);
		drain_readers(readers);
		debug!("terminal command finished: {:?}", result.as_ref().ok());
		if let Err(err) = event_tx.send(AppAction::Terminal(TerminalAction::Finished { result })) {
			error!("failed to send command completion: {}", err);
		}
	});
}

fn wait(slot: &RunningSlot) -> anyhow::Result<Option<i32>> {
	loop {
		{
			let mut guard = slot.lock();
			let Some(child) = guard.as_mut() else {
				return Ok(None);
			};
			match child.try_wait() {
				Ok(Some(status)) => {
					*guard = None;
					return Ok(status.code());
				}
				Ok(None) => {}
				Err(err) => {
					*guard = None;
					return Err(err).context("wait for command failed");
				}
			}
		}
		thread::sleep(Duration::from_millis(50));
	}
}

/// Lets the readers forward trailing output. A pipe still held open by an orphaned descendant does
/// not delay the completion; its reader keeps streaming until the pipe closes.
fn drain_readers(readers: Vec<JoinHandle<()>>) {
	let deadline = Instant::now() + READER_GRACE;
	for reader in readers {
		while !reader.is_finished() && Instant::now() < deadline {
			thread::sleep(Duration::from_millis(5));
		}
		if reader.is_finished() {
			let _ = reader.join();
		}
	}
}

fn spawn_reader<R>(pipe: R, stream: OutputStream, event_tx: flume::Sender<AppAction>) -> JoinHandle<()>
where R: Read + Send + 'static {
	thread::spawn(move || {
		for line in BufReader::new(pipe).lines() {
			let line = match line {
				Ok(line) => line,
				Err(err) => {
					error!("read command output failed: {}", err);
					break;
				}
			};
			if event_tx.send(AppAction::Terminal(TerminalAction::Output { stream, line })).is_err() {
				break;
			}
		}
	})
}
