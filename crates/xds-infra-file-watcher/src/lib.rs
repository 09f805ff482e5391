use std::{
	path::{Path, PathBuf},
	thread,
	time::{Duration, Instant},
};

use notify::{Config, RecommendedWatcher, RecursiveMode, Watcher, event::EventKind};
use tracing::{debug, error};
use xds_kernel::{
	action::{AppAction, WorkspaceAction},
	ports::{DirectoryWatch, DirectoryWatchServiceError},
};

/// Bursts of events closer together than this produce a single notification.
const COALESCE_WINDOW: Duration = Duration::from_millis(200);

#[derive(dep_inj::DepInj)]
#[target(DirectoryWatcherImpl)]
pub struct DirectoryWatcherState {
	watch_tx: flume::Sender<WatchRequest>,
	watch_rx: flume::Receiver<WatchRequest>,
	event_tx: flume::Sender<AppAction>,
}

impl<Deps> DirectoryWatch for DirectoryWatcherImpl<Deps>
where Deps: AsRef<DirectoryWatcherState>
{
	fn enqueue_watch(&self, path: PathBuf) -> Result<(), DirectoryWatchServiceError> {
		self.watch_tx.send(WatchRequest::Watch { path }).map_err(|err| {
			error!("enqueue_watch failed: watch request channel is disconnected: {}", err);
			DirectoryWatchServiceError::RequestChannelDisconnected { operation: "watch" }
		})
	}

	fn enqueue_unwatch(&self) -> Result<(), DirectoryWatchServiceError> {
		self.watch_tx.send(WatchRequest::Unwatch).map_err(|err| {
			error!("enqueue_unwatch failed: watch request channel is disconnected: {}", err);
			DirectoryWatchServiceError::RequestChannelDisconnected { operation: "unwatch" }
		})
	}
}

impl DirectoryWatcherState {
	pub fn new(event_tx: flume::Sender<AppAction>) -> Self {
		let (watch_tx, watch_rx) = flume::unbounded();
		Self { watch_tx, watch_rx, event_tx }
	}

	pub fn start(&self) {
		let watch_rx = self.watch_rx.clone();
		let event_tx = self.event_tx.clone();
		thread::spawn(move || Self::run(watch_rx, event_tx));
	}

	fn run(watch_rx: flume::Receiver<WatchRequest>, event_tx: flume::Sender<AppAction>) {
		let (notify_tx, notify_rx) = std::sync::mpsc::channel();
		let mut watcher = match RecommendedWatcher::new(
			move |res| {
				let _ = notify_tx.send(res);
			},
			Config::default(),
		) {
			Ok(watcher) => watcher,
			Err(err) => {
				error!("directory watcher init failed: {}", err);
				return;
			}
		};

		// Requested path and its canonical form. Notifications carry the requested one.
		let mut watched: Option<(PathBuf, PathBuf)> = None;
		let mut pending_since: Option<Instant> = None;

		loop {
			match watch_rx.recv_timeout(Duration::from_millis(50)) {
				Ok(request) => Self::apply_watch_request(request, &mut watcher, &mut watched),
				Err(flume::RecvTimeoutError::Timeout) => {}
				Err(flume::RecvTimeoutError::Disconnected) => break,
			}

			let mut changed = false;
			for result in notify_rx.try_iter() {
				let event = match result {
					Ok(event) => event,
					Err(err) => {
						error!("directory watcher event error: {}", err);
						continue;
					}
				};
				if matches!(event.kind, EventKind::Access(_)) {
					continue;
				}
				let Some((_, target)) = watched.as_ref() else {
					continue;
				};
				changed |= event.paths.iter().any(|path| Self::is_inside(target, path));
			}
			if changed && pending_since.is_none() {
				pending_since = Some(Instant::now());
			}
			if pending_since.is_none_or(|since| since.elapsed() < COALESCE_WINDOW) {
				continue;
			}
			pending_since = None;
			let Some((path, _)) = watched.as_ref() else {
				continue;
			};
			debug!("directory changed: {}", path.display());
			let action = AppAction::Workspace(WorkspaceAction::DirectoryChanged { path: path.clone() });
			if event_tx.send(action).is_err() {
				return;
			}
		}
	}

	fn apply_watch_request(
		request: WatchRequest,
		watcher: &mut RecommendedWatcher,
		watched: &mut Option<(PathBuf, PathBuf)>,
	) {
		if let Some((_, target)) = watched.take()
			&& let Err(err) = watcher.unwatch(&target)
		{
			error!("directory watcher unwatch failed: path={} error={}", target.display(), err);
		}
		let WatchRequest::Watch { path } = request else {
			return;
		};
		let target = Self::normalize_watch_path(&path);
		if let Err(err) = watcher.watch(&target, RecursiveMode::NonRecursive) {
			error!("directory watcher watch failed: path={} error={}", target.display(), err);
			return;
		}
		*watched = Some((path, target));
	}

	/// Direct children and the directory itself count; deeper paths do not.
	fn is_inside(target: &Path, path: &Path) -> bool {
		let path = Self::normalize_watch_path(path);
		path == target || path.parent() == Some(target)
	}

	fn normalize_watch_path(path: &Path) -> PathBuf {
		let absolute = if path.is_absolute() {
			path.to_path_buf()
		} else {
			std::env::current_dir().map(|cwd| cwd.join(path)).unwrap_or_else(|_| path.to_path_buf())
		};
		std::fs::canonicalize(&absolute).unwrap_or(absolute)
	}
}

enum WatchRequest {
	Watch { path: PathBuf },
	Unwatch,
}

#[cfg(test)]
mod tests {
	use std::{fs, path::Path, time::Duration};

	use xds_kernel::{
		action::{AppAction, WorkspaceAction},
		ports::DirectoryWatch,
	};

	use super::{DirectoryWatcherImpl, DirectoryWatcherState};

	struct Deps(DirectoryWatcherState);

	impl AsRef<DirectoryWatcherState> for Deps {
		fn as_ref(&self) -> &DirectoryWatcherState {
			&self.0
		}
	}

	#[test]
	fn is_inside_should_accept_direct_children_only() {
		let target = Path::new("/tmp/xds-watch-does-not-exist");

		assert!(DirectoryWatcherState::is_inside(target, &target.join("a.txt")));
		assert!(DirectoryWatcherState::is_inside(target, target));
		assert!(!DirectoryWatcherState::is_inside(target, &target.join("nested/a.txt")));
	}

	#[test]
	fn creating_a_file_should_notify_watched_directory() {
		let dir = tempfile::tempdir().expect("tempdir");
		let (event_tx, event_rx) = flume::unbounded();
		let deps = Deps(DirectoryWatcherState::new(event_tx));
		deps.0.start();
		DirectoryWatcherImpl::inj_ref(&deps).enqueue_watch(dir.path().to_path_buf()).expect("watch");
		std::thread::sleep(Duration::from_millis(200));

		fs::write(dir.path().join("fresh.txt"), "x").expect("write");

		match event_rx.recv_timeout(Duration::from_secs(5)).expect("notification") {
			AppAction::Workspace(WorkspaceAction::DirectoryChanged { path }) => assert_eq!(path, dir.path()),
			other => panic!("unexpected action: {:?}", other),
		}
	}
}
