use std::{
	io::{self, BufRead},
	ops::ControlFlow,
	path::PathBuf,
	thread,
};

use anyhow::Context;
use tracing::{error, info, warn};
use xds_infra_file_io::FileIoState;
use xds_infra_file_watcher::DirectoryWatcherState;
use xds_infra_persistence::SettingsStoreState;
use xds_infra_process::ProcessHostState;
use xds_kernel::{
	action::{AppAction, SystemAction, WorkspaceAction},
	controller::SessionController,
	ports::SettingsStore,
	settings::AppSettings,
	state::SessionState,
};

use crate::{
	autosave_timer::AutosaveTimerState,
	console::{ConsoleCommand, View},
	render::Renderer,
};

/// Collaborator states the session talks to. Port impls live in `boilerplate.rs`.
#[derive(derive_more::AsRef)]
pub(crate) struct Services {
	#[as_ref]
	file_io:        FileIoState,
	#[as_ref]
	watcher:        DirectoryWatcherState,
	#[as_ref]
	process:        ProcessHostState,
	#[as_ref]
	settings_store: SettingsStoreState,
	#[as_ref]
	autosave_timer: AutosaveTimerState,
}

impl Services {
	fn start(event_tx: &flume::Sender<AppAction>, settings_store: SettingsStoreState) -> Self {
		let services = Self {
			file_io: FileIoState::new(event_tx.clone()),
			watcher: DirectoryWatcherState::new(event_tx.clone()),
			process: ProcessHostState::new(event_tx.clone()),
			settings_store,
			autosave_timer: AutosaveTimerState::new(event_tx.clone()),
		};
		services.file_io.start();
		services.watcher.start();
		services.process.start();
		services.autosave_timer.start();
		services
	}
}

enum Event {
	Action(AppAction),
	Line(String),
	InputClosed,
}

pub struct App {
	state:      SessionState,
	controller: SessionController,
	services:   Services,
	renderer:   Renderer,
	event_tx:   flume::Sender<AppAction>,
	event_rx:   flume::Receiver<AppAction>,
}

impl App {
	/// Starts the collaborator workers and loads settings from `settings_path`, or from the
	/// per-user location when `None`.
	pub fn new(settings_path: Option<PathBuf>) -> Self {
		let (event_tx, event_rx) = flume::bounded(1024);
		let settings_store = match settings_path {
			Some(path) => SettingsStoreState::new(path),
			None => SettingsStoreState::at_default_location(),
		};
		info!("settings file: {}", settings_store.path().display());
		let services = Services::start(&event_tx, settings_store);
		let settings = services.load_settings().unwrap_or_else(|err| {
			error!("load settings failed, using defaults: {:#}", anyhow::Error::new(err));
			AppSettings::default()
		});

		Self {
			state: SessionState::new(settings),
			controller: SessionController::new(),
			services,
			renderer: Renderer::new(),
			event_tx,
			event_rx,
		}
	}

	pub fn run(mut self, folder: Option<PathBuf>) -> anyhow::Result<()> {
		if let Some(path) = folder {
			self
				.event_tx
				.send(AppAction::Workspace(WorkspaceAction::OpenFolder { path }))
				.context("event bus disconnected")?;
		}
		let line_rx = Self::start_input_pump();
		println!("xds - type `help` for commands");

		loop {
			let event = flume::Selector::new()
				.recv(&self.event_rx, |result| result.map(Event::Action).ok())
				.recv(&line_rx, |result| Some(result.map(Event::Line).unwrap_or(Event::InputClosed)))
				.wait();
			let Some(event) = event else {
				error!("event bus disconnected while waiting for next action");
				break;
			};
			let flow = match event {
				Event::Action(action) => self.dispatch(action),
				Event::Line(line) => self.handle_line(&line)?,
				Event::InputClosed => self.dispatch(AppAction::System(SystemAction::Quit)),
			};
			self.renderer.render(&mut self.state, &mut io::stdout().lock()).context("write to stdout failed")?;
			if flow.is_break() {
				break;
			}
		}

		if !self.state.unsaved.is_empty() {
			warn!("exited with unsaved changes: {:?}", self.state.unsaved.paths().collect::<Vec<_>>());
		}
		Ok(())
	}

	fn dispatch(&mut self, action: AppAction) -> ControlFlow<()> {
		self.controller.apply(&mut self.state, &self.services, action)
	}

	fn handle_line(&mut self, line: &str) -> anyhow::Result<ControlFlow<()>> {
		let command = match ConsoleCommand::parse(line) {
			Ok(Some(command)) => command,
			Ok(None) => return Ok(ControlFlow::Continue(())),
			Err(err) => {
				println!("{}", err);
				return Ok(ControlFlow::Continue(()));
			}
		};
		if let ConsoleCommand::View(view) = command {
			self.render_view(view)?;
			return Ok(ControlFlow::Continue(()));
		}
		let actions = match command.into_actions(&self.state) {
			Ok(actions) => actions,
			Err(err) => {
				println!("{}", err);
				return Ok(ControlFlow::Continue(()));
			}
		};
		for action in actions {
			if self.dispatch(action).is_break() {
				return Ok(ControlFlow::Break(()));
			}
		}
		Ok(ControlFlow::Continue(()))
	}

	fn render_view(&self, view: View) -> anyhow::Result<()> {
		self.renderer.render_view(view, &self.state, &mut io::stdout().lock()).context("write to stdout failed")
	}

	fn start_input_pump() -> flume::Receiver<String> {
		let (line_tx, line_rx) = flume::unbounded();
		thread::spawn(move || {
			for line in io::stdin().lock().lines() {
				let line = match line {
					Ok(line) => line,
					Err(err) => {
						error!("input pump stopped: failed to read stdin: {}", err);
						break;
					}
				};
				if line_tx.send(line).is_err() {
					break;
				}
			}
		});
		line_rx
	}
}
