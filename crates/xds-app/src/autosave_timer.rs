use std::{thread, time::Duration};

use tracing::{debug, error};
use xds_kernel::{
	action::{AppAction, AutosaveAction},
	ports::{AutosaveTimer, TimerCommand},
};

/// Periodic tick source. Each `Arm` replaces the running period; ticks carry the generation they
/// were armed with.
#[derive(dep_inj::DepInj)]
#[target(AutosaveTimerImpl)]
pub struct AutosaveTimerState {
	command_tx: flume::Sender<TimerCommand>,
	command_rx: flume::Receiver<TimerCommand>,
	event_tx:   flume::Sender<AppAction>,
}

impl<Deps> AutosaveTimer for AutosaveTimerImpl<Deps>
where Deps: AsRef<AutosaveTimerState>
{
	fn rearm(&self, command: TimerCommand) {
		if let Err(err) = self.command_tx.send(command) {
			error!("rearm failed: timer channel is disconnected: {}", err);
		}
	}
}

impl AutosaveTimerState {
	pub fn new(event_tx: flume::Sender<AppAction>) -> Self {
		let (command_tx, command_rx) = flume::unbounded();
		Self { command_tx, command_rx, event_tx }
	}

	pub fn start(&self) {
		let command_rx = self.command_rx.clone();
		let event_tx = self.event_tx.clone();
		thread::spawn(move || Self::run(command_rx, event_tx));
	}

	fn run(command_rx: flume::Receiver<TimerCommand>, event_tx: flume::Sender<AppAction>) {
		let mut armed: Option<(u64, Duration)> = None;
		loop {
			let received = match armed {
				Some((_, interval)) => command_rx.recv_timeout(interval),
				None => command_rx.recv().map_err(|_| flume::RecvTimeoutError::Disconnected),
			};
			match received {
				Ok(TimerCommand::Arm { generation, interval }) => {
					debug!("autosave timer armed: generation={} interval={:?}", generation, interval);
					armed = Some((generation, interval));
				}
				Ok(TimerCommand::Disarm) => armed = None,
				Err(flume::RecvTimeoutError::Timeout) => {
					let Some((generation, _)) = armed else {
						continue;
					};
					if event_tx.send(AppAction::Autosave(AutosaveAction::Tick { generation })).is_err() {
						return;
					}
				}
				Err(flume::RecvTimeoutError::Disconnected) => break,
			}
		}
	}
}
