use std::{
	path::{Path, PathBuf},
	time::Duration,
};

use crate::ports::TimerCommand;

/// Decides when the single autosave timer has to be torn down and recreated.
///
/// The timer is armed while autosave is enabled and an editable file is active. Any change of the
/// enabled flag, the interval or the target bumps the generation, so ticks from an older timer
/// are rejected.
#[derive(Debug, Default)]
pub struct AutosaveScheduler {
	enabled:    bool,
	interval:   Duration,
	target:     Option<PathBuf>,
	generation: u64,
	armed:      bool,
}

impl AutosaveScheduler {
	pub fn generation(&self) -> u64 {
		self.generation
	}

	pub fn is_armed(&self) -> bool {
		self.armed
	}

	pub fn target(&self) -> Option<&Path> {
		self.target.as_deref()
	}

	/// Returns the timer command to issue, or `None` when the live timer is still right.
	pub fn reconcile(
		&mut self,
		enabled: bool,
		interval: Duration,
		target: Option<&Path>,
	) -> Option<TimerCommand> {
		let unchanged =
			self.enabled == enabled && self.interval == interval && self.target.as_deref() == target;
		if unchanged {
			return None;
		}
		self.enabled = enabled;
		self.interval = interval;
		self.target = target.map(Path::to_path_buf);

		let should_arm = enabled && target.is_some() && !interval.is_zero();
		if should_arm {
			self.generation = self.generation.wrapping_add(1);
			self.armed = true;
			return Some(TimerCommand::Arm { generation: self.generation, interval });
		}
		if self.armed {
			self.generation = self.generation.wrapping_add(1);
			self.armed = false;
			return Some(TimerCommand::Disarm);
		}
		None
	}

	/// Path to save for a tick of `generation`, if that tick belongs to the live timer.
	pub fn accept_tick(&self, generation: u64) -> Option<&Path> {
		if !self.armed || generation != self.generation {
			return None;
		}
		self.target.as_deref()
	}
}
