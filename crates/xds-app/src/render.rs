use std::io::{self, Write};

use xds_kernel::{
	git::GitFileStatus,
	media::preview_locator,
	state::{FileState, Prompt, SessionState},
	terminal::OutputStream,
};

use crate::console::{HELP, View};

/// Line-oriented view of the session. Prints only what changed since the previous frame.
#[derive(Debug, Default)]
pub struct Renderer {
	terminal_mark: u64,
	last_status:   String,
	last_prompt:   Option<Prompt>,
}

impl Renderer {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn render<W: Write>(&mut self, state: &mut SessionState, out: &mut W) -> io::Result<()> {
		for line in state.terminal.output_since(self.terminal_mark) {
			match line.stream {
				OutputStream::Stderr => writeln!(out, "  ! {}", line.text)?,
				_ => writeln!(out, "  | {}", line.text)?,
			}
		}
		self.terminal_mark = state.terminal.written();

		for alert in state.drain_alerts() {
			writeln!(out, "error: {}", alert)?;
		}
		if state.prompt != self.last_prompt {
			if let Some(prompt) = &state.prompt {
				writeln!(out, "? {} [y]es / [n]o / [c]ancel", prompt.message())?;
			}
			self.last_prompt = state.prompt.clone();
		}
		if state.status_bar.message != self.last_status {
			if !state.status_bar.message.is_empty() {
				writeln!(out, "-- {}", state.status_bar.message)?;
			}
			self.last_status = state.status_bar.message.clone();
		}
		out.flush()
	}

	pub fn render_view<W: Write>(&self, view: View, state: &SessionState, out: &mut W) -> io::Result<()> {
		match view {
			View::Listing => render_listing(state, out)?,
			View::Tabs => render_tabs(state, out)?,
			View::File => render_file(state, out)?,
			View::Terminal => {
				for line in state.terminal.output() {
					writeln!(out, "  | {}", line.text)?;
				}
				if let Some(command) = state.terminal.running_command() {
					writeln!(out, "(running: {})", command)?;
				}
			}
			View::Settings => writeln!(out, "{:#?}", state.settings)?,
			View::Help => writeln!(out, "{}", HELP)?,
		}
		out.flush()
	}
}

fn render_listing<W: Write>(state: &SessionState, out: &mut W) -> io::Result<()> {
	let Some(current) = state.directory.current() else {
		return writeln!(out, "(no folder open)");
	};
	writeln!(out, "{}", current.display())?;
	if state.directory.can_go_up() {
		writeln!(out, "    ../")?;
	}
	for entry in state.directory.entries() {
		let marker = match state.git.status_for(&entry.path) {
			Some(GitFileStatus::Untracked) => '?',
			Some(GitFileStatus::Modified) => 'M',
			Some(GitFileStatus::Staged) => 'A',
			Some(GitFileStatus::Unmodified) | None => ' ',
		};
		if entry.is_directory {
			writeln!(out, "  {} {}/", marker, entry.name)?;
		} else {
			writeln!(out, "  {} {} ({} bytes)", marker, entry.name, entry.size)?;
		}
	}
	Ok(())
}

fn render_tabs<W: Write>(state: &SessionState, out: &mut W) -> io::Result<()> {
	if state.tabs.is_empty() {
		return writeln!(out, "(no tabs)");
	}
	for (index, tab) in state.tabs.iter().enumerate() {
		let active = if state.active.as_deref() == Some(tab.path.as_path()) { '>' } else { ' ' };
		let marker = match state.file_state(&tab.path) {
			Some(FileState::Dirty) => " *",
			Some(FileState::Saving) => " (saving)",
			Some(FileState::Media) => " (preview)",
			Some(FileState::Clean) | None => "",
		};
		writeln!(out, "{} {}. {}{}", active, index + 1, tab.name, marker)?;
	}
	Ok(())
}

fn render_file<W: Write>(state: &SessionState, out: &mut W) -> io::Result<()> {
	let Some(tab) = state.active_file() else {
		return writeln!(out, "(no file open)");
	};
	if tab.kind.is_media() {
		return writeln!(out, "[{:?} preview] {}", tab.kind, preview_locator(&tab.path));
	}
	for (number, line) in state.file_content().lines().enumerate() {
		writeln!(out, "{:>4} {}", number + 1, line)?;
	}
	Ok(())
}
