use std::collections::VecDeque;

const MAX_OUTPUT_LINES: usize = 5000;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputStream {
	Stdout,
	Stderr,
	/// Echo of the submitted command line.
	Echo,
	/// Local notices such as exit codes.
	Status,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TerminalLine {
	pub stream: OutputStream,
	pub text:   String,
}

/// Client-side terminal model: line-buffered input with history, plus streamed output.
#[derive(Debug, Default)]
pub struct TerminalState {
	input:          String,
	draft:          String,
	history:        Vec<String>,
	history_cursor: Option<usize>,
	output:         VecDeque<TerminalLine>,
	written:        u64,
	running:        Option<String>,
}

impl TerminalState {
	pub fn input(&self) -> &str {
		&self.input
	}

	pub fn history(&self) -> &[String] {
		&self.history
	}

	pub fn output(&self) -> impl Iterator<Item = &TerminalLine> {
		self.output.iter()
	}

	/// Number of lines ever pushed, including ones already evicted.
	pub fn written(&self) -> u64 {
		self.written
	}

	/// Lines pushed after the `mark` taken from [`Self::written`] that are still retained.
	pub fn output_since(&self, mark: u64) -> impl Iterator<Item = &TerminalLine> {
		let fresh = self.written.saturating_sub(mark).min(self.output.len() as u64) as usize;
		self.output.iter().skip(self.output.len() - fresh)
	}

	pub fn running_command(&self) -> Option<&str> {
		self.running.as_deref()
	}

	pub fn is_running(&self) -> bool {
		self.running.is_some()
	}

	pub fn insert_char(&mut self, ch: char) {
		self.history_cursor = None;
		self.input.push(ch);
	}

	pub fn insert_str(&mut self, text: &str) {
		self.history_cursor = None;
		self.input.push_str(text);
	}

	pub fn clear_input(&mut self) {
		self.history_cursor = None;
		self.input.clear();
	}

	pub fn backspace(&mut self) {
		self.history_cursor = None;
		self.input.pop();
	}

	pub fn history_prev(&mut self) {
		if self.history.is_empty() {
			return;
		}
		let next_cursor = match self.history_cursor {
			None => {
				self.draft = std::mem::take(&mut self.input);
				self.history.len() - 1
			}
			Some(cursor) => cursor.saturating_sub(1),
		};
		self.history_cursor = Some(next_cursor);
		self.input = self.history[next_cursor].clone();
	}

	pub fn history_next(&mut self) {
		let Some(cursor) = self.history_cursor else {
			return;
		};
		if cursor + 1 >= self.history.len() {
			self.history_cursor = None;
			self.input = std::mem::take(&mut self.draft);
			return;
		}
		self.history_cursor = Some(cursor + 1);
		self.input = self.history[cursor + 1].clone();
	}

	/// Takes the current line for execution. Blank lines are dropped and never enter history.
	pub fn take_submission(&mut self) -> Option<String> {
		self.history_cursor = None;
		self.draft.clear();
		let line = std::mem::take(&mut self.input);
		let command = line.trim();
		if command.is_empty() {
			return None;
		}
		if self.history.last().map(String::as_str) != Some(command) {
			self.history.push(command.to_string());
		}
		Some(command.to_string())
	}

	pub fn mark_started(&mut self, command: String) {
		self.push_output(OutputStream::Echo, format!("$ {}", command));
		self.running = Some(command);
	}

	pub fn mark_finished(&mut self) -> Option<String> {
		self.running.take()
	}

	pub fn push_output(&mut self, stream: OutputStream, text: String) {
		if self.output.len() >= MAX_OUTPUT_LINES {
			self.output.pop_front();
		}
		self.output.push_back(TerminalLine { stream, text });
		self.written += 1;
	}

	pub fn clear_output(&mut self) {
		self.output.clear();
	}
}

#[cfg(test)]
mod tests {
	use super::{OutputStream, TerminalState};

	fn type_line(terminal: &mut TerminalState, line: &str) {
		terminal.insert_str(line);
	}

	#[test]
	fn submission_should_trim_and_record_history_without_consecutive_duplicates() {
		let mut terminal = TerminalState::default();
		type_line(&mut terminal, "  ls -la ");
		assert_eq!(terminal.take_submission().as_deref(), Some("ls -la"));
		type_line(&mut terminal, "ls -la");
		assert_eq!(terminal.take_submission().as_deref(), Some("ls -la"));
		assert_eq!(terminal.history(), ["ls -la".to_string()]);
		assert_eq!(terminal.input(), "");
	}

	#[test]
	fn blank_submission_should_be_dropped() {
		let mut terminal = TerminalState::default();
		type_line(&mut terminal, "   ");
		assert_eq!(terminal.take_submission(), None);
		assert!(terminal.history().is_empty());
	}

	#[test]
	fn history_navigation_should_walk_back_and_restore_draft() {
		let mut terminal = TerminalState::default();
		for command in ["git status", "cargo fmt"] {
			type_line(&mut terminal, command);
			terminal.take_submission();
		}
		type_line(&mut terminal, "ech");

		terminal.history_prev();
		assert_eq!(terminal.input(), "cargo fmt");
		terminal.history_prev();
		assert_eq!(terminal.input(), "git status");
		terminal.history_prev();
		assert_eq!(terminal.input(), "git status");

		terminal.history_next();
		assert_eq!(terminal.input(), "cargo fmt");
		terminal.history_next();
		assert_eq!(terminal.input(), "ech");
	}

	#[test]
	fn backspace_should_remove_last_char() {
		let mut terminal = TerminalState::default();
		terminal.insert_char('l');
		terminal.insert_char('s');
		terminal.backspace();
		assert_eq!(terminal.input(), "l");
	}

	#[test]
	fn mark_started_should_echo_command() {
		let mut terminal = TerminalState::default();
		terminal.mark_started("make".to_string());
		assert!(terminal.is_running());
		let line = terminal.output().next().expect("echo line");
		assert_eq!(line.stream, OutputStream::Echo);
		assert_eq!(line.text, "$ make");
		assert_eq!(terminal.mark_finished().as_deref(), Some("make"));
		assert!(!terminal.is_running());
	}

	#[test]
	fn output_since_should_return_lines_after_mark() {
		let mut terminal = TerminalState::default();
		terminal.push_output(OutputStream::Stdout, "one".to_string());
		let mark = terminal.written();
		terminal.push_output(OutputStream::Stdout, "two".to_string());
		terminal.push_output(OutputStream::Stderr, "three".to_string());

		let fresh: Vec<_> = terminal.output_since(mark).map(|line| line.text.as_str()).collect();
		assert_eq!(fresh, vec!["two", "three"]);
		assert_eq!(terminal.output_since(terminal.written()).count(), 0);
	}
}
