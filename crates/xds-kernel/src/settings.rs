use std::{ops::RangeInclusive, time::Duration};

use serde::{Deserialize, Serialize};

const EDITOR_FONT_SIZE_RANGE: RangeInclusive<i32> = 10..=24;
const TERMINAL_FONT_SIZE_RANGE: RangeInclusive<i32> = 10..=18;
const SIDEBAR_WIDTH_RANGE: RangeInclusive<i32> = 180..=400;
const AUTO_SAVE_INTERVAL_RANGE: RangeInclusive<i32> = 1000..=30000;

/// Persisted editor preferences. Field names are the on-disk JSON keys.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppSettings {
	pub editor_font_size:         i32,
	pub editor_word_wrap:         bool,
	pub editor_minimap:           bool,
	pub editor_line_numbers:      bool,
	pub editor_render_whitespace: bool,
	pub terminal_font_size:       i32,
	pub sidebar_width:            i32,
	pub auto_save_enabled:        bool,
	/// Milliseconds between autosave ticks.
	pub auto_save_interval:       i32,
	pub theme:                    String,
}

impl Default for AppSettings {
	fn default() -> Self {
		Self {
			editor_font_size:         14,
			editor_word_wrap:         true,
			editor_minimap:           false,
			editor_line_numbers:      true,
			editor_render_whitespace: false,
			terminal_font_size:       13,
			sidebar_width:            240,
			auto_save_enabled:        false,
			auto_save_interval:       5000,
			theme:                    "dark".to_string(),
		}
	}
}

impl AppSettings {
	/// Pulls every numeric field back into the range the settings panel allows.
	pub fn clamped(mut self) -> Self {
		self.editor_font_size = clamp(self.editor_font_size, &EDITOR_FONT_SIZE_RANGE);
		self.terminal_font_size = clamp(self.terminal_font_size, &TERMINAL_FONT_SIZE_RANGE);
		self.sidebar_width = clamp(self.sidebar_width, &SIDEBAR_WIDTH_RANGE);
		self.auto_save_interval = clamp(self.auto_save_interval, &AUTO_SAVE_INTERVAL_RANGE);
		if self.theme.trim().is_empty() {
			self.theme = Self::default().theme;
		}
		self
	}

	pub fn auto_save_interval(&self) -> Duration {
		Duration::from_millis(clamp(self.auto_save_interval, &AUTO_SAVE_INTERVAL_RANGE) as u64)
	}
}

fn clamp(value: i32, range: &RangeInclusive<i32>) -> i32 {
	value.clamp(*range.start(), *range.end())
}
