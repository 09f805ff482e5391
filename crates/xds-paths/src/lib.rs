use std::path::PathBuf;

const APP_DIR_NAME: &str = "xds-code";

pub fn user_log_dir() -> PathBuf {
	#[cfg(target_os = "windows")]
	{
		std::env::var_os("LOCALAPPDATA")
			.map(PathBuf::from)
			.unwrap_or_else(std::env::temp_dir)
			.join(APP_DIR_NAME)
			.join("logs")
	}

	#[cfg(target_os = "macos")]
	{
		home_dir().join("Library").join("Logs").join(APP_DIR_NAME)
	}

	#[cfg(all(unix, not(target_os = "macos")))]
	{
		if let Some(state_home) = std::env::var_os("XDG_STATE_HOME").map(PathBuf::from) {
			return state_home.join(APP_DIR_NAME).join("logs");
		}
		home_dir().join(".local").join("state").join(APP_DIR_NAME).join("logs")
	}
}

/// Directory holding `settings.json`.
pub fn user_config_dir() -> PathBuf {
	#[cfg(target_os = "windows")]
	{
		std::env::var_os("APPDATA")
			.map(PathBuf::from)
			.unwrap_or_else(std::env::temp_dir)
			.join(APP_DIR_NAME)
	}

	#[cfg(target_os = "macos")]
	{
		home_dir().join("Library").join("Application Support").join(APP_DIR_NAME)
	}

	#[cfg(all(unix, not(target_os = "macos")))]
	{
		if let Some(config_home) = std::env::var_os("XDG_CONFIG_HOME").map(PathBuf::from) {
			return config_home.join(APP_DIR_NAME);
		}
		home_dir().join(".config").join(APP_DIR_NAME)
	}
}

pub fn settings_file() -> PathBuf {
	user_config_dir().join("settings.json")
}

#[cfg(unix)]
fn home_dir() -> PathBuf {
	std::env::var_os("HOME").map(PathBuf::from).unwrap_or_else(std::env::temp_dir)
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn settings_file_should_live_in_config_dir() {
		let file = settings_file();
		assert_eq!(file.parent(), Some(user_config_dir().as_path()));
		assert_eq!(file.file_name().and_then(|name| name.to_str()), Some("settings.json"));
	}

	#[test]
	fn log_dir_should_be_namespaced_by_app() {
		let dir = user_log_dir();
		assert!(dir.components().any(|part| part.as_os_str() == APP_DIR_NAME));
	}
}
