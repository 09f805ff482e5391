use std::{
	fs,
	io::ErrorKind,
	path::{Path, PathBuf},
};

use tracing::{debug, info};
use xds_kernel::{
	ports::{SettingsStore, SettingsStoreError},
	settings::AppSettings,
};

/// Settings persisted as pretty JSON in a single file.
#[derive(dep_inj::DepInj)]
#[target(SettingsStoreImpl)]
pub struct SettingsStoreState {
	path: PathBuf,
}

impl<Deps> SettingsStore for SettingsStoreImpl<Deps>
where Deps: AsRef<SettingsStoreState>
{
	fn load_settings(&self) -> Result<AppSettings, SettingsStoreError> {
		let path = self.path.as_path();
		let text = match fs::read_to_string(path) {
			Ok(text) => text,
			Err(source) if source.kind() == ErrorKind::NotFound => {
				debug!("settings file missing, using defaults: {}", path.display());
				return Ok(AppSettings::default());
			}
			Err(source) => return Err(SettingsStoreError::Read { path: path.to_path_buf(), source }),
		};
		let settings: AppSettings = serde_json::from_str(&text)
			.map_err(|source| SettingsStoreError::Parse { path: path.to_path_buf(), source: Box::new(source) })?;
		Ok(settings.clamped())
	}

	fn save_settings(&self, settings: &AppSettings) -> Result<(), SettingsStoreError> {
		let path = self.path.as_path();
		if let Some(parent) = path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
			fs::create_dir_all(parent)
				.map_err(|source| SettingsStoreError::CreateDir { path: parent.to_path_buf(), source })?;
		}
		let text = serde_json::to_string_pretty(settings)
			.map_err(|source| SettingsStoreError::Encode { source: Box::new(source) })?;
		fs::write(path, text).map_err(|source| SettingsStoreError::Write { path: path.to_path_buf(), source })?;
		info!("settings saved: {}", path.display());
		Ok(())
	}
}

impl SettingsStoreState {
	pub fn new(path: PathBuf) -> Self {
		Self { path }
	}

	/// Store at the per-user location, `<config dir>/settings.json`.
	pub fn at_default_location() -> Self {
		Self::new(xds_paths::settings_file())
	}

	pub fn path(&self) -> &Path {
		&self.path
	}
}

#[cfg(test)]
mod tests {
	use std::fs;

	use xds_kernel::{
		ports::{SettingsStore, SettingsStoreError},
		settings::AppSettings,
	};

	use super::{SettingsStoreImpl, SettingsStoreState};

	struct Deps(SettingsStoreState);

	impl AsRef<SettingsStoreState> for Deps {
		fn as_ref(&self) -> &SettingsStoreState {
			&self.0
		}
	}

	#[test]
	fn missing_file_should_load_defaults() {
		let dir = tempfile::tempdir().expect("tempdir");
		let deps = Deps(SettingsStoreState::new(dir.path().join("settings.json")));

		let settings = SettingsStoreImpl::inj_ref(&deps).load_settings().expect("load");

		assert_eq!(settings, AppSettings::default());
	}

	#[test]
	fn saved_settings_should_load_back_and_create_directories() {
		let dir = tempfile::tempdir().expect("tempdir");
		let deps = Deps(SettingsStoreState::new(dir.path().join("xds-code/settings.json")));
		let store = SettingsStoreImpl::inj_ref(&deps);
		let settings = AppSettings { theme: "light".to_string(), auto_save_enabled: true, ..AppSettings::default() };

		store.save_settings(&settings).expect("save");

		assert_eq!(store.load_settings().expect("load"), settings);
	}

	#[test]
	fn partial_file_should_fill_defaults_and_clamp() {
		let dir = tempfile::tempdir().expect("tempdir");
		let path = dir.path().join("settings.json");
		fs::write(&path, r#"{ "editor_font_size": 72, "theme": "light" }"#).expect("write");
		let deps = Deps(SettingsStoreState::new(path));

		let settings = SettingsStoreImpl::inj_ref(&deps).load_settings().expect("load");

		assert_eq!(settings.editor_font_size, 24);
		assert_eq!(settings.theme, "light");
		assert_eq!(settings.sidebar_width, AppSettings::default().sidebar_width);
	}

	#[test]
	fn malformed_file_should_report_parse_error() {
		let dir = tempfile::tempdir().expect("tempdir");
		let path = dir.path().join("settings.json");
		fs::write(&path, "{ not json").expect("write");
		let deps = Deps(SettingsStoreState::new(path));

		let err = SettingsStoreImpl::inj_ref(&deps).load_settings().expect_err("parse error");

		assert!(matches!(err, SettingsStoreError::Parse { .. }));
	}
}
