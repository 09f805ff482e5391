use std::path::{Path, PathBuf};

use xds_infra_file_io::FileIoImpl;
use xds_infra_file_watcher::DirectoryWatcherImpl;
use xds_infra_persistence::SettingsStoreImpl;
use xds_infra_process::ProcessHostImpl;
use xds_kernel::{
	action::FileMutation,
	ports::{
		AutosaveTimer, DirectoryWatch, DirectoryWatchServiceError, FileIo, FileIoServiceError, ProcessHost,
		ProcessServiceError, SettingsStore, SettingsStoreError, TimerCommand,
	},
	settings::AppSettings,
};

use crate::{app::Services, autosave_timer::AutosaveTimerImpl};

impl FileIo for Services {
	fn enqueue_list(&self, path: PathBuf) -> Result<(), FileIoServiceError> {
		FileIoImpl::inj_ref(self).enqueue_list(path)
	}

	fn enqueue_binary_check(&self, path: PathBuf) -> Result<(), FileIoServiceError> {
		FileIoImpl::inj_ref(self).enqueue_binary_check(path)
	}

	fn enqueue_read(&self, path: PathBuf) -> Result<(), FileIoServiceError> {
		FileIoImpl::inj_ref(self).enqueue_read(path)
	}

	fn enqueue_save(&self, path: PathBuf, text: String, revision: u64) -> Result<(), FileIoServiceError> {
		FileIoImpl::inj_ref(self).enqueue_save(path, text, revision)
	}

	fn enqueue_mutation(&self, mutation: FileMutation) -> Result<(), FileIoServiceError> {
		FileIoImpl::inj_ref(self).enqueue_mutation(mutation)
	}
}

impl DirectoryWatch for Services {
	fn enqueue_watch(&self, path: PathBuf) -> Result<(), DirectoryWatchServiceError> {
		DirectoryWatcherImpl::inj_ref(self).enqueue_watch(path)
	}

	fn enqueue_unwatch(&self) -> Result<(), DirectoryWatchServiceError> {
		DirectoryWatcherImpl::inj_ref(self).enqueue_unwatch()
	}
}

impl ProcessHost for Services {
	fn spawn_command(&self, command: String, cwd: Option<PathBuf>) -> Result<(), ProcessServiceError> {
		ProcessHostImpl::inj_ref(self).spawn_command(command, cwd)
	}

	fn stop_command(&self) -> Result<(), ProcessServiceError> {
		ProcessHostImpl::inj_ref(self).stop_command()
	}

	fn enqueue_git_status(&self, root: PathBuf) -> Result<(), ProcessServiceError> {
		ProcessHostImpl::inj_ref(self).enqueue_git_status(root)
	}

	fn open_in_file_manager(&self, path: &Path) -> Result<(), ProcessServiceError> {
		ProcessHostImpl::inj_ref(self).open_in_file_manager(path)
	}

	fn run_executable(&self, path: &Path) -> Result<(), ProcessServiceError> {
		ProcessHostImpl::inj_ref(self).run_executable(path)
	}
}

impl AutosaveTimer for Services {
	fn rearm(&self, command: TimerCommand) {
		AutosaveTimerImpl::inj_ref(self).rearm(command)
	}
}

impl SettingsStore for Services {
	fn load_settings(&self) -> Result<AppSettings, SettingsStoreError> {
		SettingsStoreImpl::inj_ref(self).load_settings()
	}

	fn save_settings(&self, settings: &AppSettings) -> Result<(), SettingsStoreError> {
		SettingsStoreImpl::inj_ref(self).save_settings(settings)
	}
}
