use std::path::{Path, PathBuf};

use super::common::{Harness, Request};
use crate::{
	action::{AppAction, TabAction},
	state::{OpenFile, TabRegistry},
};

#[test]
fn distinct_opens_should_append_in_order() {
	let mut harness = Harness::opened();

	harness.open_text("/proj/main.ts", "let a = 1;");
	harness.open_text("/proj/util.ts", "export {}");

	let paths: Vec<_> = harness.state.tabs.iter().map(|tab| tab.path.clone()).collect();
	assert_eq!(paths, vec![PathBuf::from("/proj/main.ts"), PathBuf::from("/proj/util.ts")]);
	assert_eq!(harness.active(), Some(Path::new("/proj/util.ts")));
	assert_eq!(harness.state.file_content(), "export {}");
}

#[test]
fn reopen_should_activate_existing_tab_without_reading() {
	let mut harness = Harness::opened();
	harness.open_text("/proj/main.ts", "let a = 1;");
	harness.open_text("/proj/util.ts", "export {}");
	harness.ports.take();

	harness.click("/proj/main.ts");

	assert_eq!(harness.state.tabs.len(), 2);
	assert_eq!(harness.active(), Some(Path::new("/proj/main.ts")));
	assert!(harness.state.pending_open.is_none());
	assert!(!harness.ports.take().iter().any(|request| matches!(request, Request::BinaryCheck(_))));
}

#[test]
fn registry_open_should_keep_first_content() {
	let mut tabs = TabRegistry::default();

	assert!(tabs.open(OpenFile::text("a.rs", "/p/a.rs", "old")));
	assert!(!tabs.open(OpenFile::text("a.rs", "/p/a.rs", "new")));

	assert_eq!(tabs.len(), 1);
	assert_eq!(tabs.get(Path::new("/p/a.rs")).map(|tab| tab.content.as_str()), Some("old"));
}

#[test]
fn closing_active_tab_should_fall_back_to_first_remaining() {
	let mut harness = Harness::opened();
	harness.open_text("/proj/main.ts", "main");
	harness.open_text("/proj/util.ts", "util");
	harness.open_text("/proj/a.out.bin", "text after all");

	harness.apply(AppAction::Tab(TabAction::CloseActive));

	assert_eq!(harness.state.tabs.len(), 2);
	assert_eq!(harness.active(), Some(Path::new("/proj/main.ts")));
	assert_eq!(harness.state.file_content(), "main");
}

#[test]
fn closing_inactive_tab_should_keep_active() {
	let mut harness = Harness::opened();
	harness.open_text("/proj/main.ts", "main");
	harness.open_text("/proj/util.ts", "util");

	harness.apply(AppAction::Tab(TabAction::Close { path: PathBuf::from("/proj/main.ts") }));

	assert_eq!(harness.state.tabs.len(), 1);
	assert_eq!(harness.active(), Some(Path::new("/proj/util.ts")));
}

#[test]
fn closing_last_tab_should_clear_active_and_content() {
	let mut harness = Harness::opened();
	harness.open_text("/proj/main.ts", "main");

	harness.apply(AppAction::Tab(TabAction::CloseActive));

	assert!(harness.state.tabs.is_empty());
	assert_eq!(harness.active(), None);
	assert_eq!(harness.state.file_content(), "");
}

#[test]
fn closing_unknown_tab_should_change_nothing() {
	let mut harness = Harness::opened();
	harness.open_text("/proj/main.ts", "main");

	harness.apply(AppAction::Tab(TabAction::Close { path: PathBuf::from("/proj/nope.ts") }));

	assert_eq!(harness.state.tabs.len(), 1);
	assert_eq!(harness.active(), Some(Path::new("/proj/main.ts")));
}

#[test]
fn activate_unknown_tab_should_be_rejected() {
	let mut harness = Harness::opened();
	harness.open_text("/proj/main.ts", "main");

	harness.apply(AppAction::Tab(TabAction::Activate { path: PathBuf::from("/proj/nope.ts") }));

	assert_eq!(harness.active(), Some(Path::new("/proj/main.ts")));
}
