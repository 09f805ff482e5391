use std::path::Path;

const IMAGE_EXTENSIONS: &[&str] = &["png", "ico", "jpg", "jpeg", "gif", "webp", "svg"];
const VIDEO_EXTENSIONS: &[&str] = &["mp4", "webm", "ogg", "mov"];

/// How a tab presents its file. Media tabs are previews and never take edits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileKind {
	Text,
	Image,
	Video,
}

impl FileKind {
	pub fn classify(name: &str) -> Self {
		let Some(extension) = name.rsplit_once('.').map(|(_, ext)| ext.to_ascii_lowercase()) else {
			return Self::Text;
		};
		if IMAGE_EXTENSIONS.contains(&extension.as_str()) {
			Self::Image
		} else if VIDEO_EXTENSIONS.contains(&extension.as_str()) {
			Self::Video
		} else {
			Self::Text
		}
	}

	pub fn is_media(self) -> bool {
		matches!(self, Self::Image | Self::Video)
	}
}

/// Locator the web-view shell resolves to the raw file for image/video previews.
pub fn preview_locator(path: &Path) -> String {
	format!("asset://localhost/{}", path.display())
}
