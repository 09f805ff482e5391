mod fs_ops;
mod service;

pub use service::{FileIoImpl, FileIoState};
