pub mod app;

mod autosave_timer;
mod boilerplate;
mod console;
mod render;

pub use app::App;
