#![warn(clippy::all, rust_2018_idioms)]

mod app;
pub mod controller;
pub mod session;

pub use app::config::Config;
pub use app::status::StatusBar;
pub use app::EguiApp;
pub use controller::Controller;
pub use session::{AppError, AppResult, Session};
