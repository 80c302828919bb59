pub mod config;
pub mod console;
pub mod controller;
pub mod screen;

pub use config::AppConfig;
pub use controller::{GameController, InputEvent, InputKey, InputType};
pub use screen::Screen;
