#![deny(warnings)]
pub mod error;
pub mod game;
pub mod model;

pub struct AppInfo;

impl AppInfo {
    pub const fn name() -> &'static str {
        "twentyq"
    }

    pub const fn codename() -> &'static str {
        "Pocket Oracle"
    }

    pub const fn version() -> &'static str {
        env!("CARGO_PKG_VERSION")
    }
}
