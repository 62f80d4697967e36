#[expect(clippy::module_inception, reason = "Module is named after the struct it holds")]
mod config;

pub use config::{Color, Config};
