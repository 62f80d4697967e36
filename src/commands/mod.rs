mod common;
mod init;
mod join;
mod render;

pub use init::{InitArgs, init_config};
pub use join::{JoinArgs, process_join};
pub use render::{RenderArgs, process_render};
