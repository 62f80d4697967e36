//! Small shared types.

use clap::ValueEnum;

/// Controls when console output uses color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ColorMode {
    /// Color when stdout is a terminal
    Auto,
    /// Always emit color
    Always,
    /// Never emit color
    Never,
}
