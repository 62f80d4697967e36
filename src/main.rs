//! A tool to join county cancer-risk data with USA map centroids and compute risk scatter overlays.
//!
//! # Overview
//!
//! `riskmap` takes two tabular datasets (a cancer-risk-by-county table and a
//! USA-county-geometry table with county centers) and joins them on their shared
//! FIPS code. The joined table is written as CSV; keys present in one table but
//! missing from the other are reported, never silently dropped. A second command
//! turns the joined table into scatter-overlay geometry (point position, size,
//! and color) for drawing over a USA map image.
//!
//! FIPS codes churn over time: counties are created (Broomfield County, CO in
//! 2001), dissolved (Clifton Forge, VA before 2001), and renamed. Datasets
//! assembled at different times therefore never line up perfectly, and the
//! reconciliation report is how that mismatch is surfaced.
//!
//! # Basic Usage
//!
//! **Join the two tables:**
//! ```bash
//! riskmap join --risk cancer_risk.csv --centers usa_counties.csv -o joined.csv
//! ```
//!
//! This writes the matched rows to `joined.csv` in risk-table order and prints a
//! reconciliation report listing both anomaly classes: risk rows whose FIPS code
//! is not on the map, and map FIPS codes absent from the risk data.
//!
//! **Fail scripted runs on anomalies:**
//! ```bash
//! riskmap join --risk cancer_risk.csv --centers usa_counties.csv -o joined.csv --check
//! ```
//!
//! **Compute the scatter overlay:**
//! ```bash
//! riskmap render --joined joined.csv --map USA_Counties_1000x634.png -o points.csv
//! ```
//!
//! Each point carries pixel coordinates rescaled from the reference coordinate
//! space to the map image's actual dimensions, an area proportional to county
//! population, and an RGBA color mapped from the log-transformed cancer risk.
//! Writing to a `.json` file emits the same points as JSON.
//!
//! **Limit to the highest-risk counties:**
//! ```bash
//! riskmap render --joined joined.csv --map USA_Counties_1000x634.png -o points.csv --top 500
//! ```
//!
//! # Configuration
//!
//! Column offsets, the reference coordinate space, the population-to-area scale,
//! and the risk color ramp all come from an optional configuration file
//! (`riskmap.[toml|yml|yaml|json]` in the working directory, or `--config`).
//! Generate a default file to start from:
//!
//! ```bash
//! riskmap init
//! ```
//!
//! Validation problems in a configuration file are printed as warnings and never
//! prevent execution.
//!
//! # Diagnostics
//!
//! Per-row anomalies are also emitted through the logger; tune verbosity with
//! `--log-level` (none, error, warn, info, debug, trace) or `RUST_LOG`.

use clap::builder::Styles;
use clap::builder::styling::{AnsiColor, Effects};
use clap::{Parser, Subcommand};
use riskmap::Result;

mod commands;

use crate::commands::{InitArgs, JoinArgs, RenderArgs, init_config, process_join, process_render};

const CLAP_STYLES: Styles = Styles::styled()
    .header(AnsiColor::Green.on_default().effects(Effects::BOLD))
    .usage(AnsiColor::Green.on_default().effects(Effects::BOLD))
    .literal(AnsiColor::Cyan.on_default().effects(Effects::BOLD))
    .placeholder(AnsiColor::Cyan.on_default());

#[derive(Parser, Debug)]
#[command(name = "riskmap", version, about)]
#[command(styles = CLAP_STYLES)]
struct Cli {
    #[command(subcommand)]
    command: RiskmapSubcommand,
}

#[derive(Subcommand, Debug)]
enum RiskmapSubcommand {
    /// Join the cancer-risk table with the county-centers table by FIPS code
    Join(JoinArgs),
    /// Compute scatter-overlay geometry for a joined table against a map image
    Render(RenderArgs),
    /// Generate a default configuration file
    Init(InitArgs),
}

fn main() -> Result<()> {
    match &Cli::parse().command {
        RiskmapSubcommand::Join(join_args) => process_join(join_args),
        RiskmapSubcommand::Render(render_args) => process_render(render_args),
        RiskmapSubcommand::Init(init_args) => init_config(init_args),
    }
}
