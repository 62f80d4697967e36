use super::common::{Common, CommonArgs};
use camino::Utf8PathBuf;
use clap::Parser;
use riskmap::Result;
use riskmap::render::{compute_scatter, probe_dimensions, write_points};
use riskmap::table::read_table;

#[derive(Parser, Debug)]
pub struct RenderArgs {
    /// Joined CSV file produced by the join command
    #[arg(long, value_name = "PATH")]
    pub joined: Utf8PathBuf,

    /// USA map image (PNG) the points are placed on
    #[arg(long, value_name = "PATH")]
    pub map: Utf8PathBuf,

    /// Output file for the scatter points (.csv or .json)
    #[arg(long, short = 'o', value_name = "PATH")]
    pub out: Utf8PathBuf,

    /// Only render the N highest-risk counties [default: all counties]
    #[arg(long, value_name = "N")]
    pub top: Option<usize>,

    #[command(flatten)]
    pub common: CommonArgs,
}

pub fn process_render(args: &RenderArgs) -> Result<()> {
    let common = Common::new(&args.common)?;

    let table = read_table(&args.joined)?;
    let (width, height) = probe_dimensions(&args.map)?;

    let points = compute_scatter(&table, &common.config, width, height, args.top)?;
    write_points(&points, &args.out)?;

    println!("{} scatter point(s) written to {} ({width}x{height} map)", points.len(), args.out);
    Ok(())
}
