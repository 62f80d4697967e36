use super::common::{Common, CommonArgs};
use camino::Utf8PathBuf;
use clap::Parser;
use ohno::bail;
use riskmap::Result;
use riskmap::join::{build_index, join};
use riskmap::reports::generate_console;
use riskmap::table::{read_table, write_table};

#[derive(Parser, Debug)]
pub struct JoinArgs {
    /// CSV file with cancer-risk rows (the primary table)
    #[arg(long, value_name = "PATH")]
    pub risk: Utf8PathBuf,

    /// CSV file with county centers (the secondary table)
    #[arg(long, value_name = "PATH")]
    pub centers: Utf8PathBuf,

    /// Output CSV file for the joined rows
    #[arg(long, short = 'o', value_name = "PATH")]
    pub out: Utf8PathBuf,

    /// Exit with failure if any key fails to reconcile
    #[arg(long)]
    pub check: bool,

    #[command(flatten)]
    pub common: CommonArgs,
}

pub fn process_join(args: &JoinArgs) -> Result<()> {
    let common = Common::new(&args.common)?;

    let risk_table = read_table(&args.risk)?;
    let centers_table = read_table(&args.centers)?;

    let index = build_index(&centers_table, common.config.centers_fips_column)?;
    let outcome = join(&risk_table, &index, common.config.risk_fips_column)?;

    // Only matched rows go to the output file; anomalies go to the console.
    write_table(&outcome.joined, &args.out)?;

    let mut report = String::new();
    generate_console(&outcome, common.color, &mut report)?;
    print!("{report}");

    if args.check && !outcome.is_clean() {
        bail!(
            "reconciliation check failed: {} unmatched primary row(s), {} orphaned secondary key(s)",
            outcome.unmatched_primary.len(),
            outcome.unmatched_index.len()
        );
    }

    Ok(())
}
