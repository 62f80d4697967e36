use camino::Utf8PathBuf;
use clap::Parser;
use ohno::bail;
use riskmap::Result;
use riskmap::config::Config;

#[derive(Parser, Debug)]
pub struct InitArgs {
    /// Path of the configuration file to create
    #[arg(value_name = "PATH", default_value = "riskmap.toml")]
    pub path: Utf8PathBuf,

    /// Overwrite an existing file
    #[arg(long)]
    pub force: bool,
}

pub fn init_config(args: &InitArgs) -> Result<()> {
    if args.path.exists() && !args.force {
        bail!("{} already exists, pass --force to overwrite", args.path);
    }

    Config::default().save(&args.path)?;
    println!("Wrote default configuration to {}", args.path);
    Ok(())
}
