use std::path::PathBuf;

/// Migration-flow map tooling.
#[derive(clap::Parser, Debug)]
#[command(name = "flowmap", version, about, propagate_version = true)]
pub struct Cli {
    /// JSON configuration file; FLOWMAP_* environment variables still apply on top
    #[arg(long, global = true, value_hint = clap::ValueHint::FilePath)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(clap::Subcommand, Debug)]
pub enum Commands {
    /// Encode a record file into styled GeoJSON
    Encode(EncodeArgs),

    /// Query the flows of one commuting zone and encode them
    Fetch(FetchArgs),

    /// Print the neighborhood tables of an origin/destination pair
    Covariates(CovariateArgs),

    /// List the thematic field options per layer
    Options(OptionsArgs),
}

#[derive(clap::Args, Debug)]
pub struct EncodeArgs {
    /// Record file: an array of attribute objects or a feature-service query reply
    #[arg(value_hint = clap::ValueHint::FilePath)]
    pub input: PathBuf,

    /// Minimum flow count (defaults to the configured initial threshold)
    #[arg(short, long)]
    pub threshold: Option<f64>,

    /// Output file; stdout when omitted
    #[arg(short, long, value_hint = clap::ValueHint::FilePath)]
    pub output: Option<PathBuf>,
}

#[derive(clap::Args, Debug)]
pub struct FetchArgs {
    /// Commuting zone id
    pub zone: i64,

    #[arg(short, long)]
    pub threshold: Option<f64>,

    #[arg(short, long, value_hint = clap::ValueHint::FilePath)]
    pub output: Option<PathBuf>,

    /// Write the raw records instead of GeoJSON
    #[arg(long)]
    pub raw: bool,
}

#[derive(clap::Args, Debug)]
pub struct CovariateArgs {
    pub origin: i64,
    pub destination: i64,
}

#[derive(clap::Args, Debug)]
pub struct OptionsArgs {
    /// Only this layer title
    #[arg(long)]
    pub layer: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::{Cli, Commands};
    use clap::Parser;

    #[test]
    fn parses_encode_with_global_config() {
        let cli = Cli::parse_from([
            "flowmap", "encode", "flows.json", "-t", "250", "--config", "app.json",
        ]);
        assert_eq!(cli.config.as_deref().and_then(|p| p.to_str()), Some("app.json"));
        let Commands::Encode(args) = cli.command else {
            panic!("expected encode");
        };
        assert_eq!(args.threshold, Some(250.0));
        assert!(args.output.is_none());
    }

    #[test]
    fn parses_covariate_pair() {
        let cli = Cli::parse_from(["flowmap", "covariates", "100", "200"]);
        assert!(matches!(
            cli.command,
            Commands::Covariates(ref a) if a.origin == 100 && a.destination == 200
        ));
    }
}
