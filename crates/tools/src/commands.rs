use std::env;
use std::fs;
use std::io::Write;
use std::path::Path;

use anyhow::{Context, Result};
use flows::{CovariatePair, MigrationRecord, encode};
use foundation::ZoneId;
use interaction::{AppConfig, enrichment_html};
use query::{FeatureSet, HttpFeatureService, fetch_covariates, fetch_migration_records};
use serde::Deserialize;
use serde_json::{Map, Value};
use symbology::{THEMATIC_LAYER_TITLES, color_scheme_name, options_for};
use tracing::info;

use crate::cli::{Cli, Commands, CovariateArgs, EncodeArgs, FetchArgs, OptionsArgs};
use crate::geojson::feature_collection;

pub async fn run(cli: &Cli) -> Result<()> {
    let config = load_config(cli.config.as_deref())?;
    match &cli.command {
        Commands::Encode(args) => cmd_encode(&config, args),
        Commands::Fetch(args) => cmd_fetch(&config, args).await,
        Commands::Covariates(args) => cmd_covariates(&config, args).await,
        Commands::Options(args) => cmd_options(args),
    }
}

/// File settings (or defaults), then `FLOWMAP_*` overrides.
pub fn load_config(path: Option<&Path>) -> Result<AppConfig> {
    let base = match path {
        Some(p) => {
            let text = fs::read_to_string(p).with_context(|| format!("read {}", p.display()))?;
            serde_json::from_str(&text).with_context(|| format!("parse {}", p.display()))?
        }
        None => AppConfig::default(),
    };
    Ok(base.with_overrides(|key| env::var(key).ok()))
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RecordFile {
    Rows(Vec<Map<String, Value>>),
    Reply(FeatureSet),
}

/// Parses a bare attribute array or a `{"features": [{"attributes": ..}]}` reply.
pub fn parse_records(text: &str) -> Result<Vec<MigrationRecord>> {
    let file: RecordFile = serde_json::from_str(text).context("record file is not valid JSON")?;
    let rows: Vec<Map<String, Value>> = match file {
        RecordFile::Rows(rows) => rows,
        RecordFile::Reply(set) => set.features.into_iter().map(|f| f.attributes).collect(),
    };
    rows.iter()
        .enumerate()
        .map(|(i, row)| {
            MigrationRecord::from_attributes(row).with_context(|| format!("record #{i}"))
        })
        .collect()
}

fn write_output(path: Option<&Path>, value: &Value) -> Result<()> {
    let payload = serde_json::to_string_pretty(value)?;
    match path {
        Some(p) => fs::write(p, payload).with_context(|| format!("write {}", p.display())),
        None => {
            let mut out = std::io::stdout().lock();
            writeln!(out, "{payload}")?;
            Ok(())
        }
    }
}

fn cmd_encode(config: &AppConfig, args: &EncodeArgs) -> Result<()> {
    let text = fs::read_to_string(&args.input)
        .with_context(|| format!("read {}", args.input.display()))?;
    let records = parse_records(&text)?;
    let threshold = args.threshold.unwrap_or(config.initial_threshold);
    let flows = encode(&records, threshold);
    info!(
        records = records.len(),
        lines = flows.lines.len(),
        points = flows.points.len(),
        "encoded"
    );
    write_output(args.output.as_deref(), &feature_collection(&flows))
}

async fn cmd_fetch(config: &AppConfig, args: &FetchArgs) -> Result<()> {
    let service = HttpFeatureService::new(&config.migration_service_url, "migration");
    let zone = ZoneId(args.zone);
    let records = fetch_migration_records(&service, zone)
        .await
        .with_context(|| format!("query flows of zone {zone}"))?;
    if args.raw {
        return write_output(args.output.as_deref(), &serde_json::to_value(&records)?);
    }
    let threshold = args.threshold.unwrap_or(config.initial_threshold);
    write_output(
        args.output.as_deref(),
        &feature_collection(&encode(&records, threshold)),
    )
}

async fn cmd_covariates(config: &AppConfig, args: &CovariateArgs) -> Result<()> {
    let service = HttpFeatureService::new(&config.covariate_service_url, "covariates");
    let (origin, destination) = (ZoneId(args.origin), ZoneId(args.destination));
    let rows = fetch_covariates(&service, origin, destination)
        .await
        .with_context(|| format!("query covariates of {origin} and {destination}"))?;
    println!(
        "{}",
        enrichment_html(&CovariatePair::join(&rows, origin, destination))
    );
    Ok(())
}

fn cmd_options(args: &OptionsArgs) -> Result<()> {
    let titles: Vec<&str> = match &args.layer {
        Some(t) => vec![t.as_str()],
        None => THEMATIC_LAYER_TITLES.to_vec(),
    };
    for title in titles {
        let scheme = color_scheme_name(title)
            .with_context(|| format!("{title:?} is not a thematic layer"))?;
        println!("{title} ({scheme})");
        for (i, opt) in options_for(title).iter().enumerate() {
            println!("  {i}: {} [{}]", opt.label, opt.field());
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn parses_bare_rows_and_query_replies() {
        let bare = r#"[{ "o_cz": 1, "d_cz": 2, "n": 600 }, { "o_cz": 1, "d_cz": 1, "n": null }]"#;
        let records = parse_records(bare).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[1].n, None);

        let reply = r#"{ "features": [ { "attributes": { "o_cz": "7", "d_cz": 7, "n": 12.0 } } ] }"#;
        let records = parse_records(reply).unwrap();
        assert_eq!(records[0].o_cz, ZoneId(7));
        assert_eq!(records[0].n, Some(12));
    }

    #[test]
    fn bad_record_names_its_position() {
        let err = parse_records(r#"[{ "o_cz": 1, "d_cz": 2 }, { "d_cz": 3 }]"#).unwrap_err();
        assert!(format!("{err:#}").contains("record #1"));
    }

    #[test]
    fn missing_config_file_is_an_error() {
        assert!(load_config(Some(Path::new("/nonexistent/flowmap.json"))).is_err());
    }
}
