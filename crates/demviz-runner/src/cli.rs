//! Command-line interface.

use crate::config::Config;
use crate::pipeline::Pipeline;
use crate::Result;
use clap::builder::{PossibleValuesParser, TypedValueParser};
use clap::{Args, Parser, Subcommand};
use demviz_dem::{BoundsInput, DemType, HttpTransport};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "demviz")]
#[command(version, about = "Download a DEM for a bounding box and render terrain layers", long_about = None)]
pub struct Cli {
    /// YAML configuration file
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Debug logging (RUST_LOG takes precedence)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Plot the four bounding-box points to bounds_preview.png
    Preview {
        #[command(flatten)]
        bounds: BoundsArgs,
    },
    /// Download the DEM GeoTIFF for a bounding box
    Download {
        #[command(flatten)]
        bounds: BoundsArgs,
        #[command(flatten)]
        target: DownloadArgs,
    },
    /// Render the five layer figures from a downloaded DEM
    Render {
        /// DEM GeoTIFF (defaults to fetch.output_path)
        #[arg(long)]
        input: Option<PathBuf>,
    },
    /// Download, then render
    Run {
        #[command(flatten)]
        bounds: BoundsArgs,
        #[command(flatten)]
        target: DownloadArgs,
    },
    /// List the DEM product identifiers
    ListTypes,
}

/// Bounding-box coordinates as entered; parsed when the command runs.
#[derive(Args, Debug, Clone)]
pub struct BoundsArgs {
    /// Southern latitude
    #[arg(long, default_value = "22.0", allow_hyphen_values = true)]
    pub south: String,
    /// Northern latitude
    #[arg(long, default_value = "22.5", allow_hyphen_values = true)]
    pub north: String,
    /// Western longitude
    #[arg(long, default_value = "85.4", allow_hyphen_values = true)]
    pub west: String,
    /// Eastern longitude
    #[arg(long, default_value = "85.8", allow_hyphen_values = true)]
    pub east: String,
}

impl From<&BoundsArgs> for BoundsInput {
    fn from(args: &BoundsArgs) -> Self {
        BoundsInput::new(&args.south, &args.north, &args.west, &args.east)
    }
}

#[derive(Args, Debug, Clone)]
pub struct DownloadArgs {
    /// DEM product (see list-types)
    #[arg(long, default_value = "SRTMGL3", value_parser = dem_type_parser())]
    pub dem_type: DemType,
    /// Output GeoTIFF (overrides fetch.output_path)
    #[arg(long)]
    pub output: Option<PathBuf>,
}

/// Accepts exactly the product identifiers, case-sensitive.
fn dem_type_parser() -> impl TypedValueParser<Value = DemType> {
    PossibleValuesParser::new(DemType::ALL.map(|t| t.as_str()))
        .try_map(|s| s.parse::<DemType>().map_err(|e| e.to_string()))
}

/// Execute a parsed command with an explicit pipeline.
pub fn execute<T: HttpTransport>(command: &Command, config: &Config, pipeline: Pipeline<T>) -> Result<()> {
    match command {
        Command::Preview { bounds } => {
            let preview = pipeline.preview(&bounds.into())?;
            for (i, p) in preview.points.iter().enumerate() {
                println!("point {}: lat {}, lon {}", i + 1, p.lat, p.lon);
            }
            println!("Preview saved to {}", preview.path.display());
        }
        Command::Download { bounds, target } => {
            let pipeline = with_output(pipeline, target);
            let request = pipeline.request(&bounds.into(), target.dem_type)?;
            println!("Generated URL: {}", request.url());
            let outcome = pipeline.fetch(&request)?;
            println!("DEM downloaded successfully to {}", outcome.path.display());
        }
        Command::Render { input } => {
            let path = input.clone().unwrap_or_else(|| config.fetch.output_path.clone());
            let result = pipeline.render_file(&path)?;
            print_figures(&result.figures);
        }
        Command::Run { bounds, target } => {
            let pipeline = with_output(pipeline, target);
            let result = pipeline.run(&bounds.into(), target.dem_type)?;
            println!("DEM downloaded successfully to {}", pipeline.output_path().display());
            print_figures(&result.figures);
        }
        Command::ListTypes => {
            for dem_type in DemType::ALL {
                println!("{}", dem_type);
            }
        }
    }
    Ok(())
}

fn with_output<T: HttpTransport>(pipeline: Pipeline<T>, target: &DownloadArgs) -> Pipeline<T> {
    match &target.output {
        Some(path) => pipeline.with_output_path(path),
        None => pipeline,
    }
}

fn print_figures(figures: &[PathBuf]) {
    for path in figures {
        println!("Saved {}", path.display());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_download_defaults() {
        let cli = Cli::try_parse_from(["demviz", "download"]).unwrap();
        match cli.command {
            Command::Download { bounds, target } => {
                assert_eq!(bounds.south, "22.0");
                assert_eq!(bounds.east, "85.8");
                assert_eq!(target.dem_type, DemType::Srtmgl3);
                assert!(target.output.is_none());
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_global_flags_and_negative_coordinates() {
        let cli = Cli::try_parse_from([
            "demviz", "preview", "--south", "-23.5", "--north", "-23.0", "-v", "--config", "demviz.yaml",
        ])
        .unwrap();
        assert!(cli.verbose);
        assert_eq!(cli.config, Some(PathBuf::from("demviz.yaml")));
        match cli.command {
            Command::Preview { bounds } => {
                assert_eq!(bounds.south, "-23.5");
                assert_eq!(bounds.north, "-23.0");
                assert_eq!(bounds.west, "85.4");
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_non_numeric_text_is_accepted_by_parser() {
        // validation happens when the command runs
        let cli = Cli::try_parse_from(["demviz", "preview", "--west", "abc"]).unwrap();
        match cli.command {
            Command::Preview { bounds } => {
                let err = BoundsInput::from(&bounds).parse().unwrap_err();
                assert!(err.to_string().contains("west"));
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_render_and_list_types() {
        let cli = Cli::try_parse_from(["demviz", "render", "--input", "dem.tif"]).unwrap();
        assert!(matches!(cli.command, Command::Render { input: Some(_) }));

        let cli = Cli::try_parse_from(["demviz", "list-types"]).unwrap();
        assert!(matches!(cli.command, Command::ListTypes));
    }

    #[test]
    fn test_dem_type_is_parsed_by_clap() {
        let cli = Cli::try_parse_from(["demviz", "run", "--dem-type", "COP30"]).unwrap();
        match cli.command {
            Command::Run { target, .. } => assert_eq!(target.dem_type, DemType::Cop30),
            other => panic!("unexpected command: {other:?}"),
        }

        let err = Cli::try_parse_from(["demviz", "download", "--dem-type", "srtmgl3"]).unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::InvalidValue);
    }
}
