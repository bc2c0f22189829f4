use clap::value_t;
use subset_tools::utils::{InputArgs, OutputArgs};
use subset_tools::{arg, args_parser, flag, opt};
use std::path::PathBuf;

/// Program arguments
pub struct Args {
    /// Input product (raster dataset)
    pub input: InputArgs,
    /// Output raster, absent with `--region-only`
    pub output: Option<OutputArgs>,
    /// Tile catalog (XML)
    pub catalog: PathBuf,
    /// Tile name, overrides the config file
    pub tile: Option<String>,
    /// `VGT` or `AATSR`, overrides the config file
    pub instrument: Option<String>,
    /// Parameters file (JSON)
    pub config: Option<PathBuf>,
    /// Minimum region width and height
    pub min_size: Option<usize>,
    /// Only compute the region
    pub region_only: bool,
    /// Write the JSON report here instead of stdout
    pub report: Option<PathBuf>,
}

pub fn parse_cmd_line() -> Args {
    let matches = args_parser!(
        "tile-subset",
        "Subset a VGT or AATSR product to a MODIS sinusoidal grid tile."
    )
    .arg(
        arg!("input")
            .required(true)
            .help("Input path (raster dataset)"),
    )
    .arg(
        arg!("output")
            .required_unless("region only")
            .help("Output path (raster dataset)"),
    )
    .arg(
        opt!("catalog")
            .short("c")
            .required(true)
            .help("Tile coordinates catalog (XML)"),
    )
    .arg(opt!("tile").short("t").help("Tile name, eg. h18v04"))
    .arg(
        opt!("instrument")
            .short("i")
            .possible_values(&["VGT", "AATSR"])
            .help("Source instrument (default: VGT)"),
    )
    .arg(opt!("config").help("Parameters file (JSON)"))
    .arg(opt!("min size").help("Minimum region width and height (default: 200)"))
    .arg(
        opt!("driver")
            .short("d")
            .help("Output driver (default: GTIFF)"),
    )
    .arg(opt!("report").help("Write the JSON report to this file"))
    .arg(flag!("region only").help("Print the region without writing the subset"))
    .get_matches();

    let input = value_t!(matches, "input", PathBuf).unwrap_or_else(|e| e.exit());
    let catalog = value_t!(matches, "catalog", PathBuf).unwrap_or_else(|e| e.exit());
    let driver = value_t!(matches, "driver", String).unwrap_or_else(|_| String::from("GTIFF"));
    let output = value_t!(matches, "output", PathBuf)
        .ok()
        .map(|path| OutputArgs { path, driver });

    let tile = matches.value_of("tile").map(String::from);
    let instrument = matches.value_of("instrument").map(String::from);
    let config = value_t!(matches, "config", PathBuf).ok();
    let min_size = if matches.is_present("min size") {
        Some(value_t!(matches, "min size", usize).unwrap_or_else(|e| e.exit()))
    } else {
        None
    };

    Args {
        input,
        output,
        catalog,
        tile,
        instrument,
        config,
        min_size,
        region_only: matches.is_present("region only"),
        report: value_t!(matches, "report", PathBuf).ok(),
    }
}
