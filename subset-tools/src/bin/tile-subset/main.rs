/// # Tile-Subset
/// Cut the part of a product covered by a MODIS grid tile.
///
/// The pixel region is printed as JSON on stdout (or to
/// `--report`); unless
/// `--region-only` is given, the subset is written to the
/// output path.
use anyhow::{bail, Context};
use serde_derive::Serialize;
use subset_tools::{utils::*, GdalExtractor, Result};
use tile_subset::prelude::*;

mod args;
use args::{parse_cmd_line, Args};

// Main function
subset_tools::sync_main!(run());

/// Summary printed on stdout.
#[derive(Serialize)]
struct Report<'a> {
    product: &'a str,
    tile: &'a str,
    instrument: &'a str,
    region: PixelRegion,
    output: Option<String>,
}

fn run() -> Result<()> {
    let args = parse_cmd_line();
    let params = subset_params(&args)?;

    let catalog = TileCatalog::load(&args.catalog)
        .with_context(|| format!("loading tile catalog {}", args.catalog.display()))?;
    let product = GdalProduct::open(&args.input, &params.swath)
        .with_context(|| format!("opening product {}", args.input.display()))?;

    let region = tile_region(&product, &catalog, &params).with_context(|| {
        format!(
            "locating tile {} in {}",
            params.tile_name,
            args.input.display()
        )
    })?;

    let output = match args.output {
        Some(output) if !args.region_only => {
            let extractor = GdalExtractor { output };
            let def = SubsetDef::for_product(&product, region);
            let path = extractor
                .extract(&product, &def)
                .with_context(|| format!("writing subset {}", extractor.output.path.display()))?;
            Some(path.display().to_string())
        }
        _ => None,
    };

    let report = Report {
        product: product.name(),
        tile: &params.tile_name,
        instrument: &params.instrument,
        region,
        output,
    };
    match &args.report {
        Some(path) => write_json(path, &report),
        None => print_json(&report),
    }
}

/// Parameters from the config file, overridden by the
/// command line.
fn subset_params(args: &Args) -> Result<SubsetParams> {
    let mut params = match (&args.config, &args.tile) {
        (Some(path), _) => SubsetParams::from_json_file(path)
            .with_context(|| format!("reading config {}", path.display()))?,
        (None, Some(tile)) => SubsetParams::new(tile.clone()),
        (None, None) => bail!("either --tile or --config is required"),
    };
    if let Some(tile) = &args.tile {
        params.tile_name = tile.clone();
    }
    if let Some(instrument) = &args.instrument {
        params.instrument = instrument.clone();
    }
    if let Some(min_size) = args.min_size {
        params.min_region_size = min_size;
    }
    params.validate()?;
    Ok(params)
}
