//! Example: Download a DEM for a bounding box and print its size.
//!
//! Usage: cargo run --example fetch_dem -- <south> <north> <west> <east> [dem_type]

use demviz_dem::{BoundsInput, DemFetcher, DemRaster, DemRequest, DemType};
use std::env;
use std::time::Instant;

fn main() {
    let args: Vec<String> = env::args().collect();

    if args.len() < 5 {
        eprintln!("Usage: {} <south> <north> <west> <east> [dem_type]", args[0]);
        eprintln!("Example: {} 22.0 22.5 85.4 85.8 SRTMGL3", args[0]);
        std::process::exit(1);
    }

    let bounds = BoundsInput::new(&args[1], &args[2], &args[3], &args[4])
        .parse()
        .expect("Invalid bounds");
    let dem_type: DemType = args
        .get(5)
        .map(|s| s.parse().expect("Unknown DEM type"))
        .unwrap_or_default();

    let request = DemRequest::new(bounds, dem_type).expect("Invalid bounding box");
    println!("Requesting {}", request.url());

    let start = Instant::now();
    let fetcher = DemFetcher::new().expect("Failed to create HTTP client");

    match fetcher.fetch_dem(&request) {
        Ok(outcome) => {
            println!(
                "Downloaded {} bytes to {} in {:.2}s",
                outcome.bytes.len(),
                outcome.path.display(),
                start.elapsed().as_secs_f64()
            );
            match DemRaster::from_bytes(&outcome.bytes) {
                Ok(raster) => println!("Raster dimensions: {:?}", raster.dimensions()),
                Err(e) => eprintln!("Error decoding raster: {}", e),
            }
        }
        Err(e) => {
            eprintln!("Download failed: {}", e);
            std::process::exit(1);
        }
    }
}
