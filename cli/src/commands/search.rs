use std::{
    fs::File,
    io::BufReader,
    time::{Duration, Instant},
};

use anyhow::{Context, Result};
use clap::Args;
use humantime::format_duration;
use meridian_core::{
    geom::{GeoBoundingBox, GeoPoint},
    search::GeoSearchService,
    store::memory::MemoryStore,
};
use yansi::Paint;

/// Search a location data set for points inside a bounding box
#[derive(Args, Debug)]
pub struct SearchArgs {
    /// Lower left corner of the bounding box as `lat,lon`
    #[arg(long, value_parser = parse_point, allow_hyphen_values = true)]
    pub lower_left: GeoPoint,

    /// Upper right corner of the bounding box as `lat,lon`
    #[arg(long, value_parser = parse_point, allow_hyphen_values = true)]
    pub upper_right: GeoPoint,

    /// Path to a JSON file holding an array of location documents
    #[arg(long)]
    pub data: String,
}

fn parse_point(s: &str) -> Result<GeoPoint, String> {
    let (lat, lon) = s
        .split_once(',')
        .ok_or_else(|| "expected `lat,lon'".to_string())?;
    let lat: f64 = lat
        .trim()
        .parse()
        .map_err(|e| format!("invalid latitude: {e}"))?;
    let lon: f64 = lon
        .trim()
        .parse()
        .map_err(|e| format!("invalid longitude: {e}"))?;
    GeoPoint::new(lat, lon).map_err(|e| e.to_string())
}

/// Run the `search` command
pub fn run_search(args: SearchArgs) -> Result<()> {
    let bbox = GeoBoundingBox::new(args.lower_left, args.upper_right)?;

    // load the data set into an in-memory store
    let file = File::open(&args.data).with_context(|| format!("Unable to open `{}'", args.data))?;
    let documents: Vec<serde_json::Value> = serde_json::from_reader(BufReader::new(file))
        .with_context(|| format!("Unable to parse `{}'", args.data))?;

    let mut store = MemoryStore::new();
    for document in documents {
        store.insert_document(document);
    }

    let search_start = Instant::now();
    let service = GeoSearchService::new(store);
    let locations = service.find_locations(&bbox)?;

    for location in &locations {
        match location.point() {
            Some(point) => println!(
                "{} ({:.5}, {:.5})",
                location.description().bold(),
                point.latitude(),
                point.longitude()
            ),
            None => println!("{} {}", location.description().bold(), "(no point)".dim()),
        }
    }

    eprintln!(
        "Found {} locations in {}",
        locations.len(),
        format_duration(Duration::from_millis(
            search_start.elapsed().as_millis() as u64
        ))
    );

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::parse_point;

    #[test]
    fn parses_corner_coordinates() {
        let p = parse_point("49.74733, 6.63575").unwrap();
        assert_eq!(p.latitude(), 49.74733);
        assert_eq!(p.longitude(), 6.63575);

        let p = parse_point("65.08833,-152.40234").unwrap();
        assert_eq!(p.longitude(), -152.40234);
    }

    #[test]
    fn rejects_bad_input() {
        assert!(parse_point("not a point").is_err());
        assert!(parse_point("91.0,0.0").is_err());
        assert!(parse_point("0.0").is_err());
    }
}
