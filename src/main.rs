use firemap::measure::{calculate_distance, LogNotifier};
use firemap::stats::{load_dataset, parse_default_geo_data, parse_geo_data};
use firemap::{AppConfig, Coordinate};
use std::path::PathBuf;

fn main() {
    // Log to stderr (if you run with `RUST_LOG=debug`).
    #[cfg(not(target_arch = "wasm32"))]
    env_logger::init();

    let config_path = std::env::args().nth(1).map(PathBuf::from);
    let config = match AppConfig::load_or_default(config_path.as_deref()) {
        Ok(config) => config,
        Err(err) => {
            log::error!("{}", err);
            std::process::exit(1);
        }
    };

    let summary = match &config.dataset {
        Some(path) => match load_dataset(path) {
            Ok(data) => parse_geo_data(Some(&data)),
            Err(err) => {
                log::error!("{}", err);
                parse_geo_data(None)
            }
        },
        None => parse_default_geo_data(),
    };

    log::info!(
        "{} detections over {} days",
        summary.raw_features.len(),
        summary.daily_counts.len()
    );

    // Span between the newest and oldest detection
    let endpoints: Vec<Coordinate> = [summary.raw_features.first(), summary.raw_features.last()]
        .into_iter()
        .flatten()
        .filter_map(|record| {
            let x = record.get("longitude")?.as_str()?.parse().ok()?;
            let y = record.get("latitude")?.as_str()?.parse().ok()?;
            Some(Coordinate { x, y })
        })
        .collect();
    if let Err(err) = calculate_distance(&endpoints, &mut LogNotifier) {
        log::debug!("No detection span: {}", err);
    }

    match serde_json::to_string_pretty(&summary) {
        Ok(json) => println!("{}", json),
        Err(err) => {
            log::error!("Failed to serialize summary: {}", err);
            std::process::exit(1);
        }
    }
}
