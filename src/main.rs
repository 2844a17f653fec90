//! plane-store - drive an image store over a synthetic camera.
//!
//! Requests every plane within the configured extent, publishes a final
//! summary, and reports what the store holds.

use std::process::ExitCode;

use clap::Parser;
use serde::Serialize;
use tracing::{error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use plane_store::{
    config::Config,
    metadata::SummaryMetadata,
    store::{summary_channel, ImageStore, StoreStats, SyntheticSource},
    Coords, Image,
};

#[tokio::main]
async fn main() -> ExitCode {
    let config = Config::parse();

    init_logging(config.verbose);

    if let Err(e) = config.validate() {
        error!("Configuration error: {}", e);
        return ExitCode::FAILURE;
    }

    let report = run(&config).await;

    if config.json {
        match serde_json::to_string_pretty(&report) {
            Ok(json) => println!("{}", json),
            Err(e) => {
                error!("Failed to serialize report: {}", e);
                return ExitCode::FAILURE;
            }
        }
    } else {
        print_report(&report);
    }

    if report.failed > 0 {
        warn!("{} plane(s) could not be generated", report.failed);
    }

    ExitCode::SUCCESS
}

/// What the store looked like after the run.
#[derive(Debug, Serialize)]
struct Report {
    requested: usize,
    generated: usize,
    failed: usize,
    snaps: u64,
    hits: u64,
    misses: u64,
    max_index: Coords,
    axes: Vec<String>,
    summary: SummaryMetadata,
    pattern: Option<Coords>,
    matching: Vec<PlaneReport>,
}

#[derive(Debug, Serialize)]
struct PlaneReport {
    coords: Coords,
    image_number: Option<u64>,
    /// Pixel value at the origin, as displayed to users
    origin: String,
}

impl PlaneReport {
    fn from_image(image: &Image) -> Self {
        Self {
            coords: image.coords().clone(),
            image_number: image.metadata().image_number,
            origin: image
                .intensity_string_at(0, 0)
                .unwrap_or_else(|e| e.to_string()),
        }
    }
}

async fn run(config: &Config) -> Report {
    let source = SyntheticSource::new(config.width, config.height)
        .with_pixel_format(config.bytes_per_pixel, config.components)
        .with_exposure_ms(config.exposure_ms)
        .with_failure_every(config.fail_every);

    let initial = SummaryMetadata::builder()
        .name("synthetic")
        .intended_dimensions(config.extent.clone())
        .build();
    let (publisher, summary) = summary_channel(initial);
    let store = ImageStore::new(source, summary);

    info!(
        "Requesting {} plane(s) of {}x{} ({} byte(s)/sample, {} component(s))",
        config.plane_count(),
        config.width,
        config.height,
        config.bytes_per_pixel,
        config.components
    );

    let planned = config.planned_coords();
    let mut acquired = Vec::with_capacity(planned.len());
    for coords in &planned {
        if store.get_image(coords).await.is_ok() {
            acquired.push(coords);
        }
    }

    // Revisit only the planes that were acquired; these are all cache hits
    for coords in &acquired {
        if let Err(e) = store.get_image(coords).await {
            warn!(%coords, error = %e, "Cached plane unexpectedly missing");
        }
    }

    let summary = store.get_summary_metadata();
    publisher.publish(
        summary
            .copy()
            .comments(format!("{} of {} planes acquired", store.len().await, planned.len()))
            .build(),
    );

    let matching = match config.pattern {
        Some(ref pattern) => {
            let mut images = store.get_images_matching(pattern).await;
            images.sort_by_key(|image| image.coords().to_string());
            images.iter().map(PlaneReport::from_image).collect()
        }
        None => Vec::new(),
    };

    let StoreStats { hits, misses, .. } = store.stats();

    Report {
        requested: planned.len(),
        generated: store.len().await,
        failed: planned.len() - acquired.len(),
        snaps: store.source().snap_count(),
        hits,
        misses,
        max_index: store.max_coords().await,
        axes: store.get_axes().await,
        summary: store.get_summary_metadata().as_ref().clone(),
        pattern: config.pattern.clone(),
        matching,
    }
}

fn print_report(report: &Report) {
    info!("");
    info!("Store contents:");
    info!(
        "  Planes: {} generated, {} failed, {} requested",
        report.generated, report.failed, report.requested
    );
    info!(
        "  Requests: {} hits, {} misses, {} snaps",
        report.hits, report.misses, report.snaps
    );
    info!("  Axes: {}", report.axes.join(", "));
    info!("  Max index: {}", report.max_index);
    if let Some(ref comments) = report.summary.comments {
        info!("  Summary: {}", comments);
    }

    if let Some(ref pattern) = report.pattern {
        info!("");
        info!("Planes matching '{}': {}", pattern, report.matching.len());
        for plane in &report.matching {
            info!(
                "  {:<30} #{:<6} origin={}",
                plane.coords.to_string(),
                plane
                    .image_number
                    .map(|n| n.to_string())
                    .unwrap_or_default(),
                plane.origin
            );
        }
    }
}

/// Initialize the tracing/logging subsystem.
fn init_logging(verbose: bool) {
    let env_filter = if verbose {
        "plane_store=debug"
    } else {
        "plane_store=info"
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| env_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();
}
