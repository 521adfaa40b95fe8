use std::fs;
use std::path::PathBuf;
use std::time::{Instant, SystemTime, UNIX_EPOCH};

use anyhow::{bail, Context, Result};
use chrono::{TimeZone, Utc};
use serde::Serialize;
use tracing::info;

use pixles_grid::source::{collect_all, AssetSource, DEFAULT_PAGE_SIZE};
use pixles_grid::{Asset, AssetGrid, GridConfig, ManifestSource, SyntheticSource};

pub const USAGE: &str = "Usage: pixles-grid --benchmark [--manifest PATH | --count N] [--seed N] \
[--runs N] [--width W] [--viewport-height H] [--config PATH] [--output DIR]";

const DEFAULT_COUNT: usize = 5_000;
const DEFAULT_SEED: u64 = 42;
const DEFAULT_WIDTH: f64 = 1280.0;
const DEFAULT_VIEWPORT_HEIGHT: f64 = 800.0;
const DEFAULT_OUTPUT_DIR: &str = "target/pixles-grid-bench";

/// Distance scrolled between simulated frames.
const SCROLL_STEP_PX: f64 = 40.0;
const FRAME_BUDGET_MS: f64 = 16.67;
const SLOW_FRAME_MS: f64 = 33.33;

#[derive(Debug, Clone, PartialEq)]
pub enum AssetInput {
    Manifest(PathBuf),
    Synthetic { count: usize, seed: u64 },
}

#[derive(Debug, Clone, PartialEq)]
pub struct BenchmarkArgs {
    pub input: AssetInput,
    pub runs: usize,
    pub width: f64,
    pub viewport_height: f64,
    pub config: Option<PathBuf>,
    pub output: PathBuf,
}

#[derive(Debug, Serialize)]
struct BenchmarkRun {
    run_index: usize,
    elapsed_ms: f64,
    assets: usize,
    rows: usize,
    total_height: f64,
    layout_ms: f64,
    scroll_frames: usize,
    scroll_frame_p50_ms: f64,
    scroll_frame_p95_ms: f64,
    scroll_frames_over_16ms: usize,
    scroll_frames_over_33ms: usize,
    range_changes: usize,
    label_changes: usize,
    max_rendered_items: usize,
    resize_relayout_ms: f64,
    resize_cached_ms: f64,
}

#[derive(Debug, Serialize)]
struct BenchmarkAggregate {
    runs: usize,
    avg_elapsed_ms: f64,
    min_elapsed_ms: f64,
    max_elapsed_ms: f64,
    avg_layout_ms: f64,
    avg_scroll_p95_ms: f64,
    avg_resize_relayout_ms: f64,
}

#[derive(Debug, Serialize)]
struct BenchmarkReport {
    schema_version: u32,
    generated_at_unix_ms: u64,
    benchmark: String,
    input: String,
    runs_requested: usize,
    width: f64,
    viewport_height: f64,
    config: GridConfig,
    results: Vec<BenchmarkRun>,
    aggregate: BenchmarkAggregate,
}

#[derive(Debug, Default, PartialEq)]
struct ScrollMetrics {
    frames: usize,
    p50_ms: f64,
    p95_ms: f64,
    over_16ms: usize,
    over_33ms: usize,
    range_changes: usize,
    label_changes: usize,
    max_rendered_items: usize,
}

#[derive(Debug, Default)]
struct ResizeMetrics {
    relayout_ms: f64,
    cached_ms: f64,
}

/// Parses benchmark arguments. Returns `Ok(None)` when `--benchmark` is absent.
pub fn maybe_parse_args<I>(args: I) -> Result<Option<BenchmarkArgs>>
where
    I: IntoIterator<Item = String>,
{
    let mut benchmark = false;
    let mut manifest: Option<PathBuf> = None;
    let mut count: Option<usize> = None;
    let mut seed = DEFAULT_SEED;
    let mut runs: usize = 1;
    let mut width = DEFAULT_WIDTH;
    let mut viewport_height = DEFAULT_VIEWPORT_HEIGHT;
    let mut config: Option<PathBuf> = None;
    let mut output = PathBuf::from(DEFAULT_OUTPUT_DIR);
    let mut unknown: Vec<String> = Vec::new();

    let mut args = args.into_iter();
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--benchmark" => benchmark = true,
            "--manifest" => {
                let value = args
                    .next()
                    .context("Missing value for --manifest in benchmark mode")?;
                manifest = Some(PathBuf::from(value));
            }
            "--count" => {
                let value = args
                    .next()
                    .context("Missing value for --count in benchmark mode")?;
                count = Some(
                    value
                        .parse::<usize>()
                        .context("Failed to parse --count as a non-negative integer")?,
                );
            }
            "--seed" => {
                let value = args
                    .next()
                    .context("Missing value for --seed in benchmark mode")?;
                seed = value
                    .parse::<u64>()
                    .context("Failed to parse --seed as a non-negative integer")?;
            }
            "--runs" => {
                let value = args
                    .next()
                    .context("Missing value for --runs in benchmark mode")?;
                runs = value
                    .parse::<usize>()
                    .context("Failed to parse --runs as a positive integer")?;
            }
            "--width" => {
                let value = args
                    .next()
                    .context("Missing value for --width in benchmark mode")?;
                width = value
                    .parse::<f64>()
                    .context("Failed to parse --width as a number")?;
            }
            "--viewport-height" => {
                let value = args
                    .next()
                    .context("Missing value for --viewport-height in benchmark mode")?;
                viewport_height = value
                    .parse::<f64>()
                    .context("Failed to parse --viewport-height as a number")?;
            }
            "--config" => {
                let value = args
                    .next()
                    .context("Missing value for --config in benchmark mode")?;
                config = Some(PathBuf::from(value));
            }
            "--output" => {
                let value = args
                    .next()
                    .context("Missing value for --output in benchmark mode")?;
                output = PathBuf::from(value);
            }
            _ => {
                if manifest.is_none() && !arg.starts_with('-') {
                    manifest = Some(PathBuf::from(arg));
                } else {
                    unknown.push(arg);
                }
            }
        }
    }

    if !benchmark {
        return Ok(None);
    }
    if let Some(arg) = unknown.first() {
        bail!("Unknown benchmark argument: {arg}");
    }
    if runs == 0 {
        bail!("--runs must be greater than 0");
    }
    if !width.is_finite() || width <= 0.0 {
        bail!("--width must be a positive number");
    }
    if !viewport_height.is_finite() || viewport_height <= 0.0 {
        bail!("--viewport-height must be a positive number");
    }

    let input = match (manifest, count) {
        (Some(_), Some(_)) => bail!("--manifest and --count cannot be combined"),
        (Some(path), None) => AssetInput::Manifest(path),
        (None, count) => AssetInput::Synthetic {
            count: count.unwrap_or(DEFAULT_COUNT),
            seed,
        },
    };

    Ok(Some(BenchmarkArgs {
        input,
        runs,
        width,
        viewport_height,
        config,
        output,
    }))
}

pub fn run_benchmark(args: BenchmarkArgs) -> Result<i32> {
    let config = match &args.config {
        Some(path) => GridConfig::load(path)
            .with_context(|| format!("Failed to load grid config {}", path.display()))?,
        None => GridConfig::default(),
    };
    let assets = load_assets(&args.input)?;
    if assets.is_empty() {
        bail!("Benchmark input contains no assets");
    }
    info!(assets = assets.len(), input = %describe_input(&args.input), "Benchmark assets loaded");

    fs::create_dir_all(&args.output).with_context(|| {
        format!(
            "Failed to create benchmark output directory {}",
            args.output.display()
        )
    })?;

    let mut runs = Vec::with_capacity(args.runs);
    for run_index in 0..args.runs {
        let run_number = run_index + 1;
        println!("run={} phase=begin", run_number);
        let run_start = Instant::now();

        let mut grid = AssetGrid::new(config.clone()).context("Grid config rejected")?;
        let batch = assets.clone();

        println!("run={} phase=layout start", run_number);
        let layout_start = Instant::now();
        grid.set_assets(batch);
        grid.set_container_size(args.width, args.viewport_height);
        let layout_ms = elapsed_ms(layout_start);
        println!(
            "run={} phase=layout done rows={} total_height={:.0} ms={:.2}",
            run_number,
            grid.rows().len(),
            grid.total_height(),
            layout_ms
        );

        println!("run={} phase=scroll start", run_number);
        let scroll = simulate_scroll(&mut grid, args.viewport_height);
        println!(
            "run={} phase=scroll done frames={} p50_ms={:.3} p95_ms={:.3} over16={} over33={} range_changes={}",
            run_number,
            scroll.frames,
            scroll.p50_ms,
            scroll.p95_ms,
            scroll.over_16ms,
            scroll.over_33ms,
            scroll.range_changes
        );

        println!("run={} phase=resize start", run_number);
        let resize = simulate_resize(&mut grid, args.width, args.viewport_height);
        println!(
            "run={} phase=resize done relayout_ms={:.2} cached_ms={:.2}",
            run_number, resize.relayout_ms, resize.cached_ms
        );

        runs.push(BenchmarkRun {
            run_index: run_number,
            elapsed_ms: elapsed_ms(run_start),
            assets: grid.assets().len(),
            rows: grid.rows().len(),
            total_height: grid.total_height(),
            layout_ms,
            scroll_frames: scroll.frames,
            scroll_frame_p50_ms: scroll.p50_ms,
            scroll_frame_p95_ms: scroll.p95_ms,
            scroll_frames_over_16ms: scroll.over_16ms,
            scroll_frames_over_33ms: scroll.over_33ms,
            range_changes: scroll.range_changes,
            label_changes: scroll.label_changes,
            max_rendered_items: scroll.max_rendered_items,
            resize_relayout_ms: resize.relayout_ms,
            resize_cached_ms: resize.cached_ms,
        });
    }

    let aggregate = build_aggregate(&runs);
    let generated_at_unix_ms = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .context("System clock appears to be before Unix epoch")?
        .as_millis() as u64;
    let output_path = args
        .output
        .join(format!("grid-{}.json", generated_at_unix_ms));

    let report = BenchmarkReport {
        schema_version: 1,
        generated_at_unix_ms,
        benchmark: "layout_scroll_resize_v1".to_string(),
        input: describe_input(&args.input),
        runs_requested: args.runs,
        width: args.width,
        viewport_height: args.viewport_height,
        config,
        results: runs,
        aggregate,
    };

    let json = serde_json::to_string_pretty(&report).context("Failed to serialize benchmark report")?;
    fs::write(&output_path, json).with_context(|| {
        format!(
            "Failed to write benchmark report to {}",
            output_path.display()
        )
    })?;

    info!(path = %output_path.display(), "Benchmark complete");
    println!("Benchmark complete: {}", output_path.display());
    println!(
        "runs={} avg_ms={:.2} min_ms={:.2} max_ms={:.2} avg_layout_ms={:.2} avg_scroll_p95_ms={:.3} avg_resize_ms={:.2}",
        report.aggregate.runs,
        report.aggregate.avg_elapsed_ms,
        report.aggregate.min_elapsed_ms,
        report.aggregate.max_elapsed_ms,
        report.aggregate.avg_layout_ms,
        report.aggregate.avg_scroll_p95_ms,
        report.aggregate.avg_resize_relayout_ms
    );

    Ok(0)
}

fn load_assets(input: &AssetInput) -> Result<Vec<Asset>> {
    let source: Box<dyn AssetSource> = match input {
        AssetInput::Manifest(path) => Box::new(
            ManifestSource::open(path)
                .with_context(|| format!("Failed to open asset manifest {}", path.display()))?,
        ),
        AssetInput::Synthetic { count, seed } => {
            // Fixed end date so a seed always reproduces the same library.
            let until = Utc
                .with_ymd_and_hms(2025, 6, 1, 0, 0, 0)
                .single()
                .context("Invalid synthetic end date")?;
            Box::new(SyntheticSource::new(*count, *seed, until))
        }
    };
    collect_all(source.as_ref(), DEFAULT_PAGE_SIZE).context("Failed to read benchmark assets")
}

fn describe_input(input: &AssetInput) -> String {
    match input {
        AssetInput::Manifest(path) => format!("manifest:{}", path.display()),
        AssetInput::Synthetic { count, seed } => format!("synthetic:count={count},seed={seed}"),
    }
}

/// Scrolls top to bottom in fixed steps, timing the per-frame work a host
/// does on every scroll event: range update plus frame assembly.
fn simulate_scroll(grid: &mut AssetGrid, viewport_height: f64) -> ScrollMetrics {
    let max_scroll = (grid.total_height() - viewport_height).max(0.0);
    let mut frame_times_ms = Vec::new();
    let mut range_changes = 0usize;
    let mut label_changes = 0usize;
    let mut max_rendered_items = 0usize;
    let mut last_label: Option<String> = None;

    let mut scroll_top = 0.0;
    loop {
        let frame_start = Instant::now();
        if grid.on_scroll(scroll_top).is_some() {
            range_changes += 1;
        }
        let frame = grid.frame();
        let rendered_items: usize = frame.rows.iter().map(|row| row.row.items.len()).sum();
        frame_times_ms.push(elapsed_ms(frame_start));

        max_rendered_items = max_rendered_items.max(rendered_items);
        if frame.date_label != last_label {
            label_changes += 1;
            last_label = frame.date_label;
        }

        if scroll_top >= max_scroll {
            break;
        }
        scroll_top = (scroll_top + SCROLL_STEP_PX).min(max_scroll);
    }

    ScrollMetrics {
        frames: frame_times_ms.len(),
        p50_ms: percentile_ms(&frame_times_ms, 0.50),
        p95_ms: percentile_ms(&frame_times_ms, 0.95),
        over_16ms: frame_times_ms.iter().filter(|t| **t > FRAME_BUDGET_MS).count(),
        over_33ms: frame_times_ms.iter().filter(|t| **t > SLOW_FRAME_MS).count(),
        range_changes,
        label_changes,
        max_rendered_items,
    }
}

/// Narrows the container and restores it. The restore hits the layout cache.
fn simulate_resize(grid: &mut AssetGrid, width: f64, viewport_height: f64) -> ResizeMetrics {
    let narrow = (width * 0.75).round().max(1.0);

    let relayout_start = Instant::now();
    grid.set_container_size(narrow, viewport_height);
    let relayout_ms = elapsed_ms(relayout_start);

    let cached_start = Instant::now();
    grid.set_container_size(width, viewport_height);
    let cached_ms = elapsed_ms(cached_start);

    ResizeMetrics {
        relayout_ms,
        cached_ms,
    }
}

fn build_aggregate(runs: &[BenchmarkRun]) -> BenchmarkAggregate {
    let elapsed_values: Vec<f64> = runs.iter().map(|r| r.elapsed_ms).collect();
    let layout_values: Vec<f64> = runs.iter().map(|r| r.layout_ms).collect();
    let scroll_p95_values: Vec<f64> = runs.iter().map(|r| r.scroll_frame_p95_ms).collect();
    let resize_values: Vec<f64> = runs.iter().map(|r| r.resize_relayout_ms).collect();

    BenchmarkAggregate {
        runs: runs.len(),
        avg_elapsed_ms: average(&elapsed_values),
        min_elapsed_ms: elapsed_values.iter().copied().reduce(f64::min).unwrap_or(0.0),
        max_elapsed_ms: elapsed_values.iter().copied().reduce(f64::max).unwrap_or(0.0),
        avg_layout_ms: average(&layout_values),
        avg_scroll_p95_ms: average(&scroll_p95_values),
        avg_resize_relayout_ms: average(&resize_values),
    }
}

fn elapsed_ms(start: Instant) -> f64 {
    start.elapsed().as_secs_f64() * 1000.0
}

fn average(values: &[f64]) -> f64 {
    if values.is_empty() {
        0.0
    } else {
        values.iter().sum::<f64>() / values.len() as f64
    }
}

fn percentile_ms(values: &[f64], p: f64) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.total_cmp(b));
    let clamped = p.clamp(0.0, 1.0);
    let idx = ((sorted.len() - 1) as f64 * clamped).round() as usize;
    sorted[idx]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_no_benchmark_flag() {
        assert_eq!(maybe_parse_args(args(&["--count", "10"])).unwrap(), None);
        assert_eq!(maybe_parse_args(args(&["--whatever"])).unwrap(), None);
    }

    #[test]
    fn test_defaults() {
        let parsed = maybe_parse_args(args(&["--benchmark"])).unwrap().unwrap();
        assert_eq!(
            parsed.input,
            AssetInput::Synthetic {
                count: DEFAULT_COUNT,
                seed: DEFAULT_SEED
            }
        );
        assert_eq!(parsed.runs, 1);
        assert_eq!(parsed.width, DEFAULT_WIDTH);
        assert_eq!(parsed.output, PathBuf::from(DEFAULT_OUTPUT_DIR));
        assert_eq!(parsed.config, None);
    }

    #[test]
    fn test_full_args() {
        let parsed = maybe_parse_args(args(&[
            "--benchmark",
            "--count",
            "250",
            "--seed",
            "9",
            "--runs",
            "3",
            "--width",
            "1024.5",
            "--viewport-height",
            "600",
            "--config",
            "grid.json",
            "--output",
            "out",
        ]))
        .unwrap()
        .unwrap();
        assert_eq!(parsed.input, AssetInput::Synthetic { count: 250, seed: 9 });
        assert_eq!(parsed.runs, 3);
        assert_eq!(parsed.width, 1024.5);
        assert_eq!(parsed.viewport_height, 600.0);
        assert_eq!(parsed.config, Some(PathBuf::from("grid.json")));
        assert_eq!(parsed.output, PathBuf::from("out"));
    }

    #[test]
    fn test_manifest_positional_and_flag() {
        let flagged = maybe_parse_args(args(&["--benchmark", "--manifest", "a.json"]))
            .unwrap()
            .unwrap();
        assert_eq!(flagged.input, AssetInput::Manifest(PathBuf::from("a.json")));

        let positional = maybe_parse_args(args(&["--benchmark", "b.json"]))
            .unwrap()
            .unwrap();
        assert_eq!(positional.input, AssetInput::Manifest(PathBuf::from("b.json")));
    }

    #[test]
    fn test_invalid_args() {
        assert!(maybe_parse_args(args(&["--benchmark", "--runs", "0"])).is_err());
        assert!(maybe_parse_args(args(&["--benchmark", "--runs"])).is_err());
        assert!(maybe_parse_args(args(&["--benchmark", "--width", "-5"])).is_err());
        assert!(maybe_parse_args(args(&["--benchmark", "--width", "wide"])).is_err());
        assert!(maybe_parse_args(args(&["--benchmark", "--viewport-height", "0"])).is_err());
        assert!(maybe_parse_args(args(&["--benchmark", "--manifest", "a.json", "--count", "5"])).is_err());
        assert!(maybe_parse_args(args(&["--benchmark", "--frobnicate"])).is_err());
    }

    #[test]
    fn test_percentile() {
        let values = [5.0, 1.0, 4.0, 2.0, 3.0];
        assert_eq!(percentile_ms(&values, 0.0), 1.0);
        assert_eq!(percentile_ms(&values, 0.5), 3.0);
        assert_eq!(percentile_ms(&values, 1.0), 5.0);
        assert_eq!(percentile_ms(&values, 7.0), 5.0);
        assert_eq!(percentile_ms(&[], 0.5), 0.0);
    }

    #[test]
    fn test_average() {
        assert_eq!(average(&[]), 0.0);
        assert_eq!(average(&[1.0, 2.0, 6.0]), 3.0);
    }

    #[test]
    fn test_simulate_scroll_covers_timeline() {
        let assets = load_assets(&AssetInput::Synthetic { count: 600, seed: 3 }).unwrap();
        let mut grid = AssetGrid::new(GridConfig::default()).unwrap();
        grid.set_assets(assets);
        grid.set_container_size(1280.0, 800.0);

        let metrics = simulate_scroll(&mut grid, 800.0);
        let max_scroll = grid.total_height() - 800.0;
        assert!(metrics.frames as f64 >= max_scroll / SCROLL_STEP_PX);
        assert!(metrics.range_changes > 1);
        assert!(metrics.range_changes < metrics.frames);
        assert!(metrics.label_changes >= 1);
        assert!(metrics.max_rendered_items > 0);
        assert!(metrics.max_rendered_items < grid.assets().len());
        assert_eq!(grid.viewport().scroll_top, max_scroll);
    }

    #[test]
    fn test_run_benchmark_writes_report() {
        let dir = tempfile::tempdir().unwrap();
        let code = run_benchmark(BenchmarkArgs {
            input: AssetInput::Synthetic { count: 200, seed: 1 },
            runs: 2,
            width: 1000.0,
            viewport_height: 700.0,
            config: None,
            output: dir.path().to_path_buf(),
        })
        .unwrap();
        assert_eq!(code, 0);

        let reports: Vec<_> = fs::read_dir(dir.path())
            .unwrap()
            .map(|entry| entry.unwrap().path())
            .collect();
        assert_eq!(reports.len(), 1);

        let report: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(&reports[0]).unwrap()).unwrap();
        assert_eq!(report["runs_requested"], 2);
        assert_eq!(report["results"].as_array().unwrap().len(), 2);
        assert_eq!(report["results"][0]["assets"], 200);
        assert_eq!(report["config"]["gap"], 12.0);
    }

    #[test]
    fn test_run_benchmark_missing_manifest() {
        let dir = tempfile::tempdir().unwrap();
        let result = run_benchmark(BenchmarkArgs {
            input: AssetInput::Manifest(dir.path().join("missing.json")),
            runs: 1,
            width: 1000.0,
            viewport_height: 700.0,
            config: None,
            output: dir.path().join("out"),
        });
        assert!(result.is_err());
    }
}
