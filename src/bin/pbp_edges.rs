use log::{info, warn};
use pbp_edges::config::{collect_inputs, find_reference, load_config, ToolConfig};
use pbp_edges::image::io::{
    load_mask, load_normalized_image, save_map_f32, save_mask, write_json_file,
};
use pbp_edges::metrics::{compare_masks, MaskComparison};
use pbp_edges::timing::{Timer, Timers, TimingBreakdown};
use pbp_edges::{EdgeDetection, PbpDetector};
use serde::Serialize;
use std::env;
use std::path::{Path, PathBuf};

fn main() {
    env_logger::init();
    if let Err(err) = run() {
        eprintln!("Error: {err}");
        std::process::exit(1);
    }
}

fn run() -> Result<(), String> {
    let config_path = env::args().nth(1).ok_or_else(usage)?;
    let config = load_config(Path::new(&config_path))?;

    // Validate every parameter set before touching any image.
    let mut detectors = Vec::with_capacity(config.parameter_sets.len());
    for set in &config.parameter_sets {
        let detector = PbpDetector::new(&set.params)
            .map_err(|e| format!("Parameter set `{}`: {e}", set.name))?;
        let compiled = detector.params();
        info!(
            "parameter set `{}`: {}x{} {:?} window, directions {:?}, {:?}, {:?}, nms={}",
            set.name,
            compiled.layout.size(),
            compiled.layout.size(),
            compiled.layout.shape(),
            compiled.directions().collect::<Vec<_>>(),
            compiled.aggregation,
            compiled.threshold,
            compiled.nms
        );
        detectors.push((set.name.as_str(), detector));
    }

    let inputs = collect_inputs(&config.input)?;
    if inputs.is_empty() {
        return Err(format!("No images found in {}", config.input.display()));
    }

    for (name, detector) in &detectors {
        let mut timers = Timers::new();
        let sweep = Timer::start(format!("parameter set `{name}`"));
        for input in &inputs {
            process_image(&config, name, detector, input, &mut timers)?;
        }
        sweep.stop_into(&mut timers);
        log_summary(name, &timers);
    }

    println!(
        "Processed {} image(s) with {} parameter set(s) into {}",
        inputs.len(),
        detectors.len(),
        config.output_dir.display()
    );
    Ok(())
}

fn process_image(
    config: &ToolConfig,
    set_name: &str,
    detector: &PbpDetector,
    input: &Path,
    timers: &mut Timers,
) -> Result<(), String> {
    let image = load_normalized_image(input)?;
    let detection = detector
        .detect(&image)
        .map_err(|e| format!("{}: {e}", input.display()))?;
    timers.record(&detection.timings);

    let stem = input
        .file_stem()
        .and_then(|s| s.to_str())
        .ok_or_else(|| format!("Invalid file name {}", input.display()))?;
    let out_dir = config.output_dir.join(set_name);
    let out = |suffix: &str| -> PathBuf { out_dir.join(format!("{stem}_{suffix}")) };

    save_mask(&detection.mask, &out("mask.png"))?;
    save_map_f32(&detection.magnitude.magnitude, &out("magnitude.png"))?;
    if config.save_intermediate {
        for map in &detection.responses {
            save_map_f32(&map.response, &out(&format!("{}.png", map.direction)))?;
        }
        if let Some(thinned) = &detection.thinned {
            save_map_f32(thinned, &out("thinned.png"))?;
        }
    }

    let comparison = match config
        .reference_dir
        .as_deref()
        .and_then(|dir| find_reference(dir, input))
    {
        Some(path) => {
            let reference = load_mask(&path)?;
            match compare_masks(&detection.mask, &reference) {
                Ok(cmp) => Some(cmp),
                Err(e) => {
                    warn!("{}: reference {} skipped: {e}", input.display(), path.display());
                    None
                }
            }
        }
        None => None,
    };

    let summary = ImageSummary::new(input, set_name, &detection, comparison);
    write_json_file(&out("report.json"), &summary)?;
    info!(
        "{} [{}]: {} edge pixels, cutoff {:.4}, {:.2} ms{}",
        input.display(),
        set_name,
        summary.edge_count,
        summary.cutoff,
        summary.timings.total_ms,
        comparison
            .map(|c| format!(", F1 {:.3}", c.f1))
            .unwrap_or_default()
    );
    Ok(())
}

fn log_summary(set_name: &str, timers: &Timers) {
    for name in timers.names() {
        info!(
            "[{set_name}] {name}: n={} mean={:.3} ms median={:.3} ms min={:.3} ms max={:.3} ms",
            timers.count(name).unwrap_or(0),
            timers.mean(name).unwrap_or(f64::NAN),
            timers.median(name).unwrap_or(f64::NAN),
            timers.min(name).unwrap_or(f64::NAN),
            timers.max(name).unwrap_or(f64::NAN),
        );
    }
}

fn usage() -> String {
    "Usage: pbp_edges <config.json>".to_string()
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ImageSummary {
    input: PathBuf,
    parameter_set: String,
    width: usize,
    height: usize,
    edge_count: usize,
    cutoff: f32,
    max_magnitude: f32,
    #[serde(skip_serializing_if = "Option::is_none")]
    comparison: Option<MaskComparison>,
    timings: TimingBreakdown,
}

impl ImageSummary {
    fn new(
        input: &Path,
        set_name: &str,
        detection: &EdgeDetection,
        comparison: Option<MaskComparison>,
    ) -> Self {
        Self {
            input: input.to_path_buf(),
            parameter_set: set_name.to_string(),
            width: detection.magnitude.width(),
            height: detection.magnitude.height(),
            edge_count: detection.mask.count(),
            cutoff: detection.cutoff,
            max_magnitude: detection.magnitude.max(),
            comparison,
            timings: detection.timings.clone(),
        }
    }
}
