//! `analyze` and `quick` subcommands.

use crate::AnalysisArgs;
use anyhow::Context;
use aqf_report::{AnalysisConfig, AnalysisMode, Analyzer, ReferenceImage};
use aqf_utils::error::AnalysisError;
use log::{error, info};
use serde_json::Value;
use std::path::Path;

/// Build the analysis config: the `--config` file (or defaults), then the
/// command-line overrides.
pub fn load_config(args: &AnalysisArgs, mode: AnalysisMode) -> anyhow::Result<AnalysisConfig> {
    let mut config = match &args.config {
        Some(path) => {
            let json = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read config {}", path.display()))?;
            AnalysisConfig::from_json_str(&json)
                .with_context(|| format!("Invalid config {}", path.display()))?
        }
        None => AnalysisConfig::default(),
    };
    if let Some(secs) = args.timeout_secs {
        config.fit_timeout_secs = secs;
    }
    if let Some(days) = args.horizon {
        match mode {
            AnalysisMode::Full => config.full_horizon_days = days,
            AnalysisMode::Quick => config.quick_horizon_days = days,
        }
    }
    Ok(config)
}

/// File name and size of the reference photo.
pub fn reference_image(path: &Path) -> anyhow::Result<ReferenceImage> {
    let metadata = std::fs::metadata(path)
        .with_context(|| format!("Failed to read image {}", path.display()))?;
    let file_name = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default();
    Ok(ReferenceImage {
        file_name,
        bytes: metadata.len(),
    })
}

pub async fn run_full(args: &AnalysisArgs, image: Option<&Path>) -> anyhow::Result<()> {
    let config = load_config(args, AnalysisMode::Full)?;
    let csv = match read_dataset(&args.dataset) {
        Ok(csv) => csv,
        Err(err) => return finish(Err(err), args.output.as_deref()),
    };
    let image = image.map(reference_image).transpose()?;

    info!("Running full analysis of {}", args.dataset.display());
    let result = Analyzer::new(config).analyze(&csv, image).await;
    finish(result, args.output.as_deref())
}

pub async fn run_quick(args: &AnalysisArgs) -> anyhow::Result<()> {
    let config = load_config(args, AnalysisMode::Quick)?;
    let csv = match read_dataset(&args.dataset) {
        Ok(csv) => csv,
        Err(err) => return finish(Err(err), args.output.as_deref()),
    };

    info!("Running quick analysis of {}", args.dataset.display());
    let result = Analyzer::new(config).quick(&csv).await;
    finish(result, args.output.as_deref())
}

/// Dataset contents. Undecodable bytes are a data problem, any other read
/// failure is internal.
pub(crate) fn read_dataset(path: &Path) -> Result<String, AnalysisError> {
    let bytes = std::fs::read(path).map_err(|e| {
        AnalysisError::Internal(format!("Failed to read dataset {}: {}", path.display(), e))
    })?;
    String::from_utf8(bytes)
        .map_err(|e| AnalysisError::Csv(format!("dataset is not valid UTF-8: {}", e.utf8_error())))
}

/// Write the success or error body, then surface the error.
pub(crate) fn finish(
    result: Result<Value, AnalysisError>,
    output: Option<&Path>,
) -> anyhow::Result<()> {
    match result {
        Ok(body) => write_body(&body, output),
        Err(err) => {
            error!("{} ({})", err, err.kind().as_str());
            write_body(&err.to_json(), output)?;
            Err(err.into())
        }
    }
}

pub(crate) fn write_body(body: &Value, output: Option<&Path>) -> anyhow::Result<()> {
    let json = serde_json::to_string_pretty(body)?;
    match output {
        Some(path) => {
            std::fs::write(path, json)
                .with_context(|| format!("Failed to write {}", path.display()))?;
            info!("Output: {}", path.display());
        }
        None => println!("{}", json),
    }
    Ok(())
}
