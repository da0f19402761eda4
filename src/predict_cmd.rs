//! Predict command: reload a saved model, optionally refit, and forecast.

use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use tracing::{info, info_span};

use augur_arima::{ArimaModel, FileStore, ModelStore};
use augur_evaluate::{ModelSummary, PredictReport};
use augur_io::{read_series, write_json, write_values};

use crate::cli::PredictArgs;
use crate::convert;

const DEFAULT_RESULT_PATH: &str = "predict_result.json";

/// Run the prediction pipeline.
pub fn run(args: PredictArgs) -> Result<()> {
    let _cmd = info_span!("predict").entered();
    if args.periods == 0 {
        bail!("--periods must be at least 1");
    }

    let fitted = FileStore::new()
        .load(&args.model)
        .with_context(|| format!("failed to load model: {}", args.model.display()))?;
    info!(order = %fitted.order(), path = %args.model.display(), "model loaded");
    let mut model = ArimaModel::from_fitted(fitted);

    if let Some(input) = &args.input {
        let reader_cfg =
            convert::reader_config(args.column.as_deref(), args.delimiter.as_deref())?;
        let series = read_series(input, &reader_cfg)
            .with_context(|| format!("failed to read series: {}", input.display()))?;
        let order = model.order();
        let refitted = model
            .refit(series.values())
            .with_context(|| format!("failed to refit {order} on new data"))?;
        info!(nobs = refitted.nobs(), aic = refitted.aic(), "model refitted");
    }

    let forecast = model
        .forecast(args.periods, args.alpha)
        .context("failed to forecast")?;

    if let Some(values_path) = &args.values {
        write_values(values_path, forecast.values())
            .with_context(|| format!("failed to write forecasts: {}", values_path.display()))?;
    }

    let report = PredictReport {
        model: ModelSummary::from(model.fitted()?),
        periods: args.periods,
        forecast,
    };
    let output = args
        .output
        .unwrap_or_else(|| PathBuf::from(DEFAULT_RESULT_PATH));
    write_json(&output, &report)
        .with_context(|| format!("failed to write result: {}", output.display()))?;
    info!(path = %output.display(), "prediction written");
    Ok(())
}
