//! Analyse command: stationarity test and correlogram of a single series.

use anyhow::{Context, Result};
use tracing::{info, info_span};

use augur_diagnostics::{DifferencingConfig, correlogram, recommended_differencing};
use augur_evaluate::AnalysisReport;
use augur_io::{read_series, write_json};

use crate::cli::AnalyseArgs;
use crate::convert;

/// Largest differencing order the correlogram is computed at.
const MAX_CORRELOGRAM_DIFF: usize = 2;

/// Run the analysis and write the report as JSON.
pub fn run(args: AnalyseArgs) -> Result<()> {
    let _cmd = info_span!("analyse").entered();

    let reader_cfg = convert::reader_config(args.column.as_deref(), args.delimiter.as_deref())?;
    info!(path = %args.input.display(), "reading series");
    let series = read_series(&args.input, &reader_cfg)
        .with_context(|| format!("failed to read series: {}", args.input.display()))?;

    let diff_cfg = DifferencingConfig::default().with_alpha(args.adf_alpha);
    let recommended_d = recommended_differencing(series.values(), &diff_cfg)
        .context("stationarity test failed")?;
    info!(recommended_d, "differencing order recommended");

    let diff_order = args.diff.unwrap_or(recommended_d).min(MAX_CORRELOGRAM_DIFF);
    let correlogram = correlogram(series.values(), args.max_lag, diff_order)
        .with_context(|| format!("failed to compute ACF/PACF at d = {diff_order}"))?;
    let significance_bound = correlogram.significance_bound(args.alpha)?;

    let report = AnalysisReport {
        n_obs: series.len(),
        recommended_d,
        adf_alpha: args.adf_alpha,
        alpha: args.alpha,
        significance_bound,
        correlogram,
    };

    let output = args
        .output
        .unwrap_or_else(|| args.input.with_extension("analysis.json"));
    write_json(&output, &report)
        .with_context(|| format!("failed to write analysis: {}", output.display()))?;
    info!(path = %output.display(), "analysis written");
    Ok(())
}
