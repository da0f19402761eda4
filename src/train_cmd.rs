//! Train command: split, order search, persistence and hold-out scoring.

use std::path::PathBuf;

use anyhow::{Context, Result};
use tracing::{info, info_span, warn};

use augur_arima::{FileStore, ModelStore, select_order};
use augur_diagnostics::{DifferencingConfig, recommended_differencing};
use augur_evaluate::{Accuracy, DifferencingSource, ModelSummary, TrainReport};
use augur_io::{read_series, write_json};

use crate::cli::TrainArgs;
use crate::config::AugurConfig;
use crate::convert;

const DEFAULT_MODEL_PATH: &str = "arima_model.json";
const DEFAULT_RESULT_PATH: &str = "train_result.json";

/// Run the full training pipeline.
pub fn run(args: TrainArgs) -> Result<()> {
    let _cmd = info_span!("train").entered();
    // 1. Load project TOML
    let toml_str = std::fs::read_to_string(&args.config)
        .with_context(|| format!("failed to read config file: {}", args.config.display()))?;
    let mut config: AugurConfig =
        toml::from_str(&toml_str).context("failed to parse TOML config")?;

    // 2. Apply CLI overrides
    if let Some(input) = args.input {
        config.io.input = Some(input);
    }
    if let Some(model) = args.model {
        config.io.model = Some(model);
    }
    if let Some(output) = args.output {
        config.io.result = Some(output);
    }
    if let Some(held_out) = args.held_out {
        config.train.held_out = held_out;
    }

    // 3. Read and split the series
    let input =
        config.io.input.as_ref().ok_or_else(|| {
            anyhow::anyhow!("no input path: set [io].input in config or use --input")
        })?;
    let reader_cfg = convert::build_reader_config(&config.io)?;
    info!(path = %input.display(), "reading series");
    let series = read_series(input, &reader_cfg)
        .with_context(|| format!("failed to read series: {}", input.display()))?;
    let split = series
        .split_holdout(config.train.held_out)
        .context("failed to split series into train and test")?;
    info!(
        n_train = split.train().len(),
        n_test = split.horizon(),
        "series split"
    );

    // 4. Differencing order
    let (d, d_source) = match config.search.d {
        Some(d) => (d, DifferencingSource::Config),
        None => {
            let d = recommended_differencing(split.train().values(), &DifferencingConfig::default())
                .context("failed to choose a differencing order")?;
            (d, DifferencingSource::Diagnostics)
        }
    };
    info!(d, source = ?d_source, "differencing order");

    // 5. Order search
    if config.search.seasonal {
        split
            .train()
            .require_seasonal(config.search.period)
            .context("training series too short for seasonal search")?;
    }
    let search_cfg = convert::build_search_config(&config.search, d)?;
    let result = select_order(split.train().values(), &search_cfg).context("order search failed")?;
    let model = result.model();
    info!(order = %model.order(), aic = model.aic(), "model selected");

    // 6. Persist the model
    let model_path = config
        .io
        .model
        .clone()
        .unwrap_or_else(|| PathBuf::from(DEFAULT_MODEL_PATH));
    FileStore::new()
        .save(model, &model_path)
        .with_context(|| format!("failed to save model: {}", model_path.display()))?;
    info!(path = %model_path.display(), "model saved");

    // 7. Forecast and score the hold-out
    let (forecast, accuracy) = if split.horizon() > 0 {
        let fc = model
            .forecast(split.horizon(), config.train.alpha)
            .context("failed to forecast the held-out horizon")?;
        let accuracy = Accuracy::compute(fc.values(), split.test())
            .context("failed to score the forecast")?;
        info!(rmse = accuracy.rmse, mae = accuracy.mae, "hold-out scored");
        (fc.into_values(), Some(accuracy))
    } else {
        warn!("no observations held out, skipping scoring");
        (Vec::new(), None)
    };

    // 8. Write the report
    let report = TrainReport {
        model: ModelSummary::from(model),
        d,
        d_source,
        n_train: split.train().len(),
        n_test: split.horizon(),
        forecast,
        test: split.test().to_vec(),
        accuracy,
        search: result.trace().to_vec(),
        model_path: model_path.display().to_string(),
    };
    let result_path = config
        .io
        .result
        .unwrap_or_else(|| PathBuf::from(DEFAULT_RESULT_PATH));
    write_json(&result_path, &report)
        .with_context(|| format!("failed to write result: {}", result_path.display()))?;
    info!(path = %result_path.display(), "train report written");
    Ok(())
}
