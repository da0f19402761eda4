use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// augur ARIMA order selection and forecasting pipeline.
#[derive(Parser)]
#[command(
    name = "augur",
    version,
    about = "Stepwise ARIMA/SARIMA order selection and forecasting"
)]
pub struct Cli {
    /// Increase verbosity (-v info, -vv debug, -vvv trace).
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Subcommand to run.
    #[command(subcommand)]
    pub command: Command,
}

/// Available subcommands.
#[derive(Subcommand)]
pub enum Command {
    /// Recommend a differencing order and compute ACF/PACF.
    Analyse(AnalyseArgs),
    /// Search for an order, fit, save the model and score a hold-out.
    Train(TrainArgs),
    /// Load a saved model, refit on new data and forecast.
    Predict(PredictArgs),
}

/// Arguments for the `analyse` subcommand.
#[derive(clap::Args)]
pub struct AnalyseArgs {
    /// Path to the series file.
    #[arg(short, long)]
    pub input: PathBuf,

    /// Differencing order for the correlogram (default: recommended, max 2).
    #[arg(short, long)]
    pub diff: Option<usize>,

    /// Largest lag of the ACF/PACF.
    #[arg(long = "max-lag", default_value_t = augur_diagnostics::DEFAULT_MAX_LAG)]
    pub max_lag: usize,

    /// Significance level of the correlogram band.
    #[arg(long, default_value_t = 0.05)]
    pub alpha: f64,

    /// Significance level of each ADF stationarity test.
    #[arg(long = "adf-alpha", default_value_t = 0.05)]
    pub adf_alpha: f64,

    /// Header name of the value column.
    #[arg(long)]
    pub column: Option<String>,

    /// Single-character field separator (detected when omitted).
    #[arg(long)]
    pub delimiter: Option<String>,

    /// Path for the analysis JSON (default: <input>.analysis.json).
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

/// Arguments for the `train` subcommand.
#[derive(clap::Args)]
pub struct TrainArgs {
    /// Path to TOML configuration file.
    #[arg(short, long, default_value = "augur.toml")]
    pub config: PathBuf,

    /// Override input series path from config.
    #[arg(short, long)]
    pub input: Option<PathBuf>,

    /// Override model output path from config.
    #[arg(short, long)]
    pub model: Option<PathBuf>,

    /// Override result JSON path from config.
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Override the number of held-out observations.
    #[arg(long = "held-out")]
    pub held_out: Option<usize>,
}

/// Arguments for the `predict` subcommand.
#[derive(clap::Args)]
pub struct PredictArgs {
    /// Path to a saved model.
    #[arg(short, long)]
    pub model: PathBuf,

    /// Series to refit the model on; forecasts continue the saved data when omitted.
    #[arg(short, long)]
    pub input: Option<PathBuf>,

    /// Number of periods to forecast.
    #[arg(short = 'n', long)]
    pub periods: usize,

    /// Significance level of prediction intervals.
    #[arg(short, long)]
    pub alpha: Option<f64>,

    /// Header name of the value column.
    #[arg(long)]
    pub column: Option<String>,

    /// Single-character field separator (detected when omitted).
    #[arg(long)]
    pub delimiter: Option<String>,

    /// Path for the prediction JSON (default: predict_result.json).
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Also write the point forecasts, one per line.
    #[arg(long)]
    pub values: Option<PathBuf>,
}
