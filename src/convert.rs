//! Pure conversion functions: TOML config structs -> crate API config types.

use anyhow::{Result, bail};

use augur_arima::{FitOptions, Intercept, SearchConfig, SeasonalSearch, Strategy};
use augur_io::{Column, ReaderConfig};

use crate::config::{IoToml, SearchToml};

/// Parses an intercept policy name into the corresponding enum variant.
pub fn parse_intercept(s: &str) -> Result<Intercept> {
    match s.to_lowercase().as_str() {
        "auto" => Ok(Intercept::Auto),
        "include" | "true" => Ok(Intercept::Include),
        "exclude" | "false" => Ok(Intercept::Exclude),
        other => bail!("unknown intercept policy '{other}': expected auto, include or exclude"),
    }
}

/// Builds a [`ReaderConfig`] from the TOML I/O configuration.
pub fn build_reader_config(io: &IoToml) -> Result<ReaderConfig> {
    reader_config(io.column.as_deref(), io.delimiter.as_deref())
}

/// Builds a [`ReaderConfig`] from an optional column name and delimiter.
pub fn reader_config(column: Option<&str>, delimiter: Option<&str>) -> Result<ReaderConfig> {
    let mut cfg = ReaderConfig::default();
    if let Some(name) = column {
        cfg = cfg.with_column(Column::Name(name.to_string()));
    }
    if let Some(d) = delimiter {
        let mut chars = d.chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) => cfg = cfg.with_delimiter(Some(c)),
            _ => bail!("delimiter must be a single character, got {d:?}"),
        }
    }
    cfg.validate()?;
    Ok(cfg)
}

/// Builds a [`SearchConfig`] from the TOML search configuration.
///
/// `d` is the differencing order already resolved by the caller (from the
/// config or from the stationarity test).
pub fn build_search_config(search: &SearchToml, d: usize) -> Result<SearchConfig> {
    let fit_options = FitOptions::default().with_intercept(parse_intercept(&search.intercept)?);
    let strategy = if search.stepwise {
        Strategy::Stepwise
    } else {
        Strategy::Exhaustive
    };
    let mut cfg = SearchConfig::default()
        .with_p(search.p_start, search.p_max)
        .with_q(search.q_start, search.q_max)
        .with_d(d)
        .with_max_steps(search.max_steps)
        .with_strategy(strategy)
        .with_fit_options(fit_options);
    if search.seasonal {
        let seasonal = SeasonalSearch::new(search.period)
            .with_d(search.seasonal_d.unwrap_or(d))
            .with_p(0, search.seasonal_p_max)
            .with_q(0, search.seasonal_q_max);
        cfg = cfg.with_seasonal(seasonal);
    }
    cfg.validate()?;
    Ok(cfg)
}
