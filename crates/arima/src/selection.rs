//! AIC-based SARIMA order search.
//!
//! The default [`Strategy::Stepwise`] search is a greedy hill climb over the
//! `(p, q)` grid (and `(P, Q)` when seasonal) with `d` and `D` held fixed:
//!
//! 1. Fit the seed orders: the lower bounds, then AR-only, MA-only and
//!    mixed orders above them (`(1,0)`, `(0,1)`, `(2,2)` relative to the
//!    bounds, with the seasonal terms raised alongside), capped at the maxima.
//! 2. Fit every unvisited neighbour of the best order, one coordinate moved
//!    by ±1 and clamped to the bounds.
//! 3. Move to the best neighbour if it beats the best AIC so far, else stop.
//!
//! Orders that fail to fit are skipped. While nothing has fitted, step 2
//! expands from every order tried so far, so the search widens ring by ring
//! until a model fits or the grid runs out.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::error::ArimaError;
use crate::fit::FittedModel;
use crate::optimizer::FitOptions;
use crate::spec::OrderSpec;

/// How candidate orders are enumerated.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Strategy {
    /// Greedy neighbour search from the lower bounds.
    #[default]
    Stepwise,
    /// Every order in the bounds.
    Exhaustive,
}

/// Seasonal part of a search: fixed period and `D`, bounds for `P` and `Q`.
///
/// Defaults: `D = 0`, `P` and `Q` in `0..=2`.
#[derive(Clone, Debug, PartialEq)]
pub struct SeasonalSearch {
    period: usize,
    d: usize,
    p_start: usize,
    p_max: usize,
    q_start: usize,
    q_max: usize,
}

impl SeasonalSearch {
    /// Creates a seasonal search with period `m`.
    pub fn new(period: usize) -> Self {
        Self {
            period,
            d: 0,
            p_start: 0,
            p_max: 2,
            q_start: 0,
            q_max: 2,
        }
    }

    /// Sets the seasonal differencing order `D`.
    pub fn with_d(mut self, d: usize) -> Self {
        self.d = d;
        self
    }

    /// Sets the bounds of `P`.
    pub fn with_p(mut self, start: usize, max: usize) -> Self {
        self.p_start = start;
        self.p_max = max;
        self
    }

    /// Sets the bounds of `Q`.
    pub fn with_q(mut self, start: usize, max: usize) -> Self {
        self.q_start = start;
        self.q_max = max;
        self
    }

    /// Returns the seasonal period `m`.
    pub fn period(&self) -> usize {
        self.period
    }

    /// Returns the seasonal differencing order `D`.
    pub fn d(&self) -> usize {
        self.d
    }

    /// Returns the `(start, max)` bounds of `P`.
    pub fn p_bounds(&self) -> (usize, usize) {
        (self.p_start, self.p_max)
    }

    /// Returns the `(start, max)` bounds of `Q`.
    pub fn q_bounds(&self) -> (usize, usize) {
        (self.q_start, self.q_max)
    }

    /// Validates this configuration.
    ///
    /// Returns an error if the period is below 2 or a lower bound exceeds
    /// its upper bound.
    pub fn validate(&self) -> Result<(), ArimaError> {
        if self.period < 2 {
            return Err(ArimaError::InvalidConfig {
                reason: format!("seasonal period must be at least 2, got {}", self.period),
            });
        }
        check_bounds("P", self.p_start, self.p_max)?;
        check_bounds("Q", self.q_start, self.q_max)
    }
}

/// Configuration for [`select_order`].
///
/// # Example
///
/// ```
/// use augur_arima::{SearchConfig, SeasonalSearch, Strategy};
///
/// let config = SearchConfig::default()
///     .with_p(0, 3)
///     .with_q(0, 2)
///     .with_d(1)
///     .with_seasonal(SeasonalSearch::new(12).with_d(1))
///     .with_strategy(Strategy::Stepwise);
///
/// assert!(config.validate().is_ok());
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct SearchConfig {
    p_start: usize,
    p_max: usize,
    q_start: usize,
    q_max: usize,
    d: usize,
    seasonal: Option<SeasonalSearch>,
    max_steps: usize,
    strategy: Strategy,
    fit_options: FitOptions,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            p_start: 0,
            p_max: 3,
            q_start: 0,
            q_max: 3,
            d: 0,
            seasonal: None,
            max_steps: 100,
            strategy: Strategy::Stepwise,
            fit_options: FitOptions::default(),
        }
    }
}

impl SearchConfig {
    /// Sets the bounds of `p`.
    pub fn with_p(mut self, start: usize, max: usize) -> Self {
        self.p_start = start;
        self.p_max = max;
        self
    }

    /// Sets the bounds of `q`.
    pub fn with_q(mut self, start: usize, max: usize) -> Self {
        self.q_start = start;
        self.q_max = max;
        self
    }

    /// Sets the differencing order `d`.
    pub fn with_d(mut self, d: usize) -> Self {
        self.d = d;
        self
    }

    /// Enables the seasonal search.
    pub fn with_seasonal(mut self, seasonal: SeasonalSearch) -> Self {
        self.seasonal = Some(seasonal);
        self
    }

    /// Sets the stepwise budget (number of moves).
    pub fn with_max_steps(mut self, max_steps: usize) -> Self {
        self.max_steps = max_steps;
        self
    }

    /// Sets the search strategy.
    pub fn with_strategy(mut self, strategy: Strategy) -> Self {
        self.strategy = strategy;
        self
    }

    /// Sets the options every candidate is fitted with.
    pub fn with_fit_options(mut self, fit_options: FitOptions) -> Self {
        self.fit_options = fit_options;
        self
    }

    /// Returns the `(start, max)` bounds of `p`.
    pub fn p_bounds(&self) -> (usize, usize) {
        (self.p_start, self.p_max)
    }

    /// Returns the `(start, max)` bounds of `q`.
    pub fn q_bounds(&self) -> (usize, usize) {
        (self.q_start, self.q_max)
    }

    /// Returns the differencing order `d`.
    pub fn d(&self) -> usize {
        self.d
    }

    /// Returns the seasonal search, if enabled.
    pub fn seasonal(&self) -> Option<&SeasonalSearch> {
        self.seasonal.as_ref()
    }

    /// Returns the stepwise budget.
    pub fn max_steps(&self) -> usize {
        self.max_steps
    }

    /// Returns the search strategy.
    pub fn strategy(&self) -> Strategy {
        self.strategy
    }

    /// Returns the candidate fit options.
    pub fn fit_options(&self) -> &FitOptions {
        &self.fit_options
    }

    /// Validates this configuration.
    ///
    /// Returns an error if a lower bound exceeds its upper bound, the step
    /// budget is zero, or the seasonal part or fit options are invalid.
    pub fn validate(&self) -> Result<(), ArimaError> {
        check_bounds("p", self.p_start, self.p_max)?;
        check_bounds("q", self.q_start, self.q_max)?;
        if self.max_steps == 0 {
            return Err(ArimaError::InvalidConfig {
                reason: "max_steps must be at least 1".to_string(),
            });
        }
        if let Some(s) = &self.seasonal {
            s.validate()?;
        }
        self.fit_options.validate()
    }

    fn start(&self) -> OrderSpec {
        let order = OrderSpec::new(self.p_start, self.d, self.q_start);
        match &self.seasonal {
            Some(s) => order.with_seasonal(s.p_start, s.d, s.q_start, s.period),
            None => order,
        }
    }

    fn seeds(&self) -> Vec<OrderSpec> {
        let start = self.start();
        let mut seeds: Vec<OrderSpec> = Vec::with_capacity(4);
        for (dp, dq, dsp, dsq) in [(0, 0, 0, 0), (1, 0, 1, 0), (0, 1, 0, 1), (2, 2, 1, 1)] {
            let (sp, sq) = match &self.seasonal {
                Some(s) => (
                    (s.p_start + dsp).min(s.p_max),
                    (s.q_start + dsq).min(s.q_max),
                ),
                None => (0, 0),
            };
            let order = start.with_arma(
                (self.p_start + dp).min(self.p_max),
                (self.q_start + dq).min(self.q_max),
                sp,
                sq,
            );
            if !seeds.contains(&order) {
                seeds.push(order);
            }
        }
        seeds
    }

    fn contains(&self, o: &OrderSpec) -> bool {
        let inner = (self.p_start..=self.p_max).contains(&o.p())
            && (self.q_start..=self.q_max).contains(&o.q());
        match &self.seasonal {
            Some(s) => {
                inner
                    && (s.p_start..=s.p_max).contains(&o.seasonal_p())
                    && (s.q_start..=s.q_max).contains(&o.seasonal_q())
            }
            None => inner,
        }
    }

    /// Orders one coordinate away from `o`, inside the bounds.
    fn neighbours(&self, o: &OrderSpec) -> Vec<OrderSpec> {
        let (p, q, sp, sq) = (o.p(), o.q(), o.seasonal_p(), o.seasonal_q());
        let mut moves = vec![(p + 1, q, sp, sq), (p, q + 1, sp, sq)];
        if p > 0 {
            moves.push((p - 1, q, sp, sq));
        }
        if q > 0 {
            moves.push((p, q - 1, sp, sq));
        }
        if self.seasonal.is_some() {
            moves.push((p, q, sp + 1, sq));
            moves.push((p, q, sp, sq + 1));
            if sp > 0 {
                moves.push((p, q, sp - 1, sq));
            }
            if sq > 0 {
                moves.push((p, q, sp, sq - 1));
            }
        }
        moves
            .into_iter()
            .map(|(p, q, sp, sq)| o.with_arma(p, q, sp, sq))
            .filter(|n| self.contains(n))
            .collect()
    }

    fn grid(&self) -> Vec<OrderSpec> {
        let (sp, sq) = match &self.seasonal {
            Some(s) => ((s.p_start..=s.p_max), (s.q_start..=s.q_max)),
            None => ((0..=0), (0..=0)),
        };
        let start = self.start();
        let mut orders = Vec::new();
        for p in self.p_start..=self.p_max {
            for q in self.q_start..=self.q_max {
                for s_p in sp.clone() {
                    for s_q in sq.clone() {
                        orders.push(start.with_arma(p, q, s_p, s_q));
                    }
                }
            }
        }
        orders
    }
}

fn check_bounds(name: &str, start: usize, max: usize) -> Result<(), ArimaError> {
    if start > max {
        return Err(ArimaError::InvalidConfig {
            reason: format!("{name} start {start} exceeds max {max}"),
        });
    }
    Ok(())
}

/// Result of evaluating one candidate order.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CandidateOutcome {
    /// Candidate order.
    pub order: OrderSpec,
    /// AIC when the fit succeeded.
    pub aic: Option<f64>,
    /// Failure reason when it did not.
    pub error: Option<String>,
}

/// Best model found by [`select_order`], plus every candidate it tried.
#[derive(Clone, Debug)]
pub struct SearchResult {
    model: FittedModel,
    trace: Vec<CandidateOutcome>,
}

impl SearchResult {
    /// The winning fit.
    pub fn model(&self) -> &FittedModel {
        &self.model
    }

    /// The winning order.
    pub fn order(&self) -> OrderSpec {
        self.model.order()
    }

    /// Every candidate in evaluation order.
    pub fn trace(&self) -> &[CandidateOutcome] {
        &self.trace
    }

    /// Consumes the result and returns the winning fit.
    pub fn into_model(self) -> FittedModel {
        self.model
    }
}

/// `true` when `a` ranks strictly ahead of `b`: lower AIC, then fewer
/// parameters, then smaller `p`, then smaller `q`.
fn is_better(a: &FittedModel, b: &FittedModel) -> bool {
    let (x, y) = (a.aic(), b.aic());
    let tol = 1e-9 * x.abs().max(y.abs()).max(1.0);
    if (x - y).abs() > tol {
        return x < y;
    }
    let key = |m: &FittedModel| {
        let o = m.order();
        (m.n_params(), o.p(), o.q(), o.seasonal_p(), o.seasonal_q())
    };
    key(a) < key(b)
}

struct Search<'a> {
    data: &'a [f64],
    options: &'a FitOptions,
    visited: HashSet<OrderSpec>,
    trace: Vec<CandidateOutcome>,
    best: Option<FittedModel>,
}

impl<'a> Search<'a> {
    fn new(data: &'a [f64], options: &'a FitOptions) -> Self {
        Self {
            data,
            options,
            visited: HashSet::new(),
            trace: Vec::new(),
            best: None,
        }
    }

    fn evaluate(&mut self, order: OrderSpec) {
        if !self.visited.insert(order) {
            return;
        }
        match order.fit(self.data, self.options) {
            Ok(model) => {
                let aic = model.aic();
                debug!(%order, aic, "candidate fitted");
                self.trace.push(CandidateOutcome {
                    order,
                    aic: Some(aic),
                    error: None,
                });
                if self.best.as_ref().is_none_or(|b| is_better(&model, b)) {
                    self.best = Some(model);
                }
            }
            Err(e) => {
                debug!(%order, error = %e, "candidate skipped");
                self.trace.push(CandidateOutcome {
                    order,
                    aic: None,
                    error: Some(e.to_string()),
                });
            }
        }
    }

    fn best_order(&self) -> Option<OrderSpec> {
        self.best.as_ref().map(FittedModel::order)
    }

    fn finish(self) -> Result<SearchResult, ArimaError> {
        let tried = self.trace.len();
        match self.best {
            Some(model) => {
                info!(
                    order = %model.order(),
                    aic = model.aic(),
                    candidates = tried,
                    "order search complete"
                );
                Ok(SearchResult {
                    model,
                    trace: self.trace,
                })
            }
            None => Err(ArimaError::NoViableModel { tried }),
        }
    }
}

/// Searches for the SARIMA order with the lowest AIC.
///
/// `d` (and `D`) are taken from `config` as given; use
/// `augur_diagnostics::recommended_differencing` beforehand to choose them.
///
/// # Errors
///
/// | Variant | Trigger |
/// |---------|---------|
/// | [`ArimaError::InvalidConfig`] | bounds or options are invalid |
/// | [`ArimaError::EmptyData`] / [`ArimaError::NonFiniteData`] | unusable input |
/// | [`ArimaError::InsufficientData`] | seasonal search with fewer than `2m` observations |
/// | [`ArimaError::NoViableModel`] | no candidate could be fitted |
#[tracing::instrument(skip_all, fields(n = data.len(), strategy = ?config.strategy()))]
pub fn select_order(data: &[f64], config: &SearchConfig) -> Result<SearchResult, ArimaError> {
    config.validate()?;
    if data.is_empty() {
        return Err(ArimaError::EmptyData);
    }
    if data.iter().any(|x| !x.is_finite()) {
        return Err(ArimaError::NonFiniteData);
    }
    if let Some(s) = config.seasonal() {
        let min = 2 * s.period();
        if data.len() < min {
            return Err(ArimaError::InsufficientData { n: data.len(), min });
        }
    }

    let mut search = Search::new(data, config.fit_options());
    match config.strategy() {
        Strategy::Exhaustive => {
            for order in config.grid() {
                search.evaluate(order);
            }
        }
        Strategy::Stepwise => stepwise(&mut search, config),
    }
    search.finish()
}

fn stepwise(search: &mut Search<'_>, config: &SearchConfig) {
    for order in config.seeds() {
        search.evaluate(order);
    }

    for step in 1..=config.max_steps() {
        let current = search.best_order();
        let bases: Vec<OrderSpec> = match current {
            Some(order) => vec![order],
            None => search.trace.iter().map(|c| c.order).collect(),
        };
        let candidates: Vec<OrderSpec> = bases
            .iter()
            .flat_map(|o| config.neighbours(o))
            .filter(|o| !search.visited.contains(o))
            .collect();
        if candidates.is_empty() {
            debug!(step, "no unvisited neighbours");
            return;
        }
        for order in candidates {
            search.evaluate(order);
        }
        if current.is_some() && search.best_order() == current {
            debug!(step, "local optimum reached");
            return;
        }
    }
    warn!(max_steps = config.max_steps(), "stepwise budget exhausted");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::optimizer::Intercept;

    fn noise(n: usize) -> Vec<f64> {
        // Deterministic, roughly uncorrelated sequence.
        (0..n)
            .map(|i| ((i as f64 * 12.9898).sin() * 43758.5453).fract() - 0.5)
            .collect()
    }

    #[test]
    fn config_defaults() {
        let c = SearchConfig::default();
        assert_eq!(c.p_bounds(), (0, 3));
        assert_eq!(c.q_bounds(), (0, 3));
        assert_eq!(c.d(), 0);
        assert_eq!(c.max_steps(), 100);
        assert_eq!(c.strategy(), Strategy::Stepwise);
        assert!(c.seasonal().is_none());
        assert!(c.validate().is_ok());

        let s = SeasonalSearch::new(12);
        assert_eq!(s.p_bounds(), (0, 2));
        assert_eq!(s.q_bounds(), (0, 2));
        assert_eq!(s.d(), 0);
    }

    #[test]
    fn config_validation() {
        assert!(matches!(
            SearchConfig::default().with_p(3, 1).validate(),
            Err(ArimaError::InvalidConfig { .. })
        ));
        assert!(matches!(
            SearchConfig::default().with_max_steps(0).validate(),
            Err(ArimaError::InvalidConfig { .. })
        ));
        assert!(matches!(
            SearchConfig::default()
                .with_seasonal(SeasonalSearch::new(1))
                .validate(),
            Err(ArimaError::InvalidConfig { .. })
        ));
    }

    #[test]
    fn neighbours_respect_bounds() {
        let c = SearchConfig::default().with_p(0, 1).with_q(0, 1);
        let n = c.neighbours(&OrderSpec::new(0, 0, 0));
        assert_eq!(n, vec![OrderSpec::new(1, 0, 0), OrderSpec::new(0, 0, 1)]);

        let n = c.neighbours(&OrderSpec::new(1, 0, 1));
        assert_eq!(n, vec![OrderSpec::new(0, 0, 1), OrderSpec::new(1, 0, 0)]);
    }

    #[test]
    fn seasonal_neighbours_move_seasonal_terms() {
        let c = SearchConfig::default()
            .with_p(0, 0)
            .with_q(0, 0)
            .with_seasonal(SeasonalSearch::new(4).with_p(0, 1).with_q(0, 1));
        let start = c.start();
        assert_eq!(start, OrderSpec::new(0, 0, 0).with_seasonal(0, 0, 0, 4));
        assert_eq!(
            c.neighbours(&start),
            vec![
                OrderSpec::new(0, 0, 0).with_seasonal(1, 0, 0, 4),
                OrderSpec::new(0, 0, 0).with_seasonal(0, 0, 1, 4),
            ]
        );
        assert_eq!(c.grid().len(), 4);
    }

    #[test]
    fn seeds_are_capped_and_distinct() {
        let c = SearchConfig::default();
        assert_eq!(
            c.seeds(),
            vec![
                OrderSpec::new(0, 0, 0),
                OrderSpec::new(1, 0, 0),
                OrderSpec::new(0, 0, 1),
                OrderSpec::new(2, 0, 2),
            ]
        );

        let c = SearchConfig::default().with_p(1, 2).with_q(0, 0).with_d(1);
        assert_eq!(
            c.seeds(),
            vec![OrderSpec::new(1, 1, 0), OrderSpec::new(2, 1, 0)]
        );

        let c = SearchConfig::default()
            .with_p(0, 1)
            .with_q(0, 1)
            .with_seasonal(SeasonalSearch::new(4).with_p(0, 1).with_q(0, 0));
        assert_eq!(
            c.seeds(),
            vec![
                OrderSpec::new(0, 0, 0).with_seasonal(0, 0, 0, 4),
                OrderSpec::new(1, 0, 0).with_seasonal(1, 0, 0, 4),
                OrderSpec::new(0, 0, 1).with_seasonal(0, 0, 0, 4),
                OrderSpec::new(1, 0, 1).with_seasonal(1, 0, 0, 4),
            ]
        );
    }

    #[test]
    fn collapsed_bounds_fit_once() {
        let config = SearchConfig::default().with_p(1, 1).with_q(0, 0);
        let result = select_order(&noise(80), &config).unwrap();
        assert_eq!(result.order(), OrderSpec::new(1, 0, 0));
        assert_eq!(result.trace().len(), 1);
    }

    #[test]
    fn exhaustive_evaluates_whole_grid() {
        let config = SearchConfig::default()
            .with_p(0, 1)
            .with_q(0, 1)
            .with_strategy(Strategy::Exhaustive);
        let result = select_order(&noise(80), &config).unwrap();
        assert_eq!(result.trace().len(), 4);
        let best = result.model().aic();
        for c in result.trace() {
            if let Some(aic) = c.aic {
                assert!(best <= aic + 1e-9);
            }
        }
    }

    #[test]
    fn all_failures_is_no_viable_model() {
        // Degenerate start with the constant excluded, and every other order
        // fails on constant data.
        let config = SearchConfig::default()
            .with_p(0, 1)
            .with_q(0, 1)
            .with_fit_options(FitOptions::default().with_intercept(Intercept::Exclude));
        let err = select_order(&[2.0; 30], &config).unwrap_err();
        assert_eq!(err, ArimaError::NoViableModel { tried: 4 });
    }

    #[test]
    fn failed_start_expands_outward() {
        // (0,0,0) without a constant is degenerate; the search must move on.
        let config = SearchConfig::default()
            .with_p(0, 2)
            .with_q(0, 2)
            .with_fit_options(FitOptions::default().with_intercept(Intercept::Exclude));
        let result = select_order(&noise(100), &config).unwrap();
        assert!(result.trace()[0].error.is_some());
        assert_ne!(result.order(), OrderSpec::new(0, 0, 0));
    }

    #[test]
    fn seasonal_search_needs_two_periods() {
        let config = SearchConfig::default().with_seasonal(SeasonalSearch::new(12));
        assert_eq!(
            select_order(&noise(20), &config).unwrap_err(),
            ArimaError::InsufficientData { n: 20, min: 24 }
        );
    }

    #[test]
    fn rejects_bad_input() {
        let config = SearchConfig::default();
        assert_eq!(select_order(&[], &config).unwrap_err(), ArimaError::EmptyData);
        assert_eq!(
            select_order(&[1.0, f64::NAN, 2.0], &config).unwrap_err(),
            ArimaError::NonFiniteData
        );
    }
}
