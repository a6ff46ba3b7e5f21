//! Seasonal ARIMA fitted by conditional sum of squares.
//!
//! The model on the differenced series `w = (1-B)^d (1-B^s)^D y` is
//!
//! ```text
//! phi(B) Phi(B^s) w_t = theta(B) Theta(B^s) e_t
//! ```
//!
//! Pre-sample values of `w` and `e` are taken as zero. Each coefficient is kept
//! inside (-1, 1) by optimising `tanh`-transformed parameters.

use tracing::{debug, warn};

use crate::{
    error::{ForecastError, Result},
    forecast::optimize::{nelder_mead, NelderMeadOptions},
};

/// Orders of a seasonal ARIMA(p,d,q)(P,D,Q,s) model.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SarimaOrder {
    pub p: usize,
    pub d: usize,
    pub q: usize,
    pub seasonal_p: usize,
    pub seasonal_d: usize,
    pub seasonal_q: usize,
    pub period: usize,
}

impl SarimaOrder {
    /// (1,1,1)x(1,1,1,12): monthly data with a yearly cycle.
    pub const MONTHLY: SarimaOrder = SarimaOrder {
        p: 1,
        d: 1,
        q: 1,
        seasonal_p: 1,
        seasonal_d: 1,
        seasonal_q: 1,
        period: 12,
    };

    /// Observations consumed by differencing.
    pub fn differencing_lag(&self) -> usize {
        self.d + self.seasonal_d * self.period
    }

    /// Fewest observations for which coefficients are estimated.
    pub fn min_observations(&self) -> usize {
        self.differencing_lag() + 1
    }

    fn parameter_count(&self) -> usize {
        self.p + self.q + self.seasonal_p + self.seasonal_q
    }
}

impl Default for SarimaOrder {
    fn default() -> Self {
        Self::MONTHLY
    }
}

/// Fitted coefficients, in the sign convention of the model equation above.
#[derive(Debug, Clone, PartialEq)]
pub struct SarimaParams {
    pub ar: Vec<f64>,
    pub ma: Vec<f64>,
    pub seasonal_ar: Vec<f64>,
    pub seasonal_ma: Vec<f64>,
}

impl SarimaParams {
    fn zeros(order: &SarimaOrder) -> Self {
        Self {
            ar: vec![0.0; order.p],
            ma: vec![0.0; order.q],
            seasonal_ar: vec![0.0; order.seasonal_p],
            seasonal_ma: vec![0.0; order.seasonal_q],
        }
    }

    fn from_unconstrained(order: &SarimaOrder, raw: &[f64]) -> Self {
        let mut it = raw.iter().map(|u| u.tanh());
        let mut take = |n: usize| -> Vec<f64> { it.by_ref().take(n).collect() };
        let ar = take(order.p);
        let ma = take(order.q);
        let seasonal_ar = take(order.seasonal_p);
        let seasonal_ma = take(order.seasonal_q);
        Self {
            ar,
            ma,
            seasonal_ar,
            seasonal_ma,
        }
    }

    /// Lag polynomial `phi(B) Phi(B^s)` as `[1, c1, c2, ...]`.
    fn ar_polynomial(&self, period: usize) -> Vec<f64> {
        let short = lag_polynomial(&self.ar, 1, -1.0);
        let seasonal = lag_polynomial(&self.seasonal_ar, period, -1.0);
        poly_mul(&short, &seasonal)
    }

    /// Lag polynomial `theta(B) Theta(B^s)` as `[1, c1, c2, ...]`.
    fn ma_polynomial(&self, period: usize) -> Vec<f64> {
        let short = lag_polynomial(&self.ma, 1, 1.0);
        let seasonal = lag_polynomial(&self.seasonal_ma, period, 1.0);
        poly_mul(&short, &seasonal)
    }
}

/// Unfitted model with fixed orders.
#[derive(Debug, Clone, Default)]
pub struct SeasonalArima {
    order: SarimaOrder,
}

/// A model fitted to one series, ready to forecast.
#[derive(Debug, Clone)]
pub struct FittedSarima {
    order: SarimaOrder,
    params: SarimaParams,
    /// Innovation variance estimate (CSS / n).
    sigma2: f64,
    history: Vec<f64>,
    differenced: Vec<f64>,
    residuals: Vec<f64>,
}

impl SeasonalArima {
    pub fn new(order: SarimaOrder) -> Self {
        Self { order }
    }

    pub fn order(&self) -> SarimaOrder {
        self.order
    }

    /// Fit to `values`.
    ///
    /// Series too short to difference fully are not estimated: the ARMA
    /// coefficients stay at zero and forecasts come from the differencing
    /// recursion alone.
    pub fn fit(&self, values: &[f64]) -> Result<FittedSarima> {
        let order = self.order;
        if values.is_empty() {
            return Err(ForecastError::processing("cannot fit an empty series"));
        }
        if values.iter().any(|v| !v.is_finite()) {
            return Err(ForecastError::processing("series contains non-finite values"));
        }
        if values.len() < order.min_observations() {
            warn!(
                observations = values.len(),
                required = order.min_observations(),
                "too few observations to estimate; using zero ARMA coefficients"
            );
            return Ok(FittedSarima {
                order,
                params: SarimaParams::zeros(&order),
                sigma2: 0.0,
                history: values.to_vec(),
                differenced: Vec::new(),
                residuals: Vec::new(),
            });
        }

        let diff = difference_polynomial(&order);
        let differenced = apply_difference(values, &diff);

        let objective = |raw: &[f64]| {
            let params = SarimaParams::from_unconstrained(&order, raw);
            let residuals = innovations(&differenced, &params, order.period);
            residuals.iter().map(|e| e * e).sum::<f64>()
        };
        let start = vec![0.0; order.parameter_count()];
        let minimum = nelder_mead(objective, &start, NelderMeadOptions::default());
        if !minimum.value.is_finite() {
            return Err(ForecastError::processing(
                "SARIMA fit did not converge to a finite sum of squares",
            ));
        }

        let params = SarimaParams::from_unconstrained(&order, &minimum.point);
        let residuals = innovations(&differenced, &params, order.period);
        let sigma2 = minimum.value / differenced.len() as f64;
        debug!(
            iterations = minimum.iterations,
            css = minimum.value,
            ?params,
            "fitted seasonal arima"
        );

        Ok(FittedSarima {
            order,
            params,
            sigma2,
            history: values.to_vec(),
            differenced,
            residuals,
        })
    }
}

impl FittedSarima {
    pub fn params(&self) -> &SarimaParams {
        &self.params
    }

    pub fn sigma2(&self) -> f64 {
        self.sigma2
    }

    /// Point forecasts for the next `horizon` periods, on the level of the input.
    pub fn forecast(&self, horizon: usize) -> Vec<f64> {
        let period = self.order.period;
        let ar = self.params.ar_polynomial(period);
        let ma = self.params.ma_polynomial(period);

        let mut w = self.differenced.clone();
        let mut e = self.residuals.clone();
        for _ in 0..horizon {
            let t = w.len();
            let mut next = 0.0;
            for (k, c) in ar.iter().enumerate().skip(1) {
                if let Some(past) = t.checked_sub(k) {
                    next -= c * w[past];
                }
            }
            for (k, c) in ma.iter().enumerate().skip(1) {
                if let Some(past) = t.checked_sub(k) {
                    next += c * e[past];
                }
            }
            w.push(next);
            e.push(0.0);
        }

        let diff = difference_polynomial(&self.order);
        let mut y = self.history.clone();
        for step in &w[self.differenced.len()..] {
            let t = y.len();
            let mut level = *step;
            for (k, c) in diff.iter().enumerate().skip(1) {
                // lags before the first observation repeat the earliest value
                level -= c * y[t.saturating_sub(k)];
            }
            y.push(level);
        }
        y.split_off(self.history.len())
    }
}

/// `[1, sign*c1 at lag step, sign*c2 at lag 2*step, ...]`.
fn lag_polynomial(coefficients: &[f64], step: usize, sign: f64) -> Vec<f64> {
    let mut poly = vec![0.0; coefficients.len() * step + 1];
    poly[0] = 1.0;
    for (i, c) in coefficients.iter().enumerate() {
        poly[(i + 1) * step] = sign * c;
    }
    poly
}

fn poly_mul(a: &[f64], b: &[f64]) -> Vec<f64> {
    let mut out = vec![0.0; a.len() + b.len() - 1];
    for (i, x) in a.iter().enumerate() {
        for (j, y) in b.iter().enumerate() {
            out[i + j] += x * y;
        }
    }
    out
}

/// `(1-B)^d (1-B^s)^D` as lag coefficients.
fn difference_polynomial(order: &SarimaOrder) -> Vec<f64> {
    let mut poly = vec![1.0];
    for _ in 0..order.d {
        poly = poly_mul(&poly, &[1.0, -1.0]);
    }
    let seasonal = lag_polynomial(&[1.0], order.period, -1.0);
    for _ in 0..order.seasonal_d {
        poly = poly_mul(&poly, &seasonal);
    }
    poly
}

fn apply_difference(values: &[f64], diff: &[f64]) -> Vec<f64> {
    let lag = diff.len() - 1;
    (lag..values.len())
        .map(|t| {
            diff.iter()
                .enumerate()
                .map(|(k, c)| c * values[t - k])
                .sum::<f64>()
        })
        .collect()
}

/// One-step innovations `e_t` of the differenced series, zero pre-sample.
fn innovations(w: &[f64], params: &SarimaParams, period: usize) -> Vec<f64> {
    let ar = params.ar_polynomial(period);
    let ma = params.ma_polynomial(period);
    let mut e = Vec::with_capacity(w.len());
    for t in 0..w.len() {
        let mut value = w[t];
        for (k, c) in ar.iter().enumerate().skip(1) {
            if let Some(past) = t.checked_sub(k) {
                value += c * w[past];
            }
        }
        for (k, c) in ma.iter().enumerate().skip(1) {
            if let Some(past) = t.checked_sub(k) {
                value -= c * e[past];
            }
        }
        e.push(value);
    }
    e
}
