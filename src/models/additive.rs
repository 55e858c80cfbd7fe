//! Additive trend + seasonality model (Holt-Winters, additive form)

use crate::error::{DashboardError, Result};
use crate::models::{ForecastModel, TrainedForecastModel};

/// Holt's linear trend model with optional additive seasonality
#[derive(Debug, Clone)]
pub struct AdditiveModel {
    /// Name of the model
    name: String,
    /// Level smoothing parameter
    alpha: f64,
    /// Trend smoothing parameter
    beta: f64,
    /// Seasonal smoothing parameter
    gamma: f64,
    /// Season length in periods, if seasonality is enabled
    season_length: Option<usize>,
}

/// Trained additive model
#[derive(Debug, Clone)]
pub struct TrainedAdditiveModel {
    /// Name of the model
    name: String,
    /// Final level component
    level: f64,
    /// Final trend component
    trend: f64,
    /// Final seasonal components, empty when seasonality was inactive
    seasonal: Vec<f64>,
    /// Number of training observations
    n_obs: usize,
    /// One-step-ahead fitted values over the training range
    fitted: Vec<f64>,
    /// Standard deviation of the in-sample residuals
    residual_std: f64,
}

impl AdditiveModel {
    /// Create a trend-only model
    pub fn new(alpha: f64, beta: f64) -> Result<Self> {
        if alpha <= 0.0 || alpha >= 1.0 {
            return Err(DashboardError::InvalidParameter(
                "alpha must be between 0 and 1".to_string(),
            ));
        }
        if beta <= 0.0 || beta >= 1.0 {
            return Err(DashboardError::InvalidParameter(
                "beta must be between 0 and 1".to_string(),
            ));
        }

        Ok(Self {
            name: format!("Additive (alpha={}, beta={})", alpha, beta),
            alpha,
            beta,
            gamma: 0.0,
            season_length: None,
        })
    }

    /// Enable an additive seasonal component.
    ///
    /// The seasonal component only activates when the training data holds at
    /// least two full seasons; shorter inputs fall back to trend-only fitting.
    pub fn with_seasonality(mut self, season_length: usize, gamma: f64) -> Result<Self> {
        if season_length < 2 {
            return Err(DashboardError::InvalidParameter(
                "season length must be at least 2".to_string(),
            ));
        }
        if gamma <= 0.0 || gamma >= 1.0 {
            return Err(DashboardError::InvalidParameter(
                "gamma must be between 0 and 1".to_string(),
            ));
        }

        self.name = format!(
            "Additive (alpha={}, beta={}, gamma={}, season={})",
            self.alpha, self.beta, gamma, season_length
        );
        self.gamma = gamma;
        self.season_length = Some(season_length);
        Ok(self)
    }
}

impl Default for AdditiveModel {
    /// Trend smoothing with weekly additive seasonality
    fn default() -> Self {
        AdditiveModel::new(0.5, 0.1)
            .and_then(|m| m.with_seasonality(7, 0.1))
            .expect("default parameters are valid")
    }
}

impl ForecastModel for AdditiveModel {
    type Trained = TrainedAdditiveModel;

    fn train(&self, values: &[f64]) -> Result<TrainedAdditiveModel> {
        if values.len() < 2 {
            return Err(DashboardError::InsufficientData {
                got: values.len(),
                need: 2,
            });
        }

        let n = values.len();
        let season = self
            .season_length
            .filter(|m| n >= 2 * m);

        let mut fitted = Vec::with_capacity(n);

        let (level, trend, seasonal) = match season {
            Some(m) => {
                // Initialize from the first two full seasons
                let first_mean: f64 = values[..m].iter().sum::<f64>() / m as f64;
                let second_mean: f64 = values[m..2 * m].iter().sum::<f64>() / m as f64;

                let mut level = first_mean;
                let mut trend = (second_mean - first_mean) / m as f64;
                let mut seasonal: Vec<f64> =
                    values[..m].iter().map(|v| v - first_mean).collect();

                for (t, &value) in values.iter().enumerate() {
                    let idx = t % m;
                    fitted.push(level + trend + seasonal[idx]);

                    let new_level = self.alpha * (value - seasonal[idx])
                        + (1.0 - self.alpha) * (level + trend);
                    trend = self.beta * (new_level - level) + (1.0 - self.beta) * trend;
                    seasonal[idx] =
                        self.gamma * (value - new_level) + (1.0 - self.gamma) * seasonal[idx];
                    level = new_level;
                }

                (level, trend, seasonal)
            }
            None => {
                let mut level = values[0];
                let mut trend = values[1] - values[0];

                fitted.push(values[0]);
                for &value in &values[1..] {
                    fitted.push(level + trend);

                    let new_level = self.alpha * value + (1.0 - self.alpha) * (level + trend);
                    trend = self.beta * (new_level - level) + (1.0 - self.beta) * trend;
                    level = new_level;
                }

                (level, trend, Vec::new())
            }
        };

        let sum_sq: f64 = values
            .iter()
            .zip(fitted.iter())
            .map(|(y, f)| (y - f).powi(2))
            .sum();
        let residual_std = (sum_sq / (n - 1) as f64).sqrt();

        Ok(TrainedAdditiveModel {
            name: self.name.clone(),
            level,
            trend,
            seasonal,
            n_obs: n,
            fitted,
            residual_std,
        })
    }

    fn name(&self) -> &str {
        &self.name
    }
}

impl TrainedForecastModel for TrainedAdditiveModel {
    fn forecast(&self, horizon: usize) -> Result<Vec<f64>> {
        let mut forecasts = Vec::with_capacity(horizon);

        for k in 1..=horizon {
            let mut value = self.level + self.trend * k as f64;
            if !self.seasonal.is_empty() {
                value += self.seasonal[(self.n_obs + k - 1) % self.seasonal.len()];
            }
            forecasts.push(value);
        }

        Ok(forecasts)
    }

    fn fitted(&self) -> &[f64] {
        &self.fitted
    }

    fn residual_std(&self) -> f64 {
        self.residual_std
    }

    fn name(&self) -> &str {
        &self.name
    }
}
