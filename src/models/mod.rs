//! Forecasting engine seam.
//!
//! The adapter in [`crate::forecast`] talks to the engine exclusively through
//! these traits: it hands over a bare value sequence and gets back fitted
//! values, future-step forecasts, and a residual spread. Everything about the
//! model itself stays behind the seam.

use crate::error::Result;
use std::fmt::Debug;

/// Forecast model that can be trained on a value sequence
pub trait ForecastModel: Debug + Clone {
    /// The type of trained model produced
    type Trained: TrainedForecastModel;

    /// Train the model on an ordered value sequence
    fn train(&self, values: &[f64]) -> Result<Self::Trained>;

    /// Get the name of the model
    fn name(&self) -> &str;
}

/// Trained forecast model
pub trait TrainedForecastModel: Debug {
    /// Point forecasts for the next `horizon` periods
    fn forecast(&self, horizon: usize) -> Result<Vec<f64>>;

    /// One-step-ahead fitted values over the training range
    fn fitted(&self) -> &[f64];

    /// Standard deviation of the in-sample residuals
    fn residual_std(&self) -> f64;

    /// Name of the model
    fn name(&self) -> &str;
}

pub mod additive;
