//! Forecast input shaping and engine invocation

use crate::data::UnifiedTable;
use crate::error::{DashboardError, Result};
use crate::models::additive::AdditiveModel;
use crate::models::{ForecastModel, TrainedForecastModel};
use crate::select::Selector;
use chrono::{Days, NaiveDate};
use polars::prelude::*;
use serde::Serialize;
use statrs::distribution::{ContinuousCDF, Normal};

/// Name of the column carrying closing prices
pub const CLOSE_COLUMN: &str = "close";

/// Fixed days-per-year used for horizon conversion, no leap-year adjustment
pub const DAYS_PER_YEAR: u32 = 365;

/// Convert a whole-year horizon to days
pub fn years_to_days(years: u32) -> u32 {
    years * DAYS_PER_YEAR
}

/// One entity's close series, shaped for the forecasting engine.
///
/// Two aligned sequences with strictly increasing dates; the constructor
/// enforces both, so a value carries its invariants wherever it goes.
#[derive(Debug, Clone)]
pub struct ForecastInput {
    dates: Vec<NaiveDate>,
    values: Vec<f64>,
}

impl ForecastInput {
    /// Create a forecast input from aligned date and value sequences
    pub fn new(dates: Vec<NaiveDate>, values: Vec<f64>) -> Result<Self> {
        if dates.len() != values.len() {
            return Err(DashboardError::InvalidParameter(format!(
                "dates length ({}) doesn't match values length ({})",
                dates.len(),
                values.len()
            )));
        }

        for pair in dates.windows(2) {
            if pair[1] <= pair[0] {
                return Err(DashboardError::InvalidParameter(format!(
                    "dates must be strictly increasing, got {} after {}",
                    pair[1], pair[0]
                )));
            }
        }

        Ok(Self { dates, values })
    }

    /// Extract one entity's (date, close) pairs from the unified table.
    ///
    /// Rows with a missing date or close value are dropped; the remaining
    /// pairs stay aligned.
    pub fn from_table(table: &UnifiedTable, entity_id: &str) -> Result<Self> {
        let known = table.dataframe().get_column_names();
        if !known.contains(&CLOSE_COLUMN) {
            return Err(DashboardError::FieldNotFound {
                field: CLOSE_COLUMN.to_string(),
                known: known.iter().map(|s| s.to_string()).collect(),
            });
        }

        let rows = Selector::entity_rows(table, entity_id)?;

        let raw_dates = Self::column_dates(&rows, table.date_column())?;
        let raw_values: Vec<Option<f64>> = rows
            .column(CLOSE_COLUMN)?
            .cast(&DataType::Float64)?
            .f64()?
            .into_iter()
            .collect();

        let mut dates = Vec::with_capacity(raw_dates.len());
        let mut values = Vec::with_capacity(raw_values.len());
        for (date, value) in raw_dates.into_iter().zip(raw_values) {
            if let (Some(date), Some(value)) = (date, value) {
                dates.push(date);
                values.push(value);
            }
        }

        Self::new(dates, values)
    }

    /// Read a date column as calendar days, keeping nulls in place
    fn column_dates(df: &DataFrame, column: &str) -> Result<Vec<Option<NaiveDate>>> {
        let col = df.column(column)?;

        match col.dtype() {
            DataType::Utf8 => col
                .utf8()?
                .into_iter()
                .map(|opt| opt.map(Self::parse_date).transpose())
                .collect(),
            DataType::Date => Ok(col
                .date()?
                .into_iter()
                .map(|opt| {
                    opt.and_then(|days| {
                        NaiveDate::from_ymd_opt(1970, 1, 1)
                            .and_then(|epoch| epoch.checked_add_days(Days::new(days as u64)))
                    })
                })
                .collect()),
            other => Err(DashboardError::DataSource {
                path: "<unified table>".to_string(),
                reason: format!("date column '{}' has unsupported dtype {}", column, other),
            }),
        }
    }

    /// Parse a date string in the formats the source files use
    fn parse_date(s: &str) -> Result<NaiveDate> {
        for format in ["%Y-%m-%d", "%Y/%m/%d", "%m/%d/%Y"] {
            if let Ok(date) = NaiveDate::parse_from_str(s, format) {
                return Ok(date);
            }
        }

        Err(DashboardError::DataSource {
            path: "<unified table>".to_string(),
            reason: format!("unparsable date '{}'", s),
        })
    }

    /// Get the date sequence
    pub fn dates(&self) -> &[NaiveDate] {
        &self.dates
    }

    /// Get the value sequence
    pub fn values(&self) -> &[f64] {
        &self.values
    }

    /// Check if the series is empty
    pub fn is_empty(&self) -> bool {
        self.dates.is_empty()
    }

    /// Get the number of observations
    pub fn len(&self) -> usize {
        self.dates.len()
    }
}

/// One forecast row: a calendar day with its prediction and bounds
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ForecastRow {
    /// Calendar day the prediction applies to
    pub date: NaiveDate,
    /// Predicted value
    pub predicted: f64,
    /// Lower uncertainty bound
    pub lower: f64,
    /// Upper uncertainty bound
    pub upper: f64,
}

/// Forecast over the training range extended by the requested horizon
#[derive(Debug, Clone, Serialize)]
pub struct ForecastOutput {
    rows: Vec<ForecastRow>,
}

impl ForecastOutput {
    /// Get all forecast rows
    pub fn rows(&self) -> &[ForecastRow] {
        &self.rows
    }

    /// Get the last `n` rows
    pub fn tail(&self, n: usize) -> &[ForecastRow] {
        &self.rows[self.rows.len().saturating_sub(n)..]
    }

    /// Check if the forecast is empty
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Get the number of forecast rows
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Serialize the forecast rows to JSON
    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string(&self.rows).map_err(|e| DashboardError::Serialization(e.to_string()))
    }
}

/// Adapter between the unified table's close series and the forecast engine.
///
/// Owns only the shape adaptation and the horizon conversion; fitting and
/// prediction are delegated through the model traits.
#[derive(Debug, Clone)]
pub struct ForecastAdapter<M: ForecastModel = AdditiveModel> {
    model: M,
    confidence_level: f64,
}

impl Default for ForecastAdapter<AdditiveModel> {
    fn default() -> Self {
        Self {
            model: AdditiveModel::default(),
            confidence_level: 0.95,
        }
    }
}

impl<M: ForecastModel> ForecastAdapter<M> {
    /// Create an adapter with an explicit engine and confidence level
    pub fn new(model: M, confidence_level: f64) -> Result<Self> {
        if confidence_level <= 0.0 || confidence_level >= 1.0 {
            return Err(DashboardError::InvalidParameter(
                "confidence level must be between 0 and 1".to_string(),
            ));
        }

        Ok(Self {
            model,
            confidence_level,
        })
    }

    /// Fit the engine on the series and predict over the training range
    /// extended by `horizon_days`.
    ///
    /// Output holds one row per training date (fitted value) followed by one
    /// row per future day; `horizon_days = 0` yields exactly the training
    /// rows.
    pub fn forecast(&self, series: &ForecastInput, horizon_days: u32) -> Result<ForecastOutput> {
        if series.len() < 2 {
            return Err(DashboardError::InsufficientData {
                got: series.len(),
                need: 2,
            });
        }

        let trained = self.model.train(series.values())?;
        let z = self.z_score()?;
        let sigma = trained.residual_std();

        let mut rows = Vec::with_capacity(series.len() + horizon_days as usize);

        for (date, fitted) in series.dates().iter().zip(trained.fitted()) {
            let margin = z * sigma;
            rows.push(ForecastRow {
                date: *date,
                predicted: *fitted,
                lower: fitted - margin,
                upper: fitted + margin,
            });
        }

        // Dates are strictly increasing, so last() is the max
        let last_date = *series.dates().last().expect("non-empty series");
        let future = trained.forecast(horizon_days as usize)?;

        for (k, predicted) in future.into_iter().enumerate() {
            let step = k as u64 + 1;
            let date = last_date
                .checked_add_days(Days::new(step))
                .ok_or_else(|| {
                    DashboardError::Forecasting("forecast date out of range".to_string())
                })?;
            // Uncertainty grows with distance from the last observation
            let margin = z * sigma * (step as f64).sqrt();
            rows.push(ForecastRow {
                date,
                predicted,
                lower: predicted - margin,
                upper: predicted + margin,
            });
        }

        Ok(ForecastOutput { rows })
    }

    /// Two-sided z-score for the configured confidence level
    fn z_score(&self) -> Result<f64> {
        let normal = Normal::new(0.0, 1.0)
            .map_err(|e| DashboardError::Forecasting(e.to_string()))?;
        Ok(normal.inverse_cdf(0.5 + self.confidence_level / 2.0))
    }
}
