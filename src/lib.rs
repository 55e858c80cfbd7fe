//! # Stock Dashboard
//!
//! Data loading, selection, and forecast preparation for a stock ratio
//! dashboard.
//!
//! ## Features
//!
//! - Per-entity CSV loading merged into one date-keyed table
//! - Numeric vs categorical column classification
//! - Entity and field selection preserving chronological order
//! - Close-price forecasting over a whole-year horizon via an additive
//!   trend + seasonality engine
//!
//! ## Quick Start
//!
//! ```no_run
//! use stock_dashboard::data::DataLoader;
//! use stock_dashboard::forecast::{years_to_days, ForecastAdapter, ForecastInput};
//! use stock_dashboard::select::Selector;
//!
//! fn main() -> stock_dashboard::Result<()> {
//!     // Load one CSV per ticker into a single immutable table
//!     let table = DataLoader::load(&[("APU", "apu.csv"), ("SUU", "suu.csv")])?;
//!
//!     // Filter to one ticker and project the fields to plot
//!     let closes = Selector::select(&table, "APU", &["date", "close"])?;
//!     println!("{}", closes);
//!
//!     // Forecast the close series two years out
//!     let series = ForecastInput::from_table(&table, "APU")?;
//!     let forecast = ForecastAdapter::default().forecast(&series, years_to_days(2))?;
//!     for row in forecast.tail(5) {
//!         println!("{}: {:.2} [{:.2}, {:.2}]", row.date, row.predicted, row.lower, row.upper);
//!     }
//!
//!     Ok(())
//! }
//! ```

pub mod data;
pub mod error;
pub mod forecast;
pub mod models;
pub mod select;

// Re-export commonly used types
pub use crate::data::{DataLoader, UnifiedTable};
pub use crate::error::{DashboardError, Result};
pub use crate::forecast::{ForecastAdapter, ForecastInput, ForecastOutput, ForecastRow};
pub use crate::models::{ForecastModel, TrainedForecastModel};
pub use crate::select::Selector;

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const NAME: &str = env!("CARGO_PKG_NAME");
