//! Loading and normalization of per-entity historical data

use crate::error::{DashboardError, Result};
use polars::prelude::*;
use std::fs::File;
use std::path::Path;

/// Name of the column carrying the entity (ticker) identifier
pub const ENTITY_COLUMN: &str = "name";

/// Merged, date-keyed historical dataset across all entities.
///
/// Built once at startup and treated as immutable shared state afterwards:
/// the selector and the forecast adapter only ever read from it.
#[derive(Debug, Clone)]
pub struct UnifiedTable {
    /// Data frame containing all entities' rows
    df: DataFrame,
    /// Name of the date column (the row key)
    date_column: String,
    /// Columns whose dtype is numeric
    numeric_columns: Vec<String>,
    /// All remaining columns
    categorical_columns: Vec<String>,
    /// Distinct entity identifiers, in first-seen order
    entities: Vec<String>,
}

/// Data loader for per-entity CSV files
#[derive(Debug)]
pub struct DataLoader;

impl DataLoader {
    /// Load and merge one CSV file per entity into a [`UnifiedTable`].
    ///
    /// Each row is stamped with its entity identifier before merging. Row
    /// order within an entity is preserved and no global re-sort happens, so
    /// chronologically sorted source files stay chronological per entity.
    pub fn load<P: AsRef<Path>>(sources: &[(&str, P)]) -> Result<UnifiedTable> {
        if sources.is_empty() {
            return Err(DashboardError::InvalidParameter(
                "at least one (entity, path) source is required".to_string(),
            ));
        }

        let mut merged: Option<DataFrame> = None;
        let mut column_order: Vec<String> = Vec::new();

        for (entity, path) in sources {
            let path = path.as_ref();
            let df = Self::read_entity(entity, path)?;

            match merged {
                None => {
                    column_order = df
                        .get_column_names()
                        .iter()
                        .map(|s| s.to_string())
                        .collect();
                    merged = Some(df);
                }
                Some(ref mut acc) => {
                    let mut df = Self::align_columns(df, &column_order, path)?;
                    Self::unify_dtypes(acc, &mut df, path)?;
                    *acc = acc.vstack(&df).map_err(|e| DashboardError::DataSource {
                        path: path.display().to_string(),
                        reason: e.to_string(),
                    })?;
                }
            }
        }

        // Unwrap is safe: sources is non-empty
        let df = merged.expect("non-empty sources");
        UnifiedTable::from_dataframe(df)
    }

    /// Read one entity's CSV and stamp it with the entity identifier
    fn read_entity(entity: &str, path: &Path) -> Result<DataFrame> {
        let file = File::open(path).map_err(|e| DashboardError::DataSource {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;

        let mut df = CsvReader::new(file)
            .infer_schema(None)
            .has_header(true)
            .finish()
            .map_err(|e| DashboardError::DataSource {
                path: path.display().to_string(),
                reason: e.to_string(),
            })?;

        if df.get_column_names().contains(&ENTITY_COLUMN) {
            // A pre-existing entity column must agree with the caller-supplied
            // identifier; a mismatch is a data problem, not something to paper
            // over by overwriting.
            Self::check_entity_column(&df, entity, path)?;
        } else {
            let stamped = Series::new(ENTITY_COLUMN, vec![entity; df.height()]);
            df.with_column(stamped)?;
        }

        Ok(df)
    }

    /// Verify that an existing entity column matches the supplied identifier
    fn check_entity_column(df: &DataFrame, entity: &str, path: &Path) -> Result<()> {
        let col = df.column(ENTITY_COLUMN)?;
        let ca = col.utf8().map_err(|_| DashboardError::DataSource {
            path: path.display().to_string(),
            reason: format!("entity column '{}' is not a string column", ENTITY_COLUMN),
        })?;

        for value in ca.into_iter().flatten() {
            if value != entity {
                return Err(DashboardError::DataSource {
                    path: path.display().to_string(),
                    reason: format!(
                        "entity column '{}' holds '{}', expected '{}'",
                        ENTITY_COLUMN, value, entity
                    ),
                });
            }
        }

        Ok(())
    }

    /// Reorder a frame's columns to match the first frame's order.
    ///
    /// A differing column set is rejected rather than padded with nulls.
    fn align_columns(df: DataFrame, order: &[String], path: &Path) -> Result<DataFrame> {
        let names: Vec<String> = df
            .get_column_names()
            .iter()
            .map(|s| s.to_string())
            .collect();

        let mut sorted_a = names.clone();
        let mut sorted_b = order.to_vec();
        sorted_a.sort();
        sorted_b.sort();
        if sorted_a != sorted_b {
            return Err(DashboardError::DataSource {
                path: path.display().to_string(),
                reason: format!(
                    "column set {:?} does not match the first source's {:?}",
                    names, order
                ),
            });
        }

        Ok(df.select(order)?)
    }

    /// Widen columns to a common dtype where per-file schema inference
    /// diverged.
    ///
    /// An all-whole-number column infers Int64 in one file and Float64 in
    /// another; a column that is numeric in one file and text in another
    /// must still merge, landing as categorical.
    fn unify_dtypes(acc: &mut DataFrame, df: &mut DataFrame, path: &Path) -> Result<()> {
        let names: Vec<String> = acc
            .get_column_names()
            .iter()
            .map(|s| s.to_string())
            .collect();

        for name in &names {
            let left = acc.column(name)?.dtype().clone();
            let right = df.column(name)?.dtype().clone();
            if left == right {
                continue;
            }

            let wide = Self::common_dtype(&left, &right);
            let map_cast = |e: PolarsError| DashboardError::DataSource {
                path: path.display().to_string(),
                reason: format!("column '{}': {}", name, e),
            };

            if left != wide {
                let cast = acc.column(name)?.cast(&wide).map_err(map_cast)?;
                acc.replace(name, cast)?;
            }
            if right != wide {
                let cast = df.column(name)?.cast(&wide).map_err(map_cast)?;
                df.replace(name, cast)?;
            }
        }

        Ok(())
    }

    /// Smallest dtype both sides fit into: numeric pairs widen to Float64,
    /// anything else falls back to strings
    fn common_dtype(a: &DataType, b: &DataType) -> DataType {
        if a.is_numeric() && b.is_numeric() {
            DataType::Float64
        } else {
            DataType::Utf8
        }
    }
}

impl UnifiedTable {
    /// Build a unified table from an already-merged DataFrame.
    ///
    /// The frame must carry the entity column; date column detection and
    /// column classification run here.
    pub fn from_dataframe(df: DataFrame) -> Result<Self> {
        if !df.get_column_names().contains(&ENTITY_COLUMN) {
            return Err(DashboardError::FieldNotFound {
                field: ENTITY_COLUMN.to_string(),
                known: df.get_column_names().iter().map(|s| s.to_string()).collect(),
            });
        }

        let date_column = Self::detect_date_column(&df)?;
        let (numeric_columns, categorical_columns) = Self::classify_columns(&df);
        let entities = Self::collect_entities(&df)?;

        Ok(Self {
            df,
            date_column,
            numeric_columns,
            categorical_columns,
            entities,
        })
    }

    /// Detect the date column in a DataFrame
    fn detect_date_column(df: &DataFrame) -> Result<String> {
        for name in df.get_column_names() {
            let lower_name = name.to_lowercase();
            if lower_name.contains("date")
                || lower_name.contains("time")
                || lower_name.contains("timestamp")
            {
                return Ok(name.to_string());
            }
        }

        if let Some(first_col) = df.get_columns().first() {
            if first_col.dtype().is_temporal() {
                return Ok(first_col.name().to_string());
            }
        }

        Err(DashboardError::DataSource {
            path: "<merged>".to_string(),
            reason: "no date column found in data".to_string(),
        })
    }

    /// Split all columns into numeric and categorical by dtype.
    ///
    /// Schema inference has already demoted any column with a non-numeric
    /// value to string, so dtype is the classification. Every column lands
    /// in exactly one of the two sets.
    fn classify_columns(df: &DataFrame) -> (Vec<String>, Vec<String>) {
        let mut numeric = Vec::new();
        let mut categorical = Vec::new();

        for col in df.get_columns() {
            if col.dtype().is_numeric() {
                numeric.push(col.name().to_string());
            } else {
                categorical.push(col.name().to_string());
            }
        }

        (numeric, categorical)
    }

    /// Distinct entity identifiers in first-seen order.
    ///
    /// Non-string identifier columns (e.g. all-numeric tickers) are read
    /// through a string cast.
    fn collect_entities(df: &DataFrame) -> Result<Vec<String>> {
        let col = df.column(ENTITY_COLUMN)?.cast(&DataType::Utf8)?;
        let ca = col.utf8()?;

        let mut entities: Vec<String> = Vec::new();
        for value in ca.into_iter().flatten() {
            if !entities.iter().any(|e| e == value) {
                entities.push(value.to_string());
            }
        }

        Ok(entities)
    }

    /// Get the DataFrame
    pub fn dataframe(&self) -> &DataFrame {
        &self.df
    }

    /// Get the date column name
    pub fn date_column(&self) -> &str {
        &self.date_column
    }

    /// Get the numeric column names
    pub fn numeric_columns(&self) -> &[String] {
        &self.numeric_columns
    }

    /// Get the categorical column names
    pub fn categorical_columns(&self) -> &[String] {
        &self.categorical_columns
    }

    /// Get the distinct entity identifiers
    pub fn entities(&self) -> &[String] {
        &self.entities
    }

    /// Check if the table is empty
    pub fn is_empty(&self) -> bool {
        self.df.height() == 0
    }

    /// Get the number of rows in the table
    pub fn len(&self) -> usize {
        self.df.height()
    }
}
