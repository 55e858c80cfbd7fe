//! Entity and field selection over the unified table

use crate::data::{UnifiedTable, ENTITY_COLUMN};
use crate::error::{DashboardError, Result};
use polars::prelude::*;

/// Pull-based selection over an immutable [`UnifiedTable`]
#[derive(Debug)]
pub struct Selector;

impl Selector {
    /// Filter the table to one entity and project to the given fields.
    ///
    /// Row order is preserved, so chronologically loaded data stays
    /// chronological. An entity identifier with no rows yields an empty
    /// frame; an unknown field is an error.
    pub fn select(table: &UnifiedTable, entity_id: &str, fields: &[&str]) -> Result<DataFrame> {
        let known = table.dataframe().get_column_names();
        for field in fields {
            if !known.contains(field) {
                return Err(DashboardError::FieldNotFound {
                    field: field.to_string(),
                    known: known.iter().map(|s| s.to_string()).collect(),
                });
            }
        }

        let filtered = Self::entity_rows(table, entity_id)?;
        Ok(filtered.select(fields)?)
    }

    /// All rows for one entity, order preserved, all columns
    pub fn entity_rows(table: &UnifiedTable, entity_id: &str) -> Result<DataFrame> {
        let mask = table
            .dataframe()
            .column(ENTITY_COLUMN)?
            .utf8()?
            .equal(entity_id);

        Ok(table.dataframe().filter(&mask)?)
    }
}
