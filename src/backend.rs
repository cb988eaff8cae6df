//! Row-returning table client.
//!
//! Queries are built as `from(table).select(columns).limit(n)` and resolve to
//! a [`QueryResult`] carrying either `data` or `error`, never both. Callers
//! that render pages go through [`load_rows`], which logs failures and falls
//! back to an empty list.

use crate::errors::StoreError;
use crate::models::AppData;
use serde::Serialize;
use serde_json::{Map, Value};
use tracing::{debug, error};

pub type Row = Map<String, Value>;

pub const TABLES: &[&str] = &[
    "businesses",
    "coupons",
    "promotions",
    "loyalty_programs",
    "loyalty_members",
    "profiles",
    "notifications",
    "news",
    "events",
    "platforms",
    "content",
];

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QueryResult {
    pub data: Option<Vec<Row>>,
    #[serde(serialize_with = "serialize_error")]
    pub error: Option<StoreError>,
}

fn serialize_error<S>(error: &Option<StoreError>, serializer: S) -> Result<S::Ok, S::Error>
where
    S: serde::Serializer,
{
    match error {
        Some(err) => serializer.serialize_some(&err.to_string()),
        None => serializer.serialize_none(),
    }
}

impl QueryResult {
    fn ok(rows: Vec<Row>) -> Self {
        Self {
            data: Some(rows),
            error: None,
        }
    }

    fn err(error: StoreError) -> Self {
        Self {
            data: None,
            error: Some(error),
        }
    }
}

/// Read-only view over the document that answers table queries.
pub struct Backend<'a> {
    data: &'a AppData,
}

impl<'a> Backend<'a> {
    pub fn new(data: &'a AppData) -> Self {
        Self { data }
    }

    pub fn from(&self, table: &str) -> TableQuery<'a> {
        TableQuery {
            data: self.data,
            table: table.to_string(),
            columns: None,
            limit: None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct TableQuery<'a> {
    data: &'a AppData,
    table: String,
    columns: Option<Vec<String>>,
    limit: Option<usize>,
}

impl<'a> TableQuery<'a> {
    /// `"*"` selects every column; otherwise a comma-separated list.
    pub fn select(mut self, columns: &str) -> Self {
        let trimmed = columns.trim();
        self.columns = if trimmed.is_empty() || trimmed == "*" {
            None
        } else {
            Some(
                trimmed
                    .split(',')
                    .map(|c| c.trim().to_string())
                    .filter(|c| !c.is_empty())
                    .collect(),
            )
        };
        self
    }

    pub fn limit(mut self, n: usize) -> Self {
        self.limit = Some(n);
        self
    }

    pub fn execute(&self) -> QueryResult {
        let rows = match self.table_rows() {
            Ok(rows) => rows,
            Err(err) => return QueryResult::err(err),
        };

        let take = self.limit.unwrap_or(usize::MAX);
        let mut out = Vec::with_capacity(rows.len().min(take));
        for row in rows.into_iter().take(take) {
            match self.project(row) {
                Ok(row) => out.push(row),
                Err(err) => return QueryResult::err(err),
            }
        }
        QueryResult::ok(out)
    }

    fn table_rows(&self) -> Result<Vec<Row>, StoreError> {
        let d = self.data;
        match self.table.as_str() {
            "businesses" => to_rows(&d.businesses),
            "coupons" => to_rows(&d.coupons),
            "promotions" => to_rows(&d.promotions),
            "loyalty_programs" => to_rows(&d.loyalty_programs),
            "loyalty_members" => to_rows(&d.loyalty_members),
            "profiles" => to_rows(&d.profiles),
            "notifications" => to_rows(&d.notifications),
            "news" => to_rows(&d.news),
            "events" => to_rows(&d.events),
            "platforms" => to_rows(&d.platforms),
            "content" => to_rows(&d.content),
            other => Err(StoreError::UnknownTable(other.to_string())),
        }
    }

    fn project(&self, row: Row) -> Result<Row, StoreError> {
        let Some(columns) = &self.columns else {
            return Ok(row);
        };
        let mut out = Map::new();
        for column in columns {
            // Optional fields serialize as null, so a missing key is a real miss.
            let value = row.get(column).ok_or_else(|| StoreError::UnknownColumn {
                table: self.table.clone(),
                column: column.clone(),
            })?;
            out.insert(column.clone(), value.clone());
        }
        Ok(out)
    }
}

fn to_rows<T: Serialize>(records: &[T]) -> Result<Vec<Row>, StoreError> {
    records
        .iter()
        .map(|record| match serde_json::to_value(record) {
            Ok(Value::Object(map)) => Ok(map),
            Ok(other) => Err(StoreError::Encode(format!("expected object, got {other}"))),
            Err(err) => Err(StoreError::Encode(err.to_string())),
        })
        .collect()
}

/// Runs the query; on error logs it and substitutes an empty list.
pub fn load_rows(query: &TableQuery<'_>) -> Vec<Row> {
    let QueryResult { data, error } = query.execute();
    if let Some(err) = error {
        error!(table = %query.table, "error fetching data: {err}");
        return Vec::new();
    }
    let rows = data.unwrap_or_default();
    debug!(table = %query.table, rows = rows.len(), "fetched rows");
    rows
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::seed::sample_data;
    use chrono::Utc;

    #[test]
    fn select_projects_requested_columns() {
        let data = sample_data(Utc::now());
        let backend = Backend::new(&data);
        let result = backend.from("businesses").select("id, name").limit(2).execute();
        assert!(result.error.is_none());
        let rows = result.data.unwrap();
        assert_eq!(rows.len(), 2);
        for row in rows {
            let mut keys: Vec<_> = row.keys().cloned().collect();
            keys.sort();
            assert_eq!(keys, vec!["id".to_string(), "name".to_string()]);
        }
    }

    #[test]
    fn star_returns_full_rows() {
        let data = sample_data(Utc::now());
        let rows = load_rows(&Backend::new(&data).from("coupons").select("*"));
        assert_eq!(rows.len(), data.coupons.len());
        assert!(rows[0].contains_key("isActive"));
        assert!(rows[0].contains_key("discount"));
    }

    #[test]
    fn unknown_table_is_an_error_result() {
        let data = AppData::default();
        let result = Backend::new(&data).from("nope").select("*").execute();
        assert!(result.data.is_none());
        assert_eq!(result.error, Some(StoreError::UnknownTable("nope".into())));
    }

    #[test]
    fn loader_falls_back_to_empty_on_error() {
        let data = sample_data(Utc::now());
        let backend = Backend::new(&data);
        assert!(load_rows(&backend.from("nope").select("*")).is_empty());
        assert!(load_rows(&backend.from("coupons").select("id, bogus")).is_empty());
    }

    #[test]
    fn every_listed_table_resolves() {
        let data = AppData::default();
        let backend = Backend::new(&data);
        for table in TABLES {
            let result = backend.from(table).select("*").limit(1).execute();
            assert!(result.error.is_none(), "{table}");
        }
    }
}
