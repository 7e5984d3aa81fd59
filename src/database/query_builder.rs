use serde_json::Value;
use sqlx::{self, sqlite::{SqliteArguments, SqliteRow}, FromRow, Sqlite, SqlitePool};

use crate::database::manager::DatabaseError;
use crate::filter::types::SqlResult;

/// Run a generated statement and map every row to `T`
pub async fn select_all<T>(pool: &SqlitePool, sql_result: &SqlResult) -> Result<Vec<T>, DatabaseError>
where
    T: for<'r> FromRow<'r, SqliteRow> + Send + Unpin,
{
    let mut q = sqlx::query_as::<_, T>(&sql_result.query);
    for p in sql_result.params.iter() {
        q = bind_param_query_as(q, p)?;
    }
    let rows = q.fetch_all(pool).await?;
    Ok(rows)
}

fn bind_param_query_as<'q, O>(
    q: sqlx::query::QueryAs<'q, Sqlite, O, SqliteArguments<'q>>,
    v: &'q Value,
) -> Result<sqlx::query::QueryAs<'q, Sqlite, O, SqliteArguments<'q>>, DatabaseError>
where
    O: for<'r> FromRow<'r, SqliteRow>,
{
    let bound = match v {
        Value::Null => {
            let none: Option<String> = None;
            q.bind(none)
        }
        Value::Bool(b) => q.bind(*b),
        Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                q.bind(i)
            } else if let Some(f) = n.as_f64() {
                q.bind(f)
            } else {
                q.bind(n.to_string())
            }
        }
        Value::String(s) => q.bind(s.as_str()),
        // Filters only produce scalars; anything else is a builder bug
        Value::Array(_) | Value::Object(_) => {
            return Err(DatabaseError::QueryError(format!("Unsupported bind parameter: {}", v)));
        }
    };
    Ok(bound)
}
