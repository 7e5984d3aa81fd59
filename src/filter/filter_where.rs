use chrono::{Days, NaiveDate};
use serde_json::Value;

use super::error::FilterError;
use crate::types::DocumentStatus;
use crate::upload::formats::{equivalent_extensions, SUPPORTED_FORMATS};

const DATE_BOUND_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Accumulates conjunctive WHERE conditions and their positional parameters
#[derive(Debug, Default)]
pub struct FilterWhere {
    conditions: Vec<String>,
    param_values: Vec<Value>,
}

impl FilterWhere {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn owner(&mut self, user_id: i64) -> &mut Self {
        self.push("d.user_id = ?", vec![Value::from(user_id)])
    }

    pub fn status(&mut self, raw: &str) -> Result<&mut Self, FilterError> {
        let status: DocumentStatus = raw
            .trim()
            .parse()
            .map_err(|_| FilterError::InvalidStatus(raw.to_string()))?;
        Ok(self.push("d.status = ?", vec![Value::from(status.as_str())]))
    }

    /// Comma-separated extension list. "other" selects files outside the supported set.
    pub fn file_types(&mut self, raw: &str) -> &mut Self {
        let mut alternatives = vec![];
        let mut params = vec![];

        for token in raw.split(',') {
            let token = token.trim().trim_start_matches('.').to_lowercase();
            if token.is_empty() {
                continue;
            }

            if token == "other" {
                let known: Vec<&str> = SUPPORTED_FORMATS.iter().map(|f| f.extension).collect();
                let clause = known
                    .iter()
                    .map(|_| "LOWER(d.filename) LIKE ? ESCAPE '\\'")
                    .collect::<Vec<_>>()
                    .join(" OR ");
                alternatives.push(format!("NOT ({})", clause));
                params.extend(known.iter().map(|ext| Value::from(suffix_pattern(ext))));
            } else {
                for ext in equivalent_extensions(&token) {
                    alternatives.push("LOWER(d.filename) LIKE ? ESCAPE '\\'".to_string());
                    params.push(Value::from(suffix_pattern(&ext)));
                }
            }
        }

        if alternatives.is_empty() {
            return self;
        }
        let sql = format!("({})", alternatives.join(" OR "));
        self.push(&sql, params)
    }

    /// Inclusive lower bound at the start of the given day
    pub fn date_from(&mut self, raw: &str) -> Result<&mut Self, FilterError> {
        let date = parse_date("from", raw)?;
        let bound = date.and_hms_opt(0, 0, 0).map(|dt| dt.format(DATE_BOUND_FORMAT).to_string());
        Ok(match bound {
            Some(bound) => self.push("d.uploaded_at >= ?", vec![Value::from(bound)]),
            None => self,
        })
    }

    /// Covers the whole given day: strictly before the next midnight
    pub fn date_to(&mut self, raw: &str) -> Result<&mut Self, FilterError> {
        let date = parse_date("to", raw)?;
        let bound = date
            .checked_add_days(Days::new(1))
            .and_then(|next| next.and_hms_opt(0, 0, 0))
            .map(|dt| dt.format(DATE_BOUND_FORMAT).to_string());
        Ok(match bound {
            Some(bound) => self.push("d.uploaded_at < ?", vec![Value::from(bound)]),
            None => self,
        })
    }

    /// Owner by numeric id, email, or "last first" / "first last"
    pub fn client(&mut self, raw: &str) -> &mut Self {
        let needle = raw.trim();
        if let Ok(id) = needle.parse::<i64>() {
            return self.push("d.user_id = ?", vec![Value::from(id)]);
        }

        let lowered = collapse_spaces(&needle.to_lowercase());
        self.push(
            "(LOWER(u.email) = ? \
             OR LOWER(u.last_name || ' ' || u.first_name) = ? \
             OR LOWER(u.first_name || ' ' || u.last_name) = ?)",
            vec![Value::from(lowered.clone()), Value::from(lowered.clone()), Value::from(lowered)],
        )
    }

    /// Case-insensitive substring over file names and owner identity
    pub fn search(&mut self, raw: &str) -> &mut Self {
        let pattern = format!("%{}%", escape_like(&raw.trim().to_lowercase()));
        let columns = [
            "d.filename",
            "d.original_name",
            "u.last_name || ' ' || u.first_name",
            "u.first_name || ' ' || u.last_name",
            "u.email",
        ];
        let sql = format!(
            "({})",
            columns
                .iter()
                .map(|c| format!("LOWER({}) LIKE ? ESCAPE '\\'", c))
                .collect::<Vec<_>>()
                .join(" OR ")
        );
        let params = columns.iter().map(|_| Value::from(pattern.clone())).collect();
        self.push(&sql, params)
    }

    pub fn is_empty(&self) -> bool {
        self.conditions.is_empty()
    }

    pub fn build(self) -> (String, Vec<Value>) {
        (self.conditions.join(" AND "), self.param_values)
    }

    fn push(&mut self, sql: &str, params: Vec<Value>) -> &mut Self {
        self.conditions.push(sql.to_string());
        self.param_values.extend(params);
        self
    }
}

fn parse_date(field: &str, raw: &str) -> Result<NaiveDate, FilterError> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d").map_err(|_| FilterError::InvalidDate {
        field: field.to_string(),
        value: raw.to_string(),
    })
}

fn suffix_pattern(ext: &str) -> String {
    format!("%.{}", escape_like(ext))
}

/// Escape LIKE wildcards so user input matches literally
pub(crate) fn escape_like(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        if matches!(c, '\\' | '%' | '_') {
            out.push('\\');
        }
        out.push(c);
    }
    out
}

fn collapse_spaces(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}
