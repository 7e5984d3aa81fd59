use super::error::FilterError;
use super::filter_where::FilterWhere;
use super::types::{FilterParams, FilterScope, SqlResult};
use crate::database::documents::{DOCUMENT_ORDER, DOCUMENT_SELECT};

/// Builds the document query for a caller from the filter query string
pub struct Filter {
    scope: FilterScope,
    params: FilterParams,
}

impl Filter {
    pub fn new(scope: FilterScope) -> Self {
        Self {
            scope,
            params: FilterParams::default(),
        }
    }

    pub fn assign(&mut self, params: FilterParams) -> &mut Self {
        self.params = params;
        self
    }

    pub fn to_sql(&self) -> Result<SqlResult, FilterError> {
        let mut where_builder = FilterWhere::new();

        if let FilterScope::Owner(user_id) = self.scope {
            where_builder.owner(user_id);
        }
        if let Some(status) = present(&self.params.status) {
            where_builder.status(status)?;
        }
        if let Some(types) = present(&self.params.file_type) {
            where_builder.file_types(types);
        }
        if let Some(from) = present(&self.params.from) {
            where_builder.date_from(from)?;
        }
        if let Some(to) = present(&self.params.to) {
            where_builder.date_to(to)?;
        }
        // Clients are already pinned to their own documents
        if self.scope == FilterScope::All {
            if let Some(client) = present(&self.params.client) {
                where_builder.client(client);
            }
        }
        if let Some(search) = present(&self.params.search) {
            where_builder.search(search);
        }

        let (where_clause, params) = where_builder.build();
        let query = [
            DOCUMENT_SELECT.to_string(),
            if where_clause.is_empty() { String::new() } else { format!("WHERE {}", where_clause) },
            DOCUMENT_ORDER.to_string(),
        ].into_iter().filter(|s| !s.is_empty()).collect::<Vec<_>>().join(" ");

        Ok(SqlResult { query, params })
    }
}

fn present(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}
