use crate::db::SqlValue;

use super::QueryError;

/// Builds a parameterized SELECT from a base projection and a set of
/// optional filters.
///
/// Predicates are combined with AND and bound positionally. A filter whose
/// value is absent, empty, or fails numeric parsing contributes nothing.
/// The WHERE keyword is emitted only when at least one predicate applies,
/// so a dangling WHERE cannot be constructed. Ordering is always appended:
/// stable list responses are part of the contract.
#[derive(Debug)]
pub struct FilterBuilder {
    base: String,
    predicates: Vec<String>,
    values: Vec<SqlValue>,
    order_by: Option<String>,
}

impl FilterBuilder {
    pub fn new(base: impl Into<String>) -> Self {
        Self {
            base: base.into(),
            predicates: Vec::new(),
            values: Vec::new(),
            order_by: None,
        }
    }

    /// Case-insensitive substring match on a text column.
    pub fn contains(mut self, column: &str, term: Option<&str>) -> Self {
        if let Some(term) = term.filter(|t| !t.is_empty()) {
            self.values.push(SqlValue::Text(format!("%{}%", term)));
            self.predicates
                .push(format!("{} ILIKE ${}", column, self.values.len()));
        }
        self
    }

    /// Lower bound on an integer column. Raw values that do not parse as
    /// numbers are treated as absent.
    pub fn min_int(self, column: &str, raw: Option<&str>) -> Self {
        self.at_least(column, parse_int(raw))
    }

    /// Lower bound on a float column.
    pub fn min_float(self, column: &str, raw: Option<&str>) -> Self {
        self.at_least(column, parse_float(raw))
    }

    /// Bounded range on an integer column. Fails with `InvalidRange` when
    /// both bounds parse and min >= max, before any SQL is produced.
    pub fn int_range(
        self,
        column: &str,
        raw_min: Option<&str>,
        raw_max: Option<&str>,
    ) -> Result<Self, QueryError> {
        let min = parse_int(raw_min);
        let max = parse_int(raw_max);

        if let (Some(min), Some(max)) = (&min, &max) {
            if min.as_f64() >= max.as_f64() {
                return Err(QueryError::InvalidRange {
                    column: column.to_string(),
                });
            }
        }

        Ok(self.at_least(column, min).at_most(column, max))
    }

    pub fn order_by(mut self, column: &str) -> Self {
        self.order_by = Some(column.to_string());
        self
    }

    pub fn build(self) -> (String, Vec<SqlValue>) {
        let mut sql = self.base;

        if !self.predicates.is_empty() {
            sql.push_str(" WHERE ");
            sql.push_str(&self.predicates.join(" AND "));
        }

        if let Some(column) = &self.order_by {
            sql.push_str(" ORDER BY ");
            sql.push_str(column);
        }

        (sql, self.values)
    }

    fn at_least(mut self, column: &str, value: Option<SqlValue>) -> Self {
        if let Some(value) = value {
            self.values.push(value);
            self.predicates
                .push(format!("{} >= ${}", column, self.values.len()));
        }
        self
    }

    fn at_most(mut self, column: &str, value: Option<SqlValue>) -> Self {
        if let Some(value) = value {
            self.values.push(value);
            self.predicates
                .push(format!("{} <= ${}", column, self.values.len()));
        }
        self
    }
}

fn parse_int(raw: Option<&str>) -> Option<SqlValue> {
    raw.and_then(|s| s.trim().parse::<i64>().ok()).map(SqlValue::Int)
}

fn parse_float(raw: Option<&str>) -> Option<SqlValue> {
    raw.and_then(|s| s.trim().parse::<f64>().ok())
        .map(SqlValue::Float)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_filters_emits_no_where() {
        let (sql, values) = FilterBuilder::new("SELECT handle, name FROM companies")
            .contains("name", None)
            .int_range("num_employees", None, None)
            .unwrap()
            .order_by("name")
            .build();
        assert_eq!(sql, "SELECT handle, name FROM companies ORDER BY name");
        assert!(values.is_empty());
        assert!(!sql.contains("WHERE"));
    }

    #[test]
    fn search_adds_ilike_predicate() {
        let (sql, values) = FilterBuilder::new("SELECT handle, name FROM companies")
            .contains("name", Some("net"))
            .order_by("name")
            .build();
        assert_eq!(
            sql,
            "SELECT handle, name FROM companies WHERE name ILIKE $1 ORDER BY name"
        );
        assert_eq!(values, vec![SqlValue::Text("%net%".to_string())]);
    }

    #[test]
    fn empty_search_is_absent() {
        let (sql, values) = FilterBuilder::new("SELECT id, title FROM jobs")
            .contains("title", Some(""))
            .order_by("id")
            .build();
        assert_eq!(sql, "SELECT id, title FROM jobs ORDER BY id");
        assert!(values.is_empty());
    }

    #[test]
    fn bounds_are_positional_and_in_order() {
        let (sql, values) = FilterBuilder::new("SELECT handle, name FROM companies")
            .contains("name", Some("co"))
            .int_range("num_employees", Some("10"), Some("500"))
            .unwrap()
            .order_by("name")
            .build();
        assert_eq!(
            sql,
            "SELECT handle, name FROM companies WHERE name ILIKE $1 AND num_employees >= $2 AND num_employees <= $3 ORDER BY name"
        );
        assert_eq!(
            values,
            vec![
                SqlValue::Text("%co%".to_string()),
                SqlValue::Int(10),
                SqlValue::Int(500),
            ]
        );
    }

    #[test]
    fn inverted_bounds_fail_before_building() {
        let err = FilterBuilder::new("SELECT handle, name FROM companies")
            .int_range("num_employees", Some("100"), Some("10"))
            .unwrap_err();
        assert_eq!(
            err,
            QueryError::InvalidRange {
                column: "num_employees".to_string()
            }
        );
    }

    #[test]
    fn equal_bounds_fail() {
        let err = FilterBuilder::new("SELECT handle, name FROM companies")
            .int_range("num_employees", Some("50"), Some("50"))
            .unwrap_err();
        assert!(matches!(err, QueryError::InvalidRange { .. }));
    }

    #[test]
    fn non_numeric_bound_is_absent() {
        let (sql, values) = FilterBuilder::new("SELECT handle, name FROM companies")
            .int_range("num_employees", Some("lots"), Some("10"))
            .unwrap()
            .order_by("name")
            .build();
        assert_eq!(
            sql,
            "SELECT handle, name FROM companies WHERE num_employees <= $1 ORDER BY name"
        );
        assert_eq!(values, vec![SqlValue::Int(10)]);
    }

    #[test]
    fn float_minimum_parses() {
        let (sql, values) = FilterBuilder::new("SELECT id, title, company_handle FROM jobs")
            .contains("title", None)
            .min_float("salary", Some("85000"))
            .min_float("equity", Some("0.05"))
            .order_by("id")
            .build();
        assert_eq!(
            sql,
            "SELECT id, title, company_handle FROM jobs WHERE salary >= $1 AND equity >= $2 ORDER BY id"
        );
        assert_eq!(values, vec![SqlValue::Float(85000.0), SqlValue::Float(0.05)]);
    }
}
