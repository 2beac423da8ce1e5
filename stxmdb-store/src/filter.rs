//! Translation of a [`Query`] into one SQL `WHERE` clause.

use rusqlite::types::Value;
use stxmdb_core::{Condition, Query};

/// Builds a conjunctive `WHERE` body and its positional parameters.
///
/// Column names come from [`stxmdb_core::Field::name`]; every value is bound
/// as a parameter.
pub(crate) fn where_clause(query: &Query) -> (String, Vec<Value>) {
    let mut clauses = Vec::with_capacity(query.conditions().len());
    let mut params = Vec::new();

    for condition in query.conditions() {
        let clause = match condition {
            Condition::OneOf { field, values } => {
                if values.is_empty() {
                    "0".to_string()
                } else {
                    params.extend(values.iter().cloned().map(Value::Text));
                    let placeholders = vec!["?"; values.len()].join(", ");
                    format!("{} IN ({placeholders})", field.name())
                }
            }
            Condition::Equals { field, value } => {
                params.push(Value::Integer(*value));
                format!("{} = ?", field.name())
            }
            Condition::Within { field, range } => {
                params.push(Value::Integer(range.start));
                params.push(Value::Integer(range.end));
                format!("({0} >= ? AND {0} < ?)", field.name())
            }
            Condition::EnergyWithin { min, max } => {
                params.push(Value::Integer(*min));
                params.push(Value::Integer(*max));
                "(energy_min >= ? AND energy_max <= ?)".to_string()
            }
            Condition::AtLeast { field, value } => {
                params.push(Value::Integer(*value));
                format!("{} >= ?", field.name())
            }
            Condition::AtMost { field, value } => {
                params.push(Value::Integer(*value));
                format!("{} <= ?", field.name())
            }
        };
        clauses.push(clause);
    }

    if clauses.is_empty() {
        return ("1".to_string(), params);
    }
    (clauses.join(" AND "), params)
}

#[cfg(test)]
mod tests {
    use super::*;
    use stxmdb_core::{build_filter_query_at, FilterRequest, KNOWN_SCAN_TYPES};

    #[test]
    fn test_unfiltered_clause_has_every_condition() {
        let query = build_filter_query_at(&FilterRequest::new(), 202_610_181_200).unwrap();
        let (sql, params) = where_clause(&query);

        assert_eq!(sql.matches(" AND ").count(), 7 + 5);
        assert!(sql.starts_with("scan_type IN (?"));
        assert!(sql.contains("(x_resolution >= ? AND x_resolution < ?)"));
        assert!(sql.contains("(energy_min >= ? AND energy_max <= ?)"));
        assert!(sql.ends_with("start_time >= ? AND end_time <= ?"));
        assert_eq!(params.len(), KNOWN_SCAN_TYPES.len() + 4 * 2 + 2 + 2);
        assert_eq!(params.last(), Some(&Value::Integer(202_610_181_200)));
    }

    #[test]
    fn test_exact_values_are_bound() {
        let filters = FilterRequest::new()
            .with_scan_type("sample focus")
            .with_resolution(100, 0);
        let query = build_filter_query_at(&filters, 0).unwrap();
        let (sql, params) = where_clause(&query);

        assert!(sql.starts_with("scan_type IN (?) AND x_resolution = ? AND (y_resolution >= ?"));
        assert_eq!(params[0], Value::Text("sample focus".to_string()));
        assert_eq!(params[1], Value::Integer(100));
    }
}
