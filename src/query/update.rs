use crate::db::SqlValue;

use super::{QueryError, RESERVED_PREFIX};

/// Builds a parameterized partial UPDATE.
///
/// Reserved-prefixed field names are stripped before clause construction.
/// Remaining fields are assigned `$1..$n` in the order given, with the
/// lookup value as the final parameter:
///
/// `UPDATE <table> SET f1=$1, f2=$2 WHERE <key_column>=$3 RETURNING *`
///
/// Stateless: identical inputs always yield the identical statement and
/// value sequence. Fails with `EmptyUpdate` when nothing survives the
/// strip - an UPDATE without SET targets is never constructed.
pub fn partial_update<S: AsRef<str>>(
    table: &str,
    fields: impl IntoIterator<Item = (S, SqlValue)>,
    key_column: &str,
    key_value: SqlValue,
) -> Result<(String, Vec<SqlValue>), QueryError> {
    let mut assignments = Vec::new();
    let mut values = Vec::new();

    for (name, value) in fields {
        let name = name.as_ref();
        if name.starts_with(RESERVED_PREFIX) {
            continue;
        }
        values.push(value);
        assignments.push(format!("{}=${}", name, values.len()));
    }

    if assignments.is_empty() {
        return Err(QueryError::EmptyUpdate);
    }

    values.push(key_value);
    let sql = format!(
        "UPDATE {} SET {} WHERE {}=${} RETURNING *",
        table,
        assignments.join(", "),
        key_column,
        values.len()
    );

    Ok((sql, values))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text(s: &str) -> SqlValue {
        SqlValue::Text(s.to_string())
    }

    #[test]
    fn single_field_update() {
        let (sql, values) = partial_update(
            "users",
            vec![("first_name", text("UPDATEDfirstname"))],
            "username",
            text("testusername1"),
        )
        .unwrap();
        assert_eq!(
            sql,
            "UPDATE users SET first_name=$1 WHERE username=$2 RETURNING *"
        );
        assert_eq!(values, vec![text("UPDATEDfirstname"), text("testusername1")]);
    }

    #[test]
    fn parameters_follow_field_order() {
        let (sql, values) = partial_update(
            "companies",
            vec![
                ("name", text("Acme")),
                ("num_employees", SqlValue::Int(12)),
                ("description", text("widgets")),
            ],
            "handle",
            text("acme"),
        )
        .unwrap();
        assert_eq!(
            sql,
            "UPDATE companies SET name=$1, num_employees=$2, description=$3 WHERE handle=$4 RETURNING *"
        );
        assert_eq!(values.len(), 4);
        assert_eq!(values[3], text("acme"));
    }

    #[test]
    fn reserved_fields_are_stripped() {
        let (sql, values) = partial_update(
            "users",
            vec![("_token", text("secret")), ("email", text("a@b.com"))],
            "username",
            text("u1"),
        )
        .unwrap();
        assert_eq!(sql, "UPDATE users SET email=$1 WHERE username=$2 RETURNING *");
        assert_eq!(values, vec![text("a@b.com"), text("u1")]);
    }

    #[test]
    fn all_reserved_fields_is_an_empty_update() {
        let err = partial_update(
            "users",
            vec![("_token", text("secret"))],
            "username",
            text("u1"),
        )
        .unwrap_err();
        assert_eq!(err, QueryError::EmptyUpdate);
    }

    #[test]
    fn no_fields_is_an_empty_update() {
        let err = partial_update(
            "users",
            Vec::<(&str, SqlValue)>::new(),
            "username",
            text("u1"),
        )
        .unwrap_err();
        assert_eq!(err, QueryError::EmptyUpdate);
    }

    #[test]
    fn identical_inputs_build_identical_statements() {
        let build = || {
            partial_update(
                "jobs",
                vec![("title", text("Engineer")), ("salary", SqlValue::Float(1e5))],
                "id",
                SqlValue::Int(7),
            )
            .unwrap()
        };
        assert_eq!(build(), build());
    }
}
