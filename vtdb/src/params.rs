//! Bound parameters and bind-variable rewriting

use std::collections::{BTreeMap, BTreeSet};

use crate::error::{Error, Result};
use crate::value::Value;

/// Parameters bound to a statement.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Params {
    /// No parameters
    #[default]
    Empty,
    /// Values for `?` placeholders, in order
    Positional(Vec<Value>),
    /// Bind variables by name
    Named(BTreeMap<String, Value>),
}

impl Params {
    /// Build named bind variables.
    ///
    /// ```ignore
    /// let params = Params::named([("id", Value::from(7)), ("name", "bob".into())]);
    /// ```
    pub fn named<I, K, V>(vars: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<Value>,
    {
        Params::Named(
            vars.into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }

    pub fn is_empty(&self) -> bool {
        match self {
            Params::Empty => true,
            Params::Positional(values) => values.is_empty(),
            Params::Named(vars) => vars.is_empty(),
        }
    }
}

impl From<()> for Params {
    fn from(_: ()) -> Self {
        Params::Empty
    }
}

impl From<Vec<Value>> for Params {
    fn from(values: Vec<Value>) -> Self {
        Params::Positional(values)
    }
}

impl From<BTreeMap<String, Value>> for Params {
    fn from(vars: BTreeMap<String, Value>) -> Self {
        Params::Named(vars)
    }
}

/// Rewrite `%(name)s` placeholders to `:name`.
///
/// Only the bind variables the statement references are kept. A reference to
/// a variable that was not supplied fails with [`Error::Interface`]. `%%` is
/// a literal percent sign. Positional and empty parameters are returned
/// untouched, as is the statement.
pub fn rewrite_pyformat(sql: &str, params: &Params) -> Result<(String, Params)> {
    let vars = match params {
        Params::Named(vars) => vars,
        other => return Ok((sql.to_string(), other.clone())),
    };

    let mut out = String::with_capacity(sql.len());
    let mut accessed = BTreeSet::new();
    let mut chars = sql.chars();

    while let Some(c) = chars.next() {
        if c != '%' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('%') => out.push('%'),
            Some('(') => {
                let mut name = String::new();
                loop {
                    match chars.next() {
                        Some(')') => break,
                        Some(c) => name.push(c),
                        None => {
                            return Err(Error::Interface(format!(
                                "unterminated bind variable in: {sql}"
                            )))
                        }
                    }
                }
                if chars.next() != Some('s') {
                    return Err(Error::Interface(format!(
                        "bind variable {name} must use %({name})s"
                    )));
                }
                if !is_identifier(&name) {
                    return Err(Error::Interface(format!(
                        "invalid bind variable name: {name:?}"
                    )));
                }
                if !vars.contains_key(&name) {
                    return Err(Error::Interface(format!("missing bind variable: {name}")));
                }
                out.push(':');
                out.push_str(&name);
                accessed.insert(name);
            }
            other => {
                return Err(Error::Interface(format!(
                    "unsupported format character {other:?} in: {sql}"
                )))
            }
        }
    }

    if accessed.is_empty() {
        return Ok((out, Params::Empty));
    }
    let exported = vars
        .iter()
        .filter(|(name, _)| accessed.contains(*name))
        .map(|(name, value)| (name.clone(), value.clone()))
        .collect();
    Ok((out, Params::Named(exported)))
}

/// `[A-Za-z_][A-Za-z0-9_]*`, the names the driver reads after `:`.
fn is_identifier(name: &str) -> bool {
    let mut bytes = name.bytes();
    match bytes.next() {
        Some(b) if b.is_ascii_alphabetic() || b == b'_' => {}
        _ => return false,
    }
    bytes.all(|b| b.is_ascii_alphanumeric() || b == b'_')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rewrite_exports_only_referenced_vars() {
        let params = Params::named([("id", Value::from(7)), ("unused", Value::from("x"))]);
        let (sql, bound) =
            rewrite_pyformat("select * from t where id = %(id)s or parent = %(id)s", &params)
                .unwrap();
        assert_eq!(sql, "select * from t where id = :id or parent = :id");
        assert_eq!(bound, Params::named([("id", 7)]));
    }

    #[test]
    fn test_rewrite_escaped_percent() {
        let params = Params::named([("name", "a")]);
        let (sql, _) =
            rewrite_pyformat("select * from t where name like 'x%%' and n = %(name)s", &params)
                .unwrap();
        assert_eq!(sql, "select * from t where name like 'x%' and n = :name");
    }

    #[test]
    fn test_rewrite_missing_var_is_interface_error() {
        let params = Params::named([("id", 1)]);
        let err = rewrite_pyformat("select %(nope)s", &params).unwrap_err();
        assert!(matches!(err, Error::Interface(_)));
    }

    #[test]
    fn test_rewrite_rejects_malformed_placeholders() {
        let params = Params::named([("id", 1)]);
        assert!(rewrite_pyformat("select %(id", &params).is_err());
        assert!(rewrite_pyformat("select %(id)d", &params).is_err());
        assert!(rewrite_pyformat("select 100%", &params).is_err());
    }

    #[test]
    fn test_rewrite_rejects_non_identifier_names() {
        let params = Params::named([("user-id", 1), ("1st", 2), ("", 3)]);
        for sql in ["select %(user-id)s", "select %(1st)s", "select %()s"] {
            let err = rewrite_pyformat(sql, &params).unwrap_err();
            assert!(matches!(err, Error::Interface(_)), "{sql}");
        }

        let params = Params::named([("_user_id2", 1)]);
        let (sql, _) = rewrite_pyformat("select %(_user_id2)s", &params).unwrap();
        assert_eq!(sql, "select :_user_id2");
    }

    #[test]
    fn test_rewrite_without_references_binds_nothing() {
        let params = Params::named([("id", 1)]);
        let (sql, bound) = rewrite_pyformat("select 1", &params).unwrap();
        assert_eq!(sql, "select 1");
        assert_eq!(bound, Params::Empty);
    }

    #[test]
    fn test_positional_passes_through() {
        let params = Params::from(vec![Value::from(1)]);
        let (sql, bound) = rewrite_pyformat("select ? like '5%'", &params).unwrap();
        assert_eq!(sql, "select ? like '5%'");
        assert_eq!(bound, params);
    }
}
