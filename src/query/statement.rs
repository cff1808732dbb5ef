//! Statement parameters and client-side binding.
//!
//! HiveServer2 has no server-side parameter binding. Statements use
//! positional `%s` placeholders which are replaced by Hive literals before
//! the text is submitted.

use crate::error::QueryError;

/// Parameter value bound into a statement.
#[derive(Debug, Clone, PartialEq)]
pub enum Parameter {
    /// NULL value
    Null,
    /// Boolean value
    Boolean(bool),
    /// Integer value
    Integer(i64),
    /// Float value
    Float(f64),
    /// String value
    String(String),
    /// Binary data
    Binary(Vec<u8>),
}

impl Parameter {
    /// Convert the parameter to a Hive SQL literal.
    ///
    /// Strings are single-quoted with backslash escapes, binary values are
    /// rendered as `unhex('..')`.
    pub fn to_sql_literal(&self) -> Result<String, QueryError> {
        match self {
            Parameter::Null => Ok("NULL".to_string()),
            Parameter::Boolean(b) => Ok(if *b { "TRUE" } else { "FALSE" }.to_string()),
            Parameter::Integer(i) => Ok(i.to_string()),
            Parameter::Float(f) => {
                if f.is_nan() || f.is_infinite() {
                    Err(QueryError::ParameterBindingError {
                        index: 0,
                        message: "NaN and Infinity are not supported".to_string(),
                    })
                } else {
                    Ok(f.to_string())
                }
            }
            Parameter::String(s) => Ok(format!("'{}'", escape_string(s))),
            Parameter::Binary(b) => Ok(format!("unhex('{}')", hex::encode(b))),
        }
    }
}

fn escape_string(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len() + 2);
    for c in value.chars() {
        match c {
            '\\' => escaped.push_str("\\\\"),
            '\'' => escaped.push_str("\\'"),
            '\r' => escaped.push_str("\\r"),
            '\n' => escaped.push_str("\\n"),
            '\t' => escaped.push_str("\\t"),
            other => escaped.push(other),
        }
    }
    escaped
}

impl From<bool> for Parameter {
    fn from(value: bool) -> Self {
        Parameter::Boolean(value)
    }
}

impl From<i32> for Parameter {
    fn from(value: i32) -> Self {
        Parameter::Integer(value as i64)
    }
}

impl From<i64> for Parameter {
    fn from(value: i64) -> Self {
        Parameter::Integer(value)
    }
}

impl From<f64> for Parameter {
    fn from(value: f64) -> Self {
        Parameter::Float(value)
    }
}

impl From<String> for Parameter {
    fn from(value: String) -> Self {
        Parameter::String(value)
    }
}

impl From<&str> for Parameter {
    fn from(value: &str) -> Self {
        Parameter::String(value.to_string())
    }
}

impl From<Vec<u8>> for Parameter {
    fn from(value: Vec<u8>) -> Self {
        Parameter::Binary(value)
    }
}

impl<T: Into<Parameter>> From<Option<T>> for Parameter {
    fn from(value: Option<T>) -> Self {
        value.map(Into::into).unwrap_or(Parameter::Null)
    }
}

/// Substitute bindings into `%s` placeholders.
///
/// Without bindings the SQL is returned untouched. With bindings, `%%`
/// becomes a literal `%` and every `%s` consumes the next binding.
///
/// # Errors
///
/// Returns `QueryError::ParameterBindingError` when the placeholder count and
/// the binding count differ, or when a binding cannot be rendered.
pub fn bind_parameters(sql: &str, bindings: &[Parameter]) -> Result<String, QueryError> {
    if bindings.is_empty() {
        return Ok(sql.to_string());
    }

    let mut bound = String::with_capacity(sql.len());
    let mut index = 0;
    let mut chars = sql.chars().peekable();

    while let Some(c) = chars.next() {
        if c != '%' {
            bound.push(c);
            continue;
        }

        match chars.peek() {
            Some('%') => {
                chars.next();
                bound.push('%');
            }
            Some('s') => {
                chars.next();
                let param = bindings
                    .get(index)
                    .ok_or_else(|| QueryError::ParameterBindingError {
                        index,
                        message: "Not enough parameters bound".to_string(),
                    })?;
                let literal = param.to_sql_literal().map_err(|e| match e {
                    QueryError::ParameterBindingError { message, .. } => {
                        QueryError::ParameterBindingError { index, message }
                    }
                    other => other,
                })?;
                bound.push_str(&literal);
                index += 1;
            }
            _ => bound.push('%'),
        }
    }

    if index < bindings.len() {
        return Err(QueryError::ParameterBindingError {
            index,
            message: format!(
                "Too many parameters bound: {} placeholders, {} bindings",
                index,
                bindings.len()
            ),
        });
    }

    Ok(bound)
}
