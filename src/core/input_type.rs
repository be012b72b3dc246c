//! GraphQL input type references and conversion of raw strings to typed JSON

use serde_json::{Number, Value, from_str};
use std::fmt::{Display, Formatter, Result as FmtResult};
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum InputType {
    Named(String),
    NonNull(Box<InputType>),
    List(Box<InputType>),
}

impl Display for InputType {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            InputType::Named(name) => write!(f, "{name}"),
            InputType::NonNull(inner) => write!(f, "{inner}!"),
            InputType::List(inner) => write!(f, "[{inner}]"),
        }
    }
}

impl FromStr for InputType {
    type Err = InputTypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        match s {
            s if s.ends_with('!') => {
                let inner = InputType::from_str(&s[..s.len() - 1])?;
                match inner {
                    InputType::NonNull(_) => Err(InputTypeError::ParseType(format!(
                        "Doubled non-null marker: {s}"
                    ))),
                    inner => Ok(InputType::NonNull(Box::new(inner))),
                }
            }
            s if s.starts_with('[') && s.ends_with(']') => {
                let inner = InputType::from_str(&s[1..s.len() - 1])?;
                Ok(InputType::List(Box::new(inner)))
            }
            s if !s.is_empty() && s.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') => {
                Ok(InputType::Named(s.to_string()))
            }
            _ => Err(InputTypeError::ParseType(format!("Invalid type: {s}"))),
        }
    }
}

impl InputType {
    /// The named type once list and non-null wrappers are removed
    pub fn named(&self) -> &str {
        match self {
            InputType::Named(name) => name,
            InputType::NonNull(inner) | InputType::List(inner) => inner.named(),
        }
    }

    pub fn is_non_null(&self) -> bool {
        matches!(self, InputType::NonNull(_))
    }
}

#[derive(Debug, Clone, Error)]
pub enum InputTypeError {
    #[error("Parse error: {0}")]
    ParseType(String),

    #[error("Failed to convert '{value}' to {expected_type}: {error}")]
    Conversion {
        value: String,
        expected_type: InputType,
        error: String,
    },
}

/// Converts a raw value, as found in a query string, to JSON for a GraphQL input type
pub trait ToJson {
    fn to_json(&self, input_type: &InputType) -> Result<Value, InputTypeError>;
}

impl ToJson for str {
    fn to_json(&self, input_type: &InputType) -> Result<Value, InputTypeError> {
        let conversion_error = |error: String| InputTypeError::Conversion {
            value: self.to_string(),
            expected_type: input_type.clone(),
            error,
        };

        match input_type {
            InputType::NonNull(inner) => match self.trim() {
                "null" => Err(conversion_error("Value must not be null".to_string())),
                _ => self.to_json(inner),
            },
            InputType::List(inner) => parse_list(self, inner).map_err(conversion_error),
            InputType::Named(_) if self.trim() == "null" => Ok(Value::Null),
            InputType::Named(name) => convert_scalar(name, self).map_err(conversion_error),
        }
    }
}

fn convert_scalar(name: &str, raw: &str) -> Result<Value, String> {
    match name {
        "Int" => raw
            .trim()
            .parse::<i32>()
            .map(Value::from)
            .map_err(|e| e.to_string()),
        "Float" => raw
            .trim()
            .parse::<f64>()
            .map_err(|e| e.to_string())
            .and_then(|n| {
                Number::from_f64(n)
                    .map(Value::Number)
                    .ok_or_else(|| "Invalid float value for JSON".to_string())
            }),
        "Boolean" => raw
            .trim()
            .parse::<bool>()
            .map(Value::Bool)
            .map_err(|e| e.to_string()),
        // String, ID, enums and custom scalars travel as strings
        _ => Ok(Value::String(raw.to_string())),
    }
}

/// Checks an item of a list given as JSON against the item type
fn check_item(item: Value, input_type: &InputType) -> Result<Value, String> {
    match (input_type, item) {
        (InputType::NonNull(_), Value::Null) => Err("List item must not be null".to_string()),
        (InputType::NonNull(inner), item) => check_item(item, inner),
        (_, Value::Null) => Ok(Value::Null),
        (InputType::List(inner), Value::Array(items)) => items
            .into_iter()
            .map(|item| check_item(item, inner))
            .collect::<Result<Vec<_>, _>>()
            .map(Value::Array),
        (InputType::List(_), other) => Err(format!("Expected a list, found {other}")),
        (InputType::Named(name), Value::String(raw)) => convert_scalar(name, &raw),
        (InputType::Named(name), item) => {
            let accepted = match name.as_str() {
                "Int" => item.as_i64().is_some_and(|n| i32::try_from(n).is_ok()),
                "Float" => item.is_number(),
                "Boolean" => item.is_boolean(),
                "ID" => item.is_i64() || item.is_u64(),
                "String" => false,
                // Enums and custom scalars are left to the server
                _ => true,
            };
            match accepted {
                true => Ok(item),
                false => Err(format!("Expected {name}, found {item}")),
            }
        }
    }
}

fn parse_list(value: &str, item_type: &InputType) -> Result<Value, String> {
    let items: Vec<Value> = match from_str::<Vec<Value>>(value) {
        Ok(items) => items
            .into_iter()
            .map(|item| check_item(item, item_type))
            .collect::<Result<_, _>>()?,
        Err(_) if value.trim().is_empty() => Vec::new(),
        Err(_) => value
            .split(',')
            .map(|s| s.trim().to_json(item_type).map_err(|e| e.to_string()))
            .collect::<Result<_, _>>()?,
    };
    Ok(Value::Array(items))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn parse(s: &str) -> InputType {
        s.parse().unwrap()
    }

    #[test]
    fn test_input_type_from_str() {
        assert_eq!(parse("ID"), InputType::Named("ID".to_string()));
        assert_eq!(
            parse("ID!"),
            InputType::NonNull(Box::new(InputType::Named("ID".to_string())))
        );
        assert_eq!(
            parse("[Int!]!"),
            InputType::NonNull(Box::new(InputType::List(Box::new(InputType::NonNull(
                Box::new(InputType::Named("Int".to_string()))
            )))))
        );
        assert!("".parse::<InputType>().is_err());
        assert!("ID!!".parse::<InputType>().is_err());
        assert!("[ID".parse::<InputType>().is_err());
    }

    #[test]
    fn test_input_type_display() {
        assert_eq!(parse("[Int!]!").to_string(), "[Int!]!");
        assert_eq!(parse("[Int!]!").named(), "Int");
        assert!(parse("String!").is_non_null());
    }

    #[test]
    fn test_to_json_scalars() {
        assert_eq!("42".to_json(&parse("Int")).unwrap(), json!(42));
        assert_eq!("true".to_json(&parse("Boolean!")).unwrap(), json!(true));
        assert_eq!("abc".to_json(&parse("ID!")).unwrap(), json!("abc"));
        assert_eq!("PUBLISHED".to_json(&parse("PostStatus")).unwrap(), json!("PUBLISHED"));

        let result = "2.5".to_json(&parse("Float")).unwrap();
        assert_eq!(result.as_f64(), Some(2.5));
    }

    #[test]
    fn test_to_json_null_handling() {
        assert_eq!("null".to_json(&parse("Int")).unwrap(), Value::Null);
        assert!("null".to_json(&parse("Int!")).is_err());
    }

    #[test]
    fn test_to_json_lists() {
        let list = parse("[Int!]");
        assert_eq!("[1, 2, 3]".to_json(&list).unwrap(), json!([1, 2, 3]));
        assert_eq!("1, 2, 3".to_json(&list).unwrap(), json!([1, 2, 3]));
        assert_eq!("".to_json(&list).unwrap(), json!([]));

        let ids = parse("[ID!]!");
        assert_eq!(r#"["a", "b"]"#.to_json(&ids).unwrap(), json!(["a", "b"]));
        assert_eq!(r#"["1", 2]"#.to_json(&list).unwrap(), json!([1, 2]));
        assert_eq!("[1, null]".to_json(&parse("[Int]")).unwrap(), json!([1, null]));
        assert_eq!("[[1, 2], null]".to_json(&parse("[[Int!]]")).unwrap(), json!([[1, 2], null]));
        assert_eq!("[1.5, 2]".to_json(&parse("[Float!]")).unwrap(), json!([1.5, 2]));
    }

    #[test]
    fn test_to_json_list_keeps_string_items() {
        assert_eq!(r#"["null"]"#.to_json(&parse("[String]")).unwrap(), json!(["null"]));
        assert!(r#"["null"]"#.to_json(&parse("[Int]")).is_err());
    }

    #[test]
    fn test_conversion_errors() {
        let err = "eleven".to_json(&parse("Int")).unwrap_err();
        match err {
            InputTypeError::Conversion {
                value,
                expected_type,
                ..
            } => {
                assert_eq!(value, "eleven");
                assert_eq!(expected_type, parse("Int"));
            }
            _ => panic!("Expected conversion error"),
        }

        assert!("3000000000".to_json(&parse("Int")).is_err());
        assert!("[1.5, null, true]".to_json(&parse("[Int!]!")).is_err());
        assert!("[null]".to_json(&parse("[Int!]")).is_err());
        assert!("[3000000000]".to_json(&parse("[Int]")).is_err());
        assert!("[1]".to_json(&parse("[String]")).is_err());
        assert!("[[1], 2]".to_json(&parse("[[Int]]")).is_err());
        assert!("1, x".to_json(&parse("[Int]")).is_err());
    }
}
