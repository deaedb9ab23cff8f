//! Typed access to the permissive JSON argument bag of a tool call
//!
//! Every accessor that can fail returns the bare reason string. The
//! dispatcher wraps it with the operation's documentation.

use chrono::{DateTime, FixedOffset};
use serde_json::{Map, Value};

/// Borrowed view over tool call arguments
#[derive(Debug, Clone, Copy)]
pub struct ArgBag<'a> {
    args: &'a Map<String, Value>,
}

impl<'a> ArgBag<'a> {
    /// Wrap an argument map
    pub fn new(args: &'a Map<String, Value>) -> Self {
        Self { args }
    }

    /// The raw value for a key, treating JSON `null` as absent
    pub fn get(&self, name: &str) -> Option<&'a Value> {
        self.args.get(name).filter(|v| !v.is_null())
    }

    /// Repository coordinates shared by almost every operation
    pub fn owner_repo(&self) -> Result<(&'a str, &'a str), String> {
        let owner = self.required_str("owner")?;
        let repo = self.required_str("repo")?;
        Ok((owner, repo))
    }

    /// A non-empty string
    pub fn required_str(&self, name: &str) -> Result<&'a str, String> {
        self.opt_str(name).ok_or_else(|| format!("{name} is required"))
    }

    /// A string if present and non-empty
    pub fn opt_str(&self, name: &str) -> Option<&'a str> {
        self.get(name)
            .and_then(Value::as_str)
            .filter(|s| !s.is_empty())
    }

    /// An optional string restricted to `allowed`
    pub fn opt_enum(&self, name: &str, allowed: &[&str]) -> Result<Option<&'a str>, String> {
        match self.opt_str(name) {
            Some(value) if allowed.contains(&value) => Ok(Some(value)),
            Some(value) => Err(format!(
                "{name} must be one of: {} (got '{value}')",
                allowed.join(", ")
            )),
            None => Ok(None),
        }
    }

    /// A positive whole number such as an issue index or resource id
    ///
    /// Numbers usually arrive as floats, so `42.0` is accepted and `42.5` is not.
    pub fn required_id(&self, name: &str) -> Result<i64, String> {
        match self.get(name) {
            None => Err(format!("{name} is required")),
            Some(value) => {
                positive_int(value).ok_or_else(|| format!("{name} must be a positive integer"))
            }
        }
    }

    /// A positive whole number if present; zero and negatives count as absent
    pub fn opt_positive_int(&self, name: &str) -> Option<i64> {
        self.get(name).and_then(positive_int)
    }

    /// A boolean if present
    pub fn opt_bool(&self, name: &str) -> Option<bool> {
        self.get(name).and_then(Value::as_bool)
    }

    /// Non-empty strings of an array, if the key holds one
    pub fn opt_string_array(&self, name: &str) -> Option<Vec<String>> {
        let items = self.get(name)?.as_array()?;
        Some(
            items
                .iter()
                .filter_map(Value::as_str)
                .filter(|s| !s.is_empty())
                .map(str::to_string)
                .collect(),
        )
    }

    /// Positive whole numbers of an array, if the key holds one
    pub fn opt_id_array(&self, name: &str) -> Option<Vec<i64>> {
        let items = self.get(name)?.as_array()?;
        Some(items.iter().filter_map(positive_int).collect())
    }

    /// A non-empty array of ids
    pub fn required_id_array(&self, name: &str) -> Result<Vec<i64>, String> {
        match self.opt_id_array(name) {
            Some(ids) if !ids.is_empty() => Ok(ids),
            _ => Err(format!("{name} is required (array of label IDs)")),
        }
    }

    /// Comma-separated values, trimmed, with blanks dropped
    pub fn opt_csv(&self, name: &str) -> Option<Vec<String>> {
        let values: Vec<String> = self
            .opt_str(name)?
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .collect();
        (!values.is_empty()).then_some(values)
    }

    /// An RFC3339 timestamp if present
    pub fn opt_timestamp(&self, name: &str) -> Result<Option<DateTime<FixedOffset>>, String> {
        match self.opt_str(name) {
            None => Ok(None),
            Some(raw) => DateTime::parse_from_rfc3339(raw)
                .map(Some)
                .map_err(|e| format!("invalid {name} format (expected RFC3339): {e}")),
        }
    }
}

fn positive_int(value: &Value) -> Option<i64> {
    if let Some(n) = value.as_i64() {
        return (n > 0).then_some(n);
    }
    let f = value.as_f64()?;
    if f > 0.0 && f.fract() == 0.0 && f <= i64::MAX as f64 {
        Some(f as i64)
    } else {
        None
    }
}
