use std::borrow::Cow;
use std::cmp::Ordering;
use std::fmt;

/// A primitive attribute value of a record.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Text(String),
    Number(f64),
}

impl Value {
    /// Textual representation used for searching and display.
    pub fn as_text(&self) -> Cow<'_, str> {
        match self {
            Value::Text(s) => Cow::Borrowed(s),
            Value::Number(n) => Cow::Owned(format_number(*n)),
        }
    }

    /// Total order: numbers compare numerically, text lexicographically and
    /// every number sorts before every text.
    pub fn compare(&self, other: &Value) -> Ordering {
        match (self, other) {
            (Value::Number(a), Value::Number(b)) => a.total_cmp(b),
            (Value::Text(a), Value::Text(b)) => a.cmp(b),
            (Value::Number(_), Value::Text(_)) => Ordering::Less,
            (Value::Text(_), Value::Number(_)) => Ordering::Greater,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.as_text())
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Text(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Text(s)
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Value::Number(n)
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::Number(n as f64)
    }
}

// Integral numbers print without a fraction: 3, not 3.0
fn format_number(n: f64) -> String {
    if n.is_finite() && n.fract() == 0.0 && n.abs() < 1e15 {
        format!("{}", n as i64)
    } else {
        n.to_string()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum RecordId {
    Int(i64),
    Text(String),
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RecordId::Int(i) => write!(f, "{i}"),
            RecordId::Text(s) => f.write_str(s),
        }
    }
}

impl From<i64> for RecordId {
    fn from(i: i64) -> Self {
        RecordId::Int(i)
    }
}

impl From<i32> for RecordId {
    fn from(i: i32) -> Self {
        RecordId::Int(i64::from(i))
    }
}

impl From<&str> for RecordId {
    fn from(s: &str) -> Self {
        RecordId::Text(s.to_string())
    }
}

/// One row of domain data. Attributes keep their declaration order.
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    pub id: RecordId,
    attributes: Vec<(String, Value)>,
}

impl Record {
    pub fn new(id: impl Into<RecordId>) -> Self {
        Self {
            id: id.into(),
            attributes: Vec::new(),
        }
    }

    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.attributes.push((key.into(), value.into()));
        self
    }

    /// Returns the attribute for `key`. The identifier is reachable as `"id"`
    /// unless an attribute of that name shadows it.
    pub fn get(&self, key: &str) -> Option<Cow<'_, Value>> {
        if let Some((_, value)) = self.attributes.iter().find(|(k, _)| k == key) {
            return Some(Cow::Borrowed(value));
        }
        if key == "id" {
            let value = match &self.id {
                RecordId::Int(i) => Value::Number(*i as f64),
                RecordId::Text(s) => Value::Text(s.clone()),
            };
            return Some(Cow::Owned(value));
        }
        None
    }

    /// Case-insensitive substring match over the id and every attribute.
    /// `needle` must already be lowercase.
    pub fn matches(&self, needle: &str) -> bool {
        if needle.is_empty() {
            return true;
        }
        self.id.to_string().to_lowercase().contains(needle)
            || self
                .attributes
                .iter()
                .any(|(_, v)| v.as_text().to_lowercase().contains(needle))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn numbers_render_like_the_table_shows_them() {
        assert_eq!(Value::from(3i64).to_string(), "3");
        assert_eq!(Value::from(2.5).to_string(), "2.5");
        assert_eq!(Value::from(-0.0).to_string(), "0");
    }

    #[test]
    fn compare_is_numeric_only_for_two_numbers() {
        assert_eq!(Value::from(9i64).compare(&Value::from(10i64)), Ordering::Less);
        // "9" > "10" lexicographically
        assert_eq!(Value::from("9").compare(&Value::from("10")), Ordering::Greater);
        assert_eq!(Value::from("Ann").compare(&Value::from("Bob")), Ordering::Less);
    }

    #[test]
    fn numbers_rank_before_text() {
        let (ten, nine, text) = (Value::from(10i64), Value::from(9i64), Value::from("1z"));
        assert_eq!(ten.compare(&text), Ordering::Less);
        assert_eq!(text.compare(&nine), Ordering::Greater);
        assert_eq!(nine.compare(&ten), Ordering::Less);
        assert_eq!(Value::from("9").compare(&Value::from(10i64)), Ordering::Greater);
    }

    #[test]
    fn id_is_searchable_and_addressable() {
        let r = Record::new(42).with("name", "Tom");
        assert!(r.matches("42"));
        assert!(r.matches("to"));
        assert!(!r.matches("ann"));
        assert_eq!(r.get("id").map(|v| v.into_owned()), Some(Value::Number(42.0)));
        assert!(r.get("email").is_none());
    }

    #[test]
    fn attribute_named_id_shadows_identifier() {
        let r = Record::new(1).with("id", "custom");
        assert_eq!(r.get("id").map(|v| v.into_owned()), Some(Value::from("custom")));
    }
}
