//! Typed values extracted from a matched path.

use crate::routing::error::CoercionError;

/// A single captured value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CaptureValue {
    /// `str`, `all` and `any` captures.
    Str(String),
    /// `int` captures that parsed.
    Int(i64),
    /// `int` captures that did not parse. The request still reaches its handler.
    Failed(CoercionError),
}

/// Captured values of one request, in the order the template declared them.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Captures {
    values: Vec<(String, CaptureValue)>,
}

impl Captures {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn push(&mut self, name: impl Into<String>, value: CaptureValue) {
        self.values.push((name.into(), value));
    }

    pub fn get(&self, name: &str) -> Option<&CaptureValue> {
        self.values
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, value)| value)
    }

    /// String value of a `str`, `all` or `any` capture.
    pub fn str(&self, name: &str) -> Option<&str> {
        match self.get(name)? {
            CaptureValue::Str(s) => Some(s),
            _ => None,
        }
    }

    /// Integer value of an `int` capture.
    ///
    /// Returns `Ok(None)` if there is no such integer capture and the coercion error if the
    /// captured text did not parse.
    pub fn int(&self, name: &str) -> Result<Option<i64>, CoercionError> {
        match self.get(name) {
            Some(CaptureValue::Int(n)) => Ok(Some(*n)),
            Some(CaptureValue::Failed(err)) => Err(err.clone()),
            _ => Ok(None),
        }
    }

    /// Every coercion failure in this request.
    pub fn errors(&self) -> impl Iterator<Item = &CoercionError> {
        self.values.iter().filter_map(|(_, value)| match value {
            CaptureValue::Failed(err) => Some(err),
            _ => None,
        })
    }

    pub fn has_errors(&self) -> bool {
        self.errors().next().is_some()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &CaptureValue)> {
        self.values.iter().map(|(n, value)| (n.as_str(), value))
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Text form of a capture, as it would be rendered into a response.
    pub fn render(&self, name: &str) -> Option<String> {
        match self.get(name)? {
            CaptureValue::Str(s) => Some(s.clone()),
            CaptureValue::Int(n) => Some(n.to_string()),
            CaptureValue::Failed(err) => Some(err.raw().to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn failed(name: &str, raw: &str) -> CaptureValue {
        let source = raw.parse::<i64>().unwrap_err();
        CaptureValue::Failed(CoercionError::IntegerParseFailure {
            name: name.to_string(),
            raw: raw.to_string(),
            source,
        })
    }

    #[test]
    fn test_accessors() {
        let mut caps = Captures::new();
        caps.push("user", CaptureValue::Str("alice".into()));
        caps.push("post", CaptureValue::Int(42));

        assert_eq!(caps.str("user"), Some("alice"));
        assert_eq!(caps.str("post"), None);
        assert_eq!(caps.int("post"), Ok(Some(42)));
        assert_eq!(caps.int("user"), Ok(None));
        assert_eq!(caps.int("missing"), Ok(None));
        assert!(!caps.has_errors());
        assert_eq!(caps.len(), 2);
    }

    #[test]
    fn test_failed_integer() {
        let mut caps = Captures::new();
        caps.push("id", failed("id", ""));

        let err = caps.int("id").unwrap_err();
        assert_eq!(err.capture_name(), "id");
        assert_eq!(err.raw(), "");
        assert_eq!(caps.errors().count(), 1);
        assert_eq!(caps.render("id").as_deref(), Some(""));
    }

    #[test]
    fn test_iteration_keeps_order() {
        let mut caps = Captures::new();
        caps.push("b", CaptureValue::Str("1".into()));
        caps.push("a", CaptureValue::Int(2));
        let names: Vec<_> = caps.iter().map(|(n, _)| n).collect();
        assert_eq!(names, vec!["b", "a"]);
    }
}
