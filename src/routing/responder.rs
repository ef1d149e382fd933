//! A configurable handler that renders captures into a fixed body.

use once_cell::sync::Lazy;
use regex::{Captures as RegexCaptures, Regex};
use axum::http::StatusCode;

use crate::routing::handler::{Handler, HandlerError, RequestContext, ResponseBuffer};

static MARKER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\{([[:alpha:]]+)\}").expect("marker syntax is a valid regex"));

/// Writes a fixed status, content type and body.
///
/// `{name}` in the body is replaced by the captured value of `name`. Markers with no matching
/// capture are left as they are.
#[derive(Debug, Clone)]
pub struct TemplateResponder {
    status: StatusCode,
    content_type: Option<String>,
    body: String,
}

impl TemplateResponder {
    pub fn new(status: StatusCode, body: impl Into<String>) -> Self {
        Self {
            status,
            content_type: None,
            body: body.into(),
        }
    }

    pub fn content_type(mut self, content_type: impl Into<String>) -> Self {
        self.content_type = Some(content_type.into());
        self
    }

    fn render(&self, req: &RequestContext) -> String {
        MARKER
            .replace_all(&self.body, |caps: &RegexCaptures<'_>| {
                req.captures()
                    .render(&caps[1])
                    .unwrap_or_else(|| caps[0].to_string())
            })
            .into_owned()
    }
}

impl Handler for TemplateResponder {
    fn handle(&self, res: &mut ResponseBuffer, req: &RequestContext) -> Result<(), HandlerError> {
        res.set_status(self.status);
        if let Some(content_type) = &self.content_type {
            res.set_content_type(content_type);
        }
        res.write_bytes(self.render(req).as_bytes());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::routing::captures::{CaptureValue, Captures};

    #[test]
    fn test_renders_captures() {
        let mut caps = Captures::new();
        caps.push("user", CaptureValue::Str("alice".into()));
        caps.push("id", CaptureValue::Int(9));
        let req = RequestContext::get("/alice/9").with_match("post", caps);

        let responder = TemplateResponder::new(StatusCode::CREATED, "{user} #{id} {other}")
            .content_type("text/plain");
        let mut res = ResponseBuffer::new();
        responder.handle(&mut res, &req).unwrap();

        assert_eq!(res.status(), StatusCode::CREATED);
        assert_eq!(res.body_text(), "alice #9 {other}");
        assert_eq!(res.headers()["content-type"], "text/plain");
    }
}
