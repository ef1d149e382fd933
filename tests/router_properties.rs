//! Behavioural properties of compilation, registration and dispatch.

use std::fmt::Write;
use std::sync::Arc;

use typed_router::routing::{
    compile, handler, CaptureKind, CaptureValue, CompileError, DispatchOutcome, Dispatcher,
    HandlerRef, RegistryError, RequestContext, Route, RouteRegistry,
};

fn tag(name: &'static str) -> HandlerRef {
    handler(move |res, _| {
        res.write_str(name)?;
        Ok(())
    })
}

fn dispatcher() -> Dispatcher {
    Dispatcher::new(Arc::new(RouteRegistry::new()))
}

#[test]
fn test_repeated_names_always_rejected() {
    let kinds = ["str", "int", "all", "any"];
    for a in kinds {
        for b in kinds {
            let template = format!("/<{}:name>/x/<{}:name>", a, b);
            assert!(
                matches!(compile(&template), Err(CompileError::DuplicateCapture { .. })),
                "{} should be rejected",
                template
            );
        }
    }
}

#[test]
fn test_documented_translations() {
    let cases = [
        ("/<all:username>$", "/(?P<username>[[:alnum:]]+)$"),
        (
            "/<all:username>/<str:reponame>",
            "/(?P<username>[[:alnum:]]+)/(?P<reponame>[[:alpha:]]+)",
        ),
        ("/api/<int:userid>", "/api/(?P<userid>[[:digit:]]+)"),
        ("^/static/<any:staticfile>", "^/static/(?P<staticfile>.+)"),
    ];
    for (template, expected) in cases {
        assert_eq!(compile(template).unwrap().as_str(), expected);
    }
}

#[test]
fn test_round_trip_captures() {
    let d = dispatcher();
    d.registry().add("/<all:user>/<str:post>$", "post", tag("post")).unwrap();

    let DispatchOutcome::Matched(m) = d.dispatch("/alice/intro") else {
        panic!("expected match");
    };
    assert_eq!(m.captures().get("user"), Some(&CaptureValue::Str("alice".into())));
    assert_eq!(m.captures().get("post"), Some(&CaptureValue::Str("intro".into())));
    assert_eq!(m.route().pattern().kind_of("user"), Some(CaptureKind::AlphaNumeric));

    // `all` accepts digits, so only the `str` segment constrains the path.
    assert!(matches!(d.dispatch("/alice123/intro"), DispatchOutcome::Matched(_)));
    assert!(matches!(d.dispatch("/alice/intro123"), DispatchOutcome::NoMatch));
}

#[test]
fn test_failed_registration_leaves_size_unchanged() {
    let registry = RouteRegistry::new();
    registry.add("^/a$", "a", tag("a")).unwrap();
    registry.add("^/b$", "b", tag("b")).unwrap();

    assert!(matches!(
        registry.add("^/c$", "a", tag("c")),
        Err(RegistryError::DuplicateName(_))
    ));
    assert!(matches!(
        registry.add("^/(<int:x>$", "c", tag("c")),
        Err(RegistryError::Compile(CompileError::InvalidPattern { .. }))
    ));
    assert_eq!(registry.len(), 2);
}

#[test]
fn test_empty_registry_is_not_a_not_found() {
    let d = dispatcher();
    assert!(matches!(d.dispatch("/"), DispatchOutcome::DefaultPage));

    d.registry().add("^/x$", "x", tag("x")).unwrap();
    assert!(matches!(d.dispatch("/"), DispatchOutcome::NoMatch));

    d.registry().remove("x").unwrap();
    assert!(matches!(d.dispatch("/"), DispatchOutcome::DefaultPage));
}

#[test]
fn test_first_match_wins_over_broader_route() {
    let d = dispatcher();
    d.registry().add("/<int:id>$", "A", tag("A")).unwrap();
    d.registry().add("/<all:name>$", "B", tag("B")).unwrap();

    assert_eq!(d.dispatch("/42").route_name(), Some("A"));
    assert_eq!(d.dispatch("/abc").route_name(), Some("B"));

    // Registration order, not specificity, decides.
    let d = dispatcher();
    d.registry().add("/<all:name>$", "B", tag("B")).unwrap();
    d.registry().add("/<int:id>$", "A", tag("A")).unwrap();
    assert_eq!(d.dispatch("/42").route_name(), Some("B"));
}

#[test]
fn test_modify_route_keeps_priority() {
    let d = dispatcher();
    d.registry().add("^/<all:user>/<str:post>/<int:commentid>$", "commentid", tag("comment")).unwrap();
    d.registry().add("^/<all:user>/<str:post>$", "post", tag("post")).unwrap();
    d.registry().add("^/<all:user>/<any:rest>$", "fallback", tag("fallback")).unwrap();

    d.registry()
        .replace("post", "showpost", "^/<all:user>/<str:post>/show$", tag("show"))
        .unwrap();

    assert_eq!(d.registry().names(), vec!["commentid", "showpost", "fallback"]);
    assert_eq!(d.serve(RequestContext::get("/aki/hello/show")).body_text(), "show");
    assert_eq!(d.serve(RequestContext::get("/aki/hello")).body_text(), "fallback");
    assert_eq!(d.serve(RequestContext::get("/aki/hello/3")).body_text(), "comment");
}

#[test]
fn test_empty_integer_capture_does_not_crash_dispatch() {
    let d = dispatcher();
    d.registry()
        .add(
            "^/page(?:/<int:n>)?$",
            "page",
            handler(|res, req| {
                match req.captures().int("n") {
                    Ok(n) => write!(res, "page {:?}", n)?,
                    Err(e) => write!(res, "bad page [{}]", e.raw())?,
                }
                Ok(())
            }),
        )
        .unwrap();

    assert_eq!(d.serve(RequestContext::get("/page/4")).body_text(), "page Some(4)");
    assert_eq!(d.serve(RequestContext::get("/page")).body_text(), "bad page []");
}

#[test]
fn test_prebuilt_route_object() {
    let registry = RouteRegistry::new();
    let pattern = compile("/api/<int:userid>").unwrap();
    registry
        .add_prebuilt(Route::from_parts("userdetails", "/api/<int:userid>", pattern, tag("u")))
        .unwrap();
    assert_eq!(registry.get("userdetails").unwrap().pattern().as_str(), "/api/(?P<userid>[[:digit:]]+)");
}
