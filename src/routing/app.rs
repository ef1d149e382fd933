//! Route groups mounted under a common base path.
//!
//! A group is a list of route definitions whose templates are written relative to `base`.
//! Mounting registers them in order. Members that fail are logged and skipped so one bad
//! definition does not hide the rest of the group.

use crate::routing::error::RegistryError;
use crate::routing::handler::HandlerRef;
use crate::routing::registry::RouteRegistry;

/// One route definition inside a group.
#[derive(Clone)]
pub struct RouteSpec {
    pub name: String,
    pub template: String,
    pub handler: HandlerRef,
}

impl RouteSpec {
    pub fn new(name: impl Into<String>, template: impl Into<String>, handler: HandlerRef) -> Self {
        Self {
            name: name.into(),
            template: template.into(),
            handler,
        }
    }
}

impl std::fmt::Debug for RouteSpec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RouteSpec")
            .field("name", &self.name)
            .field("template", &self.template)
            .finish()
    }
}

/// Routes sharing a base path.
#[derive(Debug, Clone, Default)]
pub struct RouteGroup {
    base: String,
    routes: Vec<RouteSpec>,
}

impl RouteGroup {
    pub fn new(base: impl Into<String>) -> Self {
        Self {
            base: base.into(),
            routes: Vec::new(),
        }
    }

    pub fn route(mut self, spec: RouteSpec) -> Self {
        self.routes.push(spec);
        self
    }

    pub fn base(&self) -> &str {
        &self.base
    }

    /// Member templates with the base prepended, in registration order.
    pub fn expanded(&self) -> impl Iterator<Item = (String, &RouteSpec)> + '_ {
        self.routes
            .iter()
            .map(move |spec| (format!("{}{}", self.base, spec.template), spec))
    }
}

impl RouteRegistry {
    /// Register every member of `group`, returning the members that were rejected.
    pub fn mount(&self, group: &RouteGroup) -> Vec<RegistryError> {
        if !group.base.is_empty() {
            let overlapping = self
                .snapshot()
                .iter()
                .any(|route| route.template().starts_with(&group.base));
            if overlapping {
                tracing::warn!(
                    base = %group.base,
                    "Base path already used by a registered route; the group may be shadowed"
                );
            }
        }

        let mut failures = Vec::new();
        for (template, spec) in group.expanded() {
            if let Err(err) = self.add(&template, &spec.name, spec.handler.clone()) {
                tracing::warn!(base = %group.base, route = %spec.name, error = %err, "Skipping group route");
                failures.push(err);
            }
        }

        tracing::info!(
            base = %group.base,
            mounted = group.routes.len() - failures.len(),
            rejected = failures.len(),
            "Route group mounted"
        );
        failures
    }
}
