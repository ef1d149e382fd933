//! Ordered, uniquely named route table.
//!
//! # Responsibilities
//! - Store compiled routes in dispatch order
//! - Enforce unique route names
//! - Add, replace, remove and bulk-swap routes
//!
//! # Design Decisions
//! - The table is an immutable snapshot behind `ArcSwap`; every mutation publishes a new vector
//! - Writers serialise on a mutex, readers never block
//! - A failed mutation leaves the published snapshot untouched
//! - Replacing a route keeps its position

use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use arc_swap::ArcSwap;

use crate::observability::metrics;
use crate::routing::error::{CompileError, RegistryError};
use crate::routing::handler::HandlerRef;
use crate::routing::pattern::{compile, CompiledPattern};

/// A named route: template, compiled pattern and handler.
#[derive(Clone)]
pub struct Route {
    name: String,
    template: String,
    pattern: CompiledPattern,
    handler: HandlerRef,
}

impl Route {
    /// Compile `template` and build a route from it.
    pub fn new(
        template: impl Into<String>,
        name: impl Into<String>,
        handler: HandlerRef,
    ) -> Result<Self, CompileError> {
        let template = template.into();
        let pattern = compile(&template)?;
        Ok(Self::from_parts(name, template, pattern, handler))
    }

    /// Build a route from an already compiled pattern.
    pub fn from_parts(
        name: impl Into<String>,
        template: impl Into<String>,
        pattern: CompiledPattern,
        handler: HandlerRef,
    ) -> Self {
        Self {
            name: name.into(),
            template: template.into(),
            pattern,
            handler,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Template text as registered.
    pub fn template(&self) -> &str {
        &self.template
    }

    pub fn pattern(&self) -> &CompiledPattern {
        &self.pattern
    }

    pub fn handler(&self) -> &HandlerRef {
        &self.handler
    }
}

impl fmt::Debug for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Route")
            .field("name", &self.name)
            .field("template", &self.template)
            .field("pattern", &self.pattern.as_str())
            .finish()
    }
}

/// Immutable view of the route table.
pub type RouteSnapshot = Arc<Vec<Arc<Route>>>;

/// The route table shared by the dispatcher and whoever registers routes.
pub struct RouteRegistry {
    routes: ArcSwap<Vec<Arc<Route>>>,
    write_lock: Mutex<()>,
}

impl RouteRegistry {
    pub fn new() -> Self {
        Self {
            routes: ArcSwap::from_pointee(Vec::new()),
            write_lock: Mutex::new(()),
        }
    }

    /// Current table. Stays consistent for as long as it is held.
    pub fn snapshot(&self) -> RouteSnapshot {
        self.routes.load_full()
    }

    pub fn len(&self) -> usize {
        self.routes.load().len()
    }

    pub fn is_empty(&self) -> bool {
        self.routes.load().is_empty()
    }

    pub fn get(&self, name: &str) -> Option<Arc<Route>> {
        self.routes
            .load()
            .iter()
            .find(|route| route.name == name)
            .cloned()
    }

    /// Route names in dispatch order.
    pub fn names(&self) -> Vec<String> {
        self.routes.load().iter().map(|route| route.name.clone()).collect()
    }

    /// Compile `template` and append it under `name`.
    pub fn add(
        &self,
        template: &str,
        name: &str,
        handler: HandlerRef,
    ) -> Result<(), RegistryError> {
        let route = Route::new(template, name, handler)?;
        self.add_prebuilt(route)
    }

    /// Append a route that was compiled elsewhere.
    pub fn add_prebuilt(&self, route: Route) -> Result<(), RegistryError> {
        let _guard = self.lock();
        let current = self.routes.load_full();

        if current.iter().any(|existing| existing.name == route.name) {
            tracing::warn!(route = %route.name, "Route name already registered");
            return Err(RegistryError::DuplicateName(route.name));
        }

        tracing::info!(
            route = %route.name,
            template = %route.template,
            position = current.len(),
            "Route registered"
        );

        let mut next = Vec::with_capacity(current.len() + 1);
        next.extend(current.iter().cloned());
        next.push(Arc::new(route));
        self.publish(next);
        Ok(())
    }

    /// Replace the route named `old_name` in place.
    ///
    /// The new route takes the old one's position. Renaming onto the name of a different
    /// existing route is rejected.
    pub fn replace(
        &self,
        old_name: &str,
        new_name: &str,
        template: &str,
        handler: HandlerRef,
    ) -> Result<(), RegistryError> {
        let route = Route::new(template, new_name, handler)?;

        let _guard = self.lock();
        let current = self.routes.load_full();

        let index = current
            .iter()
            .position(|existing| existing.name == old_name)
            .ok_or_else(|| RegistryError::NotFound(old_name.to_string()))?;

        let collides = current
            .iter()
            .enumerate()
            .any(|(i, existing)| i != index && existing.name == new_name);
        if collides {
            tracing::warn!(from = %old_name, to = %new_name, "Route rename collides with another route");
            return Err(RegistryError::DuplicateName(new_name.to_string()));
        }

        tracing::info!(
            from = %old_name,
            to = %new_name,
            template = %template,
            position = index,
            "Route replaced"
        );

        let mut next: Vec<Arc<Route>> = current.iter().cloned().collect();
        next[index] = Arc::new(route);
        self.publish(next);
        Ok(())
    }

    /// Remove the route named `name`, keeping the order of the others.
    pub fn remove(&self, name: &str) -> Result<Arc<Route>, RegistryError> {
        let _guard = self.lock();
        let current = self.routes.load_full();

        let index = current
            .iter()
            .position(|existing| existing.name == name)
            .ok_or_else(|| RegistryError::NotFound(name.to_string()))?;

        let mut next: Vec<Arc<Route>> = current.iter().cloned().collect();
        let removed = next.remove(index);
        self.publish(next);

        tracing::info!(route = %name, "Route removed");
        Ok(removed)
    }

    /// Swap the whole table in one step.
    pub fn replace_all(&self, routes: Vec<Route>) -> Result<(), RegistryError> {
        for (i, route) in routes.iter().enumerate() {
            if routes[..i].iter().any(|earlier| earlier.name == route.name) {
                return Err(RegistryError::DuplicateName(route.name.clone()));
            }
        }

        let _guard = self.lock();
        let count = routes.len();
        self.publish(routes.into_iter().map(Arc::new).collect());

        tracing::info!(routes = count, "Route table replaced");
        Ok(())
    }

    fn publish(&self, routes: Vec<Arc<Route>>) {
        metrics::record_registry_size(routes.len());
        self.routes.store(Arc::new(routes));
    }

    fn lock(&self) -> MutexGuard<'_, ()> {
        self.write_lock.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Default for RouteRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for RouteRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.routes.load().iter()).finish()
    }
}
