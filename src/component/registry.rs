//! In-process registry of component classes.

use super::ComponentFactory;
use crate::error::{Error, Result};
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::Arc;
use uuid::Uuid;

/// A registered component class.
#[derive(Clone)]
pub struct Registration {
    /// Human-readable name.
    pub name: String,
    /// Category the class is listed under.
    pub category: Uuid,
    /// Instance factory.
    pub factory: Arc<dyn ComponentFactory>,
}

impl std::fmt::Debug for Registration {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Registration")
            .field("name", &self.name)
            .field("category", &self.category)
            .finish_non_exhaustive()
    }
}

/// Maps component class ids to their factories.
pub struct ComponentRegistry {
    classes: RwLock<HashMap<Uuid, Registration>>,
}

impl ComponentRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self {
            classes: RwLock::new(HashMap::new()),
        }
    }

    /// Register a class, replacing any previous registration of the same id.
    pub fn register(
        &self,
        class_id: Uuid,
        name: impl Into<String>,
        category: Uuid,
        factory: impl ComponentFactory + 'static,
    ) {
        let name = name.into();
        tracing::debug!(%class_id, %name, "registering component class");
        self.classes.write().insert(
            class_id,
            Registration {
                name,
                category,
                factory: Arc::new(factory),
            },
        );
    }

    /// Remove a class. Returns true if it was registered.
    pub fn unregister(&self, class_id: &Uuid) -> bool {
        self.classes.write().remove(class_id).is_some()
    }

    /// Whether a class is registered.
    pub fn contains(&self, class_id: &Uuid) -> bool {
        self.classes.read().contains_key(class_id)
    }

    /// Find a class registered under `category`.
    pub fn lookup(&self, class_id: &Uuid, category: &Uuid) -> Result<Registration> {
        let classes = self.classes.read();
        let registration = classes
            .get(class_id)
            .ok_or_else(|| Error::init(format!("component class {class_id} is not registered")))?;
        if registration.category != *category {
            return Err(Error::init(format!(
                "component class {class_id} is not registered under category {category}"
            )));
        }
        Ok(registration.clone())
    }

    /// Class ids registered under `category`.
    pub fn list(&self, category: &Uuid) -> Vec<Uuid> {
        let classes = self.classes.read();
        classes
            .iter()
            .filter(|(_, r)| r.category == *category)
            .map(|(id, _)| *id)
            .collect()
    }
}

impl Default for ComponentRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for ComponentRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ComponentRegistry")
            .field("classes", &self.classes.read().len())
            .finish()
    }
}
