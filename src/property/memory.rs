//! In-memory property registry.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::core::DomainRange;
use crate::error::{PropertyError, Result};
use crate::property::traits::{PropertyRegistry, VectorProperty};

/// Property held entirely in memory.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MemoryProperty {
    name: String,
    elements: Vec<f64>,
    domain: Option<DomainRange>,
    push_count: usize,
}

impl MemoryProperty {
    /// Creates a property with initial elements.
    #[must_use]
    pub fn new(name: &str, elements: Vec<f64>) -> Self {
        Self {
            name: name.to_string(),
            elements,
            domain: None,
            push_count: 0,
        }
    }

    /// Attaches a range domain.
    #[must_use]
    pub const fn with_domain(mut self, domain: DomainRange) -> Self {
        self.domain = Some(domain);
        self
    }

    /// Current elements.
    #[must_use]
    pub fn elements(&self) -> &[f64] {
        &self.elements
    }

    /// Number of successful `set_elements` calls.
    #[must_use]
    pub const fn push_count(&self) -> usize {
        self.push_count
    }

    /// Replaces the domain, as a data refresh would.
    pub const fn set_domain(&mut self, domain: Option<DomainRange>) {
        self.domain = domain;
    }
}

impl VectorProperty for MemoryProperty {
    fn name(&self) -> &str {
        &self.name
    }

    fn len(&self) -> usize {
        self.elements.len()
    }

    fn set_elements(&mut self, values: &[f64]) -> Result<()> {
        values.clone_into(&mut self.elements);
        self.push_count += 1;
        Ok(())
    }

    fn element(&self, index: usize) -> Result<f64> {
        self.elements.get(index).copied().ok_or_else(|| {
            PropertyError::ElementOutOfRange {
                name: self.name.clone(),
                index,
            }
            .into()
        })
    }

    fn domain(&self) -> Option<DomainRange> {
        self.domain
    }
}

/// Registry backed by a hash map.
///
/// # Examples
///
/// ```
/// use rangebind::property::{MemoryProperty, MemoryRegistry, PropertyRegistry};
///
/// let mut registry = MemoryRegistry::new();
/// registry.insert(MemoryProperty::new("ClipRange", vec![0.0, 1.0]));
/// assert!(registry.contains("ClipRange").unwrap());
/// ```
#[derive(Debug, Clone, Default)]
pub struct MemoryRegistry {
    properties: HashMap<String, MemoryProperty>,
}

impl MemoryRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds or replaces a property.
    pub fn insert(&mut self, property: MemoryProperty) {
        self.properties.insert(property.name.clone(), property);
    }

    /// Removes a property, simulating a proxy going away.
    pub fn remove(&mut self, name: &str) -> Option<MemoryProperty> {
        self.properties.remove(name)
    }

    /// Direct access for inspection.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&MemoryProperty> {
        self.properties.get(name)
    }

    /// Direct mutable access.
    pub fn get_mut(&mut self, name: &str) -> Option<&mut MemoryProperty> {
        self.properties.get_mut(name)
    }

    /// Number of properties.
    #[must_use]
    pub fn len(&self) -> usize {
        self.properties.len()
    }

    /// Returns `true` if the registry is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.properties.is_empty()
    }
}

impl PropertyRegistry for MemoryRegistry {
    fn resolve<'r>(&'r mut self, name: &str) -> Result<Option<Box<dyn VectorProperty + 'r>>> {
        Ok(self
            .properties
            .get_mut(name)
            .map(|p| Box::new(p) as Box<dyn VectorProperty + 'r>))
    }
}
