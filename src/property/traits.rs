//! Remote property interfaces.
//!
//! Defines what the synchronization core consumes from the proxy layer: a
//! registry that resolves properties by name, and the numeric vector
//! property it hands back. Transport concerns (processes, latency, retries)
//! stay behind these traits.

use crate::core::DomainRange;
use crate::error::Result;

/// Numeric vector property living on the server side.
pub trait VectorProperty {
    /// Property name.
    fn name(&self) -> &str;

    /// Number of elements currently stored.
    fn len(&self) -> usize;

    /// Returns `true` if the vector has no elements.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Replaces all elements.
    ///
    /// # Errors
    ///
    /// Returns an error if the transport fails to push the values.
    fn set_elements(&mut self, values: &[f64]) -> Result<()>;

    /// Reads one element.
    ///
    /// # Errors
    ///
    /// Returns [`crate::error::PropertyError::ElementOutOfRange`] if `index`
    /// is past the end.
    fn element(&self, index: usize) -> Result<f64>;

    /// Range domain attached to the property, if any.
    fn domain(&self) -> Option<DomainRange>;
}

impl<T: VectorProperty + ?Sized> VectorProperty for &mut T {
    fn name(&self) -> &str {
        (**self).name()
    }

    fn len(&self) -> usize {
        (**self).len()
    }

    fn set_elements(&mut self, values: &[f64]) -> Result<()> {
        (**self).set_elements(values)
    }

    fn element(&self, index: usize) -> Result<f64> {
        (**self).element(index)
    }

    fn domain(&self) -> Option<DomainRange> {
        (**self).domain()
    }
}

/// Registry resolving property names to live properties.
pub trait PropertyRegistry {
    /// Looks up a property by name.
    ///
    /// Returns `Ok(None)` when the name is unknown; `Err` is reserved for
    /// transport failures.
    ///
    /// # Errors
    ///
    /// Returns an error if the backing store cannot be queried.
    fn resolve<'r>(&'r mut self, name: &str) -> Result<Option<Box<dyn VectorProperty + 'r>>>;

    /// Returns `true` if the name resolves.
    ///
    /// # Errors
    ///
    /// Returns an error if the backing store cannot be queried.
    fn contains(&mut self, name: &str) -> Result<bool> {
        Ok(self.resolve(name)?.is_some())
    }
}
