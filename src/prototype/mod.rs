//! Prototype cloning.
//!
//! Widgets live in a [`WidgetArena`] and reference each other by
//! [`WidgetId`]. Cloning a widget for another data source walks those
//! references through a [`CloneMap`], so a sub-widget shared by several
//! controls is cloned exactly once and the clones share it in turn.

use std::collections::HashMap;

use tracing::debug;

use crate::binding::Bindable;
use crate::core::{ArraySelector, RangeControl, SourceId, WidgetId};
use crate::error::{CloneError, Result};

/// Anything an arena can hold.
#[derive(Debug)]
pub enum Widget {
    /// Dual min/max control.
    Range(RangeControl),
    /// Value-source selector.
    Selector(ArraySelector),
}

impl Widget {
    /// Human-readable kind, used in error messages.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Range(_) => "range control",
            Self::Selector(_) => "array selector",
        }
    }
}

impl From<RangeControl> for Widget {
    fn from(control: RangeControl) -> Self {
        Self::Range(control)
    }
}

impl From<ArraySelector> for Widget {
    fn from(selector: ArraySelector) -> Self {
        Self::Selector(selector)
    }
}

/// Original-to-clone identity map for one cloning pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CloneMap {
    clones: HashMap<WidgetId, WidgetId>,
}

impl CloneMap {
    /// Creates an empty map.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Clone already made for `original`.
    #[must_use]
    pub fn get(&self, original: WidgetId) -> Option<WidgetId> {
        self.clones.get(&original).copied()
    }

    /// Records a clone.
    pub fn insert(&mut self, original: WidgetId, clone: WidgetId) {
        self.clones.insert(original, clone);
    }

    /// Number of recorded clones.
    #[must_use]
    pub fn len(&self) -> usize {
        self.clones.len()
    }

    /// Returns `true` if nothing was cloned yet.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.clones.is_empty()
    }
}

/// Owner of all widgets of an interface.
#[derive(Debug, Default)]
pub struct WidgetArena {
    widgets: Vec<Widget>,
}

impl WidgetArena {
    /// Creates an empty arena.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a widget and returns its id.
    ///
    /// Range controls get the script handle `pvMinMax<id>` so every
    /// instance is addressable on its own in a trace.
    pub fn insert(&mut self, widget: impl Into<Widget>) -> WidgetId {
        let id = WidgetId(self.widgets.len());
        let mut widget = widget.into();
        if let Widget::Range(control) = &mut widget {
            control.set_script_handle(&format!("pvMinMax{id}"));
        }
        self.widgets.push(widget);
        id
    }

    /// Number of widgets.
    #[must_use]
    pub fn len(&self) -> usize {
        self.widgets.len()
    }

    /// Returns `true` if the arena is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.widgets.is_empty()
    }

    /// Looks up a widget.
    ///
    /// # Errors
    ///
    /// Returns [`CloneError::UnknownWidget`] for an id not in this arena.
    pub fn get(&self, id: WidgetId) -> Result<&Widget> {
        self.widgets
            .get(id.0)
            .ok_or_else(|| CloneError::UnknownWidget { id: id.0 }.into())
    }

    /// Looks up a widget mutably.
    ///
    /// # Errors
    ///
    /// Returns [`CloneError::UnknownWidget`] for an id not in this arena.
    pub fn get_mut(&mut self, id: WidgetId) -> Result<&mut Widget> {
        self.widgets
            .get_mut(id.0)
            .ok_or_else(|| CloneError::UnknownWidget { id: id.0 }.into())
    }

    /// Looks up a range control.
    ///
    /// # Errors
    ///
    /// Returns [`CloneError::Downcast`] if the widget is of another kind.
    pub fn range_control(&self, id: WidgetId) -> Result<&RangeControl> {
        match self.get(id)? {
            Widget::Range(control) => Ok(control),
            other => Err(downcast("range control", other)),
        }
    }

    /// Looks up a range control mutably.
    ///
    /// # Errors
    ///
    /// Returns [`CloneError::Downcast`] if the widget is of another kind.
    pub fn range_control_mut(&mut self, id: WidgetId) -> Result<&mut RangeControl> {
        match self.get_mut(id)? {
            Widget::Range(control) => Ok(control),
            other => Err(downcast("range control", other)),
        }
    }

    /// Looks up a selector.
    ///
    /// # Errors
    ///
    /// Returns [`CloneError::Downcast`] if the widget is of another kind.
    pub fn selector(&self, id: WidgetId) -> Result<&ArraySelector> {
        match self.get(id)? {
            Widget::Selector(selector) => Ok(selector),
            other => Err(downcast("array selector", other)),
        }
    }

    /// Looks up a selector mutably.
    ///
    /// # Errors
    ///
    /// Returns [`CloneError::Downcast`] if the widget is of another kind.
    pub fn selector_mut(&mut self, id: WidgetId) -> Result<&mut ArraySelector> {
        match self.get_mut(id)? {
            Widget::Selector(selector) => Ok(selector),
            other => Err(downcast("array selector", other)),
        }
    }

    /// Makes `control` depend on `selector`.
    ///
    /// # Errors
    ///
    /// Returns an error if either id is unknown or of the wrong kind.
    pub fn attach_selector(&mut self, control: WidgetId, selector: WidgetId) -> Result<()> {
        self.selector_mut(selector)?.add_dependent(control);
        self.range_control_mut(control)?
            .set_array_selector(Some(selector));
        Ok(())
    }

    /// Enables or disables a widget; a range control carries its selector
    /// along.
    ///
    /// # Errors
    ///
    /// Returns an error if the id, or the referenced selector, is unknown.
    pub fn set_enabled(&mut self, id: WidgetId, enabled: bool) -> Result<()> {
        let selector = match self.get_mut(id)? {
            Widget::Range(control) => {
                control.set_enabled(enabled);
                control.array_selector()
            }
            Widget::Selector(selector) => {
                selector.set_enabled(enabled);
                None
            }
        };
        if let Some(selector) = selector {
            self.selector_mut(selector)?.set_enabled(enabled);
        }
        Ok(())
    }

    /// Clones a widget for `target`, reusing clones recorded in `map`.
    ///
    /// Sub-widgets referenced by the clone are cloned through the same map
    /// and the clone registers itself with them.
    ///
    /// # Errors
    ///
    /// Returns an error if `id` or a referenced widget is unknown.
    pub fn clone_prototype(
        &mut self,
        id: WidgetId,
        target: SourceId,
        map: &mut CloneMap,
    ) -> Result<WidgetId> {
        if let Some(existing) = map.get(id) {
            debug!(original = %id, clone = %existing, "reusing clone");
            return Ok(existing);
        }

        let (copy, selector) = match self.get(id)? {
            Widget::Range(control) => (
                Widget::Range(control.clone_prototype(target)),
                control.array_selector(),
            ),
            Widget::Selector(selector) => {
                (Widget::Selector(selector.clone_prototype(target)), None)
            }
        };
        let clone = self.insert(copy);
        map.insert(id, clone);
        debug!(original = %id, clone = %clone, source = %target, "cloned widget");

        if let Some(selector) = selector {
            let selector_clone = self.clone_prototype(selector, target, map)?;
            self.attach_selector(clone, selector_clone)?;
        }

        Ok(clone)
    }

    /// Clones a range control, checking the clone's kind.
    ///
    /// # Errors
    ///
    /// Returns [`CloneError::Downcast`] if the clone is not a range control.
    pub fn clone_range_control(
        &mut self,
        id: WidgetId,
        target: SourceId,
        map: &mut CloneMap,
    ) -> Result<WidgetId> {
        let clone = self.clone_prototype(id, target, map)?;
        self.range_control(clone)?;
        Ok(clone)
    }
}

fn downcast(expected: &'static str, found: &Widget) -> crate::error::Error {
    CloneError::Downcast {
        expected,
        found: found.kind(),
    }
    .into()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;

    fn shared_selector_arena() -> (WidgetArena, WidgetId, WidgetId, WidgetId) {
        let mut arena = WidgetArena::new();
        let selector = arena.insert(ArraySelector::new("Scalars", "Input"));

        let mut low = RangeControl::with_property("ClipRange");
        low.set_minimum_label("Minimum");
        low.set_range(0.0, 10.0);
        low.set_max_value(4.0);
        let low = arena.insert(low);

        let high = arena.insert(RangeControl::with_property("ThresholdRange"));
        arena.attach_selector(low, selector).unwrap();
        arena.attach_selector(high, selector).unwrap();
        (arena, selector, low, high)
    }

    #[test]
    fn test_insert_assigns_script_handles() {
        let (arena, _, low, high) = shared_selector_arena();
        assert_eq!(arena.range_control(low).unwrap().script_handle(), "pvMinMax1");
        assert_eq!(arena.range_control(high).unwrap().script_handle(), "pvMinMax2");
    }

    #[test]
    fn test_shared_selector_cloned_once() {
        let (mut arena, selector, low, high) = shared_selector_arena();
        let mut map = CloneMap::new();
        let target = SourceId(9);

        let low_clone = arena.clone_range_control(low, target, &mut map).unwrap();
        let high_clone = arena.clone_range_control(high, target, &mut map).unwrap();

        assert_eq!(arena.len(), 6);
        assert_eq!(map.len(), 3);

        let selector_clone = map.get(selector).unwrap();
        assert_ne!(selector_clone, selector);
        assert_eq!(
            arena.range_control(low_clone).unwrap().array_selector(),
            Some(selector_clone)
        );
        assert_eq!(
            arena.range_control(high_clone).unwrap().array_selector(),
            Some(selector_clone)
        );
        assert_eq!(
            arena.selector(selector_clone).unwrap().dependents(),
            &[low_clone, high_clone]
        );
        assert_eq!(arena.selector(selector).unwrap().dependents(), &[low, high]);
        assert_eq!(arena.selector(selector_clone).unwrap().source(), Some(target));
    }

    #[test]
    fn test_clone_copies_configuration() {
        let (mut arena, _, low, _) = shared_selector_arena();
        let clone = arena
            .clone_range_control(low, SourceId(3), &mut CloneMap::new())
            .unwrap();

        let original = arena.range_control(low).unwrap();
        let copy = arena.range_control(clone).unwrap();
        assert_eq!(copy.minimum_label(), original.minimum_label());
        assert_eq!(copy.range(), original.range());
        assert_eq!(copy.values(), original.values());
        assert_eq!(copy.set_command(), original.set_command());
        assert_eq!(copy.source(), Some(SourceId(3)));
        assert_ne!(copy.script_handle(), original.script_handle());
    }

    #[test]
    fn test_clone_twice_with_same_map_reuses() {
        let (mut arena, _, low, _) = shared_selector_arena();
        let mut map = CloneMap::new();
        let first = arena.clone_prototype(low, SourceId(1), &mut map).unwrap();
        let second = arena.clone_prototype(low, SourceId(1), &mut map).unwrap();
        assert_eq!(first, second);
        assert_eq!(arena.len(), 5);
    }

    #[test]
    fn test_clone_range_control_downcast_failure() {
        let (mut arena, selector, _, _) = shared_selector_arena();
        let err = arena
            .clone_range_control(selector, SourceId(1), &mut CloneMap::new())
            .unwrap_err();
        assert!(matches!(
            err,
            Error::Clone(CloneError::Downcast {
                expected: "range control",
                found: "array selector",
            })
        ));
    }

    #[test]
    fn test_unknown_widget() {
        let arena = WidgetArena::new();
        assert!(matches!(
            arena.get(WidgetId(7)),
            Err(Error::Clone(CloneError::UnknownWidget { id: 7 }))
        ));
    }

    #[test]
    fn test_set_enabled_reaches_selector() {
        let (mut arena, selector, low, _) = shared_selector_arena();
        arena.set_enabled(low, false).unwrap();
        assert!(!arena.range_control(low).unwrap().is_enabled());
        assert!(!arena.selector(selector).unwrap().is_enabled());
    }
}
