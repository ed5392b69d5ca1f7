//! Mount scope - ties bindings and timers to a widget's lifetime
//!
//! Everything a widget creates while mounting is registered with its
//! [`MountScope`]. Unmounting disposes the registered items in reverse order
//! before returning, so no subscription or pending timer outlives the widget.

use std::fmt;

/// Something that holds a subscription or a timer and can be released
pub trait Disposable {
    /// Release held resources; calling twice is a no-op
    fn dispose(&self);

    fn is_disposed(&self) -> bool;
}

/// Owner of everything created during a widget's mount
#[derive(Default)]
pub struct MountScope {
    label: String,
    items: Vec<Box<dyn Disposable>>,
    unmounted: bool,
}

impl MountScope {
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            items: Vec::new(),
            unmounted: false,
        }
    }

    /// Register `item` and hand it back
    ///
    /// Registering on an already unmounted scope disposes the item at once.
    pub fn adopt<D>(&mut self, item: D) -> D
    where
        D: Disposable + Clone + 'static,
    {
        if self.unmounted {
            item.dispose();
        } else {
            self.items.push(Box::new(item.clone()));
        }
        item
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn is_unmounted(&self) -> bool {
        self.unmounted
    }

    /// Dispose every registered item, newest first
    pub fn unmount(&mut self) {
        if self.unmounted {
            return;
        }
        self.unmounted = true;
        tracing::debug!(scope = %self.label, items = self.items.len(), "unmounting");
        while let Some(item) = self.items.pop() {
            item.dispose();
        }
    }
}

impl Drop for MountScope {
    fn drop(&mut self) {
        self.unmount();
    }
}

impl fmt::Debug for MountScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MountScope")
            .field("label", &self.label)
            .field("items", &self.items.len())
            .field("unmounted", &self.unmounted)
            .finish()
    }
}
