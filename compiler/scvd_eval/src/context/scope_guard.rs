//! RAII guard for the active container.
//!
//! The guard swaps the container in on creation and restores the previous
//! one on drop, so an early return, an error or a dropped future all leave
//! the context as they found it.

use std::ops::{Deref, DerefMut};

use super::EvalContext;
use crate::ContainerRef;

/// Access the context through this guard; it implements `Deref`/`DerefMut`.
pub struct ScopedContainer<'guard, H> {
    context: &'guard mut EvalContext<H>,
    saved: Option<ContainerRef>,
}

impl<H> Drop for ScopedContainer<'_, H> {
    fn drop(&mut self) {
        self.context.container = self.saved;
    }
}

impl<H> Deref for ScopedContainer<'_, H> {
    type Target = EvalContext<H>;

    fn deref(&self) -> &Self::Target {
        self.context
    }
}

impl<H> DerefMut for ScopedContainer<'_, H> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        self.context
    }
}

impl<H> EvalContext<H> {
    /// Make `container` active until the returned guard is dropped.
    pub fn scoped(&mut self, container: Option<ContainerRef>) -> ScopedContainer<'_, H> {
        let saved = std::mem::replace(&mut self.container, container);
        ScopedContainer {
            context: self,
            saved,
        }
    }
}
