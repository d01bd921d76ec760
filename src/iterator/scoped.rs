//! Scoped ownership of an iterator
//!
//! Whatever an iterator cached while it was in use (buffer slices, tile
//! lookup tables, the borrow of its source) is released when the
//! [`ScopedIter`] goes away, either through an explicit [`ScopedIter::done`]
//! or by leaving scope on any exit path.

use std::ops::{Deref, DerefMut};

use log::trace;

/// An iterator handed out by the factory
pub struct ScopedIter<I: ?Sized> {
    inner: Box<I>,
    kind: &'static str,
}

impl<I: ?Sized> ScopedIter<I> {
    pub(crate) fn new(inner: Box<I>, kind: &'static str) -> Self {
        trace!("Acquired {} iterator", kind);
        ScopedIter { inner, kind }
    }

    /// Release the iterator and everything it cached
    pub fn done(self) {}

    /// Which family this iterator belongs to ("rect", "rook", ...)
    pub fn kind(&self) -> &'static str {
        self.kind
    }
}

impl<I: ?Sized> Deref for ScopedIter<I> {
    type Target = I;

    fn deref(&self) -> &I {
        &self.inner
    }
}

impl<I: ?Sized> DerefMut for ScopedIter<I> {
    fn deref_mut(&mut self) -> &mut I {
        &mut self.inner
    }
}

impl<I: ?Sized> Drop for ScopedIter<I> {
    fn drop(&mut self) {
        trace!("Released {} iterator", self.kind);
    }
}
