//! Iterator factory
//!
//! Resolves the window, picks constructors for the source's sample layout
//! and wraps the result in a [`ScopedIter`]. A single [`Raster`] is accepted
//! anywhere a tiled source is, since it implements the tiled interface as a
//! one-tile image.
//!
//! [`Raster`]: crate::raster::Raster

use lazy_static::lazy_static;
use log::debug;

use crate::errors::{invalid, TileResult};
use crate::iterator::registry::{IterConstructors, IterRegistry};
use crate::iterator::scoped::ScopedIter;
use crate::iterator::{RandomIter, RectIter, RookIter, WritableRandomIter, WritableRectIter, WritableRookIter};
use crate::raster::{Region, TiledSource, TiledSourceMut};

lazy_static! {
    static ref DEFAULT_FACTORY: IteratorFactory = IteratorFactory::default();
}

/// The factory backed by the default registry
pub fn default_factory() -> &'static IteratorFactory {
    &DEFAULT_FACTORY
}

/// Clip a requested window to the source bounds
///
/// No window means the whole source. An empty result is an error.
pub fn resolve_window(bounds: Region, window: Option<Region>) -> TileResult<Region> {
    let resolved = match window {
        Some(window) => window.intersection(&bounds),
        None => bounds,
    };
    if resolved.is_empty() {
        return invalid(format!(
            "iteration window {:?} does not overlap the source bounds {:?}",
            window.unwrap_or(bounds),
            bounds
        ));
    }
    Ok(resolved)
}

/// Creates iterators through an [`IterRegistry`]
#[derive(Clone, Default)]
pub struct IteratorFactory {
    registry: IterRegistry,
}

impl IteratorFactory {
    pub fn new(registry: IterRegistry) -> Self {
        IteratorFactory { registry }
    }

    pub fn registry(&self) -> &IterRegistry {
        &self.registry
    }

    pub fn registry_mut(&mut self) -> &mut IterRegistry {
        &mut self.registry
    }

    fn select<S: TiledSource + ?Sized>(&self, source: &S, window: Option<Region>) -> TileResult<(IterConstructors, Region)> {
        let window = resolve_window(source.bounds(), window)?;
        let layout = source.sample_layout();
        let constructors = *self.registry.lookup(layout.kind(), layout.data_type());
        debug!(
            "Using {} iterators for {} {} layout over {:?}",
            constructors.name,
            layout.kind(),
            layout.data_type(),
            window
        );
        Ok((constructors, window))
    }

    /// Sequential read-only iterator
    pub fn rect<'a>(
        &self,
        source: &'a dyn TiledSource,
        window: Option<Region>,
    ) -> TileResult<ScopedIter<dyn RectIter + 'a>> {
        let (constructors, window) = self.select(source, window)?;
        Ok(ScopedIter::new((constructors.rect)(source, window)?, "rect"))
    }

    /// Sequential read/write iterator
    pub fn rect_writable<'a>(
        &self,
        source: &'a mut dyn TiledSourceMut,
        window: Option<Region>,
    ) -> TileResult<ScopedIter<dyn WritableRectIter + 'a>> {
        let (constructors, window) = self.select(&*source, window)?;
        Ok(ScopedIter::new((constructors.rect_writable)(source, window)?, "writable rect"))
    }

    /// Bidirectional read-only iterator
    pub fn rook<'a>(
        &self,
        source: &'a dyn TiledSource,
        window: Option<Region>,
    ) -> TileResult<ScopedIter<dyn RookIter + 'a>> {
        let (constructors, window) = self.select(source, window)?;
        Ok(ScopedIter::new((constructors.rook)(source, window)?, "rook"))
    }

    /// Bidirectional read/write iterator
    pub fn rook_writable<'a>(
        &self,
        source: &'a mut dyn TiledSourceMut,
        window: Option<Region>,
    ) -> TileResult<ScopedIter<dyn WritableRookIter + 'a>> {
        let (constructors, window) = self.select(&*source, window)?;
        Ok(ScopedIter::new((constructors.rook_writable)(source, window)?, "writable rook"))
    }

    /// Random-access read-only iterator
    pub fn random<'a>(
        &self,
        source: &'a dyn TiledSource,
        window: Option<Region>,
    ) -> TileResult<ScopedIter<dyn RandomIter + 'a>> {
        let (constructors, window) = self.select(source, window)?;
        Ok(ScopedIter::new((constructors.random)(source, window)?, "random"))
    }

    /// Random-access read/write iterator
    pub fn random_writable<'a>(
        &self,
        source: &'a mut dyn TiledSourceMut,
        window: Option<Region>,
    ) -> TileResult<ScopedIter<dyn WritableRandomIter + 'a>> {
        let (constructors, window) = self.select(&*source, window)?;
        Ok(ScopedIter::new((constructors.random_writable)(source, window)?, "writable random"))
    }
}

pub fn rect_iter<'a>(source: &'a dyn TiledSource, window: Option<Region>) -> TileResult<ScopedIter<dyn RectIter + 'a>> {
    default_factory().rect(source, window)
}

pub fn writable_rect_iter<'a>(
    source: &'a mut dyn TiledSourceMut,
    window: Option<Region>,
) -> TileResult<ScopedIter<dyn WritableRectIter + 'a>> {
    default_factory().rect_writable(source, window)
}

pub fn rook_iter<'a>(source: &'a dyn TiledSource, window: Option<Region>) -> TileResult<ScopedIter<dyn RookIter + 'a>> {
    default_factory().rook(source, window)
}

pub fn writable_rook_iter<'a>(
    source: &'a mut dyn TiledSourceMut,
    window: Option<Region>,
) -> TileResult<ScopedIter<dyn WritableRookIter + 'a>> {
    default_factory().rook_writable(source, window)
}

pub fn random_iter<'a>(source: &'a dyn TiledSource, window: Option<Region>) -> TileResult<ScopedIter<dyn RandomIter + 'a>> {
    default_factory().random(source, window)
}

pub fn writable_random_iter<'a>(
    source: &'a mut dyn TiledSourceMut,
    window: Option<Region>,
) -> TileResult<ScopedIter<dyn WritableRandomIter + 'a>> {
    default_factory().random_writable(source, window)
}
