//! Dispatch from a sample layout to an iterator implementation
//!
//! Each (layout kind, element type) pair may have a set of specialized
//! constructors. Anything without one is served by the fallback set, which
//! is correct for every layout. Adding a specialization is one more
//! [`IterRegistry::register`] call; it must produce the same samples, in the
//! same order, as the fallback.

use std::collections::HashMap;

use log::info;

use crate::errors::TileResult;
use crate::iterator::component::{ComponentElement, RectIterCsm, WritableRectIterCsm};
use crate::iterator::fallback::{RectIterFallback, WritableRectIterFallback};
use crate::iterator::random::{RandomIterCsm, RandomIterFallback, WritableRandomIterCsm, WritableRandomIterFallback};
use crate::iterator::{RandomIter, RectIter, RookIter, WritableRandomIter, WritableRectIter, WritableRookIter};
use crate::raster::{DataType, LayoutKind, Region, TiledSource, TiledSourceMut};

pub type RectCtor = for<'a> fn(&'a dyn TiledSource, Region) -> TileResult<Box<dyn RectIter + 'a>>;
pub type WritableRectCtor = for<'a> fn(&'a mut dyn TiledSourceMut, Region) -> TileResult<Box<dyn WritableRectIter + 'a>>;
pub type RookCtor = for<'a> fn(&'a dyn TiledSource, Region) -> TileResult<Box<dyn RookIter + 'a>>;
pub type WritableRookCtor = for<'a> fn(&'a mut dyn TiledSourceMut, Region) -> TileResult<Box<dyn WritableRookIter + 'a>>;
pub type RandomCtor = for<'a> fn(&'a dyn TiledSource, Region) -> TileResult<Box<dyn RandomIter + 'a>>;
pub type WritableRandomCtor =
    for<'a> fn(&'a mut dyn TiledSourceMut, Region) -> TileResult<Box<dyn WritableRandomIter + 'a>>;

/// One constructor per iterator family
///
/// Constructors receive a non-empty window inside the source bounds.
#[derive(Clone, Copy)]
pub struct IterConstructors {
    pub name: &'static str,
    pub rect: RectCtor,
    pub rect_writable: WritableRectCtor,
    pub rook: RookCtor,
    pub rook_writable: WritableRookCtor,
    pub random: RandomCtor,
    pub random_writable: WritableRandomCtor,
}

fn rect_fallback<'a>(source: &'a dyn TiledSource, window: Region) -> TileResult<Box<dyn RectIter + 'a>> {
    Ok(Box::new(RectIterFallback::new(source, window)))
}

fn rect_writable_fallback<'a>(
    source: &'a mut dyn TiledSourceMut,
    window: Region,
) -> TileResult<Box<dyn WritableRectIter + 'a>> {
    Ok(Box::new(WritableRectIterFallback::new(source, window)))
}

fn rook_fallback<'a>(source: &'a dyn TiledSource, window: Region) -> TileResult<Box<dyn RookIter + 'a>> {
    Ok(Box::new(RectIterFallback::new(source, window)))
}

fn rook_writable_fallback<'a>(
    source: &'a mut dyn TiledSourceMut,
    window: Region,
) -> TileResult<Box<dyn WritableRookIter + 'a>> {
    Ok(Box::new(WritableRectIterFallback::new(source, window)))
}

fn random_fallback<'a>(source: &'a dyn TiledSource, window: Region) -> TileResult<Box<dyn RandomIter + 'a>> {
    Ok(Box::new(RandomIterFallback::new(source, window)))
}

fn random_writable_fallback<'a>(
    source: &'a mut dyn TiledSourceMut,
    window: Region,
) -> TileResult<Box<dyn WritableRandomIter + 'a>> {
    Ok(Box::new(WritableRandomIterFallback::new(source, window)))
}

fn rect_component<'a, T: ComponentElement>(
    source: &'a dyn TiledSource,
    window: Region,
) -> TileResult<Box<dyn RectIter + 'a>> {
    Ok(Box::new(RectIterCsm::<_, T>::new(source, window)?))
}

fn rect_writable_component<'a, T: ComponentElement>(
    source: &'a mut dyn TiledSourceMut,
    window: Region,
) -> TileResult<Box<dyn WritableRectIter + 'a>> {
    Ok(Box::new(WritableRectIterCsm::<T>::new(source, window)?))
}

fn rook_component<'a, T: ComponentElement>(
    source: &'a dyn TiledSource,
    window: Region,
) -> TileResult<Box<dyn RookIter + 'a>> {
    Ok(Box::new(RectIterCsm::<_, T>::new(source, window)?))
}

fn rook_writable_component<'a, T: ComponentElement>(
    source: &'a mut dyn TiledSourceMut,
    window: Region,
) -> TileResult<Box<dyn WritableRookIter + 'a>> {
    Ok(Box::new(WritableRectIterCsm::<T>::new(source, window)?))
}

fn random_component<'a, T: ComponentElement>(
    source: &'a dyn TiledSource,
    window: Region,
) -> TileResult<Box<dyn RandomIter + 'a>> {
    Ok(Box::new(RandomIterCsm::<T>::new(source, window)?))
}

fn random_writable_component<'a, T: ComponentElement>(
    source: &'a mut dyn TiledSourceMut,
    window: Region,
) -> TileResult<Box<dyn WritableRandomIter + 'a>> {
    Ok(Box::new(WritableRandomIterCsm::<T>::new(source, window)?))
}

impl IterConstructors {
    /// Layout-independent implementations
    pub fn fallback() -> Self {
        IterConstructors {
            name: "fallback",
            rect: rect_fallback,
            rect_writable: rect_writable_fallback,
            rook: rook_fallback,
            rook_writable: rook_writable_fallback,
            random: random_fallback,
            random_writable: random_writable_fallback,
        }
    }

    /// Implementations for component layouts holding `T` elements
    pub fn component<T: ComponentElement>() -> Self {
        IterConstructors {
            name: "component",
            rect: rect_component::<T>,
            rect_writable: rect_writable_component::<T>,
            rook: rook_component::<T>,
            rook_writable: rook_writable_component::<T>,
            random: random_component::<T>,
            random_writable: random_writable_component::<T>,
        }
    }
}

/// Specialized iterator constructors keyed by layout kind and element type
#[derive(Clone)]
pub struct IterRegistry {
    specialized: HashMap<(LayoutKind, DataType), IterConstructors>,
    fallback: IterConstructors,
}

impl IterRegistry {
    /// A registry where everything goes to the fallback
    pub fn new() -> Self {
        IterRegistry {
            specialized: HashMap::new(),
            fallback: IterConstructors::fallback(),
        }
    }

    /// Component layouts of bytes and floats specialized, everything else fallback
    pub fn with_defaults() -> Self {
        let mut registry = IterRegistry::new();
        registry.register(LayoutKind::Component, DataType::Byte, IterConstructors::component::<u8>());
        registry.register(LayoutKind::Component, DataType::Float, IterConstructors::component::<f32>());
        registry
    }

    /// Register constructors for a layout kind and element type, returning the ones replaced
    pub fn register(
        &mut self,
        kind: LayoutKind,
        data_type: DataType,
        constructors: IterConstructors,
    ) -> Option<IterConstructors> {
        info!("Registering {} iterators for {} {} layouts", constructors.name, kind, data_type);
        self.specialized.insert((kind, data_type), constructors)
    }

    pub fn unregister(&mut self, kind: LayoutKind, data_type: DataType) -> Option<IterConstructors> {
        self.specialized.remove(&(kind, data_type))
    }

    pub fn is_specialized(&self, kind: LayoutKind, data_type: DataType) -> bool {
        self.specialized.contains_key(&(kind, data_type))
    }

    /// Constructors for a layout, falling back when nothing is registered
    pub fn lookup(&self, kind: LayoutKind, data_type: DataType) -> &IterConstructors {
        self.specialized.get(&(kind, data_type)).unwrap_or(&self.fallback)
    }
}

impl Default for IterRegistry {
    fn default() -> Self {
        IterRegistry::with_defaults()
    }
}
