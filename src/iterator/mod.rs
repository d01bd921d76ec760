//! Pixel iterators over rasters and tiled images
//!
//! Three traversal disciplines, each read-only or read/write:
//!
//! - rect: forward, lines top to bottom and pixels left to right
//! - rook: rect plus backward steps and seeks to the far edges
//! - random: any (x, y, band) inside the window, in any order
//!
//! Iterators come from an [`IteratorFactory`], which picks an implementation
//! specialized for the source's sample layout when one is registered and the
//! layout-independent fallback otherwise.
//!
//! ```no_run
//! use tilekit::iterator::{rect_iter, RectTraversal, SampleRead};
//! use tilekit::raster::{DataType, Raster, Region};
//!
//! let raster = Raster::interleaved(DataType::Byte, Region::new(0, 0, 16, 16), 3).unwrap();
//! let mut iter = rect_iter(&raster, None).unwrap();
//! let mut sum = 0i64;
//! iter.start_lines();
//! while !iter.finished_lines() {
//!     iter.start_pixels();
//!     while !iter.finished_pixels() {
//!         sum += iter.get_sample_at(0) as i64;
//!         iter.next_pixel();
//!     }
//!     iter.next_line();
//! }
//! iter.done();
//! ```

mod walker;
mod component;
mod factory;
mod fallback;
mod random;
mod registry;
mod scoped;
mod traits;
#[cfg(test)]
mod tests;

pub use component::{ComponentElement, RectIterCsm, WritableRectIterCsm};
pub use factory::{
    default_factory, random_iter, rect_iter, resolve_window, rook_iter, writable_random_iter, writable_rect_iter,
    writable_rook_iter, IteratorFactory,
};
pub use fallback::{RectIterFallback, WritableRectIterFallback};
pub use random::{RandomIterCsm, RandomIterFallback, WritableRandomIterCsm, WritableRandomIterFallback};
pub use registry::{
    IterConstructors, IterRegistry, RandomCtor, RectCtor, RookCtor, WritableRandomCtor, WritableRectCtor,
    WritableRookCtor,
};
pub use scoped::ScopedIter;
pub use traits::{
    RandomIter, RectIter, RectTraversal, ReverseTraversal, RookIter, SampleRead, SampleWrite, WritableRandomIter,
    WritableRectIter, WritableRookIter,
};
