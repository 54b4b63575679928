//! A sorted multiset backed by a skiplist, where elements can be efficiently
//! inserted, looked up and removed, all in `O(log(n))` on average.
//!
//! Conceptually, the structure resembles something like:
//!
//! ```text
//! <head> ----------> [2] --------------------------------------------------->
//! <head> ----------> [2] ------------------------------------[7] ----------->
//! <head> ----------> [2] ----------> [4] ------------------> [7] ----------->
//! <head> --> [1] --> [2] --> [3] --> [4] --> [5] --> [6] --> [7] --> [8] --->
//! ```
//!
//! where the bottom level contains every element in sorted order and each
//! higher level contains a random subset of the level below it, allowing
//! searches to skip ahead. Each `[x]` links right to its successor on the
//! same level and down to its copy on the level below.
//!
//! Duplicate elements are fully supported: the list is a multiset, and each
//! successful [`insert`][SkipList::insert] adds one occurrence which a single
//! [`remove`][SkipList::remove] later takes out again. A new element is
//! always placed immediately before the first element that is not less than
//! it, on every level it occupies.
//!
//! The number of levels a new element spans is chosen by a
//! [`LevelGenerator`]; the default [`Geometric`] policy keeps redrawing a
//! uniform integer in `[0, 4)` and climbs one level for every zero drawn.
//! The generator is owned by the list and can be replaced (and seeded) via
//! [`SkipList::with_level_generator`], which makes tests deterministic.
//!
//! The structure is strictly single-threaded: there is no internal locking,
//! and an iterator borrows the list for its whole lifetime, so mutating the
//! list while iterating is rejected at compile time.
//!
//! ```
//! use multiskip::SkipList;
//!
//! let mut list: SkipList<i64> = (0..=5).collect();
//! list.extend(0..=3);
//! assert_eq!(list.remove(&2), Ok(2));
//! assert_eq!(list.remove(&3), Ok(3));
//!
//! assert!(list.iter().copied().eq([0, 0, 1, 1, 2, 3, 4, 5]));
//! ```

pub mod level_generator;
mod node;
mod skiplist;

pub use crate::level_generator::LevelGenerator;
pub use crate::level_generator::geometric::Geometric;
pub use crate::node::{IntoIter, Iter};
pub use crate::skiplist::{NotFoundError, SkipList};
