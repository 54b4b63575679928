//! A sorted multiset backed by a skiplist.

use std::{cmp, cmp::Ordering, default, fmt, hash, hash::Hash, iter};

use thiserror::Error;

use crate::{
    level_generator::{
        LevelGenerator,
        geometric::{DEFAULT_BRANCHING, Geometric},
    },
    node::{Arena, IntoIter, Iter, Node, NodeId},
};

// ////////////////////////////////////////////////////////////////////////////
// SkipList
// ////////////////////////////////////////////////////////////////////////////

/// The error returned by [`SkipList::remove`] when no occurrence of the
/// requested value is present.
///
/// A failed removal is an ordinary, recoverable condition: the list is left
/// untouched and the caller decides what to do. It is never silently turned
/// into a no-op.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
#[error("no such value")]
pub struct NotFoundError;

/// A sorted container which may hold duplicate elements, providing efficient
/// insertion, membership lookup and removal.
///
/// Elements are kept in non-decreasing order of their [`Ord`] relation at
/// all times. The list is a multiset: inserting a value twice stores two
/// occurrences, and each [`remove`][SkipList::remove] takes out exactly one.
/// A new element is placed immediately before the first element that is not
/// less than it — among equal elements, the newest occurrence comes first.
///
/// Every element occupies level 0; the number of additional levels it spans
/// is drawn from the list's [`LevelGenerator`]. The head of the list is a
/// vertical chain of valueless sentinel nodes, one per level, which grows as
/// taller elements arrive and shrinks again when removals leave the upper
/// levels empty.
pub struct SkipList<T> {
    // Node storage; every node of every level lives here.
    arena: Arena<T>,
    // The topmost sentinel head; sentinels chain via `down` to level 0.
    head: NodeId,
    len: usize,
    level_generator: Box<dyn LevelGenerator>,
}

// ///////////////////////////////////////////////
// Inherent methods
// ///////////////////////////////////////////////

impl<T> SkipList<T> {
    /// Create a new skiplist using the default level generator (16 levels
    /// with a branching factor of 4).
    ///
    /// # Examples
    ///
    /// ```
    /// use multiskip::SkipList;
    ///
    /// let mut list: SkipList<i64> = SkipList::new();
    /// ```
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::with_level_generator(Geometric::default())
    }

    /// Constructs a new, empty skiplist with the optimal number of levels
    /// for the intended capacity. Specifically, it uses
    /// `floor(log4(capacity))` number of levels, ensuring that only *a few*
    /// nodes occupy the highest level.
    ///
    /// # Examples
    ///
    /// ```
    /// use multiskip::SkipList;
    ///
    /// let mut list = SkipList::with_capacity(100);
    /// list.extend(0..100);
    /// ```
    #[inline]
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        #[allow(
            clippy::cast_precision_loss,
            clippy::cast_possible_truncation,
            clippy::cast_sign_loss,
            clippy::as_conversions,
            reason = "The level count only needs to be approximately right"
        )]
        let levels = cmp::max(
            1,
            (capacity as f64).log(f64::from(DEFAULT_BRANCHING)).floor() as usize,
        );
        let generator =
            Geometric::new(levels, DEFAULT_BRANCHING).expect("level count is always at least 1");
        Self::with_level_generator(generator)
    }

    /// Create a new skiplist using the provided level generator to decide
    /// how many levels each new element spans.
    ///
    /// Supplying a seeded generator makes the list layout reproducible,
    /// which is mostly useful in tests.
    ///
    /// # Examples
    ///
    /// ```
    /// use multiskip::{Geometric, SkipList};
    ///
    /// let generator = Geometric::with_seed(16, 4, 92).unwrap();
    /// let mut list = SkipList::with_level_generator(generator);
    /// list.insert(1);
    /// assert!(list.contains(&1));
    /// ```
    #[must_use]
    pub fn with_level_generator<G>(generator: G) -> Self
    where
        G: LevelGenerator + 'static,
    {
        let mut arena = Arena::new();
        let head = arena.alloc(Node::head(None));
        SkipList {
            arena,
            head,
            len: 0,
            level_generator: Box::new(generator),
        }
    }

    /// Clears the skiplist, removing all values.
    ///
    /// # Examples
    ///
    /// ```
    /// use multiskip::SkipList;
    ///
    /// let mut list = SkipList::new();
    /// list.extend(0..10);
    /// list.clear();
    /// assert!(list.is_empty());
    /// ```
    #[inline]
    pub fn clear(&mut self) {
        self.arena.clear();
        self.head = self.arena.alloc(Node::head(None));
        self.len = 0;
    }

    /// Returns the number of elements in the skiplist, counting every
    /// occurrence of duplicates.
    ///
    /// # Examples
    ///
    /// ```
    /// use multiskip::SkipList;
    ///
    /// let mut list = SkipList::new();
    /// list.extend(0..10);
    /// list.insert(5);
    /// assert_eq!(list.len(), 11);
    /// ```
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.len
    }

    /// Returns `true` if the skiplist contains no elements.
    ///
    /// # Examples
    ///
    /// ```
    /// use multiskip::SkipList;
    ///
    /// let mut list = SkipList::new();
    /// assert!(list.is_empty());
    ///
    /// list.insert(1);
    /// assert!(!list.is_empty());
    /// ```
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Returns the current number of levels, including the always-present
    /// bottom level.
    ///
    /// The height grows when an inserted element spans more levels than the
    /// list currently has, and shrinks back as removals leave the upper
    /// levels empty. An empty list has height 1.
    ///
    /// # Examples
    ///
    /// ```
    /// use multiskip::SkipList;
    ///
    /// let mut list: SkipList<i64> = (0..50).collect();
    /// assert!(list.height() <= 16);
    /// while let Some(&front) = list.front() {
    ///     list.remove(&front).unwrap();
    /// }
    /// assert_eq!(list.height(), 1);
    /// ```
    #[must_use]
    pub fn height(&self) -> usize {
        let mut height = 1;
        let mut id = self.head;
        while let Some(down) = self.arena[id].down {
            height += 1;
            id = down;
        }
        height
    }

    /// Provides a reference to the smallest element, or `None` if the
    /// skiplist is empty.
    ///
    /// # Examples
    ///
    /// ```
    /// use multiskip::SkipList;
    ///
    /// let mut list = SkipList::new();
    /// assert!(list.front().is_none());
    ///
    /// list.insert(2);
    /// list.insert(1);
    /// assert_eq!(list.front(), Some(&1));
    /// ```
    #[inline]
    #[must_use]
    pub fn front(&self) -> Option<&T> {
        let bottom = self.bottom_head();
        self.arena[bottom]
            .right
            .and_then(|id| self.arena[id].value.as_ref())
    }

    /// Creates an iterator over the elements of the skiplist in
    /// non-decreasing order, yielding every occurrence of duplicates.
    ///
    /// Each call starts a fresh traversal of the current contents. The
    /// iterator borrows the list, so the list cannot be mutated while it is
    /// alive.
    ///
    /// # Examples
    ///
    /// ```
    /// use multiskip::SkipList;
    ///
    /// let mut list = SkipList::new();
    /// list.extend([3, 1, 2, 1]);
    /// assert!(list.iter().copied().eq([1, 1, 2, 3]));
    /// ```
    #[must_use]
    pub fn iter(&self) -> Iter<'_, T> {
        let bottom = self.bottom_head();
        Iter {
            arena: &self.arena,
            next: self.arena[bottom].right,
            size: self.len,
        }
    }

    /// Get an owning iterator over the elements of the skiplist in
    /// non-decreasing order.
    ///
    /// # Examples
    ///
    /// ```
    /// use multiskip::SkipList;
    ///
    /// let mut list = SkipList::new();
    /// list.extend([3, 1, 2]);
    /// assert_eq!(list.into_iter().collect::<Vec<_>>(), vec![1, 2, 3]);
    /// ```
    #[allow(clippy::should_implement_trait)]
    #[must_use]
    pub fn into_iter(self) -> IntoIter<T> {
        let bottom = self.bottom_head();
        let next = self.arena[bottom].right;
        IntoIter {
            arena: self.arena,
            next,
            size: self.len,
        }
    }
}

impl<T> SkipList<T>
where
    T: Ord,
{
    /// Returns true if the value is contained in the skiplist.
    ///
    /// # Examples
    ///
    /// ```
    /// use multiskip::SkipList;
    ///
    /// let mut list = SkipList::new();
    /// list.extend(0..10);
    /// assert!(list.contains(&4));
    /// assert!(!list.contains(&15));
    /// ```
    #[must_use]
    pub fn contains(&self, value: &T) -> bool {
        let tracked = self.traverse(value);
        match tracked[0] {
            (_, Some(found)) => self.arena[found].value.as_ref() == Some(value),
            (_, None) => false,
        }
    }

    /// Removes one occurrence of the value and returns it, or fails with
    /// [`NotFoundError`] if no occurrence is present.
    ///
    /// Exactly one occurrence is removed per call, no matter how many
    /// duplicates the list holds; the list is unchanged on failure.
    ///
    /// # Errors
    ///
    /// Returns [`NotFoundError`] if the value is not in the skiplist.
    ///
    /// # Examples
    ///
    /// ```
    /// use multiskip::{NotFoundError, SkipList};
    ///
    /// let mut list = SkipList::new();
    /// list.insert(4);
    /// list.insert(4);
    /// assert_eq!(list.remove(&4), Ok(4));
    /// assert_eq!(list.remove(&4), Ok(4));
    /// assert_eq!(list.remove(&4), Err(NotFoundError));
    /// ```
    pub fn remove(&mut self, value: &T) -> Result<T, NotFoundError> {
        let tracked = self.traverse(value);
        let target = match tracked[0] {
            (_, Some(found)) if self.arena[found].value.as_ref() == Some(value) => found,
            _ => return Err(NotFoundError),
        };

        // Unlink the first matching node on every level carrying one. The
        // newest equal element is the first one on every level it spans, so
        // the unlinked nodes always leave the surviving towers intact.
        let mut removed = None;
        for &(pre, succ) in &tracked {
            let Some(succ) = succ else { continue };
            if self.arena[succ].value.as_ref() != Some(value) {
                continue;
            }
            let after = self.arena[succ].right;
            self.arena[pre].right = after;
            let node = self.arena.free(succ);
            if succ == target {
                removed = node.value;
            }
        }
        self.collapse_head();
        self.len -= 1;
        Ok(removed.expect("the level-0 match is always unlinked"))
    }
}

impl<T> SkipList<T>
where
    T: Ord + Clone,
{
    /// Insert the element into the skiplist.
    ///
    /// The element is placed immediately before the first element that is
    /// not less than it, so among equal elements the newest occurrence comes
    /// first. The element is cloned onto every level its tower spans.
    ///
    /// # Examples
    ///
    /// ```
    /// use multiskip::SkipList;
    ///
    /// let mut list = SkipList::new();
    /// list.insert(5);
    /// list.insert(3);
    /// list.insert(5);
    /// assert!(list.iter().copied().eq([3, 5, 5]));
    /// ```
    pub fn insert(&mut self, value: T) {
        let levels = self.level_generator.level() + 1;
        self.ensure_height(levels);
        let tracked = self.traverse(&value);
        let mut down = None;
        for &(pre, succ) in tracked.iter().take(levels) {
            let node = self.arena.alloc(Node::new(value.clone(), down, succ));
            self.arena[pre].right = Some(node);
            down = Some(node);
        }
        self.len += 1;
    }
}

// ///////////////////////////////////////////////
// Internal methods
// ///////////////////////////////////////////////

impl<T> SkipList<T> {
    /// The level-0 sentinel, at the bottom of the head chain.
    fn bottom_head(&self) -> NodeId {
        let mut id = self.head;
        while let Some(down) = self.arena[id].down {
            id = down;
        }
        id
    }

    /// Grow the head chain by prepending sentinels until the list has at
    /// least `expected` levels. Existing nodes are never rewired.
    fn ensure_height(&mut self, expected: usize) {
        debug_assert!(expected >= 1, "a list always has at least one level");
        let mut height = self.height();
        while height < expected {
            let head = self.arena.alloc(Node::head(Some(self.head)));
            self.head = head;
            height += 1;
        }
    }

    /// Descend the top of the head chain past levels whose forward chain is
    /// empty, freeing their sentinels. The bottom sentinel always remains.
    fn collapse_head(&mut self) {
        while self.arena[self.head].right.is_none() {
            match self.arena[self.head].down {
                Some(down) => {
                    let _ = self.arena.free(self.head);
                    self.head = down;
                }
                None => break,
            }
        }
    }
}

impl<T> SkipList<T>
where
    T: Ord,
{
    /// Locate `value` on every level at once.
    ///
    /// Returns, indexed by level (0 is the bottom), the pair of the
    /// rightmost node whose value is strictly less than `value` (the
    /// level's sentinel if there is none) and its right neighbour — the
    /// first node at or after `value`, if any. Starting from the top
    /// sentinel, the walk moves right while the next value is strictly
    /// less, then drops down from the same position.
    ///
    /// # Panics
    ///
    /// Panics if the walk does not end exactly at level 0, which would mean
    /// the head chain or the down links are corrupted.
    fn traverse(&self, value: &T) -> Vec<(NodeId, Option<NodeId>)> {
        let mut level = self.height();
        let mut tracked = vec![(self.head, None); level];

        let mut pre = Some(self.head);
        while let Some(start) = pre {
            let mut node = start;
            let mut cur = self.arena[node].right;
            while let Some(next) = cur {
                let next_value = self.arena[next]
                    .value
                    .as_ref()
                    .expect("forward chains never contain head nodes");
                if next_value < value {
                    node = next;
                    cur = self.arena[next].right;
                } else {
                    break;
                }
            }

            assert!(level > 0, "the head chain is deeper than the list height");
            level -= 1;
            tracked[level] = (node, cur);
            pre = self.arena[node].down;
        }

        assert_eq!(level, 0, "a traversal must come to rest on level 0");
        tracked
    }

    /// Checks the integrity of the skiplist.
    #[allow(dead_code)]
    fn check(&self)
    where
        T: fmt::Debug,
    {
        let mut heads = Vec::new();
        let mut head = Some(self.head);
        while let Some(id) = head {
            assert!(self.arena[id].is_head(), "head nodes must not carry values");
            heads.push(id);
            head = self.arena[id].down;
        }
        assert_eq!(heads.len(), self.height());

        for (depth, &level_head) in heads.iter().enumerate() {
            let level = heads.len() - 1 - depth;
            let mut count = 0;
            let mut prev: Option<&T> = None;
            let mut cur = self.arena[level_head].right;
            while let Some(id) = cur {
                let node = &self.arena[id];
                let value = node
                    .value
                    .as_ref()
                    .expect("forward chains never contain head nodes");
                if let Some(prev) = prev {
                    assert!(prev <= value, "forward chains must stay sorted");
                }
                if level == 0 {
                    assert!(node.down.is_none(), "level-0 nodes link to nothing below");
                } else {
                    let down = node.down.expect("nodes above level 0 link to the level below");
                    assert_eq!(
                        self.arena[down].value.as_ref(),
                        Some(value),
                        "a node must sit directly above its own value"
                    );
                }
                prev = Some(value);
                count += 1;
                cur = node.right;
            }
            if level == 0 {
                assert_eq!(count, self.len, "level 0 must hold every occurrence");
            }
        }

        if self.height() > 1 {
            assert!(
                self.arena[self.head].right.is_some(),
                "empty head levels must be collapsed"
            );
        }
    }
}

impl<T> SkipList<T>
where
    T: fmt::Debug,
{
    /// Renders the internal structure of the skiplist level by level (for
    /// debugging purposes).
    #[allow(dead_code)]
    fn debug_structure(&self) -> String {
        let mut rows = Vec::new();
        let mut level = self.height();
        let mut head = Some(self.head);
        while let Some(id) = head {
            level -= 1;
            let mut row = format!("level {level}: <head>");
            let mut cur = self.arena[id].right;
            while let Some(next) = cur {
                let node = &self.arena[next];
                let value = node
                    .value
                    .as_ref()
                    .expect("forward chains never contain head nodes");
                row.push_str(&format!(" -> [{value:?}]"));
                cur = node.right;
            }
            rows.push(row);
            head = self.arena[id].down;
        }
        rows.join("\n")
    }
}

// ///////////////////////////////////////////////
// Trait implementation
// ///////////////////////////////////////////////

impl<T> default::Default for SkipList<T> {
    fn default() -> SkipList<T> {
        SkipList::new()
    }
}

/// This implementation of PartialEq only checks that the *values* are equal;
/// it does not check for equivalence of other features (such as the node
/// levels or the level generators).
impl<A, B> cmp::PartialEq<SkipList<B>> for SkipList<A>
where
    A: cmp::PartialEq<B>,
{
    #[inline]
    fn eq(&self, other: &SkipList<B>) -> bool {
        self.len() == other.len() && self.iter().eq(other)
    }
    #[allow(clippy::partialeq_ne_impl)]
    #[inline]
    fn ne(&self, other: &SkipList<B>) -> bool {
        self.len != other.len || self.iter().ne(other)
    }
}

impl<T> cmp::Eq for SkipList<T> where T: cmp::Eq {}

impl<A, B> cmp::PartialOrd<SkipList<B>> for SkipList<A>
where
    A: cmp::PartialOrd<B>,
{
    #[inline]
    fn partial_cmp(&self, other: &SkipList<B>) -> Option<Ordering> {
        self.iter().partial_cmp(other)
    }
}

impl<T> Ord for SkipList<T>
where
    T: cmp::Ord,
{
    #[inline]
    fn cmp(&self, other: &SkipList<T>) -> Ordering {
        self.iter().cmp(other)
    }
}

impl<T> Extend<T> for SkipList<T>
where
    T: Ord + Clone,
{
    #[inline]
    fn extend<I: iter::IntoIterator<Item = T>>(&mut self, iterable: I) {
        for element in iterable {
            self.insert(element);
        }
    }
}

impl<T> fmt::Debug for SkipList<T>
where
    T: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "[")?;
        for (i, entry) in self.iter().enumerate() {
            if i != 0 {
                write!(f, ", ")?;
            }
            write!(f, "{:?}", entry)?;
        }
        write!(f, "]")
    }
}

impl<T> fmt::Display for SkipList<T>
where
    T: fmt::Display,
{
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "[")?;
        for (i, entry) in self.iter().enumerate() {
            if i != 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}", entry)?;
        }
        write!(f, "]")
    }
}

impl<T> iter::IntoIterator for SkipList<T> {
    type Item = T;
    type IntoIter = IntoIter<T>;

    fn into_iter(self) -> IntoIter<T> {
        self.into_iter()
    }
}
impl<'a, T> iter::IntoIterator for &'a SkipList<T> {
    type Item = &'a T;
    type IntoIter = Iter<'a, T>;

    fn into_iter(self) -> Iter<'a, T> {
        self.iter()
    }
}
impl<'a, T> iter::IntoIterator for &'a mut SkipList<T> {
    type Item = &'a T;
    type IntoIter = Iter<'a, T>;

    fn into_iter(self) -> Iter<'a, T> {
        self.iter()
    }
}

impl<T> iter::FromIterator<T> for SkipList<T>
where
    T: Ord + Clone,
{
    #[inline]
    fn from_iter<I>(iter: I) -> SkipList<T>
    where
        I: iter::IntoIterator<Item = T>,
    {
        let mut list = SkipList::new();
        list.extend(iter);
        list
    }
}

impl<T: Hash> Hash for SkipList<T> {
    #[inline]
    fn hash<H: hash::Hasher>(&self, state: &mut H) {
        for elt in self {
            elt.hash(state);
        }
    }
}

// ////////////////////////////////////////////////////////////////////////////
// Tests
// ////////////////////////////////////////////////////////////////////////////
