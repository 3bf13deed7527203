use alloc::{string::String, vec::Vec};
use core::{cmp::Ordering, fmt, fmt::Write};

use crate::{ChainArena, Link, Ptr};

mod balance;
mod find;
mod insert;
mod remove;

pub use remove::Drain;

// Keys are kept on an AVL tree whose nodes live on a `ChainArena`. Only one
// node per distinct key, the "representative", takes part in the tree. Equal
// keys inserted later are "duplicates" that only sit in the chain, right
// after their representative. The chain through all nodes is the global
// in-order list, so iteration and successor lookups never touch the tree.
//
// 0. A representative has `height >= 1`, a duplicate has `height == 0` and no
//    tree links
// 1. The run of a key starts at its representative and ends at `p_end`, or at
//    the representative itself if `p_end` is `None`
// 2. |height(p_tree0) - height(p_tree1)| <= 1 at every representative

/// A node of an `OrdMultiMap`. `k` and `v` are readable through
/// `OrdMultiMap::get_link`, the tree fields are internal.
pub struct Node<P: Ptr, K, V> {
    pub k: K,
    pub v: V,
    // `None` for duplicates and for the root
    pub(crate) p_back: Option<P::Inx>,
    pub(crate) p_tree0: Option<P::Inx>,
    pub(crate) p_tree1: Option<P::Inx>,
    // last node of the duplicate run, `None` if the run is just this node
    pub(crate) p_end: Option<P::Inx>,
    // `u8` allows more nodes than any address space
    pub(crate) height: u8,
}

impl<P: Ptr, K, V> Node<P, K, V> {
    pub(crate) fn new(k: K, v: V, height: u8) -> Self {
        Self {
            k,
            v,
            p_back: None,
            p_tree0: None,
            p_tree1: None,
            p_end: None,
            height,
        }
    }

    /// Returns if this node is the tree representative of its key
    pub fn is_representative(&self) -> bool {
        self.height != 0
    }

    /// Height of the subtree rooted at this node, with leaves at 1. Zero for
    /// duplicates.
    pub fn height(&self) -> u8 {
        self.height
    }
}

impl<P: Ptr, K: fmt::Debug, V: fmt::Debug> fmt::Debug for Node<P, K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Node")
            .field("k", &self.k)
            .field("v", &self.v)
            .field("height", &self.height)
            .field("p_back", &self.p_back)
            .field("p_tree0", &self.p_tree0)
            .field("p_tree1", &self.p_tree1)
            .field("p_end", &self.p_end)
            .finish()
    }
}

impl<P: Ptr, K: Clone, V: Clone> Clone for Node<P, K, V> {
    fn clone(&self) -> Self {
        Self {
            k: self.k.clone(),
            v: self.v.clone(),
            p_back: self.p_back,
            p_tree0: self.p_tree0,
            p_tree1: self.p_tree1,
            p_end: self.p_end,
            height: self.height,
        }
    }
}

/// An ordered multi-map on an arena. Every `insert` adds a new node, even if
/// an equal key is already present, and returns a `P: Ptr` handle to it.
/// Distinct keys are balanced as an AVL tree with `O(log n)` insertion and
/// deletion, equal keys form runs in insertion order, and all nodes are
/// linked into one in-order chain.
///
/// ```
/// use ord_multimap::{ptr_struct, OrdMultiMap};
///
/// ptr_struct!(P0);
///
/// let mut map: OrdMultiMap<P0, &str, u32> = OrdMultiMap::new();
/// map.insert("C", 3);
/// map.insert("B", 1);
/// let p_a = map.insert("A", 0);
/// map.insert("B", 2);
/// assert_eq!(map.len(), 4);
///
/// // iteration follows key order, then insertion order within a key
/// let vals: Vec<u32> = map.vals().copied().collect();
/// assert_eq!(vals, [0, 1, 2, 3]);
/// assert_eq!(map.dup_count(map.find_key("B").unwrap()), Some(2));
///
/// // `delete` takes off the most recent node of a key
/// assert_eq!(map.delete("B"), Some(("B", 2)));
/// assert_eq!(map.delete("A"), Some(("A", 0)));
/// assert!(map.get(p_a).is_none());
/// assert_eq!(map.delete("Z"), None);
/// ```
pub struct OrdMultiMap<P: Ptr, K, V> {
    pub(crate) root: Option<P::Inx>,
    pub(crate) a: ChainArena<P, Node<P, K, V>>,
}

impl<P: Ptr, K, V> OrdMultiMap<P, K, V> {
    /// Creates a new empty map
    pub fn new() -> Self {
        Self {
            root: None,
            a: ChainArena::new(),
        }
    }

    /// Returns the number of nodes, duplicates included
    pub fn len(&self) -> usize {
        self.a.len()
    }

    /// Returns if the map is empty
    pub fn is_empty(&self) -> bool {
        self.a.is_empty()
    }

    /// Returns the capacity of the underlying arena
    pub fn capacity(&self) -> usize {
        self.a.capacity()
    }

    /// Follows [crate::Arena::gen]
    pub fn gen(&self) -> P::Gen {
        self.a.gen()
    }

    /// Reserves capacity for at least `additional` more nodes
    pub fn reserve(&mut self, additional: usize) {
        self.a.reserve(additional)
    }

    /// Returns if `p` is a valid `Ptr`
    pub fn contains(&self, p: P) -> bool {
        self.a.contains(p)
    }

    /// Returns the key and value of the node pointed to by `p`
    #[must_use]
    pub fn get(&self, p: P) -> Option<(&K, &V)> {
        self.a.get(p).map(|link| (&link.k, &link.v))
    }

    #[must_use]
    pub fn get_key(&self, p: P) -> Option<&K> {
        self.a.get(p).map(|link| &link.k)
    }

    #[must_use]
    pub fn get_val(&self, p: P) -> Option<&V> {
        self.a.get(p).map(|link| &link.v)
    }

    /// Values are not ordered over, so they can be mutated in place
    #[must_use]
    pub fn get_val_mut(&mut self, p: P) -> Option<&mut V> {
        self.a.get_mut(p).map(|node| &mut node.v)
    }

    /// Returns the whole link of `p`, with access to its in-order neighbors
    /// through `Link::prev` and `Link::next`
    #[must_use]
    pub fn get_link(&self, p: P) -> Option<&Link<P, Node<P, K, V>>> {
        self.a.get(p)
    }

    /// Returns if `p` points to the tree representative of its key. Returns
    /// `false` for invalid `p`.
    pub fn is_representative(&self, p: P) -> bool {
        self.a.get(p).map_or(false, |link| link.is_representative())
    }

    /// Returns the height of the subtree rooted at `p`, or 0 if `p` is a
    /// duplicate
    pub fn height(&self, p: P) -> Option<u8> {
        self.a.get(p).map(|link| link.height)
    }

    /// Returns the root of the tree
    pub fn root(&self) -> Option<P> {
        self.root.map(|inx| self.ptr(inx))
    }

    /// Returns the first node of the duplicate run that `p` is part of
    pub fn representative(&self, p: P) -> Option<P> {
        let mut p = p;
        loop {
            let link = self.a.get(p)?;
            if link.is_representative() {
                return Some(p)
            }
            // a duplicate always has a previous node in its run
            p = Link::prev(link)?;
        }
    }

    /// Returns the last node of the duplicate run that `p` is part of
    pub fn chain_end(&self, p: P) -> Option<P> {
        let link = self.a.get(p)?;
        if let Some(p_end) = link.p_end {
            return Some(self.ptr(p_end))
        }
        if link.is_representative() {
            return Some(p)
        }
        // walk to the next representative
        let mut p = p;
        while let Some(next) = Link::next(self.a.get_inx_unwrap(p.inx())) {
            if self.a[next].is_representative() {
                break
            }
            p = next;
        }
        Some(p)
    }

    /// Returns the number of nodes with the same key as `p`
    pub fn dup_count(&self, p: P) -> Option<usize> {
        let mut tmp = self.representative(p)?;
        let mut count = 1;
        while let Some(next) = Link::next(self.a.get_inx_unwrap(tmp.inx())) {
            if self.a[next].is_representative() {
                break
            }
            count += 1;
            tmp = next;
        }
        Some(count)
    }

    /// Drops all nodes and invalidates all `Ptr`s. The capacity is kept.
    pub fn clear(&mut self) {
        self.a.clear();
        self.root = None;
    }

    /// Performs a [OrdMultiMap::clear] and resets the capacity to 0
    pub fn clear_and_shrink(&mut self) {
        self.a.clear_and_shrink();
        self.root = None;
    }

    #[inline]
    pub(crate) fn ptr(&self, inx: P::Inx) -> P {
        let (gen, _) = self
            .a
            .get_ignore_gen(inx)
            .expect("internal `P::Inx` is not allocated");
        P::_from_raw(inx, gen)
    }

    #[inline]
    #[track_caller]
    pub(crate) fn node(&self, inx: P::Inx) -> &Node<P, K, V> {
        &self.a.get_inx_unwrap(inx).t
    }

    #[inline]
    #[track_caller]
    pub(crate) fn node_mut(&mut self, inx: P::Inx) -> &mut Node<P, K, V> {
        self.a.get_inx_mut_unwrap_t(inx)
    }

    /// Height of an optional subtree
    #[inline]
    pub(crate) fn h(&self, inx: Option<P::Inx>) -> i16 {
        inx.map_or(0, |inx| i16::from(self.node(inx).height))
    }

    /// Last node of the run represented by `inx`
    #[inline]
    pub(crate) fn run_end(&self, inx: P::Inx) -> P::Inx {
        self.node(inx).p_end.unwrap_or(inx)
    }
}

impl<P: Ptr, K: Ord, V> OrdMultiMap<P, K, V> {
    /// Used by tests
    #[doc(hidden)]
    pub fn _check_invariants(this: &Self) -> Result<(), &'static str> {
        ChainArena::_check_invariants(&this.a)?;
        let root = match this.root {
            Some(root) => root,
            None => {
                if this.a.is_empty() {
                    return Ok(())
                } else {
                    return Err("no root with nonempty arena")
                }
            }
        };
        match this.a.get_ignore_gen(root) {
            Some((_, link)) => {
                if link.p_back.is_some() {
                    return Err("root node has a back pointer")
                }
            }
            None => return Err("root is broken"),
        }
        // walk the tree, checking links and heights bottom up is done by
        // checking every node against its children
        let mut n_tree = 0;
        let mut stack: Vec<P::Inx> = Vec::new();
        stack.push(root);
        while let Some(inx) = stack.pop() {
            n_tree += 1;
            if n_tree > this.a.len() {
                return Err("tree has a cycle")
            }
            let node = match this.a.get_ignore_gen(inx) {
                Some((_, link)) => &link.t,
                None => return Err("broken tree link"),
            };
            if !node.is_representative() {
                return Err("duplicate node in tree")
            }
            let mut child_heights = [0i16; 2];
            for (i, child) in [node.p_tree0, node.p_tree1].into_iter().enumerate() {
                if let Some(child) = child {
                    let child_node = match this.a.get_ignore_gen(child) {
                        Some((_, link)) => &link.t,
                        None => return Err("broken tree link"),
                    };
                    if child_node.p_back != Some(inx) {
                        return Err("child does not point back to parent")
                    }
                    let expected = if i == 0 {
                        Ordering::Less
                    } else {
                        Ordering::Greater
                    };
                    if Ord::cmp(&child_node.k, &node.k) != expected {
                        return Err("broken tree ordering")
                    }
                    child_heights[i] = i16::from(child_node.height);
                    stack.push(child);
                }
            }
            if i16::from(node.height) != 1 + child_heights[0].max(child_heights[1]) {
                return Err("incorrect height")
            }
            if (child_heights[0] - child_heights[1]).abs() > 1 {
                return Err("unbalanced")
            }
        }
        // walk the chain
        let first = match this.first() {
            Some(first) => first,
            None => return Err("no first node"),
        };
        if Link::prev(this.a.get_inx_unwrap(first.inx())).is_some() {
            return Err("first node has a prev")
        }
        let mut n_chain = 0;
        let mut n_reps = 0;
        let mut tmp = Some(first);
        let mut rep: Option<P> = None;
        while let Some(p) = tmp {
            n_chain += 1;
            if n_chain > this.a.len() {
                return Err("chain has a cycle")
            }
            let link = this.a.get_inx_unwrap(p.inx());
            if link.is_representative() {
                if let Some(rep) = rep {
                    if Ord::cmp(&this.a[rep].k, &link.k) != Ordering::Less {
                        return Err("chain out of order")
                    }
                    if this.tree_successor(rep) != Some(p) {
                        return Err("chain and tree disagree")
                    }
                }
                n_reps += 1;
                rep = Some(p);
            } else {
                let rep = match rep {
                    Some(rep) => rep,
                    None => return Err("duplicate before any representative"),
                };
                if link.p_back.is_some() || link.p_tree0.is_some() || link.p_tree1.is_some() {
                    return Err("duplicate with tree links")
                }
                if Ord::cmp(&this.a[rep].k, &link.k) != Ordering::Equal {
                    return Err("duplicate key differs from its run")
                }
            }
            // the run must end exactly at `p_end`
            let next = Link::next(link);
            let run_ends = match next {
                Some(next) => this.a[next].is_representative(),
                None => true,
            };
            if run_ends {
                if let Some(rep) = rep {
                    if this.run_end(rep.inx()) != p.inx() {
                        return Err("`p_end` is not the end of its run")
                    }
                }
            }
            tmp = next;
        }
        if n_chain != this.a.len() {
            return Err("multiple chains")
        }
        if n_reps != n_tree {
            return Err("representatives missing from tree")
        }
        Ok(())
    }
}

impl<P: Ptr, K: fmt::Debug, V: fmt::Debug> OrdMultiMap<P, K, V> {
    /// Renders the node table in chain order, one node per line
    pub fn debug(&self) -> String {
        let mut s = String::new();
        let _ = writeln!(s, "root: {:?}", self.root);
        let mut tmp = self.first();
        while let Some(p) = tmp {
            let link = self.a.get_inx_unwrap(p.inx());
            let _ = writeln!(
                s,
                "{:?}: {:?} {:?} h:{} back:{:?} t0:{:?} t1:{:?} end:{:?}",
                p,
                link.k,
                link.v,
                link.height,
                link.p_back,
                link.p_tree0,
                link.p_tree1,
                link.p_end,
            );
            tmp = Link::next(link);
        }
        s
    }
}

impl<P: Ptr, K: fmt::Debug, V: fmt::Debug> fmt::Debug for OrdMultiMap<P, K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map()
            .entries(self.iter().map(|(p, k, v)| (p, (k, v))))
            .finish()
    }
}

impl<P: Ptr, K: Clone, V: Clone> Clone for OrdMultiMap<P, K, V> {
    /// `Ptr`s into `self` are valid for the same nodes in the clone
    fn clone(&self) -> Self {
        Self {
            root: self.root,
            a: self.a.clone(),
        }
    }
}

impl<P: Ptr, K, V> Default for OrdMultiMap<P, K, V> {
    fn default() -> Self {
        Self::new()
    }
}
