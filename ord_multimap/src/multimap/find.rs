use core::{borrow::Borrow, cmp::Ordering};

use crate::{Link, OrdMultiMap, Ptr};

impl<P: Ptr, K, V> OrdMultiMap<P, K, V> {
    pub(crate) fn subtree_min_inx(&self, inx: P::Inx) -> P::Inx {
        let mut inx = inx;
        while let Some(p_tree0) = self.node(inx).p_tree0 {
            inx = p_tree0;
        }
        inx
    }

    pub(crate) fn subtree_max_inx(&self, inx: P::Inx) -> P::Inx {
        let mut inx = inx;
        while let Some(p_tree1) = self.node(inx).p_tree1 {
            inx = p_tree1;
        }
        inx
    }

    /// Returns the representative with the least key in the subtree rooted
    /// at `p`. Returns `None` if `p` is invalid or a duplicate, which has no
    /// subtree.
    pub fn subtree_min(&self, p: P) -> Option<P> {
        if !self.is_representative(p) {
            return None
        }
        Some(self.ptr(self.subtree_min_inx(p.inx())))
    }

    /// Returns the representative with the greatest key in the subtree rooted
    /// at `p`. Returns `None` if `p` is invalid or a duplicate.
    pub fn subtree_max(&self, p: P) -> Option<P> {
        if !self.is_representative(p) {
            return None
        }
        Some(self.ptr(self.subtree_max_inx(p.inx())))
    }

    /// Returns the first node in the global chain, which is the
    /// representative of the least key
    pub fn min(&self) -> Option<P> {
        self.root
            .map(|root| self.ptr(self.subtree_min_inx(root)))
    }

    /// Returns the last node in the global chain, which is the end of the run
    /// of the greatest key
    pub fn max(&self) -> Option<P> {
        self.root
            .map(|root| self.ptr(self.run_end(self.subtree_max_inx(root))))
    }

    /// Same as [OrdMultiMap::min]
    pub fn first(&self) -> Option<P> {
        self.min()
    }

    /// Same as [OrdMultiMap::max]
    pub fn last(&self) -> Option<P> {
        self.max()
    }

    pub(crate) fn tree_successor_inx(&self, inx: P::Inx) -> Option<P::Inx> {
        if let Some(p_tree1) = self.node(inx).p_tree1 {
            return Some(self.subtree_min_inx(p_tree1))
        }
        // go up until we come from a left child
        let mut child = inx;
        let mut parent = self.node(inx).p_back;
        while let Some(p) = parent {
            if self.node(p).p_tree0 == Some(child) {
                return Some(p)
            }
            child = p;
            parent = self.node(p).p_back;
        }
        None
    }

    pub(crate) fn tree_predecessor_inx(&self, inx: P::Inx) -> Option<P::Inx> {
        if let Some(p_tree0) = self.node(inx).p_tree0 {
            return Some(self.subtree_max_inx(p_tree0))
        }
        let mut child = inx;
        let mut parent = self.node(inx).p_back;
        while let Some(p) = parent {
            if self.node(p).p_tree1 == Some(child) {
                return Some(p)
            }
            child = p;
            parent = self.node(p).p_back;
        }
        None
    }

    /// Returns the representative of the next greater key, found through the
    /// tree. Returns `None` if `p` is invalid, a duplicate, or has the
    /// greatest key.
    pub fn tree_successor(&self, p: P) -> Option<P> {
        if !self.is_representative(p) {
            return None
        }
        self.tree_successor_inx(p.inx()).map(|inx| self.ptr(inx))
    }

    /// Returns the representative of the next lesser key, found through the
    /// tree. Returns `None` if `p` is invalid, a duplicate, or has the least
    /// key.
    pub fn tree_predecessor(&self, p: P) -> Option<P> {
        if !self.is_representative(p) {
            return None
        }
        self.tree_predecessor_inx(p.inx()).map(|inx| self.ptr(inx))
    }

    /// Returns the depth of the representative of `p`'s key, with the root at
    /// depth 1
    pub fn depth(&self, p: P) -> Option<usize> {
        let rep = self.representative(p)?;
        Some(self.depth_inx(rep.inx()))
    }

    pub(crate) fn depth_inx(&self, inx: P::Inx) -> usize {
        let mut depth = 1;
        let mut tmp = self.node(inx).p_back;
        while let Some(p_back) = tmp {
            depth += 1;
            tmp = self.node(p_back).p_back;
        }
        depth
    }

    /// Returns `p` and advances it to the next node of the global chain. This
    /// is for cases where the map needs to be borrowed mutably between steps.
    ///
    /// ```
    /// use ord_multimap::{ptr_struct, OrdMultiMap};
    ///
    /// ptr_struct!(P0);
    ///
    /// let mut map: OrdMultiMap<P0, u8, u64> = OrdMultiMap::new();
    /// map.insert(2, 20);
    /// map.insert(1, 10);
    /// map.insert(2, 21);
    ///
    /// let mut adv = map.first();
    /// while let Some(p) = map.next_ptr(&mut adv) {
    ///     *map.get_val_mut(p).unwrap() += 1;
    /// }
    /// let vals: Vec<u64> = map.vals().copied().collect();
    /// assert_eq!(vals, [11, 21, 22]);
    /// ```
    pub fn next_ptr(&self, p: &mut Option<P>) -> Option<P> {
        let current = (*p)?;
        match self.a.get(current) {
            Some(link) => {
                *p = Link::next(link);
                Some(current)
            }
            None => {
                *p = None;
                None
            }
        }
    }
}

impl<P: Ptr, K: Ord, V> OrdMultiMap<P, K, V> {
    pub(crate) fn find_key_inx<Q>(&self, k: &Q) -> Option<P::Inx>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        let mut tmp = self.root;
        while let Some(inx) = tmp {
            let node = self.node(inx);
            match Ord::cmp(k, Borrow::<Q>::borrow(&node.k)) {
                Ordering::Less => tmp = node.p_tree0,
                Ordering::Equal => return Some(inx),
                Ordering::Greater => tmp = node.p_tree1,
            }
        }
        None
    }

    /// Returns the representative of `k` if the key is present at all. The
    /// duplicates follow it in the chain up to
    /// [OrdMultiMap::chain_end].
    pub fn find_key<Q>(&self, k: &Q) -> Option<P>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        self.find_key_inx(k).map(|inx| self.ptr(inx))
    }

    /// Returns if any node has key `k`
    pub fn contains_key<Q>(&self, k: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        self.find_key_inx(k).is_some()
    }
}
