use core::borrow::Borrow;

use super::balance::FixUp;
use crate::{Link, OrdMultiMap, Ptr};

impl<P: Ptr, K: Ord, V> OrdMultiMap<P, K, V> {
    /// Removes the most recently inserted node with key `k` and returns its
    /// key and value. Returns `None` and does nothing if `k` is not present.
    ///
    /// Only when the last node of a key is removed does the tree change and
    /// get rebalanced.
    pub fn delete<Q>(&mut self, k: &Q) -> Option<(K, V)>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        let inx = self.find_key_inx(k)?;
        let node = self.node(inx);
        let (p_back, p_tree0, p_tree1) = (node.p_back, node.p_tree0, node.p_tree1);
        if let Some(p_end) = node.p_end {
            // take off the end of the run, the tree is unaffected
            let link = self.a.remove(self.ptr(p_end))?;
            let new_end = Link::prev(&link).map(|p| p.inx()).filter(|p| *p != inx);
            self.node_mut(inx).p_end = new_end;
            let node = link.t;
            return Some((node.k, node.v))
        }
        let start = match (p_tree0, p_tree1) {
            (None, None) => {
                self.replace_child(p_back, inx, None);
                p_back
            }
            (None, Some(child)) | (Some(child), None) => {
                self.replace_child(p_back, inx, Some(child));
                self.node_mut(child).p_back = p_back;
                p_back
            }
            (Some(p_tree0), Some(p_tree1)) => {
                // the tree successor takes over the slot, along with its own
                // run which is not touched
                let succ = self.subtree_min_inx(p_tree1);
                let height = self.node(inx).height;
                let start = if succ == p_tree1 {
                    Some(succ)
                } else {
                    let succ_node = self.node(succ);
                    let (succ_back, succ_tree1) = (succ_node.p_back, succ_node.p_tree1);
                    // `succ` is a left child with no left subtree
                    if let Some(succ_back) = succ_back {
                        self.node_mut(succ_back).p_tree0 = succ_tree1;
                    }
                    if let Some(succ_tree1) = succ_tree1 {
                        self.node_mut(succ_tree1).p_back = succ_back;
                    }
                    self.node_mut(succ).p_tree1 = Some(p_tree1);
                    self.node_mut(p_tree1).p_back = Some(succ);
                    succ_back
                };
                let succ_node = self.node_mut(succ);
                succ_node.p_back = p_back;
                succ_node.p_tree0 = Some(p_tree0);
                succ_node.height = height;
                self.node_mut(p_tree0).p_back = Some(succ);
                self.replace_child(p_back, inx, Some(succ));
                start
            }
        };
        // the chain neighbors of the removed node get connected
        let link = self.a.remove(self.ptr(inx))?;
        self.fix_up(start, FixUp::Remove);
        let node = link.t;
        Some((node.k, node.v))
    }
}

impl<P: Ptr, K, V> OrdMultiMap<P, K, V> {
    /// Removes every node, yielding `(K, V)` pairs in chain order. All `Ptr`s
    /// are invalidated, and the map is empty once the iterator is dropped even
    /// if it was not run to completion.
    pub fn drain(&mut self) -> Drain<P, K, V> {
        let next = self.min();
        self.root = None;
        Drain { map: self, next }
    }
}

/// A draining iterator over `(K, V)` in an `OrdMultiMap`, in chain order
pub struct Drain<'a, P: Ptr, K, V> {
    map: &'a mut OrdMultiMap<P, K, V>,
    next: Option<P>,
}

impl<'a, P: Ptr, K, V> Iterator for Drain<'a, P, K, V> {
    type Item = (K, V);

    fn next(&mut self) -> Option<Self::Item> {
        let p = self.next?;
        // the generation is incremented once when the whole drain is done
        let link = self.map.a.remove_internal(p, false)?;
        self.next = Link::next(&link);
        let node = link.t;
        Some((node.k, node.v))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.map.len(), Some(self.map.len()))
    }
}

impl<'a, P: Ptr, K, V> Drop for Drain<'a, P, K, V> {
    fn drop(&mut self) {
        for _ in self.by_ref() {}
        self.map.a.inc_gen();
    }
}
