use core::cmp::Ordering;

use super::{balance::FixUp, Node};
use crate::{OrdMultiMap, Ptr};

impl<P: Ptr, K: Ord, V> OrdMultiMap<P, K, V> {
    /// Inserts a new node with key `k` and value `v` and returns a `Ptr` to
    /// it. `len` always increases by one.
    ///
    /// If `k` is not present yet, the node becomes a tree representative and
    /// the tree is rebalanced. Otherwise the node is appended to the end of
    /// the run of equal keys, and the tree is not changed at all.
    pub fn insert(&mut self, k: K, v: V) -> P {
        let root = match self.root {
            Some(root) => root,
            None => {
                let p_new = self.a.insert_new(Node::new(k, v, 1));
                self.root = Some(p_new.inx());
                return p_new
            }
        };
        let mut inx = root;
        loop {
            let node = self.node(inx);
            let (p_tree0, p_tree1) = (node.p_tree0, node.p_tree1);
            match Ord::cmp(&k, &node.k) {
                Ordering::Less => match p_tree0 {
                    Some(p_tree0) => inx = p_tree0,
                    None => {
                        // directly before the parent in the chain
                        let p_parent = self.ptr(inx);
                        let p_new = self.splice((None, Some(p_parent)), Node::new(k, v, 1));
                        self.node_mut(p_new.inx()).p_back = Some(inx);
                        self.node_mut(inx).p_tree0 = Some(p_new.inx());
                        self.fix_up(Some(inx), FixUp::Insert);
                        return p_new
                    }
                },
                Ordering::Greater => match p_tree1 {
                    Some(p_tree1) => inx = p_tree1,
                    None => {
                        // after the whole run of the parent, whose `p_end`
                        // stays the same since this is a different key
                        let p_run_end = self.ptr(self.run_end(inx));
                        let p_new = self.splice((Some(p_run_end), None), Node::new(k, v, 1));
                        self.node_mut(p_new.inx()).p_back = Some(inx);
                        self.node_mut(inx).p_tree1 = Some(p_new.inx());
                        self.fix_up(Some(inx), FixUp::Insert);
                        return p_new
                    }
                },
                Ordering::Equal => {
                    let p_run_end = self.ptr(self.run_end(inx));
                    let p_new = self.splice((Some(p_run_end), None), Node::new(k, v, 0));
                    self.node_mut(inx).p_end = Some(p_new.inx());
                    return p_new
                }
            }
        }
    }

    /// Splices into the chain next to a neighbor known to be valid
    fn splice(&mut self, prev_next: (Option<P>, Option<P>), node: Node<P, K, V>) -> P {
        match self.a.insert(prev_next, node) {
            Ok(p) => p,
            Err(_) => unreachable!("splice neighbor is not valid"),
        }
    }
}
