use crate::{OrdMultiMap, Ptr};

/// Which child balances trigger a rotation during fix-up. After an insert a
/// child can only be exactly one side heavy, after a delete an evenly
/// balanced child is possible and takes the single rotation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum FixUp {
    Insert,
    Remove,
}

impl<P: Ptr, K, V> OrdMultiMap<P, K, V> {
    pub(crate) fn update_height(&mut self, inx: P::Inx) {
        let node = self.node(inx);
        let h = 1 + self.h(node.p_tree0).max(self.h(node.p_tree1));
        // heights are logarithmic in the number of nodes
        self.node_mut(inx).height = h as u8;
    }

    /// `height(p_tree0) - height(p_tree1)`, 0 for `None`
    pub(crate) fn balance(&self, inx: Option<P::Inx>) -> i16 {
        match inx {
            Some(inx) => {
                let node = self.node(inx);
                self.h(node.p_tree0) - self.h(node.p_tree1)
            }
            None => 0,
        }
    }

    /// Points the child slot of `parent` that held `old` at `new`, or the
    /// root if there is no parent. The back pointer of `new` is not touched.
    pub(crate) fn replace_child(
        &mut self,
        parent: Option<P::Inx>,
        old: P::Inx,
        new: Option<P::Inx>,
    ) {
        match parent {
            Some(parent) => {
                let node = self.node_mut(parent);
                if node.p_tree0 == Some(old) {
                    node.p_tree0 = new;
                } else {
                    node.p_tree1 = new;
                }
            }
            None => self.root = new,
        }
    }

    /// Rotates the right child of `x` up into the place of `x`, and returns
    /// the raised node. The chain is not touched.
    pub(crate) fn rotate_left(&mut self, x: P::Inx) -> P::Inx {
        let x_node = self.node(x);
        let p_back = x_node.p_back;
        let y = x_node
            .p_tree1
            .expect("`rotate_left` on a node without a right child");
        let middle = self.node(y).p_tree0;

        self.node_mut(x).p_tree1 = middle;
        if let Some(middle) = middle {
            self.node_mut(middle).p_back = Some(x);
        }
        self.replace_child(p_back, x, Some(y));
        let y_node = self.node_mut(y);
        y_node.p_back = p_back;
        y_node.p_tree0 = Some(x);
        self.node_mut(x).p_back = Some(y);

        // the lowered node first
        self.update_height(x);
        self.update_height(y);
        y
    }

    /// Rotates the left child of `y` up into the place of `y`, and returns
    /// the raised node. The chain is not touched.
    pub(crate) fn rotate_right(&mut self, y: P::Inx) -> P::Inx {
        let y_node = self.node(y);
        let p_back = y_node.p_back;
        let x = y_node
            .p_tree0
            .expect("`rotate_right` on a node without a left child");
        let middle = self.node(x).p_tree1;

        self.node_mut(y).p_tree0 = middle;
        if let Some(middle) = middle {
            self.node_mut(middle).p_back = Some(y);
        }
        self.replace_child(p_back, y, Some(x));
        let x_node = self.node_mut(x);
        x_node.p_back = p_back;
        x_node.p_tree1 = Some(y);
        self.node_mut(y).p_back = Some(x);

        self.update_height(y);
        self.update_height(x);
        x
    }

    /// Walks from `start` up to the root, recomputing heights and rotating
    /// where a node went out of balance
    pub(crate) fn fix_up(&mut self, start: Option<P::Inx>, kind: FixUp) {
        let mut tmp = start;
        while let Some(inx) = tmp {
            self.update_height(inx);
            let node = self.node(inx);
            let (p_tree0, p_tree1) = (node.p_tree0, node.p_tree1);
            let balance = self.balance(Some(inx));
            let bl = self.balance(p_tree0);
            let br = self.balance(p_tree1);
            let (left_left, right_right, left_right, right_left) = match kind {
                FixUp::Insert => (bl == 1, br == -1, bl == -1, br == 1),
                FixUp::Remove => (bl >= 0, br <= 0, bl < 0, br > 0),
            };
            let top = if balance > 1 && left_left {
                self.rotate_right(inx)
            } else if balance < -1 && right_right {
                self.rotate_left(inx)
            } else if balance > 1 && left_right {
                // `balance > 1` implies the left child exists
                if let Some(p_tree0) = p_tree0 {
                    self.rotate_left(p_tree0);
                }
                self.rotate_right(inx)
            } else if balance < -1 && right_left {
                if let Some(p_tree1) = p_tree1 {
                    self.rotate_right(p_tree1);
                }
                self.rotate_left(inx)
            } else {
                inx
            };
            tmp = self.node(top).p_back;
        }
    }
}
