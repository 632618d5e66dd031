use hashbrown::HashMap;

#[derive(Debug, Clone, PartialEq, Eq)]
struct UfNode<D> {
    parent: usize,
    // present on leaders only
    data: Option<D>,
}

/// A union-find over integer element ids, carrying one immutable data record
/// per group.
///
/// `find` follows parent pointers without path compression, so a rolled-back
/// union leaves no trace in any node. Group data lives on the leader and is
/// replaced wholesale on every union; the caller supplies the merged record.
///
/// The transactional API journals the first touch of every node between
/// `save_point` and `commit`/`rollback`. Nested transactions are not
/// supported: a second `save_point` silently discards the previous journal.
#[derive(Debug, Clone)]
pub struct UnionFind<D> {
    nodes: Vec<UfNode<D>>,
    journal: Option<HashMap<usize, UfNode<D>>>,
}

impl<D: Clone> UnionFind<D> {
    pub fn new(data: impl IntoIterator<Item = D>) -> Self {
        UnionFind {
            nodes: data
                .into_iter()
                .enumerate()
                .map(|(i, d)| UfNode {
                    parent: i,
                    data: Some(d),
                })
                .collect(),
            journal: None,
        }
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn find(&self, mut element: usize) -> usize {
        while self.nodes[element].parent != element {
            element = self.nodes[element].parent;
        }
        element
    }

    pub fn is_leader(&self, element: usize) -> bool {
        self.nodes[element].parent == element
    }

    pub fn leaders(&self) -> impl Iterator<Item = usize> + '_ {
        (0..self.nodes.len()).filter(|&i| self.is_leader(i))
    }

    /// The data record of the group containing `element`.
    pub fn data(&self, element: usize) -> &D {
        self.nodes[self.find(element)]
            .data
            .as_ref()
            .expect("leaders carry data")
    }

    /// Merges the groups of the two distinct leaders, reparenting the higher
    /// one under the lower one and installing `merged` as the surviving
    /// group's data. Returns the surviving leader.
    pub fn union(&mut self, a: usize, b: usize, merged: D) -> usize {
        assert!(self.is_leader(a), "union operand {a} is not a leader");
        assert!(self.is_leader(b), "union operand {b} is not a leader");
        assert!(a != b, "cannot union a group with itself");

        let (lower, higher) = if a < b { (a, b) } else { (b, a) };

        self.touch(lower);
        self.touch(higher);

        self.nodes[higher].parent = lower;
        self.nodes[higher].data = None;
        self.nodes[lower].data = Some(merged);

        lower
    }

    /// Starts recording node snapshots. A prior pending journal is dropped.
    pub fn save_point(&mut self) {
        self.journal = Some(HashMap::new());
    }

    /// Ends the transaction, keeping all unions since the save point.
    pub fn commit(&mut self) {
        self.journal = None;
    }

    /// Restores every node touched since the save point to its snapshotted
    /// state, exactly undoing the unions in between.
    pub fn rollback(&mut self) {
        if let Some(journal) = self.journal.take() {
            for (element, node) in journal {
                self.nodes[element] = node;
            }
        }
    }

    fn touch(&mut self, element: usize) {
        if let Some(journal) = self.journal.as_mut() {
            if !journal.contains_key(&element) {
                journal.insert(element, self.nodes[element].clone());
            }
        }
    }

    /// The leader of every element in id order. Two snapshots of this vector
    /// are equal iff the partitions are equal.
    pub fn to_vec(&self) -> Vec<usize> {
        (0..self.nodes.len()).map(|i| self.find(i)).collect()
    }
}
