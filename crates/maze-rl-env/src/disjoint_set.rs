//! Array-backed union-find over cell indices

/// Disjoint-set forest with path compression
#[derive(Debug, Clone)]
pub struct DisjointSet {
    parent: Vec<usize>,
}

impl DisjointSet {
    /// One singleton set per element `0..len`
    #[must_use]
    pub fn new(len: usize) -> Self {
        Self {
            parent: (0..len).collect(),
        }
    }

    /// Representative of `i`'s set
    ///
    /// Every node on the walked path is re-pointed at the root.
    pub fn find(&mut self, i: usize) -> usize {
        let mut root = i;
        while self.parent[root] != root {
            root = self.parent[root];
        }

        let mut node = i;
        while self.parent[node] != root {
            let next = self.parent[node];
            self.parent[node] = root;
            node = next;
        }

        root
    }

    /// Merge the sets holding `i` and `j`
    ///
    /// Returns `false` when they were already connected.
    pub fn union(&mut self, i: usize, j: usize) -> bool {
        let root_i = self.find(i);
        let root_j = self.find(j);
        if root_i == root_j {
            return false;
        }
        self.parent[root_i] = root_j;
        true
    }

    /// Number of elements
    #[must_use]
    pub fn len(&self) -> usize {
        self.parent.len()
    }

    /// Whether the forest has no elements
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.parent.is_empty()
    }
}
