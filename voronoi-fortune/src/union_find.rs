//--------------------------------------------------------------------
// union_find.rs
//--------------------------------------------------------------------
// Groups vertex indices into disjoint sets, used to collapse vertices
// which landed on the same point
//--------------------------------------------------------------------
use std::mem;

pub struct UnionFind {
    parents: Vec<usize>,
    sizes: Vec<usize>
}

impl UnionFind {
    pub fn new(count: usize) -> UnionFind {
        UnionFind { parents: (0..count).collect(), sizes: vec![1; count] }
    }

    /// Gets the representative of the set `i` belongs to, halving the path on the way up
    pub fn find(&mut self, mut i: usize) -> usize {
        while self.parents[i] != i {
            self.parents[i] = self.parents[self.parents[i]];
            i = self.parents[i];
        }
        i
    }

    /// Joins the sets of `i` and `j` and returns the representative of the merged set
    pub fn union(&mut self, i: usize, j: usize) -> usize {
        let mut i = self.find(i);
        let mut j = self.find(j);

        if i != j {
            if self.sizes[i] < self.sizes[j] { mem::swap(&mut i, &mut j); }
            self.parents[j] = i;
            self.sizes[i] += self.sizes[j];
        }
        i
    }

    pub fn is_representative(&self, i: usize) -> bool { self.parents[i] == i }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_singletons() {
        let mut union_find = UnionFind::new(4);
        for i in 0..4 {
            assert_eq!(union_find.find(i), i);
            assert!(union_find.is_representative(i));
        }
    }

    #[test]
    fn test_union_chain() {
        let mut union_find = UnionFind::new(6);
        union_find.union(0, 1);
        union_find.union(2, 3);
        let root = union_find.union(1, 3);

        for &i in &[0, 1, 2, 3] { assert_eq!(union_find.find(i), root); }
        assert_eq!(union_find.find(4), 4);
        assert_eq!(union_find.find(5), 5);
        assert_eq!((0..6).filter(|&i| union_find.is_representative(i)).count(), 3);

        // Joining twice changes nothing
        assert_eq!(union_find.union(0, 2), root);
    }
}
