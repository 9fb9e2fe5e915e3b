//! Neighbor enumeration for chain particles
//!
//! Interior and edge particles share one force formula; they differ only in
//! which neighbors exist. Fixed-ness is a separate concern carried by the
//! particle's mobility flag.

/// Position of a particle within the chain array
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Site {
    Interior,
    LeftEdge,
    RightEdge,
}

impl Site {
    /// Classify index `index` of a chain of `count` particles.
    ///
    /// A two-particle chain has no interior: index 0 is the left edge and
    /// index 1 the right edge.
    pub fn of(index: usize, count: usize) -> Self {
        debug_assert!(count >= 2, "a chain needs at least two particles");
        debug_assert!(index < count);

        if index == 0 {
            Site::LeftEdge
        } else if index + 1 == count {
            Site::RightEdge
        } else {
            Site::Interior
        }
    }

    pub fn is_interior(self) -> bool {
        self == Site::Interior
    }

    /// Indices of the neighbors of `index` that exist at this site
    pub fn neighbors(self, index: usize) -> impl Iterator<Item = usize> {
        let left = (self != Site::LeftEdge).then(|| index - 1);
        let right = (self != Site::RightEdge).then(|| index + 1);
        left.into_iter().chain(right)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_site_classification() {
        assert_eq!(Site::of(0, 5), Site::LeftEdge);
        assert_eq!(Site::of(2, 5), Site::Interior);
        assert_eq!(Site::of(4, 5), Site::RightEdge);
        assert_eq!(Site::of(0, 2), Site::LeftEdge);
        assert_eq!(Site::of(1, 2), Site::RightEdge);
    }

    #[test]
    fn test_neighbor_enumeration() {
        let collect = |site: Site, index| site.neighbors(index).collect::<Vec<_>>();

        assert_eq!(collect(Site::LeftEdge, 0), vec![1]);
        assert_eq!(collect(Site::Interior, 3), vec![2, 4]);
        assert_eq!(collect(Site::RightEdge, 4), vec![3]);
    }

    #[test]
    fn test_every_neighbor_is_in_range() {
        for count in 2..8 {
            for index in 0..count {
                for neighbor in Site::of(index, count).neighbors(index) {
                    assert!(neighbor < count);
                    assert_eq!(neighbor.abs_diff(index), 1);
                }
            }
        }
    }
}
