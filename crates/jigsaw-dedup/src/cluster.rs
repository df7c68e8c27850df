//! Grouping of pieces that sit at the same physical location.
//!
//! Works purely on indices into an id-sorted piece list: `neighbors[i]` holds
//! every other index whose centroid lies within the duplicate threshold of
//! piece `i`, and `center_distance[i]` is how far piece `i` sat from the
//! center of its own photo.

use petgraph::unionfind::UnionFind;
use std::collections::BTreeMap;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Status {
    Unresolved,
    Kept,
    Removed,
}

/// One resolved cluster; indices are ascending and include the anchor.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct RawCluster {
    pub anchor: usize,
    pub members: Vec<usize>,
    pub representative: usize,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub(crate) struct Clustering {
    pub clusters: Vec<RawCluster>,
    /// Surviving indices, ascending.
    pub survivors: Vec<usize>,
}

/// Member closest to the center of its own photo. Ties go to the lowest index.
pub(crate) fn pick_representative(members: &[usize], center_distance: &[f64]) -> Option<usize> {
    let mut best: Option<(usize, f64)> = None;
    for &m in members {
        let d = center_distance[m];
        match best {
            Some((_, best_d)) if d >= best_d => {}
            _ => best = Some((m, d)),
        }
    }
    best.map(|(m, _)| m)
}

/// Ordered single pass over anchors in index order.
///
/// A removed piece is skipped both as an anchor and as a candidate, so a
/// piece is absorbed by the first anchor that reaches it. A representative
/// kept by an earlier cluster can still lose to a later one; only pieces
/// still marked kept at the end survive.
pub(crate) fn cluster_anchor_order(neighbors: &[Vec<usize>], center_distance: &[f64]) -> Clustering {
    let n = neighbors.len();
    let mut status = vec![Status::Unresolved; n];
    let mut clusters = Vec::new();

    for anchor in 0..n {
        if status[anchor] == Status::Removed {
            continue;
        }
        let mut members: Vec<usize> = neighbors[anchor]
            .iter()
            .copied()
            .filter(|&j| j != anchor && status[j] != Status::Removed)
            .collect();
        if members.is_empty() {
            status[anchor] = Status::Kept;
            continue;
        }
        members.push(anchor);
        members.sort_unstable();
        members.dedup();

        let Some(representative) = pick_representative(&members, center_distance) else {
            continue;
        };
        for &m in &members {
            status[m] = if m == representative {
                Status::Kept
            } else {
                Status::Removed
            };
        }
        clusters.push(RawCluster {
            anchor,
            members,
            representative,
        });
    }

    let survivors = (0..n).filter(|&i| status[i] == Status::Kept).collect();
    Clustering {
        clusters,
        survivors,
    }
}

/// Connected components of the within-threshold relation.
///
/// Independent of processing order; the anchor of each cluster is its
/// lowest index.
pub(crate) fn cluster_transitive(neighbors: &[Vec<usize>], center_distance: &[f64]) -> Clustering {
    let n = neighbors.len();
    let mut uf = UnionFind::<usize>::new(n);
    for (i, nbrs) in neighbors.iter().enumerate() {
        for &j in nbrs {
            uf.union(i, j);
        }
    }

    let mut components: BTreeMap<usize, Vec<usize>> = BTreeMap::new();
    for i in 0..n {
        components.entry(uf.find_mut(i)).or_default().push(i);
    }
    let mut groups: Vec<Vec<usize>> = components.into_values().collect();
    groups.sort_unstable_by_key(|g| g[0]);

    let mut clustering = Clustering::default();
    for members in groups {
        if members.len() == 1 {
            clustering.survivors.push(members[0]);
            continue;
        }
        let Some(representative) = pick_representative(&members, center_distance) else {
            continue;
        };
        clustering.survivors.push(representative);
        clustering.clusters.push(RawCluster {
            anchor: members[0],
            members,
            representative,
        });
    }
    clustering.survivors.sort_unstable();
    clustering
}
