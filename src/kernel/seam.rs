//! Cut-in seam stitching: the heart of `flattenTree`.
//!
//! Ported directly from `ClipperHelpers::flattenTree` /
//! `convertHolesToCutIns` / `prepareHoles` / `rotateCutInHole` /
//! `addCutInToPath` / `insertConnectionPointToPath` / `calcIntersectionPos`
//! in the original C++ source. Converts an outer contour plus its holes into
//! a single self-touching closed path by splicing each hole into the outer
//! contour at a vertical "seam".

use super::{signed_area, IntPath, PolyNode};
use crate::error::{DrcError, DrcResult};

/// Flattens one outline node (its own contour plus every hole child) into a
/// single closed path.
pub(super) fn flatten_outline(outline: &PolyNode) -> DrcResult<IntPath> {
    let mut base = outline.contour.clone();
    let holes: Vec<IntPath> = outline
        .children
        .iter()
        .filter(|c| c.is_hole)
        .map(|c| c.contour.clone())
        .collect();
    for hole in prepare_holes(&holes) {
        base = add_cut_in_to_path(&base, &hole)?;
    }
    Ok(base)
}

/// Filters out degenerate holes (`< 3` vertices), rotates each to start at
/// its lowest-Y vertex, then sorts ascending by that vertex's Y so seams are
/// spliced in an order that never overlaps.
fn prepare_holes(holes: &[IntPath]) -> Vec<IntPath> {
    let mut rotated: Vec<IntPath> = holes
        .iter()
        .filter(|h| h.len() >= 3)
        .map(|h| rotate_cut_in_hole(h))
        .collect();
    rotated.sort_by_key(|h| h[0].1);
    rotated
}

/// Rotates `hole` so that it starts at its connection point (lowest-Y
/// vertex, ties broken by lowest X), after stripping a duplicated closing
/// vertex if present.
fn rotate_cut_in_hole(hole: &IntPath) -> IntPath {
    let mut ring = hole.clone();
    if ring.len() > 1 && ring.first() == ring.last() {
        ring.pop();
    }
    let idx = connection_point_index(&ring);
    ring.rotate_left(idx);
    ring
}

fn connection_point_index(ring: &IntPath) -> usize {
    ring.iter()
        .enumerate()
        .min_by(|(_, a), (_, b)| a.1.cmp(&b.1).then(a.0.cmp(&b.0)))
        .map_or(0, |(i, _)| i)
}

/// Splices `hole` into `outline` at the nearest vertical-projection crossing
/// below the hole's entry point (its first vertex, already rotated to the
/// lowest-Y vertex by [`prepare_holes`]).
fn add_cut_in_to_path(outline: &IntPath, hole: &IntPath) -> DrcResult<IntPath> {
    let entry = hole[0];
    let (idx, crossing) = insert_connection_point(outline, entry)?;

    let mut result = IntPath::with_capacity(outline.len() + hole.len() + 3);
    result.extend_from_slice(&outline[..=idx]);
    result.push(entry);
    result.extend_from_slice(&hole[1..]);
    result.push(entry);
    result.push(crossing);
    result.extend_from_slice(&outline[idx + 1..]);
    Ok(result)
}

/// Finds the edge of `path` whose vertical projection at `entry.0` crosses
/// directly below `entry.1` with the largest such crossing Y (the nearest
/// crossing beneath the entry point), and returns `(index_of_edge_start,
/// crossing_point)`. The caller inserts `crossing_point` as a new vertex
/// right after that index.
fn insert_connection_point(path: &IntPath, entry: (i64, i64)) -> DrcResult<(usize, (i64, i64))> {
    let n = path.len();
    let mut best: Option<(usize, i64)> = None;
    for i in 0..n {
        let p1 = path[i];
        let p2 = path[(i + 1) % n];
        if let Some(y) = calc_intersection_y(p1, p2, entry.0) {
            if y < entry.1 && best.map_or(true, |(_, best_y)| y > best_y) {
                best = Some((i, y));
            }
        }
    }
    let (idx, y) = best.ok_or_else(|| {
        DrcError::logic("cut-in seam: no vertical crossing found below hole entry point")
    })?;
    Ok((idx, (entry.0, y)))
}

/// Vertical line `x = x0` crossing segment `p1 -> p2`, if any, linearly
/// interpolating the crossing Y. Vertical segments never produce a unique
/// crossing and are skipped.
fn calc_intersection_y(p1: (i64, i64), p2: (i64, i64), x0: i64) -> Option<i64> {
    let (x1, y1) = (p1.0 as f64, p1.1 as f64);
    let (x2, y2) = (p2.0 as f64, p2.1 as f64);
    if (x1 - x2).abs() < f64::EPSILON {
        return None;
    }
    let lo = x1.min(x2);
    let hi = x1.max(x2);
    let x = x0 as f64;
    if x < lo || x > hi {
        return None;
    }
    let t = (x - x1) / (x2 - x1);
    Some((y1 + t * (y2 - y1)).round() as i64)
}

#[allow(dead_code)]
fn is_ccw(ring: &IntPath) -> bool {
    signed_area(ring) > 0.0
}
