//! Anomaly separation post-process

use crate::catalog::tiles::TileCatalog;
use crate::generation::slices::Slice;
use crate::layout::shape::SliceShape;

fn is_anomaly(slice: &Slice, index: usize, catalog: &dyn TileCatalog) -> bool {
    slice
        .tiles()
        .get(index)
        .and_then(|&id| catalog.tile(id))
        .is_some_and(|t| t.anomaly)
}

/// Non-anomaly position that `moving` can trade with without touching any
/// anomaly other than itself
fn free_position(
    slice: &Slice,
    shape: &SliceShape,
    catalog: &dyn TileCatalog,
    len: usize,
    moving: usize,
) -> Option<usize> {
    (0..len).find(|&c| {
        c != moving
            && !is_anomaly(slice, c, catalog)
            && (0..len).all(|x| {
                x == moving || !is_anomaly(slice, x, catalog) || !shape.body_adjacent(c, x)
            })
    })
}

/// Move anomalies apart where two sit on adjacent shape positions.
///
/// For each adjacent anomaly pair, one of the two trades places with a
/// non-anomaly whose position touches no other anomaly; the second of the
/// pair is tried first. Best effort: a pair with no such partner is left as
/// is. Returns the number of swaps made.
pub fn separate_anomalies(slice: &mut Slice, shape: &SliceShape, catalog: &dyn TileCatalog) -> usize {
    let len = slice.len().min(shape.body_len());
    let mut swaps = 0;

    for (a, b) in shape.adjacent_body_pairs() {
        if b >= len || !is_anomaly(slice, a, catalog) || !is_anomaly(slice, b, catalog) {
            continue;
        }

        let target = [b, a].into_iter().find_map(|moving| {
            free_position(slice, shape, catalog, len, moving).map(|c| (moving, c))
        });

        match target {
            Some((moving, c)) => {
                tracing::debug!(
                    "Separating anomalies: moving {} from position {} to {}",
                    slice.tiles()[moving],
                    moving,
                    c
                );
                slice.swap(moving, c);
                swaps += 1;
            }
            None => tracing::debug!("No free position to separate anomalies {} and {}", a, b),
        }
    }
    swaps
}

/// Adjacent shape positions that both hold anomalies
pub fn adjacent_anomalies(
    slice: &Slice,
    shape: &SliceShape,
    catalog: &dyn TileCatalog,
) -> Vec<(usize, usize)> {
    shape
        .adjacent_body_pairs()
        .into_iter()
        .filter(|&(a, b)| is_anomaly(slice, a, catalog) && is_anomaly(slice, b, catalog))
        .collect()
}
