// src/search/splice.rs

use bevy_prng::WyRand;
use log::debug;

use crate::economy::Catalog;
use crate::error::PathError;
use crate::mechanics::stoch;
use crate::search::path::Path;
use crate::search::policy::Policy;

/// Parents shorter than this are returned unchanged.
pub const MIN_SPLICE_LEN: usize = 3;

/// Interior positions `(i, j)` where the state after step `i` of `a` matches
/// the state after step `j` of `b`. Each `i` keeps only its first match.
pub fn splice_points(catalog: &Catalog, a: &Path, b: &Path) -> Result<Vec<(usize, usize)>, PathError> {
    let ta = a.trajectory(catalog)?;
    let tb = b.trajectory(catalog)?;
    let interior = |len: usize| 1..len.saturating_sub(1);

    let mut points = Vec::new();
    for i in interior(ta.len()) {
        if let Some(j) = interior(tb.len()).find(|&j| ta[i].is_equivalent(&tb[j])) {
            points.push((i, j));
        }
    }
    Ok(points)
}

/// Pick the point nearest both midpoints. Ties are broken by coin flip, and
/// after each improvement the scan stops early with probability `early_exit`.
fn choose_point(points: &[(usize, usize)], len_a: usize, len_b: usize, early_exit: f64, rng: &mut WyRand) -> Option<(usize, usize)> {
    let mid_a = len_a as f64 / 2.0;
    let mid_b = len_b as f64 / 2.0;
    let distance = |(i, j): (usize, usize)| (i as f64 - mid_a).abs() + (j as f64 - mid_b).abs();

    let mut best: Option<((usize, usize), f64)> = None;
    for &p in points {
        let d = distance(p);
        let Some((_, bd)) = best else {
            best = Some((p, d));
            continue;
        };
        if d < bd {
            best = Some((p, d));
            if stoch::bernoulli(rng, early_exit) {
                break;
            }
        } else if d == bd && stoch::bernoulli(rng, 0.5) {
            best = Some((p, d));
        }
    }
    best.map(|(p, _)| p)
}

/// Exchange suffixes at an aligned point. Always returns two valid paths; when
/// no exchange is possible the parents come back unchanged.
///
/// The first child keeps `a`'s prefix and takes `b`'s suffix and milestone;
/// the second is the mirror image.
pub fn splice(catalog: &Catalog, a: &Path, b: &Path, policy: &Policy, early_exit: f64, rng: &mut WyRand) -> (Path, Path) {
    let parents = || (a.clone(), b.clone());
    if a.len() < MIN_SPLICE_LEN || b.len() < MIN_SPLICE_LEN {
        return parents();
    }

    let points = match splice_points(catalog, a, b) {
        Ok(points) => points,
        Err(e) => {
            debug!("splice: parent failed to replay: {e}");
            return parents();
        }
    };
    let Some((i, j)) = choose_point(&points, a.len(), b.len(), early_exit, rng) else {
        return parents();
    };

    let (xa, xb) = (a.actions(), b.actions());
    let first: Vec<_> = xa[..=i].iter().chain(&xb[j + 1..]).cloned().collect();
    let second: Vec<_> = xb[..=j].iter().chain(&xa[i + 1..]).cloned().collect();

    let first = Path::new(catalog, a.initial().clone(), b.milestone(), first, policy, rng);
    let second = Path::new(catalog, b.initial().clone(), a.milestone(), second, policy, rng);
    match (first, second) {
        (Ok(c1), Ok(c2)) => (c1, c2),
        (Err(e), _) | (_, Err(e)) => {
            debug!("splice at ({i}, {j}) discarded: {e}");
            parents()
        }
    }
}
