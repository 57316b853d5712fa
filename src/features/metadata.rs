use super::grid::Grid;
use crate::config::SHAPE_DESCRIPTORS;

/// Computes the metadata descriptors of a pooled grid.
///
/// Layout (`2 * side + 28` values):
/// - `side` row means, then `side` column means;
/// - ink mass, centroid x/y, variance x/y, covariance;
/// - bounding box left/right/top/bottom, width, height, aspect;
/// - quadrant masses (top-left, top-right, bottom-left, bottom-right);
/// - horizontal and vertical symmetry, horizontal and vertical transition rates;
/// - fill ratio, max row mean, max column mean, arg-max row, arg-max column;
/// - centre mass, border mass.
///
/// Coordinates are normalized to `[0, 1]`. A blank grid yields finite values
/// (centroid at 0.5, empty bounding box).
pub fn descriptors(grid: &Grid, ink_threshold: f64) -> Vec<f64> {
    let s = grid.side;
    let sf = s as f64;
    let mut out = Vec::with_capacity(2 * s + SHAPE_DESCRIPTORS);

    let row_means: Vec<f64> = (0..s).map(|r| grid.row(r).iter().sum::<f64>() / sf).collect();
    let col_means: Vec<f64> = (0..s)
        .map(|c| (0..s).map(|r| grid.get(r, c)).sum::<f64>() / sf)
        .collect();
    out.extend_from_slice(&row_means);
    out.extend_from_slice(&col_means);

    let total: f64 = grid.cells.iter().sum();
    let coord = |i: usize| (i as f64 + 0.5) / sf;
    let share = |part: f64| if total > 0.0 { part / total } else { 0.0 };

    // Moments
    let (mut sx, mut sy) = (0.0, 0.0);
    for r in 0..s {
        for c in 0..s {
            let v = grid.get(r, c);
            sx += v * coord(c);
            sy += v * coord(r);
        }
    }
    let (cx, cy) = if total > 0.0 { (sx / total, sy / total) } else { (0.5, 0.5) };
    let (mut vx, mut vy, mut cov) = (0.0, 0.0, 0.0);
    for r in 0..s {
        for c in 0..s {
            let v = grid.get(r, c);
            let (dx, dy) = (coord(c) - cx, coord(r) - cy);
            vx += v * dx * dx;
            vy += v * dy * dy;
            cov += v * dx * dy;
        }
    }
    out.extend_from_slice(&[total / (sf * sf), cx, cy, share(vx), share(vy), share(cov)]);

    // Bounding box of ink cells
    let inked = |r: usize, c: usize| grid.get(r, c) >= ink_threshold;
    let mut bbox: Option<(usize, usize, usize, usize)> = None;
    for r in 0..s {
        for c in 0..s {
            if inked(r, c) {
                bbox = Some(match bbox {
                    None => (c, c, r, r),
                    Some((l, rt, t, b)) => (l.min(c), rt.max(c), t.min(r), b.max(r)),
                });
            }
        }
    }
    let (left, right, top, bottom) = match bbox {
        Some((l, rt, t, b)) => (l as f64 / sf, (rt + 1) as f64 / sf, t as f64 / sf, (b + 1) as f64 / sf),
        None => (0.0, 0.0, 0.0, 0.0),
    };
    let (width, height) = (right - left, bottom - top);
    let aspect = if width + height > 0.0 { width / (width + height) } else { 0.5 };
    out.extend_from_slice(&[left, right, top, bottom, width, height, aspect]);

    // Quadrants
    let half = s / 2;
    let mut quads = [0.0; 4];
    for r in 0..s {
        for c in 0..s {
            let q = usize::from(r >= half) * 2 + usize::from(c >= half);
            quads[q] += grid.get(r, c);
        }
    }
    out.extend(quads.iter().map(|&q| share(q)));

    // Mirror symmetry
    let (mut hdiff, mut vdiff) = (0.0, 0.0);
    for r in 0..s {
        for c in 0..s {
            hdiff += (grid.get(r, c) - grid.get(r, s - 1 - c)).abs();
            vdiff += (grid.get(r, c) - grid.get(s - 1 - r, c)).abs();
        }
    }
    out.push(1.0 - hdiff / (sf * sf));
    out.push(1.0 - vdiff / (sf * sf));

    // Ink/background transitions along rows and columns
    let (mut htrans, mut vtrans) = (0usize, 0usize);
    for a in 0..s {
        for b in 1..s {
            htrans += usize::from(inked(a, b) != inked(a, b - 1));
            vtrans += usize::from(inked(b, a) != inked(b - 1, a));
        }
    }
    let pairs = (s * (s - 1)).max(1) as f64;
    out.push(htrans as f64 / pairs);
    out.push(vtrans as f64 / pairs);

    let filled = (0..s * s).filter(|&i| inked(i / s, i % s)).count();
    out.push(filled as f64 / (sf * sf));

    let (arg_row, max_row) = first_max(&row_means);
    let (arg_col, max_col) = first_max(&col_means);
    let last = (s - 1).max(1) as f64;
    out.extend_from_slice(&[max_row, max_col, arg_row as f64 / last, arg_col as f64 / last]);

    // Centre block and outer ring
    let q = s / 4;
    let (mut centre, mut border) = (0.0, 0.0);
    for r in 0..s {
        for c in 0..s {
            let v = grid.get(r, c);
            if (q..s - q).contains(&r) && (q..s - q).contains(&c) {
                centre += v;
            }
            if r == 0 || c == 0 || r == s - 1 || c == s - 1 {
                border += v;
            }
        }
    }
    out.push(share(centre));
    out.push(share(border));

    debug_assert_eq!(out.len(), 2 * s + SHAPE_DESCRIPTORS);
    out
}

/// Index and value of the first maximum.
fn first_max(values: &[f64]) -> (usize, f64) {
    let mut best = (0, f64::NEG_INFINITY);
    for (i, &v) in values.iter().enumerate() {
        if v > best.1 {
            best = (i, v);
        }
    }
    best
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_grid_is_finite() {
        let d = descriptors(&Grid::zeros(16), 0.25);
        assert_eq!(d.len(), 60);
        assert!(d.iter().all(|v| v.is_finite()));
        // centroid of an empty grid sits at the centre
        assert_eq!(d[33], 0.5);
        assert_eq!(d[34], 0.5);
    }

    #[test]
    fn single_cell_bounding_box() {
        let mut g = Grid::zeros(4);
        g.set(1, 2, 1.0);
        let d = descriptors(&g, 0.5);
        let shape = &d[8..];
        // left, right, top, bottom
        assert_eq!(&shape[6..10], &[0.5, 0.75, 0.25, 0.5]);
        // all ink in the top-right quadrant
        assert_eq!(shape[14], 1.0);
        assert_eq!(shape[13], 0.0);
    }
}
