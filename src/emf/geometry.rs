//! Hexagon vertex geometry for the two rotation families a barcode hexagon can use.

/// 0.86 approximates `cos(30°)` (≈0.866), matching the reference implementation's constant.
const COS_30_APPROX: f64 = 0.86;

/// Six `(x, y)` vertices for a hexagon centred at `(x, y)` with the given radius and rotation.
///
/// Rotation 0 or 180 produces a flat-top hexagon (horizontal offset `0.86r`); rotation 60 or 120
/// produces a pointy-top hexagon (vertical offset `0.86r`).
pub fn hexagon_vertices(x: f64, y: f64, r: f64, rotation: u16) -> [(f64, f64); 6] {
    match rotation {
        0 | 180 => [
            (x, y + r),
            (x + COS_30_APPROX * r, y + 0.5 * r),
            (x + COS_30_APPROX * r, y - 0.5 * r),
            (x, y - r),
            (x - COS_30_APPROX * r, y - 0.5 * r),
            (x - COS_30_APPROX * r, y + 0.5 * r),
        ],
        _ => [
            (x - r, y),
            (x - 0.5 * r, y + COS_30_APPROX * r),
            (x + 0.5 * r, y + COS_30_APPROX * r),
            (x + r, y),
            (x + 0.5 * r, y - COS_30_APPROX * r),
            (x - 0.5 * r, y - COS_30_APPROX * r),
        ],
    }
}

/// Bounding box `(left, top, right, bottom)` of a hexagon produced by [`hexagon_vertices`],
/// derived positionally from the fixed vertex order rather than by scanning all six points (the
/// 4th vertex is always topmost/bottommost and the 1st/3rd are always the horizontal extremes),
/// matching the reference implementation.
pub fn hexagon_bounds(vertices: &[(f64, f64); 6]) -> (f64, f64, f64, f64) {
    let (ax, _) = vertices[0];
    let (_, dy) = vertices[3];
    let (_, ay) = vertices[0];
    let (ex, _) = vertices[4];
    let (cx, _) = vertices[2];
    (ex.min(ax), dy, cx.max(ax), ay)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flat_top_vertices_at_rotation_zero() {
        let v = hexagon_vertices(0.0, 0.0, 10.0, 0);
        assert_eq!(v[0], (0.0, 10.0));
        assert_eq!(v[3], (0.0, -10.0));
        assert!((v[1].0 - 8.6).abs() < 1e-9);
    }

    #[test]
    fn pointy_top_vertices_at_rotation_sixty() {
        let v = hexagon_vertices(0.0, 0.0, 10.0, 60);
        assert_eq!(v[0], (-10.0, 0.0));
        assert_eq!(v[3], (10.0, 0.0));
        assert!((v[1].1 - 8.6).abs() < 1e-9);
    }
}
