//! Integer-exact geometry helpers shared by all object variants.

/// Axis-aligned bounding rectangle in schematic coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Bounds {
    pub left: i32,
    pub top: i32,
    pub right: i32,
    pub bottom: i32,
}

/// Rotates `(x, y)` about the origin by `angle` degrees.
///
/// `angle` must be one of 0, 90, 180 or 270. Sine and cosine come from an
/// exact substitution table, so integer inputs rotate with no drift.
///
/// # Panics
///
/// Panics on any other angle; callers normalize first.
pub fn rotate_point_90(x: i32, y: i32, angle: i32) -> (i32, i32) {
    let (cos, sin) = match angle {
        0 => (1, 0),
        90 => (0, 1),
        180 => (-1, 0),
        270 => (0, -1),
        _ => panic!("rotation angle {angle} is not one of 0, 90, 180, 270"),
    };
    (x * cos - y * sin, x * sin + y * cos)
}
