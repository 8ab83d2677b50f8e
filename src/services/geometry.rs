/// Geometry kernel
///
/// Pure functions over landmarks:
/// - Joint angle at a vertex (image plane and 3D)
/// - Euclidean distance and midpoints
/// - Degenerate segment detection

use crate::models::landmark::Landmark;

/// Landmarks closer than this are treated as coincident
pub const MIN_SEGMENT_LENGTH: f32 = 1e-4;

fn angle_from_vectors(v1: [f32; 3], v2: [f32; 3]) -> f32 {
    let dot: f32 = v1.iter().zip(v2.iter()).map(|(a, b)| a * b).sum();
    let mag1 = v1.iter().map(|c| c * c).sum::<f32>().sqrt();
    let mag2 = v2.iter().map(|c| c * c).sum::<f32>().sqrt();

    let denominator = mag1 * mag2;
    if !denominator.is_finite() || denominator <= f32::EPSILON {
        return 0.0;
    }

    let cos_angle = (dot / denominator).clamp(-1.0, 1.0);
    let degrees = cos_angle.acos().to_degrees();
    if degrees.is_finite() {
        degrees
    } else {
        0.0
    }
}

/// Angle at vertex `b` formed by rays to `a` and `c`, in degrees (0-180), using x and y.
///
/// Zero-length rays yield 0° rather than NaN.
pub fn angle(a: &Landmark, b: &Landmark, c: &Landmark) -> f32 {
    angle_from_vectors([a.x - b.x, a.y - b.y, 0.0], [c.x - b.x, c.y - b.y, 0.0])
}

/// Angle at vertex `b` including depth
pub fn angle_3d(a: &Landmark, b: &Landmark, c: &Landmark) -> f32 {
    angle_from_vectors(
        [a.x - b.x, a.y - b.y, a.z - b.z],
        [c.x - b.x, c.y - b.y, c.z - b.z],
    )
}

/// Euclidean distance in the image plane
pub fn distance(a: &Landmark, b: &Landmark) -> f32 {
    let dx = a.x - b.x;
    let dy = a.y - b.y;
    (dx * dx + dy * dy).sqrt()
}

/// Component-wise mean; visibility is the weaker of the two
pub fn midpoint(a: &Landmark, b: &Landmark) -> Landmark {
    Landmark {
        x: (a.x + b.x) / 2.0,
        y: (a.y + b.y) / 2.0,
        z: (a.z + b.z) / 2.0,
        visibility: a.visibility.min(b.visibility),
    }
}

pub fn segment_is_degenerate(a: &Landmark, b: &Landmark) -> bool {
    !(distance(a, b) >= MIN_SEGMENT_LENGTH)
}

/// Signed angular deviation of `b` from the straight line `a`-`c`.
///
/// Positive when `b` lies below the line in image coordinates (larger `y`).
pub fn signed_deviation(a: &Landmark, b: &Landmark, c: &Landmark) -> f32 {
    let deviation = 180.0 - angle(a, b, c);
    let cross = (c.x - a.x) * (b.y - a.y) - (c.y - a.y) * (b.x - a.x);
    // with a left of c, a positive cross product puts b below the line
    let below = if c.x >= a.x { cross > 0.0 } else { cross < 0.0 };
    if below {
        deviation
    } else {
        -deviation
    }
}
