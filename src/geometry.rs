//! Angle and polar-coordinate helpers shared by the layout engines.

pub const FULL_TURN: f32 = 360.0;

/// Modulo with sign correction: the result always has the sign of `modulus`.
pub fn modulo(value: f32, modulus: f32) -> f32 {
    if modulus == 0.0 {
        return 0.0;
    }
    ((value % modulus) + modulus) % modulus
}

/// Normalize an angle in degrees into `[0, 360)`.
pub fn normalize_angle(degrees: f32) -> f32 {
    modulo(degrees, FULL_TURN)
}

/// Convert a fan-chart polar position to screen coordinates.
///
/// Angle 0 points up: the node transform is rotate(angle - 90deg) followed by
/// translate(radius, 0) from the center.
pub fn fan_point(center: (f32, f32), angle_deg: f32, radius: f32) -> (f32, f32) {
    let theta = (angle_deg - 90.0).to_radians();
    (
        center.0 + radius * theta.cos(),
        center.1 + radius * theta.sin(),
    )
}

/// Sample the radial "diagonal" between two polar positions.
///
/// The curve is a cubic Bezier interpolated in (angle, radius) space with both
/// control points at the mid radius, then mapped to screen coordinates. This
/// keeps links curved along the rings instead of cutting straight across them.
pub fn radial_diagonal(
    center: (f32, f32),
    from: (f32, f32),
    to: (f32, f32),
    segments: usize,
) -> Vec<(f32, f32)> {
    let (a0, r0) = from;
    let (a1, r1) = to;
    let rm = (r0 + r1) / 2.0;
    let steps = segments.max(2);
    let mut points = Vec::with_capacity(steps + 1);
    for step in 0..=steps {
        let t = step as f32 / steps as f32;
        let angle = cubic(a0, a0, a1, a1, t);
        let radius = cubic(r0, rm, rm, r1, t);
        points.push(fan_point(center, angle, radius));
    }
    points
}

fn cubic(p0: f32, p1: f32, p2: f32, p3: f32, t: f32) -> f32 {
    let u = 1.0 - t;
    u * u * u * p0 + 3.0 * u * u * t * p1 + 3.0 * u * t * t * p2 + t * t * t * p3
}
