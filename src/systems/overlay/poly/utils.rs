// UTILS

use bevy::prelude::*;
use crate::systems::overlay::Polygon;

/// Computes the signed area of a polygon
/// # Returns the polygon's area as an `f32`. Returns 0.0 for polygons with fewer than 3 vertices.
pub fn polygon_area(polygon: &[Vec2]) -> f32 {
    if polygon.len() < 3 {
        return 0.0;
    }

    let n = polygon.len();
    let mut area = 0.0;

    for i in 0..n {
        let j = (i + 1) % n;
        area += polygon[i].x * polygon[j].y - polygon[j].x * polygon[i].y;
    }

    area / 2.0
}

/// The four corners of a rectangle, wound the same way as the clipped cells.
pub fn rect_polygon(rect: Rect) -> Polygon {
    vec![
        rect.min,
        Vec2::new(rect.max.x, rect.min.y),
        rect.max,
        Vec2::new(rect.min.x, rect.max.y),
    ]
}

/// Keeps the part of `polygon` that is at least as close to `site` as to `other`.
/// One Sutherland-Hodgman pass against the perpendicular bisector of the two points.
pub fn clip_to_bisector(polygon: &[Vec2], site: Vec2, other: Vec2) -> Polygon {
    let normal = other - site;
    let mid = (site + other) * 0.5;
    // signed distance along the normal, <= 0 means on the site's side
    let side = |p: Vec2| (p - mid).dot(normal);

    let mut out = Vec::with_capacity(polygon.len() + 1);
    if polygon.is_empty() {
        return out;
    }

    let mut prev = polygon[polygon.len() - 1];
    let mut prev_side = side(prev);
    for &cur in polygon {
        let cur_side = side(cur);
        let cur_in = cur_side <= 0.0;
        let prev_in = prev_side <= 0.0;

        if cur_in != prev_in {
            // edge crosses the bisector
            let t = prev_side / (prev_side - cur_side);
            out.push(prev + (cur - prev) * t);
        }
        if cur_in {
            out.push(cur);
        }

        prev = cur;
        prev_side = cur_side;
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn square_area() {
        let square = rect_polygon(Rect::new(0.0, 0.0, 2.0, 3.0));
        assert_eq!(polygon_area(&square), 6.0);
    }

    #[test]
    fn degenerate_area_is_zero() {
        assert_eq!(polygon_area(&[Vec2::ZERO, Vec2::ONE]), 0.0);
    }

    #[test]
    fn bisector_halves_the_square() {
        let square = rect_polygon(Rect::new(0.0, 0.0, 10.0, 10.0));
        let left = clip_to_bisector(&square, Vec2::new(2.0, 5.0), Vec2::new(8.0, 5.0));
        assert!((polygon_area(&left) - 50.0).abs() < 1e-3);
        assert!(left.iter().all(|p| p.x <= 5.0 + 1e-4));
    }

    #[test]
    fn far_bisector_keeps_everything() {
        let square = rect_polygon(Rect::new(0.0, 0.0, 10.0, 10.0));
        let clipped = clip_to_bisector(&square, Vec2::new(5.0, 5.0), Vec2::new(100.0, 5.0));
        assert_eq!(clipped.len(), 4);
        assert!((polygon_area(&clipped) - 100.0).abs() < 1e-3);
    }

    #[test]
    fn site_outside_loses_the_square() {
        let square = rect_polygon(Rect::new(0.0, 0.0, 10.0, 10.0));
        let clipped = clip_to_bisector(&square, Vec2::new(-100.0, 5.0), Vec2::new(-50.0, 5.0));
        assert!(clipped.is_empty());
    }
}
