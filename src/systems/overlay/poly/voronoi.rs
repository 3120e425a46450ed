use std::collections::HashMap;

use bevy::prelude::*;
use spade::handles::FixedVertexHandle;
use spade::{DelaunayTriangulation, LastUsedVertexHintGenerator, Point2, Triangulation as _};

use crate::systems::overlay::Polygon;
use super::utils::{clip_to_bisector, polygon_area, rect_polygon};

/// Clipped Voronoi cells for a set of generator points,
/// one entry per input index, in input order.
///
/// A cell is `None` when its point cannot take part in the diagram: non finite coordinates,
/// a repeat of an earlier point, or a cell with no area left inside `clip`.
/// Callers are expected to skip those entries.
pub fn cell_polygons(points: &[Vec2], clip: Rect) -> Vec<Option<Polygon>> {
    let mut triangulation: DelaunayTriangulation<Point2<f64>, (), (), (), LastUsedVertexHintGenerator> = DelaunayTriangulation::new();

    // input index -> vertex, first insertion of a position owns it
    let mut handles: Vec<Option<FixedVertexHandle>> = Vec::with_capacity(points.len());
    let mut owners: HashMap<FixedVertexHandle, usize> = HashMap::with_capacity(points.len());

    for (idx, p) in points.iter().enumerate() {
        if !p.is_finite() {
            handles.push(None);
            continue;
        }

        match triangulation.insert(Point2::new(p.x as f64, p.y as f64)) {
            Ok(handle) if !owners.contains_key(&handle) => {
                owners.insert(handle, idx);
                handles.push(Some(handle));
            }
            Ok(_) => handles.push(None), // coincides with an earlier point
            Err(e) => {
                warn!("skipping voronoi generator {} at {:?}: {:?}", idx, p, e);
                handles.push(None);
            }
        }
    }

    let bounds = rect_polygon(clip);

    handles
        .iter()
        .enumerate()
        .map(|(idx, handle)| {
            let handle = (*handle)?;
            let site = points[idx];

            // the Delaunay neighbours are exactly the generators sharing a cell edge
            let mut cell = bounds.clone();
            for edge in triangulation.vertex(handle).out_edges() {
                let other = edge.to().position();
                cell = clip_to_bisector(&cell, site, Vec2::new(other.x as f32, other.y as f32));
                if cell.len() < 3 {
                    return None;
                }
            }

            if polygon_area(&cell).abs() < f32::EPSILON {
                return None; // skip degenerate cells
            }
            Some(cell)
        })
        .collect()
}
