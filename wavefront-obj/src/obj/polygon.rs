//! Face, edge, and curve-index-list parsing: the part of the format where 1-based, negative, and
//! relative indices all have to collapse into plain zero-based offsets into the global vertex
//! tables.

use crate::diagnostic::{self, Diagnostic, LineRange};
use crate::text::parse_int;
use crate::types::{Geometry, GlobalVertices, PolyCorner, PolyElem, VertexIndexOffset};

/// Normalizes a raw OBJ index (1-based positive, or negative meaning "n-th from the end of what
/// has been seen so far") into a zero-based index. `offset` is only applied to position indices:
/// UV and normal indices are always relative to the whole document, never to the current
/// geometry.
fn normalize_index(raw: i64, current_len: usize, offset: usize) -> i64 {
    if raw < 0 {
        raw + current_len as i64
    } else {
        raw - offset as i64 - 1
    }
}

fn in_range(idx: i64, len: usize) -> bool {
    idx >= 0 && (idx as usize) < len
}

/// Parses an `f` directive's corner list, normalizing and bounds-checking each `v[/vt[/vn]]`
/// triple. A face with any corner that fails to parse or falls out of range is dropped entirely
/// (its corners are rolled back) rather than partially recorded.
pub(super) fn add_polygon(
    geom: &mut Geometry,
    rest_line: &str,
    global: &GlobalVertices,
    offsets: &VertexIndexOffset,
    material_index: i32,
    group_index: i32,
    shaded_smooth: bool,
    lines: LineRange,
) {
    let orig_corners_len = geom.face_corners.len();
    let mut face = PolyElem {
        start_index: orig_corners_len,
        corner_count: 0,
        material_index,
        vertex_group_index: -1,
        shaded_smooth,
    };
    if group_index >= 0 {
        face.vertex_group_index = group_index;
        geom.use_vertex_groups = true;
    }

    let mut face_invalid = false;
    let mut remaining = rest_line;

    while !remaining.trim_start().is_empty() {
        remaining = remaining.trim_start();
        let mut corner = PolyCorner::new();

        let Some((vert_index, after_v)) = parse_int(remaining) else {
            diagnostic::report(&Diagnostic::FaceIndexParseError { lines: lines.clone() });
            face_invalid = true;
            break;
        };
        remaining = after_v;

        let mut got_uv = false;
        let mut got_normal = false;
        if let Some(after_slash) = remaining.strip_prefix('/') {
            remaining = after_slash;
            if !remaining.starts_with('/') {
                if let Some((uv_index, after_uv)) = parse_int(remaining) {
                    corner.uv_vert_index = uv_index as i32;
                    got_uv = true;
                    remaining = after_uv;
                }
            }
            if let Some(after_slash2) = remaining.strip_prefix('/') {
                remaining = after_slash2;
                if let Some((normal_index, after_n)) = parse_int(remaining) {
                    corner.vertex_normal_index = normal_index as i32;
                    got_normal = true;
                    remaining = after_n;
                }
            }
        }

        corner.vert_index = normalize_index(vert_index, global.positions.len(), offsets.0) as i32;
        if !in_range(corner.vert_index as i64, global.positions.len()) {
            diagnostic::report(&Diagnostic::face_index_range(
                lines.clone(),
                "vertex",
                corner.vert_index as i64,
                global.positions.len(),
            ));
            face_invalid = true;
        }

        if got_uv {
            corner.uv_vert_index = normalize_index(corner.uv_vert_index as i64, global.uv_vertices.len(), 0) as i32;
            if !in_range(corner.uv_vert_index as i64, global.uv_vertices.len()) {
                diagnostic::report(&Diagnostic::face_index_range(
                    lines.clone(),
                    "uv",
                    corner.uv_vert_index as i64,
                    global.uv_vertices.len(),
                ));
                face_invalid = true;
            }
        }

        if got_normal {
            corner.vertex_normal_index =
                normalize_index(corner.vertex_normal_index as i64, global.vertex_normals.len(), 0) as i32;
            if !in_range(corner.vertex_normal_index as i64, global.vertex_normals.len()) {
                diagnostic::report(&Diagnostic::face_index_range(
                    lines.clone(),
                    "normal",
                    corner.vertex_normal_index as i64,
                    global.vertex_normals.len(),
                ));
                face_invalid = true;
            }
        }

        geom.face_corners.push(corner);
        face.corner_count += 1;
    }

    if face.corner_count < 3 {
        diagnostic::report(&Diagnostic::FaceTooFewCorners { lines, n: face.corner_count });
        face_invalid = true;
    }

    if face_invalid {
        geom.face_corners.truncate(orig_corners_len);
    } else {
        geom.face_elements.push(face);
        geom.total_loops += face.corner_count;
    }
}

/// Parses an `l` directive (a polyline, stored here as a chain of 2-index edges).
pub(super) fn add_edge(
    geom: &mut Geometry,
    rest_line: &str,
    offsets: &VertexIndexOffset,
    global: &GlobalVertices,
    lines: LineRange,
) {
    let fields: Vec<&str> = rest_line.split_whitespace().collect();
    if fields.len() < 2 {
        diagnostic::report(&Diagnostic::EdgeTooFewIndices { lines });
        return;
    }

    let Some(v1) = fields[0].parse::<i64>().ok() else {
        diagnostic::report(&Diagnostic::FaceIndexParseError { lines });
        return;
    };
    let Some(v2) = fields[1].parse::<i64>().ok() else {
        diagnostic::report(&Diagnostic::FaceIndexParseError { lines });
        return;
    };

    let v1 = normalize_index(v1, global.positions.len(), offsets.0);
    let v2 = normalize_index(v2, global.positions.len(), offsets.0);
    if !in_range(v1, global.positions.len()) || !in_range(v2, global.positions.len()) {
        return;
    }
    geom.edges.push((v1 as u32, v2 as u32));
}

/// Parses a `curv` directive's control-point index list. The first two fields are the curve's
/// parameter-range endpoints (conventionally `0.0 1.0`), not indices, and are dropped.
pub(super) fn add_curve_vertex_indices(geom: &mut Geometry, rest_line: &str, global: &GlobalVertices) {
    let fields: Vec<&str> = rest_line.split_whitespace().collect();
    if fields.len() <= 2 {
        return;
    }
    let nurbs = geom.nurbs.get_or_insert_with(Default::default);
    nurbs.curv_indices.clear();
    for field in &fields[2..] {
        if let Ok(raw) = field.parse::<i64>() {
            nurbs.curv_indices.push(normalize_index(raw, global.positions.len(), 0) as i32);
        }
    }
}

/// Parses a `parm` directive's `u`/`v` parameter list. Surfaces (anything but `u`/`v`) are not
/// supported.
pub(super) fn add_curve_parameters(geom: &mut Geometry, rest_line: &str) {
    let mut fields = rest_line.split_whitespace();
    match fields.next() {
        Some("u") | Some("v") => {
            let nurbs = geom.nurbs.get_or_insert_with(Default::default);
            nurbs.parm = fields.filter_map(|f| f.parse().ok()).collect();
        }
        Some(other) => log::warn!("surfaces are not supported: '{other}'"),
        None => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::GeometryKind;

    #[test]
    fn normalizes_positive_and_negative_indices() {
        assert_eq!(normalize_index(1, 10, 0), 0);
        assert_eq!(normalize_index(-1, 10, 0), 9);
        assert_eq!(normalize_index(4, 10, 3), 0);
    }

    #[test]
    fn drops_face_with_out_of_range_index() {
        let mut geom = Geometry::new(GeometryKind::Mesh, "g".into(), 0);
        let global = GlobalVertices {
            positions: vec![Default::default(), Default::default()],
            ..Default::default()
        };
        let offsets = VertexIndexOffset(0);
        add_polygon(&mut geom, "1 2 99", &global, &offsets, -1, -1, false, 1..2);
        assert!(geom.face_elements.is_empty());
        assert!(geom.face_corners.is_empty());
    }

    #[test]
    fn keeps_valid_triangle() {
        let mut geom = Geometry::new(GeometryKind::Mesh, "g".into(), 0);
        let global = GlobalVertices {
            positions: vec![Default::default(); 3],
            ..Default::default()
        };
        let offsets = VertexIndexOffset(0);
        add_polygon(&mut geom, "1 2 3", &global, &offsets, -1, -1, false, 1..2);
        assert_eq!(geom.face_elements.len(), 1);
        assert_eq!(geom.face_elements[0].corner_count, 3);
    }
}
