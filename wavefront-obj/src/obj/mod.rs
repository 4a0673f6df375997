//! Entry point and OBJ directive dispatcher: reads the `.obj` file, builds the [`Geometry`] list
//! and [`GlobalVertices`] tables, and pulls in every referenced `.mtl` library.

mod params;
mod polygon;

pub use params::{Axis, ImportParams};

use std::collections::HashMap;
use std::path::Path;

use arrayvec::ArrayVec;

use crate::diagnostic::{self, Diagnostic, LineRange};
use crate::mtl;
use crate::reader::ChunkedLineReader;
use crate::text::{parse_float, split_line_key_rest};
use crate::types::{Geometry, GeometryKind, GlobalVertices, MtlMaterial, VertexIndexOffset};

use self::polygon::{add_curve_parameters, add_curve_vertex_indices, add_edge, add_polygon};

/// Everything produced by a single [`import`] call: every vertex attribute in document order, the
/// geometry partitions they belong to, and the materials pulled in by `mtllib` directives.
#[derive(Debug, Default, Clone)]
pub struct ImportedScene {
    pub vertices: GlobalVertices,
    pub geometries: Vec<Geometry>,
    pub materials: HashMap<String, MtlMaterial>,
    pub mtl_libraries: Vec<String>,
}

/// Decides whether `prev` can absorb a directive of `new_kind`, or whether a fresh [`Geometry`]
/// must be started. A freshly created, still-empty mesh geometry is reused by the next `o`/`g`
/// directive or by the first curve directive; once it has gathered any faces, normals, or edges
/// it is considered populated and a new one is started instead.
fn push_new_geometry(
    geometries: &mut Vec<Geometry>,
    new_kind: GeometryKind,
    name: &str,
    vertices: &GlobalVertices,
    offsets: &mut VertexIndexOffset,
) -> usize {
    let vertex_start = vertices.positions.len();
    *offsets = VertexIndexOffset(vertex_start);
    let display_name = if name.is_empty() { "New object".to_owned() } else { name.to_owned() };
    geometries.push(Geometry::new(new_kind, display_name, vertex_start));
    geometries.len() - 1
}

fn create_geometry(
    geometries: &mut Vec<Geometry>,
    prev: Option<usize>,
    new_kind: GeometryKind,
    name: &str,
    vertices: &GlobalVertices,
    offsets: &mut VertexIndexOffset,
) -> usize {
    let Some(prev_idx) = prev else {
        return push_new_geometry(geometries, new_kind, name, vertices, offsets);
    };

    match geometries[prev_idx].kind {
        GeometryKind::Mesh => {
            let prev_geom = &geometries[prev_idx];
            let populated =
                !prev_geom.face_elements.is_empty() || prev_geom.has_vertex_normals || !prev_geom.edges.is_empty();
            if populated {
                push_new_geometry(geometries, new_kind, name, vertices, offsets)
            } else if new_kind == GeometryKind::Mesh {
                geometries[prev_idx].name = name.to_owned();
                prev_idx
            } else {
                geometries[prev_idx].kind = GeometryKind::Curve;
                prev_idx
            }
        }
        GeometryKind::Curve => push_new_geometry(geometries, new_kind, name, vertices, offsets),
    }
}

/// Reads up to `N` whitespace-separated floats from the head of `rest` into an [`ArrayVec`],
/// stopping at the first token that doesn't parse as a number.
fn read_to_array<const N: usize>(rest: &str) -> ArrayVec<f32, N> {
    let mut out = ArrayVec::new();
    let mut remaining = rest;
    while out.len() < N {
        match parse_float(remaining) {
            Some((v, r)) => {
                out.push(v);
                remaining = r;
            }
            None => break,
        }
    }
    out
}

/// Parses a `v`/`vn` directive's three floats, reporting and zero-filling whatever is missing.
fn parse_vec3(rest: &str, directive: &'static str, lines: LineRange) -> [f32; 3] {
    let values = read_to_array::<3>(rest);
    if values.len() < 3 {
        diagnostic::report(&Diagnostic::too_few(lines, directive, values.len(), 3));
    }
    let mut out = [0.0f32; 3];
    out[..values.len()].copy_from_slice(&values);
    out
}

/// Parses a `vt` directive's two floats, reporting and zero-filling whatever is missing.
fn parse_vec2(rest: &str, lines: LineRange) -> [f32; 2] {
    let values = read_to_array::<2>(rest);
    if values.len() < 2 {
        diagnostic::report(&Diagnostic::too_few(lines, "vt", values.len(), 2));
    }
    let mut out = [0.0f32; 2];
    out[..values.len()].copy_from_slice(&values);
    out
}

/// Parses the OBJ file named by `params.path` and every MTL library it references, returning the
/// resulting model. Unopenable paths and malformed lines are logged as [`Diagnostic`]s and
/// otherwise skipped: this function always returns, never a `Result`.
pub fn import(params: &ImportParams) -> ImportedScene {
    let mut scene = ImportedScene::default();

    let reader = match ChunkedLineReader::open(&params.path) {
        Ok(r) => r,
        Err(source) => {
            diagnostic::report(&Diagnostic::FileOpenError {
                path: params.path.display().to_string(),
                source,
            });
            return scene;
        }
    };

    let obj_dir = params.path.parent().unwrap_or_else(|| Path::new("."));

    let mut offsets = VertexIndexOffset(0);
    let mut curr_geom = create_geometry(
        &mut scene.geometries,
        None,
        GeometryKind::Mesh,
        "",
        &scene.vertices,
        &mut offsets,
    );

    let mut state_shaded_smooth = false;
    let mut state_object_group = String::new();
    let mut state_object_group_index: i32 = -1;
    let mut state_material_name = String::new();
    let mut state_material_index: i32 = -1;
    let mut line_no: u32 = 0;

    let result = reader.for_each_line(|raw_line| {
        line_no += 1;
        let lines = line_no..line_no + 1;

        let Some((key, rest)) = split_line_key_rest(raw_line) else { return };
        if key.starts_with('#') {
            return;
        }

        match key {
            "v" => {
                scene.vertices.positions.push(parse_vec3(rest, "v", lines).into());
                scene.geometries[curr_geom].vertex_count += 1;
            }
            "vn" => {
                scene.vertices.vertex_normals.push(parse_vec3(rest, "vn", lines).into());
                scene.geometries[curr_geom].has_vertex_normals = true;
            }
            "vt" => {
                scene.vertices.uv_vertices.push(parse_vec2(rest, lines).into());
            }
            "f" => {
                add_polygon(
                    &mut scene.geometries[curr_geom],
                    rest,
                    &scene.vertices,
                    &offsets,
                    state_material_index,
                    state_object_group_index,
                    state_shaded_smooth,
                    lines,
                );
            }
            "l" => {
                add_edge(&mut scene.geometries[curr_geom], rest, &offsets, &scene.vertices, lines);
            }
            "cstype" => {
                if rest.contains("bspline") {
                    curr_geom = create_geometry(
                        &mut scene.geometries,
                        Some(curr_geom),
                        GeometryKind::Curve,
                        &state_object_group,
                        &scene.vertices,
                        &mut offsets,
                    );
                    let geom = &mut scene.geometries[curr_geom];
                    let nurbs = geom.nurbs.get_or_insert_with(Default::default);
                    nurbs.group = state_object_group.clone();
                } else {
                    log::warn!("curve type '{rest}' is not supported");
                }
            }
            "deg" => {
                let degree = rest.split_whitespace().next().and_then(|s| s.parse().ok()).unwrap_or(3);
                let geom = &mut scene.geometries[curr_geom];
                geom.nurbs.get_or_insert_with(Default::default).degree = degree;
            }
            "curv" => {
                add_curve_vertex_indices(&mut scene.geometries[curr_geom], rest, &scene.vertices);
            }
            "parm" => {
                add_curve_parameters(&mut scene.geometries[curr_geom], rest);
            }
            "o" => {
                state_shaded_smooth = false;
                state_object_group.clear();
                state_material_name.clear();
                curr_geom = create_geometry(
                    &mut scene.geometries,
                    Some(curr_geom),
                    GeometryKind::Mesh,
                    rest,
                    &scene.vertices,
                    &mut offsets,
                );
            }
            "g" => {
                update_object_group(rest, &mut state_object_group);
                let group = state_object_group.clone();
                state_object_group_index =
                    scene.geometries[curr_geom].group_indices.lookup_or_add(&group);
            }
            "s" => update_smooth_group(rest, &mut state_shaded_smooth),
            "usemtl" => {
                state_material_name = rest.to_owned();
                state_material_index =
                    scene.geometries[curr_geom].material_indices.lookup_or_add(rest);
            }
            "mtllib" => scene.mtl_libraries.push(rest.to_owned()),
            _ => diagnostic::report(&Diagnostic::unknown(lines, key)),
        }
    });

    if let Err(source) = result {
        diagnostic::report(&Diagnostic::FileOpenError { path: params.path.display().to_string(), source });
        return scene;
    }

    for reference in &scene.mtl_libraries.clone() {
        let mtl_path = mtl::resolve_mtl_path(obj_dir, reference);
        let mtl_dir = mtl_path.parent().unwrap_or(obj_dir);
        mtl::parse_mtl_file(&mtl_path, mtl_dir, &mut scene.materials);
    }

    scene
}

/// `off`/`null`/`default` all mean "no group"; anything else replaces the active group name.
fn update_object_group(rest: &str, state_object_group: &mut String) {
    if rest.contains("off") || rest.contains("null") || rest.contains("default") {
        state_object_group.clear();
    } else {
        *state_object_group = rest.to_owned();
    }
}

/// `0`/`off`/`null` mean flat shading; anything else is parsed as a (nonzero) smoothing group id.
fn update_smooth_group(rest: &str, state_shaded_smooth: &mut bool) {
    if rest != "0" && !rest.contains("off") && !rest.contains("null") {
        let smooth: i32 = rest.split_whitespace().next().and_then(|s| s.parse().ok()).unwrap_or(0);
        *state_shaded_smooth = smooth != 0;
    } else {
        *state_shaded_smooth = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::GeometryKind;

    fn write_temp(name: &str, contents: &str) -> std::path::PathBuf {
        let path = std::env::temp_dir().join(name);
        std::fs::write(&path, contents).unwrap();
        path
    }

    #[test]
    fn create_geometry_reuses_empty_mesh_for_name() {
        let mut geometries = Vec::new();
        let vertices = GlobalVertices::default();
        let mut offsets = VertexIndexOffset(0);
        let first = create_geometry(&mut geometries, None, GeometryKind::Mesh, "", &vertices, &mut offsets);
        let second =
            create_geometry(&mut geometries, Some(first), GeometryKind::Mesh, "Cube", &vertices, &mut offsets);
        assert_eq!(first, second);
        assert_eq!(geometries[second].name, "Cube");
    }

    #[test]
    fn create_geometry_splits_once_populated() {
        let mut geometries = Vec::new();
        let vertices = GlobalVertices::default();
        let mut offsets = VertexIndexOffset(0);
        let first = create_geometry(&mut geometries, None, GeometryKind::Mesh, "A", &vertices, &mut offsets);
        geometries[first].has_vertex_normals = true;
        let second =
            create_geometry(&mut geometries, Some(first), GeometryKind::Mesh, "B", &vertices, &mut offsets);
        assert_ne!(first, second);
    }

    #[test]
    fn imports_simple_cube_fragment() {
        let path = write_temp(
            "wavefront-obj-import-cube.obj",
            "o Cube\n\
             v -1 -1 -1\nv 1 -1 -1\nv 1 1 -1\nv -1 1 -1\n\
             vt 0 0\nvt 1 0\nvt 1 1\nvt 0 1\n\
             g Front\n\
             usemtl Red\n\
             f 1/1 2/2 3/3 4/4\n",
        );
        let scene = import(&ImportParams::new(&path));
        std::fs::remove_file(&path).ok();

        assert_eq!(scene.vertices.positions.len(), 4);
        assert_eq!(scene.geometries.len(), 1);
        let geom = &scene.geometries[0];
        assert_eq!(geom.name, "Cube");
        assert_eq!(geom.face_elements.len(), 1);
        assert_eq!(geom.face_elements[0].corner_count, 4);
        assert_eq!(geom.face_elements[0].material_index, 0);
        assert_eq!(geom.face_elements[0].vertex_group_index, 0);
    }

    #[test]
    fn unopenable_path_yields_empty_scene() {
        let scene = import(&ImportParams::new("/nonexistent/path/does-not-exist.obj"));
        assert!(scene.vertices.positions.is_empty());
        assert!(scene.geometries.is_empty());
    }

    #[test]
    fn negative_indices_resolve_relative_to_current_vertex_count() {
        let path = write_temp(
            "wavefront-obj-import-negidx.obj",
            "v 0 0 0\nv 1 0 0\nv 1 1 0\nf -3 -2 -1\n",
        );
        let scene = import(&ImportParams::new(&path));
        std::fs::remove_file(&path).ok();

        let geom = &scene.geometries[0];
        assert_eq!(geom.face_elements.len(), 1);
        let corners = &geom.face_corners[0..3];
        assert_eq!(corners[0].vert_index, 0);
        assert_eq!(corners[1].vert_index, 1);
        assert_eq!(corners[2].vert_index, 2);
    }
}
