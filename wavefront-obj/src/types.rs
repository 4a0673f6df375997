//! The data model produced by [`crate::import`]: global vertex tables, the [`Geometry`] list they
//! are partitioned into, and the MTL material map.

use std::collections::HashMap;
use std::path::PathBuf;

use obj_math::{Vec2, Vec3};

/// Sentinel stored in a [`PolyCorner`]'s `uv_vert_index`/`vertex_normal_index` (or a [`PolyElem`]'s
/// `vertex_group_index`/`material_index`) when that slot was never set.
pub const ABSENT: i32 = -1;

/// Document-level, insertion-ordered vertex attribute tables shared across all [`Geometry`]
/// instances. Entries are appended in document order and never rewritten.
#[derive(Debug, Default, Clone)]
pub struct GlobalVertices {
    pub positions: Vec<Vec3>,
    pub uv_vertices: Vec<Vec2>,
    pub vertex_normals: Vec<Vec3>,
}

/// The size of [`GlobalVertices::positions`] at the moment a [`Geometry`] was created. Positive
/// (1-based, document-absolute) position references in an `f` or `l` directive are shifted by this
/// amount to land in the current geometry's local index space.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct VertexIndexOffset(pub usize);

/// Whether a [`Geometry`] was produced by polygonal (`v`/`f`) or free-form curve (`cstype`/`curv`)
/// elements.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GeometryKind {
    Mesh,
    Curve,
}

/// Assigns small dense integers to strings in first-mention order, scoped to a single [`Geometry`].
#[derive(Debug, Default, Clone)]
pub struct DenseIndex {
    indices: HashMap<String, i32>,
}

impl DenseIndex {
    /// Looks up `name`'s dense index, assigning the next available one if this is the first time
    /// `name` has been seen within this map.
    pub fn lookup_or_add(&mut self, name: &str) -> i32 {
        if let Some(&idx) = self.indices.get(name) {
            return idx;
        }
        let idx = self.indices.len() as i32;
        self.indices.insert(name.to_owned(), idx);
        idx
    }

    pub fn len(&self) -> usize {
        self.indices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }
}

/// One `v[/vt[/vn]]` triple inside an `f` directive, after index normalization. `uv_vert_index` and
/// `vertex_normal_index` are [`ABSENT`] when that slot was not given.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PolyCorner {
    pub vert_index: i32,
    pub uv_vert_index: i32,
    pub vertex_normal_index: i32,
}

impl PolyCorner {
    pub(crate) const fn new() -> Self {
        Self { vert_index: 0, uv_vert_index: ABSENT, vertex_normal_index: ABSENT }
    }
}

/// One `f` directive: a contiguous run of corners in the parent [`Geometry`]'s `face_corners`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PolyElem {
    pub start_index: usize,
    pub corner_count: usize,
    pub material_index: i32,
    pub vertex_group_index: i32,
    pub shaded_smooth: bool,
}

/// Per-[`Geometry`] NURBS curve record: degree, flattened control-point index list, parameter
/// list, and the group name active when the curve was started.
#[derive(Debug, Default, Clone)]
pub struct NurbsElement {
    pub degree: i32,
    pub curv_indices: Vec<i32>,
    pub parm: Vec<f32>,
    pub group: String,
}

/// A named, typed partition of the OBJ stream with its own dense index tables for groups and
/// materials, plus index ranges into the global vertex tables.
#[derive(Debug, Clone)]
pub struct Geometry {
    pub kind: GeometryKind,
    pub name: String,
    pub vertex_start: usize,
    pub vertex_count: usize,
    pub has_vertex_normals: bool,
    pub face_corners: Vec<PolyCorner>,
    pub face_elements: Vec<PolyElem>,
    pub edges: Vec<(u32, u32)>,
    pub total_loops: usize,
    pub group_indices: DenseIndex,
    pub material_indices: DenseIndex,
    pub use_vertex_groups: bool,
    pub nurbs: Option<NurbsElement>,
}

impl Geometry {
    pub(crate) fn new(kind: GeometryKind, name: String, vertex_start: usize) -> Self {
        Self {
            kind,
            name,
            vertex_start,
            vertex_count: 0,
            has_vertex_normals: false,
            face_corners: Vec::new(),
            face_elements: Vec::new(),
            edges: Vec::new(),
            total_loops: 0,
            group_indices: DenseIndex::default(),
            material_indices: DenseIndex::default(),
            use_vertex_groups: false,
            nurbs: None,
        }
    }
}

/// One of the enumerated texture-map slots an [`MtlMaterial`] may carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TextureMapChannel {
    Diffuse,
    SpecularColor,
    SpecularExponent,
    Ambient,
    Alpha,
    Reflection,
    Emission,
    Bump,
}

/// One `map_*` entry in an MTL material: the image path plus the options the MTL format allows on
/// a texture-map line (translation, scale, and an optional projection-type code).
#[derive(Debug, Clone)]
pub struct TextureMapEntry {
    pub image_path: String,
    pub mtl_dir_path: PathBuf,
    pub translation: Vec3,
    pub scale: Vec3,
    pub projection_type: Option<i32>,
}

impl TextureMapEntry {
    pub(crate) fn new(mtl_dir_path: PathBuf) -> Self {
        Self {
            image_path: String::new(),
            mtl_dir_path,
            translation: Vec3::ZERO,
            scale: Vec3::new(1.0, 1.0, 1.0),
            projection_type: None,
        }
    }
}

/// A parsed `newmtl` block from an MTL library.
#[derive(Debug, Clone)]
pub struct MtlMaterial {
    pub name: String,
    pub ns: f32,
    pub ni: f32,
    pub d: f32,
    pub illum: i32,
    pub ka: Vec3,
    pub kd: Vec3,
    pub ks: Vec3,
    pub ke: Vec3,
    pub texture_maps: HashMap<TextureMapChannel, TextureMapEntry>,
    pub map_bump_strength: f32,
}

impl MtlMaterial {
    pub(crate) fn new(name: String) -> Self {
        Self {
            name,
            ns: 324.0,
            ni: 1.45,
            d: 1.0,
            illum: 2,
            ka: Vec3::ZERO,
            kd: Vec3::new(0.8, 0.8, 0.8),
            ks: Vec3::new(0.5, 0.5, 0.5),
            ke: Vec3::ZERO,
            texture_maps: HashMap::new(),
            map_bump_strength: 0.0,
        }
    }
}
