//! Parser and in-memory model builder for Wavefront OBJ files and their companion MTL material
//! libraries.
//!
//! This crate is a benchmark-and-embedding parser, not a renderer: [`import`] hands back a flat
//! vertex table, an ordered list of [`Geometry`] partitions, and a map of parsed materials, and
//! does nothing further with them.
//!
//! Source for the OBJ and MTL formats:
//! - <https://paulbourke.net/dataformats/obj/>
//! - <https://paulbourke.net/dataformats/mtl/>

pub mod diagnostic;
pub mod mtl;
pub mod obj;
pub mod reader;
pub mod text;
pub mod types;

pub use obj::{import, Axis, ImportParams, ImportedScene};
pub use types::*;
