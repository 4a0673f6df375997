//! Benchmark-and-inspection harness for the `wavefront-obj` parser: loads a single file given on
//! the command line and reports what it found.

use std::process::ExitCode;
use std::time::Instant;

use log::info;
use simple_logger::SimpleLogger;
use wavefront_obj::{import, ImportParams};

pub fn main() -> ExitCode {
    let Some(model_path) = std::env::args().skip(1).next() else {
        eprintln!("Usage: obj-bench <path/to/model.obj>");
        return ExitCode::FAILURE;
    };

    SimpleLogger::new()
        .with_local_timestamps()
        .with_colors(true)
        .with_level(log::LevelFilter::Info)
        .env()
        .init()
        .unwrap();

    let params = ImportParams::new(model_path);

    let start = Instant::now();
    let scene = import(&params);
    let elapsed = start.elapsed();

    let face_count: usize = scene.geometries.iter().map(|g| g.face_elements.len()).sum();
    let edge_count: usize = scene.geometries.iter().map(|g| g.edges.len()).sum();

    info!("parsed '{}' in {:.2?}", params.path.display(), elapsed);
    info!("  {} positions, {} uvs, {} normals", scene.vertices.positions.len(), scene.vertices.uv_vertices.len(), scene.vertices.vertex_normals.len());
    info!("  {} geometries, {} faces, {} edges", scene.geometries.len(), face_count, edge_count);
    info!("  {} materials from {} mtllib reference(s)", scene.materials.len(), scene.mtl_libraries.len());

    ExitCode::SUCCESS
}
