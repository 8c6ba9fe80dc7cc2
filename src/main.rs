// Headless sculpting demo
//
//   get_clayed               sculpt a sphere with seeded random strokes,
//                            save the log, reload it and verify the replay
//   get_clayed <clay.json>   load a saved clay object and report the rebuilt mesh
//
// Set RUST_LOG=debug to see generation and replay details.

use get_clayed::engine::{
    DeformKind, DeformableClayData, Mesh, Result, SculptSession, ShapeKind, ShapeParams,
};
use log::info;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

const DEMO_SEED: u64 = 0xC1A7;
const DEMO_STROKES: usize = 200;

// ============================================================================
// REPORTING
// ============================================================================

fn print_mesh_summary(label: &str, mesh: &Mesh) {
    let render = mesh.to_render_mesh();
    let bounds = mesh.bounding_box;
    println!(
        "{label}: {} vertices | {} triangles | {} upload bytes",
        mesh.vertex_count(),
        mesh.triangle_count(),
        render.vertex_bytes().len() + render.index_bytes().len(),
    );
    if !bounds.is_empty() {
        println!(
            "  bounds min {:?} max {:?} | sphere r={:.3}",
            bounds.min.to_array(),
            bounds.max.to_array(),
            mesh.bounding_sphere.radius,
        );
    }
}

// ============================================================================
// DEMO SESSION
// ============================================================================

fn run_demo() -> Result<()> {
    let mut rng = StdRng::seed_from_u64(DEMO_SEED);
    let mut session = SculptSession::new(ShapeKind::Sphere, ShapeParams::new(1.0));
    print_mesh_summary("base sphere", session.mesh());

    for _ in 0..DEMO_STROKES {
        let (hit, normal) = {
            let mesh = session.mesh();
            let idx = rng.gen_range(0..mesh.vertex_count());
            (mesh.positions[idx], mesh.normals[idx])
        };
        let kind = if rng.gen_bool(0.6) { DeformKind::Push } else { DeformKind::Pull };
        // Strokes drag into the surface; pull flips the direction on replay.
        let movement = -normal * rng.gen_range(0.01f32..0.08);
        session.stroke(kind, hit, movement, rng.gen_range(0.1..0.4))?;
    }
    print_mesh_summary("sculpted", session.mesh());

    let json = session.data().to_json()?;
    let estimate = session.storage_estimate();
    println!(
        "saved {} actions: {} JSON bytes (estimate {} vs {} raw vertex bytes, {:.1}% smaller, free tier: {})",
        session.action_count(),
        json.len(),
        estimate.action_bytes,
        estimate.vertex_bytes,
        estimate.savings_ratio() * 100.0,
        estimate.fits_free_tier(),
    );

    let reloaded = DeformableClayData::from_json(&json)?;
    reloaded.verify_replay(session.mesh())?;
    println!("replay verified: reloaded mesh is bit-identical");
    Ok(())
}

// ============================================================================
// FILE REPORT
// ============================================================================

fn report_file(path: &str) -> Result<()> {
    let json = std::fs::read_to_string(path)?;
    let data = DeformableClayData::from_json(&json)?;
    info!("{path}: shape {} with {} actions", data.original_shape, data.deform_actions.len());

    let session = SculptSession::from_data(data);
    print_mesh_summary(session.data().original_shape.keyword(), session.mesh());
    Ok(())
}

// ============================================================================
// MAIN
// ============================================================================

fn main() {
    env_logger::init();

    let result = match std::env::args().nth(1) {
        Some(path) => report_file(&path),
        None => run_demo(),
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}
