//! Spins a voxel in front of a recording pipeline, reporting its silhouette and ray hits every
//! frame.

use clap::Parser;
use facet::{
    pipeline::{PipelineError, Projection, RecordingPipeline},
    Error, Face, Ray, Scene, Spin, Voxel,
};

mod cli;
use cli::*;

#[derive(Debug, thiserror::Error)]
pub enum SampleError {
    #[error(transparent)]
    Geometry(#[from] Error),
    #[error(transparent)]
    Pipeline(#[from] PipelineError),
}

/// Corners closer together than this are treated as one when welding.
const WELD_TOLERANCE: f32 = 1.0e-4;

pub fn main() -> Result<(), SampleError> {
    let cli = Cli::parse();
    initialize_tracing(&cli.log_filter, cli.log_format);

    let mut scene = Scene::new(Projection::for_viewport(cli.width, cli.height));
    let voxel = Voxel::new(cli.side, cli.position)
        .with_spin(Spin {
            x: cli.spin.0,
            y: cli.spin.1,
        })
        .with_normal_mode(cli.normals.into());
    // welding only merges vertex data, which never changes after construction
    let welded = voxel.welded(WELD_TOLERANCE)?;
    tracing::info!(
        side = cli.side,
        vertices = voxel.attributes().vertex_count(),
        welded = welded.mesh.vertex_count(),
        "built voxel"
    );
    let id = scene.add(voxel);

    let mut pipeline = RecordingPipeline::new();
    scene.attach(&mut pipeline)?;
    tracing::debug!(buffers = pipeline.buffer_count(), "attached");

    let ray = Ray::new(cli.viewpoint, cli.ray);
    for tick in 0..cli.ticks {
        pipeline.clear_draws();
        scene.frame(&mut pipeline)?;
        let voxel = &scene.voxels()[id];

        let silhouette = welded.view(*voxel.transform()).silhouette(&cli.viewpoint);
        let hit = voxel.view().ray_cast(&ray);
        tracing::info!(
            tick,
            draws = pipeline.draws().len(),
            facing = silhouette.facing.len(),
            edges = ?silhouette.edges,
            hit = ?hit.map(|h| h.point),
            face = ?hit.map(|h| Face::ALL[h.triangle / 2]),
            "frame"
        );
    }

    Ok(())
}
