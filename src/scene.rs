use facet_pipeline::{Drawable, Pipeline, PipelineError, Projection, UniformSlot};

use crate::Voxel;

/// A set of [Voxels](Voxel) sharing one projection, driven one frame at a time.
#[derive(Debug, Default, Clone)]
pub struct Scene {
    projection: Projection,
    voxels: Vec<Voxel>,
}

impl Scene {
    /// An empty scene.
    pub fn new(projection: Projection) -> Self {
        Self {
            projection,
            voxels: Vec::new(),
        }
    }

    /// Add `voxel`, returning its ordinal within [voxels](Scene::voxels).
    ///
    /// Voxels added after [attach](Scene::attach) must be attached before the next render.
    pub fn add(&mut self, voxel: Voxel) -> usize {
        self.voxels.push(voxel);
        self.voxels.len() - 1
    }

    /// Every voxel, in insertion order.
    #[inline]
    pub fn voxels(&self) -> &[Voxel] {
        &self.voxels
    }

    /// The voxel at ordinal `i`, if any.
    #[inline]
    pub fn voxel_mut(&mut self, i: usize) -> Option<&mut Voxel> {
        self.voxels.get_mut(i)
    }

    /// The projection uniform set at the start of every frame.
    #[inline]
    pub fn projection(&self) -> &Projection {
        &self.projection
    }

    /// Replace the projection, e.g. after a viewport resize.
    pub fn set_projection(&mut self, projection: Projection) {
        self.projection = projection;
    }

    /// Upload every voxel's merged buffers.
    pub fn attach<P: Pipeline>(&mut self, pipeline: &mut P) -> Result<(), PipelineError> {
        for voxel in &mut self.voxels {
            voxel.attach(pipeline)?;
        }
        Ok(())
    }

    /// Advance every voxel by one [step](Voxel::step).
    pub fn tick(&mut self) {
        for voxel in &mut self.voxels {
            voxel.step();
        }
    }

    /// Upload the projection, then draw every voxel with its own model-view transform.
    pub fn render<P: Pipeline>(&self, pipeline: &mut P) -> Result<(), PipelineError> {
        pipeline.set_uniform(UniformSlot::Projection, &self.projection.matrix());
        for voxel in &self.voxels {
            voxel.render(pipeline)?;
        }
        Ok(())
    }

    /// One animation frame: [tick](Scene::tick), then [render](Scene::render).
    #[cfg_attr(feature = "tracing", tracing::instrument(level = "trace", skip_all))]
    pub fn frame<P: Pipeline>(&mut self, pipeline: &mut P) -> Result<(), PipelineError> {
        self.tick();
        self.render(pipeline)
    }
}
