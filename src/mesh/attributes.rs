use facet_pipeline::{AttributeUsage, Binding, Mode, Pipeline, PipelineError};
use nalgebra::{Matrix4, Point3, Vector3};

use crate::{
    transform::{bake_normals, bake_points, normal_matrix, translate_points},
    Error, Real, Rgba,
};

/// Opaque red, used for untinted geometry.
pub const DEFAULT_COLOR: Rgba = [1.0, 0.0, 0.0, 1.0];

/// Which normal buffers get uploaded when a mesh is attached.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NormalMode {
    /// Only [Normal](AttributeUsage::Normal).
    #[default]
    Surface,
    /// [Normal](AttributeUsage::Normal) plus [NormalVisual](AttributeUsage::NormalVisual), for
    /// shaders which draw normals as segments from each vertex.
    Visualize,
}

/// Per-vertex attribute data, stored as one flat buffer per attribute.
///
/// Each buffer is indexed by vertex ordinal: vertex `i` owns `positions[3i..3i+3]`,
/// `colors[4i..4i+4]`, and so on. This is the layout the rendering boundary consumes, so nothing
/// needs repacking on upload.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct VertexAttributes {
    /// Flat `xyz` positions.
    pub positions: Vec<Real>,
    /// Flat `xyz` unit normals.
    pub normals: Vec<Real>,
    /// Flat `rgba` colors.
    pub colors: Vec<Real>,
    /// May be empty, in which case no texture coordinates are uploaded.
    pub texcoords: Vec<Real>,
}

impl VertexAttributes {
    /// Empty buffers with room for `vertices` vertices.
    pub fn with_capacity(vertices: usize) -> Self {
        Self {
            positions: Vec::with_capacity(vertices * 3),
            normals: Vec::with_capacity(vertices * 3),
            colors: Vec::with_capacity(vertices * 4),
            texcoords: Vec::with_capacity(vertices * 2),
        }
    }

    /// Number of vertices.
    #[inline]
    pub fn vertex_count(&self) -> usize {
        self.positions.len() / 3
    }

    /// Whether there are no vertices.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    /// # Panics
    ///
    /// * `i` ∉ `0..self.vertex_count()`
    #[inline]
    pub fn position(&self, i: usize) -> Point3<Real> {
        Point3::from_slice(&self.positions[i * 3..i * 3 + 3])
    }

    /// # Panics
    ///
    /// * `i` ∉ `0..self.vertex_count()`
    #[inline]
    pub fn normal(&self, i: usize) -> Vector3<Real> {
        Vector3::from_column_slice(&self.normals[i * 3..i * 3 + 3])
    }

    /// Append every buffer of `other` to the matching buffer of `self`.
    pub fn extend(&mut self, other: &Self) {
        self.positions.extend_from_slice(&other.positions);
        self.normals.extend_from_slice(&other.normals);
        self.colors.extend_from_slice(&other.colors);
        self.texcoords.extend_from_slice(&other.texcoords);
    }

    /// Set every vertex to `color`.
    pub fn fill_color(&mut self, color: Rgba) {
        for chunk in self.colors.chunks_exact_mut(4) {
            chunk.copy_from_slice(&color);
        }
    }

    /// Bake `transform` into positions and normals.
    ///
    /// Normals go through the same homogeneous `w = 1` path as positions and are not
    /// re-normalized. That is only correct while `transform` is a rotation: a translation leaks
    /// into every normal, and scale or shear bend them off their surfaces. Use
    /// [adjust_with_normal_matrix](Self::adjust_with_normal_matrix) for anything else.
    pub fn adjust(&mut self, transform: &Matrix4<Real>) {
        bake_points(transform, &mut self.positions);
        bake_points(transform, &mut self.normals);
    }

    /// Bake `transform` into positions, and its inverse-transpose into normals (which are then
    /// re-normalized).
    ///
    /// # Errors
    ///
    /// * [`SingularTransform`](crate::Degeneracy::SingularTransform) if `transform` can't be
    ///   inverted; nothing is modified.
    pub fn adjust_with_normal_matrix(&mut self, transform: &Matrix4<Real>) -> Result<(), Error> {
        let n = normal_matrix(transform)?;
        bake_points(transform, &mut self.positions);
        bake_normals(&n, &mut self.normals);
        Ok(())
    }

    /// Move every position by `offset`, leaving normals alone.
    pub fn translate(&mut self, offset: &Vector3<Real>) {
        translate_points(offset, &mut self.positions);
    }

    /// `normal + position` for every vertex: the end point of each normal when drawn as a segment
    /// starting at its vertex.
    pub fn visual_normals(&self) -> Vec<Real> {
        self.normals
            .iter()
            .zip(&self.positions)
            .map(|(n, p)| n + p)
            .collect()
    }

    /// Upload every non-empty buffer, plus `indices`, to `pipeline`.
    pub fn upload<P: Pipeline>(
        &self,
        pipeline: &mut P,
        indices: &[u32],
        normals: NormalMode,
    ) -> Result<Binding, PipelineError> {
        let visual = match normals {
            NormalMode::Surface => None,
            NormalMode::Visualize => Some(self.visual_normals()),
        };
        let buffers = [
            (AttributeUsage::Position, Some(self.positions.as_slice())),
            (AttributeUsage::Normal, Some(self.normals.as_slice())),
            (AttributeUsage::NormalVisual, visual.as_deref()),
            (AttributeUsage::Color, Some(self.colors.as_slice())),
            (AttributeUsage::Texcoord, Some(self.texcoords.as_slice())),
        ];
        Binding::upload(
            pipeline,
            buffers
                .into_iter()
                .filter_map(|(usage, data)| data.filter(|d| !d.is_empty()).map(|d| (usage, d))),
            indices,
            Mode::Triangles,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use facet_pipeline::RecordingPipeline;
    use nalgebra::vector;

    fn single_vertex() -> VertexAttributes {
        VertexAttributes {
            positions: vec![1.0, 2.0, 3.0],
            normals: vec![0.0, 0.0, 1.0],
            colors: DEFAULT_COLOR.to_vec(),
            texcoords: vec![],
        }
    }

    #[test]
    fn visual_normals_are_offset_by_position() {
        assert_eq!(single_vertex().visual_normals(), vec![1.0, 2.0, 4.0]);
    }

    #[test]
    fn adjust_treats_normals_as_points() {
        let mut attrs = single_vertex();
        attrs.adjust(&Matrix4::new_translation(&vector![1.0, 0.0, 0.0]));
        assert_eq!(attrs.position(0), Point3::new(2.0, 2.0, 3.0));
        // the translation leaks into the normal
        assert_eq!(attrs.normal(0), vector![1.0, 0.0, 1.0]);
    }

    #[test]
    fn translate_leaves_normals() {
        let mut attrs = single_vertex();
        attrs.translate(&vector![0.0, 0.0, -3.0]);
        assert_eq!(attrs.position(0), Point3::new(1.0, 2.0, 0.0));
        assert_eq!(attrs.normal(0), vector![0.0, 0.0, 1.0]);
    }

    #[test]
    fn upload_skips_empty_and_unrequested_buffers() {
        let mut p = RecordingPipeline::new();
        let attrs = single_vertex();
        let surface = attrs.upload(&mut p, &[0, 0, 0], NormalMode::Surface).unwrap();
        assert!(surface.attribute(AttributeUsage::Texcoord).is_none());
        assert!(surface.attribute(AttributeUsage::NormalVisual).is_none());

        let visual = attrs
            .upload(&mut p, &[0, 0, 0], NormalMode::Visualize)
            .unwrap();
        let handle = visual.attribute(AttributeUsage::NormalVisual).unwrap();
        assert_eq!(p.buffer(handle).unwrap().floats(), Some(&[1.0, 2.0, 4.0][..]));
        // true normals are still uploaded alongside
        let normals = visual.attribute(AttributeUsage::Normal).unwrap();
        assert_eq!(p.buffer(normals).unwrap().floats(), Some(&[0.0, 0.0, 1.0][..]));
    }
}
