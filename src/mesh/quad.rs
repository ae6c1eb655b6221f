use facet_pipeline::{Binding, Drawable, Pipeline, PipelineError, UniformSlot};
use nalgebra::{Matrix4, Vector2, Vector3};

use crate::{Error, NormalMode, Real, Rgba, VertexAttributes, DEFAULT_COLOR};

/// Two counter-clockwise triangles over a quad's four vertices.
///
/// <pre>
/// 3 <-- 2
/// |     ^
/// v     |
/// 0 --> 1
/// </pre>
pub const QUAD_INDICES: [u32; 6] = [0, 1, 2, 2, 3, 0];

/// A flat rectangular patch: the smallest composable piece of geometry.
///
/// Its vertex data can be baked with [adjust](Quad::adjust) before it is either drawn on its own
/// or merged into a larger mesh, such as a [Voxel](crate::Voxel).
#[derive(Debug, Clone)]
pub struct Quad {
    attributes: VertexAttributes,
    offset: Vector3<Real>,
    normals: NormalMode,
    binding: Option<Binding>,
}

impl Quad {
    /// Corners per quad.
    pub const VERTICES: usize = 4;

    /// A `size.x`×`size.y` rectangle in the local xy plane, centered at the origin and facing +z.
    ///
    /// `offset` is where the quad sits when drawn on its own; it becomes the translation of
    /// [transform](Quad::transform), and is not baked into the vertex data.
    pub fn new(size: Vector2<Real>, offset: Vector3<Real>) -> Self {
        let (hx, hy) = (size.x / 2.0, size.y / 2.0);
        #[rustfmt::skip]
        let attributes = VertexAttributes {
            positions: vec![
                -hx, -hy, 0.0,
                 hx, -hy, 0.0,
                 hx,  hy, 0.0,
                -hx,  hy, 0.0,
            ],
            normals: [0.0, 0.0, 1.0].repeat(Self::VERTICES),
            colors: DEFAULT_COLOR.repeat(Self::VERTICES),
            texcoords: vec![
                0.0, 0.0,
                1.0, 0.0,
                1.0, 1.0,
                0.0, 1.0,
            ],
        };
        Self {
            attributes,
            offset,
            normals: NormalMode::default(),
            binding: None,
        }
    }

    /// Paint every corner `color`.
    pub fn with_color(mut self, color: Rgba) -> Self {
        self.attributes.fill_color(color);
        self
    }

    /// Choose which normal buffers get uploaded.
    pub fn with_normal_mode(mut self, normals: NormalMode) -> Self {
        self.normals = normals;
        self
    }

    /// Bake `transform` into this quad's positions and normals.
    ///
    /// See [VertexAttributes::adjust] for how normals are treated. Baking after
    /// [attach](Drawable::attach) does not update uploaded buffers.
    #[cfg_attr(feature = "tracing", tracing::instrument(level = "trace", skip_all))]
    pub fn adjust(&mut self, transform: &Matrix4<Real>) {
        self.attributes.adjust(transform);
    }

    /// [adjust](Quad::adjust), by value.
    pub fn adjusted(mut self, transform: &Matrix4<Real>) -> Self {
        self.adjust(transform);
        self
    }

    /// Bake `transform` with a proper inverse-transpose for the normals.
    pub fn adjust_with_normal_matrix(&mut self, transform: &Matrix4<Real>) -> Result<(), Error> {
        self.attributes.adjust_with_normal_matrix(transform)
    }

    /// Move the vertices by `offset` without touching the normals.
    pub fn translate(&mut self, offset: &Vector3<Real>) {
        self.attributes.translate(offset);
    }

    /// Baked vertex attributes.
    #[inline]
    pub fn attributes(&self) -> &VertexAttributes {
        &self.attributes
    }

    /// Baked vertex attributes, by value.
    #[inline]
    pub fn into_attributes(self) -> VertexAttributes {
        self.attributes
    }

    /// The two triangles, wound counter-clockwise.
    #[inline]
    pub fn indices(&self) -> &'static [u32; 6] {
        &QUAD_INDICES
    }

    /// Where the quad sits when drawn on its own.
    #[inline]
    pub fn offset(&self) -> &Vector3<Real> {
        &self.offset
    }

    /// Model transform used when this quad is drawn on its own.
    pub fn transform(&self) -> Matrix4<Real> {
        Matrix4::new_translation(&self.offset)
    }

    /// Geometric normal of the first triangle, `(v1 - v0) × (v2 - v0)`; not normalized.
    pub fn normal(&self) -> Vector3<Real> {
        let v0 = self.attributes.position(0);
        let v1 = self.attributes.position(1);
        let v2 = self.attributes.position(2);
        (v1 - v0).cross(&(v2 - v0))
    }

    /// Buffers uploaded by the last attach, if any.
    #[inline]
    pub fn binding(&self) -> Option<&Binding> {
        self.binding.as_ref()
    }
}

impl Drawable for Quad {
    fn attach<P: Pipeline>(&mut self, pipeline: &mut P) -> Result<(), PipelineError> {
        self.binding = Some(self.attributes.upload(pipeline, &QUAD_INDICES, self.normals)?);
        Ok(())
    }

    fn render<P: Pipeline>(&self, pipeline: &mut P) -> Result<(), PipelineError> {
        let binding = self.binding.as_ref().ok_or(PipelineError::NotAttached)?;
        pipeline.set_uniform(UniformSlot::ModelView, &self.transform());
        pipeline.draw_indexed(binding)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transform::rotation;
    use facet_pipeline::{AttributeUsage, RecordingPipeline};
    use nalgebra::vector;

    fn triangle_normal(attrs: &VertexAttributes, tri: &[u32]) -> Vector3<Real> {
        let [a, b, c] = [0, 1, 2].map(|k| attrs.position(tri[k] as usize));
        (b - a).cross(&(c - a))
    }

    #[test]
    fn vertices_are_coplanar_and_face_declared_normal() {
        let quad = Quad::new(vector![2.0, 1.0], Vector3::zeros());
        let attrs = quad.attributes();
        assert_eq!(attrs.vertex_count(), 4);
        assert!((0..4).all(|i| attrs.position(i).z == 0.0));
        for tri in QUAD_INDICES.chunks_exact(3) {
            let n = triangle_normal(attrs, tri).normalize();
            assert_eq!(n, attrs.normal(tri[0] as usize));
        }
        // full edge lengths in, half extents out
        assert_eq!(attrs.position(2), nalgebra::point![1.0, 0.5, 0.0]);
    }

    #[test]
    fn adjust_keeps_normals_on_rotation() {
        let mut quad = Quad::new(vector![1.0, 1.0], Vector3::zeros());
        quad.adjust(&rotation(&Vector3::x_axis(), -90.0));
        let n = quad.normal().normalize();
        for i in 0..4 {
            assert!((quad.attributes().normal(i) - n).norm() < 1e-5);
        }
        assert!((n - Vector3::y()).norm() < 1e-5);
    }

    #[test]
    fn adjusted_is_adjust_by_value() {
        let m = rotation(&Vector3::y_axis(), 30.0);
        let mut a = Quad::new(vector![1.0, 3.0], Vector3::zeros());
        a.adjust(&m);
        let b = Quad::new(vector![1.0, 3.0], Vector3::zeros()).adjusted(&m);
        assert_eq!(a.attributes(), b.attributes());
    }

    #[test]
    fn standalone_draw_uses_offset() {
        let mut p = RecordingPipeline::new();
        let mut quad = Quad::new(vector![1.0, 1.0], vector![0.0, 0.0, -5.0]);
        assert!(matches!(
            quad.render(&mut p),
            Err(PipelineError::NotAttached)
        ));
        quad.attach(&mut p).unwrap();
        quad.render(&mut p).unwrap();

        let draw = &p.draws()[0];
        assert_eq!(draw.count, 6);
        assert_eq!(
            draw.attributes,
            vec![
                AttributeUsage::Position,
                AttributeUsage::Normal,
                AttributeUsage::Color,
                AttributeUsage::Texcoord
            ]
        );
        assert_eq!(draw.model_view, Some(quad.transform()));
        assert_eq!(quad.transform()[(2, 3)], -5.0);
    }
}
