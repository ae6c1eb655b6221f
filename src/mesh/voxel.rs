use std::ops::Range;

use facet_pipeline::{Binding, Drawable, Pipeline, PipelineError, UniformSlot};
use nalgebra::{Matrix4, Vector2, Vector3};

use crate::{
    transform::rotation, Error, MeshView, NormalMode, Quad, Real, Rgba, Spin, VertexAttributes,
    Welded, DEFAULT_COLOR,
};

/// The faces of a [Voxel], in merge order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Face {
    /// +z
    Front = 0,
    /// +x
    Right = 1,
    /// -z
    Back = 2,
    /// -x
    Left = 3,
    /// +y
    Top = 4,
    /// -y
    Bottom = 5,
}

impl Face {
    /// Every face, in merge order.
    pub const ALL: [Self; 6] = [
        Self::Front,
        Self::Right,
        Self::Back,
        Self::Left,
        Self::Top,
        Self::Bottom,
    ];

    /// Slot of this face within a voxel's merged buffers.
    #[inline]
    pub const fn ordinal(self) -> usize {
        self as usize
    }

    /// Rotation taking a +z-facing quad to this face.
    pub fn rotation(self) -> Matrix4<Real> {
        match self {
            Face::Front => Matrix4::identity(),
            Face::Right => rotation(&Vector3::y_axis(), 90.0),
            Face::Back => rotation(&Vector3::y_axis(), 180.0),
            Face::Left => rotation(&Vector3::y_axis(), 270.0),
            Face::Top => rotation(&Vector3::x_axis(), -90.0),
            Face::Bottom => rotation(&Vector3::x_axis(), 90.0),
        }
    }

    /// Unit normal pointing out of the cube through this face.
    pub fn outward(self) -> Vector3<Real> {
        match self {
            Face::Front => Vector3::z(),
            Face::Right => Vector3::x(),
            Face::Back => -Vector3::z(),
            Face::Left => -Vector3::x(),
            Face::Top => Vector3::y(),
            Face::Bottom => -Vector3::y(),
        }
    }

    /// A quad of side `side`, pushed out to this face of a cube centered at the origin.
    ///
    /// The quad is moved to `z = side / 2` first, so that [Quad::adjust] only ever sees a
    /// rotation and the normals stay unit length.
    pub fn quad(self, side: Real, color: Rgba) -> Quad {
        let mut quad = Quad::new(Vector2::new(side, side), Vector3::zeros()).with_color(color);
        quad.translate(&Vector3::new(0.0, 0.0, side / 2.0));
        quad.adjusted(&self.rotation())
    }
}

/// A cube assembled from six [Quads](Quad), merged into one set of buffers.
///
/// Faces keep their own vertices (24 in total) so each face has flat normals. Vertex data is baked
/// once, at construction; afterwards only the shared [transform](Voxel::transform) changes.
#[derive(Debug, Clone)]
pub struct Voxel {
    attributes: VertexAttributes,
    indices: Vec<u32>,
    side: Real,
    transform: Matrix4<Real>,
    spin: Spin,
    normals: NormalMode,
    binding: Option<Binding>,
}

impl Voxel {
    /// Vertices per voxel; faces keep their own corners.
    pub const VERTICES: usize = Face::ALL.len() * Quad::VERTICES;
    /// Indices per voxel, two triangles per face.
    pub const INDICES: usize = Face::ALL.len() * 6;

    /// A cube of side `side` centered at `position`.
    pub fn new(side: Real, position: Vector3<Real>) -> Self {
        Self::with_face_colors(side, position, [DEFAULT_COLOR; 6])
    }

    /// As [new](Voxel::new), coloring each face by its [ordinal](Face::ordinal) in `colors`.
    #[cfg_attr(feature = "tracing", tracing::instrument(level = "debug", skip(colors)))]
    pub fn with_face_colors(side: Real, position: Vector3<Real>, colors: [Rgba; 6]) -> Self {
        let mut attributes = VertexAttributes::with_capacity(Self::VERTICES);
        let mut indices = Vec::with_capacity(Self::INDICES);
        for face in Face::ALL {
            let quad = face.quad(side, colors[face.ordinal()]);
            let base = (face.ordinal() * Quad::VERTICES) as u32;
            attributes.extend(quad.attributes());
            indices.extend(quad.indices().iter().map(|i| i + base));
        }
        Self {
            attributes,
            indices,
            side,
            transform: Matrix4::new_translation(&position),
            spin: Spin::default(),
            normals: NormalMode::default(),
            binding: None,
        }
    }

    /// Rotate by `spin` every [step](Voxel::step).
    pub fn with_spin(mut self, spin: Spin) -> Self {
        self.spin = spin;
        self
    }

    /// Choose which normal buffers get uploaded.
    pub fn with_normal_mode(mut self, normals: NormalMode) -> Self {
        self.normals = normals;
        self
    }

    /// Compose one step of [Spin] into the shared transform.
    ///
    /// Vertex data is never touched.
    #[inline]
    pub fn step(&mut self) {
        self.transform = self.spin.apply(&self.transform);
    }

    /// The shared model transform of all six faces.
    #[inline]
    pub fn transform(&self) -> &Matrix4<Real> {
        &self.transform
    }

    /// Edge length.
    #[inline]
    pub fn side(&self) -> Real {
        self.side
    }

    /// Per-tick rotation.
    #[inline]
    pub fn spin(&self) -> Spin {
        self.spin
    }

    /// Merged vertex attributes, in local space.
    #[inline]
    pub fn attributes(&self) -> &VertexAttributes {
        &self.attributes
    }

    /// Merged positions, in local space.
    #[inline]
    pub fn positions(&self) -> &[Real] {
        &self.attributes.positions
    }

    /// Merged triangle indices.
    #[inline]
    pub fn indices(&self) -> &[u32] {
        &self.indices
    }

    /// Vertex ordinals belonging to `face`.
    #[inline]
    pub fn face_vertices(&self, face: Face) -> Range<usize> {
        let start = face.ordinal() * Quad::VERTICES;
        start..start + Quad::VERTICES
    }

    /// Every face with its vertex ordinals, in merge order.
    pub fn faces(&self) -> impl Iterator<Item = (Face, Range<usize>)> + '_ {
        Face::ALL
            .into_iter()
            .map(|face| (face, self.face_vertices(face)))
    }

    /// This voxel's geometry, placed by its current transform.
    #[inline]
    pub fn view(&self) -> MeshView<'_, u32> {
        MeshView::new_unchecked(self.positions(), &self.indices, self.transform)
    }

    /// This voxel's geometry with coincident face corners merged, so neighboring faces share
    /// vertices.
    ///
    /// # Errors
    ///
    /// * [`NonPositiveTolerance`](Error::NonPositiveTolerance) if `tolerance` <= 0
    pub fn welded(&self, tolerance: Real) -> Result<Welded, Error> {
        Welded::new(self.positions(), &self.indices, tolerance)
    }

    /// Buffers uploaded by the last attach, if any.
    #[inline]
    pub fn binding(&self) -> Option<&Binding> {
        self.binding.as_ref()
    }
}

impl Drawable for Voxel {
    /// Upload the merged buffers. Faces are never attached individually.
    fn attach<P: Pipeline>(&mut self, pipeline: &mut P) -> Result<(), PipelineError> {
        self.binding = Some(self.attributes.upload(pipeline, &self.indices, self.normals)?);
        Ok(())
    }

    fn render<P: Pipeline>(&self, pipeline: &mut P) -> Result<(), PipelineError> {
        let binding = self.binding.as_ref().ok_or(PipelineError::NotAttached)?;
        pipeline.set_uniform(UniformSlot::ModelView, &self.transform);
        pipeline.draw_indexed(binding)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use facet_pipeline::RecordingPipeline;
    use nalgebra::vector;

    #[test]
    fn merged_counts() {
        let v = Voxel::new(2.0, Vector3::zeros());
        assert_eq!(v.attributes().vertex_count(), 24);
        assert_eq!(v.indices().len(), 36);
        assert_eq!(v.attributes().normals.len(), 72);
        assert_eq!(v.attributes().colors.len(), 96);
        assert_eq!(v.attributes().texcoords.len(), 48);
    }

    #[test]
    fn triangles_stay_within_their_face() {
        let v = Voxel::new(1.0, Vector3::zeros());
        for face in Face::ALL {
            let range = v.face_vertices(face);
            let tris = &v.indices()[face.ordinal() * 6..face.ordinal() * 6 + 6];
            assert!(tris.iter().all(|&i| range.contains(&(i as usize))));
        }
    }

    #[test]
    fn faces_point_outward() {
        let side = 3.0;
        let v = Voxel::new(side, Vector3::zeros());
        let attrs = v.attributes();
        for face in Face::ALL {
            let out = face.outward();
            for i in v.face_vertices(face) {
                // baked normals are unit and outward
                assert!((attrs.normal(i) - out).norm() < 1e-5, "{face:?} normal");
                // every corner sits on the face plane
                assert!((attrs.position(i).coords.dot(&out) - side / 2.0).abs() < 1e-5);
            }
            let tri = &v.indices()[face.ordinal() * 6..face.ordinal() * 6 + 3];
            let [a, b, c] = [0, 1, 2].map(|k| attrs.position(tri[k] as usize));
            let winding = (b - a).cross(&(c - a));
            assert!(winding.dot(&out) > 0.0, "{face:?} winds clockwise");
        }
    }

    #[test]
    fn step_only_moves_transform() {
        let mut v = Voxel::new(1.0, vector![0.0, 0.0, -5.0]);
        let before = v.attributes().clone();
        let start = *v.transform();
        v.step();
        assert_ne!(*v.transform(), start);
        assert_eq!(*v.transform(), Spin::default().apply(&start));
        assert_eq!(v.attributes(), &before);
        // rotation only; the voxel stays where it was put
        assert_eq!(v.transform()[(2, 3)], -5.0);
    }

    #[test]
    fn renders_merged_buffers_once() {
        let mut p = RecordingPipeline::new();
        let mut v = Voxel::new(1.0, Vector3::zeros()).with_normal_mode(NormalMode::Visualize);
        v.attach(&mut p).unwrap();
        // position, normal, visual normal, color, texcoord, indices
        assert_eq!(p.buffer_count(), 6);
        v.step();
        v.render(&mut p).unwrap();
        assert_eq!(p.draws().len(), 1);
        assert_eq!(p.draws()[0].count, 36);
        assert_eq!(p.draws()[0].model_view, Some(*v.transform()));
    }

    #[test]
    fn face_colors_follow_ordinal() {
        let mut colors = [DEFAULT_COLOR; 6];
        colors[Face::Top.ordinal()] = [0.0, 1.0, 0.0, 1.0];
        let v = Voxel::with_face_colors(1.0, Vector3::zeros(), colors);
        let top = v.face_vertices(Face::Top).start;
        assert_eq!(
            &v.attributes().colors[top * 4..top * 4 + 4],
            &[0.0f32, 1.0, 0.0, 1.0]
        );
        assert_eq!(&v.attributes().colors[0..4], &DEFAULT_COLOR);
    }
}
