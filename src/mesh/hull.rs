use std::collections::{BTreeSet, HashMap};

use facet_common::ArrayIndex;
use nalgebra::{Matrix4, Point3};

use crate::{mesh::view::local_vertex, Error, MeshView, Real};

/// An owned position and triangle index buffer, with no other attributes.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct IndexedMesh<Idx: ArrayIndex = u32> {
    /// Flat `xyz` positions.
    pub positions: Vec<Real>,
    /// Triangle vertex ordinals, three per triangle.
    pub indices: Vec<Idx>,
}

impl IndexedMesh {
    /// An 8-vertex cube of side `side`, centered at the origin, wound counter-clockwise when seen
    /// from outside.
    ///
    /// Neighboring faces share corners, so unlike a [Voxel](crate::Voxel) its silhouette is
    /// non-empty from any outside viewpoint.
    pub fn cube(side: Real) -> Self {
        let h = side / 2.0;
        #[rustfmt::skip]
        let positions = vec![
            -h, -h,  h,
             h, -h,  h,
             h,  h,  h,
            -h,  h,  h,
             h, -h, -h,
            -h, -h, -h,
            -h,  h, -h,
             h,  h, -h,
        ];
        #[rustfmt::skip]
        let indices = vec![
            0, 1, 2, 2, 3, 0, // front
            4, 5, 6, 6, 7, 4, // back
            1, 4, 7, 7, 2, 1, // right
            5, 0, 3, 3, 6, 5, // left
            3, 2, 7, 7, 6, 3, // top
            5, 4, 1, 1, 0, 5, // bottom
        ];
        Self { positions, indices }
    }
}

impl<Idx: ArrayIndex> IndexedMesh<Idx> {
    /// Number of vertices in the position buffer.
    #[inline]
    pub fn vertex_count(&self) -> usize {
        self.positions.len() / 3
    }

    /// This mesh, placed by `transform`.
    #[inline]
    pub fn view(&self, transform: Matrix4<Real>) -> MeshView<'_, Idx> {
        MeshView::new_unchecked(&self.positions, &self.indices, transform)
    }
}

type Cell = [i64; 3];

/// The 27 cells within one step of `cell`, itself included.
fn neighborhood([x, y, z]: Cell) -> impl Iterator<Item = Cell> {
    (-1..=1).flat_map(move |dx| {
        (-1..=1).flat_map(move |dy| (-1..=1).map(move |dz| [x + dx, y + dy, z + dz]))
    })
}

/// A mesh whose coincident vertices have been merged, along with where each source vertex went.
///
/// Welded indices use the same type as the source indices.
#[derive(Debug, Clone, PartialEq)]
pub struct Welded<Idx: ArrayIndex = u32> {
    /// The merged mesh.
    pub mesh: IndexedMesh<Idx>,
    /// `remap[i]` is the welded vertex that source vertex `i` was merged into.
    pub remap: Vec<Idx>,
}

impl<Idx: ArrayIndex> Welded<Idx> {
    /// Merge each source vertex into the first welded vertex within `tolerance` of it.
    ///
    /// Welded vertices keep the position of the source vertex that created them. Candidates are
    /// found on a grid of `tolerance`-sized cells, searching every cell adjacent to the vertex's
    /// own, so two vertices within `tolerance` always meet however the grid splits them.
    /// Triangles keep their order and winding; ones that collapse are kept as-is.
    ///
    /// # Errors
    ///
    /// * [`NonPositiveTolerance`](Error::NonPositiveTolerance) if `tolerance` isn't > 0
    /// * [`PositionStride`](Error::PositionStride), [`IndexOutOfRange`](Error::IndexOutOfRange)
    ///   for malformed buffers
    /// * [`IndexOverflow`](Error::IndexOverflow) if the welded vertex count doesn't fit in `Idx`
    #[cfg_attr(feature = "tracing", tracing::instrument(level = "debug", skip(positions, indices)))]
    pub fn new(positions: &[Real], indices: &[Idx], tolerance: Real) -> Result<Self, Error> {
        // catches NaN too
        if !(tolerance > 0.0) {
            return Err(Error::NonPositiveTolerance(tolerance));
        }
        if positions.len() % 3 != 0 {
            return Err(Error::PositionStride(positions.len()));
        }
        let vertices = positions.len() / 3;
        let cell_of = |p: &Point3<Real>| -> Cell { p.coords.map(|c| (c / tolerance).floor() as i64).into() };

        let mut grid = HashMap::<Cell, Vec<(usize, Idx)>>::with_capacity(vertices);
        let mut welded = Vec::<Real>::with_capacity(positions.len());
        let mut remap = Vec::with_capacity(vertices);
        for i in 0..vertices {
            let p = local_vertex(positions, i);
            let cell = cell_of(&p);
            let existing = neighborhood(cell)
                .filter_map(|n| grid.get(&n))
                .flatten()
                .filter(|(w, _)| (local_vertex(&welded, *w) - p).norm() <= tolerance)
                .min_by_key(|(w, _)| *w)
                .map(|(_, idx)| *idx);
            let target = match existing {
                Some(idx) => idx,
                None => {
                    let next = welded.len() / 3;
                    let idx = Idx::from_ordinal(next).ok_or(Error::IndexOverflow(next))?;
                    welded.extend_from_slice(p.coords.as_slice());
                    grid.entry(cell).or_default().push((next, idx));
                    idx
                }
            };
            remap.push(target);
        }

        let indices = indices
            .iter()
            .map(|i| {
                remap.get(i.ordinal()).copied().ok_or(Error::IndexOutOfRange {
                    index: i.ordinal(),
                    vertices,
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        #[cfg(feature = "tracing")]
        tracing::debug!(from = vertices, to = welded.len() / 3, "welded");

        Ok(Self {
            mesh: IndexedMesh {
                positions: welded,
                indices,
            },
            remap,
        })
    }

    /// Source vertices merged into `welded`.
    pub fn sources(&self, welded: Idx) -> impl Iterator<Item = usize> + '_ {
        self.remap
            .iter()
            .enumerate()
            .filter(move |(_, w)| **w == welded)
            .map(|(i, _)| i)
    }

    /// Every source vertex merged into any of `welded`.
    pub fn expand(&self, welded: &BTreeSet<Idx>) -> BTreeSet<usize> {
        self.remap
            .iter()
            .enumerate()
            .filter(|(_, w)| welded.contains(*w))
            .map(|(i, _)| i)
            .collect()
    }

    /// The merged mesh, placed by `transform`.
    #[inline]
    pub fn view(&self, transform: Matrix4<Real>) -> MeshView<'_, Idx> {
        self.mesh.view(transform)
    }
}
