use super::{Relation, SlotTopology};

/// An abstract 0..3 enumeration of neighbor slots of a mesh face. The
/// topology owner knows the geometric meaning (e.g. "the edge across from
/// vertex 2"); this crate only needs the arity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MeshRelation {
    Neighbor0,
    Neighbor1,
    Neighbor2,
    Neighbor3,
}

const ALL_MESH_RELATIONS: [MeshRelation; 4] = [
    MeshRelation::Neighbor0,
    MeshRelation::Neighbor1,
    MeshRelation::Neighbor2,
    MeshRelation::Neighbor3,
];

impl Relation for MeshRelation {
    const COUNT: usize = 4;

    fn all() -> &'static [Self] {
        &ALL_MESH_RELATIONS
    }

    fn index(&self) -> usize {
        match self {
            MeshRelation::Neighbor0 => 0,
            MeshRelation::Neighbor1 => 1,
            MeshRelation::Neighbor2 => 2,
            MeshRelation::Neighbor3 => 3,
        }
    }
}

/// A face of a polygonal mesh, carrying its own index, its (at most four)
/// neighbor face indices, and the dual relation to travel back from each
/// neighbor.
///
/// `neighbors[i] == NO_NEIGHBOR` marks relation `i` as absent (a mesh
/// boundary edge, or a face with fewer than four sides).
#[derive(Debug, Clone)]
pub struct Face {
    pub index: usize,
    pub neighbors: [i32; 4],
    pub neighbor_relations: [MeshRelation; 4],
}

/// Sentinel marking an absent neighbor along a relation.
pub const NO_NEIGHBOR: i32 = -1;

impl Face {
    pub fn new(index: usize) -> Self {
        Self {
            index,
            neighbors: [NO_NEIGHBOR; 4],
            neighbor_relations: [MeshRelation::Neighbor0; 4],
        }
    }

    /// Registers a neighbor across `relation`, reachable back from the
    /// neighbor via `dual_relation`.
    pub fn set_neighbor(&mut self, relation: MeshRelation, neighbor: usize, dual_relation: MeshRelation) {
        let idx = relation.index();
        self.neighbors[idx] = neighbor as i32;
        self.neighbor_relations[idx] = dual_relation;
    }
}

/// A slot topology derived from a mesh face graph, where each face is a
/// slot. Populated from face adjacency computed upstream by the mesh
/// pipeline (out of scope for this crate).
#[derive(Debug, Clone)]
pub struct MeshTopology {
    faces: Vec<Face>,
}

impl MeshTopology {
    pub fn new(faces: Vec<Face>) -> Self {
        Self { faces }
    }

    /// Only for testing and diagnostics.
    pub fn faces(&self) -> &[Face] {
        &self.faces
    }
}

impl SlotTopology<MeshRelation> for MeshTopology {
    fn slot_count(&self) -> usize {
        self.faces.len()
    }

    fn neighbor_of(&self, slot: usize, relation: MeshRelation) -> Option<(usize, MeshRelation)> {
        let face = &self.faces[slot];
        let idx = relation.index();
        let neighbor = face.neighbors[idx];
        if neighbor == NO_NEIGHBOR {
            return None;
        }
        Some((neighbor as usize, face.neighbor_relations[idx]))
    }
}
