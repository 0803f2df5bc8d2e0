use trailwright_core::{Aabb, RibbonMesh};

use crate::{MeshSink, Result};

#[derive(Debug, Clone, PartialEq)]
pub struct Submission {
    pub vertex_count: usize,
    pub index_count: usize,
    pub bounds: Aabb,
    pub vertex_bytes: Vec<u8>,
}

/// In-memory sink that keeps every submission. Stands in for a GPU upload.
#[derive(Debug, Default)]
pub struct RecordingSink {
    submissions: Vec<Submission>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn submissions(&self) -> &[Submission] {
        &self.submissions
    }

    pub fn last(&self) -> Option<&Submission> {
        self.submissions.last()
    }
}

impl MeshSink for RecordingSink {
    fn submit(&mut self, mesh: &RibbonMesh, bounds: &Aabb) -> Result<()> {
        self.submissions.push(Submission {
            vertex_count: mesh.vertices.len(),
            index_count: mesh.indices.len(),
            bounds: *bounds,
            vertex_bytes: mesh.vertex_bytes().to_vec(),
        });
        Ok(())
    }
}
