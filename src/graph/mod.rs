use rand::seq::SliceRandom;
use rand::Rng;

pub mod loader;

pub type VertexId = u64;
pub type PartitionId = usize;

/// An edge of the input stream. Direction is kept for output only, partitioning treats
/// `(src, dst)` as an unordered pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, new)]
pub struct Edge {
    pub src_vertex_id: VertexId,
    pub dst_vertex_id: VertexId,
}

impl Edge {
    #[inline(always)]
    pub fn source(&self) -> VertexId {
        self.src_vertex_id
    }

    #[inline(always)]
    pub fn target(&self) -> VertexId {
        self.dst_vertex_id
    }

    #[inline(always)]
    pub fn is_self_loop(&self) -> bool {
        self.src_vertex_id == self.dst_vertex_id
    }
}

/// Edge list of a loaded graph, together with the external names of its vertices.
#[derive(Default, Debug, Clone)]
pub struct Graph {
    edges: Vec<Edge>,
    vertex_names: Vec<String>,
}

impl Graph {
    pub fn from_edges(edges: Vec<Edge>) -> Self {
        Graph { edges, vertex_names: Vec::new() }
    }

    pub fn vertex_count(&self) -> usize {
        self.vertex_names.len()
    }

    pub fn edges_count(&self) -> usize {
        self.edges.len()
    }

    pub fn append_vertex(&mut self, name: String) -> VertexId {
        self.vertex_names.push(name);
        (self.vertex_names.len() - 1) as VertexId
    }

    pub fn append_edge(&mut self, edge: Edge) {
        self.edges.push(edge);
    }

    pub fn randomize_edges<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        self.edges.shuffle(rng);
    }

    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    /// External name of `vertex_id`, or its numeric id when the graph was built without names.
    pub fn vertex_name(&self, vertex_id: VertexId) -> String {
        self.vertex_names
            .get(vertex_id as usize)
            .cloned()
            .unwrap_or_else(|| vertex_id.to_string())
    }
}

#[cfg(test)]
mod tests {
    use crate::graph::{Edge, Graph};
    use rand::rngs::SmallRng;
    use rand::SeedableRng;

    #[test]
    fn append_and_names() {
        let mut graph = Graph::default();
        let a = graph.append_vertex("a".to_owned());
        let b = graph.append_vertex("b".to_owned());
        graph.append_edge(Edge::new(a, b));
        graph.append_edge(Edge::new(b, b));

        assert_eq!(graph.vertex_count(), 2);
        assert_eq!(graph.edges_count(), 2);
        assert_eq!(graph.vertex_name(b), "b");
        assert_eq!(graph.vertex_name(7), "7");
        assert!(!graph.edges()[0].is_self_loop());
        assert!(graph.edges()[1].is_self_loop());
    }

    #[test]
    fn randomize_keeps_edges() {
        let edges = (0..100).map(|i| Edge::new(i, i + 1)).collect::<Vec<_>>();
        let mut graph = Graph::from_edges(edges.clone());
        graph.randomize_edges(&mut SmallRng::seed_from_u64(7));

        let mut shuffled = graph.edges().to_vec();
        assert_ne!(shuffled, edges);
        shuffled.sort_by_key(|e| e.src_vertex_id);
        assert_eq!(shuffled, edges);
    }
}
