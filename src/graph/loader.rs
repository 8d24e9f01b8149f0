use crate::error::VcError;
use crate::graph::{Edge, Graph, VertexId};
use crate::util::io::get_buf_reader;
use crate::util::timer::VcTimer;
use csv::Reader;
use hashbrown::HashMap;
use log::{debug, info, warn};
use std::fs::File;
use std::io::BufReader;

pub const DEFAULT_SEPARATOR: u8 = b',';
pub const DEFAULT_HAS_HEADERS: bool = false;

#[derive(Debug, Clone, new)]
pub struct LoadOptions {
    separator: Option<u8>,
    comment_char: Option<u8>,
    has_headers: bool,
}

impl Default for LoadOptions {
    fn default() -> Self {
        LoadOptions { separator: None, comment_char: None, has_headers: DEFAULT_HAS_HEADERS }
    }
}

/// Loads an edge list file with one `src<sep>dst` pair per line. Vertex names are mapped
/// to dense ids in order of first appearance. Extra columns are ignored.
pub fn load_edge_list(edge_file: &str, options: &LoadOptions) -> Result<Graph, VcError> {
    info!("Loading edges from file '{}'", edge_file);
    let mut reader = get_csv_reader(edge_file, options)?;

    if options.has_headers {
        let headers = reader.headers().map_err(|e| {
            VcError::LoadGraph(format!("Could not load headers from file '{}': {}", edge_file, e))
        })?;
        if headers.len() < 2 {
            return Err(VcError::LoadGraph(format!(
                "Expected at least 2 header columns in file '{}', found {}",
                edge_file,
                headers.len()
            )));
        }
    }

    let mut graph = Graph::default();
    let mut vertices_map: HashMap<String, VertexId> = HashMap::new();

    let timer = VcTimer::now();
    let mut src_empty_count = 0;
    let mut dst_empty_count = 0;
    for (index, line) in reader.records().enumerate() {
        let line = line.map_err(|e| {
            VcError::LoadGraph(format!(
                "Could not read line {} of file '{}': {}",
                index, edge_file, e
            ))
        })?;
        let mut line_parts = line.iter();

        let from_id_string = line_parts.next().map(str::trim).unwrap_or_default();
        if from_id_string.is_empty() {
            debug!("From id string is empty at line '{}' in file '{}'. Ignoring", index, edge_file);
            src_empty_count += 1;
            continue;
        }
        let to_id_string = line_parts.next().map(str::trim).unwrap_or_default();
        if to_id_string.is_empty() {
            debug!("To id string is empty at line '{}' in file '{}'. Ignoring", index, edge_file);
            dst_empty_count += 1;
            continue;
        }

        let from_id = get_or_add_vertex(from_id_string, &mut graph, &mut vertices_map);
        let to_id = get_or_add_vertex(to_id_string, &mut graph, &mut vertices_map);
        graph.append_edge(Edge::new(from_id, to_id));

        if index > 0 && index % 1_000_000 == 0 {
            info!("Processed {} edges in {}", index, timer.elapsed().to_seconds_string());
        }
    }
    if src_empty_count > 0 {
        warn!("Skipped {} edges with empty src ids", src_empty_count);
    }
    if dst_empty_count > 0 {
        warn!("Skipped {} edges with empty dst ids", dst_empty_count);
    }
    info!(
        "Loaded {} vertices and {} edges in {}",
        graph.vertex_count(),
        graph.edges_count(),
        timer.elapsed().to_seconds_string()
    );
    Ok(graph)
}

fn get_or_add_vertex(
    name: &str,
    graph: &mut Graph,
    vertices_map: &mut HashMap<String, VertexId>,
) -> VertexId {
    if let Some(&vertex_id) = vertices_map.get(name) {
        vertex_id
    } else {
        let vertex_id = graph.append_vertex(name.to_owned());
        vertices_map.insert(name.to_owned(), vertex_id);
        vertex_id
    }
}

fn get_csv_reader(
    file_path: &str,
    options: &LoadOptions,
) -> Result<Reader<BufReader<File>>, VcError> {
    Ok(csv::ReaderBuilder::new()
        .has_headers(options.has_headers)
        .delimiter(options.separator.unwrap_or(DEFAULT_SEPARATOR))
        .double_quote(false)
        .flexible(true)
        .comment(options.comment_char)
        .from_reader(get_buf_reader(file_path)?))
}

#[cfg(test)]
mod tests {
    use crate::error::VcError;
    use crate::graph::loader::{load_edge_list, LoadOptions};
    use crate::graph::Edge;

    #[test]
    fn load_small_graph() {
        let options = LoadOptions::new(None, Some(b'#'), false);
        let graph =
            load_edge_list("data/test_data/small_graph.csv", &options).expect("Graph not loaded");

        assert_eq!(graph.vertex_count(), 6);
        assert_eq!(graph.edges_count(), 9);
        assert_eq!(graph.edges()[0], Edge::new(0, 1));
        assert_eq!(graph.vertex_name(0), "alice");
        assert_eq!(graph.vertex_name(5), "frank");
        // Self loop on 'dave'.
        assert!(graph.edges().iter().any(|e| e.is_self_loop()));
    }

    #[test]
    fn skip_empty_ids_with_headers() {
        let options = LoadOptions::new(Some(b'\t'), None, true);
        let graph =
            load_edge_list("data/test_data/with_headers.tsv", &options).expect("Graph not loaded");

        assert_eq!(graph.vertex_count(), 3);
        assert_eq!(graph.edges_count(), 2);
        assert_eq!(graph.edges(), &[Edge::new(0, 1), Edge::new(1, 2)]);
    }

    #[test]
    fn missing_file() {
        let result = load_edge_list("data/test_data/does_not_exist.csv", &LoadOptions::default());
        match result {
            Err(VcError::ReadFile(path, _)) => {
                assert_eq!(path, "data/test_data/does_not_exist.csv");
            }
            other => panic!("Expected ReadFile error, got {:?}", other),
        }
    }
}
