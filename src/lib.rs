//! vcpart is a streaming vertex-cut graph partitioner. Edges are assigned one at a time to one
//! of `P` partitions with the HDRF (High-Degree Replicated First) heuristic, which replicates
//! the lower degree endpoint of an edge when it has to replicate one, while keeping the edge
//! load of the partitions balanced. Many worker threads process the same edge stream against
//! one shared state.

// Enable warnings for all clippy lints. This automatically enables new lints shipped with new rust
// versions.
#![warn(
    clippy::correctness,
    clippy::style,
    clippy::complexity,
    clippy::perf,
    clippy::pedantic,
    clippy::cargo,
    clippy::restriction
)]
// Now selectively disable unneeded lints.
#![allow(
    clippy::indexing_slicing,               // Allow `vec[i]` indexing.
    clippy::module_name_repetitions,        // Allow.
    clippy::use_debug,                      // Allow.
    clippy::float_arithmetic,               // Allow.
    clippy::integer_arithmetic,             // Allow.
    clippy::integer_division,               // Allow.
    clippy::implicit_return,                // Allow.
    clippy::use_self,                       // Allow.
    clippy::shadow_same,                    // Allow.
    clippy::multiple_crate_versions,        // Disabled.
    clippy::missing_docs_in_private_items,  // Disabled.
    clippy::missing_errors_doc,             // Disabled.
    clippy::missing_inline_in_public_items, // Disabled.
    clippy::unknown_clippy_lints,           // To enable naming new lints added to nightly.
    clippy::result_expect_used,             // Should use `expect` rather than `unwrap`.
    clippy::option_expect_used,             // Should use `expect` rather than `unwrap`.
    clippy::panic,                          // Allow.
    clippy::must_use_candidate,             // Allow.
    clippy::inline_always,                  // Allow.
    clippy::as_conversions,                 // Allow but only when absolutely necessary.
    clippy::implicit_hasher                 // Default hasher is fine for now.
)]
// Do not allow print statements. Use `log::info!()` or equivalent instead.
#![deny(clippy::print_stdout)]

pub mod config;
pub mod error;
pub mod graph;
pub mod partitioning;
pub mod state;
pub mod util;

#[macro_use]
extern crate serde_derive;
#[macro_use]
extern crate derive_new;

use crate::config::HdrfConfig;
use crate::error::VcError;
use crate::graph::Graph;
use crate::partitioning::driver::{PartitionOutput, Partitioner};

/// Partitions the edges of `graph` according to `config`.
pub fn partition_graph(graph: &Graph, config: HdrfConfig) -> Result<PartitionOutput, VcError> {
    let partitioner = Partitioner::new(config)?;
    partitioner.partition(graph.edges())
}

#[cfg(test)]
mod tests {
    use crate::config::HdrfConfig;
    use crate::graph::loader::{load_edge_list, LoadOptions};
    use crate::partition_graph;
    use crate::partitioning::output::{partition_file_path, write_partitions, write_stats};
    use crate::util::io::get_buf_reader;
    use std::io::BufRead;

    #[test]
    fn load_partition_and_write() {
        let options = LoadOptions::new(None, Some(b'#'), false);
        let graph =
            load_edge_list("data/test_data/small_graph.csv", &options).expect("Graph not loaded");
        let config = HdrfConfig { threads: 2, seed: Some(11), ..HdrfConfig::with_partitions(3) };
        let output = partition_graph(&graph, config).expect("Partitioning failed");

        assert_eq!(output.stats.num_edges, 9);
        assert_eq!(output.stats.num_vertices, 6);

        let output_dir = std::env::temp_dir().join(format!("vcpart_test_{}", std::process::id()));
        std::fs::create_dir_all(&output_dir).expect("Could not create output dir");
        let output_dir = output_dir.to_str().expect("Temp dir is not valid utf-8").to_owned();

        let state = output.state.as_coordinated().expect("Default state is coordinated");
        write_partitions(&graph, state, &output_dir, b',').expect("Could not write partitions");
        let mut written_lines = Vec::new();
        for partition in 0..3 {
            let reader = get_buf_reader(&partition_file_path(&output_dir, partition))
                .expect("Partition file missing");
            written_lines.extend(reader.lines().filter_map(Result::ok));
        }
        written_lines.sort();
        assert_eq!(written_lines.len(), 9);
        assert!(written_lines.contains(&"dave,dave".to_owned()));
        assert!(written_lines.contains(&"alice,bob".to_owned()));

        let stats_file = format!("{}/stats.csv", output_dir);
        write_stats(&output.stats, &stats_file).expect("Could not write stats");
        let stats_lines =
            get_buf_reader(&stats_file).expect("Stats file missing").lines().count();
        assert_eq!(stats_lines, 2);

        std::fs::remove_dir_all(&output_dir).expect("Could not remove output dir");
    }

    #[test]
    fn write_partitions_needs_directory() {
        let graph = crate::graph::Graph::default();
        let output = partition_graph(&graph, HdrfConfig::with_partitions(2)).expect("Failed");
        let state = output.state.as_coordinated().expect("Default state is coordinated");
        let result = write_partitions(&graph, state, "data/test_data/missing_dir", b',');
        assert!(result.is_err());
    }
}
