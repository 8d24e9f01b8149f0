use crate::config::{HdrfConfig, StateKind};
use crate::error::VcError;
use crate::graph::Graph;
use crate::partitioning::stats::PartitioningStats;
use crate::state::coordinated::CoordinatedPartitionState;
use crate::state::PartitionState;
use crate::util::io::VcWriter;
use log::info;
use std::path::Path;

pub fn partition_file_path(output_dir: &str, partition: usize) -> String {
    format!("{}/partition_{}.csv", output_dir, partition)
}

/// Partition files are only available from a state that keeps the edges of each partition.
pub fn check_partitions_writable(config: &HdrfConfig) -> Result<(), VcError> {
    match config.state_kind {
        StateKind::Coordinated => Ok(()),
        StateKind::Basic => Err(VcError::Config(
            "Writing partitions needs the coordinated state, found the basic state".to_owned(),
        )),
    }
}

/// Writes one edge list file per partition, using the vertex names of `graph`.
pub fn write_partitions(
    graph: &Graph,
    state: &CoordinatedPartitionState,
    output_dir: &str,
    separator: u8,
) -> Result<(), VcError> {
    if !Path::new(output_dir).is_dir() {
        return Err(VcError::NotDirectory(output_dir.to_owned()));
    }
    for partition in 0..state.num_partitions() {
        let file_path = partition_file_path(output_dir, partition);
        let edges = state.partition_edges(partition);
        let mut writer = VcWriter::new(file_path.clone(), separator, false)?;
        writer.write_rows(
            edges
                .iter()
                .map(|edge| (graph.vertex_name(edge.source()), graph.vertex_name(edge.target()))),
        )?;
        writer.finish()?;
        info!("Wrote {} edges of partition {} to '{}'", edges.len(), partition, file_path);
    }
    Ok(())
}

pub fn write_stats(stats: &PartitioningStats, file_path: &str) -> Result<(), VcError> {
    let mut writer = VcWriter::new(file_path.to_owned(), b',', true)?;
    writer.write_row(stats)?;
    writer.finish()?;
    info!("Wrote partitioning stats to '{}'", file_path);
    Ok(())
}
