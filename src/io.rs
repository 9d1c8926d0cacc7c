//! Delimited-text boundary: record input, graph dumps, distance tables.
//!
//! All formats are tab-separated. Input records are `key\tlabel\tlabel...`
//! lines; graph dumps are `label_v\tlabel_w\tweight` lines, one per
//! undirected edge; distance tables carry a header row naming the reference
//! concepts.

use std::fmt::Write as _;
use std::path::Path;

use crate::cooccur::Record;
use crate::distance::DistanceRow;
use crate::error::PipelineError;
use crate::graph::WeightedGraph;
use crate::interner::LabelInterner;

/// Read tab-separated records: first field key, remaining fields labels.
///
/// Empty fields are filtered, blank lines skipped. A missing input file is
/// fatal and aborts the run.
pub fn read_records(path: &Path) -> Result<Vec<Record>, PipelineError> {
    if !path.exists() {
        return Err(PipelineError::MissingInput {
            path: path.display().to_string(),
        });
    }
    let content = std::fs::read_to_string(path).map_err(|source| PipelineError::Io {
        path: path.display().to_string(),
        source,
    })?;

    let mut records = Vec::new();
    for line in content.lines() {
        if line.trim().is_empty() {
            continue;
        }
        let mut fields = line.split('\t');
        let key = match fields.next() {
            Some(key) if !key.is_empty() => key.to_string(),
            _ => continue,
        };
        let labels: Vec<String> = fields
            .map(str::trim)
            .filter(|label| !label.is_empty())
            .map(str::to_string)
            .collect();
        records.push(Record { key, labels });
    }

    tracing::info!(path = %path.display(), records = records.len(), "read input records");
    Ok(records)
}

/// Dump a graph as `label_v\tlabel_w\tweight` lines, one per undirected edge.
///
/// Edges are sorted by label pair so the dump is reproducible across runs.
pub fn dump_graph(
    graph: &WeightedGraph,
    interner: &LabelInterner,
    path: &Path,
) -> Result<(), PipelineError> {
    let mut rows: Vec<(String, String, f64)> = Vec::with_capacity(graph.num_edges());
    for (v, w, weight) in graph.edges() {
        let a = interner.label_of(v).map_err(PipelineError::from)?;
        let b = interner.label_of(w).map_err(PipelineError::from)?;
        if a <= b {
            rows.push((a.to_string(), b.to_string(), weight));
        } else {
            rows.push((b.to_string(), a.to_string(), weight));
        }
    }
    rows.sort_by(|x, y| (&x.0, &x.1).cmp(&(&y.0, &y.1)));

    let mut out = String::new();
    for (a, b, weight) in rows {
        let _ = writeln!(out, "{a}\t{b}\t{weight}");
    }
    std::fs::write(path, out).map_err(|source| PipelineError::Io {
        path: path.display().to_string(),
        source,
    })
}

/// Write the distance table: a header row naming the reference concepts, then
/// one `key\tfloat...` row per record.
pub fn write_distance_table<'a>(
    path: &Path,
    concept_labels: impl Iterator<Item = &'a str>,
    rows: &[DistanceRow],
) -> Result<(), PipelineError> {
    let mut out = String::from("key");
    for label in concept_labels {
        out.push('\t');
        out.push_str(label);
    }
    out.push('\n');
    for row in rows {
        out.push_str(&row.key);
        for value in &row.values {
            let _ = write!(out, "\t{value}");
        }
        out.push('\n');
    }
    std::fs::write(path, out).map_err(|source| PipelineError::Io {
        path: path.display().to_string(),
        source,
    })
}
