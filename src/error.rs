//! Rich diagnostic error types for uatgraph.
//!
//! Each subsystem defines its own error type with miette `#[diagnostic]` derives,
//! providing error codes, help text, and source chains so users know exactly what
//! went wrong and how to fix it.

use miette::Diagnostic;
use thiserror::Error;

/// Top-level error type for uatgraph.
///
/// Each variant wraps a subsystem-specific error, preserving the full diagnostic
/// chain (error codes, help text, source chains) through to the user.
#[derive(Debug, Error, Diagnostic)]
pub enum UatError {
    #[error(transparent)]
    #[diagnostic(transparent)]
    Graph(#[from] GraphError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Label(#[from] LabelError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Taxonomy(#[from] TaxonomyError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Pipeline(#[from] PipelineError),
}

// ---------------------------------------------------------------------------
// Graph errors
// ---------------------------------------------------------------------------

#[derive(Debug, Error, Diagnostic)]
pub enum GraphError {
    #[error("vertex {vertex} is not present in the graph")]
    #[diagnostic(
        code(uatgraph::graph::vertex_not_found),
        help(
            "Shortest-path computation requires the source vertex to exist. \
             Check that the label was interned and survived pruning."
        )
    )]
    VertexNotFound { vertex: usize },
}

// ---------------------------------------------------------------------------
// Label interner errors
// ---------------------------------------------------------------------------

#[derive(Debug, Error, Diagnostic)]
pub enum LabelError {
    #[error("no label was ever assigned id {id}")]
    #[diagnostic(
        code(uatgraph::label::id_not_found),
        help(
            "Reverse lookup only works for ids handed out by `intern()`. \
             Ids are dense 0..N-1 for the N labels interned so far."
        )
    )]
    IdNotFound { id: usize },
}

// ---------------------------------------------------------------------------
// Taxonomy errors
// ---------------------------------------------------------------------------

#[derive(Debug, Error, Diagnostic)]
pub enum TaxonomyError {
    #[error("label is not present in the taxonomy: \"{label}\"")]
    #[diagnostic(
        code(uatgraph::taxonomy::label_not_found),
        help(
            "Taxonomy distance resolves canonical names and alt labels through \
             the name index. Verify the spelling, or re-ingest the taxonomy \
             source if the index is stale."
        )
    )]
    LabelNotFound { label: String },

    #[error("taxonomy structure is inconsistent at uri \"{uri}\"")]
    #[diagnostic(
        code(uatgraph::taxonomy::inconsistent),
        help(
            "A parent or node lookup failed while walking the tree. The persisted \
             artifacts are likely corrupt or from a different taxonomy version — \
             re-ingest the source file."
        )
    )]
    Inconsistent { uri: String },

    #[error("failed to read taxonomy source {path}: {source}")]
    #[diagnostic(
        code(uatgraph::taxonomy::source_io),
        help("Check that the taxonomy source file exists and is readable.")
    )]
    SourceIo {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse taxonomy data: {message}")]
    #[diagnostic(
        code(uatgraph::taxonomy::parse),
        help(
            "The taxonomy source must be a nested JSON structure with `uri`, \
             `name`, `altLabels` and `children` fields."
        )
    )]
    Parse { message: String },

    #[error("failed to persist taxonomy artifact {path}: {source}")]
    #[diagnostic(
        code(uatgraph::taxonomy::persist),
        help("Check that the work directory exists and is writable.")
    )]
    Persist {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

// ---------------------------------------------------------------------------
// Configuration errors
// ---------------------------------------------------------------------------

#[derive(Debug, Error, Diagnostic)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    #[diagnostic(
        code(uatgraph::config::read),
        help("Check that the path is correct and the file is readable.")
    )]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config file {path}: {message}")]
    #[diagnostic(
        code(uatgraph::config::parse),
        help(
            "The config file must be TOML. Recognized keys: default_edge_weight, \
             edge_prune_min, num_subgraphs, weight_policy, workdir, uat_data, \
             uat_source_data."
        )
    )]
    Parse { path: String, message: String },

    #[error("unknown weight policy \"{value}\"")]
    #[diagnostic(
        code(uatgraph::config::weight_policy),
        help("Valid weight policies are: \"count\", \"relax\".")
    )]
    UnknownWeightPolicy { value: String },
}

// ---------------------------------------------------------------------------
// Pipeline / I/O errors
// ---------------------------------------------------------------------------

#[derive(Debug, Error, Diagnostic)]
pub enum PipelineError {
    #[error("input file is not available: {path}")]
    #[diagnostic(
        code(uatgraph::pipeline::missing_input),
        help(
            "The run aborts when a required input file is missing. \
             Check the path or override it in the config file."
        )
    )]
    MissingInput { path: String },

    #[error("I/O error on {path}: {source}")]
    #[diagnostic(
        code(uatgraph::pipeline::io),
        help(
            "A filesystem operation failed. Check permissions and that the \
             output directory exists."
        )
    )]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("reference concept is not present in the co-occurrence graph: \"{label}\"")]
    #[diagnostic(
        code(uatgraph::pipeline::unknown_concept),
        help(
            "Reference concepts must appear in the input records and survive \
             pruning. Check the concept spelling against the input vocabulary."
        )
    )]
    UnknownConcept { label: String },

    #[error(transparent)]
    #[diagnostic(transparent)]
    Label(#[from] LabelError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Graph(#[from] GraphError),
}

/// Convenience alias for functions returning uatgraph results.
pub type UatResult<T> = std::result::Result<T, UatError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn graph_error_converts_to_uat_error() {
        let err = GraphError::VertexNotFound { vertex: 42 };
        let uat: UatError = err.into();
        assert!(matches!(uat, UatError::Graph(GraphError::VertexNotFound { .. })));
    }

    #[test]
    fn pipeline_error_wraps_label_error() {
        let label_err = LabelError::IdNotFound { id: 7 };
        let pipeline_err: PipelineError = label_err.into();
        assert!(matches!(pipeline_err, PipelineError::Label(LabelError::IdNotFound { .. })));
    }

    #[test]
    fn error_display_messages_are_descriptive() {
        let err = TaxonomyError::LabelNotFound {
            label: "dark matter".into(),
        };
        let msg = format!("{err}");
        assert!(msg.contains("dark matter"));
    }
}
