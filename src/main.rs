//! uatgraph CLI: concept co-occurrence clustering and taxonomy distances.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use miette::{IntoDiagnostic, Result};
use rand::seq::SliceRandom;
use rand::SeedableRng;

use uatgraph::config::PipelineConfig;
use uatgraph::cooccur::{self, WeightPolicy};
use uatgraph::distance::DistanceAggregator;
use uatgraph::graph::components::split_components;
use uatgraph::graph::forest::ForestPartitioner;
use uatgraph::graph::WeightedGraph;
use uatgraph::interner::LabelInterner;
use uatgraph::taxonomy::Taxonomy;
use uatgraph::{io, graph::forest};

#[derive(Parser)]
#[command(name = "uatgraph", version, about = "Concept co-occurrence clustering and taxonomy distances")]
struct Cli {
    /// Path to a TOML config file.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Build the co-occurrence graph and report vertex/edge/component counts.
    Stats {
        /// Records file (tab-separated key + labels); overrides the config.
        #[arg(long)]
        input: Option<PathBuf>,
    },

    /// Run the full clustering pipeline and dump one file per subgraph.
    Cluster {
        /// Records file; overrides the config.
        #[arg(long)]
        input: Option<PathBuf>,

        /// Target partition count for the forest partitioner.
        #[arg(long)]
        num_subgraphs: Option<usize>,

        /// Pruning threshold; edges with weight <= this are dropped.
        #[arg(long)]
        prune_min: Option<f64>,

        /// Edge-weighting policy: "count" or "relax".
        #[arg(long)]
        policy: Option<WeightPolicy>,
    },

    /// Ingest the taxonomy source and persist the tree and name index.
    IngestTaxonomy {
        /// Taxonomy source JSON; overrides the config.
        #[arg(long)]
        source: Option<PathBuf>,
    },

    /// Print taxonomy distances for random label pairs.
    SampleDistances {
        /// Number of pairs to sample.
        #[arg(long, default_value = "100")]
        count: usize,

        /// RNG seed for reproducible samples.
        #[arg(long)]
        seed: Option<u64>,
    },

    /// Compute per-record distances to a reference-concept list.
    Distances {
        /// Records file; overrides the config.
        #[arg(long)]
        input: Option<PathBuf>,

        /// Comma-separated reference concept labels, in output-column order.
        #[arg(long)]
        concepts: String,

        /// Output table path (default: <workdir>/distances.tsv).
        #[arg(long)]
        output: Option<PathBuf>,
    },
}

fn main() -> Result<()> {
    miette::set_hook(Box::new(|_| {
        Box::new(
            miette::MietteHandlerOpts::new()
                .terminal_links(true)
                .unicode(true)
                .context_lines(3)
                .build(),
        )
    }))
    .ok(); // Ignore error if hook already set (e.g., in tests)

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    let mut config = PipelineConfig::load(cli.config.as_deref()).into_diagnostic()?;

    match cli.command {
        Commands::Stats { input } => {
            if let Some(path) = input {
                config.uat_data = path;
            }
            let records = io::read_records(&config.uat_data).into_diagnostic()?;
            let mut interner = LabelInterner::new();
            let graph = cooccur::build_graph(&records, &mut interner, &config);
            println!(
                "Loaded graph, vertices: {}, edges: {}",
                graph.num_vertices(),
                graph.num_edges()
            );

            let parts = split_components(graph);
            println!("Found {} connected components", parts.len());
            for (i, part) in parts.iter().enumerate() {
                println!(
                    "  {} vertices: {}, edges: {}",
                    i,
                    part.num_vertices(),
                    part.num_edges()
                );
            }
        }

        Commands::Cluster {
            input,
            num_subgraphs,
            prune_min,
            policy,
        } => {
            if let Some(path) = input {
                config.uat_data = path;
            }
            if let Some(n) = num_subgraphs {
                config.num_subgraphs = n;
            }
            if let Some(min) = prune_min {
                config.edge_prune_min = min;
            }
            if let Some(p) = policy {
                config.weight_policy = p;
            }

            let records = io::read_records(&config.uat_data).into_diagnostic()?;
            let mut interner = LabelInterner::new();
            let mut graph = cooccur::build_graph(&records, &mut interner, &config);
            cooccur::prune(&mut graph, config.edge_prune_min);
            cooccur::to_distance_weights(&mut graph);

            std::fs::create_dir_all(&config.workdir).into_diagnostic()?;

            let components = split_components(graph);
            println!("Found {} connected components", components.len());

            let mut dumped = 0;
            for component in components {
                for part in forest::partition(&component, config.num_subgraphs) {
                    if part.num_edges() == 0 {
                        continue;
                    }
                    let path = config.workdir.join(format!("subgraph-{dumped}.tsv"));
                    io::dump_graph(&part, &interner, &path).into_diagnostic()?;
                    println!(
                        "  {} vertices: {}, edges: {} -> {}",
                        dumped,
                        part.num_vertices(),
                        part.num_edges(),
                        path.display()
                    );
                    dumped += 1;
                }
            }
            println!("Dumped {dumped} subgraphs to {}", config.workdir.display());
        }

        Commands::IngestTaxonomy { source } => {
            if let Some(path) = source {
                config.uat_source_data = path;
            }
            let taxonomy = Taxonomy::ingest_file(&config.uat_source_data).into_diagnostic()?;
            taxonomy.persist(&config.workdir).into_diagnostic()?;
            println!(
                "Ingested {} taxonomy nodes, {} resolvable names",
                taxonomy.num_nodes(),
                taxonomy.num_names()
            );
            println!("Artifacts written to {}", config.workdir.display());
        }

        Commands::SampleDistances { count, seed } => {
            let taxonomy = Taxonomy::load(&config.workdir).into_diagnostic()?;
            let labels: Vec<&str> = taxonomy.names().collect();
            if labels.len() < 2 {
                miette::bail!("taxonomy has fewer than two resolvable names");
            }

            let mut rng = match seed {
                Some(s) => rand::rngs::StdRng::seed_from_u64(s),
                None => rand::rngs::StdRng::from_entropy(),
            };

            let mut remaining = count;
            while remaining > 0 {
                let v = labels.choose(&mut rng).copied().unwrap_or_default();
                let w = labels.choose(&mut rng).copied().unwrap_or_default();
                if v == w {
                    continue;
                }
                remaining -= 1;

                let (d, ancestor) = taxonomy.distance(v, w).into_diagnostic()?;
                let v_level = taxonomy
                    .resolve_name(v)
                    .and_then(|uri| taxonomy.get(uri))
                    .map(|n| n.level)
                    .unwrap_or_default();
                let w_level = taxonomy
                    .resolve_name(w)
                    .and_then(|uri| taxonomy.get(uri))
                    .map(|n| n.level)
                    .unwrap_or_default();
                println!(
                    "{d:.4} between \"{v}\" (level={v_level}) and \"{w}\" (level={w_level}), closest ancestor \"{}\"",
                    ancestor.name
                );
            }
        }

        Commands::Distances {
            input,
            concepts,
            output,
        } => {
            if let Some(path) = input {
                config.uat_data = path;
            }
            let concept_labels: Vec<String> = concepts
                .split(',')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_string)
                .collect();
            if concept_labels.is_empty() {
                miette::bail!("no reference concepts provided");
            }

            let records = io::read_records(&config.uat_data).into_diagnostic()?;
            let mut interner = LabelInterner::new();
            let mut graph = cooccur::build_graph(&records, &mut interner, &config);
            cooccur::prune(&mut graph, config.edge_prune_min);
            cooccur::to_distance_weights(&mut graph);

            // Shortest paths run over the spanning tree of the largest
            // connected component; labels outside it count as missing.
            let components = split_components(graph);
            let largest = components
                .into_iter()
                .max_by_key(WeightedGraph::num_vertices)
                .unwrap_or_default();
            let tree = ForestPartitioner::new(&largest).extract();

            let mut aggregator =
                DistanceAggregator::new(&interner, &tree, &concept_labels).into_diagnostic()?;
            let rows = aggregator.aggregate_all(&records);

            std::fs::create_dir_all(&config.workdir).into_diagnostic()?;
            let out_path = output.unwrap_or_else(|| config.workdir.join("distances.tsv"));
            io::write_distance_table(&out_path, aggregator.concept_labels(), &rows)
                .into_diagnostic()?;
            println!("Wrote {} rows to {}", rows.len(), out_path.display());

            let report = aggregator.missing_report();
            if report.count > 0 {
                println!(
                    "Missing labels: {} occurrences of {} distinct labels",
                    report.count,
                    report.labels.len()
                );
                for label in &report.labels {
                    println!("  {label}");
                }
            }
        }
    }

    Ok(())
}
