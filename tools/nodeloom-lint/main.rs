use clap::Parser;
use nodeloom::context::rules::apply_node_rules;
use nodeloom::prelude::*;
use std::time::Instant;

/// Checks a node graph document for problems an editor would trip over
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Cli {
    /// Path to the graph JSON file
    graph_path: String,
    /// Optional path to a JSON array of value type declarations
    #[arg(short = 't', long)]
    value_types: Option<String>,

    /// Regenerate rule-driven slots before checking
    #[arg(short, long)]
    apply_rules: bool,

    /// Write the (possibly rule-updated) graph to this path
    #[arg(short, long)]
    output: Option<String>,
}

#[derive(Debug, Default)]
struct Report {
    unknown_types: Vec<String>,
    duplicate_ids: Vec<String>,
    dangling_edges: Vec<String>,
    invalid_edges: Vec<String>,
}

impl Report {
    fn problem_count(&self) -> usize {
        self.unknown_types.len()
            + self.duplicate_ids.len()
            + self.dangling_edges.len()
            + self.invalid_edges.len()
    }

    fn print_section(title: &str, entries: &[String]) {
        if entries.is_empty() {
            return;
        }
        println!("\n{} ({}):", title, entries.len());
        for entry in entries {
            println!("  - {}", entry);
        }
    }

    fn print(&self) {
        Self::print_section("Unregistered value types", &self.unknown_types);
        Self::print_section("Duplicate node ids", &self.duplicate_ids);
        Self::print_section("Dangling edges", &self.dangling_edges);
        Self::print_section("Invalid edges", &self.invalid_edges);
    }
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    let cli = Cli::parse();
    let start = Instant::now();

    let mut graph = Graph::from_file(&cli.graph_path)
        .unwrap_or_else(|e| exit_with_error(&format!("Failed to load graph: {}", e)));

    let value_types = match &cli.value_types {
        Some(path) => DeclaredValueType::list_from_file(path)
            .unwrap_or_else(|e| exit_with_error(&format!("Failed to load value types: {}", e))),
        None => Vec::new(),
    };

    if cli.apply_rules {
        for node in &mut graph.nodes {
            apply_node_rules(node);
        }
    }

    let mut builder = GraphContext::builder().graph(graph);
    for value_type in value_types {
        builder = builder.with_value_type(value_type);
    }
    let context = builder.build();

    let report = lint(&context);
    println!(
        "Checked {} nodes and {} edges in {:?}",
        context.graph().nodes.len(),
        context.graph().edges.len(),
        start.elapsed()
    );
    report.print();

    if let Some(output) = &cli.output {
        context
            .graph()
            .save(output)
            .unwrap_or_else(|e| exit_with_error(&format!("Failed to save graph: {}", e)));
        println!("\nGraph written to '{}'", output);
    }

    if report.problem_count() > 0 {
        println!("\n{} problem(s) found.", report.problem_count());
        std::process::exit(2);
    }
    println!("\nNo problems found.");
}

fn lint(context: &GraphContext) -> Report {
    let graph = context.graph();
    let mut report = Report {
        duplicate_ids: graph.duplicate_node_ids(),
        ..Default::default()
    };

    for node in &graph.nodes {
        for slot in &node.slots {
            let Some(value) = &slot.value else {
                continue;
            };
            if !context.value_types().contains(&value.type_id)
                && !report.unknown_types.contains(&value.type_id)
            {
                report.unknown_types.push(value.type_id.clone());
            }
        }
    }

    for edge in &graph.edges {
        if !graph.resolves(edge) {
            report.dangling_edges.push(edge.to_string());
        } else if !context.is_valid(edge) {
            report.invalid_edges.push(edge.to_string());
        }
    }

    report
}

fn exit_with_error(message: &str) -> ! {
    eprintln!("\nError: {}", message);
    std::process::exit(1);
}
