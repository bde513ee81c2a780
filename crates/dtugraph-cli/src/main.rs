//! Dtugraph CLI - headless knowledge-graph inspection

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::{Parser, Subcommand};
use dtugraph_core::config::Config;
use dtugraph_core::controller::{GraphViewController, InteractionEvent};
use dtugraph_core::graph::{GraphModel, Tier};
use dtugraph_core::render::{RecordingAdapter, RenderFrame};
use dtugraph_core::stats::{GraphStatistics, format_stats};
use dtugraph_core::view::{Emphasis, LayoutKind, ViewIntent};
use tracing::{debug, warn};

#[derive(Parser)]
#[command(name = "dtugraph")]
#[command(author, version, about = "Knowledge-graph view engine", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Output format (text or json)
    #[arg(long, global = true, default_value = "text")]
    format: OutputFormat,

    /// Quiet mode (minimal output)
    #[arg(short, long, global = true)]
    quiet: bool,
}

#[derive(Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
enum OutputFormat {
    #[default]
    Text,
    Json,
}

#[derive(Subcommand)]
enum Commands {
    /// Show statistics for a graph file
    Stats {
        /// JSON graph file with `nodes` and `edges`
        file: PathBuf,
    },

    /// Compute the view of a graph file and print the resulting frame
    View {
        /// JSON graph file with `nodes` and `edges`
        file: PathBuf,
        #[command(flatten)]
        view: ViewArgs,
        /// Search query matched against node labels
        #[arg(short = 'Q', long)]
        query: Option<String>,
        /// Node to hover; highlights its direct neighbors
        #[arg(long)]
        focus: Option<String>,
        /// Node to select
        #[arg(long)]
        select: Option<String>,
        /// Hide node labels
        #[arg(long)]
        hide_labels: bool,
    },

    /// Write an export snapshot of a graph file
    Export {
        /// JSON graph file with `nodes` and `edges`
        file: PathBuf,
        #[command(flatten)]
        view: ViewArgs,
        /// Output path (defaults to stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Configuration management
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(clap::Args)]
struct ViewArgs {
    /// Visible tier (repeatable; defaults to the configured tiers)
    #[arg(short, long = "tier", value_parser = parse_tier)]
    tiers: Vec<Tier>,
    /// Layout kind (force, circle, grid, hierarchy, concentric)
    #[arg(short, long, value_parser = parse_layout)]
    layout: Option<LayoutKind>,
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Get a configuration value
    Get { key: String },
    /// Set a configuration value
    Set { key: String, value: String },
    /// List all configuration values
    List,
    /// Reset configuration to defaults
    Reset,
    /// Show config file path
    Path,
}

fn parse_tier(s: &str) -> Result<Tier, String> {
    s.parse().map_err(|e: dtugraph_core::Error| e.to_string())
}

fn parse_layout(s: &str) -> Result<LayoutKind, String> {
    s.parse().map_err(|e: dtugraph_core::Error| e.to_string())
}

fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("dtugraph=info".parse()?),
        )
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Stats { file } => cmd_stats(&file, cli.format),
        Commands::View {
            file,
            view,
            query,
            focus,
            select,
            hide_labels,
        } => {
            let options = ViewOptions {
                view,
                query,
                focus,
                select,
                hide_labels,
            };
            cmd_view(&file, options, cli.format)
        }
        Commands::Export { file, view, output } => {
            cmd_export(&file, view, output.as_deref(), cli.quiet)
        }
        Commands::Config { action } => cmd_config(action, cli.quiet),
    };

    if let Err(err) = &result {
        if let Some(core) = err.downcast_ref::<dtugraph_core::Error>() {
            if let Some(hint) = core.suggestion() {
                eprintln!("[{}] hint: {}", core.code(), hint);
            }
        }
    }
    result
}

// ============================================================================
// Command Implementations
// ============================================================================

struct ViewOptions {
    view: ViewArgs,
    query: Option<String>,
    focus: Option<String>,
    select: Option<String>,
    hide_labels: bool,
}

fn load_model(path: &Path) -> anyhow::Result<GraphModel> {
    let contents = fs::read_to_string(path)
        .with_context(|| format!("Failed to read graph file: {}", path.display()))?;
    let model = GraphModel::from_json(&contents)?;
    if model.dropped_duplicates() > 0 {
        warn!(
            dropped = model.dropped_duplicates(),
            "Graph file contains duplicate node ids"
        );
    }
    Ok(model)
}

/// Load the model into a headless controller and apply the view arguments
fn build_controller(
    path: &Path,
    view: ViewArgs,
    extra: Vec<ViewIntent>,
) -> anyhow::Result<GraphViewController<RecordingAdapter>> {
    let config = Config::load()?;
    let model = load_model(path)?;

    let mut controller = GraphViewController::with_config(RecordingAdapter::new(), &config);
    controller.set_model(model);

    let mut intents = Vec::new();
    if !view.tiers.is_empty() {
        intents.push(ViewIntent::SetTiers(view.tiers.into_iter().collect()));
    }
    if let Some(layout) = view.layout {
        intents.push(ViewIntent::SetLayout(layout));
    }
    intents.extend(extra);
    controller.dispatch_batch(intents);
    Ok(controller)
}

fn drain_events(controller: &mut GraphViewController<RecordingAdapter>) {
    for event in controller.take_events() {
        if event.is_failure() {
            warn!(event = event.event_type_name(), "View event");
        } else {
            debug!(event = event.event_type_name(), "View event");
        }
    }
}

fn cmd_stats(path: &Path, format: OutputFormat) -> anyhow::Result<()> {
    let model = load_model(path)?;
    let stats = GraphStatistics::compute(&model);
    match format {
        OutputFormat::Text => print!("{}", format_stats(&stats)),
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&stats)?),
    }
    Ok(())
}

fn cmd_view(path: &Path, options: ViewOptions, format: OutputFormat) -> anyhow::Result<()> {
    let mut extra = Vec::new();
    if let Some(query) = options.query {
        extra.push(ViewIntent::SetQuery(query));
    }
    if options.hide_labels {
        extra.push(ViewIntent::SetLabelsVisible(false));
    }

    let mut controller = build_controller(path, options.view, extra)?;
    if let Some(id) = options.select.as_deref() {
        controller.sync_selected_node_id(Some(id));
    }
    if let Some(id) = options.focus {
        controller.handle_interaction(InteractionEvent::HoverStart(id));
    }
    drain_events(&mut controller);

    match format {
        OutputFormat::Text => print!("{}", format_frame(controller.frame())),
        OutputFormat::Json => println!("{}", controller.export_snapshot().to_json_pretty()?),
    }
    Ok(())
}

fn cmd_export(
    path: &Path,
    view: ViewArgs,
    output: Option<&Path>,
    quiet: bool,
) -> anyhow::Result<()> {
    let mut controller = build_controller(path, view, Vec::new())?;
    drain_events(&mut controller);
    let snapshot = controller.export_snapshot();
    let json = snapshot.to_json_pretty()?;

    match output {
        Some(out) => {
            fs::write(out, json)
                .with_context(|| format!("Failed to write export: {}", out.display()))?;
            if !quiet {
                println!(
                    "Exported {} nodes and {} edges to {}",
                    snapshot.nodes.len(),
                    snapshot.edges.len(),
                    out.display()
                );
            }
        }
        None => println!("{}", json),
    }
    Ok(())
}

fn cmd_config(action: ConfigAction, quiet: bool) -> anyhow::Result<()> {
    match action {
        ConfigAction::Get { key } => {
            let config = Config::load()?;
            let value = config.get(&key)?;
            println!("{}", value);
        }
        ConfigAction::Set { key, value } => {
            let mut config = Config::load()?;
            config.set(&key, &value)?;
            config.save()?;
            if !quiet {
                println!("Set {} = {}", key, value);
            }
        }
        ConfigAction::List => {
            let config = Config::load()?;
            let items = config.list()?;
            for (key, value) in items {
                println!("{} = {}", key, value);
            }
        }
        ConfigAction::Reset => {
            Config::reset()?;
            if !quiet {
                println!("Configuration reset to defaults.");
            }
        }
        ConfigAction::Path => {
            let path = Config::config_path()?;
            println!("{}", path.display());
        }
    }
    Ok(())
}

/// Format a frame as a text report
fn format_frame(frame: &RenderFrame) -> String {
    let mut output = String::new();

    output.push_str(&format!("Layout:   {}\n", frame.layout.kind));
    output.push_str(&format!(
        "Visible:  {} nodes, {} edges ({} dropped)\n",
        frame.visible.node_count(),
        frame.visible.edge_count(),
        frame.visible.dropped_edges()
    ));
    if frame.search.is_active() {
        output.push_str(&format!(
            "Query:    \"{}\" ({} matches)\n",
            frame.search.query(),
            frame.search.len()
        ));
    }
    if let Some(focus) = frame.highlight.focus() {
        output.push_str(&format!(
            "Focus:    {} ({} focused, {} faded)\n",
            focus,
            frame.highlight.focused_ids().len(),
            frame.highlight.faded_ids().len()
        ));
    }
    if let Some(selection) = &frame.selection {
        let whereabouts = if selection.visible {
            "visible"
        } else if selection.in_model {
            "filtered out"
        } else {
            "not loaded"
        };
        output.push_str(&format!("Selected: {} ({})\n", selection.id, whereabouts));
    }

    if frame.visible.is_empty() {
        output.push_str("\nNo visible nodes.\n");
        return output;
    }

    output.push_str("\nNodes:\n");
    for node in frame.visible.nodes() {
        let marker = match (frame.is_selected(&node.id), frame.is_search_match(&node.id)) {
            (true, _) => '>',
            (false, true) => '*',
            (false, false) => ' ',
        };
        let emphasis = match frame.emphasis(&node.id) {
            Emphasis::Neutral => "",
            Emphasis::Focused => " [focused]",
            Emphasis::Faded => " [faded]",
        };
        let tier = node.tier.map(|t| t.as_str()).unwrap_or("-");
        let size = frame.visual(&node.id).map(|v| v.size).unwrap_or_default();
        if frame.labels_visible {
            output.push_str(&format!(
                "{} {:16} {:24} {:8} {:>4}{}\n",
                marker, node.id, node.label, tier, size, emphasis
            ));
        } else {
            output.push_str(&format!(
                "{} {:16} {:8} {:>4}{}\n",
                marker, node.id, tier, size, emphasis
            ));
        }
    }

    if frame.visible.edge_count() > 0 {
        output.push_str("\nEdges:\n");
        for edge in frame.visible.edges() {
            match &edge.edge_type {
                Some(kind) => {
                    output.push_str(&format!("  {} -> {} ({})\n", edge.source, edge.target, kind))
                }
                None => output.push_str(&format!("  {} -> {}\n", edge.source, edge.target)),
            }
        }
    }

    output
}
