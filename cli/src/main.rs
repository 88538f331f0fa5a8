use anyhow::Result;
use clap::Parser;
use eln2rdf::archive::read_records_from_file;
use eln2rdf::consts::DEFAULT_PATTERN;
use eln2rdf::graph::OutputGraph;
use eln2rdf::mapper::map_record;
use eln2rdf::mapping::Mapping;
use eln2rdf::record::parse_export;
use eln2rdf::viz::graph_to_dot;
use log::info;
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(name = "eln2rdf")]
#[command(about = "Convert an ELN export to RDF Turtle format")]
#[command(arg_required_else_help = true)]
struct Cli {
    /// Path to the ELN export file
    eln_export: PathBuf,
    /// Path to the YAML keymap file
    #[clap(long, short)]
    keymap: PathBuf,
    /// Name of the output Turtle file. Defaults to basename of input + .ttl
    #[clap(long, short)]
    output: Option<PathBuf>,
    /// Suffix pattern to match JSON files in the ELN export
    #[clap(long, default_value = DEFAULT_PATTERN)]
    pattern: String,
    /// Plot the RDF graph as an image (requires GraphViz)
    #[clap(long)]
    plot: Option<PathBuf>,
    /// Institute label attached to every record
    #[clap(long, default_value = "Sample Institute")]
    institute: String,
    /// Verbose mode - sets the RUST_LOG level to info, defaults to warning level
    #[clap(long, short, action, default_value = "false")]
    verbose: bool,
    /// Debug mode - sets the RUST_LOG level to debug, defaults to warning level
    #[clap(long, action, default_value = "false")]
    debug: bool,
}

fn main() -> Result<()> {
    let cmd = Cli::parse();

    let log_level = if cmd.verbose { "info" } else { "warn" };
    let log_level = if cmd.debug { "debug" } else { log_level };
    std::env::set_var("RUST_LOG", log_level);
    env_logger::init();

    let output = match cmd.output {
        Some(path) => path,
        None => {
            let stem = cmd.eln_export.file_stem().unwrap_or_default();
            PathBuf::from(stem).with_extension("ttl")
        }
    };

    let mapping = Mapping::from_yaml_file(&cmd.keymap)?;
    let mut graph = OutputGraph::with_prefixes(&mapping.namespaces);

    for (_name, json) in read_records_from_file(&cmd.eln_export, &cmd.pattern)? {
        let record = parse_export(&json, &cmd.institute);
        map_record(&record, &mapping, &mut graph)?;
    }

    graph.write_turtle(&output)?;
    info!("RDF graph serialized to {}", output.display());

    if let Some(image) = cmd.plot {
        let dot = graph_to_dot(&graph);
        let dot_path = image.with_extension("dot");
        std::fs::write(&dot_path, dot)?;
        let format = image
            .extension()
            .and_then(|ext| ext.to_str())
            .unwrap_or("png");
        // call graphviz to render the image
        let rendered = std::process::Command::new("dot")
            .args([
                &format!("-T{format}"),
                dot_path.to_str().unwrap_or_default(),
                "-o",
                image.to_str().unwrap_or_default(),
            ])
            .output()?;
        if !rendered.status.success() {
            return Err(anyhow::anyhow!(
                "Failed to render graph image: {}",
                String::from_utf8_lossy(&rendered.stderr)
            ));
        }
        info!("RDF graph plotted and saved as {}", image.display());
    }

    Ok(())
}
