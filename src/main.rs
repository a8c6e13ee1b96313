//! mcp-scaffold CLI entrypoint
//! Parses command-line arguments and dispatches to the library.
#![deny(unsafe_code)]

// Internal imports (std, crate)
use mcp_scaffold::{
    analysis::{
        AnalysisResult, CapabilityKind, DiagramFormat, analyze_project, check_output_path,
        render_diagram, validate_project,
    },
    core::{Language, Pattern, ProjectSpec, Transport},
    generation::{GenerationSource, ScaffoldOptions, add_capability, create_project},
    infrastructure::ShellCommandExecutor,
    languages::registry,
    templates::{EnvTemplateConfigReader, TemplateResolver, resolve_output_dir},
};
use std::path::{Path, PathBuf};

// External imports (alphabetized)
use anyhow::Context;
use clap::Parser;
use tracing::{Level, debug, info};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "mcp-scaffold")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Print debug logs to stderr
    #[arg(short, long, global = true)]
    verbose: bool,
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(clap::Subcommand, Debug)]
pub enum Commands {
    /// Create a new MCP server project
    New {
        /// Project name (letters, digits, dashes and underscores)
        name: String,
        /// Target language: python, typescript, go or rust
        #[arg(short, long)]
        language: Language,
        /// Architectural pattern: basic, enterprise or microservices
        #[arg(short, long, default_value = "basic")]
        pattern: Pattern,
        /// Transport: stdio, sse or http
        #[arg(short, long, default_value = "stdio")]
        transport: Transport,
        /// Parent directory of the new project
        #[arg(long)]
        output_dir: Option<PathBuf>,
        /// Directory holding <language>/<pattern> template trees
        #[arg(long)]
        template_dir: Option<PathBuf>,
        /// Skip `git init`
        #[arg(long)]
        no_git: bool,
        /// Skip dependency installation
        #[arg(long)]
        no_install: bool,
    },
    /// Render a diagram of a project's tools, resources and prompts
    Diagram {
        /// Project directory
        #[arg(default_value = ".")]
        path: PathBuf,
        /// Output format: mermaid or markdown
        #[arg(short, long, default_value = "mermaid")]
        format: DiagramFormat,
        /// Write the diagram to this file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Check a project's structure
    Validate {
        /// Project directory
        #[arg(default_value = ".")]
        path: PathBuf,
        /// Print the report as JSON
        #[arg(long)]
        json: bool,
    },
    /// List the capabilities a project declares
    Analyze {
        /// Project directory
        #[arg(default_value = ".")]
        path: PathBuf,
        /// Print the analysis as JSON
        #[arg(long)]
        json: bool,
    },
    /// Add a tool, resource or prompt to an existing project
    Add {
        /// Capability kind: tool, resource or prompt
        kind: CapabilityKind,
        /// Name of the capability; resources also accept a URI
        name: String,
        /// Project directory
        #[arg(long, default_value = ".")]
        path: PathBuf,
    },
    /// List supported languages, patterns and transports
    List,
}

/// Parameters for project creation
struct NewParams<'a> {
    name: &'a str,
    language: Language,
    pattern: Pattern,
    transport: Transport,
    output_dir: Option<&'a Path>,
    template_dir: Option<&'a Path>,
    options: ScaffoldOptions,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let default_level = if cli.verbose { Level::DEBUG } else { Level::WARN };
    let filter = EnvFilter::builder()
        .with_default_directive(default_level.into())
        .from_env_lossy();
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    debug!("Starting mcp-scaffold CLI");
    match &cli.command {
        Commands::New {
            name,
            language,
            pattern,
            transport,
            output_dir,
            template_dir,
            no_git,
            no_install,
        } => {
            new_project(NewParams {
                name,
                language: *language,
                pattern: *pattern,
                transport: *transport,
                output_dir: output_dir.as_deref(),
                template_dir: template_dir.as_deref(),
                options: ScaffoldOptions {
                    init_git: !no_git,
                    install_dependencies: !no_install,
                },
            })
            .await?
        }
        Commands::Diagram {
            path,
            format,
            output,
        } => diagram(path, *format, output.as_deref()).await?,
        Commands::Validate { path, json } => validate(path, *json).await?,
        Commands::Analyze { path, json } => analyze(path, *json).await?,
        Commands::Add { kind, name, path } => add(path, *kind, name).await?,
        Commands::List => list(),
    }
    Ok(())
}

/// Generate a new project and print the next steps
async fn new_project(params: NewParams<'_>) -> anyhow::Result<()> {
    let spec = ProjectSpec::new(
        params.name,
        params.language,
        params.pattern,
        params.transport,
    )?;
    let target = resolve_output_dir(params.name, params.output_dir, &EnvTemplateConfigReader)
        .context("Failed to resolve output directory")?;
    let resolver = TemplateResolver::discover(params.template_dir);

    info!(
        language = %spec.language,
        pattern = %spec.pattern,
        transport = %spec.transport,
        "Creating MCP server project"
    );
    let summary = create_project(
        &spec,
        &target,
        &resolver,
        params.options,
        &ShellCommandExecutor::new(),
    )
    .await
    .with_context(|| format!("Failed to create project '{}'", params.name))?;

    let source = match &summary.source {
        GenerationSource::Template(tree) => format!("template {}", tree.display()),
        GenerationSource::Builtin => "built-in generator".to_string(),
    };
    println!(
        "Created {} ({} {}, {}) at {}",
        spec.name(),
        spec.language.display_name(),
        spec.pattern,
        spec.transport,
        summary.path.display()
    );
    println!("  {} files from {}", summary.files, source);
    for command in &summary.commands {
        println!("  ran `{command}`");
    }

    let support = registry().get(spec.language)?;
    println!("\nNext steps:");
    println!("  cd {}", summary.path.display());
    if !params.options.install_dependencies {
        println!("  {}", support.install_command());
    }
    println!("  {}", support.run_command(spec.names(), spec.transport));
    Ok(())
}

async fn diagram(path: &Path, format: DiagramFormat, output: Option<&Path>) -> anyhow::Result<()> {
    if let Some(file) = output {
        check_output_path(file)?;
    }
    let analysis = analyze_project(path)
        .await
        .with_context(|| format!("Failed to analyze {}", path.display()))?;
    let rendered = render_diagram(&analysis, format);

    match output {
        Some(file) => {
            tokio::fs::write(file, &rendered)
                .await
                .with_context(|| format!("Failed to write diagram to {}", file.display()))?;
            println!("Diagram written to {}", file.display());
        }
        None => print!("{rendered}"),
    }
    Ok(())
}

async fn validate(path: &Path, json: bool) -> anyhow::Result<()> {
    let report = validate_project(path)
        .await
        .with_context(|| format!("Failed to validate {}", path.display()))?;

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        for error in report.errors() {
            println!("error: {error}");
        }
        for warning in report.warnings() {
            println!("warning: {warning}");
        }
        if report.valid() {
            println!("{} is a valid MCP server project", path.display());
        }
    }

    if !report.valid() {
        anyhow::bail!(
            "Validation failed with {} error(s)",
            report.errors().len()
        );
    }
    Ok(())
}

async fn analyze(path: &Path, json: bool) -> anyhow::Result<()> {
    let analysis = analyze_project(path)
        .await
        .with_context(|| format!("Failed to analyze {}", path.display()))?;

    if json {
        println!("{}", serde_json::to_string_pretty(&analysis)?);
    } else {
        print_analysis(&analysis);
    }
    Ok(())
}

fn print_analysis(analysis: &AnalysisResult) {
    println!(
        "{} ({})",
        analysis.project_name,
        analysis.language.display_name()
    );
    for (title, kind) in [
        ("Tools", CapabilityKind::Tool),
        ("Resources", CapabilityKind::Resource),
        ("Prompts", CapabilityKind::Prompt),
    ] {
        let identifiers = analysis.identifiers(kind);
        println!("{title} ({}):", identifiers.len());
        for identifier in identifiers {
            println!("  - {identifier}");
        }
    }
}

async fn add(path: &Path, kind: CapabilityKind, name: &str) -> anyhow::Result<()> {
    let added = add_capability(path, kind, name)
        .await
        .with_context(|| format!("Failed to add {kind} '{name}'"))?;
    println!(
        "Added {} '{}' to {}",
        added.kind,
        added.identifier,
        added.file.display()
    );
    Ok(())
}

fn list() {
    let join = |values: Vec<&str>| values.join(", ");
    println!(
        "Languages:  {}",
        join(Language::all().iter().map(|l| l.as_str()).collect())
    );
    println!(
        "Patterns:   {}",
        join(Pattern::all().iter().map(|p| p.as_str()).collect())
    );
    println!(
        "Transports: {}",
        join(Transport::all().iter().map(|t| t.as_str()).collect())
    );
    println!(
        "Diagrams:   {}, {}",
        DiagramFormat::Mermaid,
        DiagramFormat::Markdown
    );
}
