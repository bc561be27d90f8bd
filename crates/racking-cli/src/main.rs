use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::*;
use racking_core::catalog::{Catalog, PanelModel, DEFAULT_CATALOG_FILE};
use racking_core::{preview, EquipmentSummary, EstimateRequest, Estimator, RackingPattern};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "racking")]
#[command(about = "Racking Builder - Estimate mounting hardware for solar panel arrays", long_about = None)]
struct Cli {
    /// Panel model and rail length catalog (JSON)
    #[arg(long = "catalog", global = true, default_value = DEFAULT_CATALOG_FILE)]
    catalog_file: PathBuf,

    /// Log engine detail to stderr (filter with RUST_LOG)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Estimate rails, splices, mounts and clamps for an array
    Estimate {
        /// Input file (YAML or JSON)
        #[arg(short, long)]
        input: PathBuf,

        /// Output file for result (JSON)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Also compute deadload (psf) per row
        #[arg(long)]
        deadload: bool,

        /// Override the mounting pattern (continuous or staggered)
        #[arg(long)]
        pattern: Option<RackingPattern>,
    },

    /// Generate SVG preview of the row layout
    Preview {
        /// Input file (YAML or JSON)
        #[arg(short, long)]
        input: PathBuf,

        /// Output SVG file
        #[arg(short, long)]
        output: PathBuf,
    },

    /// Manage panel models and rail stock lengths
    #[command(subcommand)]
    Catalog(CatalogCommands),
}

#[derive(Subcommand)]
enum CatalogCommands {
    /// Show panel models and rail lengths
    List,

    /// Add a panel model (inches, pounds)
    AddPanel {
        #[arg(long)]
        name: String,
        #[arg(long)]
        width: f64,
        #[arg(long)]
        height: f64,
        #[arg(long)]
        weight: f64,
    },

    /// Remove a panel model by name
    RemovePanel {
        #[arg(long)]
        name: String,
    },

    /// Add a rail stock length (inches)
    AddRail { length: f64 },

    /// Remove a rail stock length (inches)
    RemoveRail { length: f64 },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    if cli.verbose {
        tracing_subscriber::fmt()
            .with_env_filter(
                EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug")),
            )
            .with_writer(std::io::stderr)
            .init();
    }

    match cli.command {
        Commands::Estimate {
            input,
            output,
            deadload,
            pattern,
        } => {
            estimate_command(&cli.catalog_file, input, output, deadload, pattern)?;
        }
        Commands::Preview { input, output } => {
            preview_command(&cli.catalog_file, input, output)?;
        }
        Commands::Catalog(command) => {
            catalog_command(&cli.catalog_file, command)?;
        }
    }

    Ok(())
}

/// Reads a request and fills in anything it leaves to the catalog store.
fn load_request(catalog_file: &Path, input: &Path) -> Result<EstimateRequest> {
    let content = std::fs::read_to_string(input)
        .with_context(|| format!("reading {}", input.display()))?;
    let request: EstimateRequest = match input.extension().and_then(|s| s.to_str()) {
        Some("yaml") | Some("yml") => serde_yaml::from_str(&content)?,
        _ => serde_json::from_str(&content)?,
    };

    if request.panel.is_some() && request.catalog.is_some() {
        return Ok(request);
    }

    let catalog = Catalog::load_or_default(catalog_file)?;
    Ok(catalog.resolve(request)?)
}

fn estimate_command(
    catalog_file: &Path,
    input: PathBuf,
    output: Option<PathBuf>,
    deadload: bool,
    pattern: Option<RackingPattern>,
) -> Result<()> {
    println!("{}", "🔍 Loading input...".bright_blue());

    let mut request = load_request(catalog_file, &input)?;
    request.include_deadload |= deadload;
    if let Some(pattern) = pattern {
        request.config.pattern = pattern;
    }

    println!(
        "  {} rows to mount",
        request.rows.len().to_string().bright_white().bold()
    );
    if let Some(catalog) = &request.catalog {
        println!(
            "  {} rail lengths available",
            catalog.len().to_string().bright_white().bold()
        );
    }
    println!();

    println!("{}", "🚀 Running estimate...".bright_blue());

    let estimator = Estimator::new(request)?;
    let summary = estimator.estimate()?;

    println!();
    println!("{}", "✅ Estimate complete!".bright_green().bold());
    println!();

    print_summary(&summary);

    let json = serde_json::to_string_pretty(&summary)?;
    if let Some(output_path) = output {
        std::fs::write(&output_path, json)?;
        println!(
            "💾 Saved result to {}",
            output_path.display().to_string().bright_white()
        );
    } else {
        println!("{}", json);
    }

    Ok(())
}

fn print_summary(summary: &EquipmentSummary) {
    println!("{}", "📊 Equipment:".bright_yellow().bold());
    println!(
        "  Panels: {}",
        summary.total_panels.to_string().bright_white().bold()
    );
    println!("  Rails:");
    for stock in &summary.rail_counts {
        println!("    • {}\": {} rails", stock.length, stock.count);
    }
    println!(
        "  Mounts: {}",
        summary.total_mounts.to_string().bright_white().bold()
    );
    println!("  Mid clamps: {}", summary.total_mid_clamps);
    println!("  End clamps: {}", summary.total_end_clamps);
    println!("  Splices: {}", summary.total_splices);
    println!(
        "  Total waste: {}",
        format!("{:.2}\"", summary.total_waste).bright_white()
    );
    println!();

    println!("{}", "📐 Rows:".bright_yellow().bold());
    for row in &summary.rows {
        let pieces = row
            .rails
            .stock_counts
            .iter()
            .filter(|s| s.count > 0)
            .map(|s| format!("{} × {}\"", s.count, s.length))
            .collect::<Vec<_>>()
            .join(", ");
        let psf = row
            .psf
            .map(|psf| format!(", {psf:.2} psf"))
            .unwrap_or_default();
        println!(
            "  Row {}: {} × {}, width {:.2}\", rails {} ({} splices, {:.2}\" waste){}",
            (row.index + 1).to_string().bright_white(),
            row.panel_count,
            row.orientation,
            row.row_width,
            pieces.bright_cyan(),
            row.rails.splice_count,
            row.rails.waste,
            psf
        );
    }
    println!();
}

fn preview_command(catalog_file: &Path, input: PathBuf, output: PathBuf) -> Result<()> {
    println!("{}", "🔍 Loading input...".bright_blue());

    let request = load_request(catalog_file, &input)?;
    let panel = request
        .panel
        .context("request names no panel and no known panel_model")?;

    println!("{}", "🎨 Generating SVG...".bright_blue());

    let svg = preview::render_svg(&request.rows, &panel, &request.config)?;
    std::fs::write(&output, svg)?;

    println!();
    println!(
        "{} Saved SVG to {}",
        "✅".bright_green(),
        output.display().to_string().bright_white()
    );

    Ok(())
}

fn catalog_command(catalog_file: &Path, command: CatalogCommands) -> Result<()> {
    let mut catalog = Catalog::load_or_default(catalog_file)?;

    match command {
        CatalogCommands::List => {
            println!("{}", "📦 Panel models:".bright_yellow().bold());
            for model in &catalog.panel_models {
                println!(
                    "  • {}: {}\" × {}\", {} lb",
                    model.name.bright_white(),
                    model.width,
                    model.height,
                    model.weight
                );
            }
            println!("{}", "📏 Rail lengths:".bright_yellow().bold());
            for length in catalog.rail_catalog().lengths() {
                println!("  • {}\"", length);
            }
            return Ok(());
        }
        CatalogCommands::AddPanel {
            name,
            width,
            height,
            weight,
        } => {
            catalog.add_panel_model(PanelModel {
                name: name.clone(),
                width,
                height,
                weight,
            })?;
            println!("{} Added panel model {}", "✅".bright_green(), name.bright_white());
        }
        CatalogCommands::RemovePanel { name } => {
            catalog.remove_panel_model(&name)?;
            println!("{} Removed panel model {}", "✅".bright_green(), name.bright_white());
        }
        CatalogCommands::AddRail { length } => {
            catalog.add_rail(length)?;
            println!("{} Added rail length {}\"", "✅".bright_green(), length);
        }
        CatalogCommands::RemoveRail { length } => {
            catalog.remove_rail(length)?;
            println!("{} Removed rail length {}\"", "✅".bright_green(), length);
        }
    }

    catalog.save(catalog_file)?;
    println!(
        "💾 Saved catalog to {}",
        catalog_file.display().to_string().bright_white()
    );
    Ok(())
}
