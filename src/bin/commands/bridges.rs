use std::fs::{self, File};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Args;
use prettytable::{Table, format, row};

use water_bridge::annotate::PmlScript;
use water_bridge::select::{Query, parse};
use water_bridge::toolkit::StructureToolkit;
use water_bridge::{BridgeConfig, BridgeReport, InteractionCategory, Structure, analyze};

use crate::commands::{print_boxed_label, run_with_spinner};

/// Domains, thresholds, and outputs of a bridge analysis.
#[derive(Debug, Default, Args)]
pub struct BridgeArgs {
    /// Selection of the first domain, e.g. "chain A".
    #[arg(value_name = "DOMAIN_A")]
    pub domain_a: String,
    /// Selection of the second domain, e.g. "chain B and resi 10-80".
    #[arg(value_name = "DOMAIN_B")]
    pub domain_b: String,
    /// TOML file with threshold overrides.
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,
    /// Maximum residue-water-residue path length in Å.
    #[arg(long = "max-total", value_name = "Å")]
    pub max_total: Option<f64>,
    /// Residue-water proximity cutoff in Å (default: half of --max-total).
    #[arg(long = "max-residue-water", value_name = "Å")]
    pub max_residue_water: Option<f64>,
    /// Donor-acceptor distance cutoff for hydrogen bonds in Å.
    #[arg(long = "hbond-cutoff", value_name = "Å")]
    pub hbond_cutoff: Option<f64>,
    /// Minimum donor-hydrogen-acceptor angle in degrees.
    #[arg(long = "hbond-angle", value_name = "DEG")]
    pub hbond_angle: Option<f64>,
    /// Write a PyMOL script highlighting the interactions.
    #[arg(long, value_name = "FILE")]
    pub pml: Option<PathBuf>,
    /// Print summary tables to stderr.
    #[arg(long)]
    pub table: bool,
}

/// Runs the analysis and writes the text report to stdout.
pub fn run(structure: &Structure, args: &BridgeArgs) -> Result<()> {
    let config = resolve_config(args)?;
    let domain_a = parse_domain("A", &args.domain_a)?;
    let domain_b = parse_domain("B", &args.domain_b)?;

    let report = run_with_spinner("Analyzing water bridges", || {
        let toolkit = StructureToolkit::new(structure);
        analyze(&toolkit, &domain_a, &domain_b, &config).context("Bridge analysis failed")
    })?;

    let stdout = io::stdout();
    let mut writer = BufWriter::new(stdout.lock());
    report
        .write_text(&mut writer)
        .context("Failed to write report to stdout")?;
    writer.flush().context("Failed to flush stdout")?;

    if let Some(path) = &args.pml {
        write_pml(&report, path)?;
    }
    if args.table {
        print_tables(structure, &report, &config)?;
    }
    Ok(())
}

/// Layers the config file and explicit flags over the defaults.
fn resolve_config(args: &BridgeArgs) -> Result<BridgeConfig> {
    let mut config = match &args.config {
        Some(path) => {
            let text = fs::read_to_string(path)
                .with_context(|| format!("Failed to read config file {}", path.display()))?;
            BridgeConfig::from_toml_str(&text)
                .with_context(|| format!("Invalid config file {}", path.display()))?
        }
        None => BridgeConfig::default(),
    };

    if let Some(value) = args.max_total {
        config.max_total_distance = value;
    }
    if let Some(value) = args.max_residue_water {
        config.max_residue_water_distance = Some(value);
    }
    if let Some(value) = args.hbond_cutoff {
        config.hbond_distance_cutoff = value;
    }
    if let Some(value) = args.hbond_angle {
        config.hbond_angle_cutoff = value;
    }

    config.validate().context("Invalid thresholds")?;
    Ok(config)
}

fn parse_domain(label: &str, expression: &str) -> Result<Query> {
    parse(expression)
        .with_context(|| format!("Invalid selection for domain {label}: '{expression}'"))
}

fn write_pml(report: &BridgeReport, path: &Path) -> Result<()> {
    let file = File::create(path)
        .with_context(|| format!("Failed to create PyMOL script {}", path.display()))?;
    let mut script = PmlScript::new(BufWriter::new(file));
    report
        .annotate(&mut script)
        .with_context(|| format!("Failed to write PyMOL script {}", path.display()))?;
    script
        .into_inner()
        .flush()
        .context("Failed to flush PyMOL script")?;
    log::info!("wrote PyMOL script to {}", path.display());
    Ok(())
}

fn print_tables(structure: &Structure, report: &BridgeReport, config: &BridgeConfig) -> Result<()> {
    let mut stderr = io::stderr().lock();

    print_boxed_label(&mut stderr, "Water Bridge Summary")?;
    let mut summary = Table::new();
    summary.set_format(*format::consts::FORMAT_BOX_CHARS);
    summary.set_titles(row!["Metric", "Value"]);
    summary.add_row(row!["Structure", structure.name]);
    summary.add_row(row!["Solvent Residues", structure.solvent_residue_count()]);
    summary.add_row(row![
        "Residue-Water Cutoff (Å)",
        format!("{:.2}", config.residue_water_distance())
    ]);
    summary.add_row(row![
        "Max Total Distance (Å)",
        format!("{:.2}", config.max_total_distance)
    ]);
    summary.add_row(row!["Waters Near Domain A", report.near_a]);
    summary.add_row(row!["Waters Near Domain B", report.near_b]);
    summary.add_row(row!["Bridging Waters", report.bridging]);
    summary.add_row(row![
        "Hydrogen Bond Bridges",
        report.count(InteractionCategory::HydrogenBond)
    ]);
    summary.add_row(row![
        "Polar Contact Bridges",
        report.count(InteractionCategory::PolarContact)
    ]);
    summary
        .print(&mut stderr)
        .context("Failed to render bridge summary")?;

    if report.is_empty() {
        return Ok(());
    }

    writeln!(&mut stderr)?;
    print_boxed_label(&mut stderr, "Interactions")?;
    let mut interactions = Table::new();
    interactions.set_format(*format::consts::FORMAT_BOX_CHARS);
    interactions.set_titles(row![
        "Type", "Residue A", "Water", "Residue B", "A-W (Å)", "W-B (Å)", "Total (Å)"
    ]);
    for record in &report.interactions {
        interactions.add_row(row![
            record.category,
            record.residue_a(),
            record.water.residue,
            record.residue_b(),
            format!("{:.2}", record.distance_a),
            format!("{:.2}", record.distance_b),
            format!("{:.2}", record.total_distance)
        ]);
    }
    interactions
        .print(&mut stderr)
        .context("Failed to render interaction table")?;

    Ok(())
}
