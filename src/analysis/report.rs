use super::bridge::BridgeSet;
use super::classify::{InteractionCategory, InteractionRecord};
use crate::annotate::{Annotator, Color, DashStyle, Representation};
use crate::toolkit::{AtomSite, ResidueKey};
use std::collections::BTreeSet;
use std::io::{self, Write};

pub const DOMAIN_A_SELECTION: &str = "interacting_residues_domain1";
pub const DOMAIN_B_SELECTION: &str = "interacting_residues_domain2";
pub const WATER_SELECTION: &str = "interacting_waters";

const WATER_SPHERE_SCALE: f64 = 0.25;
const HBOND_DASHES: DashStyle = DashStyle {
    color: Color::Green,
    width: 2.0,
};
const POLAR_CONTACT_DASHES: DashStyle = DashStyle {
    color: Color::Orange,
    width: 1.5,
};

/// Outcome of a bridge analysis.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BridgeReport {
    /// Water oxygens within the residue-water cutoff of domain A.
    pub near_a: usize,
    pub near_b: usize,
    /// Water oxygens near both domains, alternate conformers included.
    pub bridging: usize,
    /// Primary-conformer bridging oxygens that went through classification.
    pub analyzed_waters: usize,
    /// Sorted by category, residue A, residue B and water.
    pub interactions: Vec<InteractionRecord>,
    pub residues_a: BTreeSet<ResidueKey>,
    pub residues_b: BTreeSet<ResidueKey>,
    pub waters: BTreeSet<AtomSite>,
}

impl BridgeReport {
    /// Builds a report from the located waters and the aggregated records.
    pub fn new(bridges: &BridgeSet, mut interactions: Vec<InteractionRecord>) -> Self {
        interactions.sort_by(|x, y| {
            (x.category, x.residue_a(), x.residue_b(), &x.water.atom).cmp(&(
                y.category,
                y.residue_a(),
                y.residue_b(),
                &y.water.atom,
            ))
        });

        let residues_a = interactions.iter().map(|r| r.residue_a().clone()).collect();
        let residues_b = interactions.iter().map(|r| r.residue_b().clone()).collect();
        let waters = interactions.iter().map(|r| r.water.clone()).collect();

        Self {
            near_a: bridges.near_a,
            near_b: bridges.near_b,
            bridging: bridges.bridging,
            analyzed_waters: bridges.waters.len(),
            interactions,
            residues_a,
            residues_b,
            waters,
        }
    }

    pub fn count(&self, category: InteractionCategory) -> usize {
        self.interactions
            .iter()
            .filter(|r| r.category == category)
            .count()
    }

    pub fn is_empty(&self) -> bool {
        self.interactions.is_empty()
    }

    /// Writes the plain-text report.
    ///
    /// Water ids are printed 1-based, the way molecular viewers number atoms.
    pub fn write_text<W: Write>(&self, mut out: W) -> io::Result<()> {
        writeln!(out, "Number of water molecules near domainA: {}", self.near_a)?;
        writeln!(out, "Number of water molecules near domainB: {}", self.near_b)?;
        writeln!(out, "Number of bridging water molecules: {}", self.bridging)?;

        if self.analyzed_waters == 0 {
            return writeln!(
                out,
                "No bridging water molecules found between the specified domains within the specified distance."
            );
        }
        if self.interactions.is_empty() {
            writeln!(
                out,
                "No residue interactions found via bridging water molecules within the specified criteria."
            )?;
        }

        writeln!(out, "Total interactions: {}", self.interactions.len())?;
        for record in &self.interactions {
            writeln!(
                out,
                "Residue {} interacts with residue {} via water id {} ({}). Distances: {:.2} Å (resA-water), {:.2} Å (water-resB), Total distance: {:.2} Å",
                record.residue_a(),
                record.residue_b(),
                record.water.atom.index + 1,
                record.category,
                record.distance_a,
                record.distance_b,
                record.total_distance
            )?;
        }
        Ok(())
    }

    /// Replays the report onto an annotator. Reports without interactions draw nothing.
    pub fn annotate(&self, annotator: &mut dyn Annotator) -> io::Result<()> {
        if self.interactions.is_empty() {
            return Ok(());
        }

        annotator.select_residues(DOMAIN_A_SELECTION, &self.residues_a)?;
        annotator.select_residues(DOMAIN_B_SELECTION, &self.residues_b)?;
        annotator.select_atoms(WATER_SELECTION, &self.waters)?;

        for record in &self.interactions {
            let label = record.label();
            annotator.draw_distance(&format!("{label}_A"), &record.atom_a, &record.water)?;
            annotator.draw_distance(&format!("{label}_B"), &record.water, &record.atom_b)?;
        }

        annotator.show(Representation::Sticks, DOMAIN_A_SELECTION)?;
        annotator.color(Color::Yellow, DOMAIN_A_SELECTION)?;
        annotator.show(Representation::Sticks, DOMAIN_B_SELECTION)?;
        annotator.color(Color::Magenta, DOMAIN_B_SELECTION)?;

        annotator.show(Representation::Spheres, WATER_SELECTION)?;
        annotator.color(Color::Cyan, WATER_SELECTION)?;
        annotator.set_sphere_scale(WATER_SPHERE_SCALE, WATER_SELECTION)?;

        for (category, style) in [
            (InteractionCategory::HydrogenBond, HBOND_DASHES),
            (InteractionCategory::PolarContact, POLAR_CONTACT_DASHES),
        ] {
            annotator.style_distances(&format!("{}_*", category.label_prefix()), style)?;
        }
        Ok(())
    }
}
