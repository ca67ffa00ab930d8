//! Water-bridged interaction analysis.
//!
//! [`analyze`] runs the whole pipeline against any [`Toolkit`]:
//!
//! 1. Select both domains and locate the water oxygens within the residue-water cutoff of
//!    each ([`bridge`]).
//! 2. For every primary-conformer bridging oxygen, search hydrogen bonds on each side and fall
//!    back to plain polar contacts on a side without any ([`contact`]).
//! 3. Classify the water, keep the closest atom of each residue, and pair residues across the
//!    water within the total-distance budget ([`classify`]).
//! 4. Collect the records into a sorted [`BridgeReport`] that can be printed or replayed onto
//!    an [`Annotator`](crate::annotate::Annotator) ([`report`]).
//!
//! Finding nothing is a normal, empty report.

mod bridge;
mod classify;
mod config;
mod contact;
mod error;
pub mod geometry;
mod report;

pub use bridge::{BridgeSet, locate_bridging_waters};
pub use classify::{InteractionCategory, InteractionRecord};
pub use config::BridgeConfig;
pub use contact::{AtomPairContact, SideContacts};
pub use error::Error;
pub use report::{BridgeReport, DOMAIN_A_SELECTION, DOMAIN_B_SELECTION, WATER_SELECTION};

use crate::select::{Query, Selection, parse};
use crate::toolkit::{self, Toolkit};
use classify::{Aggregator, resolve_contacts};
use contact::{ContactFinder, PreparedDomain};

/// Finds residue pairs of two domains bridged by a single water molecule.
///
/// # Errors
///
/// Returns [`Error::InvalidConfig`] for out-of-range thresholds and [`Error::Toolkit`] when the
/// toolkit rejects a query or cannot resolve a water to exactly one atom.
pub fn analyze<T: Toolkit + ?Sized>(
    toolkit: &T,
    domain_a: &Query,
    domain_b: &Query,
    config: &BridgeConfig,
) -> Result<BridgeReport, Error> {
    config.validate()?;

    let a = toolkit.select(domain_a)?;
    let b = toolkit.select(domain_b)?;
    log::debug!(
        "domain A: {} atoms, domain B: {} atoms",
        toolkit.count_atoms(&a),
        toolkit.count_atoms(&b)
    );

    let cutoff = config.residue_water_distance();
    let bridges = locate_bridging_waters(toolkit, &a, &b, cutoff)?;
    log::info!(
        "{} water oxygens near A, {} near B, {} bridging within {cutoff:.2} Å",
        bridges.near_a,
        bridges.near_b,
        bridges.bridging
    );
    if bridges.is_empty() {
        return Ok(BridgeReport::new(&bridges, Vec::new()));
    }

    let prepared_a = PreparedDomain::new(toolkit, &a)?;
    let prepared_b = PreparedDomain::new(toolkit, &b)?;
    log::debug!(
        "candidate atoms: A {} N/O, {} polar; B {} N/O, {} polar",
        prepared_a.hbond_candidates(),
        prepared_a.polar_candidates(),
        prepared_b.hbond_candidates(),
        prepared_b.polar_candidates()
    );
    let finder = ContactFinder::new(toolkit, config);
    let mut aggregator = Aggregator::new(config.max_total_distance);

    for water in &bridges.waters {
        let side_a = finder.side(&prepared_a, water)?;
        let side_b = finder.side(&prepared_b, water)?;
        let Some(category) = classify::classify(&side_a, &side_b) else {
            log::debug!("water {water} bridges nothing");
            continue;
        };

        let water_site = toolkit
            .list_atoms(&Selection::single(water.clone()))
            .into_iter()
            .next()
            .map(|record| record.site())
            .ok_or_else(|| toolkit::Error::UnknownAtom {
                atom: water.clone(),
            })?;

        aggregator.add_water(
            category,
            water_site,
            resolve_contacts(toolkit, side_a.contacts()),
            resolve_contacts(toolkit, side_b.contacts()),
        );
    }

    let report = BridgeReport::new(&bridges, aggregator.into_records());
    log::info!(
        "{} interactions ({} hydrogen bond, {} polar contact) through {} waters",
        report.interactions.len(),
        report.count(InteractionCategory::HydrogenBond),
        report.count(InteractionCategory::PolarContact),
        report.waters.len()
    );
    Ok(report)
}

/// Parses both domain expressions and runs [`analyze`].
///
/// ```
/// use std::io::Cursor;
/// use water_bridge::io::{IoContext, read_pdb_structure};
/// use water_bridge::toolkit::StructureToolkit;
/// use water_bridge::{BridgeConfig, analyze_expressions};
///
/// let pdb = "\
/// ATOM      1  N   GLY A   1       0.000   0.000   0.000  1.00 20.00           N
/// ATOM      2  O   ALA B   1       9.000   0.000   0.000  1.00 20.00           O
/// END
/// ";
/// let structure = read_pdb_structure(Cursor::new(pdb), &IoContext::default()).unwrap();
/// let toolkit = StructureToolkit::new(&structure);
///
/// let report = analyze_expressions(&toolkit, "chain A", "chain B", &BridgeConfig::default())
///     .unwrap();
/// assert_eq!(report.bridging, 0);
/// assert!(report.is_empty());
/// ```
pub fn analyze_expressions<T: Toolkit + ?Sized>(
    toolkit: &T,
    domain_a: &str,
    domain_b: &str,
    config: &BridgeConfig,
) -> Result<BridgeReport, Error> {
    let a = parse(domain_a)?;
    let b = parse(domain_b)?;
    analyze(toolkit, &a, &b, config)
}
