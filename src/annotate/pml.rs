use super::{Annotator, Color, DashStyle, Representation};
use crate::toolkit::{AtomSite, ResidueKey};
use std::collections::{BTreeSet, HashSet};
use std::io::{self, Write};

/// Writes annotation commands as a PyMOL `.pml` script.
///
/// Atoms are addressed by model, chain, residue, name and alternate location rather than by
/// index, so the script stays valid however the viewer orders the loaded atoms. A repeated
/// distance name with new endpoints adds another leg to the same viewer object; an exact
/// repeat of name and endpoints is emitted once.
pub struct PmlScript<W: Write> {
    writer: W,
    distances: HashSet<(String, AtomSite, AtomSite)>,
}

impl<W: Write> PmlScript<W> {
    pub fn new(writer: W) -> Self {
        Self {
            writer,
            distances: HashSet::new(),
        }
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}

fn residue_selector(key: &ResidueKey) -> String {
    let icode = key.insertion_code.map(String::from).unwrap_or_default();
    format!(
        "(model {} and chain {} and resi {}{} and resn {})",
        key.object,
        quoted_if_blank(&key.chain),
        key.residue_number,
        icode,
        key.residue_name
    )
}

fn atom_selector(site: &AtomSite) -> String {
    let alt = site.alt_loc.map(String::from).unwrap_or_default();
    let residue = residue_selector(&site.residue);
    format!(
        "({} and name {} and alt '{}')",
        &residue[1..residue.len() - 1],
        site.name,
        alt
    )
}

fn quoted_if_blank(value: &str) -> String {
    if value.is_empty() {
        "''".to_string()
    } else {
        value.to_string()
    }
}

fn union(selectors: impl Iterator<Item = String>) -> String {
    let joined: Vec<_> = selectors.collect();
    if joined.is_empty() {
        "none".to_string()
    } else {
        joined.join(" or ")
    }
}

impl<W: Write> Annotator for PmlScript<W> {
    fn select_residues(&mut self, name: &str, residues: &BTreeSet<ResidueKey>) -> io::Result<()> {
        let selection = union(residues.iter().map(residue_selector));
        writeln!(self.writer, "select {name}, {selection}")
    }

    fn select_atoms(&mut self, name: &str, atoms: &BTreeSet<AtomSite>) -> io::Result<()> {
        let selection = union(atoms.iter().map(atom_selector));
        writeln!(self.writer, "select {name}, {selection}")
    }

    fn show(&mut self, representation: Representation, target: &str) -> io::Result<()> {
        writeln!(self.writer, "show {representation}, {target}")
    }

    fn color(&mut self, color: Color, target: &str) -> io::Result<()> {
        writeln!(self.writer, "color {color}, {target}")
    }

    fn set_sphere_scale(&mut self, scale: f64, target: &str) -> io::Result<()> {
        writeln!(self.writer, "set sphere_scale, {scale:.2}, {target}")
    }

    fn draw_distance(&mut self, name: &str, from: &AtomSite, to: &AtomSite) -> io::Result<()> {
        if !self
            .distances
            .insert((name.to_string(), from.clone(), to.clone()))
        {
            return Ok(());
        }
        writeln!(
            self.writer,
            "distance {name}, {}, {}",
            atom_selector(from),
            atom_selector(to)
        )
    }

    fn style_distances(&mut self, pattern: &str, style: DashStyle) -> io::Result<()> {
        writeln!(self.writer, "hide labels, {pattern}")?;
        writeln!(self.writer, "set dash_color, {}, {pattern}", style.color)?;
        writeln!(self.writer, "set dash_width, {:.1}, {pattern}", style.width)?;
        writeln!(self.writer, "show dashes, {pattern}")?;
        writeln!(self.writer, "label {pattern}, \"%.2f Å\" % (distance)")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::select::AtomRef;

    fn key(chain: &str, resi: i32, icode: Option<char>, resn: &str) -> ResidueKey {
        ResidueKey {
            object: "1abc".into(),
            chain: chain.into(),
            residue_number: resi,
            insertion_code: icode,
            residue_name: resn.into(),
        }
    }

    fn site(index: usize, residue: ResidueKey, name: &str, alt: Option<char>) -> AtomSite {
        AtomSite {
            atom: AtomRef::new("1abc", index),
            residue,
            name: name.into(),
            alt_loc: alt,
        }
    }

    fn script(commands: impl FnOnce(&mut PmlScript<Vec<u8>>) -> io::Result<()>) -> String {
        let mut pml = PmlScript::new(Vec::new());
        commands(&mut pml).unwrap();
        String::from_utf8(pml.into_inner()).unwrap()
    }

    #[test]
    fn select_residues_joins_residue_selectors() {
        let residues = BTreeSet::from([key("A", 45, None, "ASP"), key("A", 52, Some('A'), "GLY")]);

        let out = script(|pml| pml.select_residues("bridge_a", &residues));

        assert_eq!(
            out,
            "select bridge_a, (model 1abc and chain A and resi 45 and resn ASP) or \
             (model 1abc and chain A and resi 52A and resn GLY)\n"
        );
    }

    #[test]
    fn select_of_empty_set_selects_none() {
        let out = script(|pml| pml.select_residues("empty", &BTreeSet::new()));

        assert_eq!(out, "select empty, none\n");
    }

    #[test]
    fn blank_chain_is_quoted() {
        let residues = BTreeSet::from([key("", 1, None, "HOH")]);

        let out = script(|pml| pml.select_residues("w", &residues));

        assert_eq!(
            out,
            "select w, (model 1abc and chain '' and resi 1 and resn HOH)\n"
        );
    }

    #[test]
    fn draw_distance_addresses_atoms_by_identity_and_skips_repeats() {
        let from = site(10, key("A", 45, None, "ASP"), "OD1", None);
        let to = site(99, key("W", 301, None, "HOH"), "O", None);

        let out = script(|pml| {
            pml.draw_distance("hbond_1_A", &from, &to)?;
            pml.draw_distance("hbond_1_A", &from, &to)
        });

        assert_eq!(
            out,
            "distance hbond_1_A, (model 1abc and chain A and resi 45 and resn ASP and name OD1 \
             and alt ''), (model 1abc and chain W and resi 301 and resn HOH and name O and alt '')\n"
        );
    }

    #[test]
    fn draw_distance_adds_new_legs_under_a_repeated_name() {
        let asp = site(10, key("A", 2, None, "ASP"), "OD1", None);
        let ser = site(11, key("A", 3, None, "SER"), "OG", None);
        let water = site(99, key("W", 301, None, "HOH"), "O", None);

        let out = script(|pml| {
            pml.draw_distance("polar_contact_1_A", &asp, &water)?;
            pml.draw_distance("polar_contact_1_A", &ser, &water)?;
            pml.draw_distance("polar_contact_1_A", &asp, &water)
        });

        let lines: Vec<_> = out.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].starts_with("distance polar_contact_1_A, (model 1abc and chain A and resi 2 "));
        assert!(lines[1].starts_with("distance polar_contact_1_A, (model 1abc and chain A and resi 3 "));
    }

    #[test]
    fn style_distances_emits_dash_settings_and_labels() {
        let out = script(|pml| {
            pml.style_distances(
                "polar_contact_*",
                DashStyle {
                    color: Color::Orange,
                    width: 1.5,
                },
            )
        });

        assert_eq!(
            out,
            "hide labels, polar_contact_*\n\
             set dash_color, orange, polar_contact_*\n\
             set dash_width, 1.5, polar_contact_*\n\
             show dashes, polar_contact_*\n\
             label polar_contact_*, \"%.2f Å\" % (distance)\n"
        );
    }

    #[test]
    fn show_color_and_scale_use_viewer_syntax() {
        let out = script(|pml| {
            pml.show(Representation::Spheres, "waters")?;
            pml.color(Color::Cyan, "waters")?;
            pml.set_sphere_scale(0.25, "waters")
        });

        assert_eq!(
            out,
            "show spheres, waters\ncolor cyan, waters\nset sphere_scale, 0.25, waters\n"
        );
    }
}
