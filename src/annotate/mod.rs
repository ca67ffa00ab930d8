//! Write-only visualization sink.
//!
//! An [`Annotator`] receives highlight and distance commands after an analysis finishes. It has
//! no say in the results. [`PmlScript`] turns the commands into a PyMOL script and
//! [`NullAnnotator`] drops them.

mod pml;

pub use pml::PmlScript;

use crate::toolkit::{AtomSite, ResidueKey};
use std::collections::BTreeSet;
use std::fmt;
use std::io;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Color {
    Yellow,
    Magenta,
    Cyan,
    Green,
    Orange,
}

impl Color {
    pub fn name(&self) -> &'static str {
        match self {
            Color::Yellow => "yellow",
            Color::Magenta => "magenta",
            Color::Cyan => "cyan",
            Color::Green => "green",
            Color::Orange => "orange",
        }
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Representation {
    Sticks,
    Spheres,
    Dashes,
}

impl Representation {
    pub fn name(&self) -> &'static str {
        match self {
            Representation::Sticks => "sticks",
            Representation::Spheres => "spheres",
            Representation::Dashes => "dashes",
        }
    }
}

impl fmt::Display for Representation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Appearance of a family of distance objects.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DashStyle {
    pub color: Color,
    pub width: f64,
}

/// Receiver of visualization commands.
///
/// Targets are names previously created through [`Annotator::select_residues`],
/// [`Annotator::select_atoms`], or [`Annotator::draw_distance`], or glob patterns over them.
pub trait Annotator {
    fn select_residues(&mut self, name: &str, residues: &BTreeSet<ResidueKey>) -> io::Result<()>;

    fn select_atoms(&mut self, name: &str, atoms: &BTreeSet<AtomSite>) -> io::Result<()>;

    fn show(&mut self, representation: Representation, target: &str) -> io::Result<()>;

    fn color(&mut self, color: Color, target: &str) -> io::Result<()>;

    fn set_sphere_scale(&mut self, scale: f64, target: &str) -> io::Result<()>;

    /// Creates a named distance object between two atoms.
    fn draw_distance(&mut self, name: &str, from: &AtomSite, to: &AtomSite) -> io::Result<()>;

    /// Styles and labels every distance object matching `pattern` (labels read `%.2f Å`).
    fn style_distances(&mut self, pattern: &str, style: DashStyle) -> io::Result<()>;
}

/// Annotator that ignores every command.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullAnnotator;

impl Annotator for NullAnnotator {
    fn select_residues(&mut self, _: &str, _: &BTreeSet<ResidueKey>) -> io::Result<()> {
        Ok(())
    }

    fn select_atoms(&mut self, _: &str, _: &BTreeSet<AtomSite>) -> io::Result<()> {
        Ok(())
    }

    fn show(&mut self, _: Representation, _: &str) -> io::Result<()> {
        Ok(())
    }

    fn color(&mut self, _: Color, _: &str) -> io::Result<()> {
        Ok(())
    }

    fn set_sphere_scale(&mut self, _: f64, _: &str) -> io::Result<()> {
        Ok(())
    }

    fn draw_distance(&mut self, _: &str, _: &AtomSite, _: &AtomSite) -> io::Result<()> {
        Ok(())
    }

    fn style_distances(&mut self, _: &str, _: DashStyle) -> io::Result<()> {
        Ok(())
    }
}

/// Annotator that keeps a textual log of every command, for assertions in tests.
#[cfg(test)]
#[derive(Debug, Default)]
pub(crate) struct RecordingAnnotator {
    pub commands: Vec<String>,
}

#[cfg(test)]
impl Annotator for RecordingAnnotator {
    fn select_residues(&mut self, name: &str, residues: &BTreeSet<ResidueKey>) -> io::Result<()> {
        let members: Vec<_> = residues.iter().map(ToString::to_string).collect();
        self.commands
            .push(format!("select {name} [{}]", members.join(", ")));
        Ok(())
    }

    fn select_atoms(&mut self, name: &str, atoms: &BTreeSet<AtomSite>) -> io::Result<()> {
        let members: Vec<_> = atoms.iter().map(ToString::to_string).collect();
        self.commands
            .push(format!("select {name} [{}]", members.join(", ")));
        Ok(())
    }

    fn show(&mut self, representation: Representation, target: &str) -> io::Result<()> {
        self.commands.push(format!("show {representation} {target}"));
        Ok(())
    }

    fn color(&mut self, color: Color, target: &str) -> io::Result<()> {
        self.commands.push(format!("color {color} {target}"));
        Ok(())
    }

    fn set_sphere_scale(&mut self, scale: f64, target: &str) -> io::Result<()> {
        self.commands.push(format!("sphere_scale {scale} {target}"));
        Ok(())
    }

    fn draw_distance(&mut self, name: &str, from: &AtomSite, to: &AtomSite) -> io::Result<()> {
        self.commands.push(format!("distance {name} {from} {to}"));
        Ok(())
    }

    fn style_distances(&mut self, pattern: &str, style: DashStyle) -> io::Result<()> {
        self.commands
            .push(format!("dashes {pattern} {} {}", style.color, style.width));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn color_and_representation_names_match_viewer_keywords() {
        assert_eq!(Color::Magenta.to_string(), "magenta");
        assert_eq!(Color::Orange.name(), "orange");
        assert_eq!(Representation::Spheres.to_string(), "spheres");
    }

    #[test]
    fn null_annotator_accepts_everything() {
        let mut annotator = NullAnnotator;

        assert!(annotator.show(Representation::Sticks, "x").is_ok());
        assert!(annotator
            .style_distances(
                "hbond_*",
                DashStyle {
                    color: Color::Green,
                    width: 2.0
                }
            )
            .is_ok());
    }
}
