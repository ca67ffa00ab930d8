use crate::model::types::{ResidueCategory, StandardResidue};
use std::collections::{HashMap, HashSet};

/// Lookup tables that map raw residue names onto standard residues and solvent/ion classes.
///
/// Raw names are never rewritten: the reader keeps `WAT` as `WAT` so reports echo the input
/// file, while classification still recognizes it as water.
#[derive(Debug, Clone)]
pub struct IoContext {
    alias_map: HashMap<String, String>,
    standard_map: HashMap<String, StandardResidue>,
    ion_names: HashSet<String>,
}

impl IoContext {
    pub fn new_default() -> Self {
        let mut alias_map = HashMap::new();
        let mut standard_map = HashMap::new();

        macro_rules! register_standard {
            ($canonical:expr, $enum_val:expr) => {
                alias_map.insert($canonical.to_string(), $canonical.to_string());
                standard_map.insert($canonical.to_string(), $enum_val);
            };
        }

        macro_rules! register_alias {
            ($alias:expr, $canonical:expr) => {
                alias_map.insert($alias.to_string(), $canonical.to_string());
            };
        }

        register_standard!("ALA", StandardResidue::ALA);
        register_standard!("ARG", StandardResidue::ARG);
        register_standard!("ASN", StandardResidue::ASN);
        register_standard!("ASP", StandardResidue::ASP);
        register_standard!("CYS", StandardResidue::CYS);
        register_standard!("GLN", StandardResidue::GLN);
        register_standard!("GLU", StandardResidue::GLU);
        register_standard!("GLY", StandardResidue::GLY);
        register_standard!("HIS", StandardResidue::HIS);
        register_standard!("ILE", StandardResidue::ILE);
        register_standard!("LEU", StandardResidue::LEU);
        register_standard!("LYS", StandardResidue::LYS);
        register_standard!("MET", StandardResidue::MET);
        register_standard!("PHE", StandardResidue::PHE);
        register_standard!("PRO", StandardResidue::PRO);
        register_standard!("SER", StandardResidue::SER);
        register_standard!("THR", StandardResidue::THR);
        register_standard!("TRP", StandardResidue::TRP);
        register_standard!("TYR", StandardResidue::TYR);
        register_standard!("VAL", StandardResidue::VAL);

        register_standard!("DA", StandardResidue::DA);
        register_standard!("DC", StandardResidue::DC);
        register_standard!("DG", StandardResidue::DG);
        register_standard!("DT", StandardResidue::DT);
        register_standard!("DI", StandardResidue::DI);

        register_standard!("A", StandardResidue::A);
        register_standard!("C", StandardResidue::C);
        register_standard!("G", StandardResidue::G);
        register_standard!("U", StandardResidue::U);
        register_standard!("I", StandardResidue::I);

        register_standard!("HOH", StandardResidue::HOH);

        register_alias!("ARN", "ARG");
        register_alias!("ASH", "ASP");
        register_alias!("CYM", "CYS");
        register_alias!("CYX", "CYS");
        register_alias!("GLH", "GLU");
        register_alias!("HID", "HIS");
        register_alias!("HIE", "HIS");
        register_alias!("HIP", "HIS");
        register_alias!("HSD", "HIS");
        register_alias!("HSE", "HIS");
        register_alias!("HSP", "HIS");
        register_alias!("LYN", "LYS");
        register_alias!("TYM", "TYR");
        register_alias!("MSE", "MET");

        register_alias!("WAT", "HOH");
        register_alias!("H2O", "HOH");
        register_alias!("DOD", "HOH");
        register_alias!("SOL", "HOH");
        register_alias!("TIP", "HOH");
        register_alias!("TIP3", "HOH");
        register_alias!("TP3", "HOH");
        register_alias!("SPC", "HOH");

        let ion_names = [
            "NA", "K", "LI", "MG", "CA", "ZN", "MN", "FE", "FE2", "CO", "NI", "CU", "CL", "BR",
            "IOD", "CD", "SR", "CS",
        ]
        .into_iter()
        .map(String::from)
        .collect();

        Self {
            alias_map,
            standard_map,
            ion_names,
        }
    }

    pub fn resolve_name<'a>(&'a self, name: &'a str) -> &'a str {
        self.alias_map.get(name).map(|s| s.as_str()).unwrap_or(name)
    }

    pub fn map_to_standard(&self, name: &str) -> Option<StandardResidue> {
        self.standard_map.get(self.resolve_name(name)).copied()
    }

    pub fn add_alias(&mut self, alias: impl Into<String>, canonical: impl Into<String>) {
        self.alias_map.insert(alias.into(), canonical.into());
    }

    /// Classifies a raw residue name into its standard residue (if any) and category.
    ///
    /// Water aliases become [`ResidueCategory::Solvent`], known ions and single-atom hetero
    /// groups become [`ResidueCategory::Ion`], other unrecognized names become
    /// [`ResidueCategory::Hetero`].
    pub fn classify_residue(
        &self,
        raw_name: &str,
        atom_count: usize,
    ) -> (Option<StandardResidue>, ResidueCategory) {
        let standard = self.map_to_standard(raw_name);
        let category = match standard {
            Some(StandardResidue::HOH) => ResidueCategory::Solvent,
            Some(_) => ResidueCategory::Standard,
            None if self.ion_names.contains(raw_name) || atom_count == 1 => ResidueCategory::Ion,
            None => ResidueCategory::Hetero,
        };
        (standard, category)
    }
}

impl Default for IoContext {
    fn default() -> Self {
        Self::new_default()
    }
}
