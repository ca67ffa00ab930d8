use crate::io::context::IoContext;
use crate::io::error::Error;
use crate::model::{
    atom::Atom,
    chain::Chain,
    residue::Residue,
    structure::{DEFAULT_STRUCTURE_NAME, Structure},
    types::{Element, Point},
};
use std::collections::HashMap;
use std::io::BufRead;
use std::path::Path;
use std::str::FromStr;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct ResKey {
    res_seq: i32,
    i_code: Option<char>,
}

struct TempResidue {
    key: ResKey,
    raw_name: String,
    atoms: Vec<Atom>,
}

#[derive(Default)]
struct TempChain {
    residues: Vec<TempResidue>,
    index: HashMap<ResKey, usize>,
}

/// Reads the first model of a PDB stream into a [`Structure`].
///
/// Alternate conformers are kept side by side; a repeated `(name, altLoc)` pair within a
/// residue keeps its first occurrence. Residue and chain order follow the file. The structure
/// name comes from the `HEADER` id code and falls back to [`DEFAULT_STRUCTURE_NAME`].
pub fn read<R: BufRead>(reader: R, context: &IoContext) -> Result<Structure, Error> {
    read_inner(reader, context, None)
}

/// Reads a PDB file from disk, naming the structure after the file stem when the header
/// carries no id code.
pub fn read_path(path: &Path, context: &IoContext) -> Result<Structure, Error> {
    let file = std::fs::File::open(path).map_err(|e| Error::from_io(e, Some(path.into())))?;
    let mut structure = read_inner(std::io::BufReader::new(file), context, Some(path))?;

    if structure.name == DEFAULT_STRUCTURE_NAME {
        if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
            structure.name = stem.to_string();
        }
    }

    Ok(structure)
}

fn read_inner<R: BufRead>(
    reader: R,
    context: &IoContext,
    path: Option<&Path>,
) -> Result<Structure, Error> {
    let mut name: Option<String> = None;
    let mut chain_order: Vec<String> = Vec::new();
    let mut chain_map: HashMap<String, TempChain> = HashMap::new();
    let mut atom_total = 0usize;

    for (idx, line) in reader.lines().enumerate() {
        let line_num = idx + 1;
        let line = line.map_err(|e| Error::from_io(e, path.map(Path::to_path_buf)))?;

        if line.starts_with("HEADER") {
            name = parse_header_id(&line);
            continue;
        }

        if line.starts_with("ENDMDL") {
            break;
        }

        let is_atom = line.starts_with("ATOM  ");
        let is_hetatm = line.starts_with("HETATM");

        if is_atom || is_hetatm {
            parse_atom_record(&line, line_num, path, &mut chain_order, &mut chain_map)?;
            atom_total += 1;
        }
    }

    if atom_total == 0 {
        return Err(Error::no_atoms("PDB", path.map(Path::to_path_buf)));
    }

    let mut structure = Structure::new(name.as_deref().unwrap_or(DEFAULT_STRUCTURE_NAME));

    for chain_id in chain_order {
        let Some(temp_chain) = chain_map.remove(&chain_id) else {
            continue;
        };
        let mut chain = Chain::new(&chain_id);

        for temp_res in temp_chain.residues {
            let (standard, category) =
                context.classify_residue(&temp_res.raw_name, temp_res.atoms.len());

            let mut residue = Residue::new(
                temp_res.key.res_seq,
                temp_res.key.i_code,
                &temp_res.raw_name,
                standard,
                category,
            );
            for atom in temp_res.atoms {
                residue.add_atom(atom);
            }
            chain.add_residue(residue);
        }

        structure.add_chain(chain);
    }

    Ok(structure)
}

fn parse_header_id(line: &str) -> Option<String> {
    let id = line.get(62..66)?.trim();
    (!id.is_empty()).then(|| id.to_string())
}

fn parse_atom_record(
    line: &str,
    line_num: usize,
    path: Option<&Path>,
    chain_order: &mut Vec<String>,
    chain_map: &mut HashMap<String, TempChain>,
) -> Result<(), Error> {
    let parse_err =
        |details: &str| Error::parse("PDB", path.map(Path::to_path_buf), line_num, details);

    if !line.is_ascii() {
        return Err(parse_err("Atom record contains non-ASCII characters"));
    }
    if line.len() < 54 {
        return Err(parse_err("Atom record too short"));
    }

    let column = |i: usize| line.as_bytes().get(i).map(|&b| b as char).unwrap_or(' ');

    let atom_name = line[12..16].trim();
    let alt_loc = column(16);
    let res_name = line[17..20].trim();
    let chain_id = column(21).to_string().trim().to_string();
    let i_code = Some(column(26)).filter(|c| *c != ' ');

    let res_seq = line[22..26]
        .trim()
        .parse::<i32>()
        .map_err(|_| parse_err("Invalid residue sequence number"))?;

    let coord = |range: std::ops::Range<usize>, axis: &str| {
        line[range]
            .trim()
            .parse::<f64>()
            .map_err(|_| parse_err(&format!("Invalid {axis} coordinate")))
    };
    let pos = Point::new(coord(30..38, "X")?, coord(38..46, "Y")?, coord(46..54, "Z")?);

    let element_str = line.get(76..78).map(str::trim).unwrap_or("");
    let element = if element_str.is_empty() {
        parse_element_from_name(atom_name)
    } else {
        Element::from_str(element_str).unwrap_or(Element::Unknown)
    };

    let temp_chain = chain_map.entry(chain_id.clone()).or_insert_with(|| {
        chain_order.push(chain_id.clone());
        TempChain::default()
    });

    let key = ResKey { res_seq, i_code };
    let slot = match temp_chain.index.get(&key) {
        Some(&slot) => slot,
        None => {
            temp_chain.residues.push(TempResidue {
                key: key.clone(),
                raw_name: res_name.to_string(),
                atoms: Vec::new(),
            });
            temp_chain.index.insert(key, temp_chain.residues.len() - 1);
            temp_chain.residues.len() - 1
        }
    };

    let atom = Atom::new(atom_name, element, pos).with_alt_loc(alt_loc);
    let residue = &mut temp_chain.residues[slot];
    let duplicate = residue
        .atoms
        .iter()
        .any(|a| a.name == atom.name && a.alt_loc == atom.alt_loc);

    if duplicate {
        log::debug!(
            "line {line_num}: ignoring repeated atom {} (alt {:?}) in {}{}",
            atom.name,
            atom.alt_loc,
            residue.raw_name,
            res_seq
        );
    } else {
        residue.atoms.push(atom);
    }

    Ok(())
}

fn parse_element_from_name(name: &str) -> Element {
    let symbol: String = name
        .trim()
        .chars()
        .skip_while(|c| !c.is_alphabetic())
        .take_while(|c| c.is_alphabetic())
        .collect();

    // Organic names (CA, OD1, NE2, HG21) start with their element letter.
    let first = symbol.get(0..1).unwrap_or("");
    if matches!(first, "C" | "N" | "O" | "S" | "H" | "P") {
        return Element::from_str(first).unwrap_or(Element::Unknown);
    }
    Element::from_str(&symbol).unwrap_or(Element::Unknown)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::types::{ResidueCategory, StandardResidue};
    use std::io::Cursor;

    fn atom_line(
        record: &str,
        serial: usize,
        name: &str,
        alt: char,
        res_name: &str,
        chain: char,
        res_seq: i32,
        xyz: (f64, f64, f64),
        element: &str,
    ) -> String {
        format!(
            "{:<6}{:>5} {:<4}{}{:>3} {}{:>4}    {:>8.3}{:>8.3}{:>8.3}{:>6.2}{:>6.2}          {:>2}",
            record, serial, name, alt, res_name, chain, res_seq, xyz.0, xyz.1, xyz.2, 1.0, 20.0,
            element
        )
    }

    fn read_str(content: &str) -> Result<Structure, Error> {
        read(Cursor::new(content.as_bytes()), &IoContext::default())
    }

    #[test]
    fn read_parses_atoms_and_header_name() {
        let pdb = [
            "HEADER    HYDROLASE                               01-JAN-00   1ABC              ".to_string(),
            atom_line("ATOM", 1, "N", ' ', "GLY", 'A', 1, (0.0, 0.0, 0.0), "N"),
            atom_line("ATOM", 2, "CA", ' ', "GLY", 'A', 1, (1.458, 0.0, 0.0), "C"),
            atom_line("HETATM", 3, "O", ' ', "HOH", 'W', 301, (4.0, 1.0, -2.5), "O"),
            "END".to_string(),
        ]
        .join("\n");

        let structure = read_str(&pdb).unwrap();

        assert_eq!(structure.name, "1ABC");
        assert_eq!(structure.chain_count(), 2);
        assert_eq!(structure.atom_count(), 3);

        let water = structure.find_residue("W", 301, None).unwrap();
        assert_eq!(water.category, ResidueCategory::Solvent);
        assert_eq!(water.atom("O").unwrap().pos, Point::new(4.0, 1.0, -2.5));
    }

    #[test]
    fn read_without_header_uses_default_name() {
        let pdb = atom_line("ATOM", 1, "N", ' ', "ALA", 'A', 5, (0.0, 0.0, 0.0), "N");

        let structure = read_str(&pdb).unwrap();

        assert_eq!(structure.name, DEFAULT_STRUCTURE_NAME);
    }

    #[test]
    fn read_keeps_alternate_conformers() {
        let pdb = [
            atom_line("ATOM", 1, "OG", 'A', "SER", 'A', 7, (0.0, 0.0, 0.0), "O"),
            atom_line("ATOM", 2, "OG", 'B', "SER", 'A', 7, (0.5, 0.0, 0.0), "O"),
            atom_line("ATOM", 3, "OG", 'A', "SER", 'A', 7, (9.0, 0.0, 0.0), "O"),
        ]
        .join("\n");

        let structure = read_str(&pdb).unwrap();
        let serine = structure.find_residue("A", 7, None).unwrap();

        assert_eq!(serine.atom_count(), 2);
        assert_eq!(
            serine.atom_conformer("OG", Some('A')).unwrap().pos,
            Point::origin()
        );
        assert!(serine.atom_conformer("OG", Some('B')).is_some());
    }

    #[test]
    fn read_stops_after_first_model() {
        let pdb = [
            "MODEL        1".to_string(),
            atom_line("ATOM", 1, "N", ' ', "GLY", 'A', 1, (0.0, 0.0, 0.0), "N"),
            "ENDMDL".to_string(),
            "MODEL        2".to_string(),
            atom_line("ATOM", 1, "N", ' ', "GLY", 'A', 1, (5.0, 0.0, 0.0), "N"),
            "ENDMDL".to_string(),
        ]
        .join("\n");

        let structure = read_str(&pdb).unwrap();

        assert_eq!(structure.atom_count(), 1);
    }

    #[test]
    fn read_keeps_raw_residue_names_and_classifies_aliases() {
        let pdb = [
            atom_line("HETATM", 1, "O", ' ', "WAT", 'A', 900, (0.0, 0.0, 0.0), "O"),
            atom_line("HETATM", 2, "ZN", ' ', "ZN", 'A', 901, (3.0, 0.0, 0.0), "ZN"),
            atom_line("ATOM", 3, "CA", ' ', "MSE", 'A', 10, (6.0, 0.0, 0.0), "C"),
        ]
        .join("\n");

        let structure = read_str(&pdb).unwrap();

        let water = structure.find_residue("A", 900, None).unwrap();
        assert_eq!(water.name, "WAT");
        assert!(water.is_solvent());
        assert_eq!(
            structure.find_residue("A", 901, None).unwrap().category,
            ResidueCategory::Ion
        );
        assert_eq!(
            structure.find_residue("A", 10, None).unwrap().standard_name,
            Some(StandardResidue::MET)
        );
    }

    #[test]
    fn read_infers_element_from_atom_name_when_column_missing() {
        let line = atom_line("ATOM", 1, "OD1", ' ', "ASP", 'B', 3, (0.0, 0.0, 0.0), "");
        let pdb = line[..66].to_string();

        let structure = read_str(&pdb).unwrap();

        let atom = structure.iter_atoms().next().unwrap();
        assert_eq!(atom.element, Element::O);
    }

    #[test]
    fn read_reports_invalid_coordinates() {
        let mut line = atom_line("ATOM", 1, "N", ' ', "GLY", 'A', 1, (0.0, 0.0, 0.0), "N");
        line.replace_range(30..38, "   abcde");

        let err = read_str(&line).unwrap_err();

        assert!(matches!(err, Error::Parse { line_number: 1, .. }));
        assert!(err.to_string().contains("Invalid X coordinate"));
    }

    #[test]
    fn read_rejects_input_without_atoms() {
        let err = read_str("HEADER    EMPTY\nEND\n").unwrap_err();

        assert!(matches!(err, Error::NoAtoms { .. }));
    }
}
