use super::record::{RECORD_WIDTH, format_atom_record};
use super::{PdbError, WriteOptions};
use crate::core::models::chain::Chain;
use crate::core::models::edit::Renumber;
use crate::core::models::error::ModelError;
use crate::core::models::frames::{Document, FrameSet};
use crate::core::models::residue::Residue;
use crate::core::models::structure::{Component, Structure};
use std::borrow::Cow;
use std::io::Write;
use tracing::{debug, instrument};

/// Applies the record-rewriting options to a copy, leaving the caller's document untouched.
fn prepare<'a, T: Renumber + Clone>(
    item: &'a T,
    options: &WriteOptions,
) -> Result<Cow<'a, T>, ModelError> {
    if !options.rewrites_records() {
        return Ok(Cow::Borrowed(item));
    }
    let mut owned = item.clone();
    if options.renumber_atoms {
        owned.renumber_atoms(1);
    }
    if options.renumber_residues {
        owned.renumber_residues(1);
    }
    if options.rename_chains {
        owned.rename_chains('A')?;
    }
    Ok(Cow::Owned(owned))
}

#[instrument(skip_all, name = "write_pdb")]
pub(super) fn write_document(
    document: Document<'_>,
    writer: &mut impl Write,
    options: &WriteOptions,
) -> Result<(), PdbError> {
    match document {
        Document::Frames(frames) => {
            let frames = prepare(frames, options)?;
            write_frames(&frames, writer, options.include_header)?;
            debug!(frames = frames.len(), "Wrote PDB frame set.");
        }
        Document::Structure(structure) => {
            let structure = prepare(structure, options)?;
            write_structure(&structure, writer)?;
            debug!(atoms = structure.natoms(), "Wrote PDB structure.");
        }
        Document::Chain(chain) => {
            let chain = prepare(chain, options)?;
            write_chain(&chain, writer)?;
            debug!(residues = chain.len(), "Wrote PDB chain.");
        }
        Document::Residue(residue) => {
            let residue = prepare(residue, options)?;
            write_residue(&residue, writer)?;
            debug!(atoms = residue.len(), "Wrote PDB residue.");
        }
    }
    Ok(())
}

fn write_frames(
    frames: &FrameSet,
    writer: &mut impl Write,
    include_header: bool,
) -> Result<(), PdbError> {
    if include_header && !frames.header().is_empty() {
        writeln!(writer, "{}", frames.header())?;
    }
    for (i, structure) in frames.iter().enumerate() {
        let model = format!("MODEL        {}", i + 1);
        writeln!(writer, "{model:<RECORD_WIDTH$}")?;
        write_structure(structure, writer)?;
        writeln!(writer, "ENDMDL")?;
    }
    Ok(())
}

fn write_structure(structure: &Structure, writer: &mut impl Write) -> Result<(), PdbError> {
    for component in structure.components() {
        match component {
            Component::Molecule(residue) => write_residue(residue, writer)?,
            Component::Chain(chain) => write_chain(chain, writer)?,
        }
    }
    Ok(())
}

fn write_chain(chain: &Chain, writer: &mut impl Write) -> Result<(), PdbError> {
    for residue in chain.residues() {
        write_residue(residue, writer)?;
    }
    writeln!(writer, "TER")?;
    Ok(())
}

fn write_residue(residue: &Residue, writer: &mut impl Write) -> Result<(), PdbError> {
    for atom in residue {
        writeln!(writer, "{}", format_atom_record(atom))?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::super::{PdbFile, ReadOptions};
    use super::*;
    use crate::core::io::traits::MolecularFile;
    use tempfile::NamedTempFile;

    const SOURCE: &str = "\
HEADER    TEST STRUCTURE
ATOM     10  P     G A   5      58.321  36.610-112.262  1.00  0.00           P
ATOM     11  OP1   G A   5      58.167  35.355-113.032  1.00  0.00           O
ATOM     12  P     C A   6      57.321  35.610-111.262  1.00  0.00           P
TER
HETATM   40 MG    MG C 501      10.000 -20.000  30.000  1.00 12.50          MG2+
HETATM   41  O   HOH W  17       1.000   2.000   3.000  1.00  5.00           O
ATOM     20  N   ALA Q  99       0.100   0.200   0.300  1.00  9.99           N
TER
";

    fn read(text: &str) -> FrameSet {
        PdbFile::read_from(&mut text.as_bytes(), &ReadOptions::default()).unwrap()
    }

    fn write(document: Document<'_>, options: &WriteOptions) -> String {
        let mut buffer = Vec::new();
        write_document(document, &mut buffer, options).unwrap();
        String::from_utf8(buffer).unwrap()
    }

    #[test]
    fn structure_round_trip_is_lossless() {
        let frames = read(SOURCE);
        let text = write(Document::Structure(&frames[0]), &WriteOptions::default());
        let expected: Vec<&str> = SOURCE.lines().skip(1).collect();
        assert_eq!(text.lines().map(str::trim_end).collect::<Vec<_>>(), expected);
        assert!(text.lines().filter(|l| l.starts_with("ATOM")).all(|l| l.len() == 80));
        assert_eq!(read(&text)[0], frames[0]);
    }

    #[test]
    fn frame_set_is_wrapped_in_numbered_models() {
        let frames = FrameSet::new(
            vec![read(SOURCE).into_frames().remove(0), read(SOURCE).into_frames().remove(0)],
            "HEADER    TEST STRUCTURE",
        );
        let options = WriteOptions {
            include_header: true,
            ..Default::default()
        };
        let text = write(Document::Frames(&frames), &options);
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "HEADER    TEST STRUCTURE");
        assert_eq!(lines[1], format!("{:<80}", "MODEL        1"));
        assert_eq!(lines[1].len(), 80);
        assert!(lines.contains(&format!("{:<80}", "MODEL        2").as_str()));
        assert_eq!(lines.iter().filter(|l| **l == "ENDMDL").count(), 2);

        let reread = read(&text);
        assert_eq!(reread.len(), 2);
        assert_eq!(reread.header(), "HEADER    TEST STRUCTURE");
        assert_eq!(reread[1], frames[1]);
    }

    #[test]
    fn header_is_omitted_unless_requested() {
        let frames = read(SOURCE);
        let text = write(Document::Frames(&frames), &WriteOptions::default());
        assert!(text.starts_with("MODEL        1"));
    }

    #[test]
    fn renumbering_options_apply_to_a_copy() {
        let frames = read(SOURCE);
        let structure = &frames[0];
        let options = WriteOptions {
            renumber_atoms: true,
            renumber_residues: true,
            rename_chains: true,
            include_header: false,
        };
        let text = write(Document::Structure(structure), &options);
        let rewritten = read(&text).into_frames().remove(0);

        let serials: Vec<_> = rewritten.atoms().map(|a| a.serial).collect();
        assert_eq!(serials, vec![1, 2, 3, 4, 5, 6]);
        let numbers: Vec<_> = rewritten.residues().map(Residue::number).collect();
        assert_eq!(numbers, vec![1, 2, 3, 4, 5]);
        let labels: Vec<_> = rewritten.residues().map(Residue::chain_id).collect();
        assert_eq!(labels, vec!['A', 'A', 'B', 'B', 'B']);

        assert_eq!(structure.atoms().next().unwrap().serial, 10);
        assert_eq!(structure.residues().last().unwrap().chain_id(), 'Q');
    }

    #[test]
    fn chain_and_residue_documents() {
        let frames = read(SOURCE);
        let chain = frames[0][0].as_chain().unwrap();
        let chain_text = write(Document::Chain(chain), &WriteOptions::default());
        assert_eq!(chain_text.lines().count(), 4);
        assert!(chain_text.ends_with("TER\n"));

        let residue = chain.residue(1).unwrap();
        let residue_text = write(Document::Residue(residue), &WriteOptions::default());
        assert_eq!(residue_text.lines().count(), 1);
        assert!(residue_text.starts_with("ATOM     12  P     C A   6"));
    }

    #[test]
    fn write_to_path_and_read_back() {
        let frames = read(SOURCE);
        let file = NamedTempFile::new().unwrap();
        crate::core::io::write(file.path(), &frames, &WriteOptions::default()).unwrap();
        let reread = crate::core::io::read(file.path()).unwrap();
        assert_eq!(reread.frames(), frames.frames());
        assert_eq!(reread.header(), "");
    }
}
