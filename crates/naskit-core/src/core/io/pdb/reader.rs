use super::record::parse_atom_record;
use super::{FrameErrorKind, PdbError, ReadOptions};
use crate::core::models::atom::Atom;
use crate::core::models::chain::{Chain, ChainKind};
use crate::core::models::frames::FrameSet;
use crate::core::models::residue::{Residue, ResidueCategory};
use crate::core::models::structure::{Component, Structure};
use std::io::BufRead;
use tracing::{debug, instrument};

enum Token {
    Atom { line: usize, atom: Atom },
    Ter { line: usize },
    ModelOpen { line: usize },
    ModelClose { line: usize },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FrameState {
    Undefined,
    Open,
    Closed,
}

enum Grouped {
    Residue { line: usize, residue: Residue },
    Ter { line: usize },
}

fn is_coordinate_section_start(line: &str) -> bool {
    line.starts_with("ATOM") || line.starts_with("HETATM") || line.starts_with("MODEL")
}

#[instrument(skip_all, name = "read_pdb")]
pub(super) fn read_frames(
    reader: &mut impl BufRead,
    options: &ReadOptions,
) -> Result<FrameSet, PdbError> {
    let mut lines = Vec::new();
    for line in reader.lines() {
        lines.push(line?.trim_end().to_string());
    }

    let header_end = lines
        .iter()
        .position(|l| is_coordinate_section_start(l))
        .unwrap_or(lines.len());
    let header = lines[..header_end].join("\n");

    let tokens = tokenize(&lines[header_end..], header_end, options)?;
    let frames = split_frames(tokens)?;
    let structures = frames
        .into_iter()
        .map(build_structure)
        .collect::<Result<Vec<_>, _>>()?;

    debug!(
        frames = structures.len(),
        header_lines = header_end,
        atoms = structures.first().map_or(0, Structure::natoms),
        "Parsed PDB records."
    );
    Ok(FrameSet::new(structures, header))
}

fn tokenize(lines: &[String], offset: usize, options: &ReadOptions) -> Result<Vec<Token>, PdbError> {
    let mut tokens = Vec::new();
    for (i, line) in lines.iter().enumerate() {
        let line_num = offset + i + 1;
        if line.starts_with("ATOM") || line.starts_with("HETATM") {
            let atom = parse_atom_record(line, line_num, options)?;
            if matches!(atom.alt_loc, ' ' | 'A') {
                tokens.push(Token::Atom {
                    line: line_num,
                    atom,
                });
            }
        } else if line.starts_with("TER") {
            tokens.push(Token::Ter { line: line_num });
        } else if line.starts_with("MODEL") {
            tokens.push(Token::ModelOpen { line: line_num });
        } else if line.starts_with("ENDMDL") {
            tokens.push(Token::ModelClose { line: line_num });
        }
    }
    Ok(tokens)
}

fn split_frames(tokens: Vec<Token>) -> Result<Vec<Vec<Token>>, PdbError> {
    let frame_error = |line, kind| PdbError::Frame { line, kind };
    let mut frames = Vec::new();
    let mut pending = Vec::new();
    let mut state = FrameState::Undefined;
    let mut last_line = 0;

    for token in tokens {
        match token {
            Token::ModelOpen { line } => {
                if state == FrameState::Open {
                    return Err(frame_error(line, FrameErrorKind::NestedFrame));
                }
                if !pending.is_empty() {
                    return Err(frame_error(line, FrameErrorKind::RecordsOutsideFrame));
                }
                state = FrameState::Open;
            }
            Token::ModelClose { line } => {
                if state != FrameState::Open {
                    return Err(frame_error(line, FrameErrorKind::UnopenedFrame));
                }
                if pending.is_empty() {
                    return Err(frame_error(line, FrameErrorKind::EmptyFrame));
                }
                frames.push(std::mem::take(&mut pending));
                state = FrameState::Closed;
            }
            Token::Atom { line, .. } | Token::Ter { line } => {
                last_line = line;
                pending.push(token);
            }
        }
    }

    if !pending.is_empty() {
        if state != FrameState::Undefined {
            return Err(frame_error(last_line, FrameErrorKind::UnclosedFrame));
        }
        frames.push(pending);
    }
    Ok(frames)
}

fn build_structure(tokens: Vec<Token>) -> Result<Structure, PdbError> {
    let grouped = group_residues(tokens)?;
    let components = group_chains(grouped)?;
    Ok(Structure::from_components(components))
}

/// Consecutive atoms with the same residue number form one residue; `TER` always splits.
fn group_residues(tokens: Vec<Token>) -> Result<Vec<Grouped>, PdbError> {
    let mut grouped = Vec::new();
    let mut current: Vec<(usize, Atom)> = Vec::new();

    for token in tokens {
        match token {
            Token::Atom { line, atom } => {
                if current
                    .last()
                    .is_some_and(|(_, last)| last.residue_number() != atom.residue_number())
                {
                    grouped.push(flush_residue(std::mem::take(&mut current))?);
                }
                current.push((line, atom));
            }
            Token::Ter { line } => {
                if !current.is_empty() {
                    grouped.push(flush_residue(std::mem::take(&mut current))?);
                }
                grouped.push(Grouped::Ter { line });
            }
            Token::ModelOpen { .. } | Token::ModelClose { .. } => {}
        }
    }
    if !current.is_empty() {
        grouped.push(flush_residue(current)?);
    }
    Ok(grouped)
}

fn flush_residue(atoms: Vec<(usize, Atom)>) -> Result<Grouped, PdbError> {
    let mut atoms = atoms.into_iter();
    let Some((first_line, first)) = atoms.next() else {
        return Err(PdbError::Model {
            line: 0,
            source: crate::core::models::error::ModelError::EmptyResidue,
        });
    };
    let category = ResidueCategory::from_residue_name(first.residue_name());
    let mut residue = Residue::new(
        category,
        first.residue_name(),
        first.chain_id(),
        first.residue_number(),
    );
    residue
        .add_atom(first)
        .map_err(|source| PdbError::Model {
            line: first_line,
            source,
        })?;
    for (line, atom) in atoms {
        residue
            .add_atom(atom)
            .map_err(|source| PdbError::Model { line, source })?;
    }
    Ok(Grouped::Residue {
        line: first_line,
        residue,
    })
}

/// Merges consecutive polymer residues with the same chain label into chains.
fn group_chains(grouped: Vec<Grouped>) -> Result<Vec<Component>, PdbError> {
    let mut components = Vec::new();
    let mut open: Option<Chain> = None;

    for item in grouped {
        match item {
            Grouped::Residue { line, residue } => match ChainKind::for_category(residue.category()) {
                Some(kind) => {
                    if open
                        .as_ref()
                        .is_some_and(|chain| chain.chain_id() != Some(residue.chain_id()))
                    {
                        components.extend(open.take().map(Component::Chain));
                    }
                    open.get_or_insert_with(|| Chain::new(kind))
                        .add_residue(residue)
                        .map_err(|source| PdbError::Model { line, source })?;
                }
                None => {
                    components.extend(open.take().map(Component::Chain));
                    components.push(Component::Molecule(residue));
                }
            },
            Grouped::Ter { line } => match open.take() {
                Some(chain) => components.push(Component::Chain(chain)),
                None => {
                    return Err(PdbError::Frame {
                        line,
                        kind: FrameErrorKind::EmptyChain,
                    });
                }
            },
        }
    }
    components.extend(open.map(Component::Chain));
    Ok(components)
}
