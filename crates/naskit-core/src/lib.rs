//! # naskit
//!
//! A library for reading, editing and analysing nucleic-acid structures.
//!
//! ## Architectural Philosophy
//!
//! The library is split into two layers with a strict dependency direction.
//!
//! - **[`core`]: The Foundation.** Plain data models (`Atom`, `Residue`, `Chain`,
//!   `Structure`, `FrameSet`), the fixed-column PDB reader and writer, nucleotide topology
//!   tables, the bundled reference templates, pairing parameters and geometric utilities such as
//!   Kabsch superposition.
//!
//! - **[`engine`]: The Chemistry.** Operations built on top of the models: rigid fragment
//!   embedding, sugar and nucleobase swaps (`to_rna`, `to_dna`, `change_nucleobase`) and
//!   secondary-structure inference from 3D coordinates.
//!
//! Nothing in `core` depends on `engine`.

pub mod core;
pub mod engine;
