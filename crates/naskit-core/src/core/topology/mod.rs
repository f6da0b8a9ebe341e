//! # Topology Module
//!
//! Static knowledge about nucleotides: which atoms form each sugar and base, how rings of
//! different classes correspond, where the Watson-Crick donors and acceptors sit, and the
//! reference geometries used when fragments are swapped.
//!
//! - [`nucleotides`] - [`nucleotides::NaType`], [`nucleotides::Sugar`],
//!   [`nucleotides::Nucleobase`] and the atom tables behind them
//! - [`hbond`] - Donor and acceptor atoms per base
//! - [`templates`] - The [`templates::TemplateLibrary`] of sugar and base fragments

pub mod hbond;
pub mod nucleotides;
pub mod templates;
