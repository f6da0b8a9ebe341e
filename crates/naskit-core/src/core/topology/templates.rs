use super::nucleotides::{Nucleobase, Sugar};
use crate::core::io::pdb::{PdbError, PdbFile, ReadOptions};
use crate::core::io::traits::MolecularFile;
use crate::core::models::residue::{Residue, ResidueCategory};
use std::path::Path;
use std::sync::LazyLock;
use thiserror::Error;
use tracing::{debug, instrument};

const TEMPLATE_FILES: [(&str, &str); 7] = [
    ("ribose", include_str!("../../../data/templates/ribose.pdb")),
    ("deoxyribose", include_str!("../../../data/templates/deoxyribose.pdb")),
    ("adenine", include_str!("../../../data/templates/adenine.pdb")),
    ("guanine", include_str!("../../../data/templates/guanine.pdb")),
    ("cytosine", include_str!("../../../data/templates/cytosine.pdb")),
    ("uracil", include_str!("../../../data/templates/uracil.pdb")),
    ("thymine", include_str!("../../../data/templates/thymine.pdb")),
];

static BUNDLED: LazyLock<Result<TemplateLibrary, String>> = LazyLock::new(|| {
    TemplateLibrary::from_sources(TEMPLATE_FILES.map(|(name, text)| (name, text.to_string())))
        .map_err(|e| e.to_string())
});

#[derive(Debug, Error)]
pub enum TemplateLoadError {
    #[error("File I/O error for '{path}': {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },
    #[error("Template '{name}' is not valid PDB: {source}")]
    Pdb { name: String, source: PdbError },
    #[error("Template '{name}' contains no atoms")]
    Empty { name: String },
    #[error("Bundled template library is unusable: {0}")]
    Bundled(String),
}

/// Reference geometries for the sugar and base fragments.
///
/// Each template is a single residue. Only the atoms named by the sugar and base atom tables
/// are ever copied out of it; anything else in the file (C1' on a base, the 5' backbone on a
/// sugar) only rides along.
#[derive(Debug, Clone, PartialEq)]
pub struct TemplateLibrary {
    ribose: Residue,
    deoxyribose: Residue,
    adenine: Residue,
    guanine: Residue,
    cytosine: Residue,
    uracil: Residue,
    thymine: Residue,
}

impl TemplateLibrary {
    /// The library compiled into the crate, parsed once on first use.
    ///
    /// # Errors
    ///
    /// Returns [`TemplateLoadError::Bundled`] if the embedded files fail to parse.
    pub fn bundled() -> Result<&'static Self, TemplateLoadError> {
        BUNDLED
            .as_ref()
            .map_err(|msg| TemplateLoadError::Bundled(msg.clone()))
    }

    /// Loads `ribose.pdb`, `deoxyribose.pdb`, `adenine.pdb`, `guanine.pdb`, `cytosine.pdb`,
    /// `uracil.pdb` and `thymine.pdb` from `dir`.
    #[instrument(skip_all, fields(dir = %dir.display()))]
    pub fn load(dir: &Path) -> Result<Self, TemplateLoadError> {
        let mut sources = Vec::with_capacity(TEMPLATE_FILES.len());
        for (name, _) in TEMPLATE_FILES {
            let path = dir.join(format!("{name}.pdb"));
            let text = std::fs::read_to_string(&path).map_err(|e| TemplateLoadError::Io {
                path: path.to_string_lossy().to_string(),
                source: e,
            })?;
            sources.push((name, text));
        }
        let library = Self::from_sources(sources)?;
        debug!("Loaded template library from directory.");
        Ok(library)
    }

    fn from_sources(
        sources: impl IntoIterator<Item = (&'static str, String)>,
    ) -> Result<Self, TemplateLoadError> {
        let mut parsed = Vec::with_capacity(TEMPLATE_FILES.len());
        for (name, text) in sources {
            parsed.push(parse_template(name, &text)?);
        }
        let mut parsed = parsed.into_iter();
        let mut next = || {
            parsed.next().ok_or_else(|| TemplateLoadError::Empty {
                name: "library".to_string(),
            })
        };
        Ok(Self {
            ribose: next()?,
            deoxyribose: next()?,
            adenine: next()?,
            guanine: next()?,
            cytosine: next()?,
            uracil: next()?,
            thymine: next()?,
        })
    }

    pub fn sugar(&self, sugar: Sugar) -> &Residue {
        match sugar {
            Sugar::Ribose => &self.ribose,
            Sugar::Deoxyribose => &self.deoxyribose,
        }
    }

    pub fn base(&self, base: Nucleobase) -> &Residue {
        match base {
            Nucleobase::Adenine => &self.adenine,
            Nucleobase::Guanine => &self.guanine,
            Nucleobase::Cytosine => &self.cytosine,
            Nucleobase::Uracil => &self.uracil,
            Nucleobase::Thymine => &self.thymine,
        }
    }
}

fn parse_template(name: &str, text: &str) -> Result<Residue, TemplateLoadError> {
    let frames = PdbFile::read_from(&mut text.as_bytes(), &ReadOptions::default()).map_err(
        |e| TemplateLoadError::Pdb {
            name: name.to_string(),
            source: e,
        },
    )?;
    let atoms: Vec<_> = frames.iter().flat_map(|s| s.atoms()).cloned().collect();
    if atoms.is_empty() {
        return Err(TemplateLoadError::Empty {
            name: name.to_string(),
        });
    }
    Residue::from_atoms(ResidueCategory::NucleicAcid, atoms).map_err(|e| TemplateLoadError::Pdb {
        name: name.to_string(),
        source: PdbError::Prepare(e),
    })
}
