use super::chain::Chain;
use super::edit::Renumber;
use super::error::ModelError;
use super::residue::Residue;
use super::structure::Structure;

/// All frames of one coordinate file together with its free-text header.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FrameSet {
    frames: Vec<Structure>,
    header: String,
}

impl FrameSet {
    pub fn new(frames: Vec<Structure>, header: impl Into<String>) -> Self {
        Self {
            frames,
            header: header.into(),
        }
    }

    pub fn frames(&self) -> &[Structure] {
        &self.frames
    }

    pub fn frames_mut(&mut self) -> &mut [Structure] {
        &mut self.frames
    }

    pub fn frame(&self, index: usize) -> Option<&Structure> {
        self.frames.get(index)
    }

    pub fn frame_mut(&mut self, index: usize) -> Option<&mut Structure> {
        self.frames.get_mut(index)
    }

    pub fn push(&mut self, frame: Structure) {
        self.frames.push(frame);
    }

    pub fn len(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    pub fn header(&self) -> &str {
        &self.header
    }

    pub fn set_header(&mut self, header: impl Into<String>) {
        self.header = header.into();
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Structure> {
        self.frames.iter()
    }

    pub fn into_frames(self) -> Vec<Structure> {
        self.frames
    }
}

/// Every frame is renumbered and relabelled independently from the same starting value; the
/// returned value is the one following the last frame.
impl Renumber for FrameSet {
    fn renumber_atoms(&mut self, start: usize) -> usize {
        self.frames
            .iter_mut()
            .map(|frame| frame.renumber_atoms(start))
            .last()
            .unwrap_or(start)
    }

    fn renumber_residues(&mut self, start: isize) -> isize {
        self.frames
            .iter_mut()
            .map(|frame| frame.renumber_residues(start))
            .last()
            .unwrap_or(start)
    }

    fn rename_chains(&mut self, start: char) -> Result<char, ModelError> {
        let mut next = start;
        for frame in &mut self.frames {
            next = frame.rename_chains(start)?;
        }
        Ok(next)
    }
}

impl std::ops::Index<usize> for FrameSet {
    type Output = Structure;

    fn index(&self, index: usize) -> &Self::Output {
        &self.frames[index]
    }
}

impl<'a> IntoIterator for &'a FrameSet {
    type Item = &'a Structure;
    type IntoIter = std::slice::Iter<'a, Structure>;

    fn into_iter(self) -> Self::IntoIter {
        self.frames.iter()
    }
}

/// Anything that can be serialized as a coordinate file.
#[derive(Debug, Clone, Copy)]
pub enum Document<'a> {
    Frames(&'a FrameSet),
    Structure(&'a Structure),
    Chain(&'a Chain),
    Residue(&'a Residue),
}

impl<'a> From<&'a FrameSet> for Document<'a> {
    fn from(frames: &'a FrameSet) -> Self {
        Document::Frames(frames)
    }
}

impl<'a> From<&'a Structure> for Document<'a> {
    fn from(structure: &'a Structure) -> Self {
        Document::Structure(structure)
    }
}

impl<'a> From<&'a Chain> for Document<'a> {
    fn from(chain: &'a Chain) -> Self {
        Document::Chain(chain)
    }
}

impl<'a> From<&'a Residue> for Document<'a> {
    fn from(residue: &'a Residue) -> Self {
        Document::Residue(residue)
    }
}
