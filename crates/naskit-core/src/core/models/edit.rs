use super::error::ModelError;

/// Bulk identity edits shared by every container in the hierarchy.
///
/// Each method walks the container in stored order and returns the value the next container
/// in a sequence should start from, so that edits compose across siblings.
pub trait Renumber {
    /// Assigns consecutive atom serials starting at `start`.
    ///
    /// # Arguments
    ///
    /// * `start` - Serial given to the first atom.
    ///
    /// # Return
    ///
    /// The serial following the last one assigned.
    fn renumber_atoms(&mut self, start: usize) -> usize;

    /// Assigns consecutive residue numbers starting at `start`.
    ///
    /// Chains receive a contiguous block; a standalone molecule consumes a single number.
    ///
    /// # Arguments
    ///
    /// * `start` - Number given to the first residue.
    ///
    /// # Return
    ///
    /// The residue number following the last one assigned.
    fn renumber_residues(&mut self, start: isize) -> isize;

    /// Relabels chains starting at `start`.
    ///
    /// A chain takes the current label and advances it (wrapping from `Z` back to `A`); a
    /// standalone molecule takes the current label without advancing it.
    ///
    /// # Arguments
    ///
    /// * `start` - Label given to the first chain.
    ///
    /// # Return
    ///
    /// The label the next chain in a sequence should take.
    ///
    /// # Errors
    ///
    /// Returns [`ModelError::InvalidChainId`] if `start` is not an uppercase ASCII letter.
    fn rename_chains(&mut self, start: char) -> Result<char, ModelError>;
}

/// Returns the chain label after `label`, wrapping from `Z` to `A`.
pub fn next_chain_label(label: char) -> char {
    match label {
        'A'..='Y' => char::from(label as u8 + 1),
        _ => 'A',
    }
}

pub(crate) fn validate_chain_id(chain_id: char) -> Result<char, ModelError> {
    if chain_id.is_ascii_uppercase() {
        Ok(chain_id)
    } else {
        Err(ModelError::InvalidChainId(chain_id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn next_chain_label_advances_and_wraps() {
        assert_eq!(next_chain_label('A'), 'B');
        assert_eq!(next_chain_label('Y'), 'Z');
        assert_eq!(next_chain_label('Z'), 'A');
    }

    #[test]
    fn validate_chain_id_accepts_only_uppercase_letters() {
        assert_eq!(validate_chain_id('Q'), Ok('Q'));
        assert_eq!(validate_chain_id('q'), Err(ModelError::InvalidChainId('q')));
        assert_eq!(validate_chain_id('1'), Err(ModelError::InvalidChainId('1')));
        assert_eq!(validate_chain_id(' '), Err(ModelError::InvalidChainId(' ')));
    }
}
