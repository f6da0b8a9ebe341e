use crate::core::models::frames::{Document, FrameSet};
use std::error::Error;
use std::fs::File;
use std::io::{self, BufRead, BufReader, BufWriter, Write};
use std::path::Path;

/// Defines the interface for reading and writing molecular file formats.
///
/// Implementors provide the stream-level `read_from`/`write_to`; file-path variants are derived
/// from them.
pub trait MolecularFile {
    /// Options controlling how records are decoded.
    type ReadOptions: Default;

    /// Options controlling how records are encoded.
    type WriteOptions: Default;

    /// The error type for I/O operations.
    type Error: Error + From<io::Error>;

    /// Reads every frame from a buffered reader.
    ///
    /// # Arguments
    ///
    /// * `reader` - The buffered reader to read from.
    /// * `options` - Format-specific decoding options.
    ///
    /// # Return
    ///
    /// Returns all frames together with the file header.
    ///
    /// # Errors
    ///
    /// Returns an error if parsing fails or the reader fails. No partial result is returned.
    fn read_from(
        reader: &mut impl BufRead,
        options: &Self::ReadOptions,
    ) -> Result<FrameSet, Self::Error>;

    /// Writes a frame set, structure, chain or residue to a writer.
    ///
    /// # Arguments
    ///
    /// * `document` - The container to write; it is never modified.
    /// * `writer` - The writer to output to.
    /// * `options` - Format-specific encoding options.
    ///
    /// # Return
    ///
    /// Returns `Ok(())` on success.
    ///
    /// # Errors
    ///
    /// Returns an error if the document cannot be prepared or writing fails.
    fn write_to<'a>(
        document: impl Into<Document<'a>>,
        writer: &mut impl Write,
        options: &Self::WriteOptions,
    ) -> Result<(), Self::Error>;

    /// Reads every frame from a file path.
    ///
    /// # Arguments
    ///
    /// * `path` - The path to the file to read.
    /// * `options` - Format-specific decoding options.
    ///
    /// # Return
    ///
    /// Returns all frames together with the file header.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be opened or parsing fails.
    fn read_from_path<P: AsRef<Path>>(
        path: P,
        options: &Self::ReadOptions,
    ) -> Result<FrameSet, Self::Error> {
        let file = File::open(path)?;
        let mut reader = BufReader::new(file);
        Self::read_from(&mut reader, options)
    }

    /// Writes a document to a file path, creating or truncating the file.
    ///
    /// # Arguments
    ///
    /// * `document` - The container to write.
    /// * `path` - The path to the file to write.
    /// * `options` - Format-specific encoding options.
    ///
    /// # Return
    ///
    /// Returns `Ok(())` on success.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be created or writing fails.
    fn write_to_path<'a, P: AsRef<Path>>(
        document: impl Into<Document<'a>>,
        path: P,
        options: &Self::WriteOptions,
    ) -> Result<(), Self::Error> {
        let file = File::create(path)?;
        let mut writer = BufWriter::new(file);
        Self::write_to(document, &mut writer, options)?;
        writer.flush()?;
        Ok(())
    }
}
