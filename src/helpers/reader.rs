use crate::error::NestedSheetError;
use std::fs::File;
use std::io::BufReader;
use std::io::Cursor;
use std::io::Read;
use std::io::Seek;
use std::path::Path;

/// Seekable source of an xlsx package, backed by a file on disk or by bytes the caller already holds
pub(crate) enum UnifiedReader {
    File(BufReader<File>),
    Bytes(Cursor<Vec<u8>>),
}

impl UnifiedReader {
    /// Opens a package on disk; I/O failures surface as [`NestedSheetError::IoError`]
    pub(crate) fn open<P: AsRef<Path>>(path: P) -> Result<UnifiedReader, NestedSheetError> {
        Ok(UnifiedReader::File(BufReader::new(File::open(path)?)))
    }

    pub(crate) fn from_bytes(bytes: Vec<u8>) -> UnifiedReader {
        UnifiedReader::Bytes(Cursor::new(bytes))
    }
}

impl Read for UnifiedReader {
    fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
        match self {
            UnifiedReader::File(source) => source.read(buf),
            UnifiedReader::Bytes(source) => source.read(buf),
        }
    }
}

impl Seek for UnifiedReader {
    fn seek(&mut self, pos: std::io::SeekFrom) -> std::io::Result<u64> {
        match self {
            UnifiedReader::File(source) => source.seek(pos),
            UnifiedReader::Bytes(source) => source.seek(pos),
        }
    }
}
