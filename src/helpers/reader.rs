use crate::error::RetroError;
use std::fs::File;
use std::io::BufReader;
use std::io::Cursor;
use std::io::Read;
use std::io::Seek;
use std::path::Path;
use std::path::PathBuf;

/// Magic bytes of an OLE compound file (legacy xls, or an encrypted xlsx package).
const CFB_SIGNATURE: [u8; 8] = [0xD0, 0xCF, 0x11, 0xE0, 0xA1, 0xB1, 0x1A, 0xE1];

/// Where a workbook comes from: a file on disk, or bytes handed over by an upload.
#[derive(Clone, Debug)]
pub enum WorkbookSource {
    Path(PathBuf),
    Bytes { name: String, bytes: Vec<u8> },
}

impl WorkbookSource {
    pub fn path<P: AsRef<Path>>(path: P) -> Self {
        WorkbookSource::Path(path.as_ref().to_path_buf())
    }

    pub fn bytes(name: &str, bytes: Vec<u8>) -> Self {
        WorkbookSource::Bytes {
            name: name.to_owned(),
            bytes,
        }
    }

    /// Display name used in messages.
    pub fn name(&self) -> String {
        match self {
            WorkbookSource::Path(path) => path.to_string_lossy().to_string(),
            WorkbookSource::Bytes { name, .. } => name.to_owned(),
        }
    }
}

/// A unified reader over local files and in-memory uploads
pub(crate) enum UnifiedReader {
    /// Local file reader
    Local(BufReader<File>),
    /// Uploaded workbook (in-memory buffer)
    Memory(Cursor<Vec<u8>>),
}

impl UnifiedReader {
    /// Opens the workbook source for reading.
    pub(crate) fn new(source: &WorkbookSource) -> Result<UnifiedReader, RetroError> {
        match source {
            WorkbookSource::Path(path) => {
                let file = File::open(path)?;
                Ok(UnifiedReader::Local(BufReader::new(file)))
            }
            WorkbookSource::Bytes { bytes, .. } => Ok(UnifiedReader::Memory(Cursor::new(bytes.to_owned()))),
        }
    }

    /// Checks for an OLE compound file header and rewinds the reader.
    /// Such files are either password protected packages or the legacy binary format.
    pub(crate) fn is_compound_file(&mut self) -> Result<bool, RetroError> {
        let mut signature = [0u8; 8];
        let matched = match self.read_exact(&mut signature) {
            Ok(()) => signature == CFB_SIGNATURE,
            Err(error) if error.kind() == std::io::ErrorKind::UnexpectedEof => false,
            Err(error) => Err(error)?,
        };
        self.rewind()?;
        Ok(matched)
    }
}

impl Read for UnifiedReader {
    fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
        match self {
            UnifiedReader::Local(reader) => reader.read(buf),
            UnifiedReader::Memory(reader) => reader.read(buf),
        }
    }
}

impl Seek for UnifiedReader {
    fn seek(&mut self, pos: std::io::SeekFrom) -> std::io::Result<u64> {
        match self {
            UnifiedReader::Local(reader) => reader.seek(pos),
            UnifiedReader::Memory(reader) => reader.seek(pos),
        }
    }
}
