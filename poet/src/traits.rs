//! Traits for reading and writing localization documents.

use std::{
    fs::{File, Permissions},
    io::{BufRead, BufReader, BufWriter, Cursor, Write},
    path::Path,
};

use tempfile::NamedTempFile;

use crate::error::Error;

/// A document that can be read back from a file.
///
/// # Example
///
/// ```rust,no_run
/// use poet::traits::Parser;
/// let table = poet::formats::strings::Format::read_from("de.lproj/Main.strings")?;
/// println!("{} pairs", table.pairs.len());
/// Ok::<(), Box<dyn std::error::Error>>(())
/// ```
pub trait Parser {
    /// Parse from any reader.
    fn from_reader<R: BufRead>(reader: R) -> Result<Self, Error>
    where
        Self: Sized;

    /// Parse from file path.
    fn read_from<P: AsRef<Path>>(path: P) -> Result<Self, Error>
    where
        Self: Sized,
    {
        let path = path.as_ref();
        let file = File::open(path).map_err(|e| Error::file_system(path, e))?;
        Self::from_reader(BufReader::new(file))
    }

    /// Parse from a string.
    fn from_str(s: &str) -> Result<Self, Error>
    where
        Self: Sized,
    {
        Self::from_reader(Cursor::new(s))
    }
}

/// A document that can be written out.
pub trait Document {
    /// Write to any writer (file, memory, etc.).
    fn to_writer<W: Write>(&self, writer: W) -> Result<(), Error>;

    /// Render into memory.
    fn to_bytes(&self) -> Result<Vec<u8>, Error> {
        let mut out = Vec::new();
        self.to_writer(&mut out)?;
        Ok(out)
    }

    /// Write to file path, creating missing parent directories.
    ///
    /// The content goes to a temporary file next to `path` which is then renamed over it,
    /// so readers see either the previous file or the complete new one. The result keeps the
    /// permissions of the file it replaces; new files are readable by everyone (`0644`).
    fn write_to<P: AsRef<Path>>(&self, path: P) -> Result<(), Error> {
        let path = path.as_ref();
        let dir = match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };

        std::fs::create_dir_all(dir).map_err(|e| Error::file_system(dir, e))?;

        let mut temp = NamedTempFile::new_in(dir).map_err(|e| Error::file_system(dir, e))?;
        let permissions = match std::fs::metadata(path) {
            Ok(existing) => Some(existing.permissions()),
            Err(_) => new_file_permissions(),
        };
        if let Some(permissions) = permissions {
            temp.as_file()
                .set_permissions(permissions)
                .map_err(|e| Error::file_system(temp.path(), e))?;
        }
        {
            let mut writer = BufWriter::new(temp.as_file_mut());
            self.to_writer(&mut writer)?;
            writer.flush().map_err(|e| Error::file_system(path, e))?;
        }

        temp.persist(path)
            .map_err(|e| Error::file_system(path, e.error))?;
        Ok(())
    }
}

// Temp files start out owner-only.
#[cfg(unix)]
fn new_file_permissions() -> Option<Permissions> {
    use std::os::unix::fs::PermissionsExt;
    Some(Permissions::from_mode(0o644))
}

#[cfg(not(unix))]
fn new_file_permissions() -> Option<Permissions> {
    None
}
