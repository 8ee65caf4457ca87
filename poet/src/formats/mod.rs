//! Output formats written by an export.

pub mod strings;
pub mod stringsdict;

// Reexporting the formats for easier access
pub use strings::Format as StringsFormat;
pub use stringsdict::Format as StringsDictFormat;

/// The kinds of file an export writes for a context.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FormatType {
    Strings,
    StringsDict,
}

impl FormatType {
    pub fn extension(&self) -> &'static str {
        match self {
            FormatType::Strings => strings::EXTENSION,
            FormatType::StringsDict => stringsdict::EXTENSION,
        }
    }

    /// File name for a context's base name, e.g. `Main` → `Main.strings`.
    pub fn file_name(&self, base_name: &str) -> String {
        format!("{}.{}", base_name, self.extension())
    }
}

impl std::fmt::Display for FormatType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FormatType::Strings => write!(f, "strings"),
            FormatType::StringsDict => write!(f, "stringsdict"),
        }
    }
}
