#![forbid(unsafe_code)]
//! Turns POEditor translation exports into Apple localization files.
//!
//! The service exports a flat JSON array of terms. poet groups them by context and writes one
//! `.strings` table per context, plus a `.stringsdict` plural dictionary when the context has
//! plural terms.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use poet::{DirectorySource, ExportOptions, Exporter};
//!
//! // Export downloaded `de.json` and `fr.json` into `Localizations/de.lproj` etc.
//! let exporter = Exporter::new(ExportOptions::default());
//! let summary = exporter.export_languages(
//!     &DirectorySource::new("downloads"),
//!     &["de".to_string(), "fr".to_string()],
//!     "Localizations".as_ref(),
//! );
//! assert!(summary.is_success());
//! ```
//!
//! # Output
//!
//! - **`<Context>.strings`**: `"term" = "translation";` statements, with the translator comment
//!   above each one
//! - **`<Context>.stringsdict`**: property list with the plural forms of every plural term

pub mod decode;
pub mod error;
pub mod export;
pub mod formats;
pub mod group;
pub mod locale;
pub mod options;
pub mod source;
pub mod traits;
pub mod types;

// Re-export most used types for easy consumption
pub use crate::{
    decode::{decode_record, decode_records},
    error::Error,
    export::{ExportSummary, Exporter, LanguageReport},
    formats::FormatType,
    group::group_by_context,
    locale::xcode_locale,
    options::{ExportOptions, ExtensionPolicy, UntranslatedPolicy},
    source::{DirectorySource, ExportType, TranslationSource},
    types::{ContextGroup, Translated, TranslationEntry},
};
