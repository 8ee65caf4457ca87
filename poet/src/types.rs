//! Core types for poet.
//! The decoder produces these; the serializers consume them.

use std::{collections::HashMap, fmt::Display};

use serde::{Deserialize, Serialize};

/// The plural category used when a plural set has to be shown as one string.
pub const DEFAULT_PLURAL_CATEGORY: &str = "other";

/// One exportable translation, as returned by the translation service.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct TranslationEntry {
    /// The source string, also used as the key in the output files.
    pub term: String,

    /// Grouping label; decides which output file the entry lands in.
    /// May be empty.
    pub context: String,

    /// Optional note for translators.
    ///
    /// The service stores line breaks as the two characters `\n`; they are only
    /// turned into real newlines when the comment is written out.
    #[serde(skip_serializing_if = "Option::is_none")]
    #[serde(default)]
    pub comment: Option<String>,

    /// The translated value.
    pub translated: Translated,
}

impl TranslationEntry {
    pub fn is_plural(&self) -> bool {
        matches!(self.translated, Translated::Plural(_))
    }
}

impl Display for TranslationEntry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "TranslationEntry {{ term: {}, context: {}, translated: {} }}",
            self.term, self.context, self.translated
        )
    }
}

/// A translated term, either with a single definition or with plural forms.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Translated {
    /// A single definition. `None` means the term has not been translated yet.
    Single(Option<String>),

    /// Plural forms keyed by plural category ("one", "few", "other", ...).
    ///
    /// Categories are whatever the service returned. Iteration order is not
    /// meaningful; writers sort the keys themselves.
    Plural(HashMap<String, String>),
}

impl Translated {
    /// The value a one-line table should show, if there is one.
    ///
    /// Plural sets reduce to their `other` form.
    pub fn display_value(&self) -> Option<&str> {
        match self {
            Translated::Single(value) => value.as_deref(),
            Translated::Plural(forms) => forms.get(DEFAULT_PLURAL_CATEGORY).map(String::as_str),
        }
    }

    /// Non-empty plural forms in lexicographic category order.
    ///
    /// Returns an empty list for single definitions.
    pub fn sorted_forms(&self) -> Vec<(&str, &str)> {
        match self {
            Translated::Single(_) => Vec::new(),
            Translated::Plural(forms) => {
                let mut forms: Vec<(&str, &str)> = forms
                    .iter()
                    .filter(|(_, value)| !value.is_empty())
                    .map(|(category, value)| (category.as_str(), value.as_str()))
                    .collect();
                forms.sort_unstable_by(|a, b| a.0.cmp(b.0));
                forms
            }
        }
    }
}

impl Display for Translated {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Translated::Single(Some(value)) => write!(f, "{}", value),
            Translated::Single(None) => write!(f, "<untranslated>"),
            Translated::Plural(forms) => write!(f, "<{} plural forms>", forms.len()),
        }
    }
}

/// All entries that share one context, in the order they were decoded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContextGroup {
    pub name: String,
    pub entries: Vec<TranslationEntry>,
}

impl ContextGroup {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            entries: Vec::new(),
        }
    }

    pub(crate) fn push(&mut self, entry: TranslationEntry) {
        self.entries.push(entry);
    }

    pub fn plural_entries(&self) -> impl Iterator<Item = &TranslationEntry> {
        self.entries.iter().filter(|e| e.is_plural())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
