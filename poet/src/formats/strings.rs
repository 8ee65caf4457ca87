//! Support for Apple `.strings` string tables.
//!
//! A table is a list of `"key" = "value";` statements, each optionally preceded by a
//! `/* comment */`, separated by blank lines:
//!
//! ```text
//! /* greeting */
//! "Hello" = "Bonjour";
//!
//! "items" = "%d items";
//! ```

use std::fs::File;
use std::io::{BufRead, Read, Write};
use std::path::Path;

use lazy_static::lazy_static;
use regex::{Captures, Regex};

use crate::{
    error::Error,
    options::UntranslatedPolicy,
    traits::{Document, Parser},
    types::{ContextGroup, Translated},
};

lazy_static! {
    static ref ESCAPE_REGEX: Regex = Regex::new(r"\\(.)").unwrap();
}

/// File extension of string tables.
pub const EXTENSION: &str = "strings";

/// Represents an Apple `.strings` file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Format {
    /// All key-value pairs (and optional comments) in file order.
    pub pairs: Vec<Pair>,
}

impl Format {
    /// Builds the table for one context.
    ///
    /// Untranslated terms are dropped or replaced by the term, depending on `policy`.
    /// Plural entries contribute their `other` form, or the term when there is none.
    pub fn from_group(group: &ContextGroup, policy: UntranslatedPolicy) -> Self {
        let pairs = group
            .entries
            .iter()
            .filter_map(|entry| {
                let value = match (&entry.translated, policy) {
                    (Translated::Single(Some(value)), UntranslatedPolicy::FallbackToTerm)
                        if value.is_empty() =>
                    {
                        entry.term.clone()
                    }
                    (Translated::Single(Some(value)), _) => value.clone(),
                    (Translated::Single(None), UntranslatedPolicy::FallbackToTerm) => {
                        entry.term.clone()
                    }
                    (Translated::Single(None), UntranslatedPolicy::Skip) => {
                        tracing::debug!(
                            term = %entry.term,
                            context = %group.name,
                            "skipping untranslated term"
                        );
                        return None;
                    }
                    (translated @ Translated::Plural(_), _) => translated
                        .display_value()
                        .unwrap_or(entry.term.as_str())
                        .to_string(),
                };

                Some(Pair {
                    key: entry.term.clone(),
                    value,
                    comment: entry.comment.clone().filter(|c| !c.is_empty()),
                })
            })
            .collect();

        Format { pairs }
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.pairs
            .iter()
            .find(|p| p.key == key)
            .map(|p| p.value.as_str())
    }
}

impl Document for Format {
    fn to_writer<W: Write>(&self, mut writer: W) -> Result<(), Error> {
        let mut content = String::new();

        for (index, pair) in self.pairs.iter().enumerate() {
            if index > 0 {
                content.push('\n');
            }
            content.push_str(&pair.to_string());
            content.push('\n');
        }

        writer.write_all(content.as_bytes()).map_err(Error::Io)
    }
}

impl Parser for Format {
    fn from_reader<R: BufRead>(mut reader: R) -> Result<Self, Error> {
        let mut content = String::new();
        reader.read_to_string(&mut content)?;
        Ok(Format {
            pairs: parse_pairs(&content)?,
        })
    }

    /// Decodes a BOM first, so UTF-16 tables written by Xcode can be read too.
    fn read_from<P: AsRef<Path>>(path: P) -> Result<Self, Error>
    where
        Self: Sized,
    {
        let path = path.as_ref();
        let file = File::open(path).map_err(|e| Error::file_system(path, e))?;
        let mut decoder = encoding_rs_io::DecodeReaderBytesBuilder::new()
            .bom_override(true)
            .build(file);

        let mut decoded = String::new();
        decoder
            .read_to_string(&mut decoded)
            .map_err(|e| Error::file_system(path, e))?;

        Self::from_str(&decoded)
    }
}

/// A single key-value pair in a `.strings` file, possibly with an associated comment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pair {
    /// The key for this localization entry.
    pub key: String,
    /// The value for this localization entry.
    pub value: String,
    /// Comment body without the `/* */` markers.
    ///
    /// Literal `\n` sequences in it are written as line breaks.
    pub comment: Option<String>,
}

impl std::fmt::Display for Pair {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if let Some(comment) = &self.comment {
            writeln!(f, "/* {} */", comment_body(comment))?;
        }
        write!(f, "\"{}\" = \"{}\";", escape(&self.key), escape(&self.value))
    }
}

/// Escapes backslashes, line breaks and double quotes for use inside a quoted `.strings` literal.
///
/// Backslashes go first so that [`unescape`] gives back exactly the input.
pub fn escape(value: &str) -> String {
    value
        .replace('\\', "\\\\")
        .replace('\n', "\\n")
        .replace('"', "\\\"")
}

/// Comment text for a `/* */` block. `*/` would end the block early, so it is split.
fn comment_body(comment: &str) -> String {
    comment.replace("\\n", "\n").replace("*/", "* /")
}

/// Reverses the escapes a `.strings` reader understands.
pub fn unescape(value: &str) -> String {
    ESCAPE_REGEX
        .replace_all(value, |caps: &Captures| match &caps[1] {
            "n" => "\n".to_string(),
            "r" => "\r".to_string(),
            "t" => "\t".to_string(),
            "\"" => "\"".to_string(),
            "\\" => "\\".to_string(),
            other => format!("\\{}", other),
        })
        .into_owned()
}

fn parse_pairs(content: &str) -> Result<Vec<Pair>, Error> {
    let mut pairs = Vec::new();
    let mut pending_comment: Option<String> = None;
    let mut rest = content.trim_start_matches('\u{feff}');

    loop {
        rest = rest.trim_start();
        if rest.is_empty() {
            break;
        }

        if let Some(after) = rest.strip_prefix("/*") {
            let end = after
                .find("*/")
                .ok_or_else(|| Error::DataMismatch("unterminated comment".to_string()))?;
            pending_comment = Some(after[..end].trim().to_string());
            rest = &after[end + 2..];
        } else if let Some(after) = rest.strip_prefix("//") {
            let end = after.find('\n').unwrap_or(after.len());
            pending_comment = Some(after[..end].trim().to_string());
            rest = &after[end..];
        } else if rest.starts_with('"') {
            let (key, after) = quoted(rest)?;
            let after = after.trim_start();
            let after = after.strip_prefix('=').ok_or_else(|| {
                Error::DataMismatch(format!("expected `=` after key \"{}\"", key))
            })?;
            let (value, after) = quoted(after.trim_start())?;
            let after = after.trim_start();
            rest = after.strip_prefix(';').ok_or_else(|| {
                Error::DataMismatch(format!("expected `;` after value of \"{}\"", key))
            })?;

            pairs.push(Pair {
                key,
                value,
                comment: pending_comment.take(),
            });
        } else {
            // Unknown content, skip the line.
            let end = rest.find('\n').unwrap_or(rest.len());
            rest = &rest[end..];
        }
    }

    Ok(pairs)
}

/// Reads a quoted literal at the start of `input`; returns the unescaped text and the remainder.
fn quoted(input: &str) -> Result<(String, &str), Error> {
    let body = input
        .strip_prefix('"')
        .ok_or_else(|| Error::DataMismatch("expected a quoted string".to_string()))?;

    let mut escaped = false;
    for (offset, c) in body.char_indices() {
        match c {
            '\\' if !escaped => escaped = true,
            '"' if !escaped => return Ok((unescape(&body[..offset]), &body[offset + 1..])),
            _ => escaped = false,
        }
    }

    Err(Error::DataMismatch("unterminated string literal".to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::TranslationEntry;
    use indoc::indoc;

    fn group(entries: Vec<(&str, Translated, Option<&str>)>) -> ContextGroup {
        ContextGroup {
            name: "Main.strings".to_string(),
            entries: entries
                .into_iter()
                .map(|(term, translated, comment)| TranslationEntry {
                    term: term.to_string(),
                    context: "Main.strings".to_string(),
                    comment: comment.map(str::to_string),
                    translated,
                })
                .collect(),
        }
    }

    fn single(value: &str) -> Translated {
        Translated::Single(Some(value.to_string()))
    }

    fn render(format: &Format) -> String {
        String::from_utf8(format.to_bytes().unwrap()).unwrap()
    }

    #[test]
    fn test_single_entry_with_comment() {
        let table = Format::from_group(
            &group(vec![("Hello", single("Bonjour"), Some("greeting"))]),
            UntranslatedPolicy::Skip,
        );
        assert_eq!(render(&table), "/* greeting */\n\"Hello\" = \"Bonjour\";\n");
    }

    #[test]
    fn test_entries_separated_by_one_blank_line() {
        let table = Format::from_group(
            &group(vec![
                ("a", single("A"), None),
                ("b", single("B"), Some("second")),
                ("c", single("C"), Some("")),
            ]),
            UntranslatedPolicy::Skip,
        );
        let expected = indoc! {r#"
            "a" = "A";

            /* second */
            "b" = "B";

            "c" = "C";
        "#};
        assert_eq!(render(&table), expected);
    }

    #[test]
    fn test_comment_line_breaks_expanded() {
        let table = Format::from_group(
            &group(vec![("k", single("v"), Some("first\\nsecond"))]),
            UntranslatedPolicy::Skip,
        );
        assert_eq!(render(&table), "/* first\nsecond */\n\"k\" = \"v\";\n");
    }

    #[test]
    fn test_quotes_and_newlines_escaped() {
        let table = Format::from_group(
            &group(vec![("say \"hi\"\nnow", single("sag \"hallo\"\njetzt"), None)]),
            UntranslatedPolicy::Skip,
        );
        assert_eq!(
            render(&table),
            "\"say \\\"hi\\\"\\nnow\" = \"sag \\\"hallo\\\"\\njetzt\";\n"
        );
    }

    #[test]
    fn test_backslashes_escaped() {
        assert_eq!(escape("C:\\"), "C:\\\\");
        assert_eq!(escape("a\\nb"), "a\\\\nb");
        assert_eq!(escape("say \\\"hi\\\""), "say \\\\\\\"hi\\\\\\\"");
    }

    #[test]
    fn test_backslash_values_read_back() {
        let table = Format::from_group(
            &group(vec![
                ("path", single("C:\\"), None),
                ("quoted", single("say \\\"hi\\\""), None),
                ("literal", single("a\\nb"), None),
            ]),
            UntranslatedPolicy::Skip,
        );
        let reparsed = Format::from_str(&render(&table)).unwrap();
        assert_eq!(reparsed.get("path"), Some("C:\\"));
        assert_eq!(reparsed.get("quoted"), Some("say \\\"hi\\\""));
        assert_eq!(reparsed.get("literal"), Some("a\\nb"));
    }

    #[test]
    fn test_comment_terminator_split() {
        let table = Format::from_group(
            &group(vec![("k", single("v"), Some("see */ here"))]),
            UntranslatedPolicy::Skip,
        );
        assert_eq!(render(&table), "/* see * / here */\n\"k\" = \"v\";\n");
        let reparsed = Format::from_str(&render(&table)).unwrap();
        assert_eq!(reparsed.pairs[0].comment.as_deref(), Some("see * / here"));
    }

    #[test]
    fn test_untranslated_skipped() {
        let table = Format::from_group(
            &group(vec![
                ("missing", Translated::Single(None), Some("note")),
                ("present", single("da"), None),
            ]),
            UntranslatedPolicy::Skip,
        );
        assert_eq!(render(&table), "\"present\" = \"da\";\n");
    }

    #[test]
    fn test_untranslated_fallback_to_term() {
        let table = Format::from_group(
            &group(vec![
                ("missing", Translated::Single(None), None),
                ("empty", single(""), None),
            ]),
            UntranslatedPolicy::FallbackToTerm,
        );
        assert_eq!(table.get("missing"), Some("missing"));
        assert_eq!(table.get("empty"), Some("empty"));

        let skipped = Format::from_group(
            &group(vec![("empty", single(""), None)]),
            UntranslatedPolicy::Skip,
        );
        assert_eq!(skipped.get("empty"), Some(""));
    }

    #[test]
    fn test_plural_uses_other_then_term() {
        let forms = |pairs: &[(&str, &str)]| {
            Translated::Plural(
                pairs
                    .iter()
                    .map(|(k, v)| (k.to_string(), v.to_string()))
                    .collect(),
            )
        };
        let table = Format::from_group(
            &group(vec![
                ("items", forms(&[("one", "1 item"), ("other", "%d items")]), None),
                ("days", forms(&[("one", "1 day")]), None),
            ]),
            UntranslatedPolicy::Skip,
        );
        assert_eq!(table.get("items"), Some("%d items"));
        assert_eq!(table.get("days"), Some("days"));
    }

    #[test]
    fn test_all_skipped_is_empty() {
        let table = Format::from_group(
            &group(vec![("x", Translated::Single(None), None)]),
            UntranslatedPolicy::Skip,
        );
        assert!(table.is_empty());
        assert_eq!(render(&table), "");
    }

    #[test]
    fn test_parse_comments_and_escapes() {
        let content = indoc! {r#"
            /* Greeting
               for the user */
            "hello" = "Hello, \"world\"!\nBye";

            // line comment
            "a=b" = "c;d";
            garbage line
            "plain"="value";
        "#};
        let parsed = Format::from_str(content).unwrap();
        assert_eq!(parsed.pairs.len(), 3);
        assert_eq!(parsed.pairs[0].key, "hello");
        assert_eq!(parsed.pairs[0].value, "Hello, \"world\"!\nBye");
        assert!(parsed.pairs[0].comment.as_deref().unwrap().contains("for the user"));
        assert_eq!(parsed.pairs[1].key, "a=b");
        assert_eq!(parsed.pairs[1].value, "c;d");
        assert_eq!(parsed.pairs[1].comment.as_deref(), Some("line comment"));
        assert_eq!(parsed.pairs[2].comment, None);
        assert_eq!(parsed.get("plain"), Some("value"));
    }

    #[test]
    fn test_parse_errors() {
        assert!(Format::from_str("\"open = \"x\";").is_err());
        assert!(Format::from_str("\"k\" \"v\";").is_err());
        assert!(Format::from_str("\"k\" = \"v\"").is_err());
        assert!(Format::from_str("/* never closed").is_err());
    }

    #[test]
    fn test_unescape_unknown_sequences_kept() {
        assert_eq!(unescape(r"a\U2026\\\t"), "a\\U2026\\\t");
    }

    #[test]
    fn test_written_table_reads_back() {
        let table = Format::from_group(
            &group(vec![
                ("Hello", single("Bonjour"), Some("greeting")),
                ("quote \"me\"", single("line 1\nline 2"), None),
            ]),
            UntranslatedPolicy::Skip,
        );
        let reparsed = Format::from_str(&render(&table)).unwrap();
        assert_eq!(reparsed, table);
    }
}
