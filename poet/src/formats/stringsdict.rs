//! Support for Apple `.stringsdict` plural dictionaries.
//!
//! Every plural term becomes an entry of the shape Foundation expects:
//!
//! ```text
//! <key>items</key>
//! <dict>
//!     <key>NSStringLocalizedFormatKey</key>
//!     <string>%#@items@</string>
//!     <key>items</key>
//!     <dict>
//!         <key>NSStringFormatSpecTypeKey</key>
//!         <string>NSStringPluralRuleType</string>
//!         <key>NSStringFormatValueTypeKey</key>
//!         <string>d</string>
//!         <key>one</key>
//!         <string>1 item</string>
//!         <key>other</key>
//!         <string>%d items</string>
//!     </dict>
//! </dict>
//! ```

use std::{collections::BTreeMap, io::Write};

use quick_xml::{
    Writer,
    escape::partial_escape,
    events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event},
};

use crate::{error::Error, traits::Document, types::ContextGroup};

/// File extension of plural dictionaries.
pub const EXTENSION: &str = "stringsdict";

pub const FORMAT_KEY: &str = "NSStringLocalizedFormatKey";
pub const SPEC_TYPE_KEY: &str = "NSStringFormatSpecTypeKey";
pub const VALUE_TYPE_KEY: &str = "NSStringFormatValueTypeKey";
pub const PLURAL_RULE_TYPE: &str = "NSStringPluralRuleType";

/// Name of the variable carrying the plural rule inside the format key.
pub const VARIABLE: &str = "items";
const VALUE_TYPE: &str = "d";

const PLIST_DOCTYPE: &str = r#"plist PUBLIC "-//Apple//DTD PLIST 1.0//EN" "http://www.apple.com/DTDs/PropertyList-1.0.dtd""#;

/// A `.stringsdict` document.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Format {
    /// Plural items keyed and ordered by term.
    pub items: BTreeMap<String, PluralItem>,
}

/// The plural forms of one term, in category order, without empty forms.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PluralItem {
    pub forms: Vec<(String, String)>,
}

impl Format {
    /// Collects the plural entries of a context.
    ///
    /// Empty forms are dropped and terms left without any form are omitted, so the
    /// result may be empty even when the group has plural entries. A term that occurs
    /// more than once keeps its last definition.
    pub fn from_group(group: &ContextGroup) -> Self {
        let mut items = BTreeMap::new();

        for entry in group.plural_entries() {
            let forms: Vec<(String, String)> = entry
                .translated
                .sorted_forms()
                .into_iter()
                .map(|(category, value)| (category.to_string(), value.to_string()))
                .collect();

            if forms.is_empty() {
                tracing::debug!(
                    term = %entry.term,
                    context = %group.name,
                    "omitting plural term without forms"
                );
                items.remove(&entry.term);
                continue;
            }

            items.insert(entry.term.clone(), PluralItem { forms });
        }

        Format { items }
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

impl Document for Format {
    fn to_writer<W: Write>(&self, mut writer: W) -> Result<(), Error> {
        let mut xml = Writer::new_with_indent(&mut writer, b'\t', 1);

        xml.write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))?;
        xml.write_event(Event::DocType(BytesText::from_escaped(PLIST_DOCTYPE)))?;

        let mut plist = BytesStart::new("plist");
        plist.push_attribute(("version", "1.0"));
        xml.write_event(Event::Start(plist))?;
        start_dict(&mut xml)?;

        for (term, item) in &self.items {
            write_key(&mut xml, term)?;
            start_dict(&mut xml)?;
            write_pair(&mut xml, FORMAT_KEY, &format!("%#@{}@", VARIABLE))?;

            write_key(&mut xml, VARIABLE)?;
            start_dict(&mut xml)?;
            write_pair(&mut xml, SPEC_TYPE_KEY, PLURAL_RULE_TYPE)?;
            write_pair(&mut xml, VALUE_TYPE_KEY, VALUE_TYPE)?;
            for (category, value) in &item.forms {
                write_pair(&mut xml, category, value)?;
            }
            end_dict(&mut xml)?;

            end_dict(&mut xml)?;
        }

        end_dict(&mut xml)?;
        xml.write_event(Event::End(BytesEnd::new("plist")))?;
        xml.write_event(Event::Text(BytesText::new("\n")))?;
        Ok(())
    }
}

fn start_dict<W: Write>(xml: &mut Writer<W>) -> Result<(), Error> {
    xml.write_event(Event::Start(BytesStart::new("dict")))?;
    Ok(())
}

fn end_dict<W: Write>(xml: &mut Writer<W>) -> Result<(), Error> {
    xml.write_event(Event::End(BytesEnd::new("dict")))?;
    Ok(())
}

fn write_key<W: Write>(xml: &mut Writer<W>, key: &str) -> Result<(), Error> {
    write_text_element(xml, "key", key)
}

fn write_pair<W: Write>(xml: &mut Writer<W>, key: &str, value: &str) -> Result<(), Error> {
    write_key(xml, key)?;
    write_text_element(xml, "string", value)
}

fn write_text_element<W: Write>(xml: &mut Writer<W>, name: &str, text: &str) -> Result<(), Error> {
    xml.write_event(Event::Start(BytesStart::new(name)))?;
    xml.write_event(Event::Text(BytesText::from_escaped(partial_escape(text))))?;
    xml.write_event(Event::End(BytesEnd::new(name)))?;
    Ok(())
}
