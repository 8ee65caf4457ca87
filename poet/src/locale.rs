//! Mapping of service language codes to Xcode `.lproj` names.

use unic_langid::LanguageIdentifier;

/// Codes whose Xcode name is not just the canonical form of the code.
const XCODE_OVERRIDES: &[(&str, &str)] = &[
    ("zh-cn", "zh-Hans"),
    ("zh-tw", "zh-Hant"),
    ("en-us", "en"),
    ("pt-br", "pt-BR"),
];

/// Returns the locale name Xcode uses for a service language code.
///
/// Codes that do not parse as a language identifier are returned unchanged.
pub fn xcode_locale(code: &str) -> String {
    let lowered = code.trim().to_ascii_lowercase().replace('_', "-");
    if let Some((_, xcode)) = XCODE_OVERRIDES.iter().find(|(from, _)| *from == lowered) {
        return xcode.to_string();
    }

    match code.trim().parse::<LanguageIdentifier>() {
        Ok(id) => id.to_string(),
        Err(_) => code.to_string(),
    }
}

/// Name of the per-language output directory, e.g. `de.lproj`.
pub fn lproj_dir_name(code: &str) -> String {
    format!("{}.lproj", xcode_locale(code))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_overrides() {
        assert_eq!(xcode_locale("zh-CN"), "zh-Hans");
        assert_eq!(xcode_locale("zh-TW"), "zh-Hant");
        assert_eq!(xcode_locale("en-us"), "en");
        assert_eq!(xcode_locale("pt-br"), "pt-BR");
        assert_eq!(xcode_locale("pt_BR"), "pt-BR");
    }

    #[test]
    fn test_canonicalized() {
        assert_eq!(xcode_locale("de"), "de");
        assert_eq!(xcode_locale("de-de"), "de-DE");
        assert_eq!(xcode_locale("sr-latn"), "sr-Latn");
    }

    #[test]
    fn test_unparseable_passthrough() {
        assert_eq!(xcode_locale("not a code"), "not a code");
    }

    #[test]
    fn test_lproj_dir_name() {
        assert_eq!(lproj_dir_name("fr"), "fr.lproj");
        assert_eq!(lproj_dir_name("zh-CN"), "zh-Hans.lproj");
    }
}
