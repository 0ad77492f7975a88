//! Language code handling for document languages.
//!
//! Documents carry an ISO 639-1 code when one exists ("en"); ISO 639-2/T and
//! 639-2/B codes ("eng", "ger") are accepted on input and normalized.

use anyhow::{Result, anyhow};
use isolang::Language;

/// ISO 639-2/B codes that differ from their 639-2/T form
const BIBLIOGRAPHIC_CODES: [(&str, &str); 18] = [
    ("fre", "fra"),
    ("ger", "deu"),
    ("dut", "nld"),
    ("gre", "ell"),
    ("chi", "zho"),
    ("cze", "ces"),
    ("ice", "isl"),
    ("alb", "sqi"),
    ("arm", "hye"),
    ("baq", "eus"),
    ("bur", "mya"),
    ("per", "fas"),
    ("geo", "kat"),
    ("may", "msa"),
    ("mac", "mkd"),
    ("rum", "ron"),
    ("slo", "slk"),
    ("wel", "cym"),
];

/// Which ISO 639 part a code was given in
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LanguageCodeType {
    /// ISO 639-1 (2-letter) code
    Part1,
    /// ISO 639-2/T (3-letter) code
    Part2T,
    /// ISO 639-2/B (3-letter) code
    Part2B,
}

/// Resolve a code to its language and the part it was given in
fn resolve(code: &str) -> Option<(Language, LanguageCodeType)> {
    let code = code.trim().to_lowercase();

    match code.len() {
        2 => Language::from_639_1(&code).map(|lang| (lang, LanguageCodeType::Part1)),
        3 => Language::from_639_3(&code)
            .map(|lang| (lang, LanguageCodeType::Part2T))
            .or_else(|| {
                BIBLIOGRAPHIC_CODES
                    .iter()
                    .find(|(b, _)| *b == code)
                    .and_then(|(_, t)| Language::from_639_3(t))
                    .map(|lang| (lang, LanguageCodeType::Part2B))
            }),
        _ => None,
    }
}

/// Validate if a language code is a valid ISO 639-1 or ISO 639-2 code
pub fn validate_language_code(code: &str) -> Result<LanguageCodeType> {
    resolve(code)
        .map(|(_, kind)| kind)
        .ok_or_else(|| anyhow!("Invalid language code: {}", code))
}

/// Normalize to ISO 639-1 when the language has one, else to 639-2/T
pub fn normalize_language_code(code: &str) -> Result<String> {
    let (lang, _) = resolve(code).ok_or_else(|| anyhow!("Cannot normalize invalid language code: {}", code))?;

    Ok(lang
        .to_639_1()
        .map(str::to_string)
        .unwrap_or_else(|| lang.to_639_3().to_string()))
}

/// Check if two language codes represent the same language
pub fn language_codes_match(code1: &str, code2: &str) -> bool {
    match (resolve(code1), resolve(code2)) {
        (Some((a, _)), Some((b, _))) => a == b,
        _ => false,
    }
}

/// English name of a language code
pub fn get_language_name(code: &str) -> Result<String> {
    resolve(code)
        .map(|(lang, _)| lang.to_name().to_string())
        .ok_or_else(|| anyhow!("Failed to get language from code: {}", code))
}
