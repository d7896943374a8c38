use anyhow::{Result, anyhow};
use isolang::Language;

/// Language utilities for target language handling
///
/// The translation prompt names the target language in English ("Spanish",
/// "German"), while users often type an ISO code. These helpers accept either
/// form and normalize it to the English name.

/// Map an ISO 639-2/B code to its ISO 639-2/T equivalent
fn part2b_to_part2t(code: &str) -> Option<&'static str> {
    match code {
        "fre" => Some("fra"),
        "ger" => Some("deu"),
        "dut" => Some("nld"),
        "gre" => Some("ell"),
        "chi" => Some("zho"),
        "cze" => Some("ces"),
        "ice" => Some("isl"),
        "alb" => Some("sqi"),
        "arm" => Some("hye"),
        "baq" => Some("eus"),
        "bur" => Some("mya"),
        "per" => Some("fas"),
        "geo" => Some("kat"),
        "may" => Some("msa"),
        "mac" => Some("mkd"),
        "rum" => Some("ron"),
        "slo" => Some("slk"),
        "wel" => Some("cym"),
        _ => None,
    }
}

/// Look up a language from an ISO 639-1 or ISO 639-2 code
pub fn language_from_code(code: &str) -> Option<Language> {
    let normalized_code = code.trim().to_lowercase();

    match normalized_code.len() {
        2 => Language::from_639_1(&normalized_code),
        3 => {
            let part2t = part2b_to_part2t(&normalized_code).unwrap_or(&normalized_code);
            Language::from_639_3(part2t)
        }
        _ => None,
    }
}

/// Look up a language from its English name, ignoring case
pub fn language_from_name(name: &str) -> Option<Language> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return None;
    }

    if let Some(lang) = Language::from_name(trimmed) {
        return Some(lang);
    }

    // "spanish" -> "Spanish"
    let mut chars = trimmed.chars();
    let capitalized = match chars.next() {
        Some(first) => first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect::<String>(),
        None => return None,
    };
    Language::from_name(&capitalized)
}

/// Resolve user input (ISO code or English name) to the English language name
/// used in translation instructions and presentation titles.
pub fn resolve_language_name(input: &str) -> Result<String> {
    let lang = language_from_code(input)
        .or_else(|| language_from_name(input))
        .ok_or_else(|| anyhow!("Unknown target language: {}", input))?;

    Ok(lang.to_name().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_language_name_with_part1_code_should_return_english_name() {
        assert_eq!(resolve_language_name("es").unwrap(), "Spanish");
        assert_eq!(resolve_language_name(" FR ").unwrap(), "French");
    }

    #[test]
    fn test_resolve_language_name_with_part2b_code_should_map_to_part2t() {
        assert_eq!(resolve_language_name("ger").unwrap(), "German");
        assert_eq!(resolve_language_name("deu").unwrap(), "German");
    }

    #[test]
    fn test_resolve_language_name_with_name_should_ignore_case() {
        assert_eq!(resolve_language_name("Spanish").unwrap(), "Spanish");
        assert_eq!(resolve_language_name("japanese").unwrap(), "Japanese");
    }

    #[test]
    fn test_resolve_language_name_with_garbage_should_fail() {
        assert!(resolve_language_name("").is_err());
        assert!(resolve_language_name("klingonese").is_err());
    }
}
