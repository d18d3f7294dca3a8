use anyhow::{Result, anyhow};
use isolang::Language;

/// Language utilities for resolving the target-language argument.
///
/// The prompt sent to the model states the target language by its English
/// name, so a user-supplied argument in any common shape (ISO 639-1 or 639-3
/// code, English name, autonym) is resolved to that name here.
/// Map ISO 639-2/B codes to their 639-2/T equivalent, which isolang parses.
/// Subtitle tooling frequently labels tracks with the B codes.
fn part2b_to_part2t(code: &str) -> Option<&'static str> {
    match code {
        "fre" => Some("fra"), // French
        "ger" => Some("deu"), // German
        "dut" => Some("nld"), // Dutch
        "gre" => Some("ell"), // Greek
        "chi" => Some("zho"), // Chinese
        "cze" => Some("ces"), // Czech
        "ice" => Some("isl"), // Icelandic
        "alb" => Some("sqi"), // Albanian
        "arm" => Some("hye"), // Armenian
        "baq" => Some("eus"), // Basque
        "bur" => Some("mya"), // Burmese
        "per" => Some("fas"), // Persian
        "geo" => Some("kat"), // Georgian
        "may" => Some("msa"), // Malay
        "mac" => Some("mkd"), // Macedonian
        "rum" => Some("ron"), // Romanian
        "slo" => Some("slk"), // Slovak
        "wel" => Some("cym"), // Welsh
        _ => None,
    }
}

/// Resolve a user-supplied language argument to the English language name.
///
/// Accepts ISO 639-1 codes ("vi"), ISO 639-3 codes ("vie", including common
/// 639-2/B aliases like "fre"), English names ("Vietnamese") and autonyms
/// ("Tiếng Việt"). Returns an error for anything unrecognized; callers decide
/// whether to pass the raw value through anyway.
pub fn resolve_language_name(input: &str) -> Result<String> {
    let trimmed = input.trim();
    let lowercase = trimmed.to_lowercase();

    let by_code = match lowercase.len() {
        2 => Language::from_639_1(&lowercase),
        3 => Language::from_639_3(&lowercase)
            .or_else(|| part2b_to_part2t(&lowercase).and_then(Language::from_639_3)),
        _ => None,
    };
    if let Some(language) = by_code {
        return Ok(language.to_name().to_string());
    }

    if let Some(language) = Language::from_name(trimmed).or_else(|| Language::from_autonym(trimmed))
    {
        return Ok(language.to_name().to_string());
    }

    Err(anyhow!("Unrecognized language: {}", input))
}
