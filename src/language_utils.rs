use isolang::Language;

/// Language utilities for language-pair keys
///
/// Translation memories tag segments with codes such as `en`, `en-US`,
/// `fr_FR` or `fre`. Memory lookups compare languages by their canonical
/// base code: region and script suffixes are dropped and ISO 639-2 codes are
/// folded onto their ISO 639-1 equivalent when one exists.

/// Map an ISO 639-2/B code onto its ISO 639-2/T form
fn bibliographic_to_terminology(code: &str) -> Option<&'static str> {
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

/// Strip region/script variants: `en-US` and `en_us` both become `en`
pub fn base_language_code(code: &str) -> String {
    code.trim()
        .to_lowercase()
        .split(['-', '_'])
        .next()
        .unwrap_or_default()
        .to_string()
}

/// Canonical code used as a language-pair key component
///
/// Known ISO codes are folded onto ISO 639-1 when possible (`fra`, `fre` -> `fr`).
/// Unknown codes are kept as their lowercase base so that corpora using private
/// tags still index consistently.
pub fn canonical_language_code(code: &str) -> String {
    let base = base_language_code(code);

    let language = match base.len() {
        2 => Language::from_639_1(&base),
        3 => {
            let part2t = bibliographic_to_terminology(&base).unwrap_or(&base);
            Language::from_639_3(part2t)
        }
        _ => None,
    };

    match language {
        Some(lang) => lang
            .to_639_1()
            .map(|c| c.to_string())
            .unwrap_or_else(|| lang.to_639_3().to_string()),
        None => base,
    }
}

/// Check if two language codes represent the same base language
pub fn language_codes_match(code1: &str, code2: &str) -> bool {
    let c1 = canonical_language_code(code1);
    !c1.is_empty() && c1 == canonical_language_code(code2)
}
