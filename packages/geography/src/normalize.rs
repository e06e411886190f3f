//! District name normalization.
//!
//! Boundary files and case reports rarely agree on the exact spelling of
//! a district. The pipeline here is applied symmetrically to both sides
//! before joining, so "Mannar District", " mannar " and "MANNAR" all
//! produce the key "mannar".

use std::sync::LazyLock;

use epi_map_geography_models::NameRules;
use regex::Regex;

use crate::GeoError;

/// Regex matching any run of whitespace.
static WHITESPACE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+").expect("valid regex"));

/// Normalizes a district name into its join key.
///
/// The pipeline, with every step gated by [`NameRules`]:
/// 1. Fold accented Latin letters to their ASCII base form
/// 2. Lowercase
/// 3. Remove configured tokens (e.g. "district") wherever they appear
/// 4. Remove all whitespace
/// 5. Trim
#[must_use]
pub fn normalize(name: &str, rules: &NameRules) -> String {
    let mut value = if rules.fold_diacritics {
        fold_diacritics(name)
    } else {
        name.to_string()
    };

    if rules.lowercase {
        value = value.to_lowercase();
    }

    for token in &rules.strip_tokens {
        if token.is_empty() {
            continue;
        }
        let token = if rules.lowercase {
            token.to_lowercase()
        } else {
            token.clone()
        };
        value = value.replace(&token, "");
    }

    if rules.strip_whitespace {
        value = WHITESPACE_RE.replace_all(&value, "").into_owned();
    }

    if rules.trim {
        value = value.trim().to_string();
    }

    value
}

/// Loads [`NameRules`] from a TOML file.
///
/// Missing keys fall back to the defaults, so a rules file only has to
/// name the rules it changes.
///
/// # Errors
///
/// Returns an error if the file cannot be read or is not valid TOML.
pub fn load_rules(path: &std::path::Path) -> Result<NameRules, GeoError> {
    let raw = std::fs::read_to_string(path)?;
    Ok(toml::from_str(&raw)?)
}

/// Replaces accented Latin letters with their ASCII base form.
///
/// Covers the Latin-1 and Latin Extended-A letters that show up in
/// romanized district names. Anything else passes through unchanged.
fn fold_diacritics(value: &str) -> String {
    value
        .chars()
        .map(|c| match c {
            'á' | 'à' | 'â' | 'ä' | 'ã' | 'å' | 'ā' | 'ă' => 'a',
            'Á' | 'À' | 'Â' | 'Ä' | 'Ã' | 'Å' | 'Ā' | 'Ă' => 'A',
            'é' | 'è' | 'ê' | 'ë' | 'ē' | 'ĕ' | 'ě' => 'e',
            'É' | 'È' | 'Ê' | 'Ë' | 'Ē' | 'Ĕ' | 'Ě' => 'E',
            'í' | 'ì' | 'î' | 'ï' | 'ī' => 'i',
            'Í' | 'Ì' | 'Î' | 'Ï' | 'Ī' => 'I',
            'ó' | 'ò' | 'ô' | 'ö' | 'õ' | 'ō' => 'o',
            'Ó' | 'Ò' | 'Ô' | 'Ö' | 'Õ' | 'Ō' => 'O',
            'ú' | 'ù' | 'û' | 'ü' | 'ū' => 'u',
            'Ú' | 'Ù' | 'Û' | 'Ü' | 'Ū' => 'U',
            'ý' | 'ÿ' => 'y',
            'Ý' => 'Y',
            'ñ' | 'ń' => 'n',
            'Ñ' | 'Ń' => 'N',
            'ç' | 'ć' | 'č' => 'c',
            'Ç' | 'Ć' | 'Č' => 'C',
            'š' | 'ś' => 's',
            'Š' | 'Ś' => 'S',
            'ž' | 'ź' | 'ż' => 'z',
            'Ž' | 'Ź' | 'Ż' => 'Z',
            other => other,
        })
        .collect()
}
