//! Preset EU relay countries for `eu-list` / `eu-connect`

use rand::Rng;
use rand::seq::SliceRandom;
use thiserror::Error;

/// Mullvad location codes with exit relays inside the EU
pub const PRESETS: &[(&str, &str)] = &[
    ("at", "Austria"),
    ("be", "Belgium"),
    ("bg", "Bulgaria"),
    ("hr", "Croatia"),
    ("cz", "Czech Republic"),
    ("dk", "Denmark"),
    ("ee", "Estonia"),
    ("fi", "Finland"),
    ("fr", "France"),
    ("de", "Germany"),
    ("gr", "Greece"),
    ("hu", "Hungary"),
    ("ie", "Ireland"),
    ("it", "Italy"),
    ("nl", "Netherlands"),
    ("pl", "Poland"),
    ("pt", "Portugal"),
    ("ro", "Romania"),
    ("sk", "Slovakia"),
    ("si", "Slovenia"),
    ("es", "Spain"),
    ("se", "Sweden"),
];

#[derive(Error, Debug, PartialEq, Eq)]
pub enum CountryError {
    #[error("Invalid country code '{code}'. Valid codes: {}", valid_codes().join(" "))]
    Invalid { code: String },
}

pub fn valid_codes() -> Vec<&'static str> {
    PRESETS.iter().map(|(code, _)| *code).collect()
}

/// Exact, case-sensitive membership check
pub fn is_preset(code: &str) -> bool {
    PRESETS.iter().any(|(c, _)| *c == code)
}

pub fn validate(code: &str) -> Result<&'static str, CountryError> {
    PRESETS
        .iter()
        .map(|(c, _)| *c)
        .find(|c| *c == code)
        .ok_or_else(|| CountryError::Invalid {
            code: code.to_string(),
        })
}

pub fn name_of(code: &str) -> Option<&'static str> {
    PRESETS.iter().find(|(c, _)| *c == code).map(|(_, name)| *name)
}

/// Uniform pick from [`PRESETS`]
pub fn pick_random<R: Rng + ?Sized>(rng: &mut R) -> &'static str {
    PRESETS
        .choose(rng)
        .map(|(code, _)| *code)
        .unwrap_or(PRESETS[0].0)
}

/// Text shown by `eu-list`
pub fn render_table() -> String {
    let mut out = String::from("EU relay countries:\n\n");
    out.push_str("  Code  Country\n");
    out.push_str("  ----  -------\n");
    for (code, name) in PRESETS {
        out.push_str(&format!("  {:<4}  {}\n", code, name));
    }
    out.push_str("\nUsage: mullvad-helper eu-connect [code]  (random country if omitted)\n");
    out
}
