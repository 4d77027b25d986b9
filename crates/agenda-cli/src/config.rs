//! Settings loading: defaults, then an optional TOML or JSON file, then
//! `AGENDA_*` environment variables.
//!
//! Keys use the same camelCase names as the JSON settings object, so
//! `eventRangeDays = 14` in the file and `AGENDA_EVENT_RANGE_DAYS=14` in the
//! environment set the same field.

use std::path::Path;

use agenda_engine::Settings;
use figment::providers::{Env, Format, Json, Serialized, Toml};
use figment::Figment;

/// Prefix for environment overrides.
pub const ENV_PREFIX: &str = "AGENDA_";

/// Loads settings, optionally from a specific file.
#[allow(clippy::result_large_err)]
pub fn load_settings(path: Option<&Path>) -> Result<Settings, figment::Error> {
    let mut figment = Figment::from(Serialized::defaults(Settings::default()));

    if let Some(path) = path {
        let is_json = path
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
        figment = if is_json {
            figment.merge(Json::file(path))
        } else {
            figment.merge(Toml::file(path))
        };
    }

    figment = figment.merge(
        Env::prefixed(ENV_PREFIX)
            .lowercase(false)
            .map(|key| camel_case(key.as_str()).into()),
    );

    figment.extract()
}

/// `EVENT_RANGE_DAYS` -> `eventRangeDays`.
fn camel_case(key: &str) -> String {
    let mut out = String::with_capacity(key.len());
    for (i, word) in key.split('_').filter(|w| !w.is_empty()).enumerate() {
        let word = word.to_ascii_lowercase();
        if i == 0 {
            out.push_str(&word);
        } else {
            let mut chars = word.chars();
            if let Some(first) = chars.next() {
                out.push(first.to_ascii_uppercase());
                out.push_str(chars.as_str());
            }
        }
    }
    out
}
