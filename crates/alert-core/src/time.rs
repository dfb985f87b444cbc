//! Canonical timestamps.

use chrono::{NaiveDateTime, Utc};
use chrono_tz::Tz;

/// Zone upstream `alertDate` values are written in.
pub const UPSTREAM_TZ: Tz = chrono_tz::Asia::Jerusalem;

/// Canonical timestamp layout. Lexical order matches chronological order.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

const UPSTREAM_FORMATS: &[&str] = &["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M:%S%.f"];

/// Convert an upstream time string into the canonical ISO form.
///
/// Upstream history rows use `YYYY-MM-DD HH:MM:SS` in Israel time; those become
/// `YYYY-MM-DDTHH:MM:SS`. Strings that do not parse keep their content with the
/// first space replaced by `T`.
pub fn normalize_timestamp(raw: &str) -> String {
    let raw = raw.trim();
    for format in UPSTREAM_FORMATS {
        if let Ok(parsed) = NaiveDateTime::parse_from_str(raw, format) {
            return parsed.format(TIMESTAMP_FORMAT).to_string();
        }
    }
    raw.replacen(' ', "T", 1)
}

/// The current time in [`UPSTREAM_TZ`], in canonical form.
///
/// Live alerts carry no time of their own; stamping them in the upstream zone
/// keeps them ordered with history rows regardless of the host's zone.
pub fn now_timestamp() -> String {
    Utc::now()
        .with_timezone(&UPSTREAM_TZ)
        .naive_local()
        .format(TIMESTAMP_FORMAT)
        .to_string()
}
