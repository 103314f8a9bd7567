//! Index-name resolver
//!
//! Maps a date-pattern template to a concrete index name for the given
//! instant. Placeholders are fixed literal tokens, not a format
//! mini-language; anything that is not a recognized token passes through
//! untouched.
//!
//! | Token    | Meaning                    | Example |
//! |----------|----------------------------|---------|
//! | `{YYYY}` | 4-digit year               | `2024`  |
//! | `{YY}`   | 2-digit year               | `24`    |
//! | `{MM}`   | zero-padded month          | `03`    |
//! | `{M}`    | month                      | `3`     |
//! | `{DD}`   | zero-padded day            | `07`    |
//! | `{D}`    | day                        | `7`     |
//! | `{hh}`   | zero-padded 24-hour        | `09`    |
//! | `{h}`    | 12-hour clock, no padding  | `9`     |
//! | `{mm}`   | zero-padded minute         | `05`    |
//! | `{m}`    | minute                     | `5`     |
//! | `{ss}`   | zero-padded second         | `02`    |
//! | `{s}`    | second                     | `2`     |

use chrono::{DateTime, Datelike, Timelike, Utc};

/// Resolve a pattern against an explicit instant
///
/// Longer tokens are substituted first, so `{YYYY}` can never be eaten
/// by `{YY}`. The substitution map is static; the clock value is the
/// only variable, which keeps per-flush resolution cheap.
pub fn resolve(pattern: &str, at: DateTime<Utc>) -> String {
    let (_, hour12) = at.hour12();

    let substitutions: [(&str, String); 12] = [
        ("{YYYY}", format!("{:04}", at.year())),
        ("{YY}", format!("{:02}", at.year().rem_euclid(100))),
        ("{MM}", format!("{:02}", at.month())),
        ("{DD}", format!("{:02}", at.day())),
        ("{hh}", format!("{:02}", at.hour())),
        ("{mm}", format!("{:02}", at.minute())),
        ("{ss}", format!("{:02}", at.second())),
        ("{M}", at.month().to_string()),
        ("{D}", at.day().to_string()),
        ("{h}", hour12.to_string()),
        ("{m}", at.minute().to_string()),
        ("{s}", at.second().to_string()),
    ];

    let mut name = pattern.to_string();
    for (token, value) in &substitutions {
        if name.contains(token) {
            name = name.replace(token, value);
        }
    }
    name
}

/// Resolve a pattern against the current UTC time
pub fn resolve_now(pattern: &str) -> String {
    resolve(pattern, Utc::now())
}
