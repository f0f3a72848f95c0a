//! Duration formatting for log lines and error messages.

const UNITS: [(u64, &str); 4] = [(86_400, "d"), (3_600, "h"), (60, "m"), (1, "s")];

/// Render `secs` as its non-zero day, hour, minute and second components,
/// e.g. `1d 2h 30s`. Zero renders as `0s`.
pub fn format_duration(secs: u64) -> String {
    if secs == 0 {
        return "0s".to_string();
    }
    let mut rest = secs;
    let mut parts = Vec::new();
    for (unit, suffix) in UNITS {
        let count = rest / unit;
        rest %= unit;
        if count > 0 {
            parts.push(format!("{count}{suffix}"));
        }
    }
    parts.join(" ")
}
