//! Presentation-format helpers for zone names. Every name handled by the
//! validator is lowercased and fully qualified; the root is `"."`.

pub fn to_fqdn(name: &str) -> String {
    let trimmed = name.trim().trim_end_matches('.');
    if trimmed.is_empty() {
        return ".".to_string();
    }
    format!("{}.", trimmed.to_ascii_lowercase())
}

pub fn label_count(zone: &str) -> usize {
    if zone == "." {
        0
    } else {
        zone.trim_end_matches('.').split('.').count()
    }
}

/// True when `name` equals `zone` or lies below it. Both must be fqdn.
pub fn is_subdomain(name: &str, zone: &str) -> bool {
    zone == "." || name == zone || name.ends_with(&format!(".{}", zone))
}

/// Candidate zone cuts strictly below `ancestor`, down to and including
/// `target`, ordered top-down.
pub fn zones_between(ancestor: &str, target: &str) -> Vec<String> {
    if !is_subdomain(target, ancestor) {
        return Vec::new();
    }

    let labels: Vec<&str> = if target == "." {
        Vec::new()
    } else {
        target.trim_end_matches('.').split('.').collect()
    };
    let skip = label_count(ancestor);

    (skip + 1..=labels.len())
        .map(|depth| format!("{}.", labels[labels.len() - depth..].join(".")))
        .collect()
}
