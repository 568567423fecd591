//! Phone number normalisation.

/// Strips separators so `010-1234-5678` and `010 1234 5678` key the same entry.
pub fn normalize(phone: &str) -> String {
    phone
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == '+')
        .collect()
}

/// Converts a Korean local number (`010…`) to E.164 (`+8210…`).
/// Numbers already carrying a country code are left as they are.
pub fn to_e164(phone: &str) -> String {
    let phone = normalize(phone);
    if phone.starts_with('+') {
        phone
    } else if let Some(local) = phone.strip_prefix('0') {
        format!("+82{local}")
    } else if phone.starts_with("82") {
        format!("+{phone}")
    } else {
        phone
    }
}
