//! Masking helpers for values that end up in log output

/// Mask an email address for display (e.g., j***@example.com)
///
/// The domain is kept so operators can still spot provider-specific
/// delivery problems.
pub fn mask_email(email: &str) -> String {
    match email.split_once('@') {
        Some((local, domain)) => {
            let first = local.chars().next().map(String::from).unwrap_or_default();
            format!("{}***@{}", first, domain)
        }
        None => String::from("***"),
    }
}

/// Mask a secret down to its first four characters
pub fn mask_secret(secret: &str) -> String {
    let prefix: String = secret.chars().take(4).collect();
    format!("{}...", prefix)
}
