//! Credential masking for logged URLs.

const MASK: &str = "***";
const SENSITIVE_PARAMS: [&str; 3] = ["token", "password", "api_key"];

/// Replace the values of credential-bearing query parameters with `***`.
///
/// A parameter is sensitive when its name ends with one of the sensitive
/// words, case-insensitively (`token`, `access_token`, `User_Password`).
/// Empty values are left alone.
pub fn mask_credentials(url: &str) -> String {
    let Some((path, query)) = url.split_once('?') else {
        return url.to_string();
    };

    let (query, fragment) = match query.split_once('#') {
        Some((q, f)) => (q, Some(f)),
        None => (query, None),
    };

    let masked: Vec<String> = query
        .split('&')
        .map(|pair| match pair.split_once('=') {
            Some((name, value)) if !value.is_empty() && is_sensitive(name) => {
                format!("{name}={MASK}")
            }
            _ => pair.to_string(),
        })
        .collect();

    let mut out = format!("{path}?{}", masked.join("&"));
    if let Some(fragment) = fragment {
        out.push('#');
        out.push_str(fragment);
    }
    out
}

fn is_sensitive(name: &str) -> bool {
    let name = name.to_ascii_lowercase();
    SENSITIVE_PARAMS
        .iter()
        .any(|sensitive| name.ends_with(sensitive))
}
