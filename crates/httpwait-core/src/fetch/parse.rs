//! Parse raw HTTP response header lines into name/value pairs and a joined map.

use std::collections::BTreeMap;

/// Parse collected header lines (as delivered by curl's header callback).
///
/// A status line (`HTTP/...`) starts a new header block, so only the final
/// response's headers survive a redirect chain. Lines without a colon are
/// ignored. Order is preserved.
pub(crate) fn parse_header_lines(lines: &[String]) -> Vec<(String, String)> {
    let mut headers = Vec::new();

    for line in lines {
        let line = line.trim_end();
        if line.is_empty() {
            continue;
        }
        if line.starts_with("HTTP/") {
            headers.clear();
            continue;
        }
        if let Some((name, value)) = line.split_once(':') {
            let name = name.trim();
            if name.is_empty() {
                continue;
            }
            headers.push((canonical_header_name(name), value.trim().to_string()));
        }
    }

    headers
}

/// Canonical MIME header form: first letter and each letter after a hyphen
/// upper case, the rest lower case (`x-double` -> `X-Double`).
pub fn canonical_header_name(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    let mut upper = true;
    for c in name.chars() {
        if upper {
            out.push(c.to_ascii_uppercase());
        } else {
            out.push(c.to_ascii_lowercase());
        }
        upper = c == '-';
    }
    out
}

/// Join repeated headers with `", "` (RFC 2616 section 4.2), keeping arrival order.
pub fn join_headers(pairs: &[(String, String)]) -> BTreeMap<String, String> {
    let mut joined: BTreeMap<String, String> = BTreeMap::new();
    for (name, value) in pairs {
        joined
            .entry(canonical_header_name(name))
            .and_modify(|existing| {
                existing.push_str(", ");
                existing.push_str(value);
            })
            .or_insert_with(|| value.clone());
    }
    joined
}
