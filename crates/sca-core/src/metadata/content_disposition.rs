//! Content-Disposition parameter parsing (filename and filename*).

/// Extracts the filename from a raw Content-Disposition header value.
///
/// Supports:
/// - `filename="value"` (quoted; strips quotes and unescapes)
/// - `filename=value` (token)
/// - `filename*=charset'lang'percent-encoded` (RFC 5987; decoded)
/// If both `filename` and `filename*` exist, `filename*` takes precedence.
/// Empty values are treated as absent.
pub fn parse_content_disposition_filename(header_value: &str) -> Option<String> {
    let mut plain: Option<String> = None;
    let mut extended: Option<String> = None;

    for param in split_params(header_value).into_iter().skip(1) {
        let Some((name, v)) = param.split_once('=') else {
            continue;
        };
        let name = name.trim().to_ascii_lowercase();
        let v = v.trim();

        match name.as_str() {
            "filename*" => {
                if let Some(decoded) = decode_ext_value(v).filter(|s| !s.is_empty()) {
                    extended = Some(decoded);
                }
            }
            "filename" => {
                let unquoted = unquote(v);
                if !unquoted.is_empty() {
                    plain = Some(unquoted);
                }
            }
            _ => {}
        }
    }

    extended.or(plain)
}

/// Split on `;` outside of quoted strings. The first element is the disposition type.
fn split_params(value: &str) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut start = 0;
    let mut in_quotes = false;
    let mut escaped = false;

    for (i, c) in value.char_indices() {
        if escaped {
            escaped = false;
            continue;
        }
        match c {
            '\\' if in_quotes => escaped = true,
            '"' => in_quotes = !in_quotes,
            ';' if !in_quotes => {
                parts.push(value[start..i].trim());
                start = i + 1;
            }
            _ => {}
        }
    }
    parts.push(value[start..].trim());
    parts
}

fn unquote(v: &str) -> String {
    if v.len() >= 2 && v.starts_with('"') && v.ends_with('"') {
        decode_quoted_filename(&v[1..v.len() - 1])
    } else {
        v.to_string()
    }
}

/// Decode an RFC 5987 ext-value: `charset'lang'pct-encoded`.
/// UTF-8 and ISO-8859-1 charsets are understood; anything else is decoded lossily as UTF-8.
fn decode_ext_value(v: &str) -> Option<String> {
    let v = unquote(v);
    let mut parts = v.splitn(3, '\'');
    let charset = parts.next()?;
    let _lang = parts.next()?;
    let encoded = parts.next()?;

    let bytes = percent_decode(encoded);
    if charset.eq_ignore_ascii_case("iso-8859-1") {
        Some(bytes.iter().map(|&b| b as char).collect())
    } else {
        Some(String::from_utf8_lossy(&bytes).into_owned())
    }
}

/// Decode backslash-escaped quotes in a quoted filename value.
fn decode_quoted_filename(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut chars = s.chars().peekable();
    while let Some(c) = chars.next() {
        if c == '\\' {
            if let Some(&next) = chars.peek() {
                if next == '"' || next == '\\' {
                    out.push(next);
                    chars.next();
                    continue;
                }
            }
        }
        out.push(c);
    }
    out
}

/// Percent-decode; malformed escapes are kept literally.
fn percent_decode(input: &str) -> Vec<u8> {
    let bytes = input.as_bytes();
    let mut out = Vec::with_capacity(bytes.len());
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] == b'%' && i + 2 < bytes.len() {
            if let (Some(h), Some(l)) = (hex_digit(bytes[i + 1]), hex_digit(bytes[i + 2])) {
                out.push(h << 4 | l);
                i += 3;
                continue;
            }
        }
        out.push(bytes[i]);
        i += 1;
    }
    out
}

fn hex_digit(b: u8) -> Option<u8> {
    match b {
        b'0'..=b'9' => Some(b - b'0'),
        b'a'..=b'f' => Some(b - b'a' + 10),
        b'A'..=b'F' => Some(b - b'A' + 10),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_quoted() {
        let r = parse_content_disposition_filename("attachment; filename=\"mix.wav\"");
        assert_eq!(r.as_deref(), Some("mix.wav"));
    }

    #[test]
    fn parse_token() {
        let r = parse_content_disposition_filename("attachment; filename=mix.wav");
        assert_eq!(r.as_deref(), Some("mix.wav"));
    }

    #[test]
    fn parse_filename_star_utf8() {
        let r = parse_content_disposition_filename("attachment; filename*=UTF-8''caf%C3%A9.flac");
        assert_eq!(r.as_deref(), Some("café.flac"));
    }

    #[test]
    fn parse_filename_star_latin1() {
        let r = parse_content_disposition_filename("attachment; filename*=iso-8859-1'en'caf%E9.mp3");
        assert_eq!(r.as_deref(), Some("café.mp3"));
    }

    #[test]
    fn filename_star_wins_regardless_of_order() {
        let r = parse_content_disposition_filename(
            "attachment; filename*=UTF-8''real%20name.aiff; filename=\"fallback.aiff\"",
        );
        assert_eq!(r.as_deref(), Some("real name.aiff"));
        let r = parse_content_disposition_filename(
            "attachment; filename=\"fallback.aiff\"; filename*=UTF-8''real%20name.aiff",
        );
        assert_eq!(r.as_deref(), Some("real name.aiff"));
    }

    #[test]
    fn semicolon_inside_quotes() {
        let r = parse_content_disposition_filename("attachment; filename=\"a;b \\\"c\\\".wav\"");
        assert_eq!(r.as_deref(), Some("a;b \"c\".wav"));
    }

    #[test]
    fn missing_or_empty_filename() {
        assert_eq!(parse_content_disposition_filename("attachment"), None);
        assert_eq!(parse_content_disposition_filename("inline; size=10"), None);
        assert_eq!(parse_content_disposition_filename("attachment; filename=\"\""), None);
    }

    #[test]
    fn malformed_percent_kept() {
        assert_eq!(percent_decode("a%2"), b"a%2".to_vec());
        assert_eq!(percent_decode("100%zz"), b"100%zz".to_vec());
        assert_eq!(percent_decode("%41"), b"A".to_vec());
    }
}
