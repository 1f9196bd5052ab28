//! Output filename derivation.

/// Characters that would let a title escape the destination directory.
const PATH_SEPARATORS: [char; 2] = ['/', '\\'];

/// Extension of the server filename, including the leading dot.
///
/// Only the last path component is considered, and a leading dot alone
/// (`.hidden`) does not count as an extension.
pub fn extension_suffix(server_filename: &str) -> &str {
    let base = server_filename
        .rsplit(|c: char| PATH_SEPARATORS.contains(&c))
        .next()
        .unwrap_or(server_filename);
    match base.rfind('.') {
        Some(i) if i > 0 => &base[i..],
        _ => "",
    }
}

/// Derives the local filename for a track: `<title><ext>`, with every path
/// separator replaced by `_`.
///
/// Falls back to the track id as base name when the title is blank or the
/// result would be one of the directory entries `.` and `..`.
pub fn derive_output_filename(title: &str, track_id: u64, server_filename: &str) -> String {
    let suffix = extension_suffix(server_filename);
    let candidate = replace_separators(&format!("{}{}", title, suffix));
    if candidate.is_empty() || candidate == "." || candidate == ".." || title.trim().is_empty() {
        replace_separators(&format!("{}{}", track_id, suffix))
    } else {
        candidate
    }
}

fn replace_separators(name: &str) -> String {
    name.chars()
        .map(|c| if PATH_SEPARATORS.contains(&c) { '_' } else { c })
        .collect()
}
