/// Format a byte count with binary prefixes and two decimals, right-aligned
/// to a fixed width (e.g., `"  25.05 KiB"`, `"   1.00 GiB"`).
///
/// Used by the file structure listing, where columns need to line up.
pub fn format_filesize(bytes: u64) -> String {
    const PREFIXES: [&str; 7] = ["", "Ki", "Mi", "Gi", "Ti", "Pi", "Ei"];
    let mut size = bytes as f64;
    let mut prefix = 0;
    while size > 1024.0 && prefix < PREFIXES.len() - 1 {
        size /= 1024.0;
        prefix += 1;
    }
    format!("{:7.2} {}B", size, PREFIXES[prefix])
}

/// Read a fixed-length ASCII string from a byte slice.
///
/// Non-printable bytes are replaced with spaces, then the result is trimmed.
/// Does NOT stop at null bytes; volume identifiers and IFO signatures are
/// space padded rather than null-terminated.
pub fn read_ascii_fixed(buf: &[u8]) -> String {
    let s: String = buf
        .iter()
        .map(|&b| {
            if (0x20..0x7F).contains(&b) {
                b as char
            } else {
                ' '
            }
        })
        .collect();
    s.trim().to_string()
}

/// Turn a raw volume label into a title name.
///
/// Underscores become spaces, and each word is capitalized with the rest
/// lower-cased: `"STAR_WARS_EP1"` → `"Star Wars Ep1"`.
pub fn title_case_label(label: &str) -> String {
    let mut out = String::with_capacity(label.len());
    let mut word_start = true;
    for c in label.trim_end().chars() {
        let c = if c == '_' { ' ' } else { c };
        if c == ' ' {
            out.push(c);
            word_start = true;
        } else if word_start {
            out.extend(c.to_uppercase());
            word_start = false;
        } else {
            out.extend(c.to_lowercase());
        }
    }
    out
}
