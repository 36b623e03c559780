/// Human-readable panorama label: extension dropped, separator runs become
/// single spaces, first letter capitalised, then `(ordinal/total)`.
///
/// `"living-room_3.jpg", 2, 5` → `"Living room 3 (2/5)"`
pub fn display_label(file: &str, ordinal: usize, total: usize) -> String {
    let name = file.rsplit(['/', '\\']).next().unwrap_or(file);
    let stem = match name.rfind('.') {
        Some(dot) if dot > 0 => &name[..dot],
        _ => name,
    };
    let words: Vec<&str> = stem
        .split(|c: char| !c.is_alphanumeric())
        .filter(|w| !w.is_empty())
        .collect();

    let joined = words.join(" ");
    let mut title = String::with_capacity(joined.len());
    let mut chars = joined.chars();
    if let Some(first) = chars.next() {
        title.extend(first.to_uppercase());
        title.extend(chars);
    }

    if title.is_empty() {
        format!("({ordinal}/{total})")
    } else {
        format!("{title} ({ordinal}/{total})")
    }
}
