//! Number formatting for tiles and the side panel.

const SUFFIXES: [char; 5] = ['k', 'm', 'b', 't', 'q'];

/// Short form for a tile: raw below 10000, otherwise the leading group plus a
/// thousands suffix (`131072` -> `131k`).
pub fn compact_number(n: u64) -> String {
    if n < 10_000 {
        return n.to_string();
    }
    let index = (n.ilog10() / 3 - 1) as usize;
    let suffix = match SUFFIXES.get(index) {
        Some(&s) => s,
        None => char::from(b'a' + (index - SUFFIXES.len()).min(25) as u8),
    };
    let value = n / 10u64.pow((index as u32 + 1) * 3);
    format!("{value}{suffix}")
}

/// Comma-grouped digits (`1234567` -> `1,234,567`)
pub fn grouped(n: u64) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

/// Score line: raw below 1000, grouped up to 9999, and grouped with the
/// short form appended from 10000 on.
pub fn score_text(n: u64) -> String {
    match n {
        0..=999 => n.to_string(),
        1_000..=9_999 => grouped(n),
        _ => format!("{} ({})", grouped(n), compact_number(n)),
    }
}
