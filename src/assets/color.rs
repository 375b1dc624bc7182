use crate::foundation::core::Rgb;

/// Resolve a stroke's declared color.
///
/// Accepts `#RRGGBB` or `RRGGBB` with case-insensitive hex digits. Anything else resolves to
/// black: a bad color must never abort a render.
pub fn resolve(hex: &str) -> Rgb {
    parse_hex(hex).unwrap_or(Rgb::BLACK)
}

fn parse_hex(s: &str) -> Option<Rgb> {
    let s = s.strip_prefix('#').unwrap_or(s);
    if s.len() != 6 || !s.bytes().all(|b| b.is_ascii_hexdigit()) {
        return None;
    }

    let channel = |i: usize| -> Option<f64> {
        let byte = u8::from_str_radix(&s[i..i + 2], 16).ok()?;
        Some(f64::from(byte) / 255.0)
    };

    Some(Rgb::new(channel(0)?, channel(2)?, channel(4)?))
}
