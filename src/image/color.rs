use once_cell::sync::Lazy;
use std::{collections::HashMap, str::FromStr};
use thiserror::Error;

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum CanvasColor {
    #[default]
    Transparent,
    Rgba([u8; 4]),
}

impl CanvasColor {
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self::Rgba([r, g, b, 255])
    }

    pub fn to_rgba(self) -> [u8; 4] {
        match self {
            Self::Transparent => [0, 0, 0, 0],
            Self::Rgba(rgba) => rgba,
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        let s = s.trim();
        if s.is_empty() {
            return None;
        }

        let hex = s.strip_prefix('#').unwrap_or(s);
        parse_hex(hex).or_else(|| NAMED.get(s.to_ascii_lowercase().as_str()).copied())
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("malformed color \"{0}\"")]
pub struct MalformedColor(pub String);

impl FromStr for CanvasColor {
    type Err = MalformedColor;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| MalformedColor(s.to_string()))
    }
}

fn parse_hex(hex: &str) -> Option<CanvasColor> {
    if !hex.bytes().all(|b| b.is_ascii_hexdigit()) {
        return None;
    }

    let digits: Vec<u8> = hex.bytes().filter_map(hex_val).collect();
    let rgba = match *digits.as_slice() {
        [r, g, b] => [r * 17, g * 17, b * 17, 255],
        [r, g, b, a] => [r * 17, g * 17, b * 17, a * 17],
        [r1, r2, g1, g2, b1, b2] => [(r1 << 4) | r2, (g1 << 4) | g2, (b1 << 4) | b2, 255],
        [r1, r2, g1, g2, b1, b2, a1, a2] => {
            [(r1 << 4) | r2, (g1 << 4) | g2, (b1 << 4) | b2, (a1 << 4) | a2]
        }
        _ => return None,
    };
    Some(CanvasColor::Rgba(rgba))
}

fn hex_val(ch: u8) -> Option<u8> {
    match ch {
        b'0'..=b'9' => Some(ch - b'0'),
        b'a'..=b'f' => Some(ch - b'a' + 10),
        b'A'..=b'F' => Some(ch - b'A' + 10),
        _ => None,
    }
}

static NAMED: Lazy<HashMap<&'static str, CanvasColor>> = Lazy::new(|| {
    [
        ("transparent", CanvasColor::Transparent),
        ("black", CanvasColor::rgb(0, 0, 0)),
        ("white", CanvasColor::rgb(255, 255, 255)),
        ("red", CanvasColor::rgb(255, 0, 0)),
        ("lime", CanvasColor::rgb(0, 255, 0)),
        ("green", CanvasColor::rgb(0, 128, 0)),
        ("blue", CanvasColor::rgb(0, 0, 255)),
        ("yellow", CanvasColor::rgb(255, 255, 0)),
        ("cyan", CanvasColor::rgb(0, 255, 255)),
        ("aqua", CanvasColor::rgb(0, 255, 255)),
        ("magenta", CanvasColor::rgb(255, 0, 255)),
        ("fuchsia", CanvasColor::rgb(255, 0, 255)),
        ("silver", CanvasColor::rgb(192, 192, 192)),
        ("gray", CanvasColor::rgb(128, 128, 128)),
        ("grey", CanvasColor::rgb(128, 128, 128)),
        ("maroon", CanvasColor::rgb(128, 0, 0)),
        ("olive", CanvasColor::rgb(128, 128, 0)),
        ("purple", CanvasColor::rgb(128, 0, 128)),
        ("teal", CanvasColor::rgb(0, 128, 128)),
        ("navy", CanvasColor::rgb(0, 0, 128)),
        ("orange", CanvasColor::rgb(255, 165, 0)),
    ]
    .into_iter()
    .collect()
});

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_hex_forms() {
        assert_eq!(CanvasColor::parse("#ffffff"), Some(CanvasColor::rgb(255, 255, 255)));
        assert_eq!(CanvasColor::parse("FFF"), Some(CanvasColor::rgb(255, 255, 255)));
        assert_eq!(CanvasColor::parse("#1a2b3c"), Some(CanvasColor::rgb(0x1a, 0x2b, 0x3c)));
        assert_eq!(
            CanvasColor::parse("#f008"),
            Some(CanvasColor::Rgba([255, 0, 0, 0x88]))
        );
        assert_eq!(
            CanvasColor::parse("#00000080"),
            Some(CanvasColor::Rgba([0, 0, 0, 0x80]))
        );
    }

    #[test]
    fn parses_names_case_insensitively() {
        assert_eq!(CanvasColor::parse("Red"), Some(CanvasColor::rgb(255, 0, 0)));
        assert_eq!(CanvasColor::parse(" white "), Some(CanvasColor::rgb(255, 255, 255)));
        assert_eq!(CanvasColor::parse("transparent"), Some(CanvasColor::Transparent));
    }

    #[test]
    fn rejects_garbage() {
        assert_eq!(CanvasColor::parse(""), None);
        assert_eq!(CanvasColor::parse("#12"), None);
        assert_eq!(CanvasColor::parse("#gggggg"), None);
        assert_eq!(CanvasColor::parse("not-a-color"), None);
        assert_eq!(
            "#12345".parse::<CanvasColor>(),
            Err(MalformedColor("#12345".into()))
        );
    }

    #[test]
    fn malformed_color_message() {
        let err = "nope".parse::<CanvasColor>().unwrap_err();
        assert_eq!(err.to_string(), "malformed color \"nope\"");
    }

    #[test]
    fn from_str_matches_parse() {
        assert_eq!("#0a0b0c".parse::<CanvasColor>(), Ok(CanvasColor::rgb(10, 11, 12)));
        assert_eq!("navy".parse::<CanvasColor>(), Ok(CanvasColor::rgb(0, 0, 128)));
    }

    #[test]
    fn transparent_is_zeroed() {
        assert_eq!(CanvasColor::default().to_rgba(), [0, 0, 0, 0]);
    }
}
