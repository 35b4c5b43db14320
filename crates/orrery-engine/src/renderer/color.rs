use serde::{Deserialize, Serialize};

/// RGBA color for drawing operations, components in 0.0 - 1.0.
///
/// Serializes as a CSS color string so catalogs can say `"grey"` or
/// `"#ffcc00"`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Color {
    /// Create a color from RGBA components (0.0 - 1.0).
    pub const fn new(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    /// Create a fully opaque color from RGB components.
    pub const fn rgb(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b, a: 1.0 }
    }

    /// Create a color from RGB u8 values (0-255) with full opacity.
    pub fn rgb8(r: u8, g: u8, b: u8) -> Self {
        Self {
            r: r as f32 / 255.0,
            g: g as f32 / 255.0,
            b: b as f32 / 255.0,
            a: 1.0,
        }
    }

    /// Create a color with the given alpha value.
    pub const fn with_alpha(self, a: f32) -> Self {
        Self { a, ..self }
    }

    /// Parse a CSS color: a keyword (case-insensitive), `transparent`,
    /// `#rgb`, `#rgba`, `#rrggbb`, `#rrggbbaa`, or `rgb()`/`rgba()` with
    /// comma or space separated channels.
    pub fn parse(css: &str) -> Option<Self> {
        let css = css.trim().to_ascii_lowercase();
        if let Some(hex) = css.strip_prefix('#') {
            return Self::parse_hex(hex);
        }
        if css.contains('(') {
            return Self::parse_rgb_function(&css);
        }
        if css == "transparent" {
            return Some(Self::new(0.0, 0.0, 0.0, 0.0));
        }
        NAMED
            .binary_search_by_key(&css.as_str(), |&(name, _)| name)
            .ok()
            .map(|i| {
                let (r, g, b) = NAMED[i].1;
                Self::rgb8(r, g, b)
            })
    }

    fn parse_hex(hex: &str) -> Option<Self> {
        if !hex.bytes().all(|b| b.is_ascii_hexdigit()) {
            return None;
        }
        let channel = |s: &str| u8::from_str_radix(s, 16).ok();
        let short = |i: usize| channel(&hex[i..i + 1]).map(|v| v * 17);
        let long = |i: usize| channel(&hex[2 * i..2 * i + 2]);
        let (r, g, b, a) = match hex.len() {
            3 => (short(0)?, short(1)?, short(2)?, 255),
            4 => (short(0)?, short(1)?, short(2)?, short(3)?),
            6 => (long(0)?, long(1)?, long(2)?, 255),
            8 => (long(0)?, long(1)?, long(2)?, long(3)?),
            _ => return None,
        };
        Some(Self::rgb8(r, g, b).with_alpha(a as f32 / 255.0))
    }

    /// `rgb(255, 128, 0)`, `rgba(255, 128, 0, 0.5)`, `rgb(100% 50% 0% / 50%)`.
    fn parse_rgb_function(css: &str) -> Option<Self> {
        let (name, rest) = css.split_once('(')?;
        if !matches!(name.trim(), "rgb" | "rgba") {
            return None;
        }
        let body = rest.strip_suffix(')')?;
        let (channels, slash_alpha) = match body.split_once('/') {
            Some((channels, alpha)) => (channels, Some(alpha.trim())),
            None => (body, None),
        };
        let mut parts: Vec<&str> = channels
            .split(|c: char| c == ',' || c.is_whitespace())
            .filter(|p| !p.is_empty())
            .collect();
        let alpha = match slash_alpha {
            Some(alpha) => Some(alpha),
            None if parts.len() == 4 => parts.pop(),
            None => None,
        };
        let [r, g, b] = parts.as_slice() else {
            return None;
        };
        let a = match alpha {
            Some(alpha) => css_number(alpha, 1.0)?,
            None => 1.0,
        };
        Some(Self::new(
            css_number(r, 255.0)?,
            css_number(g, 255.0)?,
            css_number(b, 255.0)?,
            a,
        ))
    }

    /// `#rrggbb` form, or `#rrggbbaa` when not fully opaque.
    pub fn to_hex(&self) -> String {
        let byte = |c: f32| (c.clamp(0.0, 1.0) * 255.0).round() as u8;
        let rgb = format!("#{:02x}{:02x}{:02x}", byte(self.r), byte(self.g), byte(self.b));
        if byte(self.a) == 255 {
            rgb
        } else {
            format!("{rgb}{:02x}", byte(self.a))
        }
    }

    pub const WHITE: Self = Self::rgb(1.0, 1.0, 1.0);
    pub const BLACK: Self = Self::rgb(0.0, 0.0, 0.0);
    pub const YELLOW: Self = Self::rgb(1.0, 1.0, 0.0);
    pub const GREY: Self = Self::rgb(128.0 / 255.0, 128.0 / 255.0, 128.0 / 255.0);
}

impl Default for Color {
    fn default() -> Self {
        Self::GREY
    }
}

impl TryFrom<String> for Color {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Color::parse(&value).ok_or_else(|| format!("unrecognised color `{value}`"))
    }
}

impl From<Color> for String {
    fn from(color: Color) -> Self {
        color.to_hex()
    }
}

/// A CSS number or percentage mapped onto `0..=1`; plain numbers are
/// divided by `full`.
fn css_number(s: &str, full: f32) -> Option<f32> {
    let value = match s.strip_suffix('%') {
        Some(pct) => pct.trim().parse::<f32>().ok()? / 100.0,
        None => s.parse::<f32>().ok()? / full,
    };
    value.is_finite().then(|| value.clamp(0.0, 1.0))
}

/// CSS named colors, sorted by name.
const NAMED: &[(&str, (u8, u8, u8))] = &[
    ("aliceblue", (240, 248, 255)),
    ("antiquewhite", (250, 235, 215)),
    ("aqua", (0, 255, 255)),
    ("aquamarine", (127, 255, 212)),
    ("azure", (240, 255, 255)),
    ("beige", (245, 245, 220)),
    ("bisque", (255, 228, 196)),
    ("black", (0, 0, 0)),
    ("blanchedalmond", (255, 235, 205)),
    ("blue", (0, 0, 255)),
    ("blueviolet", (138, 43, 226)),
    ("brown", (165, 42, 42)),
    ("burlywood", (222, 184, 135)),
    ("cadetblue", (95, 158, 160)),
    ("chartreuse", (127, 255, 0)),
    ("chocolate", (210, 105, 30)),
    ("coral", (255, 127, 80)),
    ("cornflowerblue", (100, 149, 237)),
    ("cornsilk", (255, 248, 220)),
    ("crimson", (220, 20, 60)),
    ("cyan", (0, 255, 255)),
    ("darkblue", (0, 0, 139)),
    ("darkcyan", (0, 139, 139)),
    ("darkgoldenrod", (184, 134, 11)),
    ("darkgray", (169, 169, 169)),
    ("darkgreen", (0, 100, 0)),
    ("darkgrey", (169, 169, 169)),
    ("darkkhaki", (189, 183, 107)),
    ("darkmagenta", (139, 0, 139)),
    ("darkolivegreen", (85, 107, 47)),
    ("darkorange", (255, 140, 0)),
    ("darkorchid", (153, 50, 204)),
    ("darkred", (139, 0, 0)),
    ("darksalmon", (233, 150, 122)),
    ("darkseagreen", (143, 188, 143)),
    ("darkslateblue", (72, 61, 139)),
    ("darkslategray", (47, 79, 79)),
    ("darkslategrey", (47, 79, 79)),
    ("darkturquoise", (0, 206, 209)),
    ("darkviolet", (148, 0, 211)),
    ("deeppink", (255, 20, 147)),
    ("deepskyblue", (0, 191, 255)),
    ("dimgray", (105, 105, 105)),
    ("dimgrey", (105, 105, 105)),
    ("dodgerblue", (30, 144, 255)),
    ("firebrick", (178, 34, 34)),
    ("floralwhite", (255, 250, 240)),
    ("forestgreen", (34, 139, 34)),
    ("fuchsia", (255, 0, 255)),
    ("gainsboro", (220, 220, 220)),
    ("ghostwhite", (248, 248, 255)),
    ("gold", (255, 215, 0)),
    ("goldenrod", (218, 165, 32)),
    ("gray", (128, 128, 128)),
    ("green", (0, 128, 0)),
    ("greenyellow", (173, 255, 47)),
    ("grey", (128, 128, 128)),
    ("honeydew", (240, 255, 240)),
    ("hotpink", (255, 105, 180)),
    ("indianred", (205, 92, 92)),
    ("indigo", (75, 0, 130)),
    ("ivory", (255, 255, 240)),
    ("khaki", (240, 230, 140)),
    ("lavender", (230, 230, 250)),
    ("lavenderblush", (255, 240, 245)),
    ("lawngreen", (124, 252, 0)),
    ("lemonchiffon", (255, 250, 205)),
    ("lightblue", (173, 216, 230)),
    ("lightcoral", (240, 128, 128)),
    ("lightcyan", (224, 255, 255)),
    ("lightgoldenrodyellow", (250, 250, 210)),
    ("lightgray", (211, 211, 211)),
    ("lightgreen", (144, 238, 144)),
    ("lightgrey", (211, 211, 211)),
    ("lightpink", (255, 182, 193)),
    ("lightsalmon", (255, 160, 122)),
    ("lightseagreen", (32, 178, 170)),
    ("lightskyblue", (135, 206, 250)),
    ("lightslategray", (119, 136, 153)),
    ("lightslategrey", (119, 136, 153)),
    ("lightsteelblue", (176, 196, 222)),
    ("lightyellow", (255, 255, 224)),
    ("lime", (0, 255, 0)),
    ("limegreen", (50, 205, 50)),
    ("linen", (250, 240, 230)),
    ("magenta", (255, 0, 255)),
    ("maroon", (128, 0, 0)),
    ("mediumaquamarine", (102, 205, 170)),
    ("mediumblue", (0, 0, 205)),
    ("mediumorchid", (186, 85, 211)),
    ("mediumpurple", (147, 112, 219)),
    ("mediumseagreen", (60, 179, 113)),
    ("mediumslateblue", (123, 104, 238)),
    ("mediumspringgreen", (0, 250, 154)),
    ("mediumturquoise", (72, 209, 204)),
    ("mediumvioletred", (199, 21, 133)),
    ("midnightblue", (25, 25, 112)),
    ("mintcream", (245, 255, 250)),
    ("mistyrose", (255, 228, 225)),
    ("moccasin", (255, 228, 181)),
    ("navajowhite", (255, 222, 173)),
    ("navy", (0, 0, 128)),
    ("oldlace", (253, 245, 230)),
    ("olive", (128, 128, 0)),
    ("olivedrab", (107, 142, 35)),
    ("orange", (255, 165, 0)),
    ("orangered", (255, 69, 0)),
    ("orchid", (218, 112, 214)),
    ("palegoldenrod", (238, 232, 170)),
    ("palegreen", (152, 251, 152)),
    ("paleturquoise", (175, 238, 238)),
    ("palevioletred", (219, 112, 147)),
    ("papayawhip", (255, 239, 213)),
    ("peachpuff", (255, 218, 185)),
    ("peru", (205, 133, 63)),
    ("pink", (255, 192, 203)),
    ("plum", (221, 160, 221)),
    ("powderblue", (176, 224, 230)),
    ("purple", (128, 0, 128)),
    ("rebeccapurple", (102, 51, 153)),
    ("red", (255, 0, 0)),
    ("rosybrown", (188, 143, 143)),
    ("royalblue", (65, 105, 225)),
    ("saddlebrown", (139, 69, 19)),
    ("salmon", (250, 128, 114)),
    ("sandybrown", (244, 164, 96)),
    ("seagreen", (46, 139, 87)),
    ("seashell", (255, 245, 238)),
    ("sienna", (160, 82, 45)),
    ("silver", (192, 192, 192)),
    ("skyblue", (135, 206, 235)),
    ("slateblue", (106, 90, 205)),
    ("slategray", (112, 128, 144)),
    ("slategrey", (112, 128, 144)),
    ("snow", (255, 250, 250)),
    ("springgreen", (0, 255, 127)),
    ("steelblue", (70, 130, 180)),
    ("tan", (210, 180, 140)),
    ("teal", (0, 128, 128)),
    ("thistle", (216, 191, 216)),
    ("tomato", (255, 99, 71)),
    ("turquoise", (64, 224, 208)),
    ("violet", (238, 130, 238)),
    ("wheat", (245, 222, 179)),
    ("white", (255, 255, 255)),
    ("whitesmoke", (245, 245, 245)),
    ("yellow", (255, 255, 0)),
    ("yellowgreen", (154, 205, 50)),
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_keywords_and_hex() {
        assert_eq!(Color::parse("Yellow"), Some(Color::rgb8(255, 255, 0)));
        assert_eq!(Color::parse("grey"), Some(Color::GREY));
        assert_eq!(Color::parse("#f80"), Some(Color::rgb8(255, 136, 0)));
        assert_eq!(Color::parse("#1e90ff"), Some(Color::rgb8(30, 144, 255)));
        assert_eq!(Color::parse("#12345"), None);
        assert_eq!(Color::parse("not-a-color"), None);
    }

    #[test]
    fn knows_every_css_keyword() {
        assert_eq!(NAMED.len(), 148);
        assert!(NAMED.windows(2).all(|w| w[0].0 < w[1].0));
        assert_eq!(Color::parse("RebeccaPurple"), Some(Color::rgb8(102, 51, 153)));
        assert_eq!(Color::parse("lightgoldenrodyellow"), Some(Color::rgb8(250, 250, 210)));
        assert_eq!(Color::parse("transparent").map(|c| c.a), Some(0.0));
    }

    #[test]
    fn parses_alpha_hex() {
        let orange = Color::rgb8(255, 136, 0).with_alpha(136.0 / 255.0);
        assert_eq!(Color::parse("#f808"), Some(orange));
        let blue = Color::rgb8(30, 144, 255).with_alpha(128.0 / 255.0);
        assert_eq!(Color::parse("#1E90FF80"), Some(blue));
        assert_eq!(Color::parse("#1e90ffzz"), None);
        assert_eq!(Color::parse("#+fff"), None);
    }

    #[test]
    fn parses_rgb_functions() {
        assert_eq!(Color::parse("rgb(30, 144, 255)"), Some(Color::rgb8(30, 144, 255)));
        assert_eq!(Color::parse("RGB(30 144 255)"), Some(Color::rgb8(30, 144, 255)));
        assert_eq!(
            Color::parse("rgba(255, 0, 0, 0.25)"),
            Some(Color::new(1.0, 0.0, 0.0, 0.25))
        );
        assert_eq!(
            Color::parse("rgb(100% 50% 0% / 50%)"),
            Some(Color::new(1.0, 0.5, 0.0, 0.5))
        );
        // Out-of-range channels clamp the way browsers do.
        assert_eq!(Color::parse("rgb(300, -5, 0)"), Some(Color::rgb8(255, 0, 0)));
        assert_eq!(Color::parse("rgb(1, 2)"), None);
        assert_eq!(Color::parse("rgb(1, 2, 3"), None);
        assert_eq!(Color::parse("hsl(0, 100%, 50%)"), None);
    }

    #[test]
    fn translucent_colors_keep_alpha_through_serde() {
        let c = Color::rgb8(255, 0, 0).with_alpha(0.5);
        let json = serde_json::to_string(&c).unwrap();
        assert_eq!(json, "\"#ff000080\"");
        let back: Color = serde_json::from_str(&json).unwrap();
        assert!((back.a - 128.0 / 255.0).abs() < 1e-6);
    }

    #[test]
    fn serde_uses_css_strings() {
        let c: Color = serde_json::from_str("\"skyblue\"").unwrap();
        assert_eq!(c, Color::rgb8(135, 206, 235));
        assert_eq!(serde_json::to_string(&c).unwrap(), "\"#87ceeb\"");
        assert!(serde_json::from_str::<Color>("\"plaid\"").is_err());
    }

    #[test]
    fn with_alpha_keeps_rgb() {
        let c = Color::YELLOW.with_alpha(0.5);
        assert_eq!(c.r, 1.0);
        assert_eq!(c.a, 0.5);
    }
}
