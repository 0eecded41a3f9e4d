//! Concrete colors and style-token resolution.

use super::ColorToken;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use thiserror::Error;

/// An 8-bit straight-alpha color.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Rgba {
    pub const TRANSPARENT: Rgba = Rgba::new(0, 0, 0, 0);

    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    pub const fn opaque(r: u8, g: u8, b: u8) -> Self {
        Self::new(r, g, b, 255)
    }

    /// Parse `#RRGGBB` or `#RRGGBBAA` (leading `#` optional).
    pub fn from_hex(hex: &str) -> Result<Self, ResolveError> {
        let digits = hex.strip_prefix('#').unwrap_or(hex);
        let invalid = || ResolveError::InvalidHex(hex.to_string());
        // from_str_radix would also take a leading sign.
        if !(digits.len() == 6 || digits.len() == 8)
            || !digits.bytes().all(|b| b.is_ascii_hexdigit())
        {
            return Err(invalid());
        }
        let byte = |i: usize| u8::from_str_radix(&digits[i..i + 2], 16).map_err(|_| invalid());
        let a = if digits.len() == 8 { byte(6)? } else { 255 };
        Ok(Self::new(byte(0)?, byte(2)?, byte(4)?, a))
    }

    /// Scale alpha by `opacity` in `[0, 1]`.
    pub fn with_opacity(self, opacity: f64) -> Self {
        let a = (f64::from(self.a) * opacity.clamp(0.0, 1.0)).round() as u8;
        Self { a, ..self }
    }

    pub fn is_transparent(&self) -> bool {
        self.a == 0
    }
}

impl fmt::Display for Rgba {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.a == 255 {
            write!(f, "#{:02X}{:02X}{:02X}", self.r, self.g, self.b)
        } else {
            write!(f, "#{:02X}{:02X}{:02X}{:02X}", self.r, self.g, self.b, self.a)
        }
    }
}

/// Errors turning a style token into a paintable color.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum ResolveError {
    #[error("Unknown color token '{0}'")]
    UnknownToken(String),

    #[error("Malformed color token '{0}'")]
    MalformedToken(String),

    #[error("Invalid hex color '{0}'")]
    InvalidHex(String),

    #[error("Invalid opacity in token '{0}'")]
    InvalidOpacity(String),

    #[error("Token '{0}' resolved to a fully transparent color")]
    Transparent(String),
}

/// Resolves abstract style tokens to concrete colors.
///
/// Whatever styling system backs the tokens, the resolver answers "what
/// color would this token paint".
pub trait TokenResolver {
    fn resolve(&self, token: &ColorToken) -> Result<Rgba, ResolveError>;
}

impl<F> TokenResolver for F
where
    F: Fn(&ColorToken) -> Result<Rgba, ResolveError>,
{
    fn resolve(&self, token: &ColorToken) -> Result<Rgba, ResolveError> {
        self(token)
    }
}

const UTILITY_PREFIXES: [&str; 3] = ["bg-", "text-", "border-"];

/// Resolver backed by a fixed swatch table.
///
/// Tokens look like `bg-roylp`, `text-ghost-300` or `border-ashbl/40`: a
/// utility prefix, a swatch name with an optional shade, and an optional
/// opacity percentage. A token resolving to full transparency counts as
/// unresolved and is an error.
#[derive(Clone, Debug, Default)]
pub struct StaticTokenResolver {
    swatches: HashMap<String, Rgba>,
}

impl StaticTokenResolver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a swatch such as `"roylp"` or `"roylp-300"`.
    pub fn with_swatch(mut self, name: impl Into<String>, color: Rgba) -> Self {
        self.swatches.insert(name.into(), color);
        self
    }

    /// Add a swatch from a hex string.
    pub fn with_hex_swatch(self, name: impl Into<String>, hex: &str) -> Result<Self, ResolveError> {
        let color = Rgba::from_hex(hex)?;
        Ok(self.with_swatch(name, color))
    }

    /// The site swatches plus `primary` / `secondary` aliases.
    pub fn site_default() -> Self {
        const SWATCHES: [(&str, Rgba, Rgba); 6] = [
            ("ashbl", Rgba::opaque(0x1D, 0x1E, 0x1D), Rgba::opaque(0x45, 0x47, 0x45)),
            ("roylp", Rgba::opaque(0x78, 0x51, 0xA9), Rgba::opaque(0xA2, 0x86, 0xC5)),
            ("chrtr", Rgba::opaque(0xD1, 0xE2, 0x5B), Rgba::opaque(0xE4, 0xEE, 0xA0)),
            ("orngc", Rgba::opaque(0xFF, 0xA4, 0x72), Rgba::opaque(0xFF, 0xD9, 0xC4)),
            ("palbr", Rgba::opaque(0x94, 0x73, 0x52), Rgba::opaque(0xB8, 0x9C, 0x7F)),
            ("ghost", Rgba::opaque(0xF8, 0xF8, 0xFF), Rgba::opaque(0xFF, 0xFF, 0xFF)),
        ];

        let mut resolver = Self::new();
        for (name, base, light) in SWATCHES {
            resolver = resolver
                .with_swatch(name, base)
                .with_swatch(format!("{name}-500"), base)
                .with_swatch(format!("{name}-300"), light);
        }
        resolver
            .with_swatch("primary", Rgba::opaque(0x1D, 0x1E, 0x1D))
            .with_swatch("secondary", Rgba::opaque(0xF8, 0xF8, 0xFF))
    }

    fn swatch_and_opacity<'a>(&self, token: &'a str) -> Result<(&'a str, f64), ResolveError> {
        let body = UTILITY_PREFIXES
            .iter()
            .find_map(|p| token.strip_prefix(p))
            .ok_or_else(|| ResolveError::MalformedToken(token.to_string()))?;

        let (name, opacity) = match body.split_once('/') {
            Some((name, pct)) => {
                let pct: f64 = pct
                    .parse()
                    .map_err(|_| ResolveError::InvalidOpacity(token.to_string()))?;
                if !(0.0..=100.0).contains(&pct) {
                    return Err(ResolveError::InvalidOpacity(token.to_string()));
                }
                (name, pct / 100.0)
            }
            None => (body, 1.0),
        };

        if name.is_empty() {
            return Err(ResolveError::MalformedToken(token.to_string()));
        }
        Ok((name, opacity))
    }
}

impl TokenResolver for StaticTokenResolver {
    fn resolve(&self, token: &ColorToken) -> Result<Rgba, ResolveError> {
        let (name, opacity) = self.swatch_and_opacity(token.as_str())?;
        let color = self
            .swatches
            .get(name)
            .copied()
            .ok_or_else(|| ResolveError::UnknownToken(token.to_string()))?
            .with_opacity(opacity);

        if color.is_transparent() {
            return Err(ResolveError::Transparent(token.to_string()));
        }
        Ok(color)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn token(s: &str) -> ColorToken {
        ColorToken::new(s)
    }

    #[test]
    fn hex_parses_with_and_without_alpha() {
        assert_eq!(Rgba::from_hex("#7851A9").unwrap(), Rgba::opaque(0x78, 0x51, 0xA9));
        assert_eq!(Rgba::from_hex("1D1E1D80").unwrap(), Rgba::new(0x1D, 0x1E, 0x1D, 0x80));
        assert!(matches!(Rgba::from_hex("#12345"), Err(ResolveError::InvalidHex(_))));
        assert!(matches!(Rgba::from_hex("#GGGGGG"), Err(ResolveError::InvalidHex(_))));
    }

    #[test]
    fn hex_rejects_signs() {
        for hex in ["#+1+2+3", "+1+2+3", "#-1-2-3", "#12+456", "#1234+678"] {
            assert!(
                matches!(Rgba::from_hex(hex), Err(ResolveError::InvalidHex(_))),
                "{hex} should be rejected"
            );
        }
    }

    #[test]
    fn display_round_trips_hex() {
        assert_eq!(Rgba::opaque(0xF8, 0xF8, 0xFF).to_string(), "#F8F8FF");
        assert_eq!(Rgba::new(1, 2, 3, 4).to_string(), "#01020304");
    }

    #[test]
    fn site_resolver_resolves_background_tokens() {
        let resolver = StaticTokenResolver::site_default();
        assert_eq!(
            resolver.resolve(&token("bg-roylp")).unwrap(),
            Rgba::opaque(0x78, 0x51, 0xA9)
        );
        assert_eq!(
            resolver.resolve(&token("bg-secondary")).unwrap(),
            Rgba::opaque(0xF8, 0xF8, 0xFF)
        );
        assert_eq!(
            resolver.resolve(&token("text-chrtr-300")).unwrap(),
            Rgba::opaque(0xE4, 0xEE, 0xA0)
        );
    }

    #[test]
    fn opacity_suffix_scales_alpha() {
        let resolver = StaticTokenResolver::site_default();
        let c = resolver.resolve(&token("border-ghost/40")).unwrap();
        assert_eq!(c.a, 102);
    }

    #[test]
    fn failures_are_reported() {
        let resolver = StaticTokenResolver::site_default();
        assert!(matches!(
            resolver.resolve(&token("bg-nope")),
            Err(ResolveError::UnknownToken(_))
        ));
        assert!(matches!(
            resolver.resolve(&token("roylp")),
            Err(ResolveError::MalformedToken(_))
        ));
        assert!(matches!(
            resolver.resolve(&token("bg-roylp/abc")),
            Err(ResolveError::InvalidOpacity(_))
        ));
        assert!(matches!(
            resolver.resolve(&token("bg-roylp/0")),
            Err(ResolveError::Transparent(_))
        ));
    }

    #[test]
    fn closures_are_resolvers() {
        let resolver = |_: &ColorToken| -> Result<Rgba, ResolveError> { Ok(Rgba::opaque(1, 2, 3)) };
        assert_eq!(resolver.resolve(&token("bg-x")).unwrap(), Rgba::opaque(1, 2, 3));
    }
}
