//! Palette catalog: the ordered list of selectable themes.
//!
//! Each entry pairs a route with a base color and the token set derived from
//! it. Entries are immutable once the catalog is built.

mod color;
pub mod error;

pub use color::{ResolveError, Rgba, StaticTokenResolver, TokenResolver};
pub use error::CatalogError;

use crate::host::RouteKey;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::fmt;

/// An abstract style token such as `bg-roylp` or `text-ghost/40`.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ColorToken(String);

impl ColorToken {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ColorToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Ink used on top of a page color.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Contrast {
    /// Light ink, for dark page colors.
    Light,
    /// Dark ink, for light page colors.
    Dark,
}

impl Contrast {
    /// Swatch name of the ink color.
    pub fn ink(&self) -> &'static str {
        match self {
            Self::Light => "ghost",
            Self::Dark => "ashbl",
        }
    }
}

/// The style-token set a theme applies.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ThemeTokens {
    /// Page background; this is the color the wipe paints.
    pub page: ColorToken,
    pub text: ColorToken,
    pub border: ColorToken,
    /// Text in the page's own color, for elements sitting on ink.
    pub blend_text: ColorToken,
    pub sub_border: ColorToken,
    pub separator: ColorToken,
}

impl ThemeTokens {
    /// Derive the token set for a base swatch and ink contrast.
    ///
    /// ```rust
    /// use themewipe::palette::{Contrast, ThemeTokens};
    ///
    /// let tokens = ThemeTokens::derive("roylp", Contrast::Light);
    /// assert_eq!(tokens.page.as_str(), "bg-roylp");
    /// assert_eq!(tokens.text.as_str(), "text-ghost");
    /// assert_eq!(tokens.blend_text.as_str(), "text-roylp");
    /// ```
    pub fn derive(base: &str, contrast: Contrast) -> Self {
        let ink = contrast.ink();
        Self {
            page: ColorToken::new(format!("bg-{base}")),
            text: ColorToken::new(format!("text-{ink}")),
            border: ColorToken::new(format!("border-{ink}")),
            blend_text: ColorToken::new(format!("text-{base}")),
            sub_border: ColorToken::new(format!("border-{ink}/40")),
            separator: ColorToken::new(format!("bg-{ink}/20")),
        }
    }
}

/// One selectable theme.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ThemeEntry {
    pub id: String,
    /// Human label, e.g. `"About"`.
    pub name: String,
    pub route: RouteKey,
    /// Base swatch name, e.g. `"roylp"`.
    pub base_color: String,
    pub tokens: ThemeTokens,
}

impl ThemeEntry {
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        route: &str,
        base_color: &str,
        contrast: Contrast,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            route: RouteKey::new(route),
            base_color: base_color.to_string(),
            tokens: ThemeTokens::derive(base_color, contrast),
        }
    }
}

/// Serialized form of an entry; tokens are derived unless given.
#[derive(Deserialize)]
struct EntryRecord {
    id: String,
    name: String,
    route: String,
    base_color: String,
    #[serde(default = "default_contrast")]
    contrast: Contrast,
    #[serde(default)]
    tokens: Option<ThemeTokens>,
}

fn default_contrast() -> Contrast {
    Contrast::Light
}

/// Ordered, validated list of theme entries.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PaletteCatalog {
    entries: Vec<ThemeEntry>,
}

impl PaletteCatalog {
    /// Build a catalog, rejecting empty lists, duplicate ids and two
    /// entries on the same route section.
    pub fn new(entries: Vec<ThemeEntry>) -> Result<Self, CatalogError> {
        if entries.is_empty() {
            return Err(CatalogError::Empty);
        }

        let mut ids: HashSet<&str> = HashSet::new();
        let mut sections: HashMap<&str, &str> = HashMap::new();
        for entry in &entries {
            if !ids.insert(entry.id.as_str()) {
                return Err(CatalogError::DuplicateId(entry.id.clone()));
            }
            if let Some(first) = sections.insert(entry.route.section(), entry.id.as_str()) {
                return Err(CatalogError::DuplicateRoute {
                    section: entry.route.section().to_string(),
                    first: first.to_string(),
                    second: entry.id.clone(),
                });
            }
        }

        Ok(Self { entries })
    }

    /// Load a catalog from a JSON array of entries.
    ///
    /// ```rust
    /// use themewipe::palette::PaletteCatalog;
    ///
    /// let catalog = PaletteCatalog::from_json(r#"[
    ///     {"id": "home", "name": "Home", "route": "/", "base_color": "ashbl"},
    ///     {"id": "projects", "name": "Projects", "route": "/projects",
    ///      "base_color": "chrtr", "contrast": "dark"}
    /// ]"#).unwrap();
    ///
    /// assert_eq!(catalog.len(), 2);
    /// assert_eq!(catalog.entries()[1].tokens.text.as_str(), "text-ashbl");
    /// ```
    pub fn from_json(json: &str) -> Result<Self, CatalogError> {
        let records: Vec<EntryRecord> = serde_json::from_str(json)?;
        let entries = records
            .into_iter()
            .map(|record| {
                let mut entry = ThemeEntry::new(
                    record.id,
                    record.name,
                    &record.route,
                    &record.base_color,
                    record.contrast,
                );
                if let Some(tokens) = record.tokens {
                    entry.tokens = tokens;
                }
                entry
            })
            .collect();
        Self::new(entries)
    }

    /// The six-page site catalog, home first.
    pub fn site_default() -> Self {
        Self {
            entries: vec![
                ThemeEntry::new("home", "Home", "/", "ashbl", Contrast::Light),
                ThemeEntry::new("about", "About", "/about", "roylp", Contrast::Light),
                ThemeEntry::new("projects", "Projects", "/projects", "chrtr", Contrast::Dark),
                ThemeEntry::new("experience", "Experience", "/experience", "orngc", Contrast::Dark),
                ThemeEntry::new("services", "Services", "/services", "palbr", Contrast::Light),
                ThemeEntry::new("contact", "Contact", "/contact", "ghost", Contrast::Dark),
            ],
        }
    }

    pub fn entries(&self) -> &[ThemeEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// The first entry; a catalog is never empty.
    pub fn first(&self) -> &ThemeEntry {
        &self.entries[0]
    }

    pub fn get(&self, id: &str) -> Option<&ThemeEntry> {
        self.entries.iter().find(|e| e.id == id)
    }

    /// Entry owning the route's first path segment.
    pub fn entry_for_route(&self, route: &RouteKey) -> Option<&ThemeEntry> {
        let section = route.section();
        self.entries.iter().find(|e| e.route.section() == section)
    }
}
