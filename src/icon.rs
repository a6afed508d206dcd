use std::borrow::Cow;

use ratatui::text::Span;

/// Rendered in place of a glyph which could not be resolved.
pub const PLACEHOLDER_GLYPH: &str = "?";

/// Built-in glyphs by name. Never changes at runtime.
static GLYPHS: &[(&str, &str)] = &[
    ("Plus", "\u{229e}"),       // Squared plus
    ("Minus", "\u{229f}"),      // Squared minus
    ("Close", "\u{22a0}"),      // Squared times
    ("Eye", "\u{25c9}"),        // Fisheye
    ("EyeClosed", "\u{25cc}"),  // Dotted circle
    ("ArrowRight", "\u{25b6}"), // Arrow to right
    ("ArrowDown", "\u{25bc}"),  // Arrow down
];

/// Look up a built-in glyph by its name.
///
/// ```
/// # use tui_tree_node::glyph;
/// assert_eq!(glyph("ArrowDown"), Some("\u{25bc}"));
/// assert_eq!(glyph("Nope"), None);
/// ```
#[must_use]
pub fn glyph(name: &str) -> Option<&'static str> {
    GLYPHS
        .iter()
        .find(|(known, _)| *known == name)
        .map(|(_, glyph)| *glyph)
}

/// The places a [`TreeNode`](crate::TreeNode) shows an icon.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IconRole {
    /// Toggle of a closed node with nested content.
    Expand,
    /// Toggle of an open node with nested content.
    Collapse,
    /// Inert toggle of a node without nested content.
    Close,
    /// Visibility toggle. Only shown when the node can be hidden.
    Eye,
}

impl IconRole {
    /// Name of the built-in glyph used when the [`IconSet`] has no entry for this role.
    #[must_use]
    pub const fn default_name(self) -> &'static str {
        match self {
            Self::Expand => "Plus",
            Self::Collapse => "Minus",
            Self::Close => "Close",
            Self::Eye => "Eye",
        }
    }
}

/// Reference to a glyph: either the name of a built-in glyph or something to render as is.
#[derive(Debug, Clone, PartialEq)]
pub enum GlyphRef<'a> {
    Named(Cow<'a, str>),
    Direct(Span<'a>),
}

impl<'a> From<&'a str> for GlyphRef<'a> {
    fn from(name: &'a str) -> Self {
        Self::Named(Cow::Borrowed(name))
    }
}

impl From<String> for GlyphRef<'_> {
    fn from(name: String) -> Self {
        Self::Named(Cow::Owned(name))
    }
}

impl<'a> From<Span<'a>> for GlyphRef<'a> {
    fn from(span: Span<'a>) -> Self {
        Self::Direct(span)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum IconError {
    #[error("Unknown glyph '{name}' configured for the {role:?} icon")]
    UnknownGlyph { name: String, role: IconRole },
}

/// Per node overrides of the icons.
/// Roles without an entry use the built-in glyph of [`IconRole::default_name`].
///
/// # Example
///
/// ```
/// # use tui_tree_node::{IconRole, IconSet};
/// use ratatui::text::Span;
///
/// let icons = IconSet::default()
///     .expand("ArrowRight")
///     .collapse("ArrowDown")
///     .eye(Span::raw("E"));
/// assert_eq!(icons.resolve(IconRole::Eye), Ok(Span::raw("E")));
/// ```
#[derive(Debug, Default, Clone, PartialEq)]
pub struct IconSet<'a> {
    expand: Option<GlyphRef<'a>>,
    collapse: Option<GlyphRef<'a>>,
    close: Option<GlyphRef<'a>>,
    eye: Option<GlyphRef<'a>>,
}

impl<'a> IconSet<'a> {
    #[must_use]
    pub fn expand<G: Into<GlyphRef<'a>>>(mut self, glyph: G) -> Self {
        self.expand = Some(glyph.into());
        self
    }

    #[must_use]
    pub fn collapse<G: Into<GlyphRef<'a>>>(mut self, glyph: G) -> Self {
        self.collapse = Some(glyph.into());
        self
    }

    #[must_use]
    pub fn close<G: Into<GlyphRef<'a>>>(mut self, glyph: G) -> Self {
        self.close = Some(glyph.into());
        self
    }

    #[must_use]
    pub fn eye<G: Into<GlyphRef<'a>>>(mut self, glyph: G) -> Self {
        self.eye = Some(glyph.into());
        self
    }

    #[must_use]
    pub const fn get(&self, role: IconRole) -> Option<&GlyphRef<'a>> {
        match role {
            IconRole::Expand => self.expand.as_ref(),
            IconRole::Collapse => self.collapse.as_ref(),
            IconRole::Close => self.close.as_ref(),
            IconRole::Eye => self.eye.as_ref(),
        }
    }

    /// Resolve the glyph of the given role.
    ///
    /// # Errors
    ///
    /// Errors when the role is configured with a name which is not a built-in glyph.
    pub fn resolve(&self, role: IconRole) -> Result<Span<'a>, IconError> {
        let name = match self.get(role) {
            Some(GlyphRef::Direct(span)) => return Ok(span.clone()),
            Some(GlyphRef::Named(name)) => name.as_ref(),
            None => role.default_name(),
        };
        glyph(name)
            .map(Span::raw)
            .ok_or_else(|| IconError::UnknownGlyph {
                name: name.to_owned(),
                role,
            })
    }

    /// Same as [`resolve`](Self::resolve) but falls back to the [`PLACEHOLDER_GLYPH`] on errors.
    #[must_use]
    pub fn resolve_or_placeholder(&self, role: IconRole) -> Span<'a> {
        self.resolve(role).unwrap_or_else(|error| {
            tracing::warn!(target: "tui_tree_node::icon", "{error}");
            Span::raw(PLACEHOLDER_GLYPH)
        })
    }
}

#[test]
fn every_role_has_a_builtin_glyph() {
    for role in [
        IconRole::Expand,
        IconRole::Collapse,
        IconRole::Close,
        IconRole::Eye,
    ] {
        assert!(glyph(role.default_name()).is_some(), "{role:?}");
        assert!(IconSet::default().resolve(role).is_ok());
    }
}

#[test]
fn named_override_is_looked_up() {
    let icons = IconSet::default().expand("ArrowRight");
    assert_eq!(icons.resolve(IconRole::Expand), Ok(Span::raw("\u{25b6}")));
    assert_eq!(icons.resolve(IconRole::Collapse), Ok(Span::raw("\u{229f}")));
}

#[test]
fn direct_override_passes_through() {
    let icons = IconSet::default().close(Span::raw("x"));
    assert_eq!(icons.resolve(IconRole::Close), Ok(Span::raw("x")));
}

#[test]
fn unknown_name_errors() {
    let icons = IconSet::default().collapse(String::from("Nope"));
    assert_eq!(
        icons.resolve(IconRole::Collapse),
        Err(IconError::UnknownGlyph {
            name: "Nope".to_owned(),
            role: IconRole::Collapse,
        })
    );
}

#[test]
fn unknown_name_renders_placeholder() {
    let icons = IconSet::default().eye("Nope");
    assert_eq!(
        icons.resolve_or_placeholder(IconRole::Eye),
        Span::raw(PLACEHOLDER_GLYPH)
    );
}
