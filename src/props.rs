use std::fmt;

use ratatui::style::Style;
use ratatui::text::{Line, Text};

use crate::animation::AnimationOverrides;
use crate::icon::IconSet;
use crate::state::NodeState;

/// Called with the state before the node toggles and the open state it is about to enter.
pub type ToggleCallback<'a, Identifier> = Box<dyn FnMut(&NodeState<Identifier>, bool) + 'a>;
/// Called with the identity of the node when its content is selected.
pub type SelectCallback<'a, Identifier> = Box<dyn FnMut(&Identifier) + 'a>;
/// Called with the new visibility after it was changed.
pub type VisibilityCallback<'a> = Box<dyn FnMut(bool) + 'a>;
/// Returns the animation overrides for the given open state.
pub type AnimationConfigFn<'a> = Box<dyn Fn(bool) -> AnimationOverrides + 'a>;

/// Everything the caller passes to a [`TreeNode`](crate::TreeNode).
///
/// # Controlled values
///
/// `open` and `visible` seed the [`NodeState`] on construction.
/// Afterwards they only overwrite the state when [`TreeNode::update`](crate::TreeNode::update) receives a value different from the previous props.
/// Passing the same value again keeps whatever the user toggled locally.
///
/// # Nested content
///
/// Only the presence of `nested` activates the toggle.
/// Without it the toggle is shown dimmed and ignores clicks.
///
/// # Example
///
/// ```
/// # use tui_tree_node::NodeProps;
/// let props = NodeProps::new("b", "Bravo")
///     .node_type("dir")
///     .nested("Charlie\nDelta")
///     .can_hide(true)
///     .on_toggle(|state, will_be_open| {
///         println!("{} opens: {will_be_open}", state.identity());
///     });
/// ```
pub struct NodeProps<'a, Identifier> {
    pub(super) identity: Identifier,
    pub(super) open: bool,
    pub(super) visible: bool,
    pub(super) can_hide: bool,
    pub(super) style: Style,
    pub(super) content: Line<'a>,
    pub(super) node_type: Option<Line<'a>>,
    pub(super) nested: Option<Text<'a>>,
    pub(super) icons: IconSet<'a>,
    pub(super) animation_config: Option<AnimationConfigFn<'a>>,
    pub(super) on_toggle: Option<ToggleCallback<'a, Identifier>>,
    pub(super) on_select: Option<SelectCallback<'a, Identifier>>,
    pub(super) on_visibility_change: Option<VisibilityCallback<'a>>,
}

impl<'a, Identifier> NodeProps<'a, Identifier> {
    /// Create props for a closed and visible node without nested content.
    #[must_use]
    pub fn new<T>(identity: Identifier, content: T) -> Self
    where
        T: Into<Line<'a>>,
    {
        Self {
            identity,
            open: false,
            visible: true,
            can_hide: false,
            style: Style::new(),
            content: content.into(),
            node_type: None,
            nested: None,
            icons: IconSet::default(),
            animation_config: None,
            on_toggle: None,
            on_select: None,
            on_visibility_change: None,
        }
    }

    #[must_use]
    pub const fn identity(&self) -> &Identifier {
        &self.identity
    }

    #[must_use]
    pub const fn open(mut self, open: bool) -> Self {
        self.open = open;
        self
    }

    #[must_use]
    pub const fn visible(mut self, visible: bool) -> Self {
        self.visible = visible;
        self
    }

    /// Show the eye icon to toggle the visibility.
    #[must_use]
    pub const fn can_hide(mut self, can_hide: bool) -> Self {
        self.can_hide = can_hide;
        self
    }

    /// Base style of the row and the nested content. Styles of the content are patched on top.
    #[must_use]
    pub const fn style(mut self, style: Style) -> Self {
        self.style = style;
        self
    }

    /// Short label in front of the content like `dir` or `mesh`.
    #[must_use]
    pub fn node_type<T>(mut self, node_type: T) -> Self
    where
        T: Into<Line<'a>>,
    {
        self.node_type = Some(node_type.into());
        self
    }

    #[must_use]
    pub fn nested<T>(mut self, nested: T) -> Self
    where
        T: Into<Text<'a>>,
    {
        self.nested = Some(nested.into());
        self
    }

    #[must_use]
    pub const fn has_nested(&self) -> bool {
        self.nested.is_some()
    }

    #[must_use]
    pub fn icons(mut self, icons: IconSet<'a>) -> Self {
        self.icons = icons;
        self
    }

    #[must_use]
    pub fn animation_config<F>(mut self, animation_config: F) -> Self
    where
        F: Fn(bool) -> AnimationOverrides + 'a,
    {
        self.animation_config = Some(Box::new(animation_config));
        self
    }

    #[must_use]
    pub fn on_toggle<F>(mut self, on_toggle: F) -> Self
    where
        F: FnMut(&NodeState<Identifier>, bool) + 'a,
    {
        self.on_toggle = Some(Box::new(on_toggle));
        self
    }

    #[must_use]
    pub fn on_select<F>(mut self, on_select: F) -> Self
    where
        F: FnMut(&Identifier) + 'a,
    {
        self.on_select = Some(Box::new(on_select));
        self
    }

    #[must_use]
    pub fn on_visibility_change<F>(mut self, on_visibility_change: F) -> Self
    where
        F: FnMut(bool) + 'a,
    {
        self.on_visibility_change = Some(Box::new(on_visibility_change));
        self
    }

    /// The caller overrides for the given open state or the defaults.
    #[must_use]
    pub fn animation_overrides(&self, open: bool) -> AnimationOverrides {
        self.animation_config
            .as_ref()
            .map_or_else(AnimationOverrides::default, |config| config(open))
    }
}

impl<Identifier: fmt::Debug> fmt::Debug for NodeProps<'_, Identifier> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NodeProps")
            .field("identity", &self.identity)
            .field("open", &self.open)
            .field("visible", &self.visible)
            .field("can_hide", &self.can_hide)
            .field("style", &self.style)
            .field("content", &self.content)
            .field("node_type", &self.node_type)
            .field("nested", &self.nested)
            .field("icons", &self.icons)
            .finish_non_exhaustive()
    }
}

#[test]
fn defaults() {
    let props = NodeProps::new(1, "text");
    assert!(!props.open);
    assert!(props.visible);
    assert!(!props.can_hide);
    assert_eq!(props.style, Style::new());
    assert!(!props.has_nested());
    assert_eq!(props.node_type, None);
    assert_eq!(props.animation_overrides(true), AnimationOverrides::default());
}

#[test]
fn animation_config_receives_open_state() {
    let props = NodeProps::new(1, "text").animation_config(|open| AnimationOverrides {
        mass: Some(if open { 2.0 } else { 3.0 }),
        ..AnimationOverrides::default()
    });
    assert_eq!(props.animation_overrides(true).mass, Some(2.0));
    assert_eq!(props.animation_overrides(false).mass, Some(3.0));
}
