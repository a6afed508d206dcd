#![forbid(unsafe_code)]
#![warn(clippy::pedantic, clippy::nursery)]

/*!
Widget showing one node of a collapsible tree.

A [`TreeNode`] renders a single row (toggle icon, optional type label, optional eye icon and the content) and animates the reveal of its nested content below.
The caller builds the tree by passing [`NodeProps`] and renders child nodes into the [`nested_area`](TreeNode::nested_area).

The open and visible flags live in the [`NodeState`] of the node.
They are seeded by the props, toggled by the user and only overwritten by new props when the caller actually changes them.
*/

use std::fmt;
use std::time::Duration;

use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::widgets::Widget;

mod animation;
mod icon;
mod props;
mod state;
mod view;

pub use crate::animation::{
    AnimationOverrides, Animator, Keyframe, PartialKeyframe, Spring, SpringConfig, Transition,
    DEFAULT_OUTSET,
};
pub use crate::icon::{glyph, GlyphRef, IconError, IconRole, IconSet, PLACEHOLDER_GLYPH};
pub use crate::props::{
    AnimationConfigFn, NodeProps, SelectCallback, ToggleCallback, VisibilityCallback,
};
pub use crate::state::NodeState;
pub use crate::view::{
    project, visible_rows, HitAreas, IconView, NestedView, NodeView, HIDDEN_OPACITY,
    INERT_OPACITY, NESTED_INDENT,
};

use crate::state::StatePatch;

/// What a click passed to [`TreeNode::click`] hit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClickTarget {
    Toggle,
    Eye,
    Content,
}

/// A live node of a tree.
///
/// Keeps the [`NodeState`], the props of the last update and the [`Animator`] of the nested content.
/// Dropping the node cancels its animation.
///
/// # Example
///
/// ```
/// # use tui_tree_node::{NodeProps, TreeNode};
/// # use ratatui::backend::TestBackend;
/// # use ratatui::Terminal;
/// # let mut terminal = Terminal::new(TestBackend::new(32, 32)).unwrap();
/// let mut node = TreeNode::new(NodeProps::new("b", "Bravo").nested("Charlie\nDelta"));
/// node.toggle_expansion();
///
/// terminal.draw(|frame| {
///     let area = frame.size();
///     frame.render_widget(&mut node, area);
/// })?;
/// # Ok::<(), std::io::Error>(())
/// ```
pub struct TreeNode<'a, Identifier> {
    state: NodeState<Identifier>,
    props: NodeProps<'a, Identifier>,
    animator: Box<dyn Animator + 'a>,
    hit_areas: HitAreas,
    /// Last transition handed to the animator.
    submitted: Option<Transition>,
}

impl<'a, Identifier> TreeNode<'a, Identifier>
where
    Identifier: Clone,
{
    /// Mount a node animated by a [`Spring`].
    #[must_use]
    pub fn new(props: NodeProps<'a, Identifier>) -> Self {
        Self::with_animator(props, Spring::default())
    }

    /// Mount a node animated by the given [`Animator`].
    ///
    /// The animator receives the first transition right away.
    #[must_use]
    pub fn with_animator<A>(props: NodeProps<'a, Identifier>, animator: A) -> Self
    where
        A: Animator + 'a,
    {
        let state = NodeState::new(props.identity.clone(), props.open, props.visible);
        let mut node = Self {
            state,
            props,
            animator: Box::new(animator),
            hit_areas: HitAreas::default(),
            submitted: None,
        };
        node.retarget();
        node
    }
}

impl<'a, Identifier> TreeNode<'a, Identifier> {
    #[must_use]
    pub const fn state(&self) -> &NodeState<Identifier> {
        &self.state
    }

    #[must_use]
    pub const fn props(&self) -> &NodeProps<'a, Identifier> {
        &self.props
    }

    /// Current values of the nested content animation.
    #[must_use]
    pub fn frame(&self) -> Keyframe {
        self.animator.frame()
    }

    #[must_use]
    pub fn is_animating(&self) -> bool {
        self.animator.is_running()
    }

    /// Pass new props from the caller.
    ///
    /// `open` and `visible` are compared with the previous props, not with the state.
    /// Only a value which differs from the previous props overwrites the state.
    /// The identity of the new props is ignored as it is fixed on construction.
    ///
    /// The animator is retargeted when the state or the animation config results in a different transition.
    ///
    /// Returns `true` when the state changed.
    pub fn update(&mut self, props: NodeProps<'a, Identifier>) -> bool {
        let patch = StatePatch {
            open: (props.open != self.props.open).then_some(props.open),
            visible: (props.visible != self.props.visible).then_some(props.visible),
            immediate: None,
        };
        self.props = props;

        let changed = !patch.is_empty() && self.state.merge(patch);
        if changed {
            tracing::debug!(
                target: "tui_tree_node",
                open = ?patch.open,
                visible = ?patch.visible,
                "controlled props changed"
            );
        }
        if self.submitted != Some(self.transition()) {
            self.retarget();
        }
        changed
    }

    /// Expand or collapse the nested content.
    ///
    /// Does nothing without nested content.
    /// Otherwise `on_toggle` is called with the current state and the open state the node is about to enter.
    /// Afterwards the node toggles and eases into the new state.
    ///
    /// Returns `true` when the node toggled.
    pub fn toggle_expansion(&mut self) -> bool {
        if !self.props.has_nested() {
            return false;
        }

        let will_be_open = !self.state.open;
        if let Some(on_toggle) = self.props.on_toggle.as_mut() {
            on_toggle(&self.state, will_be_open);
        }
        tracing::debug!(target: "tui_tree_node", open = will_be_open, "toggle expansion");
        self.state.merge(StatePatch {
            open: Some(will_be_open),
            immediate: Some(false),
            ..StatePatch::default()
        });
        self.retarget();
        true
    }

    /// Mark the node as visible or hidden.
    ///
    /// Works even when the eye icon is not shown.
    /// The nested content snaps instead of easing.
    /// `on_visibility_change` is called after the state changed.
    ///
    /// Returns `true` as it always changes the visibility.
    pub fn toggle_visibility(&mut self) -> bool {
        let visible = !self.state.visible;
        tracing::debug!(target: "tui_tree_node", visible, "toggle visibility");
        self.state.merge(StatePatch {
            visible: Some(visible),
            immediate: Some(true),
            ..StatePatch::default()
        });
        self.retarget();
        if let Some(on_visibility_change) = self.props.on_visibility_change.as_mut() {
            on_visibility_change(visible);
        }
        true
    }

    /// Notify `on_select` with the identity. Does not change the state.
    pub fn select_content(&mut self) {
        if let Some(on_select) = self.props.on_select.as_mut() {
            on_select(&self.state.identity);
        }
    }

    /// Route a click at the given terminal position to the element rendered there on the last render.
    ///
    /// Returns what was hit. The inert toggle of a node without nested content still counts as hit.
    pub fn click(&mut self, column: u16, row: u16) -> Option<ClickTarget> {
        let hit_areas = self.hit_areas;
        if view::contains(hit_areas.toggle, column, row) {
            self.toggle_expansion();
            Some(ClickTarget::Toggle)
        } else if hit_areas
            .eye
            .is_some_and(|eye| view::contains(eye, column, row))
        {
            self.toggle_visibility();
            Some(ClickTarget::Eye)
        } else if view::contains(hit_areas.content, column, row) {
            self.select_content();
            Some(ClickTarget::Content)
        } else {
            None
        }
    }

    /// Advance the animation of the nested content.
    ///
    /// Call this once per frame. Returns `true` while the animation still moves.
    pub fn tick(&mut self, dt: Duration) -> bool {
        self.animator.tick(dt)
    }

    /// Area of the nested content on the last render.
    ///
    /// Render child nodes into this area to build a tree.
    /// Its height follows the animation and is zero while collapsed.
    #[must_use]
    pub const fn nested_area(&self) -> Rect {
        self.hit_areas.nested
    }

    #[must_use]
    pub const fn hit_areas(&self) -> &HitAreas {
        &self.hit_areas
    }

    /// Forget the areas of the last render.
    ///
    /// Call this when the node is not rendered in a frame so clicks do not hit where it was before.
    pub fn clear_hit_areas(&mut self) {
        self.hit_areas = HitAreas::default();
    }

    /// Lines needed right now: the row and the currently shown part of the nested content.
    #[must_use]
    pub fn height(&self) -> usize {
        let intrinsic = self.props.nested.as_ref().map_or(0, ratatui::text::Text::height);
        1 + usize::from(visible_rows(intrinsic, self.frame().height))
    }

    /// Columns the row needs.
    #[must_use]
    pub fn width(&self) -> usize {
        view::row_width(&project(&self.state, &self.props))
    }

    /// Stop the animation and drop the node.
    pub fn unmount(self) {
        drop(self);
    }

    fn transition(&self) -> Transition {
        self.props
            .animation_overrides(self.state.open)
            .transition(self.state.open, self.state.immediate)
    }

    fn retarget(&mut self) {
        let transition = self.transition();
        self.animator.animate(&transition);
        self.submitted = Some(transition);
    }
}

impl<Identifier> Drop for TreeNode<'_, Identifier> {
    fn drop(&mut self) {
        self.animator.cancel();
    }
}

impl<Identifier: fmt::Debug> fmt::Debug for TreeNode<'_, Identifier> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TreeNode")
            .field("state", &self.state)
            .field("props", &self.props)
            .field("frame", &self.frame())
            .field("hit_areas", &self.hit_areas)
            .finish_non_exhaustive()
    }
}

impl<Identifier> Widget for &mut TreeNode<'_, Identifier> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let view = project(&self.state, &self.props);
        self.hit_areas = view.render(self.animator.frame(), area, buf);
    }
}
