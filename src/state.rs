/// Keeps the state of a single [`TreeNode`](crate::TreeNode): whether its nested content is open, whether it is marked visible and how the next transition is animated.
///
/// The generic argument `Identifier` is the opaque identity of the node.
/// It is set once on construction and only echoed back to the callbacks of the [`NodeProps`](crate::NodeProps).
///
/// The state can not be changed directly.
/// It changes when the user toggles the node or when new props with a different `open` or `visible` value are passed to [`TreeNode::update`](crate::TreeNode::update).
///
/// # Example
///
/// ```
/// # use tui_tree_node::{NodeProps, TreeNode};
/// let node = TreeNode::new(NodeProps::new("n1", "Leaf").open(true));
/// let state = node.state();
/// assert_eq!(state.identity(), &"n1");
/// assert!(state.is_open());
/// assert!(state.is_visible());
/// assert!(!state.is_immediate());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NodeState<Identifier> {
    pub(super) identity: Identifier,
    pub(super) open: bool,
    pub(super) visible: bool,
    pub(super) immediate: bool,
}

/// Partial update of a [`NodeState`]. Fields which are `None` are kept as they are.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub(crate) struct StatePatch {
    pub open: Option<bool>,
    pub visible: Option<bool>,
    pub immediate: Option<bool>,
}

impl StatePatch {
    pub const fn is_empty(&self) -> bool {
        self.open.is_none() && self.visible.is_none() && self.immediate.is_none()
    }
}

impl<Identifier> NodeState<Identifier> {
    #[must_use]
    pub(crate) const fn new(identity: Identifier, open: bool, visible: bool) -> Self {
        Self {
            identity,
            open,
            visible,
            immediate: false,
        }
    }

    #[must_use]
    pub const fn identity(&self) -> &Identifier {
        &self.identity
    }

    /// Whether the nested content is expanded.
    #[must_use]
    pub const fn is_open(&self) -> bool {
        self.open
    }

    /// Whether the node is marked visible.
    ///
    /// This is a flag for the caller and does not suppress rendering.
    #[must_use]
    pub const fn is_visible(&self) -> bool {
        self.visible
    }

    /// Whether the next transition of the nested content snaps to its target instead of easing.
    #[must_use]
    pub const fn is_immediate(&self) -> bool {
        self.immediate
    }

    /// Apply the given fields and keep the others.
    ///
    /// Returns `true` when any field changed.
    pub(crate) fn merge(&mut self, patch: StatePatch) -> bool {
        let before = (self.open, self.visible, self.immediate);
        if let Some(open) = patch.open {
            self.open = open;
        }
        if let Some(visible) = patch.visible {
            self.visible = visible;
        }
        if let Some(immediate) = patch.immediate {
            self.immediate = immediate;
        }
        before != (self.open, self.visible, self.immediate)
    }
}

#[test]
fn new_starts_eased() {
    let state = NodeState::new("a", true, false);
    assert!(state.is_open());
    assert!(!state.is_visible());
    assert!(!state.is_immediate());
}

#[test]
fn merge_keeps_unspecified_fields() {
    let mut state = NodeState::new("a", false, true);
    let changed = state.merge(StatePatch {
        open: Some(true),
        ..StatePatch::default()
    });
    assert!(changed);
    assert!(state.is_open());
    assert!(state.is_visible());
    assert!(!state.is_immediate());
}

#[test]
fn merge_multiple_fields() {
    let mut state = NodeState::new("a", false, true);
    state.merge(StatePatch {
        open: None,
        visible: Some(false),
        immediate: Some(true),
    });
    assert_eq!(state, NodeState {
        identity: "a",
        open: false,
        visible: false,
        immediate: true,
    });
}

#[test]
fn merge_same_values_reports_unchanged() {
    let mut state = NodeState::new("a", true, true);
    assert!(!state.merge(StatePatch {
        open: Some(true),
        visible: Some(true),
        immediate: Some(false),
    }));
    assert!(!state.merge(StatePatch::default()));
    assert!(StatePatch::default().is_empty());
}
