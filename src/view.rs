use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span, Text};
use unicode_width::UnicodeWidthStr;

use crate::animation::{Keyframe, Transition};
use crate::icon::IconRole;
use crate::props::NodeProps;
use crate::state::NodeState;

/// Opacity of the toggle of a node without nested content.
pub const INERT_OPACITY: f32 = 0.3;
/// Opacity of the eye icon of a hidden node.
pub const HIDDEN_OPACITY: f32 = 0.4;
/// Nested content below this opacity is rendered dimmed.
const DIM_BELOW: f32 = 0.5;

/// Columns between the left edge and the nested content. The first one holds the guide.
pub const NESTED_INDENT: u16 = 2;
const NESTED_GUIDE: &str = "\u{254e}"; // Dashed vertical line

#[derive(Debug, Clone, PartialEq)]
pub struct IconView<'a> {
    pub role: IconRole,
    pub glyph: Span<'a>,
    pub opacity: f32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NestedView<'a> {
    pub content: Option<Text<'a>>,
    pub transition: Transition,
}

/// What a [`TreeNode`](crate::TreeNode) shows, derived from its state and props by [`project`].
#[derive(Debug, Clone, PartialEq)]
pub struct NodeView<'a> {
    pub style: Style,
    pub toggle: IconView<'a>,
    pub node_type: Option<Line<'a>>,
    pub eye: Option<IconView<'a>>,
    pub content: Line<'a>,
    /// Always present, also while closed, so the collapse can be animated.
    pub nested: NestedView<'a>,
}

/// Areas of the last render. Used to route clicks.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct HitAreas {
    pub toggle: Rect,
    pub eye: Option<Rect>,
    pub content: Rect,
    pub nested: Rect,
}

/// Derive the [`NodeView`] of a node.
#[must_use]
pub fn project<'a, Identifier>(
    state: &NodeState<Identifier>,
    props: &NodeProps<'a, Identifier>,
) -> NodeView<'a> {
    let has_nested = props.has_nested();
    let toggle_role = match (has_nested, state.open) {
        (false, _) => IconRole::Close,
        (true, false) => IconRole::Expand,
        (true, true) => IconRole::Collapse,
    };
    let toggle = IconView {
        role: toggle_role,
        glyph: props.icons.resolve_or_placeholder(toggle_role),
        opacity: if has_nested { 1.0 } else { INERT_OPACITY },
    };

    let eye = props.can_hide.then(|| IconView {
        role: IconRole::Eye,
        glyph: props.icons.resolve_or_placeholder(IconRole::Eye),
        opacity: if state.visible { 1.0 } else { HIDDEN_OPACITY },
    });

    let transition = props
        .animation_overrides(state.open)
        .transition(state.open, state.immediate);

    NodeView {
        style: props.style,
        toggle,
        node_type: props.node_type.clone(),
        eye,
        content: props.content.clone(),
        nested: NestedView {
            content: props.nested.clone(),
            transition,
        },
    }
}

fn opacity_style(opacity: f32) -> Style {
    if opacity < 1.0 {
        Style::new().add_modifier(Modifier::DIM)
    } else {
        Style::new()
    }
}

/// Rows of the nested content shown at the given height share.
#[must_use]
#[allow(
    clippy::cast_possible_truncation,
    clippy::cast_precision_loss,
    clippy::cast_sign_loss
)]
pub fn visible_rows(intrinsic: usize, height: f32) -> u16 {
    let rows = (height.clamp(0.0, 1.0) * intrinsic as f32).ceil() as usize;
    u16::try_from(rows).unwrap_or(u16::MAX)
}

impl NodeView<'_> {
    /// Render into the area with the nested content at the given animation frame.
    ///
    /// The row takes the first line, the nested content the lines below.
    pub fn render(&self, frame: Keyframe, area: Rect, buf: &mut Buffer) -> HitAreas {
        let mut hit_areas = HitAreas::default();
        if area.width < 1 || area.height < 1 {
            return hit_areas;
        }

        let y = area.y;
        let right = area.right();
        let mut x = area.x;
        buf.set_style(Rect::new(area.x, y, area.width, 1), self.style);

        let set_span = |x: u16, span: &Span, buf: &mut Buffer, style: Style| -> Rect {
            let max_width = right.saturating_sub(x);
            let span = Span::styled(span.content.as_ref(), span.style.patch(style));
            let (after_x, _) = buf.set_span(x, y, &span, max_width);
            Rect::new(x, y, after_x.saturating_sub(x), 1)
        };

        hit_areas.toggle = set_span(x, &self.toggle.glyph, buf, opacity_style(self.toggle.opacity));
        x = hit_areas.toggle.right().saturating_add(1).min(right);

        if let Some(node_type) = &self.node_type {
            if node_type.width() > 0 {
                let (after_x, _) = buf.set_line(x, y, node_type, right.saturating_sub(x));
                x = after_x.saturating_add(1).min(right);
            }
        }

        if let Some(eye) = &self.eye {
            let eye_area = set_span(x, &eye.glyph, buf, opacity_style(eye.opacity));
            x = eye_area.right().saturating_add(1).min(right);
            hit_areas.eye = Some(eye_area);
        }

        let (after_x, _) = buf.set_line(x, y, &self.content, right.saturating_sub(x));
        hit_areas.content = Rect::new(x, y, after_x.saturating_sub(x), 1);

        hit_areas.nested = self.render_nested(frame, area, buf);
        hit_areas
    }

    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    fn render_nested(&self, frame: Keyframe, area: Rect, buf: &mut Buffer) -> Rect {
        let intrinsic = self.nested.content.as_ref().map_or(0, Text::height);
        let rows = visible_rows(intrinsic, frame.height).min(area.height.saturating_sub(1));
        let offset = frame.offset.max(0.0).round().min(f32::from(u16::MAX)) as u16;
        let x = area
            .x
            .saturating_add(NESTED_INDENT)
            .saturating_add(offset)
            .min(area.right());
        let nested_area = Rect {
            x,
            y: area.y.saturating_add(1),
            width: area.right().saturating_sub(x),
            height: rows,
        };

        let threshold = self.nested.transition.config.rest_displacement_threshold;
        let Some(content) = &self.nested.content else {
            return nested_area;
        };
        if rows == 0 || frame.opacity <= threshold {
            return nested_area;
        }

        buf.set_style(Rect::new(area.x, nested_area.y, area.width, rows), self.style);
        let style = if frame.opacity < DIM_BELOW {
            Style::new().add_modifier(Modifier::DIM)
        } else {
            Style::new()
        };
        for row in 0..rows {
            buf.set_stringn(area.x, nested_area.y + row, NESTED_GUIDE, 1, style);
        }
        for (row, line) in content.lines.iter().take(rows as usize).enumerate() {
            let y = nested_area.y + row as u16;
            buf.set_line(nested_area.x, y, line, nested_area.width);
        }
        buf.set_style(nested_area, style);
        nested_area
    }
}

#[must_use]
pub(crate) const fn contains(area: Rect, column: u16, row: u16) -> bool {
    column >= area.x
        && column < area.x.saturating_add(area.width)
        && row >= area.y
        && row < area.y.saturating_add(area.height)
}

#[must_use]
pub(crate) fn row_width(view: &NodeView) -> usize {
    let gap = |width: usize| if width > 0 { width + 1 } else { 0 };
    gap(view.toggle.glyph.content.width())
        + view.node_type.as_ref().map_or(0, |line| gap(line.width()))
        + view.eye.as_ref().map_or(0, |eye| gap(eye.glyph.content.width()))
        + view.content.width()
}

#[cfg(test)]
mod tests {
    use ratatui::style::Color;

    use super::*;
    use crate::icon::{IconSet, PLACEHOLDER_GLYPH};

    fn state(open: bool, visible: bool) -> NodeState<&'static str> {
        NodeState::new("n", open, visible)
    }

    /// Strips styles after render
    #[must_use]
    #[track_caller]
    fn render(view: &NodeView, frame: Keyframe, width: u16, height: u16) -> (Buffer, HitAreas) {
        let area = Rect::new(0, 0, width, height);
        let mut buffer = Buffer::empty(area);
        let hit_areas = view.render(frame, area, &mut buffer);
        buffer.set_style(area, Style::reset());
        (buffer, hit_areas)
    }

    #[test]
    fn toggle_role_follows_nested_and_open() {
        let leaf = NodeProps::new("n", "Leaf");
        let view = project(&state(true, true), &leaf);
        assert_eq!(view.toggle.role, IconRole::Close);
        assert!((view.toggle.opacity - INERT_OPACITY).abs() < f32::EPSILON);

        let branch = NodeProps::new("n", "Branch").nested("child");
        let closed = project(&state(false, true), &branch);
        assert_eq!(closed.toggle.role, IconRole::Expand);
        assert!((closed.toggle.opacity - 1.0).abs() < f32::EPSILON);
        let open = project(&state(true, true), &branch);
        assert_eq!(open.toggle.role, IconRole::Collapse);
    }

    #[test]
    fn eye_only_when_can_hide() {
        let props = NodeProps::new("n", "Leaf");
        assert_eq!(project(&state(false, true), &props).eye, None);

        let props = props.can_hide(true);
        let shown = project(&state(false, true), &props).eye.unwrap();
        assert!((shown.opacity - 1.0).abs() < f32::EPSILON);
        let hidden = project(&state(true, false), &props).eye.unwrap();
        assert!((hidden.opacity - HIDDEN_OPACITY).abs() < f32::EPSILON);
    }

    #[test]
    fn transition_targets_open_state_and_mode() {
        let props = NodeProps::new("n", "Branch").nested("child");
        let mut current = state(true, true);
        current.immediate = true;
        let view = project(&current, &props);
        assert_eq!(view.nested.transition.to, Keyframe::EXPANDED);
        assert!(view.nested.transition.immediate);
    }

    #[test]
    fn unknown_glyph_renders_placeholder() {
        let props = NodeProps::new("n", "Leaf").icons(IconSet::default().close("Nope"));
        let view = project(&state(false, true), &props);
        assert_eq!(view.toggle.glyph, Span::raw(PLACEHOLDER_GLYPH));
    }

    #[test]
    fn render_leaf_row() {
        let props = NodeProps::new("n", "Leaf").node_type("obj").can_hide(true);
        let view = project(&state(false, true), &props);
        let (buffer, hit_areas) = render(&view, Keyframe::collapsed(2.0), 14, 2);
        let expected = Buffer::with_lines(["⊠ obj ◉ Leaf  ", "              "]);
        assert_eq!(buffer, expected);
        assert_eq!(hit_areas.toggle, Rect::new(0, 0, 1, 1));
        assert_eq!(hit_areas.eye, Some(Rect::new(6, 0, 1, 1)));
        assert_eq!(hit_areas.content, Rect::new(8, 0, 4, 1));
        assert_eq!(row_width(&view), 12);
    }

    #[test]
    fn style_is_base_of_row_and_nested() {
        let base = Style::new().fg(Color::Red);
        let props = NodeProps::new("n", Line::styled("Root", Style::new().fg(Color::Blue)))
            .style(base)
            .nested("Alfa");
        let view = project(&state(true, true), &props);
        let area = Rect::new(0, 0, 8, 3);
        let mut buffer = Buffer::empty(area);
        view.render(Keyframe::EXPANDED, area, &mut buffer);

        let mut expected = Buffer::with_lines(["⊟ Root  ", "╎ Alfa  ", "        "]);
        expected.set_style(Rect::new(0, 0, 8, 2), base);
        expected.set_style(Rect::new(2, 0, 4, 1), Style::new().fg(Color::Blue));
        assert_eq!(buffer, expected);
    }

    #[test]
    fn empty_type_takes_no_space() {
        let props = NodeProps::new("n", "Leaf").node_type("");
        let view = project(&state(false, true), &props);
        let (buffer, _) = render(&view, Keyframe::collapsed(2.0), 8, 1);
        assert_eq!(buffer, Buffer::with_lines(["⊠ Leaf  "]));
    }

    #[test]
    fn render_expanded_nested() {
        let props = NodeProps::new("n", "Root").nested("Alfa\nBravo");
        let view = project(&state(true, true), &props);
        let (buffer, hit_areas) = render(&view, Keyframe::EXPANDED, 9, 4);
        let expected = Buffer::with_lines([
            "⊟ Root   ",
            "╎ Alfa   ",
            "╎ Bravo  ",
            "         ",
        ]);
        assert_eq!(buffer, expected);
        assert_eq!(hit_areas.nested, Rect::new(2, 1, 7, 2));
    }

    #[test]
    fn render_half_collapsed_nested_is_clipped_and_shifted() {
        let props = NodeProps::new("n", "Root").nested("Alfa\nBravo\nCharlie\nDelta");
        let view = project(&state(false, true), &props);
        let frame = Keyframe {
            height: 0.5,
            opacity: 0.6,
            offset: 1.0,
        };
        let (buffer, hit_areas) = render(&view, frame, 10, 4);
        let expected = Buffer::with_lines([
            "⊞ Root    ",
            "╎  Alfa   ",
            "╎  Bravo  ",
            "          ",
        ]);
        assert_eq!(buffer, expected);
        assert_eq!(hit_areas.nested, Rect::new(3, 1, 7, 2));
    }

    #[test]
    fn render_collapsed_nested_keeps_wrapper() {
        let props = NodeProps::new("n", "Root").nested("Alfa");
        let view = project(&state(false, true), &props);
        let (buffer, hit_areas) = render(&view, Keyframe::collapsed(2.0), 8, 2);
        assert_eq!(buffer, Buffer::with_lines(["⊞ Root  ", "        "]));
        assert_eq!(hit_areas.nested, Rect::new(4, 1, 4, 0));
    }

    #[test]
    fn render_nothing_in_empty_area() {
        let props = NodeProps::new("n", "Root");
        let view = project(&state(false, true), &props);
        let (buffer, hit_areas) = render(&view, Keyframe::EXPANDED, 0, 0);
        assert_eq!(buffer, Buffer::empty(Rect::default()));
        assert_eq!(hit_areas, HitAreas::default());
    }

    #[test]
    fn visible_rows_rounds_up() {
        assert_eq!(visible_rows(4, 0.0), 0);
        assert_eq!(visible_rows(4, 0.1), 1);
        assert_eq!(visible_rows(4, 1.0), 4);
        assert_eq!(visible_rows(4, 1.2), 4);
        assert_eq!(visible_rows(0, 1.0), 0);
    }

    #[test]
    fn contains_is_exclusive_at_the_end() {
        let area = Rect::new(2, 1, 3, 1);
        assert!(contains(area, 2, 1));
        assert!(contains(area, 4, 1));
        assert!(!contains(area, 5, 1));
        assert!(!contains(area, 2, 2));
        assert!(!contains(Rect::default(), 0, 0));
    }
}
