use std::time::{Duration, Instant};

use crossterm::event::{Event, KeyCode, MouseButton, MouseEventKind};
use ratatui::backend::{Backend, CrosstermBackend};
use ratatui::layout::Rect;
use ratatui::widgets::{Block, Paragraph};
use ratatui::Terminal;

use tui_tree_node::{IconSet, NodeProps, TreeNode};

const FRAME: Duration = Duration::from_millis(16);

struct App<'a> {
    root: TreeNode<'a, &'static str>,
    children: Vec<TreeNode<'a, &'static str>>,
    last_event: String,
}

impl<'a> App<'a> {
    fn new() -> Self {
        let children = [("c", "Charlie", true), ("d", "Delta", false), ("e", "Echo", true)]
            .into_iter()
            .map(|(identity, text, has_nested)| {
                let props = NodeProps::new(identity, text).node_type("item").can_hide(true);
                let props = if has_nested {
                    props.nested("Foxtrot\nGolf")
                } else {
                    props
                };
                TreeNode::new(props)
            })
            .collect::<Vec<_>>();

        // The nested content only reserves lines, the children are rendered on top of it
        let placeholder = "\n".repeat(children.len() * 3);
        let root = TreeNode::new(
            NodeProps::new("b", "Bravo")
                .node_type("dir")
                .icons(IconSet::default().expand("ArrowRight").collapse("ArrowDown"))
                .nested(placeholder)
                .open(true),
        );

        Self {
            root,
            children,
            last_event: String::new(),
        }
    }

    fn nodes_mut(&mut self) -> impl Iterator<Item = &mut TreeNode<'a, &'static str>> {
        std::iter::once(&mut self.root).chain(self.children.iter_mut())
    }
}

fn main() -> std::io::Result<()> {
    // Terminal initialization
    crossterm::terminal::enable_raw_mode()?;
    let mut stdout = std::io::stdout();
    crossterm::execute!(
        stdout,
        crossterm::terminal::EnterAlternateScreen,
        crossterm::event::EnableMouseCapture
    )?;
    let mut terminal = Terminal::new(CrosstermBackend::new(stdout))?;

    // App
    let app = App::new();
    let res = run_app(&mut terminal, app);

    // restore terminal
    crossterm::terminal::disable_raw_mode()?;
    crossterm::execute!(
        terminal.backend_mut(),
        crossterm::terminal::LeaveAlternateScreen,
        crossterm::event::DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    if let Err(err) = res {
        println!("{err:?}");
    }

    Ok(())
}

fn run_app<B: Backend>(terminal: &mut Terminal<B>, mut app: App) -> std::io::Result<()> {
    let mut last_frame = Instant::now();
    loop {
        terminal.draw(|frame| {
            let area = frame.size();
            let block = Block::bordered()
                .title("Tree Node")
                .title_bottom(app.last_event.as_str());
            let inner = block.inner(area);
            frame.render_widget(block, area);
            frame.render_widget(&mut app.root, inner);

            let nested = app.root.nested_area();
            let mut y = nested.y;
            for child in &mut app.children {
                let height = u16::try_from(child.height()).unwrap_or(u16::MAX);
                let bottom = nested.y.saturating_add(nested.height);
                if y >= bottom {
                    // Not shown this frame, so it must not react to clicks
                    child.clear_hit_areas();
                    continue;
                }
                let child_area = Rect::new(nested.x, y, nested.width, height.min(bottom - y));
                frame.render_widget(child, child_area);
                y = y.saturating_add(height);
            }

            if nested.height == 0 {
                frame.render_widget(
                    Paragraph::new("q: quit, click icons to toggle"),
                    Rect::new(inner.x, inner.y + 1, inner.width, 1).intersection(inner),
                );
            }
        })?;

        if crossterm::event::poll(FRAME)? {
            match crossterm::event::read()? {
                Event::Key(key) if key.code == KeyCode::Char('q') => return Ok(()),
                Event::Mouse(mouse) if mouse.kind == MouseEventKind::Down(MouseButton::Left) => {
                    let hit = app
                        .nodes_mut()
                        .find_map(|node| {
                            node.click(mouse.column, mouse.row)
                                .map(|target| (*node.state().identity(), target, node.state().clone()))
                        });
                    if let Some((identity, target, state)) = hit {
                        app.last_event = format!(
                            "{identity}: {target:?} open={} visible={}",
                            state.is_open(),
                            state.is_visible()
                        );
                    }
                }
                _ => {}
            }
        }

        let dt = last_frame.elapsed();
        last_frame = Instant::now();
        for node in app.nodes_mut() {
            node.tick(dt);
        }
    }
}
