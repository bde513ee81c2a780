//! Application state and key handling

use std::cell::RefCell;
use std::rc::Rc;
use std::time::Instant;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use dtugraph_core::config::Config;
use dtugraph_core::controller::{GraphCallbacks, GraphViewController, InteractionEvent};
use dtugraph_core::events::ViewEvent;
use dtugraph_core::graph::{GraphModel, Tier};
use dtugraph_core::render::RenderFrame;
use dtugraph_core::view::ViewIntent;
use tracing::{info, warn};

use crate::adapter::TerminalAdapter;

/// Tier toggled by each number key
pub const TIER_KEYS: [(char, Tier); 4] = [
    ('1', Tier::Regular),
    ('2', Tier::Mega),
    ('3', Tier::Hyper),
    ('4', Tier::Shadow),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputMode {
    Normal,
    /// Typing a search query
    Search,
}

pub struct App {
    controller: GraphViewController<TerminalAdapter>,
    title: String,
    cursor: Option<String>,
    /// Position in the cursor node's edge list for `e`
    edge_index: usize,
    mode: InputMode,
    status: Rc<RefCell<String>>,
    should_quit: bool,
}

impl App {
    pub fn new(model: GraphModel, config: &Config, title: impl Into<String>) -> Self {
        let status = Rc::new(RefCell::new(String::from("Press ? for keys")));

        let on_click = Rc::clone(&status);
        let on_open = Rc::clone(&status);
        let on_edge = Rc::clone(&status);
        let callbacks = GraphCallbacks::new()
            .on_node_click(move |node| {
                *on_click.borrow_mut() = format!("Selected {} ({})", node.label, node.id);
            })
            .on_node_double_click(move |node| {
                info!(node_id = %node.id, "Opening node");
                *on_open.borrow_mut() = format!("Opened {} ({})", node.label, node.id);
            })
            .on_edge_click(move |edge| {
                *on_edge.borrow_mut() = format!("Edge {} -> {}", edge.source, edge.target);
            });

        let mut controller = GraphViewController::with_config(TerminalAdapter::new(), config)
            .with_callbacks(callbacks);
        controller.set_model(model);

        Self {
            controller,
            title: title.into(),
            cursor: None,
            edge_index: 0,
            mode: InputMode::Normal,
            status,
            should_quit: false,
        }
    }

    /// The frame last presented to the terminal adapter
    pub fn frame(&self) -> &RenderFrame {
        self.controller
            .adapter()
            .frame()
            .unwrap_or_else(|| self.controller.frame())
    }

    pub fn controller(&self) -> &GraphViewController<TerminalAdapter> {
        &self.controller
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn cursor(&self) -> Option<&str> {
        self.cursor.as_deref()
    }

    pub fn mode(&self) -> InputMode {
        self.mode
    }

    pub fn status(&self) -> String {
        self.status.borrow().clone()
    }

    pub fn should_quit(&self) -> bool {
        self.should_quit
    }

    /// Periodic housekeeping: relayout deadline and event draining
    pub fn tick(&mut self, now: Instant) {
        self.controller.check_relayout_deadline(now);
        for event in self.controller.take_events() {
            match &event {
                ViewEvent::RelayoutFailed { reason, .. } => {
                    warn!(reason = %reason, "Relayout failed");
                    self.set_status(format!("Layout failed: {}", reason));
                }
                other => info!(event = other.event_type_name(), "View event"),
            }
        }
    }

    pub fn handle_key(&mut self, key: KeyEvent) {
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            self.should_quit = true;
            return;
        }
        match self.mode {
            InputMode::Normal => self.handle_normal_key(key),
            InputMode::Search => self.handle_search_key(key),
        }
    }

    fn handle_normal_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char('q') => self.should_quit = true,
            KeyCode::Right | KeyCode::Down | KeyCode::Tab | KeyCode::Char('j') => {
                self.move_cursor(1)
            }
            KeyCode::Left | KeyCode::Up | KeyCode::BackTab | KeyCode::Char('k') => {
                self.move_cursor(-1)
            }
            KeyCode::Enter => match self.cursor.clone() {
                Some(id) => self
                    .controller
                    .handle_interaction(InteractionEvent::NodeClick(id)),
                None => self
                    .controller
                    .handle_interaction(InteractionEvent::BackgroundClick),
            },
            KeyCode::Char('o') => {
                if let Some(id) = self.cursor.clone() {
                    self.controller
                        .handle_interaction(InteractionEvent::NodeDoubleClick(id));
                }
            }
            KeyCode::Char('e') => self.click_next_edge(),
            KeyCode::Esc => {
                self.cursor = None;
                self.edge_index = 0;
                self.controller.handle_interaction(InteractionEvent::HoverEnd);
                self.controller
                    .handle_interaction(InteractionEvent::BackgroundClick);
                self.set_status(String::new());
            }
            KeyCode::Char('/') => {
                self.mode = InputMode::Search;
            }
            KeyCode::Char('x') => self.dispatch(ViewIntent::ClearQuery),
            KeyCode::Char('a') => self.dispatch(ViewIntent::ShowAllTiers),
            KeyCode::Char('l') => {
                let next = self.controller.state().layout_kind.next();
                self.dispatch(ViewIntent::SetLayout(next));
                self.set_status(format!("Layout: {}", next));
            }
            KeyCode::Char('t') => self.dispatch(ViewIntent::ToggleLabels),
            KeyCode::Char('c') => {
                let visible = !self.controller.state().controls_visible;
                self.dispatch(ViewIntent::SetControlsVisible(visible));
            }
            KeyCode::Char('?') => self.set_status(
                "←/→ move  enter select  o open  e edge  / search  1-4 tiers  a all  l layout  t labels  c controls  esc clear  q quit"
                    .to_string(),
            ),
            KeyCode::Char(c) => {
                if let Some((_, tier)) = TIER_KEYS.iter().find(|(k, _)| *k == c) {
                    self.dispatch(ViewIntent::ToggleTier(*tier));
                }
            }
            _ => {}
        }
    }

    fn handle_search_key(&mut self, key: KeyEvent) {
        let mut query = self.controller.state().search_query.clone();
        match key.code {
            KeyCode::Enter => self.mode = InputMode::Normal,
            KeyCode::Esc => {
                self.mode = InputMode::Normal;
                self.dispatch(ViewIntent::ClearQuery);
            }
            KeyCode::Backspace => {
                query.pop();
                self.dispatch(ViewIntent::SetQuery(query));
            }
            KeyCode::Char(c) => {
                query.push(c);
                self.dispatch(ViewIntent::SetQuery(query));
            }
            _ => {}
        }
    }

    fn dispatch(&mut self, intent: ViewIntent) {
        self.controller.dispatch(intent);
        self.reconcile_cursor();
    }

    /// Drop the cursor when its node is no longer visible
    fn reconcile_cursor(&mut self) {
        let gone = self
            .cursor
            .as_deref()
            .is_some_and(|id| !self.controller.frame().visible.contains(id));
        if gone {
            self.cursor = None;
            self.edge_index = 0;
            self.controller.handle_interaction(InteractionEvent::HoverEnd);
        }
    }

    fn move_cursor(&mut self, step: isize) {
        let ids: Vec<String> = self
            .controller
            .frame()
            .visible
            .node_ids()
            .map(str::to_string)
            .collect();
        if ids.is_empty() {
            return;
        }

        let len = ids.len() as isize;
        let next = match self
            .cursor
            .as_deref()
            .and_then(|id| ids.iter().position(|v| v == id))
        {
            Some(current) => (current as isize + step).rem_euclid(len),
            None if step >= 0 => 0,
            None => len - 1,
        };
        let id = ids[next as usize].clone();
        self.cursor = Some(id.clone());
        self.edge_index = 0;
        self.controller
            .handle_interaction(InteractionEvent::HoverStart(id));
    }

    /// Click the edges around the cursor node in turn
    fn click_next_edge(&mut self) {
        let Some(cursor) = self.cursor.clone() else {
            return;
        };
        let visible = &self.controller.frame().visible;
        let touching: Vec<(String, String)> = visible
            .edges()
            .iter()
            .filter(|e| e.touches(&cursor))
            .map(|e| (e.source.clone(), e.target.clone()))
            .collect();
        if touching.is_empty() {
            self.set_status(format!("{} has no visible edges", cursor));
            return;
        }

        let index = self.edge_index % touching.len();
        self.edge_index = index + 1;
        let (source, target) = touching[index].clone();
        self.controller
            .handle_interaction(InteractionEvent::EdgeClick { source, target });
    }

    fn set_status(&self, message: String) {
        *self.status.borrow_mut() = message;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dtugraph_core::graph::{GraphEdge, GraphNode};
    use dtugraph_core::view::{Emphasis, LayoutKind};

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn app() -> App {
        let model = GraphModel::new(
            vec![
                GraphNode::new("A", "Alpha", Tier::Regular),
                GraphNode::new("B", "Beta", Tier::Mega),
                GraphNode::new("C", "Gamma", Tier::Hyper),
                GraphNode::new("D", "Delta", Tier::Shadow),
            ],
            vec![GraphEdge::new("A", "B"), GraphEdge::new("B", "C")],
        );
        App::new(model, &Config::default(), "test.json")
    }

    #[test]
    fn test_cursor_moves_hover() {
        let mut app = app();
        app.handle_key(key(KeyCode::Right));
        assert_eq!(app.cursor(), Some("A"));
        assert_eq!(app.controller().hover(), Some("A"));
        assert_eq!(app.frame().emphasis("C"), Emphasis::Faded);

        app.handle_key(key(KeyCode::Left));
        assert_eq!(app.cursor(), Some("D"));
        app.handle_key(key(KeyCode::Left));
        assert_eq!(app.cursor(), Some("C"));
    }

    #[test]
    fn test_enter_selects_and_reports() {
        let mut app = app();
        app.handle_key(key(KeyCode::Right));
        app.handle_key(key(KeyCode::Enter));
        assert_eq!(app.controller().state().selected_node_id(), Some("A"));
        assert_eq!(app.status(), "Selected Alpha (A)");

        app.handle_key(key(KeyCode::Esc));
        assert_eq!(app.controller().state().selected_node_id(), None);
        assert_eq!(app.cursor(), None);
    }

    #[test]
    fn test_open_does_not_select() {
        let mut app = app();
        app.handle_key(key(KeyCode::Right));
        app.handle_key(key(KeyCode::Char('o')));
        assert_eq!(app.status(), "Opened Alpha (A)");
        assert_eq!(app.controller().state().selected_node_id(), None);
    }

    #[test]
    fn test_tier_keys_toggle_and_drop_cursor() {
        let mut app = app();
        app.handle_key(key(KeyCode::Right));
        app.handle_key(key(KeyCode::Char('1')));
        assert!(!app.frame().visible.contains("A"));
        assert_eq!(app.cursor(), None);
        assert!(app.frame().highlight.is_neutral());

        app.handle_key(key(KeyCode::Char('a')));
        assert_eq!(app.frame().visible.node_count(), 4);
    }

    #[test]
    fn test_search_mode() {
        let mut app = app();
        app.handle_key(key(KeyCode::Char('/')));
        assert_eq!(app.mode(), InputMode::Search);
        for c in "gaz".chars() {
            app.handle_key(key(KeyCode::Char(c)));
        }
        assert!(app.frame().search.is_empty());
        app.handle_key(key(KeyCode::Backspace));
        assert!(app.frame().is_search_match("C"));

        // 'q' is text while searching
        app.handle_key(key(KeyCode::Char('q')));
        assert!(!app.should_quit());
        app.handle_key(key(KeyCode::Esc));
        assert_eq!(app.mode(), InputMode::Normal);
        assert!(!app.frame().search.is_active());
    }

    #[test]
    fn test_layout_cycle_and_labels() {
        let mut app = app();
        app.handle_key(key(KeyCode::Char('l')));
        assert_eq!(app.frame().layout.kind, LayoutKind::Circle);
        assert_eq!(
            app.frame().positions.as_ref().map(|p| p.kind),
            Some(LayoutKind::Circle)
        );
        app.handle_key(key(KeyCode::Char('t')));
        assert!(!app.frame().labels_visible);
    }

    #[test]
    fn test_edge_key_cycles_edges() {
        let mut app = app();
        app.handle_key(key(KeyCode::Right));
        app.handle_key(key(KeyCode::Right));
        assert_eq!(app.cursor(), Some("B"));
        app.handle_key(key(KeyCode::Char('e')));
        assert_eq!(app.status(), "Edge A -> B");
        app.handle_key(key(KeyCode::Char('e')));
        assert_eq!(app.status(), "Edge B -> C");
    }

    #[test]
    fn test_edge_key_steps_through_duplicate_edges() {
        let model = GraphModel::new(
            vec![
                GraphNode::new("A", "Alpha", Tier::Regular),
                GraphNode::new("B", "Beta", Tier::Regular),
                GraphNode::new("C", "Gamma", Tier::Regular),
            ],
            vec![
                GraphEdge::new("A", "B"),
                GraphEdge::new("B", "A"),
                GraphEdge::new("A", "C"),
            ],
        );
        let mut app = App::new(model, &Config::default(), "dupes.json");
        app.handle_key(key(KeyCode::Right));
        assert_eq!(app.cursor(), Some("A"));

        let mut seen = Vec::new();
        for _ in 0..4 {
            app.handle_key(key(KeyCode::Char('e')));
            seen.push(app.status());
        }
        assert_eq!(seen, ["Edge A -> B", "Edge B -> A", "Edge A -> C", "Edge A -> B"]);

        // Moving the cursor starts over at the first edge
        app.handle_key(key(KeyCode::Right));
        app.handle_key(key(KeyCode::Char('e')));
        assert_eq!(app.status(), "Edge A -> B");
    }

    #[test]
    fn test_quit_keys() {
        let mut app = app();
        app.handle_key(KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL));
        assert!(app.should_quit());

        let mut app = self::app();
        app.handle_key(key(KeyCode::Char('q')));
        assert!(app.should_quit());
    }

    #[test]
    fn test_tick_drains_events() {
        let mut app = app();
        app.tick(Instant::now());
        assert!(app.controller().events().is_empty());
    }
}
