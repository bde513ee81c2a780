//! Ratatui widget that draws a render frame on a canvas
//!
//! Edges are drawn as braille lines, nodes as tier glyphs with optional
//! labels. Hover emphasis, search matches, selection and the keyboard
//! cursor each have their own styling and never replace one another.

use dtugraph_core::graph::GraphNode;
use dtugraph_core::render::{Position, RenderFrame};
use dtugraph_core::view::Emphasis;
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Modifier, Style},
    symbols::Marker,
    text::{Line, Span},
    widgets::{
        Block, Paragraph, Widget,
        canvas::{Canvas, Line as EdgeLine},
    },
};

/// Color scheme for the graph canvas
#[derive(Debug, Clone)]
pub struct CanvasColors {
    /// Edges in the neutral state or inside the focused neighborhood
    pub edge: Color,
    /// Edges touching a faded node
    pub edge_faded: Color,
    /// Nodes outside the focused neighborhood
    pub faded: Color,
    /// Search match marker
    pub search: Color,
    /// Fallback when a tier color can't be parsed
    pub fallback: Color,
    /// Placeholder text
    pub hint: Color,
}

impl Default for CanvasColors {
    fn default() -> Self {
        Self {
            edge: Color::Gray,
            edge_faded: Color::Rgb(60, 60, 60),
            faded: Color::DarkGray,
            search: Color::Yellow,
            fallback: Color::Gray,
            hint: Color::DarkGray,
        }
    }
}

/// Widget for drawing the visible subset at its layout positions
pub struct GraphCanvas<'a> {
    frame: &'a RenderFrame,
    cursor: Option<&'a str>,
    colors: CanvasColors,
    block: Option<Block<'a>>,
}

impl<'a> GraphCanvas<'a> {
    pub fn new(frame: &'a RenderFrame) -> Self {
        Self {
            frame,
            cursor: None,
            colors: CanvasColors::default(),
            block: None,
        }
    }

    /// Mark the node under the keyboard cursor
    pub fn cursor(mut self, cursor: Option<&'a str>) -> Self {
        self.cursor = cursor;
        self
    }

    pub fn colors(mut self, colors: CanvasColors) -> Self {
        self.colors = colors;
        self
    }

    pub fn block(mut self, block: Block<'a>) -> Self {
        self.block = Some(block);
        self
    }

    fn node_line(&self, node: &GraphNode) -> Line<'static> {
        let frame = self.frame;
        let visual = frame.visual(&node.id);
        let tier_color = visual
            .and_then(|v| v.color.parse::<Color>().ok())
            .unwrap_or(self.colors.fallback);

        let mut style = match frame.emphasis(&node.id) {
            Emphasis::Neutral => Style::default().fg(tier_color),
            Emphasis::Focused => Style::default()
                .fg(tier_color)
                .add_modifier(Modifier::BOLD),
            Emphasis::Faded => Style::default().fg(self.colors.faded),
        };
        if visual.is_some_and(|v| v.opacity < 1.0) {
            style = style.add_modifier(Modifier::DIM);
        }
        if frame.is_selected(&node.id) {
            style = style.add_modifier(Modifier::REVERSED);
        }

        let glyph = match visual.map(|v| v.rank).unwrap_or(0) {
            2 => "◉",
            1 => "●",
            _ => "•",
        };
        let mut text = if frame.labels_visible {
            format!("{} {}", glyph, node.label)
        } else {
            glyph.to_string()
        };
        if self.cursor == Some(node.id.as_str()) {
            text = format!("[{}]", text);
        }

        let mut spans = vec![Span::styled(text, style)];
        if frame.is_search_match(&node.id) {
            spans.push(Span::styled(
                "*",
                Style::default()
                    .fg(self.colors.search)
                    .add_modifier(Modifier::BOLD),
            ));
        }
        Line::from(spans)
    }

    fn edge_color(&self, source: &str, target: &str) -> Color {
        let highlight = &self.frame.highlight;
        if highlight.is_faded(source) || highlight.is_faded(target) {
            self.colors.edge_faded
        } else {
            self.colors.edge
        }
    }

    fn placeholder(self, message: &str, area: Rect, buf: &mut Buffer) {
        let mut paragraph =
            Paragraph::new(message.to_string()).style(Style::default().fg(self.colors.hint));
        if let Some(block) = self.block {
            paragraph = paragraph.block(block);
        }
        paragraph.render(area, buf);
    }
}

/// Canvas bounds around `points`, with extra room on the right for labels
fn bounds(points: &[Position]) -> ([f64; 2], [f64; 2]) {
    let Some(first) = points.first() else {
        return ([-1.0, 1.0], [-1.0, 1.0]);
    };
    let (mut min_x, mut max_x) = (first.x as f64, first.x as f64);
    let (mut min_y, mut max_y) = (first.y as f64, first.y as f64);
    for p in points {
        min_x = min_x.min(p.x as f64);
        max_x = max_x.max(p.x as f64);
        min_y = min_y.min(p.y as f64);
        max_y = max_y.max(p.y as f64);
    }
    let span_x = (max_x - min_x).max(50.0);
    let span_y = (max_y - min_y).max(50.0);
    (
        [min_x - span_x * 0.1, max_x + span_x * 0.35],
        [min_y - span_y * 0.15, max_y + span_y * 0.15],
    )
}

impl Widget for GraphCanvas<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let frame = self.frame;
        if frame.visible.is_empty() {
            self.placeholder("No visible nodes. Press a to show all tiers.", area, buf);
            return;
        }
        let Some(positions) = frame.positions.as_deref() else {
            let message = if frame.relayout_pending.is_some() {
                "Computing layout..."
            } else {
                "No layout yet"
            };
            self.placeholder(message, area, buf);
            return;
        };

        let placed: Vec<(Line<'static>, Position)> = frame
            .visible
            .nodes()
            .iter()
            .filter_map(|node| Some((self.node_line(node), positions.get(&node.id)?)))
            .collect();
        let edges: Vec<(Position, Position, Color)> = frame
            .visible
            .edges()
            .iter()
            .filter_map(|edge| {
                let a = positions.get(&edge.source)?;
                let b = positions.get(&edge.target)?;
                Some((a, b, self.edge_color(&edge.source, &edge.target)))
            })
            .collect();
        let points: Vec<Position> = placed.iter().map(|(_, p)| *p).collect();
        let (x_bounds, y_bounds) = bounds(&points);

        let mut canvas = Canvas::default()
            .marker(Marker::Braille)
            .x_bounds(x_bounds)
            .y_bounds(y_bounds)
            .paint(move |ctx| {
                for (a, b, color) in &edges {
                    ctx.draw(&EdgeLine::new(
                        a.x as f64, a.y as f64, b.x as f64, b.y as f64, *color,
                    ));
                }
                ctx.layer();
                for (line, p) in &placed {
                    ctx.print(p.x as f64, p.y as f64, line.clone());
                }
            });
        if let Some(block) = self.block {
            canvas = canvas.block(block);
        }
        canvas.render(area, buf);
    }
}
