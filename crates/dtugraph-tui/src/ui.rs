//! Screen layout: header, graph canvas, details panel and footer

use dtugraph_core::graph::GraphNode;
use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
};

use crate::app::{App, InputMode, TIER_KEYS};
use crate::canvas::GraphCanvas;

pub fn draw(f: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Header
            Constraint::Min(8),    // Graph
            Constraint::Length(3), // Footer
        ])
        .split(f.area());

    draw_header(f, app, chunks[0]);

    let frame = app.frame();
    let graph_area = if frame.controls_visible {
        let main = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Min(30), Constraint::Length(32)])
            .split(chunks[1]);
        draw_details(f, app, main[1]);
        main[0]
    } else {
        chunks[1]
    };

    let canvas = GraphCanvas::new(frame).cursor(app.cursor()).block(
        Block::default()
            .borders(Borders::ALL)
            .title(format!(" {} ", app.title())),
    );
    f.render_widget(canvas, graph_area);

    draw_footer(f, app, chunks[2]);
}

fn draw_header(f: &mut Frame, app: &App, area: Rect) {
    let frame = app.frame();
    let state = app.controller().state();

    let mut spans = vec![
        Span::styled("dtugraph", Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD)),
        Span::raw("  layout: "),
        Span::styled(frame.layout.kind.to_string(), Style::default().fg(Color::White)),
        Span::raw("  tiers:"),
    ];
    for (key, tier) in TIER_KEYS {
        let style = if state.filter_tiers.contains(tier) {
            Style::default().fg(Color::Green)
        } else {
            Style::default().fg(Color::DarkGray).add_modifier(Modifier::CROSSED_OUT)
        };
        spans.push(Span::styled(format!(" {}:{}", key, tier), style));
    }
    spans.push(Span::raw(format!(
        "  {} nodes, {} edges",
        frame.visible.node_count(),
        frame.visible.edge_count()
    )));
    if frame.search.is_active() {
        spans.push(Span::styled(
            format!("  /{} ({})", frame.search.query(), frame.search.len()),
            Style::default().fg(Color::Yellow),
        ));
    }

    let header = Paragraph::new(Line::from(spans)).block(Block::default().borders(Borders::ALL));
    f.render_widget(header, area);
}

fn node_details(lines: &mut Vec<Line<'static>>, heading: &str, node: &GraphNode, degree: usize) {
    lines.push(Line::from(Span::styled(
        heading.to_string(),
        Style::default().add_modifier(Modifier::BOLD),
    )));
    lines.push(Line::from(format!("  {}", node.label)));
    lines.push(Line::from(format!("  id: {}", node.id)));
    let tier = node.tier.map(|t| t.to_string()).unwrap_or_else(|| "-".into());
    lines.push(Line::from(format!("  tier: {}", tier)));
    if let Some(resonance) = node.resonance {
        lines.push(Line::from(format!("  resonance: {:.2}", resonance)));
    }
    lines.push(Line::from(format!("  links: {}", degree)));
    if !node.tags.is_empty() {
        let tags: Vec<&str> = node.tags.iter().map(String::as_str).collect();
        lines.push(Line::from(format!("  tags: {}", tags.join(", "))));
    }
    lines.push(Line::default());
}

fn draw_details(f: &mut Frame, app: &App, area: Rect) {
    let frame = app.frame();
    let model = app.controller().model();
    let mut lines: Vec<Line<'static>> = Vec::new();

    if let Some(id) = app.controller().hover() {
        if let Some(node) = frame.visible.node(id) {
            node_details(&mut lines, "Hover", node, model.degree(id));
            let highlight = &frame.highlight;
            lines.push(Line::from(format!(
                "  {} focused, {} faded",
                highlight.focused_ids().len(),
                highlight.faded_ids().len()
            )));
            lines.push(Line::default());
        }
    }

    match &frame.selection {
        Some(selected) => match model.node(&selected.id) {
            Some(node) => {
                node_details(&mut lines, "Selected", node, model.degree(&selected.id));
                if !selected.visible {
                    lines.push(Line::from(Span::styled(
                        "  (filtered out)",
                        Style::default().fg(Color::DarkGray),
                    )));
                }
            }
            None => lines.push(Line::from(format!("Selected: {} (not loaded)", selected.id))),
        },
        None => lines.push(Line::from(Span::styled(
            "Nothing selected",
            Style::default().fg(Color::DarkGray),
        ))),
    }

    if let Some(generation) = frame.relayout_pending {
        lines.push(Line::default());
        lines.push(Line::from(Span::styled(
            format!("Relayout {} pending", generation),
            Style::default().fg(Color::Yellow),
        )));
    }

    let details = Paragraph::new(lines)
        .wrap(Wrap { trim: false })
        .block(Block::default().borders(Borders::ALL).title(" Details "));
    f.render_widget(details, area);
}

fn draw_footer(f: &mut Frame, app: &App, area: Rect) {
    let line = match app.mode() {
        InputMode::Search => Line::from(vec![
            Span::styled("/", Style::default().fg(Color::Yellow)),
            Span::raw(app.controller().state().search_query.clone()),
            Span::styled("_", Style::default().add_modifier(Modifier::SLOW_BLINK)),
            Span::styled(
                "   enter: keep  esc: clear",
                Style::default().fg(Color::DarkGray),
            ),
        ]),
        InputMode::Normal => {
            let status = app.status();
            if status.is_empty() {
                Line::from(Span::styled(
                    "q: Quit | ←/→: Move | enter: Select | /: Search | 1-4: Tiers | l: Layout | ?: Keys",
                    Style::default().fg(Color::DarkGray),
                ))
            } else {
                Line::from(status)
            }
        }
    };

    let footer = Paragraph::new(line).block(Block::default().borders(Borders::ALL));
    f.render_widget(footer, area);
}
