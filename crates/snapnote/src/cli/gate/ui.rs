//! UI layout and widget rendering for the confirmation screen

use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style, Stylize},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
};
use snapnote_core::gate::{ConfirmationGate, Field, GateRenderer};

const PNG_SIGNATURE: [u8; 8] = [0x89, b'P', b'N', b'G', 0x0d, 0x0a, 0x1a, 0x0a];

/// Render the full UI
pub fn render(frame: &mut Frame, gate: &ConfirmationGate<'_>) {
    let areas = GateLayout::new(frame.area());
    let mut renderer = FrameRenderer { frame, areas };
    gate.render(&mut renderer);
    render_help_bar(renderer.frame, gate.focus(), areas.help);
}

/// Screen areas, top to bottom.
#[derive(Debug, Clone, Copy)]
struct GateLayout {
    preview: Rect,
    name: Rect,
    chips: Rect,
    tags: Rect,
    suggestions: Rect,
    help: Rect,
}

impl GateLayout {
    fn new(area: Rect) -> Self {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3),
                Constraint::Length(3),
                Constraint::Length(1),
                Constraint::Length(3),
                Constraint::Min(0),
                Constraint::Length(1),
            ])
            .split(area);
        Self {
            preview: chunks[0],
            name: chunks[1],
            chips: chunks[2],
            tags: chunks[3],
            suggestions: chunks[4],
            help: chunks[5],
        }
    }
}

/// Draws each gate widget into its area of the frame.
struct FrameRenderer<'f, 'a> {
    frame: &'f mut Frame<'a>,
    areas: GateLayout,
}

impl GateRenderer for FrameRenderer<'_, '_> {
    fn preview(&mut self, bytes: &[u8]) {
        let summary = Paragraph::new(Line::from(vec![
            Span::styled("  ", Style::default()),
            Span::styled(describe_image(bytes), Style::default().bold()),
        ]))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(" Paste image ")
                .border_style(Style::default().fg(Color::Blue)),
        );
        self.frame.render_widget(summary, self.areas.preview);
    }

    fn name_field(&mut self, value: &str, focused: bool) {
        let field = input_field(" Name ", value, focused);
        self.frame.render_widget(field, self.areas.name);
    }

    fn tag_chips(&mut self, tags: &[String]) {
        let mut spans = vec![Span::raw(" ")];
        if tags.is_empty() {
            spans.push(Span::styled("(no tags)", Style::default().fg(Color::DarkGray)));
        }
        for tag in tags {
            spans.push(Span::styled(
                format!(" {} ", tag),
                Style::default().fg(Color::Black).bg(Color::Cyan),
            ));
            spans.push(Span::raw(" "));
        }
        self.frame.render_widget(Paragraph::new(Line::from(spans)), self.areas.chips);
    }

    fn tag_field(&mut self, query: &str, focused: bool) {
        let field = input_field(" Tags ", query, focused);
        self.frame.render_widget(field, self.areas.tags);
    }

    fn suggestions(&mut self, items: &[String], highlighted: Option<usize>) {
        let lines: Vec<Line> = items
            .iter()
            .enumerate()
            .map(|(i, item)| {
                if Some(i) == highlighted {
                    Line::from(Span::styled(
                        format!("▶ {}", item),
                        Style::default()
                            .fg(Color::Black)
                            .bg(Color::Cyan)
                            .add_modifier(Modifier::BOLD),
                    ))
                } else {
                    Line::from(format!("  {}", item))
                }
            })
            .collect();

        let list = Paragraph::new(lines).block(
            Block::default()
                .borders(Borders::LEFT | Borders::RIGHT | Borders::BOTTOM)
                .border_style(Style::default().fg(Color::DarkGray)),
        );
        self.frame.render_widget(list, self.areas.suggestions);
    }
}

/// Bordered single-line input with a block cursor when focused
fn input_field<'t>(title: &'t str, value: &'t str, focused: bool) -> Paragraph<'t> {
    let border = if focused { Color::Cyan } else { Color::DarkGray };
    let mut spans = vec![Span::raw(" "), Span::raw(value)];
    if focused {
        spans.push(Span::styled(
            " ",
            Style::default().bg(Color::White).add_modifier(Modifier::BOLD),
        ));
    }
    Paragraph::new(Line::from(spans)).block(
        Block::default()
            .borders(Borders::ALL)
            .title(title)
            .border_style(Style::default().fg(border)),
    )
}

/// Render the help bar at the bottom, adapting to the focused field
fn render_help_bar(frame: &mut Frame, focus: Field, area: Rect) {
    let mut spans = vec![
        Span::styled(" Tab", Style::default().fg(Color::Cyan).bold()),
        Span::raw(": switch field  "),
    ];
    if focus == Field::Tags {
        spans.extend([
            Span::styled("↑/↓", Style::default().fg(Color::Cyan).bold()),
            Span::raw(": suggestions  "),
            Span::styled("Enter", Style::default().fg(Color::Cyan).bold()),
            Span::raw(": add tag / save  "),
            Span::styled("Backspace", Style::default().fg(Color::Cyan).bold()),
            Span::raw(": remove last tag  "),
        ]);
    } else {
        spans.extend([
            Span::styled("Enter", Style::default().fg(Color::Cyan).bold()),
            Span::raw(": save  "),
        ]);
    }
    spans.extend([
        Span::styled("Esc", Style::default().fg(Color::Cyan).bold()),
        Span::raw(": cancel"),
    ]);

    let help_bar = Paragraph::new(Line::from(spans)).style(Style::default().bg(Color::DarkGray));
    frame.render_widget(help_bar, area);
}

/// One-line summary of the image being pasted
pub fn describe_image(bytes: &[u8]) -> String {
    match png_dimensions(bytes) {
        Some((width, height)) => format!(
            "PNG image, {}×{} px, {}",
            width,
            height,
            format_size(bytes.len())
        ),
        None => format!("Image, {}", format_size(bytes.len())),
    }
}

/// Width and height from a PNG's IHDR chunk
fn png_dimensions(bytes: &[u8]) -> Option<(u32, u32)> {
    if bytes.len() < 24 || bytes[..8] != PNG_SIGNATURE || &bytes[12..16] != b"IHDR" {
        return None;
    }
    let width = u32::from_be_bytes(bytes[16..20].try_into().ok()?);
    let height = u32::from_be_bytes(bytes[20..24].try_into().ok()?);
    Some((width, height))
}

fn format_size(len: usize) -> String {
    const KB: f64 = 1024.0;
    let len_f = len as f64;
    if len_f < KB {
        format!("{} bytes", len)
    } else if len_f < KB * KB {
        format!("{:.1} KB", len_f / KB)
    } else {
        format!("{:.1} MB", len_f / (KB * KB))
    }
}
