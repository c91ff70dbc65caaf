//! Draw a deskkit view tree with ratatui

use std::str::FromStr;

use deskkit_core::config::SidebarPosition;
use deskkit_core::theme::{ColorScheme, StyleSheet};
use deskkit_core::ui::{Element, Node};
use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
};

/// Tags that start a new line
const BLOCK_TAGS: &[&str] = &[
    "div", "section", "header", "footer", "main", "aside", "nav", "ul", "li", "p", "h1", "h2",
    "h3", "menu", "label",
];

/// Every clickable element, in document order
///
/// Clickable elements are leaves for focus purposes; nothing nested inside
/// one is a separate target.
pub fn targets(node: &Node) -> Vec<&Element> {
    let mut out = Vec::new();
    collect_targets(node, &mut out);
    out
}

fn collect_targets<'a>(node: &'a Node, out: &mut Vec<&'a Element>) {
    match node {
        Node::Element(el) if el.on_click.is_some() => out.push(el),
        Node::Element(el) => el.children.iter().for_each(|c| collect_targets(c, out)),
        Node::Fragment(children) => children.iter().for_each(|c| collect_targets(c, out)),
        Node::Text(_) | Node::Empty => {}
    }
}

/// Text shown for a clickable element
pub fn target_label(el: &Element) -> String {
    let text = el.text_content();
    if !text.trim().is_empty() {
        return text;
    }
    el.attr_value("title")
        .or_else(|| el.attr_value("value"))
        .unwrap_or("*")
        .to_string()
}

/// Colours derived from the active stylesheet
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Palette {
    pub accent: Color,
    pub text: Color,
    pub muted: Color,
}

impl Palette {
    pub fn from_styles(styles: &StyleSheet) -> Self {
        let accent = styles
            .property("--primary")
            .and_then(|value| Color::from_str(value).ok())
            .unwrap_or(Color::Cyan);
        match styles.color_scheme() {
            Some(ColorScheme::Light) => Self {
                accent,
                text: Color::Reset,
                muted: Color::Gray,
            },
            _ => Self {
                accent,
                text: Color::White,
                muted: Color::DarkGray,
            },
        }
    }
}

/// Flattens a subtree into styled lines, highlighting the focused target
struct LineWriter<'a> {
    targets: &'a [&'a Element],
    focus: Option<usize>,
    palette: Palette,
    lines: Vec<Line<'static>>,
    current: Vec<Span<'static>>,
}

impl<'a> LineWriter<'a> {
    fn new(targets: &'a [&'a Element], focus: Option<usize>, palette: Palette) -> Self {
        Self {
            targets,
            focus,
            palette,
            lines: Vec::new(),
            current: Vec::new(),
        }
    }

    fn flush(&mut self) {
        if !self.current.is_empty() {
            self.lines.push(Line::from(std::mem::take(&mut self.current)));
        }
    }

    fn write(&mut self, node: &Node) {
        match node {
            Node::Empty => {}
            Node::Text(text) => {
                if !text.trim().is_empty() {
                    if !self.current.is_empty() {
                        self.current.push(Span::raw(" "));
                    }
                    self.current.push(Span::styled(
                        text.clone(),
                        Style::default().fg(self.palette.text),
                    ));
                }
            }
            Node::Fragment(children) => children.iter().for_each(|c| self.write(c)),
            Node::Element(el) => self.write_element(el),
        }
    }

    fn write_element(&mut self, el: &Element) {
        if let Some(index) = self.targets.iter().position(|t| std::ptr::eq(*t, el)) {
            self.write_target(index, el);
            return;
        }
        if el.tag == "icon" {
            return;
        }
        let block = BLOCK_TAGS.contains(&el.tag.as_str());
        if block {
            self.flush();
        }
        if el.tag == "h1" || el.tag == "h2" {
            let start = self.current.len();
            el.children.iter().for_each(|c| self.write(c));
            for span in &mut self.current[start..] {
                span.style = span.style.add_modifier(Modifier::BOLD).fg(self.palette.accent);
            }
        } else {
            el.children.iter().for_each(|c| self.write(c));
        }
        if block {
            self.flush();
        }
    }

    fn write_target(&mut self, index: usize, el: &Element) {
        let selected = el.has_class("active") || el.has_class("selected");
        let mut style = if selected {
            Style::default().fg(self.palette.accent).add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(self.palette.text)
        };
        if self.focus == Some(index) {
            style = style.add_modifier(Modifier::REVERSED);
        }
        if !self.current.is_empty() {
            self.current.push(Span::raw(" "));
        }
        self.current
            .push(Span::styled(format!("[{}]", target_label(el)), style));
        if el.tag == "a" {
            self.flush();
        }
    }

    fn finish(mut self) -> Vec<Line<'static>> {
        self.flush();
        self.lines
    }
}

/// Lines for a subtree; `targets` and `focus` index into the whole tree
pub fn lines_for(
    node: &Node,
    targets: &[&Element],
    focus: Option<usize>,
    palette: Palette,
) -> Vec<Line<'static>> {
    let mut writer = LineWriter::new(targets, focus, palette);
    writer.write(node);
    writer.finish()
}

fn lines_for_element(
    el: &Element,
    targets: &[&Element],
    focus: Option<usize>,
    palette: Palette,
) -> Vec<Line<'static>> {
    let mut writer = LineWriter::new(targets, focus, palette);
    writer.write_element(el);
    writer.finish()
}

/// Collapse lines into one, separated by a muted bar
fn join_lines(lines: Vec<Line<'static>>, palette: Palette) -> Line<'static> {
    let mut spans = Vec::new();
    for line in lines {
        if !spans.is_empty() {
            spans.push(Span::styled(" | ", Style::default().fg(palette.muted)));
        }
        spans.extend(line.spans);
    }
    Line::from(spans)
}

/// What a frame needs besides the tree
pub struct FrameInfo<'a> {
    pub focus: Option<usize>,
    pub palette: Palette,
    pub sidebar_position: SidebarPosition,
    pub status: &'a str,
}

const HELP: &str = "tab/arrows: focus | enter: activate | m: maximize | t: theme | l: language | u: update | b: back | q: quit";

/// Draw the whole tree: title bar on top, sidebar and content below, then
/// a status footer. Trees without those regions are drawn as one panel.
pub fn draw(frame: &mut Frame<'_>, tree: &Node, info: &FrameInfo<'_>) {
    let targets = targets(tree);
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Title bar
            Constraint::Min(6),    // Body
            Constraint::Length(3), // Footer
        ])
        .split(frame.area());

    let panel_block = |title: Option<&str>| {
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(info.palette.muted));
        match title {
            Some(title) => block.title(title.to_string()),
            None => block,
        }
    };

    match (tree.region("title-bar"), tree.region("content")) {
        (Some(title_bar), Some(content)) => {
            let lines = lines_for_element(title_bar, &targets, info.focus, info.palette);
            frame.render_widget(
                Paragraph::new(join_lines(lines, info.palette)).block(panel_block(None)),
                rows[0],
            );

            let body = match tree.region("sidebar") {
                Some(sidebar) => {
                    let (constraints, sidebar_index) = match info.sidebar_position {
                        SidebarPosition::Left => ([Constraint::Length(28), Constraint::Min(20)], 0),
                        SidebarPosition::Right => ([Constraint::Min(20), Constraint::Length(28)], 1),
                    };
                    let cols = Layout::default()
                        .direction(Direction::Horizontal)
                        .constraints(constraints)
                        .split(rows[1]);
                    let lines = lines_for_element(sidebar, &targets, info.focus, info.palette);
                    frame.render_widget(
                        Paragraph::new(lines).block(panel_block(Some("Navigation"))),
                        cols[sidebar_index],
                    );
                    cols[1 - sidebar_index]
                }
                None => rows[1],
            };
            let lines = lines_for_element(content, &targets, info.focus, info.palette);
            frame.render_widget(
                Paragraph::new(lines)
                    .block(panel_block(Some("Content")))
                    .wrap(Wrap { trim: true }),
                body,
            );
        }
        _ => {
            let area = Rect {
                height: rows[0].height + rows[1].height,
                ..rows[0]
            };
            let lines = lines_for(tree, &targets, info.focus, info.palette);
            frame.render_widget(
                Paragraph::new(lines)
                    .block(panel_block(None))
                    .wrap(Wrap { trim: true }),
                area,
            );
        }
    }

    let footer = Paragraph::new(vec![
        Line::from(Span::styled(
            info.status.to_string(),
            Style::default().fg(info.palette.accent),
        )),
        Line::from(Span::styled(HELP, Style::default().fg(info.palette.muted))),
    ]);
    frame.render_widget(footer, rows[2]);
}
