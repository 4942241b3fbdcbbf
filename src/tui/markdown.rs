//! Markdown → ratatui `Text` renderer.
//!
//! Thin wrapper around `pulldown_cmark` that converts markdown events into
//! styled `Line`/`Span` values. Headings, bold, italic, inline code, fenced
//! code blocks (with syntect highlighting), lists, blockquotes, links, and
//! `$...$` / `$$...$$` math typeset to Unicode.
//!
//! Rendering is pure. Math that fails to typeset is shown as its source.

use std::sync::LazyLock;

use log::debug;
use pulldown_cmark::{CodeBlockKind, CowStr, Event, HeadingLevel, Options, Parser, Tag, TagEnd};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span, Text};
use syntect::easy::HighlightLines;
use syntect::highlighting::ThemeSet;
use syntect::parsing::SyntaxSet;
use syntect::util::LinesWithEndings;

use crate::tui::math;

static SYNTAX_SET: LazyLock<SyntaxSet> = LazyLock::new(SyntaxSet::load_defaults_newlines);
static THEME_SET: LazyLock<ThemeSet> = LazyLock::new(ThemeSet::load_defaults);

const HEADING_FG: Color = Color::LightBlue;
const MATH_FG: Color = Color::Cyan;
const DISPLAY_INDENT: &str = "    ";

/// Parse markdown content into styled `Text` using PhyQuest's color scheme.
///
/// Returns owned text (`'static`) so callers aren't constrained by input lifetime.
pub fn render(content: &str, base_fg: Color) -> Text<'static> {
    render_with(content, base_fg, true)
}

fn render_with(content: &str, base_fg: Color, math: bool) -> Text<'static> {
    let mut opts = Options::empty();
    opts.insert(Options::ENABLE_STRIKETHROUGH);
    opts.insert(Options::ENABLE_TASKLISTS);
    if math {
        opts.insert(Options::ENABLE_MATH);
    }

    let mut w = Writer::new(base_fg);
    for event in Parser::new_ext(content, opts) {
        w.handle(event);
    }
    w.text
}

// ── Writer ──────────────────────────────────────────────────────────────────

struct Writer {
    text: Text<'static>,
    base_fg: Color,
    /// Inline style stack (bold, italic, heading text, etc.). Styles compose
    /// via `patch` so nested bold+italic works.
    styles: Vec<Style>,
    /// Per-line prefix spans (blockquote `│`).
    line_prefixes: Vec<Span<'static>>,
    /// List nesting: None = unordered, Some(n) = ordered at index n.
    list_indices: Vec<Option<u64>>,
    /// Active syntax highlighter for fenced code blocks.
    highlighter: Option<HighlightLines<'static>>,
    /// True when inside a fenced code block without syntax highlighting.
    in_plain_code: bool,
    /// Stored link URL, appended after the link text closes.
    link_url: Option<String>,
    /// Whether the next block element should be preceded by a blank line.
    needs_newline: bool,
    /// Inline content after display math starts on a fresh line.
    break_pending: bool,
}

impl Writer {
    fn new(base_fg: Color) -> Self {
        Self {
            text: Text::default(),
            base_fg,
            styles: vec![],
            line_prefixes: vec![],
            list_indices: vec![],
            highlighter: None,
            in_plain_code: false,
            link_url: None,
            needs_newline: false,
            break_pending: false,
        }
    }

    // ── Style helpers ───────────────────────────────────────────────────

    /// Current effective style: top of stack, or base foreground color.
    fn style(&self) -> Style {
        self.styles
            .last()
            .copied()
            .unwrap_or_else(|| Style::default().fg(self.base_fg))
    }

    /// Push a style that composes with the current one (inherits parent modifiers).
    fn push_style(&mut self, overlay: Style) {
        self.styles.push(self.style().patch(overlay));
    }

    fn pop_style(&mut self) {
        self.styles.pop();
    }

    // ── Line/span helpers ───────────────────────────────────────────────

    fn push_line(&mut self, line: Line<'static>) {
        self.break_pending = false;
        let mut out = line;
        for pfx in self.line_prefixes.iter().rev().cloned() {
            out.spans.insert(0, pfx);
        }
        self.text.lines.push(out);
    }

    fn push_span(&mut self, span: Span<'static>) {
        if self.break_pending {
            self.push_line(Line::from(vec![span]));
            return;
        }
        if let Some(line) = self.text.lines.last_mut() {
            line.push_span(span);
        } else {
            self.push_line(Line::from(vec![span]));
        }
    }

    /// True if the last line holds nothing but its block prefixes.
    fn current_line_is_blank(&self) -> bool {
        self.text
            .lines
            .last()
            .is_some_and(|l| l.spans.len() == self.line_prefixes.len())
    }

    fn blank_line_if_needed(&mut self) {
        if self.needs_newline {
            self.push_line(Line::default());
            self.needs_newline = false;
        }
    }

    // ── Event dispatch ──────────────────────────────────────────────────

    fn handle(&mut self, event: Event<'_>) {
        match event {
            Event::Start(tag) => self.open(tag),
            Event::End(tag) => self.close(tag),
            Event::Text(t) => self.text(t),
            Event::Code(c) => self.inline_code(c),
            Event::InlineMath(m) => self.inline_math(m),
            Event::DisplayMath(m) => self.display_math(m),
            Event::SoftBreak => self.push_span(Span::raw(" ")),
            Event::HardBreak => self.push_line(Line::default()),
            Event::Rule => {
                self.blank_line_if_needed();
                self.push_line(Line::from(Span::styled(
                    "─".repeat(40),
                    Style::default().fg(Color::DarkGray),
                )));
                self.needs_newline = true;
            }
            Event::TaskListMarker(checked) => {
                let marker = if checked { "[x] " } else { "[ ] " };
                self.push_span(Span::raw(marker));
            }
            // Raw HTML is shown as text, never interpreted.
            Event::Html(raw) | Event::InlineHtml(raw) => self.text(raw),
            _ => {} // Footnotes
        }
    }

    fn open(&mut self, tag: Tag<'_>) {
        match tag {
            // ── Block elements ──────────────────────────────────────────
            Tag::Paragraph => {
                self.blank_line_if_needed();
                self.push_line(Line::default());
            }
            Tag::Heading { level, .. } => {
                self.blank_line_if_needed();
                let hs = heading_style(level);
                let depth = heading_depth(level) as usize;
                self.push_line(Line::from(Span::styled(
                    format!("{} ", "#".repeat(depth)),
                    hs,
                )));
                self.push_style(hs);
            }
            Tag::BlockQuote(_) => {
                self.blank_line_if_needed();
                self.line_prefixes
                    .push(Span::styled("│ ", Style::default().fg(Color::Blue)));
                self.push_style(
                    Style::default()
                        .fg(self.base_fg)
                        .add_modifier(Modifier::DIM | Modifier::ITALIC),
                );
            }
            Tag::CodeBlock(kind) => {
                if !self.text.lines.is_empty() {
                    self.push_line(Line::default());
                }
                let lang = match &kind {
                    CodeBlockKind::Fenced(l) => l.as_ref(),
                    CodeBlockKind::Indented => "",
                };

                // Top border: ╭── lang  or just ╭──
                let bs = Style::default().fg(Color::DarkGray);
                let top = if lang.is_empty() {
                    Line::from(Span::styled("╭──", bs))
                } else {
                    Line::from(vec![
                        Span::styled("╭── ", bs),
                        Span::styled(lang.to_owned(), bs.add_modifier(Modifier::BOLD)),
                        Span::styled(" ──", bs),
                    ])
                };
                self.push_line(top);
                self.line_prefixes.push(Span::styled("│ ", bs));

                if !lang.is_empty()
                    && let Some(syn) = SYNTAX_SET.find_syntax_by_token(lang)
                    && let Some(theme) = THEME_SET.themes.get("base16-ocean.dark")
                {
                    self.highlighter = Some(HighlightLines::new(syn, theme));
                }
                if self.highlighter.is_none() {
                    self.in_plain_code = true;
                }
            }
            Tag::List(start) => {
                if self.list_indices.is_empty() {
                    self.blank_line_if_needed();
                }
                self.list_indices.push(start);
            }
            Tag::Item => {
                self.push_line(Line::default());
                let depth = self.list_indices.len().saturating_sub(1);
                let indent = "  ".repeat(depth);
                if let Some(idx) = self.list_indices.last_mut() {
                    let marker = match idx {
                        None => format!("{indent}• "),
                        Some(n) => {
                            let s = format!("{indent}{}. ", n);
                            *n += 1;
                            s
                        }
                    };
                    self.push_span(Span::styled(marker, Style::default().fg(Color::Blue)));
                }
            }

            // ── Inline elements ─────────────────────────────────────────
            Tag::Emphasis => self.push_style(Style::default().add_modifier(Modifier::ITALIC)),
            Tag::Strong => self.push_style(
                Style::default()
                    .fg(Color::White)
                    .add_modifier(Modifier::BOLD),
            ),
            Tag::Strikethrough => {
                self.push_style(Style::default().add_modifier(Modifier::CROSSED_OUT))
            }
            Tag::Link { dest_url, .. } => {
                self.link_url = Some(dest_url.to_string());
                self.push_style(
                    Style::default()
                        .fg(Color::Cyan)
                        .add_modifier(Modifier::UNDERLINED),
                );
            }
            _ => {} // Tables, images, definitions are skipped
        }
    }

    fn close(&mut self, tag: TagEnd) {
        match tag {
            TagEnd::Paragraph => self.needs_newline = true,
            TagEnd::Heading(_) => {
                self.pop_style();
                self.needs_newline = true;
            }
            TagEnd::BlockQuote(_) => {
                self.line_prefixes.pop();
                self.pop_style();
                self.needs_newline = true;
            }
            TagEnd::CodeBlock => {
                self.highlighter = None;
                self.in_plain_code = false;
                self.line_prefixes.pop(); // remove │ prefix before bottom border
                let bs = Style::default().fg(Color::DarkGray);
                self.push_line(Line::from(Span::styled("╰──", bs)));
                self.needs_newline = true;
            }
            TagEnd::List(_) => {
                self.list_indices.pop();
                self.needs_newline = true;
            }
            TagEnd::Item => {}
            TagEnd::Emphasis | TagEnd::Strong | TagEnd::Strikethrough => self.pop_style(),
            TagEnd::Link => {
                self.pop_style();
                if let Some(url) = self.link_url.take() {
                    self.push_span(Span::raw(" ("));
                    self.push_span(Span::styled(
                        url,
                        Style::default()
                            .fg(Color::Cyan)
                            .add_modifier(Modifier::UNDERLINED),
                    ));
                    self.push_span(Span::raw(")"));
                }
            }
            _ => {}
        }
    }

    // ── Content handlers ────────────────────────────────────────────────

    fn text(&mut self, cow: CowStr<'_>) {
        // Expand tabs → 4 spaces (ratatui renders \t as zero-width)
        let raw = cow.to_string();
        let text = if raw.contains('\t') {
            raw.replace('\t', "    ")
        } else {
            raw
        };

        // Take the highlighter out: highlight_line borrows it, push_line borrows self
        if let Some(mut hl) = self.highlighter.take() {
            for line in LinesWithEndings::from(text.as_str()) {
                if let Ok(ranges) = hl.highlight_line(line, &SYNTAX_SET) {
                    let spans: Vec<Span<'static>> = ranges
                        .into_iter()
                        .filter_map(|(hl_style, frag)| {
                            let content = frag.trim_end_matches('\n').replace('\t', "    ");
                            if content.is_empty() {
                                return None;
                            }
                            let fg = Color::Rgb(
                                hl_style.foreground.r,
                                hl_style.foreground.g,
                                hl_style.foreground.b,
                            );
                            Some(Span::styled(content, Style::default().fg(fg)))
                        })
                        .collect();
                    if !spans.is_empty() {
                        self.push_line(Line::from(spans));
                    }
                }
            }
            self.highlighter = Some(hl);
            return;
        }

        if self.in_plain_code {
            let code_style = Style::default().fg(Color::White);
            for line in text.lines() {
                self.push_line(Line::from(Span::styled(line.to_owned(), code_style)));
            }
            return;
        }

        // Normal text inherits the current style
        let style = self.style();
        self.push_span(Span::styled(text, style));
    }

    fn inline_code(&mut self, cow: CowStr<'_>) {
        let style = Style::default().fg(Color::LightMagenta).bg(Color::DarkGray);
        self.push_span(Span::styled(cow.to_string(), style));
    }

    fn inline_math(&mut self, src: CowStr<'_>) {
        let flat = src.replace('\n', " ");
        match math::typeset(&flat) {
            Ok(typeset) => {
                let style = self.style().fg(MATH_FG);
                self.push_span(Span::styled(typeset, style));
            }
            Err(e) => {
                debug!("Inline math left as source ({}): {}", e, flat);
                let style = self.style();
                self.push_span(Span::styled(format!("${flat}$"), style));
            }
        }
    }

    fn display_math(&mut self, src: CowStr<'_>) {
        let (rendered, style) = match math::typeset(&src) {
            Ok(typeset) => (
                typeset,
                Style::default().fg(MATH_FG).add_modifier(Modifier::BOLD),
            ),
            Err(e) => {
                debug!("Display math left as source ({}): {}", e, src);
                (format!("$${src}$$"), self.style())
            }
        };

        let mut first = true;
        for line in rendered.lines().map(str::trim).filter(|l| !l.is_empty()) {
            let spans = vec![
                Span::raw(DISPLAY_INDENT),
                Span::styled(line.to_owned(), style),
            ];
            if first && self.current_line_is_blank() {
                if let Some(last) = self.text.lines.last_mut() {
                    last.spans.extend(spans);
                }
            } else {
                self.push_line(Line::from(spans));
            }
            first = false;
        }
        self.break_pending = true;
    }
}

// ── Helpers ─────────────────────────────────────────────────────────────────

fn heading_style(level: HeadingLevel) -> Style {
    let base = Style::default().fg(HEADING_FG);
    match level {
        HeadingLevel::H1 => base.add_modifier(Modifier::BOLD | Modifier::UNDERLINED),
        HeadingLevel::H2 => base.add_modifier(Modifier::BOLD),
        _ => base.add_modifier(Modifier::BOLD | Modifier::ITALIC),
    }
}

fn heading_depth(level: HeadingLevel) -> u8 {
    match level {
        HeadingLevel::H1 => 1,
        HeadingLevel::H2 => 2,
        HeadingLevel::H3 => 3,
        HeadingLevel::H4 => 4,
        HeadingLevel::H5 => 5,
        HeadingLevel::H6 => 6,
    }
}
