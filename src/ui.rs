//! Terminal rendering for chat sessions.
//!
//! Chat turns are drawn as boxed "bubbles". A [`ThinkingIndicator`] is an
//! owned handle to the bubble shown while the agent runs; whoever holds it
//! is responsible for erasing it through [`Renderer::erase`].

use std::io::{self, Write};

use crossterm::style::{Color, Stylize};
use crossterm::{cursor, queue, terminal};
use unicode_width::UnicodeWidthStr;

/// Roles a chat bubble can be drawn for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BubbleRole {
    User,
    Assistant,
    Loading,
    Error,
    Warning,
}

/// Trace bubble kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TraceKind {
    Trace,
    Tool,
    Agent,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Align {
    Left,
    Right,
}

#[derive(Debug, Clone, Copy)]
struct Border {
    top_left: char,
    top_right: char,
    bottom_left: char,
    bottom_right: char,
    horizontal: char,
    vertical: char,
}

const ROUND: Border = Border {
    top_left: '╭',
    top_right: '╮',
    bottom_left: '╰',
    bottom_right: '╯',
    horizontal: '─',
    vertical: '│',
};

const CLASSIC: Border = Border {
    top_left: '+',
    top_right: '+',
    bottom_left: '+',
    bottom_right: '+',
    horizontal: '-',
    vertical: '|',
};

const SINGLE: Border = Border {
    top_left: '┌',
    top_right: '┐',
    bottom_left: '└',
    bottom_right: '┘',
    horizontal: '─',
    vertical: '│',
};

#[derive(Debug, Clone, Copy)]
struct BubbleStyle {
    title: &'static str,
    color: Color,
    dim: bool,
    border: Border,
    align: Align,
    padded: bool,
}

impl BubbleRole {
    fn style(self) -> BubbleStyle {
        let (title, color, border, align) = match self {
            BubbleRole::User => ("👤 You", Color::Blue, ROUND, Align::Right),
            BubbleRole::Assistant => ("🤖 Assistant", Color::Green, ROUND, Align::Left),
            BubbleRole::Loading => ("💭 Thinking...", Color::Grey, CLASSIC, Align::Left),
            BubbleRole::Error => ("🚨 Error", Color::Red, CLASSIC, Align::Left),
            BubbleRole::Warning => ("⚠️ Warning", Color::Yellow, ROUND, Align::Left),
        };
        BubbleStyle {
            title,
            color,
            dim: self == BubbleRole::Loading,
            border,
            align,
            padded: true,
        }
    }
}

impl TraceKind {
    fn style(self) -> BubbleStyle {
        let (title, color) = match self {
            TraceKind::Tool => ("🔧 tool", Color::Yellow),
            TraceKind::Agent => ("🤖 agent", Color::Cyan),
            TraceKind::Trace => ("📋 trace", Color::Grey),
        };
        BubbleStyle {
            title,
            color,
            dim: true,
            border: SINGLE,
            align: Align::Right,
            padded: false,
        }
    }
}

/// Handle to an on-screen "Thinking..." bubble.
#[must_use = "a thinking indicator stays on screen until erased"]
#[derive(Debug)]
pub struct ThinkingIndicator {
    lines: usize,
}

impl ThinkingIndicator {
    pub fn lines(&self) -> usize {
        self.lines
    }
}

/// Draws chat and trace bubbles to a writer
pub struct Renderer<W: Write> {
    out: W,
    width: usize,
    color: bool,
    columns: Option<usize>,
}

impl Renderer<io::Stdout> {
    /// Renderer for the current terminal. Colors and right alignment are
    /// only used when stdout is a TTY and `NO_COLOR` is unset.
    pub fn stdout(width: usize) -> Self {
        use crossterm::tty::IsTty;

        let out = io::stdout();
        let tty = out.is_tty();
        let color = tty && std::env::var_os("NO_COLOR").is_none();
        let columns = if tty {
            terminal::size().ok().map(|(cols, _)| cols as usize)
        } else {
            None
        };
        Self {
            out,
            width,
            color,
            columns,
        }
    }
}

impl<W: Write> Renderer<W> {
    /// Plain renderer: no colors, no right alignment.
    pub fn plain(out: W, width: usize) -> Self {
        Self {
            out,
            width,
            color: false,
            columns: None,
        }
    }

    pub fn writer(&self) -> &W {
        &self.out
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    /// Write a line of text as-is.
    pub fn line(&mut self, text: &str) -> io::Result<()> {
        writeln!(self.out, "{text}")?;
        self.out.flush()
    }

    /// Session banner.
    pub fn banner(&mut self, name: &str) -> io::Result<()> {
        let title = format!(" ===== {name} ===== ");
        let hint = "Type 'exit' or 'quit' or submit an empty message to end.";
        if self.color {
            writeln!(self.out, "{}", title.black().on_cyan().bold())?;
            writeln!(self.out, "{}\n", hint.dim())?;
        } else {
            writeln!(self.out, "{title}")?;
            writeln!(self.out, "{hint}\n")?;
        }
        self.out.flush()
    }

    /// Draw a chat bubble; returns the number of terminal lines used.
    pub fn chat_bubble(&mut self, message: &str, role: BubbleRole) -> io::Result<usize> {
        let lines = self.boxed(message, role.style());
        self.emit(&lines)
    }

    /// Draw a compact trace bubble.
    pub fn trace_bubble(&mut self, message: &str, kind: TraceKind) -> io::Result<usize> {
        let lines = self.boxed(message, kind.style());
        self.emit(&lines)
    }

    /// Show the "Thinking..." bubble and hand back its handle.
    pub fn thinking(&mut self) -> io::Result<ThinkingIndicator> {
        let lines = self.chat_bubble("Thinking...", BubbleRole::Loading)?;
        Ok(ThinkingIndicator { lines })
    }

    /// Remove a previously drawn thinking bubble.
    pub fn erase(&mut self, indicator: ThinkingIndicator) -> io::Result<()> {
        self.clear_lines(indicator.lines)
    }

    /// Draw the input prompt box, leaving the cursor after `> `.
    pub fn prompt_box(&mut self) -> io::Result<()> {
        let rule = ROUND.horizontal.to_string().repeat(self.width.saturating_sub(8));
        write!(self.out, "╭─ prompt {rule}╮\n│ > ")?;
        self.out.flush()
    }

    /// Remove the prompt box once the user pressed enter.
    pub fn close_prompt(&mut self) -> io::Result<()> {
        if self.color {
            self.clear_lines(2)
        } else {
            Ok(())
        }
    }

    fn clear_lines(&mut self, count: usize) -> io::Result<()> {
        if !self.color {
            return Ok(());
        }
        for _ in 0..count {
            queue!(
                self.out,
                cursor::MoveUp(1),
                terminal::Clear(terminal::ClearType::CurrentLine)
            )?;
        }
        self.out.flush()
    }

    fn emit(&mut self, lines: &[String]) -> io::Result<usize> {
        for line in lines {
            writeln!(self.out, "{line}")?;
        }
        self.out.flush()?;
        Ok(lines.len())
    }

    fn boxed(&self, message: &str, style: BubbleStyle) -> Vec<String> {
        let border = style.border;
        let inner = self.width.max(style.title.width() + 4);
        let body = wrap(message, inner - 2);

        let title = format!(" {} ", style.title);
        let top_rule = border
            .horizontal
            .to_string()
            .repeat(inner.saturating_sub(title.width() + 1));
        let top = format!(
            "{}{}{title}{top_rule}{}",
            border.top_left, border.horizontal, border.top_right
        );
        let bottom = format!(
            "{}{}{}",
            border.bottom_left,
            border.horizontal.to_string().repeat(inner),
            border.bottom_right
        );
        let blank = format!("{}{}{}", border.vertical, " ".repeat(inner), border.vertical);

        let mut rows = vec![top];
        if style.padded {
            rows.push(blank.clone());
        }
        for text in body {
            let pad = inner.saturating_sub(2 + text.width());
            rows.push(format!(
                "{} {text}{} {}",
                border.vertical,
                " ".repeat(pad),
                border.vertical
            ));
        }
        if style.padded {
            rows.push(blank);
        }
        rows.push(bottom);

        let indent = match (style.align, self.columns) {
            (Align::Right, Some(columns)) => columns.saturating_sub(inner + 2 + 1),
            _ => 0,
        };
        let mut lines: Vec<String> = rows
            .into_iter()
            .map(|row| {
                let row = self.paint(&row, style);
                format!("{}{row}", " ".repeat(indent))
            })
            .collect();

        if style.padded {
            lines.insert(0, String::new());
            lines.push(String::new());
        }
        lines
    }

    fn paint(&self, row: &str, style: BubbleStyle) -> String {
        if !self.color {
            return row.to_string();
        }
        let styled = row.with(style.color);
        if style.dim {
            styled.dim().to_string()
        } else {
            styled.to_string()
        }
    }
}

/// Greedy word wrap to `width` terminal cells. Words longer than a line are
/// split.
fn wrap(text: &str, width: usize) -> Vec<String> {
    // A wide glyph needs two cells.
    let width = width.max(2);
    let mut lines = Vec::new();

    for paragraph in text.lines() {
        let mut current = String::new();
        for word in paragraph.split_whitespace() {
            for piece in split_word(word, width) {
                let needed = current.width() + piece.width() + usize::from(!current.is_empty());
                if needed > width && !current.is_empty() {
                    lines.push(std::mem::take(&mut current));
                }
                if !current.is_empty() {
                    current.push(' ');
                }
                current.push_str(&piece);
            }
        }
        lines.push(current);
    }

    if lines.is_empty() {
        lines.push(String::new());
    }
    lines
}

/// Cut a word into pieces no wider than `width` cells.
fn split_word(word: &str, width: usize) -> Vec<String> {
    let mut pieces = Vec::new();
    let mut piece = String::new();
    for ch in word.chars() {
        piece.push(ch);
        if piece.width() > width && piece.chars().count() > 1 {
            piece.pop();
            pieces.push(std::mem::take(&mut piece));
            piece.push(ch);
        }
    }
    pieces.push(piece);
    pieces
}
