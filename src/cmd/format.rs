/*!
format.rs

Human-output primitives for the `searchatlas` CLI ("rich" format).

  - StyleOptions::detect() / StyleOptions::plain()
  - color(role, text, &StyleOptions)
  - emoji(tag, &StyleOptions)
  - box_header(title, subtitle, &StyleOptions)   one-line boxed title
  - panel(title, body, role, &StyleOptions)      titled box around free text
  - table(headers, rows, TableOpts, &StyleOptions)
  - wrap_text / truncate_ellipsis

Functions here return strings and never print. JSON output paths must not
use them. Colors honour NO_COLOR, emoji honour NO_EMOJI, width comes from
COLUMNS (clamped 40..=220, default 100). Redirected stdout gets plain output.
*/

use std::borrow::Cow;
use std::io::IsTerminal;

/* -------------------------------------------------------------------------- */
/* Style Options                                                              */
/* -------------------------------------------------------------------------- */

#[derive(Debug, Clone)]
pub struct StyleOptions {
    pub use_color: bool,
    pub use_emoji: bool,
    pub term_width: usize,
    pub box_style: BoxStyle,
    pub padding: usize,
}

#[derive(Debug, Clone, Copy)]
pub enum BoxStyle {
    Light,   // ─ │ ┌ ┐ └ ┘
    Rounded, // ╭ ╮ ╰ ╯
}

impl StyleOptions {
    /// Styled output for a terminal; `plain()` (at terminal width) when stdout
    /// is redirected.
    pub fn detect() -> Self {
        let width = std::env::var("COLUMNS")
            .ok()
            .and_then(|v| v.parse::<usize>().ok())
            .map(|w| w.clamp(40, 220))
            .unwrap_or(100);

        if !std::io::stdout().is_terminal() {
            return StyleOptions {
                term_width: width,
                ..Self::plain()
            };
        }

        let use_color = std::env::var_os("NO_COLOR").is_none();
        let use_emoji = std::env::var_os("NO_EMOJI").is_none();

        StyleOptions {
            use_color,
            use_emoji,
            term_width: width,
            box_style: BoxStyle::Rounded,
            padding: 1,
        }
    }

    /// No color, no emoji, fixed width.
    pub fn plain() -> Self {
        StyleOptions {
            use_color: false,
            use_emoji: false,
            term_width: 100,
            box_style: BoxStyle::Light,
            padding: 1,
        }
    }
}

/* -------------------------------------------------------------------------- */
/* Color / Emoji                                                              */
/* -------------------------------------------------------------------------- */

#[derive(Debug, Clone, Copy)]
pub enum Role {
    Primary,
    Secondary,
    Accent,
    Success,
    Warning,
    Error,
    Dim,
    Bold,
}

pub fn color(role: Role, text: impl AsRef<str>, style: &StyleOptions) -> String {
    if !style.use_color {
        return text.as_ref().to_string();
    }
    let code = match role {
        Role::Primary => "38;5;45",    // cyan
        Role::Secondary => "38;5;250", // gray
        Role::Accent => "38;5;214",    // yellow/orange
        Role::Success => "38;5;82",    // green
        Role::Warning => "38;5;220",   // yellow
        Role::Error => "38;5;196",     // red
        Role::Dim => "2",
        Role::Bold => "1",
    };
    format!("\x1b[{code}m{}\x1b[0m", text.as_ref())
}

pub fn emoji(tag: &str, style: &StyleOptions) -> &'static str {
    if !style.use_emoji {
        return "";
    }
    match tag {
        "success" => "✔",
        "error" => "✖",
        "warn" => "⚠",
        "info" => "ℹ",
        "tool" => "🛠",
        "search" => "🔎",
        "list" => "📜",
        "clock" => "⏱",
        "book" => "📘",
        _ => "",
    }
}

/* -------------------------------------------------------------------------- */
/* Boxes                                                                      */
/* -------------------------------------------------------------------------- */

fn box_chars(style: &StyleOptions) -> (char, char, char, char, char, char) {
    match style.box_style {
        BoxStyle::Light => ('─', '│', '┌', '┐', '└', '┘'),
        BoxStyle::Rounded => ('─', '│', '╭', '╮', '╰', '╯'),
    }
}

/// Boxed title line with an optional dimmed subtitle.
pub fn box_header(
    title: impl AsRef<str>,
    subtitle: Option<impl AsRef<str>>,
    style: &StyleOptions,
) -> String {
    let title_styled = color(Role::Primary, title.as_ref(), style);
    let inner = match subtitle.as_ref().map(|s| s.as_ref()) {
        Some(sub) if !sub.is_empty() => {
            format!("{title_styled}  {}", color(Role::Secondary, sub, style))
        }
        _ => title_styled,
    };
    boxed(None, &[inner], style)
}

/// Titled box around `body`; long lines are word-wrapped.
pub fn panel(title: impl AsRef<str>, body: &str, border: Role, style: &StyleOptions) -> String {
    let max_inner = style.term_width.clamp(20, 200) - 2 - style.padding * 2;
    let mut lines = Vec::new();
    for raw in body.lines() {
        if display_width(raw) <= max_inner {
            lines.push(raw.to_string());
        } else {
            lines.extend(wrap_text(raw, max_inner));
        }
    }
    if lines.is_empty() {
        lines.push(String::new());
    }
    let title = color(Role::Bold, title.as_ref(), style);
    let out = boxed(Some(&title), &lines, style);
    if style.use_color {
        // border glyphs only; the body keeps its own colors
        out.lines()
            .map(|l| color_border(l, border, style))
            .collect::<Vec<_>>()
            .join("\n")
    } else {
        out
    }
}

fn boxed(title: Option<&str>, lines: &[String], style: &StyleOptions) -> String {
    let (h, v, tl, tr, bl, br) = box_chars(style);
    let padding = style.padding;
    let limit = style.term_width.clamp(20, 200) - 2;

    let content_w = lines.iter().map(|l| display_width(l)).max().unwrap_or(0);
    let title_w = title.map(|t| display_width(t) + 2).unwrap_or(0);
    let inner_w = (content_w + padding * 2).max(title_w + 2).min(limit);

    let mut out = Vec::with_capacity(lines.len() + 2);
    match title {
        Some(t) => {
            let rest = inner_w.saturating_sub(display_width(t) + 3);
            out.push(format!("{tl}{h} {t} {}{tr}", h.to_string().repeat(rest)));
        }
        None => out.push(format!("{tl}{}{tr}", h.to_string().repeat(inner_w))),
    }

    let pad = " ".repeat(padding);
    for l in lines {
        let fill = inner_w.saturating_sub(display_width(l) + padding * 2);
        out.push(format!("{v}{pad}{l}{}{pad}{v}", " ".repeat(fill)));
    }
    out.push(format!("{bl}{}{br}", h.to_string().repeat(inner_w)));
    out.join("\n")
}

fn color_border(line: &str, role: Role, style: &StyleOptions) -> String {
    let inner = line
        .strip_prefix('│')
        .and_then(|rest| rest.strip_suffix('│'));
    match inner {
        Some(inner) => format!(
            "{}{inner}{}",
            color(role, "│", style),
            color(role, "│", style)
        ),
        None => color(role, line, style),
    }
}

/* -------------------------------------------------------------------------- */
/* Table Rendering                                                            */
/* -------------------------------------------------------------------------- */

#[derive(Debug, Clone)]
pub struct TableOpts {
    pub max_width: usize,
    pub truncate: bool,
    pub header_sep: bool,
    pub min_col_width: usize,
}

impl Default for TableOpts {
    fn default() -> Self {
        Self {
            max_width: 0, // 0 -> style.term_width
            truncate: true,
            header_sep: true,
            min_col_width: 2,
        }
    }
}

pub fn table(
    headers: &[&str],
    rows: &[Vec<String>],
    opts: TableOpts,
    style: &StyleOptions,
) -> String {
    if headers.is_empty() {
        return String::new();
    }
    let col_count = headers.len();
    let width_limit = if opts.max_width == 0 {
        style.term_width
    } else {
        opts.max_width.min(style.term_width)
    };

    let mut widths: Vec<usize> = headers.iter().map(|h| h.chars().count()).collect();
    for row in rows {
        for (i, cell) in row.iter().enumerate().take(col_count) {
            widths[i] = widths[i].max(display_width(cell));
        }
    }

    // Shrink the widest columns first until the row fits.
    let total_raw: usize = widths.iter().sum::<usize>() + (col_count - 1) * 2;
    if total_raw > width_limit {
        let mut overflow = total_raw - width_limit;
        let mut ordered: Vec<(usize, usize)> = widths.iter().copied().enumerate().collect();
        ordered.sort_by(|a, b| b.1.cmp(&a.1));
        for (idx, _) in ordered {
            if overflow == 0 {
                break;
            }
            let w = widths[idx];
            if w > opts.min_col_width {
                let shrink = (w - opts.min_col_width).min(overflow);
                widths[idx] -= shrink;
                overflow -= shrink;
            }
        }
    }

    let mut out = String::new();
    for (i, h) in headers.iter().enumerate() {
        if i > 0 {
            out.push_str("  ");
        }
        let cell = pad_or_truncate(h, widths[i], opts.truncate);
        out.push_str(&color(Role::Accent, cell, style));
    }
    out.push('\n');

    if opts.header_sep {
        let sep = widths
            .iter()
            .map(|w| "-".repeat(*w))
            .collect::<Vec<_>>()
            .join("  ");
        out.push_str(&color(Role::Dim, sep, style));
        out.push('\n');
    }

    for (r_idx, row) in rows.iter().enumerate() {
        for (c, width) in widths.iter().enumerate() {
            if c > 0 {
                out.push_str("  ");
            }
            let raw = row.get(c).map(|s| s.as_str()).unwrap_or("");
            out.push_str(&pad_or_truncate(raw, *width, opts.truncate));
        }
        if r_idx + 1 < rows.len() {
            out.push('\n');
        }
    }

    out
}

fn pad_or_truncate(s: &str, width: usize, truncate: bool) -> String {
    let len = display_width(s);
    if len == width {
        return s.to_string();
    }
    if len < width {
        return format!("{s}{}", " ".repeat(width - len));
    }
    if !truncate {
        return s.to_string();
    }
    let cut = truncate_ellipsis(&strip_ansi(s), width);
    let cut_len = cut.chars().count();
    format!("{cut}{}", " ".repeat(width.saturating_sub(cut_len)))
}

/* -------------------------------------------------------------------------- */
/* Text Helpers                                                               */
/* -------------------------------------------------------------------------- */

pub fn wrap_text(s: &str, max_width: usize) -> Vec<String> {
    if max_width == 0 {
        return vec![s.to_string()];
    }
    let mut lines = Vec::new();
    let mut current = String::new();
    for word in s.split_whitespace() {
        if !current.is_empty() && display_width(&current) + display_width(word) + 1 > max_width {
            lines.push(std::mem::take(&mut current));
        }
        if !current.is_empty() {
            current.push(' ');
        }
        current.push_str(word);
    }
    if !current.is_empty() {
        lines.push(current);
    }
    if lines.is_empty() {
        lines.push(String::new());
    }
    lines
}

pub fn truncate_ellipsis(s: &str, max_chars: usize) -> String {
    if max_chars == 0 {
        return String::new();
    }
    if s.chars().count() <= max_chars {
        return s.to_string();
    }
    if max_chars == 1 {
        return "…".into();
    }
    let mut out: String = s.chars().take(max_chars - 1).collect();
    out.push('…');
    out
}

/* -------------------------------------------------------------------------- */
/* ANSI / Width Utilities                                                     */
/* -------------------------------------------------------------------------- */

pub fn strip_ansi(s: &str) -> Cow<'_, str> {
    if !s.contains('\x1b') {
        return Cow::Borrowed(s);
    }
    let mut buf = String::with_capacity(s.len());
    let mut chars = s.chars().peekable();
    while let Some(c) = chars.next() {
        if c == '\x1b' && chars.peek() == Some(&'[') {
            chars.next();
            for n in chars.by_ref() {
                if n.is_ascii_alphabetic() {
                    break;
                }
            }
            continue;
        }
        buf.push(c);
    }
    Cow::Owned(buf)
}

fn display_width(s: &str) -> usize {
    strip_ansi(s).chars().count()
}

/* -------------------------------------------------------------------------- */
/* Tests                                                                      */
/* -------------------------------------------------------------------------- */
