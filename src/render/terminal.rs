//! Terminal renderer: draws each viewer's sidebar with ANSI sequences.
//!
//! Slot writes only update an in-memory model. [`TerminalRenderer::present`]
//! emits one viewer's sidebar (title on top, row 15 down to row 1, badges
//! right-aligned) in a single buffered write, the way the compositor's render
//! actor flushes a frame.

use super::Renderer;
use crate::error::RenderError;
use crate::panel::{Row, Slot, ViewerId};
use crate::text::{Decorations, Run, StyledText};
use crossterm::{
    cursor::MoveTo,
    queue,
    style::{Attribute, Color, Print, SetAttribute, SetForegroundColor},
    terminal::{Clear, ClearType},
};
use parking_lot::Mutex;
use std::collections::BTreeMap;
use std::io::{self, Write};
use unicode_width::UnicodeWidthStr;

#[derive(Debug, Default)]
struct Sidebar {
    title: Option<StyledText>,
    rows: [Option<(StyledText, Option<StyledText>)>; Row::COUNT],
    dirty: bool,
}

#[derive(Debug)]
struct TerminalState<W> {
    out: W,
    sidebars: BTreeMap<ViewerId, Sidebar>,
}

/// Renderer that paints sidebars to a terminal-like writer.
#[derive(Debug)]
pub struct TerminalRenderer<W: Write + Send> {
    state: Mutex<TerminalState<W>>,
    width: u16,
}

impl TerminalRenderer<io::Stdout> {
    /// Render to standard output.
    pub fn stdout(width: u16) -> Self {
        Self::new(io::stdout(), width)
    }
}

impl<W: Write + Send> TerminalRenderer<W> {
    /// Render into `out`, laying rows out `width` columns wide.
    pub fn new(out: W, width: u16) -> Self {
        Self {
            state: Mutex::new(TerminalState {
                out,
                sidebars: BTreeMap::new(),
            }),
            width,
        }
    }

    /// Run `f` with the underlying writer.
    pub fn with_writer<R>(&self, f: impl FnOnce(&mut W) -> R) -> R {
        f(&mut self.state.lock().out)
    }

    /// Consume the renderer, returning the writer.
    pub fn into_inner(self) -> W {
        self.state.into_inner().out
    }

    /// Whether `viewer` has changes not yet presented.
    pub fn is_dirty(&self, viewer: ViewerId) -> bool {
        self.state.lock().sidebars.get(&viewer).is_some_and(|sidebar| sidebar.dirty)
    }

    /// Draw `viewer`'s sidebar from the top-left corner.
    pub fn present(&self, viewer: ViewerId) -> io::Result<()> {
        let mut state = self.state.lock();
        let TerminalState { out, sidebars } = &mut *state;
        let Some(sidebar) = sidebars.get_mut(&viewer) else {
            return Ok(());
        };

        let mut frame = Vec::with_capacity(1024);
        queue!(frame, MoveTo(0, 0), Clear(ClearType::All))?;

        let mut line: u16 = 0;
        if let Some(title) = &sidebar.title {
            queue!(frame, MoveTo(0, line))?;
            write_styled(&mut frame, title)?;
            line += 1;
        }
        for row in Row::all().rev() {
            let Some((text, badge)) = &sidebar.rows[row.index()] else {
                continue;
            };
            queue!(frame, MoveTo(0, line))?;
            write_styled(&mut frame, text)?;
            if let Some(badge) = badge {
                let badge_width = u16::try_from(badge.plain_text().width()).unwrap_or(self.width);
                queue!(frame, MoveTo(self.width.saturating_sub(badge_width), line))?;
                write_styled(&mut frame, badge)?;
            }
            line += 1;
        }

        // Flush to terminal in a single write
        out.write_all(&frame)?;
        out.flush()?;
        sidebar.dirty = false;
        Ok(())
    }

    /// Draw every viewer with pending changes.
    pub fn present_dirty(&self) -> io::Result<usize> {
        let dirty: Vec<ViewerId> = self
            .state
            .lock()
            .sidebars
            .iter()
            .filter(|(_, sidebar)| sidebar.dirty)
            .map(|(viewer, _)| *viewer)
            .collect();
        for viewer in &dirty {
            self.present(*viewer)?;
        }
        Ok(dirty.len())
    }
}

/// Emit runs with SGR colour and attribute sequences.
fn write_styled(out: &mut Vec<u8>, text: &StyledText) -> io::Result<()> {
    for Run { text, style } in text.runs() {
        if let Some(color) = style.text_color() {
            let rgb = color.rgb();
            queue!(out, SetForegroundColor(Color::Rgb { r: rgb.r, g: rgb.g, b: rgb.b }))?;
        }
        let decorations = style.enabled();
        for (flag, attribute) in [
            (Decorations::BOLD, Attribute::Bold),
            (Decorations::ITALIC, Attribute::Italic),
            (Decorations::UNDERLINED, Attribute::Underlined),
            (Decorations::STRIKETHROUGH, Attribute::CrossedOut),
        ] {
            if decorations.contains(flag) {
                queue!(out, SetAttribute(attribute))?;
            }
        }
        queue!(out, Print(text), SetAttribute(Attribute::Reset))?;
    }
    Ok(())
}

impl<W: Write + Send> Renderer for TerminalRenderer<W> {
    fn render(
        &self,
        viewer: ViewerId,
        slot: Slot,
        head: &StyledText,
        tail: &StyledText,
        badge: Option<&StyledText>,
    ) -> Result<(), RenderError> {
        let mut state = self.state.lock();
        let sidebar = state.sidebars.entry(viewer).or_default();
        let line = StyledText::empty().append(head.clone()).append(tail.clone());
        match slot {
            Slot::Title => sidebar.title = Some(line),
            Slot::Row(row) => sidebar.rows[row.index()] = Some((line, badge.cloned())),
        }
        sidebar.dirty = true;
        Ok(())
    }

    fn clear(&self, viewer: ViewerId, slot: Slot) -> Result<(), RenderError> {
        let mut state = self.state.lock();
        let Some(sidebar) = state.sidebars.get_mut(&viewer) else {
            return Ok(());
        };
        match slot {
            Slot::Title => sidebar.title = None,
            Slot::Row(row) => sidebar.rows[row.index()] = None,
        }
        sidebar.dirty = true;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::text::{legacy, NamedColor, Style};

    fn row(n: u8) -> Slot {
        Slot::Row(Row::new(n).unwrap())
    }

    fn screen(renderer: &TerminalRenderer<Vec<u8>>) -> vt100::Parser {
        let bytes = renderer.with_writer(std::mem::take);
        let mut parser = vt100::Parser::new(10, 40, 0);
        parser.process(&bytes);
        parser
    }

    fn lines(parser: &vt100::Parser) -> Vec<String> {
        parser
            .screen()
            .rows(0, 40)
            .map(|line| line.trim_end().to_owned())
            .collect()
    }

    #[test]
    fn test_present_orders_rows_top_down() {
        let renderer = TerminalRenderer::new(Vec::new(), 40);
        let viewer = ViewerId(1);
        let empty = StyledText::empty();
        renderer.render(viewer, Slot::Title, &StyledText::plain("Title"), &empty, None).unwrap();
        renderer.render(viewer, row(1), &StyledText::plain("low"), &empty, None).unwrap();
        renderer.render(viewer, row(15), &StyledText::plain("high"), &empty, None).unwrap();
        renderer.present(viewer).unwrap();

        let lines = lines(&screen(&renderer));
        assert_eq!(lines[0], "Title");
        assert_eq!(lines[1], "high");
        assert_eq!(lines[2], "low");
        assert!(!renderer.is_dirty(viewer));
    }

    #[test]
    fn test_head_and_tail_joined() {
        let renderer = TerminalRenderer::new(Vec::new(), 40);
        let viewer = ViewerId(1);
        renderer
            .render(viewer, row(2), &StyledText::plain("0123456789abcdef"), &StyledText::plain("ghi"), None)
            .unwrap();
        renderer.present(viewer).unwrap();
        assert_eq!(lines(&screen(&renderer))[0], "0123456789abcdefghi");
    }

    #[test]
    fn test_badge_right_aligned() {
        let renderer = TerminalRenderer::new(Vec::new(), 40);
        let viewer = ViewerId(1);
        renderer
            .render(viewer, row(3), &StyledText::plain("Kills"), &StyledText::empty(), Some(&StyledText::plain("12")))
            .unwrap();
        renderer.present(viewer).unwrap();

        let parser = screen(&renderer);
        let line = &lines(&parser)[0];
        assert!(line.starts_with("Kills"));
        assert!(line.ends_with("12"));
        assert_eq!(parser.screen().cell(0, 38).unwrap().contents(), "1");
    }

    #[test]
    fn test_styles_emitted() {
        let renderer = TerminalRenderer::new(Vec::new(), 40);
        let viewer = ViewerId(1);
        let text = StyledText::styled("Gold", Style::new().color(NamedColor::Gold).bold());
        renderer.render(viewer, row(1), &text, &StyledText::empty(), None).unwrap();
        renderer.present(viewer).unwrap();

        let parser = screen(&renderer);
        let cell = parser.screen().cell(0, 0).unwrap();
        assert!(cell.bold());
        assert_eq!(cell.fgcolor(), vt100::Color::Rgb(0xFF, 0xAA, 0x00));
    }

    #[test]
    fn test_clear_removes_row() {
        let renderer = TerminalRenderer::new(Vec::new(), 40);
        let viewer = ViewerId(1);
        let line = legacy::parse("&aOnline");
        renderer.render(viewer, row(4), &line, &StyledText::empty(), None).unwrap();
        renderer.clear(viewer, row(4)).unwrap();
        assert!(renderer.is_dirty(viewer));
        assert_eq!(renderer.present_dirty().unwrap(), 1);
        assert!(lines(&screen(&renderer)).iter().all(String::is_empty));
    }
}
