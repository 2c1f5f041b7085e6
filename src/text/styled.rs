//! StyledText: an immutable tree of styled text runs.
//!
//! Each node carries a literal string, a [`Style`], and ordered children.
//! Pre-order concatenation of every node's literal reproduces the displayed
//! text; a node's effective style is its ancestors' styles merged top-down.

use super::style::Style;
use unicode_segmentation::UnicodeSegmentation;

/// A run of text with its fully-resolved style.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Run {
    /// The literal text.
    pub text: String,
    /// Style after merging every ancestor's style.
    pub style: Style,
}

impl Run {
    /// Length in user-perceived characters.
    pub fn len(&self) -> usize {
        self.text.graphemes(true).count()
    }

    /// Whether the run has no text.
    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }
}

/// Styled rich text.
///
/// # Example
///
/// ```
/// use scoreline::{NamedColor, Style, StyledText};
///
/// let text = StyledText::styled("Coins: ", Style::new().color(NamedColor::Gold))
///     .append(StyledText::plain("42"));
/// assert_eq!(text.plain_text(), "Coins: 42");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct StyledText {
    content: String,
    style: Style,
    children: Vec<StyledText>,
}

impl StyledText {
    /// Empty text with no style.
    pub const fn empty() -> Self {
        Self {
            content: String::new(),
            style: Style::EMPTY,
            children: Vec::new(),
        }
    }

    /// Unstyled text.
    pub fn plain(content: impl Into<String>) -> Self {
        Self::styled(content, Style::EMPTY)
    }

    /// Text with a style.
    pub fn styled(content: impl Into<String>, style: Style) -> Self {
        Self {
            content: content.into(),
            style,
            children: Vec::new(),
        }
    }

    /// A styled container whose text comes entirely from `children`.
    pub fn container(style: Style, children: Vec<Self>) -> Self {
        Self {
            content: String::new(),
            style,
            children,
        }
    }

    /// Append a child (builder pattern).
    #[must_use]
    pub fn append(mut self, child: Self) -> Self {
        self.children.push(child);
        self
    }

    /// Replace this node's own style (builder pattern).
    #[must_use]
    pub const fn with_style(mut self, style: Style) -> Self {
        self.style = style;
        self
    }

    /// This node's literal text (children excluded).
    pub fn content(&self) -> &str {
        &self.content
    }

    /// This node's own style.
    pub const fn style(&self) -> &Style {
        &self.style
    }

    /// Direct children.
    pub fn children(&self) -> &[Self] {
        &self.children
    }

    /// The displayed text without any styling.
    pub fn plain_text(&self) -> String {
        let mut out = String::with_capacity(self.content.len());
        self.write_plain(&mut out);
        out
    }

    fn write_plain(&self, out: &mut String) {
        out.push_str(&self.content);
        for child in &self.children {
            child.write_plain(out);
        }
    }

    /// Length of the displayed text in user-perceived characters.
    pub fn plain_len(&self) -> usize {
        self.content.graphemes(true).count()
            + self.children.iter().map(Self::plain_len).sum::<usize>()
    }

    /// Whether the displayed text is empty.
    pub fn is_blank(&self) -> bool {
        self.content.is_empty() && self.children.iter().all(Self::is_blank)
    }

    /// Flatten into runs in pre-order, resolving inherited style.
    ///
    /// Nodes with empty literals produce no run.
    pub fn runs(&self) -> Vec<Run> {
        let mut runs = Vec::new();
        self.collect_runs(&Style::EMPTY, &mut runs);
        runs
    }

    fn collect_runs(&self, inherited: &Style, runs: &mut Vec<Run>) {
        let style = inherited.merge(&self.style);
        if !self.content.is_empty() {
            runs.push(Run {
                text: self.content.clone(),
                style,
            });
        }
        for child in &self.children {
            child.collect_runs(&style, runs);
        }
    }
}

impl From<&str> for StyledText {
    fn from(content: &str) -> Self {
        Self::plain(content)
    }
}

impl From<String> for StyledText {
    fn from(content: String) -> Self {
        Self::plain(content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::text::style::{Decorations, NamedColor, TextColor};

    #[test]
    fn test_plain_text_preorder() {
        let text = StyledText::plain("a")
            .append(StyledText::plain("b").append(StyledText::plain("c")))
            .append(StyledText::plain("d"));
        assert_eq!(text.plain_text(), "abcd");
        assert_eq!(text.plain_len(), 4);
    }

    #[test]
    fn test_plain_len_counts_graphemes() {
        let text = StyledText::plain("e\u{301}x");
        assert_eq!(text.plain_len(), 2);
    }

    #[test]
    fn test_runs_inherit_style() {
        let text = StyledText::styled("A", Style::new().color(NamedColor::Red))
            .append(StyledText::styled("B", Style::new().bold()));
        let runs = text.runs();

        assert_eq!(runs.len(), 2);
        assert_eq!(runs[1].text, "B");
        assert_eq!(runs[1].style.text_color(), Some(TextColor::Named(NamedColor::Red)));
        assert!(runs[1].style.enabled().contains(Decorations::BOLD));
    }

    #[test]
    fn test_runs_skip_empty_literals() {
        let text = StyledText::container(Style::new().bold(), vec![StyledText::plain("x")]);
        let runs = text.runs();
        assert_eq!(runs.len(), 1);
        assert!(runs[0].style.enabled().contains(Decorations::BOLD));
    }

    #[test]
    fn test_is_blank() {
        assert!(StyledText::empty().is_blank());
        assert!(StyledText::container(Style::new().bold(), vec![StyledText::empty()]).is_blank());
        assert!(!StyledText::plain(" ").is_blank());
    }
}
