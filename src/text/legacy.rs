//! Legacy colour-code parsing.
//!
//! Converts strings such as `"&6Coins: &e&l42"` or `"&#FF5733Hex"` into
//! [`StyledText`]. Both `&` and `§` introduce a code. A colour code resets
//! every decoration, as the legacy format does; `&r` resets everything.
//! Unknown codes are kept as literal text.

use super::style::{Decorations, NamedColor, Rgb, Style};
use super::styled::StyledText;

/// Parse legacy-formatted text.
pub fn parse(input: &str) -> StyledText {
    let mut runs: Vec<StyledText> = Vec::new();
    let mut current = String::new();
    let mut style = Style::EMPTY;
    let mut rest = input;

    while let Some(c) = rest.chars().next() {
        let after = &rest[c.len_utf8()..];
        if c == '&' || c == '§' {
            if let Some((next_style, consumed)) = read_code(after, &style) {
                if next_style != style && !current.is_empty() {
                    runs.push(StyledText::styled(std::mem::take(&mut current), style));
                }
                style = next_style;
                rest = &after[consumed..];
                continue;
            }
        }
        current.push(c);
        rest = after;
    }

    if !current.is_empty() {
        runs.push(StyledText::styled(current, style));
    }

    StyledText::container(Style::EMPTY, runs)
}

/// Read the code following a marker; returns the new style and bytes consumed.
fn read_code(after: &str, style: &Style) -> Option<(Style, usize)> {
    let code = after.chars().next()?;

    if code == '#' {
        let digits = after.get(1..7)?;
        let rgb = Rgb::from_hex_digits(digits)?;
        return Some((Style::new().color(rgb), 7));
    }

    let lower = code.to_ascii_lowercase();
    if let Some(named) = NamedColor::from_code(lower) {
        return Some((Style::new().color(named), 1));
    }

    let decoration = match lower {
        'k' => Decorations::OBFUSCATED,
        'l' => Decorations::BOLD,
        'm' => Decorations::STRIKETHROUGH,
        'n' => Decorations::UNDERLINED,
        'o' => Decorations::ITALIC,
        'r' => return Some((Style::EMPTY, 1)),
        _ => return None,
    };
    Some((style.decorate(decoration), 1))
}

/// Strip every recognised code, leaving the displayed text.
pub fn strip(input: &str) -> String {
    parse(input).plain_text()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::text::style::TextColor;

    #[test]
    fn test_parse_plain() {
        let text = parse("hello");
        assert_eq!(text.plain_text(), "hello");
        assert_eq!(text.runs().len(), 1);
    }

    #[test]
    fn test_parse_colors_and_decorations() {
        let text = parse("&6Coins: &e&l42");
        let runs = text.runs();

        assert_eq!(runs.len(), 2);
        assert_eq!(runs[0].text, "Coins: ");
        assert_eq!(runs[0].style.text_color(), Some(TextColor::Named(NamedColor::Gold)));
        assert_eq!(runs[1].text, "42");
        assert_eq!(runs[1].style.text_color(), Some(TextColor::Named(NamedColor::Yellow)));
        assert!(runs[1].style.enabled().contains(Decorations::BOLD));
    }

    #[test]
    fn test_color_resets_decorations() {
        let runs = parse("&lA&cB").runs();
        assert!(runs[0].style.enabled().contains(Decorations::BOLD));
        assert!(!runs[1].style.enabled().contains(Decorations::BOLD));
    }

    #[test]
    fn test_parse_hex() {
        let runs = parse("&#FF5733Hex").runs();
        assert_eq!(runs.len(), 1);
        assert_eq!(runs[0].style.text_color(), Some(TextColor::Rgb(Rgb::new(0xFF, 0x57, 0x33))));
    }

    #[test]
    fn test_section_sign_and_reset() {
        let runs = parse("§aGo§rStop").runs();
        assert_eq!(runs.len(), 2);
        assert!(runs[1].style.is_empty());
    }

    #[test]
    fn test_unknown_code_is_literal() {
        assert_eq!(strip("50&z off & more"), "50&z off & more");
        assert_eq!(strip("&#12zz56x"), "&#12zz56x");
    }

    #[test]
    fn test_trailing_marker() {
        assert_eq!(strip("end&"), "end&");
    }

    #[test]
    fn test_empty() {
        assert!(parse("").is_blank());
        assert!(parse("&a&l").is_blank());
    }
}
