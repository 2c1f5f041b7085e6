//! Style: colour and decoration state carried by every text run.
//!
//! Decorations are tri-state. A style can turn a decoration on, turn it off,
//! or leave it unset so that it is inherited from the enclosing node. Merging
//! two styles lets the child win on every attribute it sets explicitly.

use bitflags::bitflags;

/// True-color RGB representation.
#[derive(Clone, Copy, PartialEq, Eq, Default, Hash)]
pub struct Rgb {
    /// Red channel (0-255)
    pub r: u8,
    /// Green channel (0-255)
    pub g: u8,
    /// Blue channel (0-255)
    pub b: u8,
}

impl Rgb {
    /// Create a new RGB color.
    #[inline]
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Create from a 24-bit hex color (e.g., 0xFF5500).
    #[inline]
    pub const fn from_u32(hex: u32) -> Self {
        Self::new(
            ((hex >> 16) & 0xFF) as u8,
            ((hex >> 8) & 0xFF) as u8,
            (hex & 0xFF) as u8,
        )
    }

    /// Parse six hex digits (`"FF5500"`), without a leading `#`.
    pub fn from_hex_digits(digits: &str) -> Option<Self> {
        if digits.len() != 6 || !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
            return None;
        }
        u32::from_str_radix(digits, 16).ok().map(Self::from_u32)
    }
}

impl std::fmt::Debug for Rgb {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

impl From<(u8, u8, u8)> for Rgb {
    #[inline]
    fn from((r, g, b): (u8, u8, u8)) -> Self {
        Self::new(r, g, b)
    }
}

impl From<u32> for Rgb {
    #[inline]
    fn from(hex: u32) -> Self {
        Self::from_u32(hex)
    }
}

/// The sixteen legacy palette colours, in legacy code order (`0`-`f`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NamedColor {
    /// `&0`
    Black,
    /// `&1`
    DarkBlue,
    /// `&2`
    DarkGreen,
    /// `&3`
    DarkAqua,
    /// `&4`
    DarkRed,
    /// `&5`
    DarkPurple,
    /// `&6`
    Gold,
    /// `&7`
    Gray,
    /// `&8`
    DarkGray,
    /// `&9`
    Blue,
    /// `&a`
    Green,
    /// `&b`
    Aqua,
    /// `&c`
    Red,
    /// `&d`
    LightPurple,
    /// `&e`
    Yellow,
    /// `&f`
    White,
}

impl NamedColor {
    /// All named colours in code order.
    pub const ALL: [Self; 16] = [
        Self::Black,
        Self::DarkBlue,
        Self::DarkGreen,
        Self::DarkAqua,
        Self::DarkRed,
        Self::DarkPurple,
        Self::Gold,
        Self::Gray,
        Self::DarkGray,
        Self::Blue,
        Self::Green,
        Self::Aqua,
        Self::Red,
        Self::LightPurple,
        Self::Yellow,
        Self::White,
    ];

    /// Look up a colour by its legacy code character (case-insensitive).
    pub fn from_code(code: char) -> Option<Self> {
        code.to_digit(16).map(|i| Self::ALL[i as usize])
    }

    /// The RGB value this colour is displayed as.
    pub const fn rgb(self) -> Rgb {
        match self {
            Self::Black => Rgb::from_u32(0x00_0000),
            Self::DarkBlue => Rgb::from_u32(0x00_00AA),
            Self::DarkGreen => Rgb::from_u32(0x00_AA00),
            Self::DarkAqua => Rgb::from_u32(0x00_AAAA),
            Self::DarkRed => Rgb::from_u32(0xAA_0000),
            Self::DarkPurple => Rgb::from_u32(0xAA_00AA),
            Self::Gold => Rgb::from_u32(0xFF_AA00),
            Self::Gray => Rgb::from_u32(0xAA_AAAA),
            Self::DarkGray => Rgb::from_u32(0x55_5555),
            Self::Blue => Rgb::from_u32(0x55_55FF),
            Self::Green => Rgb::from_u32(0x55_FF55),
            Self::Aqua => Rgb::from_u32(0x55_FFFF),
            Self::Red => Rgb::from_u32(0xFF_5555),
            Self::LightPurple => Rgb::from_u32(0xFF_55FF),
            Self::Yellow => Rgb::from_u32(0xFF_FF55),
            Self::White => Rgb::from_u32(0xFF_FFFF),
        }
    }
}

/// A text colour: either a palette entry or an arbitrary RGB value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TextColor {
    /// Legacy palette colour.
    Named(NamedColor),
    /// 24-bit colour.
    Rgb(Rgb),
}

impl TextColor {
    /// The RGB value used for display.
    pub const fn rgb(self) -> Rgb {
        match self {
            Self::Named(named) => named.rgb(),
            Self::Rgb(rgb) => rgb,
        }
    }
}

impl From<NamedColor> for TextColor {
    fn from(named: NamedColor) -> Self {
        Self::Named(named)
    }
}

impl From<Rgb> for TextColor {
    fn from(rgb: Rgb) -> Self {
        Self::Rgb(rgb)
    }
}

bitflags! {
    /// Text decorations.
    ///
    /// These can be combined using bitwise OR.
    ///
    /// # Example
    /// ```
    /// use scoreline::Decorations;
    /// let style = Decorations::BOLD | Decorations::ITALIC;
    /// assert!(style.contains(Decorations::BOLD));
    /// ```
    #[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct Decorations: u8 {
        /// Bold text
        const BOLD = 0b0000_0001;
        /// Italic text
        const ITALIC = 0b0000_0010;
        /// Underlined text
        const UNDERLINED = 0b0000_0100;
        /// Strikethrough text
        const STRIKETHROUGH = 0b0000_1000;
        /// Scrambled text
        const OBFUSCATED = 0b0001_0000;
    }
}

impl std::fmt::Debug for Decorations {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        bitflags::parser::to_writer(self, f)
    }
}

/// Colour plus tri-state decorations.
///
/// A decoration bit is never present in both `enabled` and `disabled`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Style {
    color: Option<TextColor>,
    enabled: Decorations,
    disabled: Decorations,
}

impl Style {
    /// A style that sets nothing and inherits everything.
    pub const EMPTY: Self = Self {
        color: None,
        enabled: Decorations::empty(),
        disabled: Decorations::empty(),
    };

    /// Create an empty style.
    #[inline]
    pub const fn new() -> Self {
        Self::EMPTY
    }

    /// Set the colour (builder pattern).
    #[inline]
    #[must_use]
    pub fn color(mut self, color: impl Into<TextColor>) -> Self {
        self.color = Some(color.into());
        self
    }

    /// Explicitly turn decorations on (builder pattern).
    #[inline]
    #[must_use]
    pub fn decorate(mut self, decorations: Decorations) -> Self {
        self.enabled |= decorations;
        self.disabled &= !decorations;
        self
    }

    /// Explicitly turn decorations off (builder pattern).
    #[inline]
    #[must_use]
    pub fn undecorate(mut self, decorations: Decorations) -> Self {
        self.disabled |= decorations;
        self.enabled &= !decorations;
        self
    }

    /// Shorthand for `decorate(Decorations::BOLD)`.
    #[inline]
    #[must_use]
    pub fn bold(self) -> Self {
        self.decorate(Decorations::BOLD)
    }

    /// Shorthand for `decorate(Decorations::ITALIC)`.
    #[inline]
    #[must_use]
    pub fn italic(self) -> Self {
        self.decorate(Decorations::ITALIC)
    }

    /// The explicit colour, if any.
    #[inline]
    pub const fn text_color(&self) -> Option<TextColor> {
        self.color
    }

    /// Decorations explicitly turned on.
    #[inline]
    pub const fn enabled(&self) -> Decorations {
        self.enabled
    }

    /// Decorations explicitly turned off.
    #[inline]
    pub const fn disabled(&self) -> Decorations {
        self.disabled
    }

    /// Whether this style sets no attribute at all.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.color.is_none() && self.enabled.is_empty() && self.disabled.is_empty()
    }

    /// Layer `child` over `self`; every attribute `child` sets wins.
    #[must_use]
    pub fn merge(&self, child: &Self) -> Self {
        Self {
            color: child.color.or(self.color),
            enabled: (self.enabled & !child.disabled) | child.enabled,
            disabled: (self.disabled & !child.enabled) | child.disabled,
        }
    }
}
