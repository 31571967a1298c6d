//! Text attribute word and the color tokens that mutate it.
//!
//! `Attributes` is opaque outside this crate: callers only combine it with
//! [`ColorToken`]s and hand it back to a driver. The bit layout (three color
//! components plus an intensity bit per target) stays private.

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Target {
    Foreground,
    Background,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ColorOp {
    Set,
    Clear,
    Toggle,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Component {
    Red,
    Green,
    Blue,
    Bright,
}

/// Marker that opens an embedded color token.
pub const TOKEN_MARKER: char = '\u{1b}';

/// One embedded color instruction: `(target, operation, component)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ColorToken {
    pub target: Target,
    pub op: ColorOp,
    pub component: Component,
}

impl ColorToken {
    pub const fn new(target: Target, op: ColorOp, component: Component) -> Self {
        Self {
            target,
            op,
            component,
        }
    }

    /// Decode the three units following a marker. `None` when any unit is
    /// outside the token alphabet.
    pub fn from_units(target: char, op: char, component: char) -> Option<Self> {
        let target = match target {
            'F' => Target::Foreground,
            'B' => Target::Background,
            _ => return None,
        };
        let op = match op {
            'S' => ColorOp::Set,
            'C' => ColorOp::Clear,
            'T' => ColorOp::Toggle,
            _ => return None,
        };
        let component = match component {
            'R' => Component::Red,
            'G' => Component::Green,
            'B' => Component::Blue,
            'X' => Component::Bright,
            _ => return None,
        };
        Some(Self::new(target, op, component))
    }

    /// The four-unit textual form, marker included.
    pub fn encode(&self) -> String {
        let t = match self.target {
            Target::Foreground => 'F',
            Target::Background => 'B',
        };
        let o = match self.op {
            ColorOp::Set => 'S',
            ColorOp::Clear => 'C',
            ColorOp::Toggle => 'T',
        };
        let c = match self.component {
            Component::Red => 'R',
            Component::Green => 'G',
            Component::Blue => 'B',
            Component::Bright => 'X',
        };
        [TOKEN_MARKER, t, o, c].iter().collect()
    }

    /// Tokens that drive `target` to the color with the given `(red, green,
    /// blue, bright)` components, or back to the default color when `None`.
    pub fn sequence(target: Target, color: Option<[bool; 4]>) -> [ColorToken; 4] {
        let wanted = color.unwrap_or_else(|| Attributes::DEFAULT.components(target));
        let comps = [
            Component::Red,
            Component::Green,
            Component::Blue,
            Component::Bright,
        ];
        comps.map(|component| {
            let idx = component_index(component);
            let op = if wanted[idx] {
                ColorOp::Set
            } else {
                ColorOp::Clear
            };
            ColorToken::new(target, op, component)
        })
    }
}

fn component_index(c: Component) -> usize {
    match c {
        Component::Red => 0,
        Component::Green => 1,
        Component::Blue => 2,
        Component::Bright => 3,
    }
}

const FG_BLUE: u8 = 0x01;
const FG_GREEN: u8 = 0x02;
const FG_RED: u8 = 0x04;
const FG_BRIGHT: u8 = 0x08;
const BG_SHIFT: u8 = 4;

/// Opaque text attribute word.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Attributes(u8);

impl Default for Attributes {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl Attributes {
    /// Light grey on black: the starting attributes of a fresh console.
    pub const DEFAULT: Attributes = Attributes(FG_RED | FG_GREEN | FG_BLUE);

    fn mask(target: Target, component: Component) -> u8 {
        let base = match component {
            Component::Red => FG_RED,
            Component::Green => FG_GREEN,
            Component::Blue => FG_BLUE,
            Component::Bright => FG_BRIGHT,
        };
        match target {
            Target::Foreground => base,
            Target::Background => base << BG_SHIFT,
        }
    }

    /// Apply one token: `Set` ORs the bit, `Clear` masks it out, `Toggle` XORs it.
    #[must_use]
    pub fn apply(self, token: &ColorToken) -> Attributes {
        let m = Self::mask(token.target, token.component);
        Attributes(match token.op {
            ColorOp::Set => self.0 | m,
            ColorOp::Clear => self.0 & !m,
            ColorOp::Toggle => self.0 ^ m,
        })
    }

    /// `(red, green, blue, bright)` for one target.
    pub fn components(self, target: Target) -> [bool; 4] {
        [
            Component::Red,
            Component::Green,
            Component::Blue,
            Component::Bright,
        ]
        .map(|c| self.0 & Self::mask(target, c) != 0)
    }

    /// True when `target` is at its default value.
    pub fn is_default(self, target: Target) -> bool {
        self.components(target) == Self::DEFAULT.components(target)
    }
}
