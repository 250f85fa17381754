//! Mana cost parsing.
//!
//! A cost is a run of brace-delimited symbols such as `{2}{W}{W}` or
//! `{1}{W/U}`. Parsing is total: anything between braces that isn't a
//! recognised symbol contributes nothing, and text outside braces is
//! ignored. An empty cost (lands, tokens) is simply zero.

use std::fmt;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};
use tracing::debug;

// Constant pattern, checked by the tests below.
#[allow(clippy::expect_used)]
static SYMBOL_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\{([^{}]*)\}").expect("mana symbol regex should compile"));

/// One of the five colors, or colorless mana `{C}`.
///
/// Ordering follows the WUBRG convention with colorless last.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum ManaColor {
    White,
    Blue,
    Black,
    Red,
    Green,
    Colorless,
}

impl ManaColor {
    pub const ALL: [ManaColor; 6] = [
        ManaColor::White,
        ManaColor::Blue,
        ManaColor::Black,
        ManaColor::Red,
        ManaColor::Green,
        ManaColor::Colorless,
    ];

    /// Maps a single-letter mana symbol to its color.
    pub fn from_symbol(symbol: &str) -> Option<Self> {
        match symbol {
            "W" => Some(ManaColor::White),
            "U" => Some(ManaColor::Blue),
            "B" => Some(ManaColor::Black),
            "R" => Some(ManaColor::Red),
            "G" => Some(ManaColor::Green),
            "C" => Some(ManaColor::Colorless),
            _ => None,
        }
    }

    /// The oracle letter for this color.
    pub fn symbol(self) -> char {
        match self {
            ManaColor::White => 'W',
            ManaColor::Blue => 'U',
            ManaColor::Black => 'B',
            ManaColor::Red => 'R',
            ManaColor::Green => 'G',
            ManaColor::Colorless => 'C',
        }
    }

    /// Returns false only for colorless.
    pub fn is_colored(self) -> bool {
        self != ManaColor::Colorless
    }

    fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for ManaColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ManaColor::White => "White",
            ManaColor::Blue => "Blue",
            ManaColor::Black => "Black",
            ManaColor::Red => "Red",
            ManaColor::Green => "Green",
            ManaColor::Colorless => "Colorless",
        };
        f.write_str(name)
    }
}

/// A recognised mana symbol.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ManaSymbol {
    /// Generic mana `{N}`.
    Generic(u32),
    /// A single colored or colorless pip, e.g. `{W}` or `{C}`.
    Pip(ManaColor),
    /// Hybrid `{X/Y}`: one toward converted cost, no color pip.
    Hybrid(ManaColor, ManaColor),
}

impl ManaSymbol {
    /// Parses the text between a pair of braces.
    pub fn parse(inner: &str) -> Option<Self> {
        if !inner.is_empty() && inner.bytes().all(|b| b.is_ascii_digit()) {
            return inner.parse().ok().map(ManaSymbol::Generic);
        }
        if let Some((left, right)) = inner.split_once('/') {
            let left = ManaColor::from_symbol(left)?;
            let right = ManaColor::from_symbol(right)?;
            return Some(ManaSymbol::Hybrid(left, right));
        }
        ManaColor::from_symbol(inner).map(ManaSymbol::Pip)
    }

    /// Contribution of this symbol to converted mana cost.
    pub fn mana_value(self) -> u32 {
        match self {
            ManaSymbol::Generic(n) => n,
            ManaSymbol::Pip(_) | ManaSymbol::Hybrid(..) => 1,
        }
    }
}

/// Pip counts per color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ColorPips([u32; 6]);

impl ColorPips {
    /// Pip count for one color.
    pub fn get(&self, color: ManaColor) -> u32 {
        self.0[color.index()]
    }

    /// Adds `count` pips of `color`.
    pub fn add(&mut self, color: ManaColor, count: u32) {
        let slot = &mut self.0[color.index()];
        *slot = slot.saturating_add(count);
    }

    /// Total pips across every color.
    pub fn total(&self) -> u32 {
        self.0.iter().sum()
    }

    pub fn is_empty(&self) -> bool {
        self.0.iter().all(|&n| n == 0)
    }

    /// Colors with a non-zero count, in WUBRG-then-colorless order.
    pub fn iter(&self) -> impl Iterator<Item = (ManaColor, u32)> + '_ {
        ManaColor::ALL
            .into_iter()
            .map(|color| (color, self.get(color)))
            .filter(|&(_, n)| n > 0)
    }
}

/// A parsed mana cost.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ManaCost {
    symbols: Vec<ManaSymbol>,
}

impl ManaCost {
    /// Parses an oracle-style cost string. Never fails.
    pub fn parse(text: &str) -> Self {
        let mut symbols = Vec::new();
        for caps in SYMBOL_REGEX.captures_iter(text) {
            let inner = &caps[1];
            match ManaSymbol::parse(inner) {
                Some(symbol) => symbols.push(symbol),
                None => debug!(symbol = inner, cost = text, "ignoring unrecognised mana symbol"),
            }
        }
        Self { symbols }
    }

    /// Recognised symbols in source order.
    pub fn symbols(&self) -> &[ManaSymbol] {
        &self.symbols
    }

    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }

    /// Converted mana cost: generic amounts plus one per pip or hybrid.
    pub fn converted_cost(&self) -> u32 {
        self.symbols
            .iter()
            .fold(0u32, |acc, s| acc.saturating_add(s.mana_value()))
    }

    /// Single-color pips. Hybrid symbols do not count toward any color.
    pub fn pips(&self) -> ColorPips {
        let mut pips = ColorPips::default();
        for symbol in &self.symbols {
            if let ManaSymbol::Pip(color) = symbol {
                pips.add(*color, 1);
            }
        }
        pips
    }

    /// Distinct colors (W/U/B/R/G) the cost asks for.
    pub fn colors(&self) -> Vec<ManaColor> {
        self.pips()
            .iter()
            .map(|(color, _)| color)
            .filter(|color| color.is_colored())
            .collect()
    }
}
