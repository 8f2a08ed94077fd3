//! Terminal rendering: boards, counts, durations.

use std::time::Duration;

use sk_core::{Board, Cell};

/// Cell glyphs for board output.
#[derive(Debug, Clone, Copy)]
pub struct Glyphs {
    pub peg: &'static str,
    pub hole: &'static str,
    pub off: &'static str,
}

impl Glyphs {
    pub const EMOJI: Glyphs = Glyphs {
        peg: "🟡",
        hole: "⚫",
        off: "  ",
    };

    pub const ASCII: Glyphs = Glyphs {
        peg: "o",
        hole: ".",
        off: " ",
    };

    pub fn pick(ascii: bool) -> Glyphs {
        if ascii {
            Self::ASCII
        } else {
            Self::EMOJI
        }
    }
}

/// Board as seven lines, each indented by `indent`.
pub fn board(b: &Board, g: Glyphs, indent: &str) -> String {
    let mut out = String::new();
    for row in b.cells() {
        out.push_str(indent);
        for cell in row {
            out.push_str(match cell {
                Cell::Peg => g.peg,
                Cell::Empty => g.hole,
                Cell::OutOfBounds => g.off,
            });
        }
        // Off-board padding is trailing noise.
        let trimmed = out.trim_end_matches(' ').len();
        out.truncate(trimmed);
        out.push('\n');
    }
    out
}

/// `1234567` -> `1,234,567`.
pub fn thousands(n: u64) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

/// Milliseconds below 10 s, seconds from there on.
pub fn elapsed(d: Duration) -> String {
    if d < Duration::from_secs(10) {
        format!("{} ms", thousands(d.as_millis() as u64))
    } else {
        format!("{:.2} s", d.as_secs_f64())
    }
}

pub fn yes_no(b: bool) -> &'static str {
    if b {
        "yes"
    } else {
        "no"
    }
}
