//! Small seed patterns for the runner, benchmarks and tests.

/// Named starting patterns, placed relative to an origin.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Pattern {
    /// Period-2 oscillator, horizontal phase.
    Blinker,
    /// 2x2 still life.
    Block,
    /// Diagonal spaceship moving towards +x, +y.
    Glider,
    /// Methuselah that stabilizes after 1103 generations.
    RPentomino,
    /// Horizontal line of the given length, centered on the origin.
    Line(u32),
}

impl Pattern {
    /// Parse a runner pattern name. `line` takes its length separately.
    pub fn from_name(name: &str, line_len: u32) -> Option<Self> {
        match name.to_ascii_lowercase().as_str() {
            "blinker" => Some(Self::Blinker),
            "block" => Some(Self::Block),
            "glider" => Some(Self::Glider),
            "r-pentomino" | "rpentomino" => Some(Self::RPentomino),
            "line" => Some(Self::Line(line_len)),
            _ => None,
        }
    }

    /// Live cells of the pattern translated to `(x, y)`.
    pub fn cells(self, x: i32, y: i32) -> Vec<(i32, i32)> {
        let local: Vec<(i32, i32)> = match self {
            Self::Blinker => vec![(-1, 0), (0, 0), (1, 0)],
            Self::Block => vec![(0, 0), (1, 0), (0, 1), (1, 1)],
            Self::Glider => vec![(1, 0), (2, 1), (0, 2), (1, 2), (2, 2)],
            Self::RPentomino => vec![(1, 0), (2, 0), (0, 1), (1, 1), (1, 2)],
            Self::Line(len) => {
                let half = (len / 2) as i32;
                (0..len as i32).map(|i| (i - half, 0)).collect()
            }
        };
        local
            .into_iter()
            .map(|(dx, dy)| (x.wrapping_add(dx), y.wrapping_add(dy)))
            .collect()
    }
}
