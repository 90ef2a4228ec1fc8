//! The fixed move vocabulary: outer faces, wide turns, slices, and whole-cube
//! rotations, each with a normalized modifier.

use std::fmt;
use thiserror::Error;

/// A letter from the fixed move vocabulary. Wide turns are written with the
/// lowercase letter in notation (`u`, `r`, ...).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BaseMove {
    U,
    D,
    F,
    B,
    L,
    R,
    Uw,
    Dw,
    Fw,
    Bw,
    Lw,
    Rw,
    M,
    E,
    S,
    X,
    Y,
    Z,
}

/// A primitive layer turn. Every `BaseMove` is a composition of one to three
/// primitives sharing a direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Primitive {
    U,
    D,
    F,
    B,
    L,
    R,
    M,
    E,
    S,
}

/// Normalized turn amount. `3`, `3'`, and `2'` collapse to these three at
/// parse time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Modifier {
    Single,
    Prime,
    Double,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Move {
    pub base: BaseMove,
    pub modifier: Modifier,
}

#[derive(Error, Debug, PartialEq, Eq)]
pub enum MoveParseError {
    #[error("unknown move token {0:?}")]
    UnknownToken(String),
}

impl BaseMove {
    fn from_letter(letter: &str) -> Option<BaseMove> {
        Some(match letter {
            "U" => BaseMove::U,
            "D" => BaseMove::D,
            "F" => BaseMove::F,
            "B" => BaseMove::B,
            "L" => BaseMove::L,
            "R" => BaseMove::R,
            "u" => BaseMove::Uw,
            "d" => BaseMove::Dw,
            "f" => BaseMove::Fw,
            "b" => BaseMove::Bw,
            "l" => BaseMove::Lw,
            "r" => BaseMove::Rw,
            "M" => BaseMove::M,
            "E" => BaseMove::E,
            "S" => BaseMove::S,
            "x" => BaseMove::X,
            "y" => BaseMove::Y,
            "z" => BaseMove::Z,
            _ => return None,
        })
    }

    #[must_use]
    pub fn letter(self) -> &'static str {
        match self {
            BaseMove::U => "U",
            BaseMove::D => "D",
            BaseMove::F => "F",
            BaseMove::B => "B",
            BaseMove::L => "L",
            BaseMove::R => "R",
            BaseMove::Uw => "u",
            BaseMove::Dw => "d",
            BaseMove::Fw => "f",
            BaseMove::Bw => "b",
            BaseMove::Lw => "l",
            BaseMove::Rw => "r",
            BaseMove::M => "M",
            BaseMove::E => "E",
            BaseMove::S => "S",
            BaseMove::X => "x",
            BaseMove::Y => "y",
            BaseMove::Z => "z",
        }
    }

    /// The primitive turns this move is composed of, each with a direction
    /// sign relative to the written move (+1 clockwise, -1 counterclockwise).
    #[must_use]
    pub fn expansion(self) -> &'static [(Primitive, i8)] {
        match self {
            BaseMove::U => &[(Primitive::U, 1)],
            BaseMove::D => &[(Primitive::D, 1)],
            BaseMove::F => &[(Primitive::F, 1)],
            BaseMove::B => &[(Primitive::B, 1)],
            BaseMove::L => &[(Primitive::L, 1)],
            BaseMove::R => &[(Primitive::R, 1)],
            BaseMove::M => &[(Primitive::M, 1)],
            BaseMove::E => &[(Primitive::E, 1)],
            BaseMove::S => &[(Primitive::S, 1)],
            BaseMove::Uw => &[(Primitive::U, 1), (Primitive::E, -1)],
            BaseMove::Dw => &[(Primitive::D, 1), (Primitive::E, 1)],
            BaseMove::Fw => &[(Primitive::F, 1), (Primitive::S, 1)],
            BaseMove::Bw => &[(Primitive::B, 1), (Primitive::S, -1)],
            BaseMove::Lw => &[(Primitive::L, 1), (Primitive::M, 1)],
            BaseMove::Rw => &[(Primitive::R, 1), (Primitive::M, -1)],
            BaseMove::X => &[(Primitive::R, 1), (Primitive::M, -1), (Primitive::L, -1)],
            BaseMove::Y => &[(Primitive::U, 1), (Primitive::E, -1), (Primitive::D, -1)],
            BaseMove::Z => &[(Primitive::F, 1), (Primitive::S, 1), (Primitive::B, -1)],
        }
    }

    /// Whether this move changes the orientation of the whole cube.
    #[must_use]
    pub fn is_rotation(self) -> bool {
        matches!(self, BaseMove::X | BaseMove::Y | BaseMove::Z)
    }

    #[must_use]
    pub fn is_wide(self) -> bool {
        matches!(
            self,
            BaseMove::Uw
                | BaseMove::Dw
                | BaseMove::Fw
                | BaseMove::Bw
                | BaseMove::Lw
                | BaseMove::Rw
        )
    }

    #[must_use]
    pub fn is_slice(self) -> bool {
        matches!(self, BaseMove::M | BaseMove::E | BaseMove::S)
    }

    /// The letter this move becomes when an algorithm is mirrored across the
    /// M slice: the R and L families swap, everything else keeps its letter
    /// (the turn direction flips via the modifier).
    #[must_use]
    pub fn mirrored(self) -> BaseMove {
        match self {
            BaseMove::R => BaseMove::L,
            BaseMove::L => BaseMove::R,
            BaseMove::Rw => BaseMove::Lw,
            BaseMove::Lw => BaseMove::Rw,
            other => other,
        }
    }
}

impl Modifier {
    /// Quarter turns executed for a clockwise-composed primitive.
    #[must_use]
    pub fn quarter_turns(self) -> u8 {
        match self {
            Modifier::Single => 1,
            Modifier::Prime => 3,
            Modifier::Double => 2,
        }
    }

    #[must_use]
    pub fn inverse(self) -> Modifier {
        match self {
            Modifier::Single => Modifier::Prime,
            Modifier::Prime => Modifier::Single,
            Modifier::Double => Modifier::Double,
        }
    }

    fn from_suffix(suffix: &str) -> Option<Modifier> {
        Some(match suffix {
            "" => Modifier::Single,
            "'" => Modifier::Prime,
            "2" => Modifier::Double,
            // Synonyms normalized at parse time.
            "3" => Modifier::Prime,
            "3'" => Modifier::Single,
            "2'" => Modifier::Double,
            _ => return None,
        })
    }

    #[must_use]
    pub fn suffix(self) -> &'static str {
        match self {
            Modifier::Single => "",
            Modifier::Prime => "'",
            Modifier::Double => "2",
        }
    }
}

impl Move {
    /// Parse a single token such as `R`, `U'`, `f2`, or `M3'`.
    ///
    /// # Errors
    ///
    /// If the token is not in the move vocabulary.
    pub fn parse(token: &str) -> Result<Move, MoveParseError> {
        let mut chars = token.chars();
        let letter = chars
            .next()
            .ok_or_else(|| MoveParseError::UnknownToken(token.to_owned()))?;
        let base = BaseMove::from_letter(letter.encode_utf8(&mut [0; 4]))
            .ok_or_else(|| MoveParseError::UnknownToken(token.to_owned()))?;
        let modifier = Modifier::from_suffix(chars.as_str())
            .ok_or_else(|| MoveParseError::UnknownToken(token.to_owned()))?;
        Ok(Move { base, modifier })
    }

    #[must_use]
    pub fn inverse(self) -> Move {
        Move {
            base: self.base,
            modifier: self.modifier.inverse(),
        }
    }

    #[must_use]
    pub fn mirrored(self) -> Move {
        Move {
            base: self.base.mirrored(),
            modifier: self.modifier.inverse(),
        }
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.base.letter(), self.modifier.suffix())
    }
}

/// Parse a whitespace-separated move sequence.
///
/// # Errors
///
/// If any token is not in the move vocabulary.
pub fn parse_moves(notation: &str) -> Result<Vec<Move>, MoveParseError> {
    notation.split_whitespace().map(Move::parse).collect()
}

/// The sequence that undoes `moves`: each move inverted, in reverse order.
#[must_use]
pub fn invert_moves(moves: &[Move]) -> Vec<Move> {
    moves.iter().rev().map(|mv| mv.inverse()).collect()
}

/// Mirror a sequence across the M slice (R/L letters swap, all directions
/// flip). Used to derive left-slot algorithms from right-slot ones.
#[must_use]
pub fn mirror_moves(moves: &[Move]) -> Vec<Move> {
    moves.iter().map(|mv| mv.mirrored()).collect()
}

#[must_use]
pub fn format_moves(moves: &[Move]) -> String {
    moves
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(" ")
}
