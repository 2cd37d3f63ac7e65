//! Move tables for 4-, 8- and 16-connected grids.
//!
//! Every move lists the intermediate cells it sweeps. A move is only
//! legal when its target and every swept cell are passable, so diagonal
//! moves never cut an obstacle corner and knight moves never jump a wall.

/// Distance units of a straight move; edge costs scale from this.
pub const STRAIGHT_UNITS: u32 = 1000;
/// Distance units of a diagonal move (`1000 * sqrt(2)`).
pub const DIAGONAL_UNITS: u32 = 1414;
/// Distance units of a knight move (`1000 * sqrt(5)`).
pub const KNIGHT_UNITS: u32 = 2236;

/// A single lattice move.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Move {
    /// Column offset.
    pub dx: i32,
    /// Row offset.
    pub dy: i32,
    /// Length of the move in distance units.
    pub units: u32,
    /// Offsets (relative to the source) of cells swept on the way.
    pub via: &'static [(i32, i32)],
}

const fn straight(dx: i32, dy: i32) -> Move {
    Move {
        dx,
        dy,
        units: STRAIGHT_UNITS,
        via: &[],
    }
}

const fn swept(dx: i32, dy: i32, units: u32, via: &'static [(i32, i32)]) -> Move {
    Move { dx, dy, units, via }
}

const FOUR: [Move; 4] = [
    straight(1, 0),
    straight(0, 1),
    straight(-1, 0),
    straight(0, -1),
];

const EIGHT: [Move; 8] = [
    straight(1, 0),
    straight(0, 1),
    straight(-1, 0),
    straight(0, -1),
    swept(1, 1, DIAGONAL_UNITS, &[(1, 0), (0, 1)]),
    swept(-1, 1, DIAGONAL_UNITS, &[(-1, 0), (0, 1)]),
    swept(-1, -1, DIAGONAL_UNITS, &[(-1, 0), (0, -1)]),
    swept(1, -1, DIAGONAL_UNITS, &[(1, 0), (0, -1)]),
];

const SIXTEEN: [Move; 16] = [
    straight(1, 0),
    straight(0, 1),
    straight(-1, 0),
    straight(0, -1),
    swept(1, 1, DIAGONAL_UNITS, &[(1, 0), (0, 1)]),
    swept(-1, 1, DIAGONAL_UNITS, &[(-1, 0), (0, 1)]),
    swept(-1, -1, DIAGONAL_UNITS, &[(-1, 0), (0, -1)]),
    swept(1, -1, DIAGONAL_UNITS, &[(1, 0), (0, -1)]),
    swept(1, 2, KNIGHT_UNITS, &[(0, 1), (1, 1)]),
    swept(-1, 2, KNIGHT_UNITS, &[(0, 1), (-1, 1)]),
    swept(1, -2, KNIGHT_UNITS, &[(0, -1), (1, -1)]),
    swept(-1, -2, KNIGHT_UNITS, &[(0, -1), (-1, -1)]),
    swept(2, 1, KNIGHT_UNITS, &[(1, 0), (1, 1)]),
    swept(2, -1, KNIGHT_UNITS, &[(1, 0), (1, -1)]),
    swept(-2, 1, KNIGHT_UNITS, &[(-1, 0), (-1, 1)]),
    swept(-2, -1, KNIGHT_UNITS, &[(-1, 0), (-1, -1)]),
];

/// Grid neighbourhood used for planning.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Connectivity {
    /// Cardinal moves only.
    Four,
    /// Cardinal plus diagonal moves.
    #[default]
    Eight,
    /// Eight-connected plus the eight knight moves.
    Sixteen,
}

impl Connectivity {
    /// The move table for this neighbourhood.
    pub fn moves(self) -> &'static [Move] {
        match self {
            Self::Four => &FOUR,
            Self::Eight => &EIGHT,
            Self::Sixteen => &SIXTEEN,
        }
    }

    /// Largest axis offset any move reaches.
    pub fn reach(self) -> i32 {
        match self {
            Self::Four | Self::Eight => 1,
            Self::Sixteen => 2,
        }
    }
}
