//! Grid model: cells, directions and lane layout
//!
//! Rows are numbered top to bottom (row 0 is the goal in the default
//! layout), columns left to right.

use glam::IVec2;
use serde::{Deserialize, Serialize};

/// A grid coordinate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Cell {
    pub x: i32,
    pub y: i32,
}

impl Cell {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Translate by a delta (may leave the grid; check with `Grid::contains`)
    #[inline]
    pub fn offset(self, delta: IVec2) -> Self {
        Self::from(IVec2::from(self) + delta)
    }
}

impl From<Cell> for IVec2 {
    fn from(cell: Cell) -> Self {
        IVec2::new(cell.x, cell.y)
    }
}

impl From<IVec2> for Cell {
    fn from(v: IVec2) -> Self {
        Cell::new(v.x, v.y)
    }
}

/// Player input directions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    pub const ALL: [Direction; 4] = [
        Direction::Up,
        Direction::Down,
        Direction::Left,
        Direction::Right,
    ];

    pub fn delta(self) -> IVec2 {
        match self {
            Direction::Up => IVec2::NEG_Y,
            Direction::Down => IVec2::Y,
            Direction::Left => IVec2::NEG_X,
            Direction::Right => IVec2::X,
        }
    }
}

/// Travel direction of a moving entity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Heading {
    Left,
    Right,
}

impl Heading {
    pub fn delta(self) -> IVec2 {
        match self {
            Heading::Left => IVec2::NEG_X,
            Heading::Right => IVec2::X,
        }
    }

    pub fn opposite(self) -> Self {
        match self {
            Heading::Left => Heading::Right,
            Heading::Right => Heading::Left,
        }
    }
}

/// Flavour of a safe row
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SafeZone {
    Start,
    Boardwalk,
    /// Reaching this row wins the crossing
    End,
}

/// Lane type of a row
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LaneKind {
    /// Cars drive here
    Road,
    /// Logs float here; standing in water without a log is fatal
    Water,
    Safe(SafeZone),
}

impl LaneKind {
    pub fn is_goal(self) -> bool {
        self == LaneKind::Safe(SafeZone::End)
    }

    /// CSS class of the row in the web view
    pub fn as_str(self) -> &'static str {
        match self {
            LaneKind::Road => "road-row",
            LaneKind::Water => "water-row",
            LaneKind::Safe(SafeZone::Start) => "start-row",
            LaneKind::Safe(SafeZone::Boardwalk) => "boardwalk-row",
            LaneKind::Safe(SafeZone::End) => "end-row",
        }
    }
}

/// Classic layout: goal on top, water, boardwalk in the middle, road, start
/// at the bottom.
pub fn classic_layout(rows: i32) -> Vec<LaneKind> {
    let boardwalk = rows / 2;
    (0..rows)
        .map(|row| {
            if row == 0 {
                LaneKind::Safe(SafeZone::End)
            } else if row == rows - 1 {
                LaneKind::Safe(SafeZone::Start)
            } else if row == boardwalk {
                LaneKind::Safe(SafeZone::Boardwalk)
            } else if row < boardwalk {
                LaneKind::Water
            } else {
                LaneKind::Road
            }
        })
        .collect()
}

/// Fixed-size board with one lane type per row
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Grid {
    pub columns: i32,
    pub rows: i32,
    lanes: Vec<LaneKind>,
}

impl Grid {
    /// Build a grid. `lanes` is indexed by row; missing rows are treated as
    /// safe boardwalk (config validation rejects mismatched layouts).
    pub fn new(columns: i32, rows: i32, mut lanes: Vec<LaneKind>) -> Self {
        lanes.resize(rows.max(0) as usize, LaneKind::Safe(SafeZone::Boardwalk));
        Self {
            columns,
            rows,
            lanes,
        }
    }

    #[inline]
    pub fn contains(&self, cell: Cell) -> bool {
        (0..self.columns).contains(&cell.x) && (0..self.rows).contains(&cell.y)
    }

    /// Neighbouring cell in `dir`, or `None` if it would leave the grid
    pub fn step(&self, cell: Cell, dir: Direction) -> Option<Cell> {
        let next = cell.offset(dir.delta());
        self.contains(next).then_some(next)
    }

    pub fn lane(&self, row: i32) -> Option<LaneKind> {
        usize::try_from(row).ok().and_then(|r| self.lanes.get(r).copied())
    }

    pub fn lanes(&self) -> &[LaneKind] {
        &self.lanes
    }

    /// Rows of the given lane type, top to bottom
    pub fn rows_of(&self, kind: LaneKind) -> Vec<i32> {
        (0..self.rows).filter(|&r| self.lane(r) == Some(kind)).collect()
    }

    pub fn is_goal_row(&self, row: i32) -> bool {
        self.lane(row).is_some_and(LaneKind::is_goal)
    }

    /// Entry cell for an entity travelling `heading` along `row`
    pub fn edge_cell(&self, row: i32, heading: Heading) -> Cell {
        match heading {
            Heading::Left => Cell::new(self.columns - 1, row),
            Heading::Right => Cell::new(0, row),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classic_layout_rows() {
        let lanes = classic_layout(25);
        assert_eq!(lanes.len(), 25);
        assert_eq!(lanes[0], LaneKind::Safe(SafeZone::End));
        assert_eq!(lanes[12], LaneKind::Safe(SafeZone::Boardwalk));
        assert_eq!(lanes[24], LaneKind::Safe(SafeZone::Start));
        assert!(lanes[1..12].iter().all(|&l| l == LaneKind::Water));
        assert!(lanes[13..24].iter().all(|&l| l == LaneKind::Road));
    }

    #[test]
    fn test_step_stops_at_edges() {
        let grid = Grid::new(25, 25, classic_layout(25));
        assert_eq!(grid.step(Cell::new(0, 5), Direction::Left), None);
        assert_eq!(grid.step(Cell::new(24, 5), Direction::Right), None);
        assert_eq!(grid.step(Cell::new(3, 0), Direction::Up), None);
        assert_eq!(grid.step(Cell::new(3, 24), Direction::Down), None);
        assert_eq!(
            grid.step(Cell::new(12, 24), Direction::Up),
            Some(Cell::new(12, 23))
        );
    }

    #[test]
    fn test_edge_cell_matches_heading() {
        let grid = Grid::new(25, 25, classic_layout(25));
        assert_eq!(grid.edge_cell(14, Heading::Left), Cell::new(24, 14));
        assert_eq!(grid.edge_cell(14, Heading::Right), Cell::new(0, 14));
    }

    #[test]
    fn test_short_layout_is_padded() {
        let grid = Grid::new(5, 4, vec![LaneKind::Road]);
        assert_eq!(grid.lanes().len(), 4);
        assert_eq!(grid.lane(3), Some(LaneKind::Safe(SafeZone::Boardwalk)));
        assert_eq!(grid.lane(4), None);
        assert_eq!(grid.lane(-1), None);
    }
}
