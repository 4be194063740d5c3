//! Grid occupancy for a single game.
//!
//! Every cell carries a signed tag: `0` is empty, `-1` is food and any
//! positive value is a snake segment holding the number of ticks it has left
//! to live. The head is always the segment with the largest tag, and the tail
//! disappears on its own as tags count down to zero.

use crate::error::BoardError;

pub const EMPTY: i32 = 0;
pub const FOOD: i32 = -1;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Size {
    pub width: u16,
    pub height: u16,
}

impl Size {
    pub fn cell_count(&self) -> usize {
        self.width as usize * self.height as usize
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Direction {
    North,
    East,
    South,
    West,
}

impl Direction {
    pub fn opposite(&self) -> Direction {
        match self {
            Direction::North => Direction::South,
            Direction::South => Direction::North,
            Direction::East => Direction::West,
            Direction::West => Direction::East,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Pos {
    pub x: u16,
    pub y: u16,
}

impl Pos {
    pub fn new(x: u16, y: u16) -> Self {
        Pos { x, y }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PosDelta {
    pub x: i32,
    pub y: i32,
}

impl From<Direction> for PosDelta {
    fn from(dir: Direction) -> Self {
        match dir {
            Direction::North => PosDelta { x: 0, y: -1 },
            Direction::South => PosDelta { x: 0, y: 1 },
            Direction::East => PosDelta { x: 1, y: 0 },
            Direction::West => PosDelta { x: -1, y: 0 },
        }
    }
}

impl Pos {
    /// Step by `delta`, or `None` if that leaves the board.
    pub fn bounded_add(&self, delta: PosDelta, size: Size) -> Option<Pos> {
        let new_x = self.x as i32 + delta.x;
        let new_y = self.y as i32 + delta.y;
        if new_x < 0 || new_y < 0 || new_x >= size.width as i32 || new_y >= size.height as i32 {
            return None;
        }
        Some(Pos {
            x: new_x as u16,
            y: new_y as u16,
        })
    }

    pub fn wrapped_add(&self, delta: PosDelta, size: Size) -> Pos {
        let new_x = (self.x as i32 + delta.x).rem_euclid(size.width as i32) as u16;
        let new_y = (self.y as i32 + delta.y).rem_euclid(size.height as i32) as u16;
        Pos { x: new_x, y: new_y }
    }
}

/// Decoded view of a cell tag.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Cell {
    Empty,
    Food,
    Snake(u32),
}

impl From<i32> for Cell {
    fn from(tag: i32) -> Self {
        match tag {
            t if t > 0 => Cell::Snake(t as u32),
            FOOD => Cell::Food,
            _ => Cell::Empty,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Board {
    size: Size,
    cells: Vec<i32>,
}

impl Board {
    pub fn new(width: u16, height: u16) -> Self {
        let size = Size { width, height };
        Board {
            size,
            cells: vec![EMPTY; size.cell_count()],
        }
    }

    pub fn size(&self) -> Size {
        self.size
    }

    pub fn width(&self) -> u16 {
        self.size.width
    }

    pub fn height(&self) -> u16 {
        self.size.height
    }

    pub fn cell_count(&self) -> usize {
        self.cells.len()
    }

    pub fn contains(&self, x: i32, y: i32) -> bool {
        x >= 0 && y >= 0 && x < self.size.width as i32 && y < self.size.height as i32
    }

    fn index(&self, x: i32, y: i32) -> Result<usize, BoardError> {
        if !self.contains(x, y) {
            return Err(BoardError::OutOfBounds {
                x,
                y,
                width: self.size.width,
                height: self.size.height,
            });
        }
        Ok(y as usize * self.size.width as usize + x as usize)
    }

    pub fn cell_at(&self, x: i32, y: i32) -> Result<i32, BoardError> {
        let index = self.index(x, y)?;
        Ok(self.cells[index])
    }

    pub fn set_cell(&mut self, x: i32, y: i32, tag: i32) -> Result<(), BoardError> {
        let index = self.index(x, y)?;
        self.cells[index] = tag;
        Ok(())
    }

    /// Tag at an in-bounds position. Positions produced by `bounded_add` and
    /// `wrapped_add` always qualify.
    pub fn tag(&self, pos: Pos) -> i32 {
        self.cells[pos.y as usize * self.size.width as usize + pos.x as usize]
    }

    pub fn stamp(&mut self, pos: Pos, tag: i32) {
        let width = self.size.width as usize;
        self.cells[pos.y as usize * width + pos.x as usize] = tag;
    }

    pub fn cell(&self, pos: Pos) -> Cell {
        Cell::from(self.tag(pos))
    }

    /// One tick of decay: every segment loses a tick of life and segments
    /// that reach zero become empty.
    pub fn age_snake_cells(&mut self) {
        for tag in self.cells.iter_mut().filter(|t| **t > 0) {
            *tag -= 1;
        }
    }

    /// Lengthen the remaining life of every segment, so the tail stays put
    /// for `by` ticks.
    pub fn extend_snake_cells(&mut self, by: i32) {
        for tag in self.cells.iter_mut().filter(|t| **t > 0) {
            *tag = tag.saturating_add(by);
        }
    }

    pub fn positions(&self) -> impl Iterator<Item = Pos> + '_ {
        let width = self.size.width;
        (0..self.cells.len()).map(move |i| Pos {
            x: (i % width as usize) as u16,
            y: (i / width as usize) as u16,
        })
    }

    pub fn empty_cells(&self) -> Vec<Pos> {
        self.positions()
            .filter(|pos| self.tag(*pos) == EMPTY)
            .collect()
    }

    pub fn food_count(&self) -> usize {
        self.cells.iter().filter(|t| **t == FOOD).count()
    }

    pub fn snake_cell_count(&self) -> usize {
        self.cells.iter().filter(|t| **t > 0).count()
    }

    pub fn food(&self) -> Option<Pos> {
        self.positions().find(|pos| self.tag(*pos) == FOOD)
    }
}
