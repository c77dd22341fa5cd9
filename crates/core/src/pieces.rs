//! Pieces module - shape factory, matrix rotation, and wall-kick search
//!
//! Every piece is a small square matrix of cell tags (2x2, 3x3 or 4x4) plus a
//! top-left board offset. Rotation transposes the matrix and then mirrors it, so
//! any square shape rotates correctly without per-orientation tables.

use crate::types::{Cell, PieceKind, RotationDir, BOARD_WIDTH, EMPTY};

/// Largest matrix side length (the I piece)
pub const MAX_MATRIX_SIZE: usize = 4;

/// Square occupancy matrix stored inline (only the top-left `size x size` block is used)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Matrix {
    size: u8,
    cells: [[Cell; MAX_MATRIX_SIZE]; MAX_MATRIX_SIZE],
}

impl Matrix {
    /// Build a matrix from rows. Panics if `rows` is not square or larger than 4x4.
    pub fn from_rows<const N: usize>(rows: [[Cell; N]; N]) -> Self {
        assert!(N > 0 && N <= MAX_MATRIX_SIZE, "matrix size {N} out of range");
        let mut cells = [[EMPTY; MAX_MATRIX_SIZE]; MAX_MATRIX_SIZE];
        for (y, row) in rows.iter().enumerate() {
            cells[y][..N].copy_from_slice(row);
        }
        Self {
            size: N as u8,
            cells,
        }
    }

    /// Side length (also the piece width used for centering and kick limits)
    pub fn size(&self) -> usize {
        self.size as usize
    }

    pub fn get(&self, x: usize, y: usize) -> Cell {
        if x < self.size() && y < self.size() {
            self.cells[y][x]
        } else {
            EMPTY
        }
    }

    pub fn row(&self, y: usize) -> &[Cell] {
        &self.cells[y][..self.size()]
    }

    pub fn rows(&self) -> impl Iterator<Item = &[Cell]> {
        self.cells[..self.size()].iter().map(|row| &row[..self.size()])
    }

    /// Occupied cells as (x, y, tag) in matrix coordinates
    pub fn occupied(&self) -> impl Iterator<Item = (usize, usize, Cell)> + '_ {
        self.rows().enumerate().flat_map(|(y, row)| {
            row.iter()
                .enumerate()
                .filter(|&(_, &tag)| tag != EMPTY)
                .map(move |(x, &tag)| (x, y, tag))
        })
    }

    /// Rotate 90° in place: transpose, then reverse each row (clockwise) or the
    /// row order (counter-clockwise).
    pub fn rotate(&mut self, dir: RotationDir) {
        let n = self.size();
        for y in 0..n {
            for x in 0..y {
                let tmp = self.cells[y][x];
                self.cells[y][x] = self.cells[x][y];
                self.cells[x][y] = tmp;
            }
        }

        match dir {
            RotationDir::Clockwise => {
                for row in &mut self.cells[..n] {
                    row[..n].reverse();
                }
            }
            RotationDir::CounterClockwise => self.cells[..n].reverse(),
        }
    }
}

/// Create the spawn-orientation matrix for a piece kind
///
/// Pure function: every call returns a fresh matrix filled with the kind's tag.
pub fn create_piece(kind: PieceKind) -> Matrix {
    let t = kind.tag();
    match kind {
        PieceKind::T => Matrix::from_rows([
            [0, t, 0],
            [t, t, t],
            [0, 0, 0],
        ]),
        PieceKind::O => Matrix::from_rows([
            [t, t],
            [t, t],
        ]),
        PieceKind::L => Matrix::from_rows([
            [0, 0, t],
            [t, t, t],
            [0, 0, 0],
        ]),
        PieceKind::J => Matrix::from_rows([
            [t, 0, 0],
            [t, t, t],
            [0, 0, 0],
        ]),
        PieceKind::I => Matrix::from_rows([
            [0, t, 0, 0],
            [0, t, 0, 0],
            [0, t, 0, 0],
            [0, t, 0, 0],
        ]),
        PieceKind::S => Matrix::from_rows([
            [0, t, t],
            [t, t, 0],
            [0, 0, 0],
        ]),
        PieceKind::Z => Matrix::from_rows([
            [t, t, 0],
            [0, t, t],
            [0, 0, 0],
        ]),
    }
}

/// Spawn column for a matrix: board center minus half the matrix width
pub fn spawn_x(matrix: &Matrix) -> i8 {
    (BOARD_WIDTH / 2) as i8 - (matrix.size() / 2) as i8
}

/// A piece: shape matrix plus top-left board offset
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Piece {
    pub kind: PieceKind,
    pub matrix: Matrix,
    pub x: i8,
    pub y: i8,
}

impl Piece {
    /// Wrap a matrix at offset (0, 0)
    pub fn new(kind: PieceKind, matrix: Matrix) -> Self {
        Self {
            kind,
            matrix,
            x: 0,
            y: 0,
        }
    }

    /// Fresh piece of `kind` placed at the spawn position
    pub fn spawn(kind: PieceKind) -> Self {
        let mut piece = Self::new(kind, create_piece(kind));
        piece.move_to_spawn();
        piece
    }

    /// Reset the offset to the centered spawn column at y = 0
    pub fn move_to_spawn(&mut self) {
        self.x = spawn_x(&self.matrix);
        self.y = 0;
    }

    pub fn width(&self) -> usize {
        self.matrix.size()
    }

    /// Occupied cells in board coordinates
    pub fn cells(&self) -> impl Iterator<Item = (i8, i8, Cell)> + '_ {
        self.matrix
            .occupied()
            .map(|(x, y, tag)| (self.x + x as i8, self.y + y as i8, tag))
    }
}

/// Rotate `piece` and search for a horizontal kick if the result collides.
///
/// Offsets are tried in the order +1, -1, +2, -2, ... up to the matrix width. Returns
/// the applied offset (0 when no kick was needed). When nothing fits, the matrix and
/// x position are restored and `None` is returned.
pub fn try_rotate(
    piece: &mut Piece,
    dir: RotationDir,
    is_valid: impl Fn(i8, i8) -> bool,
) -> Option<i8> {
    let fits = |p: &Piece| p.cells().all(|(x, y, _)| is_valid(x, y));

    let original_x = piece.x;
    piece.matrix.rotate(dir);
    if fits(&*piece) {
        return Some(0);
    }

    let limit = piece.width() as i8;
    for magnitude in 1..=limit {
        for offset in [magnitude, -magnitude] {
            piece.x = original_x + offset;
            if fits(&*piece) {
                return Some(offset);
            }
        }
    }

    piece.matrix.rotate(dir.reverse());
    piece.x = original_x;
    None
}
