use crate::vector::Vec2;

/// Integer cell coordinate inside a [`GridMap`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct GridCoord {
    pub x: i32,
    pub y: i32,
}

impl GridCoord {
    #[inline]
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum MapError {
    #[error("map has no cells")]
    Empty,
    #[error("map is {width}x{height} but {found} cells were supplied")]
    SizeMismatch {
        width: usize,
        height: usize,
        found: usize,
    },
    #[error("row {row} has {found} cells, expected {expected}")]
    Ragged {
        row: usize,
        expected: usize,
        found: usize,
    },
    #[error("unrecognized map character {ch:?} at row {row}, column {col}")]
    BadChar { row: usize, col: usize, ch: char },
    #[error("border cell ({x}, {y}) is empty; rays could leave the map")]
    OpenBorder { x: usize, y: usize },
}

/// Immutable grid of cell codes: `0` is empty, anything else is a wall variant.
///
/// Every border cell is a wall. This is checked on construction and is what
/// guarantees that a ray cast from inside the map always hits something.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GridMap {
    width: usize,
    height: usize,
    cells: Vec<u8>, // row-major
}

impl GridMap {
    pub fn new(width: usize, height: usize, cells: Vec<u8>) -> Result<Self, MapError> {
        if width == 0 || height == 0 {
            return Err(MapError::Empty);
        }
        if cells.len() != width * height {
            return Err(MapError::SizeMismatch {
                width,
                height,
                found: cells.len(),
            });
        }

        let map = Self {
            width,
            height,
            cells,
        };
        map.check_border()?;
        tracing::debug!(width, height, "grid map loaded");
        Ok(map)
    }

    pub fn from_rows<R: AsRef<[u8]>>(rows: &[R]) -> Result<Self, MapError> {
        let width = rows.first().map(|r| r.as_ref().len()).unwrap_or(0);
        let mut cells = Vec::with_capacity(width * rows.len());
        for (row, r) in rows.iter().enumerate() {
            let r = r.as_ref();
            if r.len() != width {
                return Err(MapError::Ragged {
                    row,
                    expected: width,
                    found: r.len(),
                });
            }
            cells.extend_from_slice(r);
        }
        Self::new(width, rows.len(), cells)
    }

    /// Parses a text grid. Digits are cell codes, `.` and space are empty,
    /// `#` is wall variant 1. Blank lines are skipped.
    pub fn parse(text: &str) -> Result<Self, MapError> {
        let mut rows: Vec<Vec<u8>> = Vec::new();
        for (row, line) in text.lines().enumerate() {
            let line = line.trim_end();
            if line.is_empty() {
                continue;
            }
            let mut cells = Vec::with_capacity(line.len());
            for (col, ch) in line.chars().enumerate() {
                let code = match ch {
                    '.' | ' ' => 0,
                    '#' => 1,
                    d if d.is_ascii_digit() => d as u8 - b'0',
                    _ => return Err(MapError::BadChar { row, col, ch }),
                };
                cells.push(code);
            }
            rows.push(cells);
        }
        Self::from_rows(&rows)
    }

    /// The 8x8 demo map: walled border plus a 2x2 pillar.
    pub fn reference() -> Self {
        const REFERENCE: [[u8; 8]; 8] = [
            [1, 1, 1, 1, 1, 1, 1, 1],
            [1, 0, 0, 0, 0, 0, 0, 1],
            [1, 0, 0, 0, 0, 0, 0, 1],
            [1, 0, 0, 0, 0, 0, 0, 1],
            [1, 0, 1, 1, 0, 0, 0, 1],
            [1, 0, 1, 1, 0, 0, 0, 1],
            [1, 0, 0, 0, 0, 0, 0, 1],
            [1, 1, 1, 1, 1, 1, 1, 1],
        ];
        Self {
            width: 8,
            height: 8,
            cells: REFERENCE.iter().flatten().copied().collect(),
        }
    }

    fn check_border(&self) -> Result<(), MapError> {
        let (w, h) = (self.width, self.height);
        let top_bottom = (0..w).flat_map(|x| [(x, 0), (x, h - 1)]);
        let sides = (0..h).flat_map(|y| [(0, y), (w - 1, y)]);
        for (x, y) in top_bottom.chain(sides) {
            if self.cells[y * w + x] == 0 {
                return Err(MapError::OpenBorder { x, y });
            }
        }
        Ok(())
    }

    #[inline]
    pub fn width(&self) -> usize {
        self.width
    }

    #[inline]
    pub fn height(&self) -> usize {
        self.height
    }

    #[inline]
    pub fn contains(&self, c: GridCoord) -> bool {
        c.x >= 0 && c.y >= 0 && (c.x as usize) < self.width && (c.y as usize) < self.height
    }

    /// Cell code at `c`. Panics when `c` is outside the map.
    #[inline]
    pub fn cell_at(&self, c: GridCoord) -> u8 {
        assert!(
            self.contains(c),
            "cell ({}, {}) outside {}x{} map",
            c.x,
            c.y,
            self.width,
            self.height
        );
        self.cells[c.y as usize * self.width + c.x as usize]
    }

    /// True when `pos` lies inside the map on an empty cell.
    pub fn is_open(&self, pos: Vec2) -> bool {
        if pos.x < 0.0 || pos.y < 0.0 {
            return false;
        }
        let c = pos.cell();
        self.contains(c) && self.cell_at(c) == 0
    }

    pub fn to_rows(&self) -> Vec<Vec<u8>> {
        self.cells.chunks(self.width).map(<[u8]>::to_vec).collect()
    }

    /// All cells in row-major order.
    pub fn iter(&self) -> impl Iterator<Item = (GridCoord, u8)> + '_ {
        let w = self.width;
        self.cells
            .iter()
            .enumerate()
            .map(move |(i, &v)| (GridCoord::new((i % w) as i32, (i / w) as i32), v))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reference_map_layout() {
        let map = GridMap::reference();
        assert_eq!((map.width(), map.height()), (8, 8));
        assert_eq!(map.cell_at(GridCoord::new(0, 0)), 1);
        assert_eq!(map.cell_at(GridCoord::new(1, 1)), 0);
        assert_eq!(map.cell_at(GridCoord::new(2, 4)), 1);
        assert_eq!(map.cell_at(GridCoord::new(3, 5)), 1);
        assert_eq!(map.cell_at(GridCoord::new(4, 4)), 0);
        assert!(map.check_border().is_ok());
    }

    #[test]
    fn rejects_open_border() {
        let err = GridMap::from_rows(&[[1, 1, 1], [0, 0, 1], [1, 1, 1]]).unwrap_err();
        assert_eq!(err, MapError::OpenBorder { x: 0, y: 1 });
    }

    #[test]
    fn rejects_ragged_rows() {
        let rows: Vec<Vec<u8>> = vec![vec![1, 1, 1], vec![1, 1], vec![1, 1, 1]];
        assert_eq!(
            GridMap::from_rows(&rows).unwrap_err(),
            MapError::Ragged {
                row: 1,
                expected: 3,
                found: 2
            }
        );
    }

    #[test]
    fn rejects_size_mismatch_and_empty() {
        assert_eq!(GridMap::new(0, 3, vec![]).unwrap_err(), MapError::Empty);
        assert!(matches!(
            GridMap::new(2, 2, vec![1; 3]),
            Err(MapError::SizeMismatch { found: 3, .. })
        ));
    }

    #[test]
    fn parses_text_grid() {
        let map = GridMap::parse("#####\n#.2.#\n#   #\n\n#3###\n").unwrap();
        assert_eq!((map.width(), map.height()), (5, 4));
        assert_eq!(map.cell_at(GridCoord::new(2, 1)), 2);
        assert_eq!(map.cell_at(GridCoord::new(1, 2)), 0);
        assert_eq!(map.cell_at(GridCoord::new(1, 3)), 3);
        assert_eq!(GridMap::from_rows(&map.to_rows()).unwrap(), map);
    }

    #[test]
    fn parse_reports_bad_char() {
        assert_eq!(
            GridMap::parse("###\n#x#\n###").unwrap_err(),
            MapError::BadChar {
                row: 1,
                col: 1,
                ch: 'x'
            }
        );
    }

    #[test]
    fn is_open_checks_bounds_and_walls() {
        let map = GridMap::reference();
        assert!(map.is_open(Vec2::new(1.5, 1.5)));
        assert!(!map.is_open(Vec2::new(2.5, 4.5)));
        assert!(!map.is_open(Vec2::new(-0.5, 1.5)));
        assert!(!map.is_open(Vec2::new(9.0, 1.5)));
    }

    #[test]
    #[should_panic(expected = "outside")]
    fn cell_at_out_of_bounds_panics() {
        GridMap::reference().cell_at(GridCoord::new(8, 0));
    }

    #[test]
    fn iter_is_row_major() {
        let map = GridMap::reference();
        let cells: Vec<_> = map.iter().collect();
        assert_eq!(cells.len(), 64);
        assert_eq!(cells[9], (GridCoord::new(1, 1), 0));
        assert_eq!(cells[34], (GridCoord::new(2, 4), 1));
    }
}
