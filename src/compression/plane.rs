/// A rectangular array of single-bit cells, stored column by column.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Plane {
    width: usize,
    height: usize,
    cells: Vec<u8>,
}

impl Plane {
    /// A zero-filled plane of `width` x `height` pixels.
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            cells: vec![0; width * height],
        }
    }

    /// Build a plane from cells already in column-major order.
    pub fn from_cells(width: usize, height: usize, cells: Vec<u8>) -> Self {
        assert_eq!(
            cells.len(),
            width * height,
            "Cell count does not match plane size"
        );
        assert!(cells.iter().all(|&cell| cell <= 1), "Cells must be 0 or 1");

        Self {
            width,
            height,
            cells,
        }
    }

    pub const fn width(&self) -> usize {
        self.width
    }

    pub const fn height(&self) -> usize {
        self.height
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub const fn index(&self, x: usize, y: usize) -> usize {
        x * self.height + y
    }

    pub fn get(&self, x: usize, y: usize) -> u8 {
        assert!(x < self.width && y < self.height, "Cell out of bounds");
        self.cells[self.index(x, y)]
    }

    pub fn set(&mut self, x: usize, y: usize, value: u8) {
        assert!(x < self.width && y < self.height, "Cell out of bounds");
        let index = self.index(x, y);
        self.cells[index] = value & 1;
    }

    pub(crate) fn columns_mut(&mut self) -> impl Iterator<Item = &mut [u8]> {
        // chunks_exact_mut rejects a zero chunk size
        let height = self.height.max(1);
        self.cells.chunks_exact_mut(height)
    }

    pub fn cells(&self) -> &[u8] {
        &self.cells
    }

    pub(crate) fn cells_mut(&mut self) -> &mut [u8] {
        &mut self.cells
    }
}

/// Write position inside a plane. `y` advances first.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Cursor {
    pub x: usize,
    pub y: usize,
}

impl Cursor {
    pub const fn linear(&self, height: usize) -> usize {
        self.x * height + self.y
    }
}

/// Fills a plane front to back in column-major order.
pub struct PlaneWriter<'p> {
    plane: &'p mut Plane,
    cursor: Cursor,
}

impl<'p> PlaneWriter<'p> {
    pub fn new(plane: &'p mut Plane) -> Self {
        Self {
            plane,
            cursor: Cursor::default(),
        }
    }

    pub const fn cursor(&self) -> Cursor {
        self.cursor
    }

    pub fn is_full(&self) -> bool {
        self.cursor.linear(self.plane.height) >= self.plane.len()
    }

    /// Store `cells` starting at the cursor. Once the cursor leaves the last
    /// column the remaining cells are discarded. Returns the number stored.
    pub fn write(&mut self, cells: impl IntoIterator<Item = u8>) -> usize {
        let mut stored = 0;

        for cell in cells {
            if self.cursor.x >= self.plane.width || self.plane.height == 0 {
                break;
            }

            let index = self.plane.index(self.cursor.x, self.cursor.y);
            self.plane.cells[index] = cell;
            stored += 1;

            self.cursor.y += 1;
            if self.cursor.y == self.plane.height {
                self.cursor.y = 0;
                self.cursor.x += 1;
            }
        }

        stored
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn fills_columns_first() {
        let mut plane = Plane::new(2, 3);
        let mut writer = PlaneWriter::new(&mut plane);

        assert_eq!(writer.write([1, 0, 1, 1]), 4);
        assert_eq!(writer.cursor(), Cursor { x: 1, y: 1 });
        assert!(!writer.is_full());

        assert_eq!(plane.cells(), &[1, 0, 1, 1, 0, 0]);
        assert_eq!(plane.get(1, 0), 1);
    }

    #[test]
    fn drops_cells_past_last_column() {
        let mut plane = Plane::new(2, 2);
        let mut writer = PlaneWriter::new(&mut plane);

        assert_eq!(writer.write([1; 3]), 3);
        assert_eq!(writer.write([1; 5]), 1);
        assert!(writer.is_full());
        assert_eq!(writer.cursor(), Cursor { x: 2, y: 0 });
        assert_eq!(writer.write([1]), 0);

        assert_eq!(plane.cells(), &[1, 1, 1, 1]);
    }

    #[test]
    fn stops_pulling_from_endless_runs() {
        let mut plane = Plane::new(8, 8);
        let mut writer = PlaneWriter::new(&mut plane);

        assert_eq!(writer.write(std::iter::repeat(1)), 64);
        assert!(writer.is_full());
    }

    #[test]
    fn empty_plane_starts_full() {
        let mut plane = Plane::new(0, 8);
        let mut writer = PlaneWriter::new(&mut plane);

        assert!(writer.is_full());
        assert_eq!(writer.write([1, 1]), 0);
        assert!(plane.is_empty());
    }
}
