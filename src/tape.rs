/// Number of cells on the tape.
pub const TAPE_LEN: usize = 0xFFFF;

/// Values a single cell can take; arithmetic on cells wraps modulo this.
pub const CELL_MODULUS: u16 = 256;

/// Circular memory tape with a single data pointer.
///
/// Both the pointer and the cell values wrap: moving right from the last
/// cell lands on cell 0, and decrementing a zero cell yields 255.
#[derive(Debug, Clone)]
pub struct Tape {
    cells: Box<[u8]>,
    pointer: usize,
}

impl Tape {
    pub fn new() -> Self {
        Self {
            cells: vec![0; TAPE_LEN].into_boxed_slice(),
            pointer: 0,
        }
    }

    pub fn pointer(&self) -> usize {
        self.pointer
    }

    pub fn current(&self) -> u8 {
        self.cells[self.pointer]
    }

    pub fn move_right(&mut self) {
        self.pointer = move_right(self.pointer);
    }

    pub fn move_left(&mut self) {
        self.pointer = move_left(self.pointer);
    }

    pub fn increment(&mut self) {
        let cell = &mut self.cells[self.pointer];
        *cell = increment(*cell);
    }

    pub fn decrement(&mut self) {
        let cell = &mut self.cells[self.pointer];
        *cell = decrement(*cell);
    }

    /// Slice of cells starting at `base`, clipped to the end of the tape.
    pub fn window(&self, base: usize, len: usize) -> &[u8] {
        let start = base.min(TAPE_LEN);
        let end = start.saturating_add(len).min(TAPE_LEN);
        &self.cells[start..end]
    }
}

impl Default for Tape {
    fn default() -> Self {
        Self::new()
    }
}

pub fn move_right(pointer: usize) -> usize {
    (pointer + 1) % TAPE_LEN
}

pub fn move_left(pointer: usize) -> usize {
    (pointer + TAPE_LEN - 1) % TAPE_LEN
}

// Widen before the modulo so the wrap comes from CELL_MODULUS and not from
// u8 overflow.
pub fn increment(value: u8) -> u8 {
    ((u16::from(value) + 1) % CELL_MODULUS) as u8
}

pub fn decrement(value: u8) -> u8 {
    ((u16::from(value) + CELL_MODULUS - 1) % CELL_MODULUS) as u8
}
