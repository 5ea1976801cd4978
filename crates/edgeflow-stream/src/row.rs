//! Row buffering: single-row delay lines and the K-row window generator.
//!
//! A [`RowBuffer`] delays a sample stream by exactly one raster row; a
//! [`RowWindow`] chains `K - 1` of them so that every pushed sample comes
//! back out as a vertically aligned column of the last `K` rows. Pure data
//! movement, no arithmetic.

/// A circular one-row delay line.
///
/// `push` exchanges the incoming sample for the one stored `width` pushes
/// earlier. The write pointer advances only inside `push`; a stalled tick
/// leaves both the contents and the pointer untouched. This is the
/// safety-critical alignment rule of the whole engine: the pointer must
/// move with the stage enable and with nothing else.
#[derive(Debug, Clone)]
pub struct RowBuffer<T> {
    cells: Vec<T>,
    write_idx: usize,
}

impl<T: Copy + Default> RowBuffer<T> {
    /// Create a zeroed buffer for one raster row of `width` samples.
    #[must_use]
    pub fn new(width: u32) -> Self {
        Self {
            cells: vec![T::default(); width as usize],
            write_idx: 0,
        }
    }

    /// Store `sample` and return the sample one full row older at the same
    /// column.
    pub fn push(&mut self, sample: T) -> T {
        let evicted = self.cells[self.write_idx];
        self.cells[self.write_idx] = sample;
        self.write_idx += 1;
        if self.write_idx == self.cells.len() {
            self.write_idx = 0;
        }
        evicted
    }

    /// Clear the contents and rewind the write pointer.
    pub fn reset(&mut self) {
        self.cells.fill(T::default());
        self.write_idx = 0;
    }
}

/// Chain of `K - 1` row buffers forming the K-row window generator.
///
/// Each pushed sample returns the `K` vertically aligned samples at the
/// same column, oldest row first. The output is stale (pre-reset zeros or
/// a previous frame's rows) until `(K - 1) * width` samples have been
/// pushed; the stage sequencer gates consumption so stale rows are never
/// selected by a window.
#[derive(Debug, Clone)]
pub struct RowWindow<T, const K: usize> {
    rows: Vec<RowBuffer<T>>,
}

impl<T: Copy + Default, const K: usize> RowWindow<T, K> {
    /// Create a window generator for rows of `width` samples.
    #[must_use]
    pub fn new(width: u32) -> Self {
        Self {
            rows: (1..K).map(|_| RowBuffer::new(width)).collect(),
        }
    }

    /// Push one sample through the delay chain, returning the `K`
    /// vertically aligned samples at this column, oldest row first.
    pub fn push(&mut self, sample: T) -> [T; K] {
        let mut taps = [T::default(); K];
        taps[K - 1] = sample;
        let mut carry = sample;
        for (slot, row) in self.rows.iter_mut().enumerate().rev() {
            carry = row.push(carry);
            taps[slot] = carry;
        }
        taps
    }

    /// Clear every row buffer in the chain.
    pub fn reset(&mut self) {
        for row in &mut self.rows {
            row.reset();
        }
    }
}
