//! Append-only log of fetched batches.

use crate::error::DatasetError;
use crate::types::{Batch, Row};

/// Ordered batches with a running row count.
#[derive(Debug, Clone, Default)]
pub struct BatchStore {
    batches: Vec<Batch>,
    size: usize,
}

impl BatchStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a batch. Rows keep their global order.
    pub fn push(&mut self, batch: Batch) {
        self.size += batch.len();
        self.batches.push(batch);
    }

    /// Total number of rows across all batches.
    pub fn len(&self) -> usize {
        self.size
    }

    pub fn is_empty(&self) -> bool {
        self.size == 0
    }

    pub fn batch_count(&self) -> usize {
        self.batches.len()
    }

    /// Translates a global row index into `(batch, local index)`.
    pub fn locate(&self, index: usize) -> Result<(&Batch, usize), DatasetError> {
        if index >= self.size {
            return Err(DatasetError::OutOfRange {
                index,
                size: self.size,
            });
        }

        let mut local = index;
        for batch in &self.batches {
            if local < batch.len() {
                return Ok((batch, local));
            }
            local -= batch.len();
        }

        Err(DatasetError::OutOfRange {
            index,
            size: self.size,
        })
    }

    /// Row at a global index.
    pub fn row(&self, index: usize) -> Result<&Row, DatasetError> {
        let (batch, local) = self.locate(index)?;
        batch.get(local).ok_or(DatasetError::OutOfRange {
            index,
            size: self.size,
        })
    }
}
