use crate::error::{Result, SearchError};

/// Read cursor over a finished list of steps.
///
/// `next`/`previous` clamp at the ends instead of failing, mirroring
/// disabled Previous/Next buttons. Only `seek` can fail.
#[derive(Debug, Clone)]
pub struct StepPlayer<'a, T> {
    steps: &'a [T],
    cursor: usize,
}

impl<'a, T> StepPlayer<'a, T> {
    /// Fails with `IndexOutOfRange` on an empty slice
    pub fn new(steps: &'a [T]) -> Result<Self> {
        if steps.is_empty() {
            return Err(SearchError::IndexOutOfRange { index: 0, len: 0 });
        }
        Ok(StepPlayer { steps, cursor: 0 })
    }

    pub fn current(&self) -> &'a T {
        &self.steps[self.cursor]
    }

    pub fn position(&self) -> usize {
        self.cursor
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    pub fn at_start(&self) -> bool {
        self.cursor == 0
    }

    pub fn at_end(&self) -> bool {
        self.cursor + 1 == self.steps.len()
    }

    pub fn seek(&mut self, index: usize) -> Result<&'a T> {
        if index >= self.steps.len() {
            return Err(SearchError::IndexOutOfRange {
                index,
                len: self.steps.len(),
            });
        }
        self.cursor = index;
        Ok(self.current())
    }

    pub fn next(&mut self) -> &'a T {
        if !self.at_end() {
            self.cursor += 1;
        }
        self.current()
    }

    pub fn previous(&mut self) -> &'a T {
        if !self.at_start() {
            self.cursor -= 1;
        }
        self.current()
    }

    pub fn first(&mut self) -> &'a T {
        self.cursor = 0;
        self.current()
    }

    pub fn last(&mut self) -> &'a T {
        self.cursor = self.steps.len() - 1;
        self.current()
    }

    /// "Step k of n", one-based
    pub fn label(&self) -> String {
        format!("Step {} of {}", self.cursor + 1, self.steps.len())
    }
}
