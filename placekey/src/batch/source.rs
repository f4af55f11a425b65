//! Record collections the batch processor can iterate.

use std::ops::Range;
use thiserror::Error;

/// Failure of the underlying collection, not of an individual record.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SourceError {
    #[error("Failed to load records {start}..{end}: {reason}")]
    Load {
        start: usize,
        end: usize,
        reason: String,
    },

    #[error("Failed to save records {start}..{end}: {reason}")]
    Save {
        start: usize,
        end: usize,
        reason: String,
    },
}

/// A collection processed in chunks.
///
/// `with_chunk` hands the records in `range` to `f` and persists any
/// changes it makes. In-memory collections lend their slice directly; paged
/// collections load a page, then write it back.
pub trait RecordSource {
    type Item;

    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn with_chunk(
        &mut self,
        range: Range<usize>,
        f: &mut dyn FnMut(&mut [Self::Item]),
    ) -> Result<(), SourceError>;
}

impl<T> RecordSource for Vec<T> {
    type Item = T;

    fn len(&self) -> usize {
        self.as_slice().len()
    }

    fn with_chunk(
        &mut self,
        range: Range<usize>,
        f: &mut dyn FnMut(&mut [T]),
    ) -> Result<(), SourceError> {
        f(&mut self[range]);
        Ok(())
    }
}

impl<T> RecordSource for &mut [T] {
    type Item = T;

    fn len(&self) -> usize {
        <[T]>::len(self)
    }

    fn with_chunk(
        &mut self,
        range: Range<usize>,
        f: &mut dyn FnMut(&mut [T]),
    ) -> Result<(), SourceError> {
        f(&mut self[range]);
        Ok(())
    }
}

/// Storage that loads and saves records by position, such as a database
/// table read with `LIMIT`/`OFFSET`.
pub trait PageStore {
    type Item;

    /// Total number of records.
    fn count(&self) -> usize;

    /// Loads the records in `range`.
    fn load(&mut self, range: Range<usize>) -> Result<Vec<Self::Item>, String>;

    /// Writes back records previously loaded from position `start`.
    fn save(&mut self, start: usize, records: &[Self::Item]) -> Result<(), String>;
}

/// Adapts a [`PageStore`] into a [`RecordSource`].
#[derive(Debug)]
pub struct Paged<S> {
    store: S,
}

impl<S: PageStore> Paged<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn into_inner(self) -> S {
        self.store
    }

    pub fn store(&self) -> &S {
        &self.store
    }
}

impl<S: PageStore> RecordSource for Paged<S> {
    type Item = S::Item;

    fn len(&self) -> usize {
        self.store.count()
    }

    fn with_chunk(
        &mut self,
        range: Range<usize>,
        f: &mut dyn FnMut(&mut [S::Item]),
    ) -> Result<(), SourceError> {
        let (start, end) = (range.start, range.end);
        let mut page = self
            .store
            .load(range)
            .map_err(|reason| SourceError::Load { start, end, reason })?;

        f(&mut page);

        self.store
            .save(start, &page)
            .map_err(|reason| SourceError::Save { start, end, reason })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Pages {
        rows: Vec<u32>,
        loads: usize,
    }

    impl PageStore for Pages {
        type Item = u32;

        fn count(&self) -> usize {
            self.rows.len()
        }

        fn load(&mut self, range: Range<usize>) -> Result<Vec<u32>, String> {
            self.loads += 1;
            Ok(self.rows[range].to_vec())
        }

        fn save(&mut self, start: usize, records: &[u32]) -> Result<(), String> {
            self.rows[start..start + records.len()].copy_from_slice(records);
            Ok(())
        }
    }

    fn double(source: &mut dyn RecordSource<Item = u32>, range: Range<usize>) {
        source
            .with_chunk(range, &mut |chunk| chunk.iter_mut().for_each(|v| *v *= 2))
            .unwrap();
    }

    #[test]
    fn test_vec_source() {
        let mut rows = vec![1, 2, 3];
        assert_eq!(RecordSource::len(&rows), 3);
        double(&mut rows, 1..3);
        assert_eq!(rows, vec![1, 4, 6]);
    }

    #[test]
    fn test_slice_source() {
        let mut rows = [1, 2, 3];
        let mut slice: &mut [u32] = &mut rows;
        double(&mut slice, 0..1);
        assert_eq!(rows, [2, 2, 3]);
    }

    #[test]
    fn test_paged_source_writes_back() {
        let mut paged = Paged::new(Pages {
            rows: vec![1, 2, 3, 4],
            loads: 0,
        });
        double(&mut paged, 0..2);
        double(&mut paged, 2..4);

        let store = paged.into_inner();
        assert_eq!(store.rows, vec![2, 4, 6, 8]);
        assert_eq!(store.loads, 2);
    }

    #[test]
    fn test_source_error_message() {
        let err = SourceError::Load {
            start: 0,
            end: 10,
            reason: "connection lost".into(),
        };
        assert_eq!(err.to_string(), "Failed to load records 0..10: connection lost");
    }
}
