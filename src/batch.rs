use crate::error::FeedError;
use crate::extractor::Wrapper;

/// One reconstructed sub-document: a contiguous slice of the record sequence
/// rebuilt into a standalone container.
#[derive(Debug, Clone)]
pub struct Batch {
    /// 1-based, sequential, matches emission order.
    pub index: usize,
    /// 0-based offset of the first record within the full sequence.
    pub start: usize,
    /// The records of this batch, verbatim copies.
    pub records: Vec<String>,
    /// prefix + records + suffix, newline-joined.
    pub text: String,
}

impl Batch {
    /// 1-based inclusive record range covered by this batch.
    pub fn record_range(&self) -> (usize, usize) {
        (self.start + 1, self.start + self.records.len())
    }
}

/// Lazy, forward-only batch sequence. One `Batch` is materialized per step so
/// only a single reconstructed document is held in memory at a time.
pub struct Batches<'a> {
    records: &'a [String],
    wrapper: &'a Wrapper,
    size: usize,
    next: usize,
}

impl<'a> Batches<'a> {
    /// Total number of batches this iterator will yield: ceil(N / size).
    pub fn total(&self) -> usize {
        self.records.len().div_ceil(self.size)
    }
}

impl Iterator for Batches<'_> {
    type Item = Batch;

    fn next(&mut self) -> Option<Batch> {
        if self.next >= self.records.len() {
            return None;
        }
        let start = self.next;
        let end = (start + self.size).min(self.records.len());
        let group = &self.records[start..end];
        let text = format!(
            "{}\n{}\n{}",
            self.wrapper.prefix,
            group.join("\n"),
            self.wrapper.suffix
        );
        self.next = end;
        Some(Batch {
            index: start / self.size + 1,
            start,
            records: group.to_vec(),
            text,
        })
    }
}

/// Partition `records` into batches of at most `size`, in original order.
pub fn partition<'a>(
    records: &'a [String],
    wrapper: &'a Wrapper,
    size: usize,
) -> Result<Batches<'a>, FeedError> {
    if size == 0 {
        return Err(FeedError::InvalidBatchSize);
    }
    Ok(Batches {
        records,
        wrapper,
        size,
        next: 0,
    })
}
