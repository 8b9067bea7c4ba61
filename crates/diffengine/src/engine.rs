use std::io::Read;

use log::debug;
use paged::{Page, PagedStreamReader};

use crate::diff::Diff;
use crate::error::{DiffEngineError, DiffEngineResult};
use crate::merge::{try_merge, MergeOutcome};

enum SearchState {
    ReadPages,
    FindDiff,
}

/// Walks a `base` and a `new` stream page by page and yields the byte
/// ranges of `new` that differ from `base`, coalescing nearby differences
/// per `gap_threshold` so short matching runs don't force a new record.
///
/// Call [`DiffEngine::next_diff`] in a loop until it returns an empty
/// [`Diff`]; that is the terminator, and every call after it also returns
/// empty.
pub struct DiffEngine<B: Read, N: Read> {
    base_reader: PagedStreamReader<B>,
    new_reader: PagedStreamReader<N>,
    gap_threshold: u64,
    max_size: u64,
    state: SearchState,
    base_page: Page,
    new_page: Page,
    cur: u64,
    in_flight: Diff,
}

impl<B: Read, N: Read> DiffEngine<B, N> {
    pub fn new(
        base_reader: PagedStreamReader<B>,
        new_reader: PagedStreamReader<N>,
        gap_threshold: u64,
    ) -> Self {
        let max_size = new_reader.page_size() as u64;
        DiffEngine {
            base_reader,
            new_reader,
            gap_threshold,
            max_size,
            state: SearchState::ReadPages,
            base_page: Page::empty_at(0),
            new_page: Page::empty_at(0),
            cur: 0,
            in_flight: Diff::empty_at(0),
        }
    }

    /// Advances the state machine until there is a diff ready to yield.
    pub fn next_diff(&mut self) -> DiffEngineResult<Diff> {
        loop {
            match self.state {
                SearchState::ReadPages => {
                    self.base_page = self.base_reader.get_next_page()?;
                    self.new_page = self.new_reader.get_next_page()?;
                    if self.base_page.size() != self.new_page.size() {
                        return Err(DiffEngineError::UnequalStreamLength);
                    }
                    if self.base_page.is_empty() && self.new_page.is_empty() {
                        let result =
                            std::mem::replace(&mut self.in_flight, Diff::empty_at(self.cur));
                        return Ok(result);
                    }
                    self.state = SearchState::FindDiff;
                }
                SearchState::FindDiff => {
                    let s0 = (self.cur - self.new_page.start()) as usize;
                    let mut candidate = self.find_diff_in_page(s0);
                    self.cur = candidate.end();

                    if candidate.is_empty() {
                        // Nothing left to find in this page: go fetch the
                        // next one. The in-flight diff, if any, stays
                        // pending — it may still turn out to continue into
                        // the next page (gap 0), which only a genuine
                        // candidate can tell us.
                        self.state = SearchState::ReadPages;
                        continue;
                    }

                    match try_merge(
                        &mut self.in_flight,
                        &mut candidate,
                        self.gap_threshold,
                        self.max_size,
                    ) {
                        MergeOutcome::Finished => {
                            let result = std::mem::replace(&mut self.in_flight, candidate);
                            if !result.is_empty() {
                                debug!("yielding diff [{}, {})", result.start(), result.end());
                                return Ok(result);
                            }
                        }
                        MergeOutcome::Incomplete => {
                            // `self.in_flight` already absorbed `candidate`;
                            // keep scanning for the next one.
                        }
                    }
                }
            }
        }
    }

    fn find_diff_in_page(&self, s0: usize) -> Diff {
        let page_len = self.new_page.size() as usize;
        let new_bytes = self.new_page.as_slice();
        let base_bytes = self.base_page.as_slice();

        let mut s = s0;
        while s < page_len && new_bytes[s] == base_bytes[s] {
            s += 1;
        }
        if s >= page_len {
            return Diff::empty_at(self.new_page.end());
        }

        let mut e = s + 1;
        while e < page_len && new_bytes[e] != base_bytes[e] {
            e += 1;
        }

        Diff::single_page(
            self.new_page.clone(),
            self.new_page.start() + s as u64,
            self.new_page.start() + e as u64,
        )
    }
}
