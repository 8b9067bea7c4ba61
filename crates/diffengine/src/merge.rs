use crate::diff::Diff;

/// Whether `try_merge` absorbed `candidate` into the in-flight diff
/// completely (`Incomplete`, the caller keeps scanning for more to merge) or
/// gave up (`Finished`, the in-flight diff is ready to be yielded).
pub enum MergeOutcome {
    Finished,
    Incomplete,
}

/// Tries to extend `a` (the in-flight diff) with `b` (the diff just found),
/// given `a.end <= b.start`. Mutates both in place: `a` grows to absorb as
/// much of `b` as fits under `max_size`, and `b` shrinks by the amount
/// absorbed — so on `Finished` the (possibly still non-empty) `b` is what
/// the caller should carry forward as the next in-flight diff.
pub fn try_merge(a: &mut Diff, b: &mut Diff, gap_threshold: u64, max_size: u64) -> MergeOutcome {
    if a.is_empty() || b.is_empty() {
        return MergeOutcome::Finished;
    }

    debug_assert!(a.end() <= b.start());
    let gap = b.start() - a.end();
    if gap > gap_threshold {
        return MergeOutcome::Finished;
    }
    if a.size() + gap >= max_size {
        return MergeOutcome::Finished;
    }

    let free = max_size - (a.size() + gap);
    let to_merge = free.min(b.size());

    if a.pages[1].is_none() {
        if let Some(b_page0) = &b.pages[0] {
            if b_page0.start() == a.end() {
                a.pages[1] = Some(b_page0.clone());
            }
        }
    }

    a.end += gap + to_merge;
    b.start += to_merge;

    if a.size() >= max_size {
        MergeOutcome::Finished
    } else {
        MergeOutcome::Incomplete
    }
}
