//! Pre-scan validation for the legacy v1 diff format.
//!
//! Grounded on the historical `backup`/`restore` predecessor: a v1 diff file
//! is valid only if every entry's offset is strictly increasing and every
//! `offset + sector_size` falls within the target file's length. The v2
//! `restore` path never calls this; it is offered as a standalone utility
//! for the CLI's `--legacy` path and for tests.

use std::io::Read;

use format::v1::V1Reader;

use crate::error::{RestoreError, RestoreResult};

pub fn check_v1_diff_file<R: Read>(
    diff: R,
    sector_size: usize,
    output_len: u64,
) -> RestoreResult<()> {
    let mut reader = V1Reader::new(diff, sector_size);
    let mut last_offset: Option<u64> = None;

    while let Some(record) = reader.next_record()? {
        if let Some(prev) = last_offset {
            if record.offset <= prev {
                return Err(RestoreError::InvalidLegacyDiff(format!(
                    "offset {} does not strictly increase after {prev}",
                    record.offset
                )));
            }
        }
        if record.offset + sector_size as u64 > output_len {
            return Err(RestoreError::InvalidLegacyDiff(format!(
                "record at offset {} (sector size {sector_size}) exceeds output length {output_len}",
                record.offset
            )));
        }
        last_offset = Some(record.offset);
    }

    Ok(())
}
