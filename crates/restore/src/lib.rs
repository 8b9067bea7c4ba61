//! Applies a v2 diff-dd image onto an existing output file.

mod error;
pub mod v1check;

pub use error::{RestoreError, RestoreResult};

use std::io::{Read, Seek, SeekFrom, Write};

use log::{debug, info};

/// Reads `diff_stream` as a v2 image and applies every record to `output`,
/// which must already be open for read-write access and is not truncated.
///
/// Does not flush or close `output`; that is the caller's responsibility on
/// scope exit.
pub fn restore<R: Read, W: Write + Seek>(
    diff_stream: R,
    output: &mut W,
    buffer_capacity: usize,
) -> RestoreResult<()> {
    let mut reader = format::Reader::open(diff_stream, buffer_capacity)?;
    let mut records_applied = 0u64;
    let mut bytes_applied = 0u64;

    loop {
        let offset = reader.read_offset()?;
        if reader.eof() {
            break;
        }
        let size = reader.read_size()?;

        output.seek(SeekFrom::Start(offset))?;

        let mut remaining = size as usize;
        while remaining > 0 {
            let part = reader.read_record_data(remaining)?;
            if part.is_empty() {
                return Err(RestoreError::TruncatedRecord);
            }
            output.write_all(part.as_slice())?;
            remaining -= part.len();
        }

        records_applied += 1;
        bytes_applied += size as u64;
        debug!("applied record offset={offset} size={size}");
    }

    info!("restore finished: {records_applied} record(s), {bytes_applied} byte(s)");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn build_v2_image(records: &[(u64, &[u8])]) -> Vec<u8> {
        let mut buf = Vec::new();
        {
            let mut writer = format::Writer::open(&mut buf, 64).unwrap();
            for (offset, payload) in records {
                let arc: std::sync::Arc<[u8]> = std::sync::Arc::from(payload.to_vec());
                let part = diffengine::RecordPart::from_raw(arc, 0, payload.len());
                writer
                    .write_diff_record(*offset, payload.len() as u32, &[part])
                    .unwrap();
            }
            writer.finish().unwrap();
        }
        buf
    }

    #[test]
    fn applies_single_record_at_offset() {
        let image = build_v2_image(&[(4, b"abcd")]);
        let mut output = Cursor::new(vec![0u8; 16]);
        restore(Cursor::new(image), &mut output, 64).unwrap();
        assert_eq!(output.into_inner()[4..8], *b"abcd");
    }

    #[test]
    fn applies_multiple_records_in_order() {
        let image = build_v2_image(&[(0, b"AA"), (10, b"BB")]);
        let mut output = Cursor::new(vec![0u8; 16]);
        restore(Cursor::new(image), &mut output, 64).unwrap();
        let data = output.into_inner();
        assert_eq!(&data[0..2], b"AA");
        assert_eq!(&data[10..12], b"BB");
    }

    #[test]
    fn empty_diff_image_leaves_output_untouched() {
        let image = build_v2_image(&[]);
        let mut output = Cursor::new(vec![0xFFu8; 8]);
        restore(Cursor::new(image), &mut output, 64).unwrap();
        assert_eq!(output.into_inner(), vec![0xFFu8; 8]);
    }

    #[test]
    fn truncated_payload_is_an_error() {
        // Hand-build a record declaring 8 bytes of payload but supply only
        // 2 before the stream ends, without going through `Writer` (which
        // would assert the lengths match).
        let mut buf = common::FILE_SIGNATURE.to_vec();
        buf.push(common::FILE_VERSION);
        buf.extend_from_slice(&0u64.to_be_bytes()); // offset
        buf.extend_from_slice(&8u32.to_be_bytes()); // declared size
        buf.extend_from_slice(&[1u8, 2]); // actual payload, short

        let mut output = Cursor::new(vec![0u8; 16]);
        let err = restore(Cursor::new(buf), &mut output, 64).unwrap_err();
        assert!(matches!(err, RestoreError::TruncatedRecord));
    }
}
