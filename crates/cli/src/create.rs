use std::fs::File;
use std::path::Path;

use anyhow::{Context, Result};
use log::info;

pub fn run(buffer_size: u32, infile: &Path, basefile: &Path, outfile: &Path) -> Result<()> {
    let page_size = common::BufferSize::new(buffer_size)?;

    let new_file = File::open(infile).with_context(|| format!("open {}", infile.display()))?;
    let base_file = File::open(basefile).with_context(|| format!("open {}", basefile.display()))?;
    let out_file = File::create(outfile).with_context(|| format!("create {}", outfile.display()))?;

    let new_reader = paged::PagedStreamReader::new(new_file, page_size)?;
    let base_reader = paged::PagedStreamReader::new(base_file, page_size)?;
    let mut engine =
        diffengine::DiffEngine::new(base_reader, new_reader, common::RECORD_HEADER_SIZE as u64);
    let mut writer = format::Writer::open(out_file, page_size.as_usize())?;

    let mut records = 0u64;
    loop {
        let diff = engine.next_diff()?;
        if diff.is_empty() {
            break;
        }
        let parts = diff.get_data();
        writer.write_diff_record(diff.start(), diff.size() as u32, &parts)?;
        records += 1;
    }
    writer.finish()?;
    info!("create finished: {records} record(s) written to {}", outfile.display());
    Ok(())
}
