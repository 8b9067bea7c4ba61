use std::fs::{File, OpenOptions};
use std::path::Path;

use anyhow::{Context, Result};
use log::info;

pub fn run(buffer_size: u32, difffile: &Path, outfile: &Path) -> Result<()> {
    let page_size = common::BufferSize::new(buffer_size)?;

    let diff_file = File::open(difffile).with_context(|| format!("open {}", difffile.display()))?;
    let mut out_file = OpenOptions::new()
        .read(true)
        .write(true)
        .open(outfile)
        .with_context(|| format!("open {}", outfile.display()))?;

    restore::restore(diff_file, &mut out_file, page_size.as_usize())?;
    info!("restore finished: {} applied to {}", difffile.display(), outfile.display());
    Ok(())
}
