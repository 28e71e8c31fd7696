use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use anyhow::{Context, Result};

use crate::data::filter::FilteredView;
use crate::figure::Figure;

/// Write the figure specification as pretty-printed JSON.
pub fn write_figure_json(path: &Path, figure: &Figure) -> Result<()> {
    let file = File::create(path).with_context(|| format!("creating {}", path.display()))?;
    let mut writer = BufWriter::new(file);
    serde_json::to_writer_pretty(&mut writer, figure).context("writing figure JSON")?;
    writer.flush().context("flushing figure JSON")?;
    Ok(())
}

/// Write the rows of a view as CSV with the Gapminder column names.
pub fn write_view_csv(path: &Path, view: &FilteredView) -> Result<()> {
    let mut writer =
        csv::Writer::from_path(path).with_context(|| format!("creating {}", path.display()))?;
    for obs in view.rows() {
        writer.serialize(obs).context("writing CSV row")?;
    }
    writer.flush().context("flushing CSV")?;
    Ok(())
}
