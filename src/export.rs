use crate::error::Result;
use crate::schema::{ForecastResult, MonthSnapshot};
use std::io::Write;

/// Writes one CSV row per snapshot. The header row is the snapshot's wire
/// field names, in declaration order.
pub fn write_snapshots_csv<W: Write>(snapshots: &[MonthSnapshot], writer: W) -> Result<()> {
    let mut csv_writer = csv::Writer::from_writer(writer);
    for snapshot in snapshots {
        csv_writer.serialize(snapshot)?;
    }
    csv_writer.flush()?;
    Ok(())
}

pub fn snapshots_to_csv_string(snapshots: &[MonthSnapshot]) -> Result<String> {
    let mut buffer = Vec::new();
    write_snapshots_csv(snapshots, &mut buffer)?;
    Ok(String::from_utf8_lossy(&buffer).into_owned())
}

pub fn forecast_to_json(result: &ForecastResult, pretty: bool) -> Result<String> {
    let json = if pretty {
        serde_json::to_string_pretty(result)?
    } else {
        serde_json::to_string(result)?
    };
    Ok(json)
}
