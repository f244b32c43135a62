use serde_json::Value;
use std::io;

use super::{format_scalar, result_of};

/// Write output as CSV to stdout. Results holding rows (rent periods,
/// commission periods, expense lines) are written one row per entry;
/// anything else as field/value pairs.
pub fn print_csv(value: &Value) -> csv::Result<()> {
    let stdout = io::stdout();
    write_csv(stdout.lock(), value)
}

fn write_csv<W: io::Write>(out: W, value: &Value) -> csv::Result<()> {
    let mut wtr = csv::Writer::from_writer(out);

    let result = result_of(value);
    match row_source(result) {
        Some(rows) => write_rows(&mut wtr, rows)?,
        None => match result {
            Value::Object(map) => {
                wtr.write_record(["field", "value"])?;
                for (key, val) in map {
                    wtr.write_record([key.as_str(), &format_scalar(val)])?;
                }
            }
            _ => wtr.write_record([&format_scalar(result)])?,
        },
    }

    wtr.flush()?;
    Ok(())
}

/// The row array to tabulate, if the result has one.
fn row_source(result: &Value) -> Option<&[Value]> {
    ["/periods", "/lines", "/rent_schedule/periods"]
        .iter()
        .find_map(|ptr| result.pointer(ptr))
        .and_then(Value::as_array)
        .map(Vec::as_slice)
}

fn write_rows<W: io::Write>(wtr: &mut csv::Writer<W>, rows: &[Value]) -> csv::Result<()> {
    let Some(Value::Object(first)) = rows.first() else {
        return Ok(());
    };
    let headers: Vec<&str> = first.keys().map(|k| k.as_str()).collect();
    wtr.write_record(&headers)?;

    for item in rows {
        if let Value::Object(map) = item {
            let row: Vec<String> = headers
                .iter()
                .map(|h| map.get(*h).map(format_scalar).unwrap_or_default())
                .collect();
            wtr.write_record(&row)?;
        }
    }
    Ok(())
}
