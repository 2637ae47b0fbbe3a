use std::io::Write;

use serde::Serialize;
use serde_json::Value;

use crate::error::CliError;

/// Write `value` to the writer, as one JSON document or as TSV lines.
///
/// TSV mode writes one `key \t value` line per top-level field of an object,
/// one line per element of an array (elements are compact JSON), and the bare
/// value otherwise.
pub fn write_value<W: Write, T: Serialize>(
    value: &T,
    json_mode: bool,
    writer: &mut W,
) -> Result<(), CliError> {
    let value = serde_json::to_value(value)?;

    if json_mode {
        serde_json::to_writer_pretty(&mut *writer, &value)?;
        writer.write_all(b"\n")?;
    } else {
        match &value {
            Value::Object(fields) => {
                for (key, field) in fields {
                    writeln!(writer, "{key}\t{}", scalar(field))?;
                }
            }
            Value::Array(items) => {
                for item in items {
                    writeln!(writer, "{}", scalar(item))?;
                }
            }
            other => writeln!(writer, "{}", scalar(other))?,
        }
    }

    writer.flush()?;
    Ok(())
}

/// Strings unquoted, null empty, everything else as compact JSON.
fn scalar(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}
