pub mod file;
pub mod stdin;

use serde::de::DeserializeOwned;

/// Read a typed record from `--input <file>`, falling back to piped stdin.
pub fn read_record<T: DeserializeOwned>(
    path: Option<&str>,
    command: &str,
) -> Result<T, Box<dyn std::error::Error>> {
    if let Some(path) = path {
        file::read_record(path)
    } else if let Some(data) = stdin::read_stdin()? {
        Ok(serde_json::from_value(data)?)
    } else {
        Err(format!("--input <file.json|file.yaml> or stdin required for {command}").into())
    }
}
