use crate::ListsError;
use std::fs;
use std::path::Path;
use tracing::info;

/// Writes one name per line, overwriting any existing file at `destination`.
///
/// The body is rendered in full before the single write call, so a run that
/// failed earlier never leaves a truncated artifact behind.
pub fn write_artifact<P: AsRef<Path>>(names: &[String], destination: P) -> Result<(), ListsError> {
    let destination = destination.as_ref();
    let mut body = names.join("\n");
    if !body.is_empty() {
        body.push('\n');
    }
    fs::write(destination, body)?;

    info!(
        count = names.len(),
        path = %destination.display(),
        "wrote artifact"
    );
    Ok(())
}
