//! Catalog command implementation.

use nexus_tactics::game::Catalog;

use super::output::{catalog_entries, format_catalog_text};
use super::{CliError, OutputFormat};

/// Execute the catalog command.
///
/// # Errors
///
/// Returns an error if JSON serialization fails.
pub(crate) fn execute(format: OutputFormat) -> Result<(), CliError> {
    let catalog = Catalog::standard();
    match format {
        OutputFormat::Text => print!("{}", format_catalog_text(&catalog)),
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&catalog_entries(&catalog))?);
        }
    }
    Ok(())
}
