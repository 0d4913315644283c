pub mod emitter;
pub mod error;
pub mod playlist;
pub mod source;

use emitter::EmitOptions;
use error::Result;
use source::{FetchConfig, Source};
use tracing::info;

/// Loads the playlist, indexes it and renders the grouped text listing.
pub async fn convert(source: &Source, fetch: &FetchConfig, options: &EmitOptions) -> Result<String> {
    options.validate()?;
    let lines = source::load(source, fetch).await?;
    let index = playlist::index_lines(&lines);
    let text = emitter::to_text(&index, options);
    info!("Rendered {} bytes of channel listing", text.len());
    Ok(text)
}
