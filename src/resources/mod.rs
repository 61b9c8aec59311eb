use std::path::Path;

use anyhow::Context;

use crate::data_structures::geometry::Geometry;

/**
 * This module contains all logic for loading fonts and turning text into
 * meshes. Files are fetched relative to the site origin on the web and
 * relative to the configured asset root natively.
 */
pub mod font;
pub mod text;
pub mod triangulate;

#[cfg(target_arch = "wasm32")]
fn format_url(file_name: &str) -> anyhow::Result<reqwest::Url> {
    let window = web_sys::window().context("No window available")?;
    let origin = window
        .location()
        .origin()
        .map_err(|e| anyhow::anyhow!("Cannot read the page origin: {:?}", e))?;
    let base = reqwest::Url::parse(&format!("{}/", origin))?;
    Ok(base.join(file_name)?)
}

#[allow(unused_variables)]
pub async fn load_string(asset_root: &Path, file_name: &str) -> anyhow::Result<String> {
    #[cfg(target_arch = "wasm32")]
    let txt = {
        let url = format_url(file_name)?;
        reqwest::get(url)
            .await?
            .error_for_status()?
            .text()
            .await?
    };
    #[cfg(not(target_arch = "wasm32"))]
    let txt = {
        let path = asset_root.join(file_name);
        std::fs::read_to_string(&path).with_context(|| {
            format!(
                "Cannot read {} (set {} to another asset directory)",
                path.display(),
                crate::config::ASSET_ROOT_ENV
            )
        })?
    };

    Ok(txt)
}

/// Loads the typeface at `font_file` and builds the extruded mesh for `text`.
///
/// Every call fetches the font again; callers that need the font more than
/// once should parse it themselves with [`font::Typeface::parse`].
pub async fn load_text_geometry(
    asset_root: &Path,
    font_file: &str,
    text: &str,
    options: text::TextOptions,
) -> anyhow::Result<Geometry> {
    let json = load_string(asset_root, font_file).await?;
    let typeface = font::Typeface::parse(&json)
        .with_context(|| format!("Cannot parse typeface {}", font_file))?;
    Ok(text::text_geometry(&typeface, text, &options))
}
