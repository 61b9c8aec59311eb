//! Start-up configuration.
//!
//! Everything the landing page needs from the outside world (where the canvas
//! lives, where assets are served from, where the button leads) is collected in
//! [`Config`]. [`Config::default`] reproduces the published page; natively the
//! asset root can be moved with the `WELCOME_ASSET_ROOT` environment variable.

use std::path::PathBuf;

/// Environment variable that overrides [`Config::asset_root`] on native targets.
pub const ASSET_ROOT_ENV: &str = "WELCOME_ASSET_ROOT";

#[derive(Clone, Debug)]
pub struct Config {
    /// CSS selector of the canvas the renderer draws into (wasm only).
    pub canvas_selector: String,
    /// Directory static assets are read from on native targets.
    pub asset_root: PathBuf,
    /// Typeface file relative to the asset root.
    pub font_file: String,
    /// Location the "Enter" button navigates to.
    pub navigation_target: String,
    /// Upper bound for the device pixel ratio used to size the surface.
    pub max_pixel_ratio: f64,
    pub clear_colour: wgpu::Color,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            canvas_selector: "canvas.webgl".to_string(),
            asset_root: PathBuf::from("static"),
            font_file: "fonts/droid_sans_regular.typeface.json".to_string(),
            navigation_target: "about.html".to_string(),
            max_pixel_ratio: 2.0,
            clear_colour: wgpu::Color::BLACK,
        }
    }
}

impl Config {
    /// Defaults with environment overrides applied.
    pub fn from_env() -> Self {
        let config = Self::default();
        #[cfg(not(target_arch = "wasm32"))]
        let config = config.with_asset_root(std::env::var(ASSET_ROOT_ENV).ok());
        config
    }

    /// Replaces the asset root when `root` is set and not blank.
    pub fn with_asset_root(mut self, root: Option<String>) -> Self {
        if let Some(root) = root.filter(|r| !r.trim().is_empty()) {
            log::info!("Using asset root {} from {}", root, ASSET_ROOT_ENV);
            self.asset_root = PathBuf::from(root);
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_the_published_page() {
        let config = Config::default();
        assert_eq!(config.canvas_selector, "canvas.webgl");
        assert_eq!(config.navigation_target, "about.html");
        assert_eq!(config.max_pixel_ratio, 2.0);
        assert!(
            config
                .asset_root
                .join(&config.font_file)
                .ends_with("static/fonts/droid_sans_regular.typeface.json")
        );
    }

    #[test]
    fn asset_root_override() {
        let config = Config::default().with_asset_root(Some("/srv/site".to_string()));
        assert_eq!(config.asset_root, PathBuf::from("/srv/site"));
        assert_eq!(config.font_file, Config::default().font_file);

        let untouched = Config::default().with_asset_root(Some("  ".to_string()));
        assert_eq!(untouched.asset_root, PathBuf::from("static"));
        let unset = Config::default().with_asset_root(None);
        assert_eq!(unset.asset_root, PathBuf::from("static"));
    }
}
