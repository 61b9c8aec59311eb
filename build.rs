use anyhow::*;
use fs_extra::copy_items;
use fs_extra::dir::CopyOptions;
use std::env;
use std::path::PathBuf;

const FONT: &str = "static/fonts/droid_sans_regular.typeface.json";

fn main() -> Result<()> {
    // This tells Cargo to rerun this script if something in /static/ changes.
    println!("cargo:rerun-if-changed=static");

    let out_dir = env::var("OUT_DIR")?;
    let mut copy_options = CopyOptions::new();
    copy_options.overwrite = true;
    let manifest_dir = PathBuf::from(env::var("CARGO_MANIFEST_DIR")?);
    let static_src = manifest_dir.join("static");
    if static_src.exists() {
        copy_items(&[static_src], out_dir, &copy_options)?;
    }
    if !manifest_dir.join(FONT).exists() {
        println!(
            "cargo:warning={} is missing, the page will render without text",
            FONT
        );
    }

    Ok(())
}
