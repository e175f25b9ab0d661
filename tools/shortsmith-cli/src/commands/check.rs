//! Check external tool availability.

use shortsmith_common::config::AppConfig;
use shortsmith_render_engine::font::load_font;
use shortsmith_render_engine::probe::command_exists;

pub fn run() -> anyhow::Result<()> {
    println!("Shortsmith System Check");
    println!("{}", "=".repeat(50));

    let mut all_ok = true;

    for tool in ["ffmpeg", "ffprobe"] {
        if command_exists(tool) {
            println!("[OK] {tool} found on PATH");
        } else {
            println!("[FAIL] {tool} not found on PATH");
            all_ok = false;
        }
    }

    let config = AppConfig::load();
    match load_font(config.render.font_path.as_deref()) {
        Ok(_) => println!("[OK] Font face available"),
        Err(e) => {
            println!("[FAIL] {e}");
            all_ok = false;
        }
    }

    println!();
    if all_ok {
        println!("All required tools are available. Shortsmith is ready.");
    } else {
        println!("Some required tools are missing. See above for details.");
    }

    Ok(())
}
