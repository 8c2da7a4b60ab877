//! Image Vote entry point
//!
//! Validates an image folder and reports the set layout. The interactive
//! canvas shell links against the library; this binary is the headless
//! front door for checking that a folder can start a session.

use std::path::PathBuf;
use std::process::ExitCode;

use image_vote::loader;
use image_vote::settings::Settings;

fn main() -> ExitCode {
    env_logger::init();

    let settings = Settings::load();
    log::info!(
        "Image Vote starting ({}x{} window preset)",
        settings.window_width,
        settings.window_height
    );

    let Some(folder) = std::env::args().nth(1).map(PathBuf::from) else {
        eprintln!("usage: image-vote <image-folder>");
        return ExitCode::from(2);
    };

    match loader::load_folder(&folder) {
        Ok(loaded) => {
            println!(
                "{} variants x {} levels, base {}x{} ({}:{})",
                loaded.set.variant_count(),
                loaded.set.level_count(),
                loaded.base_size.0,
                loaded.base_size.1,
                loaded.aspect.0,
                loaded.aspect.1,
            );
            for variant in &loaded.set.variants {
                println!("  {:>3}  {}", variant.index, variant.name);
            }
            ExitCode::SUCCESS
        }
        Err(e) => {
            log::error!("cannot start a session: {e}");
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}
