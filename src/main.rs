use std::path::PathBuf;

use anyhow::Context;
use framesnap::capture::{self, CaptureOutcome};
use framesnap::config::AppConfig;
use framesnap::export::PngFileSink;

const USAGE: &str = "usage: framesnap frame <image> [output-dir]";

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    match args.as_slice() {
        [cmd, input] if cmd == "frame" => frame(PathBuf::from(input), None),
        [cmd, input, out] if cmd == "frame" => {
            frame(PathBuf::from(input), Some(PathBuf::from(out)))
        }
        _ => {
            eprintln!("{USAGE}");
            std::process::exit(2);
        }
    }
}

/// Save an existing image the way a direct capture would be saved
fn frame(input: PathBuf, output_dir: Option<PathBuf>) -> anyhow::Result<()> {
    let mut config = AppConfig::load();
    if let Some(dir) = output_dir {
        config.save_directory = dir;
    }

    let image = image::open(&input)
        .with_context(|| format!("Failed to open image: {}", input.display()))?
        .to_rgba8();

    let path = match capture::finish(image, &config, &PngFileSink)? {
        CaptureOutcome::Saved(path) => path,
        CaptureOutcome::Edit(editor) => {
            log::info!("No editor available headless, saving unedited");
            capture::save_edited(editor, &config, &PngFileSink)?
        }
    };
    println!("{}", path.display());
    Ok(())
}
