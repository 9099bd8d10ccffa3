/// rigstage terminal editor
///
/// Plays back the procedural rig in an ASCII viewport with a timeline strip.
/// Controls:
///   - Space: Play / pause
///   - Home / End, Left / Right: Seek to the ends, step one frame
///   - Mouse on the timeline: Scrub
///   - K: Add a keyframe for the current selection
///   - B / M / X: Cycle bone selection, select the model, clear selection
///   - 1-4: Perspective, top, front and side views; +/- zoom; WASD orbit
///   - Q/ESC: Quit
use clap::Parser;
use log::info;
use rigstage_core::{EditorConfig, ViewMode};
use rigstage_terminal::{io_error, run_headless, TerminalApp};
use std::fs;
use std::io;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "rigstage-terminal", version, about = "Terminal rig animation editor")]
struct Args {
    /// TOML file overriding timeline and viewport settings
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Run a transport script (file path, or `-e` for inline text) without
    /// opening the interactive editor
    #[arg(short, long)]
    script: Option<String>,

    /// Treat `--script` as inline command text rather than a path
    #[arg(short = 'e', long, requires = "script")]
    inline: bool,

    /// Initial viewport view: perspective, top, front or side
    #[arg(long)]
    view: Option<String>,
}

fn main() -> io::Result<()> {
    env_logger::init();
    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => EditorConfig::load(path).map_err(io_error)?,
        None => EditorConfig::default(),
    };
    if let Some(view) = &args.view {
        config.view_mode = view.parse::<ViewMode>().map_err(io_error)?;
    }

    if let Some(script) = &args.script {
        let text = if args.inline {
            script.clone()
        } else {
            fs::read_to_string(script).map_err(|e| {
                io::Error::new(io::ErrorKind::NotFound, format!("Failed to read script: {}", e))
            })?
        };
        return run_headless(&config, &text);
    }

    info!(
        "starting editor: {} frames at {} fps",
        config.total_frames, config.rate
    );
    println!("rigstage - starting terminal editor (press Q to quit)...");

    let mut app = TerminalApp::new(&config)?;
    app.run()?;

    println!("Closed rigstage. {} keyframes were set this session.", app.session().controller.keyframes().len());
    Ok(())
}
