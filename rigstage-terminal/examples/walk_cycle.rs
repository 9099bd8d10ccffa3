/// Example: Print the procedural walk cycle, or run a transport script
///
/// Usage: cargo run --example walk_cycle -- [script-file]
use rigstage_core::{sample_pose, EditorConfig, Joint, TOTAL_FRAMES};
use rigstage_terminal::run_headless;
use std::env;
use std::fs;
use std::io;

fn main() -> io::Result<()> {
    let args: Vec<String> = env::args().collect();

    if args.len() < 2 {
        eprintln!("Usage: {} <script-file>", args[0]);
        eprintln!("\nNo script provided, printing the walk cycle...");

        print!("frame");
        for joint in Joint::ALL {
            print!(" {:>7}", joint.display_name());
        }
        println!("   scale");

        for frame in (0..TOTAL_FRAMES).step_by(8) {
            let pose = sample_pose(frame, 0.0);
            print!("{:>5}", frame);
            for (_, offset) in pose.iter() {
                print!(" {:>+7.3}", offset.rotation);
            }
            println!(" {:>7.3}", pose.scale);
        }
        return Ok(());
    }

    let script = fs::read_to_string(&args[1])
        .map_err(|e| io::Error::new(io::ErrorKind::NotFound, format!("Failed to read script: {}", e)))?;

    run_headless(&EditorConfig::default(), &script)
}
