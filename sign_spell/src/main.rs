//! sign_spell — interactive entry point.

use sign_spell::app::{run, AppConfig};
use std::io::{self, Write};
use std::time::Duration;

fn main() {
    env_logger::init();

    println!();
    println!("╔══════════════════════════════════════════════════════════════╗");
    println!("║       Sign Spell — Fingerspelling Translator                 ║");
    println!("╚══════════════════════════════════════════════════════════════╝");
    println!();
    println!("  Detection runs against a simulated hand (keys 1/2/3/0);");
    println!("  a camera + pose-estimation backend plugs in behind the");
    println!("  KeypointSource seam.");
    println!();

    let cfg = if std::env::args().any(|a| a == "--quick") {
        println!("  Quick-start: \"HELLO WORLD\", 3 s per letter\n");
        AppConfig::default()
    } else {
        configure_interactively()
    };

    println!();
    println!("  Opening visualizer window…");
    println!();

    if let Err(e) = run(cfg) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn configure_interactively() -> AppConfig {
    let phrase = {
        let p = read_line("  Phrase to spell (default \"HELLO WORLD\"): ");
        let p = p.trim();
        if p.is_empty() {
            "HELLO WORLD".to_string()
        } else {
            p.to_string()
        }
    };

    let advance_interval = {
        let secs: f64 = read_line("  Seconds per letter, 2–3 (default 3): ")
            .trim()
            .parse()
            .unwrap_or(3.0);
        AppConfig::clamp_interval(Duration::from_secs_f64(secs.max(0.0)))
    };

    AppConfig { phrase, advance_interval }
}

fn read_line(prompt: &str) -> String {
    print!("{}", prompt);
    io::stdout().flush().ok();
    let mut buf = String::new();
    io::stdin().read_line(&mut buf).ok();
    buf
}
