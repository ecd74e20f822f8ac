// viper - Main Entry Point
//
// Creates the CHIP-8 core and runs the display frontend. A ROM can be
// passed as the first argument or dropped onto the window later.

use std::path::PathBuf;

use viper::chip8::Chip8;
use viper::config::DisplayConfig;
use viper::display::run_frontend;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("viper v0.1.0");
    println!("============");
    println!();

    let config = DisplayConfig::load_or_default();
    println!(
        "Display: {}px cells, grid origin ({}, {})",
        config.video.pixel_size, config.video.origin_x, config.video.origin_y
    );

    let initial_rom = std::env::args().nth(1).map(PathBuf::from);
    match &initial_rom {
        Some(path) => println!("Loading ROM '{}'", path.display()),
        None => println!("No ROM given; drop a ROM file onto the window to start."),
    }
    println!();

    run_frontend(Chip8::new(), &config, initial_rom)?;

    println!("Display window closed.");
    Ok(())
}
