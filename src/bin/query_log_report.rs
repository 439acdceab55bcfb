/// Report on query logs written by the digital-fov binary
///
/// Reads the JSON produced by QueryLog::save_to_file and prints every query
/// followed by summary statistics

use digital_fov::query_log::{load_entries, print_entries, summarize};
use std::env;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args: Vec<String> = env::args().collect();
    if args.len() < 2 {
        eprintln!("Usage: {} <query_log.json>", args[0]);
        eprintln!("Prints a query log and its summary");
        std::process::exit(1);
    }

    let filename = &args[1];
    let entries = load_entries(filename)?;

    println!("=== Query Log: {} ===", filename);
    print_entries(&entries);

    println!("=== Summary ===");
    println!("{}", summarize(&entries));

    Ok(())
}
