fn main() {
    if let Err(err) = agrichat::cli::main() {
        eprintln!("❌ Error: {err}");
        std::process::exit(1);
    }
}
