fn main() {
    if let Err(e) = artiscope_cli::run() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
