fn main() {
    if let Err(err) = jobi::cli::main() {
        eprintln!("❌ Error: {err}");
        std::process::exit(1);
    }
}
