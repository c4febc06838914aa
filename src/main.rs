fn main() {
    if let Err(err) = halp::cli::main() {
        eprintln!("❌ {err}");
        std::process::exit(1);
    }
}
