fn main() {
    if let Err(err) = table_detector::run() {
        eprintln!("error: {err}");
        std::process::exit(1);
    }
}
