fn main() {
    if let Err(e) = app_lib::run() {
        eprintln!("campus-records: {} [{}]", e, e.code());
        std::process::exit(1);
    }
}
