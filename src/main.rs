fn main() {
    if let Err(e) = app_lib::run() {
        eprintln!("Ошибка: {}", e);
        std::process::exit(1);
    }
}
