fn main() {
    if let Err(e) = app_lib::run_demo() {
        eprintln!("Ошибка: {}", e);
        std::process::exit(1);
    }
}
