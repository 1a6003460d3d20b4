//! FILENAME: app/src/main.rs

fn main() {
    if let Err(e) = formfill_lib::run() {
        log::error!("{:#}", e);
        std::process::exit(1);
    }
}
