// Prevents additional console window on Windows in release
#![cfg_attr(
    all(not(debug_assertions), feature = "desktop"),
    windows_subsystem = "windows"
)]

fn main() {
    mouse_rate_lib::run()
}
