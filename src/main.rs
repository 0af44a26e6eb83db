pub mod tui;

fn main() {
    tui::run();
}
