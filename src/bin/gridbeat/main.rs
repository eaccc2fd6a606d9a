//! gridbeat - terminal drum machine
//!
//! Run with: cargo run

mod app;
mod ui;

use app::App;

fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;
    App::new().run()
}
