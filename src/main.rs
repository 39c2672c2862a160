mod app;
mod config;
mod frame;
mod renderer;
mod source;
mod surface;

fn main() -> eframe::Result<()> {
    app::run()
}
