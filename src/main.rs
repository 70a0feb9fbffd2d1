use nurbs_sketch::components::{App, AppProps};
use nurbs_sketch::config::SketchConfig;
use nurbs_sketch::logger::ConsoleLogger;

fn main() {
    // Start at info so config problems are visible, then apply the configured level.
    let _ = ConsoleLogger::init(log::LevelFilter::Info);
    let config = SketchConfig::load();
    log::set_max_level(config.log_level());
    yew::Renderer::<App>::with_props(AppProps { config }).render();
}
