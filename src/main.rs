use miles_covered::{
    map::MapView,
    util::{config::Config, logging},
    Dashboard,
};

const CONFIG_PATH: &str = "dashboard.toml";

#[tokio::main]
async fn main() {
    logging::set_global_level(logging::LogLevel::VERBOSE);

    let config = Config::load_or_default(CONFIG_PATH);
    let view = MapView::from_config(&config.map);
    let mut dashboard = Dashboard::new(config, view);

    match dashboard.on_ready().await {
        Ok(report) => println!(
            "Loaded {} activities ({} skipped)",
            report.loaded,
            report.skipped_count()
        ),
        Err(err) => {
            eprintln!("No data available: {}", err);
            return;
        }
    }

    let progress = dashboard.progress();
    if let (Some(total), Some(done)) = (progress.total_miles_str(), progress.percent_complete()) {
        println!(
            "{} of {} mi ({:.1}%), updated {}",
            total,
            dashboard.config().progress.target_miles,
            done * 100.0,
            progress.last_updated_str().unwrap_or_default()
        );
    }

    dashboard.on_dispose();
}
