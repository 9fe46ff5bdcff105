use std::path::Path;

use miles_covered::util::config::{Config, ServerConfig};
use rocket::fs::{FileServer, NamedFile};
use rocket::{Build, Rocket, State};

#[macro_use]
extern crate rocket;

const CONFIG_PATH: &str = "dashboard.toml";

// Any path that is not a bundle file gets the entry page
#[get("/<_..>", rank = 20)]
async fn index(server: &State<ServerConfig>) -> Option<NamedFile> {
    NamedFile::open(Path::new(&server.static_dir).join("index.html"))
        .await
        .ok()
}

fn build(server: ServerConfig) -> Rocket<Build> {
    let figment = rocket::Config::figment().merge(("port", server.port));
    let mut rocket = rocket::custom(figment).mount("/", routes![index]);

    if Path::new(&server.static_dir).is_dir() {
        rocket = rocket.mount("/", FileServer::from(&server.static_dir));
    } else {
        eprintln!("Static directory {} not found", server.static_dir);
    }

    rocket.manage(server)
}

#[launch]
fn rocket() -> _ {
    build(Config::load_or_default(CONFIG_PATH).server)
}
