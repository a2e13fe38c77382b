mod config;
mod error;
mod hover;
mod http;
mod ip;
mod reconcile;

use log::LevelFilter;
use simple_logger::SimpleLogger;

use config::FileStore;
use error::Error;
use reconcile::{Outcome, Reconciler};

fn main() {
    SimpleLogger::new()
        .with_level(LevelFilter::Info)
        .env()
        .init()
        .unwrap();

    if let Err(e) = run() {
        log::error!("{}", e);
        std::process::exit(1);
    }
}

fn run() -> Result<(), Error> {
    let store = FileStore::new(FileStore::default_path()?);
    log::debug!("config file: {}", store.path().display());

    let reconciler = Reconciler::new(store);

    match reconciler.run()? {
        Outcome::Unchanged { ip } => {
            log::info!("public IP is still {}, nothing to do", ip);
        }

        Outcome::Updated {
            domain,
            ip,
            records,
        } => {
            log::info!("pointed {} A record(s) of {} at {}", records, domain, ip);
        }
    }

    Ok(())
}
