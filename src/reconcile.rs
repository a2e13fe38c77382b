use crate::config::{Config, ConfigStore};
use crate::error::Error;
use crate::hover::{self, Api};
use crate::ip;

/// What a run did, for the final log line.
#[derive(Debug, PartialEq, Eq)]
pub enum Outcome {
    /// The resolved address matches the persisted one; nothing was touched.
    Unchanged { ip: Box<str> },

    /// Every A-record carries the new address and the config remembers it.
    Updated {
        domain: Box<str>,
        ip: Box<str>,
        records: usize,
    },
}

pub struct Reconciler<S> {
    store: S,
    lookup_url: Box<str>,
    api: Api,
}

impl<S: ConfigStore> Reconciler<S> {
    pub fn new(store: S) -> Self {
        Self::with_endpoints(store, ip::LOOKUP_URL, hover::API_BASE)
    }

    // Lets the tests aim the whole flow at a local server.
    pub fn with_endpoints(store: S, lookup_url: &str, api_base: &str) -> Self {
        Self {
            store,
            lookup_url: lookup_url.into(),
            api: Api::with_base(api_base),
        }
    }

    /// One full reconciliation: resolve the public address, stop early when
    /// it is the one already applied, otherwise authenticate, check that the
    /// account owns the domain, rewrite its A-records, and only then persist
    /// the address.
    ///
    /// A failed persist leaves the remote records rewritten; the next run
    /// sees the same address mismatch and simply converges again.
    pub fn run(&self) -> Result<Outcome, Error> {
        let config = match self.store.load()? {
            Some(config) => config,
            None => self.store.create_default()?,
        };

        if config.domain.is_empty() {
            return Err(Error::Config("no domain is configured".into()));
        }

        let ip = ip::lookup(&self.lookup_url)?;

        if ip == config.ip {
            return Ok(Outcome::Unchanged { ip });
        }

        if config.ip.is_empty() {
            log::info!("no address on record yet, public IP is {}", ip);
        } else {
            log::info!("public IP changed: {} -> {}", config.ip, ip);
        }

        let (session, owned) = self.api.login(&config.username, &config.password)?;

        if !owned.contains(&*config.domain) {
            return Err(Error::NotOwned(config.domain));
        }

        let records = self.api.update_records(&session, &config.domain, &ip)?;

        let config = Config {
            ip: ip.clone(),
            ..config
        };
        self.store.save(&config)?;

        Ok(Outcome::Updated {
            domain: config.domain,
            ip,
            records,
        })
    }
}
