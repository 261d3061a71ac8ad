use config::builder::DefaultState;
use config::{ConfigBuilder, Environment, File};
use serde_derive::Deserialize;

use crate::catalog::{Catalog, Event};
use crate::server::SiteInfo;
use crate::Error;

#[derive(Debug, Deserialize)]
pub struct Settings {
    pub host: String,
    pub port: u16,
    pub site_name: String,
    pub currency: String,
    /// Replaces the demo catalog when present.
    #[serde(default)]
    pub events: Option<Vec<Event>>,
}

fn defaults() -> Result<ConfigBuilder<DefaultState>, Error> {
    Ok(config::Config::builder()
        .set_default("host", "127.0.0.1")?
        .set_default("port", 8000_i64)?
        .set_default("site_name", "EventTicket")?
        .set_default("currency", "₦")?)
}

impl Settings {
    /// Defaults, then the optional settings file at `path`, then
    /// `EVENTTICKET_*` environment variables.
    pub fn load(path: &str) -> Result<Settings, Error> {
        let settings = defaults()?
            .add_source(File::with_name(path).required(false))
            .add_source(Environment::with_prefix("EVENTTICKET"))
            .build()?;
        Ok(settings.try_deserialize()?)
    }

    pub fn catalog(&self) -> Result<Catalog, Error> {
        match &self.events {
            Some(events) => Catalog::new(events.clone()),
            None => Ok(Catalog::demo()),
        }
    }

    pub fn site(&self) -> SiteInfo {
        SiteInfo {
            name: self.site_name.clone(),
            currency: self.currency.clone(),
        }
    }

    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
