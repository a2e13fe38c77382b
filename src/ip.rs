use serde_derive::Deserialize;

use crate::error::Error;
use crate::http::{self, Request};

pub const LOOKUP_URL: &str = "https://myexternalip.com/json";

#[derive(Deserialize)]
struct Lookup {
    ip: Box<str>,
}

/// Asks the lookup service which address this host appears as on the public
/// internet. The address is returned exactly as reported - the registrar is
/// the one that decides whether it is acceptable record content.
pub fn lookup(url: &str) -> Result<Box<str>, Error> {
    let response = match Request::get(url).call() {
        Ok(r) => r,
        Err(http::Error::Status(code, _)) => {
            let reason = format!("IP lookup service returned HTTP {}", code);
            return Err(Error::Transport(reason.into()));
        }
        Err(http::Error::Transport(tp)) => return Err(Error::Transport(tp)),
    };

    let lookup = response
        .into_json::<Lookup>()
        .map_err(|e| Error::Json(e.to_string().into()))?;

    Ok(lookup.ip)
}
