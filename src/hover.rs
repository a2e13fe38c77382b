use std::collections::HashSet;

use serde::de::DeserializeOwned;
use serde_derive::Deserialize;

use crate::error::Error;
use crate::http::{self, Request};

pub const API_BASE: &str = "https://www.hover.com/api";

/// Name of the cookie Hover hands out on a successful login.
const SESSION_COOKIE: &str = "hoverauth";

pub struct Api {
    base: Box<str>,
}

/// Proof of a completed login: the `hoverauth` cookie pair that must
/// accompany every DNS call. It lives in memory for one run and is never
/// persisted anywhere.
#[derive(Debug)]
pub struct Session {
    cookie: Box<str>,
}

#[derive(Deserialize)]
struct LoginResponse {
    succeeded: bool,

    #[serde(default)]
    domains: Vec<Box<str>>,
}

#[derive(Deserialize)]
struct DnsResponse {
    succeeded: bool,

    #[serde(default)]
    domains: Vec<DnsDomain>,
}

// Only the fields the reconciler consumes are modeled; the listing carries
// more (record content, is_default, can_revert, ...) and serde skips those.
#[derive(Deserialize)]
struct DnsDomain {
    domain_name: Box<str>,
    entries: Vec<DnsEntry>,
}

#[derive(Deserialize)]
struct DnsEntry {
    id: Box<str>,
    name: Box<str>,

    #[serde(rename = "type")]
    kind: Box<str>,
}

#[derive(Deserialize)]
struct UpdateResponse {
    succeeded: bool,

    #[serde(default)]
    error: Box<str>,
}

impl Api {
    pub fn new() -> Self {
        Self::with_base(API_BASE)
    }

    pub fn with_base(base: &str) -> Self {
        Self { base: base.into() }
    }

    /// Exchanges the credentials for a session and the set of domains the
    /// account owns. Hover reports rejected credentials inside the JSON body
    /// rather than through the HTTP status, so a status error still has its
    /// body read.
    pub fn login(
        &self,
        username: &str,
        password: &str,
    ) -> Result<(Session, HashSet<Box<str>>), Error> {
        let url = format!("{}/login", self.base);
        let sent = Request::post(&url).send_form(&[
            ("username", username),
            ("password", password),
        ]);

        let response = match sent {
            Ok(r) => r,
            Err(http::Error::Status(_, r)) => r,
            Err(http::Error::Transport(tp)) => return Err(Error::Transport(tp)),
        };

        // The cookie has to be taken before the body consumes the response.
        let cookie = response.set_cookie(SESSION_COOKIE);

        let login = response
            .into_json::<LoginResponse>()
            .map_err(|e| Error::Json(e.to_string().into()))?;

        if !login.succeeded {
            return Err(Error::Auth);
        }

        let Some(cookie) = cookie else {
            return Err(Error::Json(
                "login succeeded but no session cookie was set".into(),
            ));
        };

        let domains = login.domains.into_iter().collect();

        Ok((Session { cookie }, domains))
    }

    /// Rewrites the content of every A-record of `domain` to `ip`, in the
    /// order the server lists them. Entries of any other type are left
    /// untouched. Returns how many records were rewritten; a domain that no
    /// longer shows up in the listing simply rewrites zero.
    ///
    /// The first record the server refuses aborts the run with the server's
    /// own error message. Records rewritten before that stay rewritten -
    /// the next run converges them again.
    pub fn update_records(
        &self,
        session: &Session,
        domain: &str,
        ip: &str,
    ) -> Result<usize, Error> {
        let url = format!("{}/dns", self.base);
        let listing: DnsResponse =
            Self::read_json(Request::get(&url).set("Cookie", &session.cookie).call())?;

        if !listing.succeeded {
            return Err(Error::Update(
                "Hover refused to list the DNS records".into(),
            ));
        }

        let mut updated = 0;

        for listed in listing.domains {
            if listed.domain_name.as_ref() != domain {
                continue;
            }

            for entry in listed.entries {
                if entry.kind.as_ref() != "A" {
                    log::debug!("leaving {} record {} alone", entry.kind, entry.name);
                    continue;
                }

                let url = format!("{}/dns/{}", self.base, entry.id);
                let result: UpdateResponse = Self::read_json(
                    Request::put(&url)
                        .query("content", ip)
                        .set("Cookie", &session.cookie)
                        .call(),
                )?;

                if !result.succeeded {
                    return Err(Error::Update(result.error));
                }

                log::debug!("rewrote A record {} ({}) to {}", entry.name, entry.id, ip);
                updated += 1;
            }
        }

        Ok(updated)
    }

    fn read_json<T: DeserializeOwned>(
        sent: Result<http::Response, http::Error>,
    ) -> Result<T, Error> {
        let response = match sent {
            Ok(r) => r,
            Err(http::Error::Status(_, r)) => r,
            Err(http::Error::Transport(tp)) => return Err(Error::Transport(tp)),
        };

        response
            .into_json()
            .map_err(|e| Error::Json(e.to_string().into()))
    }
}
