use std::io::{self, Read};

use serde::de::DeserializeOwned;

const USER_AGENT: &str = concat!("hover-ddns ", env!("CARGO_PKG_VERSION"));

pub struct Request {
    inner: ureq::Request,
}

pub struct Response {
    set_cookies: Vec<Box<str>>,
    reader: Box<dyn Read>,
}

pub enum Error {
    Status(u16, Response),
    Transport(Box<str>),
}

impl Request {
    pub fn get(url: &str) -> Self {
        let inner = ureq::get(url).set("User-Agent", USER_AGENT);
        Self { inner }
    }

    pub fn post(url: &str) -> Self {
        let inner = ureq::post(url).set("User-Agent", USER_AGENT);
        Self { inner }
    }

    pub fn put(url: &str) -> Self {
        let inner = ureq::put(url).set("User-Agent", USER_AGENT);
        Self { inner }
    }

    pub fn query(mut self, param: &str, value: &str) -> Self {
        self.inner = self.inner.query(param, value);
        self
    }

    pub fn set(mut self, header: &str, value: &str) -> Self {
        self.inner = self.inner.set(header, value);
        self
    }

    pub fn send_form(self, fields: &[(&str, &str)]) -> Result<Response, Error> {
        Self::convert(self.inner.send_form(fields))
    }

    pub fn call(self) -> Result<Response, Error> {
        Self::convert(self.inner.call())
    }

    fn convert(result: Result<ureq::Response, ureq::Error>) -> Result<Response, Error> {
        match result {
            Ok(resp) => Ok(Response::from_ureq(resp)),
            Err(ureq::Error::Status(code, resp)) => {
                Err(Error::Status(code, Response::from_ureq(resp)))
            }
            Err(ureq::Error::Transport(tp)) => Err(Error::Transport(tp.to_string().into())),
        }
    }
}

impl Response {
    fn from_ureq(response: ureq::Response) -> Self {
        // The headers are gone once the response is turned into a reader,
        // so any cookies have to be kept aside first.
        let set_cookies = response
            .all("set-cookie")
            .into_iter()
            .map(Box::from)
            .collect();

        Self {
            set_cookies,
            reader: response.into_reader(),
        }
    }

    pub fn into_json<T: DeserializeOwned>(self) -> Result<T, io::Error> {
        serde_json::from_reader(self.reader)
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))
    }

    /// Returns the `name=value` pair of a cookie set by this response, with
    /// the attributes (Path, Expires, HttpOnly, ...) stripped. The pair can
    /// be echoed back verbatim in a `Cookie` header.
    pub fn set_cookie(&self, name: &str) -> Option<Box<str>> {
        self.set_cookies
            .iter()
            .filter_map(|header| header.split(';').next())
            .map(str::trim)
            .find(|pair| {
                pair.split_once('=')
                    .is_some_and(|(cookie, _)| cookie == name)
            })
            .map(Box::from)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn response_with_cookies(cookies: &[&str]) -> Response {
        Response {
            set_cookies: cookies.iter().copied().map(Box::from).collect(),
            reader: Box::new(io::empty()),
        }
    }

    #[test]
    fn cookie_attributes_are_stripped() {
        let response = response_with_cookies(&[
            "hoverauth=0123abcd; Path=/; Secure; HttpOnly",
        ]);

        assert_eq!(
            response.set_cookie("hoverauth").as_deref(),
            Some("hoverauth=0123abcd")
        );
    }

    #[test]
    fn cookie_is_picked_among_several() {
        let response = response_with_cookies(&[
            "tracking=nope; Path=/",
            "hoverauth=feed1234",
            "session=other",
        ]);

        assert_eq!(
            response.set_cookie("hoverauth").as_deref(),
            Some("hoverauth=feed1234")
        );
    }

    #[test]
    fn missing_cookie_is_none() {
        let response = response_with_cookies(&["tracking=nope; Path=/"]);

        assert_eq!(response.set_cookie("hoverauth"), None);
        assert_eq!(response_with_cookies(&[]).set_cookie("hoverauth"), None);
    }

    #[test]
    fn prefix_of_a_longer_cookie_name_does_not_match() {
        let response = response_with_cookies(&["hoverauth2=abcd"]);

        assert_eq!(response.set_cookie("hoverauth"), None);
    }
}
