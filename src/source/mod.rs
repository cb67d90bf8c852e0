mod fetch;

use reqwest::{Client, StatusCode};
use serde::Serialize;

pub const STDIN: &str = "-";

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Origin {
    File,
    Remote,
    Literal,
    Stdin,
}

impl Origin {
    pub fn as_str(&self) -> &'static str {
        match self {
            Origin::File => "file",
            Origin::Remote => "remote",
            Origin::Literal => "literal",
            Origin::Stdin => "stdin",
        }
    }
}

#[derive(Debug)]
pub enum SourceError {
    NotAFile,
    NotAUrl,
    Io(std::io::Error),
    Http(reqwest::Error),
    Status(StatusCode),
    Blank,
}

impl std::fmt::Display for SourceError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SourceError::NotAFile => write!(f, "not a readable file"),
            SourceError::NotAUrl => write!(f, "not an http(s) url"),
            SourceError::Io(err) => write!(f, "io error: {err}"),
            SourceError::Http(err) => write!(f, "http error: {err}"),
            SourceError::Status(status) => write!(f, "http status {status}"),
            SourceError::Blank => write!(f, "no text"),
        }
    }
}

impl std::error::Error for SourceError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            SourceError::Io(err) => Some(err),
            SourceError::Http(err) => Some(err),
            _ => None,
        }
    }
}

/// Text picked out of the raced origins, plus why the others lost.
#[derive(Debug)]
pub struct ResolvedText {
    pub origin: Option<Origin>,
    pub text: String,
    pub rejected: Vec<(Origin, SourceError)>,
}

/// Try the resource as a file, a URL and a literal at the same time. The
/// first non-blank result in that preference order wins; when none yields
/// text the resolved text is empty.
pub async fn resolve(client: &Client, resource: &str) -> ResolvedText {
    if resource == STDIN {
        return pick(vec![(Origin::Stdin, fetch::read_stdin().await)]);
    }

    let (file, remote) = tokio::join!(fetch::read_file(resource), fetch::fetch_remote(client, resource));
    let literal = Ok(resource.to_string());
    pick(vec![(Origin::File, file), (Origin::Remote, remote), (Origin::Literal, literal)])
}

fn pick(attempts: Vec<(Origin, Result<String, SourceError>)>) -> ResolvedText {
    let mut chosen: Option<(Origin, String)> = None;
    let mut rejected = Vec::new();
    for (origin, attempt) in attempts {
        match attempt {
            Ok(text) if chosen.is_none() && !text.trim().is_empty() => chosen = Some((origin, text)),
            Ok(text) if text.trim().is_empty() => rejected.push((origin, SourceError::Blank)),
            Ok(_) => {}
            Err(err) => rejected.push((origin, err)),
        }
    }
    match chosen {
        Some((origin, text)) => ResolvedText { origin: Some(origin), text, rejected },
        None => ResolvedText { origin: None, text: String::new(), rejected },
    }
}
