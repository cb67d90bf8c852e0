use bytes::Bytes;
use reqwest::Client;
use std::path::Path;
use url::Url;

use super::SourceError;

pub async fn read_file(path: &str) -> Result<String, SourceError> {
    let path = Path::new(path);
    if !path.is_file() { return Err(SourceError::NotAFile); }
    tokio::fs::read_to_string(path).await.map_err(SourceError::Io)
}

pub async fn fetch_remote(client: &Client, resource: &str) -> Result<String, SourceError> {
    let url = Url::parse(resource).map_err(|_| SourceError::NotAUrl)?;
    if !matches!(url.scheme(), "http" | "https") { return Err(SourceError::NotAUrl); }

    let resp = client.get(url).send().await.map_err(SourceError::Http)?;
    let status = resp.status();
    if !status.is_success() { return Err(SourceError::Status(status)); }
    let body: Bytes = resp.bytes().await.map_err(SourceError::Http)?;
    Ok(String::from_utf8_lossy(&body).into_owned())
}

pub async fn read_stdin() -> Result<String, SourceError> {
    use tokio::io::AsyncReadExt;
    let mut buf = String::new();
    tokio::io::stdin().read_to_string(&mut buf).await.map_err(SourceError::Io)?;
    Ok(buf)
}
