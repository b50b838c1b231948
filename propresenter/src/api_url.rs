/// Base URL of a ProPresenter host's `/v1` API surface.
#[derive(Debug, Clone)]
pub struct ProPresenterUrl(String);

impl AsRef<str> for ProPresenterUrl {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl ProPresenterUrl {
    pub fn new(host: &str, port: u16) -> Self {
        Self(format!("http://{}:{}/v1", host, port))
    }

    /// Append the given path to the URL.
    pub fn append_path(&self, path: &str) -> Self {
        let trimmed_url = self.0.trim_end_matches('/');
        let trimmed_path = path.trim_start_matches('/');
        Self(format!("{}/{}", trimmed_url, trimmed_path))
    }

    /// Ask the endpoint for a single response instead of a chunked stream.
    pub fn without_chunking(&self) -> Self {
        if self.0.contains('?') {
            Self(format!("{}&chunked=false", self.0))
        } else {
            Self(format!("{}?chunked=false", self.0))
        }
    }
}
