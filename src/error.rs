use thiserror::Error;

/// Errors that can occur while extracting recipes or searching for products
#[derive(Error, Debug)]
pub enum ScrapeError {
    /// Network failure or non-success status from an external fetch
    #[error("Failed to fetch URL: {0}")]
    FetchError(#[from] reqwest::Error),

    /// A fetch completed but the server answered with a non-success status
    #[error("HTTP error! status: {status} for {url}")]
    HttpStatus { url: String, status: u16 },

    /// A single structured-data block could not be parsed
    #[error("Failed to parse structured data: {0}")]
    ParseError(String),

    /// No usable ingredient list was found in the document
    #[error("Not a recognizable recipe page: {0}")]
    ExtractionError(String),

    /// The retailer search page could not be fetched or rendered
    #[error("Product search failed: {0}")]
    SearchError(String),

    /// Image enrichment failed for a page
    #[error("Image lookup failed: {0}")]
    ImageLookupError(String),

    /// Builder configuration error
    #[error("Builder error: {0}")]
    BuilderError(String),

    /// Error parsing HTTP headers
    #[error("Header parse error: {0}")]
    HeaderError(#[from] reqwest::header::InvalidHeaderValue),

    /// A configured or scraped URL could not be parsed
    #[error("Invalid URL: {0}")]
    UrlError(#[from] url::ParseError),

    /// Configuration error
    #[error("Configuration error: {0}")]
    ConfigError(#[from] config::ConfigError),
}

impl ScrapeError {
    /// True for errors raised by the transport rather than by extraction
    pub fn is_fetch_error(&self) -> bool {
        matches!(
            self,
            ScrapeError::FetchError(_) | ScrapeError::HttpStatus { .. }
        )
    }
}
