use thiserror::Error;

/// Application error type.
///
/// Every concern owns its own enum; `AppError` only groups them so the binary
/// and the trigger can speak a single type.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("config error: {0}")]
    Config(#[from] ConfigError),
    #[error("catalog error: {0}")]
    Catalog(#[from] CatalogError),
    #[error("fetch error: {0}")]
    Fetch(#[from] FetchError),
    #[error("generation error: {0}")]
    Gateway(#[from] GatewayError),
    #[error("browser error: {0}")]
    Browser(#[from] BrowserError),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// Configuration and run-request validation errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The chosen backend has no credential.
    #[error("missing {model} API key")]
    MissingCredential { model: String },
    #[error("unknown ai_model '{0}', expected 'gemini' or 'openai'")]
    UnknownModel(String),
    #[error("at most {max} source slots are supported, got {got}")]
    TooManySlots { max: usize, got: usize },
    #[error("failed to parse run file {path}: {message}")]
    RunFileParse { path: String, message: String },
}

/// Category catalog loading and validation errors.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("failed to parse catalog: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("failed to read catalog {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("duplicate id '{id}' in {forest} forest")]
    DuplicateId { forest: &'static str, id: String },
    #[error("node '{id}' in {forest} forest names missing parent '{parent}'")]
    MissingParent {
        forest: &'static str,
        id: String,
        parent: String,
    },
    #[error("parent chain of '{id}' in {forest} forest loops back on itself")]
    Cycle { forest: &'static str, id: String },
    #[error("dropdown '{0}' has no options")]
    EmptyDropdown(String),
}

/// Source fetch failures. All of them downgrade the slot to "skip".
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("not a web URL: '{0}'")]
    UnsupportedUrl(String),
    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),
    #[error("server answered {status}")]
    BadStatus { status: u16 },
    #[error("page contained no paragraph text")]
    EmptyContent,
}

/// Model gateway failures. None of them are retried.
///
/// Wrapped `reqwest` errors have their URL stripped before they land here.
#[derive(Debug, Error)]
pub enum GatewayError {
    #[error("request to {provider} failed: {source}")]
    Request {
        provider: &'static str,
        #[source]
        source: reqwest::Error,
    },
    #[error("{provider} returned an unreadable response body: {source}")]
    Decode {
        provider: &'static str,
        #[source]
        source: reqwest::Error,
    },
    #[error("{provider} answered {status}: {body}")]
    BadStatus {
        provider: &'static str,
        status: u16,
        body: String,
    },
    #[error("{provider} response had no text payload")]
    EmptyPayload { provider: &'static str },
    #[error("could not find valid JSON in the response")]
    NoJsonSpan,
    #[error("invalid JSON: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("response JSON is not an object")]
    NotAnObject,
}

/// Browser automation errors.
#[derive(Debug, Error)]
pub enum BrowserError {
    #[error("failed to launch browser: {0}")]
    Launch(String),
    #[error("element '{id}' not found within {waited_ms} ms")]
    ElementNotFound { id: String, waited_ms: u128 },
    #[error("option '{option}' not found in '{id}'")]
    OptionNotFound { id: String, option: String },
    #[error("script failed: {0}")]
    Script(String),
    #[error("cdp: {0}")]
    Cdp(#[from] chromiumoxide::error::CdpError),
}

pub type AppResult<T> = Result<T, AppError>;

pub type BrowserResult<T> = Result<T, BrowserError>;
