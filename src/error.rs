use thiserror::Error;

#[derive(Error, Debug)]
pub enum InterlockError {
    #[error("Config error: {0}")]
    Config(String),

    #[error("Vision API key is not set. Run `interlock config --set-api-key YOUR_KEY` or set GOOGLE_VISION_API_KEY")]
    MissingApiKey,

    #[error("File not found: {0}")]
    FileNotFound(String),

    #[error("Folder not found: {0}")]
    FolderNotFound(String),

    #[error("Failed to load image: {0}")]
    ImageLoad(String),

    #[error("OCR request failed: {0}")]
    OcrRequest(String),

    #[error("Unexpected OCR response: {0}")]
    OcrResponse(String),

    #[error("OCR command failed: {0}")]
    OcrCommand(String),

    #[error("Failed to write log: {0}")]
    Sink(String),

    #[error("No images found: {0}")]
    NoImagesFound(String),

    #[error("JSON error: {0}")]
    JsonParse(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error(transparent)]
    Common(#[from] interlock_common::Error),
}

pub type Result<T> = std::result::Result<T, InterlockError>;
