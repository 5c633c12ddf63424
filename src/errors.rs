#[derive(Debug, thiserror::Error)]
pub enum ConsentError {
    #[error("Consent payload is not a valid list: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("Consent payload is an empty list")]
    EmptyRecord,

    #[error("Consent payload holds no recognized categories")]
    NoKnownCategories,
}
