use crate::doc::ObjectId;

/// Errors surfaced to the host when it feeds the editor invalid data.
///
/// Pointer and wheel handlers never produce these; an invalid gesture simply
/// does nothing.
#[derive(Debug, thiserror::Error)]
pub enum EditorError {
    #[error("no base content loaded; load a texture before placing anchors")]
    NoBaseContent,
    #[error("object {0} already exists")]
    DuplicateObject(ObjectId),
    #[error("invalid geometry: {0}")]
    InvalidGeometry(&'static str),
    #[error("invalid config: {0}")]
    InvalidConfig(String),
    #[error("host call failed: {0}")]
    Host(String),
}
