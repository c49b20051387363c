//! Fatal errors surfaced by the lifecycle controller

/// Unrecoverable collaborator failure
///
/// `R` and `L` are the radio and LED strip error types. Storage failures
/// never surface here; the controller falls back to default settings.
#[derive(Debug, thiserror::Error)]
pub enum Error<R, L> {
    #[error("radio init failed: {0:?}")]
    RadioInit(R),
    #[error("LED strip init failed: {0:?}")]
    LedInit(L),
    #[error("failed to start advertising: {0:?}")]
    StartAdvertising(R),
    #[error("failed to start scanning: {0:?}")]
    StartScanning(R),
}
