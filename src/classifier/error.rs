use std::io;

use crate::models::ModelError;

/// Errors raised by the classifier wrapper.
#[derive(Debug, thiserror::Error)]
pub enum ClassifierError {
    /// The classifier has not been trained or loaded yet.
    #[error("model not trained; call train() or load_model() first")]
    NotTrained,
    /// A loaded label file disagrees with the loaded model's output width.
    #[error("label file lists {found} labels but the model outputs {expected}")]
    LabelCountMismatch { expected: usize, found: usize },
    /// A failure propagated from the trainable-model collaborator.
    #[error("model error: {0}")]
    Model(#[from] ModelError),
    /// A failure reading or writing the label file.
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
}
