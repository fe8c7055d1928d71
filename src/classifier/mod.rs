mod classifier;
mod error;
pub mod encoder;

pub use classifier::{Classifier, DEFAULT_MAXLEN, DEFAULT_VECSIZE};
pub use encoder::{encode_corpus, encode_sentence, Corpus, EncodedCorpus};
pub use error::ClassifierError;

/// Information about the current state and configuration of a classifier
#[derive(Debug, Clone)]
pub struct ClassifierInfo {
    /// Whether the classifier has been trained or loaded
    pub trained: bool,
    /// Number of classes the classifier is trained on
    pub num_classes: usize,
    /// Labels of the classes, in output-column order
    pub class_labels: Vec<String>,
    /// Dimension of the embedding vectors
    pub vecsize: usize,
    /// Maximum number of tokens considered per sentence
    pub maxlen: usize,
}
