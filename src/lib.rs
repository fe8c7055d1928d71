//! Neural short-text classification over pre-trained word embeddings.
//!
//! Each class label owns a few short example sentences. Every token of a
//! sentence is converted to an embedded vector by a pre-trained
//! word-embedding table, so the sentence becomes a fixed-shape matrix, and a
//! supplied trainable model learns to map those matrices to class labels.
//! Scoring a new sentence encodes it the same way and returns one score per
//! label.
//!
//! # Basic Usage
//!
//! ```rust
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! use ndarray::arr1;
//! use shortclass::{Classifier, Corpus, DenseSoftmax, EmbeddingTable};
//!
//! // A toy embedding table; real tables load from the word2vec text
//! // format via EmbeddingTable::from_word2vec_text.
//! let mut table = EmbeddingTable::new(3);
//! table.insert("goal", arr1(&[1.0, 0.0, 0.0]))?;
//! table.insert("match", arr1(&[0.9, 0.1, 0.0]))?;
//! table.insert("ballot", arr1(&[0.0, 1.0, 0.0]))?;
//!
//! let mut corpus = Corpus::new();
//! corpus.insert("sports".into(), vec!["goal match".into(), "match".into()]);
//! corpus.insert("politics".into(), vec!["ballot".into()]);
//!
//! let mut classifier = Classifier::new(table).with_vecsize(3).with_maxlen(8);
//! classifier.train(&corpus, DenseSoftmax::new(3, 2), 100)?;
//!
//! let scores = classifier.score("goal")?;
//! assert!(scores["sports"] > scores["politics"]);
//! # Ok(())
//! # }
//! ```
//!
//! # Text Normalization
//!
//! Raw text often benefits from normalization before training. The
//! [`preprocess`] module composes string transformations into a single
//! pipeline and ships a standard five-step one:
//!
//! ```rust
//! use shortclass::preprocess::standard_pipeline;
//!
//! let pipeline = standard_pipeline();
//! assert_eq!(pipeline.apply("The 3 cats were running!"), "cat run");
//! ```

pub mod classifier;
pub mod embedding;
pub mod models;
pub mod preprocess;
pub mod tokenize;

pub use classifier::{
    encode_corpus, encode_sentence, Classifier, ClassifierError, ClassifierInfo, Corpus,
    EncodedCorpus, DEFAULT_MAXLEN, DEFAULT_VECSIZE,
};
pub use embedding::{EmbeddingError, EmbeddingTable, WordEmbeddings};
pub use models::{DenseSoftmax, ModelError, TrainableModel};
pub use preprocess::{standard_pipeline, Pipeline, PipelineStep};

pub fn init_logger() {
    env_logger::init();
}
