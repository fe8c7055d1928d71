use std::collections::HashMap;
use std::fs;

use log::info;
use ndarray::{s, Array3};

use super::encoder::{encode_corpus, encode_sentence, Corpus};
use super::error::ClassifierError;
use super::ClassifierInfo;
use crate::embedding::WordEmbeddings;
use crate::models::TrainableModel;

/// Default embedding dimension, matching common pre-trained word2vec models.
pub const DEFAULT_VECSIZE: usize = 300;
/// Default maximum number of tokens considered per sentence.
pub const DEFAULT_MAXLEN: usize = 15;

/// The wrapper's lifecycle: untrained until `train` or `load_model`
/// succeeds, after which the label order and fitted model exist together.
enum State<M> {
    Untrained,
    Trained { labels: Vec<String>, model: M },
}

/// A short-text classifier over pre-trained word embeddings.
///
/// Each example sentence is converted token-by-token into embedded vectors
/// and represented as a `(maxlen, vecsize)` matrix; learning and inference
/// are delegated to an externally supplied [`TrainableModel`] whose output
/// width must match the number of labels in the training corpus.
///
/// The classifier starts untrained; [`Classifier::train`] or
/// [`Classifier::load_model`] moves it to the trained state, and there is no
/// transition back. [`Classifier::score`] and [`Classifier::save_model`]
/// fail with [`ClassifierError::NotTrained`] before that.
///
/// # Thread Safety
///
/// State transitions take `&mut self`, so the classifier is not designed for
/// concurrent mutation; scoring takes `&self`. The type is `Send + Sync`
/// when its collaborators are, so a trained classifier can be shared across
/// threads behind `Arc` for concurrent scoring.
///
/// # Example
/// ```
/// use ndarray::arr1;
/// use shortclass::{Classifier, Corpus, DenseSoftmax, EmbeddingTable};
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let mut table = EmbeddingTable::new(2);
/// table.insert("cat", arr1(&[1.0, 0.0]))?;
/// table.insert("fish", arr1(&[0.0, 1.0]))?;
///
/// let mut corpus = Corpus::new();
/// corpus.insert("pets".into(), vec!["cat".into()]);
/// corpus.insert("water".into(), vec!["fish".into()]);
///
/// let mut classifier = Classifier::new(table).with_vecsize(2).with_maxlen(4);
/// classifier.train(&corpus, DenseSoftmax::new(2, 2), 100)?;
///
/// let scores = classifier.score("cat")?;
/// assert!(scores["pets"] > scores["water"]);
/// # Ok(())
/// # }
/// ```
pub struct Classifier<E, M> {
    embeddings: E,
    vecsize: usize,
    maxlen: usize,
    state: State<M>,
}

// Compile-time verification of thread-safety for the bundled collaborators
const _: () = {
    fn assert_send_sync<T: Send + Sync>() {}
    fn verify_thread_safety() {
        assert_send_sync::<
            Classifier<crate::embedding::EmbeddingTable, crate::models::DenseSoftmax>,
        >();
    }
};

impl<E, M> Classifier<E, M>
where
    E: WordEmbeddings,
    M: TrainableModel,
{
    /// Creates an untrained classifier over the given embedding
    /// collaborator, with the default `vecsize` and `maxlen`.
    pub fn new(embeddings: E) -> Self {
        Self {
            embeddings,
            vecsize: DEFAULT_VECSIZE,
            maxlen: DEFAULT_MAXLEN,
            state: State::Untrained,
        }
    }

    /// Sets the embedding dimension the classifier expects.
    pub fn with_vecsize(mut self, vecsize: usize) -> Self {
        self.vecsize = vecsize;
        self
    }

    /// Sets the maximum number of tokens considered per sentence.
    pub fn with_maxlen(mut self, maxlen: usize) -> Self {
        self.maxlen = maxlen;
        self
    }

    /// The configured embedding dimension.
    pub fn vecsize(&self) -> usize {
        self.vecsize
    }

    /// The configured per-sentence token limit.
    pub fn maxlen(&self) -> usize {
        self.maxlen
    }

    /// Returns whether `train` or `load_model` has completed.
    pub fn is_trained(&self) -> bool {
        matches!(self.state, State::Trained { .. })
    }

    /// The label order established at training or load time, if trained.
    pub fn labels(&self) -> Option<&[String]> {
        match &self.state {
            State::Trained { labels, .. } => Some(labels),
            State::Untrained => None,
        }
    }

    /// Returns information about the classifier's current state
    pub fn info(&self) -> ClassifierInfo {
        let labels = self.labels().map(<[String]>::to_vec).unwrap_or_default();
        ClassifierInfo {
            trained: self.is_trained(),
            num_classes: labels.len(),
            class_labels: labels,
            vecsize: self.vecsize,
            maxlen: self.maxlen,
        }
    }

    /// Trains the classifier on a labeled corpus.
    ///
    /// Encodes the corpus, fits the supplied model for `epochs` passes, and
    /// on success stores the fitted model together with the label order and
    /// transitions to the trained state. The model's output width must
    /// match the corpus's label count; any mismatch (or other fit failure)
    /// propagates from the model collaborator and leaves the classifier's
    /// state unchanged.
    pub fn train(
        &mut self,
        corpus: &Corpus,
        mut model: M,
        epochs: usize,
    ) -> Result<(), ClassifierError> {
        let encoded = encode_corpus(corpus, self.maxlen, self.vecsize, &self.embeddings);
        info!(
            "Encoded {} examples across {} classes",
            encoded.inputs.dim().0,
            encoded.labels.len()
        );

        model.fit(&encoded.inputs, &encoded.targets, epochs)?;

        self.state = State::Trained {
            labels: encoded.labels,
            model,
        };
        Ok(())
    }

    /// Scores a sentence against every label.
    ///
    /// Encodes the sentence exactly as during training, runs the fitted
    /// model on the singleton batch, and returns each label mapped to its
    /// predicted score. Degenerate input is not specially handled: an empty
    /// sentence encodes to an all-zero matrix and is scored like any other,
    /// and any not-a-number score is passed through unchanged.
    ///
    /// # Errors
    /// - `ClassifierError::NotTrained` if neither `train` nor `load_model`
    ///   has completed
    /// - model collaborator failures, unchanged
    pub fn score(&self, sentence: &str) -> Result<HashMap<String, f32>, ClassifierError> {
        let (labels, model) = match &self.state {
            State::Trained { labels, model } => (labels, model),
            State::Untrained => return Err(ClassifierError::NotTrained),
        };

        let mut batch = Array3::zeros((1, self.maxlen, self.vecsize));
        batch.slice_mut(s![0, .., ..]).assign(&encode_sentence(
            sentence,
            self.maxlen,
            self.vecsize,
            &self.embeddings,
        ));

        let predictions = model.predict(&batch)?;
        let scores = labels
            .iter()
            .zip(predictions.row(0))
            .map(|(label, score)| (label.clone(), *score))
            .collect();
        Ok(scores)
    }

    /// Saves the trained model and its label order.
    ///
    /// Model serialization is delegated to the model collaborator; the
    /// label order is written newline-joined to `<prefix>_classlabels.txt`.
    /// The two writes are not transactional; a crash between them can
    /// leave the pair inconsistent. Labels containing newlines corrupt the
    /// label file; avoiding them is the caller's responsibility.
    ///
    /// # Errors
    /// `ClassifierError::NotTrained` (with no files written) if the
    /// classifier is untrained; otherwise model or IO failures, unchanged.
    pub fn save_model(&self, prefix: &str) -> Result<(), ClassifierError> {
        let (labels, model) = match &self.state {
            State::Trained { labels, model } => (labels, model),
            State::Untrained => return Err(ClassifierError::NotTrained),
        };

        model.save(prefix)?;
        let label_path = format!("{}_classlabels.txt", prefix);
        fs::write(&label_path, labels.join("\n"))?;
        info!("Saved {} class labels to {}", labels.len(), label_path);
        Ok(())
    }

    /// Loads a model and label order previously written by
    /// [`Classifier::save_model`] and transitions to the trained state.
    ///
    /// Label lines are whitespace-trimmed. The label count is validated
    /// against the loaded model's output width, so a label file paired with
    /// the wrong model fails here instead of mis-aligning scores later.
    pub fn load_model(&mut self, prefix: &str) -> Result<(), ClassifierError> {
        let model = M::load(prefix)?;

        let label_path = format!("{}_classlabels.txt", prefix);
        let raw = fs::read_to_string(&label_path)?;
        let labels: Vec<String> = raw.lines().map(|line| line.trim().to_string()).collect();

        if labels.len() != model.output_dim() {
            return Err(ClassifierError::LabelCountMismatch {
                expected: model.output_dim(),
                found: labels.len(),
            });
        }

        info!("Loaded {} class labels from {}", labels.len(), label_path);
        self.state = State::Trained { labels, model };
        Ok(())
    }
}
