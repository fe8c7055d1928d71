use std::collections::BTreeMap;

use log::warn;
use ndarray::{s, Array2, Array3};

use crate::embedding::WordEmbeddings;
use crate::tokenize::word_tokenize;

/// A labeled training corpus: label → ordered example sentences.
///
/// Keys are unique by construction and iterate in sorted order, which fixes
/// the label order (and therefore the output-column order) for a training
/// run.
pub type Corpus = BTreeMap<String, Vec<String>>;

/// The encoded form of a labeled corpus.
#[derive(Debug, Clone)]
pub struct EncodedCorpus {
    /// Labels in encoding order; index `i` owns target column `i`.
    pub labels: Vec<String>,
    /// Stacked sentence matrices, shape `(num_examples, maxlen, vecsize)`.
    pub inputs: Array3<f32>,
    /// One-hot targets, shape `(num_examples, num_labels)`.
    pub targets: Array2<f32>,
}

/// Encodes a sentence as a `(maxlen, vecsize)` matrix of token embeddings.
///
/// Row `i` holds the embedding of the sentence's `i`-th token. Sentences
/// longer than `maxlen` tokens are silently truncated; shorter ones leave
/// the remaining rows at zero. A token missing from the embedding table
/// contributes a zero row, never an error, so a sentence with no known
/// tokens (or no tokens at all) encodes to an all-zero matrix.
///
/// Deterministic and side-effect free given the same tokenizer and table.
///
/// # Example
/// ```
/// use ndarray::arr1;
/// use shortclass::{encode_sentence, EmbeddingTable};
///
/// let mut table = EmbeddingTable::new(2);
/// table.insert("hi", arr1(&[1.0, 2.0])).unwrap();
///
/// let matrix = encode_sentence("hi there", 4, 2, &table);
/// assert_eq!(matrix.dim(), (4, 2));
/// assert_eq!(matrix[[0, 1]], 2.0); // "hi"
/// assert_eq!(matrix[[1, 0]], 0.0); // "there" is a miss
/// ```
pub fn encode_sentence<E: WordEmbeddings>(
    sentence: &str,
    maxlen: usize,
    vecsize: usize,
    embeddings: &E,
) -> Array2<f32> {
    let tokens = word_tokenize(sentence);
    let mut matrix = Array2::zeros((maxlen, vecsize));
    for (i, token) in tokens.iter().take(maxlen).enumerate() {
        if let Some(vector) = embeddings.lookup(token) {
            if vector.len() == vecsize {
                matrix.row_mut(i).assign(&vector);
            } else {
                warn!(
                    "embedding for '{}' has {} components, expected {}; treating as a miss",
                    token,
                    vector.len(),
                    vecsize
                );
            }
        }
    }
    matrix
}

/// Encodes a labeled corpus into model-ready arrays.
///
/// Establishes the label order from the corpus iteration order, encodes
/// every example sentence with [`encode_sentence`], and builds the matching
/// one-hot target row for each. The returned arrays stack examples in label
/// order, then in each label's example order.
pub fn encode_corpus<E: WordEmbeddings>(
    corpus: &Corpus,
    maxlen: usize,
    vecsize: usize,
    embeddings: &E,
) -> EncodedCorpus {
    let labels: Vec<String> = corpus.keys().cloned().collect();
    let num_examples: usize = corpus.values().map(Vec::len).sum();

    let mut inputs = Array3::zeros((num_examples, maxlen, vecsize));
    let mut targets = Array2::zeros((num_examples, labels.len()));

    let mut row = 0;
    for (col, label) in labels.iter().enumerate() {
        for sentence in &corpus[label] {
            let matrix = encode_sentence(sentence, maxlen, vecsize, embeddings);
            inputs.slice_mut(s![row, .., ..]).assign(&matrix);
            targets[[row, col]] = 1.0;
            row += 1;
        }
    }

    EncodedCorpus {
        labels,
        inputs,
        targets,
    }
}
