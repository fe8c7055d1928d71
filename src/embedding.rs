use std::collections::HashMap;
use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::Path;
use std::sync::Arc;

use log::info;
use ndarray::{Array1, ArrayView1};

/// Errors raised while building or loading an embedding table.
#[derive(Debug, thiserror::Error)]
pub enum EmbeddingError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
    #[error("malformed entry at line {line}: {reason}")]
    Parse { line: usize, reason: String },
    #[error("word '{word}' has a {found}-dimensional vector, expected {expected}")]
    DimensionMismatch {
        word: String,
        expected: usize,
        found: usize,
    },
}

/// A word-embedding collaborator: maps tokens to fixed-length vectors.
///
/// A lookup miss is expected and non-exceptional; the encoder substitutes a
/// zero vector for unknown tokens. Implementations must return vectors of a
/// single consistent length.
pub trait WordEmbeddings {
    /// Returns whether the table holds a vector for `word`.
    fn contains(&self, word: &str) -> bool;

    /// Returns the embedding vector for `word`, or `None` on a miss.
    fn lookup(&self, word: &str) -> Option<ArrayView1<'_, f32>>;
}

impl<T: WordEmbeddings + ?Sized> WordEmbeddings for &T {
    fn contains(&self, word: &str) -> bool {
        (**self).contains(word)
    }

    fn lookup(&self, word: &str) -> Option<ArrayView1<'_, f32>> {
        (**self).lookup(word)
    }
}

impl<T: WordEmbeddings + ?Sized> WordEmbeddings for Arc<T> {
    fn contains(&self, word: &str) -> bool {
        (**self).contains(word)
    }

    fn lookup(&self, word: &str) -> Option<ArrayView1<'_, f32>> {
        (**self).lookup(word)
    }
}

/// An in-memory word-embedding table with a fixed vector dimension.
///
/// Tables can be populated programmatically with [`EmbeddingTable::insert`]
/// or loaded from the word2vec text format with
/// [`EmbeddingTable::from_word2vec_text`]. Every stored vector has exactly
/// [`EmbeddingTable::vecsize`] components; the dimension is enforced at
/// insertion time so lookups never surprise the encoder.
///
/// # Example
/// ```
/// use ndarray::arr1;
/// use shortclass::{EmbeddingTable, WordEmbeddings};
///
/// let mut table = EmbeddingTable::new(3);
/// table.insert("cat", arr1(&[0.1, 0.2, 0.3])).unwrap();
///
/// assert!(table.contains("cat"));
/// assert!(table.lookup("dog").is_none());
/// ```
#[derive(Debug, Clone)]
pub struct EmbeddingTable {
    vectors: HashMap<String, Array1<f32>>,
    vecsize: usize,
}

impl EmbeddingTable {
    /// Creates an empty table holding vectors of `vecsize` components.
    pub fn new(vecsize: usize) -> Self {
        Self {
            vectors: HashMap::new(),
            vecsize,
        }
    }

    /// The dimension of every vector in the table.
    pub fn vecsize(&self) -> usize {
        self.vecsize
    }

    /// Number of words in the table.
    pub fn len(&self) -> usize {
        self.vectors.len()
    }

    /// Returns whether the table holds no vectors.
    pub fn is_empty(&self) -> bool {
        self.vectors.is_empty()
    }

    /// Inserts a vector for `word`, replacing any previous entry.
    ///
    /// # Errors
    /// `EmbeddingError::DimensionMismatch` if the vector's length differs
    /// from the table's configured dimension.
    pub fn insert(
        &mut self,
        word: impl Into<String>,
        vector: Array1<f32>,
    ) -> Result<(), EmbeddingError> {
        let word = word.into();
        if vector.len() != self.vecsize {
            return Err(EmbeddingError::DimensionMismatch {
                word,
                expected: self.vecsize,
                found: vector.len(),
            });
        }
        self.vectors.insert(word, vector);
        Ok(())
    }

    /// Loads a table from a file in the word2vec text format.
    ///
    /// The format is one entry per line, `word v1 v2 ... vn`, separated by
    /// whitespace. An optional header line of two integers (`count dim`) is
    /// recognized and used to fix the vector dimension; otherwise the first
    /// entry fixes it. Blank lines are skipped.
    ///
    /// # Errors
    /// - `EmbeddingError::Io` if the file cannot be read
    /// - `EmbeddingError::Parse` for lines with no components or
    ///   unparsable numbers
    /// - `EmbeddingError::DimensionMismatch` for entries whose component
    ///   count disagrees with the established dimension
    pub fn from_word2vec_text<P: AsRef<Path>>(path: P) -> Result<Self, EmbeddingError> {
        let path = path.as_ref();
        let reader = BufReader::new(File::open(path)?);

        let mut vectors: HashMap<String, Array1<f32>> = HashMap::new();
        let mut vecsize: Option<usize> = None;
        let mut first_data_line = true;

        for (idx, line) in reader.lines().enumerate() {
            let line = line?;
            let lineno = idx + 1;
            let fields: Vec<&str> = line.split_whitespace().collect();
            if fields.is_empty() {
                continue;
            }

            // A leading "count dim" pair is the optional word2vec header.
            if first_data_line && fields.len() == 2 {
                if let (Ok(_count), Ok(dim)) =
                    (fields[0].parse::<usize>(), fields[1].parse::<usize>())
                {
                    vecsize = Some(dim);
                    first_data_line = false;
                    continue;
                }
            }
            first_data_line = false;

            let word = fields[0].to_string();
            if fields.len() < 2 {
                return Err(EmbeddingError::Parse {
                    line: lineno,
                    reason: format!("entry '{}' has no vector components", word),
                });
            }

            let components: Result<Vec<f32>, _> =
                fields[1..].iter().map(|f| f.parse::<f32>()).collect();
            let components = components.map_err(|e| EmbeddingError::Parse {
                line: lineno,
                reason: e.to_string(),
            })?;

            let expected = *vecsize.get_or_insert(components.len());
            if components.len() != expected {
                return Err(EmbeddingError::DimensionMismatch {
                    word,
                    expected,
                    found: components.len(),
                });
            }

            vectors.insert(word, Array1::from_vec(components));
        }

        let vecsize = vecsize.unwrap_or(0);
        info!(
            "Loaded {} word vectors of dimension {} from {:?}",
            vectors.len(),
            vecsize,
            path
        );

        Ok(Self { vectors, vecsize })
    }
}

impl WordEmbeddings for EmbeddingTable {
    fn contains(&self, word: &str) -> bool {
        self.vectors.contains_key(word)
    }

    fn lookup(&self, word: &str) -> Option<ArrayView1<'_, f32>> {
        self.vectors.get(word).map(|v| v.view())
    }
}
