use std::collections::HashSet;

use lazy_static::lazy_static;
use regex::Regex;
use rust_stemmers::{Algorithm, Stemmer};

use crate::tokenize::word_tokenize;

lazy_static! {
    static ref NON_WORD_RE: Regex = Regex::new(r"[^\w\s]").expect("invalid pattern");
    static ref DIGIT_RE: Regex = Regex::new(r"\d").expect("invalid pattern");
    static ref STEMMER: Stemmer = Stemmer::create(Algorithm::English);
    static ref STOP_WORDS: HashSet<String> =
        stop_words::get(stop_words::LANGUAGE::English).into_iter().collect();
}

/// A single text-normalization step: consumes text, produces text.
pub type PipelineStep = Box<dyn Fn(&str) -> String + Send + Sync>;

/// An ordered sequence of normalization steps composed into one transform.
///
/// Steps are applied first to last as a left fold over the input; an empty
/// pipeline is the identity transform.
///
/// # Example
/// ```
/// use shortclass::preprocess::{Pipeline, PipelineStep};
///
/// let steps: Vec<PipelineStep> = vec![
///     Box::new(|s: &str| s.to_lowercase()),
///     Box::new(|s: &str| s.trim().to_string()),
/// ];
/// let pipeline = Pipeline::new(steps);
/// assert_eq!(pipeline.apply("  Hello  "), "hello");
/// ```
pub struct Pipeline {
    steps: Vec<PipelineStep>,
}

impl Pipeline {
    /// Builds a pipeline from an ordered list of steps.
    pub fn new(steps: Vec<PipelineStep>) -> Self {
        Self { steps }
    }

    /// Number of steps in the pipeline.
    pub fn len(&self) -> usize {
        self.steps.len()
    }

    /// Returns whether the pipeline has no steps.
    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Applies every step in order to `text` and returns the result.
    pub fn apply(&self, text: &str) -> String {
        self.steps
            .iter()
            .fold(text.to_string(), |acc, step| step(&acc))
    }
}

/// Returns the standard five-step normalization pipeline.
///
/// The steps, in order:
/// 1. strip characters that are neither word characters nor whitespace
/// 2. strip digit characters
/// 3. lowercase
/// 4. tokenize, drop English stop words, rejoin with single spaces
/// 5. tokenize, stem each token (Snowball English), rejoin with single spaces
///
/// Stop-word removal operates on the lowercased text and runs before
/// stemming, so stemmed forms never reintroduce stop words.
///
/// # Example
/// ```
/// use shortclass::preprocess::standard_pipeline;
///
/// let pipeline = standard_pipeline();
/// assert_eq!(pipeline.apply("He is running 42 races!"), "run race");
/// ```
pub fn standard_pipeline() -> Pipeline {
    let steps: Vec<PipelineStep> = vec![
        Box::new(|s: &str| NON_WORD_RE.replace_all(s, "").into_owned()),
        Box::new(|s: &str| DIGIT_RE.replace_all(s, "").into_owned()),
        Box::new(|s: &str| s.to_lowercase()),
        Box::new(|s: &str| {
            word_tokenize(s)
                .into_iter()
                .filter(|t| !STOP_WORDS.contains(t.as_str()))
                .collect::<Vec<_>>()
                .join(" ")
        }),
        Box::new(|s: &str| {
            word_tokenize(s)
                .iter()
                .map(|t| STEMMER.stem(t).into_owned())
                .collect::<Vec<_>>()
                .join(" ")
        }),
    ];
    Pipeline::new(steps)
}
