use std::fs::File;
use std::io::{self, BufReader, BufWriter};

use log::{debug, info};
use ndarray::{Array1, Array2, Array3, Axis};
use serde::{Deserialize, Serialize};

/// Errors raised by trainable-model implementations.
#[derive(Debug, thiserror::Error)]
pub enum ModelError {
    #[error("shape mismatch: {0}")]
    ShapeMismatch(String),
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
    #[error("serialization error: {0}")]
    Persist(#[from] serde_json::Error),
}

/// A trainable neural-network collaborator.
///
/// The classifier wrapper hands implementations a batched 3-D input array of
/// shape `(num_examples, maxlen, vecsize)` together with a one-hot target
/// array of shape `(num_examples, num_labels)`, and later asks for batched
/// score predictions of the same width. Implementations own their
/// architecture, optimization, and on-disk format; the wrapper only
/// forwards data and propagates failures.
pub trait TrainableModel: Sized {
    /// Fits the model to the encoded corpus for `epochs` passes.
    fn fit(
        &mut self,
        inputs: &Array3<f32>,
        targets: &Array2<f32>,
        epochs: usize,
    ) -> Result<(), ModelError>;

    /// Predicts a `(num_examples, num_labels)` score array for a batch.
    fn predict(&self, inputs: &Array3<f32>) -> Result<Array2<f32>, ModelError>;

    /// Width of the model's output vector (number of labels it scores).
    fn output_dim(&self) -> usize;

    /// Serializes the model to files derived from `prefix`.
    fn save(&self, prefix: &str) -> Result<(), ModelError>;

    /// Deserializes a model previously written by [`TrainableModel::save`].
    fn load(prefix: &str) -> Result<Self, ModelError>;
}

/// A ready-made architecture: mean-pool the token axis, then a dense layer
/// with softmax output.
///
/// Training is full-batch gradient descent on cross-entropy loss. Weights
/// start at zero, which is a sound initialization for this convex single
/// layer. The model is persisted as JSON at `<prefix>.json`.
///
/// # Example
/// ```
/// use shortclass::models::DenseSoftmax;
///
/// // 50-dimensional embeddings, 3 labels
/// let model = DenseSoftmax::new(50, 3).with_learning_rate(0.1);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DenseSoftmax {
    weights: Array2<f32>,
    bias: Array1<f32>,
    learning_rate: f32,
}

impl DenseSoftmax {
    /// Creates a model for `vecsize`-dimensional embeddings and
    /// `num_classes` output labels.
    pub fn new(vecsize: usize, num_classes: usize) -> Self {
        Self {
            weights: Array2::zeros((vecsize, num_classes)),
            bias: Array1::zeros(num_classes),
            learning_rate: 0.5,
        }
    }

    /// Sets the gradient-descent learning rate.
    pub fn with_learning_rate(mut self, learning_rate: f32) -> Self {
        self.learning_rate = learning_rate;
        self
    }

    /// The embedding dimension the model accepts.
    pub fn vecsize(&self) -> usize {
        self.weights.nrows()
    }

    /// Collapses `(n, maxlen, vecsize)` inputs to `(n, vecsize)` by
    /// averaging over the token axis.
    fn pool(&self, inputs: &Array3<f32>) -> Result<Array2<f32>, ModelError> {
        let (_, maxlen, vecsize) = inputs.dim();
        if vecsize != self.vecsize() {
            return Err(ModelError::ShapeMismatch(format!(
                "input vectors have {} components, model expects {}",
                vecsize,
                self.vecsize()
            )));
        }
        if maxlen == 0 {
            return Err(ModelError::ShapeMismatch(
                "input has a zero-length token axis".to_string(),
            ));
        }
        Ok(inputs.mean_axis(Axis(1)).expect("token axis is non-empty"))
    }

    /// Computes row-wise softmax scores for pooled inputs.
    fn forward(&self, pooled: &Array2<f32>) -> Array2<f32> {
        let mut logits = pooled.dot(&self.weights) + &self.bias;
        for mut row in logits.rows_mut() {
            let max = row.iter().cloned().fold(f32::NEG_INFINITY, f32::max);
            row.mapv_inplace(|x| (x - max).exp());
            let sum = row.sum();
            if sum > 0.0 {
                row.mapv_inplace(|x| x / sum);
            }
        }
        logits
    }

    fn cross_entropy(probs: &Array2<f32>, targets: &Array2<f32>) -> f32 {
        let n = probs.nrows() as f32;
        let mut loss = 0.0;
        for (p_row, t_row) in probs.rows().into_iter().zip(targets.rows()) {
            for (p, t) in p_row.iter().zip(t_row.iter()) {
                if *t > 0.0 {
                    loss -= t * (p + 1e-12).ln();
                }
            }
        }
        loss / n
    }
}

impl TrainableModel for DenseSoftmax {
    fn fit(
        &mut self,
        inputs: &Array3<f32>,
        targets: &Array2<f32>,
        epochs: usize,
    ) -> Result<(), ModelError> {
        let n = inputs.dim().0;
        if n == 0 {
            return Err(ModelError::ShapeMismatch(
                "cannot fit on an empty batch".to_string(),
            ));
        }
        if targets.nrows() != n {
            return Err(ModelError::ShapeMismatch(format!(
                "{} input examples but {} target rows",
                n,
                targets.nrows()
            )));
        }
        if targets.ncols() != self.output_dim() {
            return Err(ModelError::ShapeMismatch(format!(
                "targets have {} columns, model outputs {}",
                targets.ncols(),
                self.output_dim()
            )));
        }

        let pooled = self.pool(inputs)?;
        let mut final_loss = 0.0;
        for epoch in 0..epochs {
            let probs = self.forward(&pooled);
            let loss = Self::cross_entropy(&probs, targets);

            let grad = (&probs - targets) / n as f32;
            let grad_weights = pooled.t().dot(&grad);
            let grad_bias = grad.sum_axis(Axis(0));
            self.weights = &self.weights - &(grad_weights * self.learning_rate);
            self.bias = &self.bias - &(grad_bias * self.learning_rate);

            debug!("Epoch {}/{} - loss: {:.6}", epoch + 1, epochs, loss);
            final_loss = loss;
        }
        info!(
            "Fitted dense softmax model on {} examples for {} epochs (final loss {:.6})",
            n, epochs, final_loss
        );
        Ok(())
    }

    fn predict(&self, inputs: &Array3<f32>) -> Result<Array2<f32>, ModelError> {
        let pooled = self.pool(inputs)?;
        Ok(self.forward(&pooled))
    }

    fn output_dim(&self) -> usize {
        self.bias.len()
    }

    fn save(&self, prefix: &str) -> Result<(), ModelError> {
        let path = format!("{}.json", prefix);
        let writer = BufWriter::new(File::create(&path)?);
        serde_json::to_writer(writer, self)?;
        info!("Saved dense softmax model to {}", path);
        Ok(())
    }

    fn load(prefix: &str) -> Result<Self, ModelError> {
        let path = format!("{}.json", prefix);
        let reader = BufReader::new(File::open(&path)?);
        let model = serde_json::from_reader(reader)?;
        info!("Loaded dense softmax model from {}", path);
        Ok(model)
    }
}
