use std::collections::HashSet;
use std::sync::Arc;
use std::thread;

use ndarray::arr1;
use shortclass::{
    Classifier, ClassifierError, Corpus, DenseSoftmax, EmbeddingTable, WordEmbeddings,
};

fn setup_test_table() -> EmbeddingTable {
    let mut table = EmbeddingTable::new(3);
    let entries: [(&str, [f32; 3]); 6] = [
        ("goal", [1.0, 0.0, 0.0]),
        ("match", [0.9, 0.1, 0.0]),
        ("striker", [0.8, 0.0, 0.2]),
        ("ballot", [0.0, 1.0, 0.0]),
        ("senate", [0.1, 0.9, 0.0]),
        ("vote", [0.0, 0.8, 0.2]),
    ];
    for (word, vector) in entries {
        table.insert(word, arr1(&vector)).unwrap();
    }
    table
}

fn setup_test_corpus() -> Corpus {
    let mut corpus = Corpus::new();
    corpus.insert(
        "politics".to_string(),
        vec!["ballot vote".to_string(), "senate vote".to_string()],
    );
    corpus.insert(
        "sports".to_string(),
        vec!["goal match".to_string(), "striker goal".to_string()],
    );
    corpus
}

fn setup_trained_classifier() -> Classifier<EmbeddingTable, DenseSoftmax> {
    let mut classifier = Classifier::new(setup_test_table())
        .with_vecsize(3)
        .with_maxlen(6);
    classifier
        .train(&setup_test_corpus(), DenseSoftmax::new(3, 2), 200)
        .expect("training failed");
    classifier
}

#[test]
fn test_end_to_end_classification() -> Result<(), Box<dyn std::error::Error>> {
    let classifier = setup_trained_classifier();

    let scores = classifier.score("goal striker")?;
    assert_eq!(scores.len(), 2);
    assert!(scores["sports"] > scores["politics"]);

    let scores = classifier.score("senate ballot")?;
    assert!(scores["politics"] > scores["sports"]);
    Ok(())
}

#[test]
fn test_unknown_words_still_score() -> Result<(), Box<dyn std::error::Error>> {
    let classifier = setup_trained_classifier();
    // every token is an embedding miss, so the input is an all-zero matrix
    let scores = classifier.score("quantum entanglement")?;
    assert_eq!(scores.len(), 2);
    for score in scores.values() {
        assert!(score.is_finite());
    }
    Ok(())
}

#[test]
fn test_truncation_ignores_tokens_past_maxlen() -> Result<(), Box<dyn std::error::Error>> {
    let classifier = setup_trained_classifier();

    let base = "goal match striker goal match striker"; // exactly maxlen tokens
    let extended = format!("{} ballot ballot ballot", base);

    let base_scores = classifier.score(base)?;
    let extended_scores = classifier.score(&extended)?;
    for (label, score) in &base_scores {
        assert_eq!(score, &extended_scores[label]);
    }
    Ok(())
}

#[test]
fn test_untrained_score_and_save_fail_without_side_effects() {
    let classifier: Classifier<EmbeddingTable, DenseSoftmax> =
        Classifier::new(setup_test_table())
            .with_vecsize(3)
            .with_maxlen(6);

    assert!(matches!(
        classifier.score("goal"),
        Err(ClassifierError::NotTrained)
    ));

    let dir = tempfile::tempdir().unwrap();
    let prefix = dir.path().join("untrained").to_string_lossy().into_owned();
    assert!(matches!(
        classifier.save_model(&prefix),
        Err(ClassifierError::NotTrained)
    ));

    // no files may be written on the failed save
    assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
}

#[test]
fn test_save_load_round_trip() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempfile::tempdir()?;
    let prefix = dir.path().join("classifier").to_string_lossy().into_owned();

    let classifier = setup_trained_classifier();
    let before = classifier.score("goal match")?;
    classifier.save_model(&prefix)?;

    let mut restored: Classifier<EmbeddingTable, DenseSoftmax> =
        Classifier::new(setup_test_table())
            .with_vecsize(3)
            .with_maxlen(6);
    restored.load_model(&prefix)?;
    assert!(restored.is_trained());

    let after = restored.score("goal match")?;
    let before_labels: HashSet<&String> = before.keys().collect();
    let after_labels: HashSet<&String> = after.keys().collect();
    assert_eq!(before_labels, after_labels);

    // the bundled model round-trips its parameters exactly
    assert!(after["sports"] > after["politics"]);
    Ok(())
}

#[test]
fn test_label_file_format() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempfile::tempdir()?;
    let prefix = dir.path().join("classifier").to_string_lossy().into_owned();

    setup_trained_classifier().save_model(&prefix)?;

    let labels = std::fs::read_to_string(format!("{}_classlabels.txt", prefix))?;
    assert_eq!(labels, "politics\nsports");
    Ok(())
}

#[test]
fn test_shared_table_across_classifiers() -> Result<(), Box<dyn std::error::Error>> {
    let table = Arc::new(setup_test_table());
    assert!(table.contains("goal"));

    let mut first: Classifier<_, DenseSoftmax> = Classifier::new(Arc::clone(&table))
        .with_vecsize(3)
        .with_maxlen(6);
    let mut second: Classifier<_, DenseSoftmax> = Classifier::new(Arc::clone(&table))
        .with_vecsize(3)
        .with_maxlen(6);

    first.train(&setup_test_corpus(), DenseSoftmax::new(3, 2), 50)?;
    second.train(&setup_test_corpus(), DenseSoftmax::new(3, 2), 50)?;
    Ok(())
}

#[test]
fn test_concurrent_scoring() {
    let classifier = Arc::new(setup_trained_classifier());
    let mut handles = vec![];

    for _ in 0..3 {
        let classifier = Arc::clone(&classifier);
        handles.push(thread::spawn(move || {
            let scores = classifier.score("goal match").unwrap();
            assert!(scores["sports"] > scores["politics"]);
        }));
    }

    for handle in handles {
        handle.join().unwrap();
    }
}
