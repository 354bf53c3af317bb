use pretty_assertions::assert_eq;
use pulse_engine::{
    aggregate, PipelineError, RawComment, Sentiment, SentimentCounts, SentimentPrediction,
};

fn batch(labels: &[Sentiment]) -> (Vec<RawComment>, Vec<SentimentPrediction>) {
    labels
        .iter()
        .enumerate()
        .map(|(i, sentiment)| {
            let text = format!("comment number {i}");
            let timestamp = format!("2024-01-01T00:{:02}:00Z", i % 60);
            (
                RawComment {
                    text: text.clone(),
                    timestamp: timestamp.clone(),
                    author_id: format!("author-{}", i % 3),
                },
                SentimentPrediction {
                    comment: text,
                    sentiment: *sentiment,
                    timestamp,
                },
            )
        })
        .unzip()
}

#[test]
fn mixed_batch_metrics() {
    use Sentiment::*;
    let (comments, predictions) = batch(&[Positive, Positive, Negative]);

    let analysis = aggregate(&comments, &predictions, 25).unwrap();

    assert_eq!(
        analysis.counts,
        SentimentCounts {
            positive: 2,
            neutral: 0,
            negative: 1,
        }
    );
    assert_eq!(analysis.metrics.total_comments, 3);
    assert_eq!(analysis.metrics.unique_users, 3);
    assert_eq!(analysis.metrics.total_words, 9);
    assert_eq!(analysis.metrics.avg_word_length, 3.0);
    assert_eq!(analysis.metrics.normalized_score, 6.7);
    assert_eq!(
        analysis.series.iter().map(|p| p.sentiment).collect::<Vec<_>>(),
        vec![1, 1, -1]
    );
}

#[test]
fn counts_always_sum_to_batch_size() {
    use Sentiment::*;
    let labels: Vec<Sentiment> = (0..57)
        .map(|i| [Positive, Neutral, Negative, Neutral][i % 4])
        .collect();
    let (comments, predictions) = batch(&labels);

    let analysis = aggregate(&comments, &predictions, 25).unwrap();

    assert_eq!(analysis.counts.total(), 57);
    assert_eq!(analysis.series.len(), 57);
    assert!((0.0..=10.0).contains(&analysis.metrics.normalized_score));
}

#[test]
fn score_extremes() {
    let (comments, predictions) = batch(&[Sentiment::Negative; 4]);
    assert_eq!(
        aggregate(&comments, &predictions, 25)
            .unwrap()
            .metrics
            .normalized_score,
        0.0
    );

    let (comments, predictions) = batch(&[Sentiment::Positive; 4]);
    assert_eq!(
        aggregate(&comments, &predictions, 25)
            .unwrap()
            .metrics
            .normalized_score,
        10.0
    );

    let (comments, predictions) = batch(&[Sentiment::Neutral; 4]);
    assert_eq!(
        aggregate(&comments, &predictions, 25)
            .unwrap()
            .metrics
            .normalized_score,
        5.0
    );
}

#[test]
fn top_comments_keep_service_order() {
    let (comments, predictions) = batch(&[Sentiment::Positive; 40]);

    let analysis = aggregate(&comments, &predictions, 25).unwrap();

    assert_eq!(analysis.top_comments.len(), 25);
    assert_eq!(analysis.top_comments[0].rank, 1);
    assert_eq!(analysis.top_comments[0].comment, "comment number 0");
    assert_eq!(analysis.top_comments[0].label(), "Positive");
    assert_eq!(analysis.top_comments[24].rank, 25);
}

#[test]
fn unique_users_count_distinct_authors() {
    let (mut comments, predictions) = batch(&[Sentiment::Neutral; 6]);
    comments[5].author_id = "Unknown".to_string();

    let analysis = aggregate(&comments, &predictions, 25).unwrap();

    assert_eq!(analysis.metrics.unique_users, 4);
}

#[test]
fn average_word_count_rounds_to_tenths() {
    let comments: Vec<RawComment> = ["one two", "one two three", "a  b   c d"]
        .iter()
        .map(|text| RawComment {
            text: text.to_string(),
            timestamp: String::new(),
            author_id: "x".to_string(),
        })
        .collect();
    let predictions: Vec<SentimentPrediction> = comments
        .iter()
        .map(|c| SentimentPrediction {
            comment: c.text.clone(),
            sentiment: Sentiment::Neutral,
            timestamp: String::new(),
        })
        .collect();

    let analysis = aggregate(&comments, &predictions, 25).unwrap();

    assert_eq!(analysis.metrics.total_words, 9);
    assert_eq!(analysis.metrics.avg_word_length, 3.0);
}

#[test]
fn empty_batch_is_no_comments() {
    let err = aggregate(&[], &[], 25).unwrap_err();
    assert_eq!(err, PipelineError::NoComments);
}

#[test]
fn counts_serialize_with_label_keys() {
    use Sentiment::*;
    let (comments, predictions) = batch(&[Positive, Neutral, Neutral]);
    let analysis = aggregate(&comments, &predictions, 25).unwrap();

    assert_eq!(
        serde_json::to_value(analysis.counts).unwrap(),
        serde_json::json!({ "1": 1, "0": 2, "-1": 0 })
    );
}

#[test]
fn mismatched_batches_are_rejected() {
    let (comments, predictions) = batch(&[Sentiment::Positive; 3]);

    let err = aggregate(&comments, &predictions[..2], 25).unwrap_err();

    assert!(matches!(err, PipelineError::ScoringService { .. }));
}

fn texts_with_word_counts(words: &[usize]) -> (Vec<RawComment>, Vec<SentimentPrediction>) {
    words
        .iter()
        .map(|count| {
            let text = vec!["w"; *count].join(" ");
            (
                RawComment {
                    text: text.clone(),
                    timestamp: String::new(),
                    author_id: "x".to_string(),
                },
                SentimentPrediction {
                    comment: text,
                    sentiment: Sentiment::Neutral,
                    timestamp: String::new(),
                },
            )
        })
        .unzip()
}

#[test]
fn tenths_follow_the_stored_binary_value() {
    // 23 / 20 is stored just below 1.15.
    let mut words = vec![1; 20];
    words[..3].fill(2);
    let (comments, predictions) = texts_with_word_counts(&words);
    let analysis = aggregate(&comments, &predictions, 25).unwrap();
    assert_eq!(analysis.metrics.total_words, 23);
    assert_eq!(analysis.metrics.avg_word_length, 1.1);

    // 5 / 4 is exactly 1.25 and rounds up.
    let (comments, predictions) = texts_with_word_counts(&[2, 1, 1, 1]);
    let analysis = aggregate(&comments, &predictions, 25).unwrap();
    assert_eq!(analysis.metrics.avg_word_length, 1.3);
}
