use std::collections::HashSet;

use crate::{
    Analysis, PipelineError, RankedPrediction, RawComment, SentimentCounts, SentimentPoint,
    SentimentPrediction, SummaryMetrics,
};

/// Folds comments and their order-correlated predictions into summary
/// metrics, the trend series and the first `top_n` ranked predictions.
///
/// Metrics are undefined for an empty batch, which is reported as
/// [`PipelineError::NoComments`]. A prediction count that differs from the
/// comment count is a [`PipelineError::ScoringService`] failure.
pub fn aggregate(
    comments: &[RawComment],
    predictions: &[SentimentPrediction],
    top_n: usize,
) -> Result<Analysis, PipelineError> {
    if comments.is_empty() {
        return Err(PipelineError::NoComments);
    }
    if comments.len() != predictions.len() {
        return Err(PipelineError::ScoringService {
            message: format!(
                "cannot aggregate {} predictions for {} comments",
                predictions.len(),
                comments.len()
            ),
        });
    }

    let mut counts = SentimentCounts::default();
    let mut series = Vec::with_capacity(predictions.len());
    let mut top_comments = Vec::with_capacity(top_n.min(predictions.len()));
    let mut score_sum: i64 = 0;

    for (index, prediction) in predictions.iter().enumerate() {
        counts.record(prediction.sentiment);
        score_sum += i64::from(prediction.sentiment.score());
        series.push(SentimentPoint {
            timestamp: prediction.timestamp.clone(),
            sentiment: prediction.sentiment.score(),
        });
        if index < top_n {
            top_comments.push(RankedPrediction {
                rank: index + 1,
                comment: prediction.comment.clone(),
                sentiment: prediction.sentiment,
            });
        }
    }

    let total_comments = comments.len();
    let unique_users = comments
        .iter()
        .map(|comment| comment.author_id.as_str())
        .collect::<HashSet<_>>()
        .len();
    let total_words: usize = comments
        .iter()
        .map(|comment| comment.text.split_whitespace().count())
        .sum();

    let avg_word_length = round_tenths(total_words as f64 / total_comments as f64);
    let avg_sentiment = score_sum as f64 / total_comments as f64;
    let normalized_score = round_tenths(((avg_sentiment + 1.0) / 2.0) * 10.0).clamp(0.0, 10.0);

    Ok(Analysis {
        counts,
        series,
        metrics: SummaryMetrics {
            total_comments,
            unique_users,
            total_words,
            avg_word_length,
            normalized_score,
        },
        top_comments,
    })
}

/// Rounds a non-negative value to one decimal the way a fixed-point display
/// does: decided on the exact binary value, ties going up. `23.0 / 20.0` is
/// stored just below 1.15 and therefore shows as 1.1.
fn round_tenths(value: f64) -> f64 {
    if !value.is_finite() || value <= 0.0 {
        return 0.0;
    }

    let bits = value.to_bits();
    let exponent = ((bits >> 52) & 0x7ff) as i64;
    let fraction = bits & ((1u64 << 52) - 1);
    let (mantissa, shift) = if exponent == 0 {
        (fraction, 1074)
    } else {
        (fraction | (1u64 << 52), 1075 - exponent)
    };

    // value * 10 == mantissa * 10 / 2^shift, exactly.
    let scaled = u128::from(mantissa) * 10;
    if shift <= 0 {
        return value;
    }
    if shift >= 127 {
        return 0.0;
    }
    let shift = shift as u32;
    let whole = scaled >> shift;
    let remainder = scaled - (whole << shift);
    let tenths = if remainder >= (1u128 << (shift - 1)) {
        whole + 1
    } else {
        whole
    };
    tenths as f64 / 10.0
}
