//! Sentiment scoring.
//!
//! Delegates to the sentiment capability and maps its raw label codes.

use tracing::{debug, warn};

use super::labels::Sentiment;
use crate::error::AppError;
use crate::services::ModelCapabilities;

/// Maps a raw model label code. Unknown codes are Neutral.
pub fn map_raw_label(raw: &str) -> Sentiment {
    match raw {
        "LABEL_0" => Sentiment::Negative,
        "LABEL_1" => Sentiment::Neutral,
        "LABEL_2" => Sentiment::Positive,
        other => {
            debug!("Unknown sentiment label '{}', treating as Neutral", other);
            Sentiment::Neutral
        }
    }
}

/// Scores `text` through the capability.
pub async fn score<C>(capabilities: &C, text: &str) -> Result<Sentiment, AppError>
where
    C: ModelCapabilities + ?Sized,
{
    let output = capabilities.sentiment(text).await?;
    let sentiment = map_raw_label(&output.label);
    debug!(
        "Sentiment raw '{}' ({:.2}) -> {}",
        output.label, output.score, sentiment
    );
    Ok(sentiment)
}

/// Scores `text`, degrading to Neutral on capability failure.
///
/// Returns `None` as the second element when the score is genuine, and the
/// error that was swallowed otherwise.
pub async fn score_or_neutral<C>(capabilities: &C, text: &str) -> (Sentiment, Option<AppError>)
where
    C: ModelCapabilities + ?Sized,
{
    match score(capabilities, text).await {
        Ok(sentiment) => (sentiment, None),
        Err(e) => {
            warn!("Sentiment analysis failed, defaulting to Neutral: {}", e);
            (Sentiment::Neutral, Some(e))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_label_codes() {
        assert_eq!(map_raw_label("LABEL_0"), Sentiment::Negative);
        assert_eq!(map_raw_label("LABEL_1"), Sentiment::Neutral);
        assert_eq!(map_raw_label("LABEL_2"), Sentiment::Positive);
    }

    #[test]
    fn test_unknown_label_is_neutral() {
        assert_eq!(map_raw_label("LABEL_3"), Sentiment::Neutral);
        assert_eq!(map_raw_label("negative"), Sentiment::Neutral);
        assert_eq!(map_raw_label(""), Sentiment::Neutral);
    }
}
