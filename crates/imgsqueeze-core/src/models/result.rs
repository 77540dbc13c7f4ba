//! Compression outcome and batch summary models.

use serde::Serialize;
use utoipa::ToSchema;

/// Percentage saved, rounded to one decimal place. Negative when the output grew.
pub fn compression_ratio(original_size: u64, compressed_size: u64) -> f64 {
    if original_size == 0 {
        return 0.0;
    }
    let saved = original_size as f64 - compressed_size as f64;
    let ratio = (saved / original_size as f64 * 1000.0).round() / 10.0;
    // -0.0 would render as "-0"
    if ratio == 0.0 {
        0.0
    } else {
        ratio
    }
}

/// One entry of a batch response.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BatchItemResult {
    pub original_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub original_size: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub compressed_size: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub compression_ratio: Option<f64>,
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl BatchItemResult {
    pub fn succeeded(
        original_name: impl Into<String>,
        output_name: impl Into<String>,
        original_size: u64,
        compressed_size: u64,
        compression_ratio: f64,
    ) -> Self {
        Self {
            original_name: original_name.into(),
            output_name: Some(output_name.into()),
            original_size: Some(original_size),
            compressed_size: Some(compressed_size),
            compression_ratio: Some(compression_ratio),
            success: true,
            error: None,
        }
    }

    pub fn failed(original_name: impl Into<String>, error: impl Into<String>) -> Self {
        Self {
            original_name: original_name.into(),
            output_name: None,
            original_size: None,
            compressed_size: None,
            compression_ratio: None,
            success: false,
            error: Some(error.into()),
        }
    }
}

/// Aggregate statistics over a batch run.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BatchSummary {
    pub total: usize,
    pub successful: usize,
    pub failed: usize,
    pub total_original_size: u64,
    pub total_compressed_size: u64,
    pub overall_compression_ratio: f64,
    pub space_saved: i64,
}

impl BatchSummary {
    /// Fold per-file results. Failed items carry no sizes and contribute nothing to totals.
    pub fn from_results(results: &[BatchItemResult]) -> Self {
        let successful = results.iter().filter(|r| r.success).count();
        let total_original_size: u64 = results.iter().filter_map(|r| r.original_size).sum();
        let total_compressed_size: u64 = results.iter().filter_map(|r| r.compressed_size).sum();

        Self {
            total: results.len(),
            successful,
            failed: results.len() - successful,
            total_original_size,
            total_compressed_size,
            overall_compression_ratio: compression_ratio(total_original_size, total_compressed_size),
            space_saved: total_original_size as i64 - total_compressed_size as i64,
        }
    }
}

/// Body of a successful batch request.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct BatchResponse {
    pub success: bool,
    pub summary: BatchSummary,
    pub results: Vec<BatchItemResult>,
}

impl BatchResponse {
    pub fn new(results: Vec<BatchItemResult>) -> Self {
        Self {
            success: true,
            summary: BatchSummary::from_results(&results),
            results,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_compression_ratio_rounding() {
        assert_eq!(compression_ratio(1000, 250), 75.0);
        assert_eq!(compression_ratio(3, 2), 33.3);
        assert_eq!(compression_ratio(3, 1), 66.7);
    }

    #[test]
    fn test_compression_ratio_negative_when_inflated() {
        assert_eq!(compression_ratio(100, 150), -50.0);
    }

    #[test]
    fn test_compression_ratio_tiny_growth_is_plain_zero() {
        let ratio = compression_ratio(10_000, 10_001);
        assert_eq!(ratio, 0.0);
        assert!(ratio.is_sign_positive());
        assert_eq!(ratio.to_string(), "0");
    }

    #[test]
    fn test_compression_ratio_zero_original() {
        assert_eq!(compression_ratio(0, 0), 0.0);
    }

    #[test]
    fn test_summary_counts_and_totals() {
        let results = vec![
            BatchItemResult::succeeded("a.png", "a.webp", 1000, 400, 60.0),
            BatchItemResult::failed("b.png", "decode error"),
            BatchItemResult::succeeded("c.jpg", "c.webp", 1000, 600, 40.0),
        ];
        let summary = BatchSummary::from_results(&results);
        assert_eq!(summary.total, 3);
        assert_eq!(summary.successful, 2);
        assert_eq!(summary.failed, 1);
        assert_eq!(summary.successful + summary.failed, summary.total);
        assert_eq!(summary.total_original_size, 2000);
        assert_eq!(summary.total_compressed_size, 1000);
        assert_eq!(summary.overall_compression_ratio, 50.0);
        assert_eq!(summary.space_saved, 1000);
    }

    #[test]
    fn test_summary_all_failed_has_zero_ratio() {
        let results = vec![BatchItemResult::failed("x.gif", "boom")];
        let summary = BatchSummary::from_results(&results);
        assert_eq!(summary.successful, 0);
        assert_eq!(summary.failed, 1);
        assert_eq!(summary.overall_compression_ratio, 0.0);
        assert_eq!(summary.space_saved, 0);
    }

    #[test]
    fn test_batch_item_serialization_shape() {
        let ok = serde_json::to_value(BatchItemResult::succeeded("a.png", "a.webp", 10, 5, 50.0))
            .expect("serialize");
        assert_eq!(ok["originalName"], "a.png");
        assert_eq!(ok["outputName"], "a.webp");
        assert_eq!(ok["compressionRatio"], 50.0);
        assert_eq!(ok["success"], true);
        assert!(ok.get("error").is_none());

        let failed =
            serde_json::to_value(BatchItemResult::failed("b.png", "bad")).expect("serialize");
        assert_eq!(failed["success"], false);
        assert_eq!(failed["error"], "bad");
        assert!(failed.get("originalSize").is_none());
    }
}
