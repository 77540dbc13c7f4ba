//! Batch aggregation
//!
//! Files are compressed one after another in input order. A failing file
//! becomes a failed entry and the batch carries on.

use chrono::Utc;
use imgsqueeze_core::models::{BatchItemResult, BatchResponse, CompressionSettings, UploadedFile};

use crate::compression::CompressionEngine;
use crate::image::AnimationDetector;
use crate::naming::batch_output_name;

pub struct BatchAggregator<'a> {
    engine: &'a CompressionEngine,
}

impl<'a> BatchAggregator<'a> {
    pub fn new(engine: &'a CompressionEngine) -> Self {
        Self { engine }
    }

    pub fn run(&self, files: &[UploadedFile], settings: &CompressionSettings) -> BatchResponse {
        tracing::info!(files = files.len(), "Starting batch compression");

        let results: Vec<BatchItemResult> = files
            .iter()
            .enumerate()
            .map(|(index, file)| self.process(index, file, settings))
            .collect();

        let response = BatchResponse::new(results);
        tracing::info!(
            total = response.summary.total,
            successful = response.summary.successful,
            failed = response.summary.failed,
            overall_compression_ratio = response.summary.overall_compression_ratio,
            "Batch compression completed"
        );
        response
    }

    fn process(
        &self,
        index: usize,
        file: &UploadedFile,
        settings: &CompressionSettings,
    ) -> BatchItemResult {
        let animated = AnimationDetector::is_animated(&file.data, &file.original_name);
        let output_name = batch_output_name(
            index,
            &file.original_name,
            settings,
            Utc::now().timestamp_millis(),
        );

        match self
            .engine
            .compress(&file.data, settings, animated, output_name)
        {
            Ok(result) => BatchItemResult::succeeded(
                file.original_name.clone(),
                result.output_name,
                result.original_size,
                result.compressed_size,
                result.compression_ratio,
            ),
            Err(e) => {
                tracing::warn!(
                    index,
                    filename = %file.original_name,
                    error = %e,
                    "Batch item failed"
                );
                BatchItemResult::failed(file.original_name.clone(), e.to_string())
            }
        }
    }
}
