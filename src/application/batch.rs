// SPDX-License-Identifier: MPL-2.0
//! Batch use case: one operation applied to many images.
//!
//! Every image gets its own [`EditSession`], so a failure on one file never
//! affects the others. Outputs are named `{name}_{operation}_clarifi.{ext}`.

use crate::application::loader::load_image;
use crate::application::port::{RemoteProcessor, RemoteRequest};
use crate::application::remote::apply_remote;
use crate::config::Config;
use crate::domain::editing::{AdjustmentField, FilterName, TransformOp};
use crate::editor::{
    EditSession, ExportFlow, ExportedImage, ImageSource, LoadMode, RemoteOutcome,
};
use crate::error::{Error, Result};
use crate::media::ExportFormat;
use std::time::Instant;
use tokio::sync::Mutex;

/// The single edit a batch applies to each image.
#[derive(Debug, Clone, PartialEq)]
pub enum BatchOperation {
    Transform(TransformOp),
    Filter(FilterName),
    /// Slider value, committed immediately.
    Adjust(AdjustmentField, f32),
    Remote(RemoteRequest),
}

impl BatchOperation {
    /// Name used in output file names.
    #[must_use]
    pub fn name(&self) -> String {
        match self {
            BatchOperation::Transform(op) => op.name().to_string(),
            BatchOperation::Filter(filter) => filter.as_str().to_string(),
            BatchOperation::Adjust(field, _) => field.as_str().to_string(),
            BatchOperation::Remote(request) => request.label().to_string(),
        }
    }
}

/// Outcome for one input.
#[derive(Debug, Clone, PartialEq)]
pub struct BatchItem {
    /// Input file name, or `batch_{n}` when it had none.
    pub source: String,
    pub outcome: Result<ExportedImage>,
}

/// Per-file outcomes, in input order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BatchReport {
    pub items: Vec<BatchItem>,
}

impl BatchReport {
    #[must_use]
    pub fn total(&self) -> usize {
        self.items.len()
    }

    #[must_use]
    pub fn succeeded(&self) -> usize {
        self.items.iter().filter(|item| item.outcome.is_ok()).count()
    }

    #[must_use]
    pub fn failed(&self) -> usize {
        self.total() - self.succeeded()
    }

    /// Successful exports, in input order.
    pub fn exports(&self) -> impl Iterator<Item = &ExportedImage> {
        self.items.iter().filter_map(|item| item.outcome.as_ref().ok())
    }
}

/// Applies `operation` to every source and exports each result as `format`.
///
/// Sources are processed one after another. Remote operations go through
/// `processor`; local ones never touch it.
pub async fn run_batch<P: RemoteProcessor>(
    config: &Config,
    processor: &P,
    sources: Vec<ImageSource>,
    operation: &BatchOperation,
    format: ExportFormat,
) -> BatchReport {
    let flow = ExportFlow::Batch(operation.name());
    let mut report = BatchReport {
        items: Vec::with_capacity(sources.len()),
    };

    for (index, source) in sources.into_iter().enumerate() {
        let source = if source.name.is_some() {
            source
        } else {
            source.with_name(format!("batch_{}", index + 1))
        };
        let label = source.name.clone().unwrap_or_default();

        let outcome = process_one(config, processor, source, operation, &flow, format).await;
        match &outcome {
            Ok(exported) => tracing::info!(source = %label, filename = %exported.filename, "batch item done"),
            Err(err) => tracing::warn!(source = %label, error = %err, "batch item failed"),
        }
        report.items.push(BatchItem {
            source: label,
            outcome,
        });
    }

    tracing::info!(
        processed = report.succeeded(),
        requested = report.total(),
        operation = %operation.name(),
        "batch finished"
    );
    report
}

async fn process_one<P: RemoteProcessor>(
    config: &Config,
    processor: &P,
    source: ImageSource,
    operation: &BatchOperation,
    flow: &ExportFlow,
    format: ExportFormat,
) -> Result<ExportedImage> {
    let session = Mutex::new(EditSession::new(config));
    load_image(&session, source, LoadMode::Fresh).await?;

    match operation {
        BatchOperation::Transform(op) => {
            session.lock().await.apply_transform(*op)?;
        }
        BatchOperation::Filter(filter) => {
            session.lock().await.apply_filter_name(*filter)?;
        }
        BatchOperation::Adjust(field, value) => {
            let mut session = session.lock().await;
            session.set_adjustment(*field, *value, Instant::now())?;
            session.commit_adjustments();
        }
        BatchOperation::Remote(request) => {
            if let RemoteOutcome::Stale = apply_remote(&session, processor, request.clone()).await? {
                return Err(Error::RemoteProcessing(format!(
                    "{}: result arrived after the image changed",
                    request.endpoint()
                )));
            }
        }
    }

    let session = session.lock().await;
    session.export_for(flow, format, config.export_quality())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::port::RemoteError;
    use crate::domain::editing::{FlipAxis, RotationAngle};
    use crate::media::codec;
    use crate::test_utils::{gradient, gradient_png};
    use std::future::Future;

    /// Returns the image unchanged, or fails every call.
    struct EchoProcessor {
        fail: bool,
    }

    impl RemoteProcessor for EchoProcessor {
        fn process(
            &self,
            _request: &RemoteRequest,
            png: Vec<u8>,
        ) -> impl Future<Output = std::result::Result<Vec<u8>, RemoteError>> + Send {
            let fail = self.fail;
            async move {
                if fail {
                    Err(RemoteError::Transport("connection refused".into()))
                } else {
                    Ok(png)
                }
            }
        }

        fn query(
            &self,
            _request: &RemoteRequest,
            _png: Vec<u8>,
        ) -> impl Future<Output = std::result::Result<String, RemoteError>> + Send {
            async { Ok(String::new()) }
        }
    }

    fn named(width: u32, height: u32, name: &str) -> ImageSource {
        ImageSource::from_bytes(gradient_png(width, height)).with_name(name)
    }

    #[test]
    fn operation_names_follow_their_kind() {
        let rotate = RotationAngle::from_degrees(90).unwrap();
        assert_eq!(
            BatchOperation::Transform(TransformOp::Rotate(rotate)).name(),
            "rotate"
        );
        assert_eq!(BatchOperation::Filter(FilterName::Sepia).name(), "sepia");
        assert_eq!(
            BatchOperation::Adjust(AdjustmentField::Contrast, 1.2).name(),
            "contrast"
        );
        assert_eq!(
            BatchOperation::Remote(RemoteRequest::auto_enhance()).name(),
            "auto-enhance"
        );
    }

    #[tokio::test]
    async fn each_image_is_edited_and_named_after_the_operation() {
        let sources = vec![named(4, 3, "a.png"), named(2, 5, "b.jpg")];
        let operation = BatchOperation::Transform(TransformOp::Flip(FlipAxis::Vertical));

        let report = run_batch(
            &Config::default(),
            &EchoProcessor { fail: false },
            sources,
            &operation,
            ExportFormat::Png,
        )
        .await;

        assert_eq!((report.succeeded(), report.failed()), (2, 0));
        let names: Vec<_> = report.exports().map(|e| e.filename.as_str()).collect();
        assert_eq!(names, vec!["a_flip_clarifi.png", "b_flip_clarifi.png"]);

        let first = codec::decode(&report.items[0].outcome.as_ref().unwrap().bytes, None).unwrap();
        assert_eq!(first, gradient(4, 3).flip(FlipAxis::Vertical));
    }

    #[tokio::test]
    async fn one_bad_file_does_not_stop_the_batch() {
        let sources = vec![
            named(3, 3, "good.png"),
            ImageSource::from_bytes(b"plain text".to_vec()),
            named(3, 3, "also_good.png"),
        ];
        let report = run_batch(
            &Config::default(),
            &EchoProcessor { fail: false },
            sources,
            &BatchOperation::Filter(FilterName::Grayscale),
            ExportFormat::Png,
        )
        .await;

        assert_eq!(report.total(), 3);
        assert_eq!(report.succeeded(), 2);
        assert_eq!(report.items[1].source, "batch_2");
        assert!(matches!(report.items[1].outcome, Err(Error::Decode(_))));
    }

    #[tokio::test]
    async fn adjustments_are_committed_per_image() {
        let report = run_batch(
            &Config::default(),
            &EchoProcessor { fail: false },
            vec![named(4, 4, "x.png")],
            &BatchOperation::Adjust(AdjustmentField::Brightness, 0.5),
            ExportFormat::Png,
        )
        .await;

        let exported = report.exports().next().unwrap();
        assert_eq!(exported.filename, "x_brightness_clarifi.png");
        let decoded = codec::decode(&exported.bytes, None).unwrap();
        assert_ne!(decoded, gradient(4, 4));
    }

    #[tokio::test]
    async fn remote_failures_are_reported_per_file() {
        let report = run_batch(
            &Config::default(),
            &EchoProcessor { fail: true },
            vec![named(2, 2, "one.png"), named(2, 2, "two.png")],
            &BatchOperation::Remote(RemoteRequest::colorize()),
            ExportFormat::Jpeg,
        )
        .await;

        assert_eq!(report.failed(), 2);
        for item in &report.items {
            match &item.outcome {
                Err(Error::RemoteProcessing(message)) => {
                    assert!(message.contains("connection refused"));
                }
                other => panic!("unexpected {other:?}"),
            }
        }
    }

    #[tokio::test]
    async fn remote_success_is_exported() {
        let report = run_batch(
            &Config::default(),
            &EchoProcessor { fail: false },
            vec![named(2, 2, "one.png")],
            &BatchOperation::Remote(RemoteRequest::restore()),
            ExportFormat::Png,
        )
        .await;
        assert_eq!(
            report.exports().next().map(|e| e.filename.as_str()),
            Some("one_restore_clarifi.png")
        );
    }
}
