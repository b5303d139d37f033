use crate::core::Pipeline;
use crate::utils::error::Result;
use std::time::Instant;

pub struct GeofenceEngine<P: Pipeline> {
    pipeline: P,
}

impl<P: Pipeline> GeofenceEngine<P> {
    pub fn new(pipeline: P) -> Self {
        Self { pipeline }
    }

    pub async fn run(&self) -> Result<String> {
        let started = Instant::now();
        tracing::info!("Starting check-in evaluation");

        let check_ins = self.pipeline.extract().await?;
        tracing::info!("Extracted {} check-ins", check_ins.len());

        let report = self.pipeline.transform(check_ins).await?;
        tracing::info!(
            within = report.summary.within,
            outside = report.summary.outside,
            rejected = report.summary.rejected,
            "Evaluated {} check-ins",
            report.summary.total
        );

        let output_path = self.pipeline.load(report).await?;
        tracing::info!(
            "Report saved to: {} ({:?})",
            output_path,
            started.elapsed()
        );

        Ok(output_path)
    }
}
