use crate::domain::model::ImportReport;
use crate::domain::ports::ImportPipeline;
use crate::utils::error::Result;

pub struct ImportEngine<P: ImportPipeline> {
    pipeline: P,
}

impl<P: ImportPipeline> ImportEngine<P> {
    pub fn new(pipeline: P) -> Self {
        Self { pipeline }
    }

    pub fn pipeline(&self) -> &P {
        &self.pipeline
    }

    pub async fn run(&self) -> Result<ImportReport> {
        tracing::info!("Starting user import");

        let rows = self.pipeline.extract().await?;
        tracing::info!("Read {} rows", rows.len());

        let (records, report) = self.pipeline.transform(rows).await?;
        tracing::info!(
            "Prepared {} users ({} short rows skipped)",
            records.len(),
            report.skipped_short
        );

        let report = self.pipeline.load(records, report).await?;
        tracing::info!(
            imported = report.imported,
            duplicates = report.skipped_duplicate,
            "Import finished"
        );

        Ok(report)
    }
}
