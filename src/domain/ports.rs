use crate::domain::model::{CheckIn, CheckInReport, Workplace};
use crate::utils::error::Result;
use async_trait::async_trait;

pub trait Storage: Send + Sync {
    fn read_file(&self, path: &str) -> impl std::future::Future<Output = Result<Vec<u8>>> + Send;
    fn write_file(
        &self,
        path: &str,
        data: &[u8],
    ) -> impl std::future::Future<Output = Result<()>> + Send;
}

pub trait ConfigProvider: Send + Sync {
    fn input_path(&self) -> &str;
    fn output_path(&self) -> &str;
    fn output_formats(&self) -> &[String];
    /// File name used for `format` inside the output directory or archive.
    fn output_filename(&self, format: &str) -> String;
    /// Archive file name when outputs are bundled into a ZIP.
    fn compression_filename(&self) -> Option<&str>;
    fn max_records(&self) -> Option<usize>;
    fn strict(&self) -> bool;
    fn tolerance_m(&self) -> f64;
    fn workplaces(&self) -> Result<Vec<Workplace>>;
}

#[async_trait]
pub trait Pipeline: Send + Sync {
    async fn extract(&self) -> Result<Vec<CheckIn>>;
    async fn transform(&self, data: Vec<CheckIn>) -> Result<CheckInReport>;
    async fn load(&self, report: CheckInReport) -> Result<String>;
}
