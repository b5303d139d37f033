use crate::core::geofence::GeofencePolicy;
use crate::core::{CheckIn, CheckInReport, ConfigProvider, Pipeline, Storage};
use crate::domain::model::{CheckInOutcome, EvaluatedCheckIn, Workplace};
use crate::utils::error::{GeoError, Result};
use std::collections::HashMap;
use std::io::Write;
use std::path::Path;
use zip::write::{SimpleFileOptions, ZipWriter};

pub const SUPPORTED_FORMATS: [&str; 3] = ["csv", "tsv", "json"];

/// Reads clock-in events, checks each against its workplace geofence, and writes a report.
pub struct CheckInPipeline<S: Storage, C: ConfigProvider> {
    storage: S,
    config: C,
    workplaces: Vec<Workplace>,
    policy: GeofencePolicy,
}

impl<S: Storage, C: ConfigProvider> CheckInPipeline<S, C> {
    pub fn new(storage: S, config: C) -> Result<Self> {
        let workplaces = config.workplaces()?;
        let policy = GeofencePolicy::new(config.tolerance_m())?;
        Ok(Self {
            storage,
            config,
            workplaces,
            policy,
        })
    }

    fn evaluate(&self, index: &HashMap<&str, &Workplace>, check_in: CheckIn) -> EvaluatedCheckIn {
        let point = match check_in.coordinate() {
            Ok(point) => point,
            Err(e) => {
                return EvaluatedCheckIn::rejected(check_in, format!("invalid coordinate: {}", e))
            }
        };

        let resolved = match check_in.workplace_id.as_deref() {
            Some(id) => match index.get(id) {
                Some(workplace) => Some((*workplace, self.policy.evaluate(workplace, &point))),
                None => {
                    let reason = format!("unknown workplace '{}'", id);
                    return EvaluatedCheckIn::rejected(check_in, reason);
                }
            },
            None => self.policy.evaluate_nearest(&self.workplaces, &point),
        };

        let Some((workplace, check)) = resolved else {
            return EvaluatedCheckIn::rejected(check_in, "no workplaces configured".to_string());
        };

        EvaluatedCheckIn {
            employee_id: check_in.employee_id,
            recorded_at: check_in.recorded_at,
            latitude: check_in.latitude,
            longitude: check_in.longitude,
            workplace_id: Some(workplace.id.clone()),
            distance_m: Some(check.distance_m),
            outcome: if check.inside {
                CheckInOutcome::Within
            } else {
                CheckInOutcome::Outside
            },
            reason: None,
        }
    }

    fn render(&self, format: &str, report: &CheckInReport) -> Result<Vec<u8>> {
        match format {
            "csv" => render_delimited(report, b','),
            "tsv" => render_delimited(report, b'\t'),
            "json" => Ok(serde_json::to_vec_pretty(report)?),
            other => Err(GeoError::InvalidConfigValueError {
                field: "output.formats".to_string(),
                value: other.to_string(),
                reason: format!(
                    "Unsupported format. Valid formats: {}",
                    SUPPORTED_FORMATS.join(", ")
                ),
            }),
        }
    }

    fn output_file(&self, filename: &str) -> String {
        Path::new(self.config.output_path())
            .join(filename)
            .to_string_lossy()
            .into_owned()
    }
}

fn render_delimited(report: &CheckInReport, delimiter: u8) -> Result<Vec<u8>> {
    let mut writer = csv::WriterBuilder::new()
        .delimiter(delimiter)
        .from_writer(Vec::new());
    for entry in &report.entries {
        writer.serialize(entry)?;
    }
    writer
        .into_inner()
        .map_err(|e| GeoError::IoError(e.into_error()))
}

#[async_trait::async_trait]
impl<S: Storage, C: ConfigProvider> Pipeline for CheckInPipeline<S, C> {
    async fn extract(&self) -> Result<Vec<CheckIn>> {
        tracing::debug!("Reading check-ins from: {}", self.config.input_path());
        let data = self.storage.read_file(self.config.input_path()).await?;

        let mut reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_reader(data.as_slice());

        let mut records = Vec::new();
        for row in reader.deserialize::<CheckIn>() {
            if let Some(max) = self.config.max_records() {
                if records.len() >= max {
                    tracing::info!("Reached max_records limit of {}", max);
                    break;
                }
            }
            records.push(row?);
        }

        Ok(records)
    }

    async fn transform(&self, data: Vec<CheckIn>) -> Result<CheckInReport> {
        let index: HashMap<&str, &Workplace> = self
            .workplaces
            .iter()
            .map(|workplace| (workplace.id.as_str(), workplace))
            .collect();

        let mut entries = Vec::with_capacity(data.len());
        for check_in in data {
            let evaluated = self.evaluate(&index, check_in);

            if evaluated.outcome == CheckInOutcome::Rejected {
                let reason = evaluated.reason.as_deref().unwrap_or("rejected");
                if self.config.strict() {
                    return Err(GeoError::ProcessingError {
                        message: format!(
                            "check-in by '{}' at {}: {}",
                            evaluated.employee_id, evaluated.recorded_at, reason
                        ),
                    });
                }
                tracing::warn!(
                    employee_id = %evaluated.employee_id,
                    "Rejected check-in: {}",
                    reason
                );
            }

            entries.push(evaluated);
        }

        Ok(CheckInReport::new(entries))
    }

    async fn load(&self, report: CheckInReport) -> Result<String> {
        let formats = self.config.output_formats();
        let rendered = formats
            .iter()
            .map(|format| -> Result<(String, Vec<u8>)> {
                let bytes = self.render(format, &report)?;
                Ok((self.config.output_filename(format), bytes))
            })
            .collect::<Result<Vec<(String, Vec<u8>)>>>()?;

        if let Some(archive_name) = self.config.compression_filename() {
            tracing::debug!("Creating ZIP file with {} files", rendered.len());

            let zip_data = {
                let mut zip = ZipWriter::new(std::io::Cursor::new(Vec::new()));
                for (name, bytes) in &rendered {
                    zip.start_file(name.as_str(), SimpleFileOptions::default())?;
                    zip.write_all(bytes)?;
                }
                zip.finish()?.into_inner()
            };

            let path = self.output_file(archive_name);
            tracing::debug!("Writing ZIP file ({} bytes) to {}", zip_data.len(), path);
            self.storage.write_file(&path, &zip_data).await?;
            return Ok(path);
        }

        let mut primary = None;
        for (name, bytes) in &rendered {
            let path = self.output_file(name);
            tracing::debug!("Writing {} ({} bytes)", path, bytes.len());
            self.storage.write_file(&path, bytes).await?;
            primary.get_or_insert(path);
        }

        primary.ok_or_else(|| GeoError::MissingConfigError {
            field: "output.formats".to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::GeoCoordinate;
    use std::sync::Arc;
    use tokio::sync::Mutex;

    #[derive(Clone)]
    struct MockStorage {
        files: Arc<Mutex<HashMap<String, Vec<u8>>>>,
    }

    impl MockStorage {
        fn with_input(path: &str, contents: &str) -> Self {
            let mut files = HashMap::new();
            files.insert(path.to_string(), contents.as_bytes().to_vec());
            Self {
                files: Arc::new(Mutex::new(files)),
            }
        }

        async fn get_file(&self, path: &str) -> Option<Vec<u8>> {
            let files = self.files.lock().await;
            files.get(path).cloned()
        }
    }

    impl Storage for MockStorage {
        async fn read_file(&self, path: &str) -> Result<Vec<u8>> {
            let files = self.files.lock().await;
            files.get(path).cloned().ok_or_else(|| {
                GeoError::IoError(std::io::Error::new(
                    std::io::ErrorKind::NotFound,
                    format!("File not found: {}", path),
                ))
            })
        }

        async fn write_file(&self, path: &str, data: &[u8]) -> Result<()> {
            let mut files = self.files.lock().await;
            files.insert(path.to_string(), data.to_vec());
            Ok(())
        }
    }

    struct MockConfig {
        formats: Vec<String>,
        compression: Option<String>,
        max_records: Option<usize>,
        strict: bool,
        tolerance_m: f64,
        workplaces: Vec<Workplace>,
    }

    impl MockConfig {
        fn new() -> Self {
            Self {
                formats: vec!["csv".to_string()],
                compression: None,
                max_records: None,
                strict: false,
                tolerance_m: 0.0,
                workplaces: vec![
                    Workplace::new("hq", "Head office", GeoCoordinate::new(51.5074, -0.1278).unwrap(), 150.0)
                        .unwrap(),
                    Workplace::new("paris", "Paris branch", GeoCoordinate::new(48.8566, 2.3522).unwrap(), 300.0)
                        .unwrap(),
                ],
            }
        }
    }

    impl ConfigProvider for MockConfig {
        fn input_path(&self) -> &str {
            "checkins.csv"
        }

        fn output_path(&self) -> &str {
            "out"
        }

        fn output_formats(&self) -> &[String] {
            &self.formats
        }

        fn output_filename(&self, format: &str) -> String {
            format!("report.{}", format)
        }

        fn compression_filename(&self) -> Option<&str> {
            self.compression.as_deref()
        }

        fn max_records(&self) -> Option<usize> {
            self.max_records
        }

        fn strict(&self) -> bool {
            self.strict
        }

        fn tolerance_m(&self) -> f64 {
            self.tolerance_m
        }

        fn workplaces(&self) -> Result<Vec<Workplace>> {
            Ok(self.workplaces.clone())
        }
    }

    const INPUT: &str = "\
employee_id,workplace_id,recorded_at,latitude,longitude
e1,hq,2024-03-01T08:59:00Z,51.5075,-0.1279
e2,hq,2024-03-01T09:02:00Z,51.5200,-0.1278
e3,,2024-03-01T09:05:00Z,48.8567,2.3523
e4,hq,2024-03-01T09:07:00Z,95.0,0.0
e5,berlin,2024-03-01T09:09:00Z,52.52,13.405
";

    fn pipeline(config: MockConfig) -> (CheckInPipeline<MockStorage, MockConfig>, MockStorage) {
        let storage = MockStorage::with_input("checkins.csv", INPUT);
        (CheckInPipeline::new(storage.clone(), config).unwrap(), storage)
    }

    #[tokio::test]
    async fn test_extract_parses_rows() {
        let (pipeline, _) = pipeline(MockConfig::new());
        let rows = pipeline.extract().await.unwrap();
        assert_eq!(rows.len(), 5);
        assert_eq!(rows[0].workplace_id.as_deref(), Some("hq"));
        assert_eq!(rows[2].workplace_id, None);
        assert_eq!(rows[3].latitude, 95.0);
    }

    #[tokio::test]
    async fn test_extract_respects_max_records() {
        let mut config = MockConfig::new();
        config.max_records = Some(2);
        let (pipeline, _) = pipeline(config);
        assert_eq!(pipeline.extract().await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_extract_missing_input() {
        let storage = MockStorage::with_input("other.csv", INPUT);
        let pipeline = CheckInPipeline::new(storage, MockConfig::new()).unwrap();
        assert!(matches!(pipeline.extract().await, Err(GeoError::IoError(_))));
    }

    #[tokio::test]
    async fn test_transform_outcomes() {
        let (pipeline, _) = pipeline(MockConfig::new());
        let rows = pipeline.extract().await.unwrap();
        let report = pipeline.transform(rows).await.unwrap();

        let outcomes: Vec<CheckInOutcome> = report.entries.iter().map(|e| e.outcome).collect();
        assert_eq!(
            outcomes,
            vec![
                CheckInOutcome::Within,
                CheckInOutcome::Outside,
                CheckInOutcome::Within,
                CheckInOutcome::Rejected,
                CheckInOutcome::Rejected,
            ]
        );

        assert_eq!(report.entries[2].workplace_id.as_deref(), Some("paris"));
        assert!(report.entries[3]
            .reason
            .as_deref()
            .unwrap()
            .starts_with("invalid coordinate"));
        assert!(report.entries[4].reason.as_deref().unwrap().contains("berlin"));
        assert_eq!(report.summary.within, 2);
        assert_eq!(report.summary.outside, 1);
        assert_eq!(report.summary.rejected, 2);
    }

    #[tokio::test]
    async fn test_tolerance_changes_outcome() {
        let mut config = MockConfig::new();
        // e2 is roughly 1.4 km north of hq
        config.tolerance_m = 2_000.0;
        let (pipeline, _) = pipeline(config);
        let rows = pipeline.extract().await.unwrap();
        let report = pipeline.transform(rows).await.unwrap();
        assert_eq!(report.entries[1].outcome, CheckInOutcome::Within);
    }

    #[tokio::test]
    async fn test_strict_mode_aborts_on_rejection() {
        let mut config = MockConfig::new();
        config.strict = true;
        let (pipeline, _) = pipeline(config);
        let rows = pipeline.extract().await.unwrap();
        match pipeline.transform(rows).await {
            Err(GeoError::ProcessingError { message }) => assert!(message.contains("e4")),
            other => panic!("expected ProcessingError, got {:?}", other.map(|r| r.summary)),
        }
    }

    #[tokio::test]
    async fn test_load_writes_each_format() {
        let mut config = MockConfig::new();
        config.formats = vec!["csv".to_string(), "tsv".to_string(), "json".to_string()];
        let (pipeline, storage) = pipeline(config);
        let rows = pipeline.extract().await.unwrap();
        let report = pipeline.transform(rows).await.unwrap();
        let path = pipeline.load(report).await.unwrap();

        assert_eq!(path, Path::new("out").join("report.csv").to_string_lossy());

        let csv = String::from_utf8(storage.get_file(&path).await.unwrap()).unwrap();
        assert!(csv.starts_with("employee_id,recorded_at,latitude,longitude,workplace_id,distance_m,outcome,reason"));
        assert!(csv.contains("within"));
        assert!(csv.contains("unknown workplace 'berlin'"));

        let tsv_path = Path::new("out").join("report.tsv").to_string_lossy().into_owned();
        let tsv = String::from_utf8(storage.get_file(&tsv_path).await.unwrap()).unwrap();
        assert!(tsv.starts_with("employee_id\trecorded_at"));

        let json_path = Path::new("out").join("report.json").to_string_lossy().into_owned();
        let json: serde_json::Value =
            serde_json::from_slice(&storage.get_file(&json_path).await.unwrap()).unwrap();
        assert_eq!(json["summary"]["total"], 5);
        assert_eq!(json["entries"][0]["outcome"], "within");
    }

    #[tokio::test]
    async fn test_load_bundles_zip() {
        let mut config = MockConfig::new();
        config.formats = vec!["csv".to_string(), "json".to_string()];
        config.compression = Some("bundle.zip".to_string());
        let (pipeline, storage) = pipeline(config);
        let rows = pipeline.extract().await.unwrap();
        let report = pipeline.transform(rows).await.unwrap();
        let path = pipeline.load(report).await.unwrap();

        assert!(path.ends_with("bundle.zip"));
        let data = storage.get_file(&path).await.unwrap();
        let archive = zip::ZipArchive::new(std::io::Cursor::new(data)).unwrap();
        let names: Vec<&str> = archive.file_names().collect();
        assert!(names.contains(&"report.csv"));
        assert!(names.contains(&"report.json"));
    }

    #[tokio::test]
    async fn test_transform_without_workplaces() {
        let mut config = MockConfig::new();
        config.workplaces.clear();
        let (pipeline, _) = pipeline(config);
        let rows = vec![CheckIn {
            employee_id: "e9".to_string(),
            workplace_id: None,
            recorded_at: chrono::Utc::now(),
            latitude: 51.5074,
            longitude: -0.1278,
        }];

        let report = pipeline.transform(rows).await.unwrap();
        assert_eq!(report.summary.rejected, 1);
        assert_eq!(report.entries[0].outcome, CheckInOutcome::Rejected);
        assert_eq!(report.entries[0].reason.as_deref(), Some("no workplaces configured"));
        assert_eq!(report.entries[0].distance_m, None);
    }

    #[tokio::test]
    async fn test_load_rejects_unknown_format() {
        let mut config = MockConfig::new();
        config.formats = vec!["xml".to_string()];
        let (pipeline, _) = pipeline(config);
        let report = pipeline.transform(Vec::new()).await.unwrap();
        assert!(matches!(
            pipeline.load(report).await,
            Err(GeoError::InvalidConfigValueError { .. })
        ));
    }
}
