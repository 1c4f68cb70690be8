//! Pipeline tests against a canned HTTP transport.

use demviz_dem::{BoundsInput, DemError, DemType, HttpResponse, HttpTransport};
use demviz_render::{Layer, RenderError, PREVIEW_FILE};
use demviz_runner::cli::{execute, Command};
use demviz_runner::{Config, Pipeline, RunnerError};
use std::cell::RefCell;
use std::io::Cursor;
use std::path::Path;
use tempfile::TempDir;
use tiff::encoder::{colortype, TiffEncoder};

/// Replies with a fixed response and records every URL.
struct CannedTransport {
    status: u16,
    body: Vec<u8>,
    urls: RefCell<Vec<String>>,
}

impl CannedTransport {
    fn new(status: u16, body: Vec<u8>) -> Self {
        Self {
            status,
            body,
            urls: RefCell::new(Vec::new()),
        }
    }
}

impl HttpTransport for &CannedTransport {
    fn get(&self, url: &str) -> demviz_dem::Result<HttpResponse> {
        self.urls.borrow_mut().push(url.to_string());
        Ok(HttpResponse {
            status: self.status,
            body: self.body.clone(),
        })
    }
}

fn geotiff_bytes(width: u32, height: u32) -> Vec<u8> {
    let data: Vec<f32> = (0..width * height)
        .map(|i| {
            let (r, c) = ((i / width) as f32, (i % width) as f32);
            400.0 + 10.0 * r + 0.5 * c * c
        })
        .collect();

    let mut buf = Cursor::new(Vec::new());
    let mut encoder = TiffEncoder::new(&mut buf).expect("encoder");
    encoder
        .write_image::<colortype::Gray32Float>(width, height, &data)
        .expect("write image");
    buf.into_inner()
}

fn config_in(dir: &Path) -> Config {
    let mut config = Config::default();
    config.fetch.output_path = dir.join("dem.tif");
    config.render.output_dir = dir.join("figures");
    config.render.width = 320;
    config.render.height = 240;
    config
}

#[test]
fn test_run_downloads_and_renders_in_order() {
    let dir = TempDir::new().expect("tempdir");
    let config = config_in(dir.path());
    let body = geotiff_bytes(16, 12);
    let transport = CannedTransport::new(200, body.clone());

    let pipeline = Pipeline::with_transport(&config, &transport).expect("pipeline");
    let result = pipeline
        .run(&BoundsInput::default(), DemType::Srtmgl3)
        .expect("run");

    assert_eq!(std::fs::read(&config.fetch.output_path).expect("dem file"), body);
    assert_eq!(result.dimensions, (16, 12));

    let expected: Vec<_> = Layer::ALL
        .iter()
        .map(|l| config.render.output_dir.join(l.file_name()))
        .collect();
    assert_eq!(result.figures, expected);
    assert!(expected.iter().all(|p| p.is_file()));
}

#[test]
fn test_config_key_and_endpoint_reach_the_url() {
    let dir = TempDir::new().expect("tempdir");
    let mut config = config_in(dir.path());
    config.fetch.api_key = "secret".to_string();
    config.fetch.base_url = "http://localhost:9/globaldem".to_string();
    let transport = CannedTransport::new(200, geotiff_bytes(4, 4));

    let pipeline = Pipeline::with_transport(&config, &transport).expect("pipeline");
    pipeline
        .download(&BoundsInput::default(), DemType::Cop30)
        .expect("download");

    assert_eq!(
        transport.urls.borrow().as_slice(),
        ["http://localhost:9/globaldem?demtype=COP30&south=22&north=22.5&west=85.4&east=85.8&outputFormat=GTiff&API_Key=secret"]
    );
}

#[test]
fn test_http_failure_leaves_no_file() {
    let dir = TempDir::new().expect("tempdir");
    let config = config_in(dir.path());
    let transport = CannedTransport::new(404, b"Not Found".to_vec());

    let pipeline = Pipeline::with_transport(&config, &transport).expect("pipeline");
    let err = pipeline
        .run(&BoundsInput::default(), DemType::Srtmgl3)
        .unwrap_err();

    assert!(matches!(
        err,
        RunnerError::Dem(DemError::DownloadFailed { status: 404, .. })
    ));
    assert!(!config.fetch.output_path.exists());
    assert!(!config.render.output_dir.join("dem.png").exists());
}

#[test]
fn test_invalid_bounds_never_reach_the_network() {
    let dir = TempDir::new().expect("tempdir");
    let config = config_in(dir.path());
    let transport = CannedTransport::new(200, geotiff_bytes(4, 4));
    let pipeline = Pipeline::with_transport(&config, &transport).expect("pipeline");

    let reversed = BoundsInput::new("22.5", "22.0", "85.4", "85.8");
    let err = pipeline.download(&reversed, DemType::Srtmgl3).unwrap_err();
    assert!(matches!(err, RunnerError::Dem(DemError::InvalidBounds(_))));

    let garbage = BoundsInput::new("22.0", "north", "85.4", "85.8");
    let err = pipeline.download(&garbage, DemType::Srtmgl3).unwrap_err();
    assert!(matches!(
        err,
        RunnerError::Dem(DemError::InvalidCoordinate { field: "north", .. })
    ));

    assert!(transport.urls.borrow().is_empty());
}

#[test]
fn test_render_missing_file() {
    let dir = TempDir::new().expect("tempdir");
    let config = config_in(dir.path());
    let transport = CannedTransport::new(200, Vec::new());
    let pipeline = Pipeline::with_transport(&config, &transport).expect("pipeline");

    let err = pipeline.render_file(&config.fetch.output_path).unwrap_err();
    assert!(matches!(err, RunnerError::DemFileNotFound(_)));
    assert!(err.to_string().starts_with("DEM file not found"));
}

#[test]
fn test_render_command_uses_configured_path() {
    let dir = TempDir::new().expect("tempdir");
    let config = config_in(dir.path());
    std::fs::write(&config.fetch.output_path, geotiff_bytes(8, 8)).expect("write dem");

    let transport = CannedTransport::new(500, Vec::new());
    let pipeline = Pipeline::with_transport(&config, &transport).expect("pipeline");
    execute(&Command::Render { input: None }, &config, pipeline).expect("render");

    assert!(config.render.output_dir.join("risk.png").is_file());
    assert!(transport.urls.borrow().is_empty());
}

#[test]
fn test_preview_plots_unordered_bounds() {
    let dir = TempDir::new().expect("tempdir");
    let config = config_in(dir.path());
    let transport = CannedTransport::new(200, Vec::new());
    let pipeline = Pipeline::with_transport(&config, &transport).expect("pipeline");

    // south > north is fine for preview
    let preview = pipeline
        .preview(&BoundsInput::new(" 10 ", "5", "1", "2"))
        .expect("preview");
    assert_eq!(preview.points.len(), 4);
    assert_eq!(preview.points[0].lat, 10.0);
    assert_eq!(preview.points[0].lon, 2.0);
    assert_eq!(preview.path, config.render.output_dir.join(PREVIEW_FILE));
}

#[test]
fn test_preview_rejects_text_without_plotting() {
    let dir = TempDir::new().expect("tempdir");
    let config = config_in(dir.path());
    let transport = CannedTransport::new(200, Vec::new());
    let pipeline = Pipeline::with_transport(&config, &transport).expect("pipeline");

    let err = pipeline
        .preview(&BoundsInput::new("22.0", "22.5", "", "85.8"))
        .unwrap_err();
    assert!(matches!(
        err,
        RunnerError::Dem(DemError::InvalidCoordinate { field: "west", .. })
    ));
    assert!(!config.render.output_dir.join(PREVIEW_FILE).exists());
}

#[test]
fn test_list_types_needs_no_network() {
    let dir = TempDir::new().expect("tempdir");
    let config = config_in(dir.path());
    let transport = CannedTransport::new(500, Vec::new());
    let pipeline = Pipeline::with_transport(&config, &transport).expect("pipeline");

    execute(&Command::ListTypes, &config, pipeline).expect("list types");
    assert!(transport.urls.borrow().is_empty());
}

fn with_missing_font(dir: &Path) -> Config {
    let mut config = config_in(dir);
    config.render.font_path = Some(dir.join("no-such-font.ttf"));
    config
}

#[test]
fn test_missing_font_only_fails_drawing_commands() {
    let dir = TempDir::new().expect("tempdir");
    let config = with_missing_font(dir.path());
    let body = geotiff_bytes(4, 4);
    let transport = CannedTransport::new(200, body.clone());

    let pipeline = Pipeline::with_transport(&config, &transport).expect("pipeline");
    execute(&Command::ListTypes, &config, pipeline).expect("list types");

    let pipeline = Pipeline::with_transport(&config, &transport).expect("pipeline");
    pipeline
        .download(&BoundsInput::default(), DemType::Srtmgl3)
        .expect("download");
    assert_eq!(std::fs::read(&config.fetch.output_path).expect("dem file"), body);

    let err = pipeline.preview(&BoundsInput::default()).unwrap_err();
    assert!(matches!(err, RunnerError::Render(RenderError::FontNotFound(_))));
    assert!(!config.render.output_dir.exists());
}

#[test]
fn test_missing_font_stops_run_before_download() {
    let dir = TempDir::new().expect("tempdir");
    let config = with_missing_font(dir.path());
    let transport = CannedTransport::new(200, geotiff_bytes(4, 4));
    let pipeline = Pipeline::with_transport(&config, &transport).expect("pipeline");

    let err = pipeline
        .run(&BoundsInput::default(), DemType::Srtmgl3)
        .unwrap_err();
    assert!(matches!(err, RunnerError::Render(RenderError::FontNotFound(_))));
    assert!(transport.urls.borrow().is_empty());
    assert!(!config.fetch.output_path.exists());
}
