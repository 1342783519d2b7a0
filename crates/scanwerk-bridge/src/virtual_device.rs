// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Virtual scanner — a software device subsystem that "captures" rendered
// test-pattern pages and writes them through the document writer.
//
// It honours the acquisition characteristics the same way a driver-backed
// source would: page count, pixel type, output name and encoding, and
// directory auto-creation. It has no native interface, so a request to show
// one is logged and ignored.

use std::path::{Path, PathBuf};

use chrono::Utc;
use scanwerk_core::characteristics::AcquisitionCharacteristics;
use scanwerk_core::error::{AcquisitionErrorKind, ErrorCode, Result, ScanwerkError};
use scanwerk_core::types::{
    AcquisitionOutcome, AppInfo, CaptureMode, EncodingCatalogEntry, FileType, SourceInfo,
    SourceSelection, catalog_from_file_types,
};
use scanwerk_document::{ImageFileWriter, PageRenderer};
use tracing::{debug, info, warn};

use crate::traits::{DeviceSource, DeviceSubsystem, SourceChooser};

/// Settings for the virtual scanner.
#[derive(Debug, Clone)]
pub struct VirtualDeviceConfig {
    pub sources: Vec<SourceInfo>,
    /// Page size in pixels.
    pub page_width: u32,
    pub page_height: u32,
    /// Nominal capture resolution (used for PDF page sizing).
    pub dpi: f32,
    pub jpeg_quality: u8,
    /// Encodings reported for single-page runs, in report order.
    pub single_page_types: Vec<FileType>,
    /// Encodings reported for multi-page runs, in report order.
    pub multi_page_types: Vec<FileType>,
}

impl Default for VirtualDeviceConfig {
    fn default() -> Self {
        let renderer = PageRenderer::letter_preview();
        Self {
            sources: vec![
                SourceInfo {
                    id: "virtual-flatbed".into(),
                    product_name: "Virtual Flatbed".into(),
                    manufacturer: "Scanwerk".into(),
                    product_family: "Virtual Scanner".into(),
                    has_feeder: false,
                },
                SourceInfo {
                    id: "virtual-feeder".into(),
                    product_name: "Virtual Document Feeder".into(),
                    manufacturer: "Scanwerk".into(),
                    product_family: "Virtual Scanner".into(),
                    has_feeder: true,
                },
            ],
            page_width: renderer.width(),
            page_height: renderer.height(),
            dpi: 50.0,
            jpeg_quality: 85,
            single_page_types: FileType::SINGLE_PAGE.to_vec(),
            multi_page_types: FileType::MULTI_PAGE.to_vec(),
        }
    }
}

/// Software device subsystem.
pub struct VirtualSubsystem {
    config: VirtualDeviceConfig,
    chooser: Box<dyn SourceChooser>,
    started: bool,
    temporary_directory: Option<PathBuf>,
    last_error: ErrorCode,
}

impl VirtualSubsystem {
    pub fn new(config: VirtualDeviceConfig, chooser: Box<dyn SourceChooser>) -> Self {
        Self {
            config,
            chooser,
            started: false,
            temporary_directory: None,
            last_error: ErrorCode::None,
        }
    }

    /// Directory most recently passed to `set_temporary_directory`.
    pub fn temporary_directory(&self) -> Option<&Path> {
        self.temporary_directory.as_deref()
    }

    fn record<T>(&mut self, result: Result<T>) -> Result<T> {
        if let Err(ref err) = result {
            self.last_error = err.code();
        }
        result
    }

    fn ensure_started(&self) -> Result<()> {
        if self.started {
            Ok(())
        } else {
            Err(ScanwerkError::SessionNotStarted)
        }
    }
}

impl DeviceSubsystem for VirtualSubsystem {
    fn platform_name(&self) -> &str {
        "Virtual scanner"
    }

    fn start(&mut self, app_info: &AppInfo) -> Result<()> {
        let result = if self.config.sources.is_empty() {
            Err(ScanwerkError::DriverMissing(
                "virtual subsystem has no sources configured".into(),
            ))
        } else {
            info!(product = %app_info.product_name, "Virtual subsystem started");
            self.started = true;
            Ok(())
        };
        self.record(result)
    }

    fn available_sources(&self) -> Result<Vec<SourceInfo>> {
        self.ensure_started()?;
        Ok(self.config.sources.clone())
    }

    fn select_source(&mut self) -> Result<SourceSelection> {
        let result = self.ensure_started().and_then(|()| {
            let sources = &self.config.sources;
            match self.chooser.choose(sources)? {
                None => Ok(SourceSelection::Canceled),
                Some(index) => sources
                    .get(index)
                    .cloned()
                    .map(SourceSelection::Selected)
                    .ok_or_else(|| {
                        ScanwerkError::SourceOpen(format!(
                            "chooser returned index {index} of {} sources",
                            sources.len()
                        ))
                    }),
            }
        });
        self.record(result)
    }

    fn open_source(&mut self, info: &SourceInfo) -> Result<Box<dyn DeviceSource>> {
        let result = self.ensure_started().and_then(|()| {
            self.config
                .sources
                .iter()
                .find(|s| s.id == info.id)
                .cloned()
                .ok_or_else(|| ScanwerkError::SourceOpen(format!("{} is not attached", info.id)))
        });
        let found = self.record(result)?;
        info!(source = %found.product_name, "Virtual source opened");
        Ok(Box::new(VirtualSource::new(found, &self.config)))
    }

    fn set_temporary_directory(&mut self, path: &Path) -> Result<()> {
        let result = self.ensure_started();
        self.record(result)?;
        debug!(path = %path.display(), "Temporary directory set");
        self.temporary_directory = Some(path.to_path_buf());
        Ok(())
    }

    fn filetype_info(&self, mode: CaptureMode) -> Result<Vec<EncodingCatalogEntry>> {
        self.ensure_started()?;
        let types = match mode {
            CaptureMode::SinglePage => &self.config.single_page_types,
            CaptureMode::MultiPage => &self.config.multi_page_types,
        };
        Ok(catalog_from_file_types(types))
    }

    fn last_error(&self) -> ErrorCode {
        self.last_error
    }
}

/// One opened virtual source.
pub struct VirtualSource {
    info: SourceInfo,
    renderer: PageRenderer,
    writer: ImageFileWriter,
}

impl VirtualSource {
    fn new(info: SourceInfo, config: &VirtualDeviceConfig) -> Self {
        Self {
            info,
            renderer: PageRenderer::new(config.page_width, config.page_height),
            writer: ImageFileWriter::new(config.dpi).with_jpeg_quality(config.jpeg_quality),
        }
    }
}

impl DeviceSource for VirtualSource {
    fn info(&self) -> &SourceInfo {
        &self.info
    }

    fn acquire(
        &mut self,
        characteristics: &AcquisitionCharacteristics,
    ) -> Result<AcquisitionOutcome> {
        let transfer = &characteristics.file_transfer;
        let general = &characteristics.general;

        if characteristics.interaction.show_native_ui {
            warn!(source = %self.info.product_name, "Virtual source has no native UI; capturing headless");
        }
        if transfer.name.as_os_str().is_empty() {
            return Err(ScanwerkError::acquisition(
                AcquisitionErrorKind::OutputUnwritable,
                "no output file name set",
            ));
        }
        if general.max_page_count == 0 {
            return Err(ScanwerkError::acquisition(
                AcquisitionErrorKind::PageLimitExceeded,
                "max page count is zero",
            ));
        }

        prepare_output_directory(&transfer.name, transfer.auto_create_directory)?;

        let pages = self.renderer.render_pages(general.max_page_count);
        let written = self
            .writer
            .write(&pages, transfer.file_type, general.pixel_type, &transfer.name)
            .map_err(into_acquisition_error)?;

        Ok(AcquisitionOutcome {
            file: written.path,
            pages: written.pages,
            bytes: written.bytes,
            sha256: written.sha256,
            captured_at: Utc::now(),
        })
    }
}

/// Make sure the parent directory of `file` exists, creating it when allowed.
fn prepare_output_directory(file: &Path, auto_create: bool) -> Result<()> {
    let Some(parent) = file.parent().filter(|p| !p.as_os_str().is_empty()) else {
        return Ok(());
    };
    if parent.is_dir() {
        return Ok(());
    }
    if !auto_create {
        return Err(ScanwerkError::acquisition(
            AcquisitionErrorKind::OutputUnwritable,
            format!("{} does not exist", parent.display()),
        ));
    }
    std::fs::create_dir_all(parent).map_err(|err| {
        ScanwerkError::acquisition(
            AcquisitionErrorKind::OutputUnwritable,
            format!("cannot create {}: {err}", parent.display()),
        )
    })?;
    debug!(path = %parent.display(), "Created output directory");
    Ok(())
}

/// Normalise writer errors into `ScanwerkError::Acquisition`.
fn into_acquisition_error(err: ScanwerkError) -> ScanwerkError {
    match err.acquisition_kind() {
        Some(kind) if !matches!(err, ScanwerkError::Acquisition { .. }) => {
            ScanwerkError::acquisition(kind, err.to_string())
        }
        _ => err,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::traits::FirstSourceChooser;
    use scanwerk_core::types::PixelType;

    struct DismissingChooser;

    impl SourceChooser for DismissingChooser {
        fn choose(&self, _sources: &[SourceInfo]) -> Result<Option<usize>> {
            Ok(None)
        }
    }

    fn small_config() -> VirtualDeviceConfig {
        VirtualDeviceConfig {
            page_width: 96,
            page_height: 128,
            ..VirtualDeviceConfig::default()
        }
    }

    fn started(chooser: Box<dyn SourceChooser>) -> VirtualSubsystem {
        let mut subsystem = VirtualSubsystem::new(small_config(), chooser);
        subsystem.start(&AppInfo::default()).expect("start");
        subsystem
    }

    fn characteristics(path: PathBuf, file_type: FileType, pixel: PixelType) -> AcquisitionCharacteristics {
        let mut ac = AcquisitionCharacteristics::default();
        ac.file_transfer_options()
            .set_name(path)
            .set_type(file_type)
            .enable_autocreate_directory(true);
        ac.general_options().set_max_page_count(1).set_pixel_type(pixel);
        ac
    }

    #[test]
    fn operations_before_start_fail() {
        let mut subsystem = VirtualSubsystem::new(small_config(), Box::new(FirstSourceChooser));
        assert!(matches!(subsystem.select_source(), Err(ScanwerkError::SessionNotStarted)));
        assert_eq!(subsystem.last_error(), ErrorCode::SessionNotStarted);
    }

    #[test]
    fn start_without_sources_reports_missing_driver() {
        let config = VirtualDeviceConfig {
            sources: Vec::new(),
            ..small_config()
        };
        let mut subsystem = VirtualSubsystem::new(config, Box::new(FirstSourceChooser));
        assert!(subsystem.start(&AppInfo::default()).is_err());
        assert_eq!(subsystem.last_error(), ErrorCode::DriverMissing);
    }

    #[test]
    fn dismissed_chooser_is_a_cancellation() {
        let mut subsystem = started(Box::new(DismissingChooser));
        assert!(subsystem.select_source().expect("select").is_canceled());
    }

    #[test]
    fn catalogs_follow_configured_order() {
        let config = VirtualDeviceConfig {
            single_page_types: vec![FileType::TiffGroup4, FileType::Jpeg],
            ..small_config()
        };
        let mut subsystem = VirtualSubsystem::new(config, Box::new(FirstSourceChooser));
        subsystem.start(&AppInfo::default()).expect("start");
        let names: Vec<String> = subsystem
            .filetype_info(CaptureMode::SinglePage)
            .expect("catalog")
            .into_iter()
            .map(|e| e.name)
            .collect();
        assert_eq!(names, ["TIFF_G4", "JPEG"]);
    }

    #[test]
    fn opening_an_unknown_source_fails() {
        let mut subsystem = started(Box::new(FirstSourceChooser));
        let ghost = SourceInfo {
            id: "ghost".into(),
            product_name: "Ghost".into(),
            manufacturer: String::new(),
            product_family: String::new(),
            has_feeder: false,
        };
        assert!(matches!(subsystem.open_source(&ghost), Err(ScanwerkError::SourceOpen(_))));
        assert_eq!(subsystem.last_error(), ErrorCode::SourceUnavailable);
    }

    #[test]
    fn acquire_writes_file_into_auto_created_directory() {
        let dir = tempfile::tempdir().expect("tempdir");
        let mut subsystem = started(Box::new(FirstSourceChooser));
        let SourceSelection::Selected(info) = subsystem.select_source().expect("select") else {
            panic!("first-source chooser never cancels");
        };
        let mut source = subsystem.open_source(&info).expect("open");

        let target = dir.path().join("Single").join("PNG.png");
        let outcome = source
            .acquire(&characteristics(target.clone(), FileType::Png, PixelType::DefaultColor))
            .expect("acquire");

        assert_eq!(outcome.file, target);
        assert_eq!(outcome.pages, 1);
        assert!(target.is_file());
        let decoded = image::open(&target).expect("decode");
        assert_eq!(decoded.width(), 96);
    }

    #[test]
    fn missing_directory_without_auto_create_is_unwritable() {
        let dir = tempfile::tempdir().expect("tempdir");
        let mut subsystem = started(Box::new(FirstSourceChooser));
        let info = subsystem.available_sources().expect("sources")[0].clone();
        let mut source = subsystem.open_source(&info).expect("open");

        let mut ac = characteristics(dir.path().join("nope").join("BMP.bmp"), FileType::Bmp, PixelType::DefaultColor);
        ac.file_transfer_options().enable_autocreate_directory(false);

        let err = source.acquire(&ac).unwrap_err();
        assert_eq!(err.acquisition_kind(), Some(AcquisitionErrorKind::OutputUnwritable));
    }

    #[test]
    fn colour_capture_into_bitonal_format_fails_to_encode() {
        let dir = tempfile::tempdir().expect("tempdir");
        let mut subsystem = started(Box::new(FirstSourceChooser));
        let info = subsystem.available_sources().expect("sources")[0].clone();
        let mut source = subsystem.open_source(&info).expect("open");

        let ac = characteristics(dir.path().join("TIFF_G4.tif"), FileType::TiffGroup4, PixelType::DefaultColor);
        let err = source.acquire(&ac).unwrap_err();
        assert!(matches!(
            err,
            ScanwerkError::Acquisition { kind: AcquisitionErrorKind::EncodingFailed, .. }
        ));
    }

    #[test]
    fn multiple_pages_into_single_page_format_exceeds_limit() {
        let dir = tempfile::tempdir().expect("tempdir");
        let mut subsystem = started(Box::new(FirstSourceChooser));
        let info = subsystem.available_sources().expect("sources")[0].clone();
        let mut source = subsystem.open_source(&info).expect("open");

        let mut ac = characteristics(dir.path().join("PNG.png"), FileType::Png, PixelType::DefaultColor);
        ac.general_options().set_max_page_count(2);
        let err = source.acquire(&ac).unwrap_err();
        assert_eq!(err.acquisition_kind(), Some(AcquisitionErrorKind::PageLimitExceeded));
    }
}
