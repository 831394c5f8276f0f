//! Test harness for isolated pipeline runs.
//!
//! The `TestHarness` provides:
//! - A temporary directory for config files and document fixtures
//! - An orchestrator wired to a scripted transport and a recording reporter

#![allow(dead_code)]

use std::path::PathBuf;
use std::sync::Arc;

use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Document, Object, Stream};
use tempfile::TempDir;

use threadcraft::config::schema::Config;
use threadcraft::pipeline::{Orchestrator, ProgressEvent, RecordingProgress};
use threadcraft::ScriptedTransport;

use super::builders::ConfigBuilder;

pub struct TestHarness {
    temp_dir: TempDir,
    pub config: Config,
    pub progress: Arc<RecordingProgress>,
}

impl TestHarness {
    pub fn new() -> Self {
        Self::with_config(ConfigBuilder::new())
    }

    pub fn with_config(builder: ConfigBuilder) -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        Self {
            temp_dir,
            config: builder.build(),
            progress: Arc::new(RecordingProgress::default()),
        }
    }

    pub fn path(&self) -> PathBuf {
        self.temp_dir.path().to_path_buf()
    }

    /// Writes `content` under the temp dir and returns its path.
    pub fn write_file(&self, name: &str, content: &[u8]) -> PathBuf {
        let path = self.temp_dir.path().join(name);
        std::fs::write(&path, content).expect("Failed to write fixture");
        path
    }

    /// Writes a PDF with one text line per page.
    pub fn write_pdf(&self, name: &str, pages: &[&str]) -> PathBuf {
        self.write_file(name, &build_pdf(pages))
    }

    pub fn orchestrator(&self, transport: ScriptedTransport) -> Orchestrator<ScriptedTransport> {
        Orchestrator::new(transport, &self.config).with_progress(self.progress.clone())
    }

    pub fn failures(&self) -> Vec<String> {
        self.progress
            .events()
            .into_iter()
            .filter_map(|event| match event {
                ProgressEvent::Failed { notification, .. } => Some(notification),
                _ => None,
            })
            .collect()
    }
}

pub fn build_pdf(pages: &[&str]) -> Vec<u8> {
    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();
    let font_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Courier",
    });
    let resources_id = doc.add_object(dictionary! {
        "Font" => dictionary! { "F1" => font_id },
    });

    let mut kids = Vec::new();
    for page_text in pages {
        let content = Content {
            operations: vec![
                Operation::new("BT", vec![]),
                Operation::new("Tf", vec!["F1".into(), 12.into()]),
                Operation::new("Td", vec![50.into(), 700.into()]),
                Operation::new("Tj", vec![Object::string_literal(*page_text)]),
                Operation::new("ET", vec![]),
            ],
        };
        let content_id = doc.add_object(Stream::new(
            dictionary! {},
            content.encode().expect("Failed to encode page content"),
        ));
        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "MediaBox" => vec![0.into(), 0.into(), 612.into(), 792.into()],
            "Resources" => resources_id,
            "Contents" => content_id,
        });
        kids.push(page_id.into());
    }

    let count = kids.len() as i64;
    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => count,
        }),
    );
    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);

    let mut bytes = Vec::new();
    doc.save_to(&mut bytes).expect("Failed to save PDF");
    bytes
}
