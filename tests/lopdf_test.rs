//! End-to-end extraction of generated PDF files.

use std::path::{Path, PathBuf};

use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Document, Object, Stream};

use pdfstruct::backend::DocumentSource;
use pdfstruct::batch::{extract_batch, BatchStatus};
use pdfstruct::{
    extract_structure, extract_structure_from_bytes, Error, LayoutOptions, LopdfDocument,
    StructureExtractor,
};

/// Text shown at a PDF user-space position (bottom-up coordinates).
struct Text<'a> {
    x: i64,
    y: i64,
    text: &'a str,
}

fn t(x: i64, y: i64, text: &str) -> Text<'_> {
    Text { x, y, text }
}

fn page_content(texts: &[Text]) -> Vec<u8> {
    let mut operations = Vec::new();
    for text in texts {
        operations.push(Operation::new("BT", vec![]));
        operations.push(Operation::new("Tf", vec!["F1".into(), 12.into()]));
        operations.push(Operation::new("Td", vec![text.x.into(), text.y.into()]));
        operations.push(Operation::new("Tj", vec![Object::string_literal(text.text)]));
        operations.push(Operation::new("ET", vec![]));
    }
    Content { operations }.encode().unwrap()
}

/// Build a letter-size document. A `None` page has no content stream.
fn build_pdf(pages: &[Option<Vec<Text>>]) -> Document {
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
    for texts in pages {
        let mut page = dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
        };
        if let Some(texts) = texts {
            let content_id = doc.add_object(Stream::new(dictionary! {}, page_content(texts)));
            page.set("Contents", content_id);
        }
        kids.push(Object::Reference(doc.add_object(page)));
    }

    let count = kids.len() as i64;
    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => count,
            "Resources" => resources_id,
            "MediaBox" => vec![0.into(), 0.into(), 612.into(), 792.into()],
        }),
    );
    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);
    doc
}

fn speeds_page() -> Vec<Text<'static>> {
    vec![
        t(72, 740, "Cutting Data"),
        t(72, 700, "Material"),
        t(250, 700, "Speed"),
        t(400, 700, "Feed"),
        t(72, 685, "Steel"),
        t(250, 685, "120"),
        t(400, 685, "0.2"),
        t(72, 670, "Aluminium"),
        t(250, 670, "300"),
        t(400, 670, "0.3"),
        t(72, 400, "Values are starting points."),
    ]
}

fn save(doc: &mut Document, dir: &Path, name: &str) -> PathBuf {
    let path = dir.join(name);
    doc.save(&path).unwrap();
    path
}

#[test]
fn test_extracts_text_and_heuristic_tables() {
    let dir = tempfile::tempdir().unwrap();
    let path = save(&mut build_pdf(&[Some(speeds_page())]), dir.path(), "speeds.pdf");

    let structure = extract_structure(&path).unwrap();
    assert_eq!(structure.summary.total_pages, 1);
    assert_eq!(structure.summary.total_tables, 1);

    let page = &structure.pages[0];
    assert_eq!(page.page_number, 1);
    assert_eq!(page.elements[0].as_text(), Some("Cutting Data"));

    let table = page.tables().next().unwrap().as_table().unwrap();
    assert_eq!(
        table.to_vec(),
        vec![
            vec!["Material", "Speed", "Feed"],
            vec!["Steel", "120", "0.2"],
            vec!["Aluminium", "300", "0.3"],
        ]
    );

    let last = page.elements.last().unwrap();
    assert_eq!(last.as_text(), Some("Values are starting points."));

    for (i, element) in page.elements.iter().enumerate() {
        assert_eq!(element.order, i);
    }
    for pair in page.elements.windows(2) {
        assert!(pair[0].bbox.y0 <= pair[1].bbox.y0);
    }
}

#[test]
fn test_coordinates_are_top_down() {
    let dir = tempfile::tempdir().unwrap();
    let path = save(
        &mut build_pdf(&[Some(vec![t(100, 700, "Header")])]),
        dir.path(),
        "one.pdf",
    );

    let structure = extract_structure(&path).unwrap();
    let bbox = structure.pages[0].elements[0].bbox;
    assert_eq!(bbox.x0, 100.0);
    // Baseline at 792 - 700 = 92, ascender 0.8 em above it.
    assert!((bbox.y0 - 82.4).abs() < 0.01);
    assert!((bbox.y1 - 94.4).abs() < 0.01);
    assert!(bbox.x1 > bbox.x0);
}

#[test]
fn test_blank_pages_are_kept() {
    let dir = tempfile::tempdir().unwrap();
    let path = save(
        &mut build_pdf(&[Some(vec![t(72, 700, "First")]), None, Some(vec![])]),
        dir.path(),
        "blank.pdf",
    );

    let structure = extract_structure(&path).unwrap();
    assert_eq!(structure.summary.total_pages, 3);
    assert_eq!(structure.summary.total_text_blocks, 1);
    assert!(structure.pages[1].is_empty());
    assert!(structure.pages[2].is_empty());
    let numbers: Vec<u32> = structure.pages.iter().map(|p| p.page_number).collect();
    assert_eq!(numbers, vec![1, 2, 3]);
}

#[test]
fn test_bytes_and_file_agree() {
    let dir = tempfile::tempdir().unwrap();
    let mut doc = build_pdf(&[Some(speeds_page())]);
    let path = save(&mut doc, dir.path(), "speeds.pdf");
    let bytes = std::fs::read(&path).unwrap();

    assert_eq!(
        extract_structure(&path).unwrap(),
        extract_structure_from_bytes(&bytes).unwrap()
    );
}

#[test]
fn test_extractor_reads_bytes() {
    let dir = tempfile::tempdir().unwrap();
    let path = save(&mut build_pdf(&[Some(speeds_page())]), dir.path(), "speeds.pdf");
    let bytes = std::fs::read(&path).unwrap();

    let result = StructureExtractor::new().heuristic_only().extract_bytes(&bytes).unwrap();
    assert_eq!(result.structure().summary.total_tables, 1);
    assert!(result.plain_text().contains("Cutting Data"));

    let structure = result.into_structure();
    assert_eq!(structure, extract_structure(&path).unwrap());
}

#[test]
fn test_missing_path_is_not_found() {
    let dir = tempfile::tempdir().unwrap();
    let result = LopdfDocument::open(dir.path().join("absent.pdf"));
    assert!(matches!(result, Err(Error::NotFound(_))));
}

#[test]
fn test_directory_is_invalid() {
    let dir = tempfile::tempdir().unwrap();
    let result = extract_structure(dir.path());
    assert!(matches!(result, Err(Error::InvalidDocument(_))));
}

#[test]
fn test_non_pdf_is_invalid() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("table.pdf");
    std::fs::write(&path, "Material,Speed\nSteel,120\n").unwrap();
    assert!(matches!(
        extract_structure(&path),
        Err(Error::InvalidDocument(_))
    ));

    let bad_version = dir.path().join("bad_version.pdf");
    std::fs::write(&bad_version, "%PDF-x.y\n").unwrap();
    assert!(matches!(
        extract_structure(&bad_version),
        Err(Error::InvalidDocument(_))
    ));
}

#[test]
fn test_closed_document_refuses_pages() {
    let dir = tempfile::tempdir().unwrap();
    let path = save(&mut build_pdf(&[Some(speeds_page())]), dir.path(), "speeds.pdf");

    let mut doc = LopdfDocument::open(&path).unwrap();
    assert_eq!(doc.page_count(), 1);
    assert!(doc.page(0).is_ok());
    assert!(matches!(doc.page(1), Err(Error::PageOutOfRange(1, 1))));

    doc.close();
    assert!(doc.is_closed());
    assert!(doc.page(0).is_err());
}

#[test]
fn test_batch_reports_each_file() {
    let dir = tempfile::tempdir().unwrap();
    let good = save(&mut build_pdf(&[Some(speeds_page())]), dir.path(), "good.pdf");
    let bad = dir.path().join("bad.pdf");
    std::fs::write(&bad, "not a pdf").unwrap();

    let report = extract_batch(&[good, bad], &LayoutOptions::default());
    assert_eq!(report.total, 2);
    assert_eq!(report.succeeded, 1);
    assert_eq!(report.failed, 1);

    assert_eq!(report.results[0].file, "good.pdf");
    assert_eq!(report.results[0].status, BatchStatus::Success);
    let data = report.results[0].data.as_ref().unwrap();
    assert_eq!(data.summary.total_tables, 1);

    assert_eq!(report.results[1].status, BatchStatus::Failed);
    assert!(report.results[1].error.is_some());
}

#[cfg(feature = "async")]
#[tokio::test]
async fn test_async_extraction_matches_sync() {
    let dir = tempfile::tempdir().unwrap();
    let path = save(&mut build_pdf(&[Some(speeds_page())]), dir.path(), "speeds.pdf");

    let expected = extract_structure(&path).unwrap();
    let actual = pdfstruct::extract_structure_async(&path).await.unwrap();
    assert_eq!(expected, actual);

    let missing = pdfstruct::extract_structure_async(dir.path().join("absent.pdf")).await;
    assert!(matches!(missing, Err(Error::NotFound(_))));
}
