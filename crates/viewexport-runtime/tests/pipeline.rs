//! End-to-end pipeline tests: raw CSV text in, rendered export out.

use std::io::Read;

use chrono::{TimeZone, Utc};
use regex::Regex;

use viewexport_core::{ExportFormat, TrackerMode};
use viewexport_runtime::{ExportPipeline, ExportRequest};

const EXPORTED_AT: &str = "2024-02-03T04:05:06.000Z";

const SYNTHETIC_EMAIL: &str =
    r"^[a-z]+\.[a-z]+\d{1,3}@(example\.com|test\.org|demo\.net|sample\.co|placeholder\.io)$";

fn now() -> chrono::DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 2, 3, 4, 5, 6).unwrap()
}

fn read_csv(bytes: &[u8]) -> Vec<Vec<String>> {
    csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(bytes)
        .records()
        .map(|r| r.unwrap().iter().map(str::to_string).collect())
        .collect()
}

fn tracker(user: &str, dashboard: &str) -> Vec<String> {
    ["TRACKER", user, dashboard, EXPORTED_AT]
        .iter()
        .map(|s| s.to_string())
        .collect()
}

fn export(csv: &str, format: ExportFormat) -> viewexport_runtime::ExportOutput {
    ExportPipeline::default()
        .with_seed(9)
        .run_at(&ExportRequest::new(csv, "ana", "Sales", format), now())
        .unwrap()
}

fn xlsx_sheet(bytes: Vec<u8>) -> String {
    let mut archive = zip::ZipArchive::new(std::io::Cursor::new(bytes)).unwrap();
    let mut sheet = String::new();
    archive
        .by_name("xl/worksheets/sheet1.xml")
        .unwrap()
        .read_to_string(&mut sheet)
        .unwrap();
    sheet
}

/// Every string shown with `Tj`, in drawing order.
fn pdf_texts(bytes: &[u8]) -> Vec<String> {
    let doc = lopdf::Document::load_mem(bytes).unwrap();
    let mut texts = Vec::new();
    for page_id in doc.get_pages().into_values() {
        let content = lopdf::content::Content::decode(&doc.get_page_content(page_id).unwrap())
            .unwrap();
        for op in content.operations.iter().filter(|op| op.operator == "Tj") {
            if let Some(lopdf::Object::String(bytes, _)) = op.operands.first() {
                texts.push(String::from_utf8_lossy(bytes).into_owned());
            }
        }
    }
    texts
}

#[test]
fn test_scenario_email_replaced_blank_kept() {
    let pipeline = ExportPipeline::default().with_seed(7);
    let request = ExportRequest::new(
        "name,email\nAda,ada@x.com\nBob,",
        "ana",
        "Sales",
        ExportFormat::Csv,
    );
    let out = pipeline.run_at(&request, now()).unwrap();
    let records = read_csv(&out.rendered.bytes);

    assert_eq!(records[0], vec!["name", "email"]);
    assert_eq!(records[1][0], "Ada");
    assert!(Regex::new(SYNTHETIC_EMAIL).unwrap().is_match(&records[1][1]));
    assert_eq!(records[2], vec!["Bob", ""]);
    assert_eq!(records[3], tracker("ana", "Sales"));
    assert_eq!(records.len(), 4);
    assert_eq!(out.anonymized, 1);
    assert_eq!(out.row_count, 2);
}

#[test]
fn test_tracker_is_last_and_untouched() {
    // Email column at index 1 coincides with the tracker's user field.
    let pipeline = ExportPipeline::default().with_seed(11);
    let request = ExportRequest::new(
        "name,email,team,joined\nAda,ada@x.com,core,2020\n",
        "someone@corp.example",
        "Team View",
        ExportFormat::Csv,
    );
    let out = pipeline.run_at(&request, now()).unwrap();
    let records = read_csv(&out.rendered.bytes);

    assert_eq!(
        records.last().unwrap(),
        &tracker("someone@corp.example", "Team View")
    );
}

#[test]
fn test_unique_tracker_mode_uses_correlation_id() {
    let pipeline = ExportPipeline::new(TrackerMode::Unique).with_seed(5);
    let request = ExportRequest::new("a,b\n1,2\n", "ana", "Sales", ExportFormat::Csv);
    let out = pipeline.run_at(&request, now()).unwrap();
    let records = read_csv(&out.rendered.bytes);

    let id_format = Regex::new(r"^TRACKER-[0-9A-Z]+-[0-9A-Z]{9}$").unwrap();
    assert!(id_format.is_match(&out.correlation_id));
    assert_eq!(records.last().unwrap()[0], out.correlation_id);
}

#[test]
fn test_json_counts_and_keys() {
    let pipeline = ExportPipeline::default().with_seed(1);
    let request = ExportRequest::new(
        "region,amount\nNorth,10\nSouth,20\n",
        "ana",
        "Sales",
        ExportFormat::Json,
    );
    let out = pipeline.run_at(&request, now()).unwrap();
    assert_eq!(out.rendered.content_type, "application/json");

    let doc: serde_json::Value = serde_json::from_slice(&out.rendered.bytes).unwrap();
    let data = doc["data"].as_array().unwrap();
    // Two data rows plus the tracker row.
    assert_eq!(doc["totalRows"], 3);
    assert_eq!(data.len(), 3);
    assert_eq!(data[0]["region"], "North");
    assert_eq!(data[1]["amount"], "20");
    assert_eq!(data[2]["region"], "TRACKER");
    assert_eq!(doc["exportedAt"], out.exported_at.as_str());
}

#[test]
fn test_csv_quotes_doubled() {
    let pipeline = ExportPipeline::default().with_anonymization(false);
    let request = ExportRequest::new(
        "quote,who\n\"say \"\"hi\"\"\",me\n",
        "ana",
        "Sales",
        ExportFormat::Csv,
    );
    let out = pipeline.run_at(&request, now()).unwrap();
    let text = String::from_utf8(out.rendered.bytes).unwrap();
    assert!(text.starts_with("\"quote\",\"who\"\n"));
    assert!(text.contains("\"say \"\"hi\"\"\",\"me\"\n"));
}

#[test]
fn test_pdf_caps_rows_and_paginates() {
    let mut csv = String::from("id,name\n");
    for i in 0..35 {
        csv.push_str(&format!("{},row{}\n", i, i));
    }
    let pipeline = ExportPipeline::default();
    let request = ExportRequest::new(csv, "ana", "Sales", ExportFormat::Pdf);
    let out = pipeline.run_at(&request, now()).unwrap();

    assert_eq!(out.row_count, 35);
    assert_eq!(out.rendered.filename, "Sales_2024-02-03T04-05-06-000Z.pdf");
    assert!(out.rendered.bytes.starts_with(b"%PDF-"));
    let doc = lopdf::Document::load_mem(&out.rendered.bytes).unwrap();
    assert_eq!(doc.get_pages().len(), 2);
}

#[test]
fn test_excel_sheet_holds_tracker_row() {
    let pipeline = ExportPipeline::default();
    let request = ExportRequest::new(
        "region,amount\nNorth,10\n",
        "ana",
        "Q1 Sales",
        ExportFormat::Excel,
    );
    let out = pipeline.run_at(&request, now()).unwrap();
    assert_eq!(out.rendered.filename, "Q1_Sales_2024-02-03T04-05-06-000Z.xlsx");

    let mut archive = zip::ZipArchive::new(std::io::Cursor::new(out.rendered.bytes)).unwrap();
    let mut sheet = String::new();
    archive
        .by_name("xl/worksheets/sheet1.xml")
        .unwrap()
        .read_to_string(&mut sheet)
        .unwrap();
    assert!(sheet.contains(r#"<row r="3">"#));
    assert!(sheet.contains(">TRACKER</t>"));

    let mut workbook = String::new();
    archive
        .by_name("xl/workbook.xml")
        .unwrap()
        .read_to_string(&mut workbook)
        .unwrap();
    assert!(workbook.contains(r#"name="Q1 Sales""#));
}

#[test]
fn test_header_only_input_exports_just_tracker() {
    let pipeline = ExportPipeline::default();
    let request = ExportRequest::new("name,email\n", "ana", "Sales", ExportFormat::Csv);
    let out = pipeline.run_at(&request, now()).unwrap();
    let records = read_csv(&out.rendered.bytes);

    assert_eq!(out.row_count, 0);
    assert_eq!(records.len(), 2);
    assert_eq!(records[1], tracker("ana", "Sales"));
}

#[test]
fn test_narrow_tables_export_full_tracker_as_csv() {
    let empty = export("", ExportFormat::Csv);
    assert_eq!(
        String::from_utf8(empty.rendered.bytes).unwrap(),
        format!("\"TRACKER\",\"ana\",\"Sales\",\"{}\"\n", EXPORTED_AT)
    );
    assert_eq!(empty.row_count, 0);

    let one = read_csv(&export("email\nx@y.com\n", ExportFormat::Csv).rendered.bytes);
    assert_eq!(one.len(), 3);
    assert_eq!(one[0], vec!["email"]);
    assert_eq!(one[2], tracker("ana", "Sales"));

    let two = export("name,email\nAda,ada@x.com\nBob,\n", ExportFormat::Csv);
    let two = read_csv(&two.rendered.bytes);
    assert_eq!(two.last().unwrap(), &tracker("ana", "Sales"));
}

#[test]
fn test_narrow_tables_export_full_tracker_as_json() {
    let empty = export("", ExportFormat::Json);
    let doc: serde_json::Value = serde_json::from_slice(&empty.rendered.bytes).unwrap();
    assert_eq!(doc["totalRows"], 1);
    assert_eq!(
        doc["data"][0],
        serde_json::json!({
            "column1": "TRACKER",
            "column2": "ana",
            "column3": "Sales",
            "column4": EXPORTED_AT,
        })
    );

    let one = export("email\nx@y.com\n", ExportFormat::Json);
    let doc: serde_json::Value = serde_json::from_slice(&one.rendered.bytes).unwrap();
    assert_eq!(doc["totalRows"], 2);
    assert_eq!(
        doc["data"][1],
        serde_json::json!({
            "email": "TRACKER",
            "column2": "ana",
            "column3": "Sales",
            "column4": EXPORTED_AT,
        })
    );
    assert_ne!(doc["data"][0]["email"], "x@y.com");

    let two = export("name,email\nAda,ada@x.com\n", ExportFormat::Json);
    let doc: serde_json::Value = serde_json::from_slice(&two.rendered.bytes).unwrap();
    assert_eq!(
        doc["data"][1],
        serde_json::json!({
            "name": "TRACKER",
            "email": "ana",
            "column3": "Sales",
            "column4": EXPORTED_AT,
        })
    );
}

#[test]
fn test_narrow_tables_export_full_tracker_as_excel() {
    let cell = |r: &str, v: &str| {
        format!(
            r#"<c r="{}" t="inlineStr"><is><t xml:space="preserve">{}</t></is></c>"#,
            r, v
        )
    };

    let empty = xlsx_sheet(export("", ExportFormat::Excel).rendered.bytes);
    assert!(!empty.contains("<cols>"));
    for (r, v) in [("A1", "TRACKER"), ("B1", "ana"), ("C1", "Sales"), ("D1", EXPORTED_AT)] {
        assert!(empty.contains(&cell(r, v)), "missing {} in {}", r, empty);
    }

    let one = xlsx_sheet(export("email\n", ExportFormat::Excel).rendered.bytes);
    for (r, v) in [("A2", "TRACKER"), ("B2", "ana"), ("C2", "Sales"), ("D2", EXPORTED_AT)] {
        assert!(one.contains(&cell(r, v)), "missing {} in {}", r, one);
    }

    let two = xlsx_sheet(export("name,email\n", ExportFormat::Excel).rendered.bytes);
    for (r, v) in [("A2", "TRACKER"), ("B2", "ana"), ("C2", "Sales"), ("D2", EXPORTED_AT)] {
        assert!(two.contains(&cell(r, v)), "missing {} in {}", r, two);
    }
}

#[test]
fn test_narrow_tables_export_full_tracker_as_pdf() {
    // PDF cells hold at most 15 characters.
    let shown = ["TRACKER", "ana", "Sales", &EXPORTED_AT[..15]];
    for csv in ["", "email\n", "name,email\n"] {
        let texts = pdf_texts(&export(csv, ExportFormat::Pdf).rendered.bytes);
        let tail = &texts[texts.len() - 4..];
        assert_eq!(tail, shown, "input {:?}", csv);
    }
}

#[test]
fn test_render_failure_reports_its_format_and_spares_next_request() {
    use std::sync::{Arc, Mutex};
    use viewexport_core::{Error, Result, Table};
    use viewexport_render::{FormatRenderer, RenderContext, Rendered, Renderer};

    /// PDF writer that always fails; other formats render normally.
    struct BrokenPdf(Arc<Mutex<Vec<ExportFormat>>>);
    impl Renderer for BrokenPdf {
        fn render(
            &self,
            table: &Table,
            format: ExportFormat,
            ctx: &RenderContext,
        ) -> Result<Rendered> {
            self.0.lock().unwrap().push(format);
            if format == ExportFormat::Pdf {
                return Err(Error::render(format, "font table unavailable"));
            }
            FormatRenderer.render(table, format, ctx)
        }
    }

    let calls = Arc::new(Mutex::new(Vec::new()));
    let pipeline = ExportPipeline::default().with_renderer(BrokenPdf(Arc::clone(&calls)));

    let failed = pipeline.run_at(
        &ExportRequest::new("a,b\n1,2\n", "ana", "Sales", ExportFormat::Pdf),
        now(),
    );
    match failed {
        Err(Error::Render { format, message }) => {
            assert_eq!(format, ExportFormat::Pdf);
            assert_eq!(message, "font table unavailable");
        }
        other => panic!(
            "expected a PDF render error, got {:?}",
            other.map(|o| o.correlation_id)
        ),
    }
    // No retry in another format.
    assert_eq!(*calls.lock().unwrap(), vec![ExportFormat::Pdf]);

    let next = pipeline
        .run_at(
            &ExportRequest::new("a,b\n1,2\n", "ana", "Sales", ExportFormat::Csv),
            now(),
        )
        .unwrap();
    assert_eq!(next.rendered.format, ExportFormat::Csv);
    assert_eq!(read_csv(&next.rendered.bytes).last().unwrap(), &tracker("ana", "Sales"));
}

#[tokio::test]
async fn test_render_failure_sends_no_notification() {
    use futures::future::BoxFuture;
    use tokio::sync::mpsc;
    use viewexport_core::{Error, Result, Table};
    use viewexport_notify::{ExportEvent, NotificationSink, Notifier};
    use viewexport_render::{RenderContext, Rendered, Renderer};

    struct Failing;
    impl Renderer for Failing {
        fn render(&self, _: &Table, format: ExportFormat, _: &RenderContext) -> Result<Rendered> {
            Err(Error::render(format, "disk full"))
        }
    }

    struct ChannelSink(mpsc::UnboundedSender<ExportEvent>);
    impl NotificationSink for ChannelSink {
        fn deliver(&self, event: ExportEvent) -> BoxFuture<'static, Result<()>> {
            let tx = self.0.clone();
            Box::pin(async move { tx.send(event).map_err(|e| Error::Notify(e.to_string())) })
        }
    }

    let (tx, mut rx) = mpsc::unbounded_channel();
    let pipeline = ExportPipeline::default()
        .with_renderer(Failing)
        .with_notifier(Notifier::with_sink(ChannelSink(tx)));
    let request = ExportRequest::new("a\n1\n", "ana", "Sales", ExportFormat::Excel);
    assert!(matches!(
        pipeline.run_at(&request, now()),
        Err(Error::Render { format: ExportFormat::Excel, .. })
    ));

    drop(pipeline);
    assert!(rx.recv().await.is_none());
}

#[test]
fn test_round_trip_without_anonymization() {
    let source = "city,zip,note\nGhent,9000,\"a, b\"\nLiège,4000,plain\n";
    let pipeline = ExportPipeline::default().with_anonymization(false);
    let request = ExportRequest::new(source, "ana", "Cities", ExportFormat::Csv);
    let out = pipeline.run_at(&request, now()).unwrap();
    let records = read_csv(&out.rendered.bytes);

    assert_eq!(records[0], vec!["city", "zip", "note"]);
    assert_eq!(records[1], vec!["Ghent", "9000", "a, b"]);
    assert_eq!(records[2], vec!["Liège", "4000", "plain"]);
}

#[tokio::test]
async fn test_notification_fires_with_data_row_count() {
    use futures::future::BoxFuture;
    use tokio::sync::mpsc;
    use viewexport_core::{Error, Result};
    use viewexport_notify::{ExportEvent, NotificationSink, Notifier};

    struct ChannelSink(mpsc::UnboundedSender<ExportEvent>);
    impl NotificationSink for ChannelSink {
        fn deliver(&self, event: ExportEvent) -> BoxFuture<'static, Result<()>> {
            let tx = self.0.clone();
            Box::pin(async move { tx.send(event).map_err(|e| Error::Notify(e.to_string())) })
        }
    }

    let (tx, mut rx) = mpsc::unbounded_channel();
    let pipeline = ExportPipeline::default().with_notifier(Notifier::with_sink(ChannelSink(tx)));
    let request = ExportRequest::new("a,b\n1,2\n3,4\n", "ana", "Sales", ExportFormat::Json);
    let out = pipeline.run_at(&request, now()).unwrap();

    let event = rx.recv().await.unwrap();
    assert_eq!(event.row_count, 2);
    assert_eq!(event.correlation_id, out.correlation_id);
    assert_eq!(event.format, ExportFormat::Json);
    assert_eq!(event.timestamp, "2024-02-03T04:05:06.000Z");
}

#[tokio::test]
async fn test_failing_notification_does_not_fail_export() {
    use futures::future::BoxFuture;
    use viewexport_core::{Error, Result};
    use viewexport_notify::{ExportEvent, NotificationSink, Notifier};

    struct Down;
    impl NotificationSink for Down {
        fn deliver(&self, _event: ExportEvent) -> BoxFuture<'static, Result<()>> {
            Box::pin(async { Err(Error::Notify("503".into())) })
        }
    }

    let pipeline = ExportPipeline::default().with_notifier(Notifier::with_sink(Down));
    let request = ExportRequest::new("a\n1\n", "ana", "Sales", ExportFormat::Csv);
    assert!(pipeline.run_at(&request, now()).is_ok());
}
