use std::{io::Cursor, sync::Arc};

use docsum::{
    config,
    processing::{DocumentService, DocumentUpload},
};
use docx_rs::{Docx, Paragraph, Run};

#[tokio::test]
#[ignore = "Requires live Ollama"]
async fn live_ollama_summary_roundtrip() {
    let config = Arc::new(config::load_config().expect("configuration"));
    let service = DocumentService::new(config).expect("service");

    let mut cursor = Cursor::new(Vec::new());
    Docx::new()
        .add_paragraph(Paragraph::new().add_run(Run::new().add_text("Quarterly report")))
        .add_paragraph(Paragraph::new().add_run(Run::new().add_text(
            "Revenue grew twelve percent while operating costs stayed flat.",
        )))
        .build()
        .pack(&mut cursor)
        .expect("pack docx");

    let outcome = service
        .summarize_document(DocumentUpload::new("report.docx", cursor.into_inner()))
        .await
        .expect("summary from live Ollama");
    assert!(!outcome.summary.trim().is_empty());
    assert!(outcome.preview.starts_with("Quarterly report"));
}
