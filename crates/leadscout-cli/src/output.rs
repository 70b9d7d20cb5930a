//! JSON Lines lead sink.

use std::io::Write;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use leadscout_core::Lead;
use leadscout_search::{LeadSink, SinkError};
use serde::Serialize;

#[derive(Serialize)]
struct LeadRecord<'a> {
    #[serde(flatten)]
    lead: &'a Lead,
    captured_at: DateTime<Utc>,
}

/// Writes one JSON object per lead and flushes after every batch, so leads
/// already on disk survive an interrupted or failed run.
pub(crate) struct JsonlSink<W> {
    writer: W,
    written: usize,
}

impl<W: Write + Send> JsonlSink<W> {
    pub(crate) fn new(writer: W) -> Self {
        Self { writer, written: 0 }
    }

    pub(crate) fn written(&self) -> usize {
        self.written
    }

    #[cfg(test)]
    fn into_inner(self) -> W {
        self.writer
    }
}

#[async_trait]
impl<W: Write + Send> LeadSink for JsonlSink<W> {
    async fn on_leads_found(&mut self, leads: &[Lead]) -> Result<(), SinkError> {
        let captured_at = Utc::now();
        for lead in leads {
            serde_json::to_writer(&mut self.writer, &LeadRecord { lead, captured_at })?;
            self.writer.write_all(b"\n")?;
        }
        self.writer.flush()?;
        self.written += leads.len();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lead(place_id: &str) -> Lead {
        Lead {
            place_id: place_id.to_string(),
            name: "Cantina Bella".to_string(),
            address: "Rua das Flores, 10".to_string(),
            phone: Some("+55 19 3333-0000".to_string()),
            website: None,
            rating: Some(4.6),
            category: "Restaurants".to_string(),
            category_id: "rest".to_string(),
            city: "Campinas".to_string(),
            state: "SP".to_string(),
        }
    }

    #[tokio::test]
    async fn writes_one_line_per_lead_with_capture_time() {
        let mut sink = JsonlSink::new(Vec::new());

        sink.on_leads_found(&[lead("p1"), lead("p2")]).await.unwrap();

        assert_eq!(sink.written(), 2);
        let text = String::from_utf8(sink.into_inner()).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 2);

        let first: serde_json::Value = serde_json::from_str(lines[0]).unwrap();
        assert_eq!(first["place_id"], "p1");
        assert_eq!(first["category_id"], "rest");
        assert_eq!(first["city"], "Campinas");
        assert!(first["website"].is_null());
        let captured = first["captured_at"].as_str().unwrap();
        assert!(DateTime::parse_from_rfc3339(captured).is_ok());
    }

    #[tokio::test]
    async fn appends_across_batches() {
        let mut sink = JsonlSink::new(Vec::new());

        sink.on_leads_found(&[lead("p1")]).await.unwrap();
        sink.on_leads_found(&[lead("p2"), lead("p3")]).await.unwrap();

        assert_eq!(sink.written(), 3);
        let text = String::from_utf8(sink.into_inner()).unwrap();
        assert_eq!(text.lines().count(), 3);
        assert!(text.ends_with('\n'));
    }

    #[tokio::test]
    async fn empty_batch_writes_nothing() {
        let mut sink = JsonlSink::new(Vec::new());
        sink.on_leads_found(&[]).await.unwrap();
        assert_eq!(sink.written(), 0);
        assert!(sink.into_inner().is_empty());
    }
}
