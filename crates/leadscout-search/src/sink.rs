use async_trait::async_trait;
use leadscout_core::Lead;

use crate::error::SinkError;

/// Progressive consumer of newly accepted leads.
///
/// Called once per page with only that page's new leads, in page order. The
/// crawler awaits each call before requesting the next page. An error ends
/// the run as a failure; leads accepted so far are still returned.
#[async_trait]
pub trait LeadSink: Send {
    async fn on_leads_found(&mut self, leads: &[Lead]) -> Result<(), SinkError>;
}
