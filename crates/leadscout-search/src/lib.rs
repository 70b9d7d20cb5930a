//! Incremental, resumable category × area search orchestration.
//!
//! A [`Campaign`] walks every selected category across every area, handing
//! each area to the [`AreaCrawler`], which pages through the places source
//! under the [`DelayPolicy`]. A [`SearchSession`] guarantees at most one live
//! run and owns its cancellation token.

pub mod campaign;
pub mod cancel;
pub mod crawler;
pub mod error;
pub mod policy;
pub mod session;
pub mod sink;
pub mod source;
pub mod status;

pub use campaign::{Campaign, CampaignOutcome, CampaignRequest, CategoryHarvest, RunScope};
pub use cancel::{sleep_or_cancel, SleepOutcome};
pub use crawler::{AreaBudget, AreaCrawler, AreaHarvest, AreaJob, AreaOutcome};
pub use error::{SearchError, SinkError};
pub use policy::{fetch_page, DelayPolicy, PageFetch};
pub use session::{RunGuard, SearchSession};
pub use sink::LeadSink;
pub use source::{PageRequest, PlaceSource};
pub use status::{SilentReporter, StatusBoard, StatusReporter};
