pub mod controller;
pub mod domain;
pub mod rows;
pub mod service;
pub mod sheet;
pub mod ticket;
pub mod verify;

pub use controller::{ExtractionToken, ReviewController, ReviewPhase};
pub use domain::{FieldsConfidence, IdCardRecord, KycField, KycRecord, SessionContext};
pub use service::{ReviewService, ReviewSnapshot};
pub use ticket::TicketDraft;
