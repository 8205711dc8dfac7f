mod chat_id;
mod delivery_outcome;
mod delivery_stage;
mod query;
mod resolved_track;

pub use chat_id::ChatId;
pub use delivery_outcome::DeliveryOutcome;
pub use delivery_stage::DeliveryStage;
pub use query::Query;
pub use resolved_track::ResolvedTrack;
