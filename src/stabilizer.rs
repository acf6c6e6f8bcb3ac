mod category;
mod clock;
mod debouncer;
mod detection;
mod rect;
mod selector;

pub use category::{Category, CategoryMapper, LabelMarkers};
pub use clock::{Clock, ManualClock, SystemClock};
pub use debouncer::{Decision, PublishReason, Stabilizer, StabilizerConfig, StabilizerState};
pub use detection::Detection;
pub use rect::Rect;
pub use selector::select_best;
