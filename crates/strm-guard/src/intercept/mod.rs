//! Error-video interception.
//!
//! Per request the middleware walks one of these paths:
//!
//! ```text
//! START ─ path not under a STRM prefix ─────────────▶ PASSTHROUGH (streamed)
//!   │
//!   └─ CAPTURE ─ status != 500 ─────────────────────▶ REPLAY
//!         ├──── status == 500, rule or fallback hit ─▶ REDIRECT (307)
//!         └──── status == 500, nothing matched ─────▶ REPLAY
//! ```
//!
//! - `paths` - prefix allow-list
//! - `classifier` - ordered pattern rules plus the built-in fallback
//! - `capture` - full-body capture and verbatim replay
//! - `redirect` - `Location` construction and the 307 response
//! - `snapshot` - compiled settings behind an atomic swap
//! - `layer` - the `tower` layer/service tying it together

mod capture;
mod classifier;
mod layer;
mod paths;
mod redirect;
mod snapshot;

pub use capture::CapturedResponse;
pub use classifier::{
    Classification, ErrorClassifier, MatchedRule, FALLBACK_PHRASE, FALLBACK_VIDEO,
};
pub use layer::{ErrorVideoLayer, ErrorVideoService};
pub use paths::PathPrefixSet;
pub use redirect::{redirect_response, video_location};
pub use snapshot::{InterceptSnapshot, SharedSnapshot};
