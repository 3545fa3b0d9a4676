pub mod args;
pub mod classify;
pub mod countdown;
pub mod dashboard;
pub mod discovery;
pub mod error;
pub mod event;
pub mod framing;
pub mod panel;

pub use args::ProcessArgs;
pub use classify::LineClassifier;
pub use countdown::Countdown;
pub use dashboard::{Dashboard, PanelId};
pub use discovery::{EventExtractor, TargetRecord};
pub use error::RvdashError;
pub use event::Event;
pub use framing::LineFramer;
pub use panel::{PanelState, PanelUpdate, Visibility};
