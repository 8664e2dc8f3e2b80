mod progress;
mod theme;

pub use progress::SyncProgressBar;
pub use theme::Style;
