// Player statistics pipeline: CSV datasets in, merged players and
// head-to-head queries out. Pure and synchronous; loading lives elsewhere.

pub mod csv_table;
pub mod dataset;
pub mod h2h;
pub mod index;
pub mod merge;
pub mod player;
pub mod season;

pub use dataset::{DatasetKind, RawDatasets};
pub use h2h::H2hRecord;
pub use index::{ComparisonView, PinOutcome, PinnedPlayers, PlayerIndex};
pub use player::{Player, PlayerName, Surface};
