//! Recording module for workouts loaded from bike exports.

pub mod summary_table;
pub mod types;
pub mod workout;

pub use summary_table::{SummaryRow, SummaryTable};
pub use types::{parse_filename, FilenameError, WorkoutError, WorkoutFilename};
pub use workout::{CycleWorkout, FULL_RIDE_NAME};
