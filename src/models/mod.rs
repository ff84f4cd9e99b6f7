pub mod fitness;
pub mod workout;

pub use fitness::{FitnessState, GoalConfig};
pub use workout::WorkoutObject;
