pub mod binary;
pub mod binomial;
pub mod exercise;
pub mod option;
pub mod valuator;

pub use binary::BinaryLattice;
pub use binomial::RecombiningLattice;
pub use exercise::{ExercisePolicy, ExerciseSchedule};
pub use option::{BinaryTreeOption, TreeOption};
pub use valuator::{ValueLattice, Valuator};
