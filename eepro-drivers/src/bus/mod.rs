//! Memory bus drivers

pub mod memory;
pub mod parallel;

pub use memory::SimulatedEeprom;
pub use parallel::ParallelBus;
