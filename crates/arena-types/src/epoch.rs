/// Epoch identifier (sequential counter, monotonically increasing
/// across rollovers)
pub type EpochId = u64;
