pub type QueueId = u32;

/// Source of uniform values in `[0, 1)` that all sampling in the engine draws from.
pub trait RandomSource {
    fn next_uniform(&mut self) -> f64;

    /// Number of values produced so far.
    fn draws(&self) -> u64;

    fn next_in_range(&mut self, min: f64, max: f64) -> f64 {
        min + self.next_uniform() * (max - min)
    }
}

impl<R: RandomSource + ?Sized> RandomSource for &mut R {
    fn next_uniform(&mut self) -> f64 {
        (**self).next_uniform()
    }

    fn draws(&self) -> u64 {
        (**self).draws()
    }
}
