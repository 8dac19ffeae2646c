//! Sonification boundary.
//!
//! The multiverse does not produce audio itself. It exposes per-generation
//! metrics that a [`Sonifier`] maps to sound however it likes.

/// Per-generation inputs for sonification.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct SoundMetrics {
    /// Fraction of live cells, in `[0, 1]`.
    pub density: f64,
    /// Absolute population change since the previous generation.
    pub population_delta: usize,
}

impl SoundMetrics {
    /// Hands these metrics to a sonifier.
    pub fn feed<S: Sonifier + ?Sized>(&self, sonifier: &mut S) -> S::Event {
        sonifier.sonify(self.density, self.population_delta)
    }
}

/// Turns generation metrics into sound events.
pub trait Sonifier {
    /// Whatever the sonifier emits per generation.
    type Event;

    /// Produces an event for one generation.
    fn sonify(&mut self, density: f64, population_delta: usize) -> Self::Event;
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Maps density to a pitch and population change to loudness.
    struct PitchMapper {
        calls: usize,
    }

    impl Sonifier for PitchMapper {
        type Event = (f32, f32);

        fn sonify(&mut self, density: f64, population_delta: usize) -> (f32, f32) {
            self.calls += 1;
            let pitch = 220.0 + 660.0 * density as f32;
            let volume = (population_delta as f32 / 10.0).min(1.0);
            (pitch, volume)
        }
    }

    #[test]
    fn test_feed_forwards_metrics() {
        let metrics = SoundMetrics {
            density: 0.5,
            population_delta: 5,
        };
        let mut mapper = PitchMapper { calls: 0 };
        assert_eq!(metrics.feed(&mut mapper), (550.0, 0.5));
        assert_eq!(mapper.calls, 1);
    }
}
