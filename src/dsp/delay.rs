/// Circular delay line with fractional read positions.
///
/// Capacity is fixed at construction; delay times beyond it are clamped.
#[derive(Debug, Clone)]
pub struct DelayLine {
    buffer: Vec<f32>,
    write_pos: usize,
}

impl DelayLine {
    /// Holds up to `max_delay_seconds` of audio at `sample_rate`.
    pub fn new(max_delay_seconds: f32, sample_rate: f32) -> Self {
        let capacity = (max_delay_seconds.max(0.0) * sample_rate).round() as usize + 2;
        Self {
            buffer: vec![0.0; capacity],
            write_pos: 0,
        }
    }

    /// Longest delay (in samples) this line can produce.
    pub fn max_delay_samples(&self) -> f32 {
        (self.buffer.len() - 2) as f32
    }

    /// Pushes `sample` and returns the signal from `delay_samples` ago.
    ///
    /// A delay of zero returns `sample` itself.
    pub fn next_sample(&mut self, sample: f32, delay_samples: f32) -> f32 {
        self.buffer[self.write_pos] = sample;
        let delayed = self.read_interpolated(delay_samples);
        self.write_pos = (self.write_pos + 1) % self.buffer.len();
        delayed
    }

    fn read_interpolated(&self, delay_samples: f32) -> f32 {
        let len = self.buffer.len();
        let delay = if delay_samples.is_finite() {
            delay_samples.clamp(0.0, self.max_delay_samples())
        } else {
            0.0
        };

        let whole = delay.floor() as usize;
        let frac = delay - whole as f32;

        let newer = (self.write_pos + len - whole) % len;
        let older = (newer + len - 1) % len;

        let a = self.buffer[newer];
        let b = self.buffer[older];
        a + (b - a) * frac
    }

    pub fn render(&mut self, buffer: &mut [f32], delay_samples: f32) {
        for sample in buffer.iter_mut() {
            *sample = self.next_sample(*sample, delay_samples);
        }
    }

    pub fn reset(&mut self) {
        self.buffer.fill(0.0);
        self.write_pos = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_delay_passes_through() {
        let mut line = DelayLine::new(0.1, 1_000.0);
        for i in 0..10 {
            let x = i as f32;
            assert_eq!(line.next_sample(x, 0.0), x);
        }
    }

    #[test]
    fn integer_delay_shifts_impulse() {
        let mut line = DelayLine::new(0.1, 1_000.0);
        let mut buffer = vec![0.0; 16];
        buffer[0] = 1.0;
        line.render(&mut buffer, 5.0);
        assert_eq!(buffer[5], 1.0);
        assert_eq!(buffer.iter().filter(|&&s| s != 0.0).count(), 1);
    }

    #[test]
    fn fractional_delay_splits_impulse() {
        let mut line = DelayLine::new(0.1, 1_000.0);
        let mut buffer = vec![0.0; 8];
        buffer[0] = 1.0;
        line.render(&mut buffer, 2.5);
        assert!((buffer[2] - 0.5).abs() < 1e-6);
        assert!((buffer[3] - 0.5).abs() < 1e-6);
    }

    #[test]
    fn delay_is_clamped_to_capacity() {
        let mut line = DelayLine::new(0.01, 1_000.0);
        assert_eq!(line.max_delay_samples(), 10.0);
        let mut buffer = vec![0.0; 32];
        buffer[0] = 1.0;
        line.render(&mut buffer, 1_000.0);
        assert_eq!(buffer[10], 1.0);
    }

    #[test]
    fn reset_clears_history() {
        let mut line = DelayLine::new(0.01, 1_000.0);
        line.next_sample(1.0, 3.0);
        line.reset();
        let mut buffer = vec![0.0; 8];
        line.render(&mut buffer, 3.0);
        assert!(buffer.iter().all(|&s| s == 0.0));
    }
}
