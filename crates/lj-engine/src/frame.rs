//! Audio frame type.

/// A stereo audio frame (normalized float, nominal range -1.0..=1.0).
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Frame {
    pub left: f32,
    pub right: f32,
}

impl Frame {
    /// Create a silent frame.
    pub const fn silence() -> Self {
        Self {
            left: 0.0,
            right: 0.0,
        }
    }

    pub const fn new(left: f32, right: f32) -> Self {
        Self { left, right }
    }

    /// Convert to 16-bit PCM, clamping anything past full scale.
    pub fn to_pcm16(self) -> (i16, i16) {
        (sample_to_i16(self.left), sample_to_i16(self.right))
    }
}

fn sample_to_i16(sample: f32) -> i16 {
    (sample.clamp(-1.0, 1.0) * 32767.0) as i16
}

/// One point of the XY scope: left channel on x, right channel on y.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl From<Frame> for Point {
    fn from(frame: Frame) -> Self {
        Self {
            x: frame.left,
            y: frame.right,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pcm16_clamps_overdrive() {
        assert_eq!(Frame::new(1.5, -1.5).to_pcm16(), (32767, -32767));
        assert_eq!(Frame::silence().to_pcm16(), (0, 0));
    }

    #[test]
    fn point_takes_left_as_x() {
        let p = Point::from(Frame::new(0.25, -0.5));
        assert_eq!(p, Point { x: 0.25, y: -0.5 });
    }
}
