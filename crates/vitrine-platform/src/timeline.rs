//! Animation Timeline
//!
//! Recording surface for the third-party animation library. The engine
//! only sequences tweens; playing them is the library's concern and out of
//! scope, so a timeline is a list of recorded steps the tests can inspect.

/// Defaults applied to every step of a timeline
#[derive(Debug, Clone)]
pub struct TweenDefaults {
    pub ease: String,
    pub duration_ms: u64,
}

impl TweenDefaults {
    pub fn new(ease: &str, duration_ms: u64) -> Self {
        Self {
            ease: ease.to_string(),
            duration_ms,
        }
    }
}

/// Tween direction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TweenKind {
    /// Animate from the given properties to the element's resting state
    From,
    /// Animate to the given properties
    To,
}

/// One recorded animation step
#[derive(Debug, Clone)]
pub struct Tween {
    pub kind: TweenKind,
    /// Selector-style target description
    pub target: String,
    /// Animated properties and their values
    pub props: Vec<(String, f64)>,
    pub duration_ms: u64,
    /// Offset relative to the previous step's end, in ms (negative overlaps)
    pub offset_ms: i64,
    /// Loop forever, reversing each cycle
    pub yoyo_repeat: bool,
}

/// Sequenced animation timeline
#[derive(Debug)]
pub struct Timeline {
    pub defaults: TweenDefaults,
    steps: Vec<Tween>,
}

impl Timeline {
    pub fn new(defaults: TweenDefaults) -> Self {
        Self {
            defaults,
            steps: Vec::new(),
        }
    }

    /// Record a from-tween at an offset from the previous step
    pub fn from(&mut self, target: &str, props: &[(&str, f64)], offset_ms: i64) -> &mut Self {
        self.push(TweenKind::From, target, props, offset_ms, false);
        self
    }

    /// Record a to-tween at an offset from the previous step
    pub fn to(&mut self, target: &str, props: &[(&str, f64)], offset_ms: i64) -> &mut Self {
        self.push(TweenKind::To, target, props, offset_ms, false);
        self
    }

    /// Record a repeating yoyo to-tween (floating loops)
    pub fn to_looping(&mut self, target: &str, props: &[(&str, f64)], duration_ms: u64) -> &mut Self {
        let step = Tween {
            kind: TweenKind::To,
            target: target.to_string(),
            props: props.iter().map(|(p, v)| (p.to_string(), *v)).collect(),
            duration_ms,
            offset_ms: 0,
            yoyo_repeat: true,
        };
        self.steps.push(step);
        self
    }

    fn push(&mut self, kind: TweenKind, target: &str, props: &[(&str, f64)], offset_ms: i64, yoyo: bool) {
        self.steps.push(Tween {
            kind,
            target: target.to_string(),
            props: props.iter().map(|(p, v)| (p.to_string(), *v)).collect(),
            duration_ms: self.defaults.duration_ms,
            offset_ms,
            yoyo_repeat: yoyo,
        });
    }

    pub fn steps(&self) -> &[Tween] {
        &self.steps
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_sequence() {
        let mut tl = Timeline::new(TweenDefaults::new("power2.out", 800));
        tl.from(".hero-content h1", &[("y", 30.0), ("opacity", 0.0)], 0)
            .from(".hero-content p", &[("y", 20.0), ("opacity", 0.0)], -500)
            .from(".hero-buttons", &[("y", 20.0), ("opacity", 0.0)], -500);

        assert_eq!(tl.len(), 3);
        assert_eq!(tl.steps()[1].offset_ms, -500);
        assert_eq!(tl.steps()[0].duration_ms, 800);
    }

    #[test]
    fn test_looping_tween() {
        let mut tl = Timeline::new(TweenDefaults::new("sine.inOut", 600));
        tl.to_looping(".floating-image", &[("y", -15.0)], 3000);

        let step = &tl.steps()[0];
        assert!(step.yoyo_repeat);
        assert_eq!(step.kind, TweenKind::To);
        assert_eq!(step.duration_ms, 3000);
    }
}
