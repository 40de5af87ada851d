//! Connection Class
//!
//! Coarse network-speed bucket used to pick image quality. Polled from the
//! platform network-information capability when present, else FourG.

/// Effective connection type bucket
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord)]
pub enum ConnectionClass {
    Slow2g,
    TwoG,
    ThreeG,
    #[default]
    FourG,
}

impl ConnectionClass {
    /// Parse a platform effective-type string. Unknown values fall back to
    /// FourG, matching the no-capability default.
    pub fn from_effective_type(s: &str) -> Self {
        match s {
            "slow-2g" => ConnectionClass::Slow2g,
            "2g" => ConnectionClass::TwoG,
            "3g" => ConnectionClass::ThreeG,
            _ => ConnectionClass::FourG,
        }
    }

    /// Speed rank, 1 (slowest) to 4
    pub fn speed_rank(&self) -> u8 {
        match self {
            ConnectionClass::Slow2g => 1,
            ConnectionClass::TwoG => 2,
            ConnectionClass::ThreeG => 3,
            ConnectionClass::FourG => 4,
        }
    }

    /// Slow connections get low-quality images and deferred preloads
    pub fn is_slow(&self) -> bool {
        self.speed_rank() < 3
    }

    /// Effective-type string for this bucket
    pub fn as_str(&self) -> &'static str {
        match self {
            ConnectionClass::Slow2g => "slow-2g",
            ConnectionClass::TwoG => "2g",
            ConnectionClass::ThreeG => "3g",
            ConnectionClass::FourG => "4g",
        }
    }
}
