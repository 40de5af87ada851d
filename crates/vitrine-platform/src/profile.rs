//! Device Profile
//!
//! Capability profile derived once at startup. Immutable for the page
//! session.

/// Mobile user-agent tokens treated as low-end markers
const MOBILE_UA_TOKENS: &[&str] = &[
    "android",
    "webos",
    "iphone",
    "ipad",
    "ipod",
    "blackberry",
    "iemobile",
    "opera mini",
];

/// Device capability profile
#[derive(Debug, Clone)]
pub struct DeviceProfile {
    /// Approximate device memory in GB, when the platform reports it
    pub memory_gb: Option<f32>,
    /// Logical processor count, when the platform reports it
    pub cpu_cores: Option<u32>,
    /// User-agent string
    pub user_agent: String,
    /// Derived low-end flag
    pub is_low_end: bool,
}

impl DeviceProfile {
    /// Derive the profile from platform inputs.
    ///
    /// Low-end when memory is under 4 GB, under 4 cores, or the user agent
    /// carries a mobile token. Missing inputs count as capable.
    pub fn detect(memory_gb: Option<f32>, cpu_cores: Option<u32>, user_agent: &str) -> Self {
        let low_memory = memory_gb.is_some_and(|m| m < 4.0);
        let low_cpu = cpu_cores.is_some_and(|c| c < 4);
        let ua_lower = user_agent.to_ascii_lowercase();
        let mobile = MOBILE_UA_TOKENS.iter().any(|t| ua_lower.contains(t));

        Self {
            memory_gb,
            cpu_cores,
            user_agent: user_agent.to_string(),
            is_low_end: low_memory || low_cpu || mobile,
        }
    }

    /// A capable desktop profile
    pub fn desktop() -> Self {
        Self::detect(Some(8.0), Some(8), "Mozilla/5.0 (X11; Linux x86_64)")
    }
}
