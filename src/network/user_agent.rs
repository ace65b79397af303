//! User agent generation

use rand::seq::SliceRandom;
use rand::Rng;

/// Supplies the `user-agent` header for each outgoing request
pub trait UserAgentProvider: Send + Sync {
    fn next_user_agent(&self) -> String;
}

/// Picks a fresh random browser user agent on every call
#[derive(Debug, Clone, Copy, Default)]
pub struct RandomUserAgent;

impl UserAgentProvider for RandomUserAgent {
    fn next_user_agent(&self) -> String {
        generate_user_agent()
    }
}

/// Always returns the same user agent
#[derive(Debug, Clone)]
pub struct FixedUserAgent(pub String);

impl UserAgentProvider for FixedUserAgent {
    fn next_user_agent(&self) -> String {
        self.0.clone()
    }
}

const CHROME_VERSIONS: &[&str] = &[
    "124.0.0.0",
    "125.0.0.0",
    "126.0.0.0",
    "127.0.0.0",
    "128.0.0.0",
    "129.0.0.0",
];

const FIREFOX_VERSIONS: &[&str] = &["125.0", "126.0", "127.0", "128.0", "129.0"];

const SAFARI_VERSIONS: &[&str] = &["17.4", "17.5", "17.6"];

const OS_STRINGS: &[&str] = &[
    "Windows NT 10.0; Win64; x64",
    "Macintosh; Intel Mac OS X 10_15_7",
    "Macintosh; Intel Mac OS X 14_5",
    "X11; Linux x86_64",
    "X11; Ubuntu; Linux x86_64",
];

/// Generate a random but realistic desktop user agent string
pub fn generate_user_agent() -> String {
    let mut rng = rand::thread_rng();

    let os = OS_STRINGS.choose(&mut rng).copied().unwrap_or("X11; Linux x86_64");

    let browser_type: u8 = rng.gen_range(0..10);

    if browser_type < 6 {
        // Chrome (60% chance)
        let chrome = CHROME_VERSIONS.choose(&mut rng).copied().unwrap_or("128.0.0.0");
        format!(
            "Mozilla/5.0 ({}) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/{} Safari/537.36",
            os, chrome
        )
    } else if browser_type < 9 {
        // Firefox (30% chance)
        let firefox = FIREFOX_VERSIONS.choose(&mut rng).copied().unwrap_or("128.0");
        format!(
            "Mozilla/5.0 ({}; rv:{}) Gecko/20100101 Firefox/{}",
            os, firefox, firefox
        )
    } else {
        // Safari (10% chance) - only on Mac
        let safari = SAFARI_VERSIONS.choose(&mut rng).copied().unwrap_or("17.5");
        format!(
            "Mozilla/5.0 (Macintosh; Intel Mac OS X 14_5) AppleWebKit/605.1.15 (KHTML, like Gecko) Version/{} Safari/605.1.15",
            safari
        )
    }
}

/// Accept header for catalog API requests
pub fn accept_json() -> &'static str {
    "application/json, text/plain, */*"
}
