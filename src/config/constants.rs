//! Configuration constants.
//!
//! Defaults, validation ranges, and operational limits used throughout the
//! application.

use std::time::Duration;

/// Interval between progress log lines while a batch is running.
pub const LOGGING_INTERVAL: Duration = Duration::from_secs(5);

/// Maximum URL length (2048 characters), matching common browser and server limits.
pub const MAX_URL_LENGTH: usize = 2048;

/// Sentinel scheduling group for URLs whose hostname cannot be determined.
pub const INVALID_HOST_GROUP: &str = "invalid";

// Viewport presets
/// Desktop viewport (width, height)
pub const VIEWPORT_PC: (u32, u32) = (1024, 768);
/// Mobile viewport (width, height)
pub const VIEWPORT_MOBILE: (u32, u32) = (375, 812);

// Validation ranges
/// Global concurrency range (inclusive)
pub const CONCURRENCY_RANGE: (usize, usize) = (1, 10);
/// Per-domain concurrency range (inclusive)
pub const PER_DOMAIN_CONCURRENCY_RANGE: (usize, usize) = (1, 10);
/// Maximum per-domain delay between dispatches, in milliseconds
pub const MAX_DOMAIN_DELAY_MS: u64 = 60_000;
/// Navigation timeout range in milliseconds (inclusive)
pub const NAVIGATION_TIMEOUT_RANGE_MS: (u64, u64) = (1_000, 300_000);
/// Maximum JSON indentation width
pub const MAX_JSON_INDENTATION: usize = 10;
/// Maximum screenshot quality
pub const MAX_SCREENSHOT_QUALITY: u8 = 100;
/// Maximum configurable page size limit (1 GiB)
pub const MAX_PAGE_SIZE_LIMIT: u64 = 1024 * 1024 * 1024;

// Defaults
/// Default page size limit (50 MiB)
pub const DEFAULT_MAX_PAGE_SIZE: u64 = 50 * 1024 * 1024;
/// Default axe-core rule tags
pub const DEFAULT_TAGS: &[&str] = &["wcag2a", "wcag2aa", "wcag21a", "wcag21aa", "best-practice"];
/// Default blocked domains: loopback, unspecified, the cloud metadata
/// endpoint, private and link-local ranges
pub const DEFAULT_BLOCKED_DOMAINS: &[&str] = &[
    "localhost",
    "127.0.0.0/8",
    "0.0.0.0",
    "::1",
    "169.254.169.254",
    "10.0.0.0/8",
    "172.16.0.0/12",
    "192.168.0.0/16",
    "169.254.0.0/16",
    "fc00::/7",
    "fe80::/10",
];

/// Extra time granted to DevTools commands beyond the navigation timeout.
pub const BROWSER_REQUEST_SLACK: Duration = Duration::from_secs(10);

/// Chromium launch flags applied to every session.
pub const BROWSER_LAUNCH_ARGS: &[&str] = &[
    "--disable-dev-shm-usage",
    "--disable-accelerated-2d-canvas",
    "--no-first-run",
    "--disable-gpu",
    "--disable-extensions",
    "--disable-plugins",
];

/// Extra flags when the sandbox is disabled. Chromium refuses to start with
/// `--no-zygote` while the sandbox is on.
pub const UNSANDBOXED_LAUNCH_ARGS: &[&str] = &["--disable-setuid-sandbox", "--no-zygote"];

// Error message limits
/// Maximum error message length stored in an outcome
pub const MAX_ERROR_MESSAGE_LENGTH: usize = 2000;

// Filename derivation limits
/// Maximum length of one sanitized filename component
pub const MAX_FILENAME_PART_LENGTH: usize = 100;
/// Maximum length of a derived base filename before the truncation marker
pub const MAX_BASE_FILENAME_LENGTH: usize = 200;
/// Maximum length of any filename we write
pub const MAX_FILENAME_LENGTH: usize = 255;

// Summary builder limits
/// Maximum number of JSON files read by the summary builder
pub const SUMMARY_MAX_FILES: usize = 5_000;
/// Maximum size of a single JSON file read by the summary builder (20 MiB)
pub const SUMMARY_MAX_FILE_BYTES: u64 = 20 * 1024 * 1024;
/// Maximum total bytes read by the summary builder (512 MiB)
pub const SUMMARY_MAX_TOTAL_BYTES: u64 = 512 * 1024 * 1024;
