/// Registry, notifier and schedule defaults shared across the crate

// Registry endpoints
pub const NCCPA_BASE_URL: &str = "https://portal.nccpa.net/verifypac";
pub const SEARCH_BY_ID_PATH: &str = "SearchById";
pub const SEARCH_BY_ATTRIBUTES_PATH: &str = "SearchByAttributes";

/// The only status that triggers a notification (exact, case-sensitive).
pub const CERTIFIED_STATUS: &str = "Certified";

// Twilio
pub const TWILIO_API_BASE: &str = "https://api.twilio.com";
pub const TWILIO_FROM_NUMBER_VAR: &str = "TWILIO_FROM_NUMBER";
pub const TWILIO_TO_NUMBER_VAR: &str = "TWILIO_TO_NUMBER";
pub const TWILIO_ACCOUNT_SID_VAR: &str = "TWILIO_ACCOUNT_SID";
pub const TWILIO_AUTH_TOKEN_VAR: &str = "TWILIO_AUTH_TOKEN";
pub const TWILIO_API_BASE_VAR: &str = "TWILIO_API_BASE";

// CLI defaults
pub const DEFAULT_STATE_CODE: &str = "CA";
pub const DEFAULT_COUNTRY_CODE: &str = "USA";
pub const DEFAULT_TOKEN_FILE: &str = "token.txt";
pub const DEFAULT_ENV_FILE: &str = ".env";

// Schedule defaults: four checks around each of 7, 8 and 9 a.m. Eastern
pub const DEFAULT_TIMEZONE: &str = "America/New_York";
pub const DEFAULT_CHECK_TIMES: &str =
    "06:55,07:00,07:05,07:10,07:55,08:00,08:05,08:10,08:55,09:00,09:05,09:10";

// Logging
pub const LOG_DIR_VAR: &str = "NCCPA_LOG_DIR";
pub const DEFAULT_LOG_DIR: &str = "logs";
pub const LOG_FILE_PREFIX: &str = "nccpa_checker.log";
