//! Startup configuration: command line flags, the `.env` file, the token file and
//! an optional TOML file. Everything is resolved once into an immutable [`Config`].

use crate::apis::twilio::TwilioCredentials;
use crate::app::watch::FailurePolicy;
use crate::common::constants::*;
use crate::common::error::{CheckerError, Result};
use crate::common::types::{AccessToken, ByAttributesParams, ByIdParams, LookupParams};
use crate::scheduler::DailySchedule;
use clap::Parser;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Deserialize;
use std::fs;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Flags that historically took a single dash (`-id 12345`).
const SINGLE_DASH_FLAGS: [&str; 6] = ["id", "fn", "ln", "sc", "cc", "tf"];

// E.164 number, optionally addressed to a Twilio channel such as WhatsApp.
static PHONE_ADDRESS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(whatsapp:)?\+[1-9]\d{1,14}$").expect("valid regex"));
// Alphanumeric sender ID: up to 11 letters, digits or spaces.
static SENDER_ID: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[A-Za-z0-9 ]{1,11}$").expect("valid regex"));

#[derive(Parser, Debug, Clone)]
#[command(name = "nccpa_checker")]
#[command(about = "Checks the NCCPA registry every morning and texts you once you are certified")]
#[command(version)]
pub struct Cli {
    /// NCCPA ID. When set, the lookup is done by ID and the name flags are ignored
    #[arg(long = "id")]
    pub id: Option<String>,

    /// First name (required with --ln when --id is not given)
    #[arg(long = "fn")]
    pub first_name: Option<String>,

    /// Last name (required with --fn when --id is not given)
    #[arg(long = "ln")]
    pub last_name: Option<String>,

    /// State code
    #[arg(long = "sc", default_value = DEFAULT_STATE_CODE)]
    pub state_code: String,

    /// Country code
    #[arg(long = "cc", default_value = DEFAULT_COUNTRY_CODE)]
    pub country_code: String,

    /// File holding the registry access token
    #[arg(long = "tf", default_value = DEFAULT_TOKEN_FILE)]
    pub token_file: PathBuf,

    /// Env file with the Twilio settings
    #[arg(long, default_value = DEFAULT_ENV_FILE)]
    pub env_file: PathBuf,

    /// Optional TOML file overriding registry and schedule settings
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Check once and exit instead of waiting for the daily schedule
    #[arg(long)]
    pub once: bool,

    /// Log the SMS instead of sending it
    #[arg(long)]
    pub dry_run: bool,

    /// Keep going when a lookup fails on a network error or a 5xx
    #[arg(long)]
    pub retry_transient: bool,

    /// Serve Prometheus metrics on this address
    #[arg(long)]
    pub metrics_addr: Option<SocketAddr>,
}

impl Cli {
    /// Parses `args`, accepting the single-dash spellings of the lookup flags.
    pub fn parse_args<I, T>(args: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<String>,
    {
        Cli::parse_from(normalize_legacy_flags(args))
    }

    pub fn try_parse_args<I, T>(args: I) -> std::result::Result<Self, clap::Error>
    where
        I: IntoIterator<Item = T>,
        T: Into<String>,
    {
        Cli::try_parse_from(normalize_legacy_flags(args))
    }
}

/// Rewrites `-id`, `-fn=John`, ... into their `--` form. Everything else is left alone.
pub fn normalize_legacy_flags<I, T>(args: I) -> Vec<String>
where
    I: IntoIterator<Item = T>,
    T: Into<String>,
{
    args.into_iter()
        .map(Into::into)
        .map(|arg| {
            let is_single_dash = arg.starts_with('-') && !arg.starts_with("--");
            let name = arg.trim_start_matches('-').split('=').next().unwrap_or_default();
            if is_single_dash && SINGLE_DASH_FLAGS.contains(&name) {
                format!("-{}", arg)
            } else {
                arg
            }
        })
        .collect()
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FileConfig {
    pub registry: RegistrySection,
    pub schedule: ScheduleSection,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RegistrySection {
    pub base_url: Option<String>,
    pub timeout_seconds: Option<u64>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ScheduleSection {
    pub timezone: Option<String>,
    pub times: Option<Vec<String>>,
}

impl FileConfig {
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| {
            CheckerError::Config(format!("Failed to read config file '{}': {}", path.display(), e))
        })?;
        toml::from_str(&content).map_err(|e| {
            CheckerError::Config(format!("Failed to parse config file '{}': {}", path.display(), e))
        })
    }
}

/// Where and how to send the SMS.
#[derive(Debug, Clone)]
pub struct NotifierSettings {
    pub from: String,
    pub to: String,
    /// `None` only in dry-run mode.
    pub credentials: Option<TwilioCredentials>,
    pub api_base: String,
}

/// Everything the checker needs, resolved once at startup and read-only afterwards.
#[derive(Debug, Clone)]
pub struct Config {
    pub lookup: LookupParams,
    pub notifier: NotifierSettings,
    pub registry_base_url: String,
    pub request_timeout: Option<Duration>,
    pub schedule: DailySchedule,
    pub policy: FailurePolicy,
    pub run_once: bool,
    pub dry_run: bool,
    pub metrics_addr: Option<SocketAddr>,
}

impl Config {
    /// Builds the configuration from parsed flags and an environment lookup.
    ///
    /// The lookup flags are validated before anything is read from disk, and no
    /// network access happens here.
    pub fn from_cli<E>(cli: &Cli, env: E) -> Result<Self>
    where
        E: Fn(&str) -> Option<String>,
    {
        let target = LookupTarget::from_cli(cli)?;
        let file = match &cli.config {
            Some(path) => FileConfig::load(path)?,
            None => FileConfig::default(),
        };
        let notifier = NotifierSettings::from_env(&env, cli.dry_run)?;
        let token = read_token(&cli.token_file)?;

        let times = file
            .schedule
            .times
            .map(|t| t.join(","))
            .unwrap_or_else(|| DEFAULT_CHECK_TIMES.to_string());
        let timezone = file.schedule.timezone.as_deref().unwrap_or(DEFAULT_TIMEZONE);
        let schedule = DailySchedule::parse(&times, timezone)?;

        Ok(Self {
            lookup: target.into_params(token),
            notifier,
            registry_base_url: file
                .registry
                .base_url
                .unwrap_or_else(|| NCCPA_BASE_URL.to_string()),
            request_timeout: file.registry.timeout_seconds.map(Duration::from_secs),
            schedule,
            policy: if cli.retry_transient {
                FailurePolicy::RetryTransient
            } else {
                FailurePolicy::FailFast
            },
            run_once: cli.once,
            dry_run: cli.dry_run,
            metrics_addr: cli.metrics_addr,
        })
    }
}

/// Who to look up, before the token is attached.
#[derive(Debug, Clone, PartialEq)]
enum LookupTarget {
    Id(String),
    Name {
        first_name: String,
        last_name: String,
        country_code: String,
        state_code: String,
    },
}

impl LookupTarget {
    fn from_cli(cli: &Cli) -> Result<Self> {
        let non_empty = |v: &Option<String>| {
            v.as_deref().map(str::trim).filter(|s| !s.is_empty()).map(str::to_string)
        };

        if let Some(id) = non_empty(&cli.id) {
            return Ok(LookupTarget::Id(id));
        }

        match (non_empty(&cli.first_name), non_empty(&cli.last_name)) {
            (Some(first_name), Some(last_name)) => Ok(LookupTarget::Name {
                first_name,
                last_name,
                country_code: cli.country_code.trim().to_string(),
                state_code: cli.state_code.trim().to_string(),
            }),
            _ => Err(CheckerError::Config(
                "If you don't pass ID, you must pass both First Name and Last Name".into(),
            )),
        }
    }

    fn into_params(self, token: AccessToken) -> LookupParams {
        match self {
            LookupTarget::Id(id) => LookupParams::ById(ByIdParams { id, token }),
            LookupTarget::Name { first_name, last_name, country_code, state_code } => {
                LookupParams::ByAttributes(ByAttributesParams {
                    first_name,
                    last_name,
                    country_code,
                    state_code,
                    token,
                })
            }
        }
    }
}

impl NotifierSettings {
    fn from_env<E>(env: &E, dry_run: bool) -> Result<Self>
    where
        E: Fn(&str) -> Option<String>,
    {
        let var = |name: &str| env(name).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());
        let api_base = var(TWILIO_API_BASE_VAR).unwrap_or_else(|| TWILIO_API_BASE.to_string());

        if dry_run {
            return Ok(Self {
                from: var(TWILIO_FROM_NUMBER_VAR).unwrap_or_default(),
                to: var(TWILIO_TO_NUMBER_VAR).unwrap_or_default(),
                credentials: None,
                api_base,
            });
        }

        let require = |name: &str| {
            var(name).ok_or_else(|| CheckerError::Config(format!("{} must be set in the env file", name)))
        };

        let from = require(TWILIO_FROM_NUMBER_VAR)?;
        let to = require(TWILIO_TO_NUMBER_VAR)?;
        if !is_phone_address(&from) && !is_sender_id(&from) {
            return Err(CheckerError::Config(format!(
                "{} must be a phone number like +15551234567, a whatsapp:+... address or an alphanumeric sender ID, got '{}'",
                TWILIO_FROM_NUMBER_VAR, from
            )));
        }
        if !is_phone_address(&to) {
            return Err(CheckerError::Config(format!(
                "{} must be a phone number like +15551234567 or a whatsapp:+... address, got '{}'",
                TWILIO_TO_NUMBER_VAR, to
            )));
        }

        Ok(Self {
            from,
            to,
            credentials: Some(TwilioCredentials {
                account_sid: require(TWILIO_ACCOUNT_SID_VAR)?,
                auth_token: require(TWILIO_AUTH_TOKEN_VAR)?,
            }),
            api_base,
        })
    }
}

fn is_phone_address(value: &str) -> bool {
    PHONE_ADDRESS.is_match(value)
}

// Sender IDs must contain at least one letter, otherwise they read as a short number.
fn is_sender_id(value: &str) -> bool {
    SENDER_ID.is_match(value) && value.chars().any(|c| c.is_ascii_alphabetic())
}

/// Loads `KEY=value` pairs from the env file into the process environment.
pub fn load_env_file(path: &Path) -> Result<()> {
    dotenv::from_path(path)
        .map(|_| ())
        .map_err(|source| CheckerError::Env { path: path.display().to_string(), source })
}

/// Reads the registry token. A trailing newline left by an editor is not part of it.
pub fn read_token(path: &Path) -> Result<AccessToken> {
    let raw = fs::read_to_string(path)
        .map_err(|source| CheckerError::TokenFile { path: path.display().to_string(), source })?;
    let token = raw.trim_end_matches(['\r', '\n']);
    if token.is_empty() {
        return Err(CheckerError::Config(format!("Token file '{}' is empty", path.display())));
    }
    Ok(AccessToken::new(token))
}
