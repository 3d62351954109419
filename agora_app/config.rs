use dotenvy::dotenv;
use std::env;

pub struct Config {
    /// Sender address for all outgoing mail.
    pub mail_from: String,
    /// Reports against a single post before its author gets a warning mail.
    pub report_warn_threshold: i64,
    /// Reports against a single post before operators are told to consider
    /// deactivating the author's account.
    pub deactivation_threshold: i64,
}

impl Config {
    pub fn from_env() -> Self {
        dotenv().ok();

        let mail_from = match env::var("AGORA_MAIL_FROM") {
            Ok(val) => val,
            Err(_) => "noreply@agora.community".to_string(),
        };

        let report_warn_threshold = match env::var("AGORA_REPORT_WARN_THRESHOLD") {
            Ok(val) => val.parse::<i64>().unwrap_or(3).max(1),
            Err(_) => 3,
        };

        let deactivation_threshold = match env::var("AGORA_DEACTIVATION_THRESHOLD") {
            Ok(val) => val.parse::<i64>().unwrap_or(5).max(1),
            Err(_) => 5,
        };

        Self {
            mail_from,
            report_warn_threshold,
            deactivation_threshold,
        }
    }
}
