//! The plain-text credentials file written after account creation.
//!
//! Format, one `Label: value` pair per line:
//!
//! ```text
//! API Key: mr_live_...
//! Account ID: 3f2c...
//! Verification Code: ABC-123
//! ```

use std::path::Path;

use molty_types::AccountId;

use crate::models::NewAccount;

const API_KEY_LABEL: &str = "API Key";
const ACCOUNT_ID_LABEL: &str = "Account ID";
const VERIFICATION_LABEL: &str = "Verification Code";

/// Credentials issued for an account.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Credentials {
    /// API key for the `X-API-Key` header.
    pub api_key: String,
    /// Account id, when known.
    pub account_id: Option<AccountId>,
    /// Verification code, when issued.
    pub verification_code: Option<String>,
}

impl From<&NewAccount> for Credentials {
    fn from(account: &NewAccount) -> Self {
        Self {
            api_key: account.api_key.clone(),
            account_id: Some(account.account_id.clone()),
            verification_code: account.verification_code.clone(),
        }
    }
}

impl Credentials {
    /// Render the file contents.
    pub fn render(&self) -> String {
        let mut out = format!("{API_KEY_LABEL}: {}\n", self.api_key);
        if let Some(id) = &self.account_id {
            out.push_str(&format!("{ACCOUNT_ID_LABEL}: {id}\n"));
        }
        if let Some(code) = &self.verification_code {
            out.push_str(&format!("{VERIFICATION_LABEL}: {code}\n"));
        }
        out
    }

    /// Parse file contents. Returns `None` without an API key line.
    pub fn parse(contents: &str) -> Option<Self> {
        let mut api_key = None;
        let mut account_id = None;
        let mut verification_code = None;

        for line in contents.lines() {
            let Some((label, value)) = line.split_once(':') else {
                continue;
            };
            let value = value.trim();
            if value.is_empty() {
                continue;
            }
            match label.trim() {
                API_KEY_LABEL => api_key = Some(value.to_owned()),
                ACCOUNT_ID_LABEL => account_id = Some(AccountId::new(value)),
                VERIFICATION_LABEL => verification_code = Some(value.to_owned()),
                _ => {}
            }
        }

        Some(Self {
            api_key: api_key?,
            account_id,
            verification_code,
        })
    }

    /// Write the credentials to `path`, replacing any previous file.
    pub fn write_to(&self, path: &Path) -> std::io::Result<()> {
        std::fs::write(path, self.render())
    }

    /// Read credentials from `path`.
    ///
    /// Returns `Ok(None)` when the file does not exist or holds no key.
    pub fn read_from(path: &Path) -> std::io::Result<Option<Self>> {
        match std::fs::read_to_string(path) {
            Ok(contents) => Ok(Self::parse(&contents)),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(err) => Err(err),
        }
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;

    fn sample() -> Credentials {
        Credentials {
            api_key: "mr_live_abc".to_owned(),
            account_id: Some(AccountId::new("acc-1")),
            verification_code: Some("XYZ-123".to_owned()),
        }
    }

    #[test]
    fn renders_labelled_lines() {
        assert_eq!(
            sample().render(),
            "API Key: mr_live_abc\nAccount ID: acc-1\nVerification Code: XYZ-123\n"
        );
    }

    #[test]
    fn parse_reads_back_and_needs_a_key() {
        assert_eq!(Credentials::parse(&sample().render()), Some(sample()));
        assert!(Credentials::parse("Account ID: acc-1\n").is_none());
        assert!(Credentials::parse("API Key:   \n").is_none());

        let key_only = Credentials::parse("API Key: k\nnoise\n").unwrap();
        assert!(key_only.account_id.is_none());
    }

    #[test]
    fn file_round_trip() {
        let path = std::env::temp_dir().join(format!("molty-creds-{}.txt", std::process::id()));
        sample().write_to(&path).unwrap();
        assert_eq!(Credentials::read_from(&path).unwrap(), Some(sample()));
        std::fs::remove_file(&path).unwrap();
        assert_eq!(Credentials::read_from(&path).unwrap(), None);
    }
}
