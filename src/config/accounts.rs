//! Payee account configuration.
//!
//! Accounts come from two places, in this order:
//! 1. `[[accounts]]` entries in `config.toml` (path overridable with `CONFIG_PATH`)
//! 2. `PROMPTPAY_N1`, `PROMPTPAY_N2`, ... environment variables, read until the
//!    first missing index, with `PROMPTPAY` as a single-account fallback when no
//!    numbered variable is set.
//!
//! Every account is validated at startup. Accounts with the same sanitized digits
//! are only kept once, and every kept account gets a name no other account shares.

use crate::{
    core::PayeeId,
    errors::{Error, Result},
};
use serde::Deserialize;
use std::path::Path;
use tracing::{debug, info};

const DEFAULT_CONFIG_PATH: &str = "config.toml";

/// Configuration structure representing the entire config.toml file
#[derive(Debug, Default, Deserialize)]
pub struct Config {
    /// Payee accounts the bot may issue codes for
    #[serde(default)]
    pub accounts: Vec<AccountConfig>,
}

/// A single account as written in configuration
#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
pub struct AccountConfig {
    /// Mobile number or national ID, any formatting
    pub id: String,
    /// Optional friendly name shown in autocomplete
    #[serde(default)]
    pub label: Option<String>,
}

/// A validated payee account.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Account {
    pub label: Option<String>,
    pub payee: PayeeId,
    name: String,
}

impl Account {
    /// Name used in autocomplete and account selection: the label if configured,
    /// otherwise the masked number. A ` (2)`, ` (3)`, ... suffix is added when an
    /// earlier account already uses the same name.
    #[must_use]
    pub fn display_name(&self) -> &str {
        &self.name
    }

    fn matches(&self, query: &str) -> bool {
        let query = query.trim();
        if self
            .label
            .as_deref()
            .is_some_and(|l| l.eq_ignore_ascii_case(query))
        {
            return true;
        }
        if self.payee.masked().eq_ignore_ascii_case(query) {
            return true;
        }
        PayeeId::parse(query).is_ok_and(|p| p == self.payee)
    }
}

/// The immutable set of accounts available to payment commands.
#[derive(Debug, Clone, Default)]
pub struct AccountBook {
    accounts: Vec<Account>,
}

impl AccountBook {
    /// Validates and de-duplicates configured accounts, keeping the first
    /// occurrence of each payee.
    ///
    /// # Errors
    /// Returns [`Error::Config`] naming the first account that is not a valid
    /// `PromptPay` ID.
    pub fn from_configs(configs: impl IntoIterator<Item = AccountConfig>) -> Result<Self> {
        let mut accounts: Vec<Account> = Vec::new();

        for config in configs {
            let payee = PayeeId::parse(&config.id).map_err(|e| Error::Config {
                message: format!("account '{}' is not usable: {e}", config.id),
            })?;

            if accounts.iter().any(|a| a.payee == payee) {
                debug!(account = %payee.masked(), "Skipping duplicate account");
                continue;
            }

            let label = config
                .label
                .map(|l| l.trim().to_string())
                .filter(|l| !l.is_empty());
            let base = label.clone().unwrap_or_else(|| payee.masked());
            let name = unique_name(&accounts, base);
            accounts.push(Account { label, payee, name });
        }

        Ok(Self { accounts })
    }

    /// Loads accounts from `CONFIG_PATH` (default `config.toml`, optional) and the
    /// environment.
    pub fn load() -> Result<Self> {
        let path =
            std::env::var("CONFIG_PATH").unwrap_or_else(|_| DEFAULT_CONFIG_PATH.to_string());
        let file_accounts = if Path::new(&path).exists() {
            load_config(&path)?.accounts
        } else {
            debug!("No config file at {path}, using environment accounts only");
            Vec::new()
        };

        let env_accounts = accounts_from_lookup(|key| std::env::var(key).ok());
        let book = Self::from_configs(file_accounts.into_iter().chain(env_accounts))?;
        info!("Loaded {} PromptPay account(s)", book.accounts.len());
        Ok(book)
    }

    #[must_use]
    pub fn accounts(&self) -> &[Account] {
        &self.accounts
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.accounts.is_empty()
    }

    /// Picks the account named by `query`, or the first account when `query` is
    /// `None` or blank.
    ///
    /// A query naming an account exactly (ignoring case) wins. Otherwise it matches
    /// an account's label, its masked form, or its number in any formatting.
    ///
    /// # Errors
    /// Returns [`Error::AccountNotFound`] when nothing matches or no account is
    /// configured.
    pub fn resolve(&self, query: Option<&str>) -> Result<&Account> {
        let query = query.map(str::trim).filter(|q| !q.is_empty());
        let found = match query {
            None => self.accounts.first(),
            Some(q) => self
                .accounts
                .iter()
                .find(|a| a.name.eq_ignore_ascii_case(q))
                .or_else(|| self.accounts.iter().find(|a| a.matches(q))),
        };
        found.ok_or_else(|| Error::AccountNotFound {
            query: query.unwrap_or_default().to_string(),
        })
    }

    /// Display names containing `partial` (case-insensitive), at most 25 as Discord
    /// allows.
    #[must_use]
    pub fn autocomplete(&self, partial: &str) -> Vec<String> {
        let partial = partial.to_lowercase();
        self.accounts
            .iter()
            .map(|a| a.display_name().to_string())
            .filter(|name| name.to_lowercase().contains(&partial))
            .take(25)
            .collect()
    }
}

fn unique_name(taken: &[Account], base: String) -> String {
    let in_use = |name: &str| taken.iter().any(|a| a.name.eq_ignore_ascii_case(name));
    if !in_use(&base) {
        return base;
    }

    let mut n = 2;
    loop {
        let candidate = format!("{base} ({n})");
        if !in_use(&candidate) {
            return candidate;
        }
        n += 1;
    }
}

/// Loads account configuration from a TOML file.
///
/// # Errors
/// Returns an error if the file cannot be read or is not valid TOML.
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<Config> {
    let contents = std::fs::read_to_string(path.as_ref()).map_err(|e| Error::Config {
        message: format!("Failed to read config file: {e}"),
    })?;

    toml::from_str(&contents).map_err(|e| Error::Config {
        message: format!("Failed to parse config.toml: {e}"),
    })
}

/// Collects accounts from `PROMPTPAY_N1..` using `lookup` to read variables.
///
/// Reading stops at the first missing index. `PROMPTPAY` is only consulted when no
/// numbered variable is set.
pub fn accounts_from_lookup<F>(lookup: F) -> Vec<AccountConfig>
where
    F: Fn(&str) -> Option<String>,
{
    let present = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

    let mut accounts: Vec<AccountConfig> = (1..)
        .map_while(|i| present(&format!("PROMPTPAY_N{i}")))
        .map(|id| AccountConfig { id, label: None })
        .collect();

    if accounts.is_empty() {
        accounts.extend(present("PROMPTPAY").map(|id| AccountConfig { id, label: None }));
    }

    accounts
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    fn account(id: &str, label: Option<&str>) -> AccountConfig {
        AccountConfig {
            id: id.to_string(),
            label: label.map(str::to_string),
        }
    }

    #[test]
    fn test_parse_account_config() {
        let toml_str = r#"
            [[accounts]]
            id = "081-234-5678"
            label = "Shop"

            [[accounts]]
            id = "1234567890123"
        "#;

        let config: Config = toml::from_str(toml_str).unwrap();
        assert_eq!(config.accounts.len(), 2);
        assert_eq!(config.accounts[0], account("081-234-5678", Some("Shop")));
        assert_eq!(config.accounts[1].label, None);
    }

    #[test]
    fn test_empty_config_has_no_accounts() {
        let config: Config = toml::from_str("").unwrap();
        assert!(config.accounts.is_empty());
    }

    #[test]
    fn test_numbered_env_accounts_stop_at_gap() {
        let lookup = lookup_from(&[
            ("PROMPTPAY_N1", "0811111111"),
            ("PROMPTPAY_N2", "0822222222"),
            ("PROMPTPAY_N4", "0844444444"),
            ("PROMPTPAY", "0899999999"),
        ]);
        let ids: Vec<String> = accounts_from_lookup(lookup)
            .into_iter()
            .map(|a| a.id)
            .collect();
        assert_eq!(ids, ["0811111111", "0822222222"]);
    }

    #[test]
    fn test_single_env_account_fallback() {
        let accounts = accounts_from_lookup(lookup_from(&[("PROMPTPAY", "0899999999")]));
        assert_eq!(accounts, vec![account("0899999999", None)]);

        assert!(accounts_from_lookup(lookup_from(&[])).is_empty());
        assert!(accounts_from_lookup(lookup_from(&[("PROMPTPAY", "  ")])).is_empty());
    }

    #[test]
    fn test_from_configs_dedupes_and_validates() {
        let book = AccountBook::from_configs([
            account("081-234-5678", Some("Shop")),
            account("0812345678", None),
            account("1234567890123", Some("  ")),
        ])
        .unwrap();
        assert_eq!(book.accounts().len(), 2);
        assert_eq!(book.accounts()[0].label.as_deref(), Some("Shop"));
        assert_eq!(book.accounts()[1].label, None);
        assert_eq!(book.accounts()[1].display_name(), "123-xxx-0123");

        let err = AccountBook::from_configs([account("12345", None)]).unwrap_err();
        assert!(matches!(err, Error::Config { .. }));
    }

    #[test]
    fn test_resolve() {
        let book = AccountBook::from_configs([
            account("0812345678", Some("Shop")),
            account("1234567890123", None),
        ])
        .unwrap();

        assert_eq!(book.resolve(None).unwrap().payee.digits(), "0812345678");
        assert_eq!(book.resolve(Some(" ")).unwrap().payee.digits(), "0812345678");
        assert_eq!(book.resolve(Some("shop")).unwrap().payee.digits(), "0812345678");
        assert_eq!(
            book.resolve(Some("123-xxx-0123")).unwrap().payee.digits(),
            "1234567890123"
        );
        assert_eq!(
            book.resolve(Some("1-2345-67890-12-3")).unwrap().payee.digits(),
            "1234567890123"
        );
        assert!(matches!(
            book.resolve(Some("0899999999")),
            Err(Error::AccountNotFound { .. })
        ));
    }

    #[test]
    fn test_resolve_on_empty_book() {
        let book = AccountBook::default();
        assert!(book.is_empty());
        assert!(matches!(
            book.resolve(None),
            Err(Error::AccountNotFound { .. })
        ));
    }

    #[test]
    fn test_autocomplete() {
        let book = AccountBook::from_configs([
            account("0812345678", Some("Shop")),
            account("1234567890123", None),
        ])
        .unwrap();

        assert_eq!(book.autocomplete(""), ["Shop", "123-xxx-0123"]);
        assert_eq!(book.autocomplete("SH"), ["Shop"]);
        assert_eq!(book.autocomplete("0123"), ["123-xxx-0123"]);
        assert!(book.autocomplete("zzz").is_empty());
    }

    #[test]
    fn test_same_masked_numbers_get_distinct_names() {
        let book = AccountBook::from_configs([
            account("0811115678", None),
            account("0812225678", None),
            account("0899999999", Some("081-xxx-5678 (2)")),
        ])
        .unwrap();

        assert_eq!(
            book.autocomplete("081"),
            ["081-xxx-5678", "081-xxx-5678 (2)", "081-xxx-5678 (2) (2)"]
        );

        // Each offered name picks its own account back
        for name in book.autocomplete("") {
            let picked = book.resolve(Some(&name)).unwrap();
            assert_eq!(picked.display_name(), name);
        }
        assert_eq!(
            book.resolve(Some("081-xxx-5678 (2)")).unwrap().payee.digits(),
            "0812225678"
        );
    }

    #[test]
    fn test_duplicate_labels_get_suffixes() {
        let book = AccountBook::from_configs([
            account("0812345678", Some("Shop")),
            account("1234567890123", Some("shop")),
        ])
        .unwrap();

        assert_eq!(book.autocomplete(""), ["Shop", "shop (2)"]);
        assert_eq!(
            book.resolve(Some("Shop (2)")).unwrap().payee.digits(),
            "1234567890123"
        );
        assert_eq!(book.resolve(Some("shop")).unwrap().payee.digits(), "0812345678");
    }
}
