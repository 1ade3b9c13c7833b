use anyhow::{anyhow, Result};
use std::collections::HashMap;

pub const DEFAULT_LBP_SYMBOL: &str = "ل.ل";

/// Upper bound on decimals for LBP amounts.
pub const MAX_CURRENCY_PRECISION: usize = 20;

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum Lang {
    #[default]
    En,
    Ar,
}

impl TryFrom<&str> for Lang {
    type Error = anyhow::Error;

    fn try_from(s: &str) -> Result<Self, Self::Error> {
        match s {
            "en" => Ok(Lang::En),
            "ar" => Ok(Lang::Ar),
            _ => Err(anyhow!(format!("unsupported language `{}'", s))),
        }
    }
}

/// Display settings, usually filled from `option` lines of a checklist
/// document. Keys this crate does not know about are kept as-is.
#[derive(Clone, Debug, PartialEq)]
pub struct Settings {
    pub lbp_symbol: String,
    pub currency_precision: usize,
    pub lang: Lang,
    pub default_company: Option<String>,
    options: HashMap<String, String>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            lbp_symbol: DEFAULT_LBP_SYMBOL.to_string(),
            currency_precision: 0,
            lang: Lang::default(),
            default_company: None,
            options: HashMap::new(),
        }
    }
}

impl Settings {
    pub fn new() -> Self {
        Default::default()
    }

    pub fn set_option(&mut self, key: &str, val: &str) -> Result<()> {
        match key {
            "lbp_symbol" => {
                if val.trim().is_empty() {
                    return Err(anyhow!("option `lbp_symbol' must not be empty"));
                }
                self.lbp_symbol = val.to_string();
            }
            "currency_precision" => {
                let precision = val.parse::<usize>().map_err(|e| {
                    anyhow!(format!("invalid currency_precision `{}': {}", val, e))
                })?;
                if precision > MAX_CURRENCY_PRECISION {
                    return Err(anyhow!(format!(
                        "currency_precision {} is above the maximum of {}",
                        precision, MAX_CURRENCY_PRECISION
                    )));
                }
                self.currency_precision = precision;
            }
            "lang" => self.lang = val.try_into()?,
            "default_company" => self.default_company = Some(val.to_string()),
            _ => {}
        }

        self.options.insert(key.to_string(), val.to_string());
        Ok(())
    }

    pub fn get_option(&self, key: &str) -> Option<&String> {
        self.options.get(key)
    }
}

#[cfg(test)]
mod tests {
    use crate::settings::{Lang, Settings, DEFAULT_LBP_SYMBOL, MAX_CURRENCY_PRECISION};
    use anyhow::Result;

    #[test]
    fn defaults() {
        let settings = Settings::new();
        assert_eq!(settings.lbp_symbol, DEFAULT_LBP_SYMBOL);
        assert_eq!(settings.currency_precision, 0);
        assert_eq!(settings.lang, Lang::En);
    }

    #[test]
    fn set_known_and_unknown_options() -> Result<()> {
        let mut settings = Settings::new();
        settings.set_option("lang", "ar")?;
        settings.set_option("currency_precision", "2")?;
        settings.set_option("author", "me, myself, and I")?;

        assert_eq!(settings.lang, Lang::Ar);
        assert_eq!(settings.currency_precision, 2);
        assert_eq!(settings.get_option("author").unwrap(), "me, myself, and I");
        assert_eq!(settings.get_option("lang").unwrap(), "ar");
        Ok(())
    }

    #[test]
    fn rejects_bad_values() {
        let mut settings = Settings::new();
        assert_eq!(
            format!("{}", settings.set_option("lang", "fr").unwrap_err()),
            "unsupported language `fr'"
        );
        assert!(settings.set_option("currency_precision", "two").is_err());
        assert!(settings.set_option("lbp_symbol", " ").is_err());
        assert_eq!(
            format!("{}", settings.set_option("currency_precision", "70000").unwrap_err()),
            "currency_precision 70000 is above the maximum of 20"
        );
        assert!(settings
            .set_option("currency_precision", &MAX_CURRENCY_PRECISION.to_string())
            .is_ok());
        assert_eq!(settings.currency_precision, MAX_CURRENCY_PRECISION);
        assert_eq!(settings.lbp_symbol, DEFAULT_LBP_SYMBOL);
    }
}
