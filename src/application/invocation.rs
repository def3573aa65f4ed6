use std::collections::HashMap;

use super::errors::ErrorKind;

/// Named string parameters of one command invocation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Invocation {
    params: HashMap<String, String>,
}

impl Invocation {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.set(name, value);
        self
    }

    pub fn set(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.params.insert(name.into(), value.into());
    }

    /// # Errors
    /// `MissingParameter` if `name` was not supplied.
    pub fn param_str(&self, name: &str) -> Result<&str, ErrorKind> {
        self.params
            .get(name)
            .map(String::as_str)
            .ok_or_else(|| ErrorKind::MissingParameter(name.to_owned()))
    }

    /// Decimal or `0x`-prefixed hexadecimal.
    ///
    /// # Errors
    /// `MissingParameter` if absent, `InvalidParameter` if it does not parse.
    pub fn param_u32(&self, name: &str) -> Result<u32, ErrorKind> {
        let raw = self.param_str(name)?;
        let trimmed = raw.trim();
        let parsed = match trimmed.strip_prefix("0x").or_else(|| trimmed.strip_prefix("0X")) {
            Some(hex) => u32::from_str_radix(hex, 16),
            None => trimmed.parse::<u32>(),
        };
        parsed.map_err(|_| ErrorKind::InvalidParameter {
            name: name.to_owned(),
            value: raw.to_owned(),
        })
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Invocation {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut inv = Self::new();
        for (k, v) in iter {
            inv.set(k, v);
        }
        inv
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn u32_accepts_decimal_and_hex() {
        let inv: Invocation = [("a", "42"), ("b", "0x2A"), ("c", " 7 ")].into_iter().collect();
        assert_eq!(inv.param_u32("a"), Ok(42));
        assert_eq!(inv.param_u32("b"), Ok(42));
        assert_eq!(inv.param_u32("c"), Ok(7));
    }

    #[test]
    fn u32_rejects_garbage_and_overflow() {
        let inv = Invocation::new().with("idx", "five").with("big", "4294967296");
        assert_eq!(
            inv.param_u32("idx"),
            Err(ErrorKind::InvalidParameter {
                name: "idx".into(),
                value: "five".into()
            })
        );
        assert!(matches!(inv.param_u32("big"), Err(ErrorKind::InvalidParameter { .. })));
    }

    #[test]
    fn missing_parameter_is_named() {
        let inv = Invocation::new();
        assert_eq!(
            inv.param_str("token_output"),
            Err(ErrorKind::MissingParameter("token_output".into()))
        );
    }
}
