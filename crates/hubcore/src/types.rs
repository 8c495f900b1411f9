use std::fmt;
use std::str::FromStr;

/// Marketplace account type
///
/// Every registered user is a client until a freelancer onboarding flow
/// exists; nothing writes any other value yet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum AccountType {
    #[default]
    Client,
    Freelancer,
}

impl AccountType {
    pub fn as_str(&self) -> &'static str {
        match self {
            AccountType::Client => "client",
            AccountType::Freelancer => "freelancer",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            AccountType::Client => "Client",
            AccountType::Freelancer => "Freelancer",
        }
    }
}

impl fmt::Display for AccountType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AccountType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "client" => Ok(AccountType::Client),
            "freelancer" => Ok(AccountType::Freelancer),
            _ => Err(format!("Unknown account type: {}", s)),
        }
    }
}

// rusqlite FromSql: read account type from DB text column
impl rusqlite::types::FromSql for AccountType {
    fn column_result(value: rusqlite::types::ValueRef<'_>) -> rusqlite::types::FromSqlResult<Self> {
        let s = value.as_str()?;
        AccountType::from_str(s)
            .map_err(|e| rusqlite::types::FromSqlError::Other(Box::new(std::io::Error::other(e))))
    }
}

// rusqlite ToSql: write account type as text to DB
impl rusqlite::types::ToSql for AccountType {
    fn to_sql(&self) -> rusqlite::Result<rusqlite::types::ToSqlOutput<'_>> {
        Ok(rusqlite::types::ToSqlOutput::Borrowed(rusqlite::types::ValueRef::Text(
            self.as_str().as_bytes(),
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_account_type_from_str() {
        assert_eq!(AccountType::from_str("client").unwrap(), AccountType::Client);
        assert_eq!(AccountType::from_str("freelancer").unwrap(), AccountType::Freelancer);
        assert!(AccountType::from_str("admin").is_err());
    }

    #[test]
    fn test_account_type_display() {
        assert_eq!(AccountType::Client.to_string(), "client");
        assert_eq!(AccountType::Freelancer.to_string(), "freelancer");
    }

    #[test]
    fn test_account_type_display_name() {
        assert_eq!(AccountType::Client.display_name(), "Client");
        assert_eq!(AccountType::Freelancer.display_name(), "Freelancer");
    }

    #[test]
    fn test_account_type_default() {
        assert_eq!(AccountType::default(), AccountType::Client);
    }

    #[test]
    fn test_account_type_round_trip() {
        for account_type in [AccountType::Client, AccountType::Freelancer] {
            assert_eq!(AccountType::from_str(account_type.as_str()).unwrap(), account_type);
        }
    }
}
