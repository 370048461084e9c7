use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// A bare address, as submitted through the contact form or configured as the
/// notification recipient.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmailAddress(pub lettre::Address);

/// An address with an optional display name, used on the wire (`From`, `To`
/// and `Reply-To` headers).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmailAddressWithName(pub lettre::message::Mailbox);

impl EmailAddress {
    pub fn as_str(&self) -> &str {
        self.0.as_ref()
    }

    pub fn with_name(self, name: String) -> EmailAddressWithName {
        EmailAddressWithName(lettre::message::Mailbox {
            name: Some(name),
            email: self.0,
        })
    }

    pub fn into_with_name(self) -> EmailAddressWithName {
        EmailAddressWithName(lettre::message::Mailbox {
            name: None,
            email: self.0,
        })
    }
}

impl FromStr for EmailAddress {
    type Err = <lettre::Address as FromStr>::Err;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.parse().map(Self)
    }
}

impl FromStr for EmailAddressWithName {
    type Err = <lettre::message::Mailbox as FromStr>::Err;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.parse().map(Self)
    }
}

impl std::fmt::Display for EmailAddress {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

impl std::fmt::Display for EmailAddressWithName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_bare_and_named_addresses() {
        let address = "ana@example.com".parse::<EmailAddress>().unwrap();
        assert_eq!(address.as_str(), "ana@example.com");

        let mailbox = "Ana Gómez <ana@example.com>"
            .parse::<EmailAddressWithName>()
            .unwrap();
        assert_eq!(mailbox.0.name.as_deref(), Some("Ana Gómez"));
    }

    #[test]
    fn attaches_the_author_name_for_reply_to() {
        let address = "ana@example.com".parse::<EmailAddress>().unwrap();

        let mailbox = address.with_name("Ana Gómez".into());

        assert_eq!(mailbox.0.name.as_deref(), Some("Ana Gómez"));
        assert_eq!(AsRef::<str>::as_ref(&mailbox.0.email), "ana@example.com");
    }
}
