use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;

use crate::wizard::errors::WizardError;

/// Public group locator, optionally with the `?join` suffix and a trailing slash.
static GROUP_LINK: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^https://t\.me/[A-Za-z0-9_]+(\?join)?/?$").expect("group link pattern is valid")
});

/// Which of the two step 1 inputs a link belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GroupLinkField {
    Source,
    Destination,
}

impl std::fmt::Display for GroupLinkField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GroupLinkField::Source => write!(f, "source group"),
            GroupLinkField::Destination => write!(f, "destination group"),
        }
    }
}

pub fn is_valid_group_link(link: &str) -> bool {
    GROUP_LINK.is_match(link)
}

/// Check a locator syntactically. Whether the handle exists is not knowable here.
pub fn validate_group_link(field: GroupLinkField, link: &str) -> Result<(), WizardError> {
    if is_valid_group_link(link) {
        Ok(())
    } else {
        Err(WizardError::InvalidLink {
            field,
            value: link.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accepts_public_group_links() {
        assert!(is_valid_group_link("https://t.me/cryptotraders"));
        assert!(is_valid_group_link("https://t.me/my_group_01/"));
        assert!(is_valid_group_link("https://t.me/mygrouppriv?join"));
        assert!(is_valid_group_link("https://t.me/mygrouppriv?join/"));
    }

    #[test]
    fn test_rejects_malformed_links() {
        for link in [
            "",
            "not-a-link",
            "http://t.me/cryptotraders",
            "https://t.me/",
            "https://t.me/crypto-traders",
            "https://telegram.me/cryptotraders",
            "https://t.me/cryptotraders?start",
            " https://t.me/cryptotraders",
            "https://t.me/cryptotraders//",
        ] {
            assert!(!is_valid_group_link(link), "{link:?} should be rejected");
        }
    }

    #[test]
    fn test_rejection_names_the_field() {
        let err = validate_group_link(GroupLinkField::Destination, "nope").unwrap_err();
        match err {
            WizardError::InvalidLink { field, value } => {
                assert_eq!(field, GroupLinkField::Destination);
                assert_eq!(value, "nope");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }
}
