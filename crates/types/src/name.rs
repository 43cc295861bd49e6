use crate::TypeError;

/// Characters accepted in a client name besides ASCII letters and spaces.
const ACCENTED_LETTERS: &str = "ÁÉÍÓÚÑáéíóúñ";

/// A client's full name as accepted for new bookings.
///
/// The input is trimmed during construction. A valid name has at least
/// [`ClientName::MIN_LEN`] characters and consists only of letters (ASCII plus the
/// accented Spanish vowels and `ñ`) and spaces.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ClientName(String);

impl ClientName {
    /// Minimum number of characters after trimming.
    pub const MIN_LEN: usize = 4;

    /// Creates a new `ClientName` from the given input.
    ///
    /// # Errors
    ///
    /// Returns [`TypeError::Empty`] for blank input, [`TypeError::NameTooShort`] when the
    /// trimmed input is too short and [`TypeError::InvalidNameCharacter`] for the first
    /// character that is neither a letter nor a space.
    pub fn new(input: impl AsRef<str>) -> Result<Self, TypeError> {
        let trimmed = input.as_ref().trim();
        if trimmed.is_empty() {
            return Err(TypeError::Empty);
        }
        if trimmed.chars().count() < Self::MIN_LEN {
            return Err(TypeError::NameTooShort { min: Self::MIN_LEN });
        }
        if let Some(bad) = trimmed.chars().find(|c| !is_name_char(*c)) {
            return Err(TypeError::InvalidNameCharacter(bad));
        }
        Ok(Self(trimmed.to_owned()))
    }

    /// Returns the inner string as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns the key used to detect duplicate bookings for this client.
    pub fn normalized(&self) -> String {
        normalize_name(&self.0)
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}

/// Case and surrounding-whitespace insensitive form of a name.
pub fn normalize_name(name: &str) -> String {
    name.trim().to_lowercase()
}

fn is_name_char(c: char) -> bool {
    c.is_ascii_alphabetic() || c == ' ' || ACCENTED_LETTERS.contains(c)
}

impl std::fmt::Display for ClientName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl AsRef<str> for ClientName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl serde::Serialize for ClientName {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.0)
    }
}

impl<'de> serde::Deserialize<'de> for ClientName {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        ClientName::new(&s).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_accented_names_and_trims() {
        let name = ClientName::new("  María Ñúñez ").expect("valid name");
        assert_eq!(name.as_str(), "María Ñúñez");
    }

    #[test]
    fn rejects_short_names_after_trimming() {
        let err = ClientName::new("  Ana  ").expect_err("too short");
        assert_eq!(err, TypeError::NameTooShort { min: 4 });
    }

    #[test]
    fn rejects_digits_and_punctuation() {
        assert_eq!(
            ClientName::new("Ana 2").expect_err("digit"),
            TypeError::InvalidNameCharacter('2')
        );
        assert_eq!(
            ClientName::new("O'Brien").expect_err("apostrophe"),
            TypeError::InvalidNameCharacter('\'')
        );
    }

    #[test]
    fn rejects_blank_input() {
        assert_eq!(ClientName::new("   ").expect_err("blank"), TypeError::Empty);
    }

    #[test]
    fn normalized_ignores_case_and_padding() {
        let name = ClientName::new("Ana Gomez").unwrap();
        assert_eq!(name.normalized(), normalize_name("  ANA GOMEZ "));
    }

    #[test]
    fn deserialize_validates() {
        let err = serde_json::from_str::<ClientName>("\"Al\"");
        assert!(err.is_err());

        let ok: ClientName = serde_json::from_str("\"Ana Gomez\"").unwrap();
        assert_eq!(ok.as_str(), "Ana Gomez");
    }
}
