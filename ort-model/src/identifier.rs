use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt::{Display, Formatter};
use std::str::FromStr;

/// The unique identifier of a package or project, written as `type:namespace:name:version`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Identifier {
    pub r#type: String,
    pub namespace: String,
    pub name: String,
    pub version: String,
}

impl Identifier {
    pub fn new(
        r#type: impl Into<String>,
        namespace: impl Into<String>,
        name: impl Into<String>,
        version: impl Into<String>,
    ) -> Self {
        Self {
            r#type: r#type.into(),
            namespace: namespace.into(),
            name: name.into(),
            version: version.into(),
        }
    }

    /// Parse the string form, missing trailing components become empty.
    ///
    /// The version may contain colons, everything after the third colon is part of it.
    pub fn parse_lenient(value: &str) -> Self {
        let mut parts = value.splitn(4, ':');
        let mut next = || parts.next().unwrap_or_default().to_string();

        Self {
            r#type: next(),
            namespace: next(),
            name: next(),
            version: next(),
        }
    }
}

impl Display for Identifier {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}:{}:{}:{}",
            self.r#type, self.namespace, self.name, self.version
        )
    }
}

impl FromStr for Identifier {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::parse_lenient(s))
    }
}

impl Serialize for Identifier {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Identifier {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = String::deserialize(deserializer)?;
        Ok(Self::parse_lenient(&value))
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn parse_full() {
        let id = Identifier::parse_lenient("Maven:org.apache:commons:1.0");
        assert_eq!(Identifier::new("Maven", "org.apache", "commons", "1.0"), id);
        assert_eq!("Maven:org.apache:commons:1.0", id.to_string());
    }

    #[test]
    fn parse_missing_parts() {
        assert_eq!(
            Identifier::new("NPM", "", "left-pad", ""),
            Identifier::parse_lenient("NPM::left-pad")
        );
        assert_eq!(Identifier::default(), Identifier::parse_lenient(""));
    }

    #[test]
    fn version_with_colons() {
        let id = Identifier::parse_lenient("Go::github.com/x:v1:2");
        assert_eq!("github.com/x", id.name);
        assert_eq!("v1:2", id.version);
    }

    #[test]
    fn serde_as_string() {
        let id = Identifier::new("Gem", "", "rails", "7.1");
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(r#""Gem::rails:7.1""#, json);
        assert_eq!(id, serde_json::from_str::<Identifier>(&json).unwrap());
    }
}
