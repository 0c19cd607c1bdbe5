use serde::{Deserialize, Deserializer};

/// Accepts any YAML scalar: `title: 2024` reads as "2024" and a blank
/// `desc:` as "".
fn scalar_as_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    use serde::de::{self, Visitor};
    use std::fmt;

    struct ScalarString;

    impl<'de> Visitor<'de> for ScalarString {
        type Value = String;

        fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
            formatter.write_str("a string, number, boolean or null")
        }

        fn visit_str<E>(self, value: &str) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            Ok(value.to_string())
        }

        fn visit_string<E>(self, value: String) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            Ok(value)
        }

        fn visit_bool<E>(self, value: bool) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            Ok(value.to_string())
        }

        fn visit_i64<E>(self, value: i64) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            Ok(value.to_string())
        }

        fn visit_u64<E>(self, value: u64) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            Ok(value.to_string())
        }

        fn visit_f64<E>(self, value: f64) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            Ok(value.to_string())
        }

        fn visit_none<E>(self) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            Ok(String::new())
        }

        fn visit_unit<E>(self) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            Ok(String::new())
        }

        fn visit_some<D>(self, deserializer: D) -> Result<Self::Value, D::Error>
        where
            D: Deserializer<'de>,
        {
            deserializer.deserialize_any(ScalarString)
        }
    }

    deserializer.deserialize_any(ScalarString)
}

/// Frontmatter block at the top of a post file.
#[derive(Deserialize, Debug, Clone, Default, PartialEq)]
#[serde(default)]
pub struct Meta {
    #[serde(deserialize_with = "scalar_as_string")]
    pub title: String,
    #[serde(deserialize_with = "scalar_as_string")]
    pub desc: String,
    #[serde(deserialize_with = "scalar_as_string")]
    pub date: String,
    #[serde(deserialize_with = "scalar_as_string")]
    pub author: String,
}

/// Summary of a post as shown in the listing.
#[derive(Debug, Clone, PartialEq)]
pub struct Post {
    pub title: String,
    /// Short description taken from `desc`, not the body.
    pub content: String,
    pub date: String,
    pub author: String,
    pub link: String,
}

impl Post {
    pub fn from_meta(meta: Meta, stem: &str) -> Self {
        Post {
            title: meta.title,
            content: meta.desc,
            date: meta.date,
            author: meta.author,
            link: format!("/posts/{}", stem),
        }
    }
}

/// Contact form submission. Missing fields parse as empty strings and are
/// rejected later by validation.
#[derive(Deserialize, Debug, Clone, Default)]
#[serde(default)]
pub struct ContactMessage {
    pub email: String,
    pub subject: String,
    pub message: String,
}
