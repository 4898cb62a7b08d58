use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::convert::Infallible;
use std::fmt;
use std::str::FromStr;

/// Output voice of a realtime session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Voice {
    Alloy,
    Ash,
    Ballad,
    Coral,
    Echo,
    Fable,
    Onyx,
    Nova,
    Sage,
    Shimmer,
    Verse,
    Custom(String),
}

impl Voice {
    pub fn as_str(&self) -> &str {
        match self {
            Voice::Alloy => "alloy",
            Voice::Ash => "ash",
            Voice::Ballad => "ballad",
            Voice::Coral => "coral",
            Voice::Echo => "echo",
            Voice::Fable => "fable",
            Voice::Onyx => "onyx",
            Voice::Nova => "nova",
            Voice::Sage => "sage",
            Voice::Shimmer => "shimmer",
            Voice::Verse => "verse",
            Voice::Custom(s) => s,
        }
    }
}

impl fmt::Display for Voice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for Voice {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(self.as_str())
    }
}

impl FromStr for Voice {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s {
            "alloy" => Voice::Alloy,
            "ash" => Voice::Ash,
            "ballad" => Voice::Ballad,
            "coral" => Voice::Coral,
            "echo" => Voice::Echo,
            "fable" => Voice::Fable,
            "onyx" => Voice::Onyx,
            "nova" => Voice::Nova,
            "sage" => Voice::Sage,
            "shimmer" => Voice::Shimmer,
            "verse" => Voice::Verse,
            _ => Voice::Custom(s.to_string()),
        })
    }
}

impl<'de> Deserialize<'de> for Voice {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        let Ok(voice) = Voice::from_str(&s);
        Ok(voice)
    }
}

#[cfg(test)]
mod test {
    use super::Voice;

    #[derive(Debug, serde::Serialize, serde::Deserialize)]
    struct VoiceHolder {
        #[serde(skip_serializing_if = "Option::is_none")]
        voice: Option<Voice>,
    }

    #[test]
    fn test_serialize() {
        let holder = VoiceHolder {
            voice: Some(Voice::Ash),
        };
        let json = serde_json::to_string(&holder).unwrap();
        assert_eq!(json, r#"{"voice":"ash"}"#);

        let holder = VoiceHolder {
            voice: Some(Voice::Custom("taro".to_string())),
        };
        let json = serde_json::to_string(&holder).unwrap();
        assert_eq!(json, r#"{"voice":"taro"}"#);

        let holder = VoiceHolder { voice: None };
        assert_eq!(serde_json::to_string(&holder).unwrap(), "{}");
    }

    #[test]
    fn test_deserialize() {
        let holder: VoiceHolder = serde_json::from_str(r#"{"voice":"verse"}"#).unwrap();
        assert_eq!(holder.voice, Some(Voice::Verse));

        let holder: VoiceHolder = serde_json::from_str(r#"{"voice":"emi"}"#).unwrap();
        assert_eq!(holder.voice, Some(Voice::Custom("emi".to_string())));
    }

    #[test]
    fn test_display_matches_wire_name() {
        assert_eq!(Voice::Shimmer.to_string(), "shimmer");
        assert_eq!("ballad".parse::<Voice>().unwrap(), Voice::Ballad);
    }
}
