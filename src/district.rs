//! Static reference data: the supported state, its districts and the
//! reporting periods offered by the dashboard.

use std::fmt::Display;

use serde::{Deserialize, Deserializer, Serialize, de};

/// The only state the dashboard reports on.
pub const STATE_NAME: &str = "Odisha";

/// The districts of [STATE_NAME], in the order they are offered to the user.
pub static DISTRICTS: [&str; 30] = [
    "Angul",
    "Balangir",
    "Balasore",
    "Bargarh",
    "Bhadrak",
    "Boudh",
    "Cuttack",
    "Deogarh",
    "Dhenkanal",
    "Gajapati",
    "Ganjam",
    "Jagatsinghpur",
    "Jajpur",
    "Jharsuguda",
    "Kalahandi",
    "Kandhamal",
    "Kendrapara",
    "Keonjhar",
    "Khordha",
    "Koraput",
    "Malkangiri",
    "Mayurbhanj",
    "Nabarangpur",
    "Nayagarh",
    "Nuapada",
    "Puri",
    "Rayagada",
    "Sambalpur",
    "Subarnapur",
    "Sundargarh",
];

/// A district name that is guaranteed to be one of [DISTRICTS].
///
/// Deserializing a name outside the list fails, so form extractors reject
/// unknown districts before any handler runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(into = "String")]
pub struct District(&'static str);

impl District {
    /// Look up `name` in [DISTRICTS]. The match is exact and case sensitive.
    pub fn new(name: &str) -> Option<Self> {
        DISTRICTS
            .iter()
            .find(|district| **district == name)
            .map(|district| Self(*district))
    }

    /// All districts, in display order.
    pub fn all() -> impl Iterator<Item = District> {
        DISTRICTS.iter().map(|district| Self(*district))
    }

    /// The district's name as it appears in [DISTRICTS].
    pub fn as_str(&self) -> &'static str {
        self.0
    }
}

impl Default for District {
    fn default() -> Self {
        Self(DISTRICTS[0])
    }
}

impl Display for District {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.0)
    }
}

impl TryFrom<String> for District {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        District::new(&value)
            .ok_or_else(|| format!("\"{value}\" is not a district of {STATE_NAME}"))
    }
}

impl<'de> Deserialize<'de> for District {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let name = String::deserialize(deserializer)?;

        District::try_from(name).map_err(de::Error::custom)
    }
}

impl From<District> for String {
    fn from(value: District) -> Self {
        value.0.to_owned()
    }
}

/// The reporting window requested from the backend.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Period {
    /// The current month.
    #[default]
    #[serde(rename = "current")]
    Current,
    /// The last three months.
    #[serde(rename = "3-months")]
    ThreeMonths,
    /// The last six months.
    #[serde(rename = "6-months")]
    SixMonths,
}

impl Period {
    /// Every period, in the order they are offered to the user.
    pub const ALL: [Period; 3] = [Period::Current, Period::ThreeMonths, Period::SixMonths];

    /// The literal sent to the backend as the `period` query parameter.
    pub fn as_query_value(&self) -> &'static str {
        match self {
            Period::Current => "current",
            Period::ThreeMonths => "3-months",
            Period::SixMonths => "6-months",
        }
    }

    /// The label shown in the period selector.
    pub fn label(&self) -> &'static str {
        match self {
            Period::Current => "Current Month",
            Period::ThreeMonths => "Last 3 Months",
            Period::SixMonths => "Last 6 Months",
        }
    }
}

impl Display for Period {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_query_value())
    }
}
