use serde::{Deserialize, Deserializer, Serialize};

/// One synthetic user as produced by the random-user generator service and
/// served back by the API. All fields decode tolerantly: anything absent in
/// the input lands on its `Default` value instead of failing the record.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct UserRecord {
    pub gender: String,
    pub name: Name,
    pub location: Location,
    pub email: String,
    pub login: Login,
    pub dob: DateAge,
    pub registered: DateAge,
    pub phone: String,
    pub cell: String,
    pub id: NationalId,
    pub picture: Picture,
    pub nat: String,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Name {
    pub title: String,
    pub first: String,
    pub last: String,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Location {
    pub street: Street,
    pub city: String,
    pub state: String,
    pub country: String,
    /// The upstream source encodes this as either a number or a string.
    /// It is always carried as text to avoid precision/type ambiguity.
    #[serde(deserialize_with = "postcode_as_string")]
    pub postcode: String,
    pub coordinates: Coordinates,
    pub timezone: Timezone,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Street {
    pub number: i32,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Coordinates {
    pub latitude: String,
    pub longitude: String,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Timezone {
    pub offset: String,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Login {
    pub uuid: String,
    pub username: String,
    pub password: String,
    pub salt: String,
    pub md5: String,
    pub sha1: String,
    pub sha256: String,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct DateAge {
    /// RFC 3339 timestamp as sent by the source.
    pub date: String,
    pub age: i32,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct NationalId {
    pub name: String,
    /// Absent for nationalities without a national id scheme.
    pub value: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Picture {
    pub large: String,
    pub medium: String,
    pub thumbnail: String,
}

/// Lightweight creation payload used by the `add` endpoint.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct NewUser {
    pub gender: String,
    pub username: String,
    pub name: Name,
    pub email: String,
    pub phone: String,
}

/// Full-field update payload. Only the editable columns are touched by an
/// update; everything else on the row is left as stored.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct UserUpdate {
    pub gender: String,
    pub name: Name,
    pub email: String,
    pub phone: String,
}

impl NewUser {
    /// Expands the lightweight payload into a full record; every field the
    /// payload does not carry stays at its zero value.
    #[must_use]
    pub fn into_record(self) -> UserRecord {
        UserRecord {
            gender: self.gender,
            name: self.name,
            email: self.email,
            phone: self.phone,
            login: Login {
                username: self.username,
                ..Login::default()
            },
            ..UserRecord::default()
        }
    }
}

fn postcode_as_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Text(String),
        Int(i64),
        Float(f64),
    }

    Ok(match Raw::deserialize(deserializer)? {
        Raw::Text(s) => s,
        Raw::Int(n) => n.to_string(),
        Raw::Float(n) => n.to_string(),
    })
}
