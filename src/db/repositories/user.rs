use anyhow::Result;
use chrono::{DateTime, SecondsFormat, Utc};
use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, Set};
use thiserror::Error;

use crate::db::query::{self, UserFilter};
use crate::entities::{prelude::*, users};
use crate::models::user::{
    Coordinates, DateAge, Location, Login, Name, NationalId, Picture, Street, Timezone,
    UserRecord, UserUpdate,
};

/// Zero value written for absent timestamps.
pub const EPOCH: &str = "1970-01-01T00:00:00.000Z";

/// A stored value that is present but not representable in its declared
/// type. Distinguishes corruption from plain absence, which maps to a zero
/// value instead.
#[derive(Debug, Error)]
#[error("corrupt value in column {column}: {value:?}")]
pub struct ConversionError {
    pub column: &'static str,
    pub value: String,
}

pub struct UserRepository {
    conn: DatabaseConnection,
}

impl UserRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    pub async fn list(&self, filter: &UserFilter) -> Result<Vec<UserRecord>> {
        let rows = query::filtered_select(filter).all(&self.conn).await?;
        Ok(rows.into_iter().map(model_to_record).collect())
    }

    pub async fn get(&self, uuid: &str) -> Result<Option<UserRecord>> {
        let row = Users::find_by_id(uuid.to_string()).one(&self.conn).await?;
        Ok(row.map(model_to_record))
    }

    pub async fn insert(&self, record: &UserRecord) -> Result<()> {
        let row = record_to_columns(record)?;
        Users::insert(row).exec(&self.conn).await?;
        Ok(())
    }

    /// Keyed update of the editable columns. Returns the affected-row count;
    /// zero means the uuid matched nothing.
    pub async fn update(&self, uuid: &str, changes: &UserUpdate) -> Result<u64> {
        use sea_orm::sea_query::Expr;

        let result = Users::update_many()
            .col_expr(users::Column::Gender, Expr::value(changes.gender.clone()))
            .col_expr(users::Column::Title, Expr::value(changes.name.title.clone()))
            .col_expr(
                users::Column::FirstName,
                Expr::value(changes.name.first.clone()),
            )
            .col_expr(
                users::Column::LastName,
                Expr::value(changes.name.last.clone()),
            )
            .col_expr(users::Column::Email, Expr::value(changes.email.clone()))
            .col_expr(users::Column::Phone, Expr::value(changes.phone.clone()))
            .filter(users::Column::LoginUuid.eq(uuid))
            .exec(&self.conn)
            .await?;

        Ok(result.rows_affected)
    }

    pub async fn delete(&self, uuid: &str) -> Result<u64> {
        let result = Users::delete_by_id(uuid.to_string()).exec(&self.conn).await?;
        Ok(result.rows_affected)
    }
}

/// Reassembles the nested record from a flat row. Every nullable column maps
/// NULL to its zero value; a row read back never fails on absence.
pub fn model_to_record(model: users::Model) -> UserRecord {
    UserRecord {
        gender: model.gender.unwrap_or_default(),
        name: Name {
            title: model.title.unwrap_or_default(),
            first: model.first_name.unwrap_or_default(),
            last: model.last_name.unwrap_or_default(),
        },
        location: Location {
            street: Street {
                number: model.street_number.unwrap_or(0),
                name: model.street_name.unwrap_or_default(),
            },
            city: model.city.unwrap_or_default(),
            state: model.state.unwrap_or_default(),
            country: model.country.unwrap_or_default(),
            postcode: model.postcode.unwrap_or_default(),
            coordinates: Coordinates {
                latitude: model.latitude.unwrap_or_default(),
                longitude: model.longitude.unwrap_or_default(),
            },
            timezone: Timezone {
                offset: model.timezone_offset.unwrap_or_default(),
                description: model.timezone_description.unwrap_or_default(),
            },
        },
        email: model.email.unwrap_or_default(),
        login: Login {
            uuid: model.login_uuid,
            username: model.login_username.unwrap_or_default(),
            password: model.login_password.unwrap_or_default(),
            salt: model.login_salt.unwrap_or_default(),
            md5: model.login_md5.unwrap_or_default(),
            sha1: model.login_sha1.unwrap_or_default(),
            sha256: model.login_sha256.unwrap_or_default(),
        },
        dob: DateAge {
            date: model.dob_date.unwrap_or_else(|| EPOCH.to_string()),
            age: model.dob_age.unwrap_or(0),
        },
        registered: DateAge {
            date: model.registered_date.unwrap_or_else(|| EPOCH.to_string()),
            age: model.registered_age.unwrap_or(0),
        },
        phone: model.phone.unwrap_or_default(),
        cell: model.cell.unwrap_or_default(),
        id: NationalId {
            name: model.id_name.unwrap_or_default(),
            value: model.id_value,
        },
        picture: Picture {
            large: model.picture_large.unwrap_or_default(),
            medium: model.picture_medium.unwrap_or_default(),
            thumbnail: model.picture_thumbnail.unwrap_or_default(),
        },
        nat: model.nat.unwrap_or_default(),
    }
}

/// Flattens the nested record into the column set written by one insert.
/// Timestamps are validated here: an empty date becomes the epoch, a
/// non-empty unparseable one is corruption and fails the row.
pub fn record_to_columns(record: &UserRecord) -> Result<users::ActiveModel, ConversionError> {
    let dob_date = normalize_timestamp("dob_date", &record.dob.date)?;
    let registered_date = normalize_timestamp("registered_date", &record.registered.date)?;

    Ok(users::ActiveModel {
        login_uuid: Set(record.login.uuid.clone()),
        gender: Set(Some(record.gender.clone())),
        title: Set(Some(record.name.title.clone())),
        first_name: Set(Some(record.name.first.clone())),
        last_name: Set(Some(record.name.last.clone())),
        street_number: Set(Some(record.location.street.number)),
        street_name: Set(Some(record.location.street.name.clone())),
        city: Set(Some(record.location.city.clone())),
        state: Set(Some(record.location.state.clone())),
        country: Set(Some(record.location.country.clone())),
        postcode: Set(Some(record.location.postcode.clone())),
        latitude: Set(Some(record.location.coordinates.latitude.clone())),
        longitude: Set(Some(record.location.coordinates.longitude.clone())),
        timezone_offset: Set(Some(record.location.timezone.offset.clone())),
        timezone_description: Set(Some(record.location.timezone.description.clone())),
        email: Set(Some(record.email.clone())),
        login_username: Set(Some(record.login.username.clone())),
        login_password: Set(Some(record.login.password.clone())),
        login_salt: Set(Some(record.login.salt.clone())),
        login_md5: Set(Some(record.login.md5.clone())),
        login_sha1: Set(Some(record.login.sha1.clone())),
        login_sha256: Set(Some(record.login.sha256.clone())),
        dob_date: Set(Some(dob_date)),
        dob_age: Set(Some(record.dob.age)),
        registered_date: Set(Some(registered_date)),
        registered_age: Set(Some(record.registered.age)),
        phone: Set(Some(record.phone.clone())),
        cell: Set(Some(record.cell.clone())),
        id_name: Set(Some(record.id.name.clone())),
        id_value: Set(record.id.value.clone()),
        picture_large: Set(Some(record.picture.large.clone())),
        picture_medium: Set(Some(record.picture.medium.clone())),
        picture_thumbnail: Set(Some(record.picture.thumbnail.clone())),
        nat: Set(Some(record.nat.clone())),
    })
}

fn normalize_timestamp(column: &'static str, raw: &str) -> Result<String, ConversionError> {
    if raw.trim().is_empty() {
        return Ok(EPOCH.to_string());
    }

    DateTime::parse_from_rfc3339(raw)
        .map(|dt| {
            dt.with_timezone(&Utc)
                .to_rfc3339_opts(SecondsFormat::Millis, true)
        })
        .map_err(|_| ConversionError {
            column,
            value: raw.to_string(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn empty_model(uuid: &str) -> users::Model {
        users::Model {
            login_uuid: uuid.to_string(),
            gender: None,
            title: None,
            first_name: None,
            last_name: None,
            street_number: None,
            street_name: None,
            city: None,
            state: None,
            country: None,
            postcode: None,
            latitude: None,
            longitude: None,
            timezone_offset: None,
            timezone_description: None,
            email: None,
            login_username: None,
            login_password: None,
            login_salt: None,
            login_md5: None,
            login_sha1: None,
            login_sha256: None,
            dob_date: None,
            dob_age: None,
            registered_date: None,
            registered_age: None,
            phone: None,
            cell: None,
            id_name: None,
            id_value: None,
            picture_large: None,
            picture_medium: None,
            picture_thumbnail: None,
            nat: None,
        }
    }

    #[test]
    fn all_null_row_maps_to_zero_values() {
        let record = model_to_record(empty_model("u-1"));
        assert_eq!(record.login.uuid, "u-1");
        assert_eq!(record.gender, "");
        assert_eq!(record.name.first, "");
        assert_eq!(record.location.street.number, 0);
        assert_eq!(record.dob.age, 0);
        assert_eq!(record.dob.date, EPOCH);
        assert_eq!(record.registered.date, EPOCH);
        assert!(record.id.value.is_none());
    }

    #[test]
    fn nested_groups_flatten_to_prefixed_columns() {
        let mut record = UserRecord::default();
        record.login.uuid = "u-2".to_string();
        record.location.street.number = 42;
        record.location.street.name = "Istiklal".to_string();
        record.location.timezone.offset = "+3:00".to_string();
        record.login.sha256 = "deadbeef".to_string();

        let row = record_to_columns(&record).unwrap();
        assert_eq!(row.street_number.unwrap(), Some(42));
        assert_eq!(row.street_name.unwrap(), Some("Istiklal".to_string()));
        assert_eq!(row.timezone_offset.unwrap(), Some("+3:00".to_string()));
        assert_eq!(row.login_sha256.unwrap(), Some("deadbeef".to_string()));
        assert_eq!(row.dob_date.unwrap(), Some(EPOCH.to_string()));
    }

    #[test]
    fn absent_id_value_stores_null() {
        let record = UserRecord::default();
        let row = record_to_columns(&record).unwrap();
        assert_eq!(row.id_value.unwrap(), None);
    }

    #[test]
    fn valid_timestamp_normalizes_to_utc_millis() {
        let normalized = normalize_timestamp("dob_date", "1993-07-20T09:44:18.674Z").unwrap();
        assert_eq!(normalized, "1993-07-20T09:44:18.674Z");

        let shifted = normalize_timestamp("dob_date", "1993-07-20T12:44:18.674+03:00").unwrap();
        assert_eq!(shifted, "1993-07-20T09:44:18.674Z");
    }

    #[test]
    fn malformed_timestamp_is_a_conversion_error() {
        let err = normalize_timestamp("registered_date", "not-a-date").unwrap_err();
        assert_eq!(err.column, "registered_date");
        assert!(err.to_string().contains("not-a-date"));
    }

    #[test]
    fn round_trip_preserves_required_fields() {
        let mut record = UserRecord::default();
        record.login.uuid = "u-3".to_string();
        record.gender = "female".to_string();
        record.name.first = "Ayse".to_string();
        record.name.last = "Demir".to_string();
        record.email = "ayse@example.com".to_string();
        record.phone = "5550001122".to_string();
        record.location.postcode = "34000".to_string();

        let row = record_to_columns(&record).unwrap();
        let model = users::Model {
            login_uuid: record.login.uuid.clone(),
            gender: row.gender.clone().unwrap(),
            title: row.title.clone().unwrap(),
            first_name: row.first_name.clone().unwrap(),
            last_name: row.last_name.clone().unwrap(),
            street_number: row.street_number.clone().unwrap(),
            street_name: row.street_name.clone().unwrap(),
            city: row.city.clone().unwrap(),
            state: row.state.clone().unwrap(),
            country: row.country.clone().unwrap(),
            postcode: row.postcode.clone().unwrap(),
            latitude: row.latitude.clone().unwrap(),
            longitude: row.longitude.clone().unwrap(),
            timezone_offset: row.timezone_offset.clone().unwrap(),
            timezone_description: row.timezone_description.clone().unwrap(),
            email: row.email.clone().unwrap(),
            login_username: row.login_username.clone().unwrap(),
            login_password: row.login_password.clone().unwrap(),
            login_salt: row.login_salt.clone().unwrap(),
            login_md5: row.login_md5.clone().unwrap(),
            login_sha1: row.login_sha1.clone().unwrap(),
            login_sha256: row.login_sha256.clone().unwrap(),
            dob_date: row.dob_date.clone().unwrap(),
            dob_age: row.dob_age.clone().unwrap(),
            registered_date: row.registered_date.clone().unwrap(),
            registered_age: row.registered_age.clone().unwrap(),
            phone: row.phone.clone().unwrap(),
            cell: row.cell.clone().unwrap(),
            id_name: row.id_name.clone().unwrap(),
            id_value: row.id_value.clone().unwrap(),
            picture_large: row.picture_large.clone().unwrap(),
            picture_medium: row.picture_medium.clone().unwrap(),
            picture_thumbnail: row.picture_thumbnail.clone().unwrap(),
            nat: row.nat.clone().unwrap(),
        };

        let read_back = model_to_record(model);
        assert_eq!(read_back.gender, record.gender);
        assert_eq!(read_back.name.first, record.name.first);
        assert_eq!(read_back.name.last, record.name.last);
        assert_eq!(read_back.email, record.email);
        assert_eq!(read_back.phone, record.phone);
        assert_eq!(read_back.location.postcode, record.location.postcode);
    }
}
