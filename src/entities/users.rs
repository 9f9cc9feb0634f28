use sea_orm::entity::prelude::*;

/// Flattened relational shape of a user record. Nested groups in the wire
/// model map to `<group>_<field>` columns. `postcode`, `latitude` and
/// `longitude` stay TEXT since the upstream source is inconsistent about
/// their types.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "users")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub login_uuid: String,

    pub gender: Option<String>,

    pub title: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,

    pub street_number: Option<i32>,
    pub street_name: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub country: Option<String>,
    pub postcode: Option<String>,
    pub latitude: Option<String>,
    pub longitude: Option<String>,
    pub timezone_offset: Option<String>,
    pub timezone_description: Option<String>,

    pub email: Option<String>,

    pub login_username: Option<String>,
    pub login_password: Option<String>,
    pub login_salt: Option<String>,
    pub login_md5: Option<String>,
    pub login_sha1: Option<String>,
    pub login_sha256: Option<String>,

    pub dob_date: Option<String>,
    pub dob_age: Option<i32>,
    pub registered_date: Option<String>,
    pub registered_age: Option<i32>,

    pub phone: Option<String>,
    pub cell: Option<String>,

    pub id_name: Option<String>,
    pub id_value: Option<String>,

    pub picture_large: Option<String>,
    pub picture_medium: Option<String>,
    pub picture_thumbnail: Option<String>,

    pub nat: Option<String>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
