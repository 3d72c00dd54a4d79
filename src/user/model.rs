use diesel::prelude::{AsChangeset, Identifiable, Insertable, Queryable, Selectable};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{DEFAULT_AVATAR, Id};

#[derive(Queryable, Selectable, Identifiable, Clone, Debug)]
#[diesel(table_name = crate::schema::users)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct User {
    id: Uuid,
    first_name: String,
    last_name: String,
    photo: Option<String>,
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::users)]
pub struct NewUser<'a> {
    id: &'a Uuid,
    first_name: &'a str,
    last_name: &'a str,
    email: &'a str,
    photo: Option<&'a str>,
}

impl<'a> NewUser<'a> {
    pub fn new(
        id: &'a Id,
        first_name: &'a str,
        last_name: &'a str,
        email: &'a str,
        photo: Option<&'a str>,
    ) -> Self {
        Self {
            id: id.get(),
            first_name,
            last_name,
            email,
            photo,
        }
    }
}

/// Columns left as `None` keep their stored value.
#[derive(AsChangeset)]
#[diesel(table_name = crate::schema::users)]
pub struct ProfileUpdate {
    first_name: Option<String>,
    last_name: Option<String>,
    photo: Option<String>,
}

impl ProfileUpdate {
    pub fn new(
        first_name: Option<String>,
        last_name: Option<String>,
        photo: Option<String>,
    ) -> Self {
        let non_blank = |s: Option<String>| s.filter(|s| !s.trim().is_empty());
        Self {
            first_name: non_blank(first_name),
            last_name: non_blank(last_name),
            photo: non_blank(photo),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.first_name.is_none() && self.last_name.is_none() && self.photo.is_none()
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Profile {
    id: Id,
    first_name: String,
    last_name: String,
    photo: Option<String>,
}

impl Profile {
    pub fn new(
        id: Id,
        first_name: impl Into<String>,
        last_name: impl Into<String>,
        photo: Option<String>,
    ) -> Self {
        Self {
            id,
            first_name: first_name.into(),
            last_name: last_name.into(),
            photo,
        }
    }

    pub const fn id(&self) -> &Id {
        &self.id
    }

    pub fn first_name(&self) -> &str {
        &self.first_name
    }

    pub fn last_name(&self) -> &str {
        &self.last_name
    }

    pub fn photo(&self) -> Option<&str> {
        self.photo.as_deref()
    }

    pub fn display_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }

    pub fn picture(&self) -> &str {
        self.photo
            .as_deref()
            .filter(|p| !p.is_empty())
            .unwrap_or(DEFAULT_AVATAR)
    }
}

impl From<User> for Profile {
    fn from(u: User) -> Self {
        Self {
            id: Id(u.id),
            first_name: u.first_name,
            last_name: u.last_name,
            photo: u.photo,
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn should_join_names_into_display_name() {
        let p = Profile::new(Id::random(), "Rosalind", "Franklin", None);

        assert_eq!(p.display_name(), "Rosalind Franklin");
    }

    #[test]
    fn should_fall_back_to_default_avatar() {
        let without = Profile::new(Id::random(), "Marie", "Curie", None);
        let blank = Profile::new(Id::random(), "Marie", "Curie", Some(String::new()));
        let with = Profile::new(Id::random(), "Marie", "Curie", Some("data:image/png;base64,AA".into()));

        assert_eq!(without.picture(), DEFAULT_AVATAR);
        assert_eq!(blank.picture(), DEFAULT_AVATAR);
        assert_eq!(with.picture(), "data:image/png;base64,AA");
    }

    #[test]
    fn should_drop_blank_fields_from_update() {
        let update = ProfileUpdate::new(Some("  ".into()), None, Some(String::new()));

        assert!(update.is_empty());
    }
}
