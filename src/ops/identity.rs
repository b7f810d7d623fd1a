use crate::model::user::User;

/// User fields that can be used to look a user up
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UserField {
    Name,
    Email,
}

impl UserField {
    fn value_of(self, user: &User) -> &str {
        match self {
            UserField::Name => &user.name,
            UserField::Email => &user.email,
        }
    }
}

/// Storage key of the first user whose `field` equals `value`.
///
/// Names are not unique; with duplicates the earliest user in storage order
/// wins. Emails compare case-insensitively, names exactly.
pub fn find_key_by_field<'a>(users: &'a [User], field: UserField, value: &str) -> Option<&'a str> {
    let value = value.trim();
    users
        .iter()
        .find(|u| match field {
            UserField::Email => field.value_of(u).eq_ignore_ascii_case(value),
            UserField::Name => field.value_of(u) == value,
        })
        .map(|u| u.id.as_str())
}
