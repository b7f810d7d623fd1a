use serde_json::{Map, Value, json};

use crate::model::board::Board;
use crate::model::user::{User, profile_color_for};
use crate::ops::identity::{UserField, find_key_by_field};
use crate::ops::keys::next_user_key;
use crate::ops::store::{Mutation, OpError};
use crate::ops::validate;

/// Input of the add/edit contact dialog
#[derive(Debug, Clone, Default)]
pub struct ContactDraft {
    pub name: String,
    pub email: String,
    pub phone: String,
}

/// Add a contact. Contacts added here have no password and cannot log in
/// until they sign up themselves.
pub fn add_contact(board: &Board, draft: &ContactDraft) -> Result<Mutation, OpError> {
    validate::validate_name(&draft.name)?;
    validate::validate_email(&draft.email)?;
    validate::validate_phone(&draft.phone)?;

    let name = draft.name.trim();
    if find_key_by_field(&board.users, UserField::Name, name).is_some() {
        return Err(OpError::NameTaken(name.to_string()));
    }
    let email = draft.email.trim();
    if find_key_by_field(&board.users, UserField::Email, email).is_some() {
        return Err(OpError::EmailTaken(email.to_string()));
    }

    let mut user = User::new(
        name,
        &draft.email,
        &draft.phone,
        "",
        profile_color_for(board.users.len()),
    );
    user.id = next_user_key(board.users.iter().map(|u| u.id.as_str()), name);
    Ok(Mutation::PutUser(user))
}

/// Fields changed in the edit dialog; `None` leaves a field alone
#[derive(Debug, Clone, Default)]
pub struct ContactEdit {
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
}

/// Patch the changed fields of a contact. The storage key never changes,
/// even when the name (and so the initials) does.
pub fn edit_contact(board: &Board, key: &str, edit: &ContactEdit) -> Result<Mutation, OpError> {
    let mut updated = board
        .user(key)
        .ok_or_else(|| OpError::ContactNotFound(key.to_string()))?
        .clone();
    let mut fields = Map::new();

    if let Some(name) = &edit.name {
        validate::validate_name(name)?;
        let name = name.trim();
        if let Some(other) = find_key_by_field(&board.users, UserField::Name, name)
            && other != key
        {
            return Err(OpError::NameTaken(name.to_string()));
        }
        updated.name = name.to_string();
        fields.insert("name".into(), json!(updated.name));
    }
    if let Some(email) = &edit.email {
        validate::validate_email(email)?;
        let email = email.trim();
        // Login resolves by first email match, so emails stay unique
        if let Some(other) = find_key_by_field(&board.users, UserField::Email, email)
            && other != key
        {
            return Err(OpError::EmailTaken(email.to_string()));
        }
        updated.email = email.to_string();
        fields.insert("email".into(), json!(updated.email));
    }
    if let Some(phone) = &edit.phone {
        validate::validate_phone(phone)?;
        updated.phone = phone.trim().to_string();
        fields.insert("phone".into(), json!(updated.phone));
    }

    Ok(Mutation::PatchUser {
        key: key.to_string(),
        fields: Value::Object(fields),
        updated,
    })
}

/// Delete a contact and remove it from every task it was assigned to, so no
/// task is left pointing at a missing user.
pub fn delete_contact(board: &Board, key: &str) -> Result<Mutation, OpError> {
    if board.user(key).is_none() {
        return Err(OpError::ContactNotFound(key.to_string()));
    }
    let unassign = board
        .tasks
        .iter()
        .filter(|t| t.is_assigned(key))
        .map(|t| {
            let remaining = t
                .assigned_contacts
                .iter()
                .filter(|k| *k != key)
                .cloned()
                .collect();
            (t.id.clone(), remaining)
        })
        .collect();
    Ok(Mutation::DeleteUser {
        key: key.to_string(),
        unassign,
    })
}

/// Look a contact up by storage key, exact name or email
pub fn resolve_contact<'a>(board: &'a Board, needle: &str) -> Option<&'a User> {
    if let Some(user) = board.user(needle) {
        return Some(user);
    }
    find_key_by_field(&board.users, UserField::Name, needle)
        .or_else(|| find_key_by_field(&board.users, UserField::Email, needle))
        .and_then(|key| board.user(key))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::io::board_client::BoardClient;
    use crate::io::remote::MemoryStore;
    use crate::ops::store::Store;
    use crate::ops::validate::ValidationError;
    use std::sync::Arc;

    fn seeded() -> Store {
        let memory = Arc::new(MemoryStore::with_root(json!({
            "b": {
                "users": {
                    "AB100": {"name": "Anja Berg", "email": "anja@example.com", "password": "pw"},
                    "CD100": {"name": "Carl Dorn", "email": "carl@example.com"}
                },
                "tasks": {
                    "task0": {"title": "A", "taskState": "to-do", "assignedContacts": ["AB100", "CD100"]},
                    "task1": {"title": "B", "taskState": "done", "assignedContacts": ["CD100"]}
                }
            }
        })));
        let mut store = Store::new(BoardClient::new(memory, "b"));
        store.reload().unwrap();
        store
    }

    fn draft(name: &str) -> ContactDraft {
        ContactDraft {
            name: name.into(),
            email: "new@example.com".into(),
            phone: "+49 30 123456".into(),
        }
    }

    #[test]
    fn add_allocates_initials_key_and_color() {
        let mut store = seeded();
        let m = add_contact(store.board(), &draft("Anton Bauer")).unwrap();
        store.commit(&m).unwrap();
        store.reload().unwrap();
        let user = store.board().user("AB101").unwrap();
        assert_eq!(user.name, "Anton Bauer");
        assert_eq!(user.profil_img_color, profile_color_for(2));
        assert!(!user.logged_in);
    }

    #[test]
    fn add_rejects_taken_name() {
        let store = seeded();
        assert!(matches!(
            add_contact(store.board(), &draft("Anja Berg")),
            Err(OpError::NameTaken(name)) if name == "Anja Berg"
        ));
    }

    #[test]
    fn add_validates_fields() {
        let store = seeded();
        let mut d = draft("Anton Bauer");
        d.email = "nope".into();
        assert!(matches!(
            add_contact(store.board(), &d),
            Err(OpError::Validation(ValidationError::MalformedEmail(_)))
        ));
        assert!(matches!(
            add_contact(store.board(), &draft("4nton")),
            Err(OpError::Validation(ValidationError::MalformedName(_)))
        ));
    }

    #[test]
    fn edit_keeps_key_and_patches_fields() {
        let mut store = seeded();
        let edit = ContactEdit {
            phone: Some("0301234567".into()),
            name: Some("Anja Berg-Lund".into()),
            ..Default::default()
        };
        let m = edit_contact(store.board(), "AB100", &edit).unwrap();
        match &m {
            Mutation::PatchUser { fields, .. } => {
                assert_eq!(fields, &json!({"name": "Anja Berg-Lund", "phone": "0301234567"}));
            }
            other => panic!("unexpected {:?}", other),
        }
        store.commit(&m).unwrap();
        store.reload().unwrap();
        let user = store.board().user("AB100").unwrap();
        assert_eq!(user.name, "Anja Berg-Lund");
        assert_eq!(user.password, "pw");
    }

    #[test]
    fn edit_to_another_contacts_name_is_rejected() {
        let store = seeded();
        let edit = ContactEdit {
            name: Some("Carl Dorn".into()),
            ..Default::default()
        };
        assert!(matches!(
            edit_contact(store.board(), "AB100", &edit),
            Err(OpError::NameTaken(_))
        ));
        // Keeping one's own name is fine
        let edit = ContactEdit {
            name: Some("Anja Berg".into()),
            ..Default::default()
        };
        assert!(edit_contact(store.board(), "AB100", &edit).is_ok());
    }

    #[test]
    fn add_rejects_taken_email() {
        let store = seeded();
        let mut d = draft("Anton Bauer");
        d.email = "CARL@example.com".into();
        assert!(matches!(
            add_contact(store.board(), &d),
            Err(OpError::EmailTaken(email)) if email == "CARL@example.com"
        ));
    }

    #[test]
    fn edit_to_another_accounts_email_is_rejected() {
        let store = seeded();
        let edit = ContactEdit {
            email: Some("carl@example.com".into()),
            ..Default::default()
        };
        assert!(matches!(
            edit_contact(store.board(), "AB100", &edit),
            Err(OpError::EmailTaken(_))
        ));
        let edit = ContactEdit {
            email: Some("anja@example.com".into()),
            ..Default::default()
        };
        assert!(edit_contact(store.board(), "AB100", &edit).is_ok());
    }

    #[test]
    fn earlier_contact_cannot_take_a_registered_email() {
        let memory = Arc::new(MemoryStore::with_root(json!({
            "b": {"users": {
                "AA100": {"name": "Ada Adler", "email": "ada@example.com"},
                "CD100": {"name": "Carl Dorn", "email": "carl@example.com", "password": "secret"}
            }}
        })));
        let mut store = Store::new(BoardClient::new(memory, "b"));
        store.reload().unwrap();
        let edit = ContactEdit {
            email: Some("carl@example.com".into()),
            ..Default::default()
        };
        assert!(edit_contact(store.board(), "AA100", &edit).is_err());
        assert_eq!(
            crate::ops::auth_ops::check_credentials(store.board(), "carl@example.com", "secret")
                .unwrap(),
            "CD100"
        );
    }

    #[test]
    fn delete_scrubs_assignments() {
        let mut store = seeded();
        let m = delete_contact(store.board(), "CD100").unwrap();
        store.commit(&m).unwrap();
        store.reload().unwrap();
        assert!(store.board().user("CD100").is_none());
        assert_eq!(store.board().task("task0").unwrap().assigned_contacts, vec!["AB100"]);
        assert!(store.board().task("task1").unwrap().assigned_contacts.is_empty());
    }

    #[test]
    fn resolve_by_key_name_or_email() {
        let store = seeded();
        let board = store.board();
        assert_eq!(resolve_contact(board, "CD100").unwrap().name, "Carl Dorn");
        assert_eq!(resolve_contact(board, "Carl Dorn").unwrap().id, "CD100");
        assert_eq!(resolve_contact(board, "ANJA@example.com").unwrap().id, "AB100");
        assert!(resolve_contact(board, "nobody").is_none());
    }
}
