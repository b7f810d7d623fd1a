use serde_json::json;

use crate::io::session::Session;
use crate::model::board::Board;
use crate::model::user::{User, profile_color_for};
use crate::ops::identity::{UserField, find_key_by_field};
use crate::ops::keys::next_user_key;
use crate::ops::store::{Mutation, OpError, Store};
use crate::ops::validate;

pub const GUEST_NAME: &str = "Guest";
pub const GUEST_EMAIL: &str = "guest@example.com";

/// Input of the sign-up form
#[derive(Debug, Clone, Default)]
pub struct SignupForm {
    pub name: String,
    pub email: String,
    pub password: String,
    pub confirmation: String,
}

/// Validate the sign-up form and build the new user record.
pub fn plan_signup(board: &Board, form: &SignupForm) -> Result<User, OpError> {
    validate::validate_name(&form.name)?;
    validate::validate_email(&form.email)?;
    validate::validate_password(&form.password, &form.confirmation)?;

    let email = form.email.trim();
    if find_key_by_field(&board.users, UserField::Email, email).is_some() {
        return Err(OpError::EmailTaken(email.to_string()));
    }
    let name = form.name.trim();
    if find_key_by_field(&board.users, UserField::Name, name).is_some() {
        return Err(OpError::NameTaken(name.to_string()));
    }

    let mut user = User::new(
        name,
        email,
        "",
        &form.password,
        profile_color_for(board.users.len()),
    );
    user.id = next_user_key(board.users.iter().map(|u| u.id.as_str()), name);
    Ok(user)
}

/// Check credentials. Returns the user's storage key.
pub fn check_credentials<'a>(board: &'a Board, email: &str, password: &str) -> Result<&'a str, OpError> {
    let key = find_key_by_field(&board.users, UserField::Email, email).ok_or(OpError::LoginFailed)?;
    match board.user(key) {
        Some(user) if !user.password.is_empty() && user.password == password => Ok(key),
        _ => Err(OpError::LoginFailed),
    }
}

fn set_logged_in(board: &Board, key: &str, logged_in: bool) -> Result<Mutation, OpError> {
    let mut updated = board
        .user(key)
        .ok_or_else(|| OpError::ContactNotFound(key.to_string()))?
        .clone();
    updated.logged_in = logged_in;
    Ok(Mutation::PatchUser {
        key: key.to_string(),
        fields: json!({ "loggedIn": logged_in }),
        updated,
    })
}

/// Create the account. The new user is not logged in.
pub fn signup(store: &mut Store, form: &SignupForm) -> Result<User, OpError> {
    store.reload()?;
    let user = plan_signup(store.board(), form)?;
    store.commit(&Mutation::PutUser(user.clone()))?;
    Ok(user)
}

/// Log in by email and password, flag the user remotely and record the
/// session. Other users' flags are left alone, so several users can be
/// flagged as logged in at once.
pub fn login(
    store: &mut Store,
    session: &Session,
    email: &str,
    password: &str,
) -> Result<User, OpError> {
    store.reload()?;
    let key = match check_credentials(store.board(), email, password) {
        Ok(key) => key.to_string(),
        Err(e) => {
            tracing::info!(email = %email.trim(), "login rejected");
            return Err(e);
        }
    };
    finish_login(store, session, &key)
}

/// Log in as the shared guest account, creating it on first use.
pub fn guest_login(store: &mut Store, session: &Session) -> Result<User, OpError> {
    store.reload()?;
    let existing = find_key_by_field(&store.board().users, UserField::Name, GUEST_NAME)
        .map(|k| k.to_string());
    let key = match existing {
        Some(key) => key,
        None => {
            let mut guest = User::new(
                GUEST_NAME,
                GUEST_EMAIL,
                "",
                "",
                profile_color_for(store.board().users.len()),
            );
            guest.id = next_user_key(
                store.board().users.iter().map(|u| u.id.as_str()),
                GUEST_NAME,
            );
            let key = guest.id.clone();
            store.commit(&Mutation::PutUser(guest))?;
            key
        }
    };
    finish_login(store, session, &key)
}

fn finish_login(store: &mut Store, session: &Session, key: &str) -> Result<User, OpError> {
    let mutation = set_logged_in(store.board(), key, true)?;
    store.commit(&mutation)?;
    session.set_current_user(key)?;
    tracing::info!(user = %key, "logged in");
    store
        .board()
        .user(key)
        .cloned()
        .ok_or_else(|| OpError::ContactNotFound(key.to_string()))
}

/// Clear the remote flag and the session. If the user record is gone the
/// session is cleared anyway.
pub fn logout(store: &mut Store, session: &Session) -> Result<(), OpError> {
    let key = session.require_user()?;
    store.reload()?;
    if store.board().user(&key).is_some() {
        let mutation = set_logged_in(store.board(), &key, false)?;
        store.commit(&mutation)?;
    } else {
        tracing::warn!(user = %key, "logged-in user no longer exists");
    }
    session.clear_current_user()?;
    Ok(())
}

/// The logged-in user's record, if the session names one that still exists
pub fn current_user<'a>(board: &'a Board, session: &Session) -> Option<&'a User> {
    session.current_user().and_then(|key| board.user(&key))
}
