use serde::{Deserialize, Serialize};

/// A contact on the board. Logging in is done as one of these.
///
/// `id` is the storage key the record lives under in the remote document; it
/// is filled in when the keyed document is flattened and never written back
/// into the record body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    #[serde(skip)]
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub phone: String,
    /// Stored in plain text by the backend this client talks to.
    #[serde(default)]
    pub password: String,
    #[serde(default)]
    pub profil_img_color: String,
    #[serde(default)]
    pub logged_in: bool,
}

impl User {
    /// Create a new record with no storage key yet
    pub fn new(name: &str, email: &str, phone: &str, password: &str, color: &str) -> Self {
        User {
            id: String::new(),
            name: name.trim().to_string(),
            email: email.trim().to_string(),
            phone: phone.trim().to_string(),
            password: password.to_string(),
            profil_img_color: color.to_string(),
            logged_in: false,
        }
    }

    /// Avatar initials for this user's name
    pub fn initials(&self) -> String {
        name_initials(&self.name)
    }
}

/// First letter of the first and last word, upper-cased.
///
/// `"john doe"` → `"JD"`, `"Madonna"` → `"M"`, `""` → `""`.
pub fn name_initials(name: &str) -> String {
    let mut words = name.split_whitespace();
    let first = match words.next() {
        Some(w) => w,
        None => return String::new(),
    };
    let mut initials: String = first.chars().take(1).flat_map(char::to_uppercase).collect();
    if let Some(last) = words.next_back() {
        initials.extend(last.chars().take(1).flat_map(char::to_uppercase));
    }
    initials
}

/// Avatar colors handed out to new contacts, in rotation
pub const PROFILE_COLORS: &[&str] = &[
    "#FF7A00", "#FF5EB3", "#6E52FF", "#9327FF", "#00BEE8", "#1FD7C1", "#FF745E", "#FFA35E",
    "#FC71FF", "#FFC701", "#0038FF", "#C3FF2B", "#FFE62B", "#FF4646", "#FFBB2B",
];

/// Pick the avatar color for the next contact given how many already exist
pub fn profile_color_for(existing: usize) -> &'static str {
    PROFILE_COLORS[existing % PROFILE_COLORS.len()]
}
