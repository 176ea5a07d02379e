use mongodb::bson::serde_helpers::serialize_object_id_as_hex_string;
use mongodb::bson::{doc, oid::ObjectId, Bson, Document};
use serde::{Deserialize, Serialize};

/// Coarse permission category stored on every user record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    #[default]
    User,
    Trainer,
    Admin,
}

impl Role {
    pub const ALL: [Role; 3] = [Role::User, Role::Trainer, Role::Admin];

    pub fn as_str(self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Trainer => "trainer",
            Role::Admin => "admin",
        }
    }

    /// Role stored in a raw document, if it holds one of the known values.
    pub fn parse(s: &str) -> Option<Role> {
        match s {
            "user" => Some(Role::User),
            "trainer" => Some(Role::Trainer),
            "admin" => Some(Role::Admin),
            _ => None,
        }
    }
}

/// Trainer-approval sub-state. Only meaningful while the record's role is
/// `trainer`; demotion rewrites it to `disapproved` and later transitions
/// leave it behind untouched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TrainerStatus {
    Approved,
    Disapproved,
}

impl TrainerStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            TrainerStatus::Approved => "approved",
            TrainerStatus::Disapproved => "disapproved",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    #[serde(rename = "_id", serialize_with = "serialize_object_id_as_hex_string")]
    pub id: ObjectId,
    pub email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default)]
    pub role: Role,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<TrainerStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub skills: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub available_days: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub available_slots: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub socials: Option<Bson>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub experience: Option<u32>,
}

#[derive(Debug, Deserialize)]
pub struct NewUser {
    pub email: String,
    pub name: Option<String>,
}

impl NewUser {
    /// Document stored for a fresh registration. New accounts always start
    /// as plain users; trainer and admin are only reachable through the
    /// role endpoints.
    pub fn into_document(self) -> Document {
        let mut user = doc! { "email": self.email, "role": Role::User.as_str() };
        if let Some(name) = self.name {
            user.insert("name", name);
        }
        user
    }
}

/// Body of the trainer-approval PATCH. Field names follow the admin
/// dashboard's payload, trainer* prefixes included; `experence` is the
/// spelling the dashboard historically sent.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrainerApproval {
    pub trainer_email: Option<String>,
    pub trainer_name: Option<String>,
    pub role: Option<Role>,
    pub trainer_skills: Option<Vec<String>>,
    pub trainer_available_days: Option<Vec<String>>,
    pub available_slots: Option<Vec<String>>,
    pub socials: Option<Bson>,
    #[serde(alias = "experence")]
    pub experience: Option<u32>,
}

impl TrainerApproval {
    pub fn into_profile(self) -> TrainerProfile {
        TrainerProfile {
            name: self.trainer_name,
            skills: self.trainer_skills,
            available_days: self.trainer_available_days,
            available_slots: self.available_slots,
            socials: self.socials,
            experience: self.experience,
        }
    }
}

/// Profile fields written onto a user record by an approval.
#[derive(Debug, Clone, Default)]
pub struct TrainerProfile {
    pub name: Option<String>,
    pub skills: Option<Vec<String>>,
    pub available_days: Option<Vec<String>>,
    pub available_slots: Option<Vec<String>>,
    pub socials: Option<Bson>,
    pub experience: Option<u32>,
}

impl TrainerProfile {
    /// `$set` fragment for the fields the approval supplied. Fields absent
    /// from the request are left alone rather than overwritten with nulls.
    pub fn into_set(self) -> Document {
        let mut set = Document::new();
        if let Some(name) = self.name {
            set.insert("name", name);
        }
        if let Some(skills) = self.skills {
            set.insert("skills", skills);
        }
        if let Some(days) = self.available_days {
            set.insert("availableDays", days);
        }
        if let Some(slots) = self.available_slots {
            set.insert("availableSlots", slots);
        }
        if let Some(socials) = self.socials {
            set.insert("socials", socials);
        }
        if let Some(years) = self.experience {
            set.insert("experience", i64::from(years));
        }
        set
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn approval_body_uses_dashboard_field_names() {
        let body: TrainerApproval = serde_json::from_value(serde_json::json!({
            "trainerEmail": "t@gym.io",
            "trainerName": "Jo",
            "trainerSkills": ["yoga", "boxing"],
            "trainerAvailableDays": ["mon", "wed"],
            "availableSlots": ["6-8"],
            "socials": {"instagram": "https://instagram.com/jo"},
            "experence": 4
        }))
        .unwrap();

        assert_eq!(body.trainer_email.as_deref(), Some("t@gym.io"));
        assert_eq!(
            body.trainer_skills.as_deref(),
            Some(&["yoga".to_string(), "boxing".to_string()][..])
        );
        assert_eq!(
            body.trainer_available_days.as_deref(),
            Some(&["mon".to_string(), "wed".to_string()][..])
        );
        assert_eq!(body.experience, Some(4));
        assert!(body.role.is_none());
    }

    #[test]
    fn approval_body_accepts_corrected_experience_spelling() {
        let body: TrainerApproval =
            serde_json::from_value(serde_json::json!({ "experience": 7 })).unwrap();
        assert_eq!(body.experience, Some(7));
    }

    #[test]
    fn profile_set_skips_absent_fields() {
        let set = TrainerProfile {
            name: Some("Jo".into()),
            experience: Some(4),
            ..TrainerProfile::default()
        }
        .into_set();

        assert_eq!(set.get_str("name").unwrap(), "Jo");
        assert_eq!(set.get_i64("experience").unwrap(), 4);
        assert!(!set.contains_key("skills"));
        assert!(!set.contains_key("socials"));
    }

    #[test]
    fn registration_document_always_starts_as_plain_user() {
        let user = NewUser { email: "a@b.c".into(), name: None }.into_document();
        assert_eq!(user.get_str("role").unwrap(), "user");
        assert!(!user.contains_key("status"));
        assert!(!user.contains_key("name"));
    }

    #[test]
    fn user_json_carries_hex_id_and_lowercase_role() {
        let user = User {
            id: ObjectId::parse_str("66a0c3f2b1d24a3e9c8d7e51").unwrap(),
            email: "a@b.c".into(),
            name: Some("A".into()),
            role: Role::Trainer,
            status: Some(TrainerStatus::Approved),
            skills: Some(vec!["yoga".into()]),
            available_days: None,
            available_slots: None,
            socials: None,
            experience: None,
        };

        let json = serde_json::to_value(&user).unwrap();
        assert_eq!(json["_id"], "66a0c3f2b1d24a3e9c8d7e51");
        assert_eq!(json["role"], "trainer");
        assert_eq!(json["status"], "approved");
        assert!(json.get("availableDays").is_none());
    }
}
