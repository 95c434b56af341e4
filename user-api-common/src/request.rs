//! Request payloads and the validation step that turns them into writes.
//!
//! Payload fields are all optional at the deserialization layer so that a
//! missing field surfaces as a [`ValidationError`] naming that field rather
//! than as a JSON parse failure.

use serde::{Deserialize, Deserializer, Serialize};
use utoipa::ToSchema;

/// A user field that callers can write.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UserField {
    FirstName,
    LastName,
    Email,
}

impl UserField {
    /// JSON name of the field.
    pub fn name(&self) -> &'static str {
        match self {
            UserField::FirstName => "firstName",
            UserField::LastName => "lastName",
            UserField::Email => "email",
        }
    }

    /// Message reported when the field is missing or empty.
    pub fn required_message(&self) -> &'static str {
        match self {
            UserField::FirstName => "Please enter first name",
            UserField::LastName => "Please enter Last name",
            UserField::Email => "Please enter your email",
        }
    }
}

/// Fields that failed validation, in declaration order.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("User validation failed: {}", format_fields(.fields))]
pub struct ValidationError {
    pub fields: Vec<UserField>,
}

fn format_fields(fields: &[UserField]) -> String {
    fields
        .iter()
        .map(|field| format!("{}: {}", field.name(), field.required_message()))
        .collect::<Vec<_>>()
        .join(", ")
}

/// Read an optional text field, accepting numbers and booleans as their
/// textual form. Objects and arrays are rejected.
fn scalar_as_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Scalar {
        Text(String),
        Bool(bool),
        Int(i64),
        UInt(u64),
        Float(f64),
    }

    Ok(Option::<Scalar>::deserialize(deserializer)?.map(|value| match value {
        Scalar::Text(text) => text,
        Scalar::Bool(b) => b.to_string(),
        Scalar::Int(n) => n.to_string(),
        Scalar::UInt(n) => n.to_string(),
        Scalar::Float(n) => n.to_string(),
    }))
}

/// Body of `POST /createUser`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateUserRequest {
    /// The user's first name
    #[serde(default, deserialize_with = "scalar_as_string")]
    #[schema(example = "Alvin")]
    pub first_name: Option<String>,
    /// The user's last name
    #[serde(default, deserialize_with = "scalar_as_string")]
    #[schema(example = "Dewdney")]
    pub last_name: Option<String>,
    /// The user's email
    #[serde(default, deserialize_with = "scalar_as_string")]
    #[schema(example = "alv@gmail.com")]
    pub email: Option<String>,
}

/// Body of `PUT /updateUser/{id}`. Absent fields are left unchanged.
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateUserRequest {
    /// New first name
    #[serde(default, deserialize_with = "scalar_as_string")]
    pub first_name: Option<String>,
    /// New last name
    #[serde(default, deserialize_with = "scalar_as_string")]
    pub last_name: Option<String>,
    /// New email
    #[serde(default, deserialize_with = "scalar_as_string")]
    pub email: Option<String>,
}

/// A validated user ready to be inserted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewUser {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
}

/// A validated set of field overwrites.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UserPatch {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
}

impl UserPatch {
    pub fn is_empty(&self) -> bool {
        self.first_name.is_none() && self.last_name.is_none() && self.email.is_none()
    }
}

fn present(value: &Option<String>) -> bool {
    value.as_deref().is_some_and(|v| !v.is_empty())
}

impl CreateUserRequest {
    /// Check that every required field is present and non-empty.
    pub fn validate(self) -> Result<NewUser, ValidationError> {
        let fields: Vec<UserField> = [
            (UserField::FirstName, &self.first_name),
            (UserField::LastName, &self.last_name),
            (UserField::Email, &self.email),
        ]
        .into_iter()
        .filter(|(_, value)| !present(value))
        .map(|(field, _)| field)
        .collect();

        match (self.first_name, self.last_name, self.email) {
            (Some(first_name), Some(last_name), Some(email)) if fields.is_empty() => Ok(NewUser {
                first_name,
                last_name,
                email,
            }),
            _ => Err(ValidationError { fields }),
        }
    }
}

impl UpdateUserRequest {
    /// Check that every provided field is non-empty.
    pub fn validate(self) -> Result<UserPatch, ValidationError> {
        let fields: Vec<UserField> = [
            (UserField::FirstName, &self.first_name),
            (UserField::LastName, &self.last_name),
            (UserField::Email, &self.email),
        ]
        .into_iter()
        .filter(|(_, value)| value.is_some() && !present(value))
        .map(|(field, _)| field)
        .collect();

        if !fields.is_empty() {
            return Err(ValidationError { fields });
        }

        Ok(UserPatch {
            first_name: self.first_name,
            last_name: self.last_name,
            email: self.email,
        })
    }
}
