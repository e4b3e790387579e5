use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    Name,
    Email,
    Message,
}

impl Field {
    pub const ALL: [Field; 3] = [Field::Name, Field::Email, Field::Message];

    pub fn label(self) -> &'static str {
        match self {
            Field::Name => "Name",
            Field::Email => "Email",
            Field::Message => "Message",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldError {
    MissingField,
    InvalidFormat,
}

impl fmt::Display for FieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldError::MissingField => write!(f, "required field is empty"),
            FieldError::InvalidFormat => write!(f, "value is not well formed"),
        }
    }
}

impl std::error::Error for FieldError {}

/// Per-field outcome of [`validate`]. Every field is checked, so all
/// applicable errors are reported together.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Validation {
    pub name: Option<FieldError>,
    pub email: Option<FieldError>,
    pub message: Option<FieldError>,
}

impl Validation {
    pub fn is_valid(&self) -> bool {
        self.name.is_none() && self.email.is_none() && self.message.is_none()
    }

    pub fn get(&self, field: Field) -> Option<FieldError> {
        match field {
            Field::Name => self.name,
            Field::Email => self.email,
            Field::Message => self.message,
        }
    }

    pub fn errors(&self) -> Vec<(Field, FieldError)> {
        Field::ALL
            .into_iter()
            .filter_map(|field| self.get(field).map(|err| (field, err)))
            .collect()
    }
}

pub fn error_text(field: Field, err: FieldError) -> &'static str {
    match (field, err) {
        (Field::Name, _) => "Name is required.",
        (Field::Email, FieldError::MissingField) => "Email is required.",
        (Field::Email, FieldError::InvalidFormat) => "Email is not valid.",
        (Field::Message, _) => "Message is required.",
    }
}

pub fn validate(name: &str, email: &str, message: &str) -> Validation {
    let email = email.trim();
    let email_error = if email.is_empty() {
        Some(FieldError::MissingField)
    } else if !is_valid_email(email) {
        Some(FieldError::InvalidFormat)
    } else {
        None
    };
    Validation {
        name: name.trim().is_empty().then_some(FieldError::MissingField),
        email: email_error,
        message: message.trim().is_empty().then_some(FieldError::MissingField),
    }
}

/// Matches `local@domain.tld` over the whole string: local is
/// `[A-Za-z0-9._%+-]+`, domain is `[A-Za-z0-9.-]+`, tld is two or more
/// ASCII letters after the last dot.
pub fn is_valid_email(email: &str) -> bool {
    let Some((local, rest)) = email.split_once('@') else {
        return false;
    };
    if local.is_empty() || !local.chars().all(is_local_char) {
        return false;
    }
    let Some((domain, tld)) = rest.rsplit_once('.') else {
        return false;
    };
    !domain.is_empty()
        && domain.chars().all(is_domain_char)
        && tld.len() >= 2
        && tld.chars().all(|ch| ch.is_ascii_alphabetic())
}

fn is_local_char(ch: char) -> bool {
    ch.is_ascii_alphanumeric() || matches!(ch, '.' | '_' | '%' | '+' | '-')
}

fn is_domain_char(ch: char) -> bool {
    ch.is_ascii_alphanumeric() || matches!(ch, '.' | '-')
}
