// ── Form buffer and validation ──
//
// DogDraft is the raw edit buffer behind the record form: every text
// field is kept exactly as entered. Validation happens once, on submit,
// and produces a typed DogFields ready for the remote write — so the
// form, the controller, and the tests all share one set of rules.

use std::fmt;

use thiserror::Error;

use super::dog::DogRecord;

/// Upper bound for the age field, in years.
pub const MAX_AGE_YEARS: u8 = 30;

// ── Validation ──────────────────────────────────────────────────────

/// The form field a validation error is anchored to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Name,
    Breed,
    Age,
    ImageUrl,
}

impl Field {
    pub fn label(self) -> &'static str {
        match self {
            Self::Name => "Name",
            Self::Breed => "Breed",
            Self::Age => "Age",
            Self::ImageUrl => "Photo URL",
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A missing or malformed form field, caught before any remote call.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{field}: {message}")]
pub struct ValidationError {
    pub field: Field,
    pub message: String,
}

impl ValidationError {
    fn required(field: Field) -> Self {
        Self {
            field,
            message: "must not be empty".into(),
        }
    }
}

// ── Draft ───────────────────────────────────────────────────────────

/// Raw edit buffer behind the record form.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DogDraft {
    pub name: String,
    pub breed: String,
    /// Age as typed; parsed and range-checked on submit.
    pub age: String,
    pub color: String,
    pub image_url: String,
    pub description: String,
    pub is_favorite: bool,
}

impl DogDraft {
    /// Buffer pre-filled with all editable fields of an existing record.
    pub fn from_record(record: &DogRecord) -> Self {
        Self {
            name: record.name.clone(),
            breed: record.breed.clone(),
            age: record.age.map(|a| a.to_string()).unwrap_or_default(),
            color: record.color.clone().unwrap_or_default(),
            image_url: record.image_url.clone().unwrap_or_default(),
            description: record.description.clone().unwrap_or_default(),
            is_favorite: record.is_favorite,
        }
    }

    /// Validate the buffer, producing the typed field set for a write.
    ///
    /// Rules: `name` and `breed` trimmed non-empty; `age`, when given,
    /// an integer in 0–30; `image_url`, when given, a parseable URL.
    pub fn validate(&self) -> Result<DogFields, ValidationError> {
        let name = self.name.trim();
        if name.is_empty() {
            return Err(ValidationError::required(Field::Name));
        }

        let breed = self.breed.trim();
        if breed.is_empty() {
            return Err(ValidationError::required(Field::Breed));
        }

        let age = match self.age.trim() {
            "" => None,
            raw => {
                let value: u8 = raw.parse().map_err(|_| ValidationError {
                    field: Field::Age,
                    message: format!("must be a whole number of years (got {raw:?})"),
                })?;
                if value > MAX_AGE_YEARS {
                    return Err(ValidationError {
                        field: Field::Age,
                        message: format!("must be at most {MAX_AGE_YEARS}"),
                    });
                }
                Some(value)
            }
        };

        let image_url = match self.image_url.trim() {
            "" => None,
            raw => {
                url::Url::parse(raw).map_err(|e| ValidationError {
                    field: Field::ImageUrl,
                    message: format!("is not a valid URL: {e}"),
                })?;
                Some(raw.to_owned())
            }
        };

        let non_empty = |s: &str| -> Option<String> {
            let trimmed = s.trim();
            (!trimmed.is_empty()).then(|| trimmed.to_owned())
        };

        Ok(DogFields {
            name: name.to_owned(),
            breed: breed.to_owned(),
            age,
            color: non_empty(&self.color),
            image_url,
            description: non_empty(&self.description),
            is_favorite: self.is_favorite,
        })
    }
}

// ── Validated write payload ─────────────────────────────────────────

/// Validated field set ready to be written to the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DogFields {
    pub name: String,
    pub breed: String,
    pub age: Option<u8>,
    pub color: Option<String>,
    pub image_url: Option<String>,
    pub description: Option<String>,
    pub is_favorite: bool,
}

impl DogFields {
    /// Re-check the invariants `DogDraft::validate` establishes.
    ///
    /// The controller calls this before any remote write so a hand-built
    /// `DogFields` cannot smuggle an empty name past the form.
    pub fn ensure_valid(&self) -> Result<(), ValidationError> {
        if self.name.trim().is_empty() {
            return Err(ValidationError::required(Field::Name));
        }
        if self.breed.trim().is_empty() {
            return Err(ValidationError::required(Field::Breed));
        }
        if let Some(age) = self.age {
            if age > MAX_AGE_YEARS {
                return Err(ValidationError {
                    field: Field::Age,
                    message: format!("must be at most {MAX_AGE_YEARS}"),
                });
            }
        }
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::model::RecordId;

    fn valid_draft() -> DogDraft {
        DogDraft {
            name: "Buddy".into(),
            breed: "Golden Retriever".into(),
            age: "3".into(),
            ..DogDraft::default()
        }
    }

    #[test]
    fn valid_draft_produces_fields() {
        let fields = valid_draft().validate().unwrap();
        assert_eq!(fields.name, "Buddy");
        assert_eq!(fields.breed, "Golden Retriever");
        assert_eq!(fields.age, Some(3));
        assert_eq!(fields.color, None);
        assert!(!fields.is_favorite);
    }

    #[test]
    fn empty_name_is_rejected() {
        let draft = DogDraft {
            name: "   ".into(),
            ..valid_draft()
        };
        let err = draft.validate().unwrap_err();
        assert_eq!(err.field, Field::Name);
    }

    #[test]
    fn empty_breed_is_rejected() {
        let draft = DogDraft {
            breed: String::new(),
            ..valid_draft()
        };
        let err = draft.validate().unwrap_err();
        assert_eq!(err.field, Field::Breed);
    }

    #[test]
    fn age_is_optional() {
        let draft = DogDraft {
            age: String::new(),
            ..valid_draft()
        };
        assert_eq!(draft.validate().unwrap().age, None);
    }

    #[test]
    fn non_numeric_age_is_rejected() {
        let draft = DogDraft {
            age: "three".into(),
            ..valid_draft()
        };
        assert_eq!(draft.validate().unwrap_err().field, Field::Age);
    }

    #[test]
    fn age_above_thirty_is_rejected() {
        let draft = DogDraft {
            age: "31".into(),
            ..valid_draft()
        };
        assert_eq!(draft.validate().unwrap_err().field, Field::Age);
    }

    #[test]
    fn malformed_image_url_is_rejected() {
        let draft = DogDraft {
            image_url: "not a url".into(),
            ..valid_draft()
        };
        assert_eq!(draft.validate().unwrap_err().field, Field::ImageUrl);
    }

    #[test]
    fn whitespace_only_optionals_become_none() {
        let draft = DogDraft {
            color: "  ".into(),
            description: "\t".into(),
            ..valid_draft()
        };
        let fields = draft.validate().unwrap();
        assert_eq!(fields.color, None);
        assert_eq!(fields.description, None);
    }

    #[test]
    fn from_record_copies_all_editable_fields() {
        let record = DogRecord {
            id: RecordId::from("dog-1"),
            name: "Luna".into(),
            breed: "Husky".into(),
            age: Some(5),
            color: Some("Gray".into()),
            image_url: Some("https://example.com/luna.jpg".into()),
            description: Some("Talks back".into()),
            is_favorite: true,
            deleted: false,
        };
        let draft = DogDraft::from_record(&record);
        assert_eq!(draft.name, "Luna");
        assert_eq!(draft.age, "5");
        assert_eq!(draft.color, "Gray");
        assert!(draft.is_favorite);
    }

    #[test]
    fn ensure_valid_rejects_hand_built_empty_name() {
        let fields = DogFields {
            name: String::new(),
            breed: "Husky".into(),
            age: None,
            color: None,
            image_url: None,
            description: None,
            is_favorite: false,
        };
        assert_eq!(fields.ensure_valid().unwrap_err().field, Field::Name);
    }
}
