// src/models/broadcast.rs

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::Serialize;
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::{Validate, ValidateUrl, ValidationError};

use crate::common::{error::{field_error, AppError}, form::FormFields};

#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Broadcast {
    pub id: Uuid,
    pub title: String,
    pub content: String,
    pub image_url: Option<String>,
    pub video_url: Option<String>,
    pub scheduled_at: Option<DateTime<Utc>>,
    pub author_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Broadcast {
    /// Publicado quando não há agendamento ou o horário já passou.
    pub fn is_published(&self, now: DateTime<Utc>) -> bool {
        self.scheduled_at.is_none_or(|at| at <= now)
    }
}

fn validate_url_or_empty(url: &str) -> Result<(), ValidationError> {
    if url.trim().is_empty() || url.trim().to_string().validate_url() {
        Ok(())
    } else {
        Err(ValidationError::new("url").with_message("invalid_url".into()))
    }
}

// Campos do formulário multipart de anúncio (a imagem vem à parte)
#[derive(Debug, Clone, Validate)]
pub struct BroadcastInput {
    #[validate(length(min = 1, message = "title_required"))]
    pub title: String,
    #[validate(length(min = 5, message = "content_too_short"))]
    pub content: String,
    #[validate(custom(function = "validate_url_or_empty"))]
    pub video_url: Option<String>,
    pub scheduled_at: Option<String>,
}

impl BroadcastInput {
    pub fn from_form(form: &FormFields) -> Self {
        Self {
            title: form.text("title").unwrap_or_default(),
            content: form.text("content").unwrap_or_default(),
            video_url: form.text("videoUrl"),
            scheduled_at: form.text("scheduledAt"),
        }
    }

    /// Interpreta o agendamento. Aceita RFC 3339 ou o formato do
    /// `datetime-local` do navegador (tratado como UTC). Deve estar no futuro.
    pub fn parse_schedule(&self, now: DateTime<Utc>) -> Result<Option<DateTime<Utc>>, AppError> {
        let Some(raw) = self.scheduled_at.as_deref() else {
            return Ok(None);
        };

        let parsed = DateTime::parse_from_rfc3339(raw)
            .map(|dt| dt.with_timezone(&Utc))
            .or_else(|_| {
                NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M").map(|dt| dt.and_utc())
            })
            .map_err(|_| field_error("scheduledAt", "invalid_date"))?;

        if parsed <= now {
            return Err(field_error("scheduledAt", "schedule_in_past"));
        }
        Ok(Some(parsed))
    }
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SubscriptionState {
    pub is_subscribed: bool,
}

// Multipart documentado no OpenAPI
#[allow(dead_code)]
#[derive(ToSchema)]
#[schema(rename_all = "camelCase")]
pub struct BroadcastForm {
    pub title: String,
    pub content: String,
    pub video_url: Option<String>,
    #[schema(example = "2030-01-01T09:00:00Z")]
    pub scheduled_at: Option<String>,
    #[schema(value_type = Option<String>, format = Binary)]
    pub image: Option<Vec<u8>>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn broadcast(scheduled_at: Option<DateTime<Utc>>) -> Broadcast {
        let now = Utc::now();
        Broadcast {
            id: Uuid::new_v4(),
            title: "Promo".into(),
            content: "Novas etiquetas".into(),
            image_url: None,
            video_url: None,
            scheduled_at,
            author_id: Uuid::new_v4(),
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn unscheduled_or_past_broadcasts_are_published() {
        let now = Utc::now();
        assert!(broadcast(None).is_published(now));
        assert!(broadcast(Some(now - Duration::minutes(1))).is_published(now));
        assert!(broadcast(Some(now)).is_published(now));
        assert!(!broadcast(Some(now + Duration::minutes(1))).is_published(now));
    }

    #[test]
    fn content_needs_five_chars_and_video_must_be_url_or_empty() {
        let form = FormFields::from_pairs(&[
            ("title", "Promo"),
            ("content", "abcd"),
            ("videoUrl", "not a url"),
        ]);
        let errors = BroadcastInput::from_form(&form).validate().unwrap_err();
        let fields = errors.field_errors();
        assert!(fields.contains_key("content"));
        assert!(fields.contains_key("video_url"));

        let form = FormFields::from_pairs(&[
            ("title", "Promo"),
            ("content", "abcde"),
            ("videoUrl", ""),
        ]);
        assert!(BroadcastInput::from_form(&form).validate().is_ok());
    }

    #[test]
    fn schedule_must_be_in_the_future() {
        let now = Utc::now();
        let past = (now - Duration::hours(1)).to_rfc3339();
        let input = BroadcastInput::from_form(&FormFields::from_pairs(&[("scheduledAt", &past)]));
        assert!(matches!(input.parse_schedule(now), Err(AppError::FormError(_))));

        let future = (now + Duration::hours(1)).to_rfc3339();
        let input = BroadcastInput::from_form(&FormFields::from_pairs(&[("scheduledAt", &future)]));
        assert!(input.parse_schedule(now).unwrap().is_some());
    }

    #[test]
    fn browser_datetime_local_format_is_accepted() {
        let now = DateTime::parse_from_rfc3339("2025-01-01T00:00:00Z")
            .unwrap()
            .with_timezone(&Utc);
        let input = BroadcastInput::from_form(&FormFields::from_pairs(&[(
            "scheduledAt",
            "2025-06-01T10:30",
        )]));
        let at = input.parse_schedule(now).unwrap().unwrap();
        assert_eq!(at.to_rfc3339(), "2025-06-01T10:30:00+00:00");
    }

    #[test]
    fn garbage_schedule_is_invalid_date() {
        let input = BroadcastInput::from_form(&FormFields::from_pairs(&[("scheduledAt", "amanhã")]));
        assert!(input.parse_schedule(Utc::now()).is_err());
        let empty = BroadcastInput::from_form(&FormFields::from_pairs(&[("scheduledAt", "")]));
        assert!(empty.parse_schedule(Utc::now()).unwrap().is_none());
    }
}
