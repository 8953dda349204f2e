//! Gift certificate entity, its DTOs and search filter.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use super::tag::{normalize_tag_name, ReadTag, Tag};
use crate::errors::AppError;

/// Gift certificate domain entity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Certificate {
    pub id: i32,
    pub name: String,
    pub description: String,
    pub price: Decimal,
    /// Validity in days
    pub duration: i32,
    pub create_date: DateTime<Utc>,
    pub last_update_date: DateTime<Utc>,
    pub tags: Vec<Tag>,
}

/// Input for persisting a new certificate. Tags are referenced by name and
/// created when missing.
#[derive(Debug, Clone, PartialEq)]
pub struct NewCertificate {
    pub name: String,
    pub description: String,
    pub price: Decimal,
    pub duration: i32,
    pub tag_names: Vec<String>,
}

/// Changes applied to an existing certificate. `tag_names` replaces the tag
/// set when present.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CertificatePatch {
    pub name: Option<String>,
    pub description: Option<String>,
    pub price: Option<Decimal>,
    pub duration: Option<i32>,
    pub tag_names: Option<Vec<String>>,
}

/// Certificate creation request
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct CreateCertificate {
    #[validate(length(min = 2, max = 45, message = "Name must be 2 to 45 characters"))]
    #[schema(example = "Spa weekend")]
    pub name: String,
    #[validate(length(
        min = 2,
        max = 255,
        message = "Description must be 2 to 255 characters"
    ))]
    #[schema(example = "Two days of sauna and massage")]
    pub description: String,
    #[schema(value_type = String, example = "149.99")]
    pub price: Decimal,
    #[validate(range(min = 0, max = 3650, message = "Duration must be 0 to 3650 days"))]
    #[schema(example = 90)]
    pub duration: i32,
    #[serde(default)]
    #[schema(example = json!(["spa", "relax"]))]
    pub tags: Vec<String>,
}

impl From<CreateCertificate> for NewCertificate {
    fn from(dto: CreateCertificate) -> Self {
        Self {
            name: dto.name.trim().to_string(),
            description: dto.description.trim().to_string(),
            price: dto.price,
            duration: dto.duration,
            tag_names: dto.tags.iter().map(|t| normalize_tag_name(t)).collect(),
        }
    }
}

/// Certificate partial update request
#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
pub struct UpdateCertificate {
    #[validate(length(min = 2, max = 45, message = "Name must be 2 to 45 characters"))]
    pub name: Option<String>,
    #[validate(length(
        min = 2,
        max = 255,
        message = "Description must be 2 to 255 characters"
    ))]
    pub description: Option<String>,
    #[schema(value_type = Option<String>, example = "99.50")]
    pub price: Option<Decimal>,
    #[validate(range(min = 0, max = 3650, message = "Duration must be 0 to 3650 days"))]
    pub duration: Option<i32>,
    pub tags: Option<Vec<String>>,
}

impl From<UpdateCertificate> for CertificatePatch {
    fn from(dto: UpdateCertificate) -> Self {
        Self {
            name: dto.name.map(|n| n.trim().to_string()),
            description: dto.description.map(|d| d.trim().to_string()),
            price: dto.price,
            duration: dto.duration,
            tag_names: dto
                .tags
                .map(|tags| tags.iter().map(|t| normalize_tag_name(t)).collect()),
        }
    }
}

impl CertificatePatch {
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.description.is_none()
            && self.price.is_none()
            && self.duration.is_none()
            && self.tag_names.is_none()
    }

    /// Resulting state once applied on `current`, used for re-validation.
    pub fn merged_with(&self, current: &Certificate) -> NewCertificate {
        NewCertificate {
            name: self.name.clone().unwrap_or_else(|| current.name.clone()),
            description: self
                .description
                .clone()
                .unwrap_or_else(|| current.description.clone()),
            price: self.price.unwrap_or(current.price),
            duration: self.duration.unwrap_or(current.duration),
            tag_names: self
                .tag_names
                .clone()
                .unwrap_or_else(|| current.tags.iter().map(|t| t.name.clone()).collect()),
        }
    }
}

/// Certificate as returned to clients
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct ReadCertificate {
    #[schema(example = 1)]
    pub id: i32,
    pub name: String,
    pub description: String,
    #[schema(value_type = String, example = "149.99")]
    pub price: Decimal,
    pub duration: i32,
    pub create_date: DateTime<Utc>,
    pub last_update_date: DateTime<Utc>,
    pub tags: Vec<ReadTag>,
}

impl From<Certificate> for ReadCertificate {
    fn from(certificate: Certificate) -> Self {
        Self {
            id: certificate.id,
            name: certificate.name,
            description: certificate.description,
            price: certificate.price,
            duration: certificate.duration,
            create_date: certificate.create_date,
            last_update_date: certificate.last_update_date,
            tags: certificate.tags.into_iter().map(ReadTag::from).collect(),
        }
    }
}

/// Column a certificate search is sorted by
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum SortField {
    #[default]
    Name,
    CreateDate,
    LastUpdateDate,
}

impl SortField {
    pub fn as_str(&self) -> &'static str {
        match self {
            SortField::Name => "name",
            SortField::CreateDate => "create_date",
            SortField::LastUpdateDate => "last_update_date",
        }
    }
}

impl FromStr for SortField {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "name" => Ok(SortField::Name),
            "create_date" => Ok(SortField::CreateDate),
            "last_update_date" => Ok(SortField::LastUpdateDate),
            other => Err(AppError::bad_request(format!("Unknown sort field: {}", other))),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    #[default]
    Asc,
    Desc,
}

impl SortOrder {
    pub fn as_str(&self) -> &'static str {
        match self {
            SortOrder::Asc => "asc",
            SortOrder::Desc => "desc",
        }
    }
}

/// Raw query parameters of `GET /certificates`
#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct CertificateQuery {
    /// Comma separated tag names, every one must be present
    #[param(example = "spa,relax")]
    pub tags: Option<String>,
    /// Substring of name or description
    pub search: Option<String>,
    pub sort: Option<SortField>,
    pub order: Option<SortOrder>,
}

/// Parsed certificate search criteria
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CertificateFilter {
    pub tags: Vec<String>,
    pub search: Option<String>,
    pub sort: SortField,
    pub order: SortOrder,
}

impl From<CertificateQuery> for CertificateFilter {
    fn from(query: CertificateQuery) -> Self {
        let mut tags: Vec<String> = query
            .tags
            .as_deref()
            .unwrap_or_default()
            .split(',')
            .map(normalize_tag_name)
            .filter(|t| !t.is_empty())
            .collect();
        tags.sort();
        tags.dedup();

        Self {
            tags,
            search: query
                .search
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty()),
            sort: query.sort.unwrap_or_default(),
            order: query.order.unwrap_or_default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str_exact(s).unwrap()
    }

    fn certificate() -> Certificate {
        let now = Utc::now();
        Certificate {
            id: 1,
            name: "Spa".to_string(),
            description: "Full day spa".to_string(),
            price: dec("10.50"),
            duration: 30,
            create_date: now,
            last_update_date: now,
            tags: vec![Tag {
                id: 3,
                name: "relax".to_string(),
            }],
        }
    }

    #[test]
    fn test_create_dto_maps_and_normalizes_tags() {
        let dto = CreateCertificate {
            name: " Spa ".to_string(),
            description: "Nice".to_string(),
            price: dec("1.00"),
            duration: 1,
            tags: vec!["  hot  stone ".to_string()],
        };
        let new: NewCertificate = dto.into();

        assert_eq!(new.name, "Spa");
        assert_eq!(new.tag_names, vec!["hot stone".to_string()]);
    }

    #[test]
    fn test_patch_merge_keeps_untouched_fields() {
        let patch = CertificatePatch {
            price: Some(dec("20.00")),
            ..Default::default()
        };
        let merged = patch.merged_with(&certificate());

        assert_eq!(merged.name, "Spa");
        assert_eq!(merged.price, dec("20.00"));
        assert_eq!(merged.tag_names, vec!["relax".to_string()]);
    }

    #[test]
    fn test_read_certificate_serializes_price_as_string() {
        let json = serde_json::to_value(ReadCertificate::from(certificate())).unwrap();
        assert_eq!(json["price"], "10.50");
        assert_eq!(json["tags"][0]["name"], "relax");
    }

    #[test]
    fn test_filter_from_query() {
        let filter = CertificateFilter::from(CertificateQuery {
            tags: Some("spa, relax,,spa".to_string()),
            search: Some("  ".to_string()),
            sort: Some(SortField::CreateDate),
            order: None,
        });

        assert_eq!(filter.tags, vec!["relax".to_string(), "spa".to_string()]);
        assert_eq!(filter.search, None);
        assert_eq!(filter.sort, SortField::CreateDate);
        assert_eq!(filter.order, SortOrder::Asc);
    }

    #[test]
    fn test_sort_field_parse() {
        assert_eq!("last_update_date".parse::<SortField>().unwrap(), SortField::LastUpdateDate);
        assert!("price".parse::<SortField>().is_err());
    }
}
