use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::format;
use crate::http::MultipartForm;

/// A registered bidder or vendor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Entity {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub tin_number: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub phone_number: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub entity_type: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub logo_url: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// A file uploaded alongside an entity form.
#[derive(Debug, Clone, PartialEq)]
pub struct Attachment {
    pub file_name: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

/// Form data for registering or updating an entity. Sent as multipart.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EntityForm {
    pub name: String,
    pub tin_number: Option<String>,
    pub email: Option<String>,
    pub phone_number: Option<String>,
    pub address: Option<String>,
    pub entity_type: Option<String>,
    pub logo: Option<Attachment>,
    pub documents: Vec<Attachment>,
}

impl EntityForm {
    /// Names of the fields that fail the form checks. Empty when valid.
    pub fn invalid_fields(&self) -> Vec<&'static str> {
        let mut invalid = Vec::new();
        if self.name.trim().is_empty() {
            invalid.push("name");
        }
        if self.email.as_deref().is_some_and(|e| !format::is_valid_email(e)) {
            invalid.push("email");
        }
        if self.phone_number.as_deref().is_some_and(|p| !format::is_valid_phone(p)) {
            invalid.push("phoneNumber");
        }
        invalid
    }

    pub fn to_multipart(&self) -> MultipartForm {
        let mut form = MultipartForm::new().text("name", self.name.as_str());
        let optional = [
            ("tinNumber", &self.tin_number),
            ("email", &self.email),
            ("phoneNumber", &self.phone_number),
            ("address", &self.address),
            ("entityType", &self.entity_type),
        ];
        for (name, value) in optional {
            if let Some(v) = value {
                form = form.text(name, v.as_str());
            }
        }
        if let Some(logo) = &self.logo {
            form = form.file("logo", &logo.file_name, &logo.content_type, logo.bytes.clone());
        }
        for doc in &self.documents {
            form = form.file("documents", &doc.file_name, &doc.content_type, doc.bytes.clone());
        }
        form
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::PartValue;

    #[test]
    fn multipart_skips_unset_fields() {
        let form = EntityForm {
            name: "Abay Trading".to_string(),
            email: Some("info@abay.et".to_string()),
            ..Default::default()
        }
        .to_multipart();

        let names: Vec<_> = form.parts().iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["name", "email"]);
    }

    #[test]
    fn form_checks_name_email_and_phone() {
        let mut form = EntityForm {
            email: Some("not-an-email".to_string()),
            phone_number: Some("0911223344".to_string()),
            ..Default::default()
        };
        assert_eq!(form.invalid_fields(), vec!["name", "email"]);

        form.name = "Abay".to_string();
        form.email = Some("info@abay.et".to_string());
        form.phone_number = Some("12345".to_string());
        assert_eq!(form.invalid_fields(), vec!["phoneNumber"]);
    }

    #[test]
    fn multipart_attaches_logo_and_documents() {
        let file = |n: &str| Attachment {
            file_name: n.to_string(),
            content_type: "application/pdf".to_string(),
            bytes: b"%PDF".to_vec(),
        };
        let form = EntityForm {
            name: "Abay".to_string(),
            logo: Some(file("logo.png")),
            documents: vec![file("license.pdf"), file("tin.pdf")],
            ..Default::default()
        }
        .to_multipart();

        let files: Vec<_> = form
            .parts()
            .iter()
            .filter_map(|p| match &p.value {
                PartValue::File { file_name, .. } => Some((p.name.as_str(), file_name.as_str())),
                PartValue::Text(_) => None,
            })
            .collect();
        assert_eq!(
            files,
            vec![("logo", "logo.png"), ("documents", "license.pdf"), ("documents", "tin.pdf")]
        );
    }
}
