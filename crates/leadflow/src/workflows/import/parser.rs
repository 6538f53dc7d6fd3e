use std::io::Read;

use serde::{Deserialize, Deserializer};

use crate::workflows::intake::domain::{normalize_key, ContactMethod, LeadSubmission};

pub(crate) fn parse_rows<R: Read>(reader: R) -> Result<Vec<LeadSubmission>, csv::Error> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);
    let mut submissions = Vec::new();

    for record in csv_reader.deserialize::<LeadRow>() {
        let row = record?;
        submissions.push(row.into_submission());
    }

    Ok(submissions)
}

#[derive(Debug, Deserialize)]
struct LeadRow {
    #[serde(rename = "Name", default)]
    name: String,
    #[serde(rename = "Email", default)]
    email: String,
    #[serde(rename = "Phone", default, deserialize_with = "empty_string_as_none")]
    phone: Option<String>,
    #[serde(rename = "Case Type", default)]
    case_type: String,
    #[serde(rename = "Message", default)]
    message: String,
    #[serde(
        rename = "Preferred Contact",
        default,
        deserialize_with = "empty_string_as_none"
    )]
    preferred_contact: Option<String>,
    #[serde(rename = "Location", default, deserialize_with = "empty_string_as_none")]
    location: Option<String>,
    #[serde(rename = "Language", default, deserialize_with = "empty_string_as_none")]
    language: Option<String>,
}

impl LeadRow {
    fn into_submission(self) -> LeadSubmission {
        let preferred_contact = self
            .preferred_contact
            .as_deref()
            .and_then(parse_contact_method);

        LeadSubmission {
            name: self.name,
            email: self.email,
            phone: self.phone,
            case_type: self.case_type,
            message: self.message,
            preferred_contact,
            location: self.location,
            language: self.language,
        }
    }
}

fn parse_contact_method(raw: &str) -> Option<ContactMethod> {
    match normalize_key(raw).as_str() {
        "phone" | "call" => Some(ContactMethod::Phone),
        "email" => Some(ContactMethod::Email),
        "text" | "sms" => Some(ContactMethod::Text),
        _ => None,
    }
}

fn empty_string_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let opt = Option::<String>::deserialize(deserializer)?;
    Ok(opt.filter(|value| !value.trim().is_empty()))
}
