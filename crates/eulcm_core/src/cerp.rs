//! CERP (Collaborative Electronic Records Project) mail-account XML.
//!
//! Only the `Message` subtree is modelled: enough to render one MIME email
//! as a CERP record and read it back. Serialization goes through quick-xml's
//! serde support.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use mailparse::{DispositionType, MailAddr, MailHeader, MailHeaderMap, ParsedMail};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::models::datastream::DatastreamContent;

pub const CERP_NS: &str = "http://www.archives.ncdcr.gov/mail-account";

fn cerp_namespace() -> String {
    CERP_NS.to_string()
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename = "Message")]
pub struct Message {
    #[serde(rename = "@xmlns", default = "cerp_namespace")]
    pub xmlns: String,

    #[serde(rename = "LocalId", default, skip_serializing_if = "Option::is_none")]
    pub local_id: Option<i64>,
    #[serde(rename = "MessageId", default, skip_serializing_if = "Option::is_none")]
    pub message_id: Option<String>,
    #[serde(rename = "MimeVersion", default, skip_serializing_if = "Option::is_none")]
    pub mime_version: Option<String>,
    #[serde(rename = "OrigDate", default, skip_serializing_if = "Option::is_none")]
    pub orig_date: Option<String>,
    #[serde(rename = "From", default, skip_serializing_if = "Option::is_none")]
    pub from: Option<String>,
    #[serde(rename = "Sender", default, skip_serializing_if = "Option::is_none")]
    pub sender: Option<String>,
    #[serde(rename = "To", default, skip_serializing_if = "Vec::is_empty")]
    pub to: Vec<String>,
    #[serde(rename = "Cc", default, skip_serializing_if = "Vec::is_empty")]
    pub cc: Vec<String>,
    #[serde(rename = "Bcc", default, skip_serializing_if = "Vec::is_empty")]
    pub bcc: Vec<String>,
    #[serde(rename = "InReplyTo", default, skip_serializing_if = "Option::is_none")]
    pub in_reply_to: Option<String>,
    #[serde(rename = "References", default, skip_serializing_if = "Option::is_none")]
    pub references: Option<String>,
    #[serde(rename = "Subject", default, skip_serializing_if = "Option::is_none")]
    pub subject: Option<String>,
    #[serde(rename = "Comments", default, skip_serializing_if = "Option::is_none")]
    pub comments: Option<String>,
    #[serde(rename = "Keywords", default, skip_serializing_if = "Option::is_none")]
    pub keywords: Option<String>,
    #[serde(rename = "Header", default, skip_serializing_if = "Vec::is_empty")]
    pub headers: Vec<Header>,

    #[serde(rename = "SingleBody", default, skip_serializing_if = "Option::is_none")]
    pub single_body: Option<SingleBody>,
    #[serde(rename = "MultiBody", default, skip_serializing_if = "Option::is_none")]
    pub multi_body: Option<MultiBody>,
}

impl Default for Message {
    fn default() -> Self {
        Self {
            xmlns: cerp_namespace(),
            local_id: None,
            message_id: None,
            mime_version: None,
            orig_date: None,
            from: None,
            sender: None,
            to: Vec::new(),
            cc: Vec::new(),
            bcc: Vec::new(),
            in_reply_to: None,
            references: None,
            subject: None,
            comments: None,
            keywords: None,
            headers: Vec::new(),
            single_body: None,
            multi_body: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Header {
    #[serde(rename = "Name")]
    pub name: String,
    #[serde(rename = "Value")]
    pub value: String,
    #[serde(rename = "Comments", default, skip_serializing_if = "Option::is_none")]
    pub comments: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Param {
    #[serde(rename = "Name")]
    pub name: String,
    #[serde(rename = "Value")]
    pub value: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct BodyContent {
    #[serde(rename = "Content")]
    pub content: String,
    #[serde(rename = "TransferEncoding", default, skip_serializing_if = "Option::is_none")]
    pub transfer_encoding: Option<String>,
    #[serde(rename = "CharSet", default, skip_serializing_if = "Option::is_none")]
    pub charset: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct SingleBody {
    #[serde(rename = "ContentType", default, skip_serializing_if = "Option::is_none")]
    pub content_type: Option<String>,
    #[serde(rename = "Charset", default, skip_serializing_if = "Option::is_none")]
    pub charset: Option<String>,
    #[serde(rename = "ContentName", default, skip_serializing_if = "Option::is_none")]
    pub content_name: Option<String>,
    #[serde(rename = "ContentTypeParam", default, skip_serializing_if = "Vec::is_empty")]
    pub content_type_params: Vec<Param>,
    #[serde(rename = "TransferEncoding", default, skip_serializing_if = "Option::is_none")]
    pub transfer_encoding: Option<String>,
    #[serde(rename = "ContentId", default, skip_serializing_if = "Option::is_none")]
    pub content_id: Option<String>,
    #[serde(rename = "Description", default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(rename = "Disposition", default, skip_serializing_if = "Option::is_none")]
    pub disposition: Option<String>,
    #[serde(rename = "DispositionFileName", default, skip_serializing_if = "Option::is_none")]
    pub disposition_file_name: Option<String>,
    #[serde(rename = "OtherMimeHeader", default, skip_serializing_if = "Vec::is_empty")]
    pub other_mime_headers: Vec<Header>,
    #[serde(rename = "BodyContent", default, skip_serializing_if = "Option::is_none")]
    pub body_content: Option<BodyContent>,
    #[serde(rename = "ChildMessage", default, skip_serializing_if = "Option::is_none")]
    pub child_message: Option<Box<Message>>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct MultiBody {
    #[serde(rename = "ContentType", default, skip_serializing_if = "Option::is_none")]
    pub content_type: Option<String>,
    #[serde(rename = "Charset", default, skip_serializing_if = "Option::is_none")]
    pub charset: Option<String>,
    #[serde(rename = "BoundaryString", default, skip_serializing_if = "Option::is_none")]
    pub boundary: Option<String>,
    #[serde(rename = "ContentTypeParam", default, skip_serializing_if = "Vec::is_empty")]
    pub content_type_params: Vec<Param>,
    /// Child parts in MIME order.
    #[serde(rename = "$value", default, skip_serializing_if = "Vec::is_empty")]
    pub parts: Vec<BodyPart>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum BodyPart {
    #[serde(rename = "SingleBody")]
    Single(SingleBody),
    #[serde(rename = "MultiBody")]
    Multi(MultiBody),
}

impl BodyPart {
    pub fn as_single(&self) -> Option<&SingleBody> {
        match self {
            BodyPart::Single(body) => Some(body),
            BodyPart::Multi(_) => None,
        }
    }

    pub fn as_multi(&self) -> Option<&MultiBody> {
        match self {
            BodyPart::Multi(body) => Some(body),
            BodyPart::Single(_) => None,
        }
    }
}

// Headers that get their own CERP element on a SingleBody rather than an
// OtherMimeHeader entry.
const BODY_HEADERS: [&str; 5] = [
    "content-type",
    "content-transfer-encoding",
    "content-id",
    "content-description",
    "content-disposition",
];

impl Message {
    /// Converts raw RFC 822 / MIME bytes into a CERP message record.
    pub fn from_email_message(raw: &[u8]) -> Result<Self> {
        if raw.iter().all(u8::is_ascii_whitespace) {
            return Err(Error::Conversion("MIME content is empty".to_string()));
        }
        let parsed = mailparse::parse_mail(raw).map_err(|err| Error::Conversion(err.to_string()))?;
        if parsed.headers.is_empty() {
            return Err(Error::Conversion("MIME content has no headers".to_string()));
        }
        convert_message(&parsed)
    }
}

fn convert_message(parsed: &ParsedMail<'_>) -> Result<Message> {
    let mut message = Message::default();

    for header in &parsed.headers {
        let name = header.get_key();
        let value = header.get_value();
        match name.to_ascii_lowercase().as_str() {
            "message-id" => message.message_id = Some(value.trim().to_string()),
            "mime-version" => message.mime_version = Some(value.trim().to_string()),
            "date" => message.orig_date = Some(value.trim().to_string()),
            "from" => message.from = addresses(header).into_iter().next(),
            "sender" => message.sender = addresses(header).into_iter().next(),
            "to" => message.to.extend(addresses(header)),
            "cc" => message.cc.extend(addresses(header)),
            "bcc" => message.bcc.extend(addresses(header)),
            "in-reply-to" => message.in_reply_to = Some(value.trim().to_string()),
            "references" => message.references = Some(value.trim().to_string()),
            "subject" => message.subject = Some(value.clone()),
            "comments" => message.comments = Some(value.clone()),
            "keywords" => message.keywords = Some(value.clone()),
            _ => {}
        }
        message.headers.push(Header {
            name,
            value,
            comments: None,
        });
    }

    if parsed.subparts.is_empty() {
        message.single_body = Some(convert_single(parsed, true)?);
    } else {
        message.multi_body = Some(convert_multi(parsed)?);
    }
    Ok(message)
}

/// Address list of a header, one display string per mailbox. Falls back to
/// the raw header value when it does not parse as an address list.
fn addresses(header: &MailHeader<'_>) -> Vec<String> {
    match mailparse::addrparse_header(header) {
        Ok(list) => list
            .iter()
            .flat_map(|addr| match addr {
                MailAddr::Single(info) => vec![info.clone()],
                MailAddr::Group(group) => group.addrs.clone(),
            })
            .map(|info| match info.display_name {
                Some(name) => format!("{} <{}>", name, info.addr),
                None => info.addr,
            })
            .collect(),
        Err(err) => {
            tracing::debug!(header = %header.get_key(), error = %err, "unparseable address header");
            vec![header.get_value()]
        }
    }
}

fn type_params(parsed: &ParsedMail<'_>, skip: &[&str]) -> Vec<Param> {
    parsed
        .ctype
        .params
        .iter()
        .filter(|(name, _)| !skip.contains(&name.as_str()))
        .map(|(name, value)| Param {
            name: name.clone(),
            value: value.clone(),
        })
        .collect()
}

/// `top_level` marks the body of the message itself, whose headers are
/// already recorded on the `Message`.
fn convert_single(parsed: &ParsedMail<'_>, top_level: bool) -> Result<SingleBody> {
    let conversion = |err: mailparse::MailParseError| Error::Conversion(err.to_string());
    let headers = &parsed.headers;
    let mimetype = parsed.ctype.mimetype.to_ascii_lowercase();
    let disposition = parsed.get_content_disposition();
    let transfer_encoding = headers
        .get_first_value("Content-Transfer-Encoding")
        .map(|v| v.trim().to_ascii_lowercase());

    let mut body = SingleBody {
        content_type: Some(parsed.ctype.mimetype.clone()),
        charset: Some(parsed.ctype.charset.clone()),
        content_name: parsed.ctype.params.get("name").cloned(),
        content_type_params: type_params(parsed, &["charset", "name"]),
        transfer_encoding: transfer_encoding.clone(),
        content_id: headers.get_first_value("Content-ID").map(|v| v.trim().to_string()),
        description: headers.get_first_value("Content-Description"),
        disposition: match disposition.disposition {
            DispositionType::Inline => None,
            DispositionType::Attachment => Some("attachment".to_string()),
            DispositionType::FormData => Some("form-data".to_string()),
            DispositionType::Extension(other) => Some(other),
        },
        disposition_file_name: disposition.params.get("filename").cloned(),
        ..SingleBody::default()
    };

    if !top_level {
        body.other_mime_headers = parsed
            .headers
            .iter()
            .filter(|h| !BODY_HEADERS.contains(&h.get_key().to_ascii_lowercase().as_str()))
            .map(|h| Header {
                name: h.get_key(),
                value: h.get_value(),
                comments: None,
            })
            .collect();
    }

    if mimetype == "message/rfc822" {
        let raw = parsed.get_body_raw().map_err(conversion)?;
        let child = mailparse::parse_mail(&raw).map_err(conversion)?;
        body.child_message = Some(Box::new(convert_message(&child)?));
    } else if mimetype.starts_with("text/") {
        body.body_content = Some(BodyContent {
            content: parsed.get_body().map_err(conversion)?,
            transfer_encoding: None,
            charset: Some(parsed.ctype.charset.clone()),
        });
    } else {
        let raw = parsed.get_body_raw().map_err(conversion)?;
        body.body_content = Some(BodyContent {
            content: STANDARD.encode(raw),
            transfer_encoding: Some("base64".to_string()),
            charset: None,
        });
    }
    Ok(body)
}

fn convert_multi(parsed: &ParsedMail<'_>) -> Result<MultiBody> {
    let mut multi = MultiBody {
        content_type: Some(parsed.ctype.mimetype.clone()),
        charset: parsed.ctype.params.get("charset").cloned(),
        boundary: parsed.ctype.params.get("boundary").cloned(),
        content_type_params: type_params(parsed, &["charset", "boundary"]),
        ..MultiBody::default()
    };
    for part in &parsed.subparts {
        let converted = if part.subparts.is_empty() {
            BodyPart::Single(convert_single(part, false)?)
        } else {
            BodyPart::Multi(convert_multi(part)?)
        };
        multi.parts.push(converted);
    }
    Ok(multi)
}

impl DatastreamContent for Message {
    fn empty() -> Self {
        Self::default()
    }

    fn decode(bytes: &[u8]) -> Result<Self> {
        let xml = std::str::from_utf8(bytes).map_err(Error::xml)?;
        quick_xml::de::from_str(xml).map_err(Error::xml)
    }

    fn encode(&self) -> Result<Vec<u8>> {
        let xml = quick_xml::se::to_string(self).map_err(Error::xml)?;
        Ok(xml.into_bytes())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PLAIN: &[u8] = b"From: Salman Rushdie <sr@example.com>\r\n\
To: Editor <ed@example.com>, agent@example.com\r\n\
Cc: Team: one@example.com, two@example.com;\r\n\
Subject: Chapter 3\r\n\
Date: Tue, 4 Apr 1995 10:00:00 +0000\r\n\
Message-ID: <3@example.com>\r\n\
MIME-Version: 1.0\r\n\
Content-Type: text/plain; charset=us-ascii\r\n\
\r\n\
Draft attached.\r\n";

    const MULTIPART: &[u8] = b"From: sr@example.com\r\n\
Subject: scans\r\n\
MIME-Version: 1.0\r\n\
Content-Type: multipart/mixed; boundary=\"XYZ\"\r\n\
\r\n\
--XYZ\r\n\
Content-Type: text/plain; charset=utf-8\r\n\
\r\n\
see attached\r\n\
--XYZ\r\n\
Content-Type: application/octet-stream; name=\"draft.bin\"\r\n\
Content-Transfer-Encoding: base64\r\n\
Content-Disposition: attachment; filename=\"draft.bin\"\r\n\
\r\n\
AAEC\r\n\
--XYZ--\r\n";

    #[test]
    fn test_plain_message_headers() {
        let message = Message::from_email_message(PLAIN).unwrap();
        assert_eq!(message.subject.as_deref(), Some("Chapter 3"));
        assert_eq!(message.message_id.as_deref(), Some("<3@example.com>"));
        assert_eq!(message.mime_version.as_deref(), Some("1.0"));
        assert_eq!(message.from.as_deref(), Some("Salman Rushdie <sr@example.com>"));
        assert_eq!(message.to, vec!["Editor <ed@example.com>", "agent@example.com"]);
        assert_eq!(message.cc, vec!["one@example.com", "two@example.com"]);
        assert_eq!(message.headers.len(), 8);
        assert_eq!(message.headers[0].name, "From");

        let body = message.single_body.expect("single body");
        assert_eq!(body.content_type.as_deref(), Some("text/plain"));
        let content = body.body_content.expect("content");
        assert_eq!(content.content.trim_end(), "Draft attached.");
        assert_eq!(content.transfer_encoding, None);
    }

    #[test]
    fn test_multipart_message_body_tree() {
        let message = Message::from_email_message(MULTIPART).unwrap();
        assert!(message.single_body.is_none());
        let multi = message.multi_body.expect("multi body");
        assert_eq!(multi.content_type.as_deref(), Some("multipart/mixed"));
        assert_eq!(multi.boundary.as_deref(), Some("XYZ"));
        assert_eq!(multi.parts.len(), 2);

        let attachment = multi.parts[1].as_single().expect("single body");
        assert_eq!(attachment.content_name.as_deref(), Some("draft.bin"));
        assert_eq!(attachment.disposition.as_deref(), Some("attachment"));
        assert_eq!(attachment.disposition_file_name.as_deref(), Some("draft.bin"));
        let content = attachment.body_content.as_ref().unwrap();
        assert_eq!(content.transfer_encoding.as_deref(), Some("base64"));
        assert_eq!(content.content, "AAEC");
    }

    const NESTED: &[u8] = b"From: sr@example.com\r\n\
Subject: draft with notes\r\n\
MIME-Version: 1.0\r\n\
Content-Type: multipart/mixed; boundary=\"outer\"\r\n\
\r\n\
--outer\r\n\
Content-Type: multipart/alternative; boundary=\"inner\"\r\n\
\r\n\
--inner\r\n\
Content-Type: text/plain; charset=us-ascii\r\n\
\r\n\
notes\r\n\
--inner\r\n\
Content-Type: text/html; charset=us-ascii\r\n\
\r\n\
<p>notes</p>\r\n\
--inner--\r\n\
--outer\r\n\
Content-Type: application/pdf; name=\"draft.pdf\"\r\n\
Content-Transfer-Encoding: base64\r\n\
X-Scanned: yes\r\n\
\r\n\
JVBERg==\r\n\
--outer--\r\n";

    #[test]
    fn test_nested_multipart_keeps_part_order() {
        let message = Message::from_email_message(NESTED).unwrap();
        let multi = message.multi_body.as_ref().expect("multi body");
        assert_eq!(multi.parts.len(), 2);

        let alternative = multi.parts[0].as_multi().expect("nested multipart first");
        assert_eq!(alternative.content_type.as_deref(), Some("multipart/alternative"));
        assert_eq!(alternative.parts.len(), 2);
        let pdf = multi.parts[1].as_single().expect("pdf part second");
        assert_eq!(pdf.content_type.as_deref(), Some("application/pdf"));
        let extra: Vec<_> = pdf.other_mime_headers.iter().map(|h| h.name.as_str()).collect();
        assert_eq!(extra, vec!["X-Scanned"]);

        let xml = String::from_utf8(message.encode().unwrap()).unwrap();
        let nested_at = xml.find("<ContentType>multipart/alternative</ContentType>").unwrap();
        let pdf_at = xml.find("<ContentType>application/pdf</ContentType>").unwrap();
        assert!(nested_at < pdf_at, "{}", xml);
        assert_eq!(Message::decode(xml.as_bytes()).unwrap(), message);
    }

    #[test]
    fn test_top_level_body_does_not_repeat_message_headers() {
        let message = Message::from_email_message(b"Subject: hi\r\nTo: a@b.c\r\n\r\nbody").unwrap();
        assert_eq!(message.headers.len(), 2);
        let body = message.single_body.expect("single body");
        assert!(body.other_mime_headers.is_empty(), "{:?}", body.other_mime_headers);
    }

    #[test]
    fn test_empty_mime_is_a_conversion_error() {
        assert!(matches!(Message::from_email_message(b""), Err(Error::Conversion(_))));
        assert!(matches!(Message::from_email_message(b"\r\n\r\n"), Err(Error::Conversion(_))));
    }

    #[test]
    fn test_cerp_xml_round_trip() {
        let message = Message::from_email_message(MULTIPART).unwrap();
        let xml = String::from_utf8(message.encode().unwrap()).unwrap();
        assert!(xml.starts_with(r#"<Message xmlns="http://www.archives.ncdcr.gov/mail-account">"#), "{}", xml);
        assert!(xml.contains("<BoundaryString>XYZ</BoundaryString>"));

        let back = Message::decode(xml.as_bytes()).unwrap();
        assert_eq!(back, message);
    }
}
