// Bulk payload: every guest user goes into a single
// `guestUserBulkRequest` document for the ERS bulk endpoint.
//
// The ISE schema is ordered, so the element sequence below is fixed. All
// text goes through quick-xml's escaping writer.

use crate::error::ImportError;
use crate::records::GuestUserRecord;
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::Writer;

/// Location ISE records for every guest created by this tool.
pub const GUEST_LOCATION: &str = "San Jose";
/// Validity window, in days, sent alongside the explicit from/to dates.
pub const VALID_DAYS: u32 = 1;

const RESOURCE_MEDIA_TYPE: &str = "vnd.com.cisco.ise.identity.guestuser.2.0+xml";

/// Namespace declarations ISE expects on the bulk request root.
const NAMESPACES: [(&str, &str); 7] = [
    ("xmlns:ns6", "sxp.ers.ise.cisco.com"),
    ("xmlns:ns5", "trustsec.ers.ise.cisco.com"),
    ("xmlns:ns8", "network.ers.ise.cisco.com"),
    ("xmlns:ns7", "anc.ers.ise.cisco.com"),
    ("xmlns:ers", "ers.ise.cisco.com"),
    ("xmlns:xs", "http://www.w3.org/2001/XMLSchema"),
    ("xmlns:ns4", "identity.ers.ise.cisco.com"),
];

type XmlWriter = Writer<Vec<u8>>;

fn write(writer: &mut XmlWriter, event: Event<'_>) -> Result<(), ImportError> {
    writer
        .write_event(event)
        .map_err(|e| ImportError::Xml(e.to_string()))
}

fn open(writer: &mut XmlWriter, name: &str) -> Result<(), ImportError> {
    write(writer, Event::Start(BytesStart::new(name)))
}

fn close(writer: &mut XmlWriter, name: &str) -> Result<(), ImportError> {
    write(writer, Event::End(BytesEnd::new(name)))
}

/// `<name>text</name>` on one line.
fn leaf(writer: &mut XmlWriter, name: &str, text: &str) -> Result<(), ImportError> {
    open(writer, name)?;
    write(writer, Event::Text(BytesText::new(text)))?;
    close(writer, name)
}

fn write_guest_user(
    writer: &mut XmlWriter,
    user: &GuestUserRecord,
    portal_id: &str,
) -> Result<(), ImportError> {
    open(writer, "ns4:guestuser")?;

    // ISE rejects the bulk request without this element, and a self-closed
    // tag does not satisfy it.
    leaf(writer, "customFields", " ")?;

    open(writer, "guestAccessInfo")?;
    leaf(writer, "fromDate", &user.from_date)?;
    leaf(writer, "location", GUEST_LOCATION)?;
    leaf(writer, "toDate", &user.to_date)?;
    leaf(writer, "validDays", &VALID_DAYS.to_string())?;
    close(writer, "guestAccessInfo")?;

    open(writer, "guestInfo")?;
    leaf(writer, "emailAddress", &user.email_address)?;
    leaf(writer, "enabled", "true")?;
    leaf(writer, "firstName", &user.first_name)?;
    leaf(writer, "lastName", &user.last_name)?;
    leaf(writer, "password", &user.password)?;
    leaf(writer, "userName", &user.user_name)?;
    close(writer, "guestInfo")?;

    leaf(writer, "guestType", &user.guest_type)?;
    leaf(writer, "portalId", portal_id)?;

    close(writer, "ns4:guestuser")
}

/// Render all `users` into one indented bulk-create document.
///
/// There is no chunking: ISE's own request size limit is the caller's
/// concern.
pub fn build_bulk_xml(users: &[GuestUserRecord], portal_id: &str) -> Result<String, ImportError> {
    let mut writer = Writer::new_with_indent(Vec::new(), b' ', 2);

    write(
        &mut writer,
        Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)),
    )?;

    let mut root = BytesStart::new("ns4:guestUserBulkRequest");
    root.push_attribute(("operationType", "create"));
    root.push_attribute(("resourceMediaType", RESOURCE_MEDIA_TYPE));
    for ns in NAMESPACES {
        root.push_attribute(ns);
    }
    write(&mut writer, Event::Start(root))?;

    open(&mut writer, "ns4:resourcesList")?;
    for user in users {
        write_guest_user(&mut writer, user, portal_id)?;
    }
    close(&mut writer, "ns4:resourcesList")?;
    close(&mut writer, "ns4:guestUserBulkRequest")?;

    let mut xml =
        String::from_utf8(writer.into_inner()).map_err(|e| ImportError::Xml(e.to_string()))?;
    xml.push('\n');
    Ok(xml)
}
