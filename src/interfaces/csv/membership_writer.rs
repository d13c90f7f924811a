use crate::domain::membership::Member;
use crate::error::Result;
use std::io::Write;

const BASE_COLUMNS: &[&str] = &[
    "user_id",
    "first_name",
    "last_name",
    "display_name",
    "username",
    "phone_number",
    "address",
    "email_address",
    "email_address_confirmed",
    "joined_at",
    "status",
    "is_admin",
    "accept_emails_from_admin",
    "language",
];

/// Which optional columns the marketplace exports.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ExportColumns {
    /// Added when posting requires verification.
    pub can_post_listings: bool,
    /// Names of the marketplace's custom person fields, in column order.
    pub custom_fields: Vec<String>,
}

/// Writes the admin member export.
///
/// Every value is quoted. A member gets one row per email address; members
/// without any address are left out.
pub struct MembershipWriter<W: Write> {
    writer: csv::Writer<W>,
}

impl<W: Write> MembershipWriter<W> {
    pub fn new(destination: W) -> Self {
        let writer = csv::WriterBuilder::new()
            .quote_style(csv::QuoteStyle::Always)
            .from_writer(destination);
        Self { writer }
    }

    pub fn write_members<'a>(
        &mut self,
        members: impl IntoIterator<Item = &'a Member>,
        columns: &ExportColumns,
    ) -> Result<()> {
        let mut header: Vec<&str> = BASE_COLUMNS.to_vec();
        if columns.can_post_listings {
            header.push("can_post_listings");
        }
        header.extend(columns.custom_fields.iter().map(String::as_str));
        self.writer.write_record(&header)?;

        for member in members {
            for email in &member.emails {
                let mut row = vec![
                    member.person_id.clone(),
                    member.first_name.clone().unwrap_or_default(),
                    member.last_name.clone().unwrap_or_default(),
                    member.display_name.clone().unwrap_or_default(),
                    member.username.clone(),
                    member.phone_number.clone().unwrap_or_default(),
                    member.address.clone().unwrap_or_default(),
                    email.address.clone(),
                    email.confirmed.to_string(),
                    member.joined_at.format("%Y-%m-%d %H:%M:%S").to_string(),
                    member.status.as_str().to_string(),
                    u8::from(member.admin).to_string(),
                    (member.email_from_admins && email.send_notifications).to_string(),
                    member.locale.clone().unwrap_or_default(),
                ];
                if columns.can_post_listings {
                    row.push(member.can_post_listings.to_string());
                }
                for field in &columns.custom_fields {
                    row.push(member.custom_fields.get(field).cloned().unwrap_or_default());
                }
                self.writer.write_record(&row)?;
            }
        }

        self.writer.flush()?;
        Ok(())
    }
}
