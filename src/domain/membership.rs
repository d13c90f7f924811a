use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MembershipStatus {
    Accepted,
    Banned,
    PendingEmailConfirmation,
    PendingConsent,
}

impl MembershipStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Accepted => "accepted",
            Self::Banned => "banned",
            Self::PendingEmailConfirmation => "pending_email_confirmation",
            Self::PendingConsent => "pending_consent",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemberEmail {
    pub address: String,
    #[serde(default)]
    pub confirmed: bool,
    #[serde(default)]
    pub send_notifications: bool,
}

/// A marketplace member with their membership row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Member {
    pub person_id: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub display_name: Option<String>,
    pub username: String,
    pub phone_number: Option<String>,
    pub address: Option<String>,
    #[serde(default)]
    pub emails: Vec<MemberEmail>,
    /// The member's "email from admins" preference.
    #[serde(default)]
    pub email_from_admins: bool,
    pub locale: Option<String>,
    pub joined_at: NaiveDateTime,
    pub status: MembershipStatus,
    #[serde(default)]
    pub admin: bool,
    #[serde(default)]
    pub can_post_listings: bool,
    #[serde(default)]
    pub custom_fields: BTreeMap<String, String>,
}

impl Member {
    /// Bans the member and revokes admin rights. The caller closes the
    /// member's open listings.
    pub fn ban(&mut self) {
        self.status = MembershipStatus::Banned;
        self.admin = false;
    }

    pub fn unban(&mut self) {
        self.status = MembershipStatus::Accepted;
    }

    fn full_name(&self) -> String {
        [self.first_name.as_deref(), self.last_name.as_deref()]
            .into_iter()
            .flatten()
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// Applies admin grants then revocations; a member in both lists ends up
/// without admin rights.
pub fn promote_admins(members: &mut [Member], add: &[String], remove: &[String]) {
    for member in members.iter_mut() {
        if add.contains(&member.person_id) {
            member.admin = true;
        }
        if remove.contains(&member.person_id) {
            member.admin = false;
        }
    }
}

pub fn set_posting_allowed(members: &mut [Member], allowed: &[String], disallowed: &[String]) {
    for member in members.iter_mut() {
        if allowed.contains(&member.person_id) {
            member.can_post_listings = true;
        }
        if disallowed.contains(&member.person_id) {
            member.can_post_listings = false;
        }
    }
}

/// True when an admin is about to strip their own admin rights.
pub fn removes_itself(remove: &[String], current_person_id: &str, current_is_admin: bool) -> bool {
    current_is_admin && remove.iter().any(|id| id == current_person_id)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortColumn {
    Name,
    DisplayName,
    Email,
    #[default]
    JoinDate,
    PostingAllowed,
}

impl SortColumn {
    pub fn parse(value: Option<&str>) -> Self {
        match value {
            Some("name") => Self::Name,
            Some("display_name") => Self::DisplayName,
            Some("email") => Self::Email,
            Some("posting_allowed") => Self::PostingAllowed,
            _ => Self::JoinDate,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortDirection {
    Asc,
    #[default]
    Desc,
}

impl SortDirection {
    pub fn parse(value: Option<&str>) -> Self {
        if value == Some("asc") {
            Self::Asc
        } else {
            Self::Desc
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusFilter {
    Admin,
    Banned,
    PostingAllowed,
    Accepted,
    Unconfirmed,
    Pending,
}

impl StatusFilter {
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "admin" => Some(Self::Admin),
            "banned" => Some(Self::Banned),
            "posting_allowed" => Some(Self::PostingAllowed),
            "accepted" => Some(Self::Accepted),
            "unconfirmed" => Some(Self::Unconfirmed),
            "pending" => Some(Self::Pending),
            _ => None,
        }
    }

    fn matches(&self, member: &Member) -> bool {
        match self {
            Self::Admin => member.admin,
            Self::Banned => member.status == MembershipStatus::Banned,
            Self::PostingAllowed => member.can_post_listings,
            Self::Accepted => member.status == MembershipStatus::Accepted,
            Self::Unconfirmed => member.status == MembershipStatus::PendingEmailConfirmation,
            Self::Pending => member.status == MembershipStatus::PendingConsent,
        }
    }
}

/// Member search used by the admin member table. Status filters are OR-ed.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct MemberQuery {
    pub text: Option<String>,
    pub statuses: Vec<StatusFilter>,
    pub sort: SortColumn,
    pub direction: SortDirection,
}

impl MemberQuery {
    fn matches(&self, member: &Member) -> bool {
        let text_match = match self.text.as_deref().map(str::trim) {
            None | Some("") => true,
            Some(text) => {
                let needle = text.to_lowercase();
                member.full_name().to_lowercase().contains(&needle)
                    || member
                        .emails
                        .iter()
                        .any(|email| email.address.to_lowercase().contains(&needle))
            }
        };
        let status_match =
            self.statuses.is_empty() || self.statuses.iter().any(|status| status.matches(member));
        text_match && status_match
    }

    pub fn apply<'a>(&self, members: &'a [Member]) -> Vec<&'a Member> {
        let mut found: Vec<&Member> = members.iter().filter(|m| self.matches(m)).collect();
        found.sort_by(|a, b| {
            let ordering = match self.sort {
                SortColumn::Name => a.first_name.cmp(&b.first_name),
                SortColumn::DisplayName => a.display_name.cmp(&b.display_name),
                SortColumn::Email => a
                    .emails
                    .first()
                    .map(|e| &e.address)
                    .cmp(&b.emails.first().map(|e| &e.address)),
                SortColumn::JoinDate => a.joined_at.cmp(&b.joined_at),
                SortColumn::PostingAllowed => a.can_post_listings.cmp(&b.can_post_listings),
            };
            match self.direction {
                SortDirection::Asc => ordering,
                SortDirection::Desc => ordering.reverse(),
            }
        });
        found
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use chrono::NaiveDate;

    pub(crate) fn member(person_id: &str, first_name: &str, day: u32) -> Member {
        Member {
            person_id: person_id.to_string(),
            first_name: Some(first_name.to_string()),
            last_name: Some("Smith".to_string()),
            display_name: None,
            username: first_name.to_lowercase(),
            phone_number: None,
            address: None,
            emails: vec![MemberEmail {
                address: format!("{}@example.com", first_name.to_lowercase()),
                confirmed: true,
                send_notifications: true,
            }],
            email_from_admins: true,
            locale: Some("en".to_string()),
            joined_at: NaiveDate::from_ymd_opt(2024, 1, day)
                .unwrap()
                .and_hms_opt(0, 0, 0)
                .unwrap(),
            status: MembershipStatus::Accepted,
            admin: false,
            can_post_listings: false,
            custom_fields: BTreeMap::new(),
        }
    }

    #[test]
    fn test_ban_revokes_admin() {
        let mut admin = member("p1", "Joan", 1);
        admin.admin = true;
        admin.ban();
        assert_eq!(admin.status, MembershipStatus::Banned);
        assert!(!admin.admin);

        admin.unban();
        assert_eq!(admin.status, MembershipStatus::Accepted);
        assert!(!admin.admin);
    }

    #[test]
    fn test_promote_and_posting() {
        let mut members = vec![member("p1", "Joan", 1), member("p2", "Kim", 2)];
        promote_admins(&mut members, &["p1".to_string()], &["p2".to_string()]);
        set_posting_allowed(&mut members, &["p2".to_string()], &[]);

        assert!(members[0].admin);
        assert!(!members[1].admin);
        assert!(members[1].can_post_listings);
        assert!(removes_itself(&["p1".to_string()], "p1", true));
        assert!(!removes_itself(&["p1".to_string()], "p1", false));
    }

    #[test]
    fn test_query_filters_and_sorts() {
        let mut members = vec![
            member("p1", "Joan", 1),
            member("p2", "Kim", 3),
            member("p3", "Lee", 2),
        ];
        members[2].status = MembershipStatus::Banned;
        members[0].admin = true;

        let query = MemberQuery::default();
        let ids: Vec<&str> = query
            .apply(&members)
            .iter()
            .map(|m| m.person_id.as_str())
            .collect();
        assert_eq!(ids, vec!["p2", "p3", "p1"]);

        let query = MemberQuery {
            statuses: vec![StatusFilter::Admin, StatusFilter::Banned],
            direction: SortDirection::parse(Some("asc")),
            ..Default::default()
        };
        let ids: Vec<&str> = query
            .apply(&members)
            .iter()
            .map(|m| m.person_id.as_str())
            .collect();
        assert_eq!(ids, vec!["p1", "p3"]);

        let query = MemberQuery {
            text: Some("KIM@".to_string()),
            ..Default::default()
        };
        assert_eq!(query.apply(&members).len(), 1);
        assert_eq!(SortColumn::parse(Some("bogus")), SortColumn::JoinDate);
    }
}
