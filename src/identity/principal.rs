/// The two caller kinds a session can be bound to. A record is never both:
/// the admin console and the member site authenticate through separate doors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Principal {
    /// A registered member, identified by their row id in the user table.
    User { id: i64 },
    /// The fixed-credential admin.
    Admin,
}

impl Principal {
    pub fn user_id(&self) -> Option<i64> {
        match self {
            Principal::User { id } => Some(*id),
            Principal::Admin => None,
        }
    }

    pub fn is_admin(&self) -> bool {
        matches!(self, Principal::Admin)
    }
}
