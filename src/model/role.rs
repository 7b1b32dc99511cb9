#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum Role {
    Admin = 1,
    Hr = 2,
    Employee = 3,
    TeamLead = 4,
    Manager = 5,
    Executive = 6,
}

impl Role {
    pub fn from_id(id: u8) -> Option<Self> {
        match id {
            1 => Some(Role::Admin),
            2 => Some(Role::Hr),
            3 => Some(Role::Employee),
            4 => Some(Role::TeamLead),
            5 => Some(Role::Manager),
            6 => Some(Role::Executive),
            _ => None,
        }
    }

    /// Roles whose dashboards show other people's attendance
    pub fn is_supervisor(&self) -> bool {
        !matches!(self, Role::Employee)
    }
}
