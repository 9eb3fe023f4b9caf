//! User administration.

use serde::{Deserialize, Serialize};

use crate::error::{OrderError, Result};
use crate::model::{Role, User, UserId};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct UserDirectory {
    users: Vec<User>,
}

impl UserDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn users(&self) -> &[User] {
        &self.users
    }

    pub fn get(&self, id: UserId) -> Option<&User> {
        self.users.iter().find(|u| u.id == id)
    }

    /// Add an active user. Emails are unique, case-insensitively.
    pub fn add(&mut self, name: &str, email: &str, role: Role) -> Result<UserId> {
        let email = email.trim().to_lowercase();
        if self.users.iter().any(|u| u.email == email) {
            return Err(OrderError::DuplicateEmail(email));
        }
        let id = UserId(self.users.iter().map(|u| u.id.0).max().unwrap_or(0) + 1);
        self.users.push(User {
            id,
            name: name.trim().to_string(),
            email,
            role,
            active: true,
        });
        Ok(id)
    }

    fn get_mut(&mut self, id: UserId) -> Result<&mut User> {
        self.users
            .iter_mut()
            .find(|u| u.id == id)
            .ok_or(OrderError::UserNotFound(id))
    }

    /// Change a user's role. Returns the previous role.
    pub fn set_role(&mut self, id: UserId, role: Role) -> Result<Role> {
        let user = self.get_mut(id)?;
        Ok(std::mem::replace(&mut user.role, role))
    }

    pub fn set_active(&mut self, id: UserId, active: bool) -> Result<()> {
        self.get_mut(id)?.active = active;
        Ok(())
    }

    pub fn active_admins(&self) -> usize {
        self.users
            .iter()
            .filter(|u| u.active && u.role == Role::Admin)
            .count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_and_change_role() {
        let mut directory = UserDirectory::new();
        let id = directory.add("Karim", "Karim@Example.com", Role::Agent).unwrap();
        assert_eq!(directory.get(id).unwrap().email, "karim@example.com");
        assert_eq!(
            directory.add("Other", "karim@example.com ", Role::Viewer),
            Err(OrderError::DuplicateEmail("karim@example.com".into()))
        );

        assert_eq!(directory.set_role(id, Role::Admin), Ok(Role::Agent));
        assert_eq!(directory.active_admins(), 1);
        directory.set_active(id, false).unwrap();
        assert_eq!(directory.active_admins(), 0);
        assert_eq!(
            directory.set_active(UserId(42), true),
            Err(OrderError::UserNotFound(UserId(42)))
        );
    }
}
