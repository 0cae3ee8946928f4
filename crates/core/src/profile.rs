//! The slice of a profile the quest engine needs: identity and admin flag.

use serde::Serialize;

use crate::types::DbId;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Profile {
    pub id: DbId,
    pub is_admin: bool,
}

impl Profile {
    /// A profile may act for itself; admins may act for anyone.
    pub fn can_act_for(&self, target_profile_id: DbId) -> bool {
        self.is_admin || self.id == target_profile_id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn profile_acts_for_itself_only() {
        let p = Profile {
            id: 4,
            is_admin: false,
        };
        assert!(p.can_act_for(4));
        assert!(!p.can_act_for(5));
    }

    #[test]
    fn admin_acts_for_anyone() {
        let admin = Profile {
            id: 1,
            is_admin: true,
        };
        assert!(admin.can_act_for(99));
    }
}
