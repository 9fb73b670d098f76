use crate::models::user::{Role, User};
use uuid::Uuid;

/// Owner-or-admin predicate governing post mutation.
///
/// TRUE iff the actor is an admin or owns the resource. Update and delete
/// share this single rule; create needs only an authenticated actor and
/// reads need none.
pub fn can_modify(actor: &User, owner_id: Uuid) -> bool {
    actor.role == Role::Admin || actor.user_id == owner_id
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn user(role: Role) -> User {
        User {
            user_id: Uuid::new_v4(),
            username: "someone".to_string(),
            email: "someone@example.com".to_string(),
            role,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_owner_can_modify() {
        let owner = user(Role::User);
        assert!(can_modify(&owner, owner.user_id));
    }

    #[test]
    fn test_other_user_cannot_modify() {
        let actor = user(Role::User);
        let owner_id = Uuid::new_v4();
        assert!(!can_modify(&actor, owner_id));
    }

    #[test]
    fn test_admin_can_modify_anything() {
        let admin = user(Role::Admin);
        assert!(can_modify(&admin, Uuid::new_v4()));
        assert!(can_modify(&admin, admin.user_id));
    }
}
