use uuid::Uuid;

use super::domain::{CurrentUser, EntityType, Permission};

/// A row with an owning user.
pub trait Owned {
    fn entity_type(&self) -> EntityType;
    fn owner_id(&self) -> Uuid;
}

/// Ownership-based permission checks. Admins hold every permission; otherwise
/// `view_all`/`edit_all` widen access beyond the user's own rows.
pub trait Permissions {
    fn user_id(&self) -> Uuid;
    fn has_permission(&self, permission: Permission) -> bool;

    fn can_view_item_by_owner(&self, _entity: EntityType, owner_id: Uuid) -> bool {
        self.has_permission(Permission::ViewAll) || self.user_id() == owner_id
    }

    fn can_edit_item_by_owner(&self, _entity: EntityType, owner_id: Uuid) -> bool {
        self.has_permission(Permission::EditAll) || self.user_id() == owner_id
    }

    fn can_edit_item(&self, item: &dyn Owned) -> bool {
        self.can_edit_item_by_owner(item.entity_type(), item.owner_id())
    }

    fn can_create(&self, _entity: EntityType) -> bool {
        self.has_permission(Permission::CreateAll)
    }
}

impl Permissions for CurrentUser {
    fn user_id(&self) -> Uuid { self.id }

    fn has_permission(&self, permission: Permission) -> bool {
        self.is_admin || self.permissions.contains(&permission)
    }
}

impl Owned for models::expense::Model {
    fn entity_type(&self) -> EntityType { EntityType::Expense }
    fn owner_id(&self) -> Uuid { self.user_id }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user(permissions: Vec<Permission>) -> CurrentUser {
        CurrentUser { id: Uuid::new_v4(), account_id: Uuid::new_v4(), is_admin: false, permissions }
    }

    #[test]
    fn owner_can_view_and_edit_own_rows() {
        let u = user(vec![]);
        assert!(u.can_view_item_by_owner(EntityType::Vendor, u.id));
        assert!(u.can_edit_item_by_owner(EntityType::Expense, u.id));
        assert!(!u.can_view_item_by_owner(EntityType::Vendor, Uuid::new_v4()));
        assert!(!u.can_edit_item_by_owner(EntityType::Expense, Uuid::new_v4()));
        assert!(!u.can_create(EntityType::Invoice));
    }

    #[test]
    fn view_all_does_not_grant_edit() {
        let u = user(vec![Permission::ViewAll]);
        let other = Uuid::new_v4();
        assert!(u.can_view_item_by_owner(EntityType::Client, other));
        assert!(!u.can_edit_item_by_owner(EntityType::Client, other));
    }

    #[test]
    fn admin_holds_every_permission() {
        let mut u = user(vec![]);
        u.is_admin = true;
        let other = Uuid::new_v4();
        assert!(u.can_view_item_by_owner(EntityType::Client, other));
        assert!(u.can_edit_item_by_owner(EntityType::Invoice, other));
        assert!(u.can_create(EntityType::Invoice));
    }
}
