//! Permission Definitions
//!
//! Static role → permission table. Roles never carry stored permission
//! flags; everything derives from this table at check time.
//!
//! ## Model
//! - `admin`: everything, including hotel and user management
//! - `operator`: runs the day-to-day (orders and catalog) but cannot
//!   create hotels or read commission reports
//! - `hotel_viewer`: read-only reports, scoped to assigned hotels

use crate::db::models::Role;

/// Catalog management (create/update/deactivate products, image upload)
pub const PRODUCTS_MANAGE: &str = "products:manage";
/// Order management (status transitions)
pub const ORDERS_MANAGE: &str = "orders:manage";
/// Hotel registry management
pub const HOTELS_MANAGE: &str = "hotels:manage";
/// Commission reports and hotel statistics
pub const REPORTS_VIEW: &str = "reports:view";

/// Admin implicitly holds every permission
const ADMIN_PERMISSIONS: &[&str] = &["all"];

const OPERATOR_PERMISSIONS: &[&str] = &[PRODUCTS_MANAGE, ORDERS_MANAGE];

const HOTEL_VIEWER_PERMISSIONS: &[&str] = &[REPORTS_VIEW];

/// Permissions granted to a role
pub fn permissions_for(role: Role) -> &'static [&'static str] {
    match role {
        Role::Admin => ADMIN_PERMISSIONS,
        Role::Operator => OPERATOR_PERMISSIONS,
        Role::HotelViewer => HOTEL_VIEWER_PERMISSIONS,
    }
}

/// Whether `role` holds `permission`
pub fn role_has_permission(role: Role, permission: &str) -> bool {
    let granted = permissions_for(role);
    granted.contains(&"all") || granted.contains(&permission)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn admin_holds_everything() {
        for p in [PRODUCTS_MANAGE, ORDERS_MANAGE, HOTELS_MANAGE, REPORTS_VIEW] {
            assert!(role_has_permission(Role::Admin, p));
        }
    }

    #[test]
    fn operator_manages_but_does_not_report() {
        assert!(role_has_permission(Role::Operator, PRODUCTS_MANAGE));
        assert!(role_has_permission(Role::Operator, ORDERS_MANAGE));
        assert!(!role_has_permission(Role::Operator, HOTELS_MANAGE));
        assert!(!role_has_permission(Role::Operator, REPORTS_VIEW));
    }

    #[test]
    fn hotel_viewer_is_reports_only() {
        assert!(role_has_permission(Role::HotelViewer, REPORTS_VIEW));
        assert!(!role_has_permission(Role::HotelViewer, PRODUCTS_MANAGE));
        assert!(!role_has_permission(Role::HotelViewer, ORDERS_MANAGE));
        assert!(!role_has_permission(Role::HotelViewer, HOTELS_MANAGE));
    }
}
