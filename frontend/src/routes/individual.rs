//! 个人用户工作台路由 (`/individual-dashboard/...`)

use azonation_shared::UserType;

use crate::web::route::{RouteDef, RouteMeta, View};

pub const INDIVIDUAL_ROUTES: &[RouteDef] = &[
    RouteDef::nested(
        "/individual-dashboard",
        "individual-dashboard",
        View::Dashboard(UserType::Individual),
        RouteMeta::role(UserType::Individual),
        INDIVIDUAL_DASHBOARD_CHILDREN,
    ),
];

const INDIVIDUAL_DASHBOARD_CHILDREN: &[RouteDef] = &[
    RouteDef::page("individual-dashboard-initial-content", "individual-dashboard-initial-content", "Individual/Layouts/Dashboard/InitialContent"),
    RouteDef::page("notification-from-org", "notification-from-org", "Individual/Notifications/NotificationFromOrg"),
    RouteDef::page("individual-profile-update", "individual-profile-update", "Individual/Profile/IndividualProfileUpdate"),
    RouteDef::page("my-account-individual", "my-account-individual", "Org/Profile/MyAccount"),
];
