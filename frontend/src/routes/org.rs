//! 组织工作台路由 (`/org-dashboard/...`)

use azonation_shared::UserType;

use crate::web::route::{RouteDef, RouteMeta, View};

pub const ORG_ROUTES: &[RouteDef] = &[
    RouteDef::nested(
        "/org-dashboard",
        "org-dashboard",
        View::Dashboard(UserType::Organisation),
        RouteMeta::role(UserType::Organisation),
        ORG_DASHBOARD_CHILDREN,
    ),
];

const ORG_DASHBOARD_CHILDREN: &[RouteDef] = &[
    RouteDef::page("index", "org-dashboard-index", "Org/Layouts/Dashboard/Index"),
    RouteDef::page("header-notifications", "header-notifications", "Org/Layouts/HeaderNotification"),
    RouteDef::page("notifications", "notifications", "Org/Notification/Index"),
    RouteDef::page("fundamental-info", "fundamental-info", "Org/Profile/FundamentalInfo"),
    RouteDef::page("unlink-member", "unlink-member", "Org/Member/UnlinkMember"),
    RouteDef::page("create-member", "create-member", "Org/Member/Create"),
    RouteDef::page("index-member", "index-member", "Org/Member/Index"),
    RouteDef::page("membership-statuses", "membership-statuses", "Org/Member/MembershipStatuses"),
    RouteDef::page("org-membership-types", "org-membership-types", "Org/Member/OrgMembershipTypes"),
    RouteDef::page("family-member", "family-member", "Org/Member/FamilyMember"),
    RouteDef::page("founders", "founders", "Org/Founder/Index"),
    RouteDef::page("accounts", "accounts", "Org/Accounts/Index"),
    RouteDef::page("accounts-fund", "accounts-fund", "Org/Accounts/Fund"),
    RouteDef::page("asset-management", "index-asset", "Org/Asset/Index"),
    RouteDef::page("asset/create", "create-asset", "Org/Asset/Create"),
    RouteDef::page("asset/edit/:id", "edit-asset", "Org/Asset/Edit"),
    RouteDef::page("asset/view/:id", "view-asset", "Org/Asset/View"),
    RouteDef::page("committees", "committees", "Org/Committee/Index"),
    RouteDef::page("index-committee-member/:committeeId", "index-committee-member", "Org/Committee/CommitteeMember"),
    RouteDef::page("former-committee-list", "former-committee-list", "Org/Committee/FormerCommitteeList"),
    RouteDef::page("meeting/guest/attendance/:id", "meeting-guest-attendance", "Org/Meeting/MeetingGuestAttendances"),
    RouteDef::page("events", "index-event", "Org/Event/Index"),
    RouteDef::page("event/create", "create-event", "Org/Event/Create"),
    RouteDef::page("event/edit/:id", "edit-event", "Org/Event/Edit"),
    RouteDef::page("event/view/:id", "view-event", "Org/Event/View"),
    RouteDef::page("upcoming-events", "upcoming-events", "Org/Event/EventList"),
    RouteDef::page("event-summary", "index-event-summary", "Org/Event/EventSummary/Index"),
    RouteDef::page("event-summary/create/:eventId", "create-event-summary", "Org/Event/EventSummary/Create"),
    RouteDef::page("event-summary/edit/:id", "edit-event-summary", "Org/Event/EventSummary/Edit"),
    RouteDef::page("event-summary/view/:id", "view-event-summary", "Org/Event/EventSummary/View"),
    RouteDef::page("event/attendances/:id", "event-attendances", "Org/Event/EventAttendances"),
    RouteDef::page("event/guest/attendance/:id", "event-guest-attendance", "Org/Event/EventGuestAttendance"),
    RouteDef::page("history", "history", "Org/History/Index"),
    RouteDef::page("history/create", "create-history", "Org/History/Create"),
    RouteDef::page("history/edit/:id", "edit-history", "Org/History/Edit"),
    RouteDef::page("history/view/:id", "view-history", "Org/History/View"),
    RouteDef::page("meetings", "index-meeting", "Org/Meeting/Index"),
    RouteDef::page("meeting/create", "create-meeting", "Org/Meeting/Create"),
    RouteDef::page("meeting/edit/:id", "edit-meeting", "Org/Meeting/Edit"),
    RouteDef::page("meeting/view/:id", "view-meeting", "Org/Meeting/View"),
    RouteDef::page("meeting-minutes", "index-meeting-minutes", "Org/Meeting/MeetingMinutes/Index"),
    RouteDef::page("meeting-minutes/create/:meetingId", "create-meeting-minutes", "Org/Meeting/MeetingMinutes/Create"),
    RouteDef::page("meeting-minutes/edit/:id", "edit-meeting-minutes", "Org/Meeting/MeetingMinutes/Edit"),
    RouteDef::page("meeting-minutes/view/:id", "view-meeting-minutes", "Org/Meeting/MeetingMinutes/View"),
    RouteDef::page("meeting/attendances/:id", "meeting-attendances", "Org/Meeting/MeetingAttendances"),
    RouteDef::page("office-document", "index-document", "Org/OfficeDocument/Index"),
    RouteDef::page("document/create", "create-document", "Org/OfficeDocument/Create"),
    RouteDef::page("document/edit/:id", "edit-document", "Org/OfficeDocument/Edit"),
    RouteDef::page("document/view/:id", "view-document", "Org/OfficeDocument/View"),
    RouteDef::page("projects", "index-project", "Org/Project/Index"),
    RouteDef::page("project/create", "create-project", "Org/Project/Create"),
    RouteDef::page("project/edit/:id", "edit-project", "Org/Project/Edit"),
    RouteDef::page("project/view/:id", "view-project", "Org/Project/View"),
    RouteDef::page("project/attendances/:id", "project-attendances", "Org/Project/ProjectAttendances"),
    RouteDef::page("project/guest/attendance/:id", "project-guest-attendance", "Org/Project/ProjectGuestAttendance"),
    RouteDef::page("project-summary", "index-project-summary", "Org/Project/ProjectSummary/Index"),
    RouteDef::page("project-summary/create/:projectId", "create-project-summary", "Org/Project/ProjectSummary/Create"),
    RouteDef::page("project-summary/edit/:summaryId", "edit-project-summary", "Org/Project/ProjectSummary/Edit"),
    RouteDef::page("project-summary/view/:summaryId", "view-project-summary", "Org/Project/ProjectSummary/View"),
    RouteDef::page("recognition", "recognition", "Org/Recognition/Index"),
    RouteDef::page("recognition/create", "create-recognition", "Org/Recognition/Create"),
    RouteDef::page("recognition/edit/:id", "edit-recognition", "Org/Recognition/Edit"),
    RouteDef::page("recognition/view/:id", "view-recognition", "Org/Recognition/View"),
    RouteDef::page("org-report", "org-report", "Org/Report/Index"),
    RouteDef::page("org-expense-report", "org-expense-report", "Org/Report/Expense"),
    RouteDef::page("strategic-plan", "strategic-plan", "Org/StrategicPlan/Index"),
    RouteDef::page("strategic-plan/create", "create-strategic-plan", "Org/StrategicPlan/Create"),
    RouteDef::page("strategic-plan/edit/:id", "edit-strategic-plan", "Org/StrategicPlan/Edit"),
    RouteDef::page("strategic-plan/view/:id", "view-strategic-plan", "Org/StrategicPlan/View"),
    RouteDef::page("success-story", "success-story", "Org/SuccessStory/Index"),
    RouteDef::page("success-story/create", "create-success-story", "Org/SuccessStory/Create"),
    RouteDef::page("success-story/edit/:id", "edit-success-story", "Org/SuccessStory/Edit"),
    RouteDef::page("success-story/view/:id", "view-success-story", "Org/SuccessStory/View"),
    RouteDef::page("year-plan", "year-plan", "Org/YearPlan/Index"),
    RouteDef::page("year-plan/create", "create-year-plan", "Org/YearPlan/Create"),
    RouteDef::page("year-plan/edit/:id", "edit-year-plan", "Org/YearPlan/Edit"),
    RouteDef::page("year-plan/view/:id", "view-year-plan", "Org/YearPlan/View"),
    RouteDef::nested(
        "my-account",
        "my-account",
        View::Page("Org/Profile/MyAccount"),
        RouteMeta::AUTH,
        MY_ACCOUNT_CHILDREN,
    ),
];

const MY_ACCOUNT_CHILDREN: &[RouteDef] = &[
    RouteDef::page("profile", "profile", "Org/Profile/Profile"),
    RouteDef::page("administrator", "administrator", "Org/Profile/Administrator"),
    RouteDef::page("security", "security", "Org/Profile/Security"),
    RouteDef::page("settings", "settings", "Org/Profile/Settings"),
    RouteDef::page("package", "package", "Org/Financial/Package"),
    RouteDef::page("subscription", "subscription", "Org/Financial/Subscription"),
    RouteDef::page("bill-calculation", "bill-calculation", "Org/Financial/BillCalculation"),
    RouteDef::page("bill-list", "bill-list", "Org/Financial/ManagementAndStorageBilling/Index"),
    RouteDef::page("view-billing/:id", "view-billing", "Org/Financial/ManagementAndStorageBilling/View"),
    RouteDef::page("invoices", "invoices", "Org/Financial/Invoice/Index"),
    RouteDef::page("view-invoice/:id", "view-invoice", "Org/Financial/Invoice/View"),
    RouteDef::page("org-receipt-index", "org-receipt-index", "Org/Financial/Receipt/Index"),
    RouteDef::page("referral", "referral", "Org/Referral/Referral").with_meta(RouteMeta::PUBLIC),
];
