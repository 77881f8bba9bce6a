//! 超级管理员工作台路由 (`/superadmin-dashboard/...`)

use azonation_shared::UserType;

use crate::web::route::{RouteDef, RouteMeta, View};

pub const SUPERADMIN_ROUTES: &[RouteDef] = &[
    RouteDef::nested(
        "/superadmin-dashboard",
        "superadmin-dashboard",
        View::Dashboard(UserType::SuperAdmin),
        RouteMeta::role(UserType::SuperAdmin),
        SUPERADMIN_DASHBOARD_CHILDREN,
    ),
];

const SUPERADMIN_DASHBOARD_CHILDREN: &[RouteDef] = &[
    RouteDef::page("index", "superadmin-dashboard-index", "SuperAdmin/Layouts/Dashboard/Index"),
    RouteDef::page("super-admin-profile-update", "super-admin-profile-update", "SuperAdmin/Profile/SuperAdminProfileUpdate"),
    RouteDef::page("country", "country", "SuperAdmin/MasterSetting/Country"),
    RouteDef::page("region", "region", "SuperAdmin/MasterSetting/Region"),
    RouteDef::page("region-currency", "region-currency", "SuperAdmin/MasterSetting/RegionCurrency"),
    RouteDef::page("country-region", "country-region", "SuperAdmin/MasterSetting/CountryRegion"),
    RouteDef::page("user-country", "user-country", "SuperAdmin/MasterSetting/UserCountry"),
    RouteDef::page("dialing-code", "dialing-code", "SuperAdmin/MasterSetting/DialingCode"),
    RouteDef::page("conduct-type", "conduct-type", "SuperAdmin/MasterSetting/ConductType"),
    RouteDef::page("attendance-type", "attendance-type", "SuperAdmin/MasterSetting/AttendanceType"),
    RouteDef::page("membership-type", "membership-type", "SuperAdmin/MasterSetting/MembershipType"),
    RouteDef::page("membership-renewal-cycle", "membership-renewal-cycle", "SuperAdmin/MasterSetting/MembershipRenewalCycle"),
    RouteDef::page("designation", "designation", "SuperAdmin/MasterSetting/Designation"),
    RouteDef::page("language", "language", "SuperAdmin/MasterSetting/Language"),
    RouteDef::page("time-zone-setup", "time-zone-setup", "SuperAdmin/MasterSetting/TimeZoneSetup"),
    RouteDef::page("privacy-setup", "privacy-setup", "SuperAdmin/MasterSetting/PrivacySetup"),
    RouteDef::page("regional-tax-rate", "regional-tax-rate", "SuperAdmin/MasterSetting/RegionalTaxRate"),
    RouteDef::page("index-currency", "index-currency", "SuperAdmin/Financial/Currency/Index"),
    RouteDef::page("super-admin-packages", "super-admin-packages", "SuperAdmin/Financial/Package/Index"),
    RouteDef::page("edit-package", "edit-package", "SuperAdmin/Financial/Package/Edit"),
    RouteDef::page("view-package", "view-package", "SuperAdmin/Financial/Package/View"),
    RouteDef::page("edit-price", "edit-price", "SuperAdmin/Financial/Price/Edit"),
    RouteDef::page("index-price", "index-price", "SuperAdmin/Financial/Price/Index"),
    RouteDef::page("view-price", "view-price", "SuperAdmin/Financial/Price/View"),
    RouteDef::page("edit-subscription", "edit-subscription", "SuperAdmin/Financial/Subscription/Edit"),
    RouteDef::page("super-admin-subscription-list", "super-admin-subscription-list", "SuperAdmin/Financial/Subscription/Index"),
    RouteDef::page("super-admin-view-subscription", "super-admin-view-subscription", "SuperAdmin/Financial/Subscription/View"),
    RouteDef::page("user-price-rate", "user-price-rate", "SuperAdmin/Financial/UserPriceRate/Index"),
    RouteDef::page("super-admin-billing-list", "super-admin-billing-list", "SuperAdmin/Financial/Billing/Index"),
    RouteDef::page("super-admin-billing-create", "super-admin-billing-create", "SuperAdmin/Financial/Billing/Create"),
    RouteDef::page("super-admin-billing-edit/:id", "super-admin-billing-edit", "SuperAdmin/Financial/Billing/Edit"),
    RouteDef::page("super-admin-billing-view/:id", "super-admin-billing-view", "SuperAdmin/Financial/Billing/View"),
    RouteDef::page("super-admin-every-day-member-count-and-bill-list", "super-admin-every-day-member-count-and-bill-list", "SuperAdmin/Financial/EverydayMemberCountAndBilling/Index"),
    RouteDef::page("super-admin-every-day-member-count-and-bill-create", "super-admin-every-day-member-count-and-bill-create", "SuperAdmin/Financial/EverydayMemberCountAndBilling/Create"),
    RouteDef::page("super-admin-every-day-member-count-and-bill-edit/:id", "super-admin-every-day-member-count-and-bill-edit", "SuperAdmin/Financial/EverydayMemberCountAndBilling/Edit"),
    RouteDef::page("super-admin-every-day-member-count-and-bill-view/:id", "super-admin-every-day-member-count-and-bill-view", "SuperAdmin/Financial/EverydayMemberCountAndBilling/View"),
    RouteDef::page("super-admin-everyday-storage-billing-list", "super-admin-everyday-storage-billing-list", "SuperAdmin/Financial/EverydayStorageBilling/Index"),
    RouteDef::page("super-admin-everyday-storage-billing-create", "super-admin-everyday-storage-billing-create", "SuperAdmin/Financial/EverydayStorageBilling/Create"),
    RouteDef::page("super-admin-everyday-storage-billing-edit/:id", "super-admin-everyday-storage-billing-edit", "SuperAdmin/Financial/EverydayStorageBilling/Edit"),
    RouteDef::page("super-admin-everyday-storage-billing-view/:id", "super-admin-everyday-storage-billing-view", "SuperAdmin/Financial/EverydayStorageBilling/View"),
    RouteDef::page("super-admin-management-and-storage-billing-list", "super-admin-management-and-storage-billing-list", "SuperAdmin/Financial/ManagementAndStorageBilling/Index"),
    RouteDef::page("super-admin-management-and-storage-billing-create", "super-admin-management-and-storage-billing-create", "SuperAdmin/Financial/ManagementAndStorageBilling/Create"),
    RouteDef::page("super-admin-management-and-storage-billing-edit/:id", "super-admin-management-and-storage-billing-edit", "SuperAdmin/Financial/ManagementAndStorageBilling/Edit"),
    RouteDef::page("super-admin-management-and-storage-billing-view/:id", "super-admin-management-and-storage-billing-view", "SuperAdmin/Financial/ManagementAndStorageBilling/View"),
    RouteDef::page("super-admin-invoice-list", "super-admin-invoice-list", "SuperAdmin/Financial/Invoice/Index"),
    RouteDef::page("super-admin-invoice-create", "super-admin-invoice-create", "SuperAdmin/Financial/Invoice/Create"),
    RouteDef::page("super-admin-invoice-edit/:id", "super-admin-invoice-edit", "SuperAdmin/Financial/Invoice/Edit"),
    RouteDef::page("super-admin-invoice-view/:id", "super-admin-invoice-view", "SuperAdmin/Financial/Invoice/View"),
    RouteDef::page("super-admin-receipt-list", "super-admin-receipt-list", "SuperAdmin/Financial/Receipt/Index"),
    RouteDef::page("super-admin-receipt-create", "super-admin-receipt-create", "SuperAdmin/Financial/Receipt/Create"),
    RouteDef::page("super-admin-receipt-edit/:id", "super-admin-receipt-edit", "SuperAdmin/Financial/Receipt/Edit"),
    RouteDef::page("super-admin-receipt-view/:id", "super-admin-receipt-view", "SuperAdmin/Financial/Receipt/View"),
    RouteDef::page("super-admin-payment-log", "super-admin-payment-log", "SuperAdmin/Financial/PaymentLog/Index"),
    RouteDef::page("super-admin-payment-log-list", "super-admin-payment-log-list", "SuperAdmin/Financial/PaymentLog/Index"),
    RouteDef::page("super-admin-payment-log-create", "super-admin-payment-log-create", "SuperAdmin/Financial/PaymentLog/Create"),
    RouteDef::page("super-admin-payment-log-edit/:id", "super-admin-payment-log-edit", "SuperAdmin/Financial/PaymentLog/Edit"),
    RouteDef::page("super-admin-payment-log-view/:id", "super-admin-payment-log-view", "SuperAdmin/Financial/PaymentLog/View"),
    RouteDef::page("index-business-type", "index-business-type", "SuperAdmin/E-commerce/BusinessType"),
    RouteDef::page("index-category", "index-category", "SuperAdmin/E-commerce/Category"),
    RouteDef::page("index-sub-category", "index-sub-category", "SuperAdmin/E-commerce/SubCategory"),
    RouteDef::page("index-sub-sub-category", "index-sub-sub-category", "SuperAdmin/E-commerce/SubSubCategory"),
    RouteDef::page("index-brand", "index-brand", "SuperAdmin/E-commerce/Brand"),
    RouteDef::page("products-list", "products-list", "SuperAdmin/E-commerce/product/Index"),
    RouteDef::page("product-create", "product-create", "SuperAdmin/E-commerce/product/Create"),
    RouteDef::page("product-edit/:id", "product-edit", "SuperAdmin/E-commerce/product/Edit"),
    RouteDef::page("product-view/:id", "product-view", "SuperAdmin/E-commerce/product/View"),
    RouteDef::page("orders-list", "orders-list", "SuperAdmin/E-commerce/order/Index"),
    RouteDef::page("order-create", "order-create", "SuperAdmin/E-commerce/order/Create"),
    RouteDef::page("order-edit/:id", "order-edit", "SuperAdmin/E-commerce/order/Edit"),
    RouteDef::page("order-view/:id", "order-view", "SuperAdmin/E-commerce/order/View"),
];
