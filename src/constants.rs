//! Constants used throughout the application
//!
//! This module centralizes response messages, limits, and other constant values
//! to improve maintainability and consistency.

// Service
pub const APP_NAME: &str = "kistpark-admin";
pub const WELCOME_MESSAGE: &str = "Welcome to KIST Park Admin!";
pub const API_PREFIX: &str = "/api/v1";
pub const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8083";
pub const DEFAULT_ALLOWED_ORIGIN: &str = "http://localhost:3000";
/// Maximum accepted JSON body size (images travel inline as data URIs)
pub const JSON_BODY_LIMIT_MB: usize = 50;

// List headers
pub const TOTAL_COUNT_HEADER: &str = "x-total-count";

// Auth Messages
pub const AUTH_NO_TOKEN: &str = "Access denied. No token provided.";
pub const AUTH_TOKEN_EXPIRED: &str = "Token expired";
pub const AUTH_INVALID_TOKEN: &str = "Invalid token";
pub const AUTH_NOT_ALLOWED: &str = "Access denied. User is not allowed.";
pub const AUTH_ADMIN_REQUIRED: &str = "Access denied. Admin privileges required.";
pub const AUTH_WORKING: &str = "Authentication working";

// Success Messages
pub const SUCCESS_HIGHLIGHT_CREATED: &str = "Highlight created successfully";
pub const SUCCESS_HIGHLIGHT_UPDATED: &str = "Highlight updated successfully";
pub const SUCCESS_PRESS_RELEASE_CREATED: &str = "Press release created successfully";
pub const SUCCESS_PRESS_RELEASE_UPDATED: &str = "Press release updated successfully";
pub const SUCCESS_PRESS_RELEASE_DELETED: &str = "Press release deleted successfully";
pub const SUCCESS_CATEGORY_DELETED: &str = "Category deleted successfully";
pub const SUCCESS_SUBSCRIBED: &str = "Successfully subscribed";
pub const SUCCESS_USER_DELETED: &str = "User deleted successfully";

// Warning Messages
pub const WARNING_IMAGES_DROPPED: &str = "Some images may not have been processed correctly";

// Error Messages
pub const ERROR_HIGHLIGHT_REQUIRED_FIELDS: &str = "Missing required fields: title and content are required";
pub const ERROR_PRESS_RELEASE_REQUIRED_FIELDS: &str =
    "Missing required fields: title, publisher, date, link and image are required";
pub const ERROR_INVALID_HIGHLIGHT_ID: &str = "Invalid highlight ID format";
pub const ERROR_INVALID_PRESS_RELEASE_ID: &str = "Invalid press release ID format";
pub const ERROR_INVALID_CATEGORY_ID: &str = "Invalid category ID format";
pub const ERROR_INVALID_SUBSCRIBER_ID: &str = "Invalid subscriber ID format";
pub const ERROR_INVALID_USER_ID: &str = "Invalid user ID format";
pub const ERROR_INVALID_DATE: &str = "Invalid date, expected YYYY-MM-DD";
pub const ERROR_HIGHLIGHT_NOT_FOUND: &str = "Highlight not found";
pub const ERROR_NO_HIGHLIGHTS_TO_DELETE: &str = "No highlights found to delete";
pub const ERROR_PRESS_RELEASE_NOT_FOUND: &str = "Press release not found";
pub const ERROR_NO_PRESS_RELEASES_TO_DELETE: &str = "No press releases found to delete";
pub const ERROR_CATEGORY_NOT_FOUND: &str = "Category not found";
pub const ERROR_CATEGORY_EXISTS: &str = "Category already exists";
pub const ERROR_CATEGORY_REQUIRED: &str = "Category name is required";
pub const ERROR_USER_NOT_FOUND: &str = "User not found";
pub const ERROR_EMAIL_REQUIRED: &str = "Email is required";
pub const ERROR_INVALID_EMAIL: &str = "Invalid email format";
pub const ERROR_SUBSCRIBER_EXISTS: &str = "Subscriber already exists";
pub const ERROR_NO_SUBSCRIBERS_DELETED: &str = "No subscribers were deleted";
pub const ERROR_SEQ_TAKEN: &str = "Sequence number already in use";
pub const ERROR_IS_ALLOWED_REQUIRED: &str = "isAllowed is required";
pub const ERROR_UNKNOWN_SDG: &str = "Unknown SDG";
pub const ERROR_IMAGE_PROCESSING_FAILED: &str = "Image processing failed";

// Internal failure messages (paired with the underlying error in the response body)
pub const FAILED_FETCH_HIGHLIGHTS: &str = "Fetching highlights failed, please try again later";
pub const FAILED_GET_HIGHLIGHT: &str = "Failed to get highlight details";
pub const FAILED_CREATE_HIGHLIGHT: &str = "Failed to create highlight";
pub const FAILED_UPDATE_HIGHLIGHT: &str = "Failed to update highlight";
pub const FAILED_DELETE_HIGHLIGHTS: &str = "Failed to delete one or more highlights";
pub const FAILED_DASHBOARD_HIGHLIGHTS: &str = "Failed to fetch dashboard highlights";
pub const FAILED_FETCH_PRESS_RELEASES: &str = "Fetching press releases failed, please try again later";
pub const FAILED_GET_PRESS_RELEASE: &str = "Failed to get press release details";
pub const FAILED_CREATE_PRESS_RELEASE: &str = "Failed to create press release";
pub const FAILED_UPDATE_PRESS_RELEASE: &str = "Failed to update press release";
pub const FAILED_DELETE_PRESS_RELEASE: &str = "Failed to delete press release";
pub const FAILED_FETCH_CATEGORIES: &str = "Failed to fetch categories";
pub const FAILED_CREATE_CATEGORY: &str = "Failed to create category";
pub const FAILED_UPDATE_CATEGORY: &str = "Failed to update category";
pub const FAILED_DELETE_CATEGORY: &str = "Failed to delete category";
pub const FAILED_FETCH_SUBSCRIBERS: &str = "Failed to fetch subscribers";
pub const FAILED_CREATE_SUBSCRIBER: &str = "Failed to create subscriber";
pub const FAILED_DELETE_SUBSCRIBERS: &str = "Server error while deleting subscribers";
pub const FAILED_CREATE_USER: &str = "Something went wrong, failed to create/fetch user";
pub const FAILED_GET_USER: &str = "Failed to get user properties, please try again later";
pub const FAILED_FETCH_USERS: &str = "Failed to fetch users";
pub const FAILED_UPDATE_USER: &str = "Failed to update user";
pub const FAILED_DELETE_USER: &str = "Failed to delete user";
pub const FAILED_FETCH_SDGS: &str = "Failed to fetch SDGs";

// Dashboard
pub const DASHBOARD_DEFAULT_LIMIT: u64 = 6;

// Subscriber export
pub const SUBSCRIBER_CSV_HEADER: &str = "Sequence,Email,Subscription Date";
pub const SUBSCRIBER_CSV_FILENAME: &str = "subscribers.csv";

// Image pipeline
/// Image formats accepted for upload, by file extension
pub const ACCEPTED_IMAGE_FORMATS: [&str; 5] = ["jpeg", "jpg", "png", "gif", "webp"];
pub const HIGHLIGHT_MAX_IMAGES: usize = 10;
pub const HIGHLIGHT_MAX_IMAGE_BYTES: usize = 15 * 1024 * 1024;
pub const HIGHLIGHT_IMAGE_WIDTH: u32 = 1200;
pub const PRESS_RELEASE_MAX_IMAGES: usize = 1;
pub const PRESS_RELEASE_MAX_IMAGE_BYTES: usize = 10 * 1024 * 1024;
pub const PRESS_RELEASE_IMAGE_WIDTH: u32 = 1024;
pub const DEFAULT_UPLOAD_TIMEOUT_SECS: u64 = 120;
pub const DEFAULT_DELETE_TIMEOUT_SECS: u64 = 30;

// Messages
pub const CONFIG_GENERATED: &str = "✅ Generated default configuration file";

/// UN Sustainable Development Goals, seeded into the `sdgs` table and used to
/// validate highlight tags.
pub const SDG_GOALS: [&str; 17] = [
    "SDG-1 No Poverty",
    "SDG-2 Zero Hunger",
    "SDG-3 Good Health and Well-being",
    "SDG-4 Quality Education",
    "SDG-5 Gender Equality",
    "SDG-6 Clean Water and Sanitation",
    "SDG-7 Affordable and Clean Energy",
    "SDG-8 Decent Work and Economic Growth",
    "SDG-9 Industry, Innovation and Infrastructure",
    "SDG-10 Reduced Inequalities",
    "SDG-11 Sustainable Cities and Communities",
    "SDG-12 Responsible Consumption and Production",
    "SDG-13 Climate Action",
    "SDG-14 Life Below Water",
    "SDG-15 Life on Land",
    "SDG-16 Peace, Justice and Strong Institutions",
    "SDG-17 Partnerships for the Goals",
];
